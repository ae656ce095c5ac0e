pub mod answer;
pub mod common;
pub mod generation;
pub mod option;
pub mod question;
pub mod report;
pub mod response;
pub mod survey;
pub mod upload_file;
