pub mod generator;
pub mod limiter;
pub mod repository;
pub mod uploader;
