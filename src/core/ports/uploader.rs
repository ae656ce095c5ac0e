use crate::core::models::upload_file::UploadedFileCreate;
use crate::error::Error;

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "svg"];
pub const MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Stores uploaded images and hands back a stable reference path.
pub trait Uploader {
    async fn put(&self, file: UploadedFileCreate) -> Result<String, Error>;
}

/// Lowercased extension of `filename` when it is an allowed image type.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}
