use std::fs::{create_dir_all, write};
use std::path::PathBuf;

use crate::core::models::upload_file::UploadedFileCreate;
use crate::core::ports::uploader::{allowed_extension, Uploader, MAX_UPLOAD_SIZE};
use crate::error::Error;
use actix_web::web;
use log::info;
use uuid::Uuid;

pub const PUBLIC_PREFIX: &str = "/static/uploads";

/// Keeps only characters that are safe in a file name.
pub fn sanitize(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    cleaned.trim_start_matches('.').to_owned()
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Uploader for LocalStorage {
    async fn put(&self, file: UploadedFileCreate) -> Result<String, Error> {
        if allowed_extension(&file.name).is_none() {
            return Err(Error::BadRequest("Invalid file type".into()));
        }
        if file.content.len() > MAX_UPLOAD_SIZE {
            return Err(Error::BadRequest("File is too large".into()));
        }
        let filename = format!("{}_{}", Uuid::new_v4(), sanitize(&file.name));
        let dir = self.path.clone();
        let target = dir.join(&filename);
        web::block(move || {
            create_dir_all(&dir)?;
            write(target, file.content)
        })
        .await??;
        info!("stored upload {}", filename);
        Ok(format!("{}/{}", PUBLIC_PREFIX, filename))
    }
}
