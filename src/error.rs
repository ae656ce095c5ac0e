use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("This survey has expired")]
    Expired,

    #[error("This survey is not published yet")]
    Unpublished,

    #[error("Too many requests. Please try again later.")]
    RateLimited { retry_after: u64 },

    #[error("upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("database error: {0}")]
    StorageFailure(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("multipart error: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),

    #[error("blocking task error")]
    Blocking(#[from] actix_web::error::BlockingError),
}

impl Error {
    pub fn not_found(entity: &str) -> Self {
        Error::NotFound(format!("{} not found", entity))
    }

    pub fn unauthorized() -> Self {
        Error::Forbidden("You do not have permission to edit this survey".into())
    }

    fn public_message(&self) -> String {
        match self {
            Error::NotFound(_) | Error::Forbidden(_) | Error::BadRequest(_) | Error::Expired | Error::Unpublished | Error::RateLimited { .. } => self.to_string(),
            Error::UpstreamFailure(_) => "The question generator is unavailable. Please try again later.".into(),
            _ => "An internal error occurred".into(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Forbidden(_) | Error::Unpublished => StatusCode::FORBIDDEN,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Expired => StatusCode::GONE,
            Error::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Error::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        let mut builder = HttpResponse::build(status);
        if let Error::RateLimited { retry_after } = self {
            builder.insert_header((header::RETRY_AFTER, retry_after.to_string()));
        }
        builder.json(json!({ "error": self.public_message() }))
    }
}
