use std::path::PathBuf;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Fatal conditions detected before the server binds its socket.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("model not found at {0}")]
    ModelMissing(PathBuf),

    #[error("failed to load model: {0}")]
    ModelLoad(#[from] ort::Error),

    #[error("unusable model: {0}")]
    ModelInterface(&'static str),

    #[error("class directory not found at {0}")]
    ClassDirMissing(PathBuf),

    #[error("failed to read class directory {path}: {source}")]
    ClassDirUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("class directory {0} contains no class subdirectories")]
    NoClasses(PathBuf),
}

/// The uploaded bytes could not be decoded as an image.
#[derive(Debug, Error)]
#[error("unsupported or corrupt image: {0}")]
pub struct DecodeError(#[from] image::ImageError);

#[derive(Debug, Error)]
pub enum InferError {
    #[error("inference session lock poisoned")]
    SessionPoisoned,

    #[error("input tensor is not contiguous in memory")]
    NonContiguous,

    #[error("inference failed: {0}")]
    Backend(#[from] ort::Error),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("probability vector is empty")]
    EmptyVector,

    #[error("class index {index} out of range for {len} labels")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Per-request failure, translated into the HTTP contract.
///
/// Every variant renders as `{"detail": <message>}`. A bad upload (wrong
/// content type, malformed multipart, undecodable bytes) is the client's
/// fault and maps to 400; anything that goes wrong past decoding is a 500.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Invalid file type. Please upload an image.")]
    InvalidInput,

    #[error("upload failed: {0}")]
    Upload(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Inference(#[from] InferError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("prediction worker terminated: {0}")]
    Canceled(String),
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        match self {
            PredictError::InvalidInput | PredictError::Upload(_) | PredictError::Decode(_) => {
                StatusCode::BAD_REQUEST
            }
            PredictError::Inference(_) | PredictError::Resolve(_) | PredictError::Canceled(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}
