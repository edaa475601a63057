use std::io;
use std::path::PathBuf;

use thiserror::Error as ThisError;

use crate::prune::UnknownMode;

/// Failures reported by the save codec gateway.
#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("{0}")]
    Io(#[from] io::Error),
    /// Corrupt or unknown container, rejected by the codec
    #[error("{0}")]
    Format(String),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, ThisError)]
pub enum ConvertError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("{} is not a file", .0.display())]
    NotAFile(PathBuf),
    /// Overwrite was declined at the prompt
    #[error("aborted: {} was not overwritten", .0.display())]
    Declined(PathBuf),
    #[error("cannot specify both --to-json and --from-json")]
    ConflictingDirection,
    #[error("cannot tell conversion direction for {}", .0.display())]
    UnknownDirection(PathBuf),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Codec(#[from] CodecError),
}

/// Errors of the projection service; each maps onto one HTTP status.
#[derive(Debug, ThisError)]
pub enum ServiceError {
    #[error("File not found")]
    FileNotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Mode(#[from] UnknownMode),
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::FileNotFound => 404,
            ServiceError::BadRequest(_) | ServiceError::Mode(_) => 400,
            ServiceError::Internal(_) => 500,
        }
    }
}

impl From<CodecError> for ServiceError {
    fn from(e: CodecError) -> Self {
        ServiceError::Internal(e.to_string())
    }
}
