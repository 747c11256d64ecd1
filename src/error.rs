use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of an upload run. None of these are retried.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File doesn't exist - {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("File name is not valid UTF-8 - {}", .0.display())]
    InvalidFileName(PathBuf),

    #[error("Server responded with {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Request failed")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = UploadError> = std::result::Result<T, E>;
