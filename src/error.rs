// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SliceError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No source file found for class {0}")]
    ClassNotFound(String),
}

pub type Result<T> = std::result::Result<T, SliceError>;

// Allow `?` on std::io::Error by converting to SliceError::Io with unknown path.
impl From<std::io::Error> for SliceError {
    fn from(source: std::io::Error) -> Self {
        SliceError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
