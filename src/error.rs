use std::path::PathBuf;
use thiserror::Error;

/// The minimum chunk size accepted by any read operation.
pub const MIN_CHUNK_SIZE: usize = 2;

#[derive(Debug, Error)]
pub enum SlurpError {
    #[error("I/O error on {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("chunk size {0} is below the minimum of {MIN_CHUNK_SIZE}")]
    ChunkSize(usize),
}

impl SlurpError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SlurpError::File {
            path: path.into(),
            source,
        }
    }
}
