use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Failed to replace key {key}: {source}")]
    Persist { key: String, source: io::Error },
}

pub type StoreResult<T> = Result<T, StoreError>;
