use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to persist catalog to {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("No {0} in the catalog")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
