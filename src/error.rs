use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Failed to read logo {path}: {source}")]
    LogoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to capture invoice snapshot: {0}")]
    Snapshot(String),

    #[error("Failed to decode snapshot image: {0}")]
    SnapshotDecode(#[from] printpdf::image_crate::ImageError),

    #[error("Failed to build PDF: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("Failed to serialize document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No print command available on this system")]
    PrintUnavailable,

    #[error("Print command failed: {0}")]
    PrintFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StudioError>;
