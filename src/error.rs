use thiserror::Error;

/// Custom error types for the bs-surface library
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Plot error: {0}")]
    PlotError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("{0}")]
    Other(String),
}

impl SurfaceError {
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, SurfaceError::InvalidParameter(_))
    }
}

pub type Result<T> = std::result::Result<T, SurfaceError>;
