//! Error types for the roommap binary

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] roommap_core::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Refused: {0}")]
    Refused(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
