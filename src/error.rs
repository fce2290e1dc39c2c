use std::path::PathBuf;

use thiserror::Error;

use crate::rpc::RpcError;

/// Custom error types for quickopen
#[derive(Debug, Error)]
pub enum QuickOpenError {
    #[error("fuzzy core binary '{0}' not found in PATH")]
    CoreNotFound(String),

    #[error("Failed to start fuzzy core: {0}")]
    CoreSpawn(String),

    #[error("Invalid config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("Failed to open {}: {message}", path.display())]
    Open { path: PathBuf, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
