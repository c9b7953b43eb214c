//! Error types for kernel_finder
//!
//! Provides structured error handling with ConfigError, DatabaseError and AppError.
//! Library entry points swallow these into "skip" decisions; they surface only
//! in logs and in the binary.

use std::io;
use thiserror::Error;

/// Package-manager configuration and mirror-list reading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Package database (libalpm) errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("libalpm error: {0}")]
    Alpm(#[from] alpm::Error),

    #[error("Sync database not registered: {0}")]
    UnknownRepository(String),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),
}

/// Top-level error for the command-line front end.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl AppError {
    /// Get a user-facing error message suitable for terminal display
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => format!("Package database unavailable: {}", e),
            AppError::Output(e) => format!("Could not render output: {}", e),
            AppError::Logging(msg) => format!("Could not initialize logging: {}", msg),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T, E = AppError> = std::result::Result<T, E>;
