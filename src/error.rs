//! Error types for taskman
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (validation failure, unknown task, bad args)
//! - 4: Operation failed (storage, IO, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskman CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskman operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::TaskNotFound(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::Storage(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for taskman operations
pub type Result<T> = std::result::Result<T, Error>;
