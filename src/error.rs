//! Error types for the gamerec library.
//!
//! All failures are represented by the [`GamerecError`] enum, which carries
//! enough detail to tell a data problem (a malformed inventory record, an
//! unknown user) apart from an operational one (I/O, cancellation).
//!
//! # Examples
//!
//! ```
//! use gamerec::error::{GamerecError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     // Return an error
//!     Err(GamerecError::invalid_config("factors must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for gamerec operations.
///
/// This enum represents all possible errors that can occur in the gamerec
/// library. It uses the `thiserror` crate for automatic `Error` trait
/// implementation and provides convenient constructor methods for creating
/// specific error types.
#[derive(Error, Debug)]
pub enum GamerecError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Rejected configuration values (model rank, pass count, top-N, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The extracted observation set contained no engaged interactions
    #[error("No engaged interactions in the input: every play time is zero or every inventory is absent")]
    EmptyObservations,

    /// A recommendation was requested for a user index with no trained factors
    #[error("No trained factors for user index {0}")]
    UnknownUser(usize),

    /// Identity lookup errors (unknown user id, out-of-range index)
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// A line of the inventory file could not be decoded
    #[error("Invalid inventory record on line {line}: {reason}")]
    InvalidRecord {
        /// 1-based line number in the inventory file.
        line: usize,
        /// What was wrong with the record.
        reason: String,
    },

    /// Operation cancelled
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with GamerecError.
pub type Result<T> = std::result::Result<T, GamerecError>;

impl GamerecError {
    /// Create a new invalid configuration error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        GamerecError::InvalidConfig(msg.into())
    }

    /// Create a new lookup error.
    pub fn lookup<S: Into<String>>(msg: S) -> Self {
        GamerecError::Lookup(msg.into())
    }

    /// Create a new cancelled error.
    pub fn cancelled<S: Into<String>>(msg: S) -> Self {
        GamerecError::Cancelled(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        GamerecError::Other(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        GamerecError::Other(format!("Internal error: {}", msg.into()))
    }
}
