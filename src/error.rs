//! Error types and result type for the dictrie crate.
//!
//! This module defines all error variants that can occur while building,
//! loading or querying a dictionary index. It uses the `snafu` library for
//! ergonomic error handling with automatic backtrace capture.
//!
//! # Examples
//!
//! ```
//! use dictrie::{DictError, Result};
//!
//! fn read_entry() -> Result<String> {
//!     Err(DictError::invalid_parameter("Empty keyword"))
//! }
//!
//! match read_entry() {
//!     Ok(text) => println!("{}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! # Error Variants
//!
//! - [`DictError::Io`]: I/O errors from file operations
//! - [`DictError::SourceUnavailable`]: the source corpus cannot be opened for indexing
//! - [`DictError::CrcMismatch`]: snapshot checksum failure
//! - [`DictError::InvalidDataFormat`]: malformed snapshot or definition data
//! - [`DictError::OffsetOutOfRange`] / [`DictError::TruncatedDefinition`]: bad definition reads

use std::io;
use std::path::PathBuf;

use snafu::{Backtrace, Snafu};

// Re-export snafu for context providers
pub use snafu;

/// Main error type for the dictrie crate.
///
/// All errors include automatic backtrace capture for debugging purposes.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DictError {
    /// I/O error occurred during file operations.
    #[snafu(display("IO error: {source}"))]
    Io {
        source: io::Error,
        backtrace: Backtrace,
    },

    /// The source corpus could not be opened, so there is nothing to index from.
    #[snafu(display("Source corpus unavailable: {}: {source}", path.display()))]
    SourceUnavailable {
        path: PathBuf,
        source: io::Error,
        backtrace: Backtrace,
    },

    /// Snapshot checksum validation failed, indicating data corruption.
    #[snafu(display("CRC mismatch: expected {expected:#x}, got {got:#x}"))]
    CrcMismatch {
        expected: u32,
        got: u32,
        backtrace: Backtrace,
    },

    /// Error parsing JSON configuration.
    #[snafu(display("Parser error: {source}"))]
    ParserError {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        backtrace: Backtrace,
    },

    /// Snapshot or definition data is malformed.
    #[snafu(display("Invalid data format: {message}"))]
    InvalidDataFormat {
        message: String,
        backtrace: Backtrace,
    },

    /// Function was called with invalid parameters.
    #[snafu(display("Invalid parameter: {message}"))]
    InvalidParameter {
        message: String,
        backtrace: Backtrace,
    },

    /// A definition offset lies outside the definition store.
    #[snafu(display("Definition offset {offset} out of range (store length {len})"))]
    OffsetOutOfRange {
        offset: u64,
        len: u64,
        backtrace: Backtrace,
    },

    /// No NUL terminator was found before the end of the definition store.
    #[snafu(display("Definition at offset {offset} is not terminated"))]
    TruncatedDefinition {
        offset: u64,
        backtrace: Backtrace,
    },

    /// Operation was interrupted by user.
    #[snafu(display("User interrupted"))]
    UserInterrupted {
        backtrace: Backtrace,
    },
}

impl From<io::Error> for DictError {
    fn from(source: io::Error) -> Self {
        Self::Io { source, backtrace: Backtrace::capture() }
    }
}

impl From<std::string::FromUtf8Error> for DictError {
    fn from(source: std::string::FromUtf8Error) -> Self {
        Self::InvalidDataFormat { message: format!("Invalid UTF-8 (String): {}", source), backtrace: Backtrace::capture() }
    }
}

impl From<serde_json::Error> for DictError {
    fn from(source: serde_json::Error) -> Self {
        Self::ParserError {
            source: Box::new(source),
            backtrace: Backtrace::capture(),
        }
    }
}

/// Helper methods for creating errors without context providers.
impl DictError {
    /// Creates an `InvalidParameter` error with the given message.
    ///
    /// # Examples
    ///
    /// ```
    /// use dictrie::DictError;
    ///
    /// let error = DictError::invalid_parameter("Keyword too long");
    /// ```
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `InvalidDataFormat` error with the given message.
    pub fn invalid_data_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidDataFormat {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `CrcMismatch` error with expected and actual checksum values.
    pub fn crc_mismatch(expected: u32, got: u32) -> Self {
        Self::CrcMismatch {
            expected,
            got,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `OffsetOutOfRange` error for a read past the end of the store.
    pub fn offset_out_of_range(offset: u64, len: u64) -> Self {
        Self::OffsetOutOfRange {
            offset,
            len,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `TruncatedDefinition` error for a record missing its terminator.
    pub fn truncated_definition(offset: u64) -> Self {
        Self::TruncatedDefinition {
            offset,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `UserInterrupted` error.
    pub fn user_interrupted() -> Self {
        Self::UserInterrupted {
            backtrace: Backtrace::capture(),
        }
    }

    /// Checks if this error means the source corpus was missing.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, DictError::SourceUnavailable { .. })
    }
}

/// A specialized `Result` type for dictrie operations.
pub type Result<T> = std::result::Result<T, DictError>;
