//! Error types and handling infrastructure for rcat.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! the library error type. The binary wraps these with `anyhow` at the top level.
//!
//! ## Design Principles
//!
//! - **Non-fatal by default**: every variant describes a failure that stops the
//!   current source only; the pipeline reports it and moves on
//! - **Context preservation**: each variant names the failing operation and source
//! - **Consistency**: standardized Result type across all modules

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for rcat operations.
///
/// Standard input is rendered with the path `-` in every variant.
#[derive(Error, Debug)]
pub enum RcatError {
    /// Source path is missing or cannot be opened for reading
    #[error("Cannot open {path}: {source}")]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while reading a source mid-stream
    #[error("Read failed on {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File size could not be determined
    #[error("Cannot determine size of {path}: {source}")]
    SourceSize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output stream failed
    #[error("Write to output failed while processing {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A whole-file view could not be obtained
    #[error("Memory mapping failed for {path}: {source}")]
    Map {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Standard Result type for rcat operations.
pub type Result<T> = std::result::Result<T, RcatError>;

impl RcatError {
    /// Create a SourceOpen error for `path`
    pub fn open(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::SourceOpen {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a SourceRead error for `path`
    pub fn read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::SourceRead {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a SourceSize error for `path`
    pub fn size(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::SourceSize {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an OutputWrite error raised while processing `path`
    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a Map error for `path`
    pub fn map(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Map {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a Config error with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Short name of the failing operation, used in reports
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::SourceOpen { .. } => "open",
            Self::SourceRead { .. } => "read",
            Self::SourceSize { .. } => "size",
            Self::OutputWrite { .. } => "write",
            Self::Map { .. } => "map",
            Self::Config { .. } => "config",
        }
    }
}
