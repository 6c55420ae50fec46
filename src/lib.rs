//! # rcat - Fast File Concatenation with Line Formatting
//!
//! Concatenates files to an output stream, optionally numbering lines,
//! squeezing blank runs, and making tabs, control characters and line ends
//! visible. Named files can also be followed for appended data.
//!
//! ## Features
//!
//! - **Byte-exact passthrough**: with no formatting flags output equals input
//! - **Memory-mapped reads**: files of 1MB or more are mapped and scanned in place
//! - **Buffered streaming**: small files and standard input use 8KB reads
//! - **Follow mode**: poll a growing file and emit only what was appended
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`options`] - Immutable per-run options
//! - [`line`] - Line spans and blank-run accounting
//! - [`format`] - Per-line formatting engine
//! - [`strategy`] - Read strategy selection
//! - [`reader`] - Buffered, mapped and follow readers
//! - [`pipeline`] - Run orchestration across sources

// Core modules
pub mod error;
pub mod options;
#[cfg(feature = "config")]
pub mod config;

// Formatting engine
pub mod format;
pub mod line;

// Reading
pub mod cancel;
pub mod reader;
pub mod source;
pub mod strategy;

// Orchestration
pub mod pipeline;

// Re-export commonly used types for convenience
pub use error::{RcatError, Result};

// Public API surface for external usage
pub use cancel::CancellationToken;
pub use format::LineFormatter;
pub use options::Options;
pub use pipeline::{Pipeline, RunReport, RunState};
pub use source::Source;
pub use strategy::{ReadStrategy, MMAP_THRESHOLD};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
