//! Read strategy selection.
//!
//! Each source is read one of three ways, decided once before reading starts:
//!
//! - Files ≥ 1MB: one read-only memory map (`ReadStrategy::Mapped`)
//! - Small files and standard input: 8KB buffered reads (`ReadStrategy::Buffered`)
//! - Named files with follow requested: polling for appended data (`ReadStrategy::Follow`)

use std::fmt;

/// Size at or above which a named file is memory mapped
pub const MMAP_THRESHOLD: u64 = 1024 * 1024; // 1MB

/// How a single source is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    /// Whole-file read-only memory map
    Mapped,
    /// Incremental fixed-size buffered reads
    Buffered,
    /// Poll for data appended after the current end of file
    Follow,
}

impl ReadStrategy {
    /// Select the strategy for one source.
    ///
    /// `file_size` is ignored for standard input and in follow mode.
    pub fn select(source_is_stdin: bool, file_size: u64, follow_requested: bool) -> Self {
        if source_is_stdin {
            Self::Buffered
        } else if follow_requested {
            Self::Follow
        } else if file_size >= MMAP_THRESHOLD {
            Self::Mapped
        } else {
            Self::Buffered
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mapped => "mapped",
            Self::Buffered => "buffered",
            Self::Follow => "follow",
        }
    }
}

impl fmt::Display for ReadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
