//! Line spans, blank-run accounting and terminator scanning.
//!
//! Readers never copy line content to hand it to the formatter: a [`LineSpan`]
//! borrows from whichever buffer the reader owns (a mapped view, a reused
//! line buffer) and lives only for the duration of one formatter call.

use bstr::ByteSlice;
use std::fmt;

/// Line terminator byte
pub const TERMINATOR: u8 = b'\n';

/// Read-only view of one line, terminator included when present.
///
/// The final fragment of a source may lack a terminator.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LineSpan<'a> {
    bytes: &'a [u8],
}

impl<'a> LineSpan<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A blank line is exactly one terminator byte
    pub fn is_blank(&self) -> bool {
        self.bytes == [TERMINATOR]
    }
}

impl fmt::Debug for LineSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LineSpan")
            .field(&self.bytes.as_bstr())
            .finish()
    }
}

/// Consecutive blank lines seen in the current source.
///
/// Created per source, so runs never cross file boundaries.
#[derive(Debug, Clone)]
pub struct BlankRun {
    enabled: bool,
    limit: usize,
    count: usize,
}

impl BlankRun {
    /// Squeeze tracker; `enabled == false` admits every line
    pub fn new(enabled: bool, limit: usize) -> Self {
        Self {
            enabled,
            limit,
            count: 0,
        }
    }

    /// Decide whether `span` is emitted, updating the run length
    pub fn admit(&mut self, span: LineSpan<'_>) -> bool {
        if !self.enabled {
            return true;
        }
        if span.is_blank() {
            self.count += 1;
            self.count <= self.limit
        } else {
            self.count = 0;
            true
        }
    }
}

/// Iterator over the lines of a contiguous buffer
pub struct Lines<'a> {
    bytes: &'a [u8],
    pos: usize,
}

/// Split `bytes` into spans at each terminator without copying
pub fn lines(bytes: &[u8]) -> Lines<'_> {
    Lines { bytes, pos: 0 }
}

impl<'a> Iterator for Lines<'a> {
    type Item = LineSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let start = self.pos;
        let end = memchr::memchr(TERMINATOR, &self.bytes[start..])
            .map(|offset| start + offset + 1)
            .unwrap_or(self.bytes.len());
        self.pos = end;
        Some(LineSpan::new(&self.bytes[start..end]))
    }
}
