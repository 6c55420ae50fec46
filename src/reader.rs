//! Readers for the three read strategies.
//!
//! Each reader takes the run's options by reference and the shared
//! [`RunState`](crate::pipeline::RunState) by mutable reference, and writes into
//! the run's output stream. Which reader handles a source is decided by
//! [`ReadStrategy`](crate::strategy::ReadStrategy).

pub mod buffered;
pub mod follow;
pub mod mapped;

pub use buffered::BufferedReader;
pub use follow::{FollowCursor, FollowReader, FollowState};
pub use mapped::MappedReader;

use crate::error::{RcatError, Result};
use crate::format::LineFormatter;
use crate::line::LineSpan;
use crate::pipeline::RunState;
use std::io::{self, Write};
use std::path::Path;

/// Format one line into `out`.
///
/// A failed write is reported and only the current line is abandoned, except
/// for a closed output pipe, which stops the source since nothing further can
/// be delivered.
pub(crate) fn emit_line<W: Write + ?Sized>(
    formatter: &LineFormatter<'_>,
    out: &mut W,
    span: LineSpan<'_>,
    state: &mut RunState,
    path: &Path,
) -> Result<()> {
    match formatter.format(out, span, &mut state.line_number) {
        Ok(()) => Ok(()),
        Err(e) => absorb_write_error(e, state, path),
    }
}

/// Flush `out` under the same policy as [`emit_line`]
pub(crate) fn flush_output<W: Write + ?Sized>(
    out: &mut W,
    state: &mut RunState,
    path: &Path,
) -> Result<()> {
    match out.flush() {
        Ok(()) => Ok(()),
        Err(e) => absorb_write_error(e, state, path),
    }
}

fn absorb_write_error(e: io::Error, state: &mut RunState, path: &Path) -> Result<()> {
    if e.kind() == io::ErrorKind::BrokenPipe {
        return Err(RcatError::write(path, e));
    }
    let e = RcatError::write(path, e);
    log::error!("[{}] {}", e.kind_name(), e);
    state.write_errors += 1;
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::{self, Write};

    /// Writer that fails every write of a line containing `poison`
    pub struct PoisonWriter {
        pub written: Vec<u8>,
        pub poison: u8,
        pub kind: io::ErrorKind,
    }

    impl PoisonWriter {
        pub fn new(poison: u8, kind: io::ErrorKind) -> Self {
            Self {
                written: Vec::new(),
                poison,
                kind,
            }
        }
    }

    impl Write for PoisonWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.contains(&self.poison) {
                return Err(io::Error::new(self.kind, "poisoned write"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
