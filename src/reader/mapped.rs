//! Memory-mapped reader for large files
//!
//! Maps the whole file read-only and scans the mapped bytes for terminators
//! directly, so line spans point into the map and nothing is copied into a
//! working buffer. The map and the file handle are released when they go out
//! of scope, on success and error paths alike.

use crate::error::{RcatError, Result};
use crate::format::LineFormatter;
use crate::line::{self, BlankRun};
use crate::options::Options;
use crate::pipeline::RunState;
use crate::reader::emit_line;
use memmap2::Mmap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Reads a whole file through a single read-only mapping
#[derive(Debug, Clone, Copy)]
pub struct MappedReader<'o> {
    options: &'o Options,
}

impl<'o> MappedReader<'o> {
    pub fn new(options: &'o Options) -> Self {
        Self { options }
    }

    /// Map `path` and write its contents to `out`.
    ///
    /// An empty file produces no output.
    pub fn read<W: Write + ?Sized>(
        &self,
        path: &Path,
        out: &mut W,
        state: &mut RunState,
    ) -> Result<()> {
        let file = File::open(path).map_err(|e| RcatError::open(path, e))?;
        self.read_file(&file, path, out, state)
    }

    /// Map an already opened file; `path` names it in errors.
    pub fn read_file<W: Write + ?Sized>(
        &self,
        file: &File,
        path: &Path,
        out: &mut W,
        state: &mut RunState,
    ) -> Result<()> {
        let file_size = file
            .metadata()
            .map_err(|e| RcatError::size(path, e))?
            .len();
        if file_size == 0 {
            return Ok(());
        }

        // Shared read-only mapping; concurrent writers are outside our control
        let mmap = unsafe { Mmap::map(file).map_err(|e| RcatError::map(path, e))? };

        #[cfg(unix)]
        {
            if let Err(e) = mmap.advise(memmap2::Advice::Sequential) {
                // Non-fatal - log and continue
                log::warn!("Failed to set mmap advice for {}: {}", path.display(), e);
            }
        }

        self.write_view(&mmap, path, out, state)
    }

    /// Write a contiguous view, splitting it into lines only when required
    pub fn write_view<W: Write + ?Sized>(
        &self,
        view: &[u8],
        path: &Path,
        out: &mut W,
        state: &mut RunState,
    ) -> Result<()> {
        if !self.options.needs_line_processing() {
            return out.write_all(view).map_err(|e| RcatError::write(path, e));
        }

        let formatter = LineFormatter::new(self.options);
        let mut blank_run = BlankRun::new(self.options.squeeze_blank, self.options.squeeze_limit);
        for span in line::lines(view) {
            if blank_run.admit(span) {
                emit_line(&formatter, out, span, state, path)?;
            }
        }
        Ok(())
    }
}
