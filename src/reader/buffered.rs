//! Buffered reader for small files and standard input
//!
//! Reads the source in fixed-size chunks. Without line processing each chunk is
//! written straight through; otherwise chunks are reassembled into lines, run
//! through squeeze accounting and handed to the formatter one by one.

use crate::error::{RcatError, Result};
use crate::format::LineFormatter;
use crate::line::{BlankRun, LineSpan, TERMINATOR};
use crate::options::Options;
use crate::pipeline::RunState;
use crate::reader::emit_line;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

/// Streams a source through fixed-size reads
#[derive(Debug, Clone, Copy)]
pub struct BufferedReader<'o> {
    options: &'o Options,
}

impl<'o> BufferedReader<'o> {
    /// Size of each read from the source
    pub const CHUNK_SIZE: usize = 8192;

    pub fn new(options: &'o Options) -> Self {
        Self { options }
    }

    /// Copy `input` to `out`, formatting line by line when options require it.
    ///
    /// `path` is only used to identify the source in errors. On a read error
    /// everything read so far has already been handed to `out`.
    pub fn read<R: Read, W: Write + ?Sized>(
        &self,
        input: R,
        path: &Path,
        out: &mut W,
        state: &mut RunState,
    ) -> Result<()> {
        if self.options.needs_line_processing() {
            self.read_lines(input, path, out, state)
        } else {
            Self::copy_raw(input, path, out)
        }
    }

    fn copy_raw<R: Read, W: Write + ?Sized>(mut input: R, path: &Path, out: &mut W) -> Result<()> {
        let mut chunk = [0u8; Self::CHUNK_SIZE];
        loop {
            let n = match input.read(&mut chunk) {
                Ok(0) => return Ok(()),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(RcatError::read(path, e)),
            };
            out.write_all(&chunk[..n])
                .map_err(|e| RcatError::write(path, e))?;
        }
    }

    fn read_lines<R: Read, W: Write + ?Sized>(
        &self,
        input: R,
        path: &Path,
        out: &mut W,
        state: &mut RunState,
    ) -> Result<()> {
        let formatter = LineFormatter::new(self.options);
        let mut blank_run = BlankRun::new(self.options.squeeze_blank, self.options.squeeze_limit);
        let mut reader = BufReader::with_capacity(Self::CHUNK_SIZE, input);
        // Reused across lines; grows only for lines longer than a chunk
        let mut line = Vec::with_capacity(Self::CHUNK_SIZE);

        loop {
            line.clear();
            match reader.read_until(TERMINATOR, &mut line) {
                Ok(0) => return Ok(()),
                Ok(_) => {}
                Err(e) => return Err(RcatError::read(path, e)),
            }

            let span = LineSpan::new(&line);
            if blank_run.admit(span) {
                emit_line(&formatter, out, span, state, path)?;
            }
        }
    }
}
