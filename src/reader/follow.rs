//! Follow reader: polls a growing file for appended data
//!
//! The loop is a small state machine:
//!
//! ```text
//!            size > cursor
//!  Watching ───────────────► Reading
//!     ▲  │ size <= cursor       │ no more data
//!     │  ▼ or query failed      ▼
//!     └─ Sleeping ◄─────────────┘
//!          │ cancelled
//!          ▼
//!       Stopped
//! ```
//!
//! Cancellation is observed at the top of Watching and Sleeping only, so a
//! Reading pass always finishes the lines it started. Files are assumed to
//! grow monotonically; a shrinking file is only handled when
//! `reset_on_truncate` is set, in which case the cursor rewinds to 0.

use crate::cancel::CancellationToken;
use crate::error::{RcatError, Result};
use crate::format::LineFormatter;
use crate::line::{LineSpan, TERMINATOR};
use crate::options::Options;
use crate::pipeline::RunState;
use crate::reader::{emit_line, flush_output};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Phase of the follow loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowState {
    Watching,
    Reading,
    Sleeping,
    Stopped,
}

/// Open handle and read offset for one followed file
#[derive(Debug)]
pub struct FollowCursor {
    path: PathBuf,
    reader: BufReader<File>,
    offset: u64,
}

impl FollowCursor {
    /// Open `path` positioned at its current end
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| RcatError::open(path, e))?;
        let mut reader = BufReader::with_capacity(super::BufferedReader::CHUNK_SIZE, file);
        let offset = reader
            .seek(SeekFrom::End(0))
            .map_err(|e| RcatError::read(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            offset,
        })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current size of the file on disk
    fn file_size(&self) -> Result<u64> {
        std::fs::metadata(&self.path)
            .map(|metadata| metadata.len())
            .map_err(|e| RcatError::size(&self.path, e))
    }
}

/// Emits data appended to a file until cancelled
#[derive(Debug, Clone, Copy)]
pub struct FollowReader<'o> {
    options: &'o Options,
}

impl<'o> FollowReader<'o> {
    pub fn new(options: &'o Options) -> Self {
        Self { options }
    }

    /// Follow `path` until `cancel` fires or a read fails.
    ///
    /// Only data appended after the call starts is emitted. The open failure
    /// and mid-loop read failures are returned; size query failures are
    /// reported and retried on the next poll.
    pub async fn run<W: Write + ?Sized>(
        &self,
        path: &Path,
        out: &mut W,
        state: &mut RunState,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let mut cursor = FollowCursor::open(path)?;
        log::debug!(
            "Following {} from offset {}",
            cursor.path().display(),
            cursor.offset()
        );

        let mut phase = FollowState::Watching;
        loop {
            log::trace!("follow {}: {:?}", path.display(), phase);
            phase = match phase {
                FollowState::Watching if cancel.is_cancelled() => FollowState::Stopped,
                FollowState::Watching => match cursor.file_size() {
                    Ok(size) => self.watch(&mut cursor, size),
                    Err(e) => {
                        log::error!("[{}] {}", e.kind_name(), e);
                        FollowState::Sleeping
                    }
                },
                FollowState::Reading => {
                    self.read_appended(&mut cursor, out, state)?;
                    flush_output(out, state, path)?;
                    FollowState::Sleeping
                }
                FollowState::Sleeping if cancel.is_cancelled() => FollowState::Stopped,
                FollowState::Sleeping => {
                    tokio::select! {
                        _ = tokio::time::sleep(self.options.follow_interval) => {}
                        _ = cancel.cancelled() => {}
                    }
                    FollowState::Watching
                }
                FollowState::Stopped => break,
            };
        }

        log::debug!("Stopped following {}", path.display());
        Ok(())
    }

    /// Decide the next phase from the file's current size
    fn watch(&self, cursor: &mut FollowCursor, size: u64) -> FollowState {
        if size < cursor.offset && self.options.reset_on_truncate {
            log::warn!(
                "{} shrank from {} to {} bytes; reading from the start",
                cursor.path().display(),
                cursor.offset,
                size
            );
            cursor.offset = 0;
        }

        if size > cursor.offset {
            FollowState::Reading
        } else {
            FollowState::Sleeping
        }
    }

    /// Emit everything currently available past the cursor
    fn read_appended<W: Write + ?Sized>(
        &self,
        cursor: &mut FollowCursor,
        out: &mut W,
        state: &mut RunState,
    ) -> Result<()> {
        let formatter = LineFormatter::new(self.options);
        let path = cursor.path.as_path();
        let reader = &mut cursor.reader;
        let offset = &mut cursor.offset;

        reader
            .seek(SeekFrom::Start(*offset))
            .map_err(|e| RcatError::read(path, e))?;

        let mut line = Vec::with_capacity(super::BufferedReader::CHUNK_SIZE);
        loop {
            line.clear();
            let n = reader
                .read_until(TERMINATOR, &mut line)
                .map_err(|e| RcatError::read(path, e))?;
            if n == 0 {
                return Ok(());
            }
            *offset += n as u64;
            emit_line(&formatter, out, LineSpan::new(&line), state, path)?;
        }
    }
}
