//! Run orchestration
//!
//! [`Pipeline`] owns the run's options, output stream and line counter. It
//! visits sources strictly in order, picks a [`ReadStrategy`] for each, and
//! dispatches to the matching reader. Errors stop only the source they occur
//! in; they are reported and the run continues with the next source.

use crate::cancel::CancellationToken;
use crate::error::{RcatError, Result};
use crate::options::Options;
use crate::reader::{BufferedReader, FollowReader, MappedReader};
use crate::source::Source;
use crate::strategy::ReadStrategy;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

/// Mutable state shared by every source in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    /// Next line number to assign; never reset between sources
    pub line_number: u64,
    /// Output writes that failed and were skipped
    pub write_errors: u64,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            line_number: 1,
            write_errors: 0,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Sources visited
    pub sources: usize,
    /// Sources whose processing stopped on an error
    pub failed: usize,
    /// Output writes that failed and were skipped
    pub write_errors: u64,
    /// Line number the next numbered line would have received
    pub next_line_number: u64,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.write_errors == 0
    }
}

/// Drives one invocation over a list of sources
pub struct Pipeline<W: Write> {
    options: Options,
    out: BufWriter<W>,
    state: RunState,
    stdin: Option<Box<dyn Read>>,
}

impl<W: Write> Pipeline<W> {
    /// Capacity of the output buffer
    pub const OUTPUT_BUFFER: usize = 8192;

    pub fn new(options: Options, out: W) -> Self {
        Self {
            options,
            out: BufWriter::with_capacity(Self::OUTPUT_BUFFER, out),
            state: RunState::default(),
            stdin: None,
        }
    }

    /// Read the standard-input pseudo-source from `input` instead of the process stdin
    pub fn with_stdin(mut self, input: impl Read + 'static) -> Self {
        self.stdin = Some(Box::new(input));
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Process every source in order.
    ///
    /// Output is flushed after each source and at the end of the run. A flush
    /// failure is reported and counted but does not fail the run.
    pub async fn run(&mut self, sources: &[Source], cancel: &CancellationToken) -> RunReport {
        let mut report = RunReport::default();

        for source in sources {
            report.sources += 1;
            if let Err(e) = self.process(source, cancel).await {
                log::error!("[{}] {}", e.kind_name(), e);
                report.failed += 1;
            }
            self.flush(source);
        }

        report.write_errors = self.state.write_errors;
        report.next_line_number = self.state.line_number;
        report
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> io::Result<W> {
        self.out.into_inner().map_err(|e| e.into_error())
    }

    async fn process(&mut self, source: &Source, cancel: &CancellationToken) -> Result<()> {
        let path = source.display_path();
        let file_path = match source {
            Source::Stdin => {
                let strategy = ReadStrategy::select(true, 0, self.options.follow);
                log::debug!("Reading {} with {} strategy", source, strategy);
                let reader = BufferedReader::new(&self.options);
                return match self.stdin.as_mut() {
                    Some(input) => reader.read(input, path, &mut self.out, &mut self.state),
                    None => reader.read(io::stdin().lock(), path, &mut self.out, &mut self.state),
                };
            }
            Source::File(file_path) => file_path,
        };

        if self.options.follow {
            log::debug!("Reading {} with {} strategy", source, ReadStrategy::Follow);
            return FollowReader::new(&self.options)
                .run(file_path, &mut self.out, &mut self.state, cancel)
                .await;
        }

        // Open before sizing so a missing or unreadable file is an open error
        let file = File::open(file_path).map_err(|e| RcatError::open(file_path, e))?;
        let size = file
            .metadata()
            .map_err(|e| RcatError::size(file_path, e))?
            .len();
        let strategy = ReadStrategy::select(false, size, false);
        log::debug!("Reading {} ({} bytes) with {} strategy", source, size, strategy);

        match strategy {
            ReadStrategy::Mapped => MappedReader::new(&self.options).read_file(
                &file,
                path,
                &mut self.out,
                &mut self.state,
            ),
            _ => BufferedReader::new(&self.options).read(file, path, &mut self.out, &mut self.state),
        }
    }

    fn flush(&mut self, source: &Source) {
        if let Err(e) = self.out.flush() {
            let e = RcatError::write(source.display_path(), e);
            log::error!("[{}] {}", e.kind_name(), e);
            self.state.write_errors += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bstr::ByteSlice;
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    /// Sink whose writes land but whose flush always fails
    struct FlushFailWriter {
        written: Vec<u8>,
    }

    impl Write for FlushFailWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "device full"))
        }
    }

    async fn run_to_vec(
        options: Options,
        sources: &[Source],
        stdin: &'static [u8],
    ) -> (Vec<u8>, RunReport) {
        let mut pipeline = Pipeline::new(options, Vec::new()).with_stdin(Cursor::new(stdin));
        let report = pipeline.run(sources, &CancellationToken::new()).await;
        (pipeline.into_inner().unwrap(), report)
    }

    #[test]
    fn test_run_state_starts_at_one() {
        let state = RunState::default();
        assert_eq!(state.line_number, 1);
        assert_eq!(state.write_errors, 0);
    }

    #[tokio::test]
    async fn test_stdin_source() {
        let (out, report) = run_to_vec(
            Options::default().number_all(true),
            &[Source::Stdin],
            b"foo\nbar\n",
        )
        .await;
        assert_eq!(out.as_bstr(), b"     1\tfoo\n     2\tbar\n".as_bstr());
        assert_eq!(report.sources, 1);
        assert!(report.is_clean());
        assert_eq!(report.next_line_number, 3);
    }

    #[tokio::test]
    async fn test_stdin_is_consumed_once() {
        let (out, report) =
            run_to_vec(Options::default(), &[Source::Stdin, Source::Stdin], b"once\n").await;
        assert_eq!(out, b"once\n");
        assert_eq!(report.sources, 2);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_missing_file_is_reported_and_skipped() {
        let sources = [
            Source::File(PathBuf::from("/this/file/does/not/exist.log")),
            Source::Stdin,
        ];
        let (out, report) = run_to_vec(Options::default(), &sources, b"still here\n").await;
        assert_eq!(out, b"still here\n");
        assert_eq!(report.failed, 1);
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_follow_on_stdin_reads_once() {
        let (out, report) = run_to_vec(
            Options::default().follow(true),
            &[Source::Stdin],
            b"piped\n",
        )
        .await;
        assert_eq!(out, b"piped\n");
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_missing_file_is_open_error() {
        let mut pipeline = Pipeline::new(Options::default(), Vec::new());
        let source = Source::File(PathBuf::from("/this/file/does/not/exist.log"));
        let err = pipeline
            .process(&source, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RcatError::SourceOpen { .. }), "got {err:?}");
        assert_eq!(err.kind_name(), "open");
    }

    #[tokio::test]
    async fn test_large_file_through_open_handle() {
        let mut file = NamedTempFile::new().unwrap();
        let content = vec![b'x'; crate::strategy::MMAP_THRESHOLD as usize + 1];
        file.write_all(&content).unwrap();
        file.flush().unwrap();

        let (out, report) =
            run_to_vec(Options::default(), &[Source::File(file.path().to_path_buf())], b"").await;
        assert!(out == content);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_flush_failure_is_counted_and_run_completes() {
        let mut second = NamedTempFile::new().unwrap();
        second.write_all(b"second\n").unwrap();
        second.flush().unwrap();

        let sink = FlushFailWriter {
            written: Vec::new(),
        };
        let mut pipeline = Pipeline::new(Options::default().number_all(true), sink)
            .with_stdin(Cursor::new(&b"first\n"[..]));
        let sources = [Source::Stdin, Source::File(second.path().to_path_buf())];
        let report = pipeline.run(&sources, &CancellationToken::new()).await;

        // One failed flush per source
        assert_eq!(report.sources, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.write_errors, 2);
        assert_eq!(report.next_line_number, 3);
        assert!(!report.is_clean());

        let sink = pipeline.into_inner().unwrap();
        assert_eq!(
            sink.written.as_bstr(),
            b"     1\tfirst\n     2\tsecond\n".as_bstr()
        );
    }
}
