//! Line formatting engine.
//!
//! [`LineFormatter`] turns one [`LineSpan`] into output bytes: an optional line
//! number prefix, then either the span verbatim (fast path) or a per-byte
//! rewrite for tabs, control characters and end markers (slow path). It knows
//! nothing about how the span was read.

use crate::line::{LineSpan, TERMINATOR};
use crate::options::Options;
use std::io::{self, Write};

/// DEL, rendered as `^?`
const DEL: u8 = 0x7f;

/// Applies the per-line options to spans
#[derive(Debug, Clone, Copy)]
pub struct LineFormatter<'o> {
    options: &'o Options,
    rewrite: bool,
}

impl<'o> LineFormatter<'o> {
    pub fn new(options: &'o Options) -> Self {
        Self {
            options,
            rewrite: options.transforms_bytes(),
        }
    }

    pub fn options(&self) -> &'o Options {
        self.options
    }

    /// Whether `span` receives a line number under the current options
    pub fn numbers(&self, span: LineSpan<'_>) -> bool {
        self.options.number_all || (self.options.number_nonblank && !span.is_blank())
    }

    /// Write `span` to `out`, numbering it from `line_number` when required.
    ///
    /// The counter advances as soon as a number is assigned, so a failed write
    /// never causes a number to be reused.
    pub fn format<W: Write + ?Sized>(
        &self,
        out: &mut W,
        span: LineSpan<'_>,
        line_number: &mut u64,
    ) -> io::Result<()> {
        if self.numbers(span) {
            let number = *line_number;
            *line_number += 1;
            write!(out, "{:>width$}\t", number, width = self.options.number_width)?;
        }

        if !self.rewrite {
            return out.write_all(span.as_bytes());
        }
        self.rewrite_bytes(out, span.as_bytes())
    }

    fn rewrite_bytes<W: Write + ?Sized>(&self, out: &mut W, bytes: &[u8]) -> io::Result<()> {
        let options = self.options;
        // Start of the pending run of bytes that pass through unchanged
        let mut pending = 0;

        for (i, &byte) in bytes.iter().enumerate() {
            match byte {
                // TAB is never caret-encoded unless tabs are shown
                b'\t' => {
                    if options.show_tabs {
                        out.write_all(&bytes[pending..i])?;
                        out.write_all(options.tab_repr.as_bytes())?;
                        pending = i + 1;
                    }
                }
                TERMINATOR => {
                    if options.show_ends {
                        out.write_all(&bytes[pending..i])?;
                        out.write_all(options.end_marker.as_bytes())?;
                        // the terminator itself stays pending
                        pending = i;
                    }
                }
                _ if options.show_nonprinting => {
                    if let Some(caret) = caret_notation(byte) {
                        out.write_all(&bytes[pending..i])?;
                        out.write_all(&caret)?;
                        pending = i + 1;
                    }
                }
                _ => {}
            }
        }

        out.write_all(&bytes[pending..])
    }
}

/// Caret notation for a single control byte, `None` for printable bytes
pub fn caret_notation(byte: u8) -> Option<[u8; 2]> {
    match byte {
        DEL => Some([b'^', b'?']),
        0x00..=0x1f => Some([b'^', byte + 0x40]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bstr::ByteSlice;

    fn render(options: &Options, input: &[u8], line_number: &mut u64) -> Vec<u8> {
        let formatter = LineFormatter::new(options);
        let mut out = Vec::new();
        formatter
            .format(&mut out, LineSpan::new(input), line_number)
            .unwrap();
        out
    }

    #[test]
    fn no_flags_is_identity() {
        let options = Options::default();
        let input = b"\x01raw\tbytes\x7f\n";
        let mut n = 1;
        assert_eq!(render(&options, input, &mut n), input);
        assert_eq!(n, 1);
    }

    #[test]
    fn tabs_and_ends() {
        let options = Options::default().show_tabs(true).show_ends(true);
        let mut n = 1;
        assert_eq!(
            render(&options, b"x\ty\n", &mut n).as_bstr(),
            b"x^Iy$\n".as_bstr()
        );
    }

    #[test]
    fn caret_encoding() {
        let options = Options::default().show_nonprinting(true);
        let mut n = 1;
        assert_eq!(render(&options, b"\x01", &mut n), b"^A");
        assert_eq!(render(&options, b"\x7f", &mut n), b"^?");
        assert_eq!(render(&options, b"\x00\x1b[", &mut n), b"^@^[[");
        assert_eq!(render(&options, b"a\tb\n", &mut n), b"a\tb\n");
    }

    #[test]
    fn tab_is_caret_only_when_shown() {
        let with_tabs = Options::default().show_nonprinting(true).show_tabs(true);
        let mut n = 1;
        assert_eq!(render(&with_tabs, b"\t", &mut n), b"^I");

        let without = Options::default().show_tabs(false).show_ends(true);
        assert_eq!(render(&without, b"\t\n", &mut n), b"\t$\n");
    }

    #[test]
    fn high_bytes_pass_through() {
        let options = Options::default().visualize_all();
        let mut n = 1;
        let input = "héllo\n".as_bytes();
        let mut expected = "héllo".as_bytes().to_vec();
        expected.extend_from_slice(b"$\n");
        assert_eq!(render(&options, input, &mut n), expected);
    }

    #[test]
    fn number_all_prefixes_every_line() {
        let options = Options::default().number_all(true);
        let mut n = 1;
        assert_eq!(render(&options, b"foo\n", &mut n), b"     1\tfoo\n");
        assert_eq!(render(&options, b"bar\n", &mut n), b"     2\tbar\n");
        assert_eq!(render(&options, b"\n", &mut n), b"     3\t\n");
        assert_eq!(n, 4);
    }

    #[test]
    fn number_nonblank_skips_blank_lines() {
        let options = Options::default().number_nonblank(true);
        let mut n = 7;
        assert_eq!(render(&options, b"\n", &mut n), b"\n");
        assert_eq!(render(&options, b"x\n", &mut n), b"     7\tx\n");
        assert_eq!(n, 8);
    }

    #[test]
    fn number_all_wins_over_nonblank() {
        let options = Options::default().number_all(true).number_nonblank(true);
        let mut n = 1;
        assert_eq!(render(&options, b"\n", &mut n), b"     1\t\n");
    }

    #[test]
    fn wide_numbers_are_not_truncated() {
        let options = Options::default().number_all(true);
        let mut n = 1_234_567;
        assert_eq!(render(&options, b"z\n", &mut n), b"1234567\tz\n");
    }

    #[test]
    fn custom_markers() {
        let mut options = Options::default().show_tabs(true).show_ends(true);
        options.tab_repr = "->".to_string();
        options.end_marker = "<EOL>".to_string();
        let mut n = 1;
        assert_eq!(render(&options, b"a\tb\n", &mut n), b"a->b<EOL>\n");
    }

    #[test]
    fn final_fragment_has_no_end_marker() {
        let options = Options::default().show_ends(true);
        let mut n = 1;
        assert_eq!(render(&options, b"tail", &mut n), b"tail");
    }

    #[test]
    fn caret_notation_table() {
        assert_eq!(caret_notation(0x01), Some(*b"^A"));
        assert_eq!(caret_notation(0x09), Some(*b"^I"));
        assert_eq!(caret_notation(0x7f), Some(*b"^?"));
        assert_eq!(caret_notation(b'a'), None);
        assert_eq!(caret_notation(0x80), None);
    }
}
