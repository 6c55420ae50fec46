//! Run options consumed by the formatting engine and the readers.
//!
//! An [`Options`] value is built once per run (defaults, optional config file
//! overlay, then command-line flags) and passed by reference everywhere after.

use std::time::Duration;

/// Default number of consecutive blank lines kept by squeeze
pub const DEFAULT_SQUEEZE_LIMIT: usize = 1;

/// Default width of the right-aligned line number column
pub const DEFAULT_NUMBER_WIDTH: usize = 6;

/// Default replacement for TAB when tabs are shown
pub const DEFAULT_TAB_REPR: &str = "^I";

/// Default marker written before each line terminator when ends are shown
pub const DEFAULT_END_MARKER: &str = "$";

/// Default polling interval for follow mode
pub const DEFAULT_FOLLOW_INTERVAL: Duration = Duration::from_secs(1);

/// Formatting and read options for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Number every output line
    pub number_all: bool,
    /// Number non-blank output lines (overridden per line by `number_all`)
    pub number_nonblank: bool,
    /// Collapse runs of blank lines down to `squeeze_limit`
    pub squeeze_blank: bool,
    /// Write `end_marker` before each line terminator
    pub show_ends: bool,
    /// Write `tab_repr` in place of TAB
    pub show_tabs: bool,
    /// Render control bytes in caret notation
    pub show_nonprinting: bool,
    /// Poll named files for appended data instead of reading them once
    pub follow: bool,

    /// Maximum number of consecutive blank lines emitted when squeezing
    pub squeeze_limit: usize,
    /// Width of the right-aligned line number column
    pub number_width: usize,
    /// Replacement text for TAB
    pub tab_repr: String,
    /// Marker written before the line terminator
    pub end_marker: String,
    /// Sleep between follow polls
    pub follow_interval: Duration,
    /// Rewind the follow cursor to 0 when the file shrinks below it
    pub reset_on_truncate: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            number_all: false,
            number_nonblank: false,
            squeeze_blank: false,
            show_ends: false,
            show_tabs: false,
            show_nonprinting: false,
            follow: false,
            squeeze_limit: DEFAULT_SQUEEZE_LIMIT,
            number_width: DEFAULT_NUMBER_WIDTH,
            tab_repr: DEFAULT_TAB_REPR.to_string(),
            end_marker: DEFAULT_END_MARKER.to_string(),
            follow_interval: DEFAULT_FOLLOW_INTERVAL,
            reset_on_truncate: false,
        }
    }
}

impl Options {
    pub fn number_all(mut self, yes: bool) -> Self {
        self.number_all = yes;
        self
    }

    pub fn number_nonblank(mut self, yes: bool) -> Self {
        self.number_nonblank = yes;
        self
    }

    pub fn squeeze_blank(mut self, yes: bool) -> Self {
        self.squeeze_blank = yes;
        self
    }

    pub fn show_ends(mut self, yes: bool) -> Self {
        self.show_ends = yes;
        self
    }

    pub fn show_tabs(mut self, yes: bool) -> Self {
        self.show_tabs = yes;
        self
    }

    pub fn show_nonprinting(mut self, yes: bool) -> Self {
        self.show_nonprinting = yes;
        self
    }

    /// Combined visualisation: nonprinting, tabs and ends together
    pub fn visualize_all(self) -> Self {
        self.show_nonprinting(true).show_tabs(true).show_ends(true)
    }

    pub fn follow(mut self, yes: bool) -> Self {
        self.follow = yes;
        self
    }

    pub fn squeeze_limit(mut self, limit: usize) -> Self {
        self.squeeze_limit = limit;
        self
    }

    pub fn follow_interval(mut self, interval: Duration) -> Self {
        self.follow_interval = interval;
        self
    }

    pub fn reset_on_truncate(mut self, yes: bool) -> Self {
        self.reset_on_truncate = yes;
        self
    }

    /// Whether any flag requires bytes inside a line to be rewritten.
    ///
    /// When false the formatter takes its verbatim fast path.
    pub fn transforms_bytes(&self) -> bool {
        self.show_tabs || self.show_nonprinting || self.show_ends
    }

    /// Whether input must be split into lines at all.
    ///
    /// When false the buffered and mapped readers pass bytes through untouched.
    pub fn needs_line_processing(&self) -> bool {
        self.number_all || self.number_nonblank || self.squeeze_blank || self.transforms_bytes()
    }
}
