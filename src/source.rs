//! Input sources: named files or the standard-input pseudo-source.

use std::fmt;
use std::path::{Path, PathBuf};

/// Marker that selects standard input on the command line
pub const STDIN_MARKER: &str = "-";

/// One requested input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// The standard-input pseudo-source
    Stdin,
    /// A named file
    File(PathBuf),
}

impl Source {
    /// Interpret a command-line operand, treating `-` as standard input
    pub fn from_arg(arg: impl AsRef<str>) -> Self {
        let arg = arg.as_ref();
        if arg == STDIN_MARKER {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    /// Collect operands into sources, defaulting to standard input when empty
    pub fn from_args<I, S>(args: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sources: Vec<Self> = args.into_iter().map(Self::from_arg).collect();
        if sources.is_empty() {
            vec![Self::Stdin]
        } else {
            sources
        }
    }

    pub fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }

    /// Path used in reports; standard input is reported as `-`
    pub fn display_path(&self) -> &Path {
        match self {
            Self::Stdin => Path::new(STDIN_MARKER),
            Self::File(path) => path,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_path().display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_is_stdin() {
        assert_eq!(Source::from_arg("-"), Source::Stdin);
        assert_eq!(
            Source::from_arg("notes.txt"),
            Source::File(PathBuf::from("notes.txt"))
        );
    }

    #[test]
    fn no_operands_defaults_to_stdin() {
        let sources = Source::from_args(Vec::<String>::new());
        assert_eq!(sources, vec![Source::Stdin]);
    }

    #[test]
    fn operand_order_is_kept() {
        let sources = Source::from_args(["b", "-", "a"]);
        assert_eq!(
            sources,
            vec![
                Source::File(PathBuf::from("b")),
                Source::Stdin,
                Source::File(PathBuf::from("a")),
            ]
        );
        assert_eq!(sources[1].to_string(), "-");
    }
}
