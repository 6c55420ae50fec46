//! Optional configuration file overlay.
//!
//! Enabled with the `config` feature. Reads `<config_dir>/rcat/config.toml` and
//! applies any tunables it sets on top of [`Options::default`]. Command-line
//! flags are applied afterwards by the binary.
//!
//! ```toml
//! squeeze_limit = 2
//! number_width = 8
//! tab_repr = "→"
//! end_marker = "¶"
//! follow_interval_ms = 250
//! reset_on_truncate = true
//! ```

use crate::error::{RcatError, Result};
use crate::options::Options;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tunables that may be set from the configuration file
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub squeeze_limit: Option<usize>,
    pub number_width: Option<usize>,
    pub tab_repr: Option<String>,
    pub end_marker: Option<String>,
    pub follow_interval_ms: Option<u64>,
    pub reset_on_truncate: Option<bool>,
}

impl FileConfig {
    /// Parse a configuration document
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| RcatError::config(e.to_string()))
    }

    /// Overlay the values present in this config onto `options`
    pub fn apply(self, mut options: Options) -> Options {
        if let Some(limit) = self.squeeze_limit {
            options.squeeze_limit = limit;
        }
        if let Some(width) = self.number_width {
            options.number_width = width;
        }
        if let Some(tab) = self.tab_repr {
            options.tab_repr = tab;
        }
        if let Some(marker) = self.end_marker {
            options.end_marker = marker;
        }
        if let Some(ms) = self.follow_interval_ms {
            options.follow_interval = Duration::from_millis(ms);
        }
        if let Some(reset) = self.reset_on_truncate {
            options.reset_on_truncate = reset;
        }
        options
    }
}

/// Default location of the configuration file, if the platform has one
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rcat").join("config.toml"))
}

/// Load configuration from `path`. A missing file yields an empty config.
pub fn load_from(path: &Path) -> Result<FileConfig> {
    match std::fs::read_to_string(path) {
        Ok(text) => FileConfig::parse(&text).map_err(|e| match e {
            RcatError::Config { message } => {
                RcatError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(e) => Err(RcatError::config(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Build options from defaults plus the config file at the default location
pub fn load_options() -> Result<Options> {
    let config = match default_config_path() {
        Some(path) => load_from(&path)?,
        None => FileConfig::default(),
    };
    Ok(config.apply(Options::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_and_apply_overrides() {
        let config = FileConfig::parse(
            "squeeze_limit = 2\nend_marker = \"<\"\nfollow_interval_ms = 50\n",
        )
        .unwrap();
        let options = config.apply(Options::default());

        assert_eq!(options.squeeze_limit, 2);
        assert_eq!(options.end_marker, "<");
        assert_eq!(options.follow_interval, Duration::from_millis(50));
        assert_eq!(options.tab_repr, "^I");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = FileConfig::parse("colour = true\n");
        assert!(matches!(result, Err(RcatError::Config { .. })));
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let config = load_from(Path::new("/this/config/does/not/exist.toml")).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_malformed_file_names_path() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"squeeze_limit = \"many\"").unwrap();
        file.flush().unwrap();

        match load_from(file.path()) {
            Err(RcatError::Config { message }) => {
                assert!(message.contains(&file.path().display().to_string()));
            }
            other => panic!("Expected Config error, got {other:?}"),
        }
    }
}
