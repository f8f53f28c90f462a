//! Command-line matching style.
//!
//! Controls which syntactic forms the command-line matcher accepts. The
//! style is plain data and can be kept next to a registry in YAML.
//!
//! # Example YAML
//!
//! ```yaml
//! allow_guessing: true
//! allow_sticky: false
//! case_insensitive: true
//! ```
//!
//! Fields left out keep their [`Default`] (unix style) value.

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Switches honored by the command-line matcher.
///
/// # Examples
///
/// ```
/// use optstream_core::CommandLineStyle;
///
/// let style = CommandLineStyle::default();
/// assert!(style.long_allow_adjacent);
/// assert!(!style.allow_guessing);
///
/// let dos = CommandLineStyle::default().with_slash_for_short();
/// assert!(dos.allow_slash_for_short);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandLineStyle {
    /// Accept `--name` long options.
    pub allow_long: bool,
    /// Accept single-character short options.
    pub allow_short: bool,
    /// Short options may be introduced by `-`.
    pub allow_dash_for_short: bool,
    /// Short options may be introduced by `/`.
    pub allow_slash_for_short: bool,
    /// `--name=value`.
    pub long_allow_adjacent: bool,
    /// `--name value`.
    pub long_allow_next: bool,
    /// `-nvalue`.
    pub short_allow_adjacent: bool,
    /// `-n value`.
    pub short_allow_next: bool,
    /// `-abc` as `-a -b -c`.
    pub allow_sticky: bool,
    /// Unique prefixes of long names select the option.
    pub allow_guessing: bool,
    /// Option names compare ignoring ASCII case.
    pub case_insensitive: bool,
    /// Unknown option tokens become unregistered items instead of errors.
    pub allow_unregistered: bool,
    /// `--` makes every following token positional.
    pub end_of_options: bool,
}

impl Default for CommandLineStyle {
    fn default() -> Self {
        Self {
            allow_long: true,
            allow_short: true,
            allow_dash_for_short: true,
            allow_slash_for_short: false,
            long_allow_adjacent: true,
            long_allow_next: true,
            short_allow_adjacent: true,
            short_allow_next: true,
            allow_sticky: true,
            allow_guessing: false,
            case_insensitive: false,
            allow_unregistered: false,
            end_of_options: true,
        }
    }
}

impl CommandLineStyle {
    /// Enables unique-prefix matching of long names.
    pub fn with_guessing(mut self) -> Self {
        self.allow_guessing = true;
        self
    }

    /// Enables case-insensitive name comparison.
    pub fn with_case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Accepts `/n` as a short option.
    pub fn with_slash_for_short(mut self) -> Self {
        self.allow_slash_for_short = true;
        self
    }

    /// Reports unknown options as unregistered items.
    pub fn with_unregistered(mut self) -> Self {
        self.allow_unregistered = true;
        self
    }

    /// Loads a style from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ParseError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::ParseError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let style = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(style)
    }

    /// Saves the style as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ParseError::Io) if the file cannot be written,
    /// or [`Yaml`](crate::ParseError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let style: CommandLineStyle =
            serde_yaml::from_str("allow_guessing: true\nallow_sticky: false\n").unwrap();
        assert!(style.allow_guessing);
        assert!(!style.allow_sticky);
        assert!(style.allow_long);
        assert!(style.end_of_options);
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.yaml");

        let original = CommandLineStyle::default()
            .with_case_insensitive()
            .with_unregistered();
        original.save(&path).unwrap();

        let loaded = CommandLineStyle::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = CommandLineStyle::load("/nonexistent/optstream-style.yaml").unwrap_err();
        assert!(matches!(err, crate::ParseError::Io(_)));
    }
}
