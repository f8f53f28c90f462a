//! Config-file adapter.
//!
//! Reads INI-style `key = value` lines and produces the same item sequence
//! as the command-line pipeline. Only long names are recognized; every
//! registered option must therefore have one.
//!
//! Line syntax:
//!
//! - `#` starts a comment running to the end of the line
//! - blank lines are skipped
//! - `[section]` prefixes following keys as `section.key`
//! - `key = value`, both sides trimmed
//!
//! # Example
//!
//! ```
//! use optstream_core::{OptionDescription, OptionRegistry};
//! use optstream_parsers::parse_config_str;
//!
//! let registry = OptionRegistry::new()
//!     .with(OptionDescription::value("level"))
//!     .with(OptionDescription::value("db.host"));
//!
//! let result = parse_config_str("level = 5\n[db]\nhost = localhost # primary\n", &registry).unwrap();
//! assert_eq!(result.items[0].name.as_deref(), Some("level"));
//! assert_eq!(result.items[1].name.as_deref(), Some("db.host"));
//! assert_eq!(result.items[1].values, vec!["localhost"]);
//! ```

use std::collections::HashSet;
use std::io::{BufRead, BufReader, Cursor, ErrorKind, Lines};
use std::sync::LazyLock;

use optstream_core::{
    OptionRegistry, ParseError, ParseResult, RecognizedItem, Result, WILDCARD_MARKER,
};
use regex::Regex;
use tracing::{debug, trace};

use crate::encoding::{WideParseResult, WideReader};

/// Config line patterns.
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\s*([^\]]*?)\s*\]$").expect("static regex must compile"));
static KEY_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^=]*?)\s*=\s*(.*)$").expect("static regex must compile"));

/// Long names a config file may set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedNames {
    exact: HashSet<String>,
    prefixes: Vec<String>,
}

impl AllowedNames {
    /// Collects the long names of `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ConfigRequiresLongName`] for the first option
    /// without a long name. Nothing is read before this check.
    pub fn from_registry(registry: &OptionRegistry) -> Result<Self> {
        let mut allowed = Self::default();
        for option in registry {
            if option.long_name.is_empty() {
                return Err(ParseError::ConfigRequiresLongName(option.key()));
            }
            match option.long_name.strip_suffix(WILDCARD_MARKER) {
                Some(prefix) => allowed.prefixes.push(prefix.to_string()),
                None => {
                    allowed.exact.insert(option.long_name.clone());
                }
            }
        }
        Ok(allowed)
    }

    /// Returns `true` if `key` names an allowed option.
    pub fn contains(&self, key: &str) -> bool {
        self.exact.contains(key) || self.prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }
}

/// Lazy iterator of config-file items, one per `key = value` line.
pub struct ConfigFileItems<R> {
    lines: Lines<R>,
    allowed: AllowedNames,
    section: String,
    line_number: usize,
    failed: bool,
}

impl<R: BufRead> ConfigFileItems<R> {
    /// Prepares to read `reader` against `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ConfigRequiresLongName`] eagerly, before any
    /// line is read.
    pub fn new(reader: R, registry: &OptionRegistry) -> Result<Self> {
        Ok(Self {
            lines: reader.lines(),
            allowed: AllowedNames::from_registry(registry)?,
            section: String::new(),
            line_number: 0,
            failed: false,
        })
    }

    fn parse_line(&mut self, raw: &str) -> Result<Option<RecognizedItem>> {
        let content = raw.split_once('#').map_or(raw, |(before, _)| before).trim();
        if content.is_empty() {
            return Ok(None);
        }

        if let Some(caps) = SECTION_RE.captures(content) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            self.section = if name.is_empty() {
                String::new()
            } else {
                format!("{name}.")
            };
            debug!(section = name, line = self.line_number, "Entered config section");
            return Ok(None);
        }

        let Some(caps) = KEY_VALUE_RE.captures(content) else {
            return Err(self.syntax_error(content));
        };
        let key = caps.get(1).map_or("", |m| m.as_str());
        if key.is_empty() {
            return Err(self.syntax_error(content));
        }
        let value = caps.get(2).map_or("", |m| m.as_str());

        let full_key = format!("{}{key}", self.section);
        if !self.allowed.contains(&full_key) {
            return Err(ParseError::UnrecognizedOption(full_key));
        }
        trace!(key = %full_key, line = self.line_number, "Recognized config entry");

        Ok(Some(RecognizedItem {
            name: Some(full_key.clone()),
            position: None,
            values: vec![value.to_string()],
            raw_token: full_key,
            original_tokens: vec![content.to_string()],
            unregistered: false,
        }))
    }

    fn syntax_error(&self, content: &str) -> ParseError {
        ParseError::InvalidConfigSyntax {
            line: self.line_number,
            text: content.to_string(),
        }
    }
}

impl<I: Iterator<Item = u16>> ConfigFileItems<BufReader<WideReader<I>>> {
    /// Prepares to read wide-character (UTF-16) text against `registry`.
    ///
    /// Code units are decoded as lines are requested.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ConfigRequiresLongName`] eagerly, before any
    /// code unit is decoded.
    pub fn from_wide<T>(units: T, registry: &OptionRegistry) -> Result<Self>
    where
        T: IntoIterator<Item = u16, IntoIter = I>,
    {
        Self::new(BufReader::new(WideReader::new(units)), registry)
    }
}

impl<R: BufRead> Iterator for ConfigFileItems<R> {
    type Item = Result<RecognizedItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => {
                    self.failed = true;
                    let err = if err.kind() == ErrorKind::InvalidData {
                        ParseError::EncodingError(format!(
                            "line {}: {err}",
                            self.line_number + 1
                        ))
                    } else {
                        err.into()
                    };
                    return Some(Err(err));
                }
            };
            self.line_number += 1;
            match self.parse_line(&line) {
                Ok(Some(item)) => return Some(Ok(item)),
                Ok(None) => continue,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Parses a config stream into a result bound to `registry`.
///
/// # Errors
///
/// Fails on options without a long name, unknown keys, malformed lines and
/// read errors.
pub fn parse_config_file<'r, R: BufRead>(
    reader: R,
    registry: &'r OptionRegistry,
) -> Result<ParseResult<'r>> {
    let items = ConfigFileItems::new(reader, registry)?.collect::<Result<Vec<_>>>()?;
    debug!(items = items.len(), "Parsed config file");
    let mut result = ParseResult::new(Some(registry));
    result.items = items;
    Ok(result)
}

/// Parses config text held in memory.
///
/// # Errors
///
/// See [`parse_config_file`].
pub fn parse_config_str<'r>(text: &str, registry: &'r OptionRegistry) -> Result<ParseResult<'r>> {
    parse_config_file(Cursor::new(text.as_bytes()), registry)
}

/// Parses a wide-character (UTF-16) config stream through the narrow
/// parser and converts the result back.
///
/// # Errors
///
/// Returns [`ParseError::EncodingError`] for invalid UTF-16, otherwise see
/// [`parse_config_file`].
pub fn parse_config_wide<'r, I>(
    units: I,
    registry: &'r OptionRegistry,
) -> Result<WideParseResult<'r>>
where
    I: IntoIterator<Item = u16>,
{
    let narrow = parse_config_file(BufReader::new(WideReader::new(units)), registry)?;
    WideParseResult::from_narrow(narrow)
}
