//! Option registry: the declared options a parse is matched against.
//!
//! The registry is read-only input to every parser. It supplies, per option,
//! a long name, an optional short name and the [`ValueSemantics`] flags from
//! which the matching [`Style`](crate::Style) is derived.

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Marker that turns a long name into a prefix pattern (`plugin.*`).
pub const WILDCARD_MARKER: char = '*';

/// Value-semantics capability flags of one option.
///
/// # Examples
///
/// ```
/// use optstream_core::ValueSemantics;
///
/// let flag = ValueSemantics::zero_tokens();
/// assert!(flag.zero_tokens);
///
/// let list = ValueSemantics::single().multitoken();
/// assert!(list.is_multitoken && !list.is_implicit);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSemantics {
    /// Option takes no value at all.
    #[serde(default)]
    pub zero_tokens: bool,
    /// Value may be omitted (a default is applied downstream).
    #[serde(default)]
    pub is_implicit: bool,
    /// Option accepts more than one value per occurrence.
    #[serde(default)]
    pub is_multitoken: bool,
}

impl ValueSemantics {
    /// Semantics of a flag that never takes a value.
    pub fn zero_tokens() -> Self {
        Self {
            zero_tokens: true,
            ..Self::default()
        }
    }

    /// Semantics of an option taking exactly one required value.
    pub fn single() -> Self {
        Self::default()
    }

    /// Marks the value as optional.
    pub fn implicit(mut self) -> Self {
        self.is_implicit = true;
        self
    }

    /// Marks the option as accepting several values.
    pub fn multitoken(mut self) -> Self {
        self.is_multitoken = true;
        self
    }
}

/// One declared option.
///
/// # Examples
///
/// ```
/// use optstream_core::OptionDescription;
///
/// let level = OptionDescription::value("level,l");
/// assert_eq!(level.long_name, "level");
/// assert_eq!(level.short_name, Some('l'));
/// assert_eq!(level.key(), "level");
///
/// let short_only = OptionDescription::flag(",q");
/// assert_eq!(short_only.key(), "q");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDescription {
    /// Long name without leading dashes; empty for short-only options.
    #[serde(default)]
    pub long_name: String,
    /// Single-character short name without the leading dash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<char>,
    /// Value-semantics capability flags.
    #[serde(default)]
    pub semantics: ValueSemantics,
    /// Free-form description for help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionDescription {
    /// Creates an option from a `"long,s"` names string and its semantics.
    ///
    /// Either half may be empty: `"verbose"`, `"verbose,v"` and
    /// `",v"` are all accepted. Only the first character after the comma is
    /// used as the short name.
    pub fn new(names: &str, semantics: ValueSemantics) -> Self {
        let (long, short) = match names.split_once(',') {
            Some((long, short)) => (long, short.chars().next()),
            None => (names, None),
        };
        Self {
            long_name: long.trim().to_string(),
            short_name: short,
            semantics,
            description: None,
        }
    }

    /// Creates a flag option (no value).
    pub fn flag(names: &str) -> Self {
        Self::new(names, ValueSemantics::zero_tokens())
    }

    /// Creates an option with exactly one required value.
    pub fn value(names: &str) -> Self {
        Self::new(names, ValueSemantics::single())
    }

    /// Returns the key items for this option are reported under.
    ///
    /// The long name when present, the short character otherwise.
    pub fn key(&self) -> String {
        if !self.long_name.is_empty() {
            return self.long_name.clone();
        }
        self.short_name.map(String::from).unwrap_or_default()
    }

    /// Returns `true` if the long name is a prefix pattern (`name*`).
    pub fn is_wildcard(&self) -> bool {
        self.long_name.ends_with(WILDCARD_MARKER)
    }

    /// Returns the long name with the wildcard marker stripped.
    pub fn wildcard_prefix(&self) -> Option<&str> {
        self.long_name.strip_suffix(WILDCARD_MARKER)
    }
}

/// Ordered collection of declared options.
///
/// # Examples
///
/// ```
/// use optstream_core::{OptionDescription, OptionRegistry};
///
/// let registry = OptionRegistry::new()
///     .with(OptionDescription::flag("verbose,v"))
///     .with(OptionDescription::value("level"));
///
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.iter().next().map(|o| o.key()), Some("verbose".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRegistry {
    /// Declared options in declaration order.
    #[serde(default)]
    pub options: Vec<OptionDescription>,
}

impl OptionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option, builder style.
    pub fn with(mut self, option: OptionDescription) -> Self {
        self.options.push(option);
        self
    }

    /// Adds an option.
    pub fn add(&mut self, option: OptionDescription) {
        self.options.push(option);
    }

    /// Number of declared options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns `true` if no option is declared.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates over the declared options.
    pub fn iter(&self) -> std::slice::Iter<'_, OptionDescription> {
        self.options.iter()
    }

    /// Loads a registry from a YAML or JSON file.
    ///
    /// Files ending in `.json` are read as JSON, everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ParseError::Io) if the file cannot be read, or
    /// [`Json`](crate::ParseError::Json) / [`Yaml`](crate::ParseError::Yaml)
    /// if it does not deserialize.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let registry: Self = if is_json {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        Ok(registry)
    }
}

impl<'a> IntoIterator for &'a OptionRegistry {
    type Item = &'a OptionDescription;
    type IntoIter = std::slice::Iter<'a, OptionDescription>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

/// Compares two option names, optionally ignoring ASCII case.
pub fn names_equal(declared: &str, written: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        declared.eq_ignore_ascii_case(written)
    } else {
        declared == written
    }
}

/// Named positional slots and their maximum occupancy.
///
/// Slots are filled in declaration order. A slot with `max_count = None`
/// absorbs every remaining positional argument and only makes sense last.
///
/// # Examples
///
/// ```
/// use optstream_core::PositionalDescription;
///
/// let mut positional = PositionalDescription::new();
/// positional.add("input", Some(1)).add("extra", None);
///
/// assert_eq!(positional.max_total_count(), None);
/// assert_eq!(positional.name_for_position(0), Some("input"));
/// assert_eq!(positional.name_for_position(7), Some("extra"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalDescription {
    slots: Vec<PositionalSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PositionalSlot {
    name: String,
    #[serde(default)]
    max_count: Option<usize>,
}

impl PositionalDescription {
    /// Creates a description that accepts no positional arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slot named `name` holding up to `max_count` arguments.
    pub fn add(&mut self, name: &str, max_count: Option<usize>) -> &mut Self {
        self.slots.push(PositionalSlot {
            name: name.to_string(),
            max_count,
        });
        self
    }

    /// Total positional arguments accepted, or `None` when unbounded.
    ///
    /// A total that does not fit in `usize` counts as unbounded.
    pub fn max_total_count(&self) -> Option<usize> {
        self.slots
            .iter()
            .try_fold(0usize, |total, slot| {
                slot.max_count.and_then(|n| total.checked_add(n))
            })
    }

    /// Returns the slot name owning the zero-based `position`.
    pub fn name_for_position(&self, position: usize) -> Option<&str> {
        let mut start = 0usize;
        for slot in &self.slots {
            match slot.max_count {
                None => return Some(&slot.name),
                Some(count) if position < start.saturating_add(count) => {
                    return Some(&slot.name);
                }
                Some(count) => start = start.saturating_add(count),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_string_parsing() {
        let both = OptionDescription::flag("verbose,v");
        assert_eq!(both.long_name, "verbose");
        assert_eq!(both.short_name, Some('v'));

        let long_only = OptionDescription::flag("verbose");
        assert_eq!(long_only.short_name, None);

        let short_only = OptionDescription::value(",o");
        assert!(short_only.long_name.is_empty());
        assert_eq!(short_only.key(), "o");
    }

    #[test]
    fn test_wildcard_detection() {
        let opt = OptionDescription::value("plugin.*");
        assert!(opt.is_wildcard());
        assert_eq!(opt.wildcard_prefix(), Some("plugin."));
        assert!(!OptionDescription::value("plugin").is_wildcard());
    }

    #[test]
    fn test_names_equal_folds_ascii_only_when_asked() {
        assert!(!names_equal("Level", "level", false));
        assert!(names_equal("Level", "level", true));
        assert!(!names_equal("level", "lev", true));
    }

    #[test]
    fn test_positional_bounded_total() {
        let mut positional = PositionalDescription::new();
        positional.add("src", Some(1)).add("dst", Some(2));

        assert_eq!(positional.max_total_count(), Some(3));
        assert_eq!(positional.name_for_position(0), Some("src"));
        assert_eq!(positional.name_for_position(2), Some("dst"));
        assert_eq!(positional.name_for_position(3), None);
    }

    #[test]
    fn test_positional_huge_counts_do_not_overflow() {
        let mut positional = PositionalDescription::new();
        positional.add("a", Some(usize::MAX)).add("b", Some(1));

        assert_eq!(positional.max_total_count(), None);
        assert_eq!(positional.name_for_position(0), Some("a"));
        assert_eq!(positional.name_for_position(usize::MAX - 1), Some("a"));
        assert_eq!(positional.name_for_position(usize::MAX), None);
    }

    #[test]
    fn test_positional_empty_accepts_nothing() {
        let positional = PositionalDescription::new();
        assert_eq!(positional.max_total_count(), Some(0));
        assert_eq!(positional.name_for_position(0), None);
    }

    #[test]
    fn test_load_yaml_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.yaml");
        std::fs::write(
            &path,
            r#"
options:
  - long_name: verbose
    short_name: v
    semantics: { zero_tokens: true }
  - long_name: level
"#,
        )
        .unwrap();

        let registry = OptionRegistry::load(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.options[0].semantics.zero_tokens);
        assert_eq!(registry.options[1].semantics, ValueSemantics::single());
    }

    #[test]
    fn test_load_json_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        let json = serde_json::json!({
            "options": [{ "long_name": "include", "semantics": { "is_multitoken": true } }]
        });
        std::fs::write(&path, json.to_string()).unwrap();

        let registry = OptionRegistry::load(&path).unwrap();
        assert!(registry.options[0].semantics.is_multitoken);
    }
}
