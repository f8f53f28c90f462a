//! Output data model shared by every parser.
//!
//! All adapters (command line, config file, environment) terminate in the
//! same shape: an ordered [`ParseResult`] of [`RecognizedItem`]s. The types are
//! generic over the string payload so the wide-character bridge can reuse
//! them with UTF-16 strings.

use serde::{Deserialize, Serialize};

use crate::{OptionRegistry, PositionalDescription};

/// One entry of the canonical output sequence.
///
/// `name` and `position` are mutually exclusive. `values` is always present
/// and empty for flag-style options.
///
/// # Examples
///
/// ```
/// use optstream_core::RecognizedItem;
///
/// let item = RecognizedItem::named("level", vec!["3".to_string()]);
/// assert_eq!(item.name.as_deref(), Some("level"));
/// assert!(!item.is_positional());
///
/// let arg = RecognizedItem::positional("input.txt".to_string());
/// assert!(arg.is_positional());
/// assert_eq!(arg.values, vec!["input.txt"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedItem<S = String> {
    /// Declared key of the matched option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Zero-based positional index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Raw values attached to this item.
    #[serde(default)]
    pub values: Vec<S>,
    /// Option name as written, or the positional token verbatim.
    pub raw_token: S,
    /// Exact input tokens consumed to build this item.
    #[serde(default)]
    pub original_tokens: Vec<S>,
    /// Set for option-looking tokens that matched no declared option.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unregistered: bool,
}

impl RecognizedItem<String> {
    /// Creates a named item whose raw token is the name itself.
    pub fn named(name: &str, values: Vec<String>) -> Self {
        Self {
            name: Some(name.to_string()),
            position: None,
            values,
            raw_token: name.to_string(),
            original_tokens: Vec::new(),
            unregistered: false,
        }
    }

    /// Creates a positional item with its index still unassigned.
    pub fn positional(token: String) -> Self {
        Self {
            name: None,
            position: None,
            values: vec![token.clone()],
            raw_token: token.clone(),
            original_tokens: vec![token],
            unregistered: false,
        }
    }
}

impl<S> RecognizedItem<S> {
    /// Returns `true` if this item carries a positional index.
    pub fn is_positional(&self) -> bool {
        self.position.is_some()
    }

    /// Converts every string payload, keeping name, position and flags.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `convert`.
    pub fn try_map_strings<T, E, F>(&self, mut convert: F) -> Result<RecognizedItem<T>, E>
    where
        F: FnMut(&S) -> Result<T, E>,
    {
        Ok(RecognizedItem {
            name: self.name.clone(),
            position: self.position,
            values: self.values.iter().map(&mut convert).collect::<Result<_, _>>()?,
            raw_token: convert(&self.raw_token)?,
            original_tokens: self
                .original_tokens
                .iter()
                .map(&mut convert)
                .collect::<Result<_, _>>()?,
            unregistered: self.unregistered,
        })
    }
}

/// Canonical output of a parse: the ordered items plus the registry they
/// were matched against.
///
/// # Examples
///
/// ```
/// use optstream_core::{ParseResult, RecognizedItem};
///
/// let mut result = ParseResult::new(None);
/// result.items.push(RecognizedItem::named("host", vec!["x".to_string()]));
/// assert_eq!(result.len(), 1);
/// assert!(result.registry().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult<'r, S = String> {
    /// Recognized items in input order.
    pub items: Vec<RecognizedItem<S>>,
    #[serde(skip)]
    registry: Option<&'r OptionRegistry>,
    #[serde(skip)]
    positional: Option<&'r PositionalDescription>,
}

impl<'r, S> ParseResult<'r, S> {
    /// Creates an empty result bound to `registry`.
    pub fn new(registry: Option<&'r OptionRegistry>) -> Self {
        Self {
            items: Vec::new(),
            registry,
            positional: None,
        }
    }

    /// Attaches the positional description used to name positional items.
    pub fn with_positional(mut self, positional: Option<&'r PositionalDescription>) -> Self {
        self.positional = positional;
        self
    }

    /// Registry the items were matched against, if any.
    pub fn registry(&self) -> Option<&'r OptionRegistry> {
        self.registry
    }

    /// Positional description the result was assigned with, if any.
    pub fn positional(&self) -> Option<&'r PositionalDescription> {
        self.positional
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no item was produced.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the items in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, RecognizedItem<S>> {
        self.items.iter()
    }

    /// Resolves the positional slot name of a positional item.
    pub fn positional_name(&self, item: &RecognizedItem<S>) -> Option<&'r str> {
        let position = item.position?;
        self.positional?.name_for_position(position)
    }

    /// Converts every item's strings, keeping the registry back-reference.
    ///
    /// # Errors
    ///
    /// Propagates the first conversion error.
    pub fn try_map_strings<T, E, F>(&self, mut convert: F) -> Result<ParseResult<'r, T>, E>
    where
        F: FnMut(&S) -> Result<T, E>,
    {
        let items = self
            .items
            .iter()
            .map(|item| item.try_map_strings(&mut convert))
            .collect::<Result<_, _>>()?;
        Ok(ParseResult {
            items,
            registry: self.registry,
            positional: self.positional,
        })
    }
}

impl<'a, 'r, S> IntoIterator for &'a ParseResult<'r, S> {
    type Item = &'a RecognizedItem<S>;
    type IntoIter = std::slice::Iter<'a, RecognizedItem<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
