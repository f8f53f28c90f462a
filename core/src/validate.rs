//! Registry validation.
//!
//! Catches structural problems in a registry (missing or duplicate names,
//! malformed names, misplaced wildcard markers) before a parse matches
//! against it.
//!
//! # Examples
//!
//! ```
//! use optstream_core::*;
//!
//! let registry = OptionRegistry::new()
//!     .with(OptionDescription::flag("verbose,v"))
//!     .with(OptionDescription::value("level,l"));
//! assert!(validate_registry(&registry).is_empty());
//!
//! // Invalid: two options share a long name
//! let bad = OptionRegistry::new()
//!     .with(OptionDescription::flag("verbose"))
//!     .with(OptionDescription::value("verbose"));
//! assert!(!validate_registry(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{OptionDescription, OptionRegistry, WILDCARD_MARKER};

/// Registry validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An option has neither a long nor a short name.
    #[error("option must define a long or short name")]
    MissingName,
    /// Two options share a long name.
    #[error("duplicate long name: {0}")]
    DuplicateLongName(String),
    /// Two options share a short name.
    #[error("duplicate short name: {0}")]
    DuplicateShortName(char),
    /// Long name starts with a dash or contains `=` or whitespace.
    #[error("invalid long name: {0}")]
    InvalidLongName(String),
    /// Short name is `-`, `=` or whitespace.
    #[error("invalid short name: {0:?}")]
    InvalidShortName(char),
    /// The wildcard marker appears anywhere but at the end of a long name.
    #[error("wildcard marker must end the long name: {0}")]
    MisplacedWildcard(String),
}

/// Validates a registry, returning every problem found.
///
/// An empty vector means the registry is usable by all parsers.
pub fn validate_registry(registry: &OptionRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen_long: HashSet<&str> = HashSet::new();
    let mut seen_short: HashSet<char> = HashSet::new();

    for option in registry {
        if option.long_name.is_empty() && option.short_name.is_none() {
            errors.push(ValidationError::MissingName);
            continue;
        }

        if !option.long_name.is_empty() {
            errors.extend(validate_long_name(option));
            if !seen_long.insert(option.long_name.as_str()) {
                errors.push(ValidationError::DuplicateLongName(option.long_name.clone()));
            }
        }

        if let Some(short) = option.short_name {
            if short == '-' || short == '=' || short.is_whitespace() {
                errors.push(ValidationError::InvalidShortName(short));
            } else if !seen_short.insert(short) {
                errors.push(ValidationError::DuplicateShortName(short));
            }
        }
    }

    errors
}

fn validate_long_name(option: &OptionDescription) -> Option<ValidationError> {
    let name = option.long_name.as_str();
    if name.starts_with('-') || name.contains('=') || name.chars().any(char::is_whitespace) {
        return Some(ValidationError::InvalidLongName(name.to_string()));
    }
    let body = name.strip_suffix(WILDCARD_MARKER).unwrap_or(name);
    if body.contains(WILDCARD_MARKER) {
        return Some(ValidationError::MisplacedWildcard(name.to_string()));
    }
    None
}
