//! Style classification: how many values an option consumes.

use serde::{Deserialize, Serialize};

use crate::{OptionDescription, OptionRegistry, ValueSemantics};

/// Value-consumption rule of one option.
///
/// # Examples
///
/// ```
/// use optstream_core::{Style, ValueSemantics};
///
/// assert_eq!(Style::classify(&ValueSemantics::zero_tokens()), Style::NoValue);
/// assert_eq!(
///     Style::classify(&ValueSemantics::single().implicit().multitoken()),
///     Style::OptionalMulti
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    /// Flag only.
    NoValue,
    /// At most one value, may be omitted.
    OptionalSingle,
    /// Zero or more values.
    OptionalMulti,
    /// One or more values.
    RequiredMulti,
    /// Exactly one value.
    RequiredSingle,
}

impl Style {
    /// Derives the style from value semantics.
    ///
    /// `zero_tokens` wins over everything else; the implicit/multitoken pair
    /// picks among the remaining four variants.
    pub fn classify(semantics: &ValueSemantics) -> Self {
        if semantics.zero_tokens {
            return Self::NoValue;
        }
        match (semantics.is_implicit, semantics.is_multitoken) {
            (true, true) => Self::OptionalMulti,
            (true, false) => Self::OptionalSingle,
            (false, true) => Self::RequiredMulti,
            (false, false) => Self::RequiredSingle,
        }
    }

    /// Returns `true` if the option can carry a value at all.
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::NoValue)
    }

    /// Returns `true` if at least one value must be supplied.
    pub fn requires_value(self) -> bool {
        matches!(self, Self::RequiredSingle | Self::RequiredMulti)
    }

    /// Returns `true` if more than one value may be collected.
    pub fn is_multi(self) -> bool {
        matches!(self, Self::OptionalMulti | Self::RequiredMulti)
    }
}

/// Matching rule of one declared option, valid for a single parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDescriptor {
    /// Long name as declared (may end in the wildcard marker).
    pub long_name: String,
    /// Optional short name.
    pub short_name: Option<char>,
    /// Value-consumption rule.
    pub style: Style,
    /// Key reported on matched items.
    pub key: String,
}

impl StyleDescriptor {
    /// Builds the descriptor of one option.
    pub fn from_option(option: &OptionDescription) -> Self {
        Self {
            long_name: option.long_name.clone(),
            short_name: option.short_name,
            style: Style::classify(&option.semantics),
            key: option.key(),
        }
    }

    /// Returns `true` if `written` is this option's short name.
    pub fn matches_short(&self, written: char, case_insensitive: bool) -> bool {
        self.short_name.is_some_and(|short| {
            if case_insensitive {
                short.eq_ignore_ascii_case(&written)
            } else {
                short == written
            }
        })
    }

    /// Returns the prefix of a wildcard long name.
    pub fn wildcard_prefix(&self) -> Option<&str> {
        self.long_name.strip_suffix(crate::WILDCARD_MARKER)
    }
}

/// Derives one descriptor per declared option, in declaration order.
pub fn derive_descriptors(registry: &OptionRegistry) -> Vec<StyleDescriptor> {
    registry.iter().map(StyleDescriptor::from_option).collect()
}
