//! Core types for turning raw program input into recognized options.
//!
//! This crate defines the data model shared by every option source:
//!
//! - [`OptionRegistry`]: declared options, each an [`OptionDescription`]
//!   with long/short names and [`ValueSemantics`].
//! - [`Style`]: how many values an option consumes, derived from its
//!   semantics by [`Style::classify`].
//! - [`RecognizedItem`] / [`ParseResult`]: the ordered output sequence
//!   produced by the command-line, config-file and environment parsers.
//! - [`PositionalDescription`]: named positional slots and their limits.
//! - [`CommandLineStyle`]: syntactic forms the command-line matcher accepts.
//!
//! Errors are reported through [`ParseError`]; registry structure is checked
//! separately by [`validate_registry`].
//!
//! # Example
//!
//! ```
//! use optstream_core::*;
//!
//! let registry = OptionRegistry::new()
//!     .with(OptionDescription::flag("verbose,v"))
//!     .with(OptionDescription::value("level"));
//!
//! let styles: Vec<Style> = derive_descriptors(&registry)
//!     .iter()
//!     .map(|d| d.style)
//!     .collect();
//! assert_eq!(styles, vec![Style::NoValue, Style::RequiredSingle]);
//! assert!(validate_registry(&registry).is_empty());
//! ```

mod config;
mod error;
mod registry;
mod style;
mod types;
mod validate;

pub use config::CommandLineStyle;
pub use error::{ParseError, Result};
pub use registry::{
    OptionDescription, OptionRegistry, PositionalDescription, ValueSemantics, WILDCARD_MARKER,
    names_equal,
};
pub use style::{Style, StyleDescriptor, derive_descriptors};
pub use types::{ParseResult, RecognizedItem};
pub use validate::{ValidationError, validate_registry};
