//! Parsers turning raw program input into recognized option sequences.
//!
//! Three sources feed the same output shape, an ordered
//! [`ParseResult`](optstream_core::ParseResult):
//!
//! - [`CommandLineParser`]: argument vectors, matched against an
//!   [`OptionRegistry`](optstream_core::OptionRegistry) with
//!   per-option value styles, plus positional numbering and limits.
//! - [`parse_config_file`]: INI-style `key = value` streams, long names only.
//! - [`parse_environment`]: an explicit environment snapshot and a
//!   name-mapping function.
//!
//! Wide-character (UTF-16) input goes through [`encoding`], which converts to
//! UTF-8, runs the narrow parser and converts the result back.
//!
//! # Example
//!
//! ```
//! use optstream_core::{OptionDescription, OptionRegistry};
//! use optstream_parsers::{EnvironmentSnapshot, parse_command_line, parse_environment_with_prefix};
//!
//! let registry = OptionRegistry::new()
//!     .with(OptionDescription::flag("verbose"))
//!     .with(OptionDescription::value("level"));
//!
//! let cli = parse_command_line(["--verbose", "--level", "3", "input.txt"], Some(&registry)).unwrap();
//! assert_eq!(cli.items[2].position, Some(0));
//!
//! let env: EnvironmentSnapshot = [("APP_LEVEL", "4")].into_iter().collect();
//! let from_env = parse_environment_with_prefix(&registry, &env, "APP_");
//! assert_eq!(from_env.items[0].name.as_deref(), Some("level"));
//! ```

pub mod cmdline;
pub mod config_file;
pub mod encoding;
pub mod environment;
pub mod output;

pub use cmdline::{CommandLineParser, parse_command_line, parse_os_args};
pub use config_file::{ConfigFileItems, parse_config_file, parse_config_str, parse_config_wide};
pub use encoding::{WideCommandLineParser, WideParseResult, WideReader, WideString};
pub use environment::{
    EnvironmentSnapshot, parse_environment, parse_environment_with_prefix, prefix_name_mapper,
};
