//! Error types for option parsing.
//!
//! Every failure aborts the whole parse: no adapter returns partial results
//! alongside an error.

use thiserror::Error;

/// Errors that can occur while turning raw input into recognized items.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Token looks like an option but matches no declared name.
    #[error("unrecognized option '{0}'")]
    UnrecognizedOption(String),

    /// A value-taking option has no value available.
    #[error("the required argument for option '{0}' is missing")]
    MissingOptionValue(String),

    /// More positional arguments than the positional description allows.
    #[error("too many positional arguments (maximum is {max})")]
    TooManyPositionalArguments {
        /// Maximum number of positional arguments accepted.
        max: usize,
    },

    /// An option exposed to config-file parsing has no long name.
    #[error("long name required for config file (option '{0}')")]
    ConfigRequiresLongName(String),

    /// Narrow/wide conversion failed or was not round-trip stable.
    #[error("encoding error: {0}")]
    EncodingError(String),

    /// A flag-style option was given an attached value (`--flag=value`).
    #[error("option '{0}' does not take a value")]
    UnexpectedValue(String),

    /// A long-name prefix matched several declared options.
    #[error("option '{token}' is ambiguous; candidates: {}", candidates.join(", "))]
    AmbiguousOption {
        /// The name as written on the command line.
        token: String,
        /// Long names sharing the written prefix.
        candidates: Vec<String>,
    },

    /// Config line is neither a comment, a section header nor `key = value`.
    #[error("invalid config syntax at line {line}: {text}")]
    InvalidConfigSyntax {
        /// One-based line number.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// Reading a config stream or registry file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON registry parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML registry or style parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
