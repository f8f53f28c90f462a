//! Command-line parsing pipeline.
//!
//! [`CommandLineParser`] derives one [`StyleDescriptor`] per registered
//! option, runs the [`TokenMatcher`] over the argument vector and numbers the
//! remaining positional tokens. The first failure aborts the parse.
//!
//! [`StyleDescriptor`]: optstream_core::StyleDescriptor

pub mod matcher;
pub mod positional;

use std::ffi::OsString;

use optstream_core::{
    CommandLineStyle, OptionRegistry, ParseResult, PositionalDescription, Result,
    derive_descriptors,
};
use tracing::debug;

pub use matcher::{ExtraParser, MatchedToken, TokenMatcher};
pub use positional::assign_positions;

use crate::encoding::narrow_os_args;

/// Builder-style command-line parser over a narrow (UTF-8) argument vector.
///
/// # Examples
///
/// ```
/// use optstream_core::{OptionDescription, OptionRegistry, PositionalDescription};
/// use optstream_parsers::CommandLineParser;
///
/// let registry = OptionRegistry::new()
///     .with(OptionDescription::flag("verbose,v"))
///     .with(OptionDescription::value("level"));
/// let mut positional = PositionalDescription::new();
/// positional.add("input", Some(1));
///
/// let result = CommandLineParser::new(["-v", "--level", "3", "input.txt"])
///     .options(&registry)
///     .positional(&positional)
///     .run()
///     .unwrap();
///
/// assert_eq!(result.items[1].values, vec!["3"]);
/// assert_eq!(result.positional_name(&result.items[2]), Some("input"));
/// ```
pub struct CommandLineParser<'r> {
    args: Vec<String>,
    registry: Option<&'r OptionRegistry>,
    positional: Option<&'r PositionalDescription>,
    style: CommandLineStyle,
    extra_parser: Option<Box<ExtraParser<'r>>>,
}

impl<'r> CommandLineParser<'r> {
    /// Creates a parser over `args` (program name excluded).
    pub fn new<I, A>(args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            registry: None,
            positional: None,
            style: CommandLineStyle::default(),
            extra_parser: None,
        }
    }

    /// Creates a parser over OS-encoded arguments, e.g. from
    /// [`std::env::args_os`] with the program name skipped.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError`](optstream_core::ParseError::EncodingError)
    /// if an argument is not valid Unicode.
    pub fn from_os_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = OsString>,
    {
        Ok(Self::new(narrow_os_args(args)?))
    }

    /// Matches against `registry`; without it every token is positional.
    pub fn options(mut self, registry: &'r OptionRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Limits and names positional arguments.
    pub fn positional(mut self, positional: &'r PositionalDescription) -> Self {
        self.positional = Some(positional);
        self
    }

    /// Sets the accepted syntactic forms.
    pub fn style(mut self, style: CommandLineStyle) -> Self {
        self.style = style;
        self
    }

    /// Installs a hook consulted for every token before normal matching.
    pub fn extra_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> Option<(String, String)> + 'r,
    {
        self.extra_parser = Some(Box::new(parser));
        self
    }

    /// Runs the parse.
    ///
    /// # Errors
    ///
    /// Propagates the first matcher or positional-limit failure.
    pub fn run(&self) -> Result<ParseResult<'r>> {
        let descriptors = self.registry.map(derive_descriptors);
        let matcher = TokenMatcher::new(descriptors.as_deref(), self.style)
            .with_extra_parser(self.extra_parser.as_deref());
        let tokens = matcher.run(&self.args)?;

        let max_positional = self.positional.and_then(PositionalDescription::max_total_count);
        let items = assign_positions(tokens, max_positional)?;

        debug!(
            args = self.args.len(),
            items = items.len(),
            positional = items.iter().filter(|item| item.is_positional()).count(),
            "Parsed command line"
        );

        let mut result = ParseResult::new(self.registry).with_positional(self.positional);
        result.items = items;
        Ok(result)
    }
}

/// Parses `args` against `registry` with the default style.
///
/// # Errors
///
/// See [`CommandLineParser::run`].
pub fn parse_command_line<'r, I, A>(
    args: I,
    registry: Option<&'r OptionRegistry>,
) -> Result<ParseResult<'r>>
where
    I: IntoIterator<Item = A>,
    A: Into<String>,
{
    let mut parser = CommandLineParser::new(args);
    if let Some(registry) = registry {
        parser = parser.options(registry);
    }
    parser.run()
}

/// Parses OS-encoded arguments against `registry` with the default style.
///
/// # Errors
///
/// Returns [`EncodingError`](optstream_core::ParseError::EncodingError) for
/// non-Unicode arguments, otherwise see [`CommandLineParser::run`].
pub fn parse_os_args<'r, I>(
    args: I,
    registry: Option<&'r OptionRegistry>,
) -> Result<ParseResult<'r>>
where
    I: IntoIterator<Item = OsString>,
{
    parse_command_line(narrow_os_args(args)?, registry)
}

#[cfg(test)]
mod tests {
    use optstream_core::{OptionDescription, ParseError, RecognizedItem};

    use super::*;

    fn registry() -> OptionRegistry {
        OptionRegistry::new()
            .with(OptionDescription::flag("verbose"))
            .with(OptionDescription::value("level"))
    }

    #[test]
    fn test_pipeline_scenario() {
        let registry = registry();
        let result =
            parse_command_line(["--verbose", "--level", "3", "input.txt"], Some(&registry))
                .unwrap();

        let summary: Vec<(Option<&str>, Option<usize>, Vec<&str>)> = result
            .iter()
            .map(|item| {
                (
                    item.name.as_deref(),
                    item.position,
                    item.values.iter().map(String::as_str).collect(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some("verbose"), None, vec![]),
                (Some("level"), None, vec!["3"]),
                (None, Some(0), vec!["input.txt"]),
            ]
        );
        assert!(std::ptr::eq(result.registry().unwrap(), &registry));
    }

    #[test]
    fn test_positional_limit_from_description() {
        let registry = registry();
        let mut positional = PositionalDescription::new();
        positional.add("input", Some(1));

        let err = CommandLineParser::new(["a", "b"])
            .options(&registry)
            .positional(&positional)
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::TooManyPositionalArguments { max: 1 }
        ));
    }

    #[test]
    fn test_huge_slot_counts_are_unbounded() {
        let registry = registry();
        let mut positional = PositionalDescription::new();
        positional.add("a", Some(usize::MAX)).add("b", Some(1));

        let result = CommandLineParser::new(["x", "y"])
            .options(&registry)
            .positional(&positional)
            .run()
            .unwrap();
        assert_eq!(result.items[1].position, Some(1));
        assert_eq!(result.positional_name(&result.items[1]), Some("a"));
    }

    #[test]
    fn test_unbounded_without_description() {
        let result = parse_command_line(["a", "b", "c"], None).unwrap();
        assert_eq!(result.items[2].position, Some(2));
        assert!(result.registry().is_none());
    }

    #[test]
    fn test_extra_parser_through_builder() {
        let registry = registry();
        let result = CommandLineParser::new(["+debug", "--verbose"])
            .options(&registry)
            .extra_parser(|token| {
                token
                    .strip_prefix('+')
                    .map(|name| (name.to_string(), String::new()))
            })
            .run()
            .unwrap();

        assert_eq!(result.items[0].name.as_deref(), Some("debug"));
        assert!(result.items[0].values.is_empty());
        assert_eq!(result.items[1].name.as_deref(), Some("verbose"));
    }

    #[test]
    fn test_failure_returns_no_items() {
        let registry = registry();
        let result = parse_command_line(["a", "--bogus"], Some(&registry));
        assert!(matches!(result, Err(ParseError::UnrecognizedOption(_))));
    }

    #[test]
    fn test_from_os_args() {
        let registry = registry();
        let args = vec![OsString::from("--level=2")];
        let result = CommandLineParser::from_os_args(args)
            .unwrap()
            .options(&registry)
            .run()
            .unwrap();
        assert_eq!(
            result.items,
            vec![RecognizedItem {
                name: Some("level".to_string()),
                position: None,
                values: vec!["2".to_string()],
                raw_token: "level".to_string(),
                original_tokens: vec!["--level=2".to_string()],
                unregistered: false,
            }]
        );

        let result = parse_os_args(vec![OsString::from("x")], Some(&registry)).unwrap();
        assert_eq!(result.items[0].position, Some(0));
    }
}
