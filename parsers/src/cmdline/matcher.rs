//! Token matcher: classifies raw argv tokens against declared option styles.
//!
//! The matcher walks the argument vector left to right. Each step either
//! recognizes an option occurrence (long, short, sticky bundle, or a token
//! claimed by the extra parser) and consumes the values its [`Style`]
//! permits, or classifies the token as positional. Output order equals input
//! order.

use optstream_core::{CommandLineStyle, ParseError, Result, Style, StyleDescriptor, names_equal};
use tracing::trace;

/// Caller hook consulted for every token before normal matching.
///
/// Returning `Some((name, value))` turns the token into a named item; an
/// empty `value` yields an item without values.
pub type ExtraParser<'a> = dyn Fn(&str) -> Option<(String, String)> + 'a;

/// One classified token (or token group) produced by the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedToken {
    /// A declared option matched by its long or short name.
    Option {
        /// Declared key of the option.
        key: String,
        /// Name as written on the command line.
        written: String,
        /// Values consumed for this occurrence.
        values: Vec<String>,
        /// Raw tokens consumed.
        tokens: Vec<String>,
    },
    /// A long option matched through a wildcard declaration.
    Wildcard {
        /// Name as written on the command line.
        written: String,
        /// Values consumed for this occurrence.
        values: Vec<String>,
        /// Raw tokens consumed.
        tokens: Vec<String>,
    },
    /// Option-looking token accepted without a declaration.
    Unregistered {
        /// Name as written on the command line.
        written: String,
        /// Attached value, if any.
        values: Vec<String>,
        /// Raw tokens consumed.
        tokens: Vec<String>,
    },
    /// Token that is not an option.
    Positional(String),
}

/// Recognition engine over one argument vector.
pub struct TokenMatcher<'a> {
    descriptors: Option<&'a [StyleDescriptor]>,
    style: CommandLineStyle,
    extra_parser: Option<&'a ExtraParser<'a>>,
}

/// Read position within the argument vector.
struct Cursor<'t> {
    args: &'t [String],
    next: usize,
    options_ended: bool,
    /// Remaining characters of a sticky short-option bundle, with the token
    /// they came from.
    pending_short: Option<(char, String, &'t str)>,
}

impl<'t> Cursor<'t> {
    fn peek(&self) -> Option<&'t str> {
        self.args.get(self.next).map(String::as_str)
    }

    fn advance(&mut self) -> Option<&'t str> {
        let token = self.peek()?;
        self.next += 1;
        Some(token)
    }

    /// Consumes the next token as an option value, recording it in `tokens`.
    fn take_value(&mut self, tokens: &mut Vec<String>) -> Option<String> {
        let value = self.advance()?;
        tokens.push(value.to_string());
        Some(value.to_string())
    }
}

impl<'a> TokenMatcher<'a> {
    /// Creates a matcher. With `descriptors = None` every token is
    /// positional.
    pub fn new(descriptors: Option<&'a [StyleDescriptor]>, style: CommandLineStyle) -> Self {
        Self {
            descriptors,
            style,
            extra_parser: None,
        }
    }

    /// Installs the extra parser hook.
    pub fn with_extra_parser(mut self, parser: Option<&'a ExtraParser<'a>>) -> Self {
        self.extra_parser = parser;
        self
    }

    /// Classifies the whole argument vector.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown option, missing or unexpected value, or
    /// ambiguous prefix; no partial output is returned.
    pub fn run(&self, args: &[String]) -> Result<Vec<MatchedToken>> {
        let mut cursor = Cursor {
            args,
            next: 0,
            options_ended: false,
            pending_short: None,
        };
        let mut matched = Vec::with_capacity(args.len());

        loop {
            if let Some((prefix, bundle, origin)) = cursor.pending_short.take() {
                let token = self.match_short(prefix, &bundle, origin, &mut cursor)?;
                trace!(?token, "Matched sticky short option");
                matched.push(token);
                continue;
            }
            let Some(token) = cursor.advance() else {
                break;
            };
            if let Some(item) = self.step(token, &mut cursor)? {
                trace!(?item, "Classified token");
                matched.push(item);
            }
        }

        Ok(matched)
    }

    fn step<'t>(&self, token: &'t str, cursor: &mut Cursor<'t>) -> Result<Option<MatchedToken>> {
        if cursor.options_ended {
            return Ok(Some(MatchedToken::Positional(token.to_string())));
        }

        if let Some(parser) = self.extra_parser {
            if let Some((name, value)) = parser(token) {
                let values = if value.is_empty() { Vec::new() } else { vec![value] };
                return Ok(Some(MatchedToken::Option {
                    key: name.clone(),
                    written: name,
                    values,
                    tokens: vec![token.to_string()],
                }));
            }
        }

        if self.style.end_of_options && token == "--" {
            cursor.options_ended = true;
            return Ok(None);
        }

        let Some(descriptors) = self.descriptors else {
            return Ok(Some(MatchedToken::Positional(token.to_string())));
        };

        if self.style.allow_long && token.len() > 2 {
            if let Some(rest) = token.strip_prefix("--") {
                return self.match_long(descriptors, rest, token, cursor).map(Some);
            }
        }

        if let Some((prefix, body)) = self.short_form(token) {
            return self.match_short(prefix, body, token, cursor).map(Some);
        }

        Ok(Some(MatchedToken::Positional(token.to_string())))
    }

    /// Splits a short-option token into its introducer and body.
    fn short_form<'t>(&self, token: &'t str) -> Option<(char, &'t str)> {
        if !self.style.allow_short || token.starts_with("--") {
            return None;
        }
        let mut chars = token.chars();
        let prefix = chars.next()?;
        let allowed = (prefix == '-' && self.style.allow_dash_for_short)
            || (prefix == '/' && self.style.allow_slash_for_short);
        let body = chars.as_str();
        (allowed && !body.is_empty()).then_some((prefix, body))
    }

    fn looks_like_option(&self, token: &str) -> bool {
        token.len() > 1
            && (token.starts_with('-')
                || (self.style.allow_slash_for_short && token.starts_with('/')))
    }

    fn match_long<'t>(
        &self,
        descriptors: &[StyleDescriptor],
        rest: &str,
        token: &'t str,
        cursor: &mut Cursor<'t>,
    ) -> Result<MatchedToken> {
        let (name, adjacent) = match rest.split_once('=') {
            Some((name, value)) if self.style.long_allow_adjacent => {
                (name, Some(value.to_string()))
            }
            _ => (rest, None),
        };
        let ci = self.style.case_insensitive;
        let display = format!("--{name}");

        let descriptor = match self.find_long(descriptors, name)? {
            Some(descriptor) => descriptor,
            None => {
                if let Some(wildcard) = descriptors.iter().find(|d| {
                    d.wildcard_prefix().is_some_and(|prefix| {
                        name.get(..prefix.len())
                            .is_some_and(|head| names_equal(prefix, head, ci))
                    })
                }) {
                    let mut tokens = vec![token.to_string()];
                    let values = self.collect_values(
                        wildcard.style,
                        adjacent,
                        self.style.long_allow_next,
                        &display,
                        cursor,
                        &mut tokens,
                    )?;
                    return Ok(MatchedToken::Wildcard {
                        written: name.to_string(),
                        values,
                        tokens,
                    });
                }
                return self.unknown(name, &display, adjacent, token);
            }
        };

        let mut tokens = vec![token.to_string()];
        let values = self.collect_values(
            descriptor.style,
            adjacent,
            self.style.long_allow_next,
            &display,
            cursor,
            &mut tokens,
        )?;
        Ok(MatchedToken::Option {
            key: descriptor.key.clone(),
            written: name.to_string(),
            values,
            tokens,
        })
    }

    /// Exact match first, then (when guessing) a unique prefix.
    fn find_long<'d>(
        &self,
        descriptors: &'d [StyleDescriptor],
        name: &str,
    ) -> Result<Option<&'d StyleDescriptor>> {
        let ci = self.style.case_insensitive;
        let concrete = || {
            descriptors
                .iter()
                .filter(|d| !d.long_name.is_empty() && d.wildcard_prefix().is_none())
        };

        if let Some(exact) = concrete().find(|d| names_equal(&d.long_name, name, ci)) {
            return Ok(Some(exact));
        }
        if !self.style.allow_guessing || name.is_empty() {
            return Ok(None);
        }

        let candidates: Vec<&StyleDescriptor> = concrete()
            .filter(|d| {
                d.long_name
                    .get(..name.len())
                    .is_some_and(|head| names_equal(head, name, ci))
            })
            .collect();
        match candidates.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(*only)),
            many => Err(ParseError::AmbiguousOption {
                token: format!("--{name}"),
                candidates: many.iter().map(|d| d.long_name.clone()).collect(),
            }),
        }
    }

    fn match_short<'t>(
        &self,
        prefix: char,
        body: &str,
        origin: &'t str,
        cursor: &mut Cursor<'t>,
    ) -> Result<MatchedToken> {
        let mut chars = body.chars();
        let Some(short) = chars.next() else {
            return Ok(MatchedToken::Positional(origin.to_string()));
        };
        let rest = chars.as_str();
        let display = format!("{prefix}{short}");
        let ci = self.style.case_insensitive;

        let descriptor = self
            .descriptors
            .and_then(|descriptors| descriptors.iter().find(|d| d.matches_short(short, ci)));
        let Some(descriptor) = descriptor else {
            let adjacent = (!rest.is_empty()).then(|| rest.to_string());
            return self.unknown(&short.to_string(), &display, adjacent, origin);
        };

        let mut tokens = vec![origin.to_string()];
        let values = if !descriptor.style.takes_value() {
            if !rest.is_empty() {
                if !self.style.allow_sticky {
                    return Err(ParseError::UnexpectedValue(display));
                }
                cursor.pending_short = Some((prefix, rest.to_string(), origin));
            }
            Vec::new()
        } else {
            let adjacent = if rest.is_empty() {
                None
            } else if self.style.short_allow_adjacent {
                Some(rest.to_string())
            } else {
                return Err(ParseError::UnexpectedValue(display));
            };
            self.collect_values(
                descriptor.style,
                adjacent,
                self.style.short_allow_next,
                &display,
                cursor,
                &mut tokens,
            )?
        };

        Ok(MatchedToken::Option {
            key: descriptor.key.clone(),
            written: short.to_string(),
            values,
            tokens,
        })
    }

    fn unknown(
        &self,
        name: &str,
        display: &str,
        adjacent: Option<String>,
        token: &str,
    ) -> Result<MatchedToken> {
        if !self.style.allow_unregistered {
            return Err(ParseError::UnrecognizedOption(display.to_string()));
        }
        Ok(MatchedToken::Unregistered {
            written: name.to_string(),
            values: adjacent.into_iter().collect(),
            tokens: vec![token.to_string()],
        })
    }

    /// Consumes the values `style` mandates or permits.
    fn collect_values(
        &self,
        style: Style,
        adjacent: Option<String>,
        allow_next: bool,
        display: &str,
        cursor: &mut Cursor<'_>,
        tokens: &mut Vec<String>,
    ) -> Result<Vec<String>> {
        if !style.takes_value() {
            return match adjacent {
                Some(_) => Err(ParseError::UnexpectedValue(display.to_string())),
                None => Ok(Vec::new()),
            };
        }

        let mut values: Vec<String> = adjacent.into_iter().collect();
        if allow_next && style.is_multi() {
            while cursor.peek().is_some_and(|next| !self.looks_like_option(next)) {
                values.extend(cursor.take_value(tokens));
            }
        } else if allow_next && values.is_empty() {
            // A required single value is taken even when it looks like an option.
            let next_is_value = style.requires_value()
                || cursor.peek().is_some_and(|next| !self.looks_like_option(next));
            if next_is_value {
                values.extend(cursor.take_value(tokens));
            }
        }

        if style.requires_value() && values.is_empty() {
            return Err(ParseError::MissingOptionValue(display.to_string()));
        }
        Ok(values)
    }
}
