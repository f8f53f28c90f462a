//! Positional assignment over matcher output.

use optstream_core::{ParseError, RecognizedItem, Result};

use super::matcher::MatchedToken;

/// Converts matcher output into recognized items, numbering positional
/// tokens in occurrence order.
///
/// The limit is checked before the counter advances, so exactly
/// `max_positional` positional tokens succeed and one more fails.
///
/// # Errors
///
/// Returns [`ParseError::TooManyPositionalArguments`] when the number of
/// positional tokens exceeds `max_positional`.
pub fn assign_positions(
    tokens: Vec<MatchedToken>,
    max_positional: Option<usize>,
) -> Result<Vec<RecognizedItem>> {
    let mut position = 0usize;
    let mut items = Vec::with_capacity(tokens.len());

    for token in tokens {
        let item = match token {
            MatchedToken::Positional(value) => {
                if let Some(max) = max_positional {
                    if position >= max {
                        return Err(ParseError::TooManyPositionalArguments { max });
                    }
                }
                let mut item = RecognizedItem::positional(value);
                item.position = Some(position);
                position += 1;
                item
            }
            MatchedToken::Option {
                key,
                written,
                values,
                tokens,
            } => RecognizedItem {
                name: Some(key),
                position: None,
                values,
                raw_token: written,
                original_tokens: tokens,
                unregistered: false,
            },
            MatchedToken::Wildcard {
                written,
                values,
                tokens,
            } => RecognizedItem {
                name: None,
                position: None,
                values,
                raw_token: written,
                original_tokens: tokens,
                unregistered: false,
            },
            MatchedToken::Unregistered {
                written,
                values,
                tokens,
            } => RecognizedItem {
                name: Some(written.clone()),
                position: None,
                values,
                raw_token: written,
                original_tokens: tokens,
                unregistered: true,
            },
        };
        items.push(item);
    }

    Ok(items)
}
