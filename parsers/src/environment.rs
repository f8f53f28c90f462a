//! Environment-variable adapter.
//!
//! Every entry of an explicit environment snapshot is passed through a
//! name-mapping function; entries mapping to a non-empty name become named
//! items. Empty names are the filtering mechanism, not an error. Repeated
//! names are kept as separate items.

use optstream_core::{OptionRegistry, ParseResult, RecognizedItem};
use tracing::{debug, trace};

/// Captured environment key/value pairs, in capture order.
///
/// # Examples
///
/// ```
/// use optstream_parsers::EnvironmentSnapshot;
///
/// let env: EnvironmentSnapshot = [("APP_HOST", "x"), ("OTHER", "y")].into_iter().collect();
/// assert_eq!(env.len(), 2);
/// assert_eq!(env.get("APP_HOST"), Some("x"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    vars: Vec<(String, String)>,
}

impl EnvironmentSnapshot {
    /// Captures the current process environment.
    ///
    /// Entries whose key or value is not valid Unicode are skipped.
    pub fn from_process() -> Self {
        let mut skipped = 0usize;
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                _ => {
                    skipped += 1;
                    None
                }
            })
            .collect();
        if skipped > 0 {
            debug!(skipped, "Skipped non-Unicode environment entries");
        }
        Self { vars }
    }

    /// Number of captured entries.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvironmentSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Builds the conventional mapper: keep keys starting with `prefix`, strip
/// it, fold ASCII letters of the rest to lowercase.
///
/// # Examples
///
/// ```
/// use optstream_parsers::prefix_name_mapper;
///
/// let mapper = prefix_name_mapper("APP_");
/// assert_eq!(mapper("APP_LOG_LEVEL"), "log_level");
/// assert_eq!(mapper("PATH"), "");
/// ```
pub fn prefix_name_mapper(prefix: &str) -> impl Fn(&str) -> String + '_ {
    move |key: &str| {
        key.strip_prefix(prefix)
            .map(str::to_ascii_lowercase)
            .unwrap_or_default()
    }
}

/// Maps every snapshot entry through `mapper`, emitting one item per
/// non-empty mapped name.
///
/// The registry is only attached as the result's back-reference; names are
/// not checked against it.
pub fn parse_environment<'r, F>(
    registry: &'r OptionRegistry,
    env: &EnvironmentSnapshot,
    mapper: F,
) -> ParseResult<'r>
where
    F: Fn(&str) -> String,
{
    let mut result = ParseResult::new(Some(registry));
    for (key, value) in env.iter() {
        let name = mapper(key);
        if name.is_empty() {
            continue;
        }
        trace!(key, name = %name, "Mapped environment entry");
        result.items.push(RecognizedItem {
            name: Some(name),
            position: None,
            values: vec![value.to_string()],
            raw_token: key.to_string(),
            original_tokens: vec![format!("{key}={value}")],
            unregistered: false,
        });
    }
    debug!(
        entries = env.len(),
        items = result.len(),
        "Parsed environment"
    );
    result
}

/// [`parse_environment`] with [`prefix_name_mapper`].
pub fn parse_environment_with_prefix<'r>(
    registry: &'r OptionRegistry,
    env: &EnvironmentSnapshot,
    prefix: &str,
) -> ParseResult<'r> {
    parse_environment(registry, env, prefix_name_mapper(prefix))
}
