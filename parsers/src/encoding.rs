//! Narrow/wide encoding bridge.
//!
//! Wide-character input (UTF-16 code units) is converted to the canonical
//! narrow encoding (UTF-8), parsed by the narrow pipeline unchanged, and the
//! string payloads of the result are converted back. Option names and
//! positions pass through untouched.

use std::char::{DecodeUtf16, DecodeUtf16Error};
use std::ffi::OsString;
use std::io::{self, Read};

use optstream_core::{
    CommandLineStyle, OptionRegistry, ParseError, ParseResult, PositionalDescription, Result,
};

use crate::cmdline::CommandLineParser;

/// A wide-character string: UTF-16 code units.
pub type WideString = Vec<u16>;

/// Result of a wide parse: the wide items plus the narrow result they were
/// converted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideParseResult<'r> {
    /// Items with UTF-16 payloads.
    pub wide: ParseResult<'r, WideString>,
    /// The same items as produced by the narrow pipeline.
    pub utf8_encoded: ParseResult<'r>,
}

impl<'r> WideParseResult<'r> {
    /// Converts a narrow result, keeping it alongside the wide copy.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EncodingError`] if any payload does not survive
    /// the round trip.
    pub fn from_narrow(narrow: ParseResult<'r>) -> Result<Self> {
        let wide = narrow.try_map_strings(|s| to_wide(s))?;
        Ok(Self {
            wide,
            utf8_encoded: narrow,
        })
    }
}

/// Converts one wide string to UTF-8.
///
/// # Errors
///
/// Returns [`ParseError::EncodingError`] on unpaired surrogates.
///
/// # Examples
///
/// ```
/// use optstream_parsers::encoding::{to_narrow, to_wide};
///
/// let wide = to_wide("naïve").unwrap();
/// assert_eq!(to_narrow(&wide).unwrap(), "naïve");
/// assert!(to_narrow(&[0xD800]).is_err());
/// ```
pub fn to_narrow(wide: &[u16]) -> Result<String> {
    String::from_utf16(wide).map_err(|err| {
        ParseError::EncodingError(format!("{err} in {} code unit(s)", wide.len()))
    })
}

/// Converts one UTF-8 string to wide characters, verifying the round trip.
///
/// # Errors
///
/// Returns [`ParseError::EncodingError`] if decoding the produced code units
/// does not give back `narrow`.
pub fn to_wide(narrow: &str) -> Result<WideString> {
    let wide: WideString = narrow.encode_utf16().collect();
    match String::from_utf16(&wide) {
        Ok(back) if back == narrow => Ok(wide),
        _ => Err(ParseError::EncodingError(format!(
            "'{narrow}' is not round-trip stable"
        ))),
    }
}

/// Converts a wide argument vector to UTF-8.
///
/// # Errors
///
/// Fails on the first argument that is not valid UTF-16.
pub fn narrow_args<W: AsRef<[u16]>>(args: &[W]) -> Result<Vec<String>> {
    args.iter().map(|arg| to_narrow(arg.as_ref())).collect()
}

/// Converts OS-encoded arguments to UTF-8.
///
/// # Errors
///
/// Fails on the first argument that is not valid Unicode.
pub fn narrow_os_args<I>(args: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|raw| {
                ParseError::EncodingError(format!("argument {raw:?} is not valid Unicode"))
            })
        })
        .collect()
}

/// Streams UTF-16 code units as UTF-8 bytes.
///
/// Wrap it in a [`BufReader`](std::io::BufReader) to feed wide text to any
/// line-oriented reader. An unpaired surrogate surfaces as an
/// [`io::ErrorKind::InvalidData`] error once the bytes decoded before it have
/// been handed out.
pub struct WideReader<I: Iterator<Item = u16>> {
    units: DecodeUtf16<I>,
    pending: [u8; 4],
    start: usize,
    end: usize,
    error: Option<DecodeUtf16Error>,
}

impl<I: Iterator<Item = u16>> WideReader<I> {
    /// Creates a reader over `units`.
    pub fn new<T>(units: T) -> Self
    where
        T: IntoIterator<Item = u16, IntoIter = I>,
    {
        Self {
            units: char::decode_utf16(units),
            pending: [0; 4],
            start: 0,
            end: 0,
            error: None,
        }
    }
}

impl<I: Iterator<Item = u16>> Read for WideReader<I> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(err) = self.error.take() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, err));
        }

        let mut written = 0;
        while written < buf.len() {
            if self.start == self.end {
                match self.units.next() {
                    None => break,
                    Some(Ok(ch)) => {
                        self.start = 0;
                        self.end = ch.encode_utf8(&mut self.pending).len();
                    }
                    Some(Err(err)) if written == 0 => {
                        return Err(io::Error::new(io::ErrorKind::InvalidData, err));
                    }
                    Some(Err(err)) => {
                        self.error = Some(err);
                        break;
                    }
                }
            }
            let n = (self.end - self.start).min(buf.len() - written);
            let chunk = &self.pending[self.start..self.start + n];
            buf[written..written + n].copy_from_slice(chunk);
            self.start += n;
            written += n;
        }
        Ok(written)
    }
}

/// Command-line parser over wide-character arguments.
///
/// Delegates to [`CommandLineParser`]; only the encoding differs.
///
/// # Examples
///
/// ```
/// use optstream_core::{OptionDescription, OptionRegistry};
/// use optstream_parsers::encoding::{WideCommandLineParser, to_wide};
///
/// let registry = OptionRegistry::new().with(OptionDescription::value("name"));
/// let args = vec![to_wide("--name").unwrap(), to_wide("Zoë").unwrap()];
///
/// let result = WideCommandLineParser::new(&args)
///     .unwrap()
///     .options(&registry)
///     .run()
///     .unwrap();
/// assert_eq!(result.wide.items[0].values[0], to_wide("Zoë").unwrap());
/// ```
pub struct WideCommandLineParser<'r> {
    inner: CommandLineParser<'r>,
}

impl<'r> WideCommandLineParser<'r> {
    /// Converts `args` to UTF-8 and prepares the narrow parser.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EncodingError`] if an argument is not valid
    /// UTF-16.
    pub fn new<W: AsRef<[u16]>>(args: &[W]) -> Result<Self> {
        Ok(Self {
            inner: CommandLineParser::new(narrow_args(args)?),
        })
    }

    /// See [`CommandLineParser::options`].
    pub fn options(mut self, registry: &'r OptionRegistry) -> Self {
        self.inner = self.inner.options(registry);
        self
    }

    /// See [`CommandLineParser::positional`].
    pub fn positional(mut self, positional: &'r PositionalDescription) -> Self {
        self.inner = self.inner.positional(positional);
        self
    }

    /// See [`CommandLineParser::style`].
    pub fn style(mut self, style: CommandLineStyle) -> Self {
        self.inner = self.inner.style(style);
        self
    }

    /// See [`CommandLineParser::extra_parser`]. The hook sees UTF-8 tokens.
    pub fn extra_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> Option<(String, String)> + 'r,
    {
        self.inner = self.inner.extra_parser(parser);
        self
    }

    /// Runs the narrow pipeline and converts its result back.
    ///
    /// # Errors
    ///
    /// Propagates parse failures and round-trip encoding failures.
    pub fn run(&self) -> Result<WideParseResult<'r>> {
        WideParseResult::from_narrow(self.inner.run()?)
    }
}

#[cfg(test)]
mod tests {
    use optstream_core::OptionDescription;

    use super::*;

    fn wide(s: &str) -> WideString {
        s.encode_utf16().collect()
    }

    #[test]
    fn test_wide_matches_narrow_parse() {
        let registry = OptionRegistry::new()
            .with(OptionDescription::flag("verbose,v"))
            .with(OptionDescription::value("title"));
        let raw = ["-v", "--title=日本語 🎉", "ファイル.txt"];

        let narrow = CommandLineParser::new(raw).options(&registry).run().unwrap();
        let wide_args: Vec<WideString> = raw.iter().map(|s| wide(s)).collect();
        let result = WideCommandLineParser::new(&wide_args)
            .unwrap()
            .options(&registry)
            .run()
            .unwrap();

        assert_eq!(result.utf8_encoded, narrow);
        for (w, n) in result.wide.items.iter().zip(&narrow.items) {
            assert_eq!(w.name, n.name);
            assert_eq!(w.position, n.position);
            let values: Vec<String> = w.values.iter().map(|v| to_narrow(v).unwrap()).collect();
            assert_eq!(values, n.values);
            assert_eq!(to_narrow(&w.raw_token).unwrap(), n.raw_token);
        }
        assert!(std::ptr::eq(result.wide.registry().unwrap(), &registry));
    }

    #[test]
    fn test_unpaired_surrogate_rejected() {
        let args = vec![wide("--ok"), vec![0x0041, 0xDC00]];
        let err = WideCommandLineParser::new(&args).err().unwrap();
        assert!(matches!(err, ParseError::EncodingError(_)));
    }

    #[test]
    fn test_parse_failure_propagates() {
        let registry = OptionRegistry::new().with(OptionDescription::value("title"));
        let args = vec![wide("--title")];
        let err = WideCommandLineParser::new(&args)
            .unwrap()
            .options(&registry)
            .run()
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingOptionValue(_)));
    }

    #[test]
    fn test_wide_reader_splits_multibyte_chars_across_reads() {
        let mut reader = WideReader::new(wide("a€🎉"));
        let mut out = Vec::new();
        let mut chunk = [0u8; 3];
        loop {
            let n = reader.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        assert_eq!(String::from_utf8(out).unwrap(), "a€🎉");
    }

    #[test]
    fn test_wide_reader_reports_surrogate_after_good_bytes() {
        let mut units = wide("ok");
        units.push(0xD800);
        let mut reader = WideReader::new(units);
        let mut buf = [0u8; 16];

        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_os_arg_rejected() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![OsString::from("ok"), OsString::from_vec(vec![0x66, 0xFF])];
        let err = narrow_os_args(args).unwrap_err();
        assert!(matches!(err, ParseError::EncodingError(_)));
    }
}
