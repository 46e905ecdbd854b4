//! Parameter values and their SQL literal forms.

use std::borrow::Cow;

use unicode_general_category::{GeneralCategory, get_general_category};

use crate::error::{InlineError, InlineResult};

/// A value bound to a positional placeholder.
///
/// The set of kinds is closed: anything without a literal rule is carried as
/// [`ParamValue::Unsupported`] and rejected when formatted.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// UTF-8 text, rendered as a quoted string literal.
    Text(String),
    /// Text bytes that may contain invalid UTF-8; undecodable bytes are dropped.
    RawText(Vec<u8>),
    Int(i64),
    UInt(u64),
    /// Rendered with 64-bit precision.
    Float(f64),
    Bool(bool),
    /// A value of a type with no literal rule.
    Unsupported { type_name: String },
}

impl ParamValue {
    /// Text from bytes that are not guaranteed to be valid UTF-8.
    pub fn raw_text(bytes: impl Into<Vec<u8>>) -> Self {
        Self::RawText(bytes.into())
    }

    /// Placeholder for a value of type `T`, which has no literal rule.
    pub fn unsupported<T: ?Sized>() -> Self {
        Self::Unsupported {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }

    /// Short name of the value's kind.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Text(_) => "text",
            Self::RawText(_) => "raw text",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Unsupported { type_name } => type_name.as_str(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<Cow<'_, str>> for ParamValue {
    fn from(v: Cow<'_, str>) -> Self {
        Self::Text(v.into_owned())
    }
}

impl From<char> for ParamValue {
    fn from(v: char) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

macro_rules! impl_from_int {
    ($variant:ident($target:ty): $($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(v: $t) -> Self {
                    Self::$variant(v as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int(i64): i8, i16, i32, i64, isize);
impl_from_int!(UInt(u64): u8, u16, u32, u64, usize);

/// Build a `Vec<ParamValue>` from values convertible with `ParamValue::from`.
///
/// ```
/// use pginline::{ParamValue, params};
///
/// let values = params!["O'Brien", 42, true];
/// assert_eq!(values[1], ParamValue::Int(42));
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::ParamValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::ParamValue::from($value)),+]
    };
}

/// Render a value as a SQL literal token.
///
/// # Example
/// ```
/// use pginline::{ParamValue, format_literal};
///
/// assert_eq!(format_literal(&"O'Brien".into()).unwrap(), "'O''Brien'");
/// assert_eq!(format_literal(&ParamValue::Int(-7)).unwrap(), "-7");
/// assert_eq!(format_literal(&ParamValue::Float(0.5)).unwrap(), "0.5");
/// assert_eq!(format_literal(&ParamValue::Bool(true)).unwrap(), "true");
/// ```
pub fn format_literal(value: &ParamValue) -> InlineResult<String> {
    match value {
        ParamValue::Text(s) => Ok(quote_text(s)),
        ParamValue::RawText(bytes) => Ok(quote_raw_text(bytes)),
        ParamValue::Int(n) => Ok(n.to_string()),
        ParamValue::UInt(n) => Ok(n.to_string()),
        ParamValue::Float(f) => format_float(*f),
        ParamValue::Bool(b) => Ok(b.to_string()),
        ParamValue::Unsupported { type_name } => {
            #[cfg(feature = "tracing")]
            tracing::warn!(target: "pginline.sql", value = ?value, "unsupported parameter value");
            Err(InlineError::unsupported(type_name.as_str()))
        }
    }
}

// `Display` for f64 is the shortest representation that round-trips, and never
// uses exponent notation.
fn format_float(f: f64) -> InlineResult<String> {
    if !f.is_finite() {
        return Err(InlineError::format(format!(
            "non-finite float {f} has no SQL literal"
        )));
    }
    Ok(f.to_string())
}

/// Quote `s` as a single-quoted string literal, doubling embedded quotes and
/// dropping characters that are not printable.
pub fn quote_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 2 + 2);
    out.push('\'');
    push_escaped(&mut out, s);
    out.push('\'');
    out
}

fn quote_raw_text(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + bytes.len() / 2 + 2);
    out.push('\'');
    for chunk in bytes.utf8_chunks() {
        push_escaped(&mut out, chunk.valid());
    }
    out.push('\'');
    out
}

fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        if c == '\'' {
            out.push_str("''");
        } else if is_printable(c) {
            out.push(c);
        }
    }
}

/// Letters, marks, numbers, punctuation, symbols and the ASCII space.
///
/// Control characters, every other kind of whitespace or line/paragraph
/// separator, invisible format characters, private-use, surrogate and
/// unassigned code points are not printable.
pub fn is_printable(c: char) -> bool {
    c == ' '
        || !matches!(
            get_general_category(c),
            GeneralCategory::Control
                | GeneralCategory::Format
                | GeneralCategory::Surrogate
                | GeneralCategory::PrivateUse
                | GeneralCategory::Unassigned
                | GeneralCategory::SpaceSeparator
                | GeneralCategory::LineSeparator
                | GeneralCategory::ParagraphSeparator
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: impl Into<ParamValue>) -> String {
        format_literal(&v.into()).unwrap()
    }

    #[test]
    fn test_text_literals() {
        assert_eq!(lit("abc"), "'abc'");
        assert_eq!(lit(""), "''");
        assert_eq!(lit("O'Brien"), "'O''Brien'");
        assert_eq!(lit("''"), "''''''");
        assert_eq!(lit("héllo wörld ✓"), "'héllo wörld ✓'");
        assert_eq!(lit('x'), "'x'");
    }

    #[test]
    fn test_text_injection_attempts_stay_inside_literal() {
        assert_eq!(
            lit("x'; DROP TABLE users; --"),
            "'x''; DROP TABLE users; --'"
        );
        // Backslash is an ordinary char in a standard string literal.
        assert_eq!(lit("a\\'b"), "'a\\''b'");
    }

    #[test]
    fn test_text_drops_unprintable() {
        assert_eq!(lit("a\nb\tc\0d"), "'abcd'");
        assert_eq!(lit("a\u{200B}b\u{00A0}c"), "'abc'");
        assert_eq!(lit("\u{E000}x\u{2028}"), "'x'");
        // Unassigned code points are dropped too.
        assert_eq!(lit("a\u{0378}b\u{E0080}"), "'ab'");
    }

    #[test]
    fn test_raw_text_drops_invalid_utf8() {
        let v = ParamValue::raw_text(b"ab\xFFc\xC3'd".to_vec());
        assert_eq!(format_literal(&v).unwrap(), "'abc''d'");

        let v = ParamValue::raw_text("ok ✓".as_bytes());
        assert_eq!(format_literal(&v).unwrap(), "'ok ✓'");
    }

    #[test]
    fn test_integer_literals() {
        assert_eq!(lit(0i32), "0");
        assert_eq!(lit(42i8), "42");
        assert_eq!(lit(-42i16), "-42");
        assert_eq!(lit(i64::MIN), "-9223372036854775808");
        assert_eq!(lit(7u8), "7");
        assert_eq!(lit(u64::MAX), "18446744073709551615");
        assert_eq!(lit(12usize), "12");
        assert_eq!(lit(-12isize), "-12");
    }

    #[test]
    fn test_float_literals() {
        assert_eq!(lit(1.0f64), "1");
        assert_eq!(lit(1.5f64), "1.5");
        assert_eq!(lit(-0.25f64), "-0.25");
        assert_eq!(lit(0.1f64), "0.1");
        assert_eq!(lit(1e21f64), "1000000000000000000000");
        assert_eq!(lit(1e-7f64), "0.0000001");
        // f32 is widened, so its binary value shows through.
        assert_eq!(lit(0.1f32), "0.10000000149011612");
    }

    #[test]
    fn test_non_finite_float_is_format_error() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = format_literal(&ParamValue::Float(f)).unwrap_err();
            assert!(matches!(err, InlineError::Format(_)));
        }
    }

    #[test]
    fn test_bool_literals() {
        assert_eq!(lit(true), "true");
        assert_eq!(lit(false), "false");
    }

    #[test]
    fn test_unsupported_type() {
        let err = format_literal(&ParamValue::unsupported::<Vec<u8>>()).unwrap_err();
        assert!(err.is_unsupported_type());
        assert!(err.to_string().contains("Vec<u8>"));
    }

    #[test]
    fn test_params_macro() {
        let values = params!["a", 1, 2u8, 1.5, false];
        assert_eq!(
            values,
            vec![
                ParamValue::Text("a".to_string()),
                ParamValue::Int(1),
                ParamValue::UInt(2),
                ParamValue::Float(1.5),
                ParamValue::Bool(false),
            ]
        );
        assert!(params![].is_empty());
    }

    #[test]
    fn test_type_name() {
        assert_eq!(ParamValue::from(3u16).type_name(), "uint");
        assert_eq!(
            ParamValue::Unsupported {
                type_name: "Option<i32>".to_string()
            }
            .type_name(),
            "Option<i32>"
        );
    }
}
