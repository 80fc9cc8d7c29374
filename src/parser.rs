use crate::value::{json_to_value, Value};

/// The guard prefix some JSON-emitting HTTP APIs prepend to responses to
/// defeat cross-site script inclusion. Stripped before parsing.
pub const XSSI_PREFIX: &str = ")]}',";

/// Error raised for malformed JSON input.
#[derive(Debug)]
pub enum ParseError {
    /// The underlying JSON parser rejected the input
    Syntax(serde_json::Error),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Syntax(e) => write!(f, "Invalid JSON: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Syntax(e) => Some(e),
        }
    }
}

/// Parse one input unit into a document value.
///
/// Returns `Ok(None)` when the text does not look like a document at all
/// (no `{` anywhere, which covers empty input). Downstream stages treat
/// "no value" as a pass-through, so noise on stdin renders the absent-value
/// marker instead of failing the run.
///
/// # Examples
///
/// ```
/// use jove::parser::parse;
///
/// let doc = parse(r#"{"a": 1}"#).unwrap();
/// assert!(doc.is_some());
///
/// // An XSSI guard prefix is stripped before parsing
/// let guarded = parse(")]}',{\"a\": 1}").unwrap();
/// assert_eq!(guarded, doc);
///
/// assert!(parse("").unwrap().is_none());
/// ```
pub fn parse(text: &str) -> Result<Option<Value>, ParseError> {
    if !text.contains('{') {
        return Ok(None);
    }

    let json = text.strip_prefix(XSSI_PREFIX).unwrap_or(text);
    let value: serde_json::Value = serde_json::from_str(json).map_err(ParseError::Syntax)?;
    Ok(Some(json_to_value(value)))
}

#[test]
fn test_strips_xssi_prefix() {
    let plain = parse(r#"{"a": 1}"#).unwrap();
    let guarded = parse(")]}',{\"a\": 1}").unwrap();
    assert_eq!(plain, guarded);
}

#[test]
fn test_non_document_is_absent() {
    assert!(parse("hello world").unwrap().is_none());
    assert!(parse("").unwrap().is_none());
}

#[test]
fn test_malformed_json_is_an_error() {
    assert!(parse(r#"{"a": }"#).is_err());
}
