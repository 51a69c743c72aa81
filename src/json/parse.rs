//! Purpose: Turn response bytes into the dynamic document tree.
//! Exports: `from_slice`, `parse_document`, `ParseFailureCategory`, `categorize_error`,
//!   `categorize_message`, `hint_for_error`, `MAX_NESTING_DEPTH`.
//! Role: Parser boundary that centralizes simd-json usage details.
//! Invariants: Input buffers are copied once to satisfy simd-json's mutable-slice API.
//! Invariants: Failures map to `ErrorKind::Parse` with a stable category label in the hint.
//! Invariants: Nesting deeper than `MAX_NESTING_DEPTH` is rejected before simd-json sees it;
//!   simd-json recurses without a limit.
//! Notes: simd-json refuses integers above `u64::MAX`; those inputs are re-read with serde_json,
//!   which yields an `f64`, so both parsers accept the same numbers.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::error::{Error, ErrorKind};

/// Deepest array/object nesting accepted, matching serde_json's recursion limit.
pub const MAX_NESTING_DEPTH: usize = 128;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseFailureCategory {
    Syntax,
    Utf8,
    NumericRange,
    DepthLimit,
    Unknown,
}

impl ParseFailureCategory {
    pub fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Utf8 => "utf8",
            ParseFailureCategory::NumericRange => "numeric-range",
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::Unknown => "unknown",
        }
    }
}

pub fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T, simd_json::Error> {
    check_nesting(input)?;
    let mut bytes = input.to_vec();
    simd_json::serde::from_slice(&mut bytes).or_else(|err| {
        if categorize_error(&err) == ParseFailureCategory::NumericRange {
            serde_json::from_slice(input).map_err(|_| err)
        } else {
            Err(err)
        }
    })
}

/// Bracket scan that skips string contents; unbalanced input is left for the parser.
fn check_nesting(input: &[u8]) -> Result<(), simd_json::Error> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for &byte in input {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    return Err(simd_json::Error::generic(simd_json::ErrorType::Serde(
                        format!("recursion limit exceeded: nesting deeper than {MAX_NESTING_DEPTH}"),
                    )));
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

pub fn parse_document(input: &[u8], context: &str) -> Result<Value, Error> {
    from_slice::<Value>(input).map_err(|err| {
        let hint = hint_for_error(&err, context);
        Error::new(ErrorKind::Parse)
            .with_message("payload is not valid JSON")
            .with_hint(hint)
            .with_source(err)
    })
}

pub fn categorize_error(err: &simd_json::Error) -> ParseFailureCategory {
    categorize_message(&err.to_string())
}

pub fn categorize_message(message: &str) -> ParseFailureCategory {
    let message = message.to_ascii_lowercase();
    if message.contains("utf8") || message.contains("utf-8") {
        ParseFailureCategory::Utf8
    } else if message.contains("recursion") || message.contains("depth") {
        ParseFailureCategory::DepthLimit
    } else if message.contains("number")
        || message.contains("overflow")
        || message.contains("exponent")
    {
        ParseFailureCategory::NumericRange
    } else if message.contains("syntax")
        || message.contains("expected")
        || message.contains("eof")
        || message.contains("unexpected")
        || message.contains("trailing")
        || message.contains("early")
        || message.contains("character")
    {
        ParseFailureCategory::Syntax
    } else {
        ParseFailureCategory::Unknown
    }
}

pub fn hint_for_error(err: &simd_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; context: {context}",
        categorize_error(err).label()
    )
}

#[cfg(test)]
mod tests {
    use super::{MAX_NESTING_DEPTH, ParseFailureCategory, categorize_message, parse_document};
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn parses_nested_documents() {
        let value = parse_document(br#"{"a":{"edges":[{"cursor":"c"}]}}"#, "test").expect("json");
        assert_eq!(value, json!({"a": {"edges": [{"cursor": "c"}]}}));
    }

    #[test]
    fn invalid_json_is_a_parse_error_with_context() {
        let err = parse_document(br#"{"a":}"#, "test.context").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        let hint = err.hint().expect("hint");
        assert!(hint.starts_with("parse category: "));
        assert!(hint.ends_with("context: test.context"));
    }

    fn nested_arrays(depth: usize) -> Vec<u8> {
        let mut payload = vec![b'['; depth];
        payload.push(b'0');
        payload.extend(std::iter::repeat_n(b']', depth));
        payload
    }

    #[test]
    fn very_deep_nesting_is_a_depth_limit_error() {
        let err = parse_document(&nested_arrays(200_000), "deep").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(
            err.hint().expect("hint").starts_with("parse category: depth-limit"),
            "hint {:?}",
            err.hint()
        );
    }

    #[test]
    fn nesting_at_the_limit_parses() {
        parse_document(&nested_arrays(MAX_NESTING_DEPTH), "limit").expect("at limit");
        parse_document(&nested_arrays(MAX_NESTING_DEPTH + 1), "limit").unwrap_err();
    }

    #[test]
    fn brackets_inside_strings_do_not_count() {
        let mut payload = br#"{"alt":""#.to_vec();
        payload.extend(std::iter::repeat_n(b'[', 4096));
        payload.extend_from_slice(br#"\" ["}"#);
        let value = parse_document(&payload, "strings").expect("json");
        let alt = value["alt"].as_str().expect("alt");
        assert_eq!(alt.len(), 4096 + 3);
    }

    #[test]
    fn integers_above_u64_parse_as_floats() {
        let value = parse_document(br#"{"duration":18446744073709551616}"#, "big").expect("json");
        assert_eq!(value["duration"].as_f64(), Some(18446744073709551616.0));
    }

    #[test]
    fn message_categories_are_stable() {
        let cases = [
            ("InvalidUtf8 at character 0", ParseFailureCategory::Utf8),
            ("recursion limit exceeded while parsing", ParseFailureCategory::DepthLimit),
            ("InvalidNumber at character 5", ParseFailureCategory::NumericRange),
            ("Syntax at character 5 ('}')", ParseFailureCategory::Syntax),
            ("EOF while parsing", ParseFailureCategory::Syntax),
            ("opaque parser issue", ParseFailureCategory::Unknown),
        ];
        for (message, category) in cases {
            assert_eq!(categorize_message(message), category, "message {message:?}");
        }
    }
}
