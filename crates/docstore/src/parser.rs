//! Input text parsing
//!
//! Query, record and update arguments may arrive as JSON text written with
//! either quote style:
//! ```text
//! {'name': 'alice'}
//! {"name": "alice"}
//! ```
//!
//! Update operator keys carry a marker prefix that is stripped before the
//! command is matched:
//! ```text
//! $set   -> set
//! $push  -> push
//! set    -> set
//! ```

use nom::{
    bytes::complete::take_till,
    character::complete::char,
    combinator::rest,
    multi::many0,
    sequence::{preceded, terminated},
    IResult,
};
use serde_json::Value;

use crate::error::{Error, Result};

/// Prefix marking an update operator key
pub const OPERATOR_MARKER: char = '$';

/// Rewrite single quotes as double quotes. Applied to the whole text,
/// including quotes inside string values.
pub fn normalize_quotes(text: &str) -> String {
    text.replace('\'', "\"")
}

/// Parse JSON text after quote normalization
pub fn parse_json_text(text: &str) -> Result<Value> {
    serde_json::from_str(&normalize_quotes(text))
        .map_err(|e| Error::MalformedInput(format!("{} in {:?}", e, text)))
}

/// Parse an operator key, returning the command name after the last marker
pub fn operator_name(input: &str) -> IResult<&str, &str> {
    preceded(
        many0(terminated(
            take_till(|c| c == OPERATOR_MARKER),
            char(OPERATOR_MARKER),
        )),
        rest,
    )(input)
}

/// Strip the operator marker prefix from an update key
///
/// `operator_name` always succeeds: the marker loop stops at the first miss
/// and the rest of the key is the name.
pub fn strip_operator(key: &str) -> &str {
    operator_name(key).map_or(key, |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_quotes() {
        assert_eq!(normalize_quotes("{'a': 'b'}"), r#"{"a": "b"}"#);
        assert_eq!(normalize_quotes(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn test_parse_single_quoted() {
        let value = parse_json_text("{'name': 'alice', 'age': 3}").unwrap();
        assert_eq!(value, json!({"name": "alice", "age": 3}));
    }

    #[test]
    fn test_parse_malformed() {
        let result = parse_json_text("{name: alice");
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(matches!(parse_json_text(""), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_apostrophe_in_value_breaks_parse() {
        // every single quote is rewritten, including this one
        let result = parse_json_text(r#"{"name": "o'neil"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_strip_operator() {
        assert_eq!(strip_operator("$set"), "set");
        assert_eq!(strip_operator("$push"), "push");
        assert_eq!(strip_operator("set"), "set");
        assert_eq!(strip_operator("$$set"), "set");
        assert_eq!(strip_operator("a$b$inc"), "inc");
        assert_eq!(strip_operator(""), "");
        assert_eq!(strip_operator("set$"), "");
    }

    #[test]
    fn test_operator_name_consumes_all() {
        let (remaining, name) = operator_name("$unset").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(name, "unset");
    }
}
