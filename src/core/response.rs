use crate::domain::model::ParsedRecord;
use crate::utils::error::{InvoiceError, Result};
use serde_json::Value;

/// Parses the captured stdout of one lncli invocation.
pub fn parse(raw: &str) -> Result<ParsedRecord> {
    let lines: Vec<&str> = raw.lines().collect();
    parse_lines(&lines)
}

/// Parses lncli output that has already been split into lines.
///
/// A single line is decoded as JSON directly. Multi-line output is joined and
/// trimmed; if that is not valid JSON, the single quotes some lncli builds
/// print around keys and strings are replaced with double quotes and the
/// text is decoded again.
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<ParsedRecord> {
    match lines {
        [] => Err(InvoiceError::EmptyResponse),
        [line] => {
            tracing::debug!("decoding single-line response");
            decode(line.as_ref())
        }
        _ => {
            let joined = lines
                .iter()
                .map(|line| line.as_ref())
                .collect::<Vec<&str>>()
                .join("\n");
            let joined = joined.trim();

            match decode(joined) {
                Ok(record) => Ok(record),
                Err(_) => {
                    tracing::warn!(
                        lines = lines.len(),
                        "multi-line response is not strict JSON, retrying with quote repair"
                    );
                    decode(&joined.replace('\'', "\""))
                }
            }
        }
    }
}

fn decode(text: &str) -> Result<ParsedRecord> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(InvoiceError::MalformedResponse {
            message: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
        Err(e) => Err(InvoiceError::MalformedResponse {
            message: e.to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_line_json() {
        let record = parse_lines(&["{\"state\": \"OPEN\"}"]).unwrap();
        assert_eq!(record.get("state"), Some(&json!("OPEN")));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_multi_line_single_quoted() {
        let record = parse_lines(&["{'state':", "'OPEN'}"]).unwrap();
        assert_eq!(record.get("state"), Some(&json!("OPEN")));
    }

    #[test]
    fn test_multi_line_pretty_printed_json() {
        let raw = "{\n    \"r_hash\": \"ab12\",\n    \"add_index\": \"3\"\n}\n";
        let record = parse(raw).unwrap();
        assert_eq!(record.get("r_hash"), Some(&json!("ab12")));
        assert_eq!(record.get("add_index"), Some(&json!("3")));
    }

    #[test]
    fn test_apostrophe_in_strict_json_is_preserved() {
        let lines = ["{", "    \"memo\": \"it's paid\"", "}"];
        let record = parse_lines(&lines).unwrap();
        assert_eq!(record.get("memo"), Some(&json!("it's paid")));
    }

    #[test]
    fn test_values_stay_on_their_own_line() {
        let lines = ["{", "'memo': 'a',", "'state': 'OPEN'", "}"];
        let record = parse_lines(&lines).unwrap();
        assert_eq!(record.get("memo"), Some(&json!("a")));
        assert_eq!(record.get("state"), Some(&json!("OPEN")));
    }

    #[test]
    fn test_empty_response() {
        let lines: [&str; 0] = [];
        assert!(matches!(parse_lines(&lines), Err(InvoiceError::EmptyResponse)));
        assert!(matches!(parse(""), Err(InvoiceError::EmptyResponse)));
    }

    #[test]
    fn test_malformed_response() {
        assert!(matches!(
            parse_lines(&["not json"]),
            Err(InvoiceError::MalformedResponse { .. })
        ));
        assert!(matches!(
            parse_lines(&["not", "json either"]),
            Err(InvoiceError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_single_line_is_not_quote_repaired() {
        assert!(matches!(
            parse_lines(&["{'state': 'OPEN'}"]),
            Err(InvoiceError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_non_object_is_malformed() {
        let err = parse_lines(&["[1, 2]"]).unwrap_err();
        assert!(
            matches!(err, InvoiceError::MalformedResponse { ref message } if message.contains("an array"))
        );
    }
}
