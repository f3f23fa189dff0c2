//! Response-shape extraction.
//!
//! The service has gone through several backend iterations and the reply
//! text has lived under different keys. Shapes are tried in priority
//! order; the structured `run_items` form wins over the flat string
//! fields.

use crate::error::{Error, Result};
use serde_json::Value;

/// Flat top-level string fields, in priority order.
const FLAT_KEYS: &[&str] = &["response", "message", "content", "text", "output", "result"];

/// Extract the assistant reply text from a raw response body.
pub fn extract_reply(body: &Value) -> Result<String> {
    if let Some(text) = extract_run_items(body) {
        return Ok(text);
    }

    for key in FLAT_KEYS {
        if let Some(text) = body.get(key).and_then(Value::as_str) {
            return Ok(text.to_string());
        }
    }

    Err(Error::InvalidResponseFormat)
}

/// The agent-runner shape: `run_items[].content[].text`, concatenated.
fn extract_run_items(body: &Value) -> Option<String> {
    let items = body.get("run_items")?.as_array()?;
    let mut out = String::new();
    for item in items {
        let Some(parts) = item.get("content").and_then(Value::as_array) else {
            continue;
        };
        for part in parts {
            if let Some(text) = part.get("text").and_then(Value::as_str) {
                out.push_str(text);
            }
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn run_items_concatenated() {
        let body = json!({
            "run_items": [
                {"content": [{"text": "The salinity "}, {"text": "is rising."}]},
                {"content": [{"text": " Expect 28 PSU."}]}
            ]
        });
        assert_eq!(
            extract_reply(&body).unwrap(),
            "The salinity is rising. Expect 28 PSU."
        );
    }

    #[test]
    fn run_items_take_priority_over_flat_fields() {
        let body = json!({
            "run_items": [{"content": [{"text": "structured"}]}],
            "response": "flat"
        });
        assert_eq!(extract_reply(&body).unwrap(), "structured");
    }

    #[test]
    fn flat_key_priority_order() {
        let body = json!({"message": "second", "response": "first"});
        assert_eq!(extract_reply(&body).unwrap(), "first");

        let body = json!({"result": "last", "output": "sixth"});
        assert_eq!(extract_reply(&body).unwrap(), "sixth");
    }

    #[test]
    fn each_flat_key_is_recognized() {
        for key in super::FLAT_KEYS {
            let body = json!({ *key: "hello" });
            assert_eq!(extract_reply(&body).unwrap(), "hello", "key {}", key);
        }
    }

    #[test]
    fn empty_run_items_fall_through_to_flat_fields() {
        let body = json!({"run_items": [], "text": "fallback"});
        assert_eq!(extract_reply(&body).unwrap(), "fallback");
    }

    #[test]
    fn unknown_shape_is_an_error() {
        let body = json!({"status": "ok", "data": {"nested": true}});
        assert!(matches!(
            extract_reply(&body),
            Err(Error::InvalidResponseFormat)
        ));
    }

    #[test]
    fn non_string_fields_do_not_match() {
        let body = json!({"response": 42});
        assert!(matches!(
            extract_reply(&body),
            Err(Error::InvalidResponseFormat)
        ));
    }
}
