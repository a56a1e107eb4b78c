//! Safe dot-path navigation over untyped JSON payloads.
//!
//! ```
//! use msglog_core::deep_get;
//! use serde_json::json;
//!
//! let message = json!({ "from": { "first_name": "Kostas", "id": 7 } });
//! assert_eq!(deep_get(&message, "from.first_name"), "Kostas");
//! assert_eq!(deep_get(&message, "from.id"), "7");
//! assert_eq!(deep_get(&message, "from.last_name"), "");
//! assert_eq!(deep_get(&message, "from.first_name.initial"), "");
//! ```

use serde_json::Value;

/// Walks `path` (keys separated by `.`) through nested objects and renders the
/// value found at the end as text.
///
/// Any step that lands on a non-object, or a key that is missing, yields an
/// empty string.
pub fn deep_get(value: &Value, path: &str) -> String {
    lookup(value, path).map(render).unwrap_or_default()
}

/// Returns the raw value at `path`, or `None` when traversal breaks off.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| match current {
        Value::Object(map) => map.get(key),
        _ => None,
    })
}

/// Renders a JSON leaf the way it should appear in a log cell.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Truthiness used to decide whether an update carries a message worth logging.
///
/// Null, `false`, zero, and empty strings, arrays or objects count as absent.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_level_keys_resolve() {
        let msg = json!({ "message_id": 42, "text": "hi, there" });
        assert_eq!(deep_get(&msg, "message_id"), "42");
        assert_eq!(deep_get(&msg, "text"), "hi, there");
    }

    #[test]
    fn missing_keys_degrade_to_empty() {
        let msg = json!({ "from": { "id": 7 } });
        assert_eq!(deep_get(&msg, "from.last_name"), "");
        assert_eq!(deep_get(&msg, "chat.id"), "");
        assert_eq!(deep_get(&msg, ""), "");
    }

    #[test]
    fn non_object_intermediate_short_circuits() {
        let msg = json!({ "from": "someone", "list": [ { "id": 1 } ] });
        assert_eq!(deep_get(&msg, "from.first_name"), "");
        assert_eq!(deep_get(&msg, "list.0.id"), "");
        assert_eq!(deep_get(&json!("flat"), "from.id"), "");
        assert_eq!(deep_get(&Value::Null, "message_id"), "");
    }

    #[test]
    fn leaves_render_as_text() {
        let msg = json!({
            "n": -7,
            "f": 1.5,
            "b": false,
            "z": null,
            "arr": [1, "two"],
            "obj": { "k": "v" }
        });
        assert_eq!(deep_get(&msg, "n"), "-7");
        assert_eq!(deep_get(&msg, "f"), "1.5");
        assert_eq!(deep_get(&msg, "b"), "false");
        assert_eq!(deep_get(&msg, "z"), "");
        assert_eq!(deep_get(&msg, "arr"), r#"[1,"two"]"#);
        assert_eq!(deep_get(&msg, "obj"), r#"{"k":"v"}"#);
    }

    #[test]
    fn lookup_returns_intermediate_objects() {
        let msg = json!({ "from": { "id": 7 } });
        assert_eq!(lookup(&msg, "from"), Some(&json!({ "id": 7 })));
        assert_eq!(lookup(&msg, "from.id.x"), None);
    }

    #[test]
    fn presence_follows_truthiness() {
        assert!(is_present(&json!({ "text": "x" })));
        assert!(is_present(&json!("x")));
        assert!(is_present(&json!(3)));
        assert!(!is_present(&json!({})));
        assert!(!is_present(&json!([])));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!(false)));
        assert!(!is_present(&Value::Null));
    }
}
