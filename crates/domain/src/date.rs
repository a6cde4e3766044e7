use chrono::DateTime;
use serde_json::Value;

/// Normalizes a `scheduledFor` value read from the store to UTC millis.
///
/// Three historical client stacks wrote three shapes: integer millis,
/// RFC3339 strings, and `{ seconds, nanoseconds }` timestamp maps. All of
/// them must resolve to the same canonical form.
pub fn normalize_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.timestamp_millis()),
        Value::Object(map) => {
            let seconds = map.get("seconds").and_then(Value::as_i64)?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("nanos"))
                .and_then(Value::as_i64)
                .unwrap_or(0);
            Some(seconds * 1000 + nanos / 1_000_000)
        }
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_integer_millis() {
        assert_eq!(
            normalize_timestamp(&json!(1748768400000i64)),
            Some(1748768400000)
        );
    }

    #[test]
    fn normalizes_rfc3339_strings() {
        assert_eq!(
            normalize_timestamp(&json!("2025-06-01T09:00:00Z")),
            Some(1748768400000)
        );
    }

    #[test]
    fn normalizes_timestamp_maps() {
        assert_eq!(
            normalize_timestamp(&json!({ "seconds": 1748768400, "nanoseconds": 500_000_000 })),
            Some(1748768400500)
        );
        assert_eq!(
            normalize_timestamp(&json!({ "seconds": 1748768400, "nanos": 0 })),
            Some(1748768400000)
        );
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert_eq!(normalize_timestamp(&json!(null)), None);
        assert_eq!(normalize_timestamp(&json!("next tuesday")), None);
        assert_eq!(normalize_timestamp(&json!({ "millis": 100 })), None);
    }
}
