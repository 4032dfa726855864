//! Dot-path field access.

use serde_json::Value;

/// Resolve a dot-separated `path` against `record`.
///
/// Returns `None` when a segment is missing or an intermediate value is not a
/// container. Array segments must be numeric indexes (`"offers.0.amount"`).
/// A present `null` leaf resolves to `Some(Value::Null)`.
pub fn resolve_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_top_level_field() {
        let record = json!({"name": "Ohio State University"});
        assert_eq!(
            resolve_path(&record, "name"),
            Some(&json!("Ohio State University"))
        );
    }

    #[test]
    fn resolves_nested_field() {
        let record = json!({"coach": {"name": "Ryan Day", "role": "head"}});
        assert_eq!(resolve_path(&record, "coach.name"), Some(&json!("Ryan Day")));
    }

    #[test]
    fn missing_segment_is_none() {
        let record = json!({"coach": {"name": "Ryan Day"}});
        assert_eq!(resolve_path(&record, "coach.email"), None);
        assert_eq!(resolve_path(&record, "school.name"), None);
    }

    #[test]
    fn null_intermediate_is_none() {
        let record = json!({"coach": null});
        assert_eq!(resolve_path(&record, "coach.name"), None);
    }

    #[test]
    fn null_leaf_is_present() {
        let record = json!({"coach": null});
        assert_eq!(resolve_path(&record, "coach"), Some(&Value::Null));
    }

    #[test]
    fn scalar_record_is_none() {
        assert_eq!(resolve_path(&json!(42), "name"), None);
        assert_eq!(resolve_path(&json!("text"), "len"), None);
    }

    #[test]
    fn array_segments_index_by_position() {
        let record = json!({"offers": [{"amount": 5000}, {"amount": 12000}]});
        assert_eq!(resolve_path(&record, "offers.1.amount"), Some(&json!(12000)));
        assert_eq!(resolve_path(&record, "offers.5.amount"), None);
        assert_eq!(resolve_path(&record, "offers.first.amount"), None);
    }
}
