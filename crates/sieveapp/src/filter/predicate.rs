//! Per-kind predicate evaluators.
//!
//! Each evaluator receives the resolved field value (`None` when the path is
//! missing) and an active, non-empty filter value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::display::plain_string;
use super::Comparator;
use crate::model::FilterKind;

/// Dispatch to the evaluator for `kind`.
pub fn evaluate(
    kind: FilterKind,
    field_value: Option<&Value>,
    filter_value: &Value,
    compare: &Comparator,
) -> bool {
    match kind {
        FilterKind::Text => matches_text(field_value, filter_value),
        FilterKind::Select => matches_select(field_value, filter_value, compare),
        FilterKind::Multiselect => matches_multiselect(field_value, filter_value, compare),
        FilterKind::Boolean => field_value == Some(filter_value),
        FilterKind::Range => matches_range(field_value, filter_value),
        FilterKind::DateRange => matches_date_range(field_value, filter_value),
    }
}

fn matches_text(field_value: Option<&Value>, filter_value: &Value) -> bool {
    let Some(field_value) = field_value.filter(|v| !v.is_null()) else {
        return false;
    };
    let needle = plain_string(filter_value).to_lowercase();
    let haystack = plain_string(field_value).to_lowercase();
    haystack.trim().contains(needle.trim())
}

fn matches_select(field_value: Option<&Value>, filter_value: &Value, compare: &Comparator) -> bool {
    compare.compare(field_value.unwrap_or(&Value::Null), filter_value)
}

/// Flat selections test membership. When the record holds a list, any shared
/// element matches. Nested selections (`[[a, b], ...]`) compare the flattened
/// string forms through the comparator.
fn matches_multiselect(
    field_value: Option<&Value>,
    filter_value: &Value,
    compare: &Comparator,
) -> bool {
    let Value::Array(selected) = filter_value else {
        return matches_select(field_value, filter_value, compare);
    };

    if matches!(selected.first(), Some(Value::Array(_))) {
        let field = field_value.map(plain_string).unwrap_or_default();
        return compare.compare(&Value::String(field), &Value::String(plain_string(filter_value)));
    }

    match field_value {
        None => false,
        Some(Value::Array(held)) => held.iter().any(|v| selected.contains(v)),
        Some(value) => selected.contains(value),
    }
}

fn matches_range(field_value: Option<&Value>, filter_value: &Value) -> bool {
    let Some(n) = field_value.and_then(Value::as_f64) else {
        return false;
    };
    let Some((min, max)) = bounds(filter_value, as_number) else {
        return false;
    };
    min.is_none_or(|min| min <= n) && max.is_none_or(|max| n <= max)
}

fn matches_date_range(field_value: Option<&Value>, filter_value: &Value) -> bool {
    let Some(date) = field_value.and_then(coerce_date) else {
        return false;
    };
    let Some((start, end)) = bounds(filter_value, coerce_date) else {
        return false;
    };
    start.is_none_or(|start| start <= date) && end.is_none_or(|end| date <= end)
}

/// Split a `[lower, upper]` pair. A `null` bound is open; any other bound that
/// fails to convert makes the whole pair invalid.
fn bounds<T>(value: &Value, convert: impl Fn(&Value) -> Option<T>) -> Option<(Option<T>, Option<T>)> {
    let Value::Array(pair) = value else {
        return None;
    };
    let bound = |v: Option<&Value>| -> Option<Option<T>> {
        match v {
            None | Some(Value::Null) => Some(None),
            Some(v) => convert(v).map(Some),
        }
    };
    Some((bound(pair.first())?, bound(pair.get(1))?))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerce a JSON value to a UTC timestamp.
///
/// Accepts RFC 3339 strings, `YYYY-MM-DD` (UTC midnight), naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) and numbers as Unix milliseconds.
pub fn coerce_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis)
        }
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.and_utc())
}
