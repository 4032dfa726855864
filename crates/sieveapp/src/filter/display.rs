//! Human-readable rendering of filter values, for chips and status lines.

use serde_json::Value;

use super::{coerce_date, is_empty_value};
use crate::model::{FilterConfig, FilterKind};

/// Render a value the way a browser would coerce it to a string.
///
/// Arrays flatten to comma-joined elements with `null` as empty, objects render
/// as `[object Object]`, integral floats drop their fraction.
pub fn plain_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => plain_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Display string for `value` under `config`.
///
/// Empty values render as `""`. Without a config the raw value is shown.
pub fn display_value(config: Option<&FilterConfig>, value: Option<&Value>) -> String {
    let Some(value) = value.filter(|v| !is_empty_value(Some(*v))) else {
        return String::new();
    };
    let Some(config) = config else {
        return plain_string(value);
    };

    match config.kind {
        FilterKind::Text => plain_string(value),
        FilterKind::Select => label_for(config, value),
        FilterKind::Multiselect => match value {
            Value::Array(items) => items
                .iter()
                .map(|item| label_for(config, item))
                .collect::<Vec<_>>()
                .join(", "),
            other => label_for(config, other),
        },
        FilterKind::Boolean => match value {
            Value::Bool(true) => "Yes".to_string(),
            Value::Bool(false) => "No".to_string(),
            other => plain_string(other),
        },
        FilterKind::Range => pair(value, plain_string),
        FilterKind::DateRange => pair(value, short_date),
    }
}

fn label_for(config: &FilterConfig, value: &Value) -> String {
    config
        .option_label(value)
        .map(str::to_string)
        .unwrap_or_else(|| plain_string(value))
}

fn pair(value: &Value, render: impl Fn(&Value) -> String) -> String {
    match value {
        Value::Array(items) => {
            let side = |v: Option<&Value>| match v {
                None | Some(Value::Null) => String::new(),
                Some(v) => render(v),
            };
            format!("{} - {}", side(items.first()), side(items.get(1)))
        }
        other => plain_string(other),
    }
}

/// `M/D/YYYY`, falling back to the raw value when it is not a date.
fn short_date(value: &Value) -> String {
    coerce_date(value)
        .map(|date| date.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| plain_string(value))
}
