//! # Record Filtering
//!
//! Pure functions that decide whether a record passes a set of configured
//! filters. The engine owns state; everything here is stateless.
//!
//! ## Evaluation
//!
//! A record passes when it satisfies **every** configured filter (logical AND).
//! For each filter:
//!
//! 1. An empty value (`null`, missing, `""`, `[]`) is inactive and passes.
//! 2. A config with a custom `filter_fn` delegates to it with the whole record.
//! 3. Otherwise the field is resolved by dot path and handed to the evaluator
//!    for the config's [`FilterKind`](crate::model::FilterKind).
//!
//! Missing paths, malformed values and unparseable dates never error; they
//! simply fail to match.

mod display;
mod path;
mod predicate;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::model::{FilterConfig, FilterValues};

pub use display::{display_value, plain_string};
pub use path::resolve_path;
pub use predicate::{coerce_date, evaluate};

/// Equality used by `select` and `multiselect` fallbacks.
///
/// Defaults to strict JSON equality.
#[derive(Clone)]
pub struct Comparator(Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>);

impl Comparator {
    pub fn new(f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn compare(&self, field_value: &Value, filter_value: &Value) -> bool {
        (self.0)(field_value, filter_value)
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(|a, b| a == b)
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator(..)")
    }
}

/// Whether a filter value leaves its field unconstrained.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Check one configured filter against one record.
pub fn config_matches(
    record: &Value,
    config: &FilterConfig,
    value: Option<&Value>,
    compare: &Comparator,
) -> bool {
    let Some(value) = value.filter(|v| !is_empty_value(Some(*v))) else {
        return true;
    };

    if let Some(custom) = &config.filter_fn {
        return custom.matches(record, value);
    }

    let field_value = resolve_path(record, &config.field);
    evaluate(config.kind, field_value, value, compare)
}

/// Check a record against every configured filter.
pub fn passes_filters(
    record: &Value,
    configs: &[FilterConfig],
    values: &FilterValues,
    compare: &Comparator,
) -> bool {
    configs
        .iter()
        .all(|config| config_matches(record, config, values.get(&config.field), compare))
}
