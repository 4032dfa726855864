//! # Domain Model
//!
//! This module defines the data the filter engine works with: [`FilterConfig`]
//! (what can be filtered and how), [`FilterValues`] (what is currently
//! selected) and [`FilterPreset`] (named snapshots of selections).
//!
//! ## Filter Kinds
//!
//! | Kind | Active value | Match rule |
//! |------|--------------|------------|
//! | `text` | string | case-insensitive substring |
//! | `select` | scalar | comparator, strict equality by default |
//! | `multiselect` | array | membership |
//! | `boolean` | bool | equality |
//! | `range` | `[min, max]` | inclusive numeric bounds |
//! | `daterange` | `[start, end]` | inclusive date bounds |
//!
//! ## Values Are JSON
//!
//! Records and filter values are [`serde_json::Value`]s. The engine filters
//! arbitrary caller records, and the persisted state is plain JSON, so there is
//! no typed intermediate representation: each evaluator interprets the value
//! shape it expects and treats anything else as a non-match.
//!
//! ## Storage Format
//!
//! [`PersistedState`] is what lands in the store:
//!
//! ```text
//! {
//!   "values":  { "<field>": <value>, ... },
//!   "presets": [ { "id", "name", "description"?, "filters", "createdAt" }, ... ]
//! }
//! ```
//!
//! There is no version field. A payload of a different shape fails to parse and
//! the engine falls back to defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The current selection for one field. `Null` means "not set".
pub type FilterValue = Value;

/// Field name to current filter value.
pub type FilterValues = BTreeMap<String, FilterValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Text,
    Select,
    Multiselect,
    Boolean,
    Range,
    DateRange,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::Text => "text",
            FilterKind::Select => "select",
            FilterKind::Multiselect => "multiselect",
            FilterKind::Boolean => "boolean",
            FilterKind::Range => "range",
            FilterKind::DateRange => "daterange",
        };
        f.write_str(name)
    }
}

/// A selectable value and the label shown for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: Value,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Caller-supplied predicate that replaces the built-in evaluator for a field.
///
/// Receives the whole record and the active filter value.
#[derive(Clone)]
pub struct CustomFilter(Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>);

impl CustomFilter {
    pub fn new(f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn matches(&self, record: &Value, filter_value: &Value) -> bool {
        (self.0)(record, filter_value)
    }
}

impl fmt::Debug for CustomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomFilter(..)")
    }
}

/// Static description of one filterable field.
///
/// `field` is a dot path into the record (`"coach.name"`). Configs are
/// deserializable so they can be declared in TOML; `filter_fn` can only be
/// attached in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub field: String,

    #[serde(rename = "type")]
    pub kind: FilterKind,

    #[serde(default, alias = "defaultValue", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FilterOption>,

    #[serde(skip)]
    pub filter_fn: Option<CustomFilter>,
}

impl FilterConfig {
    pub fn new(field: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            field: field.into(),
            kind,
            default_value: None,
            options: Vec::new(),
            filter_fn: None,
        }
    }

    pub fn text(field: impl Into<String>) -> Self {
        Self::new(field, FilterKind::Text)
    }

    pub fn select(field: impl Into<String>) -> Self {
        Self::new(field, FilterKind::Select)
    }

    pub fn multiselect(field: impl Into<String>) -> Self {
        Self::new(field, FilterKind::Multiselect)
    }

    pub fn boolean(field: impl Into<String>) -> Self {
        Self::new(field, FilterKind::Boolean)
    }

    pub fn range(field: impl Into<String>) -> Self {
        Self::new(field, FilterKind::Range)
    }

    pub fn date_range(field: impl Into<String>) -> Self {
        Self::new(field, FilterKind::DateRange)
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_option(mut self, value: impl Into<Value>, label: impl Into<String>) -> Self {
        self.options.push(FilterOption::new(value, label));
        self
    }

    pub fn with_filter_fn(
        mut self,
        f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter_fn = Some(CustomFilter::new(f));
        self
    }

    /// The value this field starts at and resets to. `Null` when none is declared.
    pub fn default_value(&self) -> Value {
        self.default_value.clone().unwrap_or(Value::Null)
    }

    /// Label of the option whose value equals `value`.
    pub fn option_label(&self, value: &Value) -> Option<&str> {
        self.options
            .iter()
            .find(|opt| &opt.value == value)
            .map(|opt| opt.label.as_str())
    }
}

/// Default value for every configured field.
pub fn default_values(configs: &[FilterConfig]) -> FilterValues {
    configs
        .iter()
        .map(|config| (config.field.clone(), config.default_value()))
        .collect()
}

/// A named, persisted snapshot of filter values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreset {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub filters: FilterValues,
    pub created_at: DateTime<Utc>,
}

/// Fields to overwrite on a preset. `None` leaves the field untouched.
///
/// `description: Some(None)` removes the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub filters: Option<FilterValues>,
}

impl PresetUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.filters.is_none()
    }

    /// Shallow merge into `preset`.
    pub fn apply(self, preset: &mut FilterPreset) {
        if let Some(name) = self.name {
            preset.name = name;
        }
        if let Some(description) = self.description {
            preset.description = description;
        }
        if let Some(filters) = self.filters {
            preset.filters = filters;
        }
    }
}

/// The `{values, presets}` payload mirrored to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub values: FilterValues,
    #[serde(default)]
    pub presets: Vec<FilterPreset>,
}
