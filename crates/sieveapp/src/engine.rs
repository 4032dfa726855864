//! # Filter Engine
//!
//! [`FilterEngine`] binds a list of [`FilterConfig`]s to a collection of JSON
//! records and keeps a filtered view of them, plus named presets of filter
//! values.
//!
//! ## Consistency
//!
//! The filtered view is derived eagerly. Every call that changes the records,
//! the configs or the effective filter values rescans the collection before it
//! returns, so [`FilterEngine::filtered_items`] is always consistent with the
//! latest inputs. The scan is linear; collections are expected to be UI-list
//! sized.
//!
//! ## State and Persistence
//!
//! The engine is the only mutator of its filter values and presets. When
//! `persist_state` is on, every effective mutation writes
//! `{"values", "presets"}` to the store under `storage_key`, and construction
//! reads it back. Store failures are logged with `tracing::warn!` and
//! otherwise ignored.
//!
//! ## Debounce
//!
//! With a non-zero debounce window, [`FilterEngine::set_filter_value`] only
//! schedules the edit. The host applies it by calling
//! [`FilterEngine::flush_due`] once the window has passed (or
//! [`FilterEngine::flush_pending`] to apply everything now). Clearing filters
//! or loading a preset drops pending edits.
//!
//! ## Active Preset
//!
//! `active_preset_id` names the preset the current values came from. Any
//! effective edit or reset clears it; deleting the active preset clears it.

use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{SieveConfig, DEFAULT_STORAGE_KEY};
use crate::debounce::{Clock, Debouncer, SystemClock};
use crate::error::SieveError;
use crate::filter::{self, Comparator};
use crate::model::{
    default_values, FilterConfig, FilterPreset, FilterValue, FilterValues, PersistedState,
    PresetUpdate,
};
use crate::store::KeyValueStore;

/// Options recognized at construction.
pub struct EngineOptions {
    pub storage_key: String,
    pub persist_state: bool,
    pub debounce: Duration,
    pub compare_values: Comparator,
    pub clock: Box<dyn Clock>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            persist_state: true,
            debounce: Duration::ZERO,
            compare_values: Comparator::default(),
            clock: Box::new(SystemClock),
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &SieveConfig) -> Self {
        Self {
            storage_key: config.storage_key().to_string(),
            persist_state: config.persist_state,
            debounce: config.debounce(),
            ..Default::default()
        }
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_persist_state(mut self, persist: bool) -> Self {
        self.persist_state = persist;
        self
    }

    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    pub fn with_compare_values(
        mut self,
        f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.compare_values = Comparator::new(f);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }
}

#[derive(Serialize)]
struct PersistedStateRef<'a> {
    values: &'a FilterValues,
    presets: &'a [FilterPreset],
}

/// Stateful filter over a record collection.
///
/// Generic over the store so tests can run against [`MemStore`](crate::store::MemStore)
/// and the CLI against [`FsStore`](crate::store::FsStore).
pub struct FilterEngine<S: KeyValueStore> {
    items: Vec<Value>,
    configs: Vec<FilterConfig>,
    values: FilterValues,
    presets: Vec<FilterPreset>,
    active_preset_id: Option<String>,
    filtered: Vec<usize>,
    debouncer: Debouncer,
    storage_key: String,
    persist_state: bool,
    compare: Comparator,
    clock: Box<dyn Clock>,
    store: S,
}

impl<S: KeyValueStore> FilterEngine<S> {
    /// Build an engine, seeding values from config defaults and then from the
    /// store when persistence is on.
    pub fn new(
        items: Vec<Value>,
        configs: Vec<FilterConfig>,
        options: EngineOptions,
        store: S,
    ) -> Self {
        let values = default_values(&configs);
        let mut engine = Self {
            items,
            configs,
            values,
            presets: Vec::new(),
            active_preset_id: None,
            filtered: Vec::new(),
            debouncer: Debouncer::new(options.debounce),
            storage_key: options.storage_key,
            persist_state: options.persist_state,
            compare: options.compare_values,
            clock: options.clock,
            store,
        };
        if engine.persist_state {
            engine.load_state();
        }
        engine.recompute();
        engine
    }

    // --- Reads ---

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn configs(&self) -> &[FilterConfig] {
        &self.configs
    }

    pub fn get_config_for_field(&self, field: &str) -> Option<&FilterConfig> {
        self.configs.iter().find(|config| config.field == field)
    }

    pub fn filter_values(&self) -> &FilterValues {
        &self.values
    }

    /// Detached copy of the current values.
    pub fn filter_values_raw(&self) -> FilterValues {
        self.values.clone()
    }

    pub fn filter_value(&self, field: &str) -> Option<&FilterValue> {
        self.values.get(field)
    }

    pub fn presets(&self) -> &[FilterPreset] {
        &self.presets
    }

    pub fn preset(&self, id: &str) -> Option<&FilterPreset> {
        self.presets.iter().find(|preset| preset.id == id)
    }

    pub fn active_preset_id(&self) -> Option<&str> {
        self.active_preset_id.as_deref()
    }

    /// Records passing every active filter, in source order.
    pub fn filtered_items(&self) -> Vec<&Value> {
        self.filtered.iter().map(|&i| &self.items[i]).collect()
    }

    /// Positions of [`Self::filtered_items`] within [`Self::items`].
    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn passes_filters(&self, record: &Value) -> bool {
        filter::passes_filters(record, &self.configs, &self.values, &self.compare)
    }

    /// Number of configured fields whose current value is non-empty.
    pub fn active_filter_count(&self) -> usize {
        self.configs
            .iter()
            .filter(|config| !filter::is_empty_value(self.values.get(&config.field)))
            .count()
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Chip text for one field's current value.
    pub fn get_filter_display_value(&self, field: &str) -> String {
        filter::display_value(self.get_config_for_field(field), self.values.get(field))
    }

    pub fn pending_count(&self) -> usize {
        self.debouncer.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Source changes ---

    pub fn set_items(&mut self, items: Vec<Value>) {
        self.items = items;
        self.recompute();
    }

    /// Mutate the records in place; the view is rederived afterwards.
    pub fn update_items<R>(&mut self, f: impl FnOnce(&mut Vec<Value>) -> R) -> R {
        let out = f(&mut self.items);
        self.recompute();
        out
    }

    /// Replace the configs. Newly known fields start at their default;
    /// existing values are kept, including ones no config refers to anymore.
    pub fn set_configs(&mut self, configs: Vec<FilterConfig>) {
        for config in &configs {
            self.values
                .entry(config.field.clone())
                .or_insert_with(|| config.default_value());
        }
        self.configs = configs;
        self.recompute();
    }

    // --- Filter values ---

    /// Set one field's value, immediately or after the debounce window.
    pub fn set_filter_value(&mut self, field: &str, value: FilterValue) {
        if self.debouncer.is_enabled() {
            let due = self.debouncer.schedule(field, value, self.clock.now());
            debug!(field, ?due, "filter edit scheduled");
            return;
        }
        self.apply_values(vec![(field.to_string(), value)]);
    }

    /// Apply debounced edits whose window has elapsed. Returns how many were applied.
    pub fn flush_due(&mut self) -> usize {
        let due = self.debouncer.take_due(self.clock.now());
        let count = due.len();
        self.apply_values(due);
        count
    }

    /// Apply every pending edit now. Returns how many were applied.
    pub fn flush_pending(&mut self) -> usize {
        let pending = self.debouncer.drain();
        let count = pending.len();
        self.apply_values(pending);
        count
    }

    /// Reset every configured field to its default.
    pub fn clear_filters(&mut self) {
        self.debouncer.clear();
        for config in &self.configs {
            self.values
                .insert(config.field.clone(), config.default_value());
        }
        self.active_preset_id = None;
        debug!("filters cleared");
        self.save_state();
        self.recompute();
    }

    fn apply_values(&mut self, edits: Vec<(String, FilterValue)>) {
        if edits.is_empty() {
            return;
        }
        for (field, value) in edits {
            debug!(field = %field, "filter value applied");
            self.values.insert(field, value);
        }
        self.active_preset_id = None;
        self.save_state();
        self.recompute();
    }

    // --- Presets ---

    /// Snapshot the current values into a new preset.
    pub fn save_preset(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> FilterPreset {
        let created_at = Utc::now();
        let preset = FilterPreset {
            id: new_preset_id(created_at.timestamp_millis()),
            name: name.into(),
            description,
            filters: self.values.clone(),
            created_at,
        };
        debug!(id = %preset.id, name = %preset.name, "preset saved");
        self.presets.push(preset.clone());
        self.save_state();
        preset
    }

    /// Replace the current values with a copy of the preset's.
    ///
    /// Returns `false` without touching anything when the id is unknown.
    pub fn load_preset(&mut self, id: &str) -> bool {
        let Some(preset) = self.preset(id) else {
            return false;
        };
        let mut values = preset.filters.clone();
        for config in &self.configs {
            values
                .entry(config.field.clone())
                .or_insert_with(|| config.default_value());
        }

        self.debouncer.clear();
        self.values = values;
        self.active_preset_id = Some(id.to_string());
        debug!(id, "preset loaded");
        self.save_state();
        self.recompute();
        true
    }

    /// Shallow-merge `updates` into a preset. Returns `false` when the id is unknown.
    pub fn update_preset(&mut self, id: &str, updates: PresetUpdate) -> bool {
        let Some(preset) = self.presets.iter_mut().find(|preset| preset.id == id) else {
            return false;
        };
        updates.apply(preset);
        debug!(id, "preset updated");
        self.save_state();
        true
    }

    /// Remove a preset. Returns `false` when the id is unknown.
    pub fn delete_preset(&mut self, id: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|preset| preset.id != id);
        if self.presets.len() == before {
            return false;
        }
        if self.active_preset_id.as_deref() == Some(id) {
            self.active_preset_id = None;
        }
        debug!(id, "preset deleted");
        self.save_state();
        true
    }

    // --- Internals ---

    fn recompute(&mut self) {
        let configs = &self.configs;
        let values = &self.values;
        let compare = &self.compare;
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, record)| filter::passes_filters(record, configs, values, compare))
            .map(|(i, _)| i)
            .collect();
        debug!(
            total = self.items.len(),
            matched = self.filtered.len(),
            "filtered view recomputed"
        );
    }

    fn load_state(&mut self) {
        let text = match self.store.get_item(&self.storage_key) {
            Ok(Some(text)) => text,
            Ok(None) => return,
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "failed to read filter state");
                return;
            }
        };
        match serde_json::from_str::<PersistedState>(&text) {
            Ok(state) => {
                self.values.extend(state.values);
                self.presets = state.presets;
                debug!(
                    key = %self.storage_key,
                    presets = self.presets.len(),
                    "filter state restored"
                );
            }
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "failed to parse filter state");
            }
        }
    }

    fn save_state(&self) {
        if !self.persist_state {
            return;
        }
        let state = PersistedStateRef {
            values: &self.values,
            presets: &self.presets,
        };
        let result = serde_json::to_string(&state)
            .map_err(SieveError::from)
            .and_then(|text| self.store.set_item(&self.storage_key, &text));
        if let Err(e) = result {
            warn!(key = %self.storage_key, error = %e, "failed to save filter state");
        }
    }
}

/// `preset-<unix millis>-<8 hex chars>`; the suffix keeps ids saved within the
/// same millisecond distinct.
fn new_preset_id(millis: i64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("preset-{}-{}", millis, &suffix[..8])
}
