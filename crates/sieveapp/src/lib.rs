//! # Sieve
//!
//! Declarative, in-memory filtering of JSON records, with filter state and
//! named presets mirrored to a durable key-value store.
//!
//! ## Layering
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  engine    FilterEngine: state, derived view, presets    │
//! └──────────────────────────────────────────────────────────┘
//!          │                 │                  │
//!          ▼                 ▼                  ▼
//!   filter (pure)     debounce (timers)   store (KeyValueStore)
//!   path / predicates  Clock, Debouncer    FsStore, MemStore
//!   display values
//! ```
//!
//! - [`model`]: `FilterConfig`, `FilterValues`, `FilterPreset`, persisted format.
//! - [`filter`]: field access, per-kind evaluators, the AND pass, chip text.
//! - [`engine`]: the stateful [`FilterEngine`].
//! - [`debounce`]: per-field pending edits and the clock they run on.
//! - [`store`]: the durable key-value store abstraction.
//! - [`config`]: layered settings (`sieve.toml` + `SIEVE_*` env vars).
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use sieveapp::{EngineOptions, FilterConfig, FilterEngine, MemStore};
//!
//! let schools = vec![
//!     json!({"name": "Ohio State University", "division": "D1"}),
//!     json!({"name": "University of Toledo", "division": "D2"}),
//! ];
//! let configs = vec![FilterConfig::text("name"), FilterConfig::select("division")];
//! let mut engine = FilterEngine::new(schools, configs, EngineOptions::default(), MemStore::new());
//!
//! engine.set_filter_value("name", json!("university"));
//! engine.set_filter_value("division", json!("D2"));
//! assert_eq!(engine.filtered_count(), 1);
//! assert_eq!(engine.active_filter_count(), 2);
//! ```

pub mod config;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod filter;
pub mod model;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use config::SieveConfig;
pub use engine::{EngineOptions, FilterEngine};
pub use error::{Result, SieveError};
pub use model::{FilterConfig, FilterKind, FilterPreset, FilterValues, PresetUpdate};
pub use store::{FsStore, KeyValueStore, MemStore};
