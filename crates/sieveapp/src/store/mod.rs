//! # Storage Layer
//!
//! The engine mirrors its state to a durable key-value store, the way a web
//! client mirrors to local storage. [`KeyValueStore`] is that store: string keys,
//! string values, nothing else.
//!
//! ## Best Effort
//!
//! Stores report failures through [`Result`], but the engine never lets them
//! escape. A failed read means "start from defaults", a failed write is logged
//! and forgotten. There is no locking or versioning; the last writer wins.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsStore`]: one JSON file per key in a directory.
//! - [`mem_backend::MemStore`]: in-memory, with switches for simulating failures.
//!
//! ## Storage Layout (`FsStore`)
//!
//! ```text
//! <root>/
//! └── {key}.json     # {"values": {...}, "presets": [...]}
//! ```

use crate::error::Result;

pub mod fs_backend;
pub mod mem_backend;

pub use fs_backend::FsStore;
pub use mem_backend::MemStore;

/// Durable string key-value storage.
///
/// Methods take `&self`; implementations use interior mutability where needed.
pub trait KeyValueStore {
    /// Read the value stored under `key`. Returns `Ok(None)` when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}
