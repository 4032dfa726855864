//! # CLI Behavior
//!
//! This is **one possible UI client** for sieve, not the engine itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! ## Inputs
//!
//! - `--items records.json`: a JSON array of records. Missing means no records.
//! - `--filters filters.toml`: `[[filters]]` tables, one per filterable field.
//! - `--config sieve.toml`: engine settings (see `sieveapp::config`).
//! - `--data-dir DIR`: where filter state is stored. Defaults to the OS data dir.
//!
//! ## Naked Execution
//!
//! Running `sieve` with no subcommand is `sieve list`.
//!
//! ## Module Structure
//!
//! - `setup`: Argument parsing via clap
//! - `commands`: Context setup and per-command handlers
//! - `render`: Output formatting

mod commands;
mod render;
pub mod setup;

pub use commands::run;
