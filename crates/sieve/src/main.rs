//! # Sieve CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/sieve/src/cli/)                          │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (crates/sieveapp/src/engine.rs)                     │
//! │  - Filter values, presets, filtered view                    │
//! │  - Persists through a KeyValueStore (FsStore here)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything in `sieveapp` is UI agnostic. The CLI owns argument parsing,
//! reading the record and filter files, logging setup, and output.
//!
//! Each invocation is one short-lived session: state from earlier runs is read
//! from the data directory, one command is applied, and any debounced edit is
//! flushed before exit.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
