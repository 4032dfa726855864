use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sieve",
    bin_name = "sieve",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Filter JSON records with saved presets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// JSON file holding an array of records
    #[arg(short, long, global = true, help_heading = "Inputs")]
    pub items: Option<PathBuf>,

    /// TOML file with [[filters]] definitions
    #[arg(short, long, global = true, help_heading = "Inputs")]
    pub filters: Option<PathBuf>,

    /// Settings file (storage_key, persist_state, debounce_ms)
    #[arg(short, long, global = true, help_heading = "Inputs")]
    pub config: Option<PathBuf>,

    /// Directory for persisted filter state
    #[arg(long, global = true, help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Print the records that pass the current filters
    #[command(alias = "ls")]
    List,

    /// Set one filter value (JSON, or a bare string)
    Set {
        /// Field name as declared in the filters file
        field: String,

        /// New value, e.g. `OH`, `true`, `["D1","D2"]`, `[3.0, 4.0]`
        value: String,
    },

    /// Reset every filter to its default
    Clear,

    /// Show active filters and how many records match
    Status,

    /// Manage saved presets
    Preset {
        #[command(subcommand)]
        action: PresetCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum PresetCommands {
    /// Save the current filter values as a preset
    Save {
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Replace the current filter values with a preset's
    Load { id: String },

    /// Rename a preset or change its description
    Update {
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a preset
    #[command(alias = "rm")]
    Delete { id: String },

    /// List saved presets
    #[command(alias = "ls")]
    List,
}
