//! # CLI Layer
//!
//! The only place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Reads the records and filter definitions from disk
//! - Installs the tracing subscriber
//!
//! Each handler applies one engine operation and prints through `render`.
//! Record output goes to stdout as JSON so it can be piped; summaries and
//! confirmations go to stderr.

use super::render;
use super::setup::{Cli, Commands, PresetCommands};
use anyhow::{bail, Context as _, Result};
use clap::Parser;
use serde::Deserialize;
use serde_json::Value;
use sieveapp::{EngineOptions, FilterConfig, FilterEngine, FsStore, PresetUpdate, SieveConfig, SieveError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Engine = FilterEngine<FsStore>;

/// Shape of the `--filters` file.
#[derive(Debug, Default, Deserialize)]
struct FiltersFile {
    #[serde(default)]
    filters: Vec<FilterConfig>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut engine = build_engine(&cli)?;
    let command = cli.command.unwrap_or(Commands::List);
    let result = dispatch(&mut engine, command);

    // One invocation is one session: whatever is still waiting on the
    // debounce window lands before we exit.
    let flushed = engine.flush_pending();
    if flushed > 0 {
        debug!(flushed, "flushed debounced edits on exit");
    }
    result
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (only possible in tests) is not an error worth surfacing.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_engine(cli: &Cli) -> Result<Engine> {
    let config = SieveConfig::load(cli.config.as_deref())?;
    let items = match &cli.items {
        Some(path) => read_items(path)?,
        None => Vec::new(),
    };
    let configs = match &cli.filters {
        Some(path) => read_filters(path)?,
        None => Vec::new(),
    };
    let data_dir = resolve_data_dir(cli.data_dir.clone());
    debug!(
        data_dir = %data_dir.display(),
        items = items.len(),
        filters = configs.len(),
        "building engine"
    );

    let options = EngineOptions::from_config(&config);
    Ok(FilterEngine::new(items, configs, options, FsStore::new(data_dir)))
}

fn read_items(path: &Path) -> Result<Vec<Value>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Cannot read records from {}", path.display()))?;
    parse_items(&raw).with_context(|| format!("Invalid records file {}", path.display()))
}

fn parse_items(raw: &str) -> Result<Vec<Value>> {
    match serde_json::from_str(raw)? {
        Value::Array(items) => Ok(items),
        _ => bail!("expected a JSON array of records"),
    }
}

fn read_filters(path: &Path) -> Result<Vec<FilterConfig>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Cannot read filters from {}", path.display()))?;
    parse_filters(&raw).with_context(|| format!("Invalid filters file {}", path.display()))
}

fn parse_filters(raw: &str) -> Result<Vec<FilterConfig>> {
    let file: FiltersFile = toml::from_str(raw)?;
    Ok(file.filters)
}

fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| {
        directories::ProjectDirs::from("", "", "sieve").map(|dirs| dirs.data_dir().to_path_buf())
    })
    .unwrap_or_else(|| PathBuf::from(".sieve"))
}

/// A value argument is JSON when it parses as JSON, otherwise a bare string.
fn parse_value_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn dispatch(engine: &mut Engine, command: Commands) -> Result<()> {
    match command {
        Commands::List => handle_list(engine),
        Commands::Set { field, value } => handle_set(engine, &field, &value),
        Commands::Clear => handle_clear(engine),
        Commands::Status => handle_status(engine),
        Commands::Preset { action } => handle_preset(engine, action),
    }
}

fn handle_list(engine: &mut Engine) -> Result<()> {
    let items = engine.filtered_items();
    println!("{}", serde_json::to_string_pretty(&items)?);
    eprintln!(
        "{}",
        render::summary(items.len(), engine.items().len(), engine.active_filter_count())
    );
    Ok(())
}

fn handle_set(engine: &mut Engine, field: &str, raw: &str) -> Result<()> {
    if engine.get_config_for_field(field).is_none() {
        bail!("Unknown filter field: {}", field);
    }
    engine.set_filter_value(field, parse_value_arg(raw));
    engine.flush_pending();
    eprintln!(
        "{}",
        render::field_set(field, &engine.get_filter_display_value(field))
    );
    eprintln!(
        "{}",
        render::summary(engine.filtered_count(), engine.items().len(), engine.active_filter_count())
    );
    Ok(())
}

fn handle_clear(engine: &mut Engine) -> Result<()> {
    engine.clear_filters();
    eprintln!("{}", render::success("Filters cleared."));
    Ok(())
}

fn handle_status(engine: &mut Engine) -> Result<()> {
    let chips: Vec<(String, String)> = engine
        .configs()
        .iter()
        .filter(|config| !sieveapp::filter::is_empty_value(engine.filter_value(&config.field)))
        .map(|config| {
            (
                config.field.clone(),
                engine.get_filter_display_value(&config.field),
            )
        })
        .collect();
    print!("{}", render::status(&chips));
    println!(
        "{}",
        render::summary(engine.filtered_count(), engine.items().len(), engine.active_filter_count())
    );
    Ok(())
}

fn handle_preset(engine: &mut Engine, action: PresetCommands) -> Result<()> {
    match action {
        PresetCommands::Save { name, description } => {
            let preset = engine.save_preset(name, description);
            eprintln!(
                "{}",
                render::success(&format!("Saved preset {} ({})", preset.name, preset.id))
            );
        }
        PresetCommands::Load { id } => {
            if !engine.load_preset(&id) {
                return Err(SieveError::PresetNotFound(id).into());
            }
            eprintln!("{}", render::success(&format!("Loaded preset {}", id)));
            eprintln!(
                "{}",
                render::summary(engine.filtered_count(), engine.items().len(), engine.active_filter_count())
            );
        }
        PresetCommands::Update {
            id,
            name,
            description,
        } => {
            let updates = PresetUpdate {
                name,
                description: description.map(|d| Some(d).filter(|d| !d.is_empty())),
                filters: None,
            };
            if updates.is_empty() {
                bail!("Nothing to update: pass --name or --description");
            }
            if !engine.update_preset(&id, updates) {
                return Err(SieveError::PresetNotFound(id).into());
            }
            eprintln!("{}", render::success(&format!("Updated preset {}", id)));
        }
        PresetCommands::Delete { id } => {
            if !engine.delete_preset(&id) {
                return Err(SieveError::PresetNotFound(id).into());
            }
            eprintln!("{}", render::success(&format!("Deleted preset {}", id)));
        }
        PresetCommands::List => print!("{}", render::preset_list(engine.presets())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sieveapp::FilterKind;

    #[test]
    fn value_args_are_json_or_bare_strings() {
        assert_eq!(parse_value_arg("true"), json!(true));
        assert_eq!(parse_value_arg("[3.0, 4.0]"), json!([3.0, 4.0]));
        assert_eq!(parse_value_arg("[\"D1\",\"D2\"]"), json!(["D1", "D2"]));
        assert_eq!(parse_value_arg("OH"), json!("OH"));
        assert_eq!(parse_value_arg("\"42\""), json!("42"));
        assert_eq!(parse_value_arg("42"), json!(42));
    }

    #[test]
    fn filters_file_parses_kinds_and_defaults() {
        let raw = r#"
            [[filters]]
            field = "location"
            type = "text"

            [[filters]]
            field = "division"
            type = "multiselect"
            default_value = []
            options = [
                { value = "D1", label = "Division I" },
                { value = "D2", label = "Division II" },
            ]

            [[filters]]
            field = "scholarship"
            type = "range"
        "#;
        let configs = parse_filters(raw).unwrap();
        assert_eq!(configs.len(), 3);
        assert_eq!(configs[0].kind, FilterKind::Text);
        assert_eq!(configs[1].kind, FilterKind::Multiselect);
        assert_eq!(configs[1].default_value(), json!([]));
        assert_eq!(configs[1].option_label(&json!("D2")), Some("Division II"));
        assert_eq!(configs[2].kind, FilterKind::Range);
    }

    #[test]
    fn empty_filters_file_is_no_filters() {
        assert!(parse_filters("").unwrap().is_empty());
    }

    #[test]
    fn records_must_be_an_array() {
        assert_eq!(parse_items("[{\"a\": 1}]").unwrap().len(), 1);
        assert!(parse_items("{\"a\": 1}").is_err());
        assert!(parse_items("not json").is_err());
    }

    #[test]
    fn explicit_data_dir_wins() {
        let dir = PathBuf::from("/tmp/sieve-state");
        assert_eq!(resolve_data_dir(Some(dir.clone())), dir);
    }
}
