//! Output formatting for the CLI.
//!
//! Functions here return strings; handlers decide whether they go to stdout
//! or stderr. `console` drops the styling when the stream is not a terminal,
//! so piped output stays plain.

use console::style;
use sieveapp::FilterPreset;

pub fn success(message: &str) -> String {
    style(message).green().to_string()
}

pub fn field_set(field: &str, display: &str) -> String {
    if display.is_empty() {
        format!("{} cleared", style(field).bold())
    } else {
        format!("{} = {}", style(field).bold(), display)
    }
}

/// `Showing 2 of 3 records (1 active filter)`
pub fn summary(shown: usize, total: usize, active: usize) -> String {
    let filters = match active {
        0 => "no active filters".to_string(),
        1 => "1 active filter".to_string(),
        n => format!("{} active filters", n),
    };
    format!(
        "Showing {} of {} records ({})",
        shown,
        total,
        style(filters).dim()
    )
}

/// One `field: value` chip per line, or a placeholder when nothing is active.
pub fn status(chips: &[(String, String)]) -> String {
    if chips.is_empty() {
        return format!("{}\n", style("No active filters").dim());
    }
    let width = chips.iter().map(|(field, _)| field.len()).max().unwrap_or(0);
    chips
        .iter()
        .map(|(field, value)| {
            format!(
                "{}: {}\n",
                style(format!("{:<width$}", field, width = width)).bold(),
                style(value).cyan()
            )
        })
        .collect()
}

pub fn preset_list(presets: &[FilterPreset]) -> String {
    if presets.is_empty() {
        return format!("{}\n", style("No presets saved.").dim());
    }
    presets
        .iter()
        .map(|preset| {
            let mut line = format!(
                "{}  {}  {}",
                style(&preset.id).yellow(),
                style(&preset.name).bold(),
                style(preset.created_at.format("%Y-%m-%d")).dim()
            );
            if let Some(description) = &preset.description {
                line.push_str(&format!("  {}", description));
            }
            line.push('\n');
            line
        })
        .collect()
}
