//! Astral-style CLI output formatting.
//!
//! Provides consistent terminal output with support for JSON mode (for
//! scripting), quiet mode, and verbosity levels. Colors go through
//! `if_supports_color`, so `--color` and non-terminal output are honoured.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::{OwoColorize, Stream};
use serde_json::json;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Verbosity level (0 = normal, 1+ = increasingly verbose).
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn write_config(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Check if regular (non-JSON) output should be suppressed.
fn regular_output_suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

/// Emit a JSON line with type and payload structure.
fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!(
        "{}",
        json!({
            "type": kind,
            "payload": payload,
        })
    );
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    write_config(config);
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Return the global verbosity level from `-v` flags.
#[must_use]
pub fn verbosity() -> u8 {
    read_config().verbose
}

/// Print the application header with name and version.
pub fn header(version: &str) {
    let config = read_config();
    if config.json || regular_output_suppressed(config) {
        return;
    }

    println!(
        "{} {}",
        "kubetools".if_supports_color(Stream::Stdout, |t| t.bold()),
        version.if_supports_color(Stream::Stdout, |t| t.dimmed())
    );
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();

    if config.json {
        emit_json_line(
            "field",
            json!({
                "label": label,
                "value": value,
            }),
        );
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!(
        "  {:<12} {}",
        label.if_supports_color(Stream::Stdout, |t| t.dimmed()),
        value
    );
}

/// Print a success line.
pub fn success(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!(
        "  {} {}",
        "✓".if_supports_color(Stream::Stdout, |t| t.green()),
        message
    );
}

/// Print a warning line.
pub fn warning(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }

    println!(
        "  {} {}",
        "⚠".if_supports_color(Stream::Stdout, |t| t.yellow()),
        message
    );
}

/// Print a problem line on stdout (a reported finding, not a failure of the tool).
pub fn problem(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("problem", json!({ "message": message }));
        return;
    }

    println!(
        "  {} {}",
        "×".if_supports_color(Stream::Stdout, |t| t.red()),
        message
    );
}

/// Print an error line.
pub fn error(message: &str) {
    let config = read_config();

    if config.json {
        eprintln!(
            "{}",
            json!({
                "type": "error",
                "payload": { "message": message },
            })
        );
        return;
    }

    eprintln!(
        "  {} {}",
        "×".if_supports_color(Stream::Stderr, |t| t.red()),
        message
    );
}

/// Print a section header.
pub fn section(title: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!();
    println!("{}", title.if_supports_color(Stream::Stdout, |t| t.bold()));
}

/// Print a note.
pub fn note(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("note", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!(
        "  {}",
        message.if_supports_color(Stream::Stdout, |t| t.dimmed())
    );
}

/// Print a hint with "hint:" prefix.
pub fn hint(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("hint", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!(
        "  {}: {}",
        "hint".if_supports_color(Stream::Stdout, |t| t.cyan()),
        message.if_supports_color(Stream::Stdout, |t| t.dimmed())
    );
}

/// Print multiple lines of content, each indented.
pub fn lines(content: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("lines", json!({ "content": content }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    for line in content.lines() {
        println!("  {}", line);
    }
}

/// Emit a JSON value directly (for commands that need custom JSON output).
pub fn json_output(value: serde_json::Value) {
    println!("{}", value);
}

/// Write data (manifests) to stdout verbatim. Never suppressed.
pub fn raw(content: &str) {
    print!("{content}");
}
