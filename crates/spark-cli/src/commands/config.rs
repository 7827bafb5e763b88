//! `spark config`: read and write configuration values.

use std::path::Path;

use crate::{
    cli::ConfigCommands,
    config::{self, AppConfig, KNOWN_KEYS},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
///
/// `explicit` is the `--config` path, if any; `set` edits that file.
pub fn execute(
    cmd: ConfigCommands,
    explicit: Option<&Path>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key)?;
            println!("{value}");
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::active_path(explicit);
            set_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            for key in KNOWN_KEYS {
                output.print(&format!("  {key} = {:?}", config.get(key)?))?;
            }
        }

        ConfigCommands::Path => {
            println!("{}", AppConfig::active_path(explicit).display());
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Rewrite `path` with `key` set, creating the file if needed.
fn set_value(path: &Path, key: &str, value: &str) -> CliResult<()> {
    let existing = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(CliError::ConfigError {
                message: format!("failed to read {}", path.display()),
                source: Some(Box::new(e)),
            });
        }
    };

    let updated = config::set_in_document(&existing, key, value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(path, updated)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))
}

// ── tests ─────────────────────────────────────────────────────────────────────
