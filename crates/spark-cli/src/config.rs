//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `SPARK__GENERATOR__DEFAULT_CASE=kebab`
//! 3. Config file: `--config FILE`, or `.spark.toml` in the current
//!    directory over the global file
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use spark_core::domain::CaseStyle;

use crate::error::{CliError, CliResult};

/// Local configuration file name, looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".spark.toml";

/// Environment variable prefix (`SPARK__SECTION__KEY`).
pub const ENV_PREFIX: &str = "SPARK";

/// Every settable key, in display order.
pub const KNOWN_KEYS: &[&str] = &[
    "generator.templates_dir",
    "generator.default_case",
    "new.boilerplate_dir",
    "output.no_color",
    "output.format",
    "log.file",
];

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `spark generate` settings.
    pub generator: GeneratorConfig,
    /// `spark new` settings.
    pub new: NewConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Log file settings.
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Project-local template directory, relative to the project root.
    pub templates_dir: String,
    /// Casing used when `--case` is not given.
    pub default_case: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            templates_dir: spark_adapters::catalog::PROJECT_TEMPLATES_DIR.into(),
            default_case: CaseStyle::Auto.as_str().into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewConfig {
    pub boilerplate_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Also write logs to this file.
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from files and the environment over the defaults.
    ///
    /// `config_file` is the path passed via `--config`; it must exist. Without
    /// it, the global and local files are read when present.
    pub fn load(config_file: Option<&Path>) -> CliResult<Self> {
        let mut builder = Config::builder();

        match config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(CliError::ConfigError {
                        message: format!("config file not found: {}", path.display()),
                        source: None,
                    });
                }
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                builder = builder
                    .add_source(
                        File::from(Self::config_path())
                            .format(FileFormat::Toml)
                            .required(false),
                    )
                    .add_source(
                        File::from(Path::new(LOCAL_CONFIG_FILE))
                            .format(FileFormat::Toml)
                            .required(false),
                    );
            }
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| CliError::ConfigError {
                message: format!("failed to read configuration: {e}"),
                source: Some(Box::new(e)),
            })?;

        let config: Self = settings.try_deserialize().map_err(|e| CliError::ConfigError {
            message: format!("invalid configuration: {e}"),
            source: Some(Box::new(e)),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that deserialize but cannot be used.
    pub fn validate(&self) -> CliResult<()> {
        self.default_case()?;
        if !["auto", "human", "plain", "json"].contains(&self.output.format.as_str()) {
            return Err(CliError::ConfigError {
                message: format!(
                    "output.format must be auto, human, plain or json, got '{}'",
                    self.output.format
                ),
                source: None,
            });
        }
        Ok(())
    }

    /// `generator.default_case` as a [`CaseStyle`].
    pub fn default_case(&self) -> CliResult<CaseStyle> {
        self.generator
            .default_case
            .parse()
            .map_err(|e: spark_core::domain::DomainError| CliError::ConfigError {
                message: format!("generator.default_case: {e}"),
                source: Some(Box::new(e)),
            })
    }

    /// Path to the global configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.spark.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "spark", "spark")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file `config set` edits and `config path` reports.
    pub fn active_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            local
        } else {
            Self::config_path()
        }
    }

    /// Look up a dotted key. Unset optional keys read as an empty string.
    pub fn get(&self, key: &str) -> CliResult<String> {
        if !KNOWN_KEYS.contains(&key) {
            return Err(unknown_key(key));
        }
        let json = serde_json::to_value(self).map_err(|e| CliError::ConfigError {
            message: format!("failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })?;
        let pointer = format!("/{}", key.replace('.', "/"));
        Ok(match json.pointer(&pointer) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
    }
}

/// Set `key` to `value` inside a TOML document, checking the result is a
/// valid configuration.
pub fn set_in_document(document: &str, key: &str, value: &str) -> CliResult<String> {
    let Some((section, field)) = key.split_once('.').filter(|_| KNOWN_KEYS.contains(&key)) else {
        return Err(unknown_key(key));
    };

    let mut table: toml::Table = toml::from_str(document).map_err(|e| CliError::ConfigError {
        message: format!("existing config is not valid TOML: {e}"),
        source: Some(Box::new(e)),
    })?;

    let typed = if key == "output.no_color" {
        let flag = value.parse::<bool>().map_err(|e| CliError::ConfigError {
            message: format!("{key} expects true or false, got '{value}'"),
            source: Some(Box::new(e)),
        })?;
        toml::Value::Boolean(flag)
    } else {
        toml::Value::String(value.to_string())
    };

    let section_table = table
        .entry(section.to_string())
        .or_insert(toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(section_table) = section_table else {
        return Err(CliError::ConfigError {
            message: format!("'{section}' is not a table in the config file"),
            source: None,
        });
    };
    section_table.insert(field.to_string(), typed);

    let config: AppConfig = toml::Value::Table(table.clone())
        .try_into()
        .map_err(|e: toml::de::Error| CliError::ConfigError {
            message: format!("invalid value for {key}: {e}"),
            source: Some(Box::new(e)),
        })?;
    config.validate()?;

    toml::to_string_pretty(&table).map_err(|e| CliError::ConfigError {
        message: format!("failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    }
}
