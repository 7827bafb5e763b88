//! Command-line surface of `spark`, declared with clap's derive API.
//!
//! Parsing only: handlers in `crate::commands` receive these structs as-is.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use spark_core::domain::CaseStyle;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "spark",
    bin_name = "spark",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} React Native app scaffolding and generators",
    long_about = "Spark creates React Native apps from a boilerplate and \
                  generates components, screens and navigators into them.",
    after_help = "EXAMPLES:\n\
        \x20 spark new PizzaApp --boilerplate ./boilerplate\n\
        \x20 spark generate component UserAvatar\n\
        \x20 spark g screen Settings --case kebab\n\
        \x20 spark list\n\
        \x20 spark completions bash > /usr/share/bash-completion/completions/spark",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate files from a generator's templates.
    #[command(
        visible_alias = "g",
        about = "Generate files into an existing app",
        after_help = "EXAMPLES:\n\
            \x20 spark generate component UserAvatar\n\
            \x20 spark generate screen forms/Checkout --dir app/flows\n\
            \x20 spark generate navigator Main --var type=tabs\n\
            \x20 spark generate component Button --update"
    )]
    Generate(GenerateArgs),

    /// List available generators.
    #[command(
        visible_alias = "ls",
        about = "List available generators",
        after_help = "EXAMPLES:\n\
            \x20 spark list\n\
            \x20 spark list --format json"
    )]
    List(ListArgs),

    /// Create a new app from a boilerplate.
    #[command(
        visible_alias = "n",
        about = "Create a new app",
        after_help = "EXAMPLES:\n\
            \x20 spark new PizzaApp --boilerplate ./boilerplate\n\
            \x20 spark new PizzaApp --dry-run"
    )]
    New(NewArgs),

    /// Initialise a Spark configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 spark init           # global config\n\
            \x20 spark init --local   # .spark.toml in CWD"
    )]
    Init(InitArgs),

    /// Manage the Spark configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 spark config get generator.default_case\n\
            \x20 spark config set generator.default_case kebab\n\
            \x20 spark config list"
    )]
    Config(ConfigCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 spark completions bash > ~/.local/share/bash-completion/completions/spark\n\
            \x20 spark completions zsh  > ~/.zfunc/_spark\n\
            \x20 spark completions fish > ~/.config/fish/completions/spark.fish"
    )]
    Completions(CompletionsArgs),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `spark generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Generator kind, e.g. `component`.
    #[arg(value_name = "KIND", help = "Generator kind (see `spark list`)")]
    pub kind: String,

    /// Subject name. Leading `/`-separated segments become subdirectories.
    #[arg(value_name = "NAME", help = "Name of the thing to generate")]
    pub name: String,

    /// Output directory relative to the project root.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        help = "Output directory (replaces the template's dir)"
    )]
    pub dir: Option<String>,

    /// Filename casing.
    #[arg(
        long = "case",
        value_name = "STYLE",
        value_parser = parse_case,
        help = "Filename casing: auto, pascal, camel, kebab, snake or none"
    )]
    pub case: Option<CaseStyle>,

    /// Overwrite files that already exist.
    #[arg(short = 'u', long = "update", help = "Overwrite existing files")]
    pub update: bool,

    /// Extra template variable, exposed as `vars.KEY`.
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        value_parser = parse_var,
        help = "Template variable (repeatable)"
    )]
    pub vars: Vec<(String, String)>,

    /// Project root. Defaults to the nearest directory with a package.json.
    #[arg(long = "project", value_name = "PATH", help = "Project root")]
    pub project: Option<PathBuf>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `spark list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,

    /// Project root. Defaults to the nearest directory with a package.json.
    #[arg(long = "project", value_name = "PATH", help = "Project root")]
    pub project: Option<PathBuf>,
}

/// Rendering of `spark list`, independent of `--output-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `spark new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// App name; the app is created in `./NAME`.
    #[arg(value_name = "NAME", help = "App name")]
    pub name: String,

    /// Boilerplate directory to copy.
    #[arg(
        short = 'b',
        long = "boilerplate",
        value_name = "DIR",
        help = "Boilerplate directory (default: new.boilerplate_dir)"
    )]
    pub boilerplate: Option<PathBuf>,

    /// Create without asking.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Replace an existing directory (destructive).
    #[arg(
        long = "overwrite",
        help = "Replace an existing directory (kept and restored if creation fails)"
    )]
    pub overwrite: bool,

    /// List the files the app would get and stop.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `spark init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to the global config location.
    #[arg(
        long = "global",
        conflicts_with = "local",
        help = "Create global configuration"
    )]
    pub global: bool,

    /// Write to `.spark.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Replace a config file that already exists.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `spark completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `spark config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one value, e.g. `generator.default_case`.
    Get {
        /// Dotted key path, e.g. `generator.default_case`.
        key: String,
    },
    /// Validate and store a value in the active config file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print every known key with its effective value.
    List,
    /// Print which file `set` would edit.
    Path,
}

// ── value parsers ─────────────────────────────────────────────────────────────

fn parse_case(value: &str) -> Result<CaseStyle, String> {
    value.parse::<CaseStyle>().map_err(|e| e.to_string())
}

fn parse_var(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, val)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), val.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{value}'")),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
