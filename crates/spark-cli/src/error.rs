//! Errors surfaced by the `spark` binary.
//!
//! Every [`CliError`] carries a category that decides both its exit code and
//! the log level it is reported at, plus a list of hints printed under the
//! message.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use spark_core::error::SparkError;

pub use spark_core::error::ErrorCategory as CoreCategory;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// `--project` points somewhere that does not exist.
    #[error("Project directory not found: {path}")]
    ProjectNotFound { path: PathBuf },

    /// `spark new` has no boilerplate to copy.
    #[error("No boilerplate directory configured")]
    BoilerplateNotConfigured,

    /// Some files of a generator run failed; the rest were written.
    #[error("{failed} of {total} files failed for {generator} '{subject}'")]
    GenerationFailed {
        generator: String,
        subject: String,
        failed: usize,
        total: usize,
        /// At least one target resolved outside the project root.
        path_escape: bool,
    },

    /// Bad config file, unknown key or rejected value.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    #[error(transparent)]
    Core(#[from] SparkError),

    /// Terminal or config-file I/O outside the core services.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The user answered "no" at the `spark new` prompt.
    #[error("Cancelled, nothing was written")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectNotFound { path } => vec![
                format!("'{}' does not exist", path.display()),
                "Pass the directory that contains your app's package.json".into(),
            ],

            Self::BoilerplateNotConfigured => vec![
                "Pass --boilerplate <DIR>".into(),
                "Or set it once: spark config set new.boilerplate_dir <DIR>".into(),
            ],

            Self::GenerationFailed { path_escape, .. } => {
                let mut suggestions = vec!["Files listed as failed were not written".into()];
                if *path_escape {
                    suggestions.push("Keep --dir and the name inside the project".into());
                }
                suggestions.push("Fix the template and re-run; existing files are skipped".into());
                suggestions
            }

            Self::ConfigError { .. } => vec![
                "Run 'spark config path' to see which file is in use".into(),
                "Run 'spark config list' for the accepted keys".into(),
                "'spark init --force' rewrites the file with defaults".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { .. } => {
                vec!["Check that the directory is writable by the current user".into()]
            }

            Self::Cancelled => vec!["Re-run with --yes to skip the prompt".into()],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectNotFound { .. } => ErrorCategory::NotFound,
            Self::BoilerplateNotConfigured => ErrorCategory::Configuration,
            Self::GenerationFailed { path_escape, .. } => {
                if *path_escape {
                    ErrorCategory::UserError
                } else {
                    ErrorCategory::Internal
                }
            }
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Template => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Cancelled => ErrorCategory::UserError,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Message, causes (verbose only) and hints, styled for a terminal.
    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, true)
    }

    /// Same layout as [`Self::format_colored`] with no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, false)
    }

    fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: &str, style: fn(&str) -> String| {
            if color { style(text) } else { text.to_owned() }
        };

        let mut out = format!(
            "\n{} {}\n",
            paint("Error:", |t| t.red().bold().to_string()),
            paint(&self.to_string(), |t| t.red().to_string()),
        );

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                out.push_str(&format!(
                    "  {}\n",
                    paint(&format!("Caused by: {err}"), |t| t.dimmed().to_string())
                ));
                cause = err.source();
            }
        }

        let hints = self.suggestions();
        if !hints.is_empty() {
            out.push_str(&format!(
                "\n{}\n",
                paint("Suggestions:", |t| t.yellow().bold().to_string())
            ));
            for hint in hints {
                out.push_str(&format!("  {hint}\n"));
            }
        }

        if !verbose {
            out.push_str(&format!(
                "\n{}\n",
                paint("Use -v / --verbose for more details.", |t| t.dimmed().to_string())
            ));
        }

        out
    }

    /// Report through `tracing` at a level matching the category.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!(error = %self, "user error"),
            ErrorCategory::NotFound => tracing::warn!(error = %self, "not found"),
            ErrorCategory::Configuration => tracing::error!(error = %self, "configuration error"),
            ErrorCategory::Internal => tracing::error!(error = %self, "internal error"),
        }

        if let Some(source) = self.source() {
            tracing::debug!(cause = %source, "caused by");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}

/// Attach a message to an `io::Error` while turning it into a [`CliError`].
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}
