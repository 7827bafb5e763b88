//! Everything `spark` writes to stdout goes through [`OutputManager`].

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;
use spark_core::domain::{FileStatus, GenerationEntry, GenerationResult};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// The `--output-format` flag wins over `output.format` unless it is
    /// left at `auto`.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = if args.output_format == OutputFormat::Auto {
            parse_format(&config.output.format)
        } else {
            args.output_format
        };

        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    /// Plain line; dropped in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Success, msg)
    }

    /// Always written, even with `--quiet`.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Error, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Info, msg)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        if self.no_color {
            self.term.write_line(text)
        } else {
            self.term.write_line(&text.cyan().bold().to_string())
        }
    }

    fn marked(&self, mark: Mark, msg: &str) -> io::Result<()> {
        if self.quiet && mark != Mark::Error {
            return Ok(());
        }
        self.term.write_line(&mark.render(msg, !self.no_color))
    }

    /// Pretty JSON on stdout. Printed even in quiet mode so pipes still get
    /// a document.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    /// Report every entry of a generator run, then the summary line.
    ///
    /// Failed entries are printed in quiet mode too.
    pub fn generation_result(&self, result: &GenerationResult) -> io::Result<()> {
        if self.resolved_format == OutputFormat::Json {
            return self.json(result);
        }

        for entry in &result.entries {
            if self.quiet && entry.status != FileStatus::Failed {
                continue;
            }
            self.term.write_line(&self.entry_line(entry))?;
        }

        let summary = result.summary().to_string();
        if result.is_success() {
            self.success(&summary)
        } else {
            self.error(&summary)
        }
    }

    fn entry_line(&self, entry: &GenerationEntry) -> String {
        let target = entry
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| entry.template.clone());
        let status = format!("{:>14}", entry.status.as_str());
        let status = if self.no_color {
            status
        } else {
            match entry.status {
                FileStatus::Created => status.green().to_string(),
                FileStatus::Overwritten => status.yellow().to_string(),
                FileStatus::SkippedExists => status.dimmed().to_string(),
                FileStatus::Failed => status.red().bold().to_string(),
            }
        };

        match &entry.failure {
            Some(failure) => format!("{status}  {target}: {}", failure.message),
            None => format!("{status}  {target}"),
        }
    }

    /// Never `Auto`.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Success,
    Error,
    Warning,
    Info,
}

impl Mark {
    fn render(self, msg: &str, color: bool) -> String {
        let symbol = match self {
            Mark::Success => '\u{2713}',
            Mark::Error => '\u{2717}',
            Mark::Warning => '\u{26a0}',
            Mark::Info => '\u{2139}',
        };
        if !color {
            return format!("{symbol} {msg}");
        }
        match self {
            Mark::Success => format!("{} {}", symbol.green().bold(), msg.green()),
            Mark::Error => format!("{} {}", symbol.red().bold(), msg.red()),
            Mark::Warning => format!("{} {}", symbol.yellow().bold(), msg.yellow()),
            Mark::Info => format!("{} {}", symbol.blue().bold(), msg.blue()),
        }
    }
}

/// `output.format` is validated at load time; anything else reads as auto.
fn parse_format(value: &str) -> OutputFormat {
    match value {
        "human" => OutputFormat::Human,
        "plain" => OutputFormat::Plain,
        "json" => OutputFormat::Json,
        _ => OutputFormat::Auto,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
