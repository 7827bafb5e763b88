//! Implementation of the `spark new` command.
//!
//! Responsibility: pick the boilerplate and destination, confirm, call the
//! core boilerplate service, and display results.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use spark_adapters::{DirectoryBoilerplate, LocalFilesystem};
use spark_core::application::{BoilerplateOptions, BoilerplateService};
use spark_core::domain::{AppName, FsEntry, ProjectStructure};
use spark_core::error::SparkError;
use tracing::{debug, info, instrument};

use crate::{
    cli::{GlobalArgs, NewArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `spark new` command.
///
/// 1. Validate the app name and resolve the boilerplate directory
/// 2. Confirm with the user unless `--yes`, `--quiet` or `--dry-run`
/// 3. Create (or plan) the app through `BoilerplateService`
/// 4. Print next steps
#[instrument(skip_all, fields(app = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let name = AppName::parse(&args.name).map_err(SparkError::from)?;
    let boilerplate = resolve_boilerplate(args.boilerplate.as_deref(), &config)?;
    let cwd = std::env::current_dir().with_cli_context(|| "reading the current directory")?;
    let destination = cwd.join(&args.name);

    debug!(
        boilerplate = %boilerplate.display(),
        destination = %destination.display(),
        "New app resolved"
    );

    if !args.yes && !global.quiet && !args.dry_run {
        show_plan(&name, &boilerplate, &destination, args.overwrite, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    let service = BoilerplateService::new(
        Box::new(DirectoryBoilerplate::new(&boilerplate)),
        Box::new(LocalFilesystem::new()),
    );
    let options = BoilerplateOptions {
        overwrite: args.overwrite,
        dry_run: args.dry_run,
    };

    if !args.dry_run {
        output.header(&format!("Creating '{}'...", name.pascal()))?;
    }
    let structure = service.create(&args.name, &destination, &options)?;

    if args.dry_run {
        return show_dry_run(&structure, &output);
    }

    info!(entries = structure.entry_count(), "App created");
    output.success(&format!(
        "App '{}' created at {}",
        name.pascal(),
        destination.display()
    ))?;

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", args.name))?;
        output.print("  npm install")?;
        output.print("  npx react-native run-ios   # or run-android")?;
    }

    Ok(())
}

/// `--boilerplate` first, then `new.boilerplate_dir`.
fn resolve_boilerplate(flag: Option<&Path>, config: &AppConfig) -> CliResult<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.new.boilerplate_dir.clone())
        .ok_or(CliError::BoilerplateNotConfigured)
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_plan(
    name: &AppName,
    boilerplate: &Path,
    destination: &Path,
    overwrite: bool,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("New app")?;
    out.print(&format!("  Name:         {}", name.pascal()))?;
    out.print(&format!("  Package:      {}", name.kebab()))?;
    out.print(&format!("  Boilerplate:  {}", boilerplate.display()))?;
    out.print(&format!("  Location:     {}", destination.display()))?;
    if overwrite {
        out.warning("An existing directory at this location will be replaced")?;
    }
    out.print("")?;
    Ok(())
}

fn show_dry_run(structure: &ProjectStructure, out: &OutputManager) -> CliResult<()> {
    out.info(&format!(
        "Dry run: would create {} entries at {}",
        structure.entry_count(),
        structure.root.display()
    ))?;
    for entry in &structure.entries {
        let marker = match entry {
            FsEntry::Directory(_) => "dir ",
            FsEntry::File(_) => "file",
        };
        out.print(&format!("  {marker}  {}", entry.path().display()))?;
    }
    Ok(())
}

/// Ask before writing. Without a terminal on stdin there is nobody to ask.
#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    if !std::io::stdin().is_terminal() {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    if !io::stdin().is_terminal() {
        return Ok(true);
    }

    print!("Continue? [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}
