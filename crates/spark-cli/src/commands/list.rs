//! Implementation of the `spark list` command.

use serde::Serialize;
use spark_adapters::{BuiltinCatalog, DirectoryCatalog};
use spark_core::application::GeneratorCatalog;

use crate::{
    cli::{ListArgs, ListFormat, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    project,
};

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorRow {
    pub name: String,
    /// `project` or `built-in`.
    pub source: &'static str,
    pub templates: usize,
}

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let root = project::resolve_root(args.project.as_deref())?;
    let rows = collect(
        &DirectoryCatalog::new(root.join(&config.generator.templates_dir)),
        &BuiltinCatalog::new(),
    )?;

    // `--output-format json` implies a JSON listing.
    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            output.header("Available Generators:")?;
            for row in &rows {
                output.print(&format!(
                    "  {:<16} {:<9} ({} template{})",
                    row.name,
                    row.source,
                    row.templates,
                    if row.templates == 1 { "" } else { "s" }
                ))?;
            }
        }
        ListFormat::Json => output.json(&rows)?,
        ListFormat::List => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
        ListFormat::Csv => {
            println!("name,source,templates");
            for row in &rows {
                println!("{},{},{}", row.name, row.source, row.templates);
            }
        }
    }

    Ok(())
}

/// Merge both layers; a project kind hides the built-in of the same name.
fn collect(
    project: &dyn GeneratorCatalog,
    builtin: &dyn GeneratorCatalog,
) -> CliResult<Vec<GeneratorRow>> {
    let mut rows: Vec<GeneratorRow> = Vec::new();

    for (catalog, source) in [(project, "project"), (builtin, "built-in")] {
        for kind in catalog.kinds()? {
            if rows.iter().any(|row| row.name == kind) {
                continue;
            }
            let templates = catalog
                .load(&kind)?
                .map(|spec| spec.templates.len())
                .unwrap_or_default();
            rows.push(GeneratorRow {
                name: kind,
                source,
                templates,
            });
        }
    }

    rows.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(rows)
}
