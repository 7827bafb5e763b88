//! Implementation of the `spark generate` command.
//!
//! Translates flags into [`GenerateOptions`], runs the generator and prints
//! one line per file. No generation logic lives here.

use std::collections::BTreeMap;

use spark_core::application::GenerateOptions;
use spark_core::domain::{CaseStyle, FailureKind, GenerationResult};
use tracing::{info, instrument};

use crate::{
    cli::GenerateArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    project,
};

#[instrument(skip_all, fields(kind = %args.kind, name = %args.name))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let root = project::resolve_root(args.project.as_deref())?;
    let options = build_options(&args, &config)?;

    let service = project::generator_service(&root, &config);
    let result = service.run(&args.kind, &args.name, &options)?;

    info!(summary = %result.summary(), "Generator finished");
    output.generation_result(&result)?;

    check(result)
}

fn build_options(args: &GenerateArgs, config: &AppConfig) -> CliResult<GenerateOptions> {
    let case = match args.case {
        Some(case) => case,
        None => config.default_case()?,
    };

    Ok(GenerateOptions {
        dir: args.dir.clone(),
        case: (case != CaseStyle::Auto).then_some(case),
        update: args.update,
        vars: args.vars.iter().cloned().collect::<BTreeMap<_, _>>(),
    })
}

/// A run with any failed file is an error once its report is printed.
fn check(result: GenerationResult) -> CliResult<()> {
    if result.is_success() {
        return Ok(());
    }
    let summary = result.summary();
    Err(CliError::GenerationFailed {
        path_escape: result.has_failure(FailureKind::PathEscape),
        generator: result.generator,
        subject: result.subject,
        failed: summary.failed,
        total: result.entries.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_core::domain::{FileStatus, GenerationEntry};

    fn args(case: Option<CaseStyle>) -> GenerateArgs {
        GenerateArgs {
            kind: "component".into(),
            name: "UserAvatar".into(),
            dir: Some("src/ui".into()),
            case,
            update: true,
            vars: vec![("type".into(), "tabs".into()), ("type".into(), "stack".into())],
            project: None,
        }
    }

    #[test]
    fn flag_case_wins_over_config() {
        let mut config = AppConfig::default();
        config.generator.default_case = "snake".into();

        let options = build_options(&args(Some(CaseStyle::Kebab)), &config).unwrap();
        assert_eq!(options.case, Some(CaseStyle::Kebab));

        let options = build_options(&args(None), &config).unwrap();
        assert_eq!(options.case, Some(CaseStyle::Snake));
    }

    #[test]
    fn auto_case_defers_to_templates() {
        let options = build_options(&args(None), &AppConfig::default()).unwrap();
        assert_eq!(options.case, None);
        assert_eq!(options.dir.as_deref(), Some("src/ui"));
        assert!(options.update);
    }

    #[test]
    fn later_vars_win() {
        let options = build_options(&args(None), &AppConfig::default()).unwrap();
        assert_eq!(options.vars.get("type").map(String::as_str), Some("stack"));
    }

    #[test]
    fn failed_entries_become_an_error() {
        let mut result = GenerationResult::new("component", "X");
        result.push(GenerationEntry::new("a", "a.tsx", FileStatus::Created));
        assert!(check(result.clone()).is_ok());

        result.push(GenerationEntry::failed(
            "b",
            None,
            FailureKind::PathEscape,
            "escapes",
        ));
        match check(result).unwrap_err() {
            CliError::GenerationFailed {
                failed,
                total,
                path_escape,
                ..
            } => {
                assert_eq!((failed, total), (1, 2));
                assert!(path_escape);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
