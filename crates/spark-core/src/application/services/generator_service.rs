//! Generator Service - the `spark generate` orchestrator.
//!
//! One `run` goes through these stages:
//! 1. Load the generator spec from the catalog
//! 2. Validate the subject name
//! 3. Plan each template: parse front-matter, render, resolve its path
//! 4. Fail every plan whose path is shared with another plan
//! 5. Write the rest, honouring the collision policy
//!
//! Stage 1 and 2 failures abort the run. Everything after that is recorded
//! per file in the returned [`GenerationResult`].

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::Datelike;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError, FsErrorKind,
        ports::{Filesystem, GeneratorCatalog, TemplateRenderer, WriteMode, WriteOutcome},
    },
    domain::{
        CaseStyle, DomainError, FailureKind, FileStatus, Frontmatter, GenerationEntry,
        GenerationResult, PathRequest, RenderContext, SubjectName, TemplateFile, path,
    },
    error::{SparkError, SparkResult},
};

/// Per-invocation options, usually straight from CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Output directory, replacing any front-matter `dir`.
    pub dir: Option<String>,
    /// Casing, replacing any front-matter `case` unless `auto`.
    pub case: Option<CaseStyle>,
    /// Overwrite existing files instead of skipping them.
    pub update: bool,
    /// Extra template variables, exposed as `vars.<key>`.
    pub vars: BTreeMap<String, String>,
}

/// A rendered file waiting to be written.
#[derive(Debug)]
struct OutputPlan {
    template: String,
    relative: PathBuf,
    absolute: PathBuf,
    content: String,
}

#[derive(Debug)]
struct PlanFailure {
    path: Option<PathBuf>,
    error: SparkError,
}

impl From<DomainError> for PlanFailure {
    fn from(error: DomainError) -> Self {
        Self {
            path: None,
            error: error.into(),
        }
    }
}

/// Generator orchestrator.
pub struct GeneratorService {
    catalog: Box<dyn GeneratorCatalog>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    project_root: PathBuf,
}

impl GeneratorService {
    /// Create a generator service writing below `project_root`.
    pub fn new(
        catalog: Box<dyn GeneratorCatalog>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            renderer,
            filesystem,
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Every generator kind, sorted, for help text.
    pub fn list_generators(&self) -> SparkResult<Vec<String>> {
        let mut kinds = self.catalog.kinds()?;
        kinds.sort();
        kinds.dedup();
        Ok(kinds)
    }

    /// Generate every file of `kind` for `subject`.
    ///
    /// # Errors
    ///
    /// Only request-level problems are errors: an unknown kind, an invalid
    /// subject name or an unreadable catalog. Per-file problems are entries
    /// with [`FileStatus::Failed`].
    #[instrument(skip_all, fields(kind = %kind, subject = %subject, update = options.update))]
    pub fn run(
        &self,
        kind: &str,
        subject: &str,
        options: &GenerateOptions,
    ) -> SparkResult<GenerationResult> {
        let Some(spec) = self.catalog.load(kind)? else {
            return Err(ApplicationError::UnknownGenerator {
                kind: kind.to_string(),
                available: self.list_generators()?,
            }
            .into());
        };
        let subject = SubjectName::parse(subject)?;
        info!(templates = spec.templates.len(), "Generator loaded");

        let base = RenderContext::for_subject(&spec.kind, &subject)?
            .with("year", chrono::Local::now().year().to_string())
            .with("vars", &options.vars);

        let plans: Vec<Result<OutputPlan, PlanFailure>> = spec
            .templates
            .iter()
            .map(|template| self.plan(&spec.kind, template, &subject, &base, options))
            .collect();

        let duplicated = duplicated_paths(&plans);
        let mut result = GenerationResult::new(&spec.kind, subject.raw());

        for (template, planned) in spec.templates.iter().zip(plans) {
            let entry = match planned {
                Err(failure) => {
                    warn!(template = %template.name, error = %failure.error, "Template failed");
                    GenerationEntry::failed(
                        &template.name,
                        failure.path,
                        failure.error.failure_kind(),
                        failure.error.to_string(),
                    )
                }
                Ok(plan) if duplicated.contains_key(&plan.relative) => {
                    let error = DomainError::DuplicateOutputPath {
                        path: plan.relative.display().to_string(),
                    };
                    warn!(template = %plan.template, path = %plan.relative.display(), "Duplicate output path");
                    GenerationEntry::failed(
                        plan.template,
                        Some(plan.relative),
                        FailureKind::DuplicateOutputPath,
                        error.to_string(),
                    )
                }
                Ok(plan) => self.write(plan, options.update),
            };
            result.push(entry);
        }

        info!(summary = %result.summary(), "Generation finished");
        Ok(result)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Parse, render and place one template.
    fn plan(
        &self,
        generator: &str,
        template: &TemplateFile,
        subject: &SubjectName,
        base: &RenderContext,
        options: &GenerateOptions,
    ) -> Result<OutputPlan, PlanFailure> {
        let (frontmatter, body) = template.parse()?;
        let style = resolve_style(options.case, &frontmatter)?;

        let stem = subject.cased_leaf(style)?;
        let subdirectory = subject.cased_subdirectory(style)?;
        let context = base
            .clone()
            .with("filename", stem.as_str())
            .with("subdirectory", subdirectory.as_str())
            .with("frontmatter", &frontmatter);

        let frontmatter_dir = frontmatter
            .dir()
            .map(|dir| self.renderer.render(&template.name, dir, &context))
            .transpose()?;
        let frontmatter_filename = frontmatter
            .filename()
            .map(|name| self.renderer.render(&template.name, name, &context))
            .transpose()?;

        let resolved = path::resolve(
            &self.project_root,
            &PathRequest {
                generator,
                template: &template.name,
                subject,
                filename_stem: &stem,
                subdirectory: &subdirectory,
                dir_override: options.dir.as_deref(),
                frontmatter_dir: frontmatter_dir.as_deref(),
                frontmatter_filename: frontmatter_filename.as_deref(),
            },
        )?;
        debug!(template = %template.name, path = %resolved.relative.display(), %style, "Resolved output path");

        let content = self
            .renderer
            .render(&template.name, &body, &context)
            .map_err(|e| PlanFailure {
                path: Some(resolved.relative.clone()),
                error: e.into(),
            })?;

        Ok(OutputPlan {
            template: template.name.clone(),
            relative: resolved.relative,
            absolute: resolved.absolute,
            content,
        })
    }

    /// Apply the collision policy and write one plan.
    fn write(&self, plan: OutputPlan, update: bool) -> GenerationEntry {
        if self.filesystem.is_dir(&plan.absolute) {
            let error: SparkError = ApplicationError::WriteFailure {
                path: plan.absolute.clone(),
                kind: FsErrorKind::IsADirectory,
                reason: "a directory occupies the target path".into(),
            }
            .into();
            warn!(path = %plan.absolute.display(), "Target is a directory");
            return GenerationEntry::failed(
                plan.template,
                Some(plan.relative),
                error.failure_kind(),
                error.to_string(),
            );
        }

        let mode = if update {
            WriteMode::Overwrite
        } else {
            WriteMode::CreateNew
        };

        match self
            .filesystem
            .write_file(&plan.absolute, plan.content.as_bytes(), mode)
        {
            Ok(outcome) => {
                let status = match outcome {
                    WriteOutcome::Created => FileStatus::Created,
                    WriteOutcome::Overwritten => FileStatus::Overwritten,
                    WriteOutcome::AlreadyExists => FileStatus::SkippedExists,
                };
                debug!(path = %plan.relative.display(), %status, "Wrote file");
                GenerationEntry::new(plan.template, plan.relative, status)
            }
            Err(error) => {
                warn!(path = %plan.absolute.display(), error = %error, "Write failed");
                GenerationEntry::failed(
                    plan.template,
                    Some(plan.relative),
                    error.failure_kind(),
                    error.to_string(),
                )
            }
        }
    }
}

/// CLI casing wins unless it is `auto`, which defers to the template.
fn resolve_style(
    requested: Option<CaseStyle>,
    frontmatter: &Frontmatter,
) -> Result<CaseStyle, DomainError> {
    match requested {
        Some(style) if style != CaseStyle::Auto => Ok(style),
        _ => Ok(CaseStyle::Auto.resolve(frontmatter.case()?)),
    }
}

fn duplicated_paths(plans: &[Result<OutputPlan, PlanFailure>]) -> HashMap<PathBuf, usize> {
    let mut counts: HashMap<PathBuf, usize> = HashMap::new();
    for plan in plans.iter().flatten() {
        *counts.entry(plan.relative.clone()).or_default() += 1;
    }
    counts.retain(|_, count| *count > 1);
    counts
}
