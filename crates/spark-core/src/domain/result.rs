//! Outcome of one generator invocation.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::error::DomainError;

/// What happened to one template's output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    Created,
    SkippedExists,
    Overwritten,
    Failed,
}

impl FileStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::SkippedExists => "skipped-exists",
            Self::Overwritten => "overwritten",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable reason for a `failed` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    MalformedFrontmatter,
    UndefinedTemplateVariable,
    TemplateSyntax,
    InvalidCaseStyle,
    PathEscape,
    DuplicateOutputPath,
    WriteFailure,
    Internal,
}

impl From<&DomainError> for FailureKind {
    fn from(error: &DomainError) -> Self {
        match error {
            DomainError::MalformedFrontmatter { .. } => Self::MalformedFrontmatter,
            DomainError::UndefinedTemplateVariable { .. } => Self::UndefinedTemplateVariable,
            DomainError::TemplateSyntax { .. } => Self::TemplateSyntax,
            DomainError::InvalidCaseStyle { .. } => Self::InvalidCaseStyle,
            DomainError::PathEscape { .. } => Self::PathEscape,
            DomainError::DuplicateOutputPath { .. } => Self::DuplicateOutputPath,
            _ => Self::Internal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

/// One row of a [`GenerationResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationEntry {
    /// Template the entry came from.
    pub template: String,
    /// Target path relative to the project root, when it got that far.
    pub path: Option<PathBuf>,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl GenerationEntry {
    pub fn new(template: impl Into<String>, path: impl Into<PathBuf>, status: FileStatus) -> Self {
        Self {
            template: template.into(),
            path: Some(path.into()),
            status,
            failure: None,
        }
    }

    pub fn failed(
        template: impl Into<String>,
        path: Option<PathBuf>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            template: template.into(),
            path,
            status: FileStatus::Failed,
            failure: Some(Failure {
                kind,
                message: message.into(),
            }),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(|f| f.kind)
    }
}

/// Per-status counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub created: usize,
    pub skipped: usize,
    pub overwritten: usize,
    pub failed: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} skipped, {} overwritten, {} failed",
            self.created, self.skipped, self.overwritten, self.failed
        )
    }
}

/// Every file outcome of one `run`, in template order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub generator: String,
    pub subject: String,
    pub entries: Vec<GenerationEntry>,
}

impl GenerationResult {
    pub fn new(generator: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            generator: generator.into(),
            subject: subject.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: GenerationEntry) {
        self.entries.push(entry);
    }

    /// True iff no entry failed.
    pub fn is_success(&self) -> bool {
        self.entries.iter().all(|e| e.status != FileStatus::Failed)
    }

    pub fn has_failure(&self, kind: FailureKind) -> bool {
        self.entries.iter().any(|e| e.failure_kind() == Some(kind))
    }

    pub fn with_status(&self, status: FileStatus) -> impl Iterator<Item = &GenerationEntry> {
        self.entries.iter().filter(move |e| e.status == status)
    }

    pub fn summary(&self) -> Summary {
        self.entries
            .iter()
            .fold(Summary::default(), |mut summary, entry| {
                match entry.status {
                    FileStatus::Created => summary.created += 1,
                    FileStatus::SkippedExists => summary.skipped += 1,
                    FileStatus::Overwritten => summary.overwritten += 1,
                    FileStatus::Failed => summary.failed += 1,
                }
                summary
            })
    }
}
