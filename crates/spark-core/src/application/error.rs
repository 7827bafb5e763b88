//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Filesystem failure classes the orchestrator and CLI tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FsErrorKind {
    NotFound,
    PermissionDenied,
    IsADirectory,
    AlreadyExists,
    Other,
}

impl From<io::ErrorKind> for FsErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::IsADirectory => Self::IsADirectory,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for FsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "not found",
            Self::PermissionDenied => "permission denied",
            Self::IsADirectory => "is a directory",
            Self::AlreadyExists => "already exists",
            Self::Other => "I/O error",
        })
    }
}

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No generator of that kind in the catalog.
    #[error("Unknown generator '{kind}'")]
    UnknownGenerator { kind: String, available: Vec<String> },

    /// A file could not be written.
    #[error("Failed to write {path} ({kind}): {reason}")]
    WriteFailure {
        path: PathBuf,
        kind: FsErrorKind,
        reason: String,
    },

    /// A file or directory could not be read.
    #[error("Failed to read {path} ({kind}): {reason}")]
    ReadFailure {
        path: PathBuf,
        kind: FsErrorKind,
        reason: String,
    },

    /// The generator catalog could not be enumerated.
    #[error("Generator catalog error: {reason}")]
    CatalogError { reason: String },

    /// `spark new` target already exists.
    #[error("Destination already exists: {path}")]
    DestinationExists { path: PathBuf },

    /// Store access failed (lock poisoned, etc.).
    #[error("Filesystem store lock poisoned")]
    StoreLockError,

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    pub fn write(path: impl Into<PathBuf>, error: &io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            kind: error.kind().into(),
            reason: error.to_string(),
        }
    }

    pub fn read(path: impl Into<PathBuf>, error: &io::Error) -> Self {
        Self::ReadFailure {
            path: path.into(),
            kind: error.kind().into(),
            reason: error.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownGenerator { available, .. } if available.is_empty() => vec![
                "No generators are available".into(),
                "Add templates under spark/templates/<kind>/ in your project".into(),
            ],
            Self::UnknownGenerator { available, .. } => vec![
                format!("Available generators: {}", available.join(", ")),
                "Try: spark list".into(),
            ],
            Self::WriteFailure { path, kind, .. } => match kind {
                FsErrorKind::IsADirectory => vec![
                    format!("A directory already occupies {}", path.display()),
                    "Move it away or choose another name".into(),
                ],
                FsErrorKind::PermissionDenied => vec![
                    format!("No write permission for {}", path.display()),
                    "Check the ownership of the target directory".into(),
                ],
                _ => vec![
                    format!("Failed to write: {}", path.display()),
                    "Check that you have write permissions".into(),
                    "Ensure there is free disk space".into(),
                ],
            },
            Self::ReadFailure { path, .. } => vec![
                format!("Failed to read: {}", path.display()),
                "Check that the path exists and is readable".into(),
            ],
            Self::CatalogError { .. } => vec![
                "Check the templates directory configured under generator.templates_dir".into(),
            ],
            Self::StoreLockError => vec![
                "The in-memory filesystem lock was poisoned".into(),
                "Try again".into(),
            ],
            Self::DestinationExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --overwrite to replace it (destructive)".into(),
                "Choose a different app name".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![
                format!("Partial output may remain at {}", path.display()),
                "Remove it manually before retrying".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownGenerator { .. } | Self::DestinationExists { .. } => {
                ErrorCategory::Validation
            }
            Self::ReadFailure {
                kind: FsErrorKind::NotFound,
                ..
            } => ErrorCategory::NotFound,
            Self::CatalogError { .. } => ErrorCategory::Configuration,
            Self::WriteFailure { .. }
            | Self::ReadFailure { .. }
            | Self::StoreLockError
            | Self::RollbackFailed { .. } => ErrorCategory::Internal,
        }
    }
}
