//! The error type returned by every public service in `spark-core`.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, FailureKind};

#[derive(Debug, Error, Clone)]
pub enum SparkError {
    /// Names, paths and templates that are rejected before any I/O.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Catalog lookups and filesystem calls made through the ports.
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl SparkError {
    /// Hints printed under the message, most specific first.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Template => ErrorCategory::Template,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// Kind recorded on a `failed` result entry caused by this error.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Domain(e) => FailureKind::from(e),
            Self::Application(ApplicationError::WriteFailure { .. }) => FailureKind::WriteFailure,
            Self::Application(_) => FailureKind::Internal,
        }
    }
}

/// Coarse grouping used by front ends to pick exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Template,
    NotFound,
    Configuration,
    Internal,
}

pub type SparkResult<T> = Result<T, SparkError>;
