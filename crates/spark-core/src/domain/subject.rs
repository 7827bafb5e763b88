use std::fmt;

use crate::domain::case::{self, CaseStyle};
use crate::domain::error::DomainError;

/// The user-supplied name of the artifact being generated.
///
/// `forms/TextField` names the `TextField` leaf inside a `forms`
/// subdirectory. Backslashes count as separators. Leading segments are kept
/// verbatim here; the path resolver decides whether they stay inside the
/// project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectName {
    raw: String,
    parents: Vec<String>,
    leaf: String,
    rooted: bool,
}

impl SubjectName {
    /// # Errors
    ///
    /// [`DomainError::InvalidSubjectName`] when the name is empty or its last
    /// segment has no letter or digit.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidSubjectName {
                name: input.into(),
                reason: "name cannot be empty".into(),
            });
        }

        let normalized = trimmed.replace('\\', "/");
        let rooted = normalized.starts_with('/') || has_drive_prefix(&normalized);

        let mut segments: Vec<String> = normalized
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let leaf = segments.pop().unwrap_or_default();
        case::validate_subject(&leaf).map_err(|_| DomainError::InvalidSubjectName {
            name: input.into(),
            reason: "the last path segment must contain at least one letter or digit".into(),
        })?;

        Ok(Self {
            raw: trimmed.to_string(),
            parents: segments,
            leaf,
            rooted,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The final segment, as typed.
    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Whether the name was given as an absolute path.
    pub fn is_rooted(&self) -> bool {
        self.rooted
    }

    /// The leaf in `style`.
    pub fn cased_leaf(&self, style: CaseStyle) -> Result<String, DomainError> {
        case::transform(&self.leaf, style)
    }

    /// Leading segments joined with `/`, each cased with `style`.
    ///
    /// `.` and `..` pass through untouched so traversal stays visible to the
    /// path resolver.
    pub fn cased_subdirectory(&self, style: CaseStyle) -> Result<String, DomainError> {
        let segments = self
            .parents
            .iter()
            .map(|segment| match segment.as_str() {
                "." | ".." => Ok(segment.clone()),
                other => case::transform(other, style),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(segments.join("/"))
    }
}

impl fmt::Display for SubjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

pub(crate) fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
