use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (results keep a copy per failed file)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Request validation
    // ========================================================================
    #[error("Invalid subject name '{name}': {reason}")]
    InvalidSubjectName { name: String, reason: String },

    #[error("Invalid app name '{name}': {reason}")]
    InvalidAppName { name: String, reason: String },

    #[error("Unknown casing style '{value}'")]
    InvalidCaseStyle { value: String },

    // ========================================================================
    // Per-template failures
    // ========================================================================
    #[error("Malformed front-matter in '{template}': {reason}")]
    MalformedFrontmatter { template: String, reason: String },

    #[error("Undefined variable '{variable}' in template '{template}'")]
    UndefinedTemplateVariable { variable: String, template: String },

    #[error("Template '{template}' could not be rendered: {reason}")]
    TemplateSyntax { template: String, reason: String },

    #[error("Path '{path}' resolves outside the project root")]
    PathEscape { path: String },

    #[error("Output path '{path}' is produced by more than one template")]
    DuplicateOutputPath { path: String },

    #[error("Duplicate path in project structure: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Project structure is empty")]
    EmptyProjectStructure,
}

impl DomainError {
    /// Attach the template name to an error produced before the name was known.
    pub fn in_template(self, name: &str) -> Self {
        match self {
            Self::MalformedFrontmatter { reason, .. } => Self::MalformedFrontmatter {
                template: name.to_string(),
                reason,
            },
            Self::UndefinedTemplateVariable { variable, .. } => Self::UndefinedTemplateVariable {
                variable,
                template: name.to_string(),
            },
            Self::TemplateSyntax { reason, .. } => Self::TemplateSyntax {
                template: name.to_string(),
                reason,
            },
            other => other,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidSubjectName { .. } => vec![
                "Pass a name containing at least one letter or digit".into(),
                "Examples: UserAvatar, user-avatar, forms/TextField".into(),
            ],
            Self::InvalidAppName { name, reason } => vec![
                format!("App name '{}' is invalid: {}", name, reason),
                "App names must start with a letter and become a PascalCase identifier".into(),
                "Examples: PizzaApp, my-pizza-app".into(),
            ],
            Self::InvalidCaseStyle { .. } => vec![
                "Supported casing styles: auto, pascal, camel, kebab, snake, none".into(),
            ],
            Self::MalformedFrontmatter { template, .. } => vec![
                format!("Check the '---' block at the top of '{}'", template),
                "Front-matter must be a YAML mapping closed by a second '---' line".into(),
            ],
            Self::UndefinedTemplateVariable { variable, .. } => vec![
                format!("Pass it with --var {}=<value>", variable),
                "Or guard it in the template with `| default(value=...)`".into(),
            ],
            Self::PathEscape { .. } => vec![
                "Subject names and --dir must stay inside the project".into(),
                "Remove '..' segments and absolute paths".into(),
            ],
            Self::DuplicateOutputPath { .. } => vec![
                "Two templates of this generator write the same file".into(),
                "Give one of them a different `filename` in its front-matter".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSubjectName { .. }
            | Self::InvalidAppName { .. }
            | Self::InvalidCaseStyle { .. }
            | Self::PathEscape { .. } => ErrorCategory::Validation,
            Self::MalformedFrontmatter { .. }
            | Self::UndefinedTemplateVariable { .. }
            | Self::TemplateSyntax { .. }
            | Self::DuplicateOutputPath { .. } => ErrorCategory::Template,
            Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::EmptyProjectStructure => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Template,
    Internal,
}
