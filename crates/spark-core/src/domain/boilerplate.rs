//! App skeleton copied by `spark new`.
//!
//! Boilerplate trees use `HelloWorld` as the app name. Every spelling of it
//! is swapped for the new app's name, in paths and in text files alike.

use std::path::{Path, PathBuf};

use crate::domain::case::{self, CaseStyle};
use crate::domain::error::DomainError;
use crate::domain::project_structure::{FileContent, ProjectStructure};

/// Placeholder spellings and the [`AppName`] form each one becomes.
const PLACEHOLDERS: [(&str, fn(&AppName) -> &str); 5] = [
    ("HelloWorld", |n| n.pascal.as_str()),
    ("helloWorld", |n| n.camel.as_str()),
    ("hello-world", |n| n.kebab.as_str()),
    ("hello_world", |n| n.snake.as_str()),
    ("helloworld", |n| n.lower.as_str()),
];

/// A validated application name in every spelling the boilerplate needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppName {
    raw: String,
    pascal: String,
    camel: String,
    kebab: String,
    snake: String,
    lower: String,
}

impl AppName {
    /// # Errors
    ///
    /// [`DomainError::InvalidAppName`] if the name is empty, contains a path
    /// separator, starts with a dot or a digit, or has characters that cannot
    /// appear in a PascalCase identifier.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let raw = input.trim();
        let invalid = |reason: &str| DomainError::InvalidAppName {
            name: input.into(),
            reason: reason.into(),
        };

        if raw.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if raw.contains(['/', '\\']) {
            return Err(invalid("name cannot contain path separators"));
        }
        if raw.starts_with('.') {
            return Err(invalid("name cannot start with '.'"));
        }
        if !raw.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(invalid("name must start with a letter"));
        }

        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
        {
            return Err(invalid("only ASCII letters, digits, '-', '_' and spaces are allowed"));
        }

        let pascal = case::transform(raw, CaseStyle::Pascal).map_err(|_| invalid("no letters"))?;

        Ok(Self {
            raw: raw.to_string(),
            camel: case::transform(raw, CaseStyle::Camel).map_err(|_| invalid("no letters"))?,
            kebab: case::transform(raw, CaseStyle::Kebab).map_err(|_| invalid("no letters"))?,
            snake: case::transform(raw, CaseStyle::Snake).map_err(|_| invalid("no letters"))?,
            lower: pascal.to_ascii_lowercase(),
            pascal,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn pascal(&self) -> &str {
        &self.pascal
    }

    pub fn camel(&self) -> &str {
        &self.camel
    }

    pub fn kebab(&self) -> &str {
        &self.kebab
    }

    pub fn snake(&self) -> &str {
        &self.snake
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Swap every placeholder spelling in `text`.
    pub fn apply(&self, text: &str) -> String {
        PLACEHOLDERS
            .iter()
            .fold(text.to_string(), |acc, (placeholder, form)| {
                acc.replace(*placeholder, form(self))
            })
    }

    /// [`apply`](Self::apply) to each component of a relative path.
    pub fn apply_to_path(&self, path: &Path) -> PathBuf {
        path.components()
            .map(|c| self.apply(&c.as_os_str().to_string_lossy()))
            .collect()
    }
}

/// One file of a boilerplate tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoilerplateFile {
    /// Relative to the boilerplate root.
    pub path: PathBuf,
    pub content: FileContent,
    pub executable: bool,
}

/// A boilerplate tree as loaded from its source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boilerplate {
    pub files: Vec<BoilerplateFile>,
    /// Directories with no files, kept so they survive the copy.
    pub empty_dirs: Vec<PathBuf>,
}

impl Boilerplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: FileContent) -> Self {
        self.files.push(BoilerplateFile {
            path: path.into(),
            content,
            executable: false,
        });
        self
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Rename everything for `name` and lay it out under `destination`.
    ///
    /// Binary files are copied unchanged.
    pub fn render_for(
        &self,
        name: &AppName,
        destination: impl Into<PathBuf>,
    ) -> Result<ProjectStructure, DomainError> {
        let mut structure = ProjectStructure::new(destination);

        for dir in &self.empty_dirs {
            structure.add_directory(name.apply_to_path(dir));
        }
        for file in &self.files {
            let content = match &file.content {
                FileContent::Text(text) => FileContent::Text(name.apply(text)),
                binary @ FileContent::Binary(_) => binary.clone(),
            };
            structure.add_file(name.apply_to_path(&file.path), content, file.executable);
        }

        structure.validate()?;
        Ok(structure)
    }
}
