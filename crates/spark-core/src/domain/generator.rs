use crate::domain::error::DomainError;
use crate::domain::frontmatter::{self, Frontmatter};

/// One template file of a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the generator directory, `/`-separated.
    pub name: String,
    /// Front-matter and body, unparsed.
    pub content: String,
}

impl TemplateFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into().replace('\\', "/"),
            content: content.into(),
        }
    }

    /// Split into front-matter and body.
    ///
    /// # Errors
    ///
    /// [`DomainError::MalformedFrontmatter`] naming this template.
    pub fn parse(&self) -> Result<(Frontmatter, String), DomainError> {
        frontmatter::parse(&self.content).map_err(|e| e.in_template(&self.name))
    }
}

/// A generator kind and its templates, in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSpec {
    pub kind: String,
    pub templates: Vec<TemplateFile>,
}

impl GeneratorSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            templates: Vec::new(),
        }
    }

    pub fn with_template(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.templates.push(TemplateFile::new(name, content));
        self
    }

    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_declared_order() {
        let spec = GeneratorSpec::new("screen")
            .with_template("b.tera", "")
            .with_template("a.tera", "");
        assert_eq!(spec.template_names().collect::<Vec<_>>(), ["b.tera", "a.tera"]);
    }

    #[test]
    fn parse_errors_name_the_template() {
        let file = TemplateFile::new("styles\\NAME.ts.tera", "---\nbroken");
        assert_eq!(file.name, "styles/NAME.ts.tera");
        match file.parse() {
            Err(DomainError::MalformedFrontmatter { template, .. }) => {
                assert_eq!(template, "styles/NAME.ts.tera")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
