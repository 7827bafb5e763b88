//! Tera-based implementation of the template renderer port.

use std::error::Error as _;

use spark_core::application::TemplateRenderer;
use spark_core::domain::{DomainError, RenderContext};
use tera::{Context, Tera};
use tracing::trace;

use super::{filters, truthiness};

/// Renders template bodies with Tera and the Spark filters.
///
/// Autoescaping is off: generated sources are TypeScript, not HTML.
#[derive(Debug, Clone)]
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        filters::register(&mut tera);
        Self { tera }
    }
}

impl Default for TeraRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(
        &self,
        template: &str,
        body: &str,
        context: &RenderContext,
    ) -> Result<String, DomainError> {
        let values =
            tera::to_value(context).map_err(|e| syntax_error(template, &tera::Error::from(e)))?;
        let ctx = Context::from_value(values.clone()).map_err(|e| syntax_error(template, &e))?;

        // A cloned instance keeps the registered filters for one-off templates.
        let mut inline = self.tera.clone();
        inline
            .add_raw_template(template, body)
            .map_err(|e| syntax_error(template, &e))?;

        let parsed = inline
            .get_template(template)
            .map_err(|e| syntax_error(template, &e))?;
        if let Some(variable) = truthiness::first_unbound(&parsed.ast, &values) {
            return Err(DomainError::UndefinedTemplateVariable {
                variable,
                template: template.to_string(),
            });
        }

        let rendered = inline
            .render(template, &ctx)
            .map_err(|e| render_error(template, &e))?;
        trace!(template, bytes = rendered.len(), "template rendered");
        Ok(rendered)
    }
}

fn render_error(template: &str, err: &tera::Error) -> DomainError {
    let chain = error_chain(err);
    match chain.iter().find_map(|message| undefined_variable(message)) {
        Some(variable) => DomainError::UndefinedTemplateVariable {
            variable,
            template: template.to_string(),
        },
        None => DomainError::TemplateSyntax {
            template: template.to_string(),
            reason: chain.join(": "),
        },
    }
}

fn syntax_error(template: &str, err: &tera::Error) -> DomainError {
    DomainError::TemplateSyntax {
        template: template.to_string(),
        reason: error_chain(err).join(": "),
    }
}

/// Tera nests the useful message under a generic "Failed to render" error.
fn error_chain(err: &tera::Error) -> Vec<String> {
    let mut messages = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        messages.push(inner.to_string());
        source = inner.source();
    }
    messages
}

// "Variable `vars.kind` not found in context while rendering 'NAME.tsx.tera'"
fn undefined_variable(message: &str) -> Option<String> {
    let rest = message.strip_prefix("Variable `")?;
    let (name, tail) = rest.split_once('`')?;
    tail.starts_with(" not found in context")
        .then(|| name.to_string())
}
