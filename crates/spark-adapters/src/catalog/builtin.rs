//! Generators compiled into the binary.
//!
//! These are the fallback when a project has no template of its own for a
//! kind. Content lives under `crates/spark-adapters/templates/`.

use spark_core::application::GeneratorCatalog;
use spark_core::domain::GeneratorSpec;
use spark_core::error::SparkResult;

type BuiltinTemplate = (&'static str, &'static str);

const COMPONENT: &[BuiltinTemplate] = &[(
    "NAME.tsx.tera",
    include_str!("../../templates/component/NAME.tsx.tera"),
)];

const NAVIGATOR: &[BuiltinTemplate] = &[(
    "NAMENavigator.tsx.tera",
    include_str!("../../templates/navigator/NAMENavigator.tsx.tera"),
)];

const SCREEN: &[BuiltinTemplate] = &[(
    "NAMEScreen.tsx.tera",
    include_str!("../../templates/screen/NAMEScreen.tsx.tera"),
)];

/// Sorted by kind.
const BUILTIN: &[(&str, &[BuiltinTemplate])] = &[
    ("component", COMPONENT),
    ("navigator", NAVIGATOR),
    ("screen", SCREEN),
];

/// Catalog of the `component`, `navigator` and `screen` generators.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl GeneratorCatalog for BuiltinCatalog {
    fn kinds(&self) -> SparkResult<Vec<String>> {
        Ok(BUILTIN.iter().map(|(kind, _)| (*kind).to_string()).collect())
    }

    fn load(&self, kind: &str) -> SparkResult<Option<GeneratorSpec>> {
        let spec = BUILTIN
            .iter()
            .find(|(name, _)| *name == kind)
            .map(|(name, templates)| {
                templates
                    .iter()
                    .fold(GeneratorSpec::new(*name), |spec, (file, content)| {
                        spec.with_template(*file, *content)
                    })
            });
        Ok(spec)
    }
}
