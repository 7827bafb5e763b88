//! Catalog stacking several sources.

use spark_core::application::GeneratorCatalog;
use spark_core::domain::GeneratorSpec;
use spark_core::error::SparkResult;
use tracing::debug;

/// Consults each layer in order; the first that knows a kind wins.
///
/// A project kind replaces the built-in kind of the same name wholesale.
/// Templates from different layers are never merged.
pub struct LayeredCatalog {
    layers: Vec<Box<dyn GeneratorCatalog>>,
}

impl LayeredCatalog {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Add a layer below the existing ones.
    pub fn with_layer(mut self, layer: impl GeneratorCatalog + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayeredCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorCatalog for LayeredCatalog {
    fn kinds(&self) -> SparkResult<Vec<String>> {
        let mut kinds = Vec::new();
        for layer in &self.layers {
            kinds.extend(layer.kinds()?);
        }
        kinds.sort();
        kinds.dedup();
        Ok(kinds)
    }

    fn load(&self, kind: &str) -> SparkResult<Option<GeneratorSpec>> {
        for (depth, layer) in self.layers.iter().enumerate() {
            if let Some(spec) = layer.load(kind)? {
                debug!(kind, layer = depth, "generator resolved");
                return Ok(Some(spec));
            }
        }
        Ok(None)
    }
}
