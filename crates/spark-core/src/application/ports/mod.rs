//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `spark-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `GeneratorCatalog`: Generator kinds and their template files
//!   - `TemplateRenderer`: Template rendering
//!   - `BoilerplateSource`: App skeleton for `spark new`
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    BoilerplateSource, Filesystem, GeneratorCatalog, TemplateRenderer, WriteMode, WriteOutcome,
};

#[cfg(test)]
pub use output::{MockFilesystem, MockGeneratorCatalog, MockTemplateRenderer};
