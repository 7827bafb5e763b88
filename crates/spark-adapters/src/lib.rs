//! Infrastructure adapters for Spark.
//!
//! This crate implements the ports defined in `spark-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod boilerplate;
pub mod catalog;
pub mod filesystem;
pub mod renderer;

// Re-export commonly used adapters
pub use boilerplate::DirectoryBoilerplate;
pub use catalog::{BuiltinCatalog, DirectoryCatalog, LayeredCatalog};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::TeraRenderer;
