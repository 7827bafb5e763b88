//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `spark-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{Boilerplate, DomainError, GeneratorSpec, RenderContext};
use crate::error::SparkResult;

/// How [`Filesystem::write_file`] treats an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Never replace an existing file.
    CreateNew,
    /// Replace an existing file.
    Overwrite,
}

/// What [`Filesystem::write_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
    /// `CreateNew` found a file already there and left it alone.
    AlreadyExists,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `spark_adapters::filesystem::LocalFilesystem` (production)
/// - `spark_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Writes are all-or-nothing: a failed write leaves no partial file
/// - Errors carry an `FsErrorKind` so callers can tell causes apart
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SparkResult<()>;

    /// Write `content` to `path`, creating parent directories.
    fn write_file(&self, path: &Path, content: &[u8], mode: WriteMode) -> SparkResult<WriteOutcome>;

    /// Set or clear the executable bit.
    fn set_permissions(&self, path: &Path, executable: bool) -> SparkResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> SparkResult<()>;

    /// Move a file or directory tree. `to` must not exist.
    fn rename(&self, from: &Path, to: &Path) -> SparkResult<()>;
}

/// Port for generator discovery.
///
/// Implemented by:
/// - `spark_adapters::catalog::DirectoryCatalog` (project templates)
/// - `spark_adapters::catalog::BuiltinCatalog` (templates compiled in)
/// - `spark_adapters::catalog::LayeredCatalog` (project over built-in)
#[cfg_attr(test, mockall::automock)]
pub trait GeneratorCatalog: Send + Sync {
    /// Every generator kind, sorted and unique.
    fn kinds(&self) -> SparkResult<Vec<String>>;

    /// Load one generator, or `None` if the kind is unknown.
    fn load(&self, kind: &str) -> SparkResult<Option<GeneratorSpec>>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `spark_adapters::renderer::TeraRenderer`
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render `body` against `context`.
    ///
    /// `template` names the source for error messages only.
    fn render(
        &self,
        template: &str,
        body: &str,
        context: &RenderContext,
    ) -> Result<String, DomainError>;
}

/// Port for the `spark new` app skeleton.
///
/// Implemented by:
/// - `spark_adapters::boilerplate::DirectoryBoilerplate`
pub trait BoilerplateSource: Send + Sync {
    /// Read the whole tree.
    fn load(&self) -> SparkResult<Boilerplate>;

    /// Human-readable origin, for logs and dry runs.
    fn describe(&self) -> String;
}
