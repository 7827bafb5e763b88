//! Filesystem-backed generator catalog.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use spark_core::application::{ApplicationError, GeneratorCatalog};
use spark_core::domain::GeneratorSpec;
use spark_core::error::SparkResult;
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use super::is_valid_kind;

/// Reads generators from `<root>/<kind>/**`.
///
/// Nothing is cached: every call re-reads the directory so edits to
/// templates take effect on the next run. Hidden files and directories are
/// ignored.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    /// The directory does not need to exist; a missing root is an empty catalog.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load_templates(&self, kind: &str, dir: &Path) -> SparkResult<GeneratorSpec> {
        let mut spec = GeneratorSpec::new(kind);

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));

        for entry in walker {
            let entry = entry.map_err(|e| walk_error(dir, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let rel = entry
                .path()
                .strip_prefix(dir)
                .map_err(|_| ApplicationError::CatalogError {
                    reason: format!(
                        "failed to relativise '{}' against '{}'",
                        entry.path().display(),
                        dir.display()
                    ),
                })?;
            let name = rel.to_string_lossy().replace('\\', "/");

            match fs::read_to_string(entry.path()) {
                Ok(content) => spec = spec.with_template(name, content),
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    warn!(template = %name, "skipping non UTF-8 template file");
                }
                Err(e) => return Err(ApplicationError::read(entry.path(), &e).into()),
            }
        }

        Ok(spec)
    }
}

impl GeneratorCatalog for DirectoryCatalog {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn kinds(&self) -> SparkResult<Vec<String>> {
        if !self.root.is_dir() {
            debug!("template directory absent");
            return Ok(Vec::new());
        }

        let read_dir =
            fs::read_dir(&self.root).map_err(|e| ApplicationError::read(&self.root, &e))?;

        let mut kinds = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| ApplicationError::read(&self.root, &e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_dir() && is_valid_kind(&name) {
                kinds.push(name);
            }
        }
        kinds.sort();
        kinds.dedup();

        debug!(count = kinds.len(), "discovered generator kinds");
        Ok(kinds)
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn load(&self, kind: &str) -> SparkResult<Option<GeneratorSpec>> {
        if !is_valid_kind(kind) {
            return Ok(None);
        }
        let dir = self.root.join(kind);
        if !dir.is_dir() {
            return Ok(None);
        }

        let spec = self.load_templates(kind, &dir)?;
        debug!(templates = spec.templates.len(), "loaded generator");
        Ok(Some(spec))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn walk_error(dir: &Path, e: walkdir::Error) -> spark_core::error::SparkError {
    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
    match e.into_io_error() {
        Some(io_err) => ApplicationError::read(path, &io_err).into(),
        None => ApplicationError::CatalogError {
            reason: format!("directory walk error under {}", path.display()),
        }
        .into(),
    }
}
