//! Boilerplate loader for `spark new`.
//!
//! Reads an app skeleton from disk into a [`Boilerplate`]. Text files stay
//! text so the placeholder app name can be replaced; anything that is not
//! valid UTF-8 is carried as raw bytes.

use std::fs;
use std::path::{Path, PathBuf};

use spark_core::application::{ApplicationError, BoilerplateSource};
use spark_core::domain::{Boilerplate, BoilerplateFile, FileContent};
use spark_core::error::{SparkError, SparkResult};
use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

/// Directory names never copied into a new app.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Boilerplate read from a directory tree.
#[derive(Debug, Clone)]
pub struct DirectoryBoilerplate {
    root: PathBuf,
}

impl DirectoryBoilerplate {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BoilerplateSource for DirectoryBoilerplate {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn load(&self) -> SparkResult<Boilerplate> {
        if !self.root.is_dir() {
            let err = std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "boilerplate directory not found",
            );
            return Err(ApplicationError::read(&self.root, &err).into());
        }

        let mut boilerplate = Boilerplate::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_skipped(e));

        for entry in walker {
            let entry = entry.map_err(|e| walk_error(&self.root, e))?;
            let rel = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|_| ApplicationError::CatalogError {
                    reason: format!("'{}' is outside the boilerplate", entry.path().display()),
                })?
                .to_path_buf();

            if entry.file_type().is_dir() {
                let mut children = fs::read_dir(entry.path())
                    .map_err(|e| ApplicationError::read(entry.path(), &e))?;
                if children.next().is_none() {
                    boilerplate.empty_dirs.push(rel);
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            let bytes = fs::read(entry.path()).map_err(|e| ApplicationError::read(entry.path(), &e))?;
            boilerplate.files.push(BoilerplateFile {
                path: rel,
                content: FileContent::from_bytes(bytes),
                executable: is_executable(&entry)?,
            });
        }

        debug!(
            files = boilerplate.file_count(),
            empty_dirs = boilerplate.empty_dirs.len(),
            "boilerplate loaded"
        );
        Ok(boilerplate)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

#[cfg(unix)]
fn is_executable(entry: &DirEntry) -> SparkResult<bool> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = entry
        .metadata()
        .map_err(|e| walk_error(entry.path(), e))?;
    Ok(metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_entry: &DirEntry) -> SparkResult<bool> {
    Ok(false)
}

fn walk_error(path: &Path, e: walkdir::Error) -> SparkError {
    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| path.to_path_buf());
    match e.into_io_error() {
        Some(io_err) => ApplicationError::read(path, &io_err).into(),
        None => ApplicationError::CatalogError {
            reason: format!("filesystem loop under {}", path.display()),
        }
        .into(),
    }
}
