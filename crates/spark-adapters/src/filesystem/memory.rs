//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use spark_core::application::{ApplicationError, Filesystem, WriteMode, WriteOutcome};
use spark_core::error::SparkResult;

/// In-memory filesystem for testing.
///
/// Parent directories are implied by every write, the way
/// [`LocalFilesystem`](super::LocalFilesystem) creates them.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    executables: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_ancestors(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file as UTF-8 (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        let bytes = inner.files.get(path)?;
        String::from_utf8(bytes.clone()).ok()
    }

    /// Read a file's raw bytes.
    pub fn read_bytes(&self, path: &Path) -> Option<Vec<u8>> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.executables.contains(path))
            .unwrap_or(false)
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn create_dir_all(&self, path: &Path) -> SparkResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.files.contains_key(path) {
            let err = io::Error::new(io::ErrorKind::AlreadyExists, "a file occupies this path");
            return Err(ApplicationError::write(path, &err).into());
        }
        inner.add_ancestors(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8], mode: WriteMode) -> SparkResult<WriteOutcome> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.directories.contains(path) {
            let err = io::Error::new(io::ErrorKind::IsADirectory, "is a directory");
            return Err(ApplicationError::write(path, &err).into());
        }

        let existed = inner.files.contains_key(path);
        if existed && mode == WriteMode::CreateNew {
            return Ok(WriteOutcome::AlreadyExists);
        }

        if let Some(parent) = path.parent() {
            inner.add_ancestors(parent);
        }
        inner.files.insert(path.to_path_buf(), content.to_vec());

        Ok(if existed {
            WriteOutcome::Overwritten
        } else {
            WriteOutcome::Created
        })
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> SparkResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if !inner.files.contains_key(path) {
            let err = io::Error::new(io::ErrorKind::NotFound, "no such file");
            return Err(ApplicationError::write(path, &err).into());
        }

        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> SparkResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> SparkResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let occupied = |inner: &MemoryFilesystemInner, p: &Path| {
            inner.files.contains_key(p) || inner.directories.contains(p)
        };
        if !occupied(&inner, from) {
            let err = io::Error::new(io::ErrorKind::NotFound, "no such file or directory");
            return Err(ApplicationError::write(from, &err).into());
        }
        if occupied(&inner, to) {
            let err = io::Error::new(io::ErrorKind::AlreadyExists, "target already exists");
            return Err(ApplicationError::write(to, &err).into());
        }

        let moved = |p: &Path| p.strip_prefix(from).ok().map(|rest| to.join(rest));

        let files = std::mem::take(&mut inner.files);
        for (path, content) in files {
            let path = moved(&path).unwrap_or(path);
            inner.files.insert(path, content);
        }
        let directories = std::mem::take(&mut inner.directories);
        inner.directories = directories
            .into_iter()
            .map(|p| moved(&p).unwrap_or(p))
            .collect();
        let executables = std::mem::take(&mut inner.executables);
        inner.executables = executables
            .into_iter()
            .map(|p| moved(&p).unwrap_or(p))
            .collect();

        if let Some(parent) = to.parent() {
            inner.add_ancestors(parent);
        }
        Ok(())
    }
}
