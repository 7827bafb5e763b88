//! Local filesystem adapter using std::fs.
//!
//! Every write lands in a temporary file next to its target and is then
//! renamed into place, so a failed write never leaves a truncated file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use spark_core::application::{ApplicationError, Filesystem, WriteMode, WriteOutcome};
use spark_core::error::SparkResult;
use tempfile::NamedTempFile;
use tracing::debug;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> SparkResult<()> {
        fs::create_dir_all(path).map_err(|e| ApplicationError::write(path, &e).into())
    }

    fn write_file(&self, path: &Path, content: &[u8], mode: WriteMode) -> SparkResult<WriteOutcome> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        self.create_dir_all(parent)?;

        let existed = path.exists();
        let mut staged = NamedTempFile::new_in(parent).map_err(|e| write_error(path, &e))?;
        staged.write_all(content).map_err(|e| write_error(path, &e))?;
        staged.as_file().sync_all().map_err(|e| write_error(path, &e))?;

        match mode {
            WriteMode::Overwrite => {
                staged
                    .persist(path)
                    .map_err(|e| write_error(path, &e.error))?;
                debug!(path = %path.display(), replaced = existed, "file written");
                Ok(if existed {
                    WriteOutcome::Overwritten
                } else {
                    WriteOutcome::Created
                })
            }
            WriteMode::CreateNew => match staged.persist_noclobber(path) {
                Ok(_) => {
                    debug!(path = %path.display(), "file created");
                    Ok(WriteOutcome::Created)
                }
                // The staged file is removed when the error drops it.
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                    Ok(WriteOutcome::AlreadyExists)
                }
                Err(e) => Err(write_error(path, &e.error)),
            },
        }
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> SparkResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = fs::metadata(path).map_err(|e| write_error(path, &e))?;
            let mut perms = metadata.permissions();
            let mode = perms.mode();
            perms.set_mode(if executable {
                mode | 0o111
            } else {
                mode & !0o111
            });
            fs::set_permissions(path, perms).map_err(|e| write_error(path, &e))?;
        }
        #[cfg(not(unix))]
        {
            let _ = (path, executable);
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> SparkResult<()> {
        fs::remove_dir_all(path).map_err(|e| write_error(path, &e))
    }

    fn rename(&self, from: &Path, to: &Path) -> SparkResult<()> {
        if to.exists() {
            let err = io::Error::new(io::ErrorKind::AlreadyExists, "target already exists");
            return Err(write_error(to, &err));
        }
        fs::rename(from, to).map_err(|e| write_error(from, &e))?;
        debug!(from = %from.display(), to = %to.display(), "moved");
        Ok(())
    }
}

fn write_error(path: &Path, e: &io::Error) -> spark_core::error::SparkError {
    ApplicationError::write(path, e).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_new_writes_and_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("app/components/Button.tsx");
        let fs = LocalFilesystem::new();

        let outcome = fs
            .write_file(&target, b"export {}\n", WriteMode::CreateNew)
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Created);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "export {}\n");
    }

    #[test]
    fn create_new_leaves_existing_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("Button.tsx");
        std::fs::write(&target, "original").unwrap();

        let outcome = LocalFilesystem::new()
            .write_file(&target, b"replacement", WriteMode::CreateNew)
            .unwrap();

        assert_eq!(outcome, WriteOutcome::AlreadyExists);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "original");
        // No staged temp files left behind.
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn overwrite_replaces_existing_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("Button.tsx");
        std::fs::write(&target, "original").unwrap();

        let outcome = LocalFilesystem::new()
            .write_file(&target, b"replacement", WriteMode::Overwrite)
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Overwritten);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "replacement");
    }

    #[cfg(unix)]
    #[test]
    fn failed_rename_leaves_no_staged_file() {
        use spark_core::application::FsErrorKind;
        use spark_core::error::SparkError;

        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("Button.tsx");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep.txt"), "x").unwrap();

        let err = LocalFilesystem::new()
            .write_file(&target, b"replacement", WriteMode::Overwrite)
            .unwrap_err();

        assert!(matches!(
            err,
            SparkError::Application(ApplicationError::WriteFailure {
                kind: FsErrorKind::IsADirectory,
                ..
            })
        ));
        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("Button.tsx")]);
        assert!(target.join("keep.txt").is_file());
    }

    #[test]
    fn is_dir_distinguishes_files() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();
        let fs = LocalFilesystem::new();

        assert!(fs.is_dir(tmp.path()));
        assert!(!fs.is_dir(&file));
        assert!(fs.exists(&file));
    }

    #[cfg(unix)]
    #[test]
    fn set_permissions_toggles_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let script = tmp.path().join("gradlew");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();
        let fs = LocalFilesystem::new();

        fs.set_permissions(&script, true).unwrap();
        let mode = std::fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);

        fs.set_permissions(&script, false).unwrap();
        let mode = std::fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0);
    }

    #[test]
    fn rename_moves_a_tree_but_never_onto_an_existing_path() {
        let tmp = TempDir::new().unwrap();
        let from = tmp.path().join("PizzaApp");
        std::fs::create_dir_all(from.join("app")).unwrap();
        std::fs::write(from.join("app/App.tsx"), "old").unwrap();
        let fs = LocalFilesystem::new();

        let to = tmp.path().join(".PizzaApp.spark-backup");
        fs.rename(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(std::fs::read_to_string(to.join("app/App.tsx")).unwrap(), "old");

        std::fs::create_dir(&from).unwrap();
        assert!(fs.rename(&to, &from).is_err());
        assert!(to.join("app/App.tsx").is_file());
    }

    #[test]
    fn remove_dir_all_of_missing_directory_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .remove_dir_all(&tmp.path().join("missing"))
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
