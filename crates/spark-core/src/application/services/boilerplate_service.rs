//! Boilerplate Service - `spark new`.
//!
//! Copies the app skeleton into a fresh directory:
//! 1. Validate the app name
//! 2. Refuse an existing destination unless overwriting
//! 3. Load and rename the boilerplate
//! 4. Write everything, removing the destination again on failure
//!
//! An app being overwritten is first moved to a hidden sibling and only
//! deleted once the new tree is complete; a failed write puts it back.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{BoilerplateSource, Filesystem, WriteMode},
    },
    domain::{AppName, FsEntry, ProjectStructure},
    error::{SparkError, SparkResult},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoilerplateOptions {
    /// Replace an existing destination directory.
    pub overwrite: bool,
    /// Plan only; touch nothing.
    pub dry_run: bool,
}

/// Creates new apps from a boilerplate source.
pub struct BoilerplateService {
    source: Box<dyn BoilerplateSource>,
    filesystem: Box<dyn Filesystem>,
}

impl BoilerplateService {
    pub fn new(source: Box<dyn BoilerplateSource>, filesystem: Box<dyn Filesystem>) -> Self {
        Self { source, filesystem }
    }

    /// Create app `name` at `destination`.
    ///
    /// Returns the structure that was written, or that would be written
    /// under `dry_run`.
    #[instrument(
        skip_all,
        fields(
            app = %name,
            destination = %destination.as_ref().display(),
            dry_run = options.dry_run
        )
    )]
    pub fn create(
        &self,
        name: &str,
        destination: impl AsRef<Path>,
        options: &BoilerplateOptions,
    ) -> SparkResult<ProjectStructure> {
        let destination = destination.as_ref();
        let name = AppName::parse(name)?;

        let exists = self.filesystem.exists(destination);
        if exists && !options.overwrite {
            return Err(ApplicationError::DestinationExists {
                path: destination.to_path_buf(),
            }
            .into());
        }

        let boilerplate = self.source.load()?;
        info!(
            source = %self.source.describe(),
            files = boilerplate.file_count(),
            "Boilerplate loaded"
        );
        let structure = boilerplate.render_for(&name, destination)?;

        if options.dry_run {
            info!("Dry run, nothing written");
            return Ok(structure);
        }

        let previous = if exists {
            Some(self.set_aside(destination)?)
        } else {
            None
        };

        self.write_structure(&structure, previous.as_deref())?;
        info!(entries = structure.entry_count(), "App created");
        Ok(structure)
    }

    /// Move an existing destination out of the way, keeping it until the new
    /// app has been written.
    fn set_aside(&self, destination: &Path) -> SparkResult<PathBuf> {
        let backup = backup_path(destination);
        if self.filesystem.exists(&backup) {
            warn!(path = %backup.display(), "Removing leftover backup");
            self.filesystem.remove_dir_all(&backup)?;
        }
        warn!(
            path = %destination.display(),
            backup = %backup.display(),
            "Replacing existing destination"
        );
        self.filesystem.rename(destination, &backup)?;
        Ok(backup)
    }

    /// Write project structure to filesystem with rollback on failure.
    fn write_structure(
        &self,
        structure: &ProjectStructure,
        previous: Option<&Path>,
    ) -> SparkResult<()> {
        match self.write_all(structure) {
            Ok(()) => {
                info!("Successfully wrote all files");
                if let Some(backup) = previous {
                    // The new app is complete; a stale backup is only clutter.
                    if let Err(e) = self.filesystem.remove_dir_all(backup) {
                        warn!(error = %e, path = %backup.display(), "Could not remove previous app");
                    }
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Write failed, attempting rollback");
                self.rollback(&structure.root, previous, e)
            }
        }
    }

    fn write_all(&self, structure: &ProjectStructure) -> SparkResult<()> {
        self.filesystem.create_dir_all(&structure.root)?;

        for entry in &structure.entries {
            match entry {
                FsEntry::Directory(dir) => {
                    self.filesystem.create_dir_all(&structure.root.join(&dir.path))?;
                }
                FsEntry::File(file) => {
                    let path = structure.root.join(&file.path);
                    self.filesystem
                        .write_file(&path, file.content.as_bytes(), WriteMode::Overwrite)?;

                    if file.executable {
                        self.filesystem.set_permissions(&path, true)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Remove the destination and restore `previous` there, then hand back
    /// the original failure.
    fn rollback(
        &self,
        root: &Path,
        previous: Option<&Path>,
        cause: SparkError,
    ) -> SparkResult<()> {
        let restored = self.filesystem.remove_dir_all(root).and_then(|()| match previous {
            Some(backup) => self.filesystem.rename(backup, root),
            None => Ok(()),
        });

        match restored {
            Ok(()) => {
                info!(restored = previous.is_some(), "Rollback successful");
                Err(cause)
            }
            Err(e) => {
                warn!(error = %e, path = %root.display(), "Rollback failed");
                let reason = match previous {
                    Some(backup) => format!(
                        "{cause}; cleanup failed: {e}; the previous app is kept at {}",
                        backup.display()
                    ),
                    None => format!("{cause}; cleanup failed: {e}"),
                };
                Err(ApplicationError::RollbackFailed {
                    path: root.to_path_buf(),
                    reason,
                }
                .into())
            }
        }
    }
}

/// `MyApp` is kept as `.MyApp.spark-backup` next to it while being replaced.
fn backup_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{name}.spark-backup"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::FsErrorKind;
    use crate::application::ports::{MockFilesystem, WriteOutcome};
    use crate::domain::{Boilerplate, FileContent};

    struct FixedSource(Boilerplate);

    impl BoilerplateSource for FixedSource {
        fn load(&self) -> SparkResult<Boilerplate> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "fixture".into()
        }
    }

    fn source() -> Box<FixedSource> {
        Box::new(FixedSource(
            Boilerplate::new()
                .with_file("package.json", r#"{"name":"hello-world"}"#.into())
                .with_file("app/HelloWorld.tsx", "export const HelloWorld = 1".into()),
        ))
    }

    #[test]
    fn refuses_existing_destination() {
        let mut filesystem = MockFilesystem::new();
        filesystem.expect_exists().returning(|_| true);
        filesystem.expect_write_file().never();

        let err = BoilerplateService::new(source(), Box::new(filesystem))
            .create("PizzaApp", "/tmp/PizzaApp", &BoilerplateOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SparkError::Application(ApplicationError::DestinationExists { .. })
        ));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let mut filesystem = MockFilesystem::new();
        filesystem.expect_exists().returning(|_| false);
        filesystem.expect_create_dir_all().never();
        filesystem.expect_write_file().never();

        let options = BoilerplateOptions {
            dry_run: true,
            ..Default::default()
        };
        let structure = BoilerplateService::new(source(), Box::new(filesystem))
            .create("PizzaApp", "/tmp/PizzaApp", &options)
            .unwrap();
        assert_eq!(structure.files().count(), 2);
    }

    #[test]
    fn failed_write_rolls_back_destination() {
        let mut filesystem = MockFilesystem::new();
        filesystem.expect_exists().returning(|_| false);
        filesystem.expect_create_dir_all().returning(|_| Ok(()));
        filesystem
            .expect_write_file()
            .withf(|path, _, _| path.ends_with("package.json"))
            .returning(|_, _, _| Ok(WriteOutcome::Created));
        filesystem
            .expect_write_file()
            .returning(|path, _, _| {
                Err(ApplicationError::WriteFailure {
                    path: path.to_path_buf(),
                    kind: FsErrorKind::Other,
                    reason: "disk full".into(),
                }
                .into())
            });
        filesystem
            .expect_remove_dir_all()
            .withf(|path| path == Path::new("/tmp/PizzaApp"))
            .times(1)
            .returning(|_| Ok(()));

        let err = BoilerplateService::new(source(), Box::new(filesystem))
            .create("PizzaApp", "/tmp/PizzaApp", &BoilerplateOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn overwrite_discards_previous_app_only_after_success() {
        let backup = Path::new("/tmp/.PizzaApp.spark-backup");
        let mut filesystem = MockFilesystem::new();
        filesystem
            .expect_exists()
            .returning(|path| path == Path::new("/tmp/PizzaApp"));
        filesystem
            .expect_rename()
            .withf(move |from, to| from == Path::new("/tmp/PizzaApp") && to == backup)
            .times(1)
            .returning(|_, _| Ok(()));
        filesystem.expect_create_dir_all().returning(|_| Ok(()));
        filesystem
            .expect_write_file()
            .returning(|_, _, _| Ok(WriteOutcome::Created));
        filesystem
            .expect_remove_dir_all()
            .withf(move |path| path == backup)
            .times(1)
            .returning(|_| Ok(()));

        let options = BoilerplateOptions {
            overwrite: true,
            ..Default::default()
        };
        BoilerplateService::new(source(), Box::new(filesystem))
            .create("PizzaApp", "/tmp/PizzaApp", &options)
            .unwrap();
    }

    #[test]
    fn failed_overwrite_restores_previous_app() {
        let backup = Path::new("/tmp/.PizzaApp.spark-backup");
        let destination = Path::new("/tmp/PizzaApp");
        let mut filesystem = MockFilesystem::new();
        filesystem
            .expect_exists()
            .returning(move |path| path == destination);
        filesystem
            .expect_rename()
            .withf(move |from, to| from == destination && to == backup)
            .times(1)
            .returning(|_, _| Ok(()));
        filesystem
            .expect_rename()
            .withf(move |from, to| from == backup && to == destination)
            .times(1)
            .returning(|_, _| Ok(()));
        filesystem.expect_create_dir_all().returning(|_| Ok(()));
        filesystem.expect_write_file().returning(|path, _, _| {
            Err(ApplicationError::WriteFailure {
                path: path.to_path_buf(),
                kind: FsErrorKind::Other,
                reason: "disk full".into(),
            }
            .into())
        });
        filesystem
            .expect_remove_dir_all()
            .withf(move |path| path == destination)
            .times(1)
            .returning(|_| Ok(()));

        let options = BoilerplateOptions {
            overwrite: true,
            ..Default::default()
        };
        let err = BoilerplateService::new(source(), Box::new(filesystem))
            .create("PizzaApp", destination, &options)
            .unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn backup_is_a_hidden_sibling() {
        assert_eq!(
            backup_path(Path::new("/work/PizzaApp")),
            Path::new("/work/.PizzaApp.spark-backup")
        );
    }

    #[test]
    fn invalid_name_is_rejected_before_io() {
        let mut filesystem = MockFilesystem::new();
        filesystem.expect_exists().never();

        let err = BoilerplateService::new(source(), Box::new(filesystem))
            .create("../escape", "/tmp/x", &BoilerplateOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SparkError::Domain(crate::domain::DomainError::InvalidAppName { .. })
        ));
    }

    #[test]
    fn binary_content_is_passed_through() {
        let boilerplate = Boilerplate::new()
            .with_file("icon.png", FileContent::Binary(vec![0xff, 0x00]));
        let mut filesystem = MockFilesystem::new();
        filesystem.expect_exists().returning(|_| false);
        filesystem.expect_create_dir_all().returning(|_| Ok(()));
        filesystem
            .expect_write_file()
            .withf(|_, content, _| *content == [0xff, 0x00])
            .times(1)
            .returning(|_, _, _| Ok(WriteOutcome::Created));

        BoilerplateService::new(Box::new(FixedSource(boilerplate)), Box::new(filesystem))
            .create("PizzaApp", "/tmp/PizzaApp", &BoilerplateOptions::default())
            .unwrap();
    }
}
