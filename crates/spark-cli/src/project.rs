//! Locating the app a command works on, and wiring its adapters.

use std::path::{Path, PathBuf};

use spark_adapters::{
    BuiltinCatalog, DirectoryCatalog, LayeredCatalog, LocalFilesystem, TeraRenderer,
};
use spark_core::application::GeneratorService;
use tracing::{debug, warn};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
};

/// Marker file of a React Native app root.
pub const PROJECT_MARKER: &str = "package.json";

/// Resolve the project root.
///
/// An explicit `--project` path must exist. Otherwise the nearest ancestor
/// of the current directory holding a `package.json` wins, falling back to
/// the current directory itself.
pub fn resolve_root(explicit: Option<&Path>) -> CliResult<PathBuf> {
    if let Some(path) = explicit {
        if !path.is_dir() {
            return Err(CliError::ProjectNotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok(path.to_path_buf());
    }

    let cwd = std::env::current_dir().with_cli_context(|| "reading the current directory")?;
    match find_root(&cwd) {
        Some(root) => {
            debug!(root = %root.display(), "Project root found");
            Ok(root)
        }
        None => {
            warn!(
                cwd = %cwd.display(),
                "No {PROJECT_MARKER} found, using the current directory as project root"
            );
            Ok(cwd)
        }
    }
}

/// Nearest `start` or ancestor containing [`PROJECT_MARKER`].
pub fn find_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_MARKER).is_file())
        .map(Path::to_path_buf)
}

/// Project templates layered over the built-in generators.
pub fn catalog(root: &Path, config: &AppConfig) -> LayeredCatalog {
    LayeredCatalog::new()
        .with_layer(DirectoryCatalog::new(
            root.join(&config.generator.templates_dir),
        ))
        .with_layer(BuiltinCatalog::new())
}

/// A generator service writing below `root`.
pub fn generator_service(root: &Path, config: &AppConfig) -> GeneratorService {
    GeneratorService::new(
        Box::new(catalog(root, config)),
        Box::new(TeraRenderer::new()),
        Box::new(LocalFilesystem::new()),
        root,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_marker_in_an_ancestor() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(PROJECT_MARKER), "{}").unwrap();
        let nested = tmp.path().join("app/components");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_root(&nested).as_deref(), Some(tmp.path()));
    }

    #[test]
    fn explicit_missing_project_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = resolve_root(Some(&tmp.path().join("absent"))).unwrap_err();
        assert!(matches!(err, CliError::ProjectNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn explicit_project_is_used_as_is() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(resolve_root(Some(tmp.path())).unwrap(), tmp.path());
    }

    #[test]
    fn configured_templates_dir_is_a_catalog_layer() {
        let tmp = TempDir::new().unwrap();
        let kind_dir = tmp.path().join("tools/gen/hook");
        fs::create_dir_all(&kind_dir).unwrap();
        fs::write(kind_dir.join("useNAME.ts.tera"), "export {}\n").unwrap();

        let mut config = AppConfig::default();
        config.generator.templates_dir = "tools/gen".into();

        let kinds = generator_service(tmp.path(), &config)
            .list_generators()
            .unwrap();
        assert!(kinds.contains(&"hook".to_string()));
        assert!(kinds.contains(&"component".to_string()));
    }
}
