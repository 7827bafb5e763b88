//! Generator catalog adapters.
//!
//! A generator kind is a directory of template files:
//!
//! ```text
//! spark/templates/
//! ├── component/
//! │   └── NAME.tsx.tera
//! └── screen/
//!     ├── NAMEScreen.tsx.tera
//!     └── NAMEScreen.test.tsx.tera
//! ```

mod builtin;
mod directory;
mod layered;

pub use builtin::BuiltinCatalog;
pub use directory::DirectoryCatalog;
pub use layered::LayeredCatalog;

/// Default project-local template directory, relative to the project root.
pub const PROJECT_TEMPLATES_DIR: &str = "spark/templates";

/// Names a kind lookup may never resolve, whatever the catalog.
pub(crate) fn is_valid_kind(kind: &str) -> bool {
    !kind.is_empty()
        && !kind.starts_with('.')
        && !kind.contains(['/', '\\', ':'])
}
