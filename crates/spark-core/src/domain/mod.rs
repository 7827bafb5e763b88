// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Spark.
//!
//! Pure generation logic: casing, front-matter, render contexts, output path
//! resolution and the result model. Nothing in here performs I/O or renders
//! templates; those concerns sit behind the ports in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable inputs**: Specs and templates are Clone + PartialEq
//! - **Lexical paths**: traversal is decided without touching the disk
//!
pub mod boilerplate;
pub mod case;
pub mod context;
pub mod error;
pub mod frontmatter;
pub mod generator;
pub mod path;
pub mod project_structure;
pub mod result;
pub mod subject;

pub use boilerplate::{AppName, Boilerplate, BoilerplateFile};
pub use case::{CaseStyle, pluralize, singularize, transform};
pub use context::{ContextValue, RenderContext};
pub use error::{DomainError, ErrorCategory};
pub use frontmatter::{Frontmatter, FrontmatterValue};
pub use generator::{GeneratorSpec, TemplateFile};
pub use path::{PathRequest, ResolvedPath};
pub use project_structure::{DirectoryToCreate, FileContent, FileToWrite, FsEntry, ProjectStructure};
pub use result::{
    Failure, FailureKind, FileStatus, GenerationEntry, GenerationResult, Summary,
};
pub use subject::SubjectName;
