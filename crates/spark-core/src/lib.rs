//! Scaffolding logic for Spark, independent of any terminal or disk.
//!
//! [`domain`] holds pure values: case conversion, template front-matter,
//! target path resolution and per-file results. [`application`] holds the
//! two services, [`GeneratorService`](application::GeneratorService) and
//! [`BoilerplateService`](application::BoilerplateService), and the port
//! traits they drive. Concrete catalogs, the Tera renderer and filesystems
//! live in `spark-adapters`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spark_core::application::{GenerateOptions, GeneratorService};
//! # fn adapters() -> (
//! #     Box<dyn spark_core::application::ports::GeneratorCatalog>,
//! #     Box<dyn spark_core::application::ports::TemplateRenderer>,
//! #     Box<dyn spark_core::application::ports::Filesystem>,
//! # ) { unimplemented!() }
//!
//! let (catalog, renderer, filesystem) = adapters();
//! let service = GeneratorService::new(catalog, renderer, filesystem, "./MyApp");
//!
//! let result = service
//!     .run("component", "UserAvatar", &GenerateOptions::default())
//!     .unwrap();
//! assert!(result.is_success());
//! ```

pub mod application;
pub mod domain;
pub mod error;
