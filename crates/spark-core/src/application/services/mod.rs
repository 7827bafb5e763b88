//! Application services (use cases).

pub mod boilerplate_service;
pub mod generator_service;

pub use boilerplate_service::{BoilerplateOptions, BoilerplateService};
pub use generator_service::{GenerateOptions, GeneratorService};
