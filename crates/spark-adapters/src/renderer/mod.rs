//! Template rendering adapters.

mod engine;
mod filters;
mod truthiness;

pub use engine::TeraRenderer;
