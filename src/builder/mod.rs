//! Staged build execution
//!
//! The executor runs one list of shell steps fail-fast; the pipeline
//! sequences dependency installation and the setup, build, and test stages
//! on top of it.

mod executor;
mod pipeline;

pub use executor::run_steps;
pub use pipeline::{BuildError, BuildPipeline, Stage};
