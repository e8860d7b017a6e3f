//! repobuild - LLM-driven README analysis and automated repository builds
//!
//! This library downloads a GitHub repository, analyzes its README with a
//! Large Language Model to infer build instructions, and executes those
//! instructions as a staged sequence of shell commands.
//!
//! # Core Concepts
//!
//! - **Build Plan**: structured output of README analysis — a dependency
//!   list plus setup, build, and test command lists
//! - **Extraction Strategies**: a primary structured-JSON extractor with a
//!   plain-prompt fallback, tried in fixed order behind one trait
//! - **Build Pipeline**: dependency install → setup → build → test, each
//!   stage gated on the previous one's success
//!
//! # Example Usage
//!
//! ```ignore
//! use repobuild::analyzer::{BuildPlan, InstructionAnalyzer};
//! use repobuild::builder::BuildPipeline;
//! use repobuild::cache::{cache_key, AnalysisCache};
//! use repobuild::retry::RetryPolicy;
//!
//! async fn build_from_readme(
//!     analyzer: &InstructionAnalyzer,
//!     readme: &str,
//!     repo_path: &std::path::Path,
//! ) -> Result<bool, Box<dyn std::error::Error>> {
//!     let cache: AnalysisCache<Option<BuildPlan>> = AnalysisCache::new(64);
//!     let retry = RetryPolicy::default();
//!
//!     let key = cache_key(readme);
//!     let plan = cache
//!         .get_or_compute(&key, || async {
//!             retry.run(|| analyzer.extract(readme)).await.ok()
//!         })
//!         .await;
//!
//!     match plan {
//!         Some(plan) => Ok(BuildPipeline::new().execute(repo_path, &plan).await?),
//!         None => Ok(false),
//!     }
//! }
//! ```

// Public modules
pub mod analyzer;
pub mod builder;
pub mod cache;
pub mod compare;
pub mod config;
pub mod github;
pub mod llm;
pub mod retry;
pub mod util;

// Re-export key types for convenient access
pub use analyzer::{AnalysisError, BuildPlan, InstructionAnalyzer, Step};
pub use builder::{BuildError, BuildPipeline};
pub use cache::AnalysisCache;
pub use config::{Config, ConfigError};
pub use github::{GithubError, GithubService};
pub use llm::{GenAiClient, LlmClient, LlmError};
pub use retry::RetryPolicy;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_repobuild() {
        assert_eq!(NAME, "repobuild");
    }
}
