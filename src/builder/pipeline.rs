//! Staged build pipeline
//!
//! Stage order: dependency install, setup, build, test. Each stage is gated
//! on the previous one's success; the first failure ends the run without
//! attempting later stages.

use super::executor::run_steps;
use crate::analyzer::BuildPlan;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error, info};

/// Errors raised by the pipeline itself, as opposed to stage failures
#[derive(Debug, Error)]
pub enum BuildError {
    /// The pipeline could not run at all
    #[error("Build execution failed: {0}")]
    Execution(String),
}

/// One of the three step-list stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Setup,
    Build,
    Test,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Setup => "setup",
            Stage::Build => "build",
            Stage::Test => "test",
        };
        write!(f, "{}", name)
    }
}

/// Drives a build plan to completion against a repository checkout
#[derive(Debug, Default)]
pub struct BuildPipeline;

impl BuildPipeline {
    pub fn new() -> Self {
        Self
    }

    /// Executes all four stages of `plan` against `repo_path`
    ///
    /// Returns `Ok(true)` when every stage succeeds and `Ok(false)` at the
    /// first stage failure; later stages are not attempted. `Err` means the
    /// pipeline itself could not run.
    pub async fn execute(&self, repo_path: &Path, plan: &BuildPlan) -> Result<bool, BuildError> {
        if !repo_path.is_dir() {
            return Err(BuildError::Execution(format!(
                "repository path is not a directory: {}",
                repo_path.display()
            )));
        }

        info!("Installing dependencies...");
        if !self.install_dependencies(&plan.dependencies).await {
            return Ok(false);
        }

        let stages = [
            (Stage::Setup, &plan.setup_steps),
            (Stage::Build, &plan.build_steps),
            (Stage::Test, &plan.test_steps),
        ];

        for (stage, steps) in stages {
            info!("Executing {} steps...", stage);
            if !run_steps(repo_path, steps).await {
                error!("{} stage failed", stage);
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Installs dependencies one subprocess at a time, fail-fast
    ///
    /// Each spec becomes a single `pip install <spec>` invocation; no other
    /// package manager form is supported.
    async fn install_dependencies(&self, dependencies: &[String]) -> bool {
        for dep in dependencies {
            debug!("Installing dependency: {}", dep);

            let result = Command::new("sh")
                .arg("-c")
                .arg(format!("pip install {}", dep))
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .await;

            match result {
                Ok(output) if output.status.success() => {}
                Ok(output) => {
                    error!(
                        "Failed to install {}: {}",
                        dep,
                        String::from_utf8_lossy(&output.stderr)
                    );
                    return false;
                }
                Err(e) => {
                    error!("Error installing dependencies: {}", e);
                    return false;
                }
            }
        }

        true
    }
}
