//! Sequential shell step execution
//!
//! Steps run one at a time through `sh -c` with the repository as the
//! working directory. The first non-zero exit or spawn failure stops the
//! list; failures are logged and reported as `false`, never propagated.

use crate::analyzer::Step;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info};

/// Runs a step list in order against `working_dir`, fail-fast
///
/// Returns `true` when every step exits zero. An empty list succeeds
/// without launching anything.
pub async fn run_steps(working_dir: &Path, steps: &[Step]) -> bool {
    for step in steps {
        info!("Executing: {}", step.description);

        let result = Command::new("sh")
            .arg("-c")
            .arg(&step.command)
            .current_dir(working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => {
                debug!("Output: {}", String::from_utf8_lossy(&output.stdout));
            }
            Ok(output) => {
                error!("Step failed: {}", String::from_utf8_lossy(&output.stderr));
                return false;
            }
            Err(e) => {
                error!("Error executing step: {}", e);
                return false;
            }
        }
    }

    true
}
