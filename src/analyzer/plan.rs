//! Build plan data model and line parsing
//!
//! A `BuildPlan` is the structured output of README analysis: a dependency
//! list plus setup, build, and test step lists. Step lists arrive from the
//! model as free text, one `command: description` pair per line.

use serde::{Deserialize, Serialize};

/// One shell command paired with a human-readable description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Shell command line to execute
    pub command: String,
    /// Human-readable label for the step
    pub description: String,
}

/// Structured build instructions extracted from a README
///
/// Immutable after creation. Every list may be empty; an empty list means
/// the corresponding stage trivially succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Free-text dependency specs, one install command each
    pub dependencies: Vec<String>,
    /// Commands run before the build
    pub setup_steps: Vec<Step>,
    /// Commands that produce the build
    pub build_steps: Vec<Step>,
    /// Commands that exercise the test suite
    pub test_steps: Vec<Step>,
}

/// Parses a block of step text into a step list
///
/// Each line containing a colon becomes one `Step`: command = text before
/// the first colon, description = text after it, both trimmed. Lines
/// without a colon are silently dropped. The split is mechanical; lines
/// that happen to put prose before the colon are parsed as-is rather than
/// second-guessed.
pub fn parse_steps(text: &str) -> Vec<Step> {
    let mut steps = Vec::new();
    for line in text.lines() {
        if let Some((command, description)) = line.split_once(':') {
            steps.push(Step {
                command: command.trim().to_string(),
                description: description.trim().to_string(),
            });
        }
    }
    steps
}

/// Parses a block of dependency text into one spec per non-empty line
pub fn parse_dependencies(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
