//! README instruction analysis
//!
//! Turns unstructured README text into a [`BuildPlan`] by running a fixed
//! ordered list of extraction strategies; the first to succeed wins. The
//! caller composes this with the retry policy and result cache at the call
//! site, so the wrapping order stays visible:
//!
//! ```ignore
//! let key = cache_key(readme);
//! let plan = cache
//!     .get_or_compute(&key, || async {
//!         retry.run(|| analyzer.extract(readme)).await.ok()
//!     })
//!     .await;
//! ```

mod plan;
mod strategy;

pub use plan::{parse_dependencies, parse_steps, BuildPlan, Step};
pub use strategy::{
    extract_json_from_response, ExtractionStrategy, FallbackExtractor, PrimaryExtractor,
};

use crate::llm::{LlmClient, LlmError};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during README analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// LLM communication failed
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// The model response could not be parsed into a build plan
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Every extraction strategy failed
    #[error("All extraction strategies failed: {0}")]
    Exhausted(String),
}

/// Runs extraction strategies in fixed order until one produces a plan
pub struct InstructionAnalyzer {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl InstructionAnalyzer {
    /// Creates the standard analyzer: primary extraction, then fallback
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            strategies: vec![
                Box::new(PrimaryExtractor::new(client.clone())),
                Box::new(FallbackExtractor::new(client)),
            ],
        }
    }

    /// Creates an analyzer with an explicit strategy list, for tests
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extracts a build plan from README text
    ///
    /// Strategies are tried in order; a failure is logged and the next
    /// strategy attempted. Errors only surface once every strategy has
    /// failed — the caller decides whether that means "no instructions"
    /// or is worth a retry.
    pub async fn extract(&self, readme: &str) -> Result<BuildPlan, AnalysisError> {
        let mut last_error = String::new();

        for strategy in &self.strategies {
            match strategy.extract(readme).await {
                Ok(plan) => return Ok(plan),
                Err(e) => {
                    warn!("{} extraction failed: {}", strategy.name(), e);
                    last_error = e.to_string();
                }
            }
        }

        Err(AnalysisError::Exhausted(last_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockLlmClient, MockResponse};
    use async_trait::async_trait;

    struct FixedStrategy {
        result: Result<BuildPlan, String>,
        name: &'static str,
    }

    #[async_trait]
    impl ExtractionStrategy for FixedStrategy {
        async fn extract(&self, _readme: &str) -> Result<BuildPlan, AnalysisError> {
            self.result
                .clone()
                .map_err(|message| AnalysisError::Parse { message })
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn empty_plan() -> BuildPlan {
        BuildPlan {
            dependencies: Vec::new(),
            setup_steps: Vec::new(),
            build_steps: Vec::new(),
            test_steps: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_first_successful_strategy_wins() {
        let analyzer = InstructionAnalyzer::with_strategies(vec![
            Box::new(FixedStrategy {
                result: Err("primary down".to_string()),
                name: "primary",
            }),
            Box::new(FixedStrategy {
                result: Ok(empty_plan()),
                name: "fallback",
            }),
        ]);

        let plan = analyzer.extract("# README").await.unwrap();
        assert_eq!(plan, empty_plan());
    }

    #[tokio::test]
    async fn test_all_strategies_failing_is_exhaustion() {
        let analyzer = InstructionAnalyzer::with_strategies(vec![
            Box::new(FixedStrategy {
                result: Err("first".to_string()),
                name: "primary",
            }),
            Box::new(FixedStrategy {
                result: Err("second".to_string()),
                name: "fallback",
            }),
        ]);

        let result = analyzer.extract("# README").await;
        match result {
            Err(AnalysisError::Exhausted(message)) => assert!(message.contains("second")),
            other => panic!("expected exhaustion, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_standard_analyzer_falls_back_to_plain_sections() {
        // Primary gets prose (no JSON), fallback gets labeled sections
        let client = std::sync::Arc::new(MockLlmClient::new());
        client.add_responses([
            MockResponse::text("no json in sight"),
            MockResponse::text("DEPENDENCIES:\nflask\nSETUP_STEPS:\nBUILD_STEPS:\nTEST_STEPS:\n"),
        ]);

        let analyzer = InstructionAnalyzer::new(client);
        let plan = analyzer.extract("# README").await.unwrap();

        assert_eq!(plan.dependencies, vec!["flask"]);
        assert!(plan.setup_steps.is_empty());
    }

    #[tokio::test]
    async fn test_analysis_scenario_from_plain_readme() {
        // A README whose lines follow prose-label form still parses
        // mechanically into one setup step.
        let client = std::sync::Arc::new(MockLlmClient::new());
        client.add_response(MockResponse::text(
            serde_json::json!({
                "dependencies": "",
                "setup_steps": "Run: python app.py",
                "build_steps": "",
                "test_steps": "",
            })
            .to_string(),
        ));

        let analyzer = InstructionAnalyzer::new(client);
        let plan = analyzer
            .extract("Install: pip install flask\nRun: python app.py")
            .await
            .unwrap();

        assert_eq!(plan.setup_steps.len(), 1);
        assert_eq!(plan.setup_steps[0].command, "Run");
        assert_eq!(plan.setup_steps[0].description, "python app.py");
    }
}
