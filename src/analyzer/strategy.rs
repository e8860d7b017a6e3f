//! README extraction strategies
//!
//! Two strategies behind one trait, tried in fixed order by the analyzer:
//! a primary structured-JSON extraction and a plain labeled-section
//! fallback. Both emit the same four fields and feed the same line parser.

use super::plan::{parse_dependencies, parse_steps, BuildPlan};
use super::AnalysisError;
use crate::llm::{ChatMessage, LlmClient, LlmRequest};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const ANALYSIS_TEMPERATURE: f32 = 0.1;
const ANALYSIS_MAX_TOKENS: u32 = 1000;

/// System prompt for the structured-JSON extraction path
const PRIMARY_SYSTEM_PROMPT: &str = r#"You analyze README files for build instructions.

Respond with a single JSON object and nothing else. The object has exactly
four string fields:
- "dependencies": required packages, one per line
- "setup_steps": setup commands, one per line as "command: description"
- "build_steps": build commands, one per line as "command: description"
- "test_steps": test commands, one per line as "command: description"

Use an empty string for any field the README gives no instructions for."#;

/// System prompt for the plain-text fallback path
const FALLBACK_SYSTEM_PROMPT: &str = r#"You analyze README files for build instructions.

Respond in plain text with exactly these four labeled sections, in order:

DEPENDENCIES:
<required packages, one per line>

SETUP_STEPS:
<setup commands, one per line as "command: description">

BUILD_STEPS:
<build commands, one per line as "command: description">

TEST_STEPS:
<test commands, one per line as "command: description">

Leave a section empty when the README gives no instructions for it."#;

/// Raw four-field analysis as emitted by the model
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    dependencies: String,
    #[serde(default)]
    setup_steps: String,
    #[serde(default)]
    build_steps: String,
    #[serde(default)]
    test_steps: String,
}

impl RawAnalysis {
    fn into_plan(self) -> BuildPlan {
        BuildPlan {
            dependencies: parse_dependencies(&self.dependencies),
            setup_steps: parse_steps(&self.setup_steps),
            build_steps: parse_steps(&self.build_steps),
            test_steps: parse_steps(&self.test_steps),
        }
    }
}

/// One extraction attempt: README text in, build plan out
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    async fn extract(&self, readme: &str) -> Result<BuildPlan, AnalysisError>;

    fn name(&self) -> &str;
}

/// Structured-prediction extraction: asks the model for a JSON object
pub struct PrimaryExtractor {
    client: Arc<dyn LlmClient>,
}

impl PrimaryExtractor {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExtractionStrategy for PrimaryExtractor {
    async fn extract(&self, readme: &str) -> Result<BuildPlan, AnalysisError> {
        let request = LlmRequest::new(vec![
            ChatMessage::system(PRIMARY_SYSTEM_PROMPT),
            ChatMessage::user(readme),
        ])
        .with_temperature(ANALYSIS_TEMPERATURE)
        .with_max_tokens(ANALYSIS_MAX_TOKENS);

        let response = self.client.complete(request).await?;
        debug!(
            "Primary extraction response ({} chars)",
            response.content.len()
        );

        let json = extract_json_from_response(&response.content)?;
        let raw: RawAnalysis = serde_json::from_str(&json).map_err(|e| AnalysisError::Parse {
            message: format!(
                "{}: {}",
                e,
                json.chars().take(100).collect::<String>()
            ),
        })?;

        Ok(raw.into_plan())
    }

    fn name(&self) -> &str {
        "primary"
    }
}

/// Plain-prompt fallback extraction: labeled text sections
pub struct FallbackExtractor {
    client: Arc<dyn LlmClient>,
}

impl FallbackExtractor {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExtractionStrategy for FallbackExtractor {
    async fn extract(&self, readme: &str) -> Result<BuildPlan, AnalysisError> {
        let request = LlmRequest::new(vec![
            ChatMessage::system(FALLBACK_SYSTEM_PROMPT),
            ChatMessage::user(readme),
        ])
        .with_temperature(ANALYSIS_TEMPERATURE)
        .with_max_tokens(ANALYSIS_MAX_TOKENS);

        let response = self.client.complete(request).await?;
        debug!(
            "Fallback extraction response ({} chars)",
            response.content.len()
        );

        parse_labeled_sections(&response.content)
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

/// Pulls a JSON object out of a model response
///
/// Accepts a bare object, an object inside a markdown code fence, or an
/// object embedded in surrounding prose.
pub fn extract_json_from_response(response: &str) -> Result<String, AnalysisError> {
    let trimmed = response.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Ok(trimmed.to_string());
    }

    if trimmed.contains("```") {
        return extract_from_markdown_block(trimmed);
    }

    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            if start < end {
                return Ok(trimmed[start..=end].to_string());
            }
        }
    }

    Err(AnalysisError::Parse {
        message: "No JSON object found in response".to_string(),
    })
}

fn extract_from_markdown_block(text: &str) -> Result<String, AnalysisError> {
    let re = Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").unwrap();

    if let Some(captures) = re.captures(text) {
        if let Some(json_match) = captures.get(1) {
            let json = json_match.as_str().trim();
            if json.starts_with('{') && json.ends_with('}') {
                return Ok(json.to_string());
            }
        }
    }

    Err(AnalysisError::Parse {
        message: "Could not extract JSON from markdown block".to_string(),
    })
}

/// Parses the fallback's labeled-section format into a build plan
fn parse_labeled_sections(text: &str) -> Result<BuildPlan, AnalysisError> {
    const SECTIONS: [&str; 4] = ["DEPENDENCIES", "SETUP_STEPS", "BUILD_STEPS", "TEST_STEPS"];

    let mut bodies: [String; 4] = Default::default();
    let mut current: Option<usize> = None;
    let mut seen_any = false;

    for line in text.lines() {
        let header = line.trim().trim_end_matches(':');
        if let Some(idx) = SECTIONS.iter().position(|s| s.eq_ignore_ascii_case(header)) {
            current = Some(idx);
            seen_any = true;
            continue;
        }
        if let Some(idx) = current {
            bodies[idx].push_str(line);
            bodies[idx].push('\n');
        }
    }

    if !seen_any {
        return Err(AnalysisError::Parse {
            message: "No labeled sections found in response".to_string(),
        });
    }

    let [dependencies, setup, build, test] = bodies;
    Ok(BuildPlan {
        dependencies: parse_dependencies(&dependencies),
        setup_steps: parse_steps(&setup),
        build_steps: parse_steps(&build),
        test_steps: parse_steps(&test),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, MockLlmClient, MockResponse};

    fn analysis_json() -> String {
        serde_json::json!({
            "dependencies": "flask\nrequests",
            "setup_steps": "python -m venv .venv: create a virtualenv",
            "build_steps": "",
            "test_steps": "pytest: run the suite",
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_primary_parses_bare_json() {
        let client = Arc::new(MockLlmClient::new());
        client.add_response(MockResponse::text(analysis_json()));

        let plan = PrimaryExtractor::new(client)
            .extract("# README")
            .await
            .unwrap();

        assert_eq!(plan.dependencies, vec!["flask", "requests"]);
        assert_eq!(plan.setup_steps.len(), 1);
        assert_eq!(plan.setup_steps[0].command, "python -m venv .venv");
        assert!(plan.build_steps.is_empty());
        assert_eq!(plan.test_steps[0].command, "pytest");
    }

    #[tokio::test]
    async fn test_primary_parses_fenced_json() {
        let client = Arc::new(MockLlmClient::new());
        client.add_response(MockResponse::text(format!(
            "Here you go:\n```json\n{}\n```",
            analysis_json()
        )));

        let plan = PrimaryExtractor::new(client)
            .extract("# README")
            .await
            .unwrap();

        assert_eq!(plan.dependencies.len(), 2);
    }

    #[tokio::test]
    async fn test_primary_parses_json_embedded_in_prose() {
        let client = Arc::new(MockLlmClient::new());
        client.add_response(MockResponse::text(format!(
            "The analysis follows. {} That is all.",
            analysis_json()
        )));

        let plan = PrimaryExtractor::new(client)
            .extract("# README")
            .await
            .unwrap();

        assert_eq!(plan.test_steps.len(), 1);
    }

    #[tokio::test]
    async fn test_primary_rejects_prose_without_json() {
        let client = Arc::new(MockLlmClient::new());
        client.add_response(MockResponse::text("I could not find any instructions."));

        let result = PrimaryExtractor::new(client).extract("# README").await;
        assert!(matches!(result, Err(AnalysisError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_primary_propagates_client_errors() {
        let client = Arc::new(MockLlmClient::new());
        client.add_response(MockResponse::error(LlmError::Timeout { seconds: 30 }));

        let result = PrimaryExtractor::new(client).extract("# README").await;
        assert!(matches!(result, Err(AnalysisError::Llm(_))));
    }

    #[tokio::test]
    async fn test_fallback_parses_labeled_sections() {
        let client = Arc::new(MockLlmClient::new());
        client.add_response(MockResponse::text(
            "DEPENDENCIES:\nflask\n\nSETUP_STEPS:\npip install -r requirements.txt: install deps\n\nBUILD_STEPS:\n\nTEST_STEPS:\npytest: run tests\n",
        ));

        let plan = FallbackExtractor::new(client)
            .extract("# README")
            .await
            .unwrap();

        assert_eq!(plan.dependencies, vec!["flask"]);
        assert_eq!(
            plan.setup_steps[0].command,
            "pip install -r requirements.txt"
        );
        assert!(plan.build_steps.is_empty());
        assert_eq!(plan.test_steps[0].description, "run tests");
    }

    #[tokio::test]
    async fn test_fallback_rejects_unlabeled_text() {
        let client = Arc::new(MockLlmClient::new());
        client.add_response(MockResponse::text("no sections here at all"));

        let result = FallbackExtractor::new(client).extract("# README").await;
        assert!(matches!(result, Err(AnalysisError::Parse { .. })));
    }

    #[test]
    fn test_extract_json_variants() {
        assert!(extract_json_from_response("{\"a\": 1}").is_ok());
        assert!(extract_json_from_response("```json\n{\"a\": 1}\n```").is_ok());
        assert!(extract_json_from_response("prefix {\"a\": 1} suffix").is_ok());
        assert!(extract_json_from_response("nothing structured").is_err());
    }
}
