//! Gemini `generateContent` client.
//!
//! Each operation sends a structured prompt with a JSON response schema
//! and validates the first candidate's text against that schema.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

use super::schema::SchemaPayload;
use super::{
    credentials, prompts, ActivityAnalysis, ArithmeticProblem, GenerationService,
    GroundingPrompt, IntentVerdict,
};
use crate::error::GenerationError;
use crate::ledger::ActivityRow;
use crate::settings::{Difficulty, PersonalityType};
use crate::storage::GenerationConfig;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Client for the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(
        config: &GenerationConfig,
        api_key: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)?.join(&format!(
            "v1beta/models/{}:generateContent",
            config.model.trim()
        ))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    /// Build a client using the API key from the environment or keyring.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let (key, source) = credentials::resolve().ok_or(GenerationError::MissingApiKey)?;
        tracing::debug!(?source, model = %config.model, "using generation API key");
        Self::new(config, key)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn generate<T: SchemaPayload>(&self, prompt: String) -> Result<T, GenerationError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": T::response_schema()
            }
        });

        tracing::debug!(operation = T::OPERATION, "sending generation request");
        let resp = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation = T::OPERATION, %status, "generation request failed");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateContentResponse =
            resp.json().await.map_err(|e| GenerationError::Schema {
                operation: T::OPERATION,
                message: format!("invalid response envelope: {e}"),
            })?;

        let text: String = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse(T::OPERATION));
        }
        T::parse(&text)
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate_arithmetic_problem(
        &self,
        difficulty: Difficulty,
    ) -> Result<ArithmeticProblem, GenerationError> {
        self.generate(prompts::arithmetic_problem(difficulty)).await
    }

    async fn generate_grounding_prompt(&self) -> Result<GroundingPrompt, GenerationError> {
        self.generate(prompts::grounding_prompt()).await
    }

    async fn validate_intent(
        &self,
        intent: &str,
        goal: &str,
        tone: PersonalityType,
    ) -> Result<IntentVerdict, GenerationError> {
        self.generate(prompts::validate_intent(intent, goal, tone)).await
    }

    async fn analyze_activity_log(
        &self,
        rows: &[ActivityRow],
        goal: &str,
        tone: PersonalityType,
    ) -> Result<ActivityAnalysis, GenerationError> {
        let prompt = prompts::analyze_activity_log(rows, goal, tone).map_err(|e| {
            GenerationError::Schema {
                operation: ActivityAnalysis::OPERATION,
                message: format!("could not encode ledger rows: {e}"),
            }
        })?;
        self.generate(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> GenerationConfig {
        GenerationConfig {
            base_url: base_url.into(),
            model: "gemini-test".into(),
            timeout_secs: 5,
        }
    }

    fn envelope(text: &str) -> String {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }).to_string()
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new(&config("https://example.com/api"), "k").unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://example.com/api/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            GeminiClient::new(&config("not a url"), "k"),
            Err(GenerationError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn parses_arithmetic_problem() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .match_header("x-goog-api-key", "secret")
            .match_body(mockito::Matcher::PartialJson(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(r#"{"question":"12 * 12","answer":"144","explanation":"square"}"#))
            .create_async()
            .await;

        let client = GeminiClient::new(&config(&server.url()), "secret").unwrap();
        let problem = client
            .generate_arithmetic_problem(Difficulty::Medium)
            .await
            .unwrap();
        assert_eq!(problem.answer, "144");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_is_a_service_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let client = GeminiClient::new(&config(&server.url()), "secret").unwrap();
        let err = client.generate_grounding_prompt().await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Status { status: 503, ref body } if body == "overloaded"
        ));
    }

    #[tokio::test]
    async fn partial_payload_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .with_status(200)
            .with_body(envelope(r#"{"isValid":true}"#))
            .create_async()
            .await;

        let client = GeminiClient::new(&config(&server.url()), "secret").unwrap();
        let err = client
            .validate_intent("reply to my manager", "Finish report", PersonalityType::Supportive)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Schema { .. }));
    }

    #[tokio::test]
    async fn missing_candidates_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(&config(&server.url()), "secret").unwrap();
        let err = client.generate_grounding_prompt().await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse(_)));
    }
}
