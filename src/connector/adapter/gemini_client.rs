use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ApiKey;
use crate::application::TextGenerator;
use crate::domain::DomainError;

pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_VERSION_PATH: &str = "/v1beta/models";

const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for the Google Gemini `generateContent` endpoint.
///
/// Every request carries the four standard safety settings at
/// `BLOCK_MEDIUM_AND_ABOVE`. Only a connect timeout is configured; how long
/// to wait for the model is decided by the caller.
///
/// ```text
/// GEMINI_API_KEY=AIza...            (required)
/// GEMINI_MODEL=gemini-2.5-flash
/// GEMINI_BASE_URL=https://generativelanguage.googleapis.com
/// ```
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: ApiKey, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        Self {
            client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            api_key,
            model: model.into(),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    /// Construct from `GEMINI_API_KEY`, `GEMINI_MODEL`, and `GEMINI_BASE_URL`.
    pub fn from_env() -> Result<Self, DomainError> {
        let key = ApiKey::from_env("GEMINI_API_KEY").ok_or_else(|| {
            DomainError::configuration("GEMINI_API_KEY is not set (or use --provider mock)")
        })?;
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| GEMINI_DEFAULT_MODEL.to_string());
        let base = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| GEMINI_DEFAULT_BASE_URL.to_string());
        Ok(Self::new(key, model, base))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}/{}:generateContent",
            self.base_url, API_VERSION_PATH, self.model
        )
    }

    fn request_body(prompt: &str) -> GenerateContentRequest<'_> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        }
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(response: GenerateContentResponse) -> Result<String, DomainError> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(DomainError::provider(format!(
                "GeminiClient: prompt blocked ({reason})"
            )));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider("GeminiClient: response has no candidates"))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
            return Err(DomainError::provider(format!(
                "GeminiClient: empty response (finish reason {reason})"
            )));
        }

        Ok(text)
    }

    fn error_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|e| e.error.message)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &self.api_key)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        debug!("GeminiClient: POST {}", self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose())
            .json(&Self::request_body(prompt))
            .send()
            .await
            .map_err(|e| DomainError::provider(format!("GeminiClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("GeminiClient: API returned {status}: {body}");
            let detail = Self::error_message(&body).unwrap_or_else(|| status.to_string());
            return Err(DomainError::provider(format!(
                "GeminiClient: API returned {status}: {detail}"
            )));
        }

        let api_response: GenerateContentResponse = response.json().await.map_err(|e| {
            DomainError::provider(format!("GeminiClient: failed to parse response: {e}"))
        })?;

        Self::extract_text(api_response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_body_carries_safety_settings() {
        let body = serde_json::to_value(GeminiClient::request_body("hello")).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["contents"][0]["role"], "user");
        let settings = body["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        assert!(settings
            .iter()
            .all(|s| s["threshold"] == "BLOCK_MEDIUM_AND_ABOVE"));
    }

    #[test]
    fn extract_text_joins_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"Day 1. "},{"text":"Day 2."}]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(GeminiClient::extract_text(response).unwrap(), "Day 1. Day 2.");
    }

    #[test]
    fn extract_text_reports_blocked_prompt() {
        let response = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        let err = GeminiClient::extract_text(response).unwrap_err();
        assert!(err.is_provider_error());
        assert!(err.to_string().contains("prompt blocked (SAFETY)"));
    }

    #[test]
    fn extract_text_rejects_empty_candidate() {
        let response = parse(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#);
        let err = GeminiClient::extract_text(response).unwrap_err();
        assert!(err.to_string().contains("finish reason MAX_TOKENS"));
    }

    #[test]
    fn error_message_reads_google_envelope() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            GeminiClient::error_message(body).as_deref(),
            Some("API key not valid.")
        );
        assert!(GeminiClient::error_message("<html>").is_none());
    }

    #[test]
    fn from_env_requires_api_key() {
        std::env::remove_var("GEMINI_API_KEY");
        let err = GeminiClient::from_env().unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new(ApiKey::new("k"), "gemini-2.5-flash", "http://localhost:9/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(!format!("{client:?}").contains("\"k\""));
    }
}
