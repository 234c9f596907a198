use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ApiKey;
use crate::application::TextGenerator;
use crate::domain::DomainError;

/// LM Studio's standard local port.
pub const ANTHROPIC_DEFAULT_BASE_URL: &str = "http://localhost:1234";
pub const ANTHROPIC_DEFAULT_MODEL: &str = "ministral-3b-2512";
const MESSAGES_PATH: &str = "/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// A week-long itinerary with six sections runs to a few thousand tokens.
const MAX_TOKENS: u32 = 4096;
const REACHABILITY_TIMEOUT: Duration = Duration::from_secs(2);

const SYSTEM_PROMPT: &str = "\
You are a meticulous travel planner. Answer with a complete plan in plain \
text or markdown, using the section headers the user asks for. Keep every \
recommendation specific to the destination and within the stated budget.";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserTurn<'a>; 1],
}

#[derive(Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<TextBlock>,
    stop_reason: Option<String>,
}

#[derive(Deserialize)]
struct TextBlock {
    #[serde(default)]
    text: String,
}

/// Text generator backed by the Anthropic Messages API or any server that
/// speaks it.
///
/// Defaults point at a local LM Studio without a key. For the hosted API:
///
/// ```text
/// ANTHROPIC_BASE_URL=https://api.anthropic.com
/// ANTHROPIC_API_KEY=sk-ant-...
/// ANTHROPIC_MODEL=claude-haiku-4-5
/// ```
///
/// Each call first checks that the server answers at all, so a stopped local
/// server fails within seconds rather than eating the generation budget.
pub struct AnthropicClient {
    http: reqwest::Client,
    reachability: reqwest::Client,
    api_key: ApiKey,
    model: String,
    root: String,
}

impl AnthropicClient {
    pub fn new(api_key: ApiKey, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        let root = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        let reachability = reqwest::Client::builder()
            .connect_timeout(REACHABILITY_TIMEOUT)
            .timeout(REACHABILITY_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http,
            reachability,
            api_key,
            model: model.into(),
            root,
        }
    }

    /// Reads `ANTHROPIC_BASE_URL`, `ANTHROPIC_MODEL`, and `ANTHROPIC_API_KEY`.
    /// None of them is required.
    pub fn from_env() -> Self {
        let base = std::env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| ANTHROPIC_DEFAULT_BASE_URL.to_string());
        let model = std::env::var("ANTHROPIC_MODEL")
            .unwrap_or_else(|_| ANTHROPIC_DEFAULT_MODEL.to_string());
        let key = ApiKey::from_env("ANTHROPIC_API_KEY").unwrap_or_default();
        Self::new(key, model, base)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn messages_url(&self) -> String {
        format!("{}{}", self.root, MESSAGES_PATH)
    }

    /// Any HTTP status counts as reachable; only connect failures and the
    /// short timeout do not.
    async fn ensure_reachable(&self) -> Result<(), DomainError> {
        let probe = self.reachability.head(format!("{}/", self.root)).send().await;
        match probe {
            Err(e) if e.is_connect() || e.is_timeout() => Err(DomainError::provider(format!(
                "AnthropicClient: no server at {}: {e}",
                self.root
            ))),
            _ => Ok(()),
        }
    }

    fn plan_text(response: MessagesResponse) -> Result<String, DomainError> {
        let text: String = response.content.into_iter().map(|b| b.text).collect();
        if text.trim().is_empty() {
            let reason = response.stop_reason.as_deref().unwrap_or("unknown");
            return Err(DomainError::provider(format!(
                "AnthropicClient: empty response (stop reason {reason})"
            )));
        }
        Ok(text)
    }
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("api_key", &self.api_key)
            .field("model", &self.model)
            .field("root", &self.root)
            .finish()
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        self.ensure_reachable().await?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT,
            messages: [UserTurn {
                role: "user",
                content: prompt,
            }],
        };
        debug!("AnthropicClient: POST {}", self.messages_url());

        let response = self
            .http
            .post(self.messages_url())
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::provider(format!("AnthropicClient: send failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!("AnthropicClient: {status} from {}: {detail}", self.root);
            return Err(DomainError::provider(format!(
                "AnthropicClient: server answered {status}"
            )));
        }

        let parsed = response.json::<MessagesResponse>().await.map_err(|e| {
            DomainError::provider(format!("AnthropicClient: unreadable response: {e}"))
        })?;
        Self::plan_text(parsed)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
