use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::application::{GenerateTravelPlanUseCase, PlanSession, TextGenerator, DEFAULT_TIMEOUT_MS};
use crate::domain::DomainError;
use crate::{AnthropicClient, GeminiClient, MockTextGenerator};

/// Delay before the front end offers the "taking longer than usual" hint.
pub const DEFAULT_LONG_WAIT_HINT_MS: u64 = 7_000;
pub const DEFAULT_MOCK_DELAY_MS: u64 = 1_500;

/// Which text-generation backend serves `plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Gemini,
    Anthropic,
    Mock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Mock => "mock",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "anthropic" | "claude" | "lmstudio" => Ok(ProviderKind::Anthropic),
            "mock" | "offline" => Ok(ProviderKind::Mock),
            unknown => Err(DomainError::configuration(format!(
                "unknown provider '{unknown}' (expected gemini, anthropic, or mock)"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContainerConfig {
    pub provider: ProviderKind,
    /// Overrides the provider's model from its environment defaults.
    pub model: Option<String>,
    /// Generation budget. Zero or negative means "already expired".
    pub timeout_ms: i64,
    /// Purely presentational: when to show the extended-wait hint.
    pub long_wait_hint_ms: u64,
    pub mock_delay_ms: u64,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            long_wait_hint_ms: DEFAULT_LONG_WAIT_HINT_MS,
            mock_delay_ms: DEFAULT_MOCK_DELAY_MS,
        }
    }
}

impl ContainerConfig {
    /// Defaults overlaid with environment variables:
    ///
    /// | Variable                    | Default  |
    /// |-----------------------------|----------|
    /// | `TRAVEL_GENIE_PROVIDER`     | `gemini` |
    /// | `TRAVEL_GENIE_TIMEOUT_MS`   | `180000` |
    /// | `TRAVEL_GENIE_LONG_WAIT_MS` | `7000`   |
    ///
    /// Provider credentials, models, and endpoints are read by the provider
    /// adapters themselves.
    pub fn from_env() -> Result<Self, DomainError> {
        let mut config = Self::default();
        if let Ok(provider) = std::env::var("TRAVEL_GENIE_PROVIDER") {
            config.provider = provider.parse()?;
        }
        if let Some(ms) = env_number("TRAVEL_GENIE_TIMEOUT_MS")? {
            config.timeout_ms = ms;
        }
        if let Some(ms) = env_number("TRAVEL_GENIE_LONG_WAIT_MS")? {
            config.long_wait_hint_ms = ms;
        }
        Ok(config)
    }

    pub fn long_wait_hint(&self) -> Duration {
        Duration::from_millis(self.long_wait_hint_ms)
    }
}

fn env_number<T: FromStr>(var: &str) -> Result<Option<T>, DomainError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DomainError::configuration(format!("{var} must be a number, got '{raw}'"))),
        Err(_) => Ok(None),
    }
}

pub struct Container {
    generator: Option<Arc<dyn TextGenerator>>,
    config: ContainerConfig,
}

impl Container {
    /// Providers are built on first use, so commands that never generate
    /// (such as `prompt`) work without credentials. A missing key surfaces
    /// from [`Container::plan_use_case`] as a configuration error.
    pub fn new(config: ContainerConfig) -> Self {
        Self {
            generator: None,
            config,
        }
    }

    /// Use `generator` instead of the configured provider.
    pub fn with_generator(config: ContainerConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
            config,
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    fn generator(&self) -> Result<Arc<dyn TextGenerator>, DomainError> {
        if let Some(generator) = &self.generator {
            return Ok(Arc::clone(generator));
        }

        let model = self.config.model.clone();
        let generator: Arc<dyn TextGenerator> = match self.config.provider {
            ProviderKind::Gemini => {
                debug!("Initializing Gemini client");
                let client = GeminiClient::from_env()?;
                Arc::new(match model {
                    Some(m) => client.with_model(m),
                    None => client,
                })
            }
            ProviderKind::Anthropic => {
                debug!("Initializing Anthropic-compatible client");
                let client = AnthropicClient::from_env();
                Arc::new(match model {
                    Some(m) => client.with_model(m),
                    None => client,
                })
            }
            ProviderKind::Mock => {
                debug!("Using mock text generator");
                Arc::new(
                    MockTextGenerator::new()
                        .with_delay(Duration::from_millis(self.config.mock_delay_ms)),
                )
            }
        };
        Ok(generator)
    }

    pub fn plan_use_case(&self) -> Result<GenerateTravelPlanUseCase, DomainError> {
        Ok(GenerateTravelPlanUseCase::new(self.generator()?))
    }

    pub fn plan_session(&self) -> Result<PlanSession, DomainError> {
        Ok(PlanSession::new(
            Arc::new(self.plan_use_case()?),
            self.config.timeout_ms,
        ))
    }
}
