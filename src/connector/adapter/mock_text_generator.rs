use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::application::TextGenerator;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub enum MockReply {
    /// A canned plan that names the destination found in the prompt.
    SamplePlan,
    Text(String),
    Error(String),
    /// Never resolves; only a timeout or cancellation ends the wait.
    Never,
}

/// Offline [`TextGenerator`] with a scripted delay and reply.
///
/// Delays use `tokio::time::sleep`, so tests running on a paused clock see
/// exact virtual timings.
pub struct MockTextGenerator {
    delay: Duration,
    reply: MockReply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
            reply: MockReply::SamplePlan,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new().with_reply(MockReply::Text(text.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new().with_reply(MockReply::Error(message.into()))
    }

    pub fn never() -> Self {
        Self::new().with_reply(MockReply::Never)
    }

    pub fn with_reply(mut self, reply: MockReply) -> Self {
        self.reply = reply;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// How many times `generate` has started.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }

    fn sample_plan(prompt: &str) -> String {
        let destination = prompt
            .lines()
            .find_map(|line| line.trim().strip_prefix("- Destination: "))
            .unwrap_or("your destination");

        format!(
            "## Itinerary\n\
             Day 1: Arrive in {destination}, check in, and take an evening walk.\n\
             Day 2: Guided tour of the old town and local markets.\n\n\
             ## Accommodations\nA well-reviewed mid-range hotel near the centre.\n\n\
             ## Transportation\nPublic transit passes plus one airport transfer.\n\n\
             ## Activities & Attractions\nMuseums, food tour, and a day trip.\n\n\
             ## Budget Breakdown\n40% stay, 25% food, 20% activities, 15% transport.\n\n\
             ## Travel Tips\nBook popular sights ahead and carry some cash.\n\n\
             (Offline sample plan.)"
        )
    }
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::AcqRel);
        if let Ok(mut slot) = self.last_prompt.lock() {
            *slot = Some(prompt.to_string());
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        debug!("MockTextGenerator replying after {:?}", self.delay);

        match &self.reply {
            MockReply::SamplePlan => Ok(Self::sample_plan(prompt)),
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Error(message) => Err(DomainError::provider(message.clone())),
            MockReply::Never => std::future::pending().await,
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
