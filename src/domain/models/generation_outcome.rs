use std::fmt;

use serde::{Deserialize, Serialize};

pub const CANCELLED_MESSAGE: &str = "Generation aborted by user.";
pub const TIMED_OUT_MESSAGE: &str = "Generation timed out. Try again or shorten the request.";
pub const FAILED_MESSAGE: &str = "Failed to generate travel plan. Please try again.";

/// The provider rejected the call. `message` carries the underlying detail
/// for logs; users only ever see [`FAILED_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    message: String,
}

impl ProviderFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The single terminal result of one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Success { plan: String },
    Cancelled,
    TimedOut,
    Failed { failure: ProviderFailure },
}

impl GenerationOutcome {
    pub fn success(plan: impl Into<String>) -> Self {
        Self::Success { plan: plan.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            failure: ProviderFailure::new(message),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Cancelled => "cancelled",
            Self::TimedOut => "timed_out",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn plan(&self) -> Option<&str> {
        match self {
            Self::Success { plan } => Some(plan),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether the caller may reasonably submit the same request again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TimedOut | Self::Failed { .. })
    }

    /// Text shown to the user for non-success outcomes.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Success { .. } => None,
            Self::Cancelled => Some(CANCELLED_MESSAGE),
            Self::TimedOut => Some(TIMED_OUT_MESSAGE),
            Self::Failed { .. } => Some(FAILED_MESSAGE),
        }
    }
}

impl fmt::Display for GenerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}
