//! Trip planning on top of a hosted text-generation model.
//!
//! The interesting part is [`GenerateTravelPlanUseCase`]: it races one
//! provider call against a deadline and a user cancellation, settles to
//! exactly one [`GenerationOutcome`], and tears down its timer and listener
//! on every path. Cancellation is cooperative: the caller stops waiting, but
//! a hosted model may keep generating (and billing) remotely.

pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    build_prompt, DisplayState, GenerateTravelPlanUseCase, Notification, PendingGeneration,
    PlanSession, RequestHandle, RequestId, Severity, TextGenerator, WatcherProbe, WatcherStats,
    DEFAULT_TIMEOUT_MS,
};

pub use cli::{Commands, OutputFormat, RequestArgs};

pub use connector::api::{Container, ContainerConfig, ProviderKind, Router};
pub use connector::{AnthropicClient, ApiKey, GeminiClient, MockReply, MockTextGenerator};

pub use domain::{
    Currency, DomainError, FieldError, GenerationOutcome, ProviderFailure, TravelRequest,
    TravelRequestDraft, ValidationFailure, CANCELLED_MESSAGE, FAILED_MESSAGE, POPULAR_INTERESTS,
    TIMED_OUT_MESSAGE,
};
