use async_trait::async_trait;

use crate::domain::DomainError;

/// A hosted model that turns one prompt into one block of text.
///
/// Implementors handle transport, serialization, and vendor-specific API
/// details. They are not expected to enforce a deadline or honour
/// cancellation: [`crate::GenerateTravelPlanUseCase`] layers both on top by
/// racing and, when it loses, dropping the returned future.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send `prompt` and return the model's full response text.
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;

    /// Provider/model label for logs.
    fn model_name(&self) -> &str;
}
