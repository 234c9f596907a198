use anyhow::Result;

use crate::application::build_prompt;
use crate::cli::RequestArgs;

use super::request_form::{submit_request, today};

/// Shows exactly what `plan` would send, without touching a provider.
pub struct PromptController;

impl PromptController {
    pub fn new() -> Self {
        Self
    }

    pub fn prompt(&self, args: RequestArgs) -> Result<String> {
        let request = submit_request(&args, today())?;
        Ok(build_prompt(&request))
    }
}

impl Default for PromptController {
    fn default() -> Self {
        Self::new()
    }
}
