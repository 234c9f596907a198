use anyhow::Result;
use tracing::warn;

use crate::Commands;

use super::container::Container;
use super::controller::{CatalogController, PlanController, PromptController};

pub struct Router<'a> {
    plan_controller: PlanController<'a>,
    prompt_controller: PromptController,
    catalog_controller: CatalogController,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            plan_controller: PlanController::new(container),
            prompt_controller: PromptController::new(),
            catalog_controller: CatalogController::new(),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Plan { request, format } => {
                self.plan_controller.plan(request, format, ctrl_c()).await
            }
            Commands::Prompt { request } => self.prompt_controller.prompt(request),
            Commands::Currencies => Ok(self.catalog_controller.currencies()),
            Commands::Interests => Ok(self.catalog_controller.interests()),
        }
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves
/// rather than aborting immediately.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}. Abort is unavailable.", e);
        std::future::pending::<()>().await;
    }
}
