use std::future::Future;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::info;

use crate::application::use_cases::travel_prompt::NO_INTERESTS;
use crate::application::Severity;
use crate::cli::{OutputFormat, RequestArgs};
use crate::domain::TravelRequest;

use super::super::Container;
use super::request_form::{submit_request, today};

pub const LONG_WAIT_HINT: &str =
    "This is taking longer than usual. Press Ctrl-C to abort the request.";

/// Machine-readable result. Provider failure detail stays in the logs.
#[derive(Serialize)]
struct PlanReport<'a> {
    status: &'static str,
    request: Option<&'a TravelRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

/// Drives one `plan` command: the caller side of the generation lifecycle.
pub struct PlanController<'a> {
    container: &'a Container,
}

impl<'a> PlanController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Generate a plan, aborting the wait when `abort` resolves.
    ///
    /// In text mode, timeouts and provider failures become errors so the
    /// process exits non-zero; cancellation is informational. JSON mode
    /// always reports the outcome as data.
    pub async fn plan<A>(&self, args: RequestArgs, format: OutputFormat, abort: A) -> Result<String>
    where
        A: Future<Output = ()>,
    {
        let request = submit_request(&args, today())?;
        let mut session = self.container.plan_session()?;
        let (id, mut pending) = session.submit(request)?;

        let long_wait = tokio::time::sleep(self.container.config().long_wait_hint());
        tokio::pin!(long_wait);
        tokio::pin!(abort);
        let mut hinted = false;
        let mut aborted = false;

        let outcome = loop {
            tokio::select! {
                outcome = &mut pending => break outcome,
                _ = &mut abort, if !aborted => {
                    aborted = true;
                    session.abort();
                }
                _ = &mut long_wait, if !hinted => {
                    hinted = true;
                    if session.mark_long_wait(id) {
                        eprintln!("{LONG_WAIT_HINT}");
                    }
                }
            }
        };

        info!("Request {} finished: {}", id, outcome);
        let status = outcome.kind();
        session.settle(id, outcome);
        let state = session.state();

        if format == OutputFormat::Json {
            let report = PlanReport {
                status,
                request: state.request.as_ref(),
                plan: state.plan.as_deref(),
                message: state.notification.as_ref().map(|n| n.message()),
            };
            return Ok(serde_json::to_string_pretty(&report)?);
        }

        if let Some(plan) = &state.plan {
            let header = state
                .request
                .as_ref()
                .map(format_header)
                .unwrap_or_default();
            return Ok(format!("{header}{plan}"));
        }

        match &state.notification {
            Some(note) if note.severity() == Severity::Info => Ok(note.message().to_string()),
            Some(note) => Err(anyhow!(note.message())),
            None => Err(anyhow!("generation finished without a result")),
        }
    }
}

fn format_header(request: &TravelRequest) -> String {
    let title = format!(
        "Travel plan: {} -> {} ({} to {}, {} traveler{}, budget {}{} {})",
        request.origin(),
        request.destination(),
        request.start_date().format("%Y-%m-%d"),
        request.end_date().format("%Y-%m-%d"),
        request.travelers(),
        if request.travelers() == 1 { "" } else { "s" },
        request.currency().symbol(),
        request.budget(),
        request.currency().code(),
    );
    let interests = if request.interests().is_empty() {
        NO_INTERESTS.to_string()
    } else {
        request.interests().join(", ")
    };
    let rule = "=".repeat(title.chars().count());
    format!("{title}\nInterests: {interests}\n{rule}\n\n")
}
