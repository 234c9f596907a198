use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::application::{GenerateTravelPlanUseCase, PendingGeneration, RequestHandle};
use crate::domain::{DomainError, GenerationOutcome, TravelRequest};

/// Identifies one submission within a [`PlanSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Error,
}

/// A transient message shown once per non-success outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    severity: Severity,
    message: &'static str,
}

impl Notification {
    fn for_outcome(outcome: &GenerationOutcome) -> Option<Self> {
        let message = outcome.user_message()?;
        let severity = match outcome {
            GenerationOutcome::Cancelled => Severity::Info,
            _ => Severity::Error,
        };
        Some(Self { severity, message })
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// What the front end should currently render.
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    pub loading: bool,
    pub show_long_wait: bool,
    pub plan: Option<String>,
    pub request: Option<TravelRequest>,
    pub notification: Option<Notification>,
}

/// Caller-side state for the planner: one request in flight at a time,
/// one notification per outcome, and late outcomes ignored.
pub struct PlanSession {
    use_case: Arc<GenerateTravelPlanUseCase>,
    timeout_ms: i64,
    next_id: u64,
    in_flight: Option<(RequestId, RequestHandle)>,
    state: DisplayState,
}

impl PlanSession {
    pub fn new(use_case: Arc<GenerateTravelPlanUseCase>, timeout_ms: i64) -> Self {
        Self {
            use_case,
            timeout_ms,
            next_id: 0,
            in_flight: None,
            state: DisplayState::default(),
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn current_request(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|(id, _)| *id)
    }

    /// Start generating a plan for `request`. Re-submission is refused while
    /// a request is pending.
    pub fn submit(
        &mut self,
        request: TravelRequest,
    ) -> Result<(RequestId, PendingGeneration), DomainError> {
        if let Some((id, _)) = &self.in_flight {
            return Err(DomainError::invalid_input(format!(
                "request {id} is still generating"
            )));
        }

        self.next_id += 1;
        let id = RequestId(self.next_id);
        let (pending, handle) = self.use_case.start(&request, self.timeout_ms);

        self.state = DisplayState {
            loading: true,
            request: Some(request),
            ..DisplayState::default()
        };
        self.in_flight = Some((id, handle));

        debug!("Session submitted request {} as generation {}", id, pending.id());
        Ok((id, pending))
    }

    /// Cancel the pending request, if any. Returns whether there was one.
    /// The notification arrives with the `Cancelled` outcome, not here.
    pub fn abort(&mut self) -> bool {
        match &self.in_flight {
            Some((id, handle)) => {
                info!("Aborting request {}", id);
                handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Show the extended-wait hint if `id` is still the pending request.
    pub fn mark_long_wait(&mut self, id: RequestId) -> bool {
        if self.current_request() != Some(id) {
            return false;
        }
        self.state.show_long_wait = true;
        true
    }

    /// Apply the outcome for `id`. Outcomes for anything other than the
    /// pending request are dropped. Returns whether the outcome was applied.
    pub fn settle(&mut self, id: RequestId, outcome: GenerationOutcome) -> bool {
        if self.current_request() != Some(id) {
            debug!("Ignoring {} outcome for stale request {}", outcome, id);
            return false;
        }

        self.in_flight = None;
        self.state.loading = false;
        self.state.show_long_wait = false;
        self.state.notification = Notification::for_outcome(&outcome);
        if let GenerationOutcome::Success { plan } = outcome {
            self.state.plan = Some(plan);
        }
        true
    }

    pub fn dismiss_notification(&mut self) {
        self.state.notification = None;
    }

    /// Clear the shown plan so a new trip can be entered.
    pub fn reset(&mut self) {
        self.state.plan = None;
        self.state.request = None;
    }
}

impl Drop for PlanSession {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.in_flight.take() {
            handle.cancel();
        }
    }
}
