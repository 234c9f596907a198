use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use travel_genie::{
    GenerateTravelPlanUseCase, GenerationOutcome, MockTextGenerator, PlanSession, Severity,
    TravelRequest, TravelRequestDraft, CANCELLED_MESSAGE, FAILED_MESSAGE, TIMED_OUT_MESSAGE,
};

fn request(destination: &str) -> TravelRequest {
    let day = |m, d| NaiveDate::from_ymd_opt(2030, m, d).unwrap();
    TravelRequestDraft::new("Mumbai", destination)
        .with_dates(day(5, 10), day(5, 15))
        .with_budget(80_000.0)
        .submit(day(1, 1))
        .expect("valid request")
}

fn session(generator: MockTextGenerator, timeout_ms: i64) -> PlanSession {
    let use_case = GenerateTravelPlanUseCase::new(Arc::new(generator));
    PlanSession::new(Arc::new(use_case), timeout_ms)
}

fn session_failing() -> PlanSession {
    session(MockTextGenerator::failing("upstream 503"), 1_000)
}

#[tokio::test(start_paused = true)]
async fn success_shows_plan_without_notification() {
    let mut session = session(
        MockTextGenerator::replying("Day 1: beach").with_delay(Duration::from_millis(50)),
        1_000,
    );

    let (id, pending) = session.submit(request("Goa")).unwrap();
    assert!(session.state().loading);
    assert!(session.is_pending());

    assert!(session.settle(id, pending.await));

    let state = session.state();
    assert!(!state.loading);
    assert_eq!(state.plan.as_deref(), Some("Day 1: beach"));
    assert_eq!(state.request.as_ref().map(|r| r.destination()), Some("Goa"));
    assert!(state.notification.is_none());
    assert!(!session.is_pending());
}

#[tokio::test(start_paused = true)]
async fn resubmission_is_refused_while_pending() {
    let mut session = session(MockTextGenerator::never(), 1_000);

    let (_id, _pending) = session.submit(request("Goa")).unwrap();
    let err = session.submit(request("Jaipur")).unwrap_err();

    assert!(err.to_string().contains("still generating"));
    assert_eq!(
        session.state().request.as_ref().map(|r| r.destination()),
        Some("Goa")
    );
}

#[tokio::test(start_paused = true)]
async fn abort_settles_as_single_info_notification() {
    let mut session = session(MockTextGenerator::never(), 60_000);

    let (id, pending) = session.submit(request("Goa")).unwrap();
    assert!(session.abort());

    let outcome = pending.await;
    assert_eq!(outcome, GenerationOutcome::Cancelled);
    assert!(session.settle(id, outcome));

    let note = session.state().notification.clone().unwrap();
    assert_eq!(note.severity(), Severity::Info);
    assert_eq!(note.message(), CANCELLED_MESSAGE);
    assert!(session.state().plan.is_none());

    // A repeated settle for the same request is stale and changes nothing.
    session.dismiss_notification();
    assert!(!session.settle(id, GenerationOutcome::Cancelled));
    assert!(session.state().notification.is_none());
    assert!(!session.abort());
}

#[tokio::test(start_paused = true)]
async fn timeout_and_failure_are_error_notifications() {
    let mut session = session(MockTextGenerator::never(), 500);
    let (id, pending) = session.submit(request("Goa")).unwrap();
    session.settle(id, pending.await);

    let note = session.state().notification.clone().unwrap();
    assert_eq!(note.severity(), Severity::Error);
    assert_eq!(note.message(), TIMED_OUT_MESSAGE);

    let mut session = session_failing();
    let (id, pending) = session.submit(request("Goa")).unwrap();
    session.settle(id, pending.await);

    let note = session.state().notification.clone().unwrap();
    assert_eq!(note.severity(), Severity::Error);
    assert_eq!(note.message(), FAILED_MESSAGE);
    assert!(!note.message().contains("upstream 503"));
}

#[tokio::test(start_paused = true)]
async fn stale_outcome_is_ignored() {
    let mut session = session(MockTextGenerator::replying("first"), 1_000);

    let (first, pending) = session.submit(request("Goa")).unwrap();
    session.settle(first, pending.await);

    let (second, _pending) = session.submit(request("Jaipur")).unwrap();
    assert_ne!(first, second);

    assert!(!session.settle(first, GenerationOutcome::success("late")));
    assert!(!session.mark_long_wait(first));
    assert!(session.state().loading);
    assert!(session.state().plan.is_none());
}

#[tokio::test(start_paused = true)]
async fn long_wait_hint_clears_on_settle() {
    let mut session = session(
        MockTextGenerator::replying("plan").with_delay(Duration::from_secs(10)),
        60_000,
    );

    let (id, pending) = session.submit(request("Goa")).unwrap();
    assert!(session.mark_long_wait(id));
    assert!(session.state().show_long_wait);

    session.settle(id, pending.await);
    assert!(!session.state().show_long_wait);
}

#[tokio::test(start_paused = true)]
async fn reset_clears_plan_for_next_trip() {
    let mut session = session(MockTextGenerator::replying("plan"), 1_000);
    let (id, pending) = session.submit(request("Goa")).unwrap();
    session.settle(id, pending.await);

    session.reset();
    assert!(session.state().plan.is_none());
    assert!(session.state().request.is_none());
}

#[tokio::test(start_paused = true)]
async fn dropping_session_cancels_in_flight_request() {
    let mut session = session(MockTextGenerator::never(), 60_000);
    let (_id, pending) = session.submit(request("Goa")).unwrap();

    drop(session);

    assert_eq!(pending.await, GenerationOutcome::Cancelled);
}
