use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::use_cases::travel_prompt::build_prompt;
use crate::application::TextGenerator;
use crate::domain::{GenerationOutcome, TravelRequest};

/// Default generation budget: three minutes.
pub const DEFAULT_TIMEOUT_MS: i64 = 180_000;

/// Cancellation capability for one generation request.
///
/// Holds no result data. Cancelling more than once, or after the request
/// has settled, has no effect.
///
/// **Cancellation is cooperative.** The controller stops waiting and tears
/// down its timer and listener, and the in-flight provider future is
/// dropped. Hosted model APIs offer no way to abort a generation already
/// accepted, so the provider may keep running (and billing) remotely.
#[derive(Debug, Clone, Default)]
pub struct RequestHandle {
    token: CancellationToken,
}

impl RequestHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Point-in-time view of the watchers armed for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatcherStats {
    pub live_timers: usize,
    pub live_listeners: usize,
    pub timers_armed: usize,
    pub listeners_armed: usize,
}

impl WatcherStats {
    pub fn all_disarmed(&self) -> bool {
        self.live_timers == 0 && self.live_listeners == 0
    }
}

#[derive(Debug, Clone, Copy)]
enum WatcherKind {
    Timer,
    Listener,
}

#[derive(Debug, Default)]
struct WatcherLedger {
    live_timers: AtomicUsize,
    live_listeners: AtomicUsize,
    timers_armed: AtomicUsize,
    listeners_armed: AtomicUsize,
}

impl WatcherLedger {
    fn arm(self: &Arc<Self>, kind: WatcherKind) -> ArmedWatcher {
        let (live, armed) = self.counters(kind);
        live.fetch_add(1, Ordering::AcqRel);
        armed.fetch_add(1, Ordering::AcqRel);
        ArmedWatcher {
            ledger: Arc::clone(self),
            kind,
        }
    }

    fn counters(&self, kind: WatcherKind) -> (&AtomicUsize, &AtomicUsize) {
        match kind {
            WatcherKind::Timer => (&self.live_timers, &self.timers_armed),
            WatcherKind::Listener => (&self.live_listeners, &self.listeners_armed),
        }
    }

    fn snapshot(&self) -> WatcherStats {
        WatcherStats {
            live_timers: self.live_timers.load(Ordering::Acquire),
            live_listeners: self.live_listeners.load(Ordering::Acquire),
            timers_armed: self.timers_armed.load(Ordering::Acquire),
            listeners_armed: self.listeners_armed.load(Ordering::Acquire),
        }
    }
}

/// Disarms its watcher exactly once, when dropped.
struct ArmedWatcher {
    ledger: Arc<WatcherLedger>,
    kind: WatcherKind,
}

impl Drop for ArmedWatcher {
    fn drop(&mut self) {
        let (live, _) = self.ledger.counters(self.kind);
        live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Tie `guard` to `fut` so the watcher stays armed exactly as long as the
/// future is alive, whether it completes or is dropped by the race.
fn watched<F: Future>(guard: ArmedWatcher, fut: F) -> impl Future<Output = F::Output> {
    async move {
        let _guard = guard;
        fut.await
    }
}

/// A started generation. Await it to run the race; it resolves to exactly
/// one [`GenerationOutcome`].
///
/// Dropping it before it resolves disarms every watcher and abandons the
/// provider call without producing an outcome.
pub struct PendingGeneration {
    id: Uuid,
    ledger: Arc<WatcherLedger>,
    future: BoxFuture<'static, GenerationOutcome>,
}

impl PendingGeneration {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn watcher_stats(&self) -> WatcherStats {
        self.ledger.snapshot()
    }

    /// A probe that outlives this pending generation, for observing
    /// teardown after it is dropped.
    pub fn watcher_probe(&self) -> WatcherProbe {
        WatcherProbe {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

/// Read-only view of one request's watcher bookkeeping.
#[derive(Debug, Clone)]
pub struct WatcherProbe {
    ledger: Arc<WatcherLedger>,
}

impl WatcherProbe {
    pub fn stats(&self) -> WatcherStats {
        self.ledger.snapshot()
    }
}

impl Future for PendingGeneration {
    type Output = GenerationOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.poll_unpin(cx)
    }
}

impl std::fmt::Debug for PendingGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingGeneration")
            .field("id", &self.id)
            .field("watchers", &self.ledger.snapshot())
            .finish()
    }
}

/// Owns the lifecycle of a generation request: builds the prompt, races the
/// provider against a deadline and a cancellation signal, and settles once.
///
/// Arbitration is biased in the fixed order **cancellation, timeout,
/// generation**: if more than one is ready when the race is polled, the
/// earlier one wins. The losers are dropped, which disarms them.
///
/// The use case holds no mutable state; every `start` owns its own timer,
/// listener, and bookkeeping.
pub struct GenerateTravelPlanUseCase {
    generator: Arc<dyn TextGenerator>,
}

impl GenerateTravelPlanUseCase {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// Start a request with a fresh [`RequestHandle`].
    pub fn start(
        &self,
        request: &TravelRequest,
        timeout_ms: i64,
    ) -> (PendingGeneration, RequestHandle) {
        let handle = RequestHandle::new();
        let pending = self.start_with_handle(request, timeout_ms, &handle);
        (pending, handle)
    }

    /// Start a request bound to an existing handle.
    ///
    /// The deadline is fixed here, not at the first poll: a caller that
    /// awaits late still gets `TimedOut` once `timeout_ms` has passed since
    /// this call. The provider call itself begins on the first poll.
    ///
    /// An already-cancelled handle settles as `Cancelled` without calling the
    /// provider. A `timeout_ms` of zero or less settles as `TimedOut` the same
    /// way. When both apply, cancellation wins.
    pub fn start_with_handle(
        &self,
        request: &TravelRequest,
        timeout_ms: i64,
        handle: &RequestHandle,
    ) -> PendingGeneration {
        let id = Uuid::new_v4();
        let prompt = build_prompt(request);
        let ledger = Arc::new(WatcherLedger::default());
        let started = Instant::now();
        let deadline = match u64::try_from(timeout_ms) {
            Ok(ms) if ms > 0 => Some(started + Duration::from_millis(ms)),
            _ => None,
        };

        info!(
            "Generation {} started: {} -> {} (timeout {} ms, model {})",
            id,
            request.origin(),
            request.destination(),
            timeout_ms,
            self.generator.model_name()
        );
        debug!("Generation {} prompt:\n{}", id, prompt);

        let future = settle(
            id,
            Arc::clone(&self.generator),
            prompt,
            handle.token.clone(),
            started,
            deadline,
            Arc::clone(&ledger),
        )
        .boxed();

        PendingGeneration { id, ledger, future }
    }
}

async fn settle(
    id: Uuid,
    generator: Arc<dyn TextGenerator>,
    prompt: String,
    token: CancellationToken,
    started: Instant,
    deadline: Option<Instant>,
    ledger: Arc<WatcherLedger>,
) -> GenerationOutcome {
    let outcome = race(id, generator, prompt, token, deadline, &ledger).await;

    info!(
        "Generation {} settled as {} after {:.2}s",
        id,
        outcome,
        started.elapsed().as_secs_f64()
    );
    outcome
}

async fn race(
    id: Uuid,
    generator: Arc<dyn TextGenerator>,
    prompt: String,
    token: CancellationToken,
    deadline: Option<Instant>,
    ledger: &Arc<WatcherLedger>,
) -> GenerationOutcome {
    if token.is_cancelled() {
        debug!("Generation {} cancelled before start", id);
        return GenerationOutcome::Cancelled;
    }

    let Some(deadline) = deadline else {
        debug!("Generation {} has no time budget", id);
        return GenerationOutcome::TimedOut;
    };

    let cancelled = watched(ledger.arm(WatcherKind::Listener), token.cancelled());
    let deadline = watched(
        ledger.arm(WatcherKind::Timer),
        tokio::time::sleep_until(deadline),
    );

    tokio::select! {
        biased;

        _ = cancelled => GenerationOutcome::Cancelled,
        _ = deadline => GenerationOutcome::TimedOut,
        result = generator.generate(&prompt) => match result {
            Ok(plan) => GenerationOutcome::success(plan),
            Err(e) => {
                warn!("Generation {} provider failure: {}", id, e);
                GenerationOutcome::failed(e.to_string())
            }
        },
    }
}
