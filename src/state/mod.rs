pub mod clock;
pub mod ledger;
mod sse;
pub mod state_machine;
pub mod transitions;

use std::{sync::Arc, time::Duration};

use tokio::sync::{Mutex, RwLock, watch};
use tokio::time::timeout;
use tracing::warn;

use crate::{
    config::AppConfig,
    dao::roster_store::RosterStore,
    error::ServiceError,
    state::{
        clock::ClockHandle,
        ledger::MatchLedger,
        state_machine::{MatchFlowEvent, MatchPhase, MatchStateMachine},
    },
};

pub use self::sse::SseHub;
pub use self::state_machine::{AbortError, ApplyError, Plan, PlanError, PlanId, Snapshot};
use self::sse::SseState;

/// Cheaply clonable handle to the process-wide application state.
pub type SharedState = Arc<AppState>;
/// Upper bound on how long a transition's side-effecting work may run.
pub const DEFAULT_TRANSITION_TIMEOUT: Duration = Duration::from_secs(5);

/// Central application state storing the persistence handle, the match flow
/// state machine, the active match ledger, and the SSE hub.
pub struct AppState {
    config: AppConfig,
    roster_store: RwLock<Option<Arc<dyn RosterStore>>>,
    sse: SseState,
    match_flow: RwLock<MatchStateMachine>,
    current_match: RwLock<Option<MatchLedger>>,
    clock: Mutex<Option<ClockHandle>>,
    degraded: watch::Sender<bool>,
    transition_gate: Mutex<()>,
    transition_timeout: Option<Duration>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            roster_store: RwLock::new(None),
            sse: SseState::new(16),
            match_flow: RwLock::new(MatchStateMachine::new()),
            current_match: RwLock::new(None),
            clock: Mutex::new(None),
            degraded: degraded_tx,
            transition_gate: Mutex::new(()),
            transition_timeout: Some(DEFAULT_TRANSITION_TIMEOUT),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current roster store, if one is installed.
    pub async fn roster_store(&self) -> Option<Arc<dyn RosterStore>> {
        let guard = self.roster_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the roster store or fail with a degraded-mode error.
    pub async fn require_roster_store(&self) -> Result<Arc<dyn RosterStore>, ServiceError> {
        self.roster_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new roster store implementation and leave degraded mode.
    pub async fn install_roster_store(&self, store: Arc<dyn RosterStore>) {
        {
            let mut guard = self.roster_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current roster store and enter degraded mode.
    pub async fn clear_roster_store(&self) {
        {
            let mut guard = self.roster_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.roster_store.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        if self.is_degraded().await == value {
            return;
        }

        let _ = self.degraded.send(value);
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        self.sse.public()
    }

    /// Snapshot the current phase of the match flow state machine.
    pub async fn match_phase(&self) -> MatchPhase {
        self.match_flow.read().await.phase()
    }

    /// Currently active match ledger, if a match is in progress.
    pub fn current_match(&self) -> &RwLock<Option<MatchLedger>> {
        &self.current_match
    }

    /// Run a closure against a read view of the active ledger slot.
    pub async fn read_current_match<F, T>(&self, f: F) -> T
    where
        F: FnOnce(Option<&MatchLedger>) -> T,
    {
        let guard = self.current_match.read().await;
        f(guard.as_ref())
    }

    /// Slot owning the elapsed-clock tick task for the active match.
    pub fn clock_slot(&self) -> &Mutex<Option<ClockHandle>> {
        &self.clock
    }

    /// Plan a transition on the shared match flow state machine, returning the plan.
    async fn plan_transition(&self, event: MatchFlowEvent) -> Result<Plan, PlanError> {
        let mut sm = self.match_flow.write().await;
        sm.plan(event)
    }

    /// Apply the planned transition, returning the next phase.
    async fn apply_planned_transition(&self, plan_id: PlanId) -> Result<MatchPhase, ApplyError> {
        let mut sm = self.match_flow.write().await;
        sm.apply(plan_id)
    }

    /// Abort a planned transition of the shared match flow state machine.
    async fn abort_transition(&self, plan_id: PlanId) -> Result<(), AbortError> {
        let mut sm = self.match_flow.write().await;
        sm.abort(plan_id)
    }

    /// Snapshot the match flow state machine.
    pub async fn snapshot(&self) -> Snapshot {
        let sm = self.match_flow.read().await;
        sm.snapshot()
    }

    /// Plan the transition for `event`, run `work`, and apply the transition
    /// only when the work succeeds; abort it otherwise. A mutex gate keeps
    /// concurrent transitions strictly serialized, and the work is bounded by
    /// the transition timeout.
    pub async fn run_transition<F, Fut, T>(
        &self,
        event: MatchFlowEvent,
        work: F,
    ) -> Result<(T, MatchPhase), ServiceError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, ServiceError>>,
    {
        let gate = self.transition_gate.lock().await;
        let Plan { id: plan_id, .. } = self.plan_transition(event).await?;

        let work_future = work();
        let outcome = if let Some(limit) = self.transition_timeout {
            match timeout(limit, work_future).await {
                Ok(result) => result,
                Err(_) => {
                    if let Err(abort_err) = self.abort_transition(plan_id).await {
                        warn!(
                            event = ?event,
                            plan_id = %plan_id,
                            error = ?abort_err,
                            "failed to abort transition after timeout"
                        );
                    }
                    drop(gate);
                    return Err(ServiceError::Timeout);
                }
            }
        } else {
            work_future.await
        };

        match outcome {
            Ok(value) => {
                let next = self.apply_planned_transition(plan_id).await?;
                drop(gate);
                Ok((value, next))
            }
            Err(err) => {
                if let Err(abort_err) = self.abort_transition(plan_id).await {
                    warn!(
                        event = ?event,
                        plan_id = %plan_id,
                        error = ?abort_err,
                        "failed to abort transition after work error"
                    );
                }
                drop(gate);
                Err(err)
            }
        }
    }
}
