use std::time::Instant;

use thiserror::Error;
use uuid::Uuid;

/// High-level phases a match can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// No match is in progress; the roster and team profile can be managed.
    Idle,
    /// Opponent name and squad are being confirmed before kickoff.
    Setup,
    /// Live play: quick-entry events and the elapsed clock are active.
    Live,
    /// Post-match review: free-form corrections and goal attribution.
    Review,
}

/// Events that can be applied to the match flow state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFlowEvent {
    /// User initiates a new match from the idle screen.
    BeginSetup,
    /// Opponent confirmed and squad snapshotted; play begins.
    KickOff,
    /// Switch from the live tab to the post-match tab.
    OpenReview,
    /// Switch back from review to live; the same ledger keeps serving both.
    ResumeLive,
    /// Persist the match outcome and discard the ledger.
    Finalize,
    /// Discard the ledger without persisting anything.
    Abandon,
}

/// Error returned when attempting to apply an invalid transition.
///
/// Notably there is no direct `Live -> Idle` edge: ending a match always
/// routes through review.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: MatchPhase,
    /// The event that cannot be applied from this phase.
    pub event: MatchFlowEvent,
}

/// Errors that can occur when planning a state machine transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A transition is already pending and must be applied or aborted.
    AlreadyPending,
    /// The requested transition is not valid from the current phase.
    InvalidTransition(InvalidTransition),
}

/// Errors that can occur when applying a planned state machine transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// No transition is currently pending.
    NoPending,
    /// Plan ID does not match the pending plan.
    IdMismatch {
        /// Expected plan ID.
        expected: PlanId,
        /// Provided plan ID.
        got: PlanId,
    },
    /// State machine phase changed since the plan was created.
    PhaseMismatch {
        /// Phase when plan was created.
        expected: MatchPhase,
        /// Current phase.
        actual: MatchPhase,
    },
    /// State machine version changed since the plan was created.
    VersionMismatch {
        /// Version when plan was created.
        expected: usize,
        /// Current version.
        actual: usize,
    },
}

/// Errors that can occur when aborting a planned state machine transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortError {
    /// No transition is currently pending.
    NoPending,
    /// Plan ID does not match the pending plan.
    IdMismatch {
        /// Expected plan ID.
        expected: PlanId,
        /// Provided plan ID.
        got: PlanId,
    },
}

/// Unique identifier for a planned state transition.
pub type PlanId = Uuid;

/// A planned transition that has been validated but not yet applied.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Unique identifier for this plan.
    pub id: PlanId,
    /// Phase the state machine is currently in.
    pub from: MatchPhase,
    /// Phase the state machine will transition to.
    pub to: MatchPhase,
    /// Event that triggered this transition.
    pub event: MatchFlowEvent,
    /// Version number after applying this transition.
    pub version_next: usize,
    /// Timestamp when this plan was created.
    pub pending_since: Instant,
}

/// Snapshot of the current state machine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Current phase of the state machine.
    pub phase: MatchPhase,
    /// Version number of the state machine (increments on each transition).
    pub version: usize,
    /// Pending transition phase, if a transition is planned but not yet applied.
    pub pending: Option<MatchPhase>,
}

/// State machine implementing the match flow `idle -> setup -> live <-> review`.
///
/// Transitions are planned first, then applied once the side-effecting work
/// of the transition has succeeded, or aborted when it fails. Aborting a
/// `Finalize` plan is what keeps a failed save in the review phase with the
/// ledger intact for a retry.
#[derive(Debug, Clone)]
pub struct MatchStateMachine {
    phase: MatchPhase,
    version: usize,
    pending: Option<Plan>,
}

impl Default for MatchStateMachine {
    fn default() -> Self {
        Self {
            phase: MatchPhase::Idle,
            version: 0,
            pending: None,
        }
    }
}

impl MatchStateMachine {
    /// Create a new state machine initialised in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Create a snapshot of the current state machine state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            version: self.version,
            pending: self.pending.as_ref().map(|plan| plan.to),
        }
    }

    /// Plan a transition by validating that the event can be applied from the
    /// current phase. Returns a Plan that can later be applied or aborted.
    pub fn plan(&mut self, event: MatchFlowEvent) -> Result<Plan, PlanError> {
        if self.pending.is_some() {
            return Err(PlanError::AlreadyPending);
        }

        let next = self
            .compute_transition(event)
            .map_err(PlanError::InvalidTransition)?;

        let plan = Plan {
            id: Uuid::new_v4(),
            from: self.phase,
            to: next,
            event,
            version_next: self.version + 1,
            pending_since: Instant::now(),
        };

        self.pending = Some(plan.clone());

        Ok(plan)
    }

    /// Apply a planned transition, moving the state machine to the next phase.
    /// Returns the new phase after the transition.
    pub fn apply(&mut self, plan_id: PlanId) -> Result<MatchPhase, ApplyError> {
        let plan = self.pending.take().ok_or(ApplyError::NoPending)?;

        if plan.id != plan_id {
            let expected_plan_id = plan.id;
            self.pending = Some(plan);
            return Err(ApplyError::IdMismatch {
                expected: expected_plan_id,
                got: plan_id,
            });
        }

        if self.phase != plan.from {
            return Err(ApplyError::PhaseMismatch {
                expected: plan.from,
                actual: self.phase,
            });
        }

        if self.version + 1 != plan.version_next {
            return Err(ApplyError::VersionMismatch {
                expected: plan.version_next,
                actual: self.version + 1,
            });
        }

        self.phase = plan.to;
        self.version = plan.version_next;
        self.pending = None;

        Ok(self.phase)
    }

    /// Abort a planned transition without applying it, leaving the state
    /// machine in its previous phase.
    pub fn abort(&mut self, plan_id: PlanId) -> Result<(), AbortError> {
        let plan = self.pending.as_ref().ok_or(AbortError::NoPending)?;

        if plan.id != plan_id {
            return Err(AbortError::IdMismatch {
                expected: plan.id,
                got: plan_id,
            });
        }

        self.pending = None;
        Ok(())
    }

    /// Compute a transition from an event if the transition is valid.
    fn compute_transition(&self, event: MatchFlowEvent) -> Result<MatchPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (MatchPhase::Idle, MatchFlowEvent::BeginSetup) => MatchPhase::Setup,
            (MatchPhase::Setup, MatchFlowEvent::KickOff) => MatchPhase::Live,
            (MatchPhase::Setup, MatchFlowEvent::Abandon) => MatchPhase::Idle,
            (MatchPhase::Live, MatchFlowEvent::OpenReview) => MatchPhase::Review,
            (MatchPhase::Review, MatchFlowEvent::ResumeLive) => MatchPhase::Live,
            (MatchPhase::Review, MatchFlowEvent::Finalize) => MatchPhase::Idle,
            (MatchPhase::Review, MatchFlowEvent::Abandon) => MatchPhase::Idle,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(sm: &mut MatchStateMachine, event: MatchFlowEvent) -> MatchPhase {
        let plan = sm.plan(event).unwrap();
        sm.apply(plan.id).unwrap()
    }

    #[test]
    fn initial_state_is_idle() {
        let sm = MatchStateMachine::new();
        assert_eq!(sm.phase(), MatchPhase::Idle);
    }

    #[test]
    fn full_happy_path_through_a_match() {
        let mut sm = MatchStateMachine::new();

        assert_eq!(apply(&mut sm, MatchFlowEvent::BeginSetup), MatchPhase::Setup);
        assert_eq!(apply(&mut sm, MatchFlowEvent::KickOff), MatchPhase::Live);
        assert_eq!(apply(&mut sm, MatchFlowEvent::OpenReview), MatchPhase::Review);
        assert_eq!(apply(&mut sm, MatchFlowEvent::ResumeLive), MatchPhase::Live);
        assert_eq!(apply(&mut sm, MatchFlowEvent::OpenReview), MatchPhase::Review);
        assert_eq!(apply(&mut sm, MatchFlowEvent::Finalize), MatchPhase::Idle);
    }

    #[test]
    fn abandon_paths_return_to_idle() {
        let mut sm = MatchStateMachine::new();
        apply(&mut sm, MatchFlowEvent::BeginSetup);
        assert_eq!(apply(&mut sm, MatchFlowEvent::Abandon), MatchPhase::Idle);

        apply(&mut sm, MatchFlowEvent::BeginSetup);
        apply(&mut sm, MatchFlowEvent::KickOff);
        apply(&mut sm, MatchFlowEvent::OpenReview);
        assert_eq!(apply(&mut sm, MatchFlowEvent::Abandon), MatchPhase::Idle);
    }

    #[test]
    fn live_cannot_reach_idle_directly() {
        let mut sm = MatchStateMachine::new();
        apply(&mut sm, MatchFlowEvent::BeginSetup);
        apply(&mut sm, MatchFlowEvent::KickOff);

        for event in [MatchFlowEvent::Abandon, MatchFlowEvent::Finalize] {
            let err = sm.plan(event).unwrap_err();
            match err {
                PlanError::InvalidTransition(invalid) => {
                    assert_eq!(invalid.from, MatchPhase::Live);
                    assert_eq!(invalid.event, event);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn invalid_transition_returns_error() {
        let mut sm = MatchStateMachine::new();
        let err = sm.plan(MatchFlowEvent::OpenReview).unwrap_err();
        match err {
            PlanError::InvalidTransition(invalid) => {
                assert_eq!(invalid.from, MatchPhase::Idle);
                assert_eq!(invalid.event, MatchFlowEvent::OpenReview);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn planning_twice_without_applying_is_rejected() {
        let mut sm = MatchStateMachine::new();
        sm.plan(MatchFlowEvent::BeginSetup).unwrap();
        assert_eq!(
            sm.plan(MatchFlowEvent::BeginSetup).unwrap_err(),
            PlanError::AlreadyPending
        );
    }

    #[test]
    fn aborted_finalize_stays_in_review() {
        let mut sm = MatchStateMachine::new();
        apply(&mut sm, MatchFlowEvent::BeginSetup);
        apply(&mut sm, MatchFlowEvent::KickOff);
        apply(&mut sm, MatchFlowEvent::OpenReview);

        let plan = sm.plan(MatchFlowEvent::Finalize).unwrap();
        sm.abort(plan.id).unwrap();

        assert_eq!(sm.phase(), MatchPhase::Review);
        assert!(sm.pending.is_none());

        // A retry can be planned immediately.
        let retry = sm.plan(MatchFlowEvent::Finalize).unwrap();
        assert_eq!(sm.apply(retry.id).unwrap(), MatchPhase::Idle);
    }

    #[test]
    fn apply_with_wrong_plan_id_keeps_the_plan_pending() {
        let mut sm = MatchStateMachine::new();
        let plan = sm.plan(MatchFlowEvent::BeginSetup).unwrap();

        let err = sm.apply(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApplyError::IdMismatch { .. }));

        assert_eq!(sm.apply(plan.id).unwrap(), MatchPhase::Setup);
    }
}
