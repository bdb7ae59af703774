//! Evaluation scheduling.
//!
//! An explicit state machine driven by discrete events (edit, timer fire,
//! manual run, evaluation complete), independent of any concurrency primitive.
//! The host owns the actual timer and the actual engine call; the scheduler
//! only decides what should happen next and guarantees that at most one
//! evaluation is in flight while no edit's resulting state is silently
//! dropped.
//!
//! Timer cancellation is modelled with generation tokens: every edit issues a
//! fresh [`TimerToken`], and a fired timer whose token is no longer current is
//! ignored.

use std::time::Duration;

/// The default quiet period before an automatic evaluation.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Identifies one scheduled debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

/// The scheduler's externally observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing pending.
    Idle,
    /// A debounce timer is pending.
    Debouncing,
    /// An evaluation is in flight.
    Evaluating,
    /// An evaluation is in flight and a follow-up run is queued.
    EvaluatingWithReplayQueued,
}

/// What the host should do after feeding an event to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerAction {
    /// Nothing to do.
    None,
    /// Start (or restart) the debounce timer and report back with the token.
    StartTimer(TimerToken),
    /// Begin exactly one evaluation of the current text.
    BeginEvaluation,
    /// An evaluation is already in flight; observe its result instead of
    /// starting another.
    AwaitInFlight,
}

/// Debounce / single-flight evaluation scheduler.
pub struct EvalScheduler {
    debounce: Duration,
    pending_timer: Option<TimerToken>,
    next_token: u64,
    in_flight: bool,
    replay_queued: bool,
}

impl EvalScheduler {
    /// Create a scheduler with the given debounce delay.
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending_timer: None,
            next_token: 0,
            in_flight: false,
            replay_queued: false,
        }
    }

    /// The configured debounce delay.
    pub fn debounce_delay(&self) -> Duration {
        self.debounce
    }

    /// The current state.
    pub fn state(&self) -> SchedulerState {
        if self.in_flight {
            if self.replay_queued {
                SchedulerState::EvaluatingWithReplayQueued
            } else {
                SchedulerState::Evaluating
            }
        } else if self.pending_timer.is_some() {
            SchedulerState::Debouncing
        } else {
            SchedulerState::Idle
        }
    }

    /// Whether an evaluation is in flight.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// An edit occurred: restart the debounce timer (last edit wins).
    ///
    /// Any previously issued timer token becomes stale.
    pub fn on_edit(&mut self) -> SchedulerAction {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending_timer = Some(token);
        SchedulerAction::StartTimer(token)
    }

    /// The debounce timer fired.
    ///
    /// `blocked` reports whether a blocking syntax diagnostic is currently
    /// present; a blocked fire does nothing until further edits change that.
    /// While an evaluation is in flight the fire queues exactly one replay.
    pub fn on_timer_fired(&mut self, token: TimerToken, blocked: bool) -> SchedulerAction {
        if self.pending_timer != Some(token) {
            // stale timer from before a newer edit
            return SchedulerAction::None;
        }
        self.pending_timer = None;

        if self.in_flight {
            self.replay_queued = true;
            return SchedulerAction::None;
        }
        if blocked {
            return SchedulerAction::None;
        }
        self.in_flight = true;
        SchedulerAction::BeginEvaluation
    }

    /// A manual run was requested.
    ///
    /// Cancels any pending debounce timer and any queued replay. While an
    /// evaluation is in flight the caller observes that result; otherwise a
    /// new evaluation begins regardless of blocking diagnostics.
    pub fn on_manual_run(&mut self) -> SchedulerAction {
        self.pending_timer = None;
        self.replay_queued = false;
        if self.in_flight {
            return SchedulerAction::AwaitInFlight;
        }
        self.in_flight = true;
        SchedulerAction::BeginEvaluation
    }

    /// The in-flight evaluation completed (successfully or not).
    ///
    /// A queued replay begins immediately unless `blocked`.
    pub fn on_evaluation_finished(&mut self, blocked: bool) -> SchedulerAction {
        self.in_flight = false;
        if !self.replay_queued {
            return SchedulerAction::None;
        }
        self.replay_queued = false;
        if blocked {
            return SchedulerAction::None;
        }
        self.in_flight = true;
        SchedulerAction::BeginEvaluation
    }
}

impl Default for EvalScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
