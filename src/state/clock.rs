use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::{services::sse_events, state::SharedState};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owning handle for the elapsed-clock tick task.
///
/// The task increments the active ledger's clock once per second and
/// broadcasts the new value to scoreboard viewers. Dropping the handle aborts
/// the task, so no tick can ever fire against a discarded ledger; the service
/// layer additionally stops it explicitly on pause, reset, finalize and
/// abandon.
#[derive(Debug)]
pub struct ClockHandle {
    task: JoinHandle<()>,
}

impl ClockHandle {
    /// Spawn the one-second tick loop against the shared state.
    pub fn spawn(state: SharedState) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let ticked = {
                    let mut slot = state.current_match().write().await;
                    slot.as_mut().and_then(|ledger| ledger.tick())
                };

                match ticked {
                    Some(seconds) => sse_events::broadcast_clock(&state, seconds),
                    // Ledger gone or clock paused under us; the owner of the
                    // handle is responsible for aborting, just idle until then.
                    None => continue,
                }
            }
        });

        Self { task }
    }

    /// Stop the tick task immediately.
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
