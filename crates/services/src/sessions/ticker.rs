use std::sync::Weak;
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::workflow::Shared;

/// Owner of at most one background task; replacing or dropping aborts it.
#[derive(Debug, Default)]
pub(crate) struct TaskSlot {
    handle: Option<AbortHandle>,
}

impl TaskSlot {
    pub(crate) fn replace(&mut self, handle: AbortHandle) {
        self.cancel();
        self.handle = Some(handle);
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Forget the handle without aborting, for a task that is finishing itself.
    pub(crate) fn release(&mut self) {
        self.handle = None;
    }

    pub(crate) fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Countdown loop for one question entry.
///
/// Stops when the session is gone, the entry `serial` no longer matches, or
/// the session reports there is nothing left to count.
pub(crate) async fn run_countdown(shared: Weak<Shared>, serial: u64, first: Instant, period: Duration) {
    let mut interval = tokio::time::interval_at(first, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let Some(shared) = shared.upgrade() else {
            return;
        };
        if !shared.tick(serial) {
            return;
        }
    }
}
