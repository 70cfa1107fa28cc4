use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

use super::progress::QuizOutcome;
use super::service::{Advance, AnswerFeedback, QuestionPhase, QuizSession, SessionStatus, TickOutcome};
use super::ticker::{TaskSlot, run_countdown};
use super::view::SessionSnapshot;
use crate::error::SourceError;
use crate::question_source::{Batch, QuestionSource};

struct Inner {
    session: QuizSession,
    countdown: TaskSlot,
    fetch: TaskSlot,
}

pub(crate) struct Shared {
    cell: Mutex<Inner>,
    updates: watch::Sender<SessionSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, session: &QuizSession) {
        self.updates.send_replace(session.snapshot());
    }

    fn apply_batch(self: &Arc<Self>, result: Result<Batch, SourceError>) {
        let mut cell = self.lock();
        cell.fetch.release();

        if !cell.session.apply_batch(result) {
            debug!("discarding batch for a session that is no longer loading");
            return;
        }

        match cell.session.status() {
            SessionStatus::Ready => {
                info!(total = cell.session.total(), "quiz ready");
                self.restart_countdown(&mut cell);
            }
            SessionStatus::LoadFailed => {
                debug!(failure = ?cell.session.load_failure(), "quiz failed to load");
            }
            _ => {}
        }
        self.publish(&cell.session);
    }

    fn restart_countdown(self: &Arc<Self>, cell: &mut Inner) {
        cell.countdown.cancel();
        if cell.session.phase() != Some(QuestionPhase::Answering) {
            return;
        }

        let period = cell.session.settings().tick;
        let task = tokio::spawn(run_countdown(
            Arc::downgrade(self),
            cell.session.entry_count(),
            Instant::now() + period,
            period,
        ));
        cell.countdown.replace(task.abort_handle());
    }

    /// Apply one tick for entry `serial`; returns whether the countdown should continue.
    pub(crate) fn tick(&self, serial: u64) -> bool {
        let mut cell = self.lock();
        if cell.session.entry_count() != serial {
            return false;
        }

        match cell.session.tick() {
            TickOutcome::Running { .. } => {
                self.publish(&cell.session);
                true
            }
            TickOutcome::TimedOut => {
                debug!(index = ?cell.session.current_index(), "question timed out");
                cell.countdown.release();
                self.publish(&cell.session);
                false
            }
            TickOutcome::Ignored => false,
        }
    }
}

/// Drives a `QuizSession`: runs the single batch fetch, schedules the
/// per-question countdown and publishes snapshots after every change.
///
/// Dropping the controller cancels the countdown and any in-flight fetch.
pub struct QuizController {
    shared: Arc<Shared>,
}

impl QuizController {
    /// Start loading `session` from `source`.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn start(source: Arc<QuestionSource>, session: QuizSession) -> Self {
        let (updates, _) = watch::channel(session.snapshot());
        let category = session.category().clone();
        let difficulty = session.difficulty();
        let count = session.settings().question_count;

        let shared = Arc::new(Shared {
            cell: Mutex::new(Inner {
                session,
                countdown: TaskSlot::default(),
                fetch: TaskSlot::default(),
            }),
            updates,
        });

        info!(category = %category, %difficulty, count, "starting quiz");
        let weak = Arc::downgrade(&shared);
        let task = tokio::spawn(async move {
            let result = source.fetch_batch(&category, difficulty, count).await;
            if let Some(shared) = weak.upgrade() {
                shared.apply_batch(result);
            }
        });
        shared.lock().fetch.replace(task.abort_handle());

        Self { shared }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.updates.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Wait until the fetch has resolved (or the session was abandoned).
    pub async fn loaded(&self) -> SessionSnapshot {
        let mut updates = self.subscribe();
        match updates
            .wait_for(|snapshot| snapshot.status != SessionStatus::Loading)
            .await
        {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        }
    }

    pub fn select_answer(&self, position: usize) -> Option<AnswerFeedback> {
        let mut cell = self.shared.lock();
        let feedback = cell.session.select_answer(position)?;
        cell.countdown.cancel();
        debug!(position, correct = feedback.is_correct, "answer submitted");
        self.shared.publish(&cell.session);
        Some(feedback)
    }

    pub fn next(&self) -> Advance {
        let mut cell = self.shared.lock();
        let advance = cell.session.next();
        match advance {
            Advance::Ignored => return advance,
            Advance::Question { index } => {
                debug!(index, "advancing to next question");
                self.shared.restart_countdown(&mut cell);
            }
            Advance::Finished(summary) => {
                info!(score = summary.score, total = summary.total, "quiz finished");
                cell.countdown.cancel();
            }
        }
        self.shared.publish(&cell.session);
        advance
    }

    /// Leave the session, cancelling the countdown and any pending fetch.
    pub fn abandon(&self) -> QuizOutcome {
        let mut cell = self.shared.lock();
        cell.countdown.cancel();
        cell.fetch.cancel();
        let outcome = cell.session.abandon();
        if outcome.is_abandoned() {
            info!("quiz abandoned");
        }
        self.shared.publish(&cell.session);
        outcome
    }

    #[must_use]
    pub fn outcome(&self) -> Option<QuizOutcome> {
        self.shared.lock().session.outcome()
    }

    /// Whether a countdown task is currently scheduled.
    #[must_use]
    pub fn countdown_active(&self) -> bool {
        self.shared.lock().countdown.is_active()
    }
}

impl Drop for QuizController {
    fn drop(&mut self) {
        let mut cell = self.shared.lock();
        cell.countdown.cancel();
        cell.fetch.cancel();
    }
}
