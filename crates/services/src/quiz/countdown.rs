use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::session::{QuizSession, TickOutcome};
use crate::error::SessionError;

/// Session shared between the host's input handling and the countdown task.
pub type SharedSession = Arc<Mutex<QuizSession>>;

/// Why a countdown task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEnd {
    /// The session reached `Finished`.
    Finished,
    /// The host cancelled the countdown or dropped its handle.
    Cancelled,
    /// The session was not active when a tick arrived.
    Inactive,
    /// The session lock was poisoned by a panicking holder.
    Poisoned,
}

/// Periodic scheduler that delivers `tick()` to a running session.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    period: Duration,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

    #[must_use]
    pub fn new() -> Self {
        Self {
            period: Self::DEFAULT_PERIOD,
        }
    }

    /// Spawn the countdown on the current tokio runtime.
    ///
    /// The first tick lands one period after this call. The task stops by
    /// itself once the session finishes; call [`CountdownHandle::cancel`] to
    /// stop it earlier.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Lock` if the session lock is poisoned.
    pub fn spawn(&self, session: SharedSession) -> Result<CountdownHandle, SessionError> {
        let initial = session
            .lock()
            .map_err(|_| SessionError::Lock)?
            .remaining_seconds();
        let (remaining_tx, remaining_rx) = watch::channel(initial);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let task = tokio::spawn(run(session, self.period, remaining_tx, cancel_rx));

        Ok(CountdownHandle {
            cancel: Some(cancel_tx),
            remaining: remaining_rx,
            task,
            end: None,
        })
    }
}

async fn run(
    session: SharedSession,
    period: Duration,
    remaining: watch::Sender<u32>,
    mut cancel: oneshot::Receiver<()>,
) -> CountdownEnd {
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            // Fires on explicit cancel and when the handle is dropped.
            _ = &mut cancel => {
                tracing::debug!("countdown cancelled");
                return CountdownEnd::Cancelled;
            }
            _ = interval.tick() => {
                let outcome = match session.lock() {
                    Ok(mut guard) => guard.tick(),
                    Err(_) => {
                        tracing::warn!("quiz session lock poisoned; stopping countdown");
                        return CountdownEnd::Poisoned;
                    }
                };
                match outcome {
                    TickOutcome::Running { remaining_seconds } => {
                        remaining.send_replace(remaining_seconds);
                    }
                    TickOutcome::Expired => {
                        remaining.send_replace(0);
                        return CountdownEnd::Finished;
                    }
                    TickOutcome::Ignored => {
                        return match session.lock() {
                            Ok(guard) if guard.is_finished() => CountdownEnd::Finished,
                            Ok(_) => CountdownEnd::Inactive,
                            Err(_) => CountdownEnd::Poisoned,
                        };
                    }
                }
            }
        }
    }
}

/// Host-side handle to a running countdown.
///
/// Dropping the handle cancels the countdown.
#[derive(Debug)]
pub struct CountdownHandle {
    cancel: Option<oneshot::Sender<()>>,
    remaining: watch::Receiver<u32>,
    task: JoinHandle<CountdownEnd>,
    end: Option<CountdownEnd>,
}

impl CountdownHandle {
    /// Stop delivering ticks. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    /// Seconds left as of the last delivered tick.
    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        *self.remaining.borrow()
    }

    /// Receiver that observes every tick's remaining seconds.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.remaining.clone()
    }

    /// Wait for the countdown task to stop.
    ///
    /// Cancel-safe: dropping the future before it completes leaves the
    /// countdown running, so this can sit in a `select!` loop.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Countdown` if the task panicked.
    pub async fn wait(&mut self) -> Result<CountdownEnd, SessionError> {
        if let Some(end) = self.end {
            return Ok(end);
        }
        let end = (&mut self.task).await?;
        self.end = Some(end);
        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuizConfiguration, QuizPhase, TimeLimit};

    fn shared_session(n: usize) -> SharedSession {
        let questions = (0..n)
            .map(|i| Question::new(format!("Q{i}"), [("A", "x"), ("B", "y")], "A").unwrap())
            .collect();
        let mut session = QuizSession::new();
        session
            .start(QuizConfiguration::new(TimeLimit::FiveMinutes, false), questions)
            .unwrap();
        Arc::new(Mutex::new(session))
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_expires_session_after_time_limit() {
        let session = shared_session(2);
        let mut handle = Countdown::new().spawn(Arc::clone(&session)).unwrap();
        assert_eq!(handle.remaining_seconds(), 300);

        let end = handle.wait().await.unwrap();

        assert_eq!(end, CountdownEnd::Finished);
        assert_eq!(handle.remaining_seconds(), 0);
        let guard = session.lock().unwrap();
        assert_eq!(guard.phase(), QuizPhase::Finished);
        assert_eq!(guard.remaining_seconds(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ticks_once_per_period() {
        let session = shared_session(1);
        let _handle = Countdown::new().spawn(Arc::clone(&session)).unwrap();

        tokio::time::sleep(Duration::from_millis(10_500)).await;

        assert_eq!(session.lock().unwrap().remaining_seconds(), 290);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_stops_when_session_finishes_early() {
        let session = shared_session(1);
        let mut handle = Countdown::new().spawn(Arc::clone(&session)).unwrap();

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        {
            let mut guard = session.lock().unwrap();
            guard.select_answer("A");
            guard.advance();
        }

        assert_eq!(handle.wait().await.unwrap(), CountdownEnd::Finished);
        assert_eq!(session.lock().unwrap().remaining_seconds(), 297);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_countdown_stops_ticking() {
        let session = shared_session(1);
        let mut handle = Countdown::new().spawn(Arc::clone(&session)).unwrap();

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        handle.cancel();
        assert_eq!(handle.wait().await.unwrap(), CountdownEnd::Cancelled);

        tokio::time::sleep(Duration::from_secs(10)).await;
        let guard = session.lock().unwrap();
        assert_eq!(guard.remaining_seconds(), 298);
        assert_eq!(guard.phase(), QuizPhase::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_on_unstarted_session_is_inactive() {
        let session = Arc::new(Mutex::new(QuizSession::new()));
        let mut handle = Countdown::new().spawn(session).unwrap();
        assert_eq!(handle.wait().await.unwrap(), CountdownEnd::Inactive);
    }
}
