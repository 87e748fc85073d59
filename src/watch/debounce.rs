// src/watch/debounce.rs

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, error};

use crate::errors::Result;
use crate::exec::SessionSignal;
use crate::watch::ChangeEvent;

/// Quiet interval with no superseding event before a rebuild fires.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(1);

/// Action invoked when a debounce window elapses quietly.
///
/// Returns a boxed future so implementations (the real stop → build → run
/// sequence in production, fakes in tests) can live behind a trait object.
pub trait BuildTrigger: Send + Sync + 'static {
    fn rebuild(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Coalesces bursts of change events into a single trigger invocation.
///
/// Every observed event bumps a logical "last update" generation and
/// schedules a delayed check after the quiet window. A check that finds a
/// newer generation at fire time abandons silently (the newer schedule fires
/// instead), so at most one trigger runs per window and overlapping windows
/// collapse to the latest event. A failing trigger ends the session: the
/// signal is cancelled and nothing further is scheduled.
pub struct Debouncer<T: BuildTrigger> {
    window: Duration,
    generation: Arc<Mutex<u64>>,
    trigger: Arc<T>,
    session: SessionSignal,
}

impl<T: BuildTrigger> Debouncer<T> {
    pub fn new(trigger: Arc<T>, session: SessionSignal) -> Self {
        Self::with_window(trigger, session, DEBOUNCE_WINDOW)
    }

    pub fn with_window(trigger: Arc<T>, session: SessionSignal, window: Duration) -> Self {
        Self {
            window,
            generation: Arc::new(Mutex::new(0)),
            trigger,
            session,
        }
    }

    /// Record an event and schedule the delayed quiet-window check.
    pub fn observe(&self, event: ChangeEvent) {
        if self.session.is_cancelled() {
            return;
        }
        debug!(path = %event.path.display(), "change event");

        let scheduled = {
            let mut generation = lock_generation(&self.generation);
            *generation += 1;
            *generation
        };

        let generation = Arc::clone(&self.generation);
        let trigger = Arc::clone(&self.trigger);
        let session = self.session.clone();
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if *lock_generation(&generation) != scheduled {
                // A newer event arrived; its own check fires instead.
                return;
            }
            if session.is_cancelled() {
                return;
            }
            if let Err(err) = trigger.rebuild().await {
                error!(error = %err, "rebuild failed; ending session");
                session.cancel();
            }
        });
    }
}

fn lock_generation(generation: &Mutex<u64>) -> MutexGuard<'_, u64> {
    match generation.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
