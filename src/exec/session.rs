// src/exec/session.rs

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::debug;

/// Single-use cancellation broadcast ending a supervision session.
///
/// Exactly one of the failure paths (quiet-period rebuild failure, fatal
/// crash, Ctrl-C) ends the session by calling [`cancel`](Self::cancel). The
/// call is idempotent: a closed flag under a mutex guards the underlying
/// channel, so a second cancel is a no-op rather than a double close.
#[derive(Clone, Debug)]
pub struct SessionSignal {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    closed: Mutex<bool>,
    tx: watch::Sender<bool>,
}

impl SessionSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                closed: Mutex::new(false),
                tx,
            }),
        }
    }

    /// End the session. Safe to call from any task, any number of times;
    /// only the first call broadcasts.
    pub fn cancel(&self) {
        let mut closed = self.flag();
        if *closed {
            debug!("session signal already closed; ignoring");
            return;
        }
        *closed = true;
        let _ = self.inner.tx.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.flag()
    }

    /// Wait until the session is cancelled. Returns immediately if it
    /// already was.
    pub async fn wait(&self) {
        let mut rx = self.inner.tx.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    fn flag(&self) -> MutexGuard<'_, bool> {
        match self.inner.closed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for SessionSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let signal = SessionSignal::new();
        assert!(!signal.is_cancelled());

        signal.cancel();
        signal.cancel();
        assert!(signal.is_cancelled());

        // Wait on an already-cancelled signal returns immediately.
        signal.wait().await;
    }

    #[tokio::test]
    async fn wait_blocks_until_cancel() {
        let signal = SessionSignal::new();

        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        signal.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake after cancel")
            .expect("waiter task should not panic");
    }
}
