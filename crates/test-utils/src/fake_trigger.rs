use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use gowatch::errors::Result;
use gowatch::watch::BuildTrigger;

/// A fake rebuild trigger that:
/// - counts how many times it fired
/// - can be told to report failure, for session-ending paths.
#[derive(Debug, Default)]
pub struct FakeTrigger {
    fires: AtomicUsize,
    fail: AtomicBool,
}

impl FakeTrigger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let trigger = Self::default();
        trigger.fail.store(true, Ordering::SeqCst);
        Arc::new(trigger)
    }

    pub fn fires(&self) -> usize {
        self.fires.load(Ordering::SeqCst)
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl BuildTrigger for FakeTrigger {
    fn rebuild(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.fires.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                Err(anyhow::anyhow!("simulated rebuild failure").into())
            } else {
                Ok(())
            }
        })
    }
}
