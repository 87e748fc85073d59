// src/build/gate.rs

use std::sync::{Mutex, MutexGuard};

/// Serializes rebuild attempts to at most one in-flight build per cycle.
///
/// An explicit state machine transitioned under a lock: a trigger arriving
/// while a build is in flight is dropped for that cycle, and the gate is
/// fresh again once the attempt finishes, success or failure.
#[derive(Debug, Default)]
pub struct BuildGate {
    state: Mutex<GateState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Idle,
    Building,
    /// Last attempt finished; `true` when it succeeded.
    Done(bool),
}

impl BuildGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to enter `Building`. Returns `false` while another build is in
    /// flight.
    pub fn try_begin(&self) -> bool {
        let mut state = self.lock();
        match *state {
            GateState::Building => false,
            GateState::Idle | GateState::Done(_) => {
                *state = GateState::Building;
                true
            }
        }
    }

    /// Record the attempt's outcome, reopening the gate for the next cycle.
    pub fn finish(&self, success: bool) {
        let mut state = self.lock();
        debug_assert_eq!(*state, GateState::Building);
        *state = GateState::Done(success);
    }

    pub fn state(&self) -> GateState {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
