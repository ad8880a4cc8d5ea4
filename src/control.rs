//! Run control shared between the control surface and the producer thread.
//!
//! [`RunControl`] is the only state touched from both execution contexts.
//! It is a tri-state switch rather than a plain flag so that it can also act
//! as the launch guard: a producer unit that was asked to stop leaves the
//! `Stopping` state itself, and only then is a fresh unit allowed to start.
//!
//! ```text
//!            activate() -> launch         deactivate()
//!   Idle ────────────────────────► Active ───────────► Stopping
//!    ▲                               ▲                    │
//!    │       keep_running() == false │  activate()        │
//!    └───────────────────────────────┼────────────────────┘
//!                                    └── (unit keeps running, no launch)
//! ```

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const IDLE: u8 = 0;
const ACTIVE: u8 = 1;
const STOPPING: u8 = 2;

/// Observable state of a [`RunControl`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// No producer unit is alive.
    Idle,
    /// A producer unit is (or is about to be) sampling.
    Active,
    /// Sampling was switched off; the unit has not observed it yet.
    Stopping,
}

impl RunState {
    fn from_raw(v: u8) -> Self {
        match v {
            ACTIVE => RunState::Active,
            STOPPING => RunState::Stopping,
            _ => RunState::Idle,
        }
    }
}

/// Cloneable handle to the shared run switch. Never blocks.
#[derive(Clone, Debug, Default)]
pub struct RunControl {
    state: Arc<AtomicU8>,
}

impl RunControl {
    /// Create a switch in the `Idle` state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        RunState::from_raw(self.state.load(Ordering::SeqCst))
    }

    /// Whether sampling is currently requested.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.load(Ordering::SeqCst) == ACTIVE
    }

    /// Request sampling.
    ///
    /// Returns `true` when no unit is alive and the caller must launch one.
    /// Returns `false` when a unit is already running, or is still alive in
    /// `Stopping` and simply resumes.
    pub fn activate(&self) -> bool {
        let mut cur = self.state.load(Ordering::SeqCst);
        loop {
            if cur == ACTIVE {
                return false;
            }
            match self
                .state
                .compare_exchange(cur, ACTIVE, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(prev) => return prev == IDLE,
                Err(actual) => cur = actual,
            }
        }
    }

    /// Ask the running unit to stop after its current sleep.
    pub fn deactivate(&self) {
        let _ = self
            .state
            .compare_exchange(ACTIVE, STOPPING, Ordering::SeqCst, Ordering::SeqCst);
    }

    /// Loop check for the producer.
    ///
    /// When sampling was switched off, this also hands the switch back to
    /// `Idle`, marking the calling unit as gone.
    pub fn keep_running(&self) -> bool {
        let mut cur = self.state.load(Ordering::SeqCst);
        loop {
            match cur {
                ACTIVE => return true,
                STOPPING => {
                    match self.state.compare_exchange(
                        STOPPING,
                        IDLE,
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    ) {
                        Ok(_) => return false,
                        // Re-activated in the meantime, look again.
                        Err(actual) => cur = actual,
                    }
                }
                _ => return false,
            }
        }
    }

    /// Mark the calling unit as gone regardless of the requested state.
    ///
    /// Used when a unit gives up on its own (source failures, disconnected consumer).
    pub fn retire(&self) {
        self.state.store(IDLE, Ordering::SeqCst);
    }
}
