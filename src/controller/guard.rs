//! Per-workflow busy flag with a delayed release.

use serde::Serialize;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Where a controller is in its dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Dispatching,
    CoolingDown,
}

impl Phase {
    fn from_u8(v: u8) -> Phase {
        match v {
            1 => Phase::Dispatching,
            2 => Phase::CoolingDown,
            _ => Phase::Idle,
        }
    }
}

/// Busy whenever the phase is not `Idle`.
#[derive(Debug)]
pub struct BusyGuard {
    phase: AtomicU8,
    cooldown: Duration,
}

impl BusyGuard {
    pub fn new(cooldown: Duration) -> Arc<Self> {
        Arc::new(Self {
            phase: AtomicU8::new(Phase::Idle as u8),
            cooldown,
        })
    }

    /// Move Idle -> Dispatching. Returns `None` if a cycle is already in
    /// progress, including its cool-down.
    pub fn try_acquire(self: &Arc<Self>) -> Option<BusyPermit> {
        self.phase
            .compare_exchange(
                Phase::Idle as u8,
                Phase::Dispatching as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .ok()?;
        Some(BusyPermit {
            guard: Some(self.clone()),
        })
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    pub fn is_busy(&self) -> bool {
        self.phase() != Phase::Idle
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    fn release(&self) {
        self.phase.store(Phase::Idle as u8, Ordering::Release);
        trace!("busy guard released");
    }

    fn cool_down(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        self.phase.store(Phase::CoolingDown as u8, Ordering::Release);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(handle.spawn(async move {
                tokio::time::sleep(self.cooldown).await;
                self.release();
            })),
            // No runtime to defer onto (e.g. during shutdown).
            Err(_) => {
                self.release();
                None
            }
        }
    }
}

/// Held for the duration of one dispatch. Dropping it, explicitly or by
/// abandoning the cycle, starts the cool-down.
#[derive(Debug)]
pub struct BusyPermit {
    guard: Option<Arc<BusyGuard>>,
}

impl BusyPermit {
    /// Enter the cool-down phase and schedule the release.
    pub fn release_after_cooldown(mut self) -> Option<tokio::task::JoinHandle<()>> {
        self.guard.take().and_then(BusyGuard::cool_down)
    }
}

impl Drop for BusyPermit {
    fn drop(&mut self) {
        if let Some(guard) = self.guard.take() {
            guard.cool_down();
        }
    }
}
