//! Per-command re-entrancy gate.

use std::sync::atomic::{AtomicBool, Ordering};

/// Busy flag for one command.
///
/// A second invocation while the first still runs gets `None` from
/// [`CommandGate::try_enter`] and should return without side effects.
#[derive(Debug, Default)]
pub struct CommandGate {
    busy: AtomicBool,
}

impl CommandGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the command as running until the returned guard is dropped.
    pub fn try_enter(&self) -> Option<GateGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the gate on drop, including when the command future is dropped.
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a CommandGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
