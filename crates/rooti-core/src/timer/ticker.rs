//! Bookkeeping for the periodic tick schedule.
//!
//! The engine never sleeps or spawns anything. It hands out a
//! [`TickHandle`] when the schedule is armed and forgets it when disarmed;
//! whoever drives the clock tags each tick with the handle it was given.
//! A tick carrying anything but the currently armed handle is stale and
//! gets dropped, so a tick already queued when the timer paused can never
//! advance time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generation token for one armed tick schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick#{}", self.0)
    }
}

/// At most one armed schedule at a time.
#[derive(Debug, Clone, Default)]
pub struct TickSlot {
    next_id: u64,
    armed: Option<TickHandle>,
}

impl TickSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a fresh schedule. Returns the stale handle that was replaced,
    /// if any, together with the new one.
    pub fn arm(&mut self) -> (Option<TickHandle>, TickHandle) {
        let stale = self.armed.take();
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.armed = Some(handle);
        (stale, handle)
    }

    /// Cancel the armed schedule. Calling this when nothing is armed is fine
    /// and returns `None`.
    pub fn disarm(&mut self) -> Option<TickHandle> {
        self.armed.take()
    }

    pub fn armed(&self) -> Option<TickHandle> {
        self.armed
    }

    pub fn accepts(&self, handle: TickHandle) -> bool {
        self.armed == Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_replaces_stale_handle() {
        let mut slot = TickSlot::new();
        let (stale, first) = slot.arm();
        assert!(stale.is_none());
        let (stale, second) = slot.arm();
        assert_eq!(stale, Some(first));
        assert_ne!(first, second);
        assert!(slot.accepts(second));
        assert!(!slot.accepts(first));
    }

    #[test]
    fn disarm_is_idempotent() {
        let mut slot = TickSlot::new();
        let (_, handle) = slot.arm();
        assert_eq!(slot.disarm(), Some(handle));
        assert_eq!(slot.disarm(), None);
        assert!(!slot.accepts(handle));
    }

    #[test]
    fn handles_are_never_reused() {
        let mut slot = TickSlot::new();
        let (_, a) = slot.arm();
        slot.disarm();
        let (_, b) = slot.arm();
        assert!(b.id() > a.id());
    }
}
