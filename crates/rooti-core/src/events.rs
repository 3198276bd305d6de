use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::log::LogEntry;
use crate::routine::{Segment, SegmentKind};
use crate::timer::{TickHandle, TimerState};

/// Every state change in the engine produces one or more Events.
/// The UI adapter renders them; the log sink receives `LogRecorded` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Timer face and status line need repainting.
    DisplayUpdated {
        time: String,
        status: String,
    },
    LogRecorded {
        entry: LogEntry,
    },
    RoutineChanged {
        segments: Vec<Segment>,
    },
    /// Editing controls (add/remove/clear) should be enabled or disabled.
    ControlsChanged {
        editing_allowed: bool,
    },
    PausePromptOpened,
    PausePromptClosed,
    /// A periodic tick should now fire every `period_ms` tagged with `handle`.
    TickScheduled {
        handle: TickHandle,
        period_ms: u64,
    },
    /// The schedule for `handle` is cancelled; stop firing it.
    TickCancelled {
        handle: TickHandle,
    },
    TimerStarted {
        at: DateTime<Local>,
    },
    TimerPaused {
        at: DateTime<Local>,
    },
    TimerReset {
        at: DateTime<Local>,
    },
    SegmentAdvanced {
        index: usize,
        kind: SegmentKind,
        remaining_secs: u64,
    },
    RoutineCompleted {
        at: DateTime<Local>,
    },
    StateSnapshot {
        state: TimerState,
        elapsed_secs: u64,
        active_index: Option<usize>,
        remaining_secs: u64,
        segment_count: usize,
        time: String,
        status: String,
        at: DateTime<Local>,
    },
}

impl Event {
    pub fn log_entry(&self) -> Option<&LogEntry> {
        match self {
            Event::LogRecorded { entry } => Some(entry),
            _ => None,
        }
    }
}
