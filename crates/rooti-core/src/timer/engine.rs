//! Timer engine implementation.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads or read the wall clock: the caller arms a periodic tick when the
//! engine asks for one ([`Event::TickScheduled`]) and calls
//! [`TimerEngine::tick`] with the handle it was given once per period.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!     RoutineCompleted -> Running (restart from the top)
//!
//! any -> Idle (reset)
//! ```
//!
//! With an empty routine the engine is a plain stopwatch: it only counts
//! elapsed seconds and never reaches `RoutineCompleted`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! let events = engine.start(&routine);
//! let handle = engine.tick_handle().unwrap();
//! // Once per second:
//! let events = engine.tick(&routine, handle);
//! ```

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::display;
use super::ticker::{TickHandle, TickSlot};
use crate::events::Event;
use crate::log::LogEntry;
use crate::routine::RoutineStore;

pub const DEFAULT_TICK_PERIOD_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// Never started, or reset.
    Idle,
    Running,
    Paused,
    /// Every segment finished. Stays here until started again.
    RoutineCompleted,
}

/// Where the engine is within the routine.
///
/// `active` implies `active_index` points into the routine; `completed`
/// implies `!active` and no index. `remaining_secs` only means something
/// while `active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineProgress {
    pub active_index: Option<usize>,
    pub remaining_secs: u64,
    pub active: bool,
    pub completed: bool,
}

impl RoutineProgress {
    /// Forget any progress so the next start begins at the first segment.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn begin(&mut self, index: usize, remaining_secs: u64) {
        self.active_index = Some(index);
        self.remaining_secs = remaining_secs;
        self.active = true;
        self.completed = false;
    }

    fn finish(&mut self) {
        self.active_index = None;
        self.remaining_secs = 0;
        self.active = false;
        self.completed = true;
    }
}

/// Core timer engine.
///
/// Reads the routine on every command but never modifies it.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    state: TimerState,
    /// Total seconds counted since the last reset, across segments.
    elapsed_secs: u64,
    progress: RoutineProgress,
    ticks: TickSlot,
    tick_period_ms: u64,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::with_tick_period(DEFAULT_TICK_PERIOD_MS)
    }

    pub fn with_tick_period(tick_period_ms: u64) -> Self {
        Self {
            state: TimerState::Idle,
            elapsed_secs: 0,
            progress: RoutineProgress::default(),
            ticks: TickSlot::new(),
            tick_period_ms: tick_period_ms.max(1),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn progress(&self) -> &RoutineProgress {
        &self.progress
    }

    pub fn active_index(&self) -> Option<usize> {
        self.progress.active_index
    }

    pub fn remaining_secs(&self) -> u64 {
        self.progress.remaining_secs
    }

    /// Handle of the armed tick schedule, `None` unless running.
    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.ticks.armed()
    }

    pub fn tick_period_ms(&self) -> u64 {
        self.tick_period_ms
    }

    /// Seconds shown on the timer face: the segment countdown while a
    /// routine is active, otherwise the stopwatch total. Zero once the
    /// routine has completed.
    pub fn display_secs(&self) -> u64 {
        if self.progress.active {
            self.progress.remaining_secs
        } else if self.state == TimerState::RoutineCompleted {
            0
        } else {
            self.elapsed_secs
        }
    }

    pub fn display(&self, routine: &RoutineStore) -> Event {
        Event::DisplayUpdated {
            time: display::format_hms(self.display_secs()),
            status: display::status_line(routine, &self.progress, self.is_running()),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, routine: &RoutineStore) -> Event {
        Event::StateSnapshot {
            state: self.state,
            elapsed_secs: self.elapsed_secs,
            active_index: self.progress.active_index,
            remaining_secs: self.progress.remaining_secs,
            segment_count: routine.len(),
            time: display::format_hms(self.display_secs()),
            status: display::status_line(routine, &self.progress, self.is_running()),
            at: Local::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, routine: &RoutineStore) -> Vec<Event> {
        if self.is_running() {
            tracing::debug!("start ignored: already running");
            return Vec::new();
        }

        let mut events = Vec::new();

        if let Some(first) = routine.first() {
            let p = self.progress;
            if !p.active || p.completed || p.active_index.is_none() {
                self.progress.begin(0, first.duration_secs());
                self.elapsed_secs = 0;
                tracing::debug!(segments = routine.len(), "routine started from the top");
            } else if p.remaining_secs == 0 {
                // Resuming exactly on a boundary reloads the current segment.
                if let Some(current) = p.active_index.and_then(|i| routine.get(i)) {
                    self.progress.remaining_secs = current.duration_secs();
                }
            }
        }

        let (stale, handle) = self.ticks.arm();
        if let Some(stale) = stale {
            events.push(Event::TickCancelled { handle: stale });
        }
        self.state = TimerState::Running;
        tracing::debug!(%handle, elapsed = self.elapsed_secs, "timer started");

        events.push(Event::TickScheduled {
            handle,
            period_ms: self.tick_period_ms,
        });
        events.push(Event::TimerStarted { at: Local::now() });
        events.push(Event::ControlsChanged {
            editing_allowed: false,
        });
        events.push(self.display(routine));
        events
    }

    /// Advance the clock by one period. Ticks carrying a stale handle, or
    /// arriving while not running, are dropped.
    pub fn tick(&mut self, routine: &RoutineStore, handle: TickHandle) -> Vec<Event> {
        if !self.is_running() || !self.ticks.accepts(handle) {
            tracing::trace!(%handle, "stale tick dropped");
            return Vec::new();
        }

        let mut events = Vec::new();

        if self.progress.active && !routine.is_empty() {
            if self.progress.remaining_secs > 0 {
                self.progress.remaining_secs -= 1;
                self.elapsed_secs += 1;
                if self.progress.remaining_secs == 0 {
                    self.complete_segment(routine, &mut events);
                }
            } else {
                self.complete_segment(routine, &mut events);
            }
        } else {
            self.elapsed_secs += 1;
        }

        tracing::trace!(
            elapsed = self.elapsed_secs,
            remaining = self.progress.remaining_secs,
            "tick"
        );
        events.push(self.display(routine));
        events
    }

    /// Stop the clock. The pause-category prompt is the caller's business.
    pub fn pause(&mut self, routine: &RoutineStore) -> Vec<Event> {
        if !self.is_running() {
            tracing::debug!(state = ?self.state, "pause ignored: not running");
            return Vec::new();
        }

        let mut events = Vec::new();
        if let Some(handle) = self.ticks.disarm() {
            events.push(Event::TickCancelled { handle });
        }
        self.state = TimerState::Paused;
        tracing::debug!(elapsed = self.elapsed_secs, "timer paused");

        events.push(Event::TimerPaused { at: Local::now() });
        events.push(Event::ControlsChanged {
            editing_allowed: true,
        });
        events.push(self.display(routine));
        events
    }

    /// Back to `Idle` from any state, with elapsed time and routine
    /// progress cleared.
    pub fn reset(&mut self, routine: &RoutineStore) -> Vec<Event> {
        let mut events = self.pause(routine);
        // Paused/idle engines have nothing armed; this only matters if the
        // slot and the state ever disagree.
        if let Some(handle) = self.ticks.disarm() {
            events.push(Event::TickCancelled { handle });
        }

        self.elapsed_secs = 0;
        self.state = TimerState::Idle;
        self.progress.clear();
        tracing::debug!("timer reset");

        events.push(Event::TimerReset { at: Local::now() });
        events.push(Event::ControlsChanged {
            editing_allowed: true,
        });
        events.push(self.display(routine));
        events
    }

    /// Manual summary of the run so far. Nothing is produced before the
    /// first second has been counted.
    pub fn log_current_session(&self, routine: &RoutineStore) -> Vec<Event> {
        if self.elapsed_secs == 0 {
            return Vec::new();
        }
        let entry = LogEntry::summary(!routine.is_empty(), self.elapsed_secs);
        tracing::debug!(label = %entry.label, secs = entry.duration_secs, "session logged");
        vec![Event::LogRecorded { entry }]
    }

    /// Drop routine progress after the segment list changed. A completed
    /// routine goes back to `Idle`; elapsed time is left alone.
    pub fn clear_progress(&mut self, routine: &RoutineStore) -> Vec<Event> {
        self.progress.clear();
        if self.state == TimerState::RoutineCompleted {
            self.state = TimerState::Idle;
        }
        vec![self.display(routine)]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_segment(&mut self, routine: &RoutineStore, events: &mut Vec<Event>) {
        let index = self.progress.active_index.unwrap_or(0);
        if let Some(segment) = routine.get(index) {
            tracing::info!(
                index,
                kind = segment.kind().as_str(),
                minutes = segment.minutes(),
                "segment completed"
            );
            events.push(Event::LogRecorded {
                entry: LogEntry::segment_completed(segment),
            });
        }

        let next = index + 1;
        match routine.get(next) {
            Some(segment) => {
                self.progress.active_index = Some(next);
                self.progress.remaining_secs = segment.duration_secs();
                events.push(Event::SegmentAdvanced {
                    index: next,
                    kind: segment.kind(),
                    remaining_secs: segment.duration_secs(),
                });
            }
            None => {
                if let Some(handle) = self.ticks.disarm() {
                    events.push(Event::TickCancelled { handle });
                }
                self.state = TimerState::RoutineCompleted;
                self.progress.finish();
                tracing::info!(elapsed = self.elapsed_secs, "routine completed");
                events.push(Event::RoutineCompleted { at: Local::now() });
                events.push(Event::ControlsChanged {
                    editing_allowed: true,
                });
            }
        }
    }
}
