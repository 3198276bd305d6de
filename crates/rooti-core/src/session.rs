//! Command dispatcher.
//!
//! [`Session`] owns the routine, the engine, the pause prompt and the log
//! sink, and exposes the commands a UI adapter calls. Each command runs to
//! completion and returns the events the adapter should render; log
//! entries among them have already been handed to the sink.
//!
//! Routine edits are refused while the timer is running. Out-of-range
//! removals, pausing an idle timer and similar illegal operations are
//! silent no-ops that return no events.

use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::log::{LogEntry, LogSink};
use crate::pause::PausePrompt;
use crate::routine::{RoutineStore, Segment, SegmentKind};
use crate::timer::{TickHandle, TimerEngine, TimerState};

pub struct Session<L: LogSink> {
    routine: RoutineStore,
    engine: TimerEngine,
    prompt: PausePrompt,
    sink: L,
}

impl<L: LogSink> Session<L> {
    pub fn new(sink: L) -> Self {
        Self::with_parts(
            RoutineStore::new(),
            TimerEngine::new(),
            PausePrompt::default(),
            sink,
        )
    }

    pub fn with_parts(
        routine: RoutineStore,
        engine: TimerEngine,
        prompt: PausePrompt,
        sink: L,
    ) -> Self {
        Self {
            routine,
            engine,
            prompt,
            sink,
        }
    }

    /// Session seeded with the config's tick period, pause categories and
    /// preset routine.
    pub fn from_config(config: &Config, sink: L) -> Self {
        Self::with_parts(
            config.routine(),
            TimerEngine::with_tick_period(config.timer.tick_period_ms),
            PausePrompt::new(config.pause.categories.clone()),
            sink,
        )
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn routine(&self) -> &RoutineStore {
        &self.routine
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn prompt(&self) -> &PausePrompt {
        &self.prompt
    }

    pub fn sink(&self) -> &L {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut L {
        &mut self.sink
    }

    pub fn into_sink(self) -> L {
        self.sink
    }

    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Whether add/remove/clear are currently accepted.
    pub fn editing_allowed(&self) -> bool {
        !self.engine.is_running()
    }

    pub fn display(&self) -> Event {
        self.engine.display(&self.routine)
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot(&self.routine)
    }

    // ── Routine commands ─────────────────────────────────────────────

    /// Append a segment. Bad minutes are reported before anything else is
    /// looked at; a running timer refuses the edit with
    /// [`CoreError::EditingLocked`] and leaves everything unchanged.
    pub fn add_segment(
        &mut self,
        kind: SegmentKind,
        minutes: i64,
    ) -> Result<(Segment, Vec<Event>)> {
        let segment = Segment::new(kind, minutes)?;
        self.push_segment(segment).map(|events| (segment, events))
    }

    /// Like [`Session::add_segment`] but takes the raw text of a minutes field.
    pub fn add_segment_input(
        &mut self,
        kind: SegmentKind,
        minutes: &str,
    ) -> Result<(Segment, Vec<Event>)> {
        let segment = Segment::parse(kind, minutes)?;
        self.push_segment(segment).map(|events| (segment, events))
    }

    fn push_segment(&mut self, segment: Segment) -> Result<Vec<Event>> {
        if self.engine.is_running() {
            tracing::debug!("add_segment refused: timer running");
            return Err(CoreError::EditingLocked);
        }
        self.routine.push(segment);
        tracing::debug!(
            kind = segment.kind().as_str(),
            minutes = segment.minutes(),
            "segment added"
        );
        Ok(self.routine_edited())
    }

    /// Remove the segment at `index` (0-based). No-op while running or
    /// when out of range.
    pub fn remove_segment(&mut self, index: usize) -> Vec<Event> {
        if self.engine.is_running() {
            return Vec::new();
        }
        match self.routine.remove_at(index) {
            Some(removed) => {
                tracing::debug!(index, %removed, "segment removed");
                self.routine_edited()
            }
            None => Vec::new(),
        }
    }

    /// Empty the routine. No-op while running or when already empty.
    pub fn clear_segments(&mut self) -> Vec<Event> {
        if self.engine.is_running() || !self.routine.clear() {
            return Vec::new();
        }
        tracing::debug!("routine cleared");
        self.routine_edited()
    }

    fn routine_edited(&mut self) -> Vec<Event> {
        let mut events = vec![Event::RoutineChanged {
            segments: self.routine.segments().to_vec(),
        }];
        events.extend(self.engine.clear_progress(&self.routine));
        events
    }

    // ── Timer commands ───────────────────────────────────────────────

    /// Start or resume. An unanswered pause prompt is dismissed once the
    /// timer is actually running again.
    pub fn start(&mut self) -> Vec<Event> {
        let mut events = self.engine.start(&self.routine);
        if !events.is_empty() && self.prompt.close() {
            events.push(Event::PausePromptClosed);
        }
        self.dispatch(events)
    }

    /// Pause a running timer, optionally asking for a pause category.
    pub fn pause(&mut self, prompt_category: bool) -> Vec<Event> {
        let mut events = self.engine.pause(&self.routine);
        if !events.is_empty() && prompt_category && self.prompt.open() {
            events.push(Event::PausePromptOpened);
        }
        self.dispatch(events)
    }

    /// Start when stopped, pause (with prompt) when running.
    pub fn toggle(&mut self) -> Vec<Event> {
        if self.engine.is_running() {
            self.pause(true)
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Vec<Event> {
        let mut events = self.engine.reset(&self.routine);
        if self.prompt.close() {
            events.push(Event::PausePromptClosed);
        }
        self.dispatch(events)
    }

    pub fn tick(&mut self, handle: TickHandle) -> Vec<Event> {
        let events = self.engine.tick(&self.routine, handle);
        self.dispatch(events)
    }

    pub fn log_current_session(&mut self) -> Vec<Event> {
        let events = self.engine.log_current_session(&self.routine);
        self.dispatch(events)
    }

    // ── Pause prompt ─────────────────────────────────────────────────

    /// Answer the open pause prompt. The entry's duration is the total
    /// elapsed time of the run, not the time since the previous pause.
    pub fn submit_pause_category(&mut self, category: &str) -> Vec<Event> {
        if self.engine.state() != TimerState::Paused {
            return Vec::new();
        }
        let Some(category) = self.prompt.submit(category) else {
            return Vec::new();
        };
        tracing::debug!(%category, elapsed = self.engine.elapsed_secs(), "pause categorised");
        let entry = LogEntry::paused(category, self.engine.elapsed_secs());
        self.dispatch(vec![Event::LogRecorded { entry }, Event::PausePromptClosed])
    }

    /// Answer the open prompt with the n-th (1-based) configured preset.
    pub fn submit_pause_preset(&mut self, number: usize) -> Vec<Event> {
        match self.prompt.preset(number).map(str::to_owned) {
            Some(category) => self.submit_pause_category(&category),
            None => Vec::new(),
        }
    }

    pub fn cancel_pause_category(&mut self) -> Vec<Event> {
        if self.prompt.cancel() {
            vec![Event::PausePromptClosed]
        } else {
            Vec::new()
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn dispatch(&mut self, events: Vec<Event>) -> Vec<Event> {
        for entry in events.iter().filter_map(Event::log_entry) {
            self.sink.record(entry.clone());
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::log::{LogLabel, MemoryLog};

    fn session() -> Session<MemoryLog> {
        Session::new(MemoryLog::new())
    }

    fn tick_n(s: &mut Session<MemoryLog>, n: usize) {
        for _ in 0..n {
            let Some(handle) = s.engine().tick_handle() else {
                break;
            };
            s.tick(handle);
        }
    }

    #[test]
    fn add_rejects_invalid_minutes_without_mutation() {
        let mut s = session();
        let err = s.add_segment(SegmentKind::Study, 0).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::NonPositiveMinutes(0))
        ));
        assert!(s.routine().is_empty());

        assert!(s.add_segment_input(SegmentKind::Break, "ten").is_err());
        assert!(s.routine().is_empty());
    }

    #[test]
    fn add_emits_routine_and_display_events() {
        let mut s = session();
        let (segment, events) = s.add_segment(SegmentKind::Study, 25).unwrap();
        assert_eq!(segment.minutes(), 25);
        assert!(matches!(&events[0], Event::RoutineChanged { segments } if segments.len() == 1));
        assert!(events.contains(&Event::DisplayUpdated {
            time: "00:00:00".into(),
            status: "공부 준비 완료".into(),
        }));
    }

    #[test]
    fn edits_are_refused_while_running() {
        let mut s = session();
        s.add_segment(SegmentKind::Study, 1).unwrap();
        s.start();
        tick_n(&mut s, 5);

        assert!(matches!(
            s.add_segment(SegmentKind::Break, 5),
            Err(CoreError::EditingLocked)
        ));
        assert!(s.remove_segment(0).is_empty());
        assert!(s.clear_segments().is_empty());
        assert_eq!(s.routine().len(), 1);
        assert_eq!(s.engine().remaining_secs(), 55);
    }

    #[test]
    fn add_while_paused_clears_progress() {
        let mut s = session();
        s.add_segment(SegmentKind::Study, 1).unwrap();
        s.start();
        tick_n(&mut s, 5);
        s.pause(false);
        s.add_segment(SegmentKind::Break, 1).unwrap();
        assert_eq!(s.engine().active_index(), None);
        assert!(!s.engine().progress().active);

        s.start();
        assert_eq!(s.engine().active_index(), Some(0));
        assert_eq!(s.engine().remaining_secs(), 60);
        assert_eq!(s.engine().elapsed_secs(), 0);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut s = session();
        s.add_segment(SegmentKind::Study, 1).unwrap();
        assert!(s.remove_segment(4).is_empty());
        assert_eq!(s.routine().len(), 1);
        assert!(!s.remove_segment(0).is_empty());
        assert!(s.clear_segments().is_empty());
    }

    #[test]
    fn pause_opens_prompt_and_category_logs_total_elapsed() {
        let mut s = session();
        s.start();
        tick_n(&mut s, 10);
        let events = s.pause(true);
        assert!(events.contains(&Event::PausePromptOpened));
        assert!(s.prompt().is_open());

        let events = s.submit_pause_category("phone");
        assert!(events.contains(&Event::PausePromptClosed));
        let entry = &s.sink().entries()[0];
        assert_eq!(entry.label, LogLabel::Paused);
        assert_eq!(entry.tag.as_deref(), Some("phone"));
        assert_eq!(entry.duration_secs, 10);
        assert_eq!(s.state(), TimerState::Paused);
    }

    #[test]
    fn cancelled_prompt_logs_nothing() {
        let mut s = session();
        s.start();
        tick_n(&mut s, 3);
        s.pause(true);
        assert_eq!(s.cancel_pause_category(), vec![Event::PausePromptClosed]);
        assert!(s.sink().is_empty());
        assert_eq!(s.state(), TimerState::Paused);
        assert!(s.cancel_pause_category().is_empty());
    }

    #[test]
    fn pause_without_prompt_leaves_prompt_closed() {
        let mut s = session();
        s.start();
        s.pause(false);
        assert!(!s.prompt().is_open());
        assert!(s.submit_pause_category("phone").is_empty());
        assert!(s.sink().is_empty());
    }

    #[test]
    fn pause_when_idle_does_not_prompt() {
        let mut s = session();
        assert!(s.pause(true).is_empty());
        assert!(!s.prompt().is_open());
    }

    #[test]
    fn reset_closes_open_prompt() {
        let mut s = session();
        s.start();
        tick_n(&mut s, 2);
        s.pause(true);
        let events = s.reset();
        assert!(events.contains(&Event::PausePromptClosed));
        assert!(!s.prompt().is_open());
        assert_eq!(s.engine().elapsed_secs(), 0);
    }

    #[test]
    fn start_dismisses_unanswered_prompt() {
        let mut s = session();
        s.start();
        tick_n(&mut s, 3);
        s.pause(true);

        let events = s.start();
        assert!(events.contains(&Event::PausePromptClosed));
        assert!(!s.prompt().is_open());
        tick_n(&mut s, 2);

        assert!(s.submit_pause_category("phone").is_empty());
        assert!(s.sink().is_empty());
        assert_eq!(s.state(), TimerState::Running);

        let events = s.pause(true);
        assert!(events.contains(&Event::PausePromptOpened));
        s.submit_pause_category("phone");
        assert_eq!(s.sink().entries()[0].duration_secs, 5);
    }

    #[test]
    fn toggle_alternates_start_and_pause() {
        let mut s = session();
        s.toggle();
        assert!(s.is_running());
        s.toggle();
        assert_eq!(s.state(), TimerState::Paused);
        assert!(s.prompt().is_open());
    }

    #[test]
    fn presets_submit_by_number() {
        let config = Config::default();
        let mut s = Session::from_config(&config, MemoryLog::new());
        s.start();
        tick_n(&mut s, 4);
        s.pause(true);
        assert!(s.submit_pause_preset(9).is_empty());
        assert!(!s.submit_pause_preset(2).is_empty());
        assert_eq!(s.sink().entries()[0].tag.as_deref(), Some("식사"));
    }

    #[test]
    fn completed_segments_reach_the_sink() {
        let mut s = session();
        s.add_segment(SegmentKind::Study, 1).unwrap();
        s.add_segment(SegmentKind::Break, 1).unwrap();
        s.start();
        tick_n(&mut s, 120);
        assert_eq!(s.state(), TimerState::RoutineCompleted);
        let labels: Vec<_> = s.sink().entries().iter().map(|e| e.label).collect();
        // newest first
        assert_eq!(labels, vec![LogLabel::BreakComplete, LogLabel::StudyComplete]);
        assert!(s.editing_allowed());

        s.log_current_session();
        assert_eq!(s.sink().entries()[0].label, LogLabel::RoutineSummary);
        assert_eq!(s.sink().entries()[0].duration_secs, 120);
    }
}
