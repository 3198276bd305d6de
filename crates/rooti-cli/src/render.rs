//! Text rendering of engine events for the shell.

use std::io::{self, Write};

use rooti_core::timer::display::format_hms;
use rooti_core::{Event, LogEntry, Segment};

pub struct Renderer<W: Write> {
    out: W,
    presets: Vec<String>,
    last_status: Option<String>,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, presets: Vec<String>) -> Self {
        Self {
            out,
            presets,
            last_status: None,
        }
    }

    /// Events produced by a typed command: everything worth showing,
    /// including the timer face.
    pub fn command_events(&mut self, events: &[Event]) -> io::Result<()> {
        for event in events {
            self.event(event, true)?;
        }
        self.out.flush()
    }

    /// Events produced by clock ticks. The timer face is only repainted
    /// when the status line changes, so a running minute prints once.
    pub fn tick_events(&mut self, events: &[Event]) -> io::Result<()> {
        for event in events {
            self.event(event, false)?;
        }
        self.out.flush()
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "error: {message}")?;
        self.out.flush()
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn routine(&mut self, segments: &[Segment]) -> io::Result<()> {
        if segments.is_empty() {
            writeln!(self.out, "  (추가된 루틴이 없습니다)")?;
        }
        for (i, segment) in segments.iter().enumerate() {
            writeln!(self.out, "  {}. {}", i + 1, segment)?;
        }
        self.out.flush()
    }

    pub fn logs(&mut self, entries: &[LogEntry]) -> io::Result<()> {
        if entries.is_empty() {
            writeln!(self.out, "  (기록 없음)")?;
        }
        for (i, entry) in entries.iter().enumerate() {
            writeln!(self.out, "  {}. {}", i + 1, entry)?;
        }
        self.out.flush()
    }

    fn event(&mut self, event: &Event, always_show_display: bool) -> io::Result<()> {
        match event {
            Event::DisplayUpdated { time, status } => {
                let changed = self.last_status.as_deref() != Some(status.as_str());
                if always_show_display || changed {
                    writeln!(self.out, "{time}  {status}")?;
                }
                self.last_status = Some(status.clone());
            }
            Event::LogRecorded { entry } => writeln!(self.out, "+ {entry}")?,
            Event::RoutineChanged { segments } => self.routine(segments)?,
            Event::ControlsChanged { editing_allowed } => {
                if !editing_allowed {
                    writeln!(self.out, "(routine editing locked while running)")?;
                }
            }
            Event::PausePromptOpened => {
                let options = self
                    .presets
                    .iter()
                    .enumerate()
                    .map(|(i, p)| format!("{}) {}", i + 1, p))
                    .collect::<Vec<_>>()
                    .join("  ");
                writeln!(self.out, "pause category? {options}")?;
                writeln!(self.out, "  (c <n> | category <text> | cancel)")?;
            }
            Event::TimerStarted { .. } => writeln!(self.out, "started")?,
            Event::TimerPaused { .. } => writeln!(self.out, "paused")?,
            Event::TimerReset { .. } => writeln!(self.out, "reset")?,
            Event::SegmentAdvanced {
                index,
                kind,
                remaining_secs,
            } => writeln!(
                self.out,
                "-> {}. {} ({})",
                index + 1,
                kind,
                format_hms(*remaining_secs)
            )?,
            Event::RoutineCompleted { .. } => writeln!(self.out, "routine complete")?,
            Event::StateSnapshot { .. } => {
                let json = serde_json::to_string_pretty(event).map_err(io::Error::other)?;
                writeln!(self.out, "{json}")?;
            }
            Event::PausePromptClosed
            | Event::TickScheduled { .. }
            | Event::TickCancelled { .. } => {}
        }
        Ok(())
    }
}
