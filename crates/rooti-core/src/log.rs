//! Session log entries and the sink that receives them.
//!
//! Entries are created by the engine at segment completion, on pause
//! category confirmation, and on a manual "log current session" request.
//! Storage and rendering belong to whatever implements [`LogSink`].

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routine::{Segment, SegmentKind};
use crate::timer::display::{format_hms, format_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLabel {
    StudyComplete,
    BreakComplete,
    Paused,
    RoutineSummary,
    Session,
}

impl LogLabel {
    pub fn for_segment(kind: SegmentKind) -> Self {
        match kind {
            SegmentKind::Study => LogLabel::StudyComplete,
            SegmentKind::Break => LogLabel::BreakComplete,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            LogLabel::StudyComplete => "공부 구간 완료",
            LogLabel::BreakComplete => "휴식 구간 완료",
            LogLabel::Paused => "일시정지",
            LogLabel::RoutineSummary => "루틴 전체 기록",
            LogLabel::Session => "학습 세션",
        }
    }
}

impl fmt::Display for LogLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// An immutable record handed to the log collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub label: LogLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub duration_secs: u64,
    pub at: DateTime<Local>,
}

impl LogEntry {
    fn new(label: LogLabel, tag: Option<String>, duration_secs: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            label,
            tag,
            duration_secs,
            at: Local::now(),
        }
    }

    /// Entry for a segment that ran to completion. Duration is the
    /// segment's full length regardless of pauses along the way.
    pub fn segment_completed(segment: &Segment) -> Self {
        Self::new(
            LogLabel::for_segment(segment.kind()),
            Some(segment.tag()),
            segment.duration_secs(),
        )
    }

    /// Entry for a confirmed pause category. Carries the running total of
    /// elapsed seconds, not the time since the previous pause.
    pub fn paused(category: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::new(LogLabel::Paused, Some(category.into()), elapsed_secs)
    }

    /// Manual summary of the current run.
    pub fn summary(routine_configured: bool, elapsed_secs: u64) -> Self {
        let label = if routine_configured {
            LogLabel::RoutineSummary
        } else {
            LogLabel::Session
        };
        Self::new(label, None, elapsed_secs)
    }

    pub fn formatted_duration(&self) -> String {
        format_hms(self.duration_secs)
    }

    pub fn formatted_timestamp(&self) -> String {
        format_timestamp(&self.at)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        if let Some(tag) = &self.tag {
            write!(f, " [{tag}]")?;
        }
        write!(
            f,
            " {} ({})",
            self.formatted_duration(),
            self.formatted_timestamp()
        )
    }
}

/// Receives log entries as they are produced.
pub trait LogSink {
    fn record(&mut self, entry: LogEntry);
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    fn record(&mut self, entry: LogEntry) {
        (**self).record(entry);
    }
}

/// In-memory log, newest entry first.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    entries: Vec<LogEntry>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove the entry with `id`. Returns `false` if no such entry exists.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn total_secs(&self) -> u64 {
        self.entries.iter().map(|e| e.duration_secs).sum()
    }
}

impl LogSink for MemoryLog {
    fn record(&mut self, entry: LogEntry) {
        self.entries.insert(0, entry);
    }
}
