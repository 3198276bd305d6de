//! Display strings for the timer face and the routine status line.

use chrono::{DateTime, Datelike, Local, Timelike};

use super::engine::RoutineProgress;
use crate::routine::RoutineStore;

pub const NO_ROUTINE: &str = "루틴이 설정되어 있지 않습니다.";
pub const ROUTINE_DONE: &str = "루틴이 모두 완료되었습니다. 다시 시작하려면 시작 버튼을 눌러주세요.";

/// `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_hms(secs: u64) -> String {
    let hrs = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;
    format!("{hrs:02}:{mins:02}:{secs:02}")
}

/// `M/DD HH:MM`, the short form shown next to log entries.
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    format!(
        "{}/{:02} {:02}:{:02}",
        at.month(),
        at.day(),
        at.hour(),
        at.minute()
    )
}

/// Status line describing the routine: nothing configured, finished,
/// ready to start (the pending segment), or the active segment.
pub fn status_line(routine: &RoutineStore, progress: &RoutineProgress, running: bool) -> String {
    if routine.is_empty() {
        return NO_ROUTINE.to_string();
    }
    if progress.completed {
        return ROUTINE_DONE.to_string();
    }

    let active = progress
        .active_index
        .filter(|_| progress.active)
        .and_then(|i| routine.get(i));

    match active {
        Some(segment) => {
            let remaining_min = progress.remaining_secs.div_ceil(60);
            let status = if running { "진행 중" } else { "일시정지됨" };
            format!(
                "{} {} · 남은 {}분",
                segment.kind().label(),
                status,
                remaining_min
            )
        }
        None => pending_line(routine),
    }
}

/// What the next start will run.
pub fn pending_line(routine: &RoutineStore) -> String {
    match routine.first() {
        Some(first) => format!("{} 준비 완료", first.kind().label()),
        None => NO_ROUTINE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routine::{Segment, SegmentKind};
    use chrono::TimeZone;

    fn routine() -> RoutineStore {
        RoutineStore::from_segments(vec![
            Segment::new(SegmentKind::Study, 50).unwrap(),
            Segment::new(SegmentKind::Break, 10).unwrap(),
        ])
    }

    #[test]
    fn hms_formatting() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3600 * 25 + 5), "25:00:05");
    }

    #[test]
    fn timestamp_formatting() {
        let at = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_timestamp(&at), "3/07 09:05");
    }

    #[test]
    fn empty_routine_status() {
        let progress = RoutineProgress::default();
        assert_eq!(
            status_line(&RoutineStore::new(), &progress, false),
            NO_ROUTINE
        );
    }

    #[test]
    fn pending_status_names_first_segment() {
        let progress = RoutineProgress::default();
        assert_eq!(status_line(&routine(), &progress, false), "공부 준비 완료");
    }

    #[test]
    fn active_status_rounds_remaining_minutes_up() {
        let progress = RoutineProgress {
            active_index: Some(1),
            remaining_secs: 61,
            active: true,
            completed: false,
        };
        assert_eq!(
            status_line(&routine(), &progress, true),
            "휴식 진행 중 · 남은 2분"
        );
        assert_eq!(
            status_line(&routine(), &progress, false),
            "휴식 일시정지됨 · 남은 2분"
        );
    }

    #[test]
    fn completed_status() {
        let progress = RoutineProgress {
            completed: true,
            ..RoutineProgress::default()
        };
        assert_eq!(status_line(&routine(), &progress, false), ROUTINE_DONE);
    }
}
