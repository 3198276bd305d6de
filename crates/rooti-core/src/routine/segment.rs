use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Study,
    Break,
}

impl SegmentKind {
    /// Short display word used in status lines and list badges.
    pub fn label(self) -> &'static str {
        match self {
            SegmentKind::Study => "공부",
            SegmentKind::Break => "휴식",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SegmentKind::Study => "study",
            SegmentKind::Break => "break",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SegmentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "study" | "s" | "공부" => Ok(SegmentKind::Study),
            "break" | "b" | "휴식" => Ok(SegmentKind::Break),
            other => Err(ValidationError::UnknownSegmentKind(other.to_string())),
        }
    }
}

/// One timed unit of a routine.
///
/// Immutable once created: the only way to get one is through
/// [`Segment::new`] or [`Segment::parse`], both of which reject
/// non-positive durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSegment", into = "RawSegment")]
pub struct Segment {
    kind: SegmentKind,
    minutes: u32,
}

impl Segment {
    pub fn new(kind: SegmentKind, minutes: i64) -> Result<Self, ValidationError> {
        if minutes <= 0 {
            return Err(ValidationError::NonPositiveMinutes(minutes));
        }
        let minutes =
            u32::try_from(minutes).map_err(|_| ValidationError::MinutesTooLarge(minutes))?;
        Ok(Self { kind, minutes })
    }

    /// Build a segment from raw user input such as a form field.
    pub fn parse(kind: SegmentKind, raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let minutes = trimmed
            .parse::<i64>()
            .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;
        Self::new(kind, minutes)
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Get segment duration in seconds.
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.minutes).saturating_mul(60)
    }

    /// Tag attached to the completion log entry, e.g. `50분`.
    pub fn tag(&self) -> String {
        format!("{}분", self.minutes)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}분", self.kind.label(), self.minutes)
    }
}

/// Wire shape used by config presets; validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSegment {
    kind: SegmentKind,
    minutes: i64,
}

impl TryFrom<RawSegment> for Segment {
    type Error = ValidationError;

    fn try_from(raw: RawSegment) -> Result<Self, Self::Error> {
        Segment::new(raw.kind, raw.minutes)
    }
}

impl From<Segment> for RawSegment {
    fn from(segment: Segment) -> Self {
        Self {
            kind: segment.kind,
            minutes: i64::from(segment.minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_negative_minutes() {
        assert_eq!(
            Segment::new(SegmentKind::Study, 0),
            Err(ValidationError::NonPositiveMinutes(0))
        );
        assert_eq!(
            Segment::new(SegmentKind::Break, -5),
            Err(ValidationError::NonPositiveMinutes(-5))
        );
    }

    #[test]
    fn rejects_minutes_beyond_u32() {
        let too_big = i64::from(u32::MAX) + 1;
        assert_eq!(
            Segment::new(SegmentKind::Study, too_big),
            Err(ValidationError::MinutesTooLarge(too_big))
        );
    }

    #[test]
    fn parse_rejects_non_numeric_input() {
        assert_eq!(
            Segment::parse(SegmentKind::Study, "abc"),
            Err(ValidationError::NotANumber("abc".into()))
        );
        assert!(Segment::parse(SegmentKind::Study, "").is_err());
        assert_eq!(
            Segment::parse(SegmentKind::Study, " 25 ").unwrap().minutes(),
            25
        );
    }

    #[test]
    fn duration_and_tag() {
        let seg = Segment::new(SegmentKind::Break, 10).unwrap();
        assert_eq!(seg.duration_secs(), 600);
        assert_eq!(seg.tag(), "10분");
    }

    #[test]
    fn kind_from_str_accepts_aliases() {
        assert_eq!("Study".parse::<SegmentKind>(), Ok(SegmentKind::Study));
        assert_eq!("b".parse::<SegmentKind>(), Ok(SegmentKind::Break));
        assert_eq!("휴식".parse::<SegmentKind>(), Ok(SegmentKind::Break));
        assert!("nap".parse::<SegmentKind>().is_err());
    }

    #[test]
    fn deserialize_validates_minutes() {
        let ok: Segment = serde_json::from_str(r#"{"kind":"study","minutes":30}"#).unwrap();
        assert_eq!(ok.minutes(), 30);
        let bad = serde_json::from_str::<Segment>(r#"{"kind":"break","minutes":0}"#);
        assert!(bad.is_err());
    }
}
