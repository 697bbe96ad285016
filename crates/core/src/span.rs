//! Half-open time intervals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Half-open interval `[start, end)` of UTC instants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Span {
    /// Build a span, rejecting empty or inverted intervals.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, PlanError> {
        if start >= end {
            return Err(PlanError::range(format!("empty interval [{start}, {end})")));
        }
        Ok(Self { start, end })
    }

    /// The whole representable timeline.
    pub fn all() -> Self {
        Self {
            start: DateTime::<Utc>::MIN_UTC,
            end: DateTime::<Utc>::MAX_UTC,
        }
    }

    /// Everything strictly before `instant`.
    pub fn before(instant: DateTime<Utc>) -> Self {
        Self {
            start: DateTime::<Utc>::MIN_UTC,
            end: instant,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn intersects(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn contains_is_half_open() {
        let span = Span::new(at(1), at(10)).unwrap();
        assert!(span.contains(at(1)));
        assert!(span.contains(at(9)));
        assert!(!span.contains(at(10)));
    }

    #[test]
    fn adjacent_spans_do_not_intersect() {
        let a = Span::new(at(1), at(10)).unwrap();
        let b = Span::new(at(10), at(20)).unwrap();
        let c = Span::new(at(9), at(11)).unwrap();
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(b.intersects(&c));
    }

    #[test]
    fn empty_span_is_a_range_error() {
        assert!(matches!(Span::new(at(5), at(5)), Err(PlanError::Range(_))));
        assert!(Span::new(at(6), at(5)).is_err());
    }
}
