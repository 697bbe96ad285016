//! Reporting time buckets.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Months, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use stockplan_core::{PlanError, Span, StoreError};

/// Named reporting period `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeBucket {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeBucket {
    pub fn new(name: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, PlanError> {
        let span = Span::new(start, end)?;
        Ok(Self {
            name: name.into(),
            start: span.start,
            end: span.end,
        })
    }

    pub fn span(&self) -> Span {
        Span {
            start: self.start,
            end: self.end,
        }
    }
}

/// Bucket calendar collaborator.
pub trait BucketCalendar: Send + Sync {
    /// Buckets of `granularity` intersecting `range`, ascending.
    ///
    /// An unknown granularity yields no buckets.
    fn list_buckets(&self, granularity: &str, range: &Span) -> Result<Vec<TimeBucket>, StoreError>;
}

impl<B> BucketCalendar for Arc<B>
where
    B: BucketCalendar + ?Sized,
{
    fn list_buckets(&self, granularity: &str, range: &Span) -> Result<Vec<TimeBucket>, StoreError> {
        (**self).list_buckets(granularity, range)
    }
}

/// Keep the buckets intersecting `range` after checking they tile it.
///
/// Buckets must be ascending, gap-free and non-overlapping, and together cover
/// `[range.start, range.end)`.
pub fn buckets_covering(buckets: Vec<TimeBucket>, range: &Span) -> Result<Vec<TimeBucket>, PlanError> {
    if range.is_empty() {
        return Err(PlanError::range("requested date range is empty"));
    }

    let selected: Vec<TimeBucket> = buckets
        .into_iter()
        .filter(|b| b.span().intersects(range))
        .collect();

    let (Some(first), Some(last)) = (selected.first(), selected.last()) else {
        return Err(PlanError::range(format!(
            "no buckets cover [{}, {})",
            range.start, range.end
        )));
    };
    if first.start > range.start {
        return Err(PlanError::range(format!(
            "buckets start at {} after the requested start {}",
            first.start, range.start
        )));
    }
    if last.end < range.end {
        return Err(PlanError::range(format!(
            "buckets end at {} before the requested end {}",
            last.end, range.end
        )));
    }
    for pair in selected.windows(2) {
        if pair[0].end != pair[1].start {
            return Err(PlanError::range(format!(
                "buckets '{}' and '{}' are not contiguous",
                pair[0].name, pair[1].name
            )));
        }
    }

    Ok(selected)
}

/// Standard bucket sizes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    /// Start of the bucket containing `instant`; weeks start on Monday.
    pub fn floor(self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let date = instant.date_naive();
        let date = match self {
            Granularity::Day => date,
            Granularity::Week => date - Duration::days(i64::from(date.weekday().num_days_from_monday())),
            Granularity::Month => date.with_day(1).unwrap_or(date),
        };
        date.and_time(NaiveTime::MIN).and_utc()
    }

    fn next(self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Granularity::Day => start.checked_add_signed(Duration::days(1)),
            Granularity::Week => start.checked_add_signed(Duration::days(7)),
            Granularity::Month => start.checked_add_months(Months::new(1)),
        }
    }

    fn label(self, start: DateTime<Utc>) -> String {
        match self {
            Granularity::Day => start.format("%Y-%m-%d").to_string(),
            Granularity::Week => {
                let week = start.iso_week();
                format!("{} W{:02}", week.year(), week.week())
            }
            Granularity::Month => start.format("%b %Y").to_string(),
        }
    }

    /// Contiguous buckets tiling `range`, the first starting at `floor(range.start)`.
    pub fn generate(self, range: &Span) -> Vec<TimeBucket> {
        let mut buckets = Vec::new();
        let mut start = self.floor(range.start);
        while start < range.end {
            let Some(end) = self.next(start) else { break };
            buckets.push(TimeBucket {
                name: self.label(start),
                start,
                end,
            });
            start = end;
        }
        buckets
    }
}

impl core::str::FromStr for Granularity {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            other => Err(PlanError::range(format!("unknown bucket granularity '{other}'"))),
        }
    }
}
