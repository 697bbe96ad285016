use std::collections::HashMap;

use stockplan_calendar::{BucketCalendar, Granularity, TimeBucket};
use stockplan_core::{Span, StoreError};

/// In-memory bucket calendar for tests/dev.
///
/// Buckets are stored per granularity name and answered verbatim, so a
/// deliberately gappy calendar is surfaced to the caller as-is.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBucketCalendar {
    buckets: HashMap<String, Vec<TimeBucket>>,
}

impl InMemoryBucketCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Day, week and month buckets tiling `horizon`.
    pub fn standard(horizon: &Span) -> Self {
        [Granularity::Day, Granularity::Week, Granularity::Month]
            .into_iter()
            .fold(Self::new(), |calendar, g| {
                calendar.with_buckets(g.as_str(), g.generate(horizon))
            })
    }

    pub fn with_buckets(mut self, granularity: impl Into<String>, mut buckets: Vec<TimeBucket>) -> Self {
        buckets.sort_by_key(|b| b.start);
        self.buckets.insert(granularity.into(), buckets);
        self
    }
}

impl BucketCalendar for InMemoryBucketCalendar {
    fn list_buckets(&self, granularity: &str, range: &Span) -> Result<Vec<TimeBucket>, StoreError> {
        Ok(self
            .buckets
            .get(granularity)
            .map(|all| {
                all.iter()
                    .filter(|b| b.span().intersects(range))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
