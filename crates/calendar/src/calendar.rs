//! Configuration calendars: a default value overridden per time window.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockplan_core::{CalendarName, Entity, Span, StoreError};

/// Override of a calendar's default for `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarBucket {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// A bucket may exist without a value; the calendar default then applies.
    pub value: Option<Decimal>,
    /// Lower wins when buckets overlap.
    #[serde(default)]
    pub priority: i32,
}

impl CalendarBucket {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, value: Option<Decimal>) -> Self {
        Self {
            start,
            end,
            value,
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        Span {
            start: self.start,
            end: self.end,
        }
        .contains(instant)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub name: CalendarName,
    pub default_value: Option<Decimal>,
    #[serde(default)]
    pub buckets: Vec<CalendarBucket>,
}

impl Calendar {
    pub fn new(name: impl Into<CalendarName>, default_value: Option<Decimal>) -> Self {
        Self {
            name: name.into(),
            default_value,
            buckets: Vec::new(),
        }
    }

    pub fn with_bucket(mut self, bucket: CalendarBucket) -> Self {
        self.buckets.push(bucket);
        self
    }

    /// Bucket in force at `instant`: lowest priority, then latest start.
    pub fn active_bucket(&self, instant: DateTime<Utc>) -> Option<&CalendarBucket> {
        self.buckets
            .iter()
            .filter(|b| b.is_active_at(instant))
            .min_by_key(|b| (b.priority, Reverse(b.start)))
    }

    /// Active bucket value, else the default.
    pub fn value_at(&self, instant: DateTime<Utc>) -> Option<Decimal> {
        self.active_bucket(instant)
            .and_then(|b| b.value)
            .or(self.default_value)
    }
}

impl Entity for Calendar {
    type Id = CalendarName;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}

/// Configuration store collaborator.
pub trait CalendarStore: Send + Sync {
    fn calendar(&self, name: &CalendarName) -> Result<Option<Calendar>, StoreError>;

    /// Bucket of `name` in force at `instant`, if the calendar exists and has one.
    fn resolve_calendar_bucket(
        &self,
        name: &CalendarName,
        instant: DateTime<Utc>,
    ) -> Result<Option<CalendarBucket>, StoreError> {
        Ok(self
            .calendar(name)?
            .and_then(|c| c.active_bucket(instant).cloned()))
    }

    /// Default of `name`; `None` when the calendar is absent or has no default.
    fn calendar_default(&self, name: &CalendarName) -> Result<Option<Decimal>, StoreError> {
        Ok(self.calendar(name)?.and_then(|c| c.default_value))
    }

    /// Value of `name` in force at `instant`: active bucket value, else default.
    ///
    /// One store read per call.
    fn calendar_value(
        &self,
        name: &CalendarName,
        instant: DateTime<Utc>,
    ) -> Result<Option<Decimal>, StoreError> {
        Ok(self.calendar(name)?.and_then(|c| c.value_at(instant)))
    }

    fn contains(&self, name: &CalendarName) -> Result<bool, StoreError> {
        Ok(self.calendar(name)?.is_some())
    }
}

impl<K> CalendarStore for Arc<K>
where
    K: CalendarStore + ?Sized,
{
    fn calendar(&self, name: &CalendarName) -> Result<Option<Calendar>, StoreError> {
        (**self).calendar(name)
    }

    fn calendar_value(
        &self,
        name: &CalendarName,
        instant: DateTime<Utc>,
    ) -> Result<Option<Decimal>, StoreError> {
        (**self).calendar_value(name, instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jan(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn default_applies_outside_buckets() {
        let cal = Calendar::new("ss", Some(Decimal::from(5)))
            .with_bucket(CalendarBucket::new(jan(10), jan(20), Some(Decimal::from(50))));
        assert_eq!(cal.value_at(jan(1)), Some(Decimal::from(5)));
        assert_eq!(cal.value_at(jan(10)), Some(Decimal::from(50)));
        assert_eq!(cal.value_at(jan(20)), Some(Decimal::from(5)));
    }

    #[test]
    fn null_bucket_value_falls_back_to_default() {
        let cal = Calendar::new("ss", Some(Decimal::from(5)))
            .with_bucket(CalendarBucket::new(jan(1), jan(31), None));
        assert_eq!(cal.value_at(jan(15)), Some(Decimal::from(5)));

        let no_default = Calendar::new("ss", None).with_bucket(CalendarBucket::new(jan(1), jan(31), None));
        assert_eq!(no_default.value_at(jan(15)), None);
    }

    #[test]
    fn lowest_priority_wins_among_overlapping_buckets() {
        let cal = Calendar::new("ss", None)
            .with_bucket(CalendarBucket::new(jan(1), jan(31), Some(Decimal::from(1))).with_priority(2))
            .with_bucket(CalendarBucket::new(jan(5), jan(25), Some(Decimal::from(2))).with_priority(1))
            .with_bucket(CalendarBucket::new(jan(10), jan(20), Some(Decimal::from(3))).with_priority(1));
        assert_eq!(cal.value_at(jan(3)), Some(Decimal::from(1)));
        assert_eq!(cal.value_at(jan(7)), Some(Decimal::from(2)));
        // Same priority: the later-starting bucket is the more specific one.
        assert_eq!(cal.value_at(jan(12)), Some(Decimal::from(3)));
    }
}
