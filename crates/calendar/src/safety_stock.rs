//! Safety-stock resolution.
//!
//! A buffer's safety stock can be configured at three levels. Each level is a
//! `SafetyStockSource`; the resolver asks them in order and the first one that
//! yields a value wins. No value anywhere means zero.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use stockplan_catalog::Buffer;
use stockplan_core::{BufferKey, StoreError};

use crate::calendar::CalendarStore;

/// What is being resolved: a buffer at an instant.
#[derive(Debug, Clone, Copy)]
pub struct SafetyStockQuery<'a> {
    pub key: &'a BufferKey,
    /// Catalog record; absent for buffers known only from the ledger.
    pub buffer: Option<&'a Buffer>,
    pub instant: DateTime<Utc>,
}

/// One tier of the safety-stock configuration.
pub trait SafetyStockSource: Send + Sync + core::fmt::Debug {
    fn name(&self) -> &'static str;

    fn lookup(
        &self,
        query: &SafetyStockQuery<'_>,
        calendars: &dyn CalendarStore,
    ) -> Result<Option<Decimal>, StoreError>;
}

/// Calendar named `SS for <buffer>`, dedicated to one buffer.
#[derive(Debug, Default, Clone, Copy)]
pub struct BufferCalendar;

impl SafetyStockSource for BufferCalendar {
    fn name(&self) -> &'static str {
        "buffer_calendar"
    }

    fn lookup(
        &self,
        query: &SafetyStockQuery<'_>,
        calendars: &dyn CalendarStore,
    ) -> Result<Option<Decimal>, StoreError> {
        calendars.calendar_value(&query.key.safety_stock_calendar(), query.instant)
    }
}

/// Calendar referenced by the buffer's `minimum_calendar`, possibly shared.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimumCalendar;

impl SafetyStockSource for MinimumCalendar {
    fn name(&self) -> &'static str {
        "minimum_calendar"
    }

    fn lookup(
        &self,
        query: &SafetyStockQuery<'_>,
        calendars: &dyn CalendarStore,
    ) -> Result<Option<Decimal>, StoreError> {
        match query.buffer.and_then(|b| b.minimum_calendar.as_ref()) {
            Some(calendar) => calendars.calendar_value(calendar, query.instant),
            None => Ok(None),
        }
    }
}

/// The buffer's static `minimum`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticMinimum;

impl SafetyStockSource for StaticMinimum {
    fn name(&self) -> &'static str {
        "buffer_minimum"
    }

    fn lookup(
        &self,
        query: &SafetyStockQuery<'_>,
        _calendars: &dyn CalendarStore,
    ) -> Result<Option<Decimal>, StoreError> {
        Ok(query.buffer.and_then(|b| b.minimum))
    }
}

/// Resolved safety stock and the tier it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub value: Decimal,
    /// `None` when no tier had a value.
    pub source: Option<&'static str>,
}

/// Ordered chain of safety-stock sources; first match wins.
#[derive(Debug)]
pub struct SafetyStockResolver {
    sources: Vec<Box<dyn SafetyStockSource>>,
}

impl SafetyStockResolver {
    pub fn new(sources: Vec<Box<dyn SafetyStockSource>>) -> Self {
        Self { sources }
    }

    /// Buffer calendar, then minimum calendar, then static minimum.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(BufferCalendar),
            Box::new(MinimumCalendar),
            Box::new(StaticMinimum),
        ])
    }

    pub fn sources(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sources.iter().map(|s| s.name())
    }

    pub fn resolve(
        &self,
        query: &SafetyStockQuery<'_>,
        calendars: &dyn CalendarStore,
    ) -> Result<Resolution, StoreError> {
        for source in &self.sources {
            if let Some(value) = source.lookup(query, calendars)? {
                tracing::trace!(buffer = %query.key, source = source.name(), %value, "safety stock resolved");
                return Ok(Resolution {
                    value,
                    source: Some(source.name()),
                });
            }
        }
        Ok(Resolution {
            value: Decimal::ZERO,
            source: None,
        })
    }
}

impl Default for SafetyStockResolver {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Calendar, CalendarBucket};
    use chrono::TimeZone;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stockplan_core::CalendarName;

    #[derive(Default)]
    struct MapCalendars {
        calendars: HashMap<CalendarName, Calendar>,
        reads: AtomicUsize,
    }

    impl MapCalendars {
        fn with(mut self, calendar: Calendar) -> Self {
            self.calendars.insert(calendar.name.clone(), calendar);
            self
        }
    }

    impl CalendarStore for MapCalendars {
        fn calendar(&self, name: &CalendarName) -> Result<Option<Calendar>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.calendars.get(name).cloned())
        }
    }

    fn jan(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn resolve(buffer: &Buffer, calendars: &MapCalendars, instant: DateTime<Utc>) -> Resolution {
        let query = SafetyStockQuery {
            key: &buffer.key,
            buffer: Some(buffer),
            instant,
        };
        SafetyStockResolver::standard().resolve(&query, calendars).unwrap()
    }

    #[test]
    fn buffer_calendar_beats_minimum_calendar() {
        let buffer = Buffer::new("bolt", "plant")
            .with_minimum(dec(1))
            .with_minimum_calendar("shared");
        let calendars = MapCalendars::default()
            .with(Calendar::new("SS for bolt @ plant", None).with_bucket(CalendarBucket::new(
                jan(1),
                jan(31),
                Some(dec(30)),
            )))
            .with(Calendar::new("shared", None).with_bucket(CalendarBucket::new(
                jan(1),
                jan(31),
                Some(dec(20)),
            )));

        let r = resolve(&buffer, &calendars, jan(15));
        assert_eq!(r.value, dec(30));
        assert_eq!(r.source, Some("buffer_calendar"));
    }

    #[test]
    fn buffer_calendar_default_still_beats_lower_tiers() {
        let buffer = Buffer::new("bolt", "plant").with_minimum_calendar("shared");
        let calendars = MapCalendars::default()
            .with(Calendar::new("SS for bolt @ plant", Some(dec(7))))
            .with(Calendar::new("shared", Some(dec(20))));

        assert_eq!(resolve(&buffer, &calendars, jan(15)).value, dec(7));
    }

    #[test]
    fn empty_calendar_falls_through_to_next_tier() {
        let buffer = Buffer::new("bolt", "plant")
            .with_minimum(dec(4))
            .with_minimum_calendar("shared");
        let calendars = MapCalendars::default()
            .with(Calendar::new("SS for bolt @ plant", None).with_bucket(CalendarBucket::new(jan(1), jan(31), None)))
            .with(Calendar::new("shared", None).with_bucket(CalendarBucket::new(
                jan(20),
                jan(31),
                Some(dec(20)),
            )));

        let before = resolve(&buffer, &calendars, jan(15));
        assert_eq!(before.value, dec(4));
        assert_eq!(before.source, Some("buffer_minimum"));

        assert_eq!(resolve(&buffer, &calendars, jan(25)).value, dec(20));
    }

    #[test]
    fn nothing_configured_resolves_to_zero() {
        let buffer = Buffer::new("bolt", "plant");
        let r = resolve(&buffer, &MapCalendars::default(), jan(1));
        assert_eq!(r, Resolution { value: Decimal::ZERO, source: None });
    }

    #[test]
    fn ledger_only_buffer_still_consults_its_calendar() {
        let key = BufferKey::new("bolt", "plant");
        let calendars = MapCalendars::default().with(Calendar::new("SS for bolt @ plant", Some(dec(9))));
        let query = SafetyStockQuery {
            key: &key,
            buffer: None,
            instant: jan(1),
        };
        let r = SafetyStockResolver::standard().resolve(&query, &calendars).unwrap();
        assert_eq!(r.value, dec(9));
    }

    #[test]
    fn standard_chain_order() {
        let names: Vec<&str> = SafetyStockResolver::standard().sources().collect();
        assert_eq!(names, vec!["buffer_calendar", "minimum_calendar", "buffer_minimum"]);
    }

    #[test]
    fn each_calendar_tier_reads_its_calendar_once() {
        let buffer = Buffer::new("bolt", "plant")
            .with_minimum(dec(4))
            .with_minimum_calendar("shared");
        let calendars = MapCalendars::default().with(Calendar::new("shared", None));

        assert_eq!(resolve(&buffer, &calendars, jan(15)).value, dec(4));
        assert_eq!(calendars.reads.load(Ordering::SeqCst), 2);
    }

    proptest! {
        /// Resolution always yields a value, and the same one twice.
        #[test]
        fn resolution_is_total_and_deterministic(
            minimum in prop::option::of(0i64..1000),
            direct_default in prop::option::of(0i64..1000),
            direct_bucket in prop::option::of(prop::option::of(0i64..1000)),
            shared_default in prop::option::of(0i64..1000),
            day in 1u32..29,
        ) {
            let mut buffer = Buffer::new("x", "y").with_minimum_calendar("shared");
            buffer.minimum = minimum.map(Decimal::from);

            let mut direct = Calendar::new("SS for x @ y", direct_default.map(Decimal::from));
            if let Some(value) = direct_bucket {
                direct = direct.with_bucket(CalendarBucket::new(jan(10), jan(20), value.map(Decimal::from)));
            }
            let calendars = MapCalendars::default()
                .with(direct)
                .with(Calendar::new("shared", shared_default.map(Decimal::from)));

            let first = resolve(&buffer, &calendars, jan(day));
            let second = resolve(&buffer, &calendars, jan(day));
            prop_assert_eq!(first, second);

            let in_bucket = (10..20).contains(&day);
            let expected = direct_bucket
                .flatten()
                .filter(|_| in_bucket)
                .or(direct_default)
                .or(shared_default)
                .or(minimum)
                .unwrap_or(0);
            prop_assert_eq!(first.value, Decimal::from(expected));
        }
    }
}
