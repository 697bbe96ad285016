//! Time-phased configuration: reporting buckets, configuration calendars and
//! safety-stock resolution on top of them.

pub mod bucket;
pub mod calendar;
pub mod safety_stock;

pub use bucket::{buckets_covering, BucketCalendar, Granularity, TimeBucket};
pub use calendar::{Calendar, CalendarBucket, CalendarStore};
pub use safety_stock::{
    BufferCalendar, MinimumCalendar, Resolution, SafetyStockQuery, SafetyStockResolver,
    SafetyStockSource, StaticMinimum,
};
