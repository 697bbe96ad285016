//! In-memory collaborators for the rollup engine: catalog, ledger, bucket
//! calendar and configuration calendars.

pub mod buckets;
pub mod calendars;
pub mod catalog;
pub mod keyed_store;
pub mod ledger;

pub use buckets::InMemoryBucketCalendar;
pub use calendars::InMemoryCalendarStore;
pub use catalog::InMemoryCatalog;
pub use keyed_store::{InMemoryKeyedStore, KeyedStore};
pub use ledger::{InMemoryLedger, LedgerView};
