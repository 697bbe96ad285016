//! Inventory rollup: one row per buffer and time bucket with opening on-hand,
//! days of cover, safety stock, consumed/produced/in-progress quantities and
//! closing on-hand.
//!
//! The engine reads through four collaborators (catalog, bucket calendar,
//! ledger, configuration calendars) and never writes to any of them.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod parallel;
pub mod plan;
pub mod request;
pub mod row;

pub use aggregate::{aggregate, BucketAggregate, DocumentIndex, Tally};
pub use config::{FailurePolicy, RollupConfig};
pub use engine::{ReportRows, RollupEngine};
pub use parallel::CancellationFlag;
pub use request::{default_sort, BufferSelector, Direction, ReportRequest, SortField, SortKey};
pub use row::{Diagnostic, InventoryReport, InventoryRow, ItemDetails, LocationDetails, RowFlag};
