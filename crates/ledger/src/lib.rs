//! Inventory ledger: documents, signed flow events and snapshot lookups.
//!
//! Pure domain logic plus the read-only `LedgerSource` boundary; storage lives
//! behind it.

pub mod balance;
pub mod cover;
pub mod document;
pub mod flow;
pub mod snapshot;
pub mod store;

pub use cover::{days_of_cover, CoverHint, INFINITE_COVER_DAYS, INFINITE_COVER_SECONDS};
pub use document::{Document, DocumentType, TypedQuantities};
pub use flow::{FlowEvent, FlowEventId, NewFlow};
pub use snapshot::{latest_before, snapshot_before, LedgerSnapshot};
pub use store::{BalanceMode, LedgerReader, LedgerSource};
