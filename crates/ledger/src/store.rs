//! Ledger store boundary.
//!
//! The engine reads the ledger through a point-in-time view so that every
//! snapshot, aggregate and document lookup of one rollup observes the same
//! ledger state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockplan_core::{BufferKey, DocumentRef, Span, StoreError};

use crate::document::Document;
use crate::flow::FlowEvent;
use crate::snapshot::latest_before;

/// How the store accounts for on-hand.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceMode {
    /// Each entry carries an authoritative running on-hand.
    Maintained,
    /// No running balance; on-hand must be summed from genesis.
    Recompute,
}

/// Read access to one consistent ledger state.
pub trait LedgerReader: Send + Sync {
    fn balance_mode(&self) -> BalanceMode;

    /// Flows of `buffer` with flow instant in `range`, in ledger order.
    fn flow_events(&self, buffer: &BufferKey, range: &Span) -> Result<Vec<FlowEvent>, StoreError>;

    /// Latest flow of `buffer` strictly before `instant` (ties: last inserted).
    fn last_flow_before(
        &self,
        buffer: &BufferKey,
        instant: DateTime<Utc>,
    ) -> Result<Option<FlowEvent>, StoreError> {
        let events = self.flow_events(buffer, &Span::before(instant))?;
        Ok(latest_before(&events, instant).cloned())
    }

    fn document(&self, reference: &DocumentRef) -> Result<Option<Document>, StoreError>;

    /// Distinct buffers with at least one posted flow.
    fn active_buffers(&self) -> Result<Vec<BufferKey>, StoreError>;
}

/// Ledger collaborator handing out point-in-time views.
pub trait LedgerSource: Send + Sync {
    type View: LedgerReader;

    /// Open a read view; later postings are invisible to it.
    fn begin_read(&self) -> Result<Self::View, StoreError>;
}

impl<S> LedgerSource for Arc<S>
where
    S: LedgerSource + ?Sized,
{
    type View = S::View;

    fn begin_read(&self) -> Result<Self::View, StoreError> {
        (**self).begin_read()
    }
}
