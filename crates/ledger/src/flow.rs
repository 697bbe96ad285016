use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockplan_core::{BufferKey, DocumentRef};

use crate::cover::CoverHint;

/// Insertion sequence assigned by the ledger store; later postings get larger ids.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowEventId(pub u64);

impl core::fmt::Display for FlowEventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "flow#{}", self.0)
    }
}

/// One posted ledger entry.
///
/// Quantity sign decides the category: negative consumes, positive produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEvent {
    pub id: FlowEventId,
    pub buffer: BufferKey,
    pub quantity: Decimal,
    pub flow_date: DateTime<Utc>,
    /// Running on-hand after this entry, maintained by the store.
    pub on_hand: Option<Decimal>,
    /// Period of cover in seconds.
    pub period_of_cover: Option<i64>,
    pub document: DocumentRef,
}

impl FlowEvent {
    pub fn is_consumption(&self) -> bool {
        self.quantity < Decimal::ZERO
    }

    pub fn is_production(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    /// Position in the ledger: flow instant, then insertion order.
    pub fn position(&self) -> (DateTime<Utc>, FlowEventId) {
        (self.flow_date, self.id)
    }

    pub fn cover_hint(&self) -> Option<CoverHint> {
        self.period_of_cover
            .map(|seconds| CoverHint::new(self.flow_date, seconds))
    }
}

/// A flow about to be posted (no id or balance yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFlow {
    pub buffer: BufferKey,
    pub quantity: Decimal,
    pub flow_date: DateTime<Utc>,
    pub period_of_cover: Option<i64>,
    pub document: DocumentRef,
}

impl NewFlow {
    pub fn new(
        buffer: BufferKey,
        document: impl Into<DocumentRef>,
        flow_date: DateTime<Utc>,
        quantity: Decimal,
    ) -> Self {
        Self {
            buffer,
            quantity,
            flow_date,
            period_of_cover: None,
            document: document.into(),
        }
    }

    pub fn with_period_of_cover(mut self, seconds: i64) -> Self {
        self.period_of_cover = Some(seconds);
        self
    }

    /// Attach store-assigned identity; the balance is filled in separately.
    pub fn into_event(self, id: FlowEventId) -> FlowEvent {
        FlowEvent {
            id,
            buffer: self.buffer,
            quantity: self.quantity,
            flow_date: self.flow_date,
            on_hand: None,
            period_of_cover: self.period_of_cover,
            document: self.document,
        }
    }
}
