//! Bucket aggregation: consumed, produced and in-progress quantities of one
//! buffer over one bucket.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;

use stockplan_core::{DocumentRef, Span, StoreError};
use stockplan_ledger::{Document, DocumentType, FlowEvent, LedgerReader, TypedQuantities};

/// Documents referenced by a buffer's flows, resolved once per buffer.
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    documents: HashMap<DocumentRef, Option<Document>>,
}

impl DocumentIndex {
    /// Look up every distinct document referenced by `flows`.
    pub fn load<R>(reader: &R, flows: &[FlowEvent]) -> Result<Self, StoreError>
    where
        R: LedgerReader + ?Sized,
    {
        let mut documents = HashMap::new();
        for flow in flows {
            if !documents.contains_key(&flow.document) {
                let document = reader.document(&flow.document)?;
                documents.insert(flow.document.clone(), document);
            }
        }
        Ok(Self { documents })
    }

    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        Self {
            documents: documents
                .into_iter()
                .map(|d| (d.reference.clone(), Some(d)))
                .collect(),
        }
    }

    pub fn resolve(&self, reference: &DocumentRef) -> Option<&Document> {
        self.documents.get(reference).and_then(Option::as_ref)
    }
}

/// A total plus its split by document type.
///
/// The total can exceed the sum of the split: flows whose document cannot be
/// resolved count toward the total only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub total: Decimal,
    pub by_type: TypedQuantities,
}

impl Tally {
    fn add(&mut self, kind: Option<DocumentType>, quantity: Decimal) {
        self.total += quantity;
        if let Some(kind) = kind {
            self.by_type.add(kind, quantity);
        }
    }

    pub fn get(&self, kind: DocumentType) -> Decimal {
        self.by_type.get(kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketAggregate {
    /// Negated consumption, never negative.
    pub consumed: Tally,
    pub produced: Tally,
    pub in_progress: Tally,
    /// Documents referenced by window flows that the ledger does not know.
    pub unresolved: BTreeSet<DocumentRef>,
}

/// Aggregate `history` (all flows of one buffer) over `window`.
///
/// Consumed and produced cover flows with instant in `window`. In-progress
/// counts every positive flow whose document is open across `window.end`,
/// wherever the flow itself falls, so a quantity may appear in both produced
/// and in-progress.
pub fn aggregate(history: &[FlowEvent], documents: &DocumentIndex, window: &Span) -> BucketAggregate {
    let mut out = BucketAggregate::default();

    for flow in history {
        let document = documents.resolve(&flow.document);
        let kind = document.map(|d| d.kind);

        if window.contains(flow.flow_date) {
            if document.is_none() {
                out.unresolved.insert(flow.document.clone());
            }
            if flow.is_consumption() {
                out.consumed.add(kind, -flow.quantity);
            } else if flow.is_production() {
                out.produced.add(kind, flow.quantity);
            }
        }

        if let Some(document) = document {
            if flow.is_production() && document.is_open_at(window.end) {
                out.in_progress.add(Some(document.kind), flow.quantity);
            }
        }
    }

    out
}
