use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use stockplan_core::{BufferKey, DocumentRef, Span, StoreError};
use stockplan_ledger::balance::restate_running_balances;
use stockplan_ledger::{
    BalanceMode, Document, FlowEvent, FlowEventId, LedgerReader, LedgerSource, NewFlow,
};

#[derive(Debug, Clone, Default)]
struct LedgerState {
    /// Per buffer, in ledger order `(flow_date, id)`.
    flows: HashMap<BufferKey, Vec<FlowEvent>>,
    documents: HashMap<DocumentRef, Document>,
    last_id: u64,
}

/// In-memory append-only ledger.
///
/// Writers copy the state on write, so a view handed out by `begin_read` keeps
/// observing the ledger exactly as it was when opened. Intended for tests/dev.
#[derive(Debug)]
pub struct InMemoryLedger {
    state: RwLock<Arc<LedgerState>>,
    mode: BalanceMode,
}

impl InMemoryLedger {
    /// Ledger maintaining a running balance on every entry.
    pub fn new() -> Self {
        Self::with_mode(BalanceMode::Maintained)
    }

    /// In `Recompute` mode entries carry no running balance.
    pub fn with_mode(mode: BalanceMode) -> Self {
        Self {
            state: RwLock::new(Arc::new(LedgerState::default())),
            mode,
        }
    }

    fn write<T>(&self, f: impl FnOnce(&mut LedgerState) -> T) -> Result<T, StoreError> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| StoreError::poisoned("ledger"))?;
        Ok(f(Arc::make_mut(&mut guard)))
    }

    pub fn register_document(&self, document: Document) -> Result<(), StoreError> {
        self.write(|state| {
            state.documents.insert(document.reference.clone(), document);
        })
    }

    /// Post a flow, assigning the next insertion id.
    ///
    /// Back-dated postings are allowed; running balances of the buffer are restated.
    pub fn post(&self, flow: NewFlow) -> Result<FlowEventId, StoreError> {
        let maintained = self.mode == BalanceMode::Maintained;
        self.write(|state| {
            state.last_id += 1;
            let id = FlowEventId(state.last_id);
            tracing::debug!(buffer = %flow.buffer, %id, quantity = %flow.quantity, "flow posted");
            let flows = state.flows.entry(flow.buffer.clone()).or_default();
            flows.push(flow.into_event(id));
            if maintained {
                restate_running_balances(flows);
            } else {
                flows.sort_by_key(FlowEvent::position);
            }
            id
        })
    }

    /// Store an entry exactly as given, balance included.
    ///
    /// Used to import ledgers kept elsewhere, including inconsistent ones.
    pub fn insert_raw(&self, event: FlowEvent) -> Result<(), StoreError> {
        self.write(|state| {
            state.last_id = state.last_id.max(event.id.0);
            let flows = state.flows.entry(event.buffer.clone()).or_default();
            flows.push(event);
            flows.sort_by_key(FlowEvent::position);
        })
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerSource for InMemoryLedger {
    type View = LedgerView;

    fn begin_read(&self) -> Result<Self::View, StoreError> {
        let guard = self
            .state
            .read()
            .map_err(|_| StoreError::poisoned("ledger"))?;
        Ok(LedgerView {
            state: Arc::clone(&guard),
            mode: self.mode,
        })
    }
}

/// Point-in-time view of an `InMemoryLedger`.
#[derive(Debug, Clone)]
pub struct LedgerView {
    state: Arc<LedgerState>,
    mode: BalanceMode,
}

impl LedgerView {
    fn flows(&self, buffer: &BufferKey) -> &[FlowEvent] {
        self.state
            .flows
            .get(buffer)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl LedgerReader for LedgerView {
    fn balance_mode(&self) -> BalanceMode {
        self.mode
    }

    fn flow_events(&self, buffer: &BufferKey, range: &Span) -> Result<Vec<FlowEvent>, StoreError> {
        let flows = self.flows(buffer);
        let from = flows.partition_point(|e| e.flow_date < range.start);
        let to = flows.partition_point(|e| e.flow_date < range.end);
        Ok(flows[from..to.max(from)].to_vec())
    }

    fn last_flow_before(
        &self,
        buffer: &BufferKey,
        instant: DateTime<Utc>,
    ) -> Result<Option<FlowEvent>, StoreError> {
        let flows = self.flows(buffer);
        let idx = flows.partition_point(|e| e.flow_date < instant);
        Ok(flows[..idx].last().cloned())
    }

    fn document(&self, reference: &DocumentRef) -> Result<Option<Document>, StoreError> {
        Ok(self.state.documents.get(reference).cloned())
    }

    fn active_buffers(&self) -> Result<Vec<BufferKey>, StoreError> {
        let mut keys: Vec<BufferKey> = self
            .state
            .flows
            .iter()
            .filter(|(_, flows)| !flows.is_empty())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;
    use stockplan_ledger::{snapshot_before, DocumentType};

    fn key() -> BufferKey {
        BufferKey::new("bolt", "plant")
    }

    fn t(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    fn post(ledger: &InMemoryLedger, day: i64, qty: i64) -> FlowEventId {
        ledger
            .post(NewFlow::new(key(), "PO1", t(day), Decimal::from(qty)))
            .unwrap()
    }

    #[test]
    fn back_dated_posting_restates_balances() {
        let ledger = InMemoryLedger::new();
        post(&ledger, 5, 10);
        post(&ledger, 1, 100);

        let view = ledger.begin_read().unwrap();
        let flows = view.flow_events(&key(), &Span::all()).unwrap();
        let balances: Vec<Option<Decimal>> = flows.iter().map(|e| e.on_hand).collect();
        assert_eq!(balances, vec![Some(Decimal::from(100)), Some(Decimal::from(110))]);
    }

    #[test]
    fn views_are_point_in_time() {
        let ledger = InMemoryLedger::new();
        post(&ledger, 1, 100);
        let before = ledger.begin_read().unwrap();
        post(&ledger, 2, -40);
        let after = ledger.begin_read().unwrap();

        assert_eq!(snapshot_before(&before, &key(), t(3)).unwrap().on_hand, Decimal::from(100));
        assert_eq!(snapshot_before(&after, &key(), t(3)).unwrap().on_hand, Decimal::from(60));
    }

    #[test]
    fn flow_events_respect_half_open_range() {
        let ledger = InMemoryLedger::new();
        post(&ledger, 1, 1);
        post(&ledger, 2, 2);
        post(&ledger, 3, 3);
        let view = ledger.begin_read().unwrap();

        let range = Span::new(t(2), t(3)).unwrap();
        let flows = view.flow_events(&key(), &range).unwrap();
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].quantity, Decimal::from(2));
    }

    #[test]
    fn last_flow_before_prefers_latest_insertion_on_ties() {
        let ledger = InMemoryLedger::new();
        post(&ledger, 1, 5);
        let second = post(&ledger, 1, 7);
        let view = ledger.begin_read().unwrap();

        let latest = view.last_flow_before(&key(), t(2)).unwrap().unwrap();
        assert_eq!(latest.id, second);
        assert_eq!(latest.on_hand, Some(Decimal::from(12)));
        assert!(view.last_flow_before(&key(), t(1)).unwrap().is_none());
    }

    #[test]
    fn recompute_mode_stores_no_balances() {
        let ledger = InMemoryLedger::with_mode(BalanceMode::Recompute);
        post(&ledger, 1, 5);
        let view = ledger.begin_read().unwrap();
        assert_eq!(view.balance_mode(), BalanceMode::Recompute);
        assert_eq!(view.flow_events(&key(), &Span::all()).unwrap()[0].on_hand, None);
        assert_eq!(snapshot_before(&view, &key(), t(2)).unwrap().on_hand, Decimal::from(5));
    }

    #[test]
    fn documents_and_active_buffers_are_visible() {
        let ledger = InMemoryLedger::new();
        ledger
            .register_document(Document::new("PO1", DocumentType::PurchaseOrder, t(0), t(5), Decimal::from(5)))
            .unwrap();
        post(&ledger, 1, 5);
        let view = ledger.begin_read().unwrap();
        assert_eq!(view.active_buffers().unwrap(), vec![key()]);
        assert_eq!(
            view.document(&DocumentRef::new("PO1")).unwrap().map(|d| d.kind),
            Some(DocumentType::PurchaseOrder)
        );
    }
}
