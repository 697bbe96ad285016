//! Ledger snapshot finder: on-hand and cover hint just before an instant.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockplan_core::{BufferKey, Span, StoreError};

use crate::balance::balance_before;
use crate::cover::CoverHint;
use crate::flow::{FlowEvent, FlowEventId};
use crate::store::{BalanceMode, LedgerReader};

/// Inventory position of a buffer at an instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub on_hand: Decimal,
    pub cover: Option<CoverHint>,
    /// Set when the on-hand figure could not be read and was replaced by zero.
    pub missing_balance: Option<FlowEventId>,
}

impl LedgerSnapshot {
    /// No prior flow: nothing on hand, no cover estimate.
    pub fn empty() -> Self {
        Self {
            on_hand: Decimal::ZERO,
            cover: None,
            missing_balance: None,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.missing_balance.is_none()
    }
}

/// Entry with the greatest `(flow_date, id)` among those strictly before `instant`.
pub fn latest_before<'a>(
    events: impl IntoIterator<Item = &'a FlowEvent>,
    instant: DateTime<Utc>,
) -> Option<&'a FlowEvent> {
    events
        .into_iter()
        .filter(|e| e.flow_date < instant)
        .max_by_key(|e| e.position())
}

/// Snapshot of `buffer` just before `instant`.
///
/// With a maintained running balance the latest entry's stored on-hand is
/// authoritative. An entry lacking it yields zero on-hand and records the
/// offending entry instead of guessing a number.
pub fn snapshot_before<R>(
    reader: &R,
    buffer: &BufferKey,
    instant: DateTime<Utc>,
) -> Result<LedgerSnapshot, StoreError>
where
    R: LedgerReader + ?Sized,
{
    match reader.balance_mode() {
        BalanceMode::Maintained => {
            let Some(latest) = reader.last_flow_before(buffer, instant)? else {
                return Ok(LedgerSnapshot::empty());
            };
            Ok(match latest.on_hand {
                Some(on_hand) => LedgerSnapshot {
                    on_hand,
                    cover: latest.cover_hint(),
                    missing_balance: None,
                },
                None => LedgerSnapshot {
                    on_hand: Decimal::ZERO,
                    cover: latest.cover_hint(),
                    missing_balance: Some(latest.id),
                },
            })
        }
        BalanceMode::Recompute => {
            let history = reader.flow_events(buffer, &Span::before(instant))?;
            Ok(LedgerSnapshot {
                on_hand: balance_before(&history, instant),
                cover: latest_before(&history, instant).and_then(FlowEvent::cover_hint),
                missing_balance: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::restate_running_balances;
    use crate::document::Document;
    use crate::flow::NewFlow;
    use chrono::{Duration, TimeZone};
    use stockplan_core::DocumentRef;

    struct VecLedger {
        mode: BalanceMode,
        events: Vec<FlowEvent>,
    }

    impl LedgerReader for VecLedger {
        fn balance_mode(&self) -> BalanceMode {
            self.mode
        }

        fn flow_events(&self, buffer: &BufferKey, range: &Span) -> Result<Vec<FlowEvent>, StoreError> {
            Ok(self
                .events
                .iter()
                .filter(|e| &e.buffer == buffer && range.contains(e.flow_date))
                .cloned()
                .collect())
        }

        fn document(&self, _reference: &DocumentRef) -> Result<Option<Document>, StoreError> {
            Ok(None)
        }

        fn active_buffers(&self) -> Result<Vec<BufferKey>, StoreError> {
            Ok(vec![])
        }
    }

    fn key() -> BufferKey {
        BufferKey::new("bolt", "plant")
    }

    fn t(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    fn flow(id: u64, day: i64, qty: i64) -> FlowEvent {
        NewFlow::new(key(), "doc", t(day), Decimal::from(qty))
            .with_period_of_cover(id as i64 * 86_400)
            .into_event(FlowEventId(id))
    }

    fn ledger(mode: BalanceMode, mut events: Vec<FlowEvent>) -> VecLedger {
        restate_running_balances(&mut events);
        VecLedger { mode, events }
    }

    #[test]
    fn no_prior_flow_yields_empty_snapshot() {
        let l = ledger(BalanceMode::Maintained, vec![flow(1, 5, 10)]);
        assert_eq!(snapshot_before(&l, &key(), t(5)).unwrap(), LedgerSnapshot::empty());
    }

    #[test]
    fn latest_entry_wins_with_insertion_order_tiebreak() {
        let l = ledger(
            BalanceMode::Maintained,
            vec![flow(1, 1, 100), flow(2, 3, -10), flow(3, 3, -5), flow(4, 9, 50)],
        );
        let snap = snapshot_before(&l, &key(), t(4)).unwrap();
        assert_eq!(snap.on_hand, Decimal::from(85));
        assert_eq!(snap.cover, Some(CoverHint::new(t(3), 3 * 86_400)));
        assert!(snap.is_consistent());
    }

    #[test]
    fn missing_running_balance_is_flagged_as_zero() {
        let mut l = ledger(BalanceMode::Maintained, vec![flow(1, 1, 100)]);
        l.events[0].on_hand = None;
        let snap = snapshot_before(&l, &key(), t(2)).unwrap();
        assert_eq!(snap.on_hand, Decimal::ZERO);
        assert_eq!(snap.missing_balance, Some(FlowEventId(1)));
    }

    #[test]
    fn recompute_mode_ignores_stored_balances() {
        let mut l = ledger(BalanceMode::Recompute, vec![flow(1, 1, 100), flow(2, 2, -30)]);
        for e in &mut l.events {
            e.on_hand = None;
        }
        let snap = snapshot_before(&l, &key(), t(3)).unwrap();
        assert_eq!(snap.on_hand, Decimal::from(70));
        assert_eq!(snap.cover, Some(CoverHint::new(t(2), 2 * 86_400)));
        assert!(snap.is_consistent());
    }
}
