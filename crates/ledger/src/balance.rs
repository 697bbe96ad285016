//! Running balances derived from genesis.
//!
//! Stores that cannot maintain a running on-hand per entry report
//! `BalanceMode::Recompute`; the snapshot finder then sums flows with these
//! helpers instead of trusting a stored field.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::flow::FlowEvent;

/// Sort `events` into ledger order and rewrite each running balance.
///
/// All events must belong to one buffer.
pub fn restate_running_balances(events: &mut [FlowEvent]) {
    events.sort_by_key(FlowEvent::position);
    let mut on_hand = Decimal::ZERO;
    for event in events.iter_mut() {
        on_hand += event.quantity;
        event.on_hand = Some(on_hand);
    }
}

/// On-hand just before `instant`: the sum of every flow strictly earlier.
pub fn balance_before<'a>(
    events: impl IntoIterator<Item = &'a FlowEvent>,
    instant: DateTime<Utc>,
) -> Decimal {
    events
        .into_iter()
        .filter(|e| e.flow_date < instant)
        .map(|e| e.quantity)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{FlowEventId, NewFlow};
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use stockplan_core::BufferKey;

    fn flow(id: u64, day: i64, qty: i64) -> FlowEvent {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        NewFlow::new(BufferKey::new("a", "b"), "doc", t0 + Duration::days(day), Decimal::from(qty))
            .into_event(FlowEventId(id))
    }

    #[test]
    fn restating_orders_by_date_then_insertion() {
        let mut events = vec![flow(3, 2, 5), flow(1, 1, 10), flow(2, 2, -4)];
        restate_running_balances(&mut events);

        let ids: Vec<u64> = events.iter().map(|e| e.id.0).collect();
        let balances: Vec<Decimal> = events.iter().filter_map(|e| e.on_hand).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(balances, vec![Decimal::from(10), Decimal::from(6), Decimal::from(11)]);
    }

    #[test]
    fn balance_before_excludes_the_instant_itself() {
        let events = vec![flow(1, 0, 10), flow(2, 1, -3)];
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(balance_before(&events, t0), Decimal::ZERO);
        assert_eq!(balance_before(&events, t0 + Duration::days(1)), Decimal::from(10));
        assert_eq!(balance_before(&events, t0 + Duration::days(2)), Decimal::from(7));
    }

    proptest! {
        /// The last restated balance equals the plain sum of all quantities.
        #[test]
        fn final_balance_is_total_quantity(
            moves in prop::collection::vec((0i64..30, -500i64..500), 1..40)
        ) {
            let mut events: Vec<FlowEvent> = moves
                .iter()
                .enumerate()
                .map(|(i, (day, qty))| flow(i as u64 + 1, *day, *qty))
                .collect();
            let total: i64 = moves.iter().map(|(_, q)| q).sum();

            restate_running_balances(&mut events);

            prop_assert_eq!(events.last().and_then(|e| e.on_hand), Some(Decimal::from(total)));
        }
    }
}
