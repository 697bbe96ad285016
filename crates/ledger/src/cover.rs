//! Period-of-cover hints and days-of-cover.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Period of cover meaning "never runs out" (999 days, in seconds).
pub const INFINITE_COVER_SECONDS: i64 = 86_313_600;

/// Days of cover reported for unlimited cover.
pub const INFINITE_COVER_DAYS: i64 = 999;

const SECONDS_PER_DAY: i64 = 86_400;

/// Cover estimate attached to a ledger snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverHint {
    /// Flow instant of the ledger entry the estimate belongs to.
    pub flow_date: DateTime<Utc>,
    /// How long the on-hand at that entry lasts, in seconds.
    pub period_of_cover: i64,
}

impl CoverHint {
    pub fn new(flow_date: DateTime<Utc>, period_of_cover: i64) -> Self {
        Self {
            flow_date,
            period_of_cover,
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.period_of_cover == INFINITE_COVER_SECONDS
    }

    /// Instant at which the covered inventory runs out.
    pub fn covered_until(&self) -> Option<DateTime<Utc>> {
        self.flow_date
            .checked_add_signed(Duration::try_seconds(self.period_of_cover)?)
    }
}

/// Days of cover of `on_hand` as seen from `horizon`.
///
/// - no stock: 0
/// - infinite, zero or unknown cover: 999
/// - otherwise whole days (rounded down) from `horizon` until cover runs out,
///   negative once it already ran out.
pub fn days_of_cover(on_hand: Decimal, hint: Option<&CoverHint>, horizon: DateTime<Utc>) -> i64 {
    if on_hand <= Decimal::ZERO {
        return 0;
    }
    let Some(hint) = hint else {
        return INFINITE_COVER_DAYS;
    };
    if hint.is_infinite() || hint.period_of_cover == 0 {
        return INFINITE_COVER_DAYS;
    }
    match hint.covered_until() {
        Some(until) => (until - horizon).num_seconds().div_euclid(SECONDS_PER_DAY),
        None => INFINITE_COVER_DAYS,
    }
}
