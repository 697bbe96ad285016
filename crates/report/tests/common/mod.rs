//! Shared fixture for the rollup integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use stockplan_calendar::Calendar;
use stockplan_catalog::{Buffer, Item, Location};
use stockplan_core::{BufferKey, Span};
use stockplan_infra::{InMemoryBucketCalendar, InMemoryCalendarStore, InMemoryCatalog, InMemoryLedger};
use stockplan_ledger::{BalanceMode, Document, DocumentType, NewFlow};
use stockplan_report::{RollupConfig, RollupEngine};

pub type Engine = RollupEngine<
    Arc<InMemoryCatalog>,
    Arc<InMemoryBucketCalendar>,
    Arc<InMemoryLedger>,
    Arc<InMemoryCalendarStore>,
>;

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn jan(d: u32) -> DateTime<Utc> {
    at(2024, 1, d)
}

pub fn span(start: DateTime<Utc>, end: DateTime<Utc>) -> Span {
    Span::new(start, end).unwrap()
}

pub fn dec(v: i64) -> Decimal {
    Decimal::from(v)
}

pub struct Fixture {
    pub catalog: Arc<InMemoryCatalog>,
    pub ledger: Arc<InMemoryLedger>,
    pub calendars: Arc<InMemoryCalendarStore>,
    pub buckets: Arc<InMemoryBucketCalendar>,
    pub config: RollupConfig,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_mode(BalanceMode::Maintained)
    }

    pub fn with_mode(mode: BalanceMode) -> Self {
        stockplan_observability::init_test();
        Self {
            catalog: Arc::new(InMemoryCatalog::new()),
            ledger: Arc::new(InMemoryLedger::with_mode(mode)),
            calendars: Arc::new(InMemoryCalendarStore::new()),
            buckets: Arc::new(InMemoryBucketCalendar::standard(&span(at(2023, 1, 1), at(2026, 1, 1)))),
            config: RollupConfig::default().with_workers(4),
        }
    }

    pub fn with_buckets(mut self, buckets: InMemoryBucketCalendar) -> Self {
        self.buckets = Arc::new(buckets);
        self
    }

    pub fn with_config(mut self, config: RollupConfig) -> Self {
        self.config = config;
        self
    }

    /// Register item, location and catalog buffer.
    pub fn buffer(&self, item: &str, location: &str) -> BufferKey {
        self.register(Buffer::new(item, location))
    }

    pub fn register(&self, buffer: Buffer) -> BufferKey {
        let key = buffer.key.clone();
        self.catalog.add_item(Item::new(key.item().clone())).unwrap();
        self.catalog.add_location(Location::new(key.location().clone())).unwrap();
        self.catalog.add_buffer(buffer).unwrap();
        key
    }

    pub fn document(&self, reference: &str, kind: DocumentType, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.ledger
            .register_document(Document::new(reference, kind, start, end, Decimal::ZERO))
            .unwrap();
    }

    pub fn post(&self, key: &BufferKey, document: &str, when: DateTime<Utc>, quantity: i64) {
        self.ledger
            .post(NewFlow::new(key.clone(), document, when, dec(quantity)))
            .unwrap();
    }

    pub fn post_with_cover(&self, key: &BufferKey, document: &str, when: DateTime<Utc>, quantity: i64, cover: Duration) {
        self.ledger
            .post(NewFlow::new(key.clone(), document, when, dec(quantity)).with_period_of_cover(cover.num_seconds()))
            .unwrap();
    }

    pub fn calendar(&self, calendar: Calendar) {
        self.calendars.add(calendar).unwrap();
    }

    pub fn engine(&self) -> Engine {
        RollupEngine::new(
            self.catalog.clone(),
            self.buckets.clone(),
            self.ledger.clone(),
            self.calendars.clone(),
        )
        .with_config(self.config.clone())
    }
}
