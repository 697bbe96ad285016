//! Rollup orchestration.
//!
//! Every rollup opens one ledger read view, validates its buckets, plans its
//! buffers, then computes rows buffer by buffer. Buckets are independent: a row
//! depends only on the snapshot before its window and the flows inside it, so
//! buffers can be computed in any order or in parallel.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use stockplan_calendar::{
    buckets_covering, BucketCalendar, CalendarStore, SafetyStockQuery, SafetyStockResolver,
    TimeBucket,
};
use stockplan_catalog::attributes::{self, AttributeSchema};
use stockplan_catalog::Catalog;
use stockplan_core::{PlanError, PlanResult, Span};
use stockplan_ledger::{days_of_cover, snapshot_before, DocumentType, FlowEvent, LedgerReader, LedgerSource};

use crate::aggregate::{aggregate, DocumentIndex};
use crate::config::RollupConfig;
use crate::parallel::{run_parallel, CancellationFlag};
use crate::plan::{plan_targets, BufferTarget, TargetPlan};
use crate::request::ReportRequest;
use crate::row::{Diagnostic, InventoryReport, InventoryRow, ItemDetails, LocationDetails, RowFlag};

/// Inventory rollup over a catalog, a bucket calendar, a ledger and the
/// configuration calendars.
pub struct RollupEngine<C, B, L, K> {
    catalog: C,
    buckets: B,
    ledger: L,
    calendars: K,
    resolver: SafetyStockResolver,
    config: RollupConfig,
}

impl<C, B, L, K> RollupEngine<C, B, L, K>
where
    C: Catalog,
    B: BucketCalendar,
    L: LedgerSource,
    K: CalendarStore,
{
    pub fn new(catalog: C, buckets: B, ledger: L, calendars: K) -> Self {
        Self {
            catalog,
            buckets,
            ledger,
            calendars,
            resolver: SafetyStockResolver::standard(),
            config: RollupConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RollupConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_resolver(mut self, resolver: SafetyStockResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &RollupConfig {
        &self.config
    }

    /// Install the catalog's custom attribute definitions as the process-wide
    /// schema. A schema installed earlier is kept and returned.
    pub fn install_attribute_schema(&self) -> PlanResult<&'static AttributeSchema> {
        let schema = AttributeSchema::new(self.catalog.attribute_definitions()?);
        Ok(attributes::install(schema).unwrap_or_else(|_| attributes::installed()))
    }

    /// Rows of `request`, computed lazily one buffer at a time.
    ///
    /// Range and configuration problems are reported here, before any row is
    /// computed. Ledger reads happen as the iterator advances.
    pub fn rows(&self, request: &ReportRequest) -> PlanResult<ReportRows<'_, L::View, K>> {
        let run = self.prepare(request)?;
        Ok(ReportRows {
            run,
            calendars: &self.calendars,
            resolver: &self.resolver,
            next_target: 0,
            pending: Vec::new().into_iter(),
            cancel: None,
            finished: false,
        })
    }

    /// Compute every row on the worker pool and return them in report order.
    ///
    /// On cancellation partial output is discarded.
    pub fn collect_parallel(
        &self,
        request: &ReportRequest,
        cancel: &CancellationFlag,
    ) -> PlanResult<InventoryReport> {
        let run = self.prepare(request)?;
        let span = tracing::info_span!("rollup", run_id = %run.run_id);
        let _entered = span.enter();

        let rows = run_parallel(&run, &self.calendars, &self.resolver, self.config.workers, cancel)?;
        info!(
            run_id = %run.run_id,
            rows = rows.len(),
            flagged = rows.iter().filter(|r| r.is_flagged()).count(),
            skipped = run.plan.diagnostics.len(),
            "rollup finished"
        );
        Ok(InventoryReport {
            run_id: run.run_id,
            rows,
            diagnostics: run.plan.diagnostics,
        })
    }

    fn prepare(&self, request: &ReportRequest) -> PlanResult<RollupRun<L::View>> {
        let run_id = Uuid::now_v7();
        let range = request.range;
        if range.is_empty() {
            return Err(PlanError::range(format!(
                "requested range [{}, {}) is empty",
                range.start, range.end
            )));
        }

        let granularity = request
            .granularity
            .as_deref()
            .unwrap_or(&self.config.default_granularity);
        let listed = self.buckets.list_buckets(granularity, &range)?;
        if listed.is_empty() {
            return Err(PlanError::range(format!(
                "no '{granularity}' buckets cover [{}, {})",
                range.start, range.end
            )));
        }
        let buckets = buckets_covering(listed, &range)?;

        let view = self.ledger.begin_read()?;
        let plan = plan_targets(
            &request.selector,
            &self.catalog,
            &self.calendars,
            &view,
            self.config.failure_policy,
            &request.sort,
        )?;

        info!(
            %run_id,
            granularity,
            buckets = buckets.len(),
            buffers = plan.targets.len(),
            skipped = plan.diagnostics.len(),
            balance_mode = ?view.balance_mode(),
            "rollup started"
        );

        Ok(RollupRun {
            run_id,
            view,
            range,
            buckets,
            plan,
            schema: self.config.include_attributes.then(attributes::installed),
        })
    }
}

/// One planned rollup over one ledger read view.
pub(crate) struct RollupRun<V> {
    pub(crate) run_id: Uuid,
    view: V,
    range: Span,
    buckets: Vec<TimeBucket>,
    pub(crate) plan: TargetPlan,
    /// Set when descriptive fields and attribute columns are wanted.
    schema: Option<&'static AttributeSchema>,
}

impl<V: LedgerReader> RollupRun<V> {
    /// Rows of one buffer, in bucket order.
    pub(crate) fn buffer_rows<K: CalendarStore>(
        &self,
        target: &BufferTarget,
        calendars: &K,
        resolver: &SafetyStockResolver,
    ) -> PlanResult<Vec<InventoryRow>> {
        let history = self.view.flow_events(&target.key, &Span::all())?;
        let documents = DocumentIndex::load(&self.view, &history)?;
        debug!(run_id = %self.run_id, buffer = %target.key, flows = history.len(), "computing buffer");

        self.buckets
            .iter()
            .map(|bucket| self.bucket_row(target, &history, &documents, bucket, calendars, resolver))
            .collect()
    }

    fn bucket_row<K: CalendarStore>(
        &self,
        target: &BufferTarget,
        history: &[FlowEvent],
        documents: &DocumentIndex,
        bucket: &TimeBucket,
        calendars: &K,
        resolver: &SafetyStockResolver,
    ) -> PlanResult<InventoryRow> {
        let instant: DateTime<Utc> = bucket.start.max(self.range.start);
        let window = Span {
            start: instant,
            end: bucket.end,
        };

        let snapshot = snapshot_before(&self.view, &target.key, instant)?;
        let totals = aggregate(history, documents, &window);
        let safety_stock = resolver.resolve(
            &SafetyStockQuery {
                key: &target.key,
                buffer: target.buffer.as_ref(),
                instant,
            },
            calendars,
        )?;

        let mut flags = Vec::new();
        if let Some(entry) = snapshot.missing_balance {
            flags.push(RowFlag::MissingRunningBalance { entry });
        }
        flags.extend(
            totals
                .unresolved
                .iter()
                .cloned()
                .map(|reference| RowFlag::UnresolvedDocument { reference }),
        );
        if !flags.is_empty() {
            warn!(
                run_id = %self.run_id,
                buffer = %target.key,
                bucket = %bucket.name,
                flags = ?flags,
                "ledger inconsistency recovered"
            );
        }

        let (item_details, location_details, attributes) = match self.schema {
            Some(schema) => (
                Some(ItemDetails::from(&target.item)),
                Some(LocationDetails::from(&target.location)),
                schema.project(&target.item, &target.location),
            ),
            None => (None, None, Default::default()),
        };

        Ok(InventoryRow {
            buffer: target.key.clone(),
            item: target.key.item().clone(),
            location: target.key.location().clone(),
            item_details,
            location_details,
            bucket: bucket.name.clone(),
            start_date: bucket.start,
            end_date: bucket.end,
            start_on_hand: snapshot.on_hand,
            start_days_of_cover: days_of_cover(snapshot.on_hand, snapshot.cover.as_ref(), bucket.end),
            safety_stock: safety_stock.value,
            consumed: totals.consumed.total,
            consumed_mo: totals.consumed.get(DocumentType::ManufacturingOrder),
            consumed_do: totals.consumed.get(DocumentType::DistributionOrder),
            consumed_so: totals.consumed.get(DocumentType::Delivery),
            produced: totals.produced.total,
            produced_mo: totals.produced.get(DocumentType::ManufacturingOrder),
            produced_do: totals.produced.get(DocumentType::DistributionOrder),
            produced_po: totals.produced.get(DocumentType::PurchaseOrder),
            end_on_hand: snapshot.on_hand + totals.produced.total - totals.consumed.total,
            total_in_progress: totals.in_progress.total,
            work_in_progress_mo: totals.in_progress.get(DocumentType::ManufacturingOrder),
            on_order_po: totals.in_progress.get(DocumentType::PurchaseOrder),
            in_transit_do: totals.in_progress.get(DocumentType::DistributionOrder),
            attributes,
            flags,
        })
    }
}

/// Lazily computed report rows.
///
/// Single pass; the first error ends the iteration.
pub struct ReportRows<'a, V, K> {
    run: RollupRun<V>,
    calendars: &'a K,
    resolver: &'a SafetyStockResolver,
    next_target: usize,
    pending: std::vec::IntoIter<InventoryRow>,
    cancel: Option<CancellationFlag>,
    finished: bool,
}

impl<V, K> ReportRows<'_, V, K> {
    /// Stop with `PlanError::Cancelled` once `flag` is raised.
    pub fn cancel_on(mut self, flag: CancellationFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run.run_id
    }

    /// Buffers skipped during planning.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.run.plan.diagnostics
    }
}

impl<V, K> Iterator for ReportRows<'_, V, K>
where
    V: LedgerReader,
    K: CalendarStore,
{
    type Item = PlanResult<InventoryRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            if let Some(row) = self.pending.next() {
                return Some(Ok(row));
            }
            if self.cancel.as_ref().is_some_and(CancellationFlag::is_cancelled) {
                self.finished = true;
                return Some(Err(PlanError::Cancelled));
            }
            let Some(target) = self.run.plan.targets.get(self.next_target) else {
                self.finished = true;
                debug!(run_id = %self.run.run_id, "rollup rows exhausted");
                return None;
            };
            self.next_target += 1;
            match self.run.buffer_rows(target, self.calendars, self.resolver) {
                Ok(rows) => self.pending = rows.into_iter(),
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

impl<V, K> std::iter::FusedIterator for ReportRows<'_, V, K>
where
    V: LedgerReader,
    K: CalendarStore,
{
}
