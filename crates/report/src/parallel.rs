//! Buffer-partitioned worker pool.
//!
//! Each buffer is computed on a dedicated rayon pool. The indexed collect
//! returns rows in plan order whatever order the workers finish in.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, warn};

use stockplan_calendar::{CalendarStore, SafetyStockResolver};
use stockplan_core::{PlanError, PlanResult};
use stockplan_ledger::LedgerReader;

use crate::engine::RollupRun;
use crate::row::InventoryRow;

/// Cooperative cancellation shared between a caller and a running rollup.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub(crate) fn run_parallel<V, K>(
    run: &RollupRun<V>,
    calendars: &K,
    resolver: &SafetyStockResolver,
    workers: usize,
    cancel: &CancellationFlag,
) -> PlanResult<Vec<InventoryRow>>
where
    V: LedgerReader,
    K: CalendarStore,
{
    let targets = &run.plan.targets;
    let workers = workers.clamp(1, targets.len().max(1));
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("rollup-{index}"))
        .build()
        .map_err(|error| PlanError::configuration(format!("rollup worker pool: {error}")))?;
    debug!(run_id = %run.run_id, workers, buffers = targets.len(), "rollup pool started");

    let results: Vec<PlanResult<Vec<InventoryRow>>> = pool.install(|| {
        targets
            .par_iter()
            .map(|target| {
                if cancel.is_cancelled() {
                    return Err(PlanError::Cancelled);
                }
                run.buffer_rows(target, calendars, resolver)
            })
            .collect()
    });

    if cancel.is_cancelled() {
        warn!(run_id = %run.run_id, "rollup cancelled; partial output discarded");
        return Err(PlanError::Cancelled);
    }

    // The first failure in plan order wins, independent of scheduling.
    let mut rows = Vec::new();
    for result in results {
        rows.extend(result?);
    }
    Ok(rows)
}
