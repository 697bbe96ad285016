//! Rollup planning: which buffers to compute, with which catalog records, in
//! which order.

use std::cmp::Ordering;

use tracing::warn;

use stockplan_calendar::CalendarStore;
use stockplan_catalog::{Buffer, Catalog, Item, Location};
use stockplan_core::{BufferKey, PlanError, PlanResult};
use stockplan_ledger::LedgerReader;

use crate::config::FailurePolicy;
use crate::request::{BufferSelector, Direction, SortField, SortKey};
use crate::row::Diagnostic;

/// A buffer ready for computation.
#[derive(Debug, Clone)]
pub struct BufferTarget {
    pub key: BufferKey,
    /// Catalog record; absent for ledger-only buffers.
    pub buffer: Option<Buffer>,
    pub item: Item,
    pub location: Location,
}

/// Ordered targets plus the buffers dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct TargetPlan {
    pub targets: Vec<BufferTarget>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve the selector into targets, check their references, then sort them.
pub fn plan_targets<C, K, R>(
    selector: &BufferSelector,
    catalog: &C,
    calendars: &K,
    ledger: &R,
    policy: FailurePolicy,
    sort: &[SortKey],
) -> PlanResult<TargetPlan>
where
    C: Catalog + ?Sized,
    K: CalendarStore + ?Sized,
    R: LedgerReader + ?Sized,
{
    let candidates: Vec<(BufferKey, PlanResult<Option<Buffer>>)> = match selector {
        BufferSelector::Key(key) => {
            let found = catalog.buffer(key)?.map(Some).ok_or_else(|| {
                PlanError::configuration(format!("buffer '{key}' does not exist"))
            });
            vec![(key.clone(), found)]
        }
        BufferSelector::Filter(filter) => catalog
            .list_buffers(filter)?
            .into_iter()
            .map(|b| (b.key.clone(), Ok(Some(b))))
            .collect(),
        BufferSelector::WithActivity => {
            let mut pairs = Vec::new();
            for key in ledger.active_buffers()? {
                let buffer = catalog.buffer(&key)?;
                pairs.push((key, Ok(buffer)));
            }
            pairs
        }
    };

    let mut plan = TargetPlan::default();
    for (key, buffer) in candidates {
        let target = match buffer {
            Ok(buffer) => resolve_target(key.clone(), buffer, catalog, calendars),
            Err(error) => Err(error),
        };
        match target {
            Ok(target) => plan.targets.push(target),
            Err(PlanError::Configuration(reason)) if policy == FailurePolicy::SkipBuffer => {
                warn!(buffer = %key, %reason, "skipping misconfigured buffer");
                plan.diagnostics.push(Diagnostic { buffer: key, reason });
            }
            Err(error) => return Err(error),
        }
    }

    sort_targets(&mut plan.targets, sort);
    Ok(plan)
}

fn resolve_target<C, K>(
    key: BufferKey,
    buffer: Option<Buffer>,
    catalog: &C,
    calendars: &K,
) -> PlanResult<BufferTarget>
where
    C: Catalog + ?Sized,
    K: CalendarStore + ?Sized,
{
    let item = catalog
        .item(key.item())?
        .ok_or_else(|| PlanError::configuration(format!("item '{}' of buffer '{key}' does not exist", key.item())))?;
    let location = catalog.location(key.location())?.ok_or_else(|| {
        PlanError::configuration(format!(
            "location '{}' of buffer '{key}' does not exist",
            key.location()
        ))
    })?;
    if let Some(calendar) = buffer.as_ref().and_then(|b| b.minimum_calendar.as_ref()) {
        if !calendars.contains(calendar)? {
            return Err(PlanError::configuration(format!(
                "minimum calendar '{calendar}' of buffer '{key}' does not exist"
            )));
        }
    }
    Ok(BufferTarget {
        key,
        buffer,
        item,
        location,
    })
}

fn compare_field(a: &BufferTarget, b: &BufferTarget, field: SortField) -> Ordering {
    match field {
        SortField::Buffer => a.key.to_string().cmp(&b.key.to_string()),
        SortField::Item => a.key.item().cmp(b.key.item()),
        SortField::Location => a.key.location().cmp(b.key.location()),
        SortField::ItemCategory => a.item.category.cmp(&b.item.category),
        SortField::LocationCategory => a.location.category.cmp(&b.location.category),
    }
}

/// Sort by the requested keys; remaining ties fall back to the buffer key.
pub fn sort_targets(targets: &mut [BufferTarget], sort: &[SortKey]) {
    targets.sort_by(|a, b| {
        sort.iter()
            .map(|key| match key.direction {
                Direction::Asc => compare_field(a, b, key.field),
                Direction::Desc => compare_field(a, b, key.field).reverse(),
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.key.cmp(&b.key))
    });
}
