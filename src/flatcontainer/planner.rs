//! Batch planning and per-id fan-out
//!
//! ## Why group by id
//! Every version of an id shares one index document. Running one
//! read-modify-write per version would race on that document, so a batch is
//! split into id groups and each group recomputes its index exactly once.
//!
//! ## Execution
//! ```text
//!   batch ──► group_by_id ──► work queue ──► worker 1 ─┐
//!                                      └───► worker N ─┴─► failures
//! ```
//! Groups run concurrently on at most `max_parallelism` scoped threads.
//! Requests of the same id never run in parallel.

use std::collections::HashMap;

use crossbeam::channel;
use parking_lot::Mutex;

use crate::cancel::CancellationToken;
use crate::error::{FeedError, PackageFailure, Result};
use crate::package::PackageId;

/// Requests of one batch that share a package id
#[derive(Debug)]
pub struct IdGroup<T> {
    pub id: PackageId,
    pub items: Vec<T>,
}

/// Group a batch by package id (case-insensitive)
///
/// Groups come out in order of first appearance; each group keeps the id
/// spelling of its first request. No state survives the call.
pub fn group_by_id<T, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<IdGroup<T>>
where
    F: Fn(&T) -> &PackageId,
{
    let mut groups: Vec<IdGroup<T>> = Vec::new();
    let mut positions: HashMap<PackageId, usize> = HashMap::new();

    for item in items {
        let id = key(&item).clone();
        match positions.get(&id) {
            Some(&position) => groups[position].items.push(item),
            None => {
                positions.insert(id.clone(), groups.len());
                groups.push(IdGroup {
                    id,
                    items: vec![item],
                });
            }
        }
    }

    groups
}

/// Run `unit` once per group on a bounded pool of scoped threads
///
/// Waits for every group. Groups not yet started when `token` is cancelled
/// are skipped and reported as `Cancelled`. All failures are aggregated into
/// one `FeedError::Batch`; work already committed by other groups stays.
pub fn run_groups<T, F>(
    groups: &[IdGroup<T>],
    max_parallelism: usize,
    token: &CancellationToken,
    unit: F,
) -> Result<()>
where
    T: Sync,
    F: Fn(&IdGroup<T>) -> Vec<PackageFailure> + Sync,
{
    if groups.is_empty() {
        return Ok(());
    }
    token.check()?;

    let workers = max_parallelism.clamp(1, groups.len());
    let (sender, receiver) = channel::bounded(groups.len());
    for group in groups {
        if sender.send(group).is_err() {
            break;
        }
    }
    drop(sender);

    let failures: Mutex<Vec<PackageFailure>> = Mutex::new(Vec::new());

    crossbeam::scope(|scope| {
        for _ in 0..workers {
            let receiver = receiver.clone();
            let failures = &failures;
            let unit = &unit;

            scope.spawn(move |_| {
                for group in receiver.iter() {
                    if token.is_cancelled() {
                        failures
                            .lock()
                            .push(PackageFailure::group(group.id.clone(), FeedError::Cancelled));
                        continue;
                    }

                    let group_failures = unit(group);
                    if !group_failures.is_empty() {
                        failures.lock().extend(group_failures);
                    }
                }
            });
        }
    })
    .map_err(|_| FeedError::WorkerPanicked)?;

    let failures = failures.into_inner();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(FeedError::Batch { failures })
    }
}
