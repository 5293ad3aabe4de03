//! Worker Pool Module
//!
//! Executes independent conversion tasks on a fixed-size rayon pool bounded
//! by `min(max_workers, task count)`. The codec collaborator is an opaque
//! `Fn(&ConversionTask) -> ConversionOutcome`; it must never panic across
//! this boundary — every per-file error is already folded into a `Failure`
//! outcome on the other side.
//!
//! Guarantees:
//! - exactly one outcome per input task, reconcilable via `source`
//! - a failing task never aborts or delays any other task
//! - all workers have finished before `run_batch` returns
//! - the pool is constructed once per run and dropped before the summary
//!
//! Destination collisions (two sources in one directory differing only by
//! extension) are resolved deterministically from submission order: the
//! first task claiming a destination runs, later claimants fail immediately
//! without touching the filesystem.

use crate::conversion::{ConversionOutcome, ConversionTask};
use crate::progress::BatchProgress;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

/// Mark every task whose destination was already claimed by an earlier task.
///
/// Returns one entry per task: `None` for the owner, `Some(first_source)`
/// for later claimants of the same destination.
fn find_collisions(tasks: &[ConversionTask]) -> Vec<Option<PathBuf>> {
    let mut owners: HashMap<&PathBuf, &PathBuf> = HashMap::with_capacity(tasks.len());
    tasks
        .iter()
        .map(|task| match owners.get(&task.destination) {
            Some(first) => Some((*first).clone()),
            None => {
                owners.insert(&task.destination, &task.source);
                None
            }
        })
        .collect()
}

/// Run every task to completion on a bounded worker pool.
///
/// Zero tasks short-circuit without creating a pool. Otherwise the pool size
/// is `min(max_workers, tasks.len())` and the returned collection holds one
/// outcome per task (completion order, not submission order).
pub fn run_batch<F>(
    tasks: &[ConversionTask],
    max_workers: usize,
    progress: &BatchProgress,
    convert: F,
) -> anyhow::Result<Vec<ConversionOutcome>>
where
    F: Fn(&ConversionTask) -> ConversionOutcome + Sync,
{
    if tasks.is_empty() {
        return Ok(Vec::new());
    }

    let collisions = find_collisions(tasks);
    let pool_size = max_workers.min(tasks.len()).max(1);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_size)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create worker pool: {}", e))?;

    tracing::debug!(
        workers = pool_size,
        tasks = tasks.len(),
        "worker pool created"
    );

    let outcomes = pool.install(|| {
        tasks
            .par_iter()
            .zip(collisions.par_iter())
            .map(|(task, collision)| {
                let outcome = match collision {
                    Some(first_source) => ConversionOutcome::Failure {
                        source: task.source.clone(),
                        reason: format!(
                            "Destination {} already claimed by {}",
                            task.destination.display(),
                            first_source.display()
                        ),
                    },
                    None => convert(task),
                };
                progress.task_completed(&outcome.file_name());
                outcome
            })
            .collect()
    });

    // Pool drops here; every worker has completed.
    Ok(outcomes)
}

/// Effective degree of parallelism for a run.
pub fn effective_workers(max_workers: usize, total_tasks: usize) -> usize {
    max_workers.min(total_tasks).max(1)
}
