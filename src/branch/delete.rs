//! Concurrent batch deletion of branch refs
//!
//! Deletions run on a bounded pool of scoped worker threads fed from a shared
//! job queue. Each worker reports one outcome per job over a channel, and the
//! caller only gets the report back once every worker has been joined. A
//! failing deletion never stops its siblings.

use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::config::DEFAULT_MAX_CONCURRENCY;
use crate::error::{Error, Result};
use crate::github::{heads_ref, Branch, BranchApi, RepoId};

#[derive(Debug, Clone)]
pub struct DeleteOptions {
    /// Maximum number of deletions in flight at once
    pub max_concurrency: usize,
    /// Count "ref not found" as success when judging the batch
    pub ignore_missing: bool,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            ignore_missing: false,
        }
    }
}

/// Result of deleting a single branch.
#[derive(Debug)]
pub struct BranchOutcome {
    pub branch: String,
    pub result: Result<()>,
}

impl BranchOutcome {
    pub fn is_deleted(&self) -> bool {
        self.result.is_ok()
    }

    pub fn is_missing(&self) -> bool {
        matches!(&self.result, Err(e) if e.is_not_found())
    }

    fn is_failure(&self, ignore_missing: bool) -> bool {
        match &self.result {
            Ok(()) => false,
            Err(e) if ignore_missing && e.is_not_found() => false,
            Err(_) => true,
        }
    }
}

/// One outcome per submitted branch, in submission order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BranchOutcome>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn deleted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_deleted()).count()
    }

    pub fn failures(&self, ignore_missing: bool) -> impl Iterator<Item = &BranchOutcome> {
        self.outcomes
            .iter()
            .filter(move |o| o.is_failure(ignore_missing))
    }

    /// Fail with [`Error::PartialBatch`] listing every failed branch, if any.
    pub fn into_result(self, ignore_missing: bool) -> Result<Self> {
        let failures: Vec<(String, String)> = self
            .failures(ignore_missing)
            .map(|o| {
                let message = match &o.result {
                    Err(e) => e.to_string(),
                    Ok(()) => String::new(),
                };
                (o.branch.clone(), message)
            })
            .collect();

        if failures.is_empty() {
            return Ok(self);
        }
        Err(Error::PartialBatch {
            failed: failures.len(),
            total: self.len(),
            failures,
        })
    }
}

/// Delete the ref of every branch in `branches`, at most
/// `options.max_concurrency` at a time, and wait for all of them.
///
/// Once `cancel` fires, branches not yet started are recorded as
/// [`Error::Cancelled`] so the report still holds one outcome per branch.
pub fn delete_branches(
    api: &dyn BranchApi,
    repo: &RepoId,
    branches: &[Branch],
    options: &DeleteOptions,
    cancel: &CancelToken,
) -> BatchReport {
    let total = branches.len();
    if total == 0 {
        return BatchReport::default();
    }

    let workers = options.max_concurrency.clamp(1, total);
    info!(%repo, total, workers, "deleting branches");

    let (job_tx, job_rx) = mpsc::channel();
    for job in branches.iter().enumerate() {
        // The receiver is alive until the end of this function
        let _ = job_tx.send(job);
    }
    drop(job_tx);
    let job_rx = Mutex::new(job_rx);

    let (result_tx, result_rx) = mpsc::channel();

    thread::scope(|scope| {
        for worker in 0..workers {
            let job_rx = &job_rx;
            let result_tx = result_tx.clone();
            scope.spawn(move || loop {
                let next = job_rx.lock().unwrap_or_else(|e| e.into_inner()).recv();
                let Ok((index, branch)) = next else {
                    debug!(worker, "job queue drained");
                    break;
                };

                let result = delete_one(api, repo, branch, cancel);
                let outcome = BranchOutcome {
                    branch: branch.name.clone(),
                    result,
                };
                if result_tx.send((index, outcome)).is_err() {
                    break;
                }
            });
        }
    });
    drop(result_tx);

    let mut indexed: Vec<(usize, BranchOutcome)> = result_rx.into_iter().collect();
    indexed.sort_by_key(|(index, _)| *index);

    BatchReport {
        outcomes: indexed.into_iter().map(|(_, outcome)| outcome).collect(),
    }
}

fn delete_one(
    api: &dyn BranchApi,
    repo: &RepoId,
    branch: &Branch,
    cancel: &CancelToken,
) -> Result<()> {
    cancel.check()?;
    debug!(branch = %branch.name, "deleting branch ref");

    match api.delete_ref(repo, &heads_ref(&branch.name)) {
        Ok(()) => {
            info!(branch = %branch.name, "branch deleted");
            Ok(())
        }
        Err(e) => {
            warn!(branch = %branch.name, error = %e, "branch deletion failed");
            Err(e)
        }
    }
}
