//! Branch creation with a bounded read-after-write poll
//!
//! Newly created refs are not always readable right away. After the create
//! call succeeds we re-read the ref at a fixed interval until it shows up or
//! the poll policy runs out.

use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::github::{full_ref, heads_ref, BranchApi, GitRef, RepoId};

/// Pause between visibility checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Total time allowed for a new ref to become visible.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// Bounds for the consistency poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

impl PollPolicy {
    /// Number of reads the policy allows: `ceil(timeout / interval)`, at least 1.
    pub fn max_attempts(&self) -> u32 {
        if self.interval.is_zero() {
            return 1;
        }
        let attempts = self.timeout.as_nanos().div_ceil(self.interval.as_nanos());
        u32::try_from(attempts).unwrap_or(u32::MAX).max(1)
    }
}

/// Parameters of a branch creation.
#[derive(Debug, Clone)]
pub struct NewBranch {
    /// Branch the new one starts from
    pub base: String,
    /// Commit to use instead of the base branch head
    pub base_sha: Option<String>,
    /// Name of the branch to create
    pub name: String,
}

/// Create `request.name` from the base branch (or the pinned commit) and
/// return the new ref once it is readable.
pub fn create_branch(
    api: &dyn BranchApi,
    repo: &RepoId,
    request: &NewBranch,
    policy: &PollPolicy,
    cancel: &CancelToken,
) -> Result<GitRef> {
    cancel.check()?;
    let base_ref = api
        .get_ref(repo, &heads_ref(&request.base))
        .map_err(|e| match e {
            Error::Cancelled => e,
            other => Error::BaseNotResolvable {
                base: request.base.clone(),
                source: Box::new(other),
            },
        })?;

    let sha = request
        .base_sha
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(base_ref.sha.as_str());
    let target = full_ref(&request.name);

    cancel.check()?;
    api.create_ref(repo, &target, sha)?;
    info!(%repo, branch = %request.name, %sha, "branch ref created");

    wait_until_visible(api, repo, &request.name, policy, cancel)
}

fn wait_until_visible(
    api: &dyn BranchApi,
    repo: &RepoId,
    branch: &str,
    policy: &PollPolicy,
    cancel: &CancelToken,
) -> Result<GitRef> {
    let ref_path = heads_ref(branch);
    let max_attempts = policy.max_attempts();
    let start = Instant::now();
    let mut attempts = 0;
    let mut last_error: Option<String>;

    loop {
        cancel.check()?;
        attempts += 1;

        match api.get_ref(repo, &ref_path) {
            Ok(visible) => {
                debug!(%ref_path, attempts, "new ref visible");
                return Ok(visible);
            }
            Err(Error::Cancelled) => return Err(Error::Cancelled),
            Err(e) => {
                debug!(%ref_path, attempts, error = %e, "new ref not visible yet");
                last_error = Some(e.to_string());
            }
        }

        if attempts >= max_attempts || start.elapsed() + policy.interval > policy.timeout {
            break;
        }
        cancel.sleep(policy.interval)?;
    }

    Err(Error::ConsistencyTimeout {
        ref_path,
        attempts,
        waited: start.elapsed(),
        last_error,
    })
}
