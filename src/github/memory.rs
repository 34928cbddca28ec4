//! In-memory [`BranchApi`] used by tests.
//!
//! Models the parts of the platform the lifecycle core cares about: paged
//! branch listing, read-after-write lag on newly created refs, and injected
//! failures for individual pages or deletions. Every call is recorded.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use super::types::{Branch, GitRef, Page, RepoId};
use super::BranchApi;
use crate::error::{Error, Result};

#[derive(Default)]
struct State {
    branches: Vec<Branch>,
    /// Remaining `get_ref` misses per freshly created branch
    pending_visibility: HashMap<String, u32>,
    failing_deletes: HashMap<String, String>,
    failing_pages: HashSet<u32>,
    calls: Vec<String>,
}

#[derive(Default)]
pub struct InMemoryApi {
    state: Mutex<State>,
    visibility_delay: u32,
    delete_latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with `(name, sha)` branches in listing order.
    pub fn with_branches<I, N, S>(self, branches: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        self.lock().branches = branches
            .into_iter()
            .map(|(name, sha)| Branch::new(name, sha))
            .collect();
        self
    }

    /// Newly created refs answer "not found" to the first `misses` reads.
    pub fn with_visibility_delay(mut self, misses: u32) -> Self {
        self.visibility_delay = misses;
        self
    }

    /// Sleep this long inside every `delete_ref` call.
    pub fn with_delete_latency(mut self, latency: Duration) -> Self {
        self.delete_latency = latency;
        self
    }

    /// Make deletion of `branch` fail with an API error carrying `message`.
    pub fn fail_delete(self, branch: &str, message: &str) -> Self {
        self.lock()
            .failing_deletes
            .insert(branch.to_string(), message.to_string());
        self
    }

    /// Make fetching listing page `page` fail.
    pub fn fail_page(self, page: u32) -> Self {
        self.lock().failing_pages.insert(page);
        self
    }

    /// Current branch names in listing order.
    pub fn branch_names(&self) -> Vec<String> {
        self.lock().branches.iter().map(|b| b.name.clone()).collect()
    }

    /// Every call made so far, e.g. `delete_ref heads/feature/x`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Highest number of `delete_ref` calls observed running at once.
    pub fn max_concurrent_deletes(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn branch_from_ref<'a>(ref_path: &'a str, prefix: &str) -> &'a str {
    ref_path.strip_prefix(prefix).unwrap_or(ref_path)
}

impl BranchApi for InMemoryApi {
    fn list_branches(&self, _repo: &RepoId, page: u32, per_page: u32) -> Result<Page<Branch>> {
        let mut state = self.lock();
        state
            .calls
            .push(format!("list_branches page={page} per_page={per_page}"));

        if per_page == 0 {
            return Err(Error::InvalidConfig("per_page must be positive".to_string()));
        }
        if state.failing_pages.contains(&page) {
            return Err(Error::Api {
                status: 500,
                message: format!("page {page} unavailable"),
            });
        }

        let start = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
        let end = start.saturating_add(per_page as usize).min(state.branches.len());
        let items = state.branches.get(start..end).unwrap_or_default().to_vec();
        let next_page = (end < state.branches.len()).then_some(page + 1);

        Ok(Page { items, next_page })
    }

    fn get_ref(&self, _repo: &RepoId, ref_path: &str) -> Result<GitRef> {
        let mut state = self.lock();
        state.calls.push(format!("get_ref {ref_path}"));
        let name = branch_from_ref(ref_path, "heads/");

        if let Some(remaining) = state.pending_visibility.get_mut(name) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::NotFound {
                    what: "ref",
                    name: ref_path.to_string(),
                });
            }
        }

        state
            .branches
            .iter()
            .find(|b| b.name == name)
            .map(|b| GitRef {
                ref_path: format!("refs/heads/{}", b.name),
                sha: b.commit_sha.clone(),
            })
            .ok_or_else(|| Error::NotFound {
                what: "ref",
                name: ref_path.to_string(),
            })
    }

    fn create_ref(&self, _repo: &RepoId, ref_path: &str, sha: &str) -> Result<GitRef> {
        let mut state = self.lock();
        state.calls.push(format!("create_ref {ref_path} {sha}"));
        let name = branch_from_ref(ref_path, "refs/heads/").to_string();

        if state.branches.iter().any(|b| b.name == name) {
            return Err(Error::Api {
                status: 422,
                message: "Reference already exists".to_string(),
            });
        }

        state.branches.push(Branch::new(name.clone(), sha));
        if self.visibility_delay > 0 {
            state.pending_visibility.insert(name, self.visibility_delay);
        }

        Ok(GitRef {
            ref_path: ref_path.to_string(),
            sha: sha.to_string(),
        })
    }

    fn delete_ref(&self, _repo: &RepoId, ref_path: &str) -> Result<()> {
        self.lock().calls.push(format!("delete_ref {ref_path}"));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delete_latency.is_zero() {
            thread::sleep(self.delete_latency);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let mut state = self.lock();
        let name = branch_from_ref(ref_path, "heads/");

        if let Some(message) = state.failing_deletes.get(name) {
            return Err(Error::Api {
                status: 500,
                message: message.clone(),
            });
        }

        let before = state.branches.len();
        state.branches.retain(|b| b.name != name);
        if state.branches.len() == before {
            return Err(Error::NotFound {
                what: "ref",
                name: ref_path.to_string(),
            });
        }
        Ok(())
    }
}
