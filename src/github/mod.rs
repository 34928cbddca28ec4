//! Remote API access
//!
//! - `client`: authenticated HTTP client for the GitHub REST API
//! - `memory`: in-memory implementation of [`BranchApi`] for tests
//! - `pagination`: `Link` header parsing
//! - `types`: domain records and wire formats

pub mod client;
pub mod memory;
mod pagination;
pub mod types;

pub use client::GitHubClient;
pub use memory::InMemoryApi;
pub use pagination::{collect_pages, next_page_from_link};
pub use types::{
    full_ref, heads_ref, Branch, CheckRun, FileContent, GitRef, Hook, HookConfig, IssueComment,
    MergeResult, NewHook, Page, PullRequest, PullRequestHead, RepoId, Repository, User,
};

use crate::error::Result;

/// The branch and ref operations the lifecycle core depends on.
///
/// Implementations must be safe to call concurrently from the batch
/// deleter's worker threads.
pub trait BranchApi: Send + Sync {
    /// Fetch one page of branches. Pages are numbered from 1.
    fn list_branches(&self, repo: &RepoId, page: u32, per_page: u32) -> Result<Page<Branch>>;

    /// Resolve a ref such as `heads/main`.
    fn get_ref(&self, repo: &RepoId, ref_path: &str) -> Result<GitRef>;

    /// Create a fully qualified ref (`refs/heads/<name>`) pointing at `sha`.
    fn create_ref(&self, repo: &RepoId, ref_path: &str, sha: &str) -> Result<GitRef>;

    /// Delete a ref such as `heads/feature/x`.
    fn delete_ref(&self, repo: &RepoId, ref_path: &str) -> Result<()>;
}
