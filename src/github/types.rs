//! Domain records and GitHub wire formats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Repository coordinates (`owner/name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Snapshot of a remote branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub commit_sha: String,
}

impl Branch {
    pub fn new(name: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_sha: commit_sha.into(),
        }
    }
}

/// A `refs/heads/<name> -> sha` pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRef {
    pub ref_path: String,
    pub sha: String,
}

/// One page of a listing plus the page number the platform says comes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }
}

/// Relative ref path used by the get/delete endpoints (`heads/<name>`).
pub fn heads_ref(branch: &str) -> String {
    format!("heads/{branch}")
}

/// Fully qualified ref path used by the create endpoint (`refs/heads/<name>`).
pub fn full_ref(branch: &str) -> String {
    format!("refs/heads/{branch}")
}

// ---------------------------------------------------------------------------
// Wire formats
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct BranchPayload {
    pub name: String,
    pub commit: CommitPointer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitPointer {
    pub sha: String,
}

impl From<BranchPayload> for Branch {
    fn from(p: BranchPayload) -> Self {
        Branch::new(p.name, p.commit.sha)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefPayload {
    #[serde(rename = "ref")]
    pub ref_path: String,
    pub object: CommitPointer,
}

impl From<RefPayload> for GitRef {
    fn from(p: RefPayload) -> Self {
        GitRef {
            ref_path: p.ref_path,
            sha: p.object.sha,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    pub ref_path: &'a str,
    pub sha: &'a str,
}

/// Error body returned by the API on non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    pub message: String,
}

/// Blob sha of a file at a path on a branch, needed to update or delete it.
#[derive(Debug, Clone, Deserialize)]
pub struct FileContent {
    pub sha: String,
}

/// Request body for create/update/delete on the contents endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct FileChangeBody<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileChangeResponse {
    pub commit: CommitPointer,
}

/// Repository webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct Hook {
    pub id: u64,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub config: BTreeMap<String, serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Hook {
    /// Delivery URL from the hook configuration.
    pub fn delivery_url(&self) -> Option<&str> {
        self.config.get("url").and_then(|v| v.as_str())
    }
}

/// Webhook definition submitted on creation.
#[derive(Debug, Clone, Serialize)]
pub struct NewHook {
    pub name: String,
    pub active: bool,
    pub events: Vec<String>,
    pub config: HookConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct HookConfig {
    pub url: String,
    pub content_type: String,
    pub insecure_ssl: String,
}

impl NewHook {
    /// Active JSON web hook for `url` on the given events.
    pub fn web(url: impl Into<String>, events: Vec<String>) -> Self {
        Self {
            name: "web".to_string(),
            active: true,
            events,
            config: HookConfig {
                url: url.into(),
                content_type: "json".to_string(),
                insecure_ssl: "0".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub head: PullRequestHead,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestHead {
    #[serde(rename = "ref")]
    pub ref_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeResult {
    pub sha: Option<String>,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    pub user: Option<User>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckRun {
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckRunList {
    pub check_runs: Vec<CheckRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
}

impl Repository {
    /// `owner/name` when the API returned it, otherwise the bare name.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }
}
