//! Authenticated blocking client for the GitHub REST API.
//!
//! One client is built from [`Settings`] at startup and shared by reference
//! with every operation, including the batch deleter's worker threads.

use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::pagination::{collect_pages, next_page_from_link};
use super::types::{
    ApiMessage, Branch, BranchPayload, CheckRun, CheckRunList, CreateRefBody, FileChangeBody,
    FileChangeResponse, FileContent, GitRef, Hook, IssueComment, MergeResult, NewHook, Page,
    PullRequest, RefPayload, RepoId, Repository,
};
use super::BranchApi;
use crate::config::Settings;
use crate::error::{Error, Result};

const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 60;
const API_VERSION: &str = "2022-11-28";
const MEDIA_TYPE: &str = "application/vnd.github+json";

/// Page size used for collaborator listings (hooks, pulls, comments, repos).
const COLLABORATOR_PER_PAGE: u32 = 100;

/// GitHub answers 422 with this message when deleting a ref that is gone.
const MISSING_REF_MESSAGE: &str = "Reference does not exist";

pub struct GitHubClient {
    http: Client,
    api_url: Url,
}

impl GitHubClient {
    /// Build the client with the bearer token and API headers preinstalled.
    pub fn new(settings: &Settings) -> Result<Self> {
        let api_url = Url::parse(&settings.api_url)
            .map_err(|e| Error::InvalidConfig(format!("api_url '{}': {e}", settings.api_url)))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", settings.token))
            .map_err(|_| Error::InvalidConfig("token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("ggh/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, api_url })
    }

    /// Join `path` onto the API base, percent-encoding each segment.
    ///
    /// Slashes inside `path` stay segment separators, which is what the ref
    /// and contents endpoints expect for `heads/feature/x` or `dir/file.yaml`.
    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidConfig(format!("api_url '{}' cannot be a base", self.api_url)))?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn repo_endpoint(&self, repo: &RepoId, rest: &str) -> Result<Url> {
        self.endpoint(&format!("repos/{}/{}/{rest}", repo.owner, repo.name))
    }

    fn get_page<T: DeserializeOwned>(
        &self,
        mut url: Url,
        page: u32,
        per_page: u32,
        what: &'static str,
        name: &str,
    ) -> Result<Page<T>> {
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        let response = send(self.http.get(url), what, name)?;
        let next_page = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_page_from_link);
        let items = decode(response)?;

        Ok(Page { items, next_page })
    }

    fn get_all<T: DeserializeOwned>(
        &self,
        url: Url,
        what: &'static str,
        name: &str,
    ) -> Result<Vec<T>> {
        collect_pages(|page| self.get_page(url.clone(), page, COLLABORATOR_PER_PAGE, what, name))
    }

    // -----------------------------------------------------------------------
    // Contents
    // -----------------------------------------------------------------------

    /// Fetch file metadata (including the blob sha needed for updates).
    pub fn get_contents(
        &self,
        repo: &RepoId,
        path: &str,
        branch: Option<&str>,
    ) -> Result<FileContent> {
        let mut url = self.repo_endpoint(repo, &format!("contents/{path}"))?;
        if let Some(branch) = branch {
            url.query_pairs_mut()
                .append_pair("ref", &super::heads_ref(branch));
        }
        decode(send(self.http.get(url), "file", path)?)
    }

    /// Create a file and return the sha of the resulting commit.
    pub fn create_file(
        &self,
        repo: &RepoId,
        path: &str,
        content: &[u8],
        message: &str,
        branch: Option<&str>,
    ) -> Result<String> {
        self.put_file(repo, path, content, message, None, branch)
    }

    /// Replace a file's content; `sha` is the blob sha of the prior content.
    pub fn update_file(
        &self,
        repo: &RepoId,
        path: &str,
        content: &[u8],
        message: &str,
        sha: &str,
        branch: Option<&str>,
    ) -> Result<String> {
        self.put_file(repo, path, content, message, Some(sha), branch)
    }

    fn put_file(
        &self,
        repo: &RepoId,
        path: &str,
        content: &[u8],
        message: &str,
        sha: Option<&str>,
        branch: Option<&str>,
    ) -> Result<String> {
        let url = self.repo_endpoint(repo, &format!("contents/{path}"))?;
        let body = FileChangeBody {
            message,
            content: Some(base64::engine::general_purpose::STANDARD.encode(content)),
            sha,
            branch,
        };
        let response: FileChangeResponse = decode(send(self.http.put(url).json(&body), "file", path)?)?;
        Ok(response.commit.sha)
    }

    /// Delete a file; `sha` is the blob sha of the current content.
    pub fn delete_file(
        &self,
        repo: &RepoId,
        path: &str,
        message: &str,
        sha: &str,
        branch: Option<&str>,
    ) -> Result<String> {
        let url = self.repo_endpoint(repo, &format!("contents/{path}"))?;
        let body = FileChangeBody {
            message,
            content: None,
            sha: Some(sha),
            branch,
        };
        let response: FileChangeResponse =
            decode(send(self.http.delete(url).json(&body), "file", path)?)?;
        Ok(response.commit.sha)
    }

    // -----------------------------------------------------------------------
    // Webhooks
    // -----------------------------------------------------------------------

    pub fn list_hooks(&self, repo: &RepoId) -> Result<Vec<Hook>> {
        let url = self.repo_endpoint(repo, "hooks")?;
        self.get_all(url, "repository", &repo.to_string())
    }

    pub fn create_hook(&self, repo: &RepoId, hook: &NewHook) -> Result<Hook> {
        let url = self.repo_endpoint(repo, "hooks")?;
        decode(send(self.http.post(url).json(hook), "repository", &repo.to_string())?)
    }

    pub fn delete_hook(&self, repo: &RepoId, id: u64) -> Result<()> {
        let url = self.repo_endpoint(repo, &format!("hooks/{id}"))?;
        send(self.http.delete(url), "webhook", &id.to_string())?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pull requests and comments
    // -----------------------------------------------------------------------

    /// All open pull requests of the repository.
    pub fn list_pull_requests(&self, repo: &RepoId) -> Result<Vec<PullRequest>> {
        let mut url = self.repo_endpoint(repo, "pulls")?;
        url.query_pairs_mut().append_pair("state", "open");
        self.get_all(url, "repository", &repo.to_string())
    }

    /// Issue-style comments on a pull request, oldest first.
    pub fn list_issue_comments(
        &self,
        repo: &RepoId,
        number: u64,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<IssueComment>> {
        let mut url = self.repo_endpoint(repo, &format!("issues/{number}/comments"))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("sort", "created");
            if let Some(since) = since {
                query.append_pair("since", &since.to_rfc3339_opts(SecondsFormat::Secs, true));
            }
        }
        self.get_all(url, "pull request", &number.to_string())
    }

    pub fn create_issue_comment(
        &self,
        repo: &RepoId,
        number: u64,
        body: &str,
    ) -> Result<IssueComment> {
        let url = self.repo_endpoint(repo, &format!("issues/{number}/comments"))?;
        let payload = serde_json::json!({ "body": body });
        decode(send(
            self.http.post(url).json(&payload),
            "pull request",
            &number.to_string(),
        )?)
    }

    pub fn merge_pull_request(
        &self,
        repo: &RepoId,
        number: u64,
        commit_message: &str,
    ) -> Result<MergeResult> {
        let url = self.repo_endpoint(repo, &format!("pulls/{number}/merge"))?;
        let payload = serde_json::json!({ "commit_message": commit_message });
        decode(send(
            self.http.put(url).json(&payload),
            "pull request",
            &number.to_string(),
        )?)
    }

    // -----------------------------------------------------------------------
    // Checks and repositories
    // -----------------------------------------------------------------------

    /// Check runs reported for the head of `branch`.
    pub fn list_check_runs(&self, repo: &RepoId, branch: &str) -> Result<Vec<CheckRun>> {
        let url = self.repo_endpoint(
            repo,
            &format!("commits/{}/check-runs", super::heads_ref(branch)),
        )?;
        let list: CheckRunList = decode(send(self.http.get(url), "branch", branch)?)?;
        Ok(list.check_runs)
    }

    pub fn list_org_repos(&self, org: &str) -> Result<Vec<Repository>> {
        let mut url = self.endpoint(&format!("orgs/{org}/repos"))?;
        url.query_pairs_mut().append_pair("type", "all");
        self.get_all(url, "organization", org)
    }

    pub fn delete_repo(&self, repo: &RepoId) -> Result<()> {
        let url = self.endpoint(&format!("repos/{}/{}", repo.owner, repo.name))?;
        send(self.http.delete(url), "repository", &repo.to_string())?;
        Ok(())
    }
}

impl BranchApi for GitHubClient {
    fn list_branches(&self, repo: &RepoId, page: u32, per_page: u32) -> Result<Page<Branch>> {
        let url = self.repo_endpoint(repo, "branches")?;
        let page: Page<BranchPayload> =
            self.get_page(url, page, per_page, "repository", &repo.to_string())?;
        Ok(Page {
            items: page.items.into_iter().map(Branch::from).collect(),
            next_page: page.next_page,
        })
    }

    fn get_ref(&self, repo: &RepoId, ref_path: &str) -> Result<GitRef> {
        let url = self.repo_endpoint(repo, &format!("git/ref/{ref_path}"))?;
        let payload: RefPayload = decode(send(self.http.get(url), "ref", ref_path)?)?;
        Ok(payload.into())
    }

    fn create_ref(&self, repo: &RepoId, ref_path: &str, sha: &str) -> Result<GitRef> {
        let url = self.repo_endpoint(repo, "git/refs")?;
        let body = CreateRefBody { ref_path, sha };
        let payload: RefPayload = decode(send(self.http.post(url).json(&body), "ref", ref_path)?)?;
        Ok(payload.into())
    }

    fn delete_ref(&self, repo: &RepoId, ref_path: &str) -> Result<()> {
        let url = self.repo_endpoint(repo, &format!("git/refs/{ref_path}"))?;
        send(self.http.delete(url), "ref", ref_path)?;
        Ok(())
    }
}

/// Send a request and turn non-success statuses into typed errors.
fn send(request: RequestBuilder, what: &'static str, name: &str) -> Result<Response> {
    let response = request.send()?;
    let status = response.status();
    debug!(%status, url = %response.url(), "GitHub API response");

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&body)
        .map(|m| m.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    Err(classify_failure(status, message, what, name))
}

fn classify_failure(status: StatusCode, message: String, what: &'static str, name: &str) -> Error {
    if status == StatusCode::NOT_FOUND
        || (status == StatusCode::UNPROCESSABLE_ENTITY && message == MISSING_REF_MESSAGE)
    {
        return Error::NotFound {
            what,
            name: name.to_string(),
        };
    }
    Error::Api {
        status: status.as_u16(),
        message,
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}
