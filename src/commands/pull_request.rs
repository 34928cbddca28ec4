//! Pull request commands: get, merge, comment
//! Usage: ggh pr-<get|merge|comment> --org <org> --repo <repo> ...

use anyhow::{bail, Context as _, Result};
use chrono::{DateTime, Duration, Utc};
use colored::Colorize;

use super::display::{short_sha, truncate_for_display};
use super::Context;
use crate::error::Error;
use crate::github::{GitHubClient, IssueComment, PullRequest, RepoId};

/// Comment posted by `pr-comment` when no body is given.
pub const DEFAULT_COMMENT: &str = "/retest";

/// The open pull request whose head is `branch`, if any. When several match,
/// the last one in listing order wins.
pub fn find_by_branch<'a>(pulls: &'a [PullRequest], branch: &str) -> Option<&'a PullRequest> {
    pulls.iter().rev().find(|pr| pr.head.ref_name == branch)
}

/// Look up the open pull request for `branch`.
pub fn lookup(
    client: &GitHubClient,
    ctx: Context<'_>,
    repo: &RepoId,
    branch: &str,
) -> Result<PullRequest> {
    ctx.cancel.check()?;
    let pulls = client
        .list_pull_requests(repo)
        .with_context(|| format!("failed to list pull requests of {repo}"))?;

    find_by_branch(&pulls, branch)
        .cloned()
        .ok_or_else(|| {
            Error::NotFound {
                what: "open pull request for branch",
                name: branch.to_string(),
            }
            .into()
        })
}

/// Start of the comment window ending at `now`.
pub fn comments_since(now: DateTime<Utc>, minutes: u32) -> DateTime<Utc> {
    now - Duration::minutes(i64::from(minutes))
}

/// Show the pull request for `branch` and its recent comments.
pub fn get(
    client: &GitHubClient,
    ctx: Context<'_>,
    repo: &RepoId,
    branch: &str,
    since_minutes: u32,
) -> Result<Vec<IssueComment>> {
    let pr = lookup(client, ctx, repo, branch)?;
    let since = comments_since(Utc::now(), since_minutes);
    ctx.cancel.check()?;
    let comments = client
        .list_issue_comments(repo, pr.number, Some(since))
        .with_context(|| format!("failed to list comments of pull request #{}", pr.number))?;

    println!("{} #{} {}", "→".cyan().bold(), pr.number, pr.title.bold());
    if let Some(url) = &pr.html_url {
        println!("  {}", url.dimmed());
    }
    println!();

    if comments.is_empty() {
        println!("(no comments in the last {since_minutes} minute(s))");
        return Ok(comments);
    }

    println!("Comments in the last {since_minutes} minute(s):");
    for comment in &comments {
        let author = comment
            .user
            .as_ref()
            .map_or("unknown", |u| u.login.as_str());
        let when = comment
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "  {} {} {}",
            when.dimmed(),
            author.bold(),
            truncate_for_display(&comment.body, 100)
        );
    }
    Ok(comments)
}

/// Merge the pull request for `branch`.
pub fn merge(
    client: &GitHubClient,
    ctx: Context<'_>,
    repo: &RepoId,
    branch: &str,
    message: Option<&str>,
) -> Result<()> {
    let pr = lookup(client, ctx, repo, branch)?;
    let message = message.map_or_else(
        || format!("Merge pull request #{} from {branch}", pr.number),
        String::from,
    );

    ctx.cancel.check()?;
    let result = client
        .merge_pull_request(repo, pr.number, &message)
        .with_context(|| format!("failed to merge pull request #{}", pr.number))?;

    if !result.merged {
        bail!("pull request #{} was not merged: {}", pr.number, result.message);
    }

    let sha = result.sha.as_deref().map(short_sha).unwrap_or_default();
    println!(
        "{} Merged #{} ({}) {}",
        "✓".green().bold(),
        pr.number,
        branch,
        sha.dimmed()
    );
    Ok(())
}

/// Post a comment on a pull request given by number or by head branch.
pub fn comment(
    client: &GitHubClient,
    ctx: Context<'_>,
    repo: &RepoId,
    number: Option<u64>,
    branch: Option<&str>,
    body: &str,
) -> Result<IssueComment> {
    let number = match (number, branch) {
        (Some(number), _) => number,
        (None, Some(branch)) => lookup(client, ctx, repo, branch)?.number,
        (None, None) => bail!("either a pull request number or a branch name is required"),
    };

    ctx.cancel.check()?;
    let created = client
        .create_issue_comment(repo, number, body)
        .with_context(|| format!("failed to comment on pull request #{number}"))?;

    println!("{} {}", "✓".green().bold(), comment_summary(number, &created));
    Ok(created)
}

/// One-line confirmation for a posted comment.
pub fn comment_summary(number: u64, comment: &IssueComment) -> String {
    format!(
        "Commented on #{} (comment {}): {}",
        number,
        comment.id,
        truncate_for_display(&comment.body, 60)
    )
}
