//! File content commands: create, update, delete
//! Usage: ggh file-<create|update|delete> --org <org> --repo <repo> --file-path <path> ...

use anyhow::{Context as _, Result};
use colored::Colorize;

use super::display::short_sha;
use super::Context;
use crate::github::{GitHubClient, RepoId};

/// Commit message used when none is given.
pub fn default_message(verb: &str, path: &str) -> String {
    format!("{verb} {path}")
}

fn describe_target(path: &str, branch: Option<&str>) -> String {
    match branch {
        Some(branch) => format!("{path} on {branch}"),
        None => format!("{path} on the default branch"),
    }
}

/// Create a new file and return the resulting commit sha.
pub fn create(
    client: &GitHubClient,
    ctx: Context<'_>,
    repo: &RepoId,
    path: &str,
    content: &str,
    branch: Option<&str>,
    message: Option<&str>,
) -> Result<String> {
    let message = message.map_or_else(|| default_message("Create", path), String::from);
    ctx.cancel.check()?;
    let commit = client
        .create_file(repo, path, content.as_bytes(), &message, branch)
        .with_context(|| format!("failed to create {}", describe_target(path, branch)))?;

    println!(
        "{} Created {} ({})",
        "✓".green().bold(),
        describe_target(path, branch),
        short_sha(&commit).dimmed()
    );
    Ok(commit)
}

/// Replace the content of an existing file.
pub fn update(
    client: &GitHubClient,
    ctx: Context<'_>,
    repo: &RepoId,
    path: &str,
    content: &str,
    branch: Option<&str>,
    message: Option<&str>,
) -> Result<String> {
    ctx.cancel.check()?;
    let current = client
        .get_contents(repo, path, branch)
        .with_context(|| format!("failed to read {}", describe_target(path, branch)))?;

    let message = message.map_or_else(|| default_message("Update", path), String::from);
    ctx.cancel.check()?;
    let commit = client
        .update_file(repo, path, content.as_bytes(), &message, &current.sha, branch)
        .with_context(|| format!("failed to update {}", describe_target(path, branch)))?;

    println!(
        "{} Updated {} ({})",
        "✓".green().bold(),
        describe_target(path, branch),
        short_sha(&commit).dimmed()
    );
    Ok(commit)
}

/// Delete a file.
pub fn delete(
    client: &GitHubClient,
    ctx: Context<'_>,
    repo: &RepoId,
    path: &str,
    branch: Option<&str>,
    message: Option<&str>,
) -> Result<String> {
    ctx.cancel.check()?;
    let current = client
        .get_contents(repo, path, branch)
        .with_context(|| format!("failed to read {}", describe_target(path, branch)))?;

    let message = message.map_or_else(|| default_message("Delete", path), String::from);
    ctx.cancel.check()?;
    let commit = client
        .delete_file(repo, path, &message, &current.sha, branch)
        .with_context(|| format!("failed to delete {}", describe_target(path, branch)))?;

    println!(
        "{} Deleted {} ({})",
        "✓".green().bold(),
        describe_target(path, branch),
        short_sha(&commit).dimmed()
    );
    Ok(commit)
}
