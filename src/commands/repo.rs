//! Repository deletion by name filter
//! Usage: ggh repo-delete --org <org> --repo-filter <substring> [--dry-run]

use anyhow::{bail, Context as _, Result};
use colored::Colorize;

use super::Context;
use crate::github::{GitHubClient, RepoId, Repository};

/// Repositories whose name contains `filter`.
pub fn matching<'a>(repos: &'a [Repository], filter: &str) -> Vec<&'a Repository> {
    repos.iter().filter(|r| r.name.contains(filter)).collect()
}

/// Delete every repository of `org` whose name contains `filter`, one at a
/// time. Stops at the first failure.
pub fn delete(
    client: &GitHubClient,
    ctx: Context<'_>,
    org: &str,
    filter: &str,
    dry_run: bool,
) -> Result<Vec<String>> {
    if filter.is_empty() {
        bail!("refusing to delete with an empty repository filter");
    }

    let repos = client
        .list_org_repos(org)
        .with_context(|| format!("failed to list repositories of '{org}'"))?;
    println!("Total number of repositories in '{}': {}", org, repos.len());

    let targets = matching(&repos, filter);
    if targets.is_empty() {
        println!("No repositories in '{org}' contain '{filter}'");
        return Ok(Vec::new());
    }

    let mut deleted = Vec::with_capacity(targets.len());
    for repo in targets {
        if dry_run {
            println!("  {} would delete {}", "→".cyan(), repo.display_name());
            continue;
        }

        ctx.cancel.check()?;
        let id = RepoId::new(org, repo.name.as_str());
        client
            .delete_repo(&id)
            .with_context(|| format!("failed to delete repository {id}"))?;
        println!("  {} Deleted {}", "✓".green().bold(), repo.display_name());
        deleted.push(repo.name.clone());
    }
    Ok(deleted)
}
