//! Branch commands: list, delete, create, list-checks
//! Usage: ggh branch-<list|delete|create|list-checks> --org <org> --repo <repo> ...

use anyhow::{Context as _, Result};
use colored::Colorize;

use super::display::short_sha;
use super::{file, Context};
use crate::branch::{
    create_branch, delete_branches, list_branches, BatchReport, DeleteOptions, NewBranch,
    Selection,
};
use crate::error::Error;
use crate::github::{Branch, BranchApi, GitHubClient, GitRef, RepoId};

/// Arguments of `branch-delete`.
#[derive(Debug, Clone, Default)]
pub struct DeleteArgs {
    pub branch_name: Option<String>,
    pub regex: Option<String>,
    pub ignore_missing: bool,
    pub dry_run: bool,
}

/// File committed onto a freshly created branch.
#[derive(Debug, Clone)]
pub struct InitialFile {
    pub path: String,
    pub content: String,
    pub message: Option<String>,
}

/// Print every branch of the repository.
pub fn list(
    api: &dyn BranchApi,
    ctx: Context<'_>,
    repo: &RepoId,
    per_page: Option<u32>,
) -> Result<Vec<Branch>> {
    let per_page = per_page.unwrap_or(ctx.settings.list_per_page);
    let branches = list_branches(api, repo, per_page, ctx.cancel)
        .with_context(|| format!("failed to list branches of {repo}"))?;

    if branches.is_empty() {
        println!("(no branches in {repo})");
        return Ok(branches);
    }

    for branch in &branches {
        println!(
            "  {}  {}",
            short_sha(&branch.commit_sha).dimmed(),
            branch.name
        );
    }
    println!();
    println!("{} branch(es) in {}", branches.len(), repo.to_string().bold());
    Ok(branches)
}

/// Delete the branches selected by name or pattern.
///
/// The selection is validated before anything is listed. Every targeted
/// branch gets a printed outcome; the command fails if any of them failed.
pub fn delete(
    api: &dyn BranchApi,
    ctx: Context<'_>,
    repo: &RepoId,
    args: &DeleteArgs,
) -> Result<BatchReport> {
    let selection = Selection::from_args(args.branch_name.as_deref(), args.regex.as_deref())?;

    let branches = list_branches(api, repo, ctx.settings.per_page, ctx.cancel)
        .with_context(|| format!("failed to list branches of {repo}"))?;
    let targets = selection.apply(&branches);

    if targets.is_empty() {
        match &selection {
            Selection::Exact(name) if !args.ignore_missing => {
                return Err(Error::NotFound {
                    what: "branch",
                    name: name.clone(),
                }
                .into());
            }
            _ => {
                println!(
                    "No branches in {} match {}",
                    repo,
                    selection.describe()
                );
                return Ok(BatchReport::default());
            }
        }
    }

    if args.dry_run {
        println!(
            "Would delete {} branch(es) from {}:",
            targets.len(),
            repo.to_string().bold()
        );
        for branch in &targets {
            println!("  {} {}", "→".cyan(), branch.name);
        }
        return Ok(BatchReport::default());
    }

    let options = DeleteOptions {
        max_concurrency: ctx.settings.max_concurrency,
        ignore_missing: args.ignore_missing,
    };

    println!(
        "Deleting {} branch(es) from {} matching {}...",
        targets.len(),
        repo.to_string().bold(),
        selection.describe()
    );
    let report = delete_branches(api, repo, &targets, &options, ctx.cancel);

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => println!("  {} {}", "✓".green().bold(), outcome.branch),
            Err(e) if args.ignore_missing && e.is_not_found() => {
                println!("  {} {} (already gone)", "✓".green(), outcome.branch.dimmed())
            }
            Err(e) => println!("  {} {}: {}", "✗".red().bold(), outcome.branch, e),
        }
    }
    println!();
    println!(
        "Deleted {} of {} branch(es)",
        report.deleted_count(),
        report.len()
    );

    Ok(report.into_result(args.ignore_missing)?)
}

/// Create a branch and wait until the platform serves it.
pub fn create(
    api: &dyn BranchApi,
    ctx: Context<'_>,
    repo: &RepoId,
    request: &NewBranch,
) -> Result<GitRef> {
    println!(
        "Creating branch {} from {} in {}...",
        request.name.bold(),
        request.base,
        repo
    );

    let created = create_branch(api, repo, request, &ctx.settings.poll, ctx.cancel)
        .with_context(|| format!("failed to create branch '{}'", request.name))?;

    println!(
        "{} Branch {} created at {}",
        "✓".green().bold(),
        request.name,
        short_sha(&created.sha)
    );
    Ok(created)
}

/// Create a branch, then commit `initial` onto it once it is visible.
pub fn create_with_file(
    client: &GitHubClient,
    ctx: Context<'_>,
    repo: &RepoId,
    request: &NewBranch,
    initial: Option<&InitialFile>,
) -> Result<GitRef> {
    let created = create(client, ctx, repo, request)?;

    if let Some(initial) = initial {
        file::create(
            client,
            ctx,
            repo,
            &initial.path,
            &initial.content,
            Some(&request.name),
            initial.message.as_deref(),
        )?;
    }
    Ok(created)
}

/// Print the check runs reported for a branch head.
pub fn list_checks(
    client: &GitHubClient,
    ctx: Context<'_>,
    repo: &RepoId,
    branch: &str,
) -> Result<()> {
    ctx.cancel.check()?;
    let runs = client
        .list_check_runs(repo, branch)
        .with_context(|| format!("failed to list checks of branch '{branch}'"))?;

    if runs.is_empty() {
        println!("(no checks reported for {branch})");
        return Ok(());
    }

    println!("Checks for {} in {}:", branch.bold(), repo);
    for run in &runs {
        let marker = match run.conclusion.as_deref() {
            Some("success") | Some("neutral") | Some("skipped") => "✓".green().bold(),
            Some(_) => "✗".red().bold(),
            None => "→".yellow().bold(),
        };
        let state = run.conclusion.as_deref().unwrap_or(run.status.as_str());
        println!("  {} {} ({})", marker, run.name, state.dimmed());
    }
    Ok(())
}
