use anyhow::{Context as _, Result};
use clap::CommandFactory;
use ggh::branch::NewBranch;
use ggh::cancel::CancelToken;
use ggh::commands::branch::{DeleteArgs, InitialFile};
use ggh::commands::{branch, file, pull_request, repo, webhook, Context};
use ggh::completions::{generate_completions, Shell};
use ggh::config::{Overrides, Settings};
use ggh::github::GitHubClient;
use std::str::FromStr;

use super::types::{Cli, Commands};

pub fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        token,
        api_url,
        config,
        command,
        ..
    } = cli;

    if let Commands::Completions { shell } = &command {
        let shell = Shell::from_str(shell)?;
        generate_completions(&mut Cli::command(), shell, &mut std::io::stdout());
        return Ok(());
    }

    let overrides = Overrides {
        token,
        api_url,
        config_path: config,
        max_concurrency: command.max_concurrency(),
    };
    let settings = Settings::load(overrides).context("failed to load configuration")?;
    tracing::debug!(?settings, "configuration resolved");

    let cancel = CancelToken::install_ctrlc_handler()?;
    let client = GitHubClient::new(&settings).context("failed to set up GitHub client")?;
    let ctx = Context::new(&settings, &cancel);

    match command {
        Commands::BranchList { target, per_page } => {
            branch::list(&client, ctx, &target.id(), per_page).map(drop)
        }
        Commands::BranchDelete {
            target,
            branch_name,
            regex,
            ignore_missing,
            dry_run,
            ..
        } => {
            let args = DeleteArgs {
                branch_name,
                regex,
                ignore_missing,
                dry_run,
            };
            branch::delete(&client, ctx, &target.id(), &args).map(drop)
        }
        Commands::BranchCreate {
            target,
            base_branch,
            new_branch,
            base_sha,
            initial_file,
            initial_content,
            message,
        } => {
            let request = NewBranch {
                base: base_branch,
                base_sha,
                name: new_branch,
            };
            let initial = match (initial_file, initial_content) {
                (Some(path), Some(content)) => Some(InitialFile {
                    path,
                    content,
                    message,
                }),
                _ => None,
            };
            branch::create_with_file(&client, ctx, &target.id(), &request, initial.as_ref())
                .map(drop)
        }
        Commands::BranchListChecks {
            target,
            branch_name,
        } => branch::list_checks(&client, ctx, &target.id(), &branch_name),
        Commands::FileCreate {
            target,
            change,
            file_content,
        } => file::create(
            &client,
            ctx,
            &target.id(),
            &change.file_path,
            &file_content,
            change.branch_name.as_deref(),
            change.message.as_deref(),
        )
        .map(drop),
        Commands::FileUpdate {
            target,
            change,
            file_content,
        } => file::update(
            &client,
            ctx,
            &target.id(),
            &change.file_path,
            &file_content,
            change.branch_name.as_deref(),
            change.message.as_deref(),
        )
        .map(drop),
        Commands::FileDelete { target, change } => file::delete(
            &client,
            ctx,
            &target.id(),
            &change.file_path,
            change.branch_name.as_deref(),
            change.message.as_deref(),
        )
        .map(drop),
        Commands::PrGet {
            target,
            branch_name,
            since_minutes,
        } => pull_request::get(&client, ctx, &target.id(), &branch_name, since_minutes).map(drop),
        Commands::PrMerge {
            target,
            branch_name,
            message,
        } => pull_request::merge(&client, ctx, &target.id(), &branch_name, message.as_deref()),
        Commands::PrComment {
            target,
            number,
            branch_name,
            body,
        } => pull_request::comment(
            &client,
            ctx,
            &target.id(),
            number,
            branch_name.as_deref(),
            &body,
        )
        .map(drop),
        Commands::WebhookList { target } => webhook::list(&client, ctx, &target.id()).map(drop),
        Commands::WebhookConfig {
            target,
            url,
            events,
            max_age_hours,
        } => webhook::configure(&client, ctx, &target.id(), &url, &events, max_age_hours).map(drop),
        Commands::WebhookDelete { target, id } => webhook::delete(&client, ctx, &target.id(), id),
        Commands::RepoDelete {
            org,
            repo_filter,
            dry_run,
        } => repo::delete(&client, ctx, &org, &repo_filter, dry_run).map(drop),
        Commands::Completions { .. } => Ok(()),
    }
}
