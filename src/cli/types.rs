use clap::{ArgAction, Args, Parser, Subcommand};
use ggh::github::RepoId;
use ggh::validation::{clap_branch_validator, clap_owner_validator, clap_repo_validator};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "
{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}";

#[derive(Parser, Debug)]
#[command(name = "ggh")]
#[command(about = "GitHub repository automation: branches, files, pull requests, webhooks", long_about = None)]
#[command(version)]
#[command(help_template = HELP_TEMPLATE)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// GitHub access token
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GGH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to a TOML config file (default: ~/.config/ggh/config.toml)
    #[arg(long, env = "GGH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Repository a command operates on.
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// Organization or user that owns the repository
    #[arg(long, value_parser = clap_owner_validator)]
    pub org: String,

    /// Repository name
    #[arg(long, value_parser = clap_repo_validator)]
    pub repo: String,
}

impl RepoArgs {
    pub fn id(&self) -> RepoId {
        RepoId::new(self.org.as_str(), self.repo.as_str())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every branch of a repository
    BranchList {
        #[command(flatten)]
        target: RepoArgs,

        /// Branches requested per page (default from config: 500)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        per_page: Option<u32>,
    },

    /// Delete a branch by name, or every branch matching a regex
    BranchDelete {
        #[command(flatten)]
        target: RepoArgs,

        /// Exact name of the branch to delete
        #[arg(long, value_parser = clap_branch_validator)]
        branch_name: Option<String>,

        /// Delete every branch whose name matches this (unanchored) regex
        #[arg(long)]
        regex: Option<String>,

        /// Treat branches that are already gone as deleted
        #[arg(long)]
        ignore_missing: bool,

        /// Print the branches that would be deleted and stop
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of deletions in flight (default from config: 8)
        #[arg(long)]
        max_concurrency: Option<usize>,
    },

    /// Create a branch from a base branch and wait until it is visible
    BranchCreate {
        #[command(flatten)]
        target: RepoArgs,

        /// Branch the new branch starts from
        #[arg(long, value_parser = clap_branch_validator)]
        base_branch: String,

        /// Name of the branch to create
        #[arg(long, value_parser = clap_branch_validator)]
        new_branch: String,

        /// Commit to start from instead of the base branch head
        #[arg(long)]
        base_sha: Option<String>,

        /// Commit this file onto the new branch once it exists
        #[arg(long, requires = "initial_content")]
        initial_file: Option<String>,

        /// Content of --initial-file
        #[arg(long, requires = "initial_file")]
        initial_content: Option<String>,

        /// Commit message for --initial-file
        #[arg(long, requires = "initial_file")]
        message: Option<String>,
    },

    /// Show the check runs of a branch head
    BranchListChecks {
        #[command(flatten)]
        target: RepoArgs,

        #[arg(long, value_parser = clap_branch_validator)]
        branch_name: String,
    },

    /// Create a file
    FileCreate {
        #[command(flatten)]
        target: RepoArgs,

        #[command(flatten)]
        change: FileChange,

        /// New file content
        #[arg(long)]
        file_content: String,
    },

    /// Replace the content of an existing file
    FileUpdate {
        #[command(flatten)]
        target: RepoArgs,

        #[command(flatten)]
        change: FileChange,

        /// New file content
        #[arg(long)]
        file_content: String,
    },

    /// Delete a file
    FileDelete {
        #[command(flatten)]
        target: RepoArgs,

        #[command(flatten)]
        change: FileChange,
    },

    /// Show the open pull request of a branch and its recent comments
    PrGet {
        #[command(flatten)]
        target: RepoArgs,

        /// Head branch of the pull request
        #[arg(long, value_parser = clap_branch_validator)]
        branch_name: String,

        /// Only show comments from the last N minutes
        #[arg(long, default_value_t = 10)]
        since_minutes: u32,
    },

    /// Merge the open pull request of a branch
    PrMerge {
        #[command(flatten)]
        target: RepoArgs,

        /// Head branch of the pull request
        #[arg(long, value_parser = clap_branch_validator)]
        branch_name: String,

        /// Merge commit message
        #[arg(long)]
        message: Option<String>,
    },

    /// Comment on a pull request
    PrComment {
        #[command(flatten)]
        target: RepoArgs,

        /// Pull request number
        #[arg(long, required_unless_present = "branch_name", conflicts_with = "branch_name")]
        number: Option<u64>,

        /// Head branch of the pull request
        #[arg(long, value_parser = clap_branch_validator)]
        branch_name: Option<String>,

        /// Comment body
        #[arg(long, default_value = ggh::commands::pull_request::DEFAULT_COMMENT)]
        body: String,
    },

    /// List the webhooks of a repository
    WebhookList {
        #[command(flatten)]
        target: RepoArgs,
    },

    /// Replace stale webhooks with a new web hook
    WebhookConfig {
        #[command(flatten)]
        target: RepoArgs,

        /// Delivery URL of the new hook
        #[arg(long)]
        url: String,

        /// Event to subscribe to (repeatable, default: push)
        #[arg(long = "event")]
        events: Vec<String>,

        /// Hooks older than this many hours are deleted first
        #[arg(long, default_value_t = 24)]
        max_age_hours: u32,
    },

    /// Delete a webhook by id
    WebhookDelete {
        #[command(flatten)]
        target: RepoArgs,

        /// Webhook id
        #[arg(long)]
        id: u64,
    },

    /// Delete every repository of an organization whose name contains a filter
    RepoDelete {
        /// Organization to delete repositories from
        #[arg(long, value_parser = clap_owner_validator)]
        org: String,

        /// Substring matched against repository names
        #[arg(long, value_parser = clap::builder::NonEmptyStringValueParser::new())]
        repo_filter: String,

        /// Print the repositories that would be deleted and stop
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completion scripts
    ///
    /// Usage: eval "$(ggh completions bash)"
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

impl Commands {
    /// Concurrency override given on the command line, if any.
    pub fn max_concurrency(&self) -> Option<usize> {
        match self {
            Commands::BranchDelete {
                max_concurrency, ..
            } => *max_concurrency,
            _ => None,
        }
    }
}

/// File path, branch and commit message shared by the file commands.
#[derive(Args, Debug, Clone)]
pub struct FileChange {
    /// Path of the file inside the repository
    #[arg(long)]
    pub file_path: String,

    /// Branch to commit to (default: the repository's default branch)
    #[arg(long, value_parser = clap_branch_validator)]
    pub branch_name: Option<String>,

    /// Commit message
    #[arg(long)]
    pub message: Option<String>,
}
