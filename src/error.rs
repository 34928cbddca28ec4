//! Error taxonomy for ggh operations.
//!
//! Library code returns [`Result<T>`]; command handlers wrap these in
//! `anyhow` with additional context before they reach the operator.

use std::time::Duration;

/// Result alias used throughout the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the remote API client and the branch lifecycle core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither `--branch-name` nor `--regex` was supplied.
    #[error("none of the parameters 'regex' or 'branch-name' specified")]
    MissingSelection,

    /// Both selection criteria were supplied.
    #[error("only one of 'regex' or 'branch-name' may be specified")]
    ConflictingSelection,

    /// The selection pattern failed to compile.
    #[error("invalid branch pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// No access token was provided via `--token` or `GITHUB_TOKEN`.
    #[error("GitHub token not defined; pass --token or set GITHUB_TOKEN")]
    MissingToken,

    /// A configuration value is out of range or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("GitHub API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// A response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The platform reported a next page that does not move forward.
    #[error("pagination did not advance: page {page} reported next page {next}")]
    Pagination { page: u32, next: u32 },

    /// A named remote entity does not exist.
    #[error("{what} '{name}' not found")]
    NotFound { what: &'static str, name: String },

    /// The base branch of a branch creation could not be resolved.
    #[error("error getting base branch {base}: {source}")]
    BaseNotResolvable {
        base: String,
        #[source]
        source: Box<Error>,
    },

    /// A newly created ref did not become visible within the poll bound.
    #[error("ref {ref_path} not visible after {attempts} attempts over {waited:?}{}", last_error_suffix(.last_error))]
    ConsistencyTimeout {
        ref_path: String,
        attempts: u32,
        waited: Duration,
        last_error: Option<String>,
    },

    /// Some items of a concurrent batch failed.
    #[error("{failed} of {total} operations failed: {}", format_failures(.failures))]
    PartialBatch {
        failed: usize,
        total: usize,
        failures: Vec<(String, String)>,
    },

    /// The operator interrupted the operation.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Whether this error means the remote entity is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Whether this error was raised before any network access.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::MissingSelection
                | Error::ConflictingSelection
                | Error::InvalidPattern { .. }
                | Error::MissingToken
                | Error::InvalidConfig(_)
        )
    }
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(e) => format!(" (last error: {e})"),
        None => String::new(),
    }
}

fn format_failures(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(name, err)| format!("{name}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}
