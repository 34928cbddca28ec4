//! Parse-time checks for owner, repository and branch names.
//!
//! These run as clap value parsers so malformed names are rejected as usage
//! errors before any request is built.

use anyhow::{bail, Result};

/// GitHub limit on user and organization logins.
pub const MAX_OWNER_LENGTH: usize = 39;

/// GitHub limit on repository names.
pub const MAX_REPO_LENGTH: usize = 100;

/// Characters git refuses anywhere in a ref name.
const FORBIDDEN_REF_CHARS: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];

/// Validates a user or organization login.
///
/// Logins are alphanumeric with single inner hyphens.
///
/// ```
/// use ggh::validation::validate_owner;
///
/// assert!(validate_owner("octo-org").is_ok());
/// assert!(validate_owner("-octo").is_err());
/// ```
pub fn validate_owner(owner: &str) -> Result<()> {
    if owner.is_empty() {
        bail!("owner cannot be empty");
    }
    if owner.len() > MAX_OWNER_LENGTH {
        bail!(
            "owner too long: {} characters (max {})",
            owner.len(),
            MAX_OWNER_LENGTH
        );
    }
    if !owner.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        bail!("owner '{owner}' may only contain alphanumeric characters and dashes (-)");
    }
    if owner.starts_with('-') || owner.ends_with('-') || owner.contains("--") {
        bail!("owner '{owner}' cannot start or end with a dash or contain consecutive dashes");
    }
    Ok(())
}

/// Validates a repository name (without the owner).
pub fn validate_repo(repo: &str) -> Result<()> {
    if repo.is_empty() {
        bail!("repository name cannot be empty");
    }
    if repo.len() > MAX_REPO_LENGTH {
        bail!(
            "repository name too long: {} characters (max {})",
            repo.len(),
            MAX_REPO_LENGTH
        );
    }
    if repo == "." || repo == ".." {
        bail!("repository name '{repo}' is reserved");
    }
    let valid = repo
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid {
        bail!("repository name '{repo}' may only contain alphanumeric characters, '-', '_' and '.'");
    }
    Ok(())
}

/// Validates a branch name against git's ref naming rules.
///
/// ```
/// use ggh::validation::validate_branch;
///
/// assert!(validate_branch("feature/x").is_ok());
/// assert!(validate_branch("feature..x").is_err());
/// ```
pub fn validate_branch(branch: &str) -> Result<()> {
    if branch.is_empty() {
        bail!("branch name cannot be empty");
    }
    if branch == "@" {
        bail!("'@' is not a valid branch name");
    }
    if branch.starts_with('-') {
        bail!("branch name '{branch}' cannot start with a dash");
    }
    if branch.starts_with('/') || branch.ends_with('/') || branch.contains("//") {
        bail!("branch name '{branch}' has an empty path component");
    }
    if branch.ends_with('.') || branch.ends_with(".lock") {
        bail!("branch name '{branch}' cannot end with '.' or '.lock'");
    }
    if branch.contains("..") || branch.contains("@{") {
        bail!("branch name '{branch}' cannot contain '..' or '@{{'");
    }
    if branch
        .split('/')
        .any(|component| component.starts_with('.') || component.ends_with(".lock"))
    {
        bail!("branch name '{branch}' has a component starting with '.' or ending with '.lock'");
    }
    if let Some(c) = branch
        .chars()
        .find(|c| c.is_control() || FORBIDDEN_REF_CHARS.contains(c))
    {
        bail!("branch name '{branch}' contains forbidden character {c:?}");
    }
    Ok(())
}

/// Clap value parser for `--org`.
pub fn clap_owner_validator(s: &str) -> Result<String, String> {
    validate_owner(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

/// Clap value parser for `--repo`.
pub fn clap_repo_validator(s: &str) -> Result<String, String> {
    validate_repo(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

/// Clap value parser for branch name flags.
pub fn clap_branch_validator(s: &str) -> Result<String, String> {
    validate_branch(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}
