//! Paginated branch listing

use std::collections::HashSet;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::github::{collect_pages, Branch, BranchApi, RepoId};

/// List every branch of `repo`, walking all pages of `per_page` entries.
///
/// The result keeps the platform's ordering. A branch name reported again on
/// a later page (the listing shifted under us) is kept only once. Any page
/// failure aborts the listing with no partial result.
pub fn list_branches(
    api: &dyn BranchApi,
    repo: &RepoId,
    per_page: u32,
    cancel: &CancelToken,
) -> Result<Vec<Branch>> {
    let all = collect_pages(|page| {
        cancel.check()?;
        api.list_branches(repo, page, per_page)
    })?;

    let mut seen = HashSet::with_capacity(all.len());
    let branches: Vec<Branch> = all
        .into_iter()
        .filter(|b| seen.insert(b.name.clone()))
        .collect();

    debug!(%repo, count = branches.len(), "listed branches");
    Ok(branches)
}
