//! Branch lifecycle orchestration
//!
//! This module provides the remote branch operations organized by concern:
//!
//! - `list`: paginated listing of every branch in a repository
//! - `filter`: exact-name or pattern selection of listed branches
//! - `delete`: bounded concurrent deletion with per-branch outcomes
//! - `create`: ref creation followed by a bounded consistency poll

mod create;
mod delete;
mod filter;
mod list;

pub use create::{create_branch, NewBranch, PollPolicy};
pub use delete::{delete_branches, BatchReport, BranchOutcome, DeleteOptions};
pub use filter::Selection;
pub use list::list_branches;
