//! Shared test helpers

use std::time::Duration;

use ggh::branch::PollPolicy;
use ggh::config::Settings;
use ggh::github::{InMemoryApi, RepoId};

pub fn test_repo() -> RepoId {
    RepoId::new("octo-org", "ggh")
}

/// Settings with a short poll so consistency tests finish quickly.
pub fn test_settings() -> Settings {
    let mut settings = Settings::with_token("t0ken");
    settings.poll = PollPolicy {
        interval: Duration::from_millis(1),
        timeout: Duration::from_millis(200),
    };
    settings
}

/// The four-branch repository used by the deletion scenarios.
pub fn scenario_repo() -> InMemoryApi {
    InMemoryApi::new().with_branches([
        ("main", "aaa111"),
        ("feature/x", "bbb222"),
        ("feature/y", "ccc333"),
        ("release/1.0", "ddd444"),
    ])
}

/// Calls that touched the given branch.
pub fn calls_touching(api: &InMemoryApi, branch: &str) -> Vec<String> {
    let suffix = format!("heads/{branch}");
    api.calls()
        .into_iter()
        .filter(|c| {
            c.split_whitespace()
                .nth(1)
                .is_some_and(|r| r.trim_start_matches("refs/") == suffix)
        })
        .collect()
}
