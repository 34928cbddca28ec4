//! Webhook commands: list, config, delete
//! Usage: ggh webhook-<list|config|delete> --org <org> --repo <repo> ...

use anyhow::{Context as _, Result};
use chrono::{DateTime, Duration, Utc};
use colored::Colorize;

use super::Context;
use crate::github::{GitHubClient, Hook, NewHook, RepoId};

/// Event subscribed to when `--event` is not given.
pub const DEFAULT_EVENT: &str = "push";

/// Hooks created before `now - max_age`. Hooks without a creation time are
/// never considered stale.
pub fn stale_hooks(hooks: &[Hook], now: DateTime<Utc>, max_age: Duration) -> Vec<&Hook> {
    let cutoff = now - max_age;
    hooks
        .iter()
        .filter(|h| h.created_at.is_some_and(|created| created < cutoff))
        .collect()
}

/// Print every webhook of the repository.
pub fn list(client: &GitHubClient, ctx: Context<'_>, repo: &RepoId) -> Result<Vec<Hook>> {
    ctx.cancel.check()?;
    let hooks = client
        .list_hooks(repo)
        .with_context(|| format!("failed to list webhooks of {repo}"))?;

    if hooks.is_empty() {
        println!("(no webhooks configured for {repo})");
        return Ok(hooks);
    }

    for hook in &hooks {
        let state = if hook.active {
            "active".green()
        } else {
            "inactive".yellow()
        };
        let created = hook
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "  {:>10}  {}  [{}]  {}  {}",
            hook.id,
            hook.delivery_url().unwrap_or("-"),
            hook.events.join(","),
            state,
            created.dimmed()
        );
    }
    Ok(hooks)
}

/// Remove hooks older than `max_age_hours`, then register a new web hook.
pub fn configure(
    client: &GitHubClient,
    ctx: Context<'_>,
    repo: &RepoId,
    url: &str,
    events: &[String],
    max_age_hours: u32,
) -> Result<Hook> {
    ctx.cancel.check()?;
    let hooks = client
        .list_hooks(repo)
        .with_context(|| format!("failed to list webhooks of {repo}"))?;

    let max_age = Duration::hours(i64::from(max_age_hours));
    for hook in stale_hooks(&hooks, Utc::now(), max_age) {
        ctx.cancel.check()?;
        client
            .delete_hook(repo, hook.id)
            .with_context(|| format!("failed to delete webhook {}", hook.id))?;
        println!(
            "{} Deleted webhook {} ({}) older than {}h",
            "✓".green().bold(),
            hook.id,
            hook.delivery_url().unwrap_or("-"),
            max_age_hours
        );
    }

    let events = if events.is_empty() {
        vec![DEFAULT_EVENT.to_string()]
    } else {
        events.to_vec()
    };
    ctx.cancel.check()?;
    let created = client
        .create_hook(repo, &NewHook::web(url, events))
        .with_context(|| format!("failed to create webhook for {url}"))?;

    println!(
        "{} Created webhook {} → {}",
        "✓".green().bold(),
        created.id,
        created.delivery_url().unwrap_or(url)
    );
    Ok(created)
}

/// Delete a webhook by id.
pub fn delete(client: &GitHubClient, ctx: Context<'_>, repo: &RepoId, id: u64) -> Result<()> {
    ctx.cancel.check()?;
    client
        .delete_hook(repo, id)
        .with_context(|| format!("failed to delete webhook {id} of {repo}"))?;
    println!("{} Deleted webhook {}", "✓".green().bold(), id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelToken;
    use crate::config::Settings;
    use crate::error::Error;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    /// Nothing listens here; a request would fail with a transport error.
    const UNREACHABLE_API: &str = "http://127.0.0.1:9";

    fn hook(id: u64, created_at: Option<DateTime<Utc>>) -> Hook {
        Hook {
            id,
            active: true,
            events: vec!["push".to_string()],
            config: BTreeMap::new(),
            created_at,
        }
    }

    #[test]
    fn test_stale_hooks() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let hooks = vec![
            hook(1, Some(Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap())),
            hook(2, Some(Utc.with_ymd_and_hms(2024, 5, 2, 11, 0, 0).unwrap())),
            hook(3, None),
        ];

        let stale: Vec<u64> = stale_hooks(&hooks, now, Duration::hours(24))
            .iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(stale, vec![1]);
    }

    #[test]
    fn test_no_hooks_no_stale() {
        assert!(stale_hooks(&[], Utc::now(), Duration::hours(24)).is_empty());
    }

    #[test]
    fn test_cancelled_before_any_request() {
        let settings = Settings {
            api_url: UNREACHABLE_API.to_string(),
            ..Settings::with_token("t0ken")
        };
        let client = GitHubClient::new(&settings).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let ctx = Context::new(&settings, &cancel);
        let repo = RepoId::new("org", "repo");

        let results = [
            list(&client, ctx, &repo).map(drop),
            configure(&client, ctx, &repo, "https://example.com/hook", &[], 24).map(drop),
            delete(&client, ctx, &repo, 7),
        ];
        for result in results {
            let err = result.unwrap_err();
            assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Cancelled)));
        }
    }
}
