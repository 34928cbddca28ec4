//! Branch lifecycle scenarios: list, filter, batch delete, create and poll

use std::time::Duration;

use ggh::branch::{
    create_branch, delete_branches, list_branches, DeleteOptions, NewBranch, PollPolicy,
    Selection,
};
use ggh::cancel::CancelToken;
use ggh::commands::branch::{self as branch_cmd, DeleteArgs};
use ggh::commands::Context;
use ggh::github::{Branch, InMemoryApi};
use ggh::Error;

use super::helpers::*;

#[test]
fn test_regex_delete_removes_only_matching_branches() {
    let api = scenario_repo();
    let repo = test_repo();
    let cancel = CancelToken::new();

    let branches = list_branches(&api, &repo, 2, &cancel).expect("listing should succeed");
    assert_eq!(branches.len(), 4);

    let selection = Selection::from_args(None, Some("^feature/")).unwrap();
    let targets = selection.apply(&branches);
    let report = delete_branches(&api, &repo, &targets, &DeleteOptions::default(), &cancel);

    assert_eq!(report.len(), 2);
    assert_eq!(report.deleted_count(), 2);
    assert!(report.outcomes.iter().all(|o| o.is_deleted()));
    assert_eq!(api.branch_names(), vec!["main", "release/1.0"]);

    assert!(calls_touching(&api, "main").is_empty());
    assert!(calls_touching(&api, "release/1.0").is_empty());
}

#[test]
fn test_exact_name_delete_targets_requested_branch() {
    let api = scenario_repo();
    let settings = test_settings();
    let cancel = CancelToken::new();
    let args = DeleteArgs {
        branch_name: Some("feature/x".to_string()),
        ..DeleteArgs::default()
    };

    let report = branch_cmd::delete(&api, Context::new(&settings, &cancel), &test_repo(), &args)
        .expect("deletion should succeed");

    assert_eq!(report.len(), 1);
    assert_eq!(report.outcomes[0].branch, "feature/x");
    assert_eq!(api.branch_names(), vec!["main", "feature/y", "release/1.0"]);
    assert_eq!(calls_touching(&api, "feature/x"), vec!["delete_ref heads/feature/x"]);
}

#[test]
fn test_invalid_pattern_makes_no_calls() {
    let api = scenario_repo();
    let settings = test_settings();
    let cancel = CancelToken::new();
    let args = DeleteArgs {
        regex: Some("feature/(".to_string()),
        ..DeleteArgs::default()
    };

    let err = branch_cmd::delete(&api, Context::new(&settings, &cancel), &test_repo(), &args)
        .unwrap_err();

    let err = err.downcast_ref::<Error>().expect("library error");
    assert!(err.is_config());
    assert!(api.calls().is_empty());
}

#[test]
fn test_both_selection_criteria_rejected() {
    let api = scenario_repo();
    let settings = test_settings();
    let cancel = CancelToken::new();
    let args = DeleteArgs {
        branch_name: Some("main".to_string()),
        regex: Some("^feature/".to_string()),
        ..DeleteArgs::default()
    };

    let err = branch_cmd::delete(&api, Context::new(&settings, &cancel), &test_repo(), &args)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::ConflictingSelection)
    ));
    assert!(api.calls().is_empty());
}

#[test]
fn test_k_failures_reported_alongside_successes() {
    let names: Vec<String> = (0..10).map(|i| format!("tmp-{i}")).collect();
    let api = InMemoryApi::new()
        .with_branches(names.iter().map(|n| (n.as_str(), "sha")))
        .fail_delete("tmp-3", "protected")
        .fail_delete("tmp-7", "protected");
    let targets: Vec<Branch> = names.iter().map(|n| Branch::new(n.as_str(), "sha")).collect();

    let options = DeleteOptions {
        max_concurrency: 3,
        ignore_missing: false,
    };
    let report = delete_branches(&api, &test_repo(), &targets, &options, &CancelToken::new());

    assert_eq!(report.len(), 10);
    assert_eq!(report.deleted_count(), 8);
    let failed: Vec<&str> = report
        .failures(false)
        .map(|o| o.branch.as_str())
        .collect();
    assert_eq!(failed, vec!["tmp-3", "tmp-7"]);
    assert_eq!(api.branch_names(), vec!["tmp-3", "tmp-7"]);

    match report.into_result(false) {
        Err(Error::PartialBatch { failed, total, .. }) => {
            assert_eq!(failed, 2);
            assert_eq!(total, 10);
        }
        other => panic!("expected partial batch error, got {other:?}"),
    }
}

#[test]
fn test_listing_failure_aborts_without_partial_result() {
    let names: Vec<String> = (0..7).map(|i| format!("b{i}")).collect();
    let api = InMemoryApi::new()
        .with_branches(names.iter().map(|n| (n.as_str(), "sha")))
        .fail_page(2);

    let err = list_branches(&api, &test_repo(), 3, &CancelToken::new()).unwrap_err();
    assert!(matches!(err, Error::Api { status: 500, .. }));
    assert!(!api
        .calls()
        .iter()
        .any(|c| c.starts_with("list_branches page=3 ")));
}

#[test]
fn test_create_tmp_branch_from_main() {
    let api = InMemoryApi::new()
        .with_branches([("main", "abc123")])
        .with_visibility_delay(2);
    let policy = PollPolicy {
        interval: Duration::from_millis(1),
        timeout: Duration::from_secs(1),
    };
    let request = NewBranch {
        base: "main".to_string(),
        base_sha: None,
        name: "tmp-42".to_string(),
    };

    let created = create_branch(&api, &test_repo(), &request, &policy, &CancelToken::new())
        .expect("branch should become visible");

    assert_eq!(created.sha, "abc123");
    assert!(api
        .calls()
        .contains(&"create_ref refs/heads/tmp-42 abc123".to_string()));
    assert!(api.branch_names().contains(&"tmp-42".to_string()));
}

#[test]
fn test_create_then_delete_round_trip_through_commands() {
    let api = InMemoryApi::new().with_branches([("main", "abc123")]);
    let settings = test_settings();
    let cancel = CancelToken::new();
    let ctx = Context::new(&settings, &cancel);
    let repo = test_repo();

    let request = NewBranch {
        base: "main".to_string(),
        base_sha: Some("def456".to_string()),
        name: "tmp-42".to_string(),
    };
    let created = branch_cmd::create(&api, ctx, &repo, &request).unwrap();
    assert_eq!(created.sha, "def456");

    let listed = branch_cmd::list(&api, ctx, &repo, None).unwrap();
    assert_eq!(listed.len(), 2);

    let args = DeleteArgs {
        branch_name: Some("tmp-42".to_string()),
        ..DeleteArgs::default()
    };
    branch_cmd::delete(&api, ctx, &repo, &args).unwrap();
    assert_eq!(api.branch_names(), vec!["main"]);
}

#[test]
fn test_never_visible_branch_times_out() {
    let api = InMemoryApi::new()
        .with_branches([("main", "abc123")])
        .with_visibility_delay(u32::MAX);
    let settings = test_settings();
    let cancel = CancelToken::new();
    let request = NewBranch {
        base: "main".to_string(),
        base_sha: None,
        name: "tmp-42".to_string(),
    };

    let err = branch_cmd::create(&api, Context::new(&settings, &cancel), &test_repo(), &request)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::ConsistencyTimeout { .. })
    ));
}
