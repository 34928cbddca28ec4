//! GitHubClient against a mock HTTP server: paging, status mapping and
//! request bodies

use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ggh::branch::list_branches;
use ggh::cancel::CancelToken;
use ggh::config::Settings;
use ggh::github::{BranchApi, GitHubClient};
use ggh::Error;

use super::helpers::test_repo;

/// Mock server plus the runtime that keeps it alive. The blocking client is
/// driven from the test thread, outside the runtime.
struct MockApi {
    server: MockServer,
    rt: Runtime,
}

impl MockApi {
    fn start() -> Self {
        let rt = Runtime::new().expect("Failed to build tokio runtime");
        let server = rt.block_on(MockServer::start());
        Self { server, rt }
    }

    fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    fn client(&self) -> GitHubClient {
        let settings = Settings {
            api_url: self.server.uri(),
            ..Settings::with_token("t0ken")
        };
        GitHubClient::new(&settings).expect("client should build")
    }
}

fn branch_json(name: &str, sha: &str) -> serde_json::Value {
    json!({ "name": name, "commit": { "sha": sha, "url": "https://x" }, "protected": false })
}

#[test]
fn test_branch_listing_follows_link_header() {
    let api = MockApi::start();
    let next = format!(
        "<{}/repos/octo-org/ggh/branches?per_page=2&page=2>; rel=\"next\", <{}/repos/octo-org/ggh/branches?per_page=2&page=2>; rel=\"last\"",
        api.server.uri(),
        api.server.uri()
    );

    api.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octo-org/ggh/branches"))
            .and(query_param("per_page", "2"))
            .and(query_param("page", "1"))
            .and(header("authorization", "Bearer t0ken"))
            .and(header("x-github-api-version", "2022-11-28"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", next.as_str())
                    .set_body_json(json!([
                        branch_json("main", "aaa111"),
                        branch_json("feature/x", "bbb222")
                    ])),
            )
            .expect(1),
    );
    api.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octo-org/ggh/branches"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([branch_json("tmp-42", "ccc333")])),
            )
            .expect(1),
    );

    let client = api.client();
    let branches = list_branches(&client, &test_repo(), 2, &CancelToken::new())
        .expect("listing should succeed");

    let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["main", "feature/x", "tmp-42"]);
    assert_eq!(branches[2].sha, "ccc333");
}

#[test]
fn test_missing_ref_on_delete_is_not_found() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("DELETE"))
            .and(path("/repos/octo-org/ggh/git/refs/heads/gone"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({
                    "message": "Reference does not exist",
                    "documentation_url": "https://docs.github.com/rest/git/refs#delete-a-reference"
                })),
            ),
    );

    let err = api
        .client()
        .delete_ref(&test_repo(), "heads/gone")
        .unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err:?}");
}

#[test]
fn test_other_unprocessable_delete_stays_api_error() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("DELETE"))
            .and(path("/repos/octo-org/ggh/git/refs/heads/main"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "message": "Cannot delete protected branch" })),
            ),
    );

    let err = api
        .client()
        .delete_ref(&test_repo(), "heads/main")
        .unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Cannot delete protected branch");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[test]
fn test_get_ref_404_is_not_found() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octo-org/ggh/git/ref/heads/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" }))),
    );

    let err = api
        .client()
        .get_ref(&test_repo(), "heads/missing")
        .unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err:?}");
}

#[test]
fn test_delete_ref_no_content_succeeds() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("DELETE"))
            .and(path("/repos/octo-org/ggh/git/refs/heads/feature/x"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1),
    );

    api.client()
        .delete_ref(&test_repo(), "heads/feature/x")
        .expect("204 should count as deleted");
}

#[test]
fn test_create_ref_sends_ref_and_sha() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("POST"))
            .and(path("/repos/octo-org/ggh/git/refs"))
            .and(body_json(json!({ "ref": "refs/heads/tmp-42", "sha": "abc123" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "ref": "refs/heads/tmp-42",
                "node_id": "REF_x",
                "object": { "sha": "abc123", "type": "commit" }
            })))
            .expect(1),
    );

    let created = api
        .client()
        .create_ref(&test_repo(), "refs/heads/tmp-42", "abc123")
        .expect("ref should be created");
    assert_eq!(created.ref_path, "refs/heads/tmp-42");
    assert_eq!(created.sha, "abc123");
}

#[test]
fn test_create_file_sends_base64_content() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("PUT"))
            .and(path("/repos/octo-org/ggh/contents/docs/a.txt"))
            .and(body_partial_json(json!({
                "message": "Create docs/a.txt",
                "content": "aGVsbG8=",
                "branch": "tmp-42"
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "commit": { "sha": "c0ffee" } })),
            )
            .expect(1),
    );

    let commit = api
        .client()
        .create_file(
            &test_repo(),
            "docs/a.txt",
            b"hello",
            "Create docs/a.txt",
            Some("tmp-42"),
        )
        .expect("file should be created");
    assert_eq!(commit, "c0ffee");
}
