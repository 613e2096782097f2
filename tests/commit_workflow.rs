//! End-to-end tests over HTTP.
//!
//! These tests drive a real `GitHubClient` (reqwest transport, static
//! token) against a wiremock server and verify:
//! - The full commit sequence: ref read, commit read, blobs, tree, commit, ref update
//! - Pull request creation, search, and merge with branch deletion
//! - Error mapping at the HTTP boundary
//! - Branch names, file paths, and search keywords with `#`, `?`, or `&`
//!   address exactly what they name

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gitremote::client::GitHubClient;
use gitremote::config::ClientConfig;
use gitremote::git::GitFile;
use gitremote::pulls::{BranchDeletion, MergeOptions, PullRequestStatus, PullRequestUpsert};
use gitremote::uri::RepositoryId;
use gitremote::GitError;

fn client(server: &MockServer) -> GitHubClient {
    let config = ClientConfig {
        api_base: Some(server.uri()),
        ..Default::default()
    };
    GitHubClient::with_token("test_token", config).unwrap()
}

fn repo() -> RepositoryId {
    RepositoryId::new("octo", "app")
}

mod commit {
    use super::*;

    async fn mount_head(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/git/ref/heads/main"))
            .and(header("authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ref": "refs/heads/main",
                "object": {"sha": "head1", "type": "commit"}
            })))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/git/commits/head1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": "head1",
                "tree": {"sha": "tree1"},
                "parents": []
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn commit_and_push_over_http() {
        let server = MockServer::start().await;
        mount_head(&server).await;

        Mock::given(method("POST"))
            .and(path("/repos/octo/app/git/blobs"))
            .and(body_json(json!({"content": "<Project />", "encoding": "utf-8"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "blob1"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/app/git/trees"))
            .and(body_json(json!({
                "base_tree": "tree1",
                "tree": [
                    {"path": "eng/Versions.props", "mode": "100644", "type": "blob", "sha": "blob1"},
                    {"path": "old.txt", "mode": "100644", "type": "blob", "sha": null}
                ]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "tree2"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/app/git/commits"))
            .and(body_json(json!({
                "message": "Update dependencies",
                "tree": "tree2",
                "parents": ["head1"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "sha": "commit2",
                "tree": {"sha": "tree2"},
                "parents": [{"sha": "head1"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/repos/octo/app/git/refs/heads/main"))
            .and(body_json(json!({"sha": "commit2", "force": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ref": "refs/heads/main",
                "object": {"sha": "commit2"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let files = vec![
            GitFile::text("eng/Versions.props", "<Project />"),
            GitFile::deleted("old.txt"),
        ];
        let record = client(&server)
            .commit_and_push(&repo(), "main", &files, "Update dependencies")
            .await
            .unwrap();

        assert_eq!(record.sha, "commit2");
        assert_eq!(record.tree_sha, "tree2");
        assert_eq!(record.parent_shas, vec!["head1".to_string()]);
    }

    #[tokio::test]
    async fn non_fast_forward_surfaces_conflict() {
        let server = MockServer::start().await;
        mount_head(&server).await;

        Mock::given(method("POST"))
            .and(path("/repos/octo/app/git/blobs"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "blob1"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/app/git/trees"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "tree2"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/app/git/commits"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "sha": "commit2",
                "tree": {"sha": "tree2"},
                "parents": [{"sha": "head1"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/repos/octo/app/git/refs/heads/main"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(json!({"message": "Update is not a fast forward"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .commit_and_push(&repo(), "main", &[GitFile::text("a", "a")], "msg")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "API error: 422 - Update is not a fast forward");
    }

    #[tokio::test]
    async fn missing_branch_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/git/ref/heads/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .mount(&server)
            .await;

        let err = client(&server)
            .commit_and_push(&repo(), "gone", &[GitFile::text("a", "a")], "msg")
            .await
            .unwrap_err();

        match err {
            GitError::NotFound { path, repo, .. } => {
                assert_eq!(path, "refs/heads/gone");
                assert_eq!(repo, "octo/app");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

mod encoding {
    use super::*;

    #[tokio::test]
    async fn ensure_branch_with_hash_updates_that_branch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/git/ref/heads/main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ref": "refs/heads/main",
                "object": {"sha": "main-sha"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/git/ref/heads/release%232"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ref": "refs/heads/release#2",
                "object": {"sha": "old-sha"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/repos/octo/app/git/refs/heads/release%232"))
            .and(body_json(json!({"sha": "main-sha", "force": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ref": "refs/heads/release#2",
                "object": {"sha": "main-sha"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        // The truncated name must never be touched.
        Mock::given(path("/repos/octo/app/git/refs/heads/release"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(path("/repos/octo/app/git/ref/heads/release"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let branch = client(&server)
            .ensure_branch(&repo(), "release#2", "main")
            .await
            .unwrap();

        assert_eq!(branch.name, "release#2");
        assert_eq!(branch.target_sha, "main-sha");
        assert!(branch.force);
    }

    #[tokio::test]
    async fn file_path_with_special_characters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/contents/docs/C%23.md"))
            .and(query_param("ref", "main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "file",
                "encoding": "base64",
                "content": "IyBDIw==\n"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/contents/a%3Fb"))
            .and(query_param("ref", "main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "file",
                "encoding": "utf-8",
                "content": "q"
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let file = client.file_contents(&repo(), "docs/C#.md", "main").await.unwrap();
        assert_eq!(file.content, "# C#");
        assert!(client.file_exists(&repo(), "a?b", "main").await.unwrap());
    }

    #[tokio::test]
    async fn search_keyword_keeps_repository_scope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param(
                "q",
                "C# & more repo:octo/app head:bump type:pr is:open",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 1,
                "items": [{"number": 12}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let numbers = client(&server)
            .search_pull_requests(
                "https://github.com/octo/app",
                "bump",
                PullRequestStatus::Open,
                Some("C# & more"),
                None,
            )
            .await
            .unwrap();
        assert_eq!(numbers, vec![12]);
    }
}

mod pull_requests {
    use super::*;

    #[tokio::test]
    async fn create_then_read_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/app/pulls"))
            .and(body_partial_json(json!({"head": "bump", "base": "main", "title": "Bump"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"number": 12})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/pulls/12"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"state": "open", "merged": false})),
            )
            .mount(&server)
            .await;

        let client = client(&server);
        let uri = client
            .create_or_update_pull_request(
                "https://github.com/octo/app",
                &PullRequestUpsert::create("bump", "main").with_title("Bump"),
            )
            .await
            .unwrap();

        assert_eq!(uri, format!("{}/repos/octo/app/pulls/12", server.uri()));
        assert_eq!(
            client.pull_request_status(&uri).await.unwrap(),
            PullRequestStatus::Open
        );
    }

    #[tokio::test]
    async fn search_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param(
                "q",
                "deps repo:octo/app head:bump type:pr is:open author:bot",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 1,
                "items": [{"number": 12}]
            })))
            .mount(&server)
            .await;

        let numbers = client(&server)
            .search_pull_requests(
                "https://github.com/octo/app",
                "bump",
                PullRequestStatus::Open,
                Some("deps"),
                Some("bot"),
            )
            .await
            .unwrap();
        assert_eq!(numbers, vec![12]);
    }

    #[tokio::test]
    async fn merge_keeps_result_when_deletion_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/pulls/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "number": 12,
                "state": "open",
                "merged": false,
                "title": "Bump",
                "body": null,
                "html_url": "https://github.com/octo/app/pull/12",
                "url": "https://api.github.com/repos/octo/app/pulls/12",
                "head": {"ref": "bump", "sha": "h"},
                "base": {"ref": "main", "sha": "b"},
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-01T10:00:00Z"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/octo/app/pulls/12/merge"))
            .and(body_json(json!({"merge_method": "squash", "sha": "h"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "merged": true,
                "sha": "m1",
                "message": "Pull Request successfully merged"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/repos/octo/app/git/refs/heads/bump"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({"message": "Reference does not exist"})),
            )
            .mount(&server)
            .await;

        let pr = format!("{}/repos/octo/app/pulls/12", server.uri());
        let options = MergeOptions {
            commit_to_merge: Some("h".into()),
            squash_merge: true,
            delete_source_branch: true,
            commit_message: None,
        };
        let outcome = client(&server).merge_pull_request(&pr, &options).await.unwrap();

        assert_eq!(outcome.sha, "m1");
        assert!(matches!(
            outcome.branch_deletion,
            BranchDeletion::Failed { ref branch, .. } if branch == "bump"
        ));
    }
}
