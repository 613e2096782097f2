//! git::tree
//!
//! Tree and blob construction, and recursive tree reads.
//!
//! New trees are always layered on a `base_tree`, so a change set only
//! lists the entries it touches. Reads use the provider's recursive tree
//! listing, which is refused outright when the provider truncates it.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument, warn};

use super::types::{
    compact_base64, ContentEncoding, FileMode, FileOperation, GitFile, TreeEntryType, TreeNode,
};
use crate::client::GitHubClient;
use crate::error::GitError;
use crate::remote::RemoteRequest;
use crate::uri::RepositoryId;

/// Mode of a subtree entry.
const TREE_MODE: &str = "040000";

impl GitHubClient {
    /// Upload one blob and return its sha.
    pub async fn create_blob(&self, repo: &RepositoryId, file: &GitFile) -> Result<String, GitError> {
        let created: ShaOnly = self
            .send(RemoteRequest::post(
                repo.api_path("git/blobs"),
                json!({ "content": file.content, "encoding": file.encoding.as_str() }),
            ))
            .await?;
        Ok(created.sha)
    }

    /// Build a tree on top of `base_tree_sha` with `files` applied.
    ///
    /// Blobs are created one at a time in input order; the first failure
    /// aborts before the tree is written. Deleted files create no blob.
    #[instrument(skip_all, fields(repo = %repo, base_tree = %base_tree_sha, files = files.len()))]
    pub async fn build_commit_tree(
        &self,
        repo: &RepositoryId,
        files: &[GitFile],
        base_tree_sha: &str,
    ) -> Result<String, GitError> {
        if base_tree_sha.is_empty() {
            return Err(GitError::InvalidArgument("base tree sha is empty".into()));
        }

        let mut entries = Vec::with_capacity(files.len());
        for file in files {
            let sha = if file.is_delete() {
                None
            } else {
                Some(self.create_blob(repo, file).await?)
            };
            entries.push(NewTreeEntry {
                path: file.path.clone(),
                mode: file.mode.as_str(),
                kind: "blob",
                sha,
            });
        }

        let tree: ShaOnly = self
            .send(RemoteRequest::post(
                repo.api_path("git/trees"),
                json!({ "base_tree": base_tree_sha, "tree": entries }),
            ))
            .await?;
        debug!(tree = %tree.sha, "created tree");
        Ok(tree.sha)
    }

    /// Direct children of a tree.
    pub async fn get_tree(&self, repo: &RepositoryId, tree_sha: &str) -> Result<Vec<TreeNode>, GitError> {
        let tree: GitHubTree = self
            .send(RemoteRequest::get(repo.api_path(&format!("git/trees/{}", tree_sha))))
            .await
            .map_err(|e| e.located(tree_sha, repo, tree_sha))?;
        Ok(tree.tree)
    }

    /// Find the tree at `path` within a commit.
    ///
    /// Segments are `/`-separated and empty segments are ignored, so an
    /// empty path yields the commit's root tree.
    #[instrument(skip_all, fields(repo = %repo, commit = %commit_sha, path = %path))]
    pub async fn resolve_tree_at_path(
        &self,
        repo: &RepositoryId,
        commit_sha: &str,
        path: &str,
    ) -> Result<TreeNode, GitError> {
        let commit = self.get_commit(repo, commit_sha).await?;
        let mut current = TreeNode {
            path: String::new(),
            sha: commit.tree_sha,
            kind: TreeEntryType::Tree,
            mode: TREE_MODE.to_string(),
        };

        for segment in path_segments(path) {
            let children = self.get_tree(repo, &current.sha).await?;
            current = select_subtree(children, segment)
                .ok_or_else(|| GitError::not_found(path, repo, commit_sha))?;
        }

        Ok(current)
    }

    /// Every blob under a tree, with content, paths prefixed by `prefix`.
    ///
    /// # Errors
    ///
    /// `GitError::Unsupported` when the provider truncates the listing.
    #[instrument(skip_all, fields(repo = %repo, tree = %tree_sha))]
    pub async fn expand_tree_recursive(
        &self,
        repo: &RepositoryId,
        tree_sha: &str,
        prefix: &str,
    ) -> Result<Vec<GitFile>, GitError> {
        let tree: GitHubTree = self
            .send(
                RemoteRequest::get(repo.api_path(&format!("git/trees/{}", tree_sha)))
                    .with_query("recursive", "1"),
            )
            .await
            .map_err(|e| e.located(tree_sha, repo, tree_sha))?;

        if tree.truncated {
            warn!(entries = tree.tree.len(), "recursive tree listing truncated");
            return Err(GitError::Unsupported(format!(
                "tree {} in {} is too large to list recursively",
                tree_sha, repo
            )));
        }

        let mut files = Vec::new();
        for node in tree.tree.into_iter().filter(|n| n.kind == TreeEntryType::Blob) {
            let blob = self.get_blob(repo, &node.sha).await?;
            files.push(GitFile {
                path: join_path(prefix, &node.path),
                content: blob.content,
                encoding: blob.encoding,
                mode: FileMode::parse(&node.mode).unwrap_or_default(),
                operation: FileOperation::Upsert,
            });
        }

        debug!(files = files.len(), "expanded tree");
        Ok(files)
    }

    /// All files under `path` at a commit, with repository-relative paths.
    pub async fn files_at_path(
        &self,
        repo: &RepositoryId,
        commit_sha: &str,
        path: &str,
    ) -> Result<Vec<GitFile>, GitError> {
        let tree = self.resolve_tree_at_path(repo, commit_sha, path).await?;
        let prefix = path_segments(path).collect::<Vec<_>>().join("/");
        self.expand_tree_recursive(repo, &tree.sha, &prefix).await
    }

    /// Blob content as the provider returns it.
    ///
    /// Base64 payloads have their line wrapping removed.
    pub async fn get_blob(&self, repo: &RepositoryId, sha: &str) -> Result<BlobContent, GitError> {
        let blob: GitHubBlob = self
            .send(RemoteRequest::get(repo.api_path(&format!("git/blobs/{}", sha))))
            .await
            .map_err(|e| e.located(sha, repo, sha))?;

        let encoding = ContentEncoding::parse(&blob.encoding).ok_or_else(|| GitError::Decode {
            context: format!("blob {}", sha),
            message: format!("unknown encoding '{}'", blob.encoding),
        })?;
        let content = match encoding {
            ContentEncoding::Base64 => compact_base64(&blob.content),
            ContentEncoding::Utf8 => blob.content,
        };
        Ok(BlobContent { content, encoding })
    }
}

/// Blob content and its transport encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobContent {
    pub content: String,
    pub encoding: ContentEncoding,
}

/// Child tree named `segment`, if any. Blobs with that name don't match.
fn select_subtree(children: Vec<TreeNode>, segment: &str) -> Option<TreeNode> {
    children
        .into_iter()
        .find(|n| n.kind == TreeEntryType::Tree && n.path == segment)
}

/// Non-empty `/`-separated segments of a repository path.
fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn join_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", prefix, path)
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Entry of a tree being written. A `null` sha removes the path.
#[derive(Serialize)]
struct NewTreeEntry {
    path: String,
    mode: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    sha: Option<String>,
}

#[derive(Deserialize)]
struct ShaOnly {
    sha: String,
}

#[derive(Deserialize)]
struct GitHubTree {
    #[serde(default)]
    tree: Vec<TreeNode>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct GitHubBlob {
    content: String,
    encoding: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::mock::MockExecutor;
    use crate::remote::{Method, RemoteError};
    use crate::test_support::{client, repo};

    fn node(path: &str, kind: &str, sha: &str) -> serde_json::Value {
        let mode = if kind == "tree" { "040000" } else { "100644" };
        json!({"path": path, "type": kind, "sha": sha, "mode": mode})
    }

    fn commit_json(sha: &str, tree: &str) -> serde_json::Value {
        json!({"sha": sha, "tree": {"sha": tree}, "parents": []})
    }

    mod build {
        use super::*;

        #[tokio::test]
        async fn posts_blobs_then_tree() {
            let exec = MockExecutor::new()
                .on(Method::Post, "repos/o/r/git/blobs", json!({"sha": "b1"}))
                .on(Method::Post, "repos/o/r/git/blobs", json!({"sha": "b2"}))
                .on(Method::Post, "repos/o/r/git/trees", json!({"sha": "t2"}));
            let files = vec![
                GitFile::text("a.txt", "hello"),
                GitFile::binary("bin/run", b"\x7fELF").with_mode(FileMode::Executable),
            ];

            let sha = client(&exec)
                .build_commit_tree(&repo(), &files, "t1")
                .await
                .unwrap();
            assert_eq!(sha, "t2");

            let requests = exec.requests();
            assert_eq!(requests.len(), 3);
            assert_eq!(
                requests[0].body.clone().unwrap(),
                json!({"content": "hello", "encoding": "utf-8"})
            );
            assert_eq!(requests[1].body.as_ref().unwrap()["encoding"], "base64");
            assert_eq!(
                requests[2].body.clone().unwrap(),
                json!({
                    "base_tree": "t1",
                    "tree": [
                        {"path": "a.txt", "mode": "100644", "type": "blob", "sha": "b1"},
                        {"path": "bin/run", "mode": "100755", "type": "blob", "sha": "b2"}
                    ]
                })
            );
        }

        #[tokio::test]
        async fn deleted_files_create_no_blob() {
            let exec = MockExecutor::new()
                .on(Method::Post, "repos/o/r/git/trees", json!({"sha": "t2"}));

            client(&exec)
                .build_commit_tree(&repo(), &[GitFile::deleted("old.txt")], "t1")
                .await
                .unwrap();

            assert_eq!(exec.count(Method::Post, "repos/o/r/git/blobs"), 0);
            let body = exec.requests()[0].body.clone().unwrap();
            assert_eq!(body["tree"][0]["sha"], serde_json::Value::Null);
        }

        #[tokio::test]
        async fn blob_failure_skips_tree() {
            let exec = MockExecutor::new().on_error(
                Method::Post,
                "repos/o/r/git/blobs",
                RemoteError::RateLimited,
            );

            let err = client(&exec)
                .build_commit_tree(&repo(), &[GitFile::text("a", "a")], "t1")
                .await
                .unwrap_err();

            assert!(matches!(err, GitError::Remote(RemoteError::RateLimited)));
            assert_eq!(exec.count(Method::Post, "repos/o/r/git/trees"), 0);
        }

        #[tokio::test]
        async fn empty_base_tree_is_rejected() {
            let exec = MockExecutor::new();
            let err = client(&exec)
                .build_commit_tree(&repo(), &[GitFile::text("a", "a")], "")
                .await
                .unwrap_err();
            assert!(matches!(err, GitError::InvalidArgument(_)));
            assert!(exec.requests().is_empty());
        }
    }

    mod read {
        use super::*;

        #[test]
        fn select_subtree_ignores_blobs() {
            let children: Vec<TreeNode> = serde_json::from_value(json!([
                node("docs", "blob", "x"),
                node("docs", "tree", "y"),
            ]))
            .unwrap();
            assert_eq!(select_subtree(children, "docs").unwrap().sha, "y");
        }

        #[test]
        fn join_path_handles_empty_prefix() {
            assert_eq!(join_path("", "a.txt"), "a.txt");
            assert_eq!(join_path("eng/", "a.txt"), "eng/a.txt");
        }

        #[test]
        fn path_segments_skip_empty() {
            let segments: Vec<&str> = path_segments("/eng//common/").collect();
            assert_eq!(segments, vec!["eng", "common"]);
            assert_eq!(path_segments("/").count(), 0);
        }

        #[tokio::test]
        async fn resolves_nested_path() {
            let exec = MockExecutor::new()
                .on(Method::Get, "repos/o/r/git/commits/c1", commit_json("c1", "root"))
                .on(
                    Method::Get,
                    "repos/o/r/git/trees/root",
                    json!({"sha": "root", "tree": [node("eng", "tree", "eng1"), node("README.md", "blob", "r1")]}),
                )
                .on(
                    Method::Get,
                    "repos/o/r/git/trees/eng1",
                    json!({"sha": "eng1", "tree": [node("common", "tree", "common1")]}),
                );

            let tree = client(&exec)
                .resolve_tree_at_path(&repo(), "c1", "/eng//common/")
                .await
                .unwrap();
            assert_eq!(tree.sha, "common1");
        }

        #[tokio::test]
        async fn empty_path_is_root_tree() {
            let exec = MockExecutor::new()
                .on(Method::Get, "repos/o/r/git/commits/c1", commit_json("c1", "root"));
            let tree = client(&exec)
                .resolve_tree_at_path(&repo(), "c1", "")
                .await
                .unwrap();
            assert_eq!(tree.sha, "root");
            assert_eq!(tree.kind, TreeEntryType::Tree);
        }

        #[tokio::test]
        async fn missing_segment_is_not_found() {
            let exec = MockExecutor::new()
                .on(Method::Get, "repos/o/r/git/commits/c1", commit_json("c1", "root"))
                .on(
                    Method::Get,
                    "repos/o/r/git/trees/root",
                    json!({"sha": "root", "tree": [node("src", "tree", "s")]}),
                );

            let err = client(&exec)
                .resolve_tree_at_path(&repo(), "c1", "docs/api")
                .await
                .unwrap_err();
            match err {
                GitError::NotFound {
                    path,
                    repo,
                    reference,
                } => {
                    assert_eq!(path, "docs/api");
                    assert_eq!(repo, "o/r");
                    assert_eq!(reference, "c1");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[tokio::test]
        async fn truncated_tree_is_unsupported() {
            let exec = MockExecutor::new().on(
                Method::Get,
                "repos/o/r/git/trees/big?recursive=1",
                json!({"sha": "big", "tree": [node("a", "blob", "b1")], "truncated": true}),
            );

            let err = client(&exec)
                .expand_tree_recursive(&repo(), "big", "")
                .await
                .unwrap_err();
            assert!(matches!(err, GitError::Unsupported(_)));
            assert_eq!(exec.count(Method::Get, "repos/o/r/git/blobs/b1"), 0);
        }

        #[tokio::test]
        async fn expands_blobs_with_prefix() {
            let exec = MockExecutor::new()
                .on(
                    Method::Get,
                    "repos/o/r/git/trees/t?recursive=1",
                    json!({
                        "sha": "t",
                        "truncated": false,
                        "tree": [
                            node("sub", "tree", "s1"),
                            node("sub/a.txt", "blob", "b1"),
                            {"path": "run.sh", "type": "blob", "sha": "b2", "mode": "100755"}
                        ]
                    }),
                )
                .on(
                    Method::Get,
                    "repos/o/r/git/blobs/b1",
                    json!({"sha": "b1", "content": "aGVs\nbG8=\n", "encoding": "base64"}),
                )
                .on(
                    Method::Get,
                    "repos/o/r/git/blobs/b2",
                    json!({"sha": "b2", "content": "echo hi", "encoding": "utf-8"}),
                );

            let files = client(&exec)
                .expand_tree_recursive(&repo(), "t", "eng")
                .await
                .unwrap();

            assert_eq!(files.len(), 2);
            assert_eq!(files[0].path, "eng/sub/a.txt");
            assert_eq!(files[0].content, "aGVsbG8=");
            assert_eq!(files[0].encoding, ContentEncoding::Base64);
            assert_eq!(files[0].bytes().unwrap(), b"hello");
            assert_eq!(files[1].path, "eng/run.sh");
            assert_eq!(files[1].mode, FileMode::Executable);
            assert_eq!(files[1].encoding, ContentEncoding::Utf8);
        }

        #[tokio::test]
        async fn files_at_path_prefixes_with_path() {
            let exec = MockExecutor::new()
                .on(Method::Get, "repos/o/r/git/commits/c1", commit_json("c1", "root"))
                .on(
                    Method::Get,
                    "repos/o/r/git/trees/root",
                    json!({"sha": "root", "tree": [node("eng", "tree", "eng1")]}),
                )
                .on(
                    Method::Get,
                    "repos/o/r/git/trees/eng1?recursive=1",
                    json!({"sha": "eng1", "tree": [node("v.props", "blob", "b1")]}),
                )
                .on(
                    Method::Get,
                    "repos/o/r/git/blobs/b1",
                    json!({"content": "<Project/>", "encoding": "utf-8"}),
                );

            let files = client(&exec)
                .files_at_path(&repo(), "c1", "eng/")
                .await
                .unwrap();
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].path, "eng/v.props");
        }

        #[tokio::test]
        async fn files_at_path_normalizes_prefix() {
            let exec = MockExecutor::new()
                .on(Method::Get, "repos/o/r/git/commits/c1", commit_json("c1", "root"))
                .on(
                    Method::Get,
                    "repos/o/r/git/trees/root",
                    json!({"sha": "root", "tree": [node("eng", "tree", "eng1")]}),
                )
                .on(
                    Method::Get,
                    "repos/o/r/git/trees/eng1",
                    json!({"sha": "eng1", "tree": [node("common", "tree", "common1")]}),
                )
                .on(
                    Method::Get,
                    "repos/o/r/git/trees/common1?recursive=1",
                    json!({"sha": "common1", "tree": [node("x.sh", "blob", "b1")]}),
                )
                .on(
                    Method::Get,
                    "repos/o/r/git/blobs/b1",
                    json!({"content": "echo", "encoding": "utf-8"}),
                );

            let files = client(&exec)
                .files_at_path(&repo(), "c1", "/eng//common/")
                .await
                .unwrap();
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].path, "eng/common/x.sh");
        }

        #[tokio::test]
        async fn unknown_blob_encoding_is_decode_error() {
            let exec = MockExecutor::new().on(
                Method::Get,
                "repos/o/r/git/blobs/b1",
                json!({"content": "x", "encoding": "utf-16"}),
            );
            let err = client(&exec).get_blob(&repo(), "b1").await.unwrap_err();
            assert!(matches!(err, GitError::Decode { .. }));
        }
    }
}
