//! git::files
//!
//! Single-file reads through the contents endpoint.

use futures_util::future::try_join_all;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::types::{compact_base64, decode_base64, ContentEncoding, FileMode, FileOperation, GitFile};
use crate::client::GitHubClient;
use crate::error::GitError;
use crate::remote::RemoteRequest;
use crate::uri::RepositoryId;

impl GitHubClient {
    /// Content of the file at `path` as of `reference` (branch or sha).
    ///
    /// Text content comes back as [`ContentEncoding::Utf8`]; content that
    /// isn't valid UTF-8 stays base64.
    ///
    /// # Errors
    ///
    /// - `NotFound` if nothing exists at `path`
    /// - `InvalidArgument` if `path` is a directory
    /// - `Unsupported` if the provider withholds the content, as it does
    ///   for files over 1 MB (`"encoding": "none"`)
    #[instrument(skip_all, fields(repo = %repo, path = %path, reference = %reference))]
    pub async fn file_contents(
        &self,
        repo: &RepositoryId,
        path: &str,
        reference: &str,
    ) -> Result<GitFile, GitError> {
        let path = path.trim_start_matches('/');
        let request = RemoteRequest::get(repo.api_path(&format!("contents/{}", path)))
            .with_query("ref", reference);
        let context = request.to_string();
        let value: Value = self
            .send(request)
            .await
            .map_err(|e| e.located(path, repo, reference))?;

        if value.is_array() {
            return Err(GitError::InvalidArgument(format!(
                "'{}' is a directory",
                path
            )));
        }
        let entry: ContentEntry = serde_json::from_value(value).map_err(|e| GitError::Decode {
            context,
            message: e.to_string(),
        })?;

        let (content, encoding) = match entry.encoding.as_deref() {
            Some("base64") => {
                let bytes = decode_base64(&entry.content).map_err(|message| GitError::Decode {
                    context: path.to_string(),
                    message,
                })?;
                match String::from_utf8(bytes) {
                    Ok(text) => (text, ContentEncoding::Utf8),
                    Err(_) => (compact_base64(&entry.content), ContentEncoding::Base64),
                }
            }
            None | Some("utf-8") => (entry.content, ContentEncoding::Utf8),
            Some(other) => {
                return Err(GitError::Unsupported(format!(
                    "contents of '{}' at {} in {} are not returned inline (encoding '{}', {} bytes)",
                    path, reference, repo, other, entry.size
                )))
            }
        };

        Ok(GitFile {
            path: path.to_string(),
            content,
            encoding,
            mode: FileMode::Blob,
            operation: FileOperation::Upsert,
        })
    }

    /// Whether a file exists at `path`. A 404 is `false`.
    pub async fn file_exists(
        &self,
        repo: &RepositoryId,
        path: &str,
        reference: &str,
    ) -> Result<bool, GitError> {
        match self.file_contents(repo, path, reference).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch several files at one commit concurrently.
    ///
    /// Results are in input order. The first failure fails the whole
    /// batch; no partial list is returned.
    #[instrument(skip_all, fields(repo = %repo, commit = %commit_sha, files = paths.len()))]
    pub async fn files_for_commit<S: AsRef<str>>(
        &self,
        repo: &RepositoryId,
        commit_sha: &str,
        paths: &[S],
    ) -> Result<Vec<GitFile>, GitError> {
        let files = try_join_all(
            paths
                .iter()
                .map(|p| self.file_contents(repo, p.as_ref(), commit_sha)),
        )
        .await?;
        debug!(fetched = files.len(), "fetched files");
        Ok(files)
    }
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

#[derive(Deserialize)]
struct ContentEntry {
    #[serde(default)]
    content: String,
    encoding: Option<String>,
    #[serde(default)]
    size: u64,
}
