//! git::types
//!
//! Value types for files, tree entries, commits, and branch refs.
//!
//! The engine never holds tree or commit content, only provider object
//! ids. File content is carried as text in the declared [`ContentEncoding`].

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::GitError;

/// How a file's content is transmitted to and from the blob API.
///
/// The wire tokens are exactly `"utf-8"` and `"base64"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContentEncoding {
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "base64")]
    Base64,
}

impl ContentEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentEncoding::Utf8 => "utf-8",
            ContentEncoding::Base64 => "base64",
        }
    }

    /// Parse a wire token. Matching is case-sensitive.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "utf-8" => Some(ContentEncoding::Utf8),
            "base64" => Some(ContentEncoding::Base64),
            _ => None,
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Git file mode of a blob entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// `100644`
    #[default]
    Blob,
    /// `100755`
    Executable,
    /// `120000`
    Symlink,
}

impl FileMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileMode::Blob => "100644",
            FileMode::Executable => "100755",
            FileMode::Symlink => "120000",
        }
    }

    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "100644" => Some(FileMode::Blob),
            "100755" => Some(FileMode::Executable),
            "120000" => Some(FileMode::Symlink),
            _ => None,
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a commit does with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileOperation {
    /// Create or replace the file with the given content.
    #[default]
    Upsert,
    /// Remove the file from the tree.
    Delete,
}

/// A file to write in a commit, or a file read back from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitFile {
    /// Repository-relative path, `/`-separated
    pub path: String,
    /// Content in `encoding`
    pub content: String,
    pub encoding: ContentEncoding,
    pub mode: FileMode,
    pub operation: FileOperation,
}

impl GitFile {
    /// A regular text file.
    pub fn text(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            encoding: ContentEncoding::Utf8,
            mode: FileMode::Blob,
            operation: FileOperation::Upsert,
        }
    }

    /// A binary file; the bytes are base64-encoded for transport.
    pub fn binary(path: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            path: path.into(),
            content: STANDARD.encode(bytes),
            encoding: ContentEncoding::Base64,
            mode: FileMode::Blob,
            operation: FileOperation::Upsert,
        }
    }

    /// Marks `path` for removal.
    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: String::new(),
            encoding: ContentEncoding::Utf8,
            mode: FileMode::Blob,
            operation: FileOperation::Delete,
        }
    }

    pub fn with_mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn is_delete(&self) -> bool {
        self.operation == FileOperation::Delete
    }

    /// Raw bytes of the file.
    ///
    /// # Errors
    ///
    /// Returns `GitError::Decode` if base64 content is malformed.
    pub fn bytes(&self) -> Result<Vec<u8>, GitError> {
        match self.encoding {
            ContentEncoding::Utf8 => Ok(self.content.as_bytes().to_vec()),
            ContentEncoding::Base64 => decode_base64(&self.content).map_err(|message| {
                GitError::Decode {
                    context: self.path.clone(),
                    message,
                }
            }),
        }
    }
}

/// Decode base64 as the provider returns it (wrapped at 60 columns).
pub(crate) fn decode_base64(content: &str) -> Result<Vec<u8>, String> {
    STANDARD
        .decode(compact_base64(content))
        .map_err(|e| e.to_string())
}

/// Remove the line wrapping the provider puts into base64 payloads.
pub(crate) fn compact_base64(content: &str) -> String {
    content.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

/// Kind of object a tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryType {
    Blob,
    Tree,
    /// Submodule
    Commit,
}

/// A provider-side tree entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeNode {
    pub path: String,
    pub sha: String,
    #[serde(rename = "type")]
    pub kind: TreeEntryType,
    pub mode: String,
}

/// An immutable commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub sha: String,
    pub tree_sha: String,
    pub parent_shas: Vec<String>,
}

/// A branch pointer as last written by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    /// Short branch name, without `refs/heads/`
    pub name: String,
    pub target_sha: String,
    /// Whether the write was a force update
    pub force: bool,
}

impl BranchRef {
    pub fn ref_name(&self) -> String {
        format!("refs/heads/{}", self.name)
    }
}
