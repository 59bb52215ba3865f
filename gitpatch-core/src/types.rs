//! Domain types shared by the updater and gateway bindings.
//!
//! Everything here lives for a single update invocation; the remote
//! repository is the only durable state.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identifies the creator of a git commit (used as author and committer).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

impl Signature {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Configures the commit, and the branch it lands on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
    /// e.g. `my-org/my-repo`
    pub repo: String,
    /// Path of the file relative to the repository root.
    pub path: String,
    /// Base branch, e.g. `main`.
    pub branch: String,
    /// Prefix for the generated branch, e.g. `gitpatch-`.
    pub branch_generate_name: String,
    /// Commit straight to `branch` instead of a generated branch.
    pub disable_pr_creation: bool,
    /// Create the file if it does not exist yet.
    pub create_missing: bool,
    /// Delete the file instead of writing it.
    pub remove_file: bool,
    pub commit_message: String,
    pub signature: Signature,
}

impl CommitRequest {
    /// True if the request may legitimately find the file missing.
    pub fn is_file_op(&self) -> bool {
        self.create_missing || self.remove_file
    }
}

/// Configuration for a pull request to be opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRequest {
    pub repo: String,
    pub title: String,
    pub body: String,
    /// Branch carrying the change. When `None` a fresh name is generated
    /// from `branch_generate_name`.
    pub source_branch: Option<String>,
    /// Branch the change should merge into, e.g. `main`.
    pub target_branch: String,
    pub branch_generate_name: String,
}

// ---------------------------------------------------------------------------
// Gateway payloads
// ---------------------------------------------------------------------------

/// A file as read from a specific revision of a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileContent {
    pub path: String,
    pub data: Vec<u8>,
    /// Blob sha of the content. Empty when the file does not exist.
    pub sha: String,
}

impl FileContent {
    pub fn missing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// A branch tip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: String,
    pub sha: String,
}

/// A single file write or delete on a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange<'a> {
    pub repo: &'a str,
    pub branch: &'a str,
    pub path: &'a str,
    pub message: &'a str,
    /// Optimistic-concurrency token. `None` when no base revision is known.
    pub previous_sha: Option<&'a str>,
    pub signature: &'a Signature,
    pub content: &'a [u8],
}

/// Pull request creation payload sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestInput {
    pub title: String,
    pub body: String,
    pub source: String,
    pub target: String,
}

/// A pull request created upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub link: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
