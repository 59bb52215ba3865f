//! The capability set the updater needs from a remote repository host.
//!
//! Bindings (GitHub REST, in-memory mock) implement [`ScmGateway`]. Calls are
//! blocking and single-shot; timeouts and transport policy belong to the
//! binding.

use std::sync::Arc;

use crate::error::ScmError;
use crate::types::{FileChange, FileContent, PullRequest, PullRequestInput};

pub trait ScmGateway {
    /// Read `path` at `reference` (a branch name or sha).
    ///
    /// A missing file is reported as an error whose kind is
    /// [`crate::ScmErrorKind::NotFound`].
    fn get_file(&self, repo: &str, reference: &str, path: &str) -> Result<FileContent, ScmError>;

    /// Head sha of `branch`.
    fn get_branch_head(&self, repo: &str, branch: &str) -> Result<String, ScmError>;

    /// Create `branch` pointing at `sha`.
    fn create_branch(&self, repo: &str, branch: &str, sha: &str) -> Result<(), ScmError>;

    /// Create or update a file on a branch.
    fn update_file(&self, change: &FileChange<'_>) -> Result<(), ScmError>;

    fn delete_file(&self, change: &FileChange<'_>) -> Result<(), ScmError>;

    fn create_pull_request(
        &self,
        repo: &str,
        input: &PullRequestInput,
    ) -> Result<PullRequest, ScmError>;
}

impl<G: ScmGateway + ?Sized> ScmGateway for &G {
    fn get_file(&self, repo: &str, reference: &str, path: &str) -> Result<FileContent, ScmError> {
        (**self).get_file(repo, reference, path)
    }

    fn get_branch_head(&self, repo: &str, branch: &str) -> Result<String, ScmError> {
        (**self).get_branch_head(repo, branch)
    }

    fn create_branch(&self, repo: &str, branch: &str, sha: &str) -> Result<(), ScmError> {
        (**self).create_branch(repo, branch, sha)
    }

    fn update_file(&self, change: &FileChange<'_>) -> Result<(), ScmError> {
        (**self).update_file(change)
    }

    fn delete_file(&self, change: &FileChange<'_>) -> Result<(), ScmError> {
        (**self).delete_file(change)
    }

    fn create_pull_request(
        &self,
        repo: &str,
        input: &PullRequestInput,
    ) -> Result<PullRequest, ScmError> {
        (**self).create_pull_request(repo, input)
    }
}

impl<G: ScmGateway + ?Sized> ScmGateway for Arc<G> {
    fn get_file(&self, repo: &str, reference: &str, path: &str) -> Result<FileContent, ScmError> {
        (**self).get_file(repo, reference, path)
    }

    fn get_branch_head(&self, repo: &str, branch: &str) -> Result<String, ScmError> {
        (**self).get_branch_head(repo, branch)
    }

    fn create_branch(&self, repo: &str, branch: &str, sha: &str) -> Result<(), ScmError> {
        (**self).create_branch(repo, branch, sha)
    }

    fn update_file(&self, change: &FileChange<'_>) -> Result<(), ScmError> {
        (**self).update_file(change)
    }

    fn delete_file(&self, change: &FileChange<'_>) -> Result<(), ScmError> {
        (**self).delete_file(change)
    }

    fn create_pull_request(
        &self,
        repo: &str,
        input: &PullRequestInput,
    ) -> Result<PullRequest, ScmError> {
        (**self).create_pull_request(repo, input)
    }
}
