//! Error types for gitpatch-updater.

use thiserror::Error;

use gitpatch_core::ScmError;
use gitpatch_yaml::PatchError;

/// Failure of a content transform.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A YAML key-path edit failed.
    #[error(transparent)]
    Yaml(#[from] PatchError),

    /// Caller-supplied transform failure.
    #[error("{0}")]
    Custom(String),
}

impl TransformError {
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

/// All errors that can arise from an update or pull request operation.
///
/// Every variant except [`UpdateError::Scm`] and
/// [`UpdateError::NothingToRemove`] names the step that failed.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Reading the current file failed. Surfaced unchanged, including
    /// NotFound when the request neither creates nor removes the file.
    #[error(transparent)]
    Scm(ScmError),

    #[error("removing a non-existing file {path} in branch {branch} is not necessary")]
    NothingToRemove { path: String, branch: String },

    #[error("failed to apply update: {0}")]
    Transform(#[from] TransformError),

    #[error("failed to get branch head: {0}")]
    BranchHead(#[source] ScmError),

    #[error("failed to create branch: {0}")]
    CreateBranch(#[source] ScmError),

    #[error("failed to update file: {0}")]
    WriteFile(#[source] ScmError),

    #[error("failed to delete file: {0}")]
    DeleteFile(#[source] ScmError),

    #[error("failed to create a pull request: {0}")]
    CreatePullRequest(#[source] ScmError),
}

impl UpdateError {
    /// The upstream error behind this failure, if any.
    pub fn scm_error(&self) -> Option<&ScmError> {
        match self {
            UpdateError::Scm(e)
            | UpdateError::BranchHead(e)
            | UpdateError::CreateBranch(e)
            | UpdateError::WriteFile(e)
            | UpdateError::DeleteFile(e)
            | UpdateError::CreatePullRequest(e) => Some(e),
            UpdateError::NothingToRemove { .. } | UpdateError::Transform(_) => None,
        }
    }
}
