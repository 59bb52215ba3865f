//! gitpatch core library: request types, the SCM gateway contract, error
//! classification and branch name generation.
//!
//! Public API surface:
//! - [`types`]: commit / pull request inputs and remote file state
//! - [`gateway`]: [`ScmGateway`], the capability set consumed by the updater
//! - [`error`]: [`ScmError`] and the not-found classifier
//! - [`names`]: [`NameGenerator`] and [`RandomNames`]

pub mod error;
pub mod gateway;
pub mod names;
pub mod types;

pub use error::{is_not_found, ScmError, ScmErrorKind};
pub use gateway::ScmGateway;
pub use names::{NameGenerator, RandomNames};
pub use types::{
    BranchRef, CommitRequest, FileChange, FileContent, PullRequest, PullRequestInput,
    PullRequestRequest, Signature,
};
