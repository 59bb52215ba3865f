//! # gitpatch-updater
//!
//! Applies a change to a single file in a remote repository, optionally on a
//! freshly generated branch, and opens pull requests.
//!
//! ```rust,no_run
//! use gitpatch_core::{CommitRequest, ScmGateway};
//! use gitpatch_updater::{UpdateYaml, Updater};
//!
//! fn bump<G: ScmGateway>(gateway: G) {
//!     let updater = Updater::new(gateway);
//!     let input = CommitRequest {
//!         repo: "my-org/my-repo".into(),
//!         path: "deploy/values.yaml".into(),
//!         branch: "main".into(),
//!         branch_generate_name: "gitpatch-".into(),
//!         commit_message: "bump image".into(),
//!         ..CommitRequest::default()
//!     };
//!     if let Ok(branch) = updater.apply_update_to_file(&input, &UpdateYaml::new("image.tag", "1.2.3")) {
//!         println!("committed to {branch}");
//!     }
//! }
//! ```

pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod transform;
pub mod updater;

pub use error::{TransformError, UpdateError};
pub use transform::{from_fn, ContentUpdater, RemoveYamlKey, ReplaceContents, UpdateYaml};
pub use updater::{UpdateOutcome, UpdateWarning, Updater};
