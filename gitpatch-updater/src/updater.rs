//! Update orchestration.
//!
//! ## `apply_update` step protocol
//!
//! 1. Read the current file from the base branch. NotFound is tolerated only
//!    when the request creates the file; a removal of a missing file fails.
//! 2. Pick the base revision: the file's blob sha, or for a missing file the
//!    branch head (best effort, a failure becomes a warning).
//! 3. Run the content transform.
//! 4. Resolve the base branch head as the fork point.
//! 5. Create a generated branch at that head, unless PR creation is disabled.
//! 6. Write or delete the file on the target branch.
//!
//! The pipeline stops at the first failure. Nothing is mutated before step 5,
//! and a branch created in step 5 is left in place if step 6 fails.

use gitpatch_core::{
    CommitRequest, FileChange, FileContent, NameGenerator, PullRequest, PullRequestInput,
    PullRequestRequest, RandomNames, ScmError, ScmGateway,
};
use thiserror::Error;

use crate::error::UpdateError;
use crate::transform::ContentUpdater;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// A non-fatal problem encountered while applying an update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateWarning {
    /// The file was missing and the branch head could not be read either, so
    /// the write went out without a base revision.
    #[error("unable to get parent sha for branch {branch}: {error}")]
    BaseRevisionUnresolved { branch: String, error: ScmError },
}

/// Result of a successful [`Updater::apply_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Branch the change was committed to.
    pub branch: String,
    /// True if `branch` was created by this update.
    pub created_branch: bool,
    pub warnings: Vec<UpdateWarning>,
}

// ---------------------------------------------------------------------------
// Updater
// ---------------------------------------------------------------------------

/// Applies changes to single files in a remote repository.
///
/// Holds only the gateway and the branch name generator, so one instance can
/// serve concurrent updates when `G` is `Sync`.
pub struct Updater<G> {
    gateway: G,
    names: Box<dyn NameGenerator + Send + Sync>,
}

impl<G: ScmGateway> Updater<G> {
    /// Updater with randomly suffixed branch names.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            names: Box::new(RandomNames::new()),
        }
    }

    /// Replace the branch name generator.
    pub fn with_name_generator<N>(mut self, names: N) -> Self
    where
        N: NameGenerator + Send + Sync + 'static,
    {
        self.names = Box::new(names);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Fetch a file, pass it through `updater` and commit the result,
    /// returning the branch the commit landed on.
    pub fn apply_update_to_file<U>(
        &self,
        input: &CommitRequest,
        updater: &U,
    ) -> Result<String, UpdateError>
    where
        U: ContentUpdater + ?Sized,
    {
        self.apply_update(input, updater).map(|outcome| outcome.branch)
    }

    /// Same pipeline as [`Updater::apply_update_to_file`], also reporting
    /// whether a branch was created and any soft failures.
    #[tracing::instrument(skip_all, fields(repo = %input.repo, path = %input.path, branch = %input.branch))]
    pub fn apply_update<U>(
        &self,
        input: &CommitRequest,
        updater: &U,
    ) -> Result<UpdateOutcome, UpdateError>
    where
        U: ContentUpdater + ?Sized,
    {
        let mut warnings = Vec::new();

        let (current, missing) = match self.gateway.get_file(&input.repo, &input.branch, &input.path)
        {
            Ok(file) => (file, false),
            Err(err) if err.is_not_found() && input.is_file_op() => {
                (FileContent::missing(&input.path), true)
            }
            Err(err) => {
                tracing::info!(error = %err, "failed to get file from repo");
                return Err(UpdateError::Scm(err));
            }
        };

        if missing && input.remove_file {
            return Err(UpdateError::NothingToRemove {
                path: input.path.clone(),
                branch: input.branch.clone(),
            });
        }

        let base_sha = if !current.sha.is_empty() {
            tracing::info!(sha = %current.sha, "got existing file");
            Some(current.sha.clone())
        } else if missing {
            match self.gateway.get_branch_head(&input.repo, &input.branch) {
                Ok(sha) => Some(sha),
                Err(error) => {
                    tracing::warn!(
                        error = %error,
                        "unable to get parent sha for branch, the write may still succeed"
                    );
                    warnings.push(UpdateWarning::BaseRevisionUnresolved {
                        branch: input.branch.clone(),
                        error,
                    });
                    None
                }
            }
        } else {
            None
        };

        let updated = updater.update(&current.data)?;

        let head = self
            .gateway
            .get_branch_head(&input.repo, &input.branch)
            .map_err(UpdateError::BranchHead)?;
        let (branch, created_branch) = self.create_branch_if_necessary(input, &head)?;

        let change = FileChange {
            repo: &input.repo,
            branch: &branch,
            path: &input.path,
            message: &input.commit_message,
            previous_sha: base_sha.as_deref(),
            signature: &input.signature,
            content: &updated,
        };

        if input.remove_file {
            self.gateway
                .delete_file(&change)
                .map_err(UpdateError::DeleteFile)?;
            tracing::info!(target_branch = %branch, "deleted file");
        } else {
            self.gateway
                .update_file(&change)
                .map_err(UpdateError::WriteFile)?;
            tracing::info!(target_branch = %branch, "updated file");
        }

        Ok(UpdateOutcome {
            branch,
            created_branch,
            warnings,
        })
    }

    fn create_branch_if_necessary(
        &self,
        input: &CommitRequest,
        source_sha: &str,
    ) -> Result<(String, bool), UpdateError> {
        if input.disable_pr_creation {
            tracing::info!("PR creation disabled, committing directly to source branch");
            return Ok((input.branch.clone(), false));
        }

        let name = self.names.prefixed_name(&input.branch_generate_name);
        tracing::info!(name = %name, "generating new branch");
        self.gateway
            .create_branch(&input.repo, &name, source_sha)
            .map_err(UpdateError::CreateBranch)?;
        tracing::info!(new_branch = %name, sha = %source_sha, "created branch");
        Ok((name, true))
    }

    /// Open a pull request from `source_branch` (or a freshly generated
    /// name) into `target_branch`. The source branch is not checked.
    #[tracing::instrument(skip_all, fields(repo = %input.repo, target = %input.target_branch))]
    pub fn create_pr(&self, input: &PullRequestRequest) -> Result<PullRequest, UpdateError> {
        let source = match &input.source_branch {
            Some(branch) => branch.clone(),
            None => self.names.prefixed_name(&input.branch_generate_name),
        };
        let request = PullRequestInput {
            title: input.title.clone(),
            body: input.body.clone(),
            source,
            target: input.target_branch.clone(),
        };

        let pr = self
            .gateway
            .create_pull_request(&input.repo, &request)
            .map_err(UpdateError::CreatePullRequest)?;
        tracing::info!(number = pr.number, link = %pr.link, "created pull request");
        Ok(pr)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, MockGateway};
    use crate::transform::{from_fn, RemoveYamlKey, ReplaceContents};
    use crate::TransformError;

    const REPO: &str = "testorg/testrepo";
    const FILE: &str = "environments/test/services/service-a/test.yaml";
    const BRANCH: &str = "main";
    const HEAD: &str = "980a0d5f19a64b4b30a87d4206aade58726b60e3";

    fn stub_names(prefix: &str) -> String {
        format!("{prefix}a")
    }

    fn commit_input() -> CommitRequest {
        CommitRequest {
            repo: REPO.into(),
            path: FILE.into(),
            branch: BRANCH.into(),
            branch_generate_name: "test-branch-".into(),
            commit_message: "just a test commit".into(),
            ..CommitRequest::default()
        }
    }

    fn seeded() -> (MockGateway, String) {
        let m = MockGateway::new();
        let sha = m.add_file_contents(REPO, FILE, BRANCH, b"test:\n  image: old-image\n");
        m.add_branch_head(REPO, BRANCH, HEAD);
        (m, sha)
    }

    #[test]
    fn update_existing_file_on_new_branch() {
        let (m, file_sha) = seeded();
        let updater = Updater::new(&m).with_name_generator(stub_names);

        let branch = updater
            .apply_update_to_file(&commit_input(), &ReplaceContents::new("new content"))
            .expect("update");

        assert_eq!(branch, "test-branch-a");
        assert_eq!(
            m.updated_contents(REPO, FILE, "test-branch-a").as_deref(),
            Some(&b"new content"[..])
        );
        m.assert_branch_created(REPO, "test-branch-a", HEAD);
        let writes = m.updates();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].previous_sha.as_deref(), Some(file_sha.as_str()));
        m.assert_no_pull_requests_created();
    }

    #[test]
    fn missing_file_without_create_surfaces_original_error() {
        let (m, _) = seeded();
        let not_found = ScmError::not_found("failed to get file");
        m.fail_always(Call::GetFile, not_found.clone());
        let updater = Updater::new(&m).with_name_generator(stub_names);

        let err = updater
            .apply_update_to_file(&commit_input(), &ReplaceContents::new("testing"))
            .unwrap_err();

        assert!(matches!(&err, UpdateError::Scm(e) if *e == not_found));
        assert!(m.updates().is_empty());
        m.assert_no_branches_created();
        m.assert_no_pull_requests_created();
    }

    #[test]
    fn non_not_found_read_error_aborts_even_when_creating() {
        let (m, _) = seeded();
        m.fail_always(Call::GetFile, ScmError::from_status("failed to get file", 500, ""));
        let updater = Updater::new(&m).with_name_generator(stub_names);
        let input = CommitRequest {
            create_missing: true,
            ..commit_input()
        };

        let err = updater
            .apply_update_to_file(&input, &ReplaceContents::new("x"))
            .unwrap_err();

        assert_eq!(err.scm_error().and_then(|e| e.status), Some(500));
        assert_eq!(m.calls(), vec![Call::GetFile]);
    }

    #[test]
    fn missing_file_with_create_writes_new_branch() {
        let m = MockGateway::new();
        m.add_branch_head(REPO, BRANCH, HEAD);
        let updater = Updater::new(&m).with_name_generator(stub_names);
        let input = CommitRequest {
            create_missing: true,
            ..commit_input()
        };

        let seen = std::sync::Mutex::new(None);
        let transform = from_fn(|body| {
            *seen.lock().unwrap() = Some(body.to_vec());
            Ok(b"testing".to_vec())
        });
        let outcome = updater.apply_update(&input, &transform).expect("update");

        assert_eq!(outcome.branch, "test-branch-a");
        assert!(outcome.created_branch);
        assert!(outcome.warnings.is_empty());
        assert_eq!(seen.lock().unwrap().as_deref(), Some(&b""[..]));
        assert_eq!(
            m.updated_contents(REPO, FILE, "test-branch-a").as_deref(),
            Some(&b"testing"[..])
        );
        m.assert_branch_created(REPO, "test-branch-a", HEAD);
        assert_eq!(m.updates()[0].previous_sha.as_deref(), Some(HEAD));
    }

    #[test]
    fn missing_file_with_create_survives_failed_parent_lookup() {
        let m = MockGateway::new();
        m.add_branch_head(REPO, BRANCH, HEAD);
        m.fail_next(Call::GetBranchHead, ScmError::from_status("no branch", 409, ""));
        let updater = Updater::new(&m).with_name_generator(stub_names);
        let input = CommitRequest {
            create_missing: true,
            ..commit_input()
        };

        let outcome = updater
            .apply_update(&input, &ReplaceContents::new("testing"))
            .expect("update");

        assert_eq!(outcome.branch, "test-branch-a");
        assert!(matches!(
            outcome.warnings.as_slice(),
            [UpdateWarning::BaseRevisionUnresolved { branch, .. }] if branch == BRANCH
        ));
        assert_eq!(m.updates()[0].previous_sha, None);
    }

    #[test]
    fn removing_missing_file_is_a_logic_error() {
        let m = MockGateway::new();
        m.add_branch_head(REPO, BRANCH, HEAD);
        let updater = Updater::new(&m).with_name_generator(stub_names);
        let input = CommitRequest {
            remove_file: true,
            ..commit_input()
        };

        let err = updater
            .apply_update_to_file(&input, &ReplaceContents::new(""))
            .unwrap_err();

        assert!(matches!(err, UpdateError::NothingToRemove { .. }));
        assert_eq!(
            err.to_string(),
            format!("removing a non-existing file {FILE} in branch main is not necessary")
        );
        assert!(m.deletes().is_empty());
        m.assert_no_branches_created();
    }

    #[test]
    fn remove_existing_file_deletes_on_new_branch() {
        let (m, file_sha) = seeded();
        let updater = Updater::new(&m).with_name_generator(stub_names);
        let input = CommitRequest {
            remove_file: true,
            ..commit_input()
        };

        let branch = updater
            .apply_update_to_file(&input, &ReplaceContents::new(""))
            .expect("delete");

        assert_eq!(branch, "test-branch-a");
        let deletes = m.deletes();
        assert_eq!(deletes.len(), 1);
        assert_eq!(deletes[0].branch, "test-branch-a");
        assert_eq!(deletes[0].previous_sha.as_deref(), Some(file_sha.as_str()));
        assert!(m.updates().is_empty());
    }

    #[test]
    fn key_removal_transform() {
        let (m, _) = seeded();
        let updater = Updater::new(&m).with_name_generator(stub_names);

        let branch = updater
            .apply_update_to_file(&commit_input(), &RemoveYamlKey::new("test.image"))
            .expect("update");

        assert_eq!(
            m.updated_contents(REPO, FILE, &branch).as_deref(),
            Some(&b"test: {}\n"[..])
        );
        m.assert_branch_created(REPO, "test-branch-a", HEAD);
    }

    #[test]
    fn disabled_pr_creation_commits_to_base_branch() {
        let (m, _) = seeded();
        let updater = Updater::new(&m).with_name_generator(stub_names);
        let input = CommitRequest {
            disable_pr_creation: true,
            ..commit_input()
        };

        let outcome = updater
            .apply_update(&input, &ReplaceContents::new("direct"))
            .expect("update");

        assert_eq!(outcome.branch, BRANCH);
        assert!(!outcome.created_branch);
        m.assert_no_branches_created();
        assert_eq!(
            m.updated_contents(REPO, FILE, BRANCH).as_deref(),
            Some(&b"direct"[..])
        );
    }

    #[test]
    fn transform_failure_aborts_before_mutation() {
        let (m, _) = seeded();
        let updater = Updater::new(&m).with_name_generator(stub_names);
        let failing = from_fn(|_| Err(TransformError::custom("bad input")));

        let err = updater
            .apply_update_to_file(&commit_input(), &failing)
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to apply update: bad input");
        m.assert_no_branches_created();
        assert!(m.updates().is_empty());
    }

    #[test]
    fn branch_head_failure_is_fatal() {
        let (m, _) = seeded();
        m.fail_always(Call::GetBranchHead, ScmError::from_status("no head", 502, ""));
        let updater = Updater::new(&m).with_name_generator(stub_names);

        let err = updater
            .apply_update_to_file(&commit_input(), &ReplaceContents::new("x"))
            .unwrap_err();

        assert!(matches!(err, UpdateError::BranchHead(_)));
        assert!(err.to_string().starts_with("failed to get branch head: "));
        m.assert_no_branches_created();
    }

    #[test]
    fn branch_creation_failure() {
        let (m, _) = seeded();
        m.fail_always(Call::CreateBranch, ScmError::transport("can't create branch"));
        let updater = Updater::new(&m).with_name_generator(stub_names);

        let err = updater
            .apply_update_to_file(&commit_input(), &ReplaceContents::new("testing"))
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to create branch: can't create branch");
        assert_eq!(m.updated_contents(REPO, FILE, "test-branch-a"), None);
        m.assert_no_branches_created();
        m.assert_no_pull_requests_created();
    }

    #[test]
    fn write_failure_leaves_created_branch() {
        let (m, _) = seeded();
        m.fail_always(Call::UpdateFile, ScmError::from_status("conflict", 409, ""));
        let updater = Updater::new(&m).with_name_generator(stub_names);

        let err = updater
            .apply_update_to_file(&commit_input(), &ReplaceContents::new("x"))
            .unwrap_err();

        assert!(matches!(err, UpdateError::WriteFile(_)));
        m.assert_branch_created(REPO, "test-branch-a", HEAD);
    }

    #[test]
    fn delete_failure_leaves_created_branch() {
        let (m, _) = seeded();
        m.fail_always(Call::DeleteFile, ScmError::from_status("conflict", 409, "sha mismatch"));
        let updater = Updater::new(&m).with_name_generator(stub_names);
        let input = CommitRequest {
            remove_file: true,
            ..commit_input()
        };

        let err = updater
            .apply_update_to_file(&input, &ReplaceContents::new(""))
            .unwrap_err();

        assert!(matches!(err, UpdateError::DeleteFile(ref e) if e.status == Some(409)));
        assert!(err.to_string().starts_with("failed to delete file: conflict"), "{err}");
        m.assert_branch_created(REPO, "test-branch-a", HEAD);
        assert!(m.deletes().is_empty());
        assert!(m.updates().is_empty());
    }

    #[test]
    fn create_pull_request() {
        let m = MockGateway::new();
        let updater = Updater::new(&m).with_name_generator(stub_names);
        let input = PullRequestRequest {
            repo: REPO.into(),
            title: "This is a test PR".into(),
            body: "This is the body".into(),
            source_branch: Some("test-branch-a".into()),
            target_branch: BRANCH.into(),
            branch_generate_name: "test-branch-".into(),
        };

        let pr = updater.create_pr(&input).expect("pr");

        m.assert_pull_request_created(
            REPO,
            &PullRequestInput {
                title: input.title.clone(),
                body: input.body.clone(),
                source: "test-branch-a".into(),
                target: BRANCH.into(),
            },
        );
        assert_eq!(pr.link, "https://example.com/pull-request/1");
        assert_eq!(pr.number, 1);
    }

    #[test]
    fn create_pull_request_generates_source_when_unset() {
        let m = MockGateway::new();
        let updater = Updater::new(&m).with_name_generator(stub_names);
        let input = PullRequestRequest {
            repo: REPO.into(),
            title: "t".into(),
            target_branch: BRANCH.into(),
            branch_generate_name: "gen-".into(),
            ..PullRequestRequest::default()
        };

        updater.create_pr(&input).expect("pr");

        let prs = m.pull_requests();
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].1.source, "gen-a");
    }

    #[test]
    fn create_pull_request_handles_errors() {
        let m = MockGateway::new();
        m.fail_always(
            Call::CreatePullRequest,
            ScmError::transport("can't create pull-request"),
        );
        let updater = Updater::new(&m).with_name_generator(stub_names);

        let err = updater
            .create_pr(&PullRequestRequest::default())
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to create a pull request: can't create pull-request"
        );
    }
}
