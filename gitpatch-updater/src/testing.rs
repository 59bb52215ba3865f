//! In-memory [`ScmGateway`] for tests.
//!
//! Records every call, keeps file contents per `(repo, ref, path)` and lets a
//! test inject failures either once or for every call to a method.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use gitpatch_core::{
    BranchRef, FileChange, FileContent, PullRequest, PullRequestInput, ScmError, ScmGateway,
    Signature,
};

/// Gateway methods, used for the call log and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    GetFile,
    GetBranchHead,
    CreateBranch,
    UpdateFile,
    DeleteFile,
    CreatePullRequest,
}

/// An owned copy of a [`FileChange`] received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedChange {
    pub repo: String,
    pub branch: String,
    pub path: String,
    pub message: String,
    pub previous_sha: Option<String>,
    pub signature: Signature,
    pub content: Vec<u8>,
}

impl From<&FileChange<'_>> for RecordedChange {
    fn from(c: &FileChange<'_>) -> Self {
        Self {
            repo: c.repo.to_owned(),
            branch: c.branch.to_owned(),
            path: c.path.to_owned(),
            message: c.message.to_owned(),
            previous_sha: c.previous_sha.map(str::to_owned),
            signature: c.signature.clone(),
            content: c.content.to_vec(),
        }
    }
}

type FileKey = (String, String, String);

#[derive(Debug, Default)]
struct State {
    files: HashMap<FileKey, FileContent>,
    heads: HashMap<(String, String), String>,
    created_branches: Vec<(String, BranchRef)>,
    updates: Vec<RecordedChange>,
    deletes: Vec<RecordedChange>,
    pull_requests: Vec<(String, PullRequestInput)>,
    calls: Vec<Call>,
    fail_next: HashMap<Call, VecDeque<ScmError>>,
    fail_always: HashMap<Call, ScmError>,
    next_sha: u64,
}

impl State {
    fn enter(&mut self, call: Call) -> Result<(), ScmError> {
        self.calls.push(call);
        if let Some(err) = self.fail_next.get_mut(&call).and_then(VecDeque::pop_front) {
            return Err(err);
        }
        match self.fail_always.get(&call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn mint_sha(&mut self) -> String {
        self.next_sha += 1;
        format!("{:040x}", self.next_sha)
    }
}

fn key(repo: &str, reference: &str, path: &str) -> FileKey {
    (repo.to_owned(), reference.to_owned(), path.to_owned())
}

#[derive(Debug, Default)]
pub struct MockGateway {
    state: Mutex<State>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    // -- setup ---------------------------------------------------------------

    /// Store a file at `reference` and return the blob sha assigned to it.
    pub fn add_file_contents(&self, repo: &str, path: &str, reference: &str, data: &[u8]) -> String {
        let mut state = self.state();
        let sha = state.mint_sha();
        state.files.insert(
            key(repo, reference, path),
            FileContent {
                path: path.to_owned(),
                data: data.to_vec(),
                sha: sha.clone(),
            },
        );
        sha
    }

    pub fn add_branch_head(&self, repo: &str, branch: &str, sha: &str) {
        self.state()
            .heads
            .insert((repo.to_owned(), branch.to_owned()), sha.to_owned());
    }

    /// Fail the next call to `call` with `err`. Queued failures are consumed
    /// in order.
    pub fn fail_next(&self, call: Call, err: ScmError) {
        self.state().fail_next.entry(call).or_default().push_back(err);
    }

    /// Fail every call to `call` with `err`.
    pub fn fail_always(&self, call: Call, err: ScmError) {
        self.state().fail_always.insert(call, err);
    }

    // -- inspection ----------------------------------------------------------

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Content written to `path` on `branch` by `update_file`, if any.
    pub fn updated_contents(&self, repo: &str, path: &str, branch: &str) -> Option<Vec<u8>> {
        self.state()
            .updates
            .iter()
            .rev()
            .find(|c| c.repo == repo && c.path == path && c.branch == branch)
            .map(|c| c.content.clone())
    }

    pub fn updates(&self) -> Vec<RecordedChange> {
        self.state().updates.clone()
    }

    pub fn deletes(&self) -> Vec<RecordedChange> {
        self.state().deletes.clone()
    }

    pub fn created_branches(&self) -> Vec<(String, BranchRef)> {
        self.state().created_branches.clone()
    }

    pub fn pull_requests(&self) -> Vec<(String, PullRequestInput)> {
        self.state().pull_requests.clone()
    }

    // -- assertions ----------------------------------------------------------

    pub fn assert_branch_created(&self, repo: &str, name: &str, sha: &str) {
        let expected = (
            repo.to_owned(),
            BranchRef {
                name: name.to_owned(),
                sha: sha.to_owned(),
            },
        );
        let created = self.created_branches();
        assert!(
            created.contains(&expected),
            "branch {name} at {sha} not created in {repo}; created: {created:?}"
        );
    }

    pub fn assert_no_branches_created(&self) {
        let created = self.created_branches();
        assert!(created.is_empty(), "branches were created: {created:?}");
    }

    pub fn assert_pull_request_created(&self, repo: &str, input: &PullRequestInput) {
        let prs = self.pull_requests();
        assert!(
            prs.contains(&(repo.to_owned(), input.clone())),
            "pull request {input:?} not created in {repo}; created: {prs:?}"
        );
    }

    pub fn assert_no_pull_requests_created(&self) {
        let prs = self.pull_requests();
        assert!(prs.is_empty(), "pull requests were created: {prs:?}");
    }
}

impl ScmGateway for MockGateway {
    fn get_file(&self, repo: &str, reference: &str, path: &str) -> Result<FileContent, ScmError> {
        let mut state = self.state();
        state.enter(Call::GetFile)?;
        state
            .files
            .get(&key(repo, reference, path))
            .cloned()
            .ok_or_else(|| {
                ScmError::not_found(format!(
                    "failed to get file {path} from repo {repo} ref {reference}"
                ))
            })
    }

    fn get_branch_head(&self, repo: &str, branch: &str) -> Result<String, ScmError> {
        let mut state = self.state();
        state.enter(Call::GetBranchHead)?;
        state
            .heads
            .get(&(repo.to_owned(), branch.to_owned()))
            .cloned()
            .ok_or_else(|| ScmError::not_found(format!("branch {branch} not found in {repo}")))
    }

    fn create_branch(&self, repo: &str, branch: &str, sha: &str) -> Result<(), ScmError> {
        let mut state = self.state();
        state.enter(Call::CreateBranch)?;
        let head_key = (repo.to_owned(), branch.to_owned());
        if state.heads.contains_key(&head_key) {
            return Err(ScmError::from_status(
                format!("failed to create branch {branch} in {repo}"),
                422,
                "Reference already exists",
            ));
        }
        state.heads.insert(head_key, sha.to_owned());
        state.created_branches.push((
            repo.to_owned(),
            BranchRef {
                name: branch.to_owned(),
                sha: sha.to_owned(),
            },
        ));
        Ok(())
    }

    fn update_file(&self, change: &FileChange<'_>) -> Result<(), ScmError> {
        let mut state = self.state();
        state.enter(Call::UpdateFile)?;
        let file_key = key(change.repo, change.branch, change.path);
        if let (Some(existing), Some(previous)) = (state.files.get(&file_key), change.previous_sha)
        {
            if existing.sha != previous {
                return Err(ScmError::from_status(
                    format!(
                        "failed to update file {} in repo {} branch {}",
                        change.path, change.repo, change.branch
                    ),
                    409,
                    format!("{} does not match {}", previous, existing.sha),
                ));
            }
        }
        let sha = state.mint_sha();
        state.files.insert(
            file_key,
            FileContent {
                path: change.path.to_owned(),
                data: change.content.to_vec(),
                sha,
            },
        );
        state.updates.push(change.into());
        Ok(())
    }

    fn delete_file(&self, change: &FileChange<'_>) -> Result<(), ScmError> {
        let mut state = self.state();
        state.enter(Call::DeleteFile)?;
        state
            .files
            .remove(&key(change.repo, change.branch, change.path));
        state.deletes.push(change.into());
        Ok(())
    }

    fn create_pull_request(
        &self,
        repo: &str,
        input: &PullRequestInput,
    ) -> Result<PullRequest, ScmError> {
        let mut state = self.state();
        state.enter(Call::CreatePullRequest)?;
        state.pull_requests.push((repo.to_owned(), input.clone()));
        let number = state.pull_requests.len() as u64;
        Ok(PullRequest {
            number,
            link: format!("https://example.com/pull-request/{number}"),
        })
    }
}
