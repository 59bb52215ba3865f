//! Blocking GitHub REST v3 binding for [`ScmGateway`].
//!
//! Every call is a single request. Error statuses become [`ScmError`]s that
//! carry the status and response body; 404 is [`ScmErrorKind::NotFound`].
//!
//! [`ScmErrorKind::NotFound`]: gitpatch_core::ScmErrorKind::NotFound

use std::time::Duration;

use gitpatch_core::{FileChange, FileContent, PullRequest, PullRequestInput, ScmError, ScmGateway};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::payload::{
    decode_content, encode_content, BranchResponse, ContentParams, ContentResponse, PullResponse,
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Connection settings for [`GithubClient`].
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// API root, e.g. `https://github.example.com/api/v3` for Enterprise.
    pub api_url: String,
    pub token: Option<String>,
    /// Applied to each request as a whole.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token: None,
            timeout: Duration::from_secs(30),
            user_agent: concat!("gitpatch/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct GithubClient {
    agent: ureq::Agent,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();
        Self {
            agent,
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            token: config.token,
        }
    }

    fn url(&self, repo: &str, tail: &str) -> String {
        format!("{}/repos/{repo}/{tail}", self.api_url)
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        tracing::debug!(method, url, "github request");
        let request = self
            .agent
            .request(method, url)
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", "2022-11-28");
        match &self.token {
            Some(token) => request.set("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }
}

/// Map a ureq failure onto the gateway error model.
fn scm_error(message: String, err: ureq::Error) -> ScmError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            ScmError::from_status(message, status, body)
        }
        ureq::Error::Transport(transport) => ScmError::transport(format!("{message}: {transport}")),
    }
}

fn read_json<T: DeserializeOwned>(message: &str, response: ureq::Response) -> Result<T, ScmError> {
    let status = response.status();
    response
        .into_json()
        .map_err(|e| ScmError::invalid_response(format!("{message}: invalid response body: {e}"), status))
}

impl ScmGateway for GithubClient {
    fn get_file(&self, repo: &str, reference: &str, path: &str) -> Result<FileContent, ScmError> {
        let message = format!("failed to get file {path} from repo {repo} ref {reference}");
        let response = self
            .request("GET", &self.url(repo, &format!("contents/{path}")))
            .query("ref", reference)
            .call()
            .map_err(|e| scm_error(message.clone(), e))?;
        let status = response.status();
        let content: ContentResponse = read_json(&message, response)?;
        let data = decode_content(&content)
            .map_err(|e| ScmError::invalid_response(format!("{message}: {e}"), status))?;
        Ok(FileContent {
            path: path.to_owned(),
            data,
            sha: content.sha,
        })
    }

    fn get_branch_head(&self, repo: &str, branch: &str) -> Result<String, ScmError> {
        let message = format!("failed to get branch {branch} in repo {repo}");
        let response = self
            .request("GET", &self.url(repo, &format!("branches/{branch}")))
            .call()
            .map_err(|e| scm_error(message.clone(), e))?;
        let branch: BranchResponse = read_json(&message, response)?;
        Ok(branch.commit.sha)
    }

    fn create_branch(&self, repo: &str, branch: &str, sha: &str) -> Result<(), ScmError> {
        let message = format!("failed to create branch {branch} in repo {repo}");
        self.request("POST", &self.url(repo, "git/refs"))
            .send_json(json!({ "ref": format!("refs/heads/{branch}"), "sha": sha }))
            .map_err(|e| scm_error(message, e))?;
        Ok(())
    }

    fn update_file(&self, change: &FileChange<'_>) -> Result<(), ScmError> {
        let message = format!(
            "failed to update file {} in repo {} branch {}",
            change.path, change.repo, change.branch
        );
        let params = ContentParams::new(change, Some(encode_content(change.content)));
        self.request("PUT", &self.url(change.repo, &format!("contents/{}", change.path)))
            .send_json(&params)
            .map_err(|e| scm_error(message, e))?;
        Ok(())
    }

    fn delete_file(&self, change: &FileChange<'_>) -> Result<(), ScmError> {
        let message = format!(
            "failed to delete file {} in repo {} branch {}",
            change.path, change.repo, change.branch
        );
        let params = ContentParams::new(change, None);
        self.request("DELETE", &self.url(change.repo, &format!("contents/{}", change.path)))
            .send_json(&params)
            .map_err(|e| scm_error(message, e))?;
        Ok(())
    }

    fn create_pull_request(
        &self,
        repo: &str,
        input: &PullRequestInput,
    ) -> Result<PullRequest, ScmError> {
        let message = format!(
            "failed to create pull request from {} to {} in repo {repo}",
            input.source, input.target
        );
        let response = self
            .request("POST", &self.url(repo, "pulls"))
            .send_json(json!({
                "title": input.title,
                "body": input.body,
                "head": input.source,
                "base": input.target,
            }))
            .map_err(|e| scm_error(message.clone(), e))?;
        let pr: PullResponse = read_json(&message, response)?;
        Ok(PullRequest {
            number: pr.number,
            link: pr.html_url,
        })
    }
}
