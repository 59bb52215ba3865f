//! Request and response bodies of the GitHub contents, branches and pulls
//! endpoints.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use gitpatch_core::{FileChange, Signature};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    pub sha: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BranchResponse {
    pub commit: CommitRef,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitRef {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullResponse {
    pub number: u64,
    pub html_url: String,
}

/// Body of `PUT` and `DELETE /repos/{repo}/contents/{path}`.
#[derive(Debug, Serialize)]
pub(crate) struct ContentParams<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<&'a Signature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committer: Option<&'a Signature>,
}

impl<'a> ContentParams<'a> {
    /// An empty signature is left out so GitHub attributes the commit to the
    /// token owner.
    pub fn new(change: &FileChange<'a>, content: Option<String>) -> Self {
        let signature = (!change.signature.is_empty()).then_some(change.signature);
        Self {
            message: change.message,
            content,
            branch: change.branch,
            sha: change.previous_sha,
            author: signature,
            committer: signature,
        }
    }
}

pub(crate) fn encode_content(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// GitHub wraps base64 content at 60 columns. Files too large for the
/// contents endpoint come back with encoding `none` and no content.
pub(crate) fn decode_content(content: &ContentResponse) -> Result<Vec<u8>, String> {
    match content.encoding.as_str() {
        "base64" => {
            let compact: Vec<u8> = content
                .content
                .bytes()
                .filter(|b| !b.is_ascii_whitespace())
                .collect();
            BASE64
                .decode(compact)
                .map_err(|e| format!("invalid base64 content: {e}"))
        }
        "" => Ok(content.content.clone().into_bytes()),
        other => Err(format!("unsupported content encoding '{other}'")),
    }
}
