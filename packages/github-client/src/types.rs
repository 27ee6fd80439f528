use serde::{Deserialize, Serialize};

/// Response of `GET /repos/{owner}/{repo}/contents/{path}` for a file.
///
/// See <https://docs.github.com/en/rest/repos/contents?apiVersion=2022-11-28>.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RepoContentResponse {
    /// `file`, `dir`, `symlink` or `submodule`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub encoding: String,
    #[serde(default)]
    pub size: u64,
    pub name: String,
    pub path: String,
    /// Base64 with embedded newlines; empty for directories.
    #[serde(default)]
    pub content: String,
    /// Blob sha, required when overwriting the file.
    pub sha: String,
    pub url: Option<String>,
    pub git_url: Option<String>,
    pub html_url: Option<String>,
    pub download_url: Option<String>,
    #[serde(rename = "_links")]
    pub links: Option<Links>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Links {
    pub git: Option<String>,
    #[serde(rename = "self")]
    pub self_link: Option<String>,
    pub html: Option<String>,
}

/// A file together with its decoded text.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoContent {
    pub response: RepoContentResponse,
    pub decoded: String,
}

impl RepoContent {
    pub fn sha(&self) -> &str {
        &self.response.sha
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`. `content` is plain
/// text here; the client base64-encodes it on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutFileRequest {
    pub message: String,
    pub content: String,
    pub sha: Option<String>,
    pub branch: Option<String>,
    pub committer: Option<Committer>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PutFileBody<'a> {
    pub message: &'a str,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committer: Option<&'a Committer>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PutFileResponse {
    pub content: Option<PutFileContent>,
    pub commit: PutFileCommit,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PutFileContent {
    pub sha: String,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PutFileCommit {
    pub sha: String,
    pub html_url: Option<String>,
}
