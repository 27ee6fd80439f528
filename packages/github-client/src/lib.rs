//! Pure GitHub repository contents client.
//!
//! Reads a single file and conditionally overwrites it. Writes carry the blob
//! sha that was read, so GitHub rejects them with `409` if the file moved on
//! in between; that case surfaces as [`GithubError::Conflict`].

pub mod error;
pub mod types;

pub use error::{GithubError, Result};
pub use types::{Committer, PutFileRequest, PutFileResponse, RepoContent, RepoContentResponse};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;

use types::PutFileBody;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Clone)]
pub struct GithubOptions {
    pub token: String,
    pub base_url: String,
}

impl GithubOptions {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

pub struct GithubClient {
    client: reqwest::Client,
    options: GithubOptions,
}

impl GithubClient {
    pub fn new(options: GithubOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            options,
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("banner-bridge"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        headers
    }

    // Path segments are joined verbatim so nested paths keep their slashes.
    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.options.base_url,
            owner,
            repo,
            path.trim_start_matches('/')
        )
    }

    /// Fetch a file and decode its base64 content.
    pub async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> Result<RepoContent> {
        let mut request = self
            .client
            .get(self.contents_url(owner, repo, path))
            .headers(self.headers())
            .header("Authorization", format!("token {}", self.options.token));
        if let Some(branch) = branch {
            request = request.query(&[("ref", branch)]);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GithubError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), path, "Failed to get file content");
            return Err(GithubError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let response: RepoContentResponse = resp.json().await?;
        if response.encoding != "base64" {
            return Err(GithubError::Encoding(response.encoding));
        }

        let decoded = decode_content(&response.content)?;
        tracing::debug!(path, sha = %response.sha, size = response.size, "Fetched file content");
        Ok(RepoContent { response, decoded })
    }

    /// Create or overwrite a file. Passing the previously read `sha` makes the
    /// write conditional.
    pub async fn put_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        request: &PutFileRequest,
    ) -> Result<PutFileResponse> {
        let body = PutFileBody {
            message: &request.message,
            content: STANDARD.encode(request.content.as_bytes()),
            sha: request.sha.as_deref(),
            branch: request.branch.as_deref(),
            committer: request.committer.as_ref(),
        };

        let resp = self
            .client
            .put(self.contents_url(owner, repo, path))
            .headers(self.headers())
            .header("Authorization", format!("token {}", self.options.token))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::CONFLICT {
            tracing::warn!(path, "File changed since it was read");
            return Err(GithubError::Conflict {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                path,
                response = %body,
                "Failed to create or update file content"
            );
            return Err(GithubError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let response: PutFileResponse = resp.json().await?;
        tracing::info!(path, commit = %response.commit.sha, "File content updated");
        Ok(response)
    }
}

/// GitHub wraps base64 at 60 columns; strip the whitespace before decoding.
fn decode_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wrapped_base64() {
        let encoded = STANDARD.encode("user_agent = \"DanXi\"\n[[banners]]\ntitle = \"a\"\n");
        let (head, tail) = encoded.split_at(20);
        let wrapped = format!("{}\n{}\n", head, tail);
        assert_eq!(
            decode_content(&wrapped).unwrap(),
            "user_agent = \"DanXi\"\n[[banners]]\ntitle = \"a\"\n"
        );
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(decode_content("!!!"), Err(GithubError::Decode(_))));
    }

    #[test]
    fn contents_url_keeps_nested_slashes() {
        let client = GithubClient::new(GithubOptions::new("t").with_base_url("http://gh/"));
        assert_eq!(
            client.contents_url("o", "r", "/public/app.toml"),
            "http://gh/repos/o/r/contents/public/app.toml"
        );
    }
}
