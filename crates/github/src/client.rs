//! REST implementation of [`GitHubGateway`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use url::Url;

use reaction::{ChangedFile, GitHubError, GitHubGateway, IssueTarget};

use crate::ClientBuildError;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const PAGE_SIZE: usize = 100;
/// GitHub stops listing pull request files after 3000 entries.
const MAX_PAGES: usize = 30;

/// Connection settings for [`RestGitHubGateway`].
#[derive(Clone)]
pub struct GitHubSettings {
    /// REST API base URL (e.g. [`DEFAULT_API_URL`]).
    pub api_url: String,
    /// Login of the bot account.
    pub login: String,
    /// Access token (or password) for the bot account.
    pub token: String,
}

impl std::fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("api_url", &self.api_url)
            .field("login", &self.login)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct PullRequestFile {
    filename: String,
    contents_url: String,
    #[serde(default)]
    status: String,
}

impl From<PullRequestFile> for ChangedFile {
    fn from(file: PullRequestFile) -> Self {
        let removed = file.status == "removed";
        ChangedFile::new(file.filename, file.contents_url).with_removed(removed)
    }
}

#[derive(Debug, Serialize)]
struct CreateCommentRequest<'a> {
    body: &'a str,
}

/// [`GitHubGateway`] backed by the GitHub REST API.
///
/// Cheap to share: one instance serves every concurrent delivery.
#[derive(Clone)]
pub struct RestGitHubGateway {
    client: Client,
    api_url: String,
    login: String,
    token: String,
}

impl std::fmt::Debug for RestGitHubGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestGitHubGateway")
            .field("api_url", &self.api_url)
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

impl RestGitHubGateway {
    /// Builds a gateway from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::InvalidBaseUrl`] if `api_url` does not
    /// parse, or [`ClientBuildError::Http`] if the HTTP client cannot start.
    pub fn new(settings: GitHubSettings) -> Result<Self, ClientBuildError> {
        Url::parse(&settings.api_url).map_err(|source| ClientBuildError::InvalidBaseUrl {
            url: settings.api_url.clone(),
            source,
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        let client = Client::builder()
            .user_agent(concat!("steward/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            login: settings.login,
            token: settings.token,
        })
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.login, Some(&self.token))
    }

    fn repo_url(&self, target: &IssueTarget) -> String {
        format!("{}/repos/{}/{}", self.api_url, target.owner, target.repo)
    }
}

#[async_trait]
impl GitHubGateway for RestGitHubGateway {
    async fn pull_request_files(
        &self,
        target: &IssueTarget,
    ) -> Result<Vec<ChangedFile>, GitHubError> {
        let url = format!("{}/pulls/{}/files", self.repo_url(target), target.number);
        let mut files = Vec::new();

        for page in 1..=MAX_PAGES {
            let response = self
                .authorised(self.client.get(&url))
                .query(&[("per_page", PAGE_SIZE), ("page", page)])
                .send()
                .await
                .map_err(network_error)?;
            let batch: Vec<PullRequestFile> = ensure_success(response)
                .await?
                .json()
                .await
                .map_err(decode_error)?;

            let short_page = batch.len() < PAGE_SIZE;
            files.extend(batch.into_iter().map(ChangedFile::from));
            if short_page {
                break;
            }
        }

        debug!(%target, count = files.len(), "listed pull request files");
        Ok(files)
    }

    async fn file_content(&self, file: &ChangedFile) -> Result<String, GitHubError> {
        let response = self
            .authorised(self.client.get(&file.contents_url))
            .header(ACCEPT, RAW_MEDIA_TYPE)
            .send()
            .await
            .map_err(network_error)?;
        let text = ensure_success(response)
            .await?
            .text()
            .await
            .map_err(decode_error)?;

        debug!(path = %file.path, bytes = text.len(), "fetched file content");
        Ok(text)
    }

    async fn create_comment(&self, target: &IssueTarget, body: &str) -> Result<(), GitHubError> {
        let url = format!("{}/issues/{}/comments", self.repo_url(target), target.number);
        let response = self
            .authorised(self.client.post(&url))
            .json(&CreateCommentRequest { body })
            .send()
            .await
            .map_err(network_error)?;
        ensure_success(response).await?;

        info!(%target, "posted comment");
        Ok(())
    }
}

/// Turns a non-2xx response into [`GitHubError::Api`].
async fn ensure_success(response: Response) -> Result<Response, GitHubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    error!(status = status.as_u16(), %message, "GitHub API error");
    Err(GitHubError::Api {
        status: status.as_u16(),
        message,
    })
}

fn network_error(error: reqwest::Error) -> GitHubError {
    GitHubError::Network {
        message: error.to_string(),
    }
}

fn decode_error(error: reqwest::Error) -> GitHubError {
    GitHubError::Decode {
        message: error.to_string(),
    }
}
