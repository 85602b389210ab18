//! GitHub API client implementation.

use forgeboot_core::{EnvConfig, Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use reqwest::Url;
use tracing::{debug, warn};

use crate::types::{
    CreateIssueRequest, CreatePullRequestRequest, CreateRepositoryRequest, GitHubIssue,
    GitHubPullRequest, GitHubRepository, GitHubUser, ListIssuesOptions, ListPullRequestsOptions,
    ListRepositoriesOptions,
};
use crate::{DEFAULT_GITHUB_URL, USER_AGENT};

/// GitHub API client.
pub struct GitHubClient {
    base_url: String,
    root: Url,
    token: String,
    client: reqwest::Client,
}

impl GitHubClient {
    /// Create a new GitHub client for api.github.com.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_GITHUB_URL, token)
    }

    /// Create a new GitHub client with a custom base URL (GitHub Enterprise).
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        let root = Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("Invalid GitHub API URL {}: {}", base_url, e)))?;
        if root.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid GitHub API URL: {}", base_url)));
        }

        Ok(Self {
            base_url,
            root,
            token: token.into(),
            client,
        })
    }

    /// Create a client from `GITHUB_PAT` and `GITHUB_API_URL`.
    ///
    /// Fails without touching the network when no token is configured.
    pub fn from_env(env: &EnvConfig) -> Result<Self> {
        let token = env.github_token.as_deref().ok_or_else(|| {
            Error::Config("GitHub Personal Access Token (GITHUB_PAT) not configured".to_string())
        })?;
        let base_url = env
            .github_api_url
            .as_deref()
            .unwrap_or(DEFAULT_GITHUB_URL);
        Self::with_base_url(base_url, token)
    }

    /// API base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build request with common headers.
    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// API URL for the given path segments, each one percent-encoded.
    fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.root.clone();
        // Checked in `with_base_url`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Repository-scoped API URL; `owner` and `repo` cannot escape their segment.
    fn repo_url(&self, owner: &str, repo: &str, endpoint: Option<&str>) -> Url {
        let mut segments = vec!["repos", owner, repo];
        segments.extend(endpoint);
        self.api_url(&segments)
    }

    /// Make an authenticated GET request with typed deserialization.
    async fn get<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        debug!(url = %url, "GitHub GET request");

        let response = self
            .request(reqwest::Method::GET, url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Make an authenticated POST request.
    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: Url, body: &B) -> Result<T> {
        debug!(url = %url, "GitHub POST request");

        let response = self
            .request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Handle response and map errors.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(
                status = status_code,
                message = message,
                "GitHub API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        response
            .json()
            .await
            .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Get the user the token belongs to.
    pub async fn get_authenticated_user(&self) -> Result<GitHubUser> {
        self.get(self.api_url(&["user"]), &[]).await
    }

    // =========================================================================
    // Repositories
    // =========================================================================

    /// List repositories the authenticated user can access.
    pub async fn list_repositories(
        &self,
        options: &ListRepositoriesOptions,
    ) -> Result<Vec<GitHubRepository>> {
        self.get(self.api_url(&["user", "repos"]), &options.query())
            .await
    }

    /// Create a repository owned by the authenticated user.
    pub async fn create_repository(
        &self,
        request: &CreateRepositoryRequest,
    ) -> Result<GitHubRepository> {
        self.post(self.api_url(&["user", "repos"]), request).await
    }

    /// Get a single repository.
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<GitHubRepository> {
        self.get(self.repo_url(owner, repo, None), &[]).await
    }

    // =========================================================================
    // Pull requests
    // =========================================================================

    /// Open a pull request.
    pub async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        request: &CreatePullRequestRequest,
    ) -> Result<GitHubPullRequest> {
        self.post(self.repo_url(owner, repo, Some("pulls")), request)
            .await
    }

    /// List pull requests, open ones by default.
    pub async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        options: &ListPullRequestsOptions,
    ) -> Result<Vec<GitHubPullRequest>> {
        self.get(self.repo_url(owner, repo, Some("pulls")), &options.query())
            .await
    }

    // =========================================================================
    // Issues
    // =========================================================================

    /// Open an issue.
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        request: &CreateIssueRequest,
    ) -> Result<GitHubIssue> {
        self.post(self.repo_url(owner, repo, Some("issues")), request)
            .await
    }

    /// List issues, open ones by default.
    ///
    /// GitHub includes pull requests in this listing; see
    /// [`GitHubIssue::is_pull_request`].
    pub async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        options: &ListIssuesOptions,
    ) -> Result<Vec<GitHubIssue>> {
        self.get(self.repo_url(owner, repo, Some("issues")), &options.query())
            .await
    }
}
