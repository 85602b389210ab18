//! GitHub API request and response types.
//!
//! Response types model the commonly used fields and keep everything else
//! in a flattened `extra` map, so callers forwarding the payload lose
//! nothing the API returned. Optional fields the API left out stay out when
//! the payload is serialized again.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Page size applied to list operations when the caller does not choose one.
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Repository sort order applied when the caller does not choose one.
pub const DEFAULT_REPO_SORT: &str = "updated";

/// Pull request and issue state filter applied when the caller does not choose one.
pub const DEFAULT_STATE: &str = "open";

// =============================================================================
// User
// =============================================================================

/// GitHub user representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubUser {
    pub id: u64,
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// GitHub label representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubLabel {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// GitHub repository representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<GitHubUser>,
    #[serde(default)]
    pub private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Issue
// =============================================================================

/// GitHub issue representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubIssue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub state: String,
    pub html_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<GitHubUser>,
    #[serde(default)]
    pub assignees: Vec<GitHubUser>,
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
    /// PRs are also returned by /issues endpoint, this field distinguishes them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GitHubIssue {
    /// Whether this entry is actually a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

// =============================================================================
// Pull Request
// =============================================================================

/// GitHub pull request representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubPullRequest {
    pub id: u64,
    pub number: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub state: String,
    pub html_url: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<GitHubUser>,
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
    pub head: GitHubBranchRef,
    pub base: GitHubBranchRef,
    pub created_at: String,
    pub updated_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// GitHub branch reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubBranchRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

// =============================================================================
// Create types
// =============================================================================

/// Request body for creating a repository for the authenticated user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRepositoryRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Create an initial commit with an empty README
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitignore_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_template: Option<String>,
}

/// Request body for creating a pull request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePullRequestRequest {
    pub title: String,
    /// Branch containing the changes, `owner:branch` for cross-repo PRs
    pub head: String,
    /// Branch the changes should be merged into
    pub base: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer_can_modify: Option<bool>,
}

/// Request body for creating an issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateIssueRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}

// =============================================================================
// List options
// =============================================================================

type Query = Vec<(&'static str, String)>;

fn push_opt(query: &mut Query, name: &'static str, value: &Option<String>) {
    if let Some(v) = value {
        query.push((name, v.clone()));
    }
}

fn push_num(query: &mut Query, name: &'static str, value: Option<u32>) {
    if let Some(v) = value {
        query.push((name, v.to_string()));
    }
}

/// Options for listing the authenticated user's repositories.
///
/// Unset fields fall back to `sort=updated` and `per_page=30`; any field
/// that is set overrides only its own default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRepositoriesOptions {
    /// all, public, private
    #[serde(default)]
    pub visibility: Option<String>,
    /// Comma-separated: owner, collaborator, organization_member
    #[serde(default)]
    pub affiliation: Option<String>,
    /// all, owner, public, private, member
    #[serde(default, rename = "type")]
    pub repo_type: Option<String>,
    /// created, updated, pushed, full_name
    #[serde(default)]
    pub sort: Option<String>,
    /// asc, desc
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
}

impl ListRepositoriesOptions {
    /// Query parameters with defaults applied.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            (
                "sort",
                self.sort
                    .clone()
                    .unwrap_or_else(|| DEFAULT_REPO_SORT.to_string()),
            ),
            (
                "per_page",
                self.per_page.unwrap_or(DEFAULT_PER_PAGE).to_string(),
            ),
        ];
        push_opt(&mut query, "visibility", &self.visibility);
        push_opt(&mut query, "affiliation", &self.affiliation);
        push_opt(&mut query, "type", &self.repo_type);
        push_opt(&mut query, "direction", &self.direction);
        push_num(&mut query, "page", self.page);
        query
    }
}

/// Options for listing a repository's pull requests.
///
/// Unset fields fall back to `state=open` and `per_page=30`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPullRequestsOptions {
    /// open, closed, all
    #[serde(default)]
    pub state: Option<String>,
    /// Filter by head, `user:ref-name`
    #[serde(default)]
    pub head: Option<String>,
    /// Filter by base branch name
    #[serde(default)]
    pub base: Option<String>,
    /// created, updated, popularity, long-running
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
}

impl ListPullRequestsOptions {
    /// Query parameters with defaults applied.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            (
                "state",
                self.state
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STATE.to_string()),
            ),
            (
                "per_page",
                self.per_page.unwrap_or(DEFAULT_PER_PAGE).to_string(),
            ),
        ];
        push_opt(&mut query, "head", &self.head);
        push_opt(&mut query, "base", &self.base);
        push_opt(&mut query, "sort", &self.sort);
        push_opt(&mut query, "direction", &self.direction);
        push_num(&mut query, "page", self.page);
        query
    }
}

/// Options for listing a repository's issues.
///
/// Unset fields fall back to `state=open` and `per_page=30`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListIssuesOptions {
    /// open, closed, all
    #[serde(default)]
    pub state: Option<String>,
    /// Comma-separated label names
    #[serde(default)]
    pub labels: Option<String>,
    /// Login, `none`, or `*`
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    /// created, updated, comments
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    /// ISO 8601 timestamp
    #[serde(default)]
    pub since: Option<String>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
}

impl ListIssuesOptions {
    /// Query parameters with defaults applied.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            (
                "state",
                self.state
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STATE.to_string()),
            ),
            (
                "per_page",
                self.per_page.unwrap_or(DEFAULT_PER_PAGE).to_string(),
            ),
        ];
        push_opt(&mut query, "labels", &self.labels);
        push_opt(&mut query, "assignee", &self.assignee);
        push_opt(&mut query, "creator", &self.creator);
        push_opt(&mut query, "sort", &self.sort);
        push_opt(&mut query, "direction", &self.direction);
        push_opt(&mut query, "since", &self.since);
        push_num(&mut query, "page", self.page);
        query
    }
}

// =============================================================================
// Envelope payloads
// =============================================================================

/// Payload of a single-user result, `{"user": ...}` in the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    pub user: GitHubUser,
}

/// Payload of a repository listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoriesPayload {
    pub repositories: Vec<GitHubRepository>,
}

/// Payload of a single-repository result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryPayload {
    pub repository: GitHubRepository,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestPayload {
    pub pull_request: GitHubPullRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestsPayload {
    pub pull_requests: Vec<GitHubPullRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuePayload {
    pub issue: GitHubIssue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuesPayload {
    pub issues: Vec<GitHubIssue>,
}

// =============================================================================
// Connection check
// =============================================================================

/// Result of a successful connectivity check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// `Connected as <login>`
    pub message: String,
    pub user: GitHubUser,
}

impl ConnectionInfo {
    pub fn new(user: GitHubUser) -> Self {
        Self {
            message: format!("Connected as {}", user.login),
            user,
        }
    }
}
