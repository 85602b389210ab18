//! GitHub integration for forgeboot.
//!
//! [`GitHubClient`] talks to the GitHub REST API. The [`facade`] functions
//! wrap one client call each and return an [`Outcome`](forgeboot_core::Outcome)
//! envelope instead of an error.

mod client;
pub mod facade;
mod types;

pub use client::GitHubClient;
pub use facade::{
    create_issue, create_pull_request, create_repository, get_authenticated_user,
    get_repository, get_user_repositories, list_issues, list_pull_requests,
    test_github_connection,
};
pub use types::*;

/// Default GitHub API URL.
pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";

/// Client identifier sent with every request.
pub const USER_AGENT: &str = concat!("forgeboot/", env!("CARGO_PKG_VERSION"));
