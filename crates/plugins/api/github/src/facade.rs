//! Result-wrapped GitHub operations.
//!
//! Every function builds its own [`GitHubClient`] from the given
//! [`EnvConfig`] and returns an [`Outcome`]; failures, including a missing
//! token, come back as [`Outcome::Failure`] and never escape as errors.
//! Payloads are named, so the serialized envelope reads
//! `{"success": true, "repositories": [...]}`.

use forgeboot_core::{EnvConfig, Outcome};

use crate::client::GitHubClient;
use crate::types::{
    ConnectionInfo, CreateIssueRequest, CreatePullRequestRequest, CreateRepositoryRequest,
    IssuePayload, IssuesPayload, ListIssuesOptions, ListPullRequestsOptions,
    ListRepositoriesOptions, PullRequestPayload, PullRequestsPayload, RepositoriesPayload,
    RepositoryPayload, UserPayload,
};

/// Get the user the configured token belongs to.
pub async fn get_authenticated_user(env: &EnvConfig) -> Outcome<UserPayload> {
    Outcome::capture("get_authenticated_user", async {
        GitHubClient::from_env(env)?
            .get_authenticated_user()
            .await
            .map(|user| UserPayload { user })
    })
    .await
}

/// List the authenticated user's repositories.
pub async fn get_user_repositories(
    env: &EnvConfig,
    options: &ListRepositoriesOptions,
) -> Outcome<RepositoriesPayload> {
    Outcome::capture("get_user_repositories", async {
        GitHubClient::from_env(env)?
            .list_repositories(options)
            .await
            .map(|repositories| RepositoriesPayload { repositories })
    })
    .await
}

/// Create a repository for the authenticated user.
pub async fn create_repository(
    env: &EnvConfig,
    request: &CreateRepositoryRequest,
) -> Outcome<RepositoryPayload> {
    Outcome::capture("create_repository", async {
        GitHubClient::from_env(env)?
            .create_repository(request)
            .await
            .map(|repository| RepositoryPayload { repository })
    })
    .await
}

/// Get a repository's metadata.
pub async fn get_repository(env: &EnvConfig, owner: &str, repo: &str) -> Outcome<RepositoryPayload> {
    Outcome::capture("get_repository", async {
        GitHubClient::from_env(env)?
            .get_repository(owner, repo)
            .await
            .map(|repository| RepositoryPayload { repository })
    })
    .await
}

/// Open a pull request.
pub async fn create_pull_request(
    env: &EnvConfig,
    owner: &str,
    repo: &str,
    request: &CreatePullRequestRequest,
) -> Outcome<PullRequestPayload> {
    Outcome::capture("create_pull_request", async {
        GitHubClient::from_env(env)?
            .create_pull_request(owner, repo, request)
            .await
            .map(|pull_request| PullRequestPayload { pull_request })
    })
    .await
}

/// List a repository's pull requests.
pub async fn list_pull_requests(
    env: &EnvConfig,
    owner: &str,
    repo: &str,
    options: &ListPullRequestsOptions,
) -> Outcome<PullRequestsPayload> {
    Outcome::capture("list_pull_requests", async {
        GitHubClient::from_env(env)?
            .list_pull_requests(owner, repo, options)
            .await
            .map(|pull_requests| PullRequestsPayload { pull_requests })
    })
    .await
}

/// Open an issue.
pub async fn create_issue(
    env: &EnvConfig,
    owner: &str,
    repo: &str,
    request: &CreateIssueRequest,
) -> Outcome<IssuePayload> {
    Outcome::capture("create_issue", async {
        GitHubClient::from_env(env)?
            .create_issue(owner, repo, request)
            .await
            .map(|issue| IssuePayload { issue })
    })
    .await
}

/// List a repository's issues.
pub async fn list_issues(
    env: &EnvConfig,
    owner: &str,
    repo: &str,
    options: &ListIssuesOptions,
) -> Outcome<IssuesPayload> {
    Outcome::capture("list_issues", async {
        GitHubClient::from_env(env)?
            .list_issues(owner, repo, options)
            .await
            .map(|issues| IssuesPayload { issues })
    })
    .await
}

/// Check that the token works, reporting `Connected as <login>`.
pub async fn test_github_connection(env: &EnvConfig) -> Outcome<ConnectionInfo> {
    get_authenticated_user(env)
        .await
        .map(|payload| ConnectionInfo::new(payload.user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const MISSING_TOKEN: &str =
        "Configuration error: GitHub Personal Access Token (GITHUB_PAT) not configured";

    fn env_for(server: &MockServer) -> EnvConfig {
        EnvConfig {
            github_token: Some("test-token".to_string()),
            github_api_url: Some(server.base_url()),
            ..Default::default()
        }
    }

    /// Token is absent but the URL points at a live server, so any request
    /// would be recorded.
    fn env_without_token(server: &MockServer) -> EnvConfig {
        EnvConfig {
            github_api_url: Some(server.base_url()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_token_fails_without_request() {
        let server = MockServer::start();
        let catch_all = server.mock(|_, then| {
            then.status(200).json_body(json!({}));
        });
        let env = env_without_token(&server);

        let errors = vec![
            get_authenticated_user(&env).await.error().map(str::to_string),
            get_user_repositories(&env, &ListRepositoriesOptions::default())
                .await
                .error()
                .map(str::to_string),
            create_repository(&env, &CreateRepositoryRequest::default())
                .await
                .error()
                .map(str::to_string),
            get_repository(&env, "acme", "widgets")
                .await
                .error()
                .map(str::to_string),
            create_pull_request(&env, "acme", "widgets", &CreatePullRequestRequest::default())
                .await
                .error()
                .map(str::to_string),
            list_pull_requests(&env, "acme", "widgets", &ListPullRequestsOptions::default())
                .await
                .error()
                .map(str::to_string),
            create_issue(&env, "acme", "widgets", &CreateIssueRequest::default())
                .await
                .error()
                .map(str::to_string),
            list_issues(&env, "acme", "widgets", &ListIssuesOptions::default())
                .await
                .error()
                .map(str::to_string),
            test_github_connection(&env)
                .await
                .error()
                .map(str::to_string),
        ];

        for error in errors {
            assert_eq!(error.as_deref(), Some(MISSING_TOKEN));
        }
        assert_eq!(catch_all.calls(), 0);
    }

    #[tokio::test]
    async fn test_connection_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/user");
            then.status(200)
                .json_body(json!({"id": 1, "login": "alice", "name": "Alice"}));
        });

        let outcome = test_github_connection(&env_for(&server)).await;
        let info = outcome.success().expect("connection should succeed");
        assert_eq!(info.message, "Connected as alice");
        assert_eq!(info.user.login, "alice");
    }

    #[tokio::test]
    async fn test_connection_failure_passes_error_through() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/user");
            then.status(401).body("{\"message\":\"Bad credentials\"}");
        });

        let outcome = test_github_connection(&env_for(&server)).await;
        assert_eq!(outcome.error(), Some("Unauthorized: Bad credentials"));
    }

    #[tokio::test]
    async fn test_user_repositories_default_and_override() {
        let server = MockServer::start();
        let defaults = server.mock(|when, then| {
            when.method(GET)
                .path("/user/repos")
                .query_param("sort", "updated")
                .query_param("per_page", "30");
            then.status(200).json_body(json!([]));
        });
        let overridden = server.mock(|when, then| {
            when.method(GET)
                .path("/user/repos")
                .query_param("sort", "updated")
                .query_param("per_page", "5");
            then.status(200).json_body(json!([]));
        });
        let env = env_for(&server);

        let outcome = get_user_repositories(&env, &ListRepositoriesOptions::default()).await;
        assert_eq!(
            outcome,
            Outcome::Success(RepositoriesPayload {
                repositories: vec![]
            })
        );
        defaults.assert();

        let outcome = get_user_repositories(
            &env,
            &ListRepositoriesOptions {
                per_page: Some(5),
                ..Default::default()
            },
        )
        .await;
        assert!(outcome.is_success());
        overridden.assert();
    }

    #[tokio::test]
    async fn test_list_issues_and_pulls_default_to_open() {
        let server = MockServer::start();
        let issues = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/widgets/issues")
                .query_param("state", "open")
                .query_param("per_page", "30");
            then.status(200).json_body(json!([]));
        });
        let pulls = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/acme/widgets/pulls")
                .query_param("state", "open")
                .query_param("per_page", "30");
            then.status(200).json_body(json!([]));
        });
        let env = env_for(&server);

        assert!(list_issues(&env, "acme", "widgets", &ListIssuesOptions::default())
            .await
            .is_success());
        assert!(
            list_pull_requests(&env, "acme", "widgets", &ListPullRequestsOptions::default())
                .await
                .is_success()
        );
        issues.assert();
        pulls.assert();
    }

    #[tokio::test]
    async fn test_api_error_becomes_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/missing");
            then.status(404).body("{\"message\":\"Not Found\"}");
        });

        let outcome = get_repository(&env_for(&server), "acme", "missing").await;
        assert_eq!(outcome, Outcome::failure("Not found: Not Found"));
    }

    #[tokio::test]
    async fn test_unreachable_server_becomes_failure() {
        let env = EnvConfig {
            github_token: Some("test-token".to_string()),
            github_api_url: Some("http://127.0.0.1:1".to_string()),
            ..Default::default()
        };

        let outcome = get_authenticated_user(&env).await;
        assert!(outcome.error().unwrap().starts_with("HTTP error:"));
    }

    fn user_json() -> serde_json::Value {
        json!({"id": 1, "login": "alice"})
    }

    fn repo_json() -> serde_json::Value {
        json!({
            "id": 10,
            "name": "widgets",
            "full_name": "acme/widgets",
            "private": false,
            "fork": false,
            "html_url": "https://github.com/acme/widgets"
        })
    }

    fn pull_json() -> serde_json::Value {
        json!({
            "id": 1007,
            "number": 7,
            "title": "Add feature",
            "state": "open",
            "html_url": "https://github.com/acme/widgets/pull/7",
            "head": {"ref": "feature", "sha": "abc123"},
            "base": {"ref": "main", "sha": "def456"},
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        })
    }

    fn issue_json() -> serde_json::Value {
        json!({
            "id": 2001,
            "number": 1,
            "title": "Crash on start",
            "state": "open",
            "html_url": "https://github.com/acme/widgets/issues/1",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    fn envelope<T: serde::Serialize>(outcome: &Outcome<T>) -> serde_json::Value {
        serde_json::to_value(outcome).unwrap()
    }

    #[tokio::test]
    async fn test_user_envelope() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/user");
            then.status(200).json_body(user_json());
        });

        let value = envelope(&get_authenticated_user(&env_for(&server)).await);
        assert_eq!(value, json!({"success": true, "user": user_json()}));
    }

    #[tokio::test]
    async fn test_connection_envelope() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/user");
            then.status(200).json_body(user_json());
        });

        let value = envelope(&test_github_connection(&env_for(&server)).await);
        assert_eq!(
            value,
            json!({"success": true, "message": "Connected as alice", "user": user_json()})
        );
    }

    #[tokio::test]
    async fn test_repository_envelopes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/user/repos");
            then.status(200).json_body(json!([repo_json()]));
        });
        server.mock(|when, then| {
            when.method(POST).path("/user/repos");
            then.status(201).json_body(repo_json());
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/widgets");
            then.status(200).json_body(repo_json());
        });
        let env = env_for(&server);

        let listed = envelope(&get_user_repositories(&env, &ListRepositoriesOptions::default()).await);
        assert_eq!(listed, json!({"success": true, "repositories": [repo_json()]}));

        let created = envelope(
            &create_repository(
                &env,
                &CreateRepositoryRequest {
                    name: "widgets".to_string(),
                    ..Default::default()
                },
            )
            .await,
        );
        assert_eq!(created, json!({"success": true, "repository": repo_json()}));

        let fetched = envelope(&get_repository(&env, "acme", "widgets").await);
        assert_eq!(fetched, json!({"success": true, "repository": repo_json()}));
    }

    #[tokio::test]
    async fn test_pull_request_envelopes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/repos/acme/widgets/pulls");
            then.status(201).json_body(pull_json());
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/widgets/pulls");
            then.status(200).json_body(json!([pull_json()]));
        });
        let env = env_for(&server);

        let created = envelope(
            &create_pull_request(
                &env,
                "acme",
                "widgets",
                &CreatePullRequestRequest {
                    title: "Add feature".to_string(),
                    head: "feature".to_string(),
                    base: "main".to_string(),
                    ..Default::default()
                },
            )
            .await,
        );
        let mut expected = pull_json();
        // non-optional fields are filled in with their defaults
        expected["draft"] = json!(false);
        expected["labels"] = json!([]);
        assert_eq!(created, json!({"success": true, "pullRequest": expected}));

        let listed = envelope(
            &list_pull_requests(&env, "acme", "widgets", &ListPullRequestsOptions::default()).await,
        );
        assert_eq!(listed, json!({"success": true, "pullRequests": [expected]}));
    }

    #[tokio::test]
    async fn test_issue_envelopes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/repos/acme/widgets/issues");
            then.status(201).json_body(issue_json());
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/acme/widgets/issues");
            then.status(200).json_body(json!([issue_json()]));
        });
        let env = env_for(&server);

        let created = envelope(
            &create_issue(
                &env,
                "acme",
                "widgets",
                &CreateIssueRequest {
                    title: "Crash on start".to_string(),
                    ..Default::default()
                },
            )
            .await,
        );
        let mut expected = issue_json();
        expected["assignees"] = json!([]);
        expected["labels"] = json!([]);
        assert_eq!(created, json!({"success": true, "issue": expected}));

        let listed =
            envelope(&list_issues(&env, "acme", "widgets", &ListIssuesOptions::default()).await);
        assert_eq!(listed, json!({"success": true, "issues": [expected]}));
    }

    #[tokio::test]
    async fn test_failure_envelope() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/user");
            then.status(401).body("{\"message\":\"Bad credentials\"}");
        });

        let value = envelope(&get_authenticated_user(&env_for(&server)).await);
        assert_eq!(
            value,
            json!({"success": false, "error": "Unauthorized: Bad credentials"})
        );
    }
}
