//! Integration tests against a real `git` executable.
//!
//! `GIT_CONFIG_GLOBAL` points `git config --global` at a scratch file, so
//! the developer's own configuration is never touched. Tests return early
//! when `git` is not installed.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use forgeboot_core::{EnvConfig, Outcome, Result};
use forgeboot_git::{
    GitCliConfigStore, GitConfigSnapshot, GitConfigStore, GitHubCli, GitIdentityUpdate, GitSetup,
    ProcessRunner,
};
use tempfile::TempDir;

/// gh stand-in; these tests never set a token.
struct NoGh;

#[async_trait]
impl GitHubCli for NoGh {
    async fn login_with_token(&self, _token: &str) -> Result<()> {
        panic!("gh login should not run without GITHUB_PAT");
    }

    async fn set_git_protocol(&self, _protocol: &str) -> Result<()> {
        panic!("gh config should not run without GITHUB_PAT");
    }
}

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn scratch_store(dir: &Path) -> GitCliConfigStore {
    let runner = ProcessRunner::new()
        .with_env("GIT_CONFIG_GLOBAL", dir.join("gitconfig").display().to_string())
        .with_env("GIT_CONFIG_NOSYSTEM", "1");
    GitCliConfigStore::new(runner)
}

fn scratch_setup(dir: &Path) -> (GitSetup, Arc<GitCliConfigStore>) {
    let store = Arc::new(scratch_store(dir));
    (GitSetup::new(store.clone(), Arc::new(NoGh)), store)
}

fn enabled_env(vars: &[(&str, &str)]) -> EnvConfig {
    let mut vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.push(("GITHUB_AUTO_CONFIG".to_string(), "true".to_string()));
    EnvConfig::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
}

#[tokio::test]
async fn test_fresh_config_is_empty() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let (setup, _) = scratch_setup(dir.path());

    assert_eq!(setup.get_git_config().await, GitConfigSnapshot::default());
}

#[tokio::test]
async fn test_configure_git_round_trip_with_special_characters() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let (setup, _) = scratch_setup(dir.path());

    let name = "Jane \"JD\" O'Doe $(whoami)";
    let outcome = setup
        .configure_git(&GitIdentityUpdate {
            user_name: Some(name.to_string()),
            user_email: Some("jane@example.com".to_string()),
            credential_helper: None,
        })
        .await;
    assert_eq!(outcome, Outcome::Success(()));

    let snapshot = setup.get_git_config().await;
    assert_eq!(snapshot.user_name, name);
    assert_eq!(snapshot.user_email, "jane@example.com");
    assert_eq!(snapshot.credential_helper, "");
    assert!(snapshot.is_configured);
}

#[tokio::test]
async fn test_auto_configure_applies_settings() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let (setup, store) = scratch_setup(dir.path());

    setup
        .auto_configure(&enabled_env(&[
            ("GIT_USER_NAME", "CI Bot"),
            ("GIT_USER_EMAIL", "ci@example.com"),
        ]))
        .await;

    assert_eq!(
        store.get("user.name").await.unwrap().as_deref(),
        Some("CI Bot")
    );
    assert_eq!(
        store.get("credential.helper").await.unwrap().as_deref(),
        Some("store")
    );
    assert_eq!(
        store.get("init.defaultBranch").await.unwrap().as_deref(),
        Some("main")
    );
    assert_eq!(store.get_all("safe.directory").await.unwrap(), vec!["*"]);
}

#[tokio::test]
async fn test_auto_configure_twice_keeps_single_wildcard() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let (setup, store) = scratch_setup(dir.path());

    let env = enabled_env(&[]);
    setup.auto_configure(&env).await;
    setup.auto_configure(&env).await;

    assert_eq!(store.get_all("safe.directory").await.unwrap(), vec!["*"]);
}

#[tokio::test]
async fn test_disabled_leaves_config_untouched() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let (setup, _) = scratch_setup(dir.path());

    setup
        .auto_configure(&EnvConfig::from_lookup(|key| match key {
            "GITHUB_USERNAME" => Some("alice".to_string()),
            _ => None,
        }))
        .await;

    assert!(!dir.path().join("gitconfig").exists());
}
