//! Global git setup driven by environment variables.
//!
//! [`GitSetup::auto_configure`] is meant to run once at container startup.
//! It applies, in order:
//!
//! 1. `user.name` from `GITHUB_USERNAME` / `GIT_USER_NAME`
//! 2. `user.email` from `GITHUB_EMAIL` / `GIT_USER_EMAIL`
//! 3. `credential.helper` from `GIT_CREDENTIAL_HELPER` (default `store`)
//! 4. `gh auth login` and `gh config set git_protocol https` when
//!    `GITHUB_PAT` is set; failures here are logged and skipped
//! 5. `init.defaultBranch = main`
//! 6. `safe.directory = *`
//!
//! Any other failure stops the sequence. Settings already written stay in
//! place. The outcome is reported only through logs.

use std::sync::Arc;

use forgeboot_core::{EnvConfig, Outcome, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::gh::{GhCommand, GitHubCli};
use crate::store::{GitCliConfigStore, GitConfigStore};

/// Global git config keys written by the setup sequence.
pub mod keys {
    pub const USER_NAME: &str = "user.name";
    pub const USER_EMAIL: &str = "user.email";
    pub const CREDENTIAL_HELPER: &str = "credential.helper";
    pub const DEFAULT_BRANCH: &str = "init.defaultBranch";
    pub const SAFE_DIRECTORY: &str = "safe.directory";
}

/// Branch name for repositories created with `git init`.
pub const DEFAULT_BRANCH: &str = "main";

/// `safe.directory` value trusting every path.
pub const SAFE_DIRECTORY_WILDCARD: &str = "*";

/// Protocol the GitHub CLI uses for git operations.
pub const GH_GIT_PROTOCOL: &str = "https";

/// Current global identity and credential settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitConfigSnapshot {
    pub user_name: String,
    pub user_email: String,
    pub credential_helper: String,
    /// Both name and email are set
    pub is_configured: bool,
}

impl GitConfigSnapshot {
    pub fn new(user_name: String, user_email: String, credential_helper: String) -> Self {
        let is_configured = !user_name.is_empty() && !user_email.is_empty();
        Self {
            user_name,
            user_email,
            credential_helper,
            is_configured,
        }
    }
}

/// Identity settings to apply; `None` or empty fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitIdentityUpdate {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub credential_helper: Option<String>,
}

/// Applies and reads global git settings.
#[derive(Clone)]
pub struct GitSetup {
    store: Arc<dyn GitConfigStore>,
    gh: Arc<dyn GitHubCli>,
}

impl GitSetup {
    pub fn new(store: Arc<dyn GitConfigStore>, gh: Arc<dyn GitHubCli>) -> Self {
        Self { store, gh }
    }

    /// Setup using the `git` and `gh` executables on `PATH`.
    pub fn system() -> Self {
        Self::new(
            Arc::new(GitCliConfigStore::system()),
            Arc::new(GhCommand::system()),
        )
    }

    /// Run the startup configuration sequence described in the module docs.
    ///
    /// Does nothing unless `env.auto_config` is set.
    pub async fn auto_configure(&self, env: &EnvConfig) {
        if !env.auto_config {
            info!("Git auto-configuration disabled");
            return;
        }

        info!("Auto-configuring git with environment variables");

        match self.run_sequence(env).await {
            Ok(()) => info!("Git auto-configuration completed successfully"),
            Err(e) => error!(error = %e, "Git auto-configuration failed"),
        }
    }

    async fn run_sequence(&self, env: &EnvConfig) -> Result<()> {
        if let Some(name) = &env.user_name {
            self.store.set(keys::USER_NAME, name).await?;
            info!(user_name = %name, "Git user.name set");
        }

        if let Some(email) = &env.user_email {
            self.store.set(keys::USER_EMAIL, email).await?;
            info!(user_email = %email, "Git user.email set");
        }

        let helper = env.credential_helper_or_default();
        self.store.set(keys::CREDENTIAL_HELPER, helper).await?;
        info!(credential_helper = %helper, "Git credential.helper set");

        if let Some(token) = &env.github_token {
            if let Err(e) = self.configure_gh(token).await {
                warn!(error = %e, "GitHub CLI configuration failed");
            }
        }

        self.store.set(keys::DEFAULT_BRANCH, DEFAULT_BRANCH).await?;
        info!(branch = DEFAULT_BRANCH, "Git default branch set");

        self.trust_all_directories().await?;

        Ok(())
    }

    async fn configure_gh(&self, token: &str) -> Result<()> {
        self.gh.login_with_token(token).await?;
        info!("GitHub CLI authenticated successfully");

        self.gh.set_git_protocol(GH_GIT_PROTOCOL).await?;
        info!(protocol = GH_GIT_PROTOCOL, "GitHub CLI git protocol set");
        Ok(())
    }

    /// Add the `safe.directory` wildcard unless it is already present.
    ///
    /// `safe.directory` is multi-valued, so appending blindly on every
    /// startup would pile up duplicates. If the existing values cannot be
    /// read the wildcard is appended anyway.
    async fn trust_all_directories(&self) -> Result<()> {
        let existing = match self.store.get_all(keys::SAFE_DIRECTORY).await {
            Ok(values) => values,
            Err(e) => {
                debug!(error = %e, "Could not read safe.directory, appending wildcard");
                Vec::new()
            }
        };

        if existing.iter().any(|v| v == SAFE_DIRECTORY_WILDCARD) {
            info!("Git safe directory already configured for container");
            return Ok(());
        }

        self.store
            .add(keys::SAFE_DIRECTORY, SAFE_DIRECTORY_WILDCARD)
            .await?;
        info!("Git safe directory configured for container");
        Ok(())
    }

    /// Read the current identity and credential helper.
    ///
    /// Unset keys and failed reads both come back as empty strings.
    pub async fn get_git_config(&self) -> GitConfigSnapshot {
        let (user_name, user_email, credential_helper) = tokio::join!(
            self.read_or_empty(keys::USER_NAME),
            self.read_or_empty(keys::USER_EMAIL),
            self.read_or_empty(keys::CREDENTIAL_HELPER),
        );
        GitConfigSnapshot::new(user_name, user_email, credential_helper)
    }

    async fn read_or_empty(&self, key: &str) -> String {
        match self.store.get(key).await {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                debug!(key = key, error = %e, "Failed to read git config");
                String::new()
            }
        }
    }

    /// Apply the given identity settings, stopping at the first failure.
    pub async fn configure_git(&self, update: &GitIdentityUpdate) -> Outcome<()> {
        let result = self.apply_identity(update).await;
        if let Err(e) = &result {
            error!(error = %e, "Error configuring git");
        }
        result.into()
    }

    async fn apply_identity(&self, update: &GitIdentityUpdate) -> Result<()> {
        let fields = [
            (keys::USER_NAME, &update.user_name),
            (keys::USER_EMAIL, &update.user_email),
            (keys::CREDENTIAL_HELPER, &update.credential_helper),
        ];

        for (key, value) in fields {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                self.store.set(key, value).await?;
                debug!(key = key, "Git config updated");
            }
        }
        Ok(())
    }
}

// =============================================================================
// Process-environment entry points
// =============================================================================

/// Run [`GitSetup::auto_configure`] with the system tools and process environment.
pub async fn auto_configure_git() {
    GitSetup::system()
        .auto_configure(&EnvConfig::from_env())
        .await
}

/// Run [`GitSetup::get_git_config`] with the system `git`.
pub async fn get_git_config() -> GitConfigSnapshot {
    GitSetup::system().get_git_config().await
}

/// Run [`GitSetup::configure_git`] with the system `git`.
pub async fn configure_git(update: &GitIdentityUpdate) -> Outcome<()> {
    GitSetup::system().configure_git(update).await
}

// =============================================================================
// Tests
// =============================================================================
