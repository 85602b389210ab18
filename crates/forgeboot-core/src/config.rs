//! Environment configuration for forgeboot.
//!
//! Everything forgeboot needs comes from environment variables. They are
//! read once into an [`EnvConfig`] snapshot that is passed to each
//! operation, so the values cannot change halfway through a sequence.
//!
//! | Variable | Field |
//! |---|---|
//! | `GITHUB_AUTO_CONFIG` | [`EnvConfig::auto_config`] (enabled only when exactly `"true"`) |
//! | `GITHUB_USERNAME`, then `GIT_USER_NAME` | [`EnvConfig::user_name`] |
//! | `GITHUB_EMAIL`, then `GIT_USER_EMAIL` | [`EnvConfig::user_email`] |
//! | `GIT_CREDENTIAL_HELPER` | [`EnvConfig::credential_helper`] |
//! | `GITHUB_PAT` | [`EnvConfig::github_token`] |
//! | `GITHUB_API_URL` | [`EnvConfig::github_api_url`] |
//!
//! A variable that is set to the empty string counts as unset.
//!
//! # Example
//!
//! ```ignore
//! use forgeboot_core::EnvConfig;
//!
//! let env = EnvConfig::from_env();
//! if env.auto_config {
//!     println!("credential helper: {}", env.credential_helper_or_default());
//! }
//! ```

use tracing::debug;

/// Enables the git auto-configuration sequence when set to `"true"`.
pub const AUTO_CONFIG_VAR: &str = "GITHUB_AUTO_CONFIG";
/// Primary identity name variable.
pub const USERNAME_VAR: &str = "GITHUB_USERNAME";
/// Fallback identity name variable.
pub const GIT_USER_NAME_VAR: &str = "GIT_USER_NAME";
/// Primary identity email variable.
pub const EMAIL_VAR: &str = "GITHUB_EMAIL";
/// Fallback identity email variable.
pub const GIT_USER_EMAIL_VAR: &str = "GIT_USER_EMAIL";
/// Credential helper override.
pub const CREDENTIAL_HELPER_VAR: &str = "GIT_CREDENTIAL_HELPER";
/// Personal access token for the gh CLI and the REST API.
pub const TOKEN_VAR: &str = "GITHUB_PAT";
/// REST API base URL override.
pub const API_URL_VAR: &str = "GITHUB_API_URL";

/// Credential helper applied when no override is given.
pub const DEFAULT_CREDENTIAL_HELPER: &str = "store";

/// Snapshot of the environment variables forgeboot reads.
#[derive(Clone, Default, PartialEq)]
pub struct EnvConfig {
    /// Whether the auto-configuration sequence is enabled
    pub auto_config: bool,
    /// Global git identity name
    pub user_name: Option<String>,
    /// Global git identity email
    pub user_email: Option<String>,
    /// Credential helper override
    pub credential_helper: Option<String>,
    /// GitHub personal access token
    pub github_token: Option<String>,
    /// GitHub API base URL (for GitHub Enterprise)
    pub github_api_url: Option<String>,
}

impl EnvConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary lookup function.
    ///
    /// Lets tests supply variables without touching the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let config = Self {
            auto_config: lookup(AUTO_CONFIG_VAR).as_deref() == Some("true"),
            user_name: get(USERNAME_VAR).or_else(|| get(GIT_USER_NAME_VAR)),
            user_email: get(EMAIL_VAR).or_else(|| get(GIT_USER_EMAIL_VAR)),
            credential_helper: get(CREDENTIAL_HELPER_VAR),
            github_token: get(TOKEN_VAR),
            github_api_url: get(API_URL_VAR),
        };

        debug!(
            auto_config = config.auto_config,
            has_user_name = config.user_name.is_some(),
            has_user_email = config.user_email.is_some(),
            has_token = config.github_token.is_some(),
            "Environment configuration loaded"
        );

        config
    }

    /// Credential helper to apply, falling back to [`DEFAULT_CREDENTIAL_HELPER`].
    pub fn credential_helper_or_default(&self) -> &str {
        self.credential_helper
            .as_deref()
            .unwrap_or(DEFAULT_CREDENTIAL_HELPER)
    }
}

// The token must never end up in logs.
impl std::fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvConfig")
            .field("auto_config", &self.auto_config)
            .field("user_name", &self.user_name)
            .field("user_email", &self.user_email)
            .field("credential_helper", &self.credential_helper)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("github_api_url", &self.github_api_url)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
