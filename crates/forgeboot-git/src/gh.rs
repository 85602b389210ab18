//! GitHub CLI (`gh`) adapter.

use async_trait::async_trait;
use forgeboot_core::Result;
use tracing::debug;

use crate::runner::{CommandRunner, CommandSpec, ProcessRunner};

/// Operations performed against the GitHub CLI.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubCli: Send + Sync {
    /// Authenticate the CLI with a personal access token.
    async fn login_with_token(&self, token: &str) -> Result<()>;

    /// Set the protocol the CLI uses for git operations (`https` or `ssh`).
    async fn set_git_protocol(&self, protocol: &str) -> Result<()>;
}

/// [`GitHubCli`] that runs the `gh` executable.
#[derive(Debug, Clone)]
pub struct GhCommand<R = ProcessRunner> {
    runner: R,
}

impl GhCommand<ProcessRunner> {
    /// Adapter using the `gh` found on `PATH`.
    pub fn system() -> Self {
        Self::new(ProcessRunner::new())
    }
}

impl<R: CommandRunner> GhCommand<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl<R: CommandRunner> GitHubCli for GhCommand<R> {
    async fn login_with_token(&self, token: &str) -> Result<()> {
        // The token goes through stdin so it never shows up in argv.
        let spec = CommandSpec::new("gh", ["auth", "login", "--with-token"])
            .with_stdin(format!("{}\n", token));
        debug!(command = %spec, "Authenticating GitHub CLI");
        self.runner.run(&spec).await?.check(&spec)?;
        Ok(())
    }

    async fn set_git_protocol(&self, protocol: &str) -> Result<()> {
        let spec = CommandSpec::new("gh", ["config", "set", "git_protocol", protocol]);
        self.runner.run(&spec).await?.check(&spec)?;
        Ok(())
    }
}
