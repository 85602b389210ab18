//! Global git identity and credential setup for forgeboot.
//!
//! This crate configures the global git installation of a container from
//! environment variables, using the `git` and `gh` executables. All
//! access to global state goes through the [`GitConfigStore`] and
//! [`GitHubCli`] traits so it can be replaced in tests.

mod gh;
mod runner;
mod setup;
mod store;

pub use gh::{GhCommand, GitHubCli};
pub use runner::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner};
pub use setup::{
    auto_configure_git, configure_git, get_git_config, keys, GitConfigSnapshot,
    GitIdentityUpdate, GitSetup, DEFAULT_BRANCH, GH_GIT_PROTOCOL, SAFE_DIRECTORY_WILDCARD,
};
pub use store::{GitCliConfigStore, GitConfigStore, MemoryConfigStore};
