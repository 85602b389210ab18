//! Global git configuration storage.
//!
//! Git's global configuration is a process-wide singleton outside our
//! control, so every read and write goes through [`GitConfigStore`]. The
//! production store shells out to `git config --global`; tests use
//! [`MemoryConfigStore`] instead of touching the real file.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use forgeboot_core::{Error, Result};
use tracing::debug;

use crate::runner::{CommandRunner, CommandSpec, ProcessRunner};

/// `git config` exits with this code when the requested key is not set.
const GIT_CONFIG_KEY_MISSING: i32 = 1;

/// Key-value store for global git settings.
///
/// Keys are multi-valued the way git's are: `set` replaces every value,
/// `add` appends one more.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitConfigStore: Send + Sync {
    /// Read a key. Returns `Ok(None)` if it is not set.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Read every value of a multi-valued key.
    async fn get_all(&self, key: &str) -> Result<Vec<String>>;

    /// Replace the value of a key.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Append a value to a key, keeping existing values.
    async fn add(&self, key: &str, value: &str) -> Result<()>;
}

// =============================================================================
// GitCliConfigStore - `git config --global`
// =============================================================================

/// Store backed by the `git` executable's global configuration.
#[derive(Debug, Clone)]
pub struct GitCliConfigStore<R = ProcessRunner> {
    runner: R,
}

impl GitCliConfigStore<ProcessRunner> {
    /// Store using the `git` found on `PATH`.
    pub fn system() -> Self {
        Self::new(ProcessRunner::new())
    }
}

impl<R: CommandRunner> GitCliConfigStore<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn command(args: &[&str]) -> CommandSpec {
        let mut full = vec!["config", "--global"];
        full.extend_from_slice(args);
        CommandSpec::new("git", full)
    }

    /// Run a read; exit code 1 means the key is absent.
    async fn read(&self, args: &[&str]) -> Result<Option<String>> {
        let spec = Self::command(args);
        let output = self.runner.run(&spec).await?;

        if output.code == Some(GIT_CONFIG_KEY_MISSING) {
            debug!(command = %spec, "Git config key not set");
            return Ok(None);
        }

        let output = output.check(&spec)?;
        Ok(Some(output.stdout))
    }

    async fn write(&self, args: &[&str]) -> Result<()> {
        let spec = Self::command(args);
        self.runner.run(&spec).await?.check(&spec)?;
        Ok(())
    }
}

#[async_trait]
impl<R: CommandRunner> GitConfigStore for GitCliConfigStore<R> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.read(&["--get", key]).await?;
        Ok(value.map(|v| v.trim().to_string()))
    }

    async fn get_all(&self, key: &str) -> Result<Vec<String>> {
        let values = self.read(&["--get-all", key]).await?;
        Ok(values
            .map(|v| v.lines().map(|line| line.trim().to_string()).collect())
            .unwrap_or_default())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.write(&[key, value]).await
    }

    async fn add(&self, key: &str, value: &str) -> Result<()> {
        self.write(&["--add", key, value]).await
    }
}

// =============================================================================
// MemoryConfigStore - In-memory implementation for testing
// =============================================================================

/// In-memory git configuration for testing.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    entries: RwLock<HashMap<String, Vec<String>>>,
}

impl MemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with single-valued entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), vec![v.into()]))
            .collect();
        Self {
            entries: RwLock::new(map),
        }
    }

    /// Every value stored under `key`, in insertion order.
    pub fn values(&self, key: &str) -> Vec<String> {
        self.entries
            .read()
            .map(|entries| entries.get(key).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.entries.read().map(|e| e.is_empty()).unwrap_or(true)
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> Error {
    Error::Config(format!("Lock poisoned: {}", e))
}

#[async_trait]
impl GitConfigStore for MemoryConfigStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        // git reports the last value of a multi-valued key
        Ok(entries.get(key).and_then(|values| values.last().cloned()))
    }

    async fn get_all(&self, key: &str) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned().unwrap_or_default())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), vec![value.to_string()]);
        Ok(())
    }

    async fn add(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }
}
