//! Core types, error handling, and configuration for forgeboot.
//!
//! This crate provides the pieces shared by the git setup sequencer and
//! the GitHub API facade.

pub mod config;
pub mod error;
pub mod outcome;

pub use config::EnvConfig;
pub use error::{Error, Result};
pub use outcome::Outcome;
