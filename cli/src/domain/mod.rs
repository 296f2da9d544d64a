//! Domain layer — pure types, command builders, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod command;
pub mod config;
pub mod error;
pub mod prompt;
pub mod secret;
pub mod steps;

pub use command::{PlannedCommand, RemoteCommand};
pub use config::{
    GitConfig, GitIdentityConfig, GitRemoteConfig, HostConfig, PackageConfig, ProjectConfig,
    PromptConfig, ProvisionConfig, SshConfig, validate,
};
pub use error::{AuthTarget, ConfigError, RemoteError};
pub use prompt::{PromptWatcher, Responder};
pub use secret::Secret;
