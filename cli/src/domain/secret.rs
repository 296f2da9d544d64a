//! Password newtype that never prints its contents.

use std::fmt;

/// Prompt for the SSH user's password (also used for `sudo`).
pub const HOST_PASSWORD_PROMPT: &str = "Enter the user password";

/// Prompt for the git remote password.
pub const REPO_PASSWORD_PROMPT: &str = "Enter the gitlab password";

/// A password held in memory for the duration of one run.
///
/// `Debug` and `Display` both render `***`, so a `Secret` can travel inside
/// structs that get logged without leaking the value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value. Only adapters that hand it to the remote side call this.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}
