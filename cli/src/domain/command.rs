//! The `RemoteCommand` value: one shell line plus how to run it.

use serde::Serialize;

use crate::domain::prompt::{Responder, SUDO_PROMPT};

/// One command to run on the remote host.
///
/// `line` is the exact shell text. The working directory and privilege
/// escalation are kept separate and only applied by [`RemoteCommand::render`].
#[derive(Debug, Clone)]
pub struct RemoteCommand {
    line: String,
    cwd: Option<String>,
    privileged: bool,
    pty: bool,
    responders: Vec<Responder>,
}

impl RemoteCommand {
    #[must_use]
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            cwd: None,
            privileged: false,
            pty: false,
            responders: Vec::new(),
        }
    }

    /// Run the command from `dir` (rendered as a `cd <dir> && ` prefix).
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<String>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Run the command through `sudo`.
    #[must_use]
    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    /// Allocate a pseudo-terminal and answer prompts with `responders`.
    #[must_use]
    pub fn interactive(mut self, responders: Vec<Responder>) -> Self {
        self.pty = true;
        self.responders = responders;
        self
    }

    #[must_use]
    pub fn line(&self) -> &str {
        &self.line
    }

    #[must_use]
    pub fn cwd(&self) -> Option<&str> {
        self.cwd.as_deref()
    }

    #[must_use]
    pub fn is_privileged(&self) -> bool {
        self.privileged
    }

    #[must_use]
    pub fn uses_pty(&self) -> bool {
        self.pty
    }

    #[must_use]
    pub fn responders(&self) -> &[Responder] {
        &self.responders
    }

    /// The full line handed to the remote shell.
    ///
    /// ```
    /// use buildhost_cli::domain::command::RemoteCommand;
    ///
    /// let cmd = RemoteCommand::new("apt upgrade").privileged();
    /// assert_eq!(cmd.render(), "sudo -S -p '[sudo] password: ' apt upgrade");
    ///
    /// let cmd = RemoteCommand::new("npm run build").in_dir("/srv/app");
    /// assert_eq!(cmd.render(), "cd /srv/app && npm run build");
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        let mut rendered = String::new();
        if let Some(dir) = &self.cwd {
            rendered.push_str("cd ");
            rendered.push_str(dir);
            rendered.push_str(" && ");
        }
        if self.privileged {
            rendered.push_str("sudo -S -p '");
            rendered.push_str(SUDO_PROMPT);
            rendered.push_str("' ");
        }
        rendered.push_str(&self.line);
        rendered
    }
}

/// A command as it would be sent, without its responders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedCommand {
    /// Fully rendered shell line.
    pub command: String,
    pub privileged: bool,
    /// Runs under a pty with credential responders attached.
    pub interactive: bool,
}

impl From<&RemoteCommand> for PlannedCommand {
    fn from(cmd: &RemoteCommand) -> Self {
        Self {
            command: cmd.render(),
            privileged: cmd.is_privileged(),
            interactive: cmd.uses_pty(),
        }
    }
}
