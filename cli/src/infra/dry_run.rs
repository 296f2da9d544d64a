//! Recording `SessionConnector` used by `buildhost plan`.
//!
//! Nothing leaves the machine: every command succeeds immediately and is
//! appended to a shared log, which then holds the exact sequence a real run
//! would issue.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use crate::application::ports::{CommandOutput, RemoteShell, SessionConnector};
use crate::domain::command::PlannedCommand;
use crate::domain::{HostConfig, RemoteCommand, Secret};

#[derive(Debug, Default, Clone)]
pub struct DryRunConnector {
    log: Rc<RefCell<Vec<PlannedCommand>>>,
}

impl DryRunConnector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far, in order.
    #[must_use]
    pub fn planned(&self) -> Vec<PlannedCommand> {
        self.log.borrow().clone()
    }
}

impl SessionConnector for DryRunConnector {
    type Session = DryRunSession;

    fn connect(&self, host: &HostConfig, _password: &Secret) -> Result<DryRunSession> {
        tracing::debug!(host = %host.host, "dry run: skipping connection");
        Ok(DryRunSession {
            log: Rc::clone(&self.log),
        })
    }
}

pub struct DryRunSession {
    log: Rc<RefCell<Vec<PlannedCommand>>>,
}

impl RemoteShell for DryRunSession {
    fn run(&self, command: &RemoteCommand) -> Result<CommandOutput> {
        self.log.borrow_mut().push(PlannedCommand::from(command));
        Ok(CommandOutput::default())
    }
}
