//! SSH transport — the `SessionConnector` / `RemoteShell` adapter over libssh2.
//!
//! One `SshSession` owns one TCP connection and one authenticated libssh2
//! session. Commands run on a fresh channel each; the session disconnects
//! when the `SshSession` is dropped. Local stdin is relayed to the running
//! command, so questions no responder answers reach the operator.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use ssh2::{Channel, CheckResult, HashType, KnownHostFileKind, Session};

use crate::application::ports::{CommandOutput, RemoteShell, SessionConnector};
use crate::domain::config::SshConfig;
use crate::domain::{AuthTarget, HostConfig, PromptWatcher, RemoteCommand, RemoteError, Responder, Secret};

/// How long to sleep when neither output stream has data.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

const READ_CHUNK: usize = 8192;

/// Opens password-authenticated SSH sessions.
#[derive(Debug, Clone)]
pub struct SshConnector {
    connect_timeout: Duration,
    known_hosts: Option<PathBuf>,
    strict_host_key_checking: bool,
    echo: bool,
}

impl SshConnector {
    /// Build a connector from the `[ssh]` config section.
    ///
    /// `echo` streams remote output to the local terminal as it arrives.
    #[must_use]
    pub fn from_config(ssh: &SshConfig, echo: bool) -> Self {
        let known_hosts = ssh.known_hosts.clone().or_else(default_known_hosts);
        Self {
            connect_timeout: Duration::from_secs(ssh.connect_timeout_secs),
            known_hosts,
            strict_host_key_checking: ssh.strict_host_key_checking,
            echo,
        }
    }

    fn open_tcp(&self, host: &HostConfig) -> Result<TcpStream, RemoteError> {
        let unreachable = |reason: String| RemoteError::Connection {
            host: host.host.clone(),
            port: host.port,
            reason,
        };
        let addrs = (host.host.as_str(), host.port)
            .to_socket_addrs()
            .map_err(|e| unreachable(format!("resolving {}: {e}", host.host)))?;

        let mut last_error = format!("{} resolved to no addresses", host.host);
        for addr in addrs {
            tracing::debug!(%addr, "opening tcp connection");
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = format!("{addr}: {e}"),
            }
        }
        Err(unreachable(last_error))
    }

    fn verify_host_key(&self, session: &Session, host: &HostConfig) -> Result<()> {
        let (key, _) = session
            .host_key()
            .ok_or_else(|| RemoteError::Session("server sent no host key".to_string()))?;
        let fingerprint = session
            .host_key_hash(HashType::Sha256)
            .map(hex)
            .unwrap_or_default();

        let mut known = session.known_hosts()?;
        if let Some(path) = self.known_hosts.as_deref().filter(|p| p.exists()) {
            known
                .read_file(path, KnownHostFileKind::OpenSSH)
                .with_context(|| format!("reading {}", path.display()))?;
        }

        match known.check_port(&host.host, host.port, key) {
            CheckResult::Match => Ok(()),
            CheckResult::Mismatch => Err(RemoteError::HostKeyMismatch {
                host: host.host.clone(),
            }
            .into()),
            CheckResult::NotFound | CheckResult::Failure => {
                if self.strict_host_key_checking {
                    return Err(RemoteError::HostKeyUnknown {
                        host: host.host.clone(),
                    }
                    .into());
                }
                tracing::warn!(
                    host = %host.host,
                    sha256 = %fingerprint,
                    "accepting host key not present in known_hosts"
                );
                Ok(())
            }
        }
    }
}

impl SessionConnector for SshConnector {
    type Session = SshSession;

    fn connect(&self, host: &HostConfig, password: &Secret) -> Result<SshSession> {
        let tcp = self.open_tcp(host)?;
        let handshake_failed = |e: ssh2::Error| RemoteError::Connection {
            host: host.host.clone(),
            port: host.port,
            reason: e.to_string(),
        };

        let mut session = Session::new().map_err(handshake_failed)?;
        session.set_tcp_stream(tcp);
        session.handshake().map_err(handshake_failed)?;
        self.verify_host_key(&session, host)?;

        if let Err(e) = session.userauth_password(&host.username, password.expose()) {
            tracing::debug!(error = %e, "password authentication rejected");
            return Err(RemoteError::Authentication {
                target: AuthTarget::Host,
            }
            .into());
        }
        if !session.authenticated() {
            return Err(RemoteError::Authentication {
                target: AuthTarget::Host,
            }
            .into());
        }
        tracing::info!(host = %host.host, port = host.port, user = %host.username, "ssh session established");

        Ok(SshSession {
            session,
            sudo_password: password.clone(),
            echo: self.echo,
            input: spawn_input_reader(io::stdin()),
        })
    }
}

/// An authenticated session. Disconnects on drop.
pub struct SshSession {
    session: Session,
    sudo_password: Secret,
    echo: bool,
    /// Operator keystrokes, relayed to whichever command is running.
    input: Receiver<Vec<u8>>,
}

impl SshSession {
    fn responders_for(&self, command: &RemoteCommand) -> Result<Vec<Responder>> {
        let mut responders = command.responders().to_vec();
        if command.is_privileged() {
            responders.push(Responder::sudo(&self.sudo_password)?);
        }
        Ok(responders)
    }
}

impl RemoteShell for SshSession {
    fn run(&self, command: &RemoteCommand) -> Result<CommandOutput> {
        let responders = self.responders_for(command)?;
        let mut channel = self.session.channel_session().context("opening ssh channel")?;
        if command.uses_pty() {
            channel
                .request_pty("xterm", None, None)
                .context("requesting pty")?;
        }
        channel
            .exec(&command.render())
            .with_context(|| format!("starting '{}'", command.line()))?;

        self.session.set_blocking(false);
        let pumped = pump(&mut channel, responders, &self.input, self.echo);
        self.session.set_blocking(true);
        let (stdout, stderr) = pumped?;

        channel.wait_close().context("closing ssh channel")?;
        let status = channel.exit_status().context("reading exit status")?;
        Ok(CommandOutput {
            status,
            stdout: stdout.into_output(),
            stderr: stderr.into_output(),
        })
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        if let Err(e) = self.session.disconnect(None, "buildhost run finished", None) {
            tracing::debug!(error = %e, "ssh disconnect failed");
        } else {
            tracing::debug!("ssh session closed");
        }
    }
}

// ── Channel pumping ──────────────────────────────────────────────────────────

/// The parts of an exec channel [`pump`] drives.
trait ExecStreams {
    fn read_stdout(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    fn read_stderr(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    fn write_stdin(&mut self, data: &[u8]) -> io::Result<usize>;
    fn flush_stdin(&mut self) -> io::Result<()>;
    fn at_eof(&self) -> bool;
}

impl ExecStreams for Channel {
    fn read_stdout(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    fn read_stderr(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stderr().read(buf)
    }

    fn write_stdin(&mut self, data: &[u8]) -> io::Result<usize> {
        Write::write(self, data)
    }

    fn flush_stdin(&mut self) -> io::Result<()> {
        Write::flush(self)
    }

    fn at_eof(&self) -> bool {
        self.eof()
    }
}

/// Read both streams until the remote side closes them. Prompt answers and
/// operator input are written to the command's stdin as they come up.
fn pump(
    streams: &mut impl ExecStreams,
    responders: Vec<Responder>,
    input: &Receiver<Vec<u8>>,
    echo: bool,
) -> Result<(PromptWatcher, PromptWatcher)> {
    let mut stdout = PromptWatcher::new(responders.clone());
    let mut stderr = PromptWatcher::new(responders);
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        let mut progressed = false;

        if let Some(n) = available(streams.read_stdout(&mut buf))? {
            progressed = true;
            echo_chunk(echo, &buf[..n], false);
            for answer in stdout.feed(&buf[..n]) {
                write_fully(streams, answer.as_bytes())?;
            }
        }
        if let Some(n) = available(streams.read_stderr(&mut buf))? {
            progressed = true;
            echo_chunk(echo, &buf[..n], true);
            for answer in stderr.feed(&buf[..n]) {
                write_fully(streams, answer.as_bytes())?;
            }
        }
        while let Ok(keys) = input.try_recv() {
            progressed = true;
            write_fully(streams, &keys)?;
        }

        if !progressed {
            if streams.at_eof() {
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
    Ok((stdout, stderr))
}

/// Non-blocking read result: `Some(n)` with data, `None` when nothing is ready or at EOF.
fn available(read: io::Result<usize>) -> Result<Option<usize>> {
    match read {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
        Err(e) => Err(e).context("reading remote output"),
    }
}

/// Write all of `data` to a non-blocking stdin.
fn write_fully(streams: &mut impl ExecStreams, mut data: &[u8]) -> Result<()> {
    while !data.is_empty() {
        match streams.write_stdin(data) {
            Ok(n) => data = &data[n..],
            Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(e).context("writing to remote stdin"),
        }
    }
    loop {
        match streams.flush_stdin() {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(e).context("writing to remote stdin"),
        }
    }
}

fn echo_chunk(echo: bool, chunk: &[u8], is_stderr: bool) {
    if !echo {
        return;
    }
    // Local echo failures are ignored.
    if is_stderr {
        let mut err = io::stderr().lock();
        if err.write_all(chunk).is_ok() {
            let _ = err.flush();
        }
    } else {
        let mut out = io::stdout().lock();
        if out.write_all(chunk).is_ok() {
            let _ = out.flush();
        }
    }
}

/// Relay everything `source` yields, chunk by chunk, until it ends.
///
/// The reader thread blocks on `source` and is left behind when the session
/// closes; it ends with the process or at end of input.
fn spawn_input_reader(mut source: impl Read + Send + 'static) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("stdin-relay".to_string())
        .spawn(move || {
            let mut buf = [0u8; 1024];
            loop {
                match source.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });
    if let Err(e) = spawned {
        tracing::debug!(error = %e, "stdin relay not started");
    }
    rx
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

/// Default `known_hosts` location, if a home directory exists.
#[must_use]
pub fn default_known_hosts() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".ssh").join("known_hosts"))
}
