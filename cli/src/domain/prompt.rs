//! Credential-prompt matchers.
//!
//! A [`Responder`] watches the text a remote command writes and, whenever its
//! pattern matches text it has not seen before, hands back a canned answer to
//! be written to the command's stdin. [`PromptWatcher`] drives a set of
//! responders over one output stream.

use regex::Regex;

use crate::domain::secret::Secret;

/// Default pattern for the git HTTPS username prompt.
pub const GIT_USERNAME_PATTERN: &str = r"Username for (.)*";

/// Default pattern for the git HTTPS password prompt.
pub const GIT_PASSWORD_PATTERN: &str = r"Password for (.)*";

/// Prompt passed to `sudo -p` for privileged commands.
pub const SUDO_PROMPT: &str = "[sudo] password: ";

/// A (pattern, response) rule answering one interactive prompt.
#[derive(Debug, Clone)]
pub struct Responder {
    source: String,
    pattern: Regex,
    response: Secret,
    index: usize,
}

impl Responder {
    /// Build a responder. The pattern is matched with `.` spanning newlines.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regular expression.
    pub fn new(pattern: &str, response: Secret) -> Result<Self, regex::Error> {
        Ok(Self {
            source: pattern.to_owned(),
            pattern: Regex::new(&format!("(?s){pattern}"))?,
            response,
            index: 0,
        })
    }

    /// Build a responder whose answer is `value` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regular expression.
    pub fn answer_line(pattern: &str, value: &str) -> Result<Self, regex::Error> {
        Self::new(pattern, Secret::new(format!("{value}\n")))
    }

    /// Responder for the `sudo -S -p` prompt.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the prompt is escaped before compilation.
    pub fn sudo(password: &Secret) -> Result<Self, regex::Error> {
        Self::answer_line(&regex::escape(SUDO_PROMPT), password.expose())
    }

    /// The pattern as written, without the `(?s)` flag.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.source
    }

    /// Scan `stream` (everything the command has written so far) and return
    /// one response per match found in the part not yet scanned.
    ///
    /// Once anything matches, the scan offset jumps to the end of `stream`,
    /// so a prompt is answered once even if it stays in the buffer.
    pub fn submit(&mut self, stream: &str) -> Vec<String> {
        let Some(unseen) = stream.get(self.index..) else {
            return Vec::new();
        };
        let hits = self.pattern.find_iter(unseen).count();
        if hits == 0 {
            return Vec::new();
        }
        self.index = stream.len();
        vec![self.response.expose().to_owned(); hits]
    }
}

/// Accumulates one output stream and runs every responder over it.
#[derive(Debug, Default)]
pub struct PromptWatcher {
    seen: String,
    /// Trailing bytes of a UTF-8 sequence cut off at a chunk boundary.
    pending: Vec<u8>,
    responders: Vec<Responder>,
}

impl PromptWatcher {
    #[must_use]
    pub fn new(responders: Vec<Responder>) -> Self {
        Self {
            seen: String::new(),
            pending: Vec::new(),
            responders,
        }
    }

    /// Append a raw chunk and collect the answers it triggers, in responder order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        self.decode_pending();
        let seen = &self.seen;
        self.responders
            .iter_mut()
            .flat_map(|r| r.submit(seen))
            .collect()
    }

    /// Everything fed so far.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.seen
    }

    #[must_use]
    pub fn into_output(mut self) -> String {
        if !self.pending.is_empty() {
            self.seen.push_str(&String::from_utf8_lossy(&self.pending));
        }
        self.seen
    }

    /// Move every complete character from `pending` into `seen`. Invalid
    /// bytes become U+FFFD; an incomplete sequence at the end is kept.
    fn decode_pending(&mut self) {
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    self.seen.push_str(text);
                    self.pending.clear();
                    return;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    let (head, _) = self.pending.split_at(valid);
                    self.seen
                        .push_str(std::str::from_utf8(head).unwrap_or_default());
                    match e.error_len() {
                        None => {
                            self.pending.drain(..valid);
                            return;
                        }
                        Some(bad) => {
                            self.seen.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + bad);
                        }
                    }
                }
            }
        }
    }
}

/// Build the password and username responders used by `git clone` and `git push`.
///
/// # Errors
///
/// Returns an error if either pattern is not a valid regular expression.
pub fn git_credential_responders(
    username_pattern: &str,
    password_pattern: &str,
    username: &str,
    password: &Secret,
) -> Result<Vec<Responder>, regex::Error> {
    Ok(vec![
        Responder::answer_line(password_pattern, password.expose())?,
        Responder::answer_line(username_pattern, username)?,
    ])
}
