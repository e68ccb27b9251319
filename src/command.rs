//! External command builder.
//!
//! A [`Command`] carries a command name and an ordered list of arguments, rendered as
//!
//! ```text
//! COMMAND [<unix timestamp>] <NAME>;<arg>;<arg>\n\n
//! ```
//!
//! The timestamp is taken from the command's clock when it is rendered, not when it is
//! built, so rendering the same command twice can produce two different strings. Tests
//! that need exact output install a fixed clock with [`Command::with_clock`].
//!
//! Arguments are not escaped; a value must never contain `;`.
//!
//! # Example
//! ```rust
//! use std::time::{Duration, UNIX_EPOCH};
//! use livestatus::Command;
//!
//! let command = Command::new("DISABLE_HOST_CHECK")
//!     .arg("localhost")
//!     .with_clock(|| UNIX_EPOCH + Duration::from_secs(1_700_000_000));
//!
//! assert_eq!(
//!     command.to_string(),
//!     "COMMAND [1700000000] DISABLE_HOST_CHECK;localhost\n\n"
//! );
//! ```
use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

/// Source of the submission timestamp.
pub type Clock = fn() -> SystemTime;

/// An external command submitted to the monitoring core.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    args: Vec<String>,
    keep_alive: bool,
    clock: Clock,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            keep_alive: false,
            clock: SystemTime::now,
        }
    }

    /// Appends the display form of `value` to the argument list.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(value.to_string());
        self
    }

    pub fn args<I>(self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        values.into_iter().fold(self, |command, value| command.arg(value))
    }

    /// Applies a reusable argument builder, such as a wrapper for one named command.
    pub fn op<F>(self, op: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        op(self)
    }

    /// Keeps the connection open so later requests can reuse it.
    pub fn keep_alive(mut self) -> Self {
        self.keep_alive = true;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn is_keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// Renders the command as submitted at `at`.
    pub fn render_at(&self, at: SystemTime) -> String {
        // A clock set before the epoch renders as 0.
        let timestamp = at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let mut out = format!("COMMAND [{timestamp}] {}", self.name);
        if !self.args.is_empty() {
            out.push(';');
            out.push_str(&self.args.join(";"));
        }
        out.push_str("\n\n");
        out
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_at((self.clock)()))
    }
}
