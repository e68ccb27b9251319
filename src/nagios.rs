//! Argument encoders for the Nagios external-command vocabulary.
//!
//! Nagios commands take plain positional arguments, but a few kinds of value have a
//! fixed textual encoding. These wrappers implement [`Display`](std::fmt::Display) so
//! they can be passed straight to [`Command::arg`](crate::Command::arg).
//!
//! # Example
//! ```rust
//! use livestatus::{Command, nagios::{Flag, Sticky}};
//!
//! let command = Command::new("ACKNOWLEDGE_HOST_PROBLEM")
//!     .arg("web01")
//!     .arg(Sticky(true))
//!     .arg(Flag(true))
//!     .arg(Flag(false))
//!     .arg("admin")
//!     .arg("looking into it");
//!
//! assert_eq!(
//!     command.arguments(),
//!     ["web01", "2", "1", "0", "admin", "looking into it"]
//! );
//! ```
use std::{
    fmt,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// The `sticky` option of acknowledgements: `2` when set, `0` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sticky(pub bool);

impl fmt::Display for Sticky {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "2" } else { "0" })
    }
}

/// Boolean options such as `notify`, `persistent`, `fixed` or `delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flag(pub bool);

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "1" } else { "0" })
    }
}

/// A duration in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seconds(pub Duration);

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_secs())
    }
}

/// A point in time as Unix epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp(pub SystemTime);

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.duration_since(UNIX_EPOCH) {
            Ok(d) => write!(f, "{}", d.as_secs()),
            Err(e) => write!(f, "-{}", e.duration().as_secs()),
        }
    }
}
