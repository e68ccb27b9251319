pub mod client;
pub mod command;
pub mod error;
pub mod nagios;
pub mod protocol;
pub mod query;
pub mod record;

pub use client::Client;
pub use command::Command;
pub use error::{Error, Result};
pub use protocol::{Address, Connection, Dialer, Request, Response};
pub use query::Query;
pub use record::{Record, RecordError, Value};
