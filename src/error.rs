use std::io;

use thiserror::Error;

use crate::{protocol::Response, record::RecordError};

/// Failures surfaced by a Livestatus exchange.
///
/// Variants are kept distinct so callers can tell a rejected query apart from a
/// broken transport and pick their own retry policy.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to connect: {0}")]
    Connect(#[source] io::Error),

    #[error("transport io error: {0}")]
    Io(#[from] io::Error),

    #[error("incomplete write: {written} of {expected} bytes sent")]
    IncompleteWrite { written: usize, expected: usize },

    #[error("malformed response header: invalid {field} {raw:?} in {header:?}")]
    Header {
        field: &'static str,
        raw: Vec<u8>,
        header: [u8; 16],
    },

    #[error("invalid query: {}", .0.message.as_deref().unwrap_or_default())]
    InvalidQuery(Response),

    #[error("failed to decode response body: {reason}")]
    Decode { reason: String, raw: Vec<u8> },

    #[error(transparent)]
    Record(#[from] RecordError),
}

pub type Result<T> = std::result::Result<T, Error>;
