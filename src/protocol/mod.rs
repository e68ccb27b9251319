//! Livestatus wire protocol.
//!
//! This module defines how requests are written to a Livestatus socket and how the
//! server's answers are framed and decoded. It is independent of how a connection is
//! obtained; the [`Client`](crate::Client) owns that decision.
//!
//! # Overview
//!
//! The protocol is plaintext and strictly request/response: one request is written,
//! then its response is read in full before anything else is sent on the connection.
//!
//! - Queries (`GET <table>`) are answered with a framed JSON body.
//! - External commands (`COMMAND [<ts>] <NAME>;<args>`) get no answer at all.
//!
//! # Key Components
//!
//! - [`Request`]: Implemented by [`Query`](crate::Query) and [`Command`](crate::Command).
//! - [`ProtocolTransport`]: Writes a rendered request and reads a framed response.
//! - [`Connection`]: The byte stream a transport runs over (TCP or Unix socket).
//! - [`Response`]: Status, optional error message, and decoded records.
//!
//! # Response Framing
//!
//! Every query ends with `ResponseHeader: fixed16`, so each response starts with a
//! 16 byte header:
//!
//! - Bytes 0-2 hold the three digit status code.
//! - Bytes 4-14 hold the body length in decimal, padded with spaces.
//! - The last byte is a newline.
//!
//! Exactly the announced number of body bytes follow. A status of 400 or more means the
//! body is a plain-text error message rather than JSON.
mod connection;
mod decode;
#[cfg(test)]
pub(crate) mod mock;
mod request;
mod response;
mod transport;

pub use connection::{Address, Connection, Dialer};
pub use decode::decode_rows;
pub use request::Request;
pub use response::Response;
pub use transport::{Frame, HEADER_SIZE, ProtocolTransport};
