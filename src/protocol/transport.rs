use std::{
    io::{Read, Write},
    ops::Range,
    time::Duration,
};

use log::{debug, trace, warn};

use crate::{Error, Result};

use super::{Connection, Request, Response};

/// Size of the `fixed16` response header.
pub const HEADER_SIZE: usize = 16;

const STATUS: Range<usize> = 0..3;
const LENGTH: Range<usize> = 4..15;

/// Status and raw body of one framed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Writes requests to and reads framed responses from a single connection.
pub struct ProtocolTransport<T: Connection> {
    stream: T,
    write_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl<T: Connection> ProtocolTransport<T> {
    pub fn new(stream: T) -> Self {
        Self {
            stream,
            write_timeout: None,
            read_timeout: None,
        }
    }

    pub fn with_timeouts(
        mut self,
        write_timeout: Option<Duration>,
        read_timeout: Option<Duration>,
    ) -> Self {
        self.write_timeout = write_timeout;
        self.read_timeout = read_timeout;
        self
    }

    /// Sends `request` and reads back whatever it expects in return.
    pub fn exchange<R: Request>(&mut self, request: &R) -> Result<Response> {
        self.write_request(&request.render())?;
        request.read_response(self)
    }

    /// Writes `request` in a single write. A short write is an error and is not retried.
    pub fn write_request(&mut self, request: &str) -> Result<()> {
        trace!("sending request {request:?}");

        if self.write_timeout.is_some() {
            self.stream.set_write_timeout(self.write_timeout)?;
        }

        let written = self
            .stream
            .write(request.as_bytes())
            .and_then(|n| self.stream.flush().map(|_| n));

        if self.write_timeout.is_some() {
            if let Err(e) = self.stream.set_write_timeout(None) {
                warn!("failed to clear write timeout: {e}");
            }
        }

        let written = written?;
        if written != request.len() {
            return Err(Error::IncompleteWrite {
                written,
                expected: request.len(),
            });
        }
        Ok(())
    }

    /// Reads the `fixed16` header followed by the body it announces.
    pub fn read_frame(&mut self) -> Result<Frame> {
        if self.read_timeout.is_some() {
            self.stream.set_read_timeout(self.read_timeout)?;
        }

        let frame = self.read_header().and_then(|(status, length)| {
            let body = self.read_body(length)?;
            Ok(Frame { status, body })
        });

        if self.read_timeout.is_some() {
            if let Err(e) = self.stream.set_read_timeout(None) {
                warn!("failed to clear read timeout: {e}");
            }
        }

        frame
    }

    fn read_header(&mut self) -> Result<(u16, usize)> {
        let mut header = [0u8; HEADER_SIZE];
        self.stream.read_exact(&mut header)?;

        let status = parse_field(&header, STATUS, "status")?;
        let length = parse_field(&header, LENGTH, "length")?;
        debug!("response header: status {status}, body length {length}");

        let status =
            u16::try_from(status).map_err(|_| header_error(&header, STATUS, "status"))?;
        let length =
            usize::try_from(length).map_err(|_| header_error(&header, LENGTH, "length"))?;
        Ok((status, length))
    }

    /// Reads up to `length` bytes. Some servers close the stream right at the content
    /// boundary, so an early end of stream returns what arrived. The buffer grows with
    /// the bytes received, never with the announced length.
    fn read_body(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        (&mut self.stream)
            .take(length as u64)
            .read_to_end(&mut body)?;

        if body.len() < length {
            debug!("stream ended after {} of {length} body bytes", body.len());
        }

        while body.last() == Some(&0) {
            body.pop();
        }
        trace!("received body {:?}", String::from_utf8_lossy(&body));
        Ok(body)
    }
}

/// Parses one ASCII decimal field of the header, ignoring surrounding padding.
fn parse_field(
    header: &[u8; HEADER_SIZE],
    range: Range<usize>,
    field: &'static str,
) -> Result<u64> {
    let raw = &header[range.clone()];
    let digits = raw.trim_ascii();

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(header_error(header, range, field));
    }

    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| header_error(header, range, field))
}

fn header_error(header: &[u8; HEADER_SIZE], range: Range<usize>, field: &'static str) -> Error {
    Error::Header {
        field,
        raw: header[range].to_vec(),
        header: *header,
    }
}
