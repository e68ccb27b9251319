use crate::{Command, Error, Query, Result, protocol::decode::decode_rows};

use super::{Connection, ProtocolTransport, Response};

/// Something a client can send: a rendered request plus the knowledge of what, if
/// anything, comes back.
pub trait Request {
    /// Wire form of the request. Re-rendered on every send.
    fn render(&self) -> String;

    /// Whether the connection should stay open after this exchange.
    fn is_keep_alive(&self) -> bool;

    /// Reads the server's answer once the request has been written.
    fn read_response<T: Connection>(
        &self,
        transport: &mut ProtocolTransport<T>,
    ) -> Result<Response>;
}

impl Request for Query {
    fn render(&self) -> String {
        self.to_string()
    }

    fn is_keep_alive(&self) -> bool {
        Query::is_keep_alive(self)
    }

    fn read_response<T: Connection>(
        &self,
        transport: &mut ProtocolTransport<T>,
    ) -> Result<Response> {
        let frame = transport.read_frame()?;

        if frame.status >= 400 {
            let message = String::from_utf8_lossy(&frame.body);
            return Err(Error::InvalidQuery(Response {
                status: frame.status,
                message: Some(message.trim_end_matches('\n').to_string()),
                records: Vec::new(),
            }));
        }

        let records = if frame.body.is_empty() {
            Vec::new()
        } else {
            decode_rows(&frame.body, self.column_names())?
        };

        Ok(Response {
            status: frame.status,
            message: None,
            records,
        })
    }
}

impl Request for Command {
    fn render(&self) -> String {
        self.to_string()
    }

    fn is_keep_alive(&self) -> bool {
        Command::is_keep_alive(self)
    }

    /// External commands get no reply; a complete write is the only confirmation.
    fn read_response<T: Connection>(
        &self,
        _transport: &mut ProtocolTransport<T>,
    ) -> Result<Response> {
        Ok(Response::default())
    }
}
