//! Connection session management.
//!
//! A [`Client`] owns at most one live connection. Connections are dialed lazily on the
//! first request and kept only while requests ask for keepalive:
//!
//! - Disconnected: the next request dials a new connection.
//! - Connected: the next request reuses the kept connection.
//!
//! After an exchange the connection is retained if the request asked for keepalive,
//! and closed otherwise. A transport, framing, or decode failure always closes it,
//! since the stream can no longer be trusted to be at a request boundary.
//!
//! A client runs one exchange at a time and is not meant to be shared between threads;
//! use one client per logical caller.
//!
//! # Example
//! ```rust,no_run
//! use livestatus::{Address, Client, Query};
//!
//! let address: Address = "/var/lib/nagios/rw/live".parse().unwrap();
//! let mut client = Client::new(address);
//!
//! let response = client
//!     .exec(&Query::new("hosts").columns(["name", "state"]))
//!     .unwrap();
//!
//! for record in &response.records {
//!     println!("{} {}", record.get_string("name").unwrap(), record.get_int("state").unwrap());
//! }
//! ```
use std::time::Duration;

use log::{debug, warn};

use crate::{
    Error, Result,
    protocol::{Connection, Dialer, ProtocolTransport, Request, Response},
};

enum Session {
    Disconnected,
    Connected(Box<dyn Connection>),
}

/// A Livestatus client holding an optional kept-alive connection.
pub struct Client {
    dialer: Box<dyn Dialer>,
    session: Session,
    write_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl Client {
    /// Creates a client dialing through `dialer`, either an
    /// [`Address`](crate::Address) or a closure returning a boxed connection.
    pub fn new(dialer: impl Dialer + 'static) -> Self {
        Self {
            dialer: Box::new(dialer),
            session: Session::Disconnected,
            write_timeout: None,
            read_timeout: None,
        }
    }

    /// Bounds how long writing a request may block.
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    /// Bounds how long each read of a response may block.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.session, Session::Connected(_))
    }

    /// Sends `request` and waits for the full response.
    ///
    /// A query rejected by the server fails with [`Error::InvalidQuery`], which carries
    /// the status and the server's message.
    pub fn exec<R: Request>(&mut self, request: &R) -> Result<Response> {
        let mut conn = match std::mem::replace(&mut self.session, Session::Disconnected) {
            Session::Connected(conn) => {
                debug!("reusing kept-alive connection");
                conn
            }
            Session::Disconnected => self.dialer.dial().map_err(Error::Connect)?,
        };

        let result = ProtocolTransport::new(conn.as_mut())
            .with_timeouts(self.write_timeout, self.read_timeout)
            .exchange(request);

        match &result {
            // A rejected query was read in full, so the stream is still usable.
            Ok(_) | Err(Error::InvalidQuery(_)) if request.is_keep_alive() => {
                debug!("keeping connection alive");
                self.session = Session::Connected(conn);
            }
            _ => release(conn),
        }

        result
    }

    /// Closes the kept connection, if any.
    pub fn close(&mut self) {
        if let Session::Connected(conn) =
            std::mem::replace(&mut self.session, Session::Disconnected)
        {
            release(conn);
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.close();
    }
}

fn release(mut conn: Box<dyn Connection>) {
    debug!("closing connection");
    if let Err(e) = conn.close() {
        warn!("failed to close connection: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        collections::VecDeque,
        io::{self, Read, Write},
        os::unix::net::UnixListener,
        rc::Rc,
        thread,
    };

    use tempdir::TempDir;

    use crate::{
        Address, Command, Query,
        protocol::mock::{MockConnection, State},
    };

    use super::*;

    fn response(status: u16, body: &str) -> Vec<u8> {
        let mut out = format!("{status:03} {:>11}\n", body.len()).into_bytes();
        out.extend_from_slice(body.as_bytes());
        out
    }

    /// A client whose dials hand out the given mocks in order.
    fn client(conns: Vec<MockConnection>) -> (Client, Rc<RefCell<usize>>) {
        let dials = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&dials);
        let conns = RefCell::new(VecDeque::from(conns));

        let client = Client::new(move || -> io::Result<Box<dyn Connection>> {
            *counter.borrow_mut() += 1;
            match conns.borrow_mut().pop_front() {
                Some(conn) => Ok(Box::new(conn)),
                None => Err(io::Error::new(io::ErrorKind::ConnectionRefused, "no server")),
            }
        });
        (client, dials)
    }

    fn mock(input: &[u8]) -> (MockConnection, Rc<RefCell<State>>) {
        MockConnection::new(input)
    }

    #[test]
    fn client_closes_without_keep_alive() {
        let (conn, state) = mock(&response(200, r#"[["name"],["a"]]"#));
        let (mut client, dials) = client(vec![conn]);

        let resp = client.exec(&Query::new("hosts")).unwrap();

        assert_eq!(resp.len(), 1);
        assert_eq!(*dials.borrow(), 1);
        assert!(state.borrow().closed);
        assert!(!client.is_connected());
    }

    #[test]
    fn client_reuses_keep_alive_connection() {
        let mut input = response(200, r#"[["name"],["a"]]"#);
        input.extend_from_slice(&response(200, r#"[["name"],["b"]]"#));
        let (conn, state) = mock(&input);
        let (mut client, dials) = client(vec![conn]);

        let query = Query::new("hosts").keep_alive();
        let first = client.exec(&query).unwrap();
        assert!(client.is_connected());
        assert!(!state.borrow().closed);

        let second = client.exec(&query).unwrap();
        assert_eq!(first.records[0].get_string("name").unwrap(), "a");
        assert_eq!(second.records[0].get_string("name").unwrap(), "b");
        assert_eq!(*dials.borrow(), 1);

        client.close();
        assert!(state.borrow().closed);
        assert!(!client.is_connected());
    }

    #[test]
    fn client_closes_kept_connection_after_plain_request() {
        let mut input = response(200, "[]");
        input.extend_from_slice(&response(200, "[]"));
        let (conn, state) = mock(&input);
        let (mut client, dials) = client(vec![conn]);

        client.exec(&Query::new("hosts").keep_alive()).unwrap();
        client.exec(&Query::new("hosts")).unwrap();

        assert_eq!(*dials.borrow(), 1);
        assert!(state.borrow().closed);
        assert!(!client.is_connected());
    }

    #[test]
    fn client_dials_again_after_close() {
        let (first, _) = mock(&response(200, "[]"));
        let (second, _) = mock(&response(200, "[]"));
        let (mut client, dials) = client(vec![first, second]);

        let query = Query::new("hosts").keep_alive();
        client.exec(&query).unwrap();
        client.close();
        client.exec(&query).unwrap();

        assert_eq!(*dials.borrow(), 2);
    }

    #[test]
    fn client_keeps_connection_after_rejected_query() {
        let mut input = response(400, "Invalid query\n");
        input.extend_from_slice(&response(200, "[]"));
        let (conn, _) = mock(&input);
        let (mut client, dials) = client(vec![conn]);

        let query = Query::new("hosts").keep_alive();
        assert!(matches!(client.exec(&query), Err(Error::InvalidQuery(_))));
        assert!(client.is_connected());

        client.exec(&query).unwrap();
        assert_eq!(*dials.borrow(), 1);
    }

    #[test]
    fn client_drops_connection_on_transport_error() {
        let (conn, state) = mock(b"20");
        let (mut client, _) = client(vec![conn]);

        let result = client.exec(&Query::new("hosts").keep_alive());

        assert!(matches!(result, Err(Error::Io(_))));
        assert!(state.borrow().closed);
        assert!(!client.is_connected());
    }

    #[test]
    fn client_dial_failure() {
        let (mut client, _) = client(vec![]);

        assert!(matches!(
            client.exec(&Query::new("hosts")),
            Err(Error::Connect(_))
        ));
    }

    #[test]
    fn client_sends_command() {
        let (conn, state) = mock(b"");
        let (mut client, _) = client(vec![conn]);

        let resp = client
            .exec(&Command::new("ENABLE_NOTIFICATIONS"))
            .unwrap();

        assert_eq!(resp.status, 0);
        assert!(resp.records.is_empty());
        let written = String::from_utf8(state.borrow().written.clone()).unwrap();
        assert!(written.ends_with("] ENABLE_NOTIFICATIONS\n\n"));
        assert!(state.borrow().closed);
    }

    #[test]
    fn client_applies_timeouts() {
        let (conn, state) = mock(&response(200, "[]"));
        let (client, _) = client(vec![conn]);
        let mut client = client
            .with_write_timeout(Duration::from_millis(500))
            .with_read_timeout(Duration::from_secs(3));

        client.exec(&Query::new("hosts")).unwrap();

        let state = state.borrow();
        assert_eq!(
            state.write_timeouts,
            vec![Some(Duration::from_millis(500)), None]
        );
        assert_eq!(state.read_timeouts, vec![Some(Duration::from_secs(3)), None]);
    }

    /// Reads one request, terminated by an empty line, from `stream`.
    fn read_request(stream: &mut impl Read) -> Option<String> {
        let mut request = Vec::new();
        let mut byte = [0u8; 1];
        while !request.ends_with(b"\n\n") {
            if stream.read(&mut byte).ok()? == 0 {
                return None;
            }
            request.push(byte[0]);
        }
        String::from_utf8(request).ok()
    }

    #[test]
    fn client_over_unix_socket() {
        let dir = TempDir::new("livestatus").unwrap();
        let path = dir.path().join("live");
        let listener = UnixListener::bind(&path).unwrap();

        let server = thread::spawn(move || {
            let mut requests = Vec::new();
            // One kept-alive connection serving two queries, then a plain one.
            for _ in 0..2 {
                let (mut stream, _) = listener.accept().unwrap();
                while let Some(request) = read_request(&mut stream) {
                    let body = r#"[["name","state"],["web01",0]]"#;
                    let mut out = format!("200 {:>11}\n", body.len()).into_bytes();
                    out.extend_from_slice(body.as_bytes());
                    stream.write_all(&out).unwrap();
                    requests.push(request);
                }
            }
            requests
        });

        let mut client = Client::new(Address::Unix(path));
        let kept = Query::new("hosts").keep_alive();
        let first = client.exec(&kept).unwrap();
        let second = client.exec(&kept).unwrap();
        client.close();
        let third = client.exec(&Query::new("hosts")).unwrap();

        for resp in [&first, &second, &third] {
            assert_eq!(resp.status, 200);
            assert_eq!(resp.records[0].get_string("name").unwrap(), "web01");
            assert!(!resp.records[0].get_bool("state").unwrap());
        }

        let requests = server.join().unwrap();
        assert_eq!(
            requests,
            vec![kept.to_string(), kept.to_string(), Query::new("hosts").to_string()]
        );
    }
}
