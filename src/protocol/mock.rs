use std::{
    cell::RefCell,
    io::{self, Cursor, Read, Write},
    rc::Rc,
    time::Duration,
};

use super::Connection;

/// What a [`MockConnection`] saw, shared with the test after the connection is moved.
#[derive(Debug, Default)]
pub(crate) struct State {
    pub written: Vec<u8>,
    pub write_timeouts: Vec<Option<Duration>>,
    pub read_timeouts: Vec<Option<Duration>>,
    pub closed: bool,
}

/// In-memory connection serving canned bytes, at most `chunk` bytes per read.
pub(crate) struct MockConnection {
    input: Cursor<Vec<u8>>,
    pub chunk: usize,
    pub max_write: Option<usize>,
    /// Makes clearing a timeout fail, as on a socket the peer already reset.
    pub fail_clear_timeout: bool,
    state: Rc<RefCell<State>>,
}

impl MockConnection {
    pub fn new(input: &[u8]) -> (Self, Rc<RefCell<State>>) {
        let state = Rc::new(RefCell::new(State::default()));
        let conn = Self {
            input: Cursor::new(input.to_vec()),
            chunk: usize::MAX,
            max_write: None,
            fail_clear_timeout: false,
            state: Rc::clone(&state),
        };
        (conn, state)
    }
}

impl Read for MockConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk);
        self.input.read(&mut buf[..n])
    }
}

impl Write for MockConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.max_write.unwrap_or(usize::MAX));
        self.state.borrow_mut().written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl MockConnection {
    fn timeout_result(&self, timeout: Option<Duration>) -> io::Result<()> {
        if timeout.is_none() && self.fail_clear_timeout {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "socket closed"));
        }
        Ok(())
    }
}

impl Connection for MockConnection {
    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.state.borrow_mut().write_timeouts.push(timeout);
        self.timeout_result(timeout)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.state.borrow_mut().read_timeouts.push(timeout);
        self.timeout_result(timeout)
    }

    fn close(&mut self) -> io::Result<()> {
        self.state.borrow_mut().closed = true;
        Ok(())
    }
}
