use std::{
    fmt, io,
    net::{Shutdown, TcpStream},
    os::unix::net::UnixStream,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use log::debug;

/// A bidirectional byte stream to a Livestatus socket.
pub trait Connection: io::Read + io::Write {
    /// `None` clears any previously set timeout.
    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;

    fn close(&mut self) -> io::Result<()>;
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        (**self).set_write_timeout(timeout)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        (**self).set_read_timeout(timeout)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl Connection for TcpStream {
    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_write_timeout(self, timeout)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }

    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

impl Connection for UnixStream {
    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        UnixStream::set_write_timeout(self, timeout)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        UnixStream::set_read_timeout(self, timeout)
    }

    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

/// Opens new connections for a client.
pub trait Dialer {
    fn dial(&self) -> io::Result<Box<dyn Connection>>;
}

impl<F> Dialer for F
where
    F: Fn() -> io::Result<Box<dyn Connection>>,
{
    fn dial(&self) -> io::Result<Box<dyn Connection>> {
        self()
    }
}

/// Location of a Livestatus socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// `host:port`
    Tcp(String),
    Unix(PathBuf),
}

impl Address {
    /// Builds an address from a network name (`tcp` or `unix`) and an address.
    pub fn new(network: &str, address: &str) -> io::Result<Self> {
        match network {
            "tcp" | "tcp4" | "tcp6" => Ok(Address::Tcp(address.to_string())),
            "unix" => Ok(Address::Unix(PathBuf::from(address))),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsupported network '{other}'"),
            )),
        }
    }
}

impl FromStr for Address {
    type Err = io::Error;

    /// Accepts `tcp:host:port`, `unix:/path`, or a bare value, which is read as a
    /// socket path if it contains `/` and as `host:port` otherwise.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((network, address)) = s.split_once(':') {
            if let Ok(address) = Address::new(network, address) {
                return Ok(address);
            }
        }

        if s.is_empty() {
            Err(io::Error::new(io::ErrorKind::InvalidInput, "empty address"))
        } else if s.contains('/') {
            Ok(Address::Unix(PathBuf::from(s)))
        } else {
            Ok(Address::Tcp(s.to_string()))
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Tcp(addr) => write!(f, "tcp:{addr}"),
            Address::Unix(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

impl Dialer for Address {
    fn dial(&self) -> io::Result<Box<dyn Connection>> {
        debug!("dialing {self}");
        let conn: Box<dyn Connection> = match self {
            Address::Tcp(addr) => Box::new(TcpStream::connect(addr.as_str())?),
            Address::Unix(path) => Box::new(UnixStream::connect(path)?),
        };
        Ok(conn)
    }
}
