//! Errors returned by a lookup.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::net::AddrParseError;

/// An error that ends a lookup.
///
/// A lookup either returns every address it found or exactly one of these; there is no
/// partial result.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The nameserver address is not an IP address.
    InvalidServer(AddrParseError),

    /// Creating, connecting, writing to or reading from the socket failed.
    Io(io::Error),

    /// The socket accepted none of the query bytes.
    EmptyWrite,

    /// No matching reply arrived before the deadline.
    TimedOut,

    /// The nameserver set the truncation flag; the full answer needs TCP.
    Truncated,

    /// The query could not be encoded, or the reply could not be decoded.
    Protocol(stubdns_protocol::Error),
}

impl Error {
    /// Whether the lookup ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::TimedOut)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidServer(err) => write!(f, "invalid nameserver address: {}", err),
            Error::Io(err) => write!(f, "socket error: {}", err),
            Error::EmptyWrite => f.write_str("no bytes of the query were sent"),
            Error::TimedOut => f.write_str("timed out waiting for the nameserver"),
            Error::Truncated => f.write_str("reply was truncated"),
            Error::Protocol(err) => write!(f, "malformed message: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::InvalidServer(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Protocol(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<stubdns_protocol::Error> for Error {
    fn from(err: stubdns_protocol::Error) -> Self {
        Error::Protocol(err)
    }
}
