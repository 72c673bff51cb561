//! A minimal DNS stub resolver.
//!
//! This crate asks one nameserver, over UDP, for the IPv4 addresses of a name. It sends a
//! single recursive A query and reads the reply with [`stubdns-protocol`], which handles
//! the wire format including compressed names.
//!
//! There is no caching, no retrying and no fallback to other servers or to TCP. Each
//! lookup owns its own socket and is bounded by one deadline, one second by default,
//! that covers both sending the query and receiving the reply.
//!
//! [`stubdns-protocol`]: https://crates.io/crates/stubdns-protocol
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), stubdns::Error> {
//! let addrs = stubdns::resolve("example.com", "1.1.1.1")?;
//! for addr in addrs {
//!     println!("{}", addr);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The lookup itself is an ordinary future and can run on any executor:
//!
//! ```no_run
//! # fn main() -> Result<(), stubdns::Error> {
//! use std::time::Duration;
//! use stubdns::Resolver;
//!
//! let resolver = Resolver::new().timeout(Duration::from_millis(500));
//! let addrs = async_io::block_on(resolver.lookup("example.com", [1, 1, 1, 1].into()))?;
//! # Ok(())
//! # }
//! ```

mod error;
mod udp;

pub use error::Error;

/// The message codec used to talk to the nameserver.
pub use stubdns_protocol as protocol;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Resolve the IPv4 addresses of `name` by asking the nameserver at `server` on port 53.
///
/// This blocks the current thread until the reply arrives or one second has passed.
pub fn resolve(name: &str, server: &str) -> Result<Vec<Ipv4Addr>, Error> {
    Resolver::new().resolve(name, server)
}

/// Settings for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolver {
    /// How long a lookup may take in total.
    timeout: Duration,

    /// The port the nameserver listens on.
    port: u16,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// How long a lookup may take unless configured otherwise.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

    /// The standard DNS port.
    pub const DEFAULT_PORT: u16 = 53;

    /// Create a resolver with the default timeout and port.
    pub const fn new() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            port: Self::DEFAULT_PORT,
        }
    }

    /// Set the deadline for a whole lookup, covering both the send and the receive.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the port the nameserver listens on.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Resolve `name` against the nameserver whose IP address is given by `server`,
    /// blocking until the lookup finishes.
    pub fn resolve(&self, name: &str, server: &str) -> Result<Vec<Ipv4Addr>, Error> {
        let server: IpAddr = server.trim().parse().map_err(Error::InvalidServer)?;
        async_io::block_on(self.lookup(name, server))
    }

    /// Resolve `name` against the nameserver at `server`.
    ///
    /// The addresses are returned in the order the answer section lists them. Answers that
    /// are not A records are left out.
    pub async fn lookup(&self, name: &str, server: IpAddr) -> Result<Vec<Ipv4Addr>, Error> {
        let nameserver = SocketAddr::new(server, self.port);
        log::debug!("looking up {} via {}", name, nameserver);

        let addrs = udp::query(name, nameserver, self.timeout).await?;

        log::debug!("{} resolved to {:?}", name, addrs);
        Ok(addrs)
    }
}

fn _assert_send() {
    fn _assertion<F: Send>(_: F) {}
    _assertion(Resolver::new().lookup("foobar", IpAddr::from([127, 0, 0, 1])));
}
