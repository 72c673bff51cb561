//! The query/reply exchange with a nameserver over UDP.
//!
//! One socket per lookup, connected to the nameserver so that the kernel drops datagrams
//! from anyone else. The send and every receive share a single deadline.

use super::Error;

use async_io::{Async, Timer};
use futures_lite::future;

use stubdns_protocol::{Header, Message, ResponseCode};

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

/// The size of the receive buffer.
///
/// Plain DNS caps UDP replies at 512 bytes, but some servers send more without setting
/// TC. A reply that overflows this buffer is cut by the kernel and fails to decode.
const RECV_BUFFER_LEN: usize = 4096;

/// Ask `nameserver` for the A records of `name`.
pub(super) async fn query(
    name: &str,
    nameserver: SocketAddr,
    deadline: Duration,
) -> Result<Vec<Ipv4Addr>, Error> {
    // Create the DNS query.
    let id = fastrand::u16(..);
    let query = Message::query(id, name).to_vec()?;

    // Bind on the nameserver's address family and associate the socket with it.
    let local: SocketAddr = match nameserver {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };
    let socket = Async::<UdpSocket>::bind(local)?;
    socket.get_ref().connect(nameserver)?;

    let mut buf = [0; RECV_BUFFER_LEN];

    let timeout = Timer::after(deadline);
    let timeout = async move {
        timeout.await;
        Err::<usize, _>(Error::TimedOut)
    };

    let len = future::or(exchange(&socket, &query, id, &mut buf), timeout).await?;
    let reply = &buf[..len];

    let header = Header::read(reply)?;
    if header.flags().truncated() {
        log::warn!("reply from {} for {} was truncated", nameserver, name);
        return Err(Error::Truncated);
    }

    match header.flags().response_code() {
        Ok(ResponseCode::NoError) => {}
        code => log::debug!("{} answered {:?} for {}", nameserver, code, name),
    }

    let message = Message::read(reply)?;
    let addrs: Vec<Ipv4Addr> = message.addresses().collect();

    let skipped = message.answers().len() - addrs.len();
    if skipped > 0 {
        log::trace!("skipped {} answers that are not A records", skipped);
    }

    Ok(addrs)
}

/// Send the query, then wait for the datagram that answers it.
///
/// Replies carrying another transaction ID are not ours and are dropped.
async fn exchange(
    socket: &Async<UdpSocket>,
    query: &[u8],
    id: u16,
    buf: &mut [u8],
) -> Result<usize, Error> {
    let sent = socket.send(query).await?;
    if sent == 0 {
        return Err(Error::EmptyWrite);
    }
    log::trace!("sent {} byte query with id {:#06x}", sent, id);

    loop {
        let len = socket.recv(buf).await?;
        log::trace!("received {} byte reply", len);

        let header = Header::read(&buf[..len])?;
        if header.id() == id {
            return Ok(len);
        }

        log::debug!(
            "dropping reply with id {:#06x}, expected {:#06x}",
            header.id(),
            id
        );
    }
}
