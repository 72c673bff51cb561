//! Lookups against a nameserver running on the loopback interface.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::thread;
use std::time::{Duration, Instant};

use stubdns::protocol::{
    Flags, Message, MessageType, ResourceRecord, ResourceType, ResponseCode, CLASS_IN,
};
use stubdns::{Error, Resolver};

/// Serve a single query on a loopback port, answering it with `respond`.
fn nameserver<F>(respond: F) -> (u16, thread::JoinHandle<()>)
where
    F: FnOnce(&UdpSocket, SocketAddr, &[u8]) + Send + 'static,
{
    let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let port = socket.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let mut buf = [0; 4096];
        let (len, peer) = socket.recv_from(&mut buf).unwrap();
        respond(&socket, peer, &buf[..len]);
    });

    (port, handle)
}

/// Build a reply to `query` carrying `id`, the flags `query` had plus `extra`, and `answers`.
fn reply(
    query: &[u8],
    id: u16,
    extra: impl FnOnce(&mut Flags),
    answers: Vec<ResourceRecord<'_>>,
) -> Vec<u8> {
    let query = Message::read(query).unwrap();

    let mut flags = query.flags();
    flags.set_qr(MessageType::Reply).set_recursion_available(true);
    extra(&mut flags);

    Message::new(id, flags, query.questions().to_vec(), answers)
        .to_vec()
        .unwrap()
}

fn query_id(query: &[u8]) -> u16 {
    Message::read(query).unwrap().id()
}

fn resolver(port: u16) -> Resolver {
    Resolver::new().port(port).timeout(Duration::from_millis(500))
}

#[test]
fn resolves_only_a_records() {
    let aaaa = [0x26, 0x06, 0x28, 0x00, 0x02, 0x20, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0x01];

    let (port, server) = nameserver(move |socket, peer, query| {
        // The query is a recursive A/IN question for the name we asked about.
        let message = Message::read(query).unwrap();
        assert!(message.flags().recursive());
        assert_eq!(message.flags().qr(), MessageType::Query);
        assert!(message.answers().is_empty());

        let question = message.question().unwrap();
        assert_eq!(question.name().to_string(), "example.com");
        assert_eq!(question.record_type(), Ok(ResourceType::A));
        assert_eq!(question.class(), CLASS_IN);

        let answers = vec![
            ResourceRecord::a("example.com", 300, Ipv4Addr::new(93, 184, 216, 34)),
            ResourceRecord::new("example.com", 28, CLASS_IN, 300, &aaaa).unwrap(),
        ];
        let bytes = reply(query, message.id(), |_| {}, answers);
        socket.send_to(&bytes, peer).unwrap();
    });

    let addrs = resolver(port).resolve("example.com", "127.0.0.1").unwrap();
    server.join().unwrap();

    assert_eq!(addrs, vec![Ipv4Addr::new(93, 184, 216, 34)]);
}

#[test]
fn keeps_answer_order() {
    let (port, server) = nameserver(|socket, peer, query| {
        let answers = vec![
            ResourceRecord::a("example.com", 60, Ipv4Addr::new(192, 0, 2, 3)),
            ResourceRecord::a("example.com", 60, Ipv4Addr::new(192, 0, 2, 1)),
            ResourceRecord::a("example.com", 60, Ipv4Addr::new(192, 0, 2, 2)),
        ];
        let bytes = reply(query, query_id(query), |_| {}, answers);
        socket.send_to(&bytes, peer).unwrap();
    });

    let addrs = async_io::block_on(
        resolver(port).lookup("example.com", IpAddr::V4(Ipv4Addr::LOCALHOST)),
    )
    .unwrap();
    server.join().unwrap();

    assert_eq!(
        addrs,
        vec![
            Ipv4Addr::new(192, 0, 2, 3),
            Ipv4Addr::new(192, 0, 2, 1),
            Ipv4Addr::new(192, 0, 2, 2),
        ]
    );
}

#[test]
fn reads_replies_past_512_bytes() {
    let expected: Vec<Ipv4Addr> = (1..=40).map(|i| Ipv4Addr::new(192, 0, 2, i)).collect();
    let records = expected.clone();

    let (port, server) = nameserver(move |socket, peer, query| {
        let answers = records
            .iter()
            .map(|&addr| ResourceRecord::a("example.com", 60, addr))
            .collect();
        let bytes = reply(query, query_id(query), |_| {}, answers);
        assert!(bytes.len() > 512);
        socket.send_to(&bytes, peer).unwrap();
    });

    let addrs = resolver(port).resolve("example.com", "127.0.0.1").unwrap();
    server.join().unwrap();

    assert_eq!(addrs, expected);
}

#[test]
fn times_out_without_a_reply() {
    let (port, server) = nameserver(|_, _, _| {
        // Hold the socket open so the client sees silence rather than a refusal.
        thread::sleep(Duration::from_millis(600));
    });

    let start = Instant::now();
    let err = Resolver::new()
        .port(port)
        .timeout(Duration::from_millis(200))
        .resolve("example.com", "127.0.0.1")
        .unwrap_err();
    let elapsed = start.elapsed();
    server.join().unwrap();

    assert!(err.is_timeout(), "unexpected error: {}", err);
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_secs(2));
}

#[test]
fn drops_replies_with_another_id() {
    let (port, server) = nameserver(|socket, peer, query| {
        let id = query_id(query);

        let spoofed = vec![ResourceRecord::a("example.com", 60, Ipv4Addr::new(6, 6, 6, 6))];
        let bytes = reply(query, id.wrapping_add(1), |_| {}, spoofed);
        socket.send_to(&bytes, peer).unwrap();

        let genuine = vec![ResourceRecord::a("example.com", 60, Ipv4Addr::new(192, 0, 2, 1))];
        let bytes = reply(query, id, |_| {}, genuine);
        socket.send_to(&bytes, peer).unwrap();
    });

    let addrs = resolver(port).resolve("example.com", "127.0.0.1").unwrap();
    server.join().unwrap();

    assert_eq!(addrs, vec![Ipv4Addr::new(192, 0, 2, 1)]);
}

#[test]
fn truncated_reply_is_an_error() {
    let (port, server) = nameserver(|socket, peer, query| {
        let bytes = reply(
            query,
            query_id(query),
            |flags| {
                flags.set_truncated(true);
            },
            Vec::new(),
        );
        socket.send_to(&bytes, peer).unwrap();
    });

    let err = resolver(port)
        .resolve("example.com", "127.0.0.1")
        .unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, Error::Truncated), "unexpected error: {}", err);
}

#[test]
fn short_reply_is_a_protocol_error() {
    let (port, server) = nameserver(|socket, peer, query| {
        let bytes = reply(
            query,
            query_id(query),
            |_| {},
            vec![ResourceRecord::a("example.com", 60, Ipv4Addr::new(192, 0, 2, 1))],
        );

        // Cut the reply off in the middle of the answer's data.
        socket.send_to(&bytes[..bytes.len() - 2], peer).unwrap();
    });

    let err = resolver(port)
        .resolve("example.com", "127.0.0.1")
        .unwrap_err();
    server.join().unwrap();

    match err {
        Error::Protocol(err) => assert!(err.is_truncation(), "unexpected error: {}", err),
        err => panic!("unexpected error: {}", err),
    }
}

#[test]
fn name_error_yields_no_addresses() {
    let (port, server) = nameserver(|socket, peer, query| {
        let bytes = reply(
            query,
            query_id(query),
            |flags| {
                flags.set_response_code(ResponseCode::NameError);
            },
            Vec::new(),
        );
        socket.send_to(&bytes, peer).unwrap();
    });

    let addrs = resolver(port)
        .resolve("nonexistent.example", "127.0.0.1")
        .unwrap();
    server.join().unwrap();

    assert!(addrs.is_empty());
}

#[test]
fn invalid_server_address() {
    let err = stubdns::resolve("example.com", "not an address").unwrap_err();
    assert!(matches!(err, Error::InvalidServer(_)), "unexpected error: {}", err);
}

#[test]
fn unencodable_name() {
    let name = "a".repeat(64);
    let err = resolver(53).resolve(&name, "127.0.0.1").unwrap_err();
    assert!(matches!(err, Error::Protocol(_)), "unexpected error: {}", err);
}

#[test]
fn defaults() {
    assert_eq!(Resolver::DEFAULT_TIMEOUT, Duration::from_secs(1));
    assert_eq!(Resolver::DEFAULT_PORT, 53);
    assert_eq!(Resolver::default(), Resolver::new());
}

/// Will work as long as example.com exists and 1.1.1.1 is reachable.
#[test]
#[ignore = "needs network access"]
fn public_lookup() {
    let addrs = stubdns::resolve("example.com", "1.1.1.1").unwrap();
    assert_ne!(addrs.len(), 0);
}
