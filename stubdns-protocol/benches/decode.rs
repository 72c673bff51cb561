//! Cost of encoding a query and decoding a compressed reply.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::net::Ipv4Addr;
use stubdns_protocol::{Flags, Message, MessageType, ResourceRecord};

/// A reply with eight A records whose names all point back at the question.
fn compressed_reply() -> Vec<u8> {
    let mut bytes = Message::query(0x1234, "www.example.com").to_vec().unwrap();

    bytes[2] |= 0x80;
    bytes[7] = 8;
    for i in 0..8u8 {
        bytes.extend_from_slice(&[0xC0, 12, 0, 1, 0, 1, 0, 0, 0x0E, 0x10, 0, 4, 10, 0, 0, i]);
    }
    bytes
}

fn decode(c: &mut Criterion) {
    let reply = compressed_reply();

    c.bench_function("decode compressed reply", |b| {
        b.iter(|| {
            let message = Message::read(black_box(&reply)).unwrap();
            black_box(message.addresses().collect::<Vec<_>>());
        });
    });
}

fn encode(c: &mut Criterion) {
    let mut buf = [0; 512];

    c.bench_function("encode query", |b| {
        b.iter(|| {
            let message = Message::query(black_box(0x1234), black_box("www.example.com"));
            black_box(message.write(&mut buf).unwrap());
        });
    });

    let mut flags = Flags::standard_query();
    flags.set_qr(MessageType::Reply);
    let answers = (0..8)
        .map(|i| ResourceRecord::a("www.example.com", 3600, Ipv4Addr::new(10, 0, 0, i)))
        .collect();
    let query = Message::query(0x1234, "www.example.com");
    let reply = Message::new(0x1234, flags, query.questions().to_vec(), answers);

    c.bench_function("encode uncompressed reply", |b| {
        b.iter(|| black_box(reply.write(&mut buf).unwrap()));
    });
}

criterion_group! {
    benches,
    decode,
    encode,
}

criterion_main!(benches);
