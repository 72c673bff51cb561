//! Synchronous implementation of `nslookup`, using `stubdns-protocol`.
//!
//! Only works on Unix.

use std::env;
use std::fs;
use std::io::{prelude::*, BufReader};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, UdpSocket};
use std::process;
use std::time::Duration;

use stubdns_protocol::{Message, RecordData};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The first argument is the name to lookup.
    let mut args = env::args();
    let program_name = args.next().unwrap_or_else(|| "nslookup".into());
    let name = match args.next() {
        Some(name) => name,
        None => {
            eprintln!("Usage: {} <name>", &program_name);
            process::exit(1);
        }
    };

    // Take the first nameserver listed in resolv.conf.
    let resolv = BufReader::new(fs::File::open("/etc/resolv.conf")?);
    let mut nameserver = None;

    for line in resolv.lines() {
        let line = line?;
        if let Some(rest) = line.strip_prefix("nameserver") {
            if let Ok(ns) = rest.trim().parse::<IpAddr>() {
                nameserver = Some(ns);
                break;
            }
        }
    }

    let nameserver = match nameserver {
        Some(ns) => ns,
        None => {
            eprintln!("No nameserver found in /etc/resolv.conf");
            process::exit(1);
        }
    };

    println!("Nameserver: {}", nameserver);

    // Create the message we need to send.
    let query = Message::query(0xFEE7, &name).to_vec()?;

    // Send the packet to our nameserver over UDP.
    let local: IpAddr = match nameserver {
        IpAddr::V4(_) => Ipv4Addr::UNSPECIFIED.into(),
        IpAddr::V6(_) => Ipv6Addr::UNSPECIFIED.into(),
    };
    let socket = UdpSocket::bind((local, 0))?;
    socket.set_read_timeout(Some(Duration::from_secs(1)))?;
    socket.send_to(&query, (nameserver, 53))?;

    // Wait for a response.
    let mut buffer = [0; 512];
    let len = socket.recv(&mut buffer)?;

    // Parse the response.
    let message = Message::read(&buffer[..len])?;

    println!(";; Got answer: {:?}", message.flags());

    for answer in message.answers() {
        match answer.data() {
            RecordData::A(ip) => println!("{} has address {}", answer.name(), ip),
            RecordData::Opaque(data) => println!(
                "{} has a type {} record of {} bytes",
                answer.name(),
                answer.ty(),
                data.len()
            ),
        }
    }

    Ok(())
}
