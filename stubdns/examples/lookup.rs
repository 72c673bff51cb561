//! Look up the IPv4 addresses of a name.

use std::env;
use std::process;

fn main() {
    // Get the arguments: the name to lookup and, optionally, the nameserver.
    let mut args = env::args();
    let program_name = args.next().unwrap_or_else(|| "lookup".into());

    let name = match args.next() {
        Some(name) => name,
        None => {
            eprintln!("Usage: {} <name> [nameserver]", program_name);
            process::exit(1);
        }
    };
    let server = args.next().unwrap_or_else(|| "1.1.1.1".into());

    // Perform the lookup.
    let ips = match stubdns::resolve(&name, &server) {
        Ok(ips) => ips,
        Err(err) => {
            eprintln!("{}: {}", name, err);
            process::exit(1);
        }
    };

    // Print the results.
    println!("{}:", name);
    for ip in ips {
        println!(" - {}", ip);
    }
}
