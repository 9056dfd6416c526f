//! Synchronous implementation of `nslookup`, using `dns-codec`.
//!
//! Only works on Unix.

use std::env;
use std::fs;
use std::io::{prelude::*, BufReader};
use std::net::Ipv4Addr;
use std::net::{IpAddr, UdpSocket};
use std::process;
use std::time::Duration;

use dns_codec::{Class, Flags, Message, Question, RData, ResourceType};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The first argument is the name to lookup, the second an optional type.
    let mut args = env::args();
    let program_name = args.next().unwrap_or_else(|| "nslookup".into());
    let name = match args.next() {
        Some(name) => name,
        None => {
            eprintln!("Usage: {} <name> [type]", &program_name);
            process::exit(1);
        }
    };
    let ty = match args.next() {
        Some(ty) => ty.parse::<ResourceType>()?,
        None => ResourceType::A,
    };

    // Search in resolv.conf for the nameserver.
    let resolv = BufReader::new(fs::File::open("/etc/resolv.conf")?);
    let mut nameserver = None;

    for line in resolv.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        if parts.next() == Some("nameserver") {
            if let Some(Ok(ns)) = parts.next().map(str::parse::<IpAddr>) {
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
    let query = Message::query(
        0xFEE7,
        Flags::standard_query(),
        Question::new(name.as_str(), ty, Class::IN),
    );

    // Send the packet to our nameserver over UDP.
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.set_read_timeout(Some(Duration::from_secs(5)))?;
    socket.send_to(&query.encode()?, (nameserver, 53))?;

    // Wait for a response.
    let mut buffer = vec![0; 4096];
    let len = socket.recv(&mut buffer)?;
    let message = Message::decode(&buffer[..len])?;

    if message.id() != query.id() {
        eprintln!("Response ID {} does not match query", message.id());
        process::exit(1);
    }

    println!(";; Got answer: {}", message.flags().response_code());

    for answer in message.answers() {
        match answer.rdata() {
            Some(RData::A(ip)) => println!("{} has address {}", answer.name(), ip),
            Some(RData::Aaaa(ip)) => println!("{} has IPv6 address {}", answer.name(), ip),
            Some(RData::CName(target)) => println!("{} is an alias for {}", answer.name(), target),
            Some(RData::Mx {
                preference,
                exchange,
            }) => println!(
                "{} mail is handled by {} {}",
                answer.name(),
                preference,
                exchange
            ),
            Some(other) => println!("{} {}", answer.name(), other),
            None => println!("{} has {} bytes of raw data", answer.name(), answer.rd_length()),
        }
    }

    Ok(())
}
