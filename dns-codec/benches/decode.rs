//! Decoding and encoding of a typical compressed response.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dns_codec::{Class, Flags, Message, Question, ResourceRecord, ResourceType};

/// A response with a CNAME chain, addresses and an SOA, re-read from the wire
/// so that it looks like something a server sent.
fn response() -> Vec<u8> {
    let mut flags = Flags::standard_query();
    flags.set_qr(dns_codec::MessageType::Reply).set_recursion_available(true);

    let answers = vec![
        ResourceRecord::new(
            "www.example.com",
            ResourceType::CName,
            Class::IN,
            300,
            b"\x03web\x07example\x03com\x00".to_vec(),
        ),
        ResourceRecord::new("web.example.com", ResourceType::A, Class::IN, 60, vec![93, 184, 216, 34]),
        ResourceRecord::new("web.example.com", ResourceType::A, Class::IN, 60, vec![93, 184, 216, 35]),
        ResourceRecord::new(
            "web.example.com",
            ResourceType::AAAA,
            Class::IN,
            60,
            vec![0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        ),
    ];

    let mut soa = b"\x02ns\x07example\x03com\x00\x05admin\x07example\x03com\x00".to_vec();
    for value in [2024010101u32, 7200, 3600, 1209600, 300] {
        soa.extend_from_slice(&value.to_be_bytes());
    }
    let authorities = vec![ResourceRecord::new("example.com", ResourceType::Soa, Class::IN, 3600, soa)];

    Message::from_sections(
        0xBEEF,
        flags,
        vec![Question::new("www.example.com", ResourceType::A, Class::IN)],
        answers,
        authorities,
        vec![],
    )
    .unwrap()
    .encode()
    .unwrap()
}

fn decode(b: &mut Criterion) {
    let bytes = response();

    b.bench_function("decode", |b| {
        b.iter(|| {
            let message = Message::decode(black_box(&bytes)).unwrap();
            black_box(message);
        });
    });
}

fn encode(b: &mut Criterion) {
    let message = Message::decode(&response()).unwrap();

    b.bench_function("encode", |b| {
        b.iter(|| {
            black_box(black_box(&message).encode().unwrap());
        });
    });
}

fn decoded_text(b: &mut Criterion) {
    let message = Message::decode(&response()).unwrap();

    b.bench_function("decoded text", |b| {
        b.iter(|| {
            for record in black_box(&message).answers() {
                black_box(record.decoded());
            }
        });
    });
}

criterion_group! {
    benches,
    decode,
    encode,
    decoded_text,
}

criterion_main!(benches);
