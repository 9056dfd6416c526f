//! Presentation of a response in the style of `dig`.

use chrono::{DateTime, Local};
use dns_codec::{Class, Flags, Message, Question, ResourceRecord, ResourceType, ResponseCode};

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// A response together with the circumstances of the lookup.
///
/// The `Display` implementation renders the full report, ending in a newline.
#[derive(Debug, Clone)]
pub struct Report {
    /// The decoded response.
    pub message: Message,

    /// The name as the user asked for it.
    pub query: String,

    /// The server that answered.
    pub server: SocketAddr,

    /// The time between sending the query and receiving the response.
    pub elapsed: Duration,

    /// When the response arrived.
    pub when: DateTime<Local>,
}

impl Report {
    /// A report for a response that arrived just now.
    pub fn new(message: Message, query: impl Into<String>, server: SocketAddr, elapsed: Duration) -> Self {
        Self {
            message,
            query: query.into(),
            server,
            elapsed,
            when: Local::now(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.message.header();

        writeln!(f, "; <<>> DNSTool <<>> {}", self.query)?;
        writeln!(f, ";; Got answer:")?;
        writeln!(
            f,
            ";; ->>HEADER<<- opcode: {}, status: {}, id: {}",
            header.flags.opcode(),
            Status(header.flags.response_code()),
            header.id
        )?;
        writeln!(
            f,
            ";; flags: {}; QUERY: {}; ANSWER: {}; AUTHORITY: {}; ADDITIONAL: {}",
            FlagList(header.flags),
            header.question_count,
            header.answer_count,
            header.authority_count,
            header.additional_count
        )?;

        if header.question_count > 0 {
            write!(f, "\n;; QUESTION SECTION:\n")?;
            for question in self.message.questions() {
                write_question(f, question)?;
            }
        }

        let sections = [
            ("ANSWER", header.answer_count, self.message.answers()),
            ("AUTHORITY", header.authority_count, self.message.authorities()),
            ("ADDITIONAL", header.additional_count, self.message.additional()),
        ];
        for (title, count, records) in sections {
            if count > 0 {
                write!(f, "\n;; {} SECTION:\n", title)?;
                for record in records {
                    write_record(f, record)?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, ";; Query time: {} msec", self.elapsed.as_millis())?;
        writeln!(f, ";; SERVER: {}", self.server)?;
        writeln!(f, ";; WHEN: {}", self.when.format("%a, %d %b %Y %H:%M:%S %Z"))
    }
}

fn write_question(f: &mut fmt::Formatter<'_>, question: &Question) -> fmt::Result {
    writeln!(
        f,
        ";{}\t\t{}\t{}",
        question.name(),
        ClassName(question.class()),
        TypeName(question.ty())
    )
}

fn write_record(f: &mut fmt::Formatter<'_>, record: &ResourceRecord) -> fmt::Result {
    write!(
        f,
        ";{}\t{}\t{}\t{}\t",
        record.name(),
        record.ttl(),
        ClassName(record.class()),
        TypeName(record.ty())
    )?;

    match record.rdata() {
        Some(rdata) => writeln!(f, "{}", rdata),
        None => writeln!(f, "{} (Raw data)", RawData(record.data())),
    }
}

/// A record type mnemonic, or `TYPE<n>` for unknown types.
struct TypeName(u16);

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ResourceType::try_from(self.0) {
            Ok(ty) => fmt::Display::fmt(&ty, f),
            Err(_) => write!(f, "TYPE{}", self.0),
        }
    }
}

/// A class mnemonic, or `CLASS<n>` for unknown classes.
struct ClassName(u16);

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Class::try_from(self.0) {
            Ok(class) => fmt::Display::fmt(&class, f),
            Err(_) => write!(f, "CLASS{}", self.0),
        }
    }
}

/// A response code mnemonic, or `RCODE<n>` for unknown codes.
struct Status(u8);

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ResponseCode::try_from(u16::from(self.0)) {
            Ok(code) => fmt::Display::fmt(&code, f),
            Err(_) => write!(f, "RCODE{}", self.0),
        }
    }
}

/// The set flags, lowercase and space separated.
struct FlagList(Flags);

impl fmt::Display for FlagList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = self.0;
        let set = [
            (flags.qr() == dns_codec::MessageType::Reply, "qr"),
            (flags.authoritative(), "aa"),
            (flags.truncated(), "tc"),
            (flags.recursion_desired(), "rd"),
            (flags.recursion_available(), "ra"),
            (flags.dnssec_ok(), "do"),
            (flags.authenticated_data(), "ad"),
            (flags.checking_disabled(), "cd"),
        ];

        let mut first = true;
        for (_, name) in set.iter().filter(|(on, _)| *on) {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
            first = false;
        }

        Ok(())
    }
}

/// Raw record data as a bracketed list of byte values.
struct RawData<'a>(&'a [u8]);

impl fmt::Display for RawData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", byte)?;
        }
        f.write_str("]")
    }
}
