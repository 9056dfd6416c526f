//! A codec for the DNS wire format, [sans I/O].
//!
//! [sans I/O]: https://sans-io.readthedocs.io/
//!
//! This crate converts raw DNS datagrams into structured [`Message`]s and back.
//! It handles the fixed 12-byte header, compressed domain names, resource
//! record framing and the payloads of the common record types. It is intended
//! to be used in conjunction with a transport layer, such as UDP; it performs
//! no I/O of its own.
//!
//! The crate is `no_std` and only needs an allocator. Decoding never copies
//! the datagram as a whole: every component reads through a borrowed view of
//! the caller's buffer, and every read is bounds-checked, so truncated or
//! hostile input produces an [`Error`] rather than a panic.
//!
//! This crate is also `#![forbid(unsafe_code)]`, and is intended to remain so.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use dns_codec::{Class, Flags, Message, Question, ResourceType};
//! use std::net::UdpSocket;
//!
//! // Create a message. This is a query for the A record of example.com.
//! let query = Message::query(
//!     0x42,
//!     Flags::standard_query(),
//!     Question::new("example.com", ResourceType::A, Class::IN),
//! );
//!
//! // Write the message to the socket.
//! let socket = UdpSocket::bind("0.0.0.0:0")?;
//! socket.send_to(&query.encode()?, "1.2.3.4:53")?;
//!
//! // Read new data from the socket and parse it as a message.
//! let mut buf = vec![0; 4096];
//! let len = socket.recv(&mut buf)?;
//! let message = Message::decode(&buf[..len])?;
//!
//! for answer in message.answers() {
//!     println!("{} {:?}", answer.name(), answer.decoded());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `std` (enabled by default) - Enables `std` support in dependencies.
//!   Disable this feature to use on `no_std` targets.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    future_incompatible
)]
#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use core::fmt;
use core::str::FromStr;

mod rdata;
mod ser;

use ser::{Cursor, Serialize};

pub use rdata::{RData, Soa};
pub use ser::{Name, MAX_LABEL_LEN, MAX_NAME_LEN};

/// Macro to implement `Serialize` for a struct, field by field.
macro_rules! serialize {
    (
        $(#[$outer:meta])*
        pub struct $name:ident {
            $(
                $(#[$inner:meta])*
                $vis: vis $field:ident: $ty:ty,
            )*
        }
    ) => {
        $(#[$outer])*
        pub struct $name {
            $(
                $(#[$inner])*
                $vis $field: $ty,
            )*
        }

        impl<'a> Serialize<'a> for $name {
            fn serialized_len(&self) -> usize {
                let mut len = 0;
                $(
                    len += self.$field.serialized_len();
                )*
                len
            }

            fn serialize(&self, out: &mut Vec<u8>) -> Result<(), Error> {
                $(
                    self.$field.serialize(out)?;
                )*
                Ok(())
            }

            fn deserialize(&mut self, mut cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
                $(
                    cursor = self.$field.deserialize(cursor)?;
                )*
                Ok(cursor)
            }
        }
    };
}

/// An enum of numeric protocol codes, each with a presentation mnemonic.
macro_rules! num_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$inner:meta])*
                $variant:ident = $value:literal => $mnemonic:literal,
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        // New codes may be added in the future.
        #[non_exhaustive]
        pub enum $name {
            $(
                $(#[$inner])*
                $variant = $value,
            )*
        }

        impl $name {
            /// The mnemonic used for this code in presentation format.
            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(
                        $name::$variant => $mnemonic,
                    )*
                }
            }
        }

        impl TryFrom<u16> for $name {
            type Error = InvalidCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $(
                        $value => Ok($name::$variant),
                    )*
                    _ => Err(InvalidCode(value)),
                }
            }
        }

        impl From<$name> for u16 {
            fn from(value: $name) -> Self {
                value as u16
            }
        }

        impl FromStr for $name {
            type Err = InvalidMnemonic;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($mnemonic) {
                        return Ok($name::$variant);
                    }
                )*

                Err(InvalidMnemonic(String::from(s)))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.mnemonic())
            }
        }
    };
}

/// An error that may occur while encoding or decoding a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// We attempted to read from a buffer, but we ran out of room before we could read the entire
    /// value.
    #[error("buffer too short: needed {needed} bytes at offset {offset}, but only {available} were available")]
    BufferTooShort {
        /// The offset the read started at.
        offset: usize,

        /// The number of bytes we tried to read.
        needed: usize,

        /// The number of bytes that were available in the buffer.
        available: usize,
    },

    /// A label length was outside of `1..=63`.
    #[error("invalid label length {len} at offset {offset}")]
    InvalidLabelLength {
        /// Where the offending label starts.
        offset: usize,

        /// The length that was found or requested.
        len: usize,
    },

    /// A compression pointer did not point strictly backwards, or pointers
    /// were chained more times than the message could possibly need.
    #[error("bad compression pointer at offset {offset} to offset {target}")]
    CompressionPointer {
        /// Where the pointer is.
        offset: usize,

        /// Where the pointer points to.
        target: usize,
    },

    /// A record declared more data than the buffer holds.
    #[error("record data length {declared} exceeds the {available} bytes remaining")]
    RdLengthMismatch {
        /// The length declared by the record.
        declared: u16,

        /// The number of bytes left in the buffer.
        available: usize,
    },

    /// A name was longer than 255 octets.
    #[error("name too long: name was {0} bytes long")]
    NameTooLong(usize),

    /// A record's data does not fit in the 16-bit length field.
    #[error("record data too long: {0} bytes")]
    RecordDataTooLong(usize),

    /// The header count of a section does not match the number of entries.
    #[error("{section} count mismatch: header declares {declared}, but {actual} were supplied")]
    CountMismatch {
        /// The section with the mismatch.
        section: Section,

        /// The count declared in the header.
        declared: u16,

        /// The number of entries actually present.
        actual: usize,
    },

    /// Address record data had the wrong length for its address family.
    ///
    /// Only raised while interpreting record data, where it is recovered
    /// from: the record keeps its raw bytes and no interpreted form.
    #[error("address data is {actual} bytes long, expected {expected}")]
    InvalidAddressLength {
        /// The length of the address family, 4 or 16.
        expected: usize,

        /// The length of the record data.
        actual: usize,
    },

    /// An error occurred while processing one section of a message.
    #[error("failed to process the {section} section")]
    Section {
        /// The section that failed.
        section: Section,

        /// What went wrong inside of it.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Strip any section context, returning the underlying error.
    pub fn root_cause(&self) -> &Error {
        let mut err = self;
        while let Error::Section { source, .. } = err {
            err = source;
        }
        err
    }

    /// The section this error occurred in, if known.
    pub fn section(&self) -> Option<Section> {
        match self {
            Error::Section { section, .. } | Error::CountMismatch { section, .. } => Some(*section),
            _ => None,
        }
    }

    fn in_section(self, section: Section) -> Self {
        Error::Section {
            section,
            source: Box::new(self),
        }
    }
}

/// A section of a DNS message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    /// The fixed header.
    Header,

    /// The question section.
    Question,

    /// The answer section.
    Answer,

    /// The authority section.
    Authority,

    /// The additional section.
    Additional,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Header => "header",
            Section::Question => "question",
            Section::Answer => "answer",
            Section::Authority => "authority",
            Section::Additional => "additional",
        })
    }
}

/// A DNS message.
///
/// Messages are produced whole by [`Message::decode`], or built by a caller
/// for [`Message::encode`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Message {
    /// The header of the message.
    header: Header,

    /// The questions in the message.
    questions: Vec<Question>,

    /// The answers in the message.
    answers: Vec<ResourceRecord>,

    /// The authorities in the message.
    authorities: Vec<ResourceRecord>,

    /// The additional records in the message.
    additional: Vec<ResourceRecord>,
}

impl Message {
    /// Create a message with an explicit header.
    ///
    /// The header's counts are kept as given; [`Message::encode`] refuses to
    /// write a message whose counts disagree with its sections.
    pub fn new(
        header: Header,
        questions: Vec<Question>,
        answers: Vec<ResourceRecord>,
        authorities: Vec<ResourceRecord>,
        additional: Vec<ResourceRecord>,
    ) -> Self {
        Self {
            header,
            questions,
            answers,
            authorities,
            additional,
        }
    }

    /// Create a message whose header counts are taken from its sections.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CountMismatch`] if a section holds more than
    /// `u16::MAX` entries.
    pub fn from_sections(
        id: u16,
        flags: Flags,
        questions: Vec<Question>,
        answers: Vec<ResourceRecord>,
        authorities: Vec<ResourceRecord>,
        additional: Vec<ResourceRecord>,
    ) -> Result<Self, Error> {
        fn count(section: Section, len: usize) -> Result<u16, Error> {
            u16::try_from(len).map_err(|_| Error::CountMismatch {
                section,
                declared: u16::MAX,
                actual: len,
            })
        }

        let header = Header {
            id,
            flags,
            question_count: count(Section::Question, questions.len())?,
            answer_count: count(Section::Answer, answers.len())?,
            authority_count: count(Section::Authority, authorities.len())?,
            additional_count: count(Section::Additional, additional.len())?,
        };

        Ok(Self::new(header, questions, answers, authorities, additional))
    }

    /// Create a query holding a single question.
    pub fn query(id: u16, flags: Flags, question: Question) -> Self {
        let header = Header {
            id,
            flags,
            question_count: 1,
            ..Header::default()
        };

        Self::new(header, alloc::vec![question], Vec::new(), Vec::new(), Vec::new())
    }

    /// Get the ID of this message.
    pub fn id(&self) -> u16 {
        self.header.id
    }

    /// Get the header of this message.
    pub fn header(&self) -> Header {
        self.header
    }

    /// Get the flags for this message.
    pub fn flags(&self) -> Flags {
        self.header.flags
    }

    /// Get the questions in this message.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Get the answers in this message.
    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    /// Get the authorities in this message.
    pub fn authorities(&self) -> &[ResourceRecord] {
        &self.authorities
    }

    /// Get the additional records in this message.
    pub fn additional(&self) -> &[ResourceRecord] {
        &self.additional
    }

    /// Get the number of bytes [`Message::encode`] will produce.
    pub fn encoded_len(&self) -> usize {
        self.serialized_len()
    }

    /// Encode this message into a freshly allocated buffer.
    ///
    /// Names are written uncompressed and record data is written verbatim.
    ///
    /// # Errors
    ///
    /// - [`Error::CountMismatch`] if a header count disagrees with its section.
    /// - [`Error::Section`] wrapping [`Error::InvalidLabelLength`],
    ///   [`Error::NameTooLong`] or [`Error::RecordDataTooLong`] for entries
    ///   that cannot be represented on the wire.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(self.serialized_len());
        self.serialize(&mut out)?;

        tracing::debug!(id = self.header.id, len = out.len(), "encoded message");
        Ok(out)
    }

    /// Decode a message from a buffer.
    ///
    /// Exactly as many entries as the header declares are read from each
    /// section. Record data that the codec understands is interpreted as
    /// well; a record whose data cannot be interpreted keeps only its raw
    /// bytes.
    ///
    /// # Errors
    ///
    /// Any failure while reading the header, a question or the framing of a
    /// record aborts the whole decode. The error is wrapped in
    /// [`Error::Section`], naming the section that failed.
    pub fn decode(buffer: &[u8]) -> Result<Self, Error> {
        let mut message = Message::default();
        message.deserialize(Cursor::at(buffer, 0))?;

        tracing::debug!(
            id = message.header.id,
            questions = message.questions.len(),
            answers = message.answers.len(),
            authorities = message.authorities.len(),
            additional = message.additional.len(),
            "decoded message"
        );
        Ok(message)
    }
}

impl<'a> Serialize<'a> for Message {
    fn serialized_len(&self) -> usize {
        self.header.serialized_len()
            + self.questions.iter().map(Serialize::serialized_len).sum::<usize>()
            + self.answers.iter().map(Serialize::serialized_len).sum::<usize>()
            + self.authorities.iter().map(Serialize::serialized_len).sum::<usize>()
            + self.additional.iter().map(Serialize::serialized_len).sum::<usize>()
    }

    fn serialize(&self, out: &mut Vec<u8>) -> Result<(), Error> {
        /// Write a set of `T`, tagging failures with their section.
        fn try_write_set<'a, T: Serialize<'a>>(
            out: &mut Vec<u8>,
            items: &[T],
            section: Section,
        ) -> Result<(), Error> {
            for item in items {
                item.serialize(out).map_err(|err| err.in_section(section))?;
            }

            Ok(())
        }

        let header = &self.header;
        for (section, declared, actual) in [
            (Section::Question, header.question_count, self.questions.len()),
            (Section::Answer, header.answer_count, self.answers.len()),
            (Section::Authority, header.authority_count, self.authorities.len()),
            (Section::Additional, header.additional_count, self.additional.len()),
        ] {
            if usize::from(declared) != actual {
                return Err(Error::CountMismatch {
                    section,
                    declared,
                    actual,
                });
            }
        }

        header.serialize(out)?;
        try_write_set(out, &self.questions, Section::Question)?;
        try_write_set(out, &self.answers, Section::Answer)?;
        try_write_set(out, &self.authorities, Section::Authority)?;
        try_write_set(out, &self.additional, Section::Additional)?;
        Ok(())
    }

    fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
        /// Read a set of `T`, bounded by `count`.
        fn try_read_set<'a, T: Serialize<'a> + Default>(
            mut cursor: Cursor<'a>,
            count: u16,
            section: Section,
        ) -> Result<(Vec<T>, Cursor<'a>), Error> {
            // Every entry takes at least one byte, so don't trust the count
            // beyond what the buffer could hold.
            let mut items = Vec::with_capacity(usize::from(count).min(cursor.len()));

            for _ in 0..count {
                let mut item = T::default();
                cursor = item
                    .deserialize(cursor)
                    .map_err(|err| err.in_section(section))?;
                items.push(item);
            }

            Ok((items, cursor))
        }

        if cursor.len() < Header::LEN {
            return Err(cursor.read_error(Header::LEN).in_section(Section::Header));
        }
        let cursor = self
            .header
            .deserialize(cursor)
            .map_err(|err| err.in_section(Section::Header))?;

        let (questions, cursor) = try_read_set(cursor, self.header.question_count, Section::Question)?;
        let (answers, cursor) = try_read_set(cursor, self.header.answer_count, Section::Answer)?;
        let (authorities, cursor) =
            try_read_set(cursor, self.header.authority_count, Section::Authority)?;
        let (additional, cursor) =
            try_read_set(cursor, self.header.additional_count, Section::Additional)?;

        self.questions = questions;
        self.answers = answers;
        self.authorities = authorities;
        self.additional = additional;
        Ok(cursor)
    }
}

serialize! {
    /// The header for a DNS message.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Header {
        /// The ID of this message.
        pub id: u16,

        /// The flags associated with this message.
        pub flags: Flags,

        /// The number of questions in this message.
        pub question_count: u16,

        /// The number of answers in this message.
        pub answer_count: u16,

        /// The number of authorities in this message.
        pub authority_count: u16,

        /// The number of additional records in this message.
        pub additional_count: u16,
    }
}

impl Header {
    /// The length of a header on the wire.
    pub const LEN: usize = 12;

    /// Read a header from the start of `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooShort`] if `buffer` is shorter than 12 bytes.
    pub fn read(buffer: &[u8]) -> Result<Self, Error> {
        if buffer.len() < Self::LEN {
            return Err(Error::BufferTooShort {
                offset: 0,
                needed: Self::LEN,
                available: buffer.len(),
            });
        }

        let mut header = Header::default();
        header.deserialize(Cursor::at(buffer, 0))?;
        Ok(header)
    }

    /// The 12 bytes this header occupies on the wire.
    ///
    /// The counts are written as they are, without checking them against any message.
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let words = [
            self.id,
            self.flags.raw(),
            self.question_count,
            self.answer_count,
            self.authority_count,
            self.additional_count,
        ];

        let mut bytes = [0; Self::LEN];
        for (chunk, word) in bytes.chunks_exact_mut(2).zip(words) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        bytes
    }
}

/// The flags associated with a DNS message.
#[derive(Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Flags(u16);

impl Flags {
    // Values used to manipulate the inside.
    const RAW_QR: u16 = 1 << 15;
    const RAW_OPCODE_SHIFT: u16 = 11;
    const RAW_OPCODE_MASK: u16 = 0b1111;
    const RAW_AA: u16 = 1 << 10;
    const RAW_TC: u16 = 1 << 9;
    const RAW_RD: u16 = 1 << 8;
    const RAW_RA: u16 = 1 << 7;
    const RAW_DO: u16 = 1 << 6;
    const RAW_AD: u16 = 1 << 5;
    const RAW_CD: u16 = 1 << 4;
    const RAW_RCODE_MASK: u16 = 0b1111;

    /// Create a new, empty set of flags.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Use the standard set of flags for a DNS query.
    ///
    /// This is identical to `new()` but uses recursive querying.
    pub const fn standard_query() -> Self {
        Self(Self::RAW_RD)
    }

    /// Create flags from the raw 16-bit word.
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Get the raw value of these flags.
    pub const fn raw(self) -> u16 {
        self.0
    }

    fn bit(&self, mask: u16) -> bool {
        self.0 & mask != 0
    }

    fn set_bit(&mut self, mask: u16, on: bool) -> &mut Self {
        if on {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }

        self
    }

    /// Get the query/response flag.
    pub fn qr(&self) -> MessageType {
        if self.bit(Self::RAW_QR) {
            MessageType::Reply
        } else {
            MessageType::Query
        }
    }

    /// Set the message's query/response flag.
    pub fn set_qr(&mut self, qr: MessageType) -> &mut Self {
        self.set_bit(Self::RAW_QR, qr == MessageType::Reply)
    }

    /// Get the raw 4-bit opcode.
    ///
    /// Use [`Opcode::try_from`] to interpret it.
    pub fn opcode(&self) -> u8 {
        ((self.0 >> Self::RAW_OPCODE_SHIFT) & Self::RAW_OPCODE_MASK) as u8
    }

    /// Set the opcode.
    pub fn set_opcode(&mut self, opcode: Opcode) -> &mut Self {
        self.0 &= !(Self::RAW_OPCODE_MASK << Self::RAW_OPCODE_SHIFT);
        self.0 |= (u16::from(opcode) & Self::RAW_OPCODE_MASK) << Self::RAW_OPCODE_SHIFT;
        self
    }

    /// Get whether this message is authoritative.
    pub fn authoritative(&self) -> bool {
        self.bit(Self::RAW_AA)
    }

    /// Set whether this message is authoritative.
    pub fn set_authoritative(&mut self, authoritative: bool) -> &mut Self {
        self.set_bit(Self::RAW_AA, authoritative)
    }

    /// Get whether this message is truncated.
    pub fn truncated(&self) -> bool {
        self.bit(Self::RAW_TC)
    }

    /// Set whether this message is truncated.
    pub fn set_truncated(&mut self, truncated: bool) -> &mut Self {
        self.set_bit(Self::RAW_TC, truncated)
    }

    /// Get whether recursion is desired.
    pub fn recursion_desired(&self) -> bool {
        self.bit(Self::RAW_RD)
    }

    /// Set whether recursion is desired.
    pub fn set_recursion_desired(&mut self, recursion_desired: bool) -> &mut Self {
        self.set_bit(Self::RAW_RD, recursion_desired)
    }

    /// Get whether recursion is available for this message.
    pub fn recursion_available(&self) -> bool {
        self.bit(Self::RAW_RA)
    }

    /// Set whether recursion is available for this message.
    pub fn set_recursion_available(&mut self, recursion_available: bool) -> &mut Self {
        self.set_bit(Self::RAW_RA, recursion_available)
    }

    /// Get whether DNSSEC records are acceptable to the sender.
    pub fn dnssec_ok(&self) -> bool {
        self.bit(Self::RAW_DO)
    }

    /// Set whether DNSSEC records are acceptable to the sender.
    pub fn set_dnssec_ok(&mut self, dnssec_ok: bool) -> &mut Self {
        self.set_bit(Self::RAW_DO, dnssec_ok)
    }

    /// Get whether the answer was authenticated by the server.
    pub fn authenticated_data(&self) -> bool {
        self.bit(Self::RAW_AD)
    }

    /// Set whether the answer was authenticated by the server.
    pub fn set_authenticated_data(&mut self, authenticated_data: bool) -> &mut Self {
        self.set_bit(Self::RAW_AD, authenticated_data)
    }

    /// Get whether signature checking is disabled.
    pub fn checking_disabled(&self) -> bool {
        self.bit(Self::RAW_CD)
    }

    /// Set whether signature checking is disabled.
    pub fn set_checking_disabled(&mut self, checking_disabled: bool) -> &mut Self {
        self.set_bit(Self::RAW_CD, checking_disabled)
    }

    /// Get the raw 4-bit response code.
    ///
    /// Use [`ResponseCode::try_from`] to interpret it.
    pub fn response_code(&self) -> u8 {
        (self.0 & Self::RAW_RCODE_MASK) as u8
    }

    /// Set the response code.
    pub fn set_response_code(&mut self, response_code: ResponseCode) -> &mut Self {
        self.0 &= !Self::RAW_RCODE_MASK;
        self.0 |= u16::from(response_code) & Self::RAW_RCODE_MASK;
        self
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();

        list.entry(&self.qr());
        match Opcode::try_from(u16::from(self.opcode())) {
            Ok(opcode) => list.entry(&opcode),
            Err(err) => list.entry(&err),
        };

        for (set, name) in [
            (self.authoritative(), "authoritative"),
            (self.truncated(), "truncated"),
            (self.recursion_desired(), "recursion desired"),
            (self.recursion_available(), "recursion available"),
            (self.dnssec_ok(), "dnssec ok"),
            (self.authenticated_data(), "authenticated data"),
            (self.checking_disabled(), "checking disabled"),
        ] {
            if set {
                list.entry(&name);
            }
        }

        match ResponseCode::try_from(u16::from(self.response_code())) {
            Ok(rcode) => list.entry(&rcode),
            Err(err) => list.entry(&err),
        };

        list.finish()
    }
}

impl<'a> Serialize<'a> for Flags {
    fn serialized_len(&self) -> usize {
        2
    }

    fn serialize(&self, out: &mut Vec<u8>) -> Result<(), Error> {
        self.0.serialize(out)
    }

    fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
        self.0.deserialize(cursor)
    }
}

/// Whether a message is a query or a reply.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MessageType {
    /// The message is a query.
    Query,

    /// The message is a reply.
    Reply,
}

num_enum! {
    /// The operation code for the query.
    pub enum Opcode {
        /// A standard query.
        Query = 0 => "QUERY",

        /// An inverse query.
        IQuery = 1 => "IQUERY",

        /// A server status request.
        Status = 2 => "STATUS",

        /// A notification of zone change.
        Notify = 4 => "NOTIFY",

        /// A dynamic update.
        Update = 5 => "UPDATE",

        /// DSO query.
        Dso = 6 => "DSO",
    }
}

num_enum! {
    /// The response code for a query.
    pub enum ResponseCode {
        /// There was no error in the query.
        NoError = 0 => "NOERROR",

        /// The query was malformed.
        FormatError = 1 => "FORMERR",

        /// The server failed to fulfill the query.
        ServerFailure = 2 => "SERVFAIL",

        /// The name does not exist.
        NameError = 3 => "NXDOMAIN",

        /// The query is not implemented.
        NotImplemented = 4 => "NOTIMP",

        /// The query is refused.
        Refused = 5 => "REFUSED",

        /// A name exists when it should not.
        YxDomain = 6 => "YXDOMAIN",

        /// A record set exists when it should not.
        YxRrSet = 7 => "YXRRSET",

        /// A record set that should exist does not.
        NxRrSet = 8 => "NXRRSET",

        /// The server is not authoritative for the zone.
        NotAuth = 9 => "NOTAUTH",

        /// The name is not within the zone.
        NotZone = 10 => "NOTZONE",

        /// The DSO-TYPE is not supported.
        DsoTypeNi = 11 => "DSOTYPENI",
    }
}

num_enum! {
    /// The resource types that a question can ask for.
    pub enum ResourceType {
        /// Get the host's IPv4 address.
        A = 1 => "A",

        /// Get the authoritative name servers for a domain.
        NS = 2 => "NS",

        /// Get the canonical name for a domain.
        CName = 5 => "CNAME",

        /// Get the start of authority record for a domain.
        Soa = 6 => "SOA",

        /// Get the domain pointer for a domain.
        Ptr = 12 => "PTR",

        /// Get the host information for a domain.
        HInfo = 13 => "HINFO",

        /// Get the mail exchange for a domain.
        MX = 15 => "MX",

        /// Get the text for a domain.
        Txt = 16 => "TXT",

        /// Get the IPv6 address for a domain.
        AAAA = 28 => "AAAA",

        /// Get the server selection for a domain.
        Srv = 33 => "SRV",

        /// Get the DNAME for a domain.
        DName = 39 => "DNAME",

        /// The EDNS pseudo-record.
        Opt = 41 => "OPT",

        /// Get the delegation signer for a domain.
        DS = 43 => "DS",

        /// Get the resource record signature for a domain.
        RRSig = 46 => "RRSIG",

        /// Get the next secure record for a domain.
        NSEC = 47 => "NSEC",

        /// Get the DNSKEY for a domain.
        DNSKey = 48 => "DNSKEY",

        /// Get the General Purpose Service Binding for a domain.
        Svcb = 64 => "SVCB",

        /// Get the HTTP Service Binding for a domain.
        Https = 65 => "HTTPS",

        /// Get every record for a domain.
        Any = 255 => "ANY",

        /// Get the certification authority authorization for a domain.
        Caa = 257 => "CAA",
    }
}

num_enum! {
    /// The class of a question or record.
    pub enum Class {
        /// The Internet.
        IN = 1 => "IN",

        /// CSNET; obsolete.
        CS = 2 => "CS",

        /// Chaosnet.
        CH = 3 => "CH",

        /// Hesiod.
        HS = 4 => "HS",

        /// Any class.
        Any = 255 => "ANY",
    }
}

/// The given value is not a valid code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid code: {0}")]
pub struct InvalidCode(u16);

impl InvalidCode {
    /// Get the invalid code.
    pub fn code(&self) -> u16 {
        self.0
    }
}

/// The given string is not a known mnemonic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mnemonic: {0}")]
pub struct InvalidMnemonic(String);

impl InvalidMnemonic {
    /// Get the string that failed to parse.
    pub fn mnemonic(&self) -> &str {
        &self.0
    }
}

serialize! {
    /// The question in a DNS query.
    #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Question {
        /// The name of the question.
        name: Name,

        /// The type of the question.
        ty: u16,

        /// The class of the question.
        class: u16,
    }
}

impl Question {
    /// Create a new question.
    pub fn new(name: impl Into<Name>, ty: impl Into<u16>, class: impl Into<u16>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            class: class.into(),
        }
    }

    /// Get the name of the question.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Get the raw type of the question.
    pub fn ty(&self) -> u16 {
        self.ty
    }

    /// Get the type of the question, if it is a known one.
    pub fn resource_type(&self) -> Option<ResourceType> {
        ResourceType::try_from(self.ty).ok()
    }

    /// Get the raw class of the question.
    pub fn class(&self) -> u16 {
        self.class
    }
}

/// A resource record in a DNS message.
///
/// The raw record data is always kept and is what gets written back out;
/// the interpreted form is only there for reading.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// The name of the resource record.
    name: Name,

    /// The type of the resource record.
    ty: u16,

    /// The class of the resource record.
    class: u16,

    /// The time-to-live of the resource record.
    ttl: u32,

    /// The raw data of the resource record.
    data: Vec<u8>,

    /// The data, interpreted according to the record type.
    rdata: Option<RData>,
}

impl ResourceRecord {
    /// Create a new `ResourceRecord`.
    ///
    /// `data` must not use name compression, since there is no message for
    /// pointers to refer to. It is interpreted like decoded data would be.
    pub fn new(
        name: impl Into<Name>,
        ty: impl Into<u16>,
        class: impl Into<u16>,
        ttl: u32,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        let ty = ty.into();
        let data = data.into();
        let rdata = rdata::interpret(&data, ty, 0, data.len());

        Self {
            name: name.into(),
            ty,
            class: class.into(),
            ttl,
            data,
            rdata,
        }
    }

    /// Read a record starting at `offset` in `buffer`.
    ///
    /// `buffer` must be the entire message. Returns the record and the offset
    /// just past it.
    ///
    /// # Errors
    ///
    /// - Any error from [`Name::read`] for the owner name.
    /// - [`Error::BufferTooShort`] if the fixed fields are cut off.
    /// - [`Error::RdLengthMismatch`] if the data length runs past the buffer.
    pub fn read(buffer: &[u8], offset: usize) -> Result<(Self, usize), Error> {
        let mut record = Self::default();
        let cursor = record.deserialize(Cursor::at(buffer, offset))?;
        Ok((record, cursor.position()))
    }

    /// Write this record onto the end of `out`.
    ///
    /// # Errors
    ///
    /// Fails if the name cannot be written, or the data is longer than `u16::MAX`.
    pub fn write(&self, out: &mut Vec<u8>) -> Result<(), Error> {
        self.serialize(out)
    }

    /// Get the name of the resource record.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Get the raw type of the resource record.
    pub fn ty(&self) -> u16 {
        self.ty
    }

    /// Get the type of the resource record, if it is a known one.
    pub fn resource_type(&self) -> Option<ResourceType> {
        ResourceType::try_from(self.ty).ok()
    }

    /// Get the raw class of the resource record.
    pub fn class(&self) -> u16 {
        self.class
    }

    /// Get the time-to-live of the resource record.
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Get the length of the record data.
    pub fn rd_length(&self) -> usize {
        self.data.len()
    }

    /// Get the raw data of the resource record.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the interpreted data, if the type is understood and the data is well-formed.
    pub fn rdata(&self) -> Option<&RData> {
        self.rdata.as_ref()
    }

    /// Get the interpreted data in its textual form.
    pub fn decoded(&self) -> Option<String> {
        use alloc::string::ToString;

        self.rdata.as_ref().map(ToString::to_string)
    }
}

impl<'a> Serialize<'a> for ResourceRecord {
    fn serialized_len(&self) -> usize {
        self.name.serialized_len() + 10 + self.data.len()
    }

    fn serialize(&self, out: &mut Vec<u8>) -> Result<(), Error> {
        let len =
            u16::try_from(self.data.len()).map_err(|_| Error::RecordDataTooLong(self.data.len()))?;

        self.name.serialize(out)?;
        self.ty.serialize(out)?;
        self.class.serialize(out)?;
        self.ttl.serialize(out)?;
        len.serialize(out)?;
        out.extend_from_slice(&self.data);
        Ok(())
    }

    fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
        let cursor = self.name.deserialize(cursor)?;

        if cursor.len() < 10 {
            return Err(cursor.read_error(10));
        }

        let mut len = 0u16;
        let cursor = self.ty.deserialize(cursor)?;
        let cursor = self.class.deserialize(cursor)?;
        let cursor = self.ttl.deserialize(cursor)?;
        let cursor = len.deserialize(cursor)?;

        if cursor.len() < usize::from(len) {
            return Err(Error::RdLengthMismatch {
                declared: len,
                available: cursor.len(),
            });
        }

        let start = cursor.position();
        let (data, cursor) = cursor.take(usize::from(len))?;
        self.data = data.to_vec();
        self.rdata = rdata::interpret(cursor.original(), self.ty, start, data.len());

        Ok(cursor)
    }
}
