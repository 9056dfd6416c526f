//! A serializer/deserializer compatible with the DNS wire format.
//!
//! Various notes about the wire format:
//!
//! - All integers are in big endian format.
//! - Names consist of a series of labels, each prefixed with a length byte.
//! - Names end with a zero byte.
//! - Names are compressed by using a pointer to a previous name.
//! - This means that we need access to the entire buffer.

use super::Error;

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use core::fmt;
use core::mem;

use memchr::Memchr;

/// The longest label that can be represented on the wire.
pub const MAX_LABEL_LEN: usize = 63;

/// The longest name, in wire octets, including length bytes and the root label.
pub const MAX_NAME_LEN: usize = 255;

const PTR_MASK: u8 = 0b1100_0000;

/// An object that is able to be serialized to or deserialized from a series of bytes.
pub(crate) trait Serialize<'a> {
    /// The number of bytes needed to serialize this object.
    fn serialized_len(&self) -> usize;

    /// Serialize this object onto the end of `out`.
    fn serialize(&self, out: &mut Vec<u8>) -> Result<(), Error>;

    /// Deserialize this object from a series of bytes.
    fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error>;
}

/// A cursor into a series of bytes.
///
/// The cursor always keeps the whole message around, since names may point
/// anywhere before the current position.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Cursor<'a> {
    /// The bytes being read.
    bytes: &'a [u8],

    /// The index into the bytes that we've read so far.
    cursor: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the given absolute position.
    pub(crate) fn at(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, cursor: pos }
    }

    /// Get the original bytes that this cursor was created from.
    pub(crate) fn original(&self) -> &'a [u8] {
        self.bytes
    }

    /// The absolute position of this cursor.
    pub(crate) fn position(&self) -> usize {
        self.cursor
    }

    /// Get the slice of remaining bytes.
    pub(crate) fn remaining(&self) -> &'a [u8] {
        self.bytes.get(self.cursor..).unwrap_or(&[])
    }

    /// Get the length of the slice of remaining bytes.
    pub(crate) fn len(&self) -> usize {
        self.bytes.len().saturating_sub(self.cursor)
    }

    /// Advance the cursor by the given number of bytes.
    pub(crate) fn advance(mut self, n: usize) -> Result<Self, Error> {
        if n > self.len() {
            return Err(self.read_error(n));
        }

        self.cursor += n;
        Ok(self)
    }

    /// Split off the next `n` bytes.
    pub(crate) fn take(self, n: usize) -> Result<(&'a [u8], Self), Error> {
        let bytes = self
            .remaining()
            .get(..n)
            .ok_or_else(|| self.read_error(n))?;
        Ok((bytes, self.advance(n)?))
    }

    /// Error for when a read of `n` bytes failed.
    pub(crate) fn read_error(&self, n: usize) -> Error {
        Error::BufferTooShort {
            offset: self.cursor,
            needed: n,
            available: self.len(),
        }
    }
}

/// A fully qualified domain name.
///
/// Names are kept in their dotted presentation form, always ending in a dot.
/// The root name is just `"."`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    repr: String,
}

impl Default for Name {
    fn default() -> Self {
        Self::root()
    }
}

impl Name {
    /// The root name, `"."`.
    pub fn root() -> Self {
        Self {
            repr: String::from("."),
        }
    }

    /// Create a name from its dotted form.
    ///
    /// A trailing dot is added if it is missing. Labels are not validated
    /// until the name is written.
    pub fn new(name: impl Into<String>) -> Self {
        let mut repr = name.into();
        if !repr.ends_with('.') {
            repr.push('.');
        }

        Self { repr }
    }

    /// The dotted form of this name, including the trailing dot.
    pub fn as_str(&self) -> &str {
        &self.repr
    }

    /// Whether this is the root name.
    pub fn is_root(&self) -> bool {
        self.repr == "."
    }

    /// Get an iterator over the labels making up this name.
    ///
    /// The root name has no labels. Any other empty label, as in `"a..b."`,
    /// is yielded as is and rejected by [`Name::write`].
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        let repr = if self.is_root() { "" } else { self.repr.as_str() };
        let mut last_index = 0;

        Memchr::new(b'.', repr.as_bytes()).map(move |index| {
            let item = &repr[last_index..index];
            last_index = index + 1;
            item
        })
    }

    /// Read a possibly compressed name starting at `offset` in `buffer`.
    ///
    /// `buffer` must be the entire message, since compression pointers are
    /// absolute offsets into it. Returns the name and the number of bytes it
    /// occupies at `offset`; bytes read after following a pointer are not
    /// counted.
    ///
    /// # Errors
    ///
    /// - [`Error::BufferTooShort`] if the name runs off the end of `buffer`.
    /// - [`Error::InvalidLabelLength`] if a length byte uses the reserved
    ///   `0b01` or `0b10` prefixes.
    /// - [`Error::CompressionPointer`] if a pointer does not point strictly
    ///   backwards, or the pointer chain leads back to a place already read.
    /// - [`Error::NameTooLong`] if the expanded name exceeds 255 octets.
    pub fn read(buffer: &[u8], offset: usize) -> Result<(Self, usize), Error> {
        let mut cursor = Cursor::at(buffer, offset);
        let mut repr = String::new();
        let mut consumed = None;
        let mut wire_len = 1;

        // Reading from a position always yields the same segments, so coming
        // back to one means the pointers form a cycle.
        let mut visited = BTreeSet::new();
        let mut last_jump = None;

        loop {
            let start = cursor.position();
            if !visited.insert(start) {
                let (offset, target) = last_jump.unwrap_or((start, start));
                return Err(Error::CompressionPointer { offset, target });
            }

            let mut segment = LabelSegment::Empty;
            cursor = segment.deserialize(cursor)?;

            match segment {
                LabelSegment::Empty => {
                    if repr.is_empty() {
                        repr.push('.');
                    }

                    let consumed = consumed.unwrap_or(cursor.position() - offset);
                    return Ok((Self { repr }, consumed));
                }
                LabelSegment::Label(label) => {
                    wire_len += label.len() + 1;
                    if wire_len > MAX_NAME_LEN {
                        return Err(Error::NameTooLong(wire_len));
                    }

                    repr.push_str(&String::from_utf8_lossy(label));
                    repr.push('.');
                }
                LabelSegment::Pointer(target) => {
                    let target = usize::from(target);
                    if target >= start {
                        return Err(Error::CompressionPointer {
                            offset: start,
                            target,
                        });
                    }

                    if consumed.is_none() {
                        consumed = Some(cursor.position() - offset);
                    }

                    tracing::trace!(from = start, to = target, "following compression pointer");
                    last_jump = Some((start, target));
                    cursor = Cursor::at(buffer, target);
                }
            }
        }
    }

    /// Write this name, uncompressed, onto the end of `out`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLabelLength`] if a label is empty or longer than 63
    ///   bytes.
    /// - [`Error::NameTooLong`] if the encoded name is longer than 255 bytes.
    ///
    /// Nothing is written on failure.
    pub fn write(&self, out: &mut Vec<u8>) -> Result<(), Error> {
        let start = out.len();

        for label in self.labels() {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                let offset = out.len();
                out.truncate(start);
                return Err(Error::InvalidLabelLength {
                    offset,
                    len: label.len(),
                });
            }

            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
        out.push(0);

        let written = out.len() - start;
        if written > MAX_NAME_LEN {
            out.truncate(start);
            return Err(Error::NameTooLong(written));
        }

        Ok(())
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Name").field(&self.repr).finish()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

impl<'a> Serialize<'a> for Name {
    fn serialized_len(&self) -> usize {
        self.labels().map(|label| label.len() + 1).sum::<usize>() + 1
    }

    fn serialize(&self, out: &mut Vec<u8>) -> Result<(), Error> {
        self.write(out)
    }

    fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
        let (name, consumed) = Name::read(cursor.original(), cursor.position())?;
        *self = name;
        cursor.advance(consumed)
    }
}

/// One length-prefixed piece of a name, as found on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum LabelSegment<'a> {
    /// The empty terminator.
    Empty,

    /// A literal label.
    Label(&'a [u8]),

    /// A pointer to a previous name.
    Pointer(u16),
}

impl<'a> LabelSegment<'a> {
    fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
        // The type is determined by the first byte.
        let b1 = *cursor
            .remaining()
            .first()
            .ok_or_else(|| cursor.read_error(1))?;

        match b1 & PTR_MASK {
            0 if b1 == 0 => {
                *self = Self::Empty;
                cursor.advance(1)
            }
            0 => {
                let (bytes, cursor) = cursor.advance(1)?.take(usize::from(b1))?;
                *self = Self::Label(bytes);
                Ok(cursor)
            }
            PTR_MASK => {
                // A pointer is a 2-byte value with the pointer mask applied to the first byte.
                let (bytes, cursor) = cursor.take(2)?;
                *self = Self::Pointer(u16::from_be_bytes([bytes[0] & !PTR_MASK, bytes[1]]));
                Ok(cursor)
            }
            _ => Err(Error::InvalidLabelLength {
                offset: cursor.position(),
                len: usize::from(b1),
            }),
        }
    }
}

macro_rules! serialize_num {
    ($($num_ty: ident),*) => {
        $(
            impl<'a> Serialize<'a> for $num_ty {
                fn serialized_len(&self) -> usize {
                    mem::size_of::<$num_ty>()
                }

                fn serialize(&self, out: &mut Vec<u8>) -> Result<(), Error> {
                    out.extend_from_slice(&self.to_be_bytes());
                    Ok(())
                }

                fn deserialize(&mut self, cursor: Cursor<'a>) -> Result<Cursor<'a>, Error> {
                    let (bytes, cursor) = cursor.take(mem::size_of::<$num_ty>())?;

                    let mut value = [0; mem::size_of::<$num_ty>()];
                    value.copy_from_slice(bytes);
                    *self = $num_ty::from_be_bytes(value);

                    Ok(cursor)
                }
            }
        )*
    }
}

serialize_num! {
    u8, u16, u32
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::string::ToString;
    use alloc::vec;

    fn encoded(name: &str) -> Vec<u8> {
        let mut out = Vec::new();
        Name::from(name).write(&mut out).unwrap();
        out
    }

    #[test]
    fn read_plain_names() {
        let cases: [(&[u8], &str, usize); 3] = [
            (b"\x07example\x03com\x00", "example.com.", 13),
            (b"\x03www\x07example\x03com\x00", "www.example.com.", 17),
            (b"\x00", ".", 1),
        ];

        for (bytes, expected, len) in cases {
            let (name, consumed) = Name::read(bytes, 0).unwrap();
            assert_eq!(name.as_str(), expected);
            assert_eq!(consumed, len);
        }
    }

    #[test]
    fn labels_round_trip() {
        let longest = "c".repeat(MAX_LABEL_LEN);
        let labels = ["a", "bb", longest.as_str()];
        let joined = labels.join(".");

        let bytes = encoded(&joined);
        let (name, consumed) = Name::read(&bytes, 0).unwrap();

        assert_eq!(name.as_str(), alloc::format!("{}.", joined));
        assert_eq!(consumed, bytes.len());
        assert!(name.labels().eq(labels.iter().copied()));
    }

    #[test]
    fn pointer_reads_like_its_target() {
        // "example.com." at 2, then "www" + pointer to 2 at 15, then a bare pointer at 21.
        let mut buf = vec![0xAA, 0xBB];
        buf.extend_from_slice(b"\x07example\x03com\x00");
        buf.extend_from_slice(b"\x03www\xC0\x02");
        buf.extend_from_slice(b"\xC0\x02");

        let (direct, _) = Name::read(&buf, 2).unwrap();
        let (bare, consumed) = Name::read(&buf, 21).unwrap();
        assert_eq!(bare, direct);
        assert_eq!(consumed, 2);

        let (prefixed, consumed) = Name::read(&buf, 15).unwrap();
        assert_eq!(prefixed.as_str(), "www.example.com.");
        assert_eq!(consumed, 6);
    }

    #[test]
    fn forward_and_self_pointers_are_rejected() {
        let forward = [0xC0, 0x02, 0x00];
        assert!(matches!(
            Name::read(&forward, 0),
            Err(Error::CompressionPointer { offset: 0, target: 2 })
        ));

        let this = [0x00, 0xC0, 0x01];
        assert!(matches!(
            Name::read(&this, 1),
            Err(Error::CompressionPointer { .. })
        ));

        let out_of_range = [0xC0, 0xFF];
        assert!(Name::read(&out_of_range, 0).is_err());
    }

    #[test]
    fn pointer_cycles_terminate() {
        // 0: "a", then a pointer at 2 to 0, and a name at 4 pointing to 2.
        let buf = [0x01, b'a', 0xC0, 0x00, 0xC0, 0x02];
        assert_eq!(
            Name::read(&buf, 4).unwrap_err(),
            Error::CompressionPointer {
                offset: 2,
                target: 0
            }
        );
    }

    #[test]
    fn long_label_cycles_are_pointer_errors() {
        // A full-length label followed by a pointer back to it.
        let mut buf = vec![MAX_LABEL_LEN as u8];
        buf.extend_from_slice(&[b'x'; MAX_LABEL_LEN]);
        buf.extend_from_slice(&[0xC0, 0x00]);

        assert_eq!(
            Name::read(&buf, 0).unwrap_err(),
            Error::CompressionPointer {
                offset: 64,
                target: 0
            }
        );

        // Several labels that together run past 255 octets per lap.
        let mut buf = Vec::new();
        for _ in 0..3 {
            buf.push(MAX_LABEL_LEN as u8);
            buf.extend_from_slice(&[b'y'; MAX_LABEL_LEN]);
        }
        buf.extend_from_slice(&[0xC0, 0x40]);

        assert!(matches!(
            Name::read(&buf, 0),
            Err(Error::CompressionPointer { offset: 192, target: 64 })
        ));
    }

    #[test]
    fn long_names_without_cycles_are_too_long() {
        // Four full labels, the last reached through a pointer.
        let mut buf = vec![MAX_LABEL_LEN as u8];
        buf.extend_from_slice(&[b'z'; MAX_LABEL_LEN]);
        buf.push(0);
        let tail = buf.len();
        for _ in 0..3 {
            buf.push(MAX_LABEL_LEN as u8);
            buf.extend_from_slice(&[b'w'; MAX_LABEL_LEN]);
        }
        buf.extend_from_slice(&[0xC0, 0x00]);

        assert_eq!(Name::read(&buf, tail).unwrap_err(), Error::NameTooLong(257));
    }

    #[test]
    fn reserved_label_prefixes_are_rejected() {
        assert!(matches!(
            Name::read(&[0x40, b'a', 0x00], 0),
            Err(Error::InvalidLabelLength { offset: 0, len: 64 })
        ));
        assert!(matches!(
            Name::read(&[0x80, 0x00], 0),
            Err(Error::InvalidLabelLength { .. })
        ));
    }

    #[test]
    fn truncated_names_are_rejected() {
        assert!(matches!(
            Name::read(b"\x07exam", 0),
            Err(Error::BufferTooShort { .. })
        ));
        assert!(matches!(
            Name::read(b"\x03www", 0),
            Err(Error::BufferTooShort { .. })
        ));
        assert!(matches!(
            Name::read(&[0xC0], 0),
            Err(Error::BufferTooShort { .. })
        ));
    }

    #[test]
    fn write_rejects_oversized_labels_and_names() {
        let mut out = vec![1, 2, 3];

        let long_label = "a".repeat(64);
        assert!(matches!(
            Name::from(long_label.as_str()).write(&mut out),
            Err(Error::InvalidLabelLength { len: 64, .. })
        ));
        assert_eq!(out, [1, 2, 3]);

        let label = "a".repeat(63);
        let long_name = [label.as_str(); 4].join(".");
        assert!(matches!(
            Name::from(long_name.as_str()).write(&mut out),
            Err(Error::NameTooLong(257))
        ));
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn write_rejects_empty_labels() {
        let mut out = Vec::new();

        for name in ["a..b", ".a", "a.b.."] {
            assert!(matches!(
                Name::from(name).write(&mut out),
                Err(Error::InvalidLabelLength { len: 0, .. })
            ));
            assert!(out.is_empty());
        }

        assert!(!Name::from("a..b").is_root());
        assert_eq!(Name::from("a..b").labels().collect::<Vec<_>>(), ["a", "", "b"]);
    }

    #[test]
    fn root_and_trailing_dots() {
        assert_eq!(encoded("."), [0]);
        assert_eq!(encoded(""), [0]);
        assert_eq!(encoded("com."), encoded("com"));
        assert!(Name::root().is_root());
        assert_eq!(Name::from("example.com").to_string(), "example.com.");
        assert_eq!(Name::from("example.com").serialized_len(), 13);
    }
}
