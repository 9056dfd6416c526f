//! Interpretation of record data for the common record types.
//!
//! Interpretation is best-effort. A payload that does not have the shape its
//! type calls for is simply left uninterpreted: the raw bytes on the record
//! remain the source of truth.

use super::ser::Cursor;
use super::{Error, Name, ResourceType, Serialize};

use alloc::string::String;

use core::fmt;
use core::net::{Ipv4Addr, Ipv6Addr};

/// Record data, interpreted according to the record's type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RData {
    /// An IPv4 address.
    A(Ipv4Addr),

    /// An IPv6 address.
    Aaaa(Ipv6Addr),

    /// An authoritative name server.
    Ns(Name),

    /// The canonical name this name is an alias of.
    CName(Name),

    /// The name this address or name points to.
    Ptr(Name),

    /// A mail exchange.
    Mx {
        /// Lower values are preferred.
        preference: u16,

        /// The host willing to act as a mail exchange.
        exchange: Name,
    },

    /// The whole payload of a text record as one string.
    ///
    /// The length prefixes of the individual character-strings are not
    /// removed; they are part of the string like any other byte.
    Txt(String),

    /// The start of a zone of authority.
    Soa(Soa),
}

/// The data of a start-of-authority record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Soa {
    /// The name server that is the primary source of data for the zone.
    pub mname: Name,

    /// The mailbox of the person responsible for the zone.
    pub rname: Name,

    /// The version number of the zone.
    pub serial: u32,

    /// Seconds before the zone should be refreshed.
    pub refresh: u32,

    /// Seconds before a failed refresh should be retried.
    pub retry: u32,

    /// Seconds after which the zone is no longer authoritative.
    pub expire: u32,

    /// The minimum TTL for records in the zone.
    pub minimum: u32,
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(addr) => fmt::Display::fmt(addr, f),
            RData::Aaaa(addr) => fmt::Display::fmt(addr, f),
            RData::Ns(name) | RData::CName(name) | RData::Ptr(name) => fmt::Display::fmt(name, f),
            RData::Mx {
                preference,
                exchange,
            } => write!(f, "{} {}", preference, exchange),
            RData::Txt(text) => f.write_str(text),
            RData::Soa(soa) => fmt::Display::fmt(soa, f),
        }
    }
}

impl fmt::Display for Soa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.mname, self.rname, self.serial, self.refresh, self.retry, self.expire, self.minimum
        )
    }
}

/// Interpret the `len` bytes at `start` in `buffer` as data of type `ty`.
///
/// `buffer` is the whole message, since names inside the data may be
/// compressed against earlier parts of it.
pub(crate) fn interpret(buffer: &[u8], ty: u16, start: usize, len: usize) -> Option<RData> {
    let ty = ResourceType::try_from(ty).ok()?;
    let payload = Payload::new(buffer, start, len)?;

    let result = match ty {
        ResourceType::A => payload.octets().map(|octets: [u8; 4]| RData::A(octets.into())),
        ResourceType::AAAA => payload.octets().map(|octets: [u8; 16]| RData::Aaaa(octets.into())),
        ResourceType::NS => payload.name(payload.start).map(|(name, _)| RData::Ns(name)),
        ResourceType::CName => payload.name(payload.start).map(|(name, _)| RData::CName(name)),
        ResourceType::Ptr => payload.name(payload.start).map(|(name, _)| RData::Ptr(name)),
        ResourceType::MX => payload.mx(),
        ResourceType::Txt => Ok(RData::Txt(
            String::from_utf8_lossy(payload.bytes()).into_owned(),
        )),
        ResourceType::Soa => payload.soa().map(RData::Soa),
        _ => return None,
    };

    match result {
        Ok(rdata) => Some(rdata),
        Err(err) => {
            tracing::debug!(%ty, start, len, %err, "leaving record data uninterpreted");
            None
        }
    }
}

/// The data of one record, within the message it came from.
struct Payload<'a> {
    /// The message, cut off at the end of the data.
    buffer: &'a [u8],

    /// Where the data begins.
    start: usize,
}

impl<'a> Payload<'a> {
    fn new(buffer: &'a [u8], start: usize, len: usize) -> Option<Self> {
        let end = start.checked_add(len)?;
        Some(Self {
            buffer: buffer.get(..end)?,
            start,
        })
    }

    fn bytes(&self) -> &'a [u8] {
        &self.buffer[self.start..]
    }

    fn octets<const N: usize>(&self) -> Result<[u8; N], Error> {
        self.bytes()
            .try_into()
            .map_err(|_| Error::InvalidAddressLength {
                expected: N,
                actual: self.bytes().len(),
            })
    }

    /// Read a name at `pos`, which must end within the data.
    fn name(&self, pos: usize) -> Result<(Name, usize), Error> {
        let (name, consumed) = Name::read(self.buffer, pos)?;
        Ok((name, pos + consumed))
    }

    fn u16_at(&self, pos: usize) -> Result<u16, Error> {
        let mut value = 0u16;
        value.deserialize(Cursor::at(self.buffer, pos))?;
        Ok(value)
    }

    fn u32_at(&self, pos: usize) -> Result<u32, Error> {
        let mut value = 0u32;
        value.deserialize(Cursor::at(self.buffer, pos))?;
        Ok(value)
    }

    fn mx(&self) -> Result<RData, Error> {
        let preference = self.u16_at(self.start)?;
        let (exchange, _) = self.name(self.start + 2)?;

        Ok(RData::Mx {
            preference,
            exchange,
        })
    }

    fn soa(&self) -> Result<Soa, Error> {
        let (mname, pos) = self.name(self.start)?;
        let (rname, pos) = self.name(pos)?;

        Ok(Soa {
            mname,
            rname,
            serial: self.u32_at(pos)?,
            refresh: self.u32_at(pos + 4)?,
            retry: self.u32_at(pos + 8)?,
            expire: self.u32_at(pos + 12)?,
            minimum: self.u32_at(pos + 16)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn name(name: &str) -> Vec<u8> {
        let mut out = Vec::new();
        Name::from(name).write(&mut out).unwrap();
        out
    }

    fn decoded(data: &[u8], ty: ResourceType) -> Option<String> {
        interpret(data, ty.into(), 0, data.len()).map(|rdata| rdata.to_string())
    }

    #[test]
    fn addresses() {
        assert_eq!(
            decoded(&[93, 184, 216, 34], ResourceType::A).as_deref(),
            Some("93.184.216.34")
        );

        let mut v6 = [0u8; 16];
        v6[0] = 0x20;
        v6[1] = 0x01;
        v6[2] = 0x0d;
        v6[3] = 0xb8;
        v6[15] = 1;
        assert_eq!(
            decoded(&v6, ResourceType::AAAA).as_deref(),
            Some("2001:db8::1")
        );

        assert_eq!(decoded(&[1, 2, 3], ResourceType::A), None);
        assert_eq!(decoded(&[1, 2, 3, 4], ResourceType::AAAA), None);

        let short = Payload::new(&[1, 2, 3], 0, 3).unwrap();
        assert_eq!(
            short.octets::<4>(),
            Err(Error::InvalidAddressLength {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn name_types() {
        let data = name("ns1.example.com");
        for ty in [ResourceType::NS, ResourceType::CName, ResourceType::Ptr] {
            assert_eq!(decoded(&data, ty).as_deref(), Some("ns1.example.com."));
        }

        assert!(matches!(
            interpret(&data, ResourceType::CName.into(), 0, data.len()),
            Some(RData::CName(_))
        ));
    }

    #[test]
    fn mail_exchange() {
        let mut data = 10u16.to_be_bytes().to_vec();
        data.extend(name("mail.example.com"));

        assert_eq!(
            decoded(&data, ResourceType::MX).as_deref(),
            Some("10 mail.example.com.")
        );
        assert_eq!(decoded(&[0, 10], ResourceType::MX), None);
    }

    #[test]
    fn text_is_one_opaque_string() {
        let data = b"\x05hello\x05world";
        assert_eq!(
            decoded(data, ResourceType::Txt).as_deref(),
            Some("\u{5}hello\u{5}world")
        );
    }

    #[test]
    fn start_of_authority() {
        let mut data = name("ns.example.com");
        data.extend(name("admin.example.com"));
        for value in [2024010101u32, 7200, 3600, 1209600, 300] {
            data.extend_from_slice(&value.to_be_bytes());
        }

        assert_eq!(
            decoded(&data, ResourceType::Soa).as_deref(),
            Some("ns.example.com. admin.example.com. 2024010101 7200 3600 1209600 300")
        );

        // Cut off inside the integers.
        assert_eq!(decoded(&data[..data.len() - 1], ResourceType::Soa), None);
    }

    #[test]
    fn compressed_names_inside_data() {
        // "example.com." at 0, then MX data at 13: preference 5, "mx" + pointer to 0.
        let mut buf = name("example.com");
        let start = buf.len();
        buf.extend_from_slice(&[0, 5, 2, b'm', b'x', 0xC0, 0x00]);

        let rdata = interpret(&buf, ResourceType::MX.into(), start, buf.len() - start);
        assert_eq!(
            rdata,
            Some(RData::Mx {
                preference: 5,
                exchange: Name::from("mx.example.com"),
            })
        );
    }

    #[test]
    fn malformed_data_is_left_alone() {
        // A name whose pointer points forwards.
        let data = [0xC0, 0x05, 0, 0, 0, 0];
        assert_eq!(decoded(&data, ResourceType::CName), None);

        // Unknown and uninterpreted types.
        assert_eq!(interpret(&[1, 2, 3, 4], 999, 0, 4), None);
        assert_eq!(decoded(&[1, 2, 3, 4], ResourceType::Srv), None);
    }
}
