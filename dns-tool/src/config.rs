//! Where and how to send a query.

use dns_codec::Flags;

use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

/// The port DNS servers listen on.
const DNS_PORT: u16 = 53;

/// The server used when the system does not name one.
pub const FALLBACK_SERVER: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(8, 8, 8, 8), DNS_PORT));

/// Settings for a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The server to send the query to.
    pub server: SocketAddr,

    /// How long to wait for the response.
    pub timeout: Duration,

    /// Ask the server to resolve the name recursively.
    pub recursion_desired: bool,

    /// Ask for DNSSEC records (the DO bit).
    pub dnssec_ok: bool,

    /// Ask the server not to validate DNSSEC signatures.
    pub checking_disabled: bool,
}

impl Config {
    /// A recursive query to `server` with a five second timeout.
    pub fn new(server: SocketAddr) -> Self {
        Self {
            server,
            timeout: Duration::from_secs(5),
            recursion_desired: true,
            dnssec_ok: false,
            checking_disabled: false,
        }
    }

    /// The first name server configured on this system.
    ///
    /// Falls back to [`FALLBACK_SERVER`] when the system configuration is
    /// missing, unreadable or names no server.
    pub async fn system_server() -> SocketAddr {
        match super::sys::nameserver().await {
            Ok(Some(ip)) => SocketAddr::new(ip, DNS_PORT),
            Ok(None) => {
                tracing::debug!(server = %FALLBACK_SERVER, "no system name server configured");
                FALLBACK_SERVER
            }
            Err(err) => {
                tracing::warn!(%err, server = %FALLBACK_SERVER, "could not read system name servers");
                FALLBACK_SERVER
            }
        }
    }

    /// The header flags of a query made with this configuration.
    pub fn flags(&self) -> Flags {
        let mut flags = Flags::new();
        flags
            .set_recursion_desired(self.recursion_desired)
            .set_dnssec_ok(self.dnssec_ok)
            .set_checking_disabled(self.checking_disabled);
        flags
    }
}

/// Parse a server given as `addr` or `addr:port`.
///
/// IPv6 addresses with a port use the bracketed form, `[::1]:5353`.
pub fn parse_server(s: &str) -> Result<SocketAddr, AddrParseError> {
    s.parse::<SocketAddr>()
        .or_else(|_| s.parse::<IpAddr>().map(|ip| SocketAddr::new(ip, DNS_PORT)))
}
