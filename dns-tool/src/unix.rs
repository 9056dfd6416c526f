//! Name server discovery on Unix systems, through `/etc/resolv.conf`.

use async_fs::File;
use futures_lite::io::{AsyncBufRead, BufReader};
use futures_lite::prelude::*;

use std::io;
use std::net::IpAddr;

const RESOLV_CONF: &str = "/etc/resolv.conf";

/// The first name server in `/etc/resolv.conf`, if any.
pub(super) async fn nameserver() -> io::Result<Option<IpAddr>> {
    let file = File::open(RESOLV_CONF).await?;
    let resolv = ResolvConf::read(BufReader::new(file)).await?;

    tracing::debug!(path = RESOLV_CONF, servers = ?resolv.name_servers, "loaded resolver configuration");
    Ok(resolv.name_servers.first().copied())
}

/// Structural form of `resolv.conf`.
///
/// Only the name servers are of interest here; every other directive is
/// skipped.
struct ResolvConf {
    /// The list of name servers, in the order they appear.
    name_servers: Vec<IpAddr>,
}

impl ResolvConf {
    /// Read the configuration line by line.
    async fn read(mut file: impl AsyncBufRead + Unpin) -> io::Result<Self> {
        let mut config = ResolvConf {
            name_servers: vec![],
        };

        let mut buf = String::new();

        loop {
            buf.clear();
            let n = file.read_line(&mut buf).await?;

            // If we read nothing, we reached the end of the file.
            if n == 0 {
                break;
            }

            // Both '#' and ';' start a comment.
            if let Some(n) = memchr::memchr2(b'#', b';', buf.as_bytes()) {
                buf.truncate(n);
            }

            let mut words = buf.split_whitespace();
            if words.next() != Some("nameserver") {
                continue;
            }

            // Link-local IPv6 servers may carry a zone, which we cannot use.
            match words.next().map(str::parse::<IpAddr>) {
                Some(Ok(ip_addr)) => config.name_servers.push(ip_addr),
                Some(Err(_)) | None => {
                    tracing::debug!(line = buf.trim(), "skipping unusable nameserver line")
                }
            }
        }

        Ok(config)
    }
}
