//! Sending a query and waiting for its response.

use crate::{Config, LookupError};

use async_io::{Async, Timer};
use dns_codec::{Message, Question};
use futures_lite::future;

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

/// The largest response that will be read; anything beyond is cut off.
pub const RECV_BUFFER_LEN: usize = 4096;

/// Send `question` to the configured server and wait for the response.
///
/// The query carries a random ID and the flags from `config`. Exactly one
/// datagram is sent and one is awaited; there are no retransmissions. Returns
/// the decoded response and the time between sending and receiving.
///
/// # Errors
///
/// - [`LookupError::Timeout`] if nothing arrives within `config.timeout`.
/// - [`LookupError::IdMismatch`] if the response carries another ID.
/// - [`LookupError::Codec`] if the response cannot be decoded.
pub async fn query(config: &Config, question: Question) -> Result<(Message, Duration), LookupError> {
    /// The result of waiting for a packet on a fixed timeout.
    enum WaitResult {
        /// The packet was received.
        Packet { len: usize },
        /// The timeout expired.
        TimedOut,
    }

    let id = fastrand::u16(..);
    let message = Message::query(id, config.flags(), question);
    let bytes = message.encode()?;

    let local: SocketAddr = if config.server.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = Async::<UdpSocket>::bind(local)?;

    tracing::debug!(server = %config.server, id, len = bytes.len(), "sending query");
    let start = Instant::now();
    socket.send_to(&bytes, config.server).await?;

    let mut buf = vec![0; RECV_BUFFER_LEN];
    let timeout = Timer::after(config.timeout);
    let timeout = async move {
        timeout.await;
        io::Result::Ok(WaitResult::TimedOut)
    };

    let result = future::or(
        async {
            let len = socket.recv(&mut buf).await?;
            Ok(WaitResult::Packet { len })
        },
        timeout,
    )
    .await?;

    let len = match result {
        WaitResult::Packet { len } => len,
        WaitResult::TimedOut => return Err(LookupError::Timeout(config.timeout)),
    };
    let elapsed = start.elapsed();

    let response = Message::decode(&buf[..len])?;
    tracing::debug!(id = response.id(), len, ?elapsed, "received response");

    if response.id() != id {
        return Err(LookupError::IdMismatch {
            expected: id,
            actual: response.id(),
        });
    }

    Ok((response, elapsed))
}
