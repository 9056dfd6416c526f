//! A dig-style DNS lookup tool.
//!
//! This crate holds the pieces of the `dnstool` binary that sit around the
//! [`dns-codec`] wire format implementation:
//!
//! - [`Config`] collects where and how to query. When no server is given, the
//!   first `nameserver` in `/etc/resolv.conf` is used on `cfg(unix)`, read
//!   asynchronously with [`async-fs`].
//! - [`query`] sends a single question over UDP with [`async-io`] and waits a
//!   bounded time for the matching response.
//! - [`Report`] renders the decoded response the way `dig` does.
//!
//! [`dns-codec`]: dns_codec
//! [`async-fs`]: https://crates.io/crates/async-fs
//! [`async-io`]: https://crates.io/crates/async-io

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod unix;
        use unix as sys;
    } else {
        mod fallback;
        use fallback as sys;
    }
}

mod config;
mod error;
mod report;
mod transport;

pub use config::{parse_server, Config, FALLBACK_SERVER};
pub use error::LookupError;
pub use report::Report;
pub use transport::{query, RECV_BUFFER_LEN};

fn _assert_threadsafe() {
    fn _assertion<F: Send>(_: F) {}
    let config = Config::new(FALLBACK_SERVER);
    _assertion(query(&config, dns_codec::Question::default()));
}
