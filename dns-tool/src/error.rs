use std::io;

/// An error that may occur while looking up a name.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LookupError {
    /// The socket could not be set up, or sending or receiving failed.
    #[error("network error: {0}")]
    Io(#[from] io::Error),

    /// The query could not be encoded or the response could not be decoded.
    #[error("malformed message: {0}")]
    Codec(#[from] dns_codec::Error),

    /// No response arrived in time.
    #[error("no response within {0:?}")]
    Timeout(std::time::Duration),

    /// The response answers some other query.
    #[error("response ID {actual} does not match query ID {expected}")]
    IdMismatch {
        /// The ID of the query that was sent.
        expected: u16,

        /// The ID of the response that arrived.
        actual: u16,
    },
}
