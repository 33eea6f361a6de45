//! Error types for gander.
//!
//! Disappointing extraction quality is never an error: documents without a
//! recognizable article body produce an empty `Article`. Errors are reserved
//! for structurally impossible input, failed fetches in strict mode, and
//! unrecognized configuration keys.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTML could not be turned into a document tree (e.g. empty source).
    #[error("HTML parsing failed: {0}")]
    Parse(String),

    /// A page fetch failed while `strict` mode was enabled.
    #[error("network fetch failed ({status:?}): {reason}")]
    Network {
        /// HTTP status code, when one was received.
        status: Option<u16>,
        /// Human-readable failure description.
        reason: String,
    },

    /// Neither a usable URL+fetcher nor raw HTML was supplied.
    #[error("no HTML source: supply raw HTML, or a URL together with a fetcher")]
    MissingSource,

    /// A configuration override named an option this crate does not recognize.
    #[error("unknown configuration option: {0}")]
    UnknownOption(String),

    /// A configuration override carried a value of the wrong type.
    #[error("invalid value for configuration option {0}")]
    InvalidOptionValue(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
