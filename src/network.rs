//! Fetching seam and source identity.
//!
//! The crate ships no HTTP client; callers plug one in through
//! [`HtmlFetcher`]. Everything else here is identity bookkeeping: the
//! FNV-1a hash that tags a crawl source and the escaped-fragment rewrite
//! for shebang URLs.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;

/// A fetched page, bytes still undecoded.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects.
    pub final_url: String,
    /// Raw response body.
    pub body: Vec<u8>,
    /// Charset the transport declared, when any.
    pub declared_encoding: Option<String>,
}

/// Source of remote documents.
///
/// Implementations wrap whatever HTTP client the caller already uses;
/// fetch failures map to [`crate::Error::Network`].
pub trait HtmlFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// Rewrite shebang fragments into their crawlable escaped form.
#[must_use]
pub fn prepare_url(url: &str) -> String {
    url.replace("#!", "?_escaped_fragment_=")
}

/// 64-bit FNV-1a over raw bytes.
#[must_use]
pub fn fnv1a_64(data: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
    const PRIME: u64 = 1_099_511_628_211;
    let mut hash = OFFSET_BASIS;
    for byte in data {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Identity tag for a crawl source: content hash plus wall-clock stamp.
#[must_use]
pub fn link_hash(key: &[u8]) -> String {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64();
    format!("{}.{stamp}", fnv1a_64(key))
}
