//! # gander
//!
//! Article extraction from web pages.
//!
//! Given an HTML document, gander finds the main article body by scoring
//! text blocks against language stopword lists, strips navigation and
//! boilerplate around it, and returns the clean text together with the
//! page's metadata: title, authors, publish date, OpenGraph properties,
//! schema.org data, and the media embedded in the article.
//!
//! ## Quick Start
//!
//! ```rust
//! use gander::extract;
//!
//! let html = r#"<html><head><title>My Article</title></head>
//! <body><article>
//! <p>It was the best of times and it was also in some ways the worst
//! of times for all of the people in the story.</p>
//! <p>It was the best of times and it was also in some ways the worst
//! of times for all of the people in the story.</p>
//! </article></body></html>"#;
//!
//! let article = extract(html)?;
//! println!("Title: {}", article.title);
//! println!("Content: {}", article.cleaned_text);
//! # Ok::<(), gander::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Content extraction**: stopword-weighted gravity scoring picks the
//!   article body; sibling stitching and cleanup passes refine it
//! - **Metadata extraction**: title, authors, publish date, language,
//!   OpenGraph, schema.org JSON-LD, canonical link
//! - **Media extraction**: links, embedded tweets, and video embeds found
//!   inside the article body
//! - **Pluggable fetching**: bring your own HTTP client through the
//!   [`HtmlFetcher`] trait; raw bytes are decoded with charset sniffing

mod crawler;

/// The extraction result record.
pub mod article;

/// Document cleaning: boilerplate removal and block normalization.
pub mod cleaner;

/// Extraction configuration and site pattern tables.
pub mod config;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Character encoding detection and decoding.
pub mod encoding;

mod error;

/// Gravity-scoring content extraction.
pub mod extractor;

/// Plain-text rendering of the extracted body.
pub mod formatter;

/// Link density testing for boilerplate detection.
pub mod link_density;

/// Metadata extraction (meta tags, OpenGraph, JSON-LD, media).
pub mod metadata;

/// Fetching seam and source identity helpers.
pub mod network;

/// Text utilities: tokenization and stopword counting.
pub mod text;

pub use article::{Article, Video};
pub use config::{AuthorPattern, Config, ContextPattern, PublishDatePattern};
pub use crawler::Crawler;
pub use error::{Error, Result};
pub use network::{FetchedPage, HtmlFetcher};
pub use text::StopwordProvider;

use crate::encoding::decode_html;
use crate::network::prepare_url;
use std::sync::Arc;

/// Extract an article from raw HTML using the default configuration.
#[allow(clippy::missing_errors_doc)]
pub fn extract(raw_html: &str) -> Result<Article> {
    extract_with_config(raw_html, &Config::default())
}

/// Extract an article from raw HTML with a custom configuration.
///
/// # Example
///
/// ```rust
/// use gander::{extract_with_config, Config};
///
/// let html = "<html><body><article><p>Content</p></article></body></html>";
/// let config = Config {
///     parse_lists: false,
///     ..Config::default()
/// };
/// let article = extract_with_config(html, &config)?;
/// # Ok::<(), gander::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_with_config(raw_html: &str, config: &Config) -> Result<Article> {
    Crawler::new(config).process(raw_html, None)
}

/// Extract an article from raw HTML bytes.
///
/// The charset is sniffed from a byte-order mark or an in-markup
/// declaration, defaulting to UTF-8; invalid sequences decode to
/// replacement characters rather than failing.
///
/// # Example
///
/// ```rust
/// use gander::extract_bytes;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head>\
/// <body><article>\
/// <p>It was the best of times and it was also in some ways the worst \
/// of times for all of the people in the caf\xE9 that day.</p>\
/// <p>It was the best of times and it was also in some ways the worst \
/// of times for all of the people in the caf\xE9 that day.</p>\
/// </article></body></html>";
/// let article = extract_bytes(html)?;
/// assert!(article.cleaned_text.contains("caf\u{e9}"));
/// # Ok::<(), gander::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes(raw_html: &[u8]) -> Result<Article> {
    extract_bytes_with_config(raw_html, &Config::default())
}

/// Extract an article from raw HTML bytes with a custom configuration.
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes_with_config(raw_html: &[u8], config: &Config) -> Result<Article> {
    let (html, _encoding) = decode_html(raw_html, None);
    extract_with_config(&html, config)
}

/// Reusable extraction entry point.
///
/// Holds a configuration and, optionally, a fetcher for URL-based
/// extraction. For one-shot raw-HTML extraction the free functions
/// [`extract`] and [`extract_with_config`] are enough.
pub struct Gander {
    config: Config,
    fetcher: Option<Arc<dyn HtmlFetcher>>,
}

impl Gander {
    /// An extractor without network access; only raw HTML is accepted.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config, fetcher: None }
    }

    /// An extractor that can fetch pages itself.
    #[must_use]
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn HtmlFetcher>) -> Self {
        Self { config, fetcher: Some(fetcher) }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract an article from a URL, raw HTML, or both.
    ///
    /// With raw HTML the URL only provides source identity. With a URL
    /// alone the page is fetched through the configured fetcher and its
    /// bytes decoded with charset sniffing; fetch failures yield an
    /// empty article unless `strict` mode asks for an error. Supplying
    /// neither is [`Error::MissingSource`].
    #[allow(clippy::missing_errors_doc)]
    pub fn extract(&self, url: Option<&str>, raw_html: Option<&str>) -> Result<Article> {
        match (url, raw_html) {
            (_, Some(html)) => Crawler::new(&self.config).process(html, url),
            (Some(url), None) => self.extract_from_url(url),
            (None, None) => Err(Error::MissingSource),
        }
    }

    fn extract_from_url(&self, url: &str) -> Result<Article> {
        let Some(fetcher) = &self.fetcher else {
            return Err(Error::MissingSource);
        };
        let prepared = prepare_url(url);
        let page = match fetcher.fetch(&prepared) {
            Ok(page) => page,
            Err(err) if self.config.strict => return Err(err),
            Err(_) => return Ok(Article::default()),
        };
        let (html, used_encoding) = decode_html(&page.body, page.declared_encoding.as_deref());
        let mut article = Crawler::new(&self.config).process(&html, Some(&page.final_url))?;
        if article.meta_encoding.is_none() {
            article.meta_encoding = Some(used_encoding.to_string());
        }
        Ok(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedFetcher {
        body: Vec<u8>,
    }

    impl HtmlFetcher for CannedFetcher {
        fn fetch(&self, url: &str) -> Result<FetchedPage> {
            Ok(FetchedPage {
                final_url: url.to_string(),
                body: self.body.clone(),
                declared_encoding: None,
            })
        }
    }

    struct FailingFetcher;

    impl HtmlFetcher for FailingFetcher {
        fn fetch(&self, _url: &str) -> Result<FetchedPage> {
            Err(Error::Network { status: Some(404), reason: "not found".to_string() })
        }
    }

    const PROSE: &str = "It was the best of times and it was also in some ways \
                         the worst of times for all of the people in the story.";

    #[test]
    fn no_source_is_an_error() {
        let gander = Gander::new(Config::default());
        assert!(matches!(gander.extract(None, None), Err(Error::MissingSource)));
    }

    #[test]
    fn url_without_fetcher_is_an_error() {
        let gander = Gander::new(Config::default());
        let result = gander.extract(Some("https://example.com/a"), None);
        assert!(matches!(result, Err(Error::MissingSource)));
    }

    #[test]
    fn fetched_pages_run_the_full_pipeline() {
        let html = format!(
            "<html><body><article><p>{PROSE}</p><p>{PROSE}</p></article></body></html>"
        );
        let fetcher = Arc::new(CannedFetcher { body: html.into_bytes() });
        let gander = Gander::with_fetcher(Config::default(), fetcher);
        let article = gander.extract(Some("https://example.com/story"), None).unwrap();
        assert!(article.has_content());
        assert_eq!(article.final_url, "https://example.com/story");
        assert_eq!(article.meta_encoding.as_deref(), Some("UTF-8"));
    }

    #[test]
    fn strict_mode_surfaces_fetch_failures() {
        let gander = Gander::with_fetcher(Config::default(), Arc::new(FailingFetcher));
        let result = gander.extract(Some("https://example.com/a"), None);
        assert!(matches!(result, Err(Error::Network { status: Some(404), .. })));
    }

    #[test]
    fn lenient_mode_swallows_fetch_failures() {
        let config = Config { strict: false, ..Config::default() };
        let gander = Gander::with_fetcher(config, Arc::new(FailingFetcher));
        let article = gander.extract(Some("https://example.com/a"), None).unwrap();
        assert!(!article.has_content());
    }
}
