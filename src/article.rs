//! The extraction result record.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// A video embed found inside the article body.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Video {
    /// Embed element tag (`iframe`, `embed`, `object`, `video`).
    pub embed_type: Option<String>,
    /// Recognized hosting provider, when the source URL names one.
    pub provider: Option<String>,
    /// Declared width attribute.
    pub width: Option<String>,
    /// Declared height attribute.
    pub height: Option<String>,
    /// Serialized embed markup, newline-collapsed.
    pub embed_code: Option<String>,
    /// Source URL of the embed.
    pub src: Option<String>,
}

/// Everything extracted from one document.
///
/// Content fields stay empty when no article body was found; that is a
/// valid outcome, not an error.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Article {
    /// Cleaned article title.
    pub title: String,
    /// The extracted article body as plain text.
    pub cleaned_text: String,
    /// Meta description.
    pub meta_description: String,
    /// Detected page language (2-letter code), when declared.
    pub meta_lang: Option<String>,
    /// Meta keywords, verbatim.
    pub meta_keywords: String,
    /// Favicon URL from `link[rel*=icon]`.
    pub meta_favicon: String,
    /// Charset declared in the raw markup, when present.
    pub meta_encoding: Option<String>,
    /// Canonical link, resolved against the final URL.
    pub canonical_link: String,
    /// Hostname of the final URL.
    pub domain: String,
    /// Serialized markup of the chosen article body, after cleanup.
    pub top_node_html: Option<String>,
    /// Serialized markup of the chosen article body before cleanup.
    pub top_node_raw_html: Option<String>,
    /// Lead image URL from the page's image-pointing metadata.
    pub top_image: Option<String>,
    /// Article tags harvested from tag-link conventions.
    pub tags: Vec<String>,
    /// OpenGraph properties; repeated keys accumulate.
    pub opengraph: HashMap<String, Vec<String>>,
    /// First schema.org object of a known article type, verbatim JSON.
    pub schema: Option<Value>,
    /// Embedded tweet markup found in the article body.
    pub tweets: Vec<String>,
    /// Video embeds found in the article body.
    pub movies: Vec<Video>,
    /// Outbound link URLs found in the article body.
    pub links: Vec<String>,
    /// Author names.
    pub authors: Vec<String>,
    /// URL the document was (or would have been) fetched from.
    pub final_url: String,
    /// Cache key derived from the raw source.
    pub link_hash: String,
    /// The source markup, verbatim as handed to the crawler.
    pub raw_html: String,
    /// Publish date string as found in the page.
    pub publish_date: Option<String>,
    /// Publish date normalized to UTC, when parseable.
    pub publish_datetime_utc: Option<DateTime<Utc>>,
    /// Free-form extras for callers layered on top of this crate.
    pub additional_data: HashMap<String, String>,
}

impl Article {
    /// Whether any article body text was extracted.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.cleaned_text.is_empty()
    }
}
