//! Extraction configuration.
//!
//! A single flat struct controls the whole pipeline. Pattern tables carry
//! the accumulated site knowledge: which attribute/tag combinations mark an
//! article container, a publish date, or an author byline.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::text::{StopWords, StopwordProvider};

/// A tag/attribute pattern that marks a likely article container.
///
/// Either `tag` or the `attr`/`value` pair must be set. Attribute values
/// are matched as case-insensitive substrings.
#[derive(Debug, Clone)]
pub struct ContextPattern {
    /// Element tag name to match, if any.
    pub tag: Option<String>,
    /// Attribute name to inspect.
    pub attr: Option<String>,
    /// Pattern the attribute value must contain.
    pub value: Option<String>,
    /// Restrict the pattern to one site; `None` applies everywhere.
    pub domain: Option<String>,
}

impl ContextPattern {
    /// Pattern matching a bare tag name.
    #[must_use]
    pub fn for_tag(tag: &str) -> Self {
        Self { tag: Some(tag.to_string()), attr: None, value: None, domain: None }
    }

    /// Pattern matching an attribute/value pair on any element.
    #[must_use]
    pub fn for_attr(attr: &str, value: &str) -> Self {
        Self {
            tag: None,
            attr: Some(attr.to_string()),
            value: Some(value.to_string()),
            domain: None,
        }
    }
}

/// Where to find a machine-readable publish date.
#[derive(Debug, Clone)]
pub struct PublishDatePattern {
    /// Element tag name to match (e.g. `time`), if any.
    pub tag: Option<String>,
    /// Attribute name to inspect.
    pub attr: Option<String>,
    /// Pattern the attribute value must contain.
    pub value: Option<String>,
    /// Attribute carrying the date value itself (e.g. `content`, `datetime`).
    pub content: Option<String>,
    /// Key inside a JSON-valued content attribute (e.g. parsely-page).
    pub subcontent: Option<String>,
    /// Restrict the pattern to one site; `None` applies everywhere.
    pub domain: Option<String>,
}

impl PublishDatePattern {
    fn meta(attr: &str, value: &str, content: &str) -> Self {
        Self {
            tag: None,
            attr: Some(attr.to_string()),
            value: Some(value.to_string()),
            content: Some(content.to_string()),
            subcontent: None,
            domain: None,
        }
    }
}

/// Where to find author names.
#[derive(Debug, Clone)]
pub struct AuthorPattern {
    /// Element tag name to match, if any.
    pub tag: Option<String>,
    /// Attribute name to inspect.
    pub attr: Option<String>,
    /// Pattern the attribute value must contain.
    pub value: Option<String>,
    /// Attribute carrying the author value, when not element text.
    pub content: Option<String>,
    /// Nested pattern applied to descendants of a match (e.g. itemprop=name
    /// inside itemprop=author).
    pub subpattern: Option<Box<AuthorPattern>>,
}

/// Configuration for the extraction pipeline.
///
/// All fields are public; use `Config::default()` and adjust, or feed a
/// JSON-ish override map through [`Config::apply_overrides`].
#[derive(Clone)]
pub struct Config {
    /// Language used for stopword counting when the page declares none
    /// (or when `use_meta_language` is off). ISO 639-1 code.
    pub target_language: String,

    /// Let a detected page language override `target_language`.
    pub use_meta_language: bool,

    /// Keep `<ul>`/`<ol>` blocks in the extracted content.
    pub parse_lists: bool,

    /// Render each list item on its own bulleted line.
    pub pretty_lists: bool,

    /// Keep `<h1>`..`<h6>` blocks in the extracted content.
    pub parse_headers: bool,

    /// Keep footnote markers (`<sup>` content) inline in the output text.
    pub keep_footnotes: bool,

    /// Surface fetch failures as errors instead of empty articles.
    pub strict: bool,

    /// Patterns that short-circuit heuristic search for the article body.
    pub known_context_patterns: Vec<ContextPattern>,

    /// Patterns searched for a machine-readable publish date.
    pub known_publish_date_tags: Vec<PublishDatePattern>,

    /// Patterns searched for author names.
    pub known_author_patterns: Vec<AuthorPattern>,

    /// Replacement source of stopword sets; `None` uses the embedded lists.
    pub stopword_provider: Option<Arc<dyn StopwordProvider>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_language: "en".to_string(),
            use_meta_language: true,
            parse_lists: true,
            pretty_lists: true,
            parse_headers: true,
            keep_footnotes: true,
            strict: true,
            known_context_patterns: vec![
                ContextPattern::for_attr("class", "short-story"),
                ContextPattern::for_attr("itemprop", "articleBody"),
                ContextPattern::for_attr("class", "post-content"),
                ContextPattern::for_attr("class", "g-content"),
                ContextPattern::for_attr("class", "post-outer"),
                ContextPattern::for_tag("article"),
            ],
            known_publish_date_tags: vec![
                PublishDatePattern::meta("property", "rnews:datePublished", "content"),
                PublishDatePattern::meta("property", "article:published_time", "content"),
                PublishDatePattern::meta("name", "OriginalPublicationDate", "content"),
                PublishDatePattern::meta("itemprop", "datePublished", "datetime"),
                PublishDatePattern::meta("name", "published_time_telegram", "content"),
                PublishDatePattern {
                    subcontent: Some("pub_date".to_string()),
                    ..PublishDatePattern::meta("name", "parsely-page", "content")
                },
                PublishDatePattern {
                    tag: Some("time".to_string()),
                    attr: None,
                    value: None,
                    content: None,
                    subcontent: None,
                    domain: None,
                },
                PublishDatePattern::meta("itemprop", "datePublished", "content"),
            ],
            known_author_patterns: vec![
                AuthorPattern {
                    tag: None,
                    attr: Some("itemprop".to_string()),
                    value: Some("author".to_string()),
                    content: None,
                    subpattern: Some(Box::new(AuthorPattern {
                        tag: None,
                        attr: Some("itemprop".to_string()),
                        value: Some("name".to_string()),
                        content: None,
                        subpattern: None,
                    })),
                },
                AuthorPattern {
                    tag: None,
                    attr: Some("name".to_string()),
                    value: Some("author".to_string()),
                    content: Some("content".to_string()),
                    subpattern: None,
                },
            ],
            stopword_provider: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("target_language", &self.target_language)
            .field("use_meta_language", &self.use_meta_language)
            .field("parse_lists", &self.parse_lists)
            .field("pretty_lists", &self.pretty_lists)
            .field("parse_headers", &self.parse_headers)
            .field("keep_footnotes", &self.keep_footnotes)
            .field("strict", &self.strict)
            .field("custom_stopword_provider", &self.stopword_provider.is_some())
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Build a stopword counter for `language`, honoring a provider override.
    #[must_use]
    pub fn stop_words(&self, language: &str) -> StopWords {
        match &self.stopword_provider {
            Some(provider) => StopWords::with_provider(language, provider.as_ref()),
            None => StopWords::new(language),
        }
    }

    /// Apply a map of option overrides.
    ///
    /// Every recognized key is enumerated here; unknown keys and wrongly
    /// typed values are rejected with a typed error rather than ignored.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, Value>) -> Result<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "target_language" => {
                    self.target_language = expect_str(key, value)?;
                }
                "use_meta_language" => self.use_meta_language = expect_bool(key, value)?,
                "parse_lists" => self.parse_lists = expect_bool(key, value)?,
                "pretty_lists" => self.pretty_lists = expect_bool(key, value)?,
                "parse_headers" => self.parse_headers = expect_bool(key, value)?,
                "keep_footnotes" => self.keep_footnotes = expect_bool(key, value)?,
                "strict" => self.strict = expect_bool(key, value)?,
                _ => return Err(Error::UnknownOption(key.clone())),
            }
        }
        Ok(())
    }
}

fn expect_bool(key: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::InvalidOptionValue(key.to_string()))
}

fn expect_str(key: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidOptionValue(key.to_string()))
}
