//! Plain meta-tag extraction.
//!
//! The unglamorous page facts: description, keywords, declared language,
//! favicon, canonical link, domain, and charset. Everything here reads
//! the document (or the raw markup, for the charset) without heuristics.

use std::sync::LazyLock;

use dom_query::Document;
use regex::Regex;
use url::Url;

use crate::dom::{get_attribute, node_attribute};

#[allow(clippy::expect_used)]
static LANG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("valid regex"));

/// Charset declared in a meta tag, e.g. `<meta charset="utf-8">` or the
/// legacy `http-equiv` content-type form.
#[allow(clippy::expect_used)]
static CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta.*?charset=["']*[^a-zA-Z0-9]*([a-zA-Z0-9\-_]+?)[^a-zA-Z0-9]* *?["'>]"#)
        .expect("valid regex")
});

/// Encoding declared in an XML prolog.
#[allow(clippy::expect_used)]
static XML_ENCODING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<\?xml.*?encoding=["']*([a-zA-Z0-9\-_]+?) *?["'>]"#).expect("valid regex")
});

/// Meta facts about a page.
#[derive(Debug, Default, Clone)]
pub struct PageMetas {
    pub description: String,
    pub keywords: String,
    pub lang: Option<String>,
    pub favicon: String,
    pub canonical: String,
    pub domain: String,
    pub encoding: Option<String>,
}

/// Charset declared in raw markup, meta tag first, XML prolog second.
#[must_use]
pub fn encoding_from_content(raw_html: &str) -> Option<String> {
    CHARSET_RE
        .captures(raw_html)
        .or_else(|| XML_ENCODING_RE.captures(raw_html))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the page's meta facts.
#[must_use]
pub fn extract_metas(doc: &Document, final_url: &str, raw_html: &str) -> PageMetas {
    PageMetas {
        description: meta_content(doc, "meta[name=description]"),
        keywords: meta_content(doc, "meta[name=keywords]"),
        lang: meta_lang(doc),
        favicon: favicon(doc),
        canonical: canonical_link(doc, final_url),
        domain: domain_of(final_url),
        encoding: encoding_from_content(raw_html),
    }
}

fn meta_content(doc: &Document, selector: &str) -> String {
    get_attribute(&doc.select(selector), "content")
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Hostname of the final URL, empty when unparseable.
fn domain_of(final_url: &str) -> String {
    Url::parse(final_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// First `link` whose `rel` mentions an icon, shortcut variants included.
fn favicon(doc: &Document) -> String {
    first_link_matching(doc, "icon")
        .and_then(|link| node_attribute(&link, "href"))
        .unwrap_or_default()
}

/// Canonical link, resolved against the page origin when relative.
fn canonical_link(doc: &Document, final_url: &str) -> String {
    if final_url.is_empty() {
        return String::new();
    }
    let Some(href) = first_link_matching(doc, "canonical")
        .and_then(|link| node_attribute(&link, "href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
    else {
        return final_url.to_string();
    };

    if Url::parse(&href).is_ok() {
        return href;
    }
    if let Ok(base) = Url::parse(final_url) {
        let origin = format!("{}://{}", base.scheme(), base.host_str().unwrap_or_default());
        if let Ok(resolved) = Url::parse(&origin).and_then(|o| o.join(&href)) {
            return resolved.to_string();
        }
    }
    href
}

fn first_link_matching<'t>(doc: &'t Document, rel_word: &str) -> Option<dom_query::NodeRef<'t>> {
    doc.select("link[rel]")
        .nodes()
        .iter()
        .find(|node| {
            node_attribute(node, "rel")
                .is_some_and(|rel| rel.to_ascii_lowercase().contains(rel_word))
        })
        .copied()
}

/// Declared page language as a lowercased 2-letter code.
///
/// `html@lang` wins, then the `content-language` http-equiv meta, then a
/// meta named `lang`. Only the first two characters are considered and
/// they must be letters.
fn meta_lang(doc: &Document) -> Option<String> {
    let mut declared = get_attribute(&doc.select("html"), "lang");
    if declared.is_none() {
        let candidates = [
            ("http-equiv", "content-language"),
            ("name", "lang"),
        ];
        for (attr, value) in candidates {
            let selector = format!("meta[{attr}]");
            let found = doc.select(&selector).nodes().iter().find_map(|node| {
                let matches = node_attribute(node, attr)
                    .is_some_and(|v| v.to_ascii_lowercase().contains(value));
                if matches {
                    node_attribute(node, "content")
                } else {
                    None
                }
            });
            if found.is_some() {
                declared = found;
                break;
            }
        }
    }

    let declared = declared?;
    let prefix: String = declared.chars().take(2).collect();
    if LANG_RE.is_match(&prefix) {
        Some(prefix.to_lowercase())
    } else {
        None
    }
}
