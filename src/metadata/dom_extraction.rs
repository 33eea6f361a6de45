//! Title, author, tag, and publish-date extraction.
//!
//! These fields come from a priority chain: structured data first
//! (OpenGraph, then schema.org), then configured patterns against the
//! DOM, then whatever the bare markup offers.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dom_query::{Document, NodeRef, Selection};
use regex::Regex;
use serde_json::Value;

use crate::config::{AuthorPattern, PublishDatePattern};
use crate::dom::{node_attribute, node_text, text_of};

/// Separators between headline and site name in `<title>` text.
const TITLE_SPLITTERS: [&str; 4] = ["|", "-", "\u{bb}", ":"];

/// Tag-link conventions: explicit rel first, then URL shapes.
const A_REL_TAG_SELECTOR: &str = "a[rel=tag]";
const A_HREF_TAG_SELECTOR: &str =
    "a[href*='/tag/'], a[href*='/tags/'], a[href*='/topic/'], a[href*='?keyword=']";

/// Elements matching a tag/attribute pattern, the attribute value tested
/// as a case-insensitive regex search. `tag` and `attr` may each be
/// absent; with neither there is nothing to match.
fn matching_elements<'t>(
    doc: &'t Document,
    tag: Option<&str>,
    attr: Option<&str>,
    value: Option<&str>,
) -> Vec<NodeRef<'t>> {
    if let (Some(attr), Some(value)) = (attr, value) {
        let Ok(value_re) = Regex::new(&format!("(?i){value}")) else {
            return Vec::new();
        };
        let selector = match tag {
            Some(tag) => format!("{tag}[{attr}]"),
            None => format!("[{attr}]"),
        };
        return doc
            .select(&selector)
            .nodes()
            .iter()
            .copied()
            .filter(|node| {
                node_attribute(node, attr).is_some_and(|v| value_re.is_match(&v))
            })
            .collect();
    }
    match tag {
        Some(tag) => doc.select(tag).nodes().to_vec(),
        None => Vec::new(),
    }
}

/// Article tags from link conventions, deduplicated in encounter order.
#[must_use]
pub fn extract_tags(doc: &Document) -> Vec<String> {
    let mut elements = doc.select(A_REL_TAG_SELECTOR);
    if elements.is_empty() {
        elements = doc.select(A_HREF_TAG_SELECTOR);
    }
    let mut tags: Vec<String> = Vec::new();
    for element in elements.iter() {
        let tag = text_of(&element);
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Author names; schema.org data wins over configured DOM patterns.
#[must_use]
pub fn extract_authors(
    doc: &Document,
    schema: Option<&Value>,
    patterns: &[AuthorPattern],
) -> Vec<String> {
    let from_schema = authors_from_schema(schema);
    if !from_schema.is_empty() {
        return from_schema;
    }
    authors_from_patterns(doc, patterns)
}

fn authors_from_schema(schema: Option<&Value>) -> Vec<String> {
    let Some(author) = schema.and_then(|s| s.get("author")) else {
        return Vec::new();
    };
    let entries: Vec<&Value> = match author {
        Value::Array(list) => list.iter().collect(),
        other => vec![other],
    };
    let mut authors = Vec::new();
    for entry in entries {
        match entry {
            Value::Object(map) => {
                if let Some(name) = map.get("name").and_then(Value::as_str) {
                    if !name.is_empty() {
                        authors.push(name.to_string());
                    }
                }
            }
            Value::String(name) => authors.push(name.clone()),
            _ => {}
        }
    }
    authors
}

fn authors_from_patterns(doc: &Document, patterns: &[AuthorPattern]) -> Vec<String> {
    let mut authors: Vec<String> = Vec::new();
    let mut push = |name: String| {
        if !name.is_empty() && !authors.contains(&name) {
            authors.push(name);
        }
    };
    for pattern in patterns {
        let matches = matching_elements(
            doc,
            pattern.tag.as_deref(),
            pattern.attr.as_deref(),
            pattern.value.as_deref(),
        );
        for node in matches {
            if let Some(sub) = &pattern.subpattern {
                let scoped = Selection::from(node);
                let name_node = scoped
                    .select(&sub_selector(sub))
                    .nodes()
                    .iter()
                    .copied()
                    .find(|candidate| sub_matches(sub, candidate));
                if let Some(name_node) = name_node {
                    push(node_text(&name_node));
                }
            } else if pattern.tag.is_none() {
                if let Some(content_attr) = &pattern.content {
                    if let Some(name) = node_attribute(&node, content_attr) {
                        push(name);
                    }
                }
            } else {
                push(node_text(&node));
            }
        }
    }
    authors
}

fn sub_selector(sub: &AuthorPattern) -> String {
    match (&sub.tag, &sub.attr) {
        (Some(tag), Some(attr)) => format!("{tag}[{attr}]"),
        (Some(tag), None) => tag.clone(),
        (None, Some(attr)) => format!("[{attr}]"),
        (None, None) => "*".to_string(),
    }
}

fn sub_matches(sub: &AuthorPattern, node: &NodeRef) -> bool {
    match (&sub.attr, &sub.value) {
        (Some(attr), Some(value)) => {
            let Ok(value_re) = Regex::new(&format!("(?i){value}")) else {
                return false;
            };
            node_attribute(node, attr).is_some_and(|v| value_re.is_match(&v))
        }
        _ => true,
    }
}

/// Publish date string, as found in the page.
///
/// OpenGraph's `article:published_time` wins, then schema.org
/// `datePublished`, then the configured pattern list in order. A meta
/// pattern with a `subcontent` key parses its content attribute as JSON;
/// a broken JSON payload ends the search.
#[must_use]
pub fn extract_publish_date(
    doc: &Document,
    opengraph: &HashMap<String, Vec<String>>,
    schema: Option<&Value>,
    patterns: &[PublishDatePattern],
    domain: &str,
) -> Option<String> {
    if let Some(values) = opengraph.get("article:published_time") {
        if let Some(first) = values.first() {
            return Some(first.clone());
        }
    }
    if let Some(date) = schema
        .and_then(|s| s.get("datePublished"))
        .and_then(Value::as_str)
    {
        return Some(date.to_string());
    }

    for pattern in patterns {
        if let Some(pattern_domain) = &pattern.domain {
            if pattern_domain != domain {
                continue;
            }
        }
        let matches = matching_elements(
            doc,
            pattern.tag.as_deref(),
            pattern.attr.as_deref(),
            pattern.value.as_deref(),
        );
        let Some(first) = matches.first() else {
            continue;
        };
        if pattern.tag.is_some() {
            return Some(node_text(first));
        }
        let Some(content) = pattern
            .content
            .as_deref()
            .and_then(|attr| node_attribute(first, attr))
            .filter(|v| !v.is_empty())
        else {
            continue;
        };
        if let Some(subcontent) = &pattern.subcontent {
            let parsed: Value = serde_json::from_str(&content).ok()?;
            return parsed
                .get(subcontent)
                .and_then(Value::as_str)
                .map(str::to_string);
        }
        return Some(content);
    }
    None
}

/// Parse a publish date string into UTC.
///
/// Accepts RFC 3339 and RFC 2822 forms, then timezone-less datetimes and
/// bare dates, which are taken as UTC.
#[must_use]
pub fn publish_date_to_utc(date: &str) -> Option<DateTime<Utc>> {
    let trimmed = date.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date_only) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date_only.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

/// Lead image URL from the page's image-pointing metadata.
///
/// The `link[rel=image_src]` hint wins, then `og:image`, then the
/// schema.org `image` object's `url`. In-body image candidates need
/// byte-level inspection and are left to the caller.
#[must_use]
pub fn extract_top_image(
    doc: &Document,
    opengraph: &HashMap<String, Vec<String>>,
    schema: Option<&Value>,
) -> Option<String> {
    if let Some(href) = doc
        .select("link[rel=image_src]")
        .nodes()
        .first()
        .and_then(|node| node_attribute(node, "href"))
        .filter(|href| !href.is_empty())
    {
        return Some(href);
    }
    if let Some(image) = opengraph.get("image").and_then(|v| v.first()) {
        if !image.is_empty() {
            return Some(image.clone());
        }
    }
    schema
        .and_then(|s| s.get("image"))
        .and_then(|image| image.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Article title from the priority chain, cleaned of site branding.
#[must_use]
pub fn extract_title(
    doc: &Document,
    opengraph: &HashMap<String, Vec<String>>,
    schema: Option<&Value>,
    domain: &str,
) -> String {
    if let Some(first) = opengraph.get("title").and_then(|v| v.first()) {
        return clean_title(first, domain, opengraph, schema);
    }
    if let Some(headline) = schema
        .and_then(|s| s.get("headline"))
        .and_then(Value::as_str)
    {
        return clean_title(headline, domain, opengraph, schema);
    }
    let meta_headline = matching_elements(doc, Some("meta"), Some("name"), Some("headline"));
    if let Some(content) = meta_headline
        .first()
        .and_then(|node| node_attribute(node, "content"))
    {
        return clean_title(&content, domain, opengraph, schema);
    }
    let title_element = doc.select("title");
    if title_element.exists() {
        return clean_title(&text_of(&title_element), domain, opengraph, schema);
    }
    String::new()
}

/// Strip the domain and site name out of a raw title and drop stray
/// separator words at either end.
fn clean_title(
    raw: &str,
    domain: &str,
    opengraph: &HashMap<String, Vec<String>>,
    schema: Option<&Value>,
) -> String {
    let mut title = raw.to_string();
    if !domain.is_empty() {
        if let Ok(domain_re) = Regex::new(&format!("(?i){}", regex::escape(domain))) {
            title = domain_re.replace_all(&title, "").trim().to_string();
        }
    }

    let site_name = site_name(&title, opengraph, schema);
    let has_splitter = TITLE_SPLITTERS.iter().any(|s| title.contains(s));
    if has_splitter && !site_name.is_empty() {
        title = title.replace(&site_name, "").trim().to_string();
    }

    let mut words: Vec<&str> = title.split_whitespace().collect();
    if words
        .first()
        .is_some_and(|w| TITLE_SPLITTERS.contains(w))
    {
        words.remove(0);
    }
    if words.is_empty() {
        return String::new();
    }
    if words
        .last()
        .is_some_and(|w| TITLE_SPLITTERS.contains(w))
    {
        words.pop();
    }
    words.join(" ")
}

fn site_name(
    title: &str,
    opengraph: &HashMap<String, Vec<String>>,
    schema: Option<&Value>,
) -> String {
    if let Some(name) = opengraph.get("site_name").and_then(|v| v.first()) {
        if name != title {
            return name.clone();
        }
    }
    schema
        .and_then(|s| s.get("publisher"))
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}
