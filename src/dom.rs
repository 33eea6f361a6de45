//! DOM operations adapter.
//!
//! Thin layer of free functions over `dom_query`, giving the pipeline the
//! handful of tree operations it needs: space-joined text extraction,
//! descendant iteration by tag, attribute-pattern search, unwrapping, and
//! subtree cloning. Everything above this module talks in terms of these
//! helpers rather than raw `dom_query` calls.

use std::sync::LazyLock;

pub use dom_query::{Document, NodeId, NodeRef, Selection};
use regex::Regex;
pub use tendril::StrTendril;

use crate::text::inner_trim;

/// HTML comments, stripped from raw markup before parsing (the parsed tree
/// does not expose comment nodes for later removal).
#[allow(clippy::expect_used)]
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

/// Remove HTML comments from raw markup.
#[must_use]
pub fn strip_comments(html: &str) -> String {
    COMMENT_RE.replace_all(html, "").to_string()
}

/// Parse HTML into a document tree.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Node identity ===

/// Identity key for a node: id plus owning-tree address.
///
/// Node ids are only unique within one tree; scoring may span several
/// cloned sub-documents, so keys carry the tree address too.
pub type NodeKey = (NodeId, usize);

/// Build the identity key for a node.
#[inline]
#[must_use]
pub fn node_key(node: &NodeRef) -> NodeKey {
    (node.id, std::ptr::from_ref(node.tree) as usize)
}

// === Tag / attribute access ===

/// Tag name of the first node in a selection.
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Tag name of an element node.
#[must_use]
pub fn node_tag(node: &NodeRef) -> Option<String> {
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Get an attribute value.
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get an attribute value from a node.
#[inline]
#[must_use]
pub fn node_attribute(node: &NodeRef, name: &str) -> Option<String> {
    Selection::from(*node).attr(name).map(|s| s.to_string())
}

/// Set an attribute value.
#[inline]
pub fn set_attribute(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}

/// Remove an attribute.
#[inline]
pub fn remove_attribute(sel: &Selection, name: &str) {
    sel.remove_attr(name);
}

// === Text extraction ===

/// Visible text of a selection: all descendant text nodes joined with
/// single spaces, whitespace runs collapsed, ends trimmed.
///
/// This is the text every stopword count in the pipeline runs over; the
/// space joining keeps words from gluing together across tag boundaries.
#[must_use]
pub fn text_of(sel: &Selection) -> String {
    let mut out = String::new();
    for node in sel.nodes() {
        push_text(node, &mut out);
    }
    inner_trim(&out)
}

/// Visible text of a single node, same joining rules as [`text_of`].
#[must_use]
pub fn node_text(node: &NodeRef) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    inner_trim(&out)
}

fn push_text(node: &NodeRef, out: &mut String) {
    if node.is_text() {
        out.push_str(&node.text());
        out.push(' ');
        return;
    }
    for descendant in node.descendants() {
        if descendant.is_text() {
            out.push_str(&descendant.text());
            out.push(' ');
        }
    }
}

/// Inner HTML of a selection.
#[inline]
#[must_use]
pub fn inner_html(sel: &Selection) -> StrTendril {
    sel.inner_html()
}

/// Outer HTML of a selection. Serialization never includes trailing
/// sibling text, so this doubles as "clone without tail".
#[inline]
#[must_use]
pub fn outer_html(sel: &Selection) -> StrTendril {
    sel.html()
}

/// Outer HTML of a single node.
#[must_use]
pub fn node_outer_html(node: &NodeRef) -> String {
    if node.is_text() {
        return node.text().to_string();
    }
    Selection::from(*node).html().to_string()
}

// === Tree navigation ===

/// Direct children of a node, text nodes included, in document order.
#[must_use]
pub fn child_nodes<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children()
}

/// Parent of a node when it is an element.
#[must_use]
pub fn parent_element<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    node.parent().filter(NodeRef::is_element)
}

/// Preceding element siblings, nearest first.
#[must_use]
pub fn previous_element_siblings<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    let mut current = node.prev_sibling();
    while let Some(sibling) = current {
        if sibling.is_element() {
            out.push(sibling);
        }
        current = sibling.prev_sibling();
    }
    out
}

/// Descendant elements matching one of `tags`, in document order.
#[must_use]
pub fn descendants_by_tag<'a>(node: &NodeRef<'a>, tags: &[&str]) -> Vec<NodeRef<'a>> {
    node.descendants()
        .into_iter()
        .filter(|d| {
            d.is_element()
                && node_tag(d).is_some_and(|t| tags.iter().any(|wanted| *wanted == t))
        })
        .collect()
}

/// Descendant elements (optionally restricted by tag) whose attribute
/// value matches `pattern` with a case-insensitive regex search.
#[must_use]
pub fn descendants_matching_attr<'a>(
    node: &NodeRef<'a>,
    tag: Option<&str>,
    attr: &str,
    pattern: &Regex,
) -> Vec<NodeRef<'a>> {
    node.descendants()
        .into_iter()
        .filter(|d| {
            if !d.is_element() {
                return false;
            }
            if let Some(wanted) = tag {
                if node_tag(d).as_deref() != Some(wanted) {
                    return false;
                }
            }
            node_attribute(d, attr).is_some_and(|v| pattern.is_match(&v))
        })
        .collect()
}

/// All descendant elements of a selection, in document order.
#[must_use]
pub fn descendant_elements<'a>(sel: &Selection<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    for node in sel.nodes() {
        out.extend(node.descendants().into_iter().filter(NodeRef::is_element));
    }
    out
}

// === Tree mutation ===

/// Remove elements from the tree.
#[inline]
pub fn remove(sel: &Selection) {
    sel.remove();
}

/// Remove matching descendant tags but keep their children.
#[inline]
pub fn strip_tags(sel: &Selection, tags: &[&str]) {
    sel.strip_elements(tags);
}

/// Unwrap a single element: replace it with its own inner markup.
pub fn unwrap_element(sel: &Selection) {
    let inner = inner_html(sel).to_string();
    sel.replace_with_html(inner);
}

/// Replace an element with arbitrary markup (or plain text).
#[inline]
pub fn replace_with_html(sel: &Selection, html: &str) {
    sel.replace_with_html(html);
}

/// Replace an element's children with new markup.
///
/// Invalidates node ids of the previous subtree.
#[inline]
pub fn set_inner_html(sel: &Selection, html: &str) {
    sel.set_html(html);
}

/// Rename an element's tag.
#[inline]
pub fn rename(sel: &Selection, new_tag: &str) {
    sel.rename(new_tag);
}

/// Deep-copy a subtree into its own document.
#[must_use]
pub fn clone_subtree(sel: &Selection) -> Document {
    Document::from(outer_html(sel).to_string())
}

/// Deep-copy an entire document.
#[must_use]
pub fn clone_document(doc: &Document) -> Document {
    Document::from(doc.html().to_string())
}
