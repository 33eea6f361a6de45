//! Document cleaning.
//!
//! Runs before scoring and strips the markup noise that would otherwise
//! pollute the gravity scores: scripts, styles, boilerplate blocks matched
//! by id/class/name patterns, inline emphasis wrappers, and social-widget
//! containers. The final passes convert `div`/`span` wrappers into
//! paragraph structure so the scorer sees a uniform `<p>`-based tree.
//!
//! Cleaning mutates the document in place and is destructive; callers that
//! need the original markup clone the tree first.

use std::collections::HashSet;
use std::sync::LazyLock;

use dom_query::{Document, NodeRef, Selection};
use regex::Regex;

use crate::dom::{
    child_nodes, descendants_by_tag, node_key, node_outer_html, node_tag, set_inner_html,
    unwrap_element, NodeKey,
};
use crate::text::inner_trim;

/// id/class/name fragments that mark a node as boilerplate.
#[allow(clippy::expect_used)]
static BOILERPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        "(?i)",
        "^side$|combx|retweet|mediaarticlerelated|menucontainer|",
        "navbar|storytopbar-bucket|utility-bar|inline-share-tools",
        "|comment|PopularQuestions|contact|foot|footer|Footer|footnote",
        "|cnn_strycaptiontxt|cnn_html_slideshow|cnn_strylftcntnt",
        "|^links$|meta$|shoutbox|sponsor",
        "|tags|socialnetworking|socialNetworking|cnnStryHghLght",
        "|cnn_stryspcvbx|^inset$|pagetools|post-attributes",
        "|welcome_form|contentTools2|the_answers",
        "|communitypromo|runaroundLeft|subscribe|vcard|articleheadings",
        "|date|^print$|popup|author-dropdown|tools|socialtools|byline",
        "|konafilter|KonaFilter|breadcrumbs|^fn$|wp-caption-text",
        "|legende|ajoutVideo|timestamp|js_replies|disclaim",
    ))
    .expect("valid regex")
});

#[allow(clippy::expect_used)]
static CAPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)^caption$").expect("valid regex"));
#[allow(clippy::expect_used)]
static GOOGLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i) google ").expect("valid regex"));
#[allow(clippy::expect_used)]
static ENTRIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)^[^entry-]more.*$").expect("valid regex"));
#[allow(clippy::expect_used)]
static FACEBOOK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)[^-]facebook").expect("valid regex"));
#[allow(clippy::expect_used)]
static FACEBOOK_BROADCASTING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)facebook-broadcasting").expect("valid regex"));
#[allow(clippy::expect_used)]
static TWITTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)[^-]twitter").expect("valid regex"));

/// Tags that make a wrapper "structural" rather than a text container.
const STRUCTURAL_TAGS: &[&str] = &[
    "a", "blockquote", "dl", "div", "img", "ol", "p", "pre", "table", "ul",
];

/// Run the full cleaning sequence over a document, in place.
///
/// Pass order matters: attribute scrubbing runs before pattern removal so
/// a naughty body class cannot wipe the whole page, and wrapper conversion
/// runs last so it only sees surviving content.
pub fn clean(doc: &Document) {
    clean_body_classes(doc);
    clean_article_tags(doc);
    unwrap_emphasis(doc);
    remove_drop_caps(doc);
    remove_scripts_styles(doc);
    remove_bad_tags(doc);
    remove_nodes_matching(doc, &CAPTION_RE);
    remove_nodes_matching(doc, &GOOGLE_RE);
    remove_nodes_matching(doc, &ENTRIES_RE);
    remove_nodes_matching(doc, &FACEBOOK_RE);
    remove_nodes_matching(doc, &FACEBOOK_BROADCASTING_RE);
    remove_nodes_matching(doc, &TWITTER_RE);
    clean_para_spans(doc);
    wrappers_to_paragraphs(doc, "div");
    wrappers_to_paragraphs(doc, "span");
}

/// A body class matching a removal pattern would empty the whole page.
fn clean_body_classes(doc: &Document) {
    doc.select("body").remove_attr("class");
}

/// `<article>` attributes often carry words like "post-content" that the
/// pattern passes would otherwise strip wholesale.
fn clean_article_tags(doc: &Document) {
    let articles = doc.select("article");
    for attr in ["id", "name", "class"] {
        articles.remove_attr(attr);
    }
}

/// Unwrap `em` and `small`, keeping any that wrap an image.
fn unwrap_emphasis(doc: &Document) {
    for tag in ["em", "small"] {
        let nodes: Vec<NodeRef> = doc.select(tag).nodes().to_vec();
        // Deepest first: unwrapping reparses the inner markup and would
        // stale any still-pending descendant handles.
        for node in nodes.iter().rev() {
            let sel = Selection::from(*node);
            if !sel.select("img").exists() {
                unwrap_element(&sel);
            }
        }
    }
}

/// Unwrap decorative first-letter spans.
fn remove_drop_caps(doc: &Document) {
    let nodes: Vec<NodeRef> = doc
        .select("span[class~=dropcap], span[class~=drop_cap]")
        .nodes()
        .to_vec();
    for node in nodes.iter().rev() {
        unwrap_element(&Selection::from(*node));
    }
}

fn remove_scripts_styles(doc: &Document) {
    doc.select("script").remove();
    doc.select("style").remove();
}

/// Remove every element whose id, class, or name matches the boilerplate
/// pattern. Three separate passes, one per attribute.
fn remove_bad_tags(doc: &Document) {
    for attr in ["id", "class", "name"] {
        remove_by_attr(doc, attr, &BOILERPLATE_RE);
    }
}

/// Remove elements whose id or class matches `pattern`.
fn remove_nodes_matching(doc: &Document, pattern: &Regex) {
    for attr in ["id", "class"] {
        remove_by_attr(doc, attr, pattern);
    }
}

fn remove_by_attr(doc: &Document, attr: &str, pattern: &Regex) {
    let selector = format!("[{attr}]");
    let matched: Vec<NodeRef> = doc
        .select(&selector)
        .nodes()
        .iter()
        .copied()
        .filter(|node| {
            Selection::from(*node)
                .attr(attr)
                .is_some_and(|value| pattern.is_match(&value))
        })
        .collect();
    for node in matched.iter().rev() {
        Selection::from(*node).remove();
    }
}

/// Unwrap spans living inside paragraphs; their text joins the paragraph.
fn clean_para_spans(doc: &Document) {
    let nodes: Vec<NodeRef> = doc.select("p span").nodes().to_vec();
    for node in nodes.iter().rev() {
        unwrap_element(&Selection::from(*node));
    }
}

/// Convert `div` (and later `span`) wrappers into paragraph structure.
///
/// A wrapper with no structural descendants is renamed to `<p>` outright.
/// Otherwise its child list is rebuilt: bare text runs are collected into
/// synthetic paragraphs, absorbing adjacent inline anchors, while real
/// child elements are kept as-is.
fn wrappers_to_paragraphs(doc: &Document, tag: &str) {
    let wrappers: Vec<NodeRef> = doc.select(tag).nodes().to_vec();
    // Deepest first, so a rebuild never stales a pending nested wrapper.
    for wrapper in wrappers.iter().rev() {
        if descendants_by_tag(wrapper, STRUCTURAL_TAGS).is_empty() {
            Selection::from(*wrapper).rename("p");
        } else {
            rebuild_wrapper(wrapper);
        }
    }
}

/// Rebuild a mixed-content wrapper's child list.
///
/// Text runs longer than one character become paragraph candidates; each
/// absorbs its adjacent unconsumed anchor siblings (nearest first on the
/// left, document order on the right) so inline links stay with their
/// sentence. Consumed anchors appear only inside the synthetic paragraph.
/// The pending run is flushed when a real `<p>` child is reached, and once
/// more at the end.
fn rebuild_wrapper(wrapper: &NodeRef) {
    let kids = child_nodes(wrapper);

    // First pass: decide which anchors each text run absorbs.
    let mut used: HashSet<NodeKey> = HashSet::new();
    let mut runs: Vec<Option<Vec<String>>> = vec![None; kids.len()];
    for (i, kid) in kids.iter().enumerate() {
        if !kid.is_text() {
            continue;
        }
        let trimmed = inner_trim(&kid.text());
        if trimmed.chars().count() <= 1 {
            continue;
        }
        let mut fragments = Vec::new();
        let mut prev = kid.prev_sibling();
        while let Some(node) = prev {
            if !is_unused_anchor(&node, &used) {
                break;
            }
            fragments.push(format!(" {} ", node_outer_html(&node)));
            used.insert(node_key(&node));
            prev = node.prev_sibling();
        }
        fragments.push(trimmed);
        let mut next = kid.next_sibling();
        while let Some(node) = next {
            if !is_unused_anchor(&node, &used) {
                break;
            }
            fragments.push(format!(" {} ", node_outer_html(&node)));
            used.insert(node_key(&node));
            next = node.next_sibling();
        }
        runs[i] = Some(fragments);
    }

    // Second pass: emit the rebuilt child markup.
    let mut out = String::new();
    let mut buffer = String::new();
    for (i, kid) in kids.iter().enumerate() {
        if kid.is_text() {
            if let Some(fragments) = &runs[i] {
                for fragment in fragments {
                    buffer.push_str(fragment);
                }
            }
            continue;
        }
        if !kid.is_element() || used.contains(&node_key(kid)) {
            continue;
        }
        if node_tag(kid).as_deref() == Some("p") && !buffer.is_empty() {
            out.push_str("<p>");
            out.push_str(&buffer);
            out.push_str("</p>");
            buffer.clear();
        }
        out.push_str(&node_outer_html(kid));
    }
    if !buffer.is_empty() {
        out.push_str("<p>");
        out.push_str(&buffer);
        out.push_str("</p>");
    }

    set_inner_html(&Selection::from(*wrapper), &out);
}

fn is_unused_anchor(node: &NodeRef, used: &HashSet<NodeKey>) -> bool {
    node.is_element()
        && node_tag(node).as_deref() == Some("a")
        && !used.contains(&node_key(node))
}
