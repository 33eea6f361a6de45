//! Link density detection.
//!
//! Navigation bars, tag clouds, and "related stories" boxes are mostly
//! anchor text; article prose is not. The density formula weights the
//! anchor-word ratio by the number of links, so a block with many short
//! links trips the threshold even when its total text is long.

use dom_query::{NodeRef, Selection};

use crate::dom::text_of;

/// Whether a block is dominated by link text.
///
/// The score is `(link_words / total_words) * link_count`; at or above
/// `1.0` the block is considered navigational. An element with no anchor
/// descendants is never link dense. Word counts split on single spaces
/// over space-normalized text, and the anchor texts are concatenated
/// without separators before splitting, so the ratio saturates quickly
/// for many-link blocks.
#[must_use]
pub fn is_high_link_density(sel: &Selection) -> bool {
    let links = sel.select("a");
    let number_of_links = links.length();
    if number_of_links == 0 {
        return false;
    }

    let text = text_of(sel);
    let words_number = text.split(' ').count() as f64;

    let mut link_text = String::new();
    for link in links.iter() {
        link_text.push_str(&text_of(&link));
    }
    let number_of_link_words = link_text.split(' ').count() as f64;

    let link_divisor = number_of_link_words / words_number;
    let score = link_divisor * number_of_links as f64;
    score >= 1.0
}

/// Node-level convenience wrapper for [`is_high_link_density`].
#[inline]
#[must_use]
pub fn node_is_high_link_density(node: &NodeRef) -> bool {
    is_high_link_density(&Selection::from(*node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    #[test]
    fn no_links_is_never_dense() {
        let doc = parse("<div><p>plenty of plain words here with no anchors at all</p></div>");
        assert!(!is_high_link_density(&doc.select("div")));
    }

    #[test]
    fn nav_block_is_dense() {
        let doc = parse(
            "<div><a href='/a'>home</a> <a href='/b'>news</a> \
             <a href='/c'>sport</a> <a href='/d'>weather</a></div>",
        );
        assert!(is_high_link_density(&doc.select("div")));
    }

    #[test]
    fn prose_with_one_link_is_not_dense() {
        let doc = parse(
            "<div><p>This is a long paragraph of ordinary running prose that \
             happens to mention <a href='/x'>one thing</a> in passing while \
             carrying on for a good number of additional words.</p></div>",
        );
        assert!(!is_high_link_density(&doc.select("div")));
    }

    #[test]
    fn link_count_amplifies_the_ratio() {
        // Three links whose text is a modest share of the total still trip
        // the threshold because the ratio is multiplied by the link count.
        let doc = parse(
            "<div>intro <a>first related story</a> <a>second related story</a> \
             <a>third related story</a></div>",
        );
        assert!(is_high_link_density(&doc.select("div")));
    }

    #[test]
    fn adding_links_never_lowers_the_density() {
        // Each extra anchor raises both the anchor-word ratio and the
        // link count, so the verdict is monotone: once a block trips the
        // threshold, more links keep it tripped.
        let mut tripped = false;
        for n_links in 0..8 {
            let anchors = "<a href='/x'>related story</a> ".repeat(n_links);
            let html =
                format!("<div>some plain words sit here before the links {anchors}</div>");
            let doc = parse(&html);
            let dense = is_high_link_density(&doc.select("div"));
            if tripped {
                assert!(dense, "verdict flipped back at {n_links} links");
            }
            tripped = dense;
        }
        assert!(tripped, "the all-anchor tail never tripped the threshold");
    }

    #[test]
    fn empty_anchor_text_counts_one_word() {
        let doc = parse("<div>several ordinary words surround <a href='/x'></a> it</div>");
        assert!(!is_high_link_density(&doc.select("div")));
    }
}
