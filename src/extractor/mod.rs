//! Content extraction.
//!
//! The gravity scorer: candidate text blocks (`p`, `pre`, `td`) vote for
//! their parents, stopword counts weighted by positional boosts, and the
//! highest-scoring parent becomes the article body. Follow-up passes
//! stitch in leading siblings that belong to the story and prune
//! non-content children that survived cleaning.

pub mod score;

pub use score::ScoreBoard;

use dom_query::{Document, NodeRef, Selection};
use regex::Regex;

use crate::config::Config;
use crate::dom::{
    child_nodes, inner_html, node_attribute, node_outer_html, node_tag, node_text,
    parent_element, previous_element_siblings, set_inner_html, text_of,
};
use crate::link_density::{is_high_link_density, node_is_high_link_density};
use crate::text::StopWords;

/// Escape text for embedding into a synthetic markup fragment.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// The gravity-scoring content extractor.
///
/// Borrows its configuration and stopword set; one instance handles one
/// document. The page domain gates domain-restricted context patterns.
pub struct ContentExtractor<'a> {
    config: &'a Config,
    stop_words: &'a StopWords,
    domain: &'a str,
}

impl<'a> ContentExtractor<'a> {
    #[must_use]
    pub fn new(config: &'a Config, stop_words: &'a StopWords, domain: &'a str) -> Self {
        Self { config, stop_words, domain }
    }

    fn pattern_applies(&self, pattern_domain: Option<&str>) -> bool {
        match pattern_domain {
            Some(domain) => domain == self.domain,
            None => true,
        }
    }

    /// Find elements matching the known article-container patterns.
    ///
    /// Attribute values are matched as case-insensitive regex searches,
    /// and matches for every pattern accumulate, in pattern order.
    #[must_use]
    pub fn known_article_nodes<'t>(&self, doc: &'t Document) -> Vec<NodeRef<'t>> {
        let mut nodes = Vec::new();
        for pattern in &self.config.known_context_patterns {
            if !self.pattern_applies(pattern.domain.as_deref()) {
                continue;
            }
            if let Some(tag) = &pattern.tag {
                nodes.extend(doc.select(tag).nodes().iter().copied());
                continue;
            }
            let (Some(attr), Some(value)) = (&pattern.attr, &pattern.value) else {
                continue;
            };
            let Ok(value_re) = Regex::new(&format!("(?i){value}")) else {
                continue;
            };
            let selector = format!("[{attr}]");
            nodes.extend(
                doc.select(&selector)
                    .nodes()
                    .iter()
                    .copied()
                    .filter(|node| {
                        Selection::from(*node)
                            .attr(attr)
                            .is_some_and(|v| value_re.is_match(&v))
                    }),
            );
        }
        nodes
    }

    /// Whether a node itself matches a known article-container pattern.
    ///
    /// Unlike the document search this requires exact attribute equality;
    /// it guards the sibling stitcher against watering down a container
    /// that was selected deliberately.
    #[must_use]
    pub fn is_article_body(&self, node: &NodeRef) -> bool {
        let tag = node_tag(node);
        for pattern in &self.config.known_context_patterns {
            if !self.pattern_applies(pattern.domain.as_deref()) {
                continue;
            }
            if let (Some(attr), Some(value)) = (&pattern.attr, &pattern.value) {
                if node_attribute(node, attr).as_deref() == Some(value.as_str()) {
                    return true;
                }
            }
            if let Some(pattern_tag) = &pattern.tag {
                if tag.as_deref() == Some(pattern_tag.as_str()) {
                    return true;
                }
            }
        }
        false
    }

    /// Candidate text blocks under the given roots, grouped by tag kind
    /// per root: all paragraphs, then preformatted blocks, then cells.
    /// Boost decay depends on this ordering.
    #[must_use]
    pub fn nodes_to_check<'t>(&self, roots: &[Selection<'t>]) -> Vec<NodeRef<'t>> {
        let mut nodes = Vec::new();
        for root in roots {
            for tag in ["p", "pre", "td"] {
                nodes.extend(root.select(tag).nodes().iter().copied());
            }
        }
        nodes
    }

    /// Score candidates and pick the best parent node.
    ///
    /// Candidates need more than two stopwords and must not be link dense.
    /// Each surviving candidate adds its stopword count (plus boost) to
    /// its parent and half of that, truncated toward zero, to its
    /// grandparent. Early boostable candidates get a decaying bonus
    /// (`50, 25, 16, ...`); in long documents the trailing quarter is
    /// penalized quadratically, clamped back to `+5` once the penalty
    /// magnitude passes 40. The highest-scoring parent wins; on ties the
    /// first-encountered stays.
    #[must_use]
    pub fn calculate_best_node<'t>(
        &self,
        roots: &[Selection<'t>],
    ) -> (Option<NodeRef<'t>>, ScoreBoard<'t>) {
        let mut board = ScoreBoard::new();
        let candidates = self.nodes_to_check(roots);

        let mut nodes_with_text: Vec<NodeRef<'t>> = Vec::new();
        for node in &candidates {
            let stats = self.stop_words.stopword_count(&node_text(node));
            if stats.stop_word_count > 2 && !node_is_high_link_density(node) {
                nodes_with_text.push(*node);
            }
        }

        let nodes_number = nodes_with_text.len();
        let bottom_negativescore_nodes = nodes_number as f64 * 0.25;
        let mut starting_boost = 1.0_f64;

        for (i, node) in nodes_with_text.iter().enumerate() {
            let mut boost_score = 0.0_f64;
            if self.is_boostable(node) {
                boost_score = (1.0 / starting_boost) * 50.0;
                starting_boost += 1.0;
            }
            if nodes_number > 15 {
                let distance_from_end = (nodes_number - i) as f64;
                if distance_from_end <= bottom_negativescore_nodes {
                    let booster = bottom_negativescore_nodes - distance_from_end;
                    boost_score = -booster.powi(2);
                    if boost_score.abs() > 40.0 {
                        boost_score = 5.0;
                    }
                }
            }

            let stats = self.stop_words.stopword_count(&node_text(node));
            let upscore = (stats.stop_word_count as f64 + boost_score) as i64;

            if let Some(parent) = parent_element(node) {
                board.add_score(&parent, upscore);
                board.add_count(&parent, 1);
                board.record(&parent);
                if let Some(grandparent) = parent_element(&parent) {
                    board.add_count(&grandparent, 1);
                    board.add_score(&grandparent, upscore / 2);
                    board.record(&grandparent);
                }
            }
        }

        let mut top_node: Option<NodeRef<'t>> = None;
        let mut top_score = 0_i64;
        for parent in board.scored_parents() {
            let score = board.score(parent);
            if score > top_score {
                top_node = Some(*parent);
                top_score = score;
            }
            if top_node.is_none() {
                top_node = Some(*parent);
            }
        }
        (top_node, board)
    }

    /// Whether an early candidate deserves a boost.
    ///
    /// Looks back over preceding sibling paragraphs: a nearby one with
    /// real prose (more than five stopwords) confirms the candidate sits
    /// inside running text rather than under an image caption. Gives up
    /// after stepping past three weak paragraphs.
    fn is_boostable(&self, node: &NodeRef) -> bool {
        let mut steps_away = 0;
        for sibling in previous_element_siblings(node) {
            if node_tag(&sibling).as_deref() == Some("p") {
                if steps_away >= 3 {
                    return false;
                }
                let stats = self.stop_words.stopword_count(&node_text(&sibling));
                if stats.stop_word_count > 5 {
                    return true;
                }
                steps_away += 1;
            }
        }
        false
    }

    /// Average stopword score of the solid paragraphs inside the top node.
    ///
    /// Used as the admission baseline for sibling content; when the top
    /// node has no qualifying paragraphs the baseline is prohibitively
    /// high so nothing gets stitched in.
    #[must_use]
    pub fn siblings_baseline_score(&self, top: &Selection) -> i64 {
        let mut paragraphs_number = 0_i64;
        let mut paragraphs_score = 0_i64;
        for para in top.select("p").iter() {
            let stats = self.stop_words.stopword_count(&text_of(&para));
            if stats.stop_word_count > 2 && !is_high_link_density(&para) {
                paragraphs_number += 1;
                paragraphs_score += stats.stop_word_count as i64;
            }
        }
        if paragraphs_number > 0 {
            paragraphs_score / paragraphs_number
        } else {
            100_000
        }
    }

    /// Markup fragments a preceding sibling contributes to the article.
    ///
    /// A paragraph sibling with text is taken whole. Any other sibling
    /// donates the text of its paragraph descendants that clear 30% of
    /// the baseline score and are not link dense, each rewrapped as a
    /// fresh paragraph.
    fn sibling_content_html(&self, sibling: &NodeRef, baseline: i64) -> Vec<String> {
        if node_tag(sibling).as_deref() == Some("p") && !node_text(sibling).is_empty() {
            return vec![node_outer_html(sibling)];
        }
        let mut fragments = Vec::new();
        for para in Selection::from(*sibling).select("p").iter() {
            let text = text_of(&para);
            if text.is_empty() {
                continue;
            }
            let stats = self.stop_words.stopword_count(&text);
            let admission = baseline as f64 * 0.30;
            if admission < stats.stop_word_count as f64 && !is_high_link_density(&para) {
                fragments.push(format!("<p>{}</p>", escape_text(&text)));
            }
        }
        fragments
    }

    /// Stitch qualifying content from preceding siblings into the top
    /// node, preserving nearest-last ordering at the front.
    ///
    /// Skipped entirely when the top node matches a known article
    /// pattern. Rebuilds the top node's children, so any outstanding
    /// handles into its subtree must be resolved before calling this.
    pub fn stitch_siblings(&self, top: &Selection) {
        let Some(node) = top.nodes().first().copied() else {
            return;
        };
        if self.is_article_body(&node) {
            return;
        }
        let baseline = self.siblings_baseline_score(top);
        let mut front = String::new();
        for sibling in previous_element_siblings(&node) {
            for piece in self.sibling_content_html(&sibling, baseline) {
                front = piece + &front;
            }
        }
        if !front.is_empty() {
            let rebuilt = front + &inner_html(top);
            set_inner_html(top, &rebuilt);
        }
    }

    /// Remove non-content children of the top node.
    ///
    /// Paragraphs (and, per configuration, lists and headings) are
    /// exempt. Everything else is dropped when it is link dense, a table
    /// wrapper without substantial paragraphs, or scored under 8% of the
    /// top node's own score. Table cells are never dropped for score.
    pub fn post_cleanup(&self, top: &Selection, board: &ScoreBoard) {
        let mut exempt: Vec<&str> = vec!["p"];
        if self.config.parse_lists {
            exempt.extend(["ul", "ol"]);
        }
        if self.config.parse_headers {
            exempt.extend(["h1", "h2", "h3", "h4", "h5", "h6"]);
        }

        let Some(top_node) = top.nodes().first().copied() else {
            return;
        };
        let top_score = board.score(&top_node);

        let children: Vec<NodeRef> = child_nodes(&top_node)
            .into_iter()
            .filter(NodeRef::is_element)
            .collect();
        for child in &children {
            let tag = node_tag(child).unwrap_or_default();
            if exempt.contains(&tag.as_str()) {
                continue;
            }
            let sel = Selection::from(*child);
            if is_high_link_density(&sel)
                || self.is_table_with_no_paragraphs(&sel, &tag)
                || !self.score_threshold_met(board, top_score, child, &tag)
            {
                sel.remove();
            }
        }
    }

    /// Whether a block degenerates to a paragraph-free table wrapper.
    ///
    /// Destructive check: paragraphs under 25 characters are removed
    /// first, then the block fails if no paragraphs remain (cells pass
    /// regardless).
    fn is_table_with_no_paragraphs(&self, sel: &Selection, tag: &str) -> bool {
        let paras: Vec<NodeRef> = sel.select("p").nodes().to_vec();
        for para in paras.iter().rev() {
            if node_text(para).chars().count() < 25 {
                Selection::from(*para).remove();
            }
        }
        !sel.select("p").exists() && tag != "td"
    }

    fn score_threshold_met(
        &self,
        board: &ScoreBoard,
        top_score: i64,
        child: &NodeRef,
        tag: &str,
    ) -> bool {
        let threshold = top_score as f64 * 0.08;
        !((board.score(child) as f64) < threshold && tag != "td")
    }
}
