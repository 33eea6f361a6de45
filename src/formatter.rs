//! Output formatting.
//!
//! Turns the winning content node into plain article text: inline markup
//! is flattened, line breaks become explicit markers, weak leftover
//! blocks are swept out, and list items get bullets. The passes mutate
//! the node in place; the caller snapshots any markup it wants to keep
//! beforehand.

use dom_query::{NodeRef, Selection};

use crate::config::Config;
use crate::dom::{
    child_nodes, descendant_elements, inner_html, node_text, replace_with_html, set_inner_html,
    strip_tags,
};
use crate::extractor::ScoreBoard;
use crate::text::StopWords;

/// Line-break marker injected for `<br>`; a literal backslash-n pair, so
/// it survives whitespace normalization until the final text split.
const BREAK_MARKER: &str = r"\n";

/// Remove descendants of the top node that were scored below one.
///
/// Only nodes that actually received a score are considered; everything
/// else is left for the text passes to judge. Runs before any pass that
/// rebuilds the subtree, while node identities are still valid.
pub fn prune_scored_leftovers(top: &Selection, board: &ScoreBoard<'_>) {
    let nodes: Vec<NodeRef> = descendant_elements(top);
    for node in nodes.iter().rev() {
        if board.has_score(node) && board.score(node) < 1 {
            Selection::from(*node).remove();
        }
    }
}

/// Render the top node as plain article text.
pub fn render(top: &Selection, config: &Config, stop_words: &StopWords) -> String {
    if top.is_empty() {
        return String::new();
    }
    links_to_text(top);
    breaks_to_markers(top);
    flatten_inline_markup(top, config);
    remove_weak_blocks(top, stop_words);
    bullet_list_items(top);
    convert_to_text(top, config)
}

/// Anchors become their text.
fn links_to_text(top: &Selection) {
    strip_tags(top, &["a"]);
}

/// Replace each `<br>` with the literal break marker.
fn breaks_to_markers(top: &Selection) {
    let breaks: Vec<NodeRef> = top.select("br").nodes().to_vec();
    for node in breaks.iter().rev() {
        replace_with_html(&Selection::from(*node), BREAK_MARKER);
    }
}

/// Strip text-level wrappers; their content joins the parent.
///
/// With `keep_footnotes` the `sup` wrappers are unwrapped too, keeping
/// footnote markers inline; otherwise the markers stay wrapped and fall
/// to the weak-block sweep.
fn flatten_inline_markup(top: &Selection, config: &Config) {
    strip_tags(top, &["b", "strong", "i"]);
    if config.keep_footnotes {
        strip_tags(top, &["sup"]);
    }
}

/// Sweep out elements without enough stopwords to be prose.
///
/// Deepest elements go first, so a parent is judged on what remains of
/// it. Blocks hosting an `object` or `embed` descendant are kept, and a
/// surviving block that is nothing but a parenthetical is dropped too.
fn remove_weak_blocks(top: &Selection, stop_words: &StopWords) {
    let nodes: Vec<NodeRef> = descendant_elements(top);
    for node in nodes.iter().rev() {
        let text = node_text(node);
        let stats = stop_words.stopword_count(&text);
        let sel = Selection::from(*node);
        if stats.stop_word_count < 3
            && !sel.select("object").exists()
            && !sel.select("embed").exists()
        {
            sel.remove();
        } else if text.starts_with('(') && text.ends_with(')') {
            sel.remove();
        }
    }
}

/// Prefix every list item with a bullet.
fn bullet_list_items(top: &Selection) {
    let items: Vec<NodeRef> = top.select("li").nodes().to_vec();
    for node in items.iter().rev() {
        let sel = Selection::from(*node);
        let rebuilt = format!("\u{2022} {}", inner_html(&sel));
        set_inner_html(&sel, &rebuilt);
    }
}

/// Join the text of the top node's direct element children.
///
/// Each child contributes its normalized text, split on the break
/// markers; blocks are joined with blank lines. With list parsing on,
/// bullets are pulled onto their own lines (one per item when
/// `pretty_lists`, plain lines otherwise).
fn convert_to_text(top: &Selection, config: &Config) -> String {
    let mut pieces: Vec<String> = Vec::new();
    if let Some(top_node) = top.nodes().first() {
        for child in child_nodes(top_node) {
            if !child.is_element() {
                continue;
            }
            let text = node_text(&child);
            if text.is_empty() {
                continue;
            }
            pieces.extend(text.split(BREAK_MARKER).map(str::to_string));
        }
    }
    let text = pieces.join("\n\n");

    if config.parse_lists {
        let segments: Vec<String> = text
            .replace("\n\u{2022}", "\u{2022}")
            .split("\u{2022} ")
            .map(|segment| segment.trim().to_string())
            .collect();
        if config.pretty_lists {
            segments.join("\n\u{2022} ")
        } else {
            segments.join("\n")
        }
    } else {
        text
    }
}
