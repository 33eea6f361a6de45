//! Media found inside the article body: links, tweets, video embeds.

use std::collections::HashSet;

use dom_query::{NodeRef, Selection};
use regex::Regex;
use std::sync::LazyLock;

use crate::article::Video;
use crate::dom::{node_attribute, node_key, node_outer_html, node_tag, NodeKey};

/// Hosting providers recognized in embed sources.
const VIDEO_PROVIDERS: [&str; 4] = ["youtube", "vimeo", "dailymotion", "kewego"];

#[allow(clippy::expect_used)]
static TWITTER_TWEET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)twitter-tweet").expect("valid regex"));

#[allow(clippy::expect_used)]
static PARAM_MOVIE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)movie").expect("valid regex"));

/// All outbound link targets in the article body, document order.
#[must_use]
pub fn extract_links(top: &Selection) -> Vec<String> {
    top.select("a[href]")
        .nodes()
        .iter()
        .filter_map(|node| node_attribute(node, "href"))
        .collect()
}

/// Serialized markup of embedded tweets in the article body.
#[must_use]
pub fn extract_tweets(top: &Selection) -> Vec<String> {
    top.select("blockquote[class]")
        .nodes()
        .iter()
        .filter(|node| {
            node_attribute(node, "class").is_some_and(|class| TWITTER_TWEET_RE.is_match(&class))
        })
        .map(node_outer_html)
        .collect()
}

/// Video embeds in the article body whose source names a known provider.
///
/// An `embed` nested in an `object` is folded into the object's record
/// (the object's `param[name=movie]` carries the real source) and not
/// reported twice.
#[must_use]
pub fn extract_videos(top: &Selection) -> Vec<Video> {
    let candidates: Vec<NodeRef> = top.select("iframe, embed, object, video").nodes().to_vec();
    let mut consumed: HashSet<NodeKey> = HashSet::new();
    let mut movies = Vec::new();

    for node in &candidates {
        if consumed.contains(&node_key(node)) {
            continue;
        }
        let Some(tag) = node_tag(node) else {
            continue;
        };
        let movie = match tag.as_str() {
            "iframe" => Some(video_from(node)),
            "embed" => {
                let parent_is_object = node
                    .parent()
                    .and_then(|p| node_tag(&p))
                    .as_deref()
                    == Some("object");
                if parent_is_object {
                    object_video(node, &mut consumed)
                } else {
                    Some(video_from(node))
                }
            }
            "object" => object_video(node, &mut consumed),
            _ => None,
        };
        if let Some(movie) = movie {
            if movie.provider.is_some() {
                movies.push(movie);
            }
        }
    }
    movies
}

fn video_from(node: &NodeRef) -> Video {
    let embed_code: String = node_outer_html(node)
        .lines()
        .map(str::trim)
        .collect();
    let src = node_attribute(node, "src");
    Video {
        embed_type: node_tag(node),
        provider: src.as_deref().and_then(provider_for),
        width: node_attribute(node, "width"),
        height: node_attribute(node, "height"),
        embed_code: Some(embed_code),
        src,
    }
}

fn object_video(node: &NodeRef, consumed: &mut HashSet<NodeKey>) -> Option<Video> {
    let sel = Selection::from(*node);
    if let Some(embed) = sel.select("embed").nodes().first() {
        consumed.insert(node_key(embed));
    }

    let src = sel
        .select("param[name]")
        .nodes()
        .iter()
        .find(|param| {
            node_attribute(param, "name").is_some_and(|name| PARAM_MOVIE_RE.is_match(&name))
        })
        .and_then(|param| node_attribute(param, "value"))?;
    let provider = provider_for(&src)?;

    let mut movie = video_from(node);
    movie.provider = Some(provider);
    movie.src = Some(src);
    Some(movie)
}

fn provider_for(src: &str) -> Option<String> {
    VIDEO_PROVIDERS
        .iter()
        .find(|provider| src.contains(*provider))
        .map(|provider| (*provider).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse;

    #[test]
    fn links_collects_hrefs_in_order() {
        let doc = parse(r#"<div id=t><a href="/a">a</a><a>no href</a><a href="/b">b</a></div>"#);
        assert_eq!(extract_links(&doc.select("#t")), vec!["/a", "/b"]);
    }

    #[test]
    fn tweets_match_the_class_anywhere() {
        let doc = parse(
            r#"<div id=t><blockquote class="twitter-tweet extra"><p>hi</p></blockquote>
               <blockquote class="quote">not a tweet</blockquote></div>"#,
        );
        let tweets = extract_tweets(&doc.select("#t"));
        assert_eq!(tweets.len(), 1);
        assert!(tweets[0].contains("twitter-tweet"));
    }

    #[test]
    fn iframe_embeds_with_known_providers_are_found() {
        let doc = parse(
            r#"<div id=t>
               <iframe src="https://www.youtube.com/embed/xyz" width="560" height="315"></iframe>
               <iframe src="https://maps.example.com/embed"></iframe></div>"#,
        );
        let movies = extract_videos(&doc.select("#t"));
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].provider.as_deref(), Some("youtube"));
        assert_eq!(movies[0].embed_type.as_deref(), Some("iframe"));
        assert_eq!(movies[0].width.as_deref(), Some("560"));
    }

    #[test]
    fn object_param_carries_the_source() {
        let doc = parse(
            r#"<div id=t><object width="640">
               <param name="movie" value="https://vimeo.com/moogaloop.swf?clip=1">
               <embed src="https://vimeo.com/moogaloop.swf?clip=1"></embed>
               </object></div>"#,
        );
        let movies = extract_videos(&doc.select("#t"));
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].provider.as_deref(), Some("vimeo"));
        assert_eq!(movies[0].embed_type.as_deref(), Some("object"));
        assert!(movies[0].src.as_deref().unwrap().contains("vimeo"));
    }

    #[test]
    fn object_without_movie_param_is_ignored() {
        let doc = parse(
            r#"<div id=t><object><param name="flashvars" value="x"></object></div>"#,
        );
        assert!(extract_videos(&doc.select("#t")).is_empty());
    }

    #[test]
    fn standalone_embed_counts_once() {
        let doc = parse(
            r#"<div id=t><embed src="https://www.dailymotion.com/swf/abc"></embed></div>"#,
        );
        let movies = extract_videos(&doc.select("#t"));
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].provider.as_deref(), Some("dailymotion"));
    }
}
