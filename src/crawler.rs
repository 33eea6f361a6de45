//! Pipeline orchestration.
//!
//! One `process` call runs the whole show: metadata first (it reads the
//! pristine tree), then cleaning and scoring over disposable copies,
//! then body-level media extraction, cleanup, and text rendering. A page
//! without a recognizable article body yields an empty `Article`, not an
//! error.

use dom_query::{Document, Selection};
use log::debug;

use crate::article::Article;
use crate::cleaner;
use crate::config::Config;
use crate::dom::{clone_document, clone_subtree, outer_html, parse, strip_comments};
use crate::error::{Error, Result};
use crate::extractor::ContentExtractor;
use crate::formatter;
use crate::metadata::{
    extract_authors, extract_links, extract_metas, extract_opengraph, extract_publish_date,
    extract_schema, extract_tags, extract_title, extract_top_image, extract_tweets,
    extract_videos, publish_date_to_utc,
};
use crate::network::{link_hash, prepare_url};

/// Runs the extraction pipeline over one document.
pub struct Crawler<'a> {
    config: &'a Config,
}

impl<'a> Crawler<'a> {
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Extract an article from raw markup.
    ///
    /// `url` is the address the markup came from, when known; it seeds
    /// the final URL, the source hash, and domain-gated patterns. Without
    /// one, the page's own OpenGraph or schema.org URL fills in.
    pub fn process(&self, raw_html: &str, url: Option<&str>) -> Result<Article> {
        if raw_html.trim().is_empty() {
            return Err(Error::Parse("empty document".to_string()));
        }

        let source_url = url.map(prepare_url).unwrap_or_default();
        let stripped = strip_comments(raw_html);
        let doc = parse(&stripped);

        let mut article = Article {
            final_url: source_url.clone(),
            link_hash: if source_url.is_empty() {
                link_hash(raw_html.as_bytes())
            } else {
                link_hash(source_url.as_bytes())
            },
            raw_html: raw_html.to_string(),
            ..Article::default()
        };

        article.opengraph = extract_opengraph(&doc);
        article.schema = extract_schema(&doc);
        if article.final_url.is_empty() {
            article.final_url = self.page_declared_url(&article).unwrap_or_default();
        }

        let metas = extract_metas(&doc, &article.final_url, raw_html);
        article.meta_description = metas.description;
        article.meta_keywords = metas.keywords;
        article.meta_lang = metas.lang;
        article.meta_favicon = metas.favicon;
        article.meta_encoding = metas.encoding;
        article.canonical_link = metas.canonical;
        article.domain = metas.domain;

        article.publish_date = extract_publish_date(
            &doc,
            &article.opengraph,
            article.schema.as_ref(),
            &self.config.known_publish_date_tags,
            &article.domain,
        );
        article.publish_datetime_utc =
            article.publish_date.as_deref().and_then(publish_date_to_utc);
        article.tags = extract_tags(&doc);
        article.authors =
            extract_authors(&doc, article.schema.as_ref(), &self.config.known_author_patterns);
        article.title =
            extract_title(&doc, &article.opengraph, article.schema.as_ref(), &article.domain);
        article.top_image = extract_top_image(&doc, &article.opengraph, article.schema.as_ref());

        let language = self.content_language(&article);
        let stop_words = self.config.stop_words(&language);
        let extractor = ContentExtractor::new(self.config, &stop_words, &article.domain);

        // Scoring runs over cleaned copies; the original tree stays
        // intact for anything metadata-shaped that already ran above.
        let known = extractor.known_article_nodes(&doc);
        debug!("known article containers: {}", known.len());
        let candidate_docs: Vec<Document> = if known.is_empty() {
            vec![clone_document(&doc)]
        } else {
            known
                .iter()
                .map(|node| clone_subtree(&Selection::from(*node)))
                .collect()
        };
        for candidate in &candidate_docs {
            cleaner::clean(candidate);
        }
        let roots: Vec<Selection> = candidate_docs.iter().map(|d| d.select("html")).collect();

        let (mut top, mut board) = extractor.calculate_best_node(&roots);
        if top.is_none() && !known.is_empty() {
            // The retry runs on the tree as parsed, not a cleaned copy;
            // cleaning may have dropped the only block holding the story.
            debug!("known containers held no content, rescoring the full page");
            let retry_roots = vec![doc.select("html")];
            let (retry_top, retry_board) = extractor.calculate_best_node(&retry_roots);
            top = retry_top;
            board = retry_board;
        }

        if let Some(top_node) = top {
            let top_sel = Selection::from(top_node);
            article.links = extract_links(&top_sel);
            article.tweets = extract_tweets(&top_sel);
            article.movies = extract_videos(&top_sel);
            article.top_node_raw_html = Some(outer_html(&top_sel).to_string());

            extractor.post_cleanup(&top_sel, &board);
            formatter::prune_scored_leftovers(&top_sel, &board);
            extractor.stitch_siblings(&top_sel);
            article.top_node_html = Some(outer_html(&top_sel).to_string());
            article.cleaned_text = formatter::render(&top_sel, self.config, &stop_words);
        } else {
            debug!("no article body found for {}", article.final_url);
        }

        Ok(article)
    }

    /// URL the page declares about itself, OpenGraph first.
    fn page_declared_url(&self, article: &Article) -> Option<String> {
        if let Some(og_url) = article.opengraph.get("url").and_then(|v| v.first()) {
            return Some(og_url.clone());
        }
        article
            .schema
            .as_ref()
            .and_then(|schema| schema.get("url"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    }

    /// Language the stopword counting runs in.
    fn content_language(&self, article: &Article) -> String {
        if self.config.use_meta_language {
            if let Some(lang) = &article.meta_lang {
                return lang.clone();
            }
        }
        self.config.target_language.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROSE: &str = "It was the best of times and it was also in some ways \
                         the worst of times for all of the people in the story.";

    fn page(body: &str, head: &str) -> String {
        format!("<html lang=\"en\"><head><title>T</title>{head}</head><body>{body}</body></html>")
    }

    #[test]
    fn empty_input_is_an_error() {
        let config = Config::default();
        let crawler = Crawler::new(&config);
        assert!(matches!(crawler.process("   ", None), Err(Error::Parse(_))));
    }

    #[test]
    fn extracts_body_text_and_metadata_together() {
        let head = r#"<meta property="og:title" content="Big Story">
                      <meta name="description" content="About things">"#;
        let body = format!(
            "<div id=\"nav\"><a href=\"/a\">home</a></div>\
             <div id=\"story\"><p>{PROSE}</p><p>{PROSE}</p><p>{PROSE}</p></div>"
        );
        let html = page(&body, head);
        let config = Config::default();
        let crawler = Crawler::new(&config);
        let article = crawler.process(&html, Some("https://news.example.com/story")).unwrap();

        assert_eq!(article.title, "Big Story");
        assert_eq!(article.meta_description, "About things");
        assert_eq!(article.domain, "news.example.com");
        assert_eq!(article.meta_lang.as_deref(), Some("en"));
        assert!(article.has_content());
        assert!(article.cleaned_text.contains("best of times"));
        assert!(article.top_node_html.is_some());
        assert!(article.top_node_raw_html.is_some());
    }

    #[test]
    fn page_without_content_yields_empty_article() {
        let html = page("<div><a href=\"/a\">one</a> <a href=\"/b\">two</a></div>", "");
        let config = Config::default();
        let crawler = Crawler::new(&config);
        let article = crawler.process(&html, None).unwrap();
        assert!(!article.has_content());
        assert!(article.top_node_html.is_none());
    }

    #[test]
    fn known_container_wins_over_heuristics() {
        let body = format!(
            "<div id=\"noise\"><p>{PROSE}</p></div>\
             <article><p>{PROSE}</p><p>{PROSE}</p></article>"
        );
        let html = page(&body, "");
        let config = Config::default();
        let crawler = Crawler::new(&config);
        let article = crawler.process(&html, None).unwrap();
        assert!(article.has_content());
        assert!(!article.cleaned_text.is_empty());
    }

    #[test]
    fn retry_scores_the_page_as_parsed() {
        // An empty known container triggers the rescore, which must run
        // on the uncleaned tree: cleaning strips the commentary block
        // that holds the only prose here.
        let body = format!(
            "<article></article>\
             <div class=\"comment\"><p>{PROSE}</p><p>{PROSE}</p></div>"
        );
        let html = page(&body, "");
        let config = Config::default();
        let crawler = Crawler::new(&config);
        let article = crawler.process(&html, None).unwrap();
        assert!(article.has_content());
        assert!(article.cleaned_text.contains("best of times"));
    }

    #[test]
    fn source_markup_is_kept_on_the_article() {
        let body = format!("<div><p>{PROSE}</p></div>");
        let html = page(&body, "");
        let config = Config::default();
        let crawler = Crawler::new(&config);
        let article = crawler.process(&html, None).unwrap();
        assert_eq!(article.raw_html, html);
    }

    #[test]
    fn top_image_comes_from_opengraph() {
        let head = r#"<meta property="og:image" content="https://example.com/lead.jpg">"#;
        let body = format!("<div><p>{PROSE}</p></div>");
        let html = page(&body, head);
        let config = Config::default();
        let crawler = Crawler::new(&config);
        let article = crawler.process(&html, None).unwrap();
        assert_eq!(article.top_image.as_deref(), Some("https://example.com/lead.jpg"));
    }

    #[test]
    fn final_url_falls_back_to_opengraph() {
        let head = r#"<meta property="og:url" content="https://example.com/canonical">"#;
        let body = format!("<div><p>{PROSE}</p></div>");
        let html = page(&body, head);
        let config = Config::default();
        let crawler = Crawler::new(&config);
        let article = crawler.process(&html, None).unwrap();
        assert_eq!(article.final_url, "https://example.com/canonical");
        assert_eq!(article.domain, "example.com");
    }

    #[test]
    fn shebang_url_is_rewritten_before_hashing() {
        let body = format!("<div><p>{PROSE}</p></div>");
        let html = page(&body, "");
        let config = Config::default();
        let crawler = Crawler::new(&config);
        let article = crawler
            .process(&html, Some("https://example.com/#!/story"))
            .unwrap();
        assert_eq!(article.final_url, "https://example.com/?_escaped_fragment_=/story");
    }

    #[test]
    fn media_is_collected_from_the_body() {
        let body = format!(
            "<div id=\"story\"><p>{PROSE}</p><p>{PROSE}</p>\
             <p><a href=\"https://example.com/ref\">{PROSE}</a></p>\
             <iframe src=\"https://www.youtube.com/embed/x\"></iframe></div>"
        );
        let html = page(&body, "");
        let config = Config::default();
        let crawler = Crawler::new(&config);
        let article = crawler.process(&html, None).unwrap();
        assert_eq!(article.links, vec!["https://example.com/ref"]);
        assert_eq!(article.movies.len(), 1);
        assert_eq!(article.movies[0].provider.as_deref(), Some("youtube"));
    }

    #[test]
    fn publish_date_reaches_utc_normalization() {
        let head = r#"<meta property="article:published_time" content="2023-05-04T10:00:00+02:00">"#;
        let body = format!("<div><p>{PROSE}</p></div>");
        let html = page(&body, head);
        let config = Config::default();
        let crawler = Crawler::new(&config);
        let article = crawler.process(&html, None).unwrap();
        assert_eq!(article.publish_date.as_deref(), Some("2023-05-04T10:00:00+02:00"));
        let utc = article.publish_datetime_utc.unwrap();
        assert_eq!(utc.to_rfc3339(), "2023-05-04T08:00:00+00:00");
    }
}
