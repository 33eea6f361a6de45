//! Metadata extraction over full pages: title chain, dates, authors,
//! OpenGraph, schema.org, and link facts.

use gander::{extract, Config, Crawler};

const PROSE: &str = "It was the best of times and it was also in some ways \
                     the worst of times for all of the people in the story.";

fn page(head: &str, body: &str) -> String {
    format!("<html lang=\"en\"><head>{head}</head><body>{body}</body></html>")
}

fn story_body() -> String {
    format!("<div id=\"story\"><p>{PROSE}</p><p>{PROSE}</p></div>")
}

#[test]
fn opengraph_drives_title_and_publish_date() {
    let head = r#"<title>ignored</title>
        <meta property="og:title" content="Big Win | Daily Planet">
        <meta property="og:site_name" content="Daily Planet">
        <meta property="og:type" content="article">
        <meta property="article:published_time" content="2023-05-04T10:00:00+02:00">"#;
    let article = extract(&page(head, &story_body())).unwrap();

    assert_eq!(article.title, "Big Win");
    assert_eq!(article.opengraph["site_name"], vec!["Daily Planet"]);
    assert_eq!(article.opengraph["type"], vec!["article"]);
    assert_eq!(article.publish_date.as_deref(), Some("2023-05-04T10:00:00+02:00"));
    let utc = article.publish_datetime_utc.unwrap();
    assert_eq!(utc.to_rfc3339(), "2023-05-04T08:00:00+00:00");
}

#[test]
fn schema_org_fills_in_when_opengraph_is_absent() {
    let head = r#"<script type="application/ld+json">
        {
            "@context": "https://schema.org",
            "@type": "NewsArticle",
            "headline": "Quiet Day Downtown",
            "datePublished": "2022-11-02T09:00:00Z",
            "author": {"@type": "Person", "name": "Jordan Reyes"},
            "publisher": {"@type": "Organization", "name": "Daily Planet"}
        }
        </script>"#;
    let article = extract(&page(head, &story_body())).unwrap();

    assert_eq!(article.title, "Quiet Day Downtown");
    assert_eq!(article.authors, vec!["Jordan Reyes"]);
    assert_eq!(article.publish_date.as_deref(), Some("2022-11-02T09:00:00Z"));
    let schema = article.schema.unwrap();
    assert_eq!(schema["@type"], "NewsArticle");
    assert_eq!(schema["publisher"]["name"], "Daily Planet");
}

#[test]
fn non_article_schema_types_are_ignored() {
    let head = r#"<script type="application/ld+json">
        {"@context": "https://schema.org", "@type": "Recipe", "name": "Soup"}
        </script>"#;
    let article = extract(&page(head, &story_body())).unwrap();
    assert!(article.schema.is_none());
}

#[test]
fn canonical_links_resolve_against_the_final_url() {
    let head = r#"<link rel="canonical" href="/2023/story">
        <link rel="shortcut icon" href="/favicon.ico">"#;
    let html = page(head, &story_body());
    let config = Config::default();
    let article = Crawler::new(&config)
        .process(&html, Some("https://news.example.com/some/deep/path"))
        .unwrap();

    assert_eq!(article.canonical_link, "https://news.example.com/2023/story");
    assert_eq!(article.meta_favicon, "/favicon.ico");
    assert_eq!(article.domain, "news.example.com");
}

#[test]
fn description_keywords_language_and_encoding() {
    let head = r#"<meta charset="utf-8">
        <meta name="description" content="A short account of the day.">
        <meta name="keywords" content="news, day, town">"#;
    let article = extract(&page(head, &story_body())).unwrap();

    assert_eq!(article.meta_description, "A short account of the day.");
    assert_eq!(article.meta_keywords, "news, day, town");
    assert_eq!(article.meta_lang.as_deref(), Some("en"));
    assert_eq!(article.meta_encoding.as_deref(), Some("utf-8"));
}

#[test]
fn tag_links_are_harvested_in_order() {
    let body = format!(
        r#"{}<div class="taglist">
            <a rel="tag" href="/t/politics">politics</a>
            <a rel="tag" href="/t/economy">economy</a>
            <a rel="tag" href="/t/politics">politics</a>
        </div>"#,
        story_body()
    );
    let article = extract(&page("", &body)).unwrap();
    assert_eq!(article.tags, vec!["politics", "economy"]);
}

#[test]
fn authors_come_from_byline_patterns_without_schema() {
    let body = format!(
        r#"<span itemprop="author">By <span itemprop="name">Sam Okafor</span></span>{}"#,
        story_body()
    );
    let article = extract(&page("", &body)).unwrap();
    assert_eq!(article.authors, vec!["Sam Okafor"]);
}

#[test]
fn final_url_prefers_the_page_declared_address() {
    let head = r#"<meta property="og:url" content="https://example.com/real-address">"#;
    let article = extract(&page(head, &story_body())).unwrap();
    assert_eq!(article.final_url, "https://example.com/real-address");
    assert_eq!(article.domain, "example.com");
}

#[test]
fn tweets_and_videos_are_scoped_to_the_article_body() {
    let body = format!(
        r#"<div id="story">
            <p>{PROSE}</p>
            <p>{PROSE}</p>
            <blockquote class="twitter-tweet"><p>quoted post</p></blockquote>
            <iframe src="https://www.youtube.com/embed/abc" width="560" height="315"></iframe>
        </div>
        <blockquote class="twitter-tweet"><p>outside the body</p></blockquote>"#
    );
    let article = extract(&page("", &body)).unwrap();
    assert_eq!(article.tweets.len(), 1);
    assert!(article.tweets[0].contains("quoted post"));
    assert_eq!(article.movies.len(), 1);
    assert_eq!(article.movies[0].provider.as_deref(), Some("youtube"));
}
