//! End-to-end content extraction over realistic pages.

use gander::{extract, Config, Crawler};

const PROSE: &str = "It was the best of times and it was also in some ways \
                     the worst of times for all of the people in the story.";

fn page(body: &str) -> String {
    format!("<html lang=\"en\"><head><title>Sample Story</title></head><body>{body}</body></html>")
}

#[test]
fn extracts_the_story_from_a_noisy_page() {
    let body = format!(
        r#"<div id="header"><a href="/">home</a> <a href="/world">world news</a> <a href="/sports">sports news</a></div>
        <div id="story">
            <p>{PROSE}</p>
            <p>{PROSE}</p>
            <p>{PROSE}</p>
        </div>
        <div id="comments"><p>First! Great article, loved every word of it honestly.</p></div>
        <div class="subscribe"><p>Sign up for our newsletter and never miss one of our stories.</p></div>"#
    );
    let article = extract(&page(&body)).unwrap();

    assert_eq!(article.title, "Sample Story");
    assert!(article.has_content());
    assert!(article.cleaned_text.contains("best of times"));
    assert!(!article.cleaned_text.contains("newsletter"));
    assert!(!article.cleaned_text.contains("Great article"));
    assert!(!article.cleaned_text.contains("world news"));
}

#[test]
fn link_dense_sections_inside_the_story_are_dropped() {
    let body = format!(
        r#"<div id="story">
            <p>{PROSE}</p>
            <p>{PROSE}</p>
            <div id="related">
                <a href="/a">another story you may like</a>
                <a href="/b">one more story to read</a>
                <a href="/c">a third story worth reading</a>
            </div>
        </div>"#
    );
    let article = extract(&page(&body)).unwrap();
    assert!(article.has_content());
    assert!(!article.cleaned_text.contains("story you may like"));
}

#[test]
fn known_container_confines_extraction() {
    let body = format!(
        r#"<div id="promo"><p>{PROSE} This promotion paragraph should stay out of it.</p></div>
        <article>
            <p>{PROSE}</p>
            <p>{PROSE}</p>
        </article>"#
    );
    let article = extract(&page(&body)).unwrap();
    assert!(article.has_content());
    assert!(!article.cleaned_text.contains("promotion paragraph"));
    assert_eq!(article.cleaned_text.matches("best of times").count(), 2);
}

#[test]
fn leading_sibling_paragraphs_are_stitched_in() {
    let body = format!(
        r#"<div id="lead"><p>{PROSE}</p></div>
        <div id="story">
            <p>{PROSE}</p>
            <p>{PROSE}</p>
            <p>{PROSE}</p>
        </div>"#
    );
    let article = extract(&page(&body)).unwrap();
    assert_eq!(article.cleaned_text.matches("best of times").count(), 4);
}

#[test]
fn long_documents_extract_deterministically() {
    let paragraphs: String = (0..20).map(|_| format!("<p>{PROSE}</p>")).collect();
    let html = page(&format!("<div id=\"story\">{paragraphs}</div>"));

    let first = extract(&html).unwrap();
    let second = extract(&html).unwrap();
    assert_eq!(first.cleaned_text, second.cleaned_text);
    assert_eq!(first.cleaned_text.matches("best of times").count(), 20);
}

#[test]
fn body_snapshots_bracket_the_cleanup() {
    let body = format!(
        r#"<div id="story">
            <p>{PROSE}</p>
            <p>{PROSE}</p>
            <div id="related">
                <a href="/a">another story you may like</a>
                <a href="/b">one more story to read</a>
                <a href="/c">a third story worth reading</a>
            </div>
        </div>"#
    );
    let article = extract(&page(&body)).unwrap();
    let raw = article.top_node_raw_html.unwrap();
    let cleaned = article.top_node_html.unwrap();
    assert!(raw.contains("story you may like"));
    assert!(!cleaned.contains("story you may like"));
    assert!(cleaned.contains("best of times"));
}

#[test]
fn comments_in_markup_never_leak_into_content() {
    let body = format!(
        r#"<div id="story">
            <!-- render: legacy-widget -->
            <p>{PROSE}</p>
            <p>{PROSE}</p>
        </div>"#
    );
    let article = extract(&page(&body)).unwrap();
    assert!(article.has_content());
    assert!(!article.cleaned_text.contains("legacy-widget"));
}

#[test]
fn unrecognizable_pages_yield_an_empty_article() {
    let article = extract(&page("<div><a href=\"/a\">just</a> <a href=\"/b\">links</a></div>"))
        .unwrap();
    assert!(!article.has_content());
    assert!(article.top_node_html.is_none());
    assert_eq!(article.title, "Sample Story");
}

#[test]
fn crawler_reports_source_identity() {
    let body = format!("<div><p>{PROSE}</p></div>");
    let html = page(&body);
    let config = Config::default();
    let crawler = Crawler::new(&config);
    let article = crawler
        .process(&html, Some("https://news.example.com/2023/story"))
        .unwrap();
    assert_eq!(article.final_url, "https://news.example.com/2023/story");
    assert_eq!(article.domain, "news.example.com");
    assert!(article.link_hash.contains('.'));
}
