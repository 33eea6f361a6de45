//! Metadata extraction.
//!
//! Pulls everything knowable about the page without touching the article
//! body: OpenGraph properties, schema.org JSON-LD, plain meta tags, the
//! title, authors, tags, and the publish date. Media extraction (links,
//! tweets, video embeds) runs against the chosen article node instead.

pub mod dom_extraction;
pub mod json_ld;
pub mod media;
pub mod meta_tags;
pub mod opengraph;

pub use dom_extraction::{
    extract_authors, extract_publish_date, extract_tags, extract_title, extract_top_image,
    publish_date_to_utc,
};
pub use json_ld::extract_schema;
pub use media::{extract_links, extract_tweets, extract_videos};
pub use meta_tags::{encoding_from_content, extract_metas, PageMetas};
pub use opengraph::extract_opengraph;
