//! OpenGraph property harvesting.

use std::collections::{BTreeSet, HashMap};

use dom_query::Document;

/// Collect OpenGraph properties from the document's meta tags.
///
/// Keys lose their `og:` prefix; repeated properties accumulate in
/// document order. When the page declares an `og:type`, properties
/// prefixed with that type (like `article:published_time`) are collected
/// under their full name. Multiple distinct types collapse into a sorted
/// `types` entry instead of `type`.
#[must_use]
pub fn extract_opengraph(doc: &Document) -> HashMap<String, Vec<String>> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut og_types: BTreeSet<String> = BTreeSet::new();

    for meta in doc.select("meta").iter() {
        let (Some(property), Some(content)) = (meta.attr("property"), meta.attr("content"))
        else {
            continue;
        };
        if property.is_empty() || content.is_empty() {
            continue;
        }
        if property.as_ref() == "og:type" {
            og_types.insert(content.to_string());
        }
        pairs.push((property.to_string(), content.to_string()));
    }

    let mut graph: HashMap<String, Vec<String>> = HashMap::new();
    for (property, content) in pairs {
        if let Some(key) = property.strip_prefix("og:") {
            graph.entry(key.to_string()).or_default().push(content);
        } else if og_types.iter().any(|t| property.starts_with(t.as_str())) {
            graph.entry(property).or_default().push(content);
        }
    }

    if og_types.len() > 1 {
        graph.remove("type");
        graph.insert("types".to_string(), og_types.into_iter().collect());
    } else if let Some(only) = og_types.into_iter().next() {
        graph.insert("type".to_string(), vec![only]);
    }

    graph
}
