//! Schema.org JSON-LD extraction.

use dom_query::Document;
use serde_json::Value;

/// Article-like schema types worth returning, in no particular order.
const KNOWN_SCHEMA_TYPES: [&str; 3] = ["ReportageNewsArticle", "NewsArticle", "Article"];

/// Find the first JSON-LD object describing an article.
///
/// Scans `script[type="application/ld+json"]` blocks, keeps objects whose
/// `@context` is schema.org (either scheme), flattens `@graph` wrappers
/// and top-level arrays, and returns the first candidate with a known
/// article `@type`. Malformed JSON blocks are skipped silently.
#[must_use]
pub fn extract_schema(doc: &Document) -> Option<Value> {
    let mut candidates: Vec<Value> = Vec::new();
    for script in doc.select(r#"script[type="application/ld+json"]"#).iter() {
        let raw = script.text();
        let Ok(content) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        match content {
            Value::Array(items) => {
                candidates.extend(items.into_iter().filter(has_schema_context));
            }
            object @ Value::Object(_) => {
                if !has_schema_context(&object) {
                    continue;
                }
                if let Some(Value::Array(graph)) = object.get("@graph") {
                    candidates.extend(graph.clone());
                } else {
                    candidates.push(object);
                }
            }
            _ => {}
        }
    }

    candidates.into_iter().find(|item| {
        item.get("@type")
            .and_then(Value::as_str)
            .is_some_and(|t| KNOWN_SCHEMA_TYPES.contains(&t))
    })
}

fn has_schema_context(value: &Value) -> bool {
    value
        .get("@context")
        .and_then(Value::as_str)
        .is_some_and(|c| c == "https://schema.org" || c == "http://schema.org")
}
