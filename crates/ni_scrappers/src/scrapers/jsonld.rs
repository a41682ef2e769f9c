use scraper::{Html, Selector};
use serde_json::Value;

/// Collects every JSON-LD object in the document, flattening top-level
/// arrays and `@graph` containers.
pub fn json_ld_objects(document: &Html) -> Vec<Value> {
    let mut objects = Vec::new();

    if let Ok(script_selector) = Selector::parse("script[type='application/ld+json']") {
        for script in document.select(&script_selector) {
            if let Ok(json) = serde_json::from_str::<Value>(script.text().collect::<String>().trim()) {
                flatten_into(json, &mut objects);
            }
        }
    }

    objects
}

fn flatten_into(value: Value, objects: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_into(item, objects);
            }
        }
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_into(graph, objects);
            }
            if !map.is_empty() {
                objects.push(Value::Object(map));
            }
        }
        _ => {}
    }
}

/// Extracts authors from JSON-LD metadata in the HTML document.
/// Returns a vector of author names.
pub fn extract_authors(document: &Html) -> Vec<String> {
    let mut authors = Vec::new();

    for json in json_ld_objects(document) {
        if let Some(author) = json.get("author") {
            push_author_names(author, &mut authors);
        }
    }

    authors
}

fn push_author_names(author: &Value, authors: &mut Vec<String>) {
    match author {
        Value::Array(arr) => {
            for author_obj in arr {
                push_author_names(author_obj, authors);
            }
        }
        Value::Object(obj) => {
            if let Some(name) = obj.get("name").and_then(|n| n.as_str()) {
                authors.push(name.trim().to_string());
            }
        }
        Value::String(s) => {
            authors.push(s.trim().to_string());
        }
        _ => {}
    }
}

/// First `datePublished` found in the JSON-LD metadata, unparsed
pub fn extract_date_published(document: &Html) -> Option<String> {
    json_ld_objects(document)
        .iter()
        .filter_map(|json| json.get("datePublished").and_then(|d| d.as_str()))
        .map(|d| d.trim().to_string())
        .find(|d| !d.is_empty())
}
