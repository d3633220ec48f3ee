use serde_json::Value;

/// Stringifies a JSON leaf value. Containers and nulls are not leaves and
/// resolve to empty.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Walks `path` key by key through nested JSON mappings.
///
/// Any traversal failure (absent key, non-mapping value midway, null leaf)
/// resolves to an empty string instead of an error. This is the single safe
/// lookup primitive all field extraction goes through.
pub fn safe_get(record: &Value, path: &[&str]) -> String {
    let mut current = record;
    for key in path {
        match current.get(key) {
            Some(next) => current = next,
            None => return String::new(),
        }
    }
    value_to_text(current)
}

/// Resolves a locale-keyed leaf (e.g. `title.{ru,en}`) under `path` to the
/// given locale. A missing locale key yields empty, not a fallback locale.
pub fn locale_get(record: &Value, path: &[&str], locale: &str) -> String {
    let mut full: Vec<&str> = path.to_vec();
    full.push(locale);
    safe_get(record, &full)
}
