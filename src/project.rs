use indexmap::IndexMap;

use crate::value::Value;

/// Reduce each element of a sequence to the requested keys.
///
/// Output objects carry the requested keys in request order; requested keys
/// absent from an element are omitted, never defaulted to null. Elements
/// that are not objects project to an empty object.
///
/// # Examples
///
/// ```
/// use jove::{parser::parse, project::project, Value};
///
/// let doc = parse(r#"{"rows": [{"id": 1, "title": "a", "extra": "x"}]}"#)
///     .unwrap()
///     .unwrap();
/// let Some(Value::Array(items)) = doc.get("rows").cloned() else {
///     unreachable!();
/// };
///
/// let projected = project(items, &["id", "title"]);
/// let Value::Object(row) = &projected[0] else { unreachable!() };
/// assert!(row.contains_key("id") && row.contains_key("title"));
/// assert!(!row.contains_key("extra"));
/// ```
pub fn project(items: Vec<Value>, fields: &[&str]) -> Vec<Value> {
    items.into_iter().map(|item| pick(item, fields)).collect()
}

fn pick(item: Value, fields: &[&str]) -> Value {
    let mut picked = IndexMap::new();

    if let Value::Object(mut obj) = item {
        for field in fields {
            if let Some(value) = obj.swap_remove(*field) {
                picked.insert(field.to_string(), value);
            }
        }
    }

    Value::Object(picked)
}

#[test]
fn test_pick_follows_request_order() {
    use crate::parser::parse;

    let item = parse(r#"{"title": "a", "extra": "x", "id": 1}"#)
        .unwrap()
        .unwrap();
    let picked = pick(item, &["id", "title"]);

    let Value::Object(obj) = picked else {
        panic!("expected object");
    };
    let keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["id", "title"]);
}

#[test]
fn test_missing_fields_are_omitted() {
    use crate::parser::parse;

    let item = parse(r#"{"id": 1}"#).unwrap().unwrap();
    let picked = pick(item, &["id", "nope"]);

    let Value::Object(obj) = picked else {
        panic!("expected object");
    };
    assert_eq!(obj.len(), 1);
    assert!(!obj.contains_key("nope"));
}
