use crate::value::Value;

/// Resolve a dot-delimited path against a document.
///
/// Each segment indexes into the current value when it is an object. A
/// missing segment, or a segment applied to a non-object, yields `None` —
/// a wrong guess at `--root` is an expected condition, never an error.
///
/// # Examples
///
/// ```
/// use jove::{navigate::navigate, parser::parse};
///
/// let doc = parse(r#"{"foo": {"bar": {"baz": 42}}}"#).unwrap().unwrap();
/// let inner = navigate(&doc, "foo.bar").unwrap();
/// assert_eq!(inner, &parse(r#"{"baz": 42}"#).unwrap().unwrap());
///
/// assert!(navigate(&doc, "foo.nope").is_none());
/// ```
pub fn navigate<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

#[test]
fn test_missing_segment_yields_none() {
    use indexmap::IndexMap;

    let mut obj = IndexMap::new();
    obj.insert("a".to_string(), Value::Integer(1));
    let doc = Value::Object(obj);

    assert_eq!(navigate(&doc, "a"), Some(&Value::Integer(1)));
    assert_eq!(navigate(&doc, "b"), None);
    assert_eq!(navigate(&doc, "a.b"), None);
}
