use jove::query::{parse_relaxed, Query, QueryError};
use jove::Value;

fn doc(text: &str) -> Value {
    jove::parser::parse(text).unwrap().unwrap()
}

fn items(text: &str) -> Vec<Value> {
    match doc(text) {
        Value::Array(items) => items,
        other => panic!("fixture is not an array: {:?}", other),
    }
}

#[test]
fn relaxed_and_strict_forms_parse_alike() {
    let relaxed = parse_relaxed("id:199356,status:published").unwrap();
    let strict = parse_relaxed(r#"{"id": 199356, "status": "published"}"#).unwrap();
    assert_eq!(relaxed, strict);
}

#[test]
fn relaxed_form_accepts_nested_objects_and_arrays() {
    let relaxed = parse_relaxed("properties:{kiosk_type:Article},id:{$in:[1,2]}").unwrap();
    let strict =
        parse_relaxed(r#"{"properties": {"kiosk_type": "Article"}, "id": {"$in": [1, 2]}}"#)
            .unwrap();
    assert_eq!(relaxed, strict);
}

#[test]
fn relaxed_form_accepts_scalar_literals() {
    let parsed = parse_relaxed("a:true,b:false,c:null,d:1.5,e:-3").unwrap();
    let strict =
        parse_relaxed(r#"{"a": true, "b": false, "c": null, "d": 1.5, "e": -3}"#).unwrap();
    assert_eq!(parsed, strict);
}

#[test]
fn digit_leading_bare_values_match_as_strings() {
    let q = Query::compile("date:2023-01-01").unwrap();
    assert!(q.matches(&doc(r#"{"date": "2023-01-01"}"#)));
    assert!(!q.matches(&doc(r#"{"date": "2023-01-02"}"#)));

    let q = Query::compile("version:1.2.3").unwrap();
    assert!(q.matches(&doc(r#"{"version": "1.2.3"}"#)));
}

#[test]
fn unterminated_string_is_an_error() {
    assert_eq!(
        Query::compile("author:'Piet").unwrap_err(),
        QueryError::UnterminatedString
    );
}

#[test]
fn dangling_pair_is_an_error() {
    assert!(Query::compile("id:").is_err());
    assert!(Query::compile("id").is_err());
    assert!(Query::compile("{id:1").is_err());
}

#[test]
fn unsupported_operator_is_named() {
    match Query::compile("id:{$gt:5}").unwrap_err() {
        QueryError::UnsupportedOperator(op) => assert_eq!(op, "$gt"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn top_level_operator_is_rejected() {
    assert!(matches!(
        Query::compile("$in:[1,2]").unwrap_err(),
        QueryError::UnsupportedOperator(_)
    ));
}

#[test]
fn mixed_operator_and_field_is_rejected() {
    match Query::compile("id:{$in:[1],x:2}").unwrap_err() {
        QueryError::MixedConstraint(field) => assert_eq!(field, "x"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn in_requires_an_array_operand() {
    assert!(matches!(
        Query::compile("id:{$in:5}").unwrap_err(),
        QueryError::InvalidOperand { .. }
    ));
}

#[test]
fn equality_is_structural() {
    let q = Query::compile("tags:[a,b]").unwrap();
    assert!(q.matches(&doc(r#"{"tags": ["a", "b"]}"#)));
    assert!(!q.matches(&doc(r#"{"tags": ["b", "a"]}"#)));
}

#[test]
fn null_equality_matches_missing_field() {
    let q = Query::compile("gone:null").unwrap();
    assert!(q.matches(&doc(r#"{"other": 1}"#)));
    assert!(q.matches(&doc(r#"{"gone": null}"#)));
    assert!(!q.matches(&doc(r#"{"gone": 0}"#)));
}

#[test]
fn in_with_null_matches_missing_field() {
    let q = Query::compile("gone:{$in:[null,1]}").unwrap();
    assert!(q.matches(&doc(r#"{"other": 2}"#)));
    assert!(q.matches(&doc(r#"{"gone": 1}"#)));
    assert!(q.matches(&doc(r#"{"gone": null}"#)));
    assert!(!q.matches(&doc(r#"{"gone": 0}"#)));
}

#[test]
fn nested_query_submatches_instead_of_comparing_whole_objects() {
    // The element's sub-object has extra keys; a sub-match still succeeds
    let q = Query::compile("properties:{kiosk_type:Article}").unwrap();
    assert!(q.matches(&doc(
        r#"{"properties": {"kiosk_type": "Article", "section": "news"}}"#
    )));
    assert!(!q.matches(&doc(r#"{"properties": {"kiosk_type": "Video"}}"#)));
    assert!(!q.matches(&doc(r#"{"properties": 3}"#)));
}

#[test]
fn in_matches_by_membership() {
    let q = Query::compile("id:{$in:[1,2]}").unwrap();
    assert!(q.matches(&doc(r#"{"id": 1}"#)));
    assert!(q.matches(&doc(r#"{"id": 2}"#)));
    assert!(!q.matches(&doc(r#"{"id": 3}"#)));
}

#[test]
fn clauses_are_an_implicit_and() {
    let q = Query::compile("status:published,premium:false").unwrap();
    assert!(q.matches(&doc(r#"{"status": "published", "premium": false}"#)));
    assert!(!q.matches(&doc(r#"{"status": "published", "premium": true}"#)));
    assert!(!q.matches(&doc(r#"{"status": "draft", "premium": false}"#)));
}

#[test]
fn filter_preserves_relative_order() {
    let q = Query::compile("keep:true").unwrap();
    let input = items(
        r#"[{"id": 1, "keep": true}, {"id": 2, "keep": false},
            {"id": 3, "keep": true}, {"id": 4, "keep": true}]"#,
    );

    let filtered = q.filter(input);
    let ids: Vec<&Value> = filtered.iter().map(|v| v.get("id").unwrap()).collect();
    assert_eq!(
        ids,
        vec![&Value::Integer(1), &Value::Integer(3), &Value::Integer(4)]
    );
}

#[test]
fn filter_is_idempotent() {
    let q = Query::compile("status:published").unwrap();
    let input = items(
        r#"[{"id": 1, "status": "published"}, {"id": 2, "status": "draft"},
            {"id": 3, "status": "published"}]"#,
    );

    let once = q.filter(input);
    let twice = q.filter(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn filter_output_is_a_subsequence() {
    let q = Query::compile("premium:false").unwrap();
    let input = items(
        r#"[{"id": 1, "premium": false}, {"id": 2, "premium": true},
            {"id": 3, "premium": false}]"#,
    );

    let filtered = q.filter(input.clone());
    for element in &filtered {
        assert!(input.contains(element));
        assert!(q.matches(element));
    }
    for element in &input {
        if q.matches(element) {
            assert!(filtered.contains(element));
        }
    }
}
