use jove::render::{paint, render, RenderOptions};
use jove::{OutputSink, Value};

fn rendered(value: Option<&Value>, options: &RenderOptions, color: bool) -> String {
    let mut sink = OutputSink::new(Vec::new(), color);
    render(value, options, &mut sink).unwrap();
    String::from_utf8(sink.into_inner()).unwrap()
}

fn doc(text: &str) -> Value {
    jove::parser::parse(text).unwrap().unwrap()
}

#[test]
fn pretty_json_indents_two_spaces() {
    let value = doc(r#"{"a": 1, "b": {"c": "x"}}"#);
    let out = rendered(Some(&value), &RenderOptions::default(), false);
    assert_eq!(out, "{\n  \"a\": 1,\n  \"b\": {\n    \"c\": \"x\"\n  }\n}\n");
}

#[test]
fn compact_json_has_no_whitespace() {
    let value = doc(r#"{"a": 1, "b": [true, null]}"#);
    let options = RenderOptions {
        pretty: false,
        ..RenderOptions::default()
    };
    let out = rendered(Some(&value), &options, false);
    assert_eq!(out, "{\"a\":1,\"b\":[true,null]}\n");
}

#[test]
fn js_mode_uses_bare_keys_and_single_quotes() {
    let value = doc(r#"{"a": "x", "weird key": 1}"#);
    let options = RenderOptions {
        json: false,
        ..RenderOptions::default()
    };
    let out = rendered(Some(&value), &options, false);
    assert!(out.contains("a: 'x'"));
    assert!(out.contains("'weird key': 1"));
    assert!(!out.contains("\"a\""));
}

#[test]
fn object_keys_keep_insertion_order() {
    let value = doc(r#"{"zebra": 1, "apple": 2, "mango": 3}"#);
    let out = rendered(Some(&value), &RenderOptions::default(), false);
    let zebra = out.find("zebra").unwrap();
    let apple = out.find("apple").unwrap();
    let mango = out.find("mango").unwrap();
    assert!(zebra < apple && apple < mango);
}

#[test]
fn max_length_truncates_strings() {
    let value = doc(r#"{"s": "abcdefghij"}"#);
    let options = RenderOptions {
        max_length: Some(4),
        ..RenderOptions::default()
    };
    let out = rendered(Some(&value), &options, false);
    assert!(out.contains("\"abcd…\""));
    assert!(!out.contains("abcde"));
}

#[test]
fn absent_value_renders_marker() {
    let out = rendered(None, &RenderOptions::default(), false);
    assert_eq!(out, "undefined\n");
}

#[test]
fn color_is_always_emitted_and_stripped_by_the_sink() {
    let value = doc(r#"{"a": 1}"#);
    let with_color = rendered(Some(&value), &RenderOptions::default(), true);
    let without = rendered(Some(&value), &RenderOptions::default(), false);
    assert!(with_color.contains("\x1b["));
    assert!(!without.contains('\x1b'));
}

#[test]
fn string_escapes_are_applied() {
    let value = doc(r#"{"s": "line\nbreak \"quoted\""}"#);
    let out = rendered(Some(&value), &RenderOptions::default(), false);
    assert!(out.contains(r#"line\nbreak \"quoted\""#));
}

#[test]
fn paint_wraps_in_sgr_sequences() {
    assert_eq!(paint("hi", "33"), "\x1b[33mhi\x1b[0m");
}

#[test]
fn empty_collections_render_compactly() {
    let value = doc(r#"{"a": [], "b": {}}"#);
    let out = rendered(Some(&value), &RenderOptions::default(), false);
    assert!(out.contains("\"a\": []"));
    assert!(out.contains("\"b\": {}"));
}
