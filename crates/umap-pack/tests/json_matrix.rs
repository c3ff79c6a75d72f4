use std::sync::Arc;

use umap::codec::{decode_str, Encoding, ReaderOptions, WriterOptions};
use umap::{
    ArrayBuilder, ArrayTemplate, CodecError, MapBuilder, MapDocument, MapTemplate, Reason,
    Template, Value,
};
use umap_pack::JsonFormat;

fn address() -> Arc<MapTemplate> {
    MapTemplate::builder()
        .required("city", Template::string())
        .optional("street", Template::string())
        .required("zip", Template::int())
        .build_arc()
        .unwrap()
}

fn address_doc(street: Option<&str>) -> MapDocument {
    let mut builder = MapBuilder::new(address());
    builder.set("city", "NY").unwrap();
    builder.set("street", street).unwrap();
    builder.set("zip", 12345).unwrap();
    builder.build().unwrap()
}

fn decode(text: &str, template: &Arc<MapTemplate>) -> Result<MapDocument, CodecError> {
    decode_str(text, template, &JsonFormat, &ReaderOptions::default())
}

fn decode_lenient(text: &str, template: &Arc<MapTemplate>) -> Result<MapDocument, CodecError> {
    let options = ReaderOptions {
        ignore_unknown_keys: true,
        ..ReaderOptions::default()
    };
    decode_str(text, template, &JsonFormat, &options)
}

fn compact(doc: &MapDocument) -> String {
    doc.encode_to_string(&JsonFormat, &WriterOptions::default(), u32::MAX)
        .unwrap()
}

fn profile() -> Arc<MapTemplate> {
    let inner = MapTemplate::builder()
        .required("x", Template::int())
        .required("y", Template::int())
        .build_arc()
        .unwrap();
    MapTemplate::builder()
        .required("id", Template::int())
        .required("name", Template::string())
        .required("inner", inner)
        .required("tags", Template::string().as_array())
        .build_arc()
        .unwrap()
}

fn profile_doc(tags: &[&str]) -> MapDocument {
    let template = profile();
    let inner_template = template
        .get("inner")
        .and_then(|m| m.template().as_map())
        .cloned()
        .unwrap();
    let mut inner = MapBuilder::new(inner_template);
    inner.set("x", 1).unwrap();
    inner.set("y", 2).unwrap();
    let mut list = ArrayBuilder::new(Arc::new(ArrayTemplate::new(Template::string())));
    list.extend(tags.iter().copied()).unwrap();

    let mut builder = MapBuilder::new(template);
    builder.set("id", 7).unwrap();
    builder.set("name", "n").unwrap();
    builder.set("inner", inner).unwrap();
    builder.set("tags", list).unwrap();
    builder.build().unwrap()
}

#[test]
fn address_writes_in_canonical_order() {
    assert_eq!(
        compact(&address_doc(None)),
        r#"{"city":"NY","street":null,"zip":12345}"#
    );
    assert_eq!(
        compact(&address_doc(Some("Main"))),
        r#"{"city":"NY","street":"Main","zip":12345}"#
    );
}

#[test]
fn key_order_and_nulls_on_input_matrix() {
    let expected = address_doc(None);
    for text in [
        r#"{"city":"NY","zip":12345,"street":null}"#,
        r#"{"zip":12345,"city":"NY"}"#,
        r#" { "city" : "NY" , "zip" : "12345" } "#,
        r#"{"street":NULL,"city":"NY","zip": 12345 }"#,
    ] {
        assert_eq!(decode(text, &address()).unwrap(), expected, "{text}");
    }
}

#[test]
fn decode_error_matrix() {
    let cases = [
        (r#"{"city":"NY"}"#, Reason::MissingKey, "zip"),
        (r#"{"city":null,"zip":1}"#, Reason::MissingValue, "city"),
        (r#"{"city":"NY","zip":"12a"}"#, Reason::ValueTypeMismatch, "zip"),
        (r#"{"city":"NY","zip":1.5}"#, Reason::ValueTypeMismatch, "zip"),
        (r#"{"city":"NY","zip":{}}"#, Reason::ValueTypeMismatch, "zip"),
        (r#"{"city":[],"zip":1}"#, Reason::ValueTypeMismatch, "city"),
        (r#"{"city":"NY","zip":1,"country":"US"}"#, Reason::UnknownKey, "country"),
        (r#"{"country":"US","city":"NY","zip":1}"#, Reason::UnknownKey, "country"),
    ];
    for (text, reason, path) in cases {
        let err = decode(text, &address()).unwrap_err();
        let field = err.field().unwrap_or_else(|| panic!("{text}: {err}"));
        assert_eq!(field.reason, reason, "{text}");
        assert_eq!(field.path.to_string(), path, "{text}");
    }
}

#[test]
fn undeclared_keys_are_skipped_when_ignored() {
    let expected = address_doc(Some("x"));
    for text in [
        r#"{"country":"US","city":"NY","street":"x","zip":12345}"#,
        r#"{"city":"NY","street":"x","zip":12345,"extra":[1,{"a":"}"},[]],"more":null}"#,
        r#"{"city":"NY","deep":{"k":[true,false]},"street":"x","zip":12345}"#,
    ] {
        assert_eq!(decode_lenient(text, &address()).unwrap(), expected, "{text}");
    }
}

#[test]
fn malformed_input_matrix() {
    for text in [
        "",
        r#"["NY"]"#,
        r#"{"city":"NY",}"#,
        r#"{"city" "NY","zip":1}"#,
        r#"{"city":"NY","zip":1"#,
        r#"{"city":"NY","zip":1} x"#,
        r#"{"city":"NY" "zip":1}"#,
        r#"{"city":"NY","zip":1 2}"#,
        r#"{"city":"N\qY","zip":1}"#,
        r#"{"city":"NY,"zip":1}"#,
    ] {
        let err = decode(text, &address()).unwrap_err();
        assert!(matches!(err, CodecError::Format(_)), "{text}: {err}");
    }
}

#[test]
fn strings_are_escaped() {
    let doc = address_doc(Some("a\"b\\c/d\n\u{1}"));
    let text = compact(&doc);
    assert_eq!(
        text,
        r#"{"city":"NY","street":"a\"b\\c\/d\n\u0001","zip":12345}"#
    );
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["street"], "a\"b\\c/d\n\u{1}");
    assert_eq!(decode(&text, &address()).unwrap(), doc);
}

#[test]
fn pretty_layout() {
    let doc = profile_doc(&["a", "b"]);
    let text = doc
        .encode_to_string(&JsonFormat, &WriterOptions::pretty(), u32::MAX)
        .unwrap();
    let expected = "{
    \"id\": 7,
    \"name\": \"n\",
    \"inner\": {
        \"x\": 1,
        \"y\": 2
    },
    \"tags\": [
        \"a\",
        \"b\"
    ]
}";
    assert_eq!(text, expected);
    assert_eq!(decode(&text, &profile()).unwrap(), doc);

    assert_eq!(
        compact(&doc),
        r#"{"id":7,"name":"n","inner":{"x":1,"y":2},"tags":["a","b"]}"#
    );
}

#[test]
fn pretty_empty_array_stays_on_one_line() {
    let text = profile_doc(&[])
        .encode_to_string(&JsonFormat, &WriterOptions::pretty(), u32::MAX)
        .unwrap();
    assert!(text.contains("\"tags\": []\n}"), "{text}");
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["tags"], serde_json::json!([]));
}

#[test]
fn aligned_values_share_a_column() {
    let template = MapTemplate::builder()
        .required("a", Template::int())
        .required("long_name", Template::int())
        .build_arc()
        .unwrap();
    let mut builder = MapBuilder::new(template);
    builder.set("a", 1).unwrap();
    builder.set("long_name", 2).unwrap();
    let options = WriterOptions {
        indent_factor: 2,
        align_values: true,
        ..WriterOptions::pretty()
    };
    let text = builder
        .build()
        .unwrap()
        .encode_to_string(&JsonFormat, &options, u32::MAX)
        .unwrap();
    assert_eq!(text, "{\n  \"a\":         1,\n  \"long_name\": 2\n}");
}

#[test]
fn detail_level_filters_output() {
    let template = MapTemplate::builder()
        .required("name", Template::string())
        .mapping("email", 1, true, Template::string(), None)
        .mapping("notes", 2, true, Template::string(), Some(Value::from("none")))
        .build_arc()
        .unwrap();
    let mut builder = MapBuilder::new(template);
    builder.set("name", "a").unwrap();
    builder.set("email", "a@b").unwrap();
    let doc = builder.build().unwrap();

    let at = |level| {
        doc.encode_to_string(&JsonFormat, &WriterOptions::default(), level)
            .unwrap()
    };
    assert_eq!(at(0), r#"{"name":"a"}"#);
    assert_eq!(at(1), r#"{"name":"a","email":"a@b"}"#);
    assert_eq!(at(2), r#"{"name":"a","email":"a@b","notes":"none"}"#);
}

#[test]
fn chars_and_enums_travel_as_strings() {
    let template = MapTemplate::builder()
        .required("initial", Template::char())
        .required("color", Template::enumeration(["red", "green"]).unwrap())
        .build_arc()
        .unwrap();
    let mut builder = MapBuilder::new(Arc::clone(&template));
    builder.set("initial", '\u{e9}').unwrap();
    builder.set("color", "red").unwrap();
    let doc = builder.build().unwrap();

    let text = compact(&doc);
    assert_eq!(text, "{\"color\":\"red\",\"initial\":\"\u{e9}\"}");
    let back = decode(&text, &template).unwrap();
    assert_eq!(back.get("color"), Some(&Value::enumeration("red")));
    assert_eq!(back.get("initial"), Some(&Value::Char('\u{e9}')));

    let err = decode(r#"{"color":"Red","initial":"x"}"#, &template).unwrap_err();
    assert_eq!(err.reason(), Some(Reason::InvalidValue));
}

#[test]
fn utf16_passes_round_trip() {
    let doc = profile_doc(&["\u{1F600}"]);
    for encoding in [Encoding::Utf16Be, Encoding::Utf16Le] {
        let write = WriterOptions {
            encoding,
            ..WriterOptions::default()
        };
        let bytes = doc.encode_to_vec(&JsonFormat, &write, u32::MAX).unwrap();
        assert_eq!(bytes.len() % 2, 0);
        let read = ReaderOptions {
            encoding,
            ..ReaderOptions::default()
        };
        let back = umap::codec::decode_slice(&bytes, &profile(), &JsonFormat, &read).unwrap();
        assert_eq!(back, doc);
    }
}

#[test]
fn nested_errors_carry_full_paths() {
    let err = decode(
        r#"{"id":1,"name":"n","inner":{"x":1,"y":"two"},"tags":[]}"#,
        &profile(),
    )
    .unwrap_err();
    let field = err.field().unwrap();
    assert_eq!(field.path.to_string(), "inner.y");
    assert_eq!(field.reason, Reason::ValueTypeMismatch);

    let err = decode(
        r#"{"id":1,"name":"n","inner":{"x":1,"y":2},"tags":["a",null]}"#,
        &profile(),
    )
    .unwrap_err();
    assert_eq!(err.field().unwrap().path.to_string(), "tags[1]");
}

#[test]
fn whitespace_chars_and_spaced_members_survive_json() {
    let template = MapTemplate::builder()
        .required("c", Template::char())
        .required("shade", Template::enumeration(["dark red", "blue"]).unwrap())
        .build_arc()
        .unwrap();
    for (c, escaped) in [(' ', " "), ('\t', "\\t"), ('\u{3000}', "\u{3000}")] {
        let mut builder = MapBuilder::new(Arc::clone(&template));
        builder.set("c", c).unwrap();
        builder.set("shade", "dark red").unwrap();
        let doc = builder.build().unwrap();

        let text = compact(&doc);
        assert_eq!(text, format!(r#"{{"c":"{escaped}","shade":"dark red"}}"#));
        let back = decode(&text, &template).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.get("c"), Some(&Value::Char(c)));
        assert_eq!(back.get("shade"), Some(&Value::enumeration("dark red")));
    }

    let err = decode(r#"{"c":"  ","shade":"blue"}"#, &template).unwrap_err();
    assert_eq!(err.reason(), Some(Reason::ValueTypeMismatch));
}

#[test]
fn format_errors_point_past_the_offending_character() {
    match decode(r#"{"city" "NY","zip":1}"#, &address()) {
        Err(CodecError::Format(err)) => assert_eq!(err.position, Some(9), "{err}"),
        other => panic!("expected a format error, got {other:?}"),
    }
}
