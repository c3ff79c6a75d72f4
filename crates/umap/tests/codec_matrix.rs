use std::collections::VecDeque;
use std::sync::Arc;

use umap::codec::decode::read_document;
use umap::codec::encode::write_document;
use umap::codec::{
    FormatReader, FormatWriter, MappingSlot, ReadContext, ReaderOptions, ValueToken,
    WriteContext, WriterOptions,
};
use umap::{
    CodecError, ExpectedKind, MapBuilder, MapDocument, MapTemplate, Reason, Template, Value,
};

enum Step {
    Key(Option<&'static str>),
    Value(ValueToken),
}

/// Replays a fixed token script and records every protocol call.
struct ScriptReader {
    steps: VecDeque<Step>,
    log: Vec<String>,
}

impl ScriptReader {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            log: Vec::new(),
        }
    }
}

impl FormatReader for ScriptReader {
    fn read_root_start(&mut self, _ctx: &mut ReadContext) -> Result<(), CodecError> {
        self.log.push("root_start".into());
        Ok(())
    }

    fn next_key_token(
        &mut self,
        _ctx: &mut ReadContext,
        _expected: &str,
    ) -> Result<Option<String>, CodecError> {
        match self.steps.pop_front() {
            Some(Step::Key(key)) => Ok(key.map(str::to_owned)),
            _ => panic!("script expected a key step"),
        }
    }

    fn next_value_token(
        &mut self,
        ctx: &mut ReadContext,
        key: Option<&str>,
        expected: ExpectedKind,
        _optional: bool,
        in_array: bool,
    ) -> Result<ValueToken, CodecError> {
        let index = ctx.frame().map_or(0, |f| f.index);
        self.log.push(format!(
            "value {} {} d{} i{index} {}",
            key.unwrap_or("-"),
            expected.as_str(),
            ctx.depth(),
            if in_array { "array" } else { "map" }
        ));
        match self.steps.pop_front() {
            Some(Step::Value(token)) => Ok(token),
            _ => panic!("script expected a value step"),
        }
    }

    fn skip_value(&mut self, _ctx: &mut ReadContext, key: &str) -> Result<(), CodecError> {
        self.log.push(format!("skip {key}"));
        Ok(())
    }

    fn read_map_end(&mut self, ctx: &mut ReadContext) -> Result<(), CodecError> {
        self.log.push(format!("map_end d{}", ctx.depth()));
        Ok(())
    }

    fn read_root_end(&mut self, _ctx: &mut ReadContext) -> Result<(), CodecError> {
        self.log.push("root_end".into());
        Ok(())
    }
}

fn address() -> Arc<MapTemplate> {
    MapTemplate::builder()
        .required("city", Template::string())
        .optional("street", Template::string())
        .required("zip", Template::int())
        .build_arc()
        .unwrap()
}

fn decode(
    template: &Arc<MapTemplate>,
    steps: Vec<Step>,
    options: ReaderOptions,
) -> (Result<MapDocument, CodecError>, Vec<String>) {
    let mut reader = ScriptReader::new(steps);
    let result = read_document(&mut reader, template, &options);
    (result, reader.log)
}

fn scalar(value: impl Into<Value>) -> Step {
    Step::Value(ValueToken::scalar(value, false))
}

#[test]
fn decode_coerces_and_stops_at_end_of_map() {
    let (doc, log) = decode(
        &address(),
        vec![
            Step::Key(Some("city")),
            scalar("NY"),
            Step::Key(Some("zip")),
            scalar("12345"),
            Step::Key(None),
        ],
        ReaderOptions::default(),
    );
    let doc = doc.unwrap();
    assert_eq!(doc.get("zip"), Some(&Value::Int(12345)));
    assert_eq!(doc.get("street"), None);
    assert_eq!(
        log,
        vec![
            "root_start",
            "value city string d1 i0 map",
            "value zip int d1 i1 map",
            "root_end",
        ]
    );
}

#[test]
fn last_flag_ends_structure_early() {
    let template = MapTemplate::builder()
        .required("city", Template::string())
        .optional("street", Template::string())
        .build_arc()
        .unwrap();
    let (doc, log) = decode(
        &template,
        vec![
            Step::Key(Some("city")),
            Step::Value(ValueToken::scalar("NY", true)),
        ],
        ReaderOptions::default(),
    );
    assert_eq!(doc.unwrap().get("city"), Some(&Value::from("NY")));
    assert_eq!(log.last().map(String::as_str), Some("root_end"));
    assert!(!log.iter().any(|l| l.starts_with("map_end")));

    let (err, _) = decode(
        &address(),
        vec![
            Step::Key(Some("city")),
            Step::Value(ValueToken::scalar("NY", true)),
        ],
        ReaderOptions::default(),
    );
    let err = err.unwrap_err();
    assert_eq!(err.reason(), Some(Reason::MissingKey));
    assert_eq!(err.field().unwrap().path.to_string(), "zip");
}

#[test]
fn exhausted_builder_hands_end_of_map_to_reader() {
    let template = MapTemplate::builder()
        .required("a", Template::int())
        .build_arc()
        .unwrap();
    let (doc, log) = decode(
        &template,
        vec![Step::Key(Some("a")), scalar(1)],
        ReaderOptions::default(),
    );
    assert!(doc.is_ok());
    assert_eq!(log, vec!["root_start", "value a int d1 i0 map", "map_end d1", "root_end"]);
}

#[test]
fn undeclared_keys() {
    let steps = || {
        vec![
            Step::Key(Some("country")),
            Step::Key(Some("city")),
            scalar("NY"),
            Step::Key(Some("zip")),
            scalar(1),
            Step::Key(None),
        ]
    };
    let (err, _) = decode(&address(), steps(), ReaderOptions::default());
    let err = err.unwrap_err();
    assert_eq!(err.reason(), Some(Reason::UnknownKey));
    assert_eq!(err.field().unwrap().path.to_string(), "country");

    let options = ReaderOptions {
        ignore_unknown_keys: true,
        ..ReaderOptions::default()
    };
    let (doc, log) = decode(&address(), steps(), options);
    assert!(doc.is_ok());
    assert_eq!(log[1], "skip country");
}

#[test]
fn structure_mismatch_is_type_mismatch() {
    let point = MapTemplate::builder()
        .required("x", Template::int())
        .build()
        .unwrap();
    let template = MapTemplate::builder()
        .required("point", point)
        .build_arc()
        .unwrap();
    let (err, _) = decode(
        &template,
        vec![Step::Key(Some("point")), scalar(5)],
        ReaderOptions::default(),
    );
    let err = err.unwrap_err();
    assert_eq!(err.reason(), Some(Reason::ValueTypeMismatch));
    assert_eq!(err.field().unwrap().path.to_string(), "point");
}

#[test]
fn nested_paths_and_frames() {
    let point = MapTemplate::builder()
        .required("x", Template::int())
        .build()
        .unwrap();
    let template = MapTemplate::builder()
        .required("points", Template::from(point).as_array())
        .build_arc()
        .unwrap();

    let (doc, log) = decode(
        &template,
        vec![
            Step::Key(Some("points")),
            Step::Value(ValueToken::array_start(false)),
            Step::Value(ValueToken::map_start(false)),
            Step::Key(Some("x")),
            scalar(1),
            Step::Value(ValueToken::map_start(true)),
            Step::Key(Some("x")),
            scalar(2),
        ],
        ReaderOptions::default(),
    );
    let doc = doc.unwrap();
    let points = doc.get("points").and_then(Value::as_array).unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(
        points.get(1).and_then(Value::as_map).and_then(|p| p.get("x")),
        Some(&Value::Int(2))
    );
    assert_eq!(
        log,
        vec![
            "root_start",
            "value points array d1 i0 map",
            "value - map d2 i0 array",
            "value x int d3 i0 map",
            "map_end d3",
            "value - map d2 i1 array",
            "value x int d3 i0 map",
            "map_end d3",
            "map_end d1",
            "root_end",
        ]
    );

    let (err, _) = decode(
        &template,
        vec![
            Step::Key(Some("points")),
            Step::Value(ValueToken::array_start(false)),
            Step::Value(ValueToken::map_start(false)),
            Step::Key(Some("x")),
            scalar("one"),
        ],
        ReaderOptions::default(),
    );
    let err = err.unwrap_err();
    assert_eq!(err.reason(), Some(Reason::ValueTypeMismatch));
    assert_eq!(err.field().unwrap().path.to_string(), "points[0].x");
}

#[test]
fn arrays_reject_null_and_accept_end() {
    let template = MapTemplate::builder()
        .required("xs", Template::int().as_array())
        .build_arc()
        .unwrap();
    let (doc, _) = decode(
        &template,
        vec![
            Step::Key(Some("xs")),
            Step::Value(ValueToken::array_start(false)),
            Step::Value(ValueToken::end()),
        ],
        ReaderOptions::default(),
    );
    assert!(doc.unwrap().get("xs").and_then(Value::as_array).unwrap().is_empty());

    let (err, _) = decode(
        &template,
        vec![
            Step::Key(Some("xs")),
            Step::Value(ValueToken::array_start(false)),
            scalar(1),
            Step::Value(ValueToken::null(false)),
        ],
        ReaderOptions::default(),
    );
    let err = err.unwrap_err();
    assert_eq!(err.reason(), Some(Reason::InvalidValue));
    assert_eq!(err.field().unwrap().path.to_string(), "xs[1]");
}

#[test]
fn null_for_required_key_is_missing_value() {
    let (err, _) = decode(
        &address(),
        vec![Step::Key(Some("zip")), Step::Value(ValueToken::null(false))],
        ReaderOptions::default(),
    );
    assert_eq!(err.unwrap_err().reason(), Some(Reason::MissingValue));
}

/// Records every writer call as a line.
#[derive(Default)]
struct RecordingWriter {
    log: Vec<String>,
}

impl RecordingWriter {
    fn push(&mut self, line: String) -> Result<(), CodecError> {
        self.log.push(line);
        Ok(())
    }
}

impl FormatWriter for RecordingWriter {
    fn write_root_start(&mut self, _ctx: &WriteContext) -> Result<(), CodecError> {
        self.push("root_start".into())
    }
    fn write_root_end(&mut self, _ctx: &WriteContext) -> Result<(), CodecError> {
        self.push("root_end".into())
    }
    fn write_map_start(&mut self, ctx: &WriteContext) -> Result<(), CodecError> {
        self.push(format!("map_start d{} n{:?}", ctx.depth(), ctx.entry_count()))
    }
    fn write_map_end(&mut self, ctx: &WriteContext) -> Result<(), CodecError> {
        self.push(format!("map_end d{}", ctx.depth()))
    }
    fn write_array_start(&mut self, ctx: &WriteContext, len: usize) -> Result<(), CodecError> {
        self.push(format!("array_start d{} {len}", ctx.depth()))
    }
    fn write_array_end(&mut self, _ctx: &WriteContext, len: usize) -> Result<(), CodecError> {
        self.push(format!("array_end {len}"))
    }
    fn write_mapping_prefix(
        &mut self,
        ctx: &WriteContext,
        slot: &MappingSlot<'_>,
    ) -> Result<(), CodecError> {
        self.push(format!(
            "prefix {} #{} opt={} set={} last={} w{}",
            slot.key,
            slot.index,
            slot.optional,
            slot.assigned,
            slot.last,
            ctx.max_key_width()
        ))
    }
    fn write_mapping_suffix(
        &mut self,
        ctx: &WriteContext,
        slot: &MappingSlot<'_>,
    ) -> Result<(), CodecError> {
        self.push(format!("suffix {} w{}", slot.key, ctx.max_key_width()))
    }
    fn write_entry_prefix(
        &mut self,
        _ctx: &WriteContext,
        index: usize,
        last: bool,
    ) -> Result<(), CodecError> {
        self.push(format!("entry {index} last={last}"))
    }
    fn write_entry_suffix(
        &mut self,
        _ctx: &WriteContext,
        _index: usize,
        _last: bool,
    ) -> Result<(), CodecError> {
        Ok(())
    }
    fn write_string(&mut self, _ctx: &WriteContext, value: &str) -> Result<(), CodecError> {
        self.push(format!("string {value}"))
    }
    fn write_bool(&mut self, _ctx: &WriteContext, value: bool) -> Result<(), CodecError> {
        self.push(format!("bool {value}"))
    }
    fn write_byte(&mut self, _ctx: &WriteContext, value: i8) -> Result<(), CodecError> {
        self.push(format!("byte {value}"))
    }
    fn write_short(&mut self, _ctx: &WriteContext, value: i16) -> Result<(), CodecError> {
        self.push(format!("short {value}"))
    }
    fn write_int(&mut self, _ctx: &WriteContext, value: i32) -> Result<(), CodecError> {
        self.push(format!("int {value}"))
    }
    fn write_long(&mut self, _ctx: &WriteContext, value: i64) -> Result<(), CodecError> {
        self.push(format!("long {value}"))
    }
    fn write_float(&mut self, _ctx: &WriteContext, value: f32) -> Result<(), CodecError> {
        self.push(format!("float {value}"))
    }
    fn write_double(&mut self, _ctx: &WriteContext, value: f64) -> Result<(), CodecError> {
        self.push(format!("double {value}"))
    }
    fn write_char(&mut self, _ctx: &WriteContext, value: char) -> Result<(), CodecError> {
        self.push(format!("char {value}"))
    }
    fn write_null(&mut self, _ctx: &WriteContext) -> Result<(), CodecError> {
        self.push("null".into())
    }
    fn flush(&mut self) -> Result<(), CodecError> {
        self.push("flush".into())
    }
}

#[test]
fn encode_walks_filtered_canonical_order() {
    let inner = MapTemplate::builder()
        .required("x", Template::int())
        .required("y", Template::int())
        .build()
        .unwrap();
    let template = MapTemplate::builder()
        .required("inner", inner)
        .required("id", Template::int())
        .optional_with_default("kind", Template::string(), "plain")
        .optional("note", Template::string())
        .mapping("secret", 1, false, Template::string(), None)
        .required("tags", Template::enumeration(["A", "B"]).unwrap().as_array())
        .build_arc()
        .unwrap();
    let inner = Arc::clone(template.get("inner").unwrap().template().as_map().unwrap());

    let mut nested = MapBuilder::new(inner);
    nested.set("x", 7).unwrap().set("y", 8).unwrap();
    let mut builder = MapBuilder::new(Arc::clone(&template));
    builder
        .set("inner", nested)
        .unwrap()
        .set("id", 1)
        .unwrap()
        .set("secret", "s")
        .unwrap();
    let mut tags = umap::ArrayBuilder::new(Arc::clone(
        match template.get("tags").unwrap().template() {
            Template::Array(t) => t,
            _ => unreachable!(),
        },
    ));
    tags.extend(["A", "B"]).unwrap();
    builder.set("tags", tags).unwrap();
    let doc = builder.build().unwrap();

    let mut writer = RecordingWriter::default();
    write_document(&mut writer, &doc, &WriterOptions::default(), 0).unwrap();
    assert_eq!(
        writer.log,
        vec![
            "root_start",
            "map_start d0 nSome(5)",
            "prefix id #0 opt=false set=true last=false w6",
            "int 1",
            "suffix id w6",
            "prefix kind #1 opt=true set=true last=false w6",
            "string plain",
            "suffix kind w6",
            "prefix note #2 opt=true set=false last=false w6",
            "null",
            "suffix note w6",
            "prefix inner #3 opt=false set=true last=false w6",
            "map_start d1 nSome(2)",
            "prefix x #0 opt=false set=true last=false w1",
            "int 7",
            "suffix x w1",
            "prefix y #1 opt=false set=true last=true w1",
            "int 8",
            "suffix y w1",
            "map_end d1",
            "suffix inner w6",
            "prefix tags #4 opt=false set=true last=true w6",
            "array_start d1 2",
            "entry 0 last=false",
            "string A",
            "entry 1 last=true",
            "string B",
            "array_end 2",
            "suffix tags w6",
            "map_end d0",
            "root_end",
            "flush",
        ]
    );

    let mut writer = RecordingWriter::default();
    write_document(&mut writer, &doc, &WriterOptions::default(), 1).unwrap();
    assert!(writer.log.iter().any(|l| l == "string s"));
}
