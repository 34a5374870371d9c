#![cfg(feature = "xml")]
mod common;

use common::*;
use objser::xml::{self, XmlCodec, XmlOptions};
use objser::*;

fn options() -> XmlOptions {
    XmlOptions::default().with_force_list(vec!["blocks", "tags"])
}

#[test]
fn object_round_trip() {
    let registry = registry();
    let value = Value::new_map(vec![("experiment", Value::new_obj(experiment()))]);

    for opts in vec![options(), XmlOptions::pretty()] {
        let codec = XmlCodec::new(&registry).with_options(opts);
        let s = codec.to_string(&value).unwrap();
        assert_eq!(codec.from_str(&s).unwrap(), value);
    }
}

#[test]
fn empty_strings_are_not_nulls() {
    let registry = registry();
    let mut b = block("");
    b.tags = vec![String::new(), "eyes-closed".to_string()];
    let value = Value::new_map(vec![
        ("block", Value::new_obj(b.clone())),
        ("blank", Value::from("")),
        ("none", Value::Null),
    ]);

    for opts in vec![options(), XmlOptions::pretty()] {
        let codec = XmlCodec::new(&registry).with_options(opts);
        let s = codec.to_string_rooted("r", &value).unwrap();
        let back = codec.from_str(&s).unwrap();
        let r = back.map().and_then(|m| m.get_map("r")).unwrap();

        assert_eq!(r.get_obj::<Block>("block"), Some(&b));
        assert_eq!(r.field("blank"), Some(&Value::from("")));
        assert_eq!(r.field("none"), Some(&Value::Null));
    }
}

#[test]
fn metadata_travels_as_attributes() {
    let registry = registry();
    let codec = XmlCodec::new(&registry);

    let s = codec.to_string_rooted("t", &Value::new_obj(T::new())).unwrap();
    assert_eq!(
        s,
        format!(
            r#"<t __class__.__module__="{}" __class__.__qualname__="T"><b>1</b><c>2</c><d>3</d></t>"#,
            ClassMeta::of::<T>().module()
        )
    );

    let back = codec.from_str(&s).unwrap();
    assert_eq!(back.map().and_then(|m| m.get_obj::<T>("t")), Some(&T::new()));

    let opts = XmlOptions {
        emit_metadata: false,
        ..XmlOptions::default()
    };
    let s = codec
        .clone()
        .with_options(opts)
        .to_string_rooted("t", &Value::new_obj(T::new()))
        .unwrap();
    assert_eq!(s, "<t><b>1</b><c>2</c><d>3</d></t>");
}

#[test]
fn force_list_cardinality() {
    let registry = registry();
    let mut single = group();
    single.blocks.truncate(1);
    single.blocks[0].tags.truncate(1);
    let value = Value::new_map(vec![("group", Value::new_obj(single.clone()))]);

    // a lone child comes back as a lone value, which the deserializer reads as a list of one
    let plain = XmlCodec::new(&registry);
    let s = plain.to_string(&value).unwrap();
    assert_eq!(plain.from_str(&s).unwrap(), value);

    let forced = XmlCodec::new(&registry).with_options(options());
    assert_eq!(forced.from_str(&s).unwrap(), value);

    // the raw structure shows the difference
    let raw = XmlOptions {
        emit_metadata: false,
        ..options()
    };
    let s = XmlCodec::new(&registry)
        .with_options(raw.clone())
        .to_string(&value)
        .unwrap();
    let doc = XmlCodec::new(&registry).with_options(raw).from_str(&s).unwrap();
    let g = doc.map().and_then(|m| m.get_map("group")).unwrap();
    let blocks = g.field("blocks").and_then(Value::seq).unwrap();
    assert_eq!(blocks.len(), 1);
    let tags = blocks[0].map().and_then(|b| b.field("tags")).and_then(Value::seq);
    assert_eq!(tags.map(|t| t.len()), Some(1));

    let doc = XmlCodec::new(&registry).from_str(&s);
    let g = doc.as_ref().ok().and_then(|d| d.map()).and_then(|m| m.get_map("group"));
    assert!(g.and_then(|g| g.field("blocks")).and_then(Value::map).is_some());
}

#[test]
fn empty_lists_are_absent() {
    let registry = registry();
    let mut b = block("quiet");
    b.tags.clear();
    let value = Value::new_map(vec![("block", Value::new_obj(b))]);

    let codec = XmlCodec::new(&registry).with_options(options());
    let s = codec.to_string(&value).unwrap();
    assert!(!s.contains("<tags"));
    assert_eq!(codec.from_str(&s).unwrap(), value);
}

#[test]
fn attribute_coercion() {
    let registry = Registry::new();
    let doc = XmlCodec::new(&registry)
        .from_str(
            r#"<?xml version="1.0"?>
            <!-- a reading -->
            <reading unit="uV" value="12.5" valid="TRUE" count="-3">
                <![CDATA[raw <data>]]>
            </reading>"#,
        )
        .unwrap();

    let r = doc.map().and_then(|m| m.get_map("reading")).unwrap();
    assert_eq!(r.get_str("@unit"), Some("uV"));
    assert_eq!(r.get_num("@value"), Some(Number::from(12.5)));
    assert_eq!(r.get_bool("@valid"), Some(true));
    assert_eq!(r.req_i64("@count"), Ok(-3));
    assert_eq!(r.get_str("#text"), Some("raw <data>"));
}

#[test]
fn serde_types_read_back_from_text() {
    let registry = registry();
    let codec = XmlCodec::new(&registry);
    let value = Value::new_map(vec![("settings", Value::new_obj(settings()))]);

    let s = codec.to_string(&value).unwrap();
    assert!(s.contains("<rate>500</rate>"));
    assert_eq!(codec.from_str(&s).unwrap(), value);
}

#[cfg(feature = "geometry")]
#[test]
fn hooked_types() {
    use objser::geometry::{self, Point, SizeF};

    let mut registry = registry();
    geometry::register(&mut registry);
    let hooks = geometry::hooks();
    let codec = XmlCodec::new(&registry).with_hooks(&hooks);

    let value = Value::new_map(vec![(
        "layout",
        Value::new_map(vec![
            ("origin", Value::new_obj(Point { x: -4, y: 10 })),
            ("size", Value::new_obj(SizeF { width: 0.5, height: 3.0 })),
        ]),
    )]);

    let s = codec.to_string(&value).unwrap();
    assert!(s.contains("<x>-4</x>"));
    assert_eq!(codec.from_str(&s).unwrap(), value);
}

#[test]
fn errors() {
    #[derive(Debug, Clone, PartialEq)]
    struct Device;

    let registry = registry();
    let codec = XmlCodec::new(&registry);

    assert!(matches!(
        codec.to_string_rooted("d", &Value::new_obj(Device)),
        Err(xml::Error::Unserializable { .. })
    ));
    assert!(matches!(
        codec.to_string(&Value::from(vec![Value::Null])),
        Err(xml::Error::RootCount(0))
    ));
    assert!(matches!(
        codec.to_string_rooted("d", &Value::new_map(vec![("@bad", Value::Seq(vec![]))])),
        Err(xml::Error::NotALeaf(_))
    ));
    assert!(matches!(
        codec.from_str("<a><b>"),
        Err(xml::Error::UnexpectedEof)
    ));
    assert!(matches!(
        codec.from_str(r#"<x __class__.__module__="experiment" __class__.__qualname__="Nope"/>"#),
        Err(xml::Error::Decode(DecodeError::ClassNotFound(_)))
    ));
}
