use super::*;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Write a prepared document, a map with a single root entry, as XML.
pub(super) fn write<W: io::Write>(
    inner: W,
    root: (&str, &Value),
    opts: &XmlOptions,
) -> Result<W, Error> {
    let mut writer = match opts.indent {
        Some((c, n)) => Writer::new_with_indent(inner, c, n),
        None => Writer::new(inner),
    };

    if opts.declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    }

    element(&mut writer, root.0, root.1, opts)?;

    Ok(writer.into_inner())
}

fn element<W: io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
    opts: &XmlOptions,
) -> Result<(), Error> {
    match value {
        Value::Null => writer.write_event(Event::Empty(BytesStart::new(name)))?,
        Value::Seq(seq) => {
            for v in seq {
                element(writer, name, v, opts)?;
            }
        }
        Value::Map(map) => {
            let mut start = BytesStart::new(name);
            let mut text = None;
            let mut children = Vec::new();

            for (k, v) in map {
                let k = k.str().unwrap_or_default();
                if k == opts.text_key {
                    text = Some(leaf_text(k, v)?);
                } else if let Some(attr) = k.strip_prefix(opts.attr_prefix.as_str()) {
                    start.push_attribute((attr, leaf_text(k, v)?.as_str()));
                } else {
                    children.push((k, v));
                }
            }

            if text.is_none() && children.is_empty() {
                writer.write_event(Event::Empty(start))?;
            } else {
                writer.write_event(Event::Start(start))?;
                if let Some(text) = text {
                    writer.write_event(Event::Text(BytesText::new(&text)))?;
                }
                for (k, v) in children {
                    element(writer, k, v, opts)?;
                }
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
        }
        Value::Obj(obj) => {
            return Err(Error::Unserializable {
                type_name: obj.type_name(),
            })
        }
        leaf => {
            let text = leaf_text(name, leaf)?;
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            if !text.is_empty() {
                writer.write_event(Event::Text(BytesText::new(&text)))?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }

    Ok(())
}

/// The text of a primitive, as it goes in an attribute or text node.
fn leaf_text(name: &str, value: &Value) -> Result<String, Error> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Num(n) => Ok(n.to_string()),
        Value::Str(s) => Ok(s.clone()),
        Value::Obj(obj) => Err(Error::Unserializable {
            type_name: obj.type_name(),
        }),
        Value::Seq(_) | Value::Map(_) => Err(Error::NotALeaf(name.to_string())),
    }
}
