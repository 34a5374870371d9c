use super::*;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::str;

struct Frame {
    name: String,
    map: Map,
    text: String,
    /// Written as `<name/>` rather than `<name></name>`.
    empty: bool,
}

/// Parse XML text into nested maps.
///
/// Attributes become prefixed keys, repeated elements become sequences, and an element's text
/// is either its whole value or sits under the text key next to attributes and children.
pub(super) fn read(s: &str, opts: &XmlOptions) -> Result<Value, Error> {
    let mut reader = Reader::from_str(s);
    reader.trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root = Map::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(open(&e, false, opts)?),
            Event::Empty(e) => {
                let frame = open(&e, true, opts)?;
                close(frame, &mut stack, &mut root, opts);
            }
            Event::End(_) => match stack.pop() {
                Some(frame) => close(frame, &mut stack, &mut root, opts),
                None => return Err(Error::UnexpectedEof),
            },
            Event::Text(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(str::from_utf8(&e)?);
                }
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctypes
            _ => (),
        }
    }

    if stack.is_empty() {
        Ok(Value::Map(root))
    } else {
        Err(Error::UnexpectedEof)
    }
}

fn open(e: &BytesStart, empty: bool, opts: &XmlOptions) -> Result<Frame, Error> {
    let name = str::from_utf8(e.name().as_ref())?.to_string();
    let mut map = Map::new();

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        map.insert(
            Key::Str(format!("{}{}", opts.attr_prefix, key)),
            Value::from(value.into_owned()),
        );
    }

    Ok(Frame {
        name,
        map,
        text: String::new(),
        empty,
    })
}

fn close(frame: Frame, stack: &mut [Frame], root: &mut Map, opts: &XmlOptions) {
    let Frame {
        name,
        mut map,
        text,
        empty,
    } = frame;

    let value = match (map.is_empty(), text.is_empty()) {
        (true, true) if empty => Value::Null,
        (true, _) => Value::Str(text),
        (false, true) => Value::Map(map),
        (false, false) => {
            map.insert(Key::Str(opts.text_key.clone()), Value::Str(text));
            Value::Map(map)
        }
    };

    let parent = match stack.last_mut() {
        Some(top) => &mut top.map,
        None => root,
    };

    let key = Key::Str(name);
    let forced = key.str().map_or(false, |n| opts.force_list.contains(n));

    match parent.get_mut(&key) {
        Some(Value::Seq(seq)) => seq.push(value),
        Some(prev) => {
            let first = std::mem::take(prev);
            *prev = Value::Seq(vec![first, value]);
        }
        None if forced => {
            parent.insert(key, Value::Seq(vec![value]));
        }
        None => {
            parent.insert(key, value);
        }
    }
}
