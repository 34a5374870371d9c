use objser::*;
use std::collections::BTreeMap;

#[derive(Debug, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
struct Channel {
    label: String,
    gain: f32,
    enabled: bool,
    reference: Option<String>,
}

#[derive(Debug, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
enum Filter {
    None,
    Notch(f64),
    Band(f64, f64),
    Custom { order: u8, taps: Vec<i16> },
}

#[derive(Debug, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
struct Montage {
    channels: Vec<Channel>,
    filters: BTreeMap<String, Filter>,
    offsets: (i32, u64),
}

fn montage() -> Montage {
    let mut filters = BTreeMap::new();
    filters.insert("a".to_string(), Filter::None);
    filters.insert("b".to_string(), Filter::Notch(50.0));
    filters.insert("c".to_string(), Filter::Band(1.0, 40.0));
    filters.insert(
        "d".to_string(),
        Filter::Custom {
            order: 4,
            taps: vec![-1, 2, -3],
        },
    );

    Montage {
        channels: vec![
            Channel {
                label: "Fz".into(),
                gain: 0.5,
                enabled: true,
                reference: None,
            },
            Channel {
                label: "Cz".into(),
                gain: 1.25,
                enabled: false,
                reference: Some("A1".into()),
            },
        ],
        filters,
        offsets: (-7, u64::MAX),
    }
}

#[test]
fn round_trip() {
    let value = Value::enc(&montage()).unwrap();
    assert_eq!(value.decode::<Montage>(), Ok(montage()));
}

#[test]
fn value_shape() {
    let value = bridge::to_value(&montage()).unwrap();
    let map = value.map().unwrap();

    let filters = map.get_map("filters").unwrap();
    assert_eq!(filters.get_str("a"), Some("None"));
    assert_eq!(
        filters.get_map("b").and_then(|m| m.get_num("Notch")),
        Some(Number::from(50.0))
    );
    assert_eq!(
        filters
            .get_map("c")
            .map(|m| m.list("Band").len()),
        Some(2)
    );

    let channels = map.list("channels");
    assert_eq!(channels[0].map().and_then(|c| c.field("reference")), Some(&Value::Null));
    assert_eq!(map.list("offsets").len(), 2);
}

#[test]
fn text_leaves_are_coerced() {
    let mut map = Map::new();
    map.insert_field("label", "O1");
    map.insert_field("gain", "0.75");
    map.insert_field("enabled", "False");
    map.insert_field("reference", Value::Null);

    let channel: Channel = bridge::from_map(map).unwrap();
    assert_eq!(
        channel,
        Channel {
            label: "O1".into(),
            gain: 0.75,
            enabled: false,
            reference: None,
        }
    );

    let filter: Filter = bridge::from_value(Value::new_map(vec![(
        "Custom",
        Value::new_map(vec![
            ("order", Value::from("2")),
            ("taps", Value::from(vec![Value::from("-5"), Value::from(6)])),
        ]),
    )]))
    .unwrap();
    assert_eq!(
        filter,
        Filter::Custom {
            order: 2,
            taps: vec![-5, 6]
        }
    );
}

#[test]
fn failures() {
    assert!(bridge::to_map(&5u8).is_err());
    assert!(Value::from("many").decode::<u8>().is_err());
    assert!(Value::from(300).decode::<u8>().is_err());
    assert!(Value::new_map(vec![("Unknown", Value::Null)])
        .decode::<Filter>()
        .is_err());

    let mut keyed = BTreeMap::new();
    keyed.insert(vec![1u8], 2u8);
    assert!(bridge::to_value(&keyed).is_err());
}
