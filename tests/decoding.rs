mod common;

use common::*;
use objser::*;

fn stamped(module: &'static str, name: &'static str) -> Map {
    let mut map = Map::new();
    map.insert_field(CLASS_KEY, ClassMeta::new(module, name).to_map());
    map
}

#[test]
fn factory_types() {
    let registry = registry();
    let hooks = Hooks::new();

    let encoded = Encoder::new(&registry, &hooks)
        .encode(&Value::new_obj(experiment()))
        .unwrap();
    let decoded = Decoder::new(&registry, &hooks).decode(&encoded).unwrap();

    assert_eq!(decoded.downcast_ref::<Experiment>(), Some(&experiment()));
}

#[test]
fn failures_are_named() {
    let registry = registry();
    let hooks = Hooks::new();
    let dec = Decoder::new(&registry, &hooks);

    assert_eq!(
        dec.decode_map(stamped("elsewhere", "Block")),
        Err(DecodeError::ModuleNotFound("elsewhere".into()))
    );
    assert_eq!(
        dec.decode_map(stamped("experiment", "Sequence")),
        Err(DecodeError::ClassNotFound(ClassMeta::new("experiment", "Sequence")))
    );

    let mut map = stamped("experiment", "Block");
    map.insert_field("name", "open");
    assert_eq!(
        dec.decode_map(map.clone()),
        Err(DecodeError::MissingField("duration".into()))
    );

    map.insert_field("duration", "long");
    assert_eq!(
        dec.decode_map(map),
        Err(DecodeError::invalid_field("duration", "a number"))
    );

    let mut map = Map::new();
    map.insert_field(CLASS_KEY, "experiment.Block");
    assert!(matches!(
        dec.decode_map(map),
        Err(DecodeError::MalformedMetadata(_))
    ));
}

#[test]
fn capability_failures() {
    #[derive(Debug, Clone, PartialEq, Default)]
    struct WriteOnly;

    impl Serializable for WriteOnly {
        fn serialize(&self) -> Map {
            Map::new()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct NoDefault(u8);

    let mut registry = Registry::new();
    registry
        .insert(Registration::<WriteOnly>::new().named("io", "WriteOnly").serializable())
        .insert(Registration::<NoDefault>::new().named("io", "NoDefault"));

    let dec_hooks = Hooks::new().on_deserialize(|x: &mut NoDefault, _: &Map| {
        x.0 = 1;
        Ok(())
    });

    let dec = Decoder::new(&registry, &dec_hooks);
    assert_eq!(
        dec.decode_map(stamped("io", "WriteOnly")),
        Err(DecodeError::NotDeserializable(ClassMeta::new("io", "WriteOnly")))
    );
    assert_eq!(
        dec.decode_map(stamped("io", "NoDefault")),
        Err(DecodeError::NotConstructible(ClassMeta::new("io", "NoDefault")))
    );
}

#[test]
fn failures_inside_sequences_propagate() {
    let registry = registry();
    let hooks = Hooks::new();

    let doc = Value::from(vec![
        Value::from(1),
        Value::new_map(vec![("inner", Value::Map(stamped("nowhere", "X")))]),
    ]);

    let err = Decoder::new(&registry, &hooks).decode(&doc).unwrap_err();
    assert_eq!(err, DecodeError::ModuleNotFound("nowhere".into()));
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn global_registry() {
    assert!(Registry::global().is_empty());
    assert!(registry::install(registry()).is_ok());
    assert!(registry::install(Registry::new()).is_err());
    assert!(Registry::global().contains::<Block>());

    let encoded = Encoder::new(Registry::global(), Hooks::shared())
        .encode(&Value::new_obj(block("x")))
        .unwrap();
    let decoded = Decoder::new(Registry::global(), Hooks::shared())
        .decode(&encoded)
        .unwrap();
    assert_eq!(decoded.downcast_ref::<Block>(), Some(&block("x")));
}
