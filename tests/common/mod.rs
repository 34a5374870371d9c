#![allow(dead_code)]

use objser::*;

/// Three fields and nothing else.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct T {
    pub b: i64,
    pub c: i64,
    pub d: i64,
}

impl T {
    pub fn new() -> Self {
        T { b: 1, c: 2, d: 3 }
    }
}

impl Serializable for T {
    fn serialize(&self) -> Map {
        let mut map = Map::new();
        map.insert_field("b", self.b);
        map.insert_field("c", self.c);
        map.insert_field("d", self.d);
        map
    }
}

impl Deserializable for T {
    fn deserialize(&mut self, map: &Map) -> Result<(), DecodeError> {
        self.b = map.req_i64("b")?;
        self.c = map.req_i64("c")?;
        self.d = map.req_i64("d")?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub name: String,
    pub duration: f64,
    pub repeats: i64,
    pub random: bool,
    pub tags: Vec<String>,
}

impl Serializable for Block {
    fn serialize(&self) -> Map {
        let mut map = Map::new();
        map.insert_field("name", self.name.as_str());
        map.insert_field("duration", self.duration);
        map.insert_field("repeats", self.repeats);
        map.insert_field("random", self.random);
        map.insert_field(
            "tags",
            self.tags.iter().map(|t| Value::from(t.as_str())).collect::<List>(),
        );
        map
    }
}

impl Deserializable for Block {
    fn deserialize(&mut self, map: &Map) -> Result<(), DecodeError> {
        self.name = map.req_str("name")?.to_string();
        self.duration = map.req_f64("duration")?;
        self.repeats = map.req_i64("repeats")?;
        self.random = map.req_bool("random")?;
        self.tags = map
            .list("tags")
            .iter()
            .map(|t| {
                t.str()
                    .map(String::from)
                    .ok_or_else(|| DecodeError::invalid_field("tags", "strings"))
            })
            .collect::<Result<_, _>>()?;
        Ok(())
    }
}

/// Holds nested objects and a plain map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub name: String,
    pub blocks: Vec<Block>,
    pub notes: Map,
}

impl Serializable for Group {
    fn serialize(&self) -> Map {
        let mut map = Map::new();
        map.insert_field("name", self.name.as_str());
        map.insert_field(
            "blocks",
            self.blocks.iter().cloned().map(Value::new_obj).collect::<List>(),
        );
        map.insert_field("notes", self.notes.clone());
        map
    }
}

impl Deserializable for Group {
    fn deserialize(&mut self, map: &Map) -> Result<(), DecodeError> {
        self.name = map.req_str("name")?.to_string();
        self.blocks = map
            .list("blocks")
            .iter()
            .map(|b| {
                b.downcast_ref::<Block>()
                    .cloned()
                    .ok_or_else(|| DecodeError::invalid_field("blocks", "Block objects"))
            })
            .collect::<Result<_, _>>()?;
        self.notes = map.get_map("notes").cloned().unwrap_or_default();
        Ok(())
    }
}

/// Rebuilt through a factory rather than in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    pub title: String,
    pub group: Group,
}

impl Serializable for Experiment {
    fn serialize(&self) -> Map {
        let mut map = Map::new();
        map.insert_field("title", self.title.as_str());
        map.insert_field("group", Value::new_obj(self.group.clone()));
        map
    }
}

impl FromMap for Experiment {
    fn from_map(map: &Map) -> Result<Self, DecodeError> {
        Ok(Experiment {
            title: map.req_str("title")?.to_string(),
            group: map.req_obj::<Group>("group")?.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
pub enum Mode {
    Raw,
    Filtered { low: f64, high: f64 },
}

/// Goes through the serde bridge.
#[derive(Debug, Clone, PartialEq, serde_derive::Serialize, serde_derive::Deserialize)]
pub struct Settings {
    pub rate: u32,
    pub channels: Vec<String>,
    pub mode: Mode,
}

pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register::<T>()
        .insert(
            Registration::<Block>::new()
                .named("experiment", "Block")
                .serializable()
                .deserializable(),
        )
        .insert(
            Registration::<Group>::new()
                .named("experiment", "Group")
                .serializable()
                .deserializable(),
        )
        .insert(
            Registration::<Experiment>::new()
                .named("experiment", "Experiment")
                .serializable()
                .from_map(),
        )
        .insert(Registration::<Settings>::new().named("experiment", "Settings").serde());
    registry
}

pub fn block(name: &str) -> Block {
    Block {
        name: name.to_string(),
        duration: 12.5,
        repeats: 3,
        random: true,
        tags: vec!["rest".to_string(), "eyes-closed".to_string()],
    }
}

pub fn group() -> Group {
    let mut notes = Map::new();
    notes.insert_field("author", "lab");
    notes.insert_field("version", "2");

    Group {
        name: "baseline".to_string(),
        blocks: vec![block("open"), block("closed")],
        notes,
    }
}

pub fn experiment() -> Experiment {
    Experiment {
        title: "alpha training".to_string(),
        group: group(),
    }
}

pub fn settings() -> Settings {
    Settings {
        rate: 500,
        channels: vec!["Fz".to_string(), "Cz".to_string(), "Pz".to_string()],
        mode: Mode::Filtered { low: 8.0, high: 12.5 },
    }
}
