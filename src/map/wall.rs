// src/map/wall.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::json::field_int;

/// `back_sector` value of a wall with no neighbour.
pub const SOLID: i64 = -1;

/// The fields of a wall the engine reasons about. Every other key of the
/// wall object is carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wall {
    pub v0: usize,
    pub v1: usize,
    pub front_sector: i64,
    pub back_sector: i64,
}

impl Wall {
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Wall {
            v0: usize::try_from(field_int(object, "v0")?).ok()?,
            v1: usize::try_from(field_int(object, "v1")?).ok()?,
            front_sector: field_int(object, "front_sector")?,
            back_sector: field_int(object, "back_sector")?,
        })
    }

    pub fn is_portal(&self) -> bool {
        self.back_sector > SOLID
    }
}

/// Per-edge wall properties supplied with a stamped room.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WallProps {
    #[serde(default)]
    pub tex: String,
    #[serde(default)]
    pub end_level: bool,
    #[serde(default)]
    pub toggle_sector: bool,
    #[serde(default)]
    pub toggle_sector_id: Option<i64>,
    #[serde(default)]
    pub toggle_sector_oneshot: bool,
    #[serde(default)]
    pub toggle_sound: Option<String>,
    #[serde(default)]
    pub toggle_sound_finish: Option<String>,
}

impl WallProps {
    pub fn with_tex(tex: impl Into<String>) -> Self {
        WallProps { tex: tex.into(), ..Default::default() }
    }

    /// The non-geometric wall fields. Optional fields are only written when
    /// they differ from their defaults; `tex` is always written, even empty.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("tex".into(), Value::from(self.tex.clone()));
        if self.end_level {
            fields.insert("end_level".into(), Value::Bool(true));
        }
        if self.toggle_sector {
            fields.insert("toggle_sector".into(), Value::Bool(true));
        }
        if let Some(id) = self.toggle_sector_id {
            fields.insert("toggle_sector_id".into(), Value::from(id));
        }
        if self.toggle_sector_oneshot {
            fields.insert("toggle_sector_oneshot".into(), Value::Bool(true));
        }
        if let Some(sound) = self.toggle_sound.as_ref().filter(|s| !s.is_empty()) {
            fields.insert("toggle_sound".into(), Value::from(sound.clone()));
        }
        if let Some(sound) = self.toggle_sound_finish.as_ref().filter(|s| !s.is_empty()) {
            fields.insert("toggle_sound_finish".into(), Value::from(sound.clone()));
        }
        fields
    }
}

/// Builds a wall object from its property fields and topology.
pub fn wall_json(
    fields: &Map<String, Value>,
    v0: usize,
    v1: usize,
    front_sector: i64,
    back_sector: i64,
) -> Value {
    let mut wall = fields.clone();
    wall.insert("v0".into(), Value::from(v0));
    wall.insert("v1".into(), Value::from(v1));
    wall.insert("front_sector".into(), Value::from(front_sector));
    wall.insert("back_sector".into(), Value::from(back_sector));
    Value::Object(wall)
}
