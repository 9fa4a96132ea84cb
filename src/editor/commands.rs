// src/editor/commands.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::errors::{MapEditError, RoomErrorCode, RoomOp};
use crate::geometry::{RoomSize, RoomTemplate};
use crate::map::{SectorProps, WallProps};
use crate::utils::geometry::Point2D;
use crate::utils::json::strict_int;

/// Integer fields accept `3` and `3.0` alike and reject anything else.
mod strict {
    use super::*;
    use serde::de::Error;

    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(d)?;
        strict_int(&value).ok_or_else(|| D::Error::custom(format!("expected an integer, got {}", value)))
    }

    pub fn index<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
        let n = int(d)?;
        usize::try_from(n).map_err(|_| D::Error::custom(format!("expected a non-negative index, got {}", n)))
    }

    pub fn opt_index<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => strict_int(&value)
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("expected a non-negative index, got {}", value))),
        }
    }
}

/// Reference to an editable thing in the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TargetRef {
    Light {
        #[serde(deserialize_with = "strict::index")]
        index: usize,
    },
    Particle {
        #[serde(deserialize_with = "strict::index")]
        index: usize,
    },
    Entity {
        #[serde(deserialize_with = "strict::index")]
        index: usize,
    },
    Wall {
        #[serde(deserialize_with = "strict::index")]
        index: usize,
    },
    Door { id: String },
    Sector {
        #[serde(deserialize_with = "strict::int")]
        id: i64,
    },
    Map,
}

impl TargetRef {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TargetRef::Light { .. } => "light",
            TargetRef::Particle { .. } => "particle",
            TargetRef::Entity { .. } => "entity",
            TargetRef::Wall { .. } => "wall",
            TargetRef::Door { .. } => "door",
            TargetRef::Sector { .. } => "sector",
            TargetRef::Map => "map",
        }
    }

    /// Array index for the index-addressed kinds.
    pub fn index(&self) -> Option<usize> {
        match self {
            TargetRef::Light { index }
            | TargetRef::Particle { index }
            | TargetRef::Entity { index }
            | TargetRef::Wall { index } => Some(*index),
            _ => None,
        }
    }
}

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetRef::Door { id } => write!(f, "door '{}'", id),
            TargetRef::Sector { id } => write!(f, "sector {}", id),
            TargetRef::Map => f.write_str("map"),
            other => write!(f, "{} {}", other.kind_name(), other.index().unwrap_or_default()),
        }
    }
}

/// Texture and height defaults for a template room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDefaults {
    pub floor_z: f64,
    pub ceil_z: f64,
    pub light: f64,
    #[serde(default)]
    pub wall_tex: Option<String>,
    #[serde(default)]
    pub floor_tex: Option<String>,
    #[serde(default)]
    pub ceil_tex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RoomPlacement {
    /// First room of an empty map.
    Seed,
    #[serde(rename_all = "camelCase")]
    Nested {
        #[serde(deserialize_with = "strict::int")]
        enclosing_sector_id: i64,
    },
    #[serde(rename_all = "camelCase")]
    Adjacent {
        /// Required by `create-room`. `stamp-room` searches for a wall when absent.
        #[serde(default, deserialize_with = "strict::opt_index")]
        target_wall_index: Option<usize>,
        snap_distance_px: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub template: RoomTemplate,
    pub center: Point2D,
    pub size: RoomSize,
    #[serde(default)]
    pub rotation_quarter_turns: u8,
    pub defaults: RoomDefaults,
    pub placement: RoomPlacement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampRoomRequest {
    pub polygon: Vec<Point2D>,
    /// One entry per polygon edge; edge `i` runs from point `i` to `i + 1`.
    pub wall_props: Vec<WallProps>,
    pub sector_props: SectorProps,
    pub placement: RoomPlacement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSelection {
    #[serde(rename = "ref", default)]
    pub target: Option<TargetRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCommand {
    /// Steps stay raw until the transaction runs, so a malformed step
    /// fails with its index like any other step.
    pub commands: Vec<Value>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub selection: Option<TransactionSelection>,
}

impl TransactionCommand {
    pub fn selected(&self) -> Option<&TargetRef> {
        self.selection.as_ref().and_then(|s| s.target.as_ref())
    }
}

/// Every edit the engine understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MapEditCommand {
    Delete {
        target: TargetRef,
    },
    Clone {
        target: TargetRef,
    },
    #[serde(rename_all = "camelCase")]
    CreateDoor {
        #[serde(deserialize_with = "strict::index")]
        at_wall_index: usize,
    },
    CreateRoom(CreateRoomRequest),
    StampRoom(StampRoomRequest),
    #[serde(rename_all = "camelCase")]
    SetSectorWallTex {
        #[serde(deserialize_with = "strict::int")]
        sector_id: i64,
        tex: String,
    },
    #[serde(rename_all = "camelCase")]
    SetPlayerStart {
        x: f64,
        y: f64,
        angle_deg: f64,
    },
    UpdateFields {
        target: TargetRef,
        set: Map<String, Value>,
    },
    MoveEntity {
        target: TargetRef,
        to: Point2D,
    },
    MoveLight {
        target: TargetRef,
        to: Point2D,
    },
    Transaction(TransactionCommand),
}

impl MapEditCommand {
    /// Parses a command object. Shape errors of room commands are reported
    /// under their own code family.
    pub fn from_json(value: &Value) -> Result<Self, MapEditError> {
        Self::deserialize(value).map_err(|err| {
            let message = err.to_string();
            match value.get("kind").and_then(Value::as_str) {
                Some("create-room") => MapEditError::room(RoomOp::CreateRoom, RoomErrorCode::InvalidRequest, message),
                Some("stamp-room") => MapEditError::room(RoomOp::StampRoom, RoomErrorCode::InvalidRequest, message),
                _ => MapEditError::InvalidRequest(message),
            }
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            MapEditCommand::Delete { .. } => "delete",
            MapEditCommand::Clone { .. } => "clone",
            MapEditCommand::CreateDoor { .. } => "create-door",
            MapEditCommand::CreateRoom(_) => "create-room",
            MapEditCommand::StampRoom(_) => "stamp-room",
            MapEditCommand::SetSectorWallTex { .. } => "set-sector-wall-tex",
            MapEditCommand::SetPlayerStart { .. } => "set-player-start",
            MapEditCommand::UpdateFields { .. } => "update-fields",
            MapEditCommand::MoveEntity { .. } => "move-entity",
            MapEditCommand::MoveLight { .. } => "move-light",
            MapEditCommand::Transaction(_) => "transaction",
        }
    }

    /// History label.
    pub fn label(&self) -> String {
        match self {
            MapEditCommand::Delete { target } => format!("Delete {}", target.kind_name()),
            MapEditCommand::Clone { target } => format!("Clone {}", target.kind_name()),
            MapEditCommand::CreateDoor { .. } => "Create door".into(),
            MapEditCommand::CreateRoom(_) => "Create room".into(),
            MapEditCommand::StampRoom(_) => "Stamp room".into(),
            MapEditCommand::SetSectorWallTex { .. } => "Set sector wall texture".into(),
            MapEditCommand::SetPlayerStart { .. } => "Set player start".into(),
            MapEditCommand::UpdateFields { target, .. } => format!("Edit {}", target.kind_name()),
            MapEditCommand::MoveEntity { .. } => "Move entity".into(),
            MapEditCommand::MoveLight { .. } => "Move light".into(),
            MapEditCommand::Transaction(tx) => tx
                .label
                .clone()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| "Transaction".into()),
        }
    }
}
