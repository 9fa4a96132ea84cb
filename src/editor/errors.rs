// src/editor/errors.rs
//! Typed edit failures and their wire form.

use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomOp {
    CreateRoom,
    StampRoom,
}

impl RoomOp {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomOp::CreateRoom => "create-room",
            RoomOp::StampRoom => "stamp-room",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomErrorCode {
    InvalidRequest,
    InvalidSize,
    NotEnoughTextures,
    NotInsideAnySector,
    IntersectsWalls,
    AdjacentTooFar,
    NonCollinear,
    NoSnapTarget,
}

impl RoomErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomErrorCode::InvalidRequest => "invalid-request",
            RoomErrorCode::InvalidSize => "invalid-size",
            RoomErrorCode::NotEnoughTextures => "not-enough-textures",
            RoomErrorCode::NotInsideAnySector => "not-inside-any-sector",
            RoomErrorCode::IntersectsWalls => "intersects-walls",
            RoomErrorCode::AdjacentTooFar => "adjacent-too-far",
            RoomErrorCode::NonCollinear => "non-collinear",
            RoomErrorCode::NoSnapTarget => "no-snap-target",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapEditError {
    #[error("Invalid map JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported target: {0}")]
    UnsupportedTarget(String),

    #[error("Transaction has no commands")]
    TransactionEmpty,

    #[error("Transaction has {count} commands (max {max})")]
    TransactionTooLarge { count: usize, max: usize },

    #[error("Transaction step {step_index} failed: {cause}")]
    TransactionStepFailed { step_index: usize, cause: Box<MapEditError> },

    #[error("Stale revision (current revision is {current_revision})")]
    StaleRevision { current_revision: u64 },

    #[error("No map is open")]
    NoDocument,

    #[error("Wall {wall_index} already has door '{door_id}'")]
    DoorAlreadyExists { wall_index: usize, door_id: String },

    #[error("Wall {wall_index} is not a portal")]
    NotAPortal { wall_index: usize },

    #[error("{message}")]
    Room {
        op: RoomOp,
        code: RoomErrorCode,
        message: String,
    },
}

impl MapEditError {
    pub fn room(op: RoomOp, code: RoomErrorCode, message: impl Into<String>) -> Self {
        MapEditError::Room {
            op,
            code,
            message: message.into(),
        }
    }

    /// Stable error code, e.g. `map-edit/not-found` or `create-room/intersects-walls`.
    pub fn code(&self) -> String {
        let suffix = match self {
            MapEditError::InvalidJson(_) => "invalid-json",
            MapEditError::InvalidRequest(_) => "invalid-request",
            MapEditError::NotFound(_) => "not-found",
            MapEditError::UnsupportedTarget(_) => "unsupported-target",
            MapEditError::TransactionEmpty => "transaction-empty",
            MapEditError::TransactionTooLarge { .. } => "transaction-too-large",
            MapEditError::TransactionStepFailed { .. } => "transaction-step-failed",
            MapEditError::StaleRevision { .. } => "stale-revision",
            MapEditError::NoDocument => "no-document",
            MapEditError::DoorAlreadyExists { .. } => "door-already-exists",
            MapEditError::NotAPortal { .. } => "not-a-portal",
            MapEditError::Room { op, code, .. } => {
                return format!("{}/{}", op.as_str(), code.as_str());
            }
        };
        format!("map-edit/{}", suffix)
    }

    /// Whether resubmitting against a fresh document can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MapEditError::StaleRevision { .. })
    }

    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("kind".into(), json!("map-edit-error"));
        payload.insert("code".into(), Value::from(self.code()));
        payload.insert("message".into(), Value::from(self.to_string()));
        match self {
            MapEditError::TransactionTooLarge { count, max } => {
                payload.insert("count".into(), json!(count));
                payload.insert("max".into(), json!(max));
            }
            MapEditError::TransactionStepFailed { step_index, cause } => {
                payload.insert("stepIndex".into(), json!(step_index));
                payload.insert("cause".into(), cause.to_payload());
            }
            MapEditError::StaleRevision { current_revision } => {
                payload.insert("currentRevision".into(), json!(current_revision));
            }
            MapEditError::DoorAlreadyExists { wall_index, door_id } => {
                payload.insert("wallIndex".into(), json!(wall_index));
                payload.insert("doorId".into(), json!(door_id));
            }
            MapEditError::NotAPortal { wall_index } => {
                payload.insert("wallIndex".into(), json!(wall_index));
            }
            _ => {}
        }
        Value::Object(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(MapEditError::NotFound("light 3".into()).code(), "map-edit/not-found");
        assert_eq!(MapEditError::NoDocument.code(), "map-edit/no-document");
        assert_eq!(
            MapEditError::room(RoomOp::StampRoom, RoomErrorCode::NoSnapTarget, "x").code(),
            "stamp-room/no-snap-target"
        );
        assert_eq!(
            MapEditError::room(RoomOp::CreateRoom, RoomErrorCode::IntersectsWalls, "x").code(),
            "create-room/intersects-walls"
        );
    }

    #[test]
    fn test_step_failure_payload_nests_cause() {
        let err = MapEditError::TransactionStepFailed {
            step_index: 1,
            cause: Box::new(MapEditError::NotAPortal { wall_index: 4 }),
        };
        let payload = err.to_payload();
        assert_eq!(payload["code"], json!("map-edit/transaction-step-failed"));
        assert_eq!(payload["stepIndex"], json!(1));
        assert_eq!(payload["cause"]["code"], json!("map-edit/not-a-portal"));
        assert_eq!(payload["cause"]["wallIndex"], json!(4));
    }

    #[test]
    fn test_stale_revision_is_retryable() {
        let err = MapEditError::StaleRevision { current_revision: 7 };
        assert!(err.is_retryable());
        assert_eq!(err.to_payload()["currentRevision"], json!(7));
        assert!(!MapEditError::TransactionEmpty.is_retryable());
    }
}
