// src/editor/mod.rs

pub mod commands;
pub mod core;
pub mod engine;
mod entries;
pub mod errors;
pub mod history;
mod rooms;
pub mod selection;

pub use self::commands::{
    CreateRoomRequest, MapEditCommand, RoomDefaults, RoomPlacement, StampRoomRequest, TargetRef,
    TransactionCommand, TransactionSelection,
};
pub use self::core::{
    response_json, EditRequest, EditService, EditValue, EditValueKind, HistoryRequest,
};
pub use self::engine::{ApplyOutcome, CommandEngine, MapEditEngine};
pub use self::errors::{MapEditError, RoomErrorCode, RoomOp};
pub use self::history::{EditHistory, HistoryEntry, HistoryStatus, HistoryStep};
pub use self::selection::{ClearReason, SelectionEffect};
