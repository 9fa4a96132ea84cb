// src/lib.rs

pub mod config;
pub mod document;
pub mod editor;
pub mod geometry;
pub mod map;
pub mod utils;

pub use config::{ConfigError, EditorConfig};
pub use document::{DocumentState, DocumentStore, MapDocument, MemoryDocumentStore};
pub use editor::{
    response_json, CommandEngine, EditHistory, EditRequest, EditService, EditValue,
    HistoryRequest, MapEditCommand, MapEditEngine, MapEditError, SelectionEffect, TargetRef,
};
