// src/document/document.rs

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

/// A loaded map and its editing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub file_path: PathBuf,
    /// The document root. Always an object for documents the service writes.
    pub json: Value,
    pub dirty: bool,
    pub last_validation: Option<Value>,
    /// Optimistic-concurrency token; bumped by every accepted mutation.
    pub revision: u64,
}

/// The part of a document captured by history snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentState {
    pub json: Value,
    pub dirty: bool,
    pub last_validation: Option<Value>,
}

impl MapDocument {
    /// A freshly opened, clean document at revision 0.
    pub fn new(file_path: impl Into<PathBuf>, json: Value) -> Self {
        Self {
            file_path: file_path.into(),
            json,
            dirty: false,
            last_validation: None,
            revision: 0,
        }
    }

    pub fn root(&self) -> Option<&Map<String, Value>> {
        self.json.as_object()
    }

    pub fn state(&self) -> DocumentState {
        DocumentState {
            json: self.json.clone(),
            dirty: self.dirty,
            last_validation: self.last_validation.clone(),
        }
    }

    /// The next revision of this document carrying `state`.
    pub fn with_state(&self, state: DocumentState) -> Self {
        Self {
            file_path: self.file_path.clone(),
            json: state.json,
            dirty: state.dirty,
            last_validation: state.last_validation,
            revision: self.revision + 1,
        }
    }
}

/// Where the service reads and writes the current document.
pub trait DocumentStore {
    fn get(&self) -> Option<MapDocument>;
    fn set(&self, document: MapDocument);
}

/// In-process store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    slot: Arc<RwLock<Option<MapDocument>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: MapDocument) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(document))),
        }
    }

    /// Replaces whatever is loaded.
    pub fn load(&self, document: MapDocument) {
        *self.slot.write() = Some(document);
    }

    pub fn close(&self) -> Option<MapDocument> {
        self.slot.write().take()
    }

    pub fn revision(&self) -> Option<u64> {
        self.slot.read().as_ref().map(|doc| doc.revision)
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get(&self) -> Option<MapDocument> {
        self.slot.read().clone()
    }

    fn set(&self, document: MapDocument) {
        *self.slot.write() = Some(document);
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn get(&self) -> Option<MapDocument> {
        (**self).get()
    }

    fn set(&self, document: MapDocument) {
        (**self).set(document)
    }
}
