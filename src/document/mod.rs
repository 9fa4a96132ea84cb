// src/document/mod.rs
mod document;

pub use self::document::{DocumentState, DocumentStore, MapDocument, MemoryDocumentStore};
