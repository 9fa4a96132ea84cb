// src/editor/history.rs

use serde::Serialize;

use crate::document::DocumentState;
use crate::editor::errors::MapEditError;
use crate::editor::selection::SelectionEffect;

pub const DEFAULT_MAX_DEPTH: usize = 100;

/// One accepted edit: the document on either side of it and how the
/// selection moved.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub label: Option<String>,
    pub before: DocumentState,
    pub after: DocumentState,
    pub selection_before: SelectionEffect,
    pub selection_after: SelectionEffect,
}

/// What an undo or redo hands back to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStep {
    pub label: Option<String>,
    pub state: DocumentState,
    pub selection: SelectionEffect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_depth: usize,
    pub redo_depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undo_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redo_label: Option<String>,
}

/// Bounded undo/redo stacks of document snapshots.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    /// 0 disables history.
    max_depth: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl EditHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Push an entry for a new edit. Any redo branch is discarded.
    pub fn record_edit(&mut self, entry: HistoryEntry) {
        if self.max_depth == 0 {
            self.clear();
            return;
        }
        self.undo_stack.push(entry);
        self.trim();
        self.redo_stack.clear();
    }

    pub fn undo(&mut self) -> Result<HistoryStep, MapEditError> {
        let entry = self
            .undo_stack
            .pop()
            .ok_or_else(|| MapEditError::NotFound("nothing to undo".into()))?;
        let step = HistoryStep {
            label: entry.label.clone(),
            state: entry.before.clone(),
            selection: entry.selection_before.clone(),
        };
        self.redo_stack.push(entry);
        Ok(step)
    }

    pub fn redo(&mut self) -> Result<HistoryStep, MapEditError> {
        let entry = self
            .redo_stack
            .pop()
            .ok_or_else(|| MapEditError::NotFound("nothing to redo".into()))?;
        let step = HistoryStep {
            label: entry.label.clone(),
            state: entry.after.clone(),
            selection: entry.selection_after.clone(),
        };
        self.undo_stack.push(entry);
        Ok(step)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// A different document was loaded; old snapshots no longer apply.
    pub fn on_map_opened(&mut self) {
        self.clear();
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
        if max_depth == 0 {
            self.clear();
        } else {
            self.trim();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().and_then(|e| e.label.as_deref())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().and_then(|e| e.label.as_deref())
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            undo_depth: self.undo_depth(),
            redo_depth: self.redo_depth(),
            undo_label: self.undo_label().map(str::to_owned),
            redo_label: self.redo_label().map(str::to_owned),
        }
    }

    // Oldest entries go first.
    fn trim(&mut self) {
        if self.undo_stack.len() > self.max_depth {
            let excess = self.undo_stack.len() - self.max_depth;
            self.undo_stack.drain(..excess);
        }
    }
}
