// src/editor/core.rs

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::EditorConfig;
use crate::document::{DocumentState, DocumentStore, MapDocument};
use crate::editor::commands::{MapEditCommand, TargetRef};
use crate::editor::engine::{CommandEngine, MapEditEngine};
use crate::editor::errors::MapEditError;
use crate::editor::history::{EditHistory, HistoryEntry, HistoryStatus, HistoryStep};
use crate::editor::selection::SelectionEffect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    pub base_revision: u64,
    pub command: MapEditCommand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    pub base_revision: u64,
    /// Floored; anything below 1 or non-finite counts as 1.
    #[serde(default)]
    pub steps: Option<f64>,
}

impl HistoryRequest {
    pub fn single(base_revision: u64) -> Self {
        Self {
            base_revision,
            steps: None,
        }
    }

    fn step_count(&self) -> usize {
        match self.steps {
            Some(steps) if steps.is_finite() && steps >= 1.0 => steps.floor() as usize,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditValueKind {
    Applied,
    Cloned,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditValue {
    pub kind: EditValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionEffect>,
    pub history: HistoryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_ref: Option<TargetRef>,
    pub revision: u64,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Undo,
    Redo,
}

/// Applies commands to the store's document and keeps the undo history.
///
/// Every call is gated on the caller's `base_revision`: a request made
/// against an older revision is rejected before anything runs.
pub struct EditService<S: DocumentStore, E: MapEditEngine = CommandEngine> {
    store: S,
    engine: E,
    history: EditHistory,
}

impl<S: DocumentStore> EditService<S> {
    pub fn new(store: S, config: EditorConfig) -> Self {
        let history = EditHistory::new(config.history_max_depth);
        Self::with_engine(store, CommandEngine::new(config), history)
    }
}

impl<S: DocumentStore, E: MapEditEngine> EditService<S, E> {
    pub fn with_engine(store: S, engine: E, history: EditHistory) -> Self {
        Self {
            store,
            engine,
            history,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn on_map_opened(&mut self) {
        self.history.on_map_opened();
        info!("History reset for newly opened map");
    }

    pub fn set_history_depth(&mut self, depth: usize) {
        self.history.set_max_depth(depth);
        info!("History depth set to {}", depth);
    }

    pub fn edit(&mut self, request: &EditRequest) -> Result<EditValue, MapEditError> {
        let doc = self.current(request.base_revision)?;
        let command = &request.command;
        let outcome = self.engine.apply(&doc.json, command)?;

        let selection_before = match command {
            MapEditCommand::Transaction(tx) => tx
                .selected()
                .cloned()
                .map_or(SelectionEffect::Keep, SelectionEffect::set),
            MapEditCommand::Delete { target } | MapEditCommand::Clone { target } => {
                SelectionEffect::set(target.clone())
            }
            _ => SelectionEffect::Keep,
        };
        let selection_after = match command {
            MapEditCommand::Delete { .. } => SelectionEffect::deleted(),
            _ => outcome.selection,
        };

        let (kind, new_ref) = match command {
            MapEditCommand::Delete { .. } => (EditValueKind::Deleted, None),
            MapEditCommand::Clone { target } => match selection_after.target() {
                Some(created) => (EditValueKind::Cloned, Some(created.clone())),
                None => {
                    warn!("Clone of {} produced no selection", target);
                    return Err(MapEditError::InvalidJson(format!(
                        "clone of {} did not yield the new entry",
                        target
                    )));
                }
            },
            _ => (EditValueKind::Applied, None),
        };

        let after = DocumentState {
            json: outcome.next_json,
            dirty: true,
            last_validation: None,
        };
        self.history.record_edit(HistoryEntry {
            label: outcome.label,
            before: doc.state(),
            after: after.clone(),
            selection_before,
            selection_after: selection_after.clone(),
        });

        let next = doc.with_state(after);
        let revision = next.revision;
        self.store.set(next);
        info!("Applied {} (revision {})", command.kind_name(), revision);

        Ok(EditValue {
            kind,
            selection: Some(selection_after),
            history: self.history.status(),
            new_ref,
            revision,
        })
    }

    pub fn undo(&mut self, request: &HistoryRequest) -> Result<EditValue, MapEditError> {
        self.step_history(request, Direction::Undo)
    }

    pub fn redo(&mut self, request: &HistoryRequest) -> Result<EditValue, MapEditError> {
        self.step_history(request, Direction::Redo)
    }

    fn step_history(
        &mut self,
        request: &HistoryRequest,
        direction: Direction,
    ) -> Result<EditValue, MapEditError> {
        let doc = self.current(request.base_revision)?;
        let pop: fn(&mut EditHistory) -> Result<HistoryStep, MapEditError> = match direction {
            Direction::Undo => EditHistory::undo,
            Direction::Redo => EditHistory::redo,
        };

        let mut step = pop(&mut self.history)?;
        let mut taken = 1;
        for _ in 1..request.step_count() {
            match pop(&mut self.history) {
                Ok(next) => {
                    step = next;
                    taken += 1;
                }
                Err(_) => break,
            }
        }

        let next = doc.with_state(step.state);
        let revision = next.revision;
        self.store.set(next);
        info!("{:?} x{} (revision {})", direction, taken, revision);

        Ok(EditValue {
            kind: EditValueKind::Applied,
            selection: Some(step.selection),
            history: self.history.status(),
            new_ref: None,
            revision,
        })
    }

    fn current(&self, base_revision: u64) -> Result<MapDocument, MapEditError> {
        let doc = self.store.get().ok_or(MapEditError::NoDocument)?;
        if doc.revision != base_revision {
            warn!(
                "Rejected request at revision {} (current {})",
                base_revision, doc.revision
            );
            return Err(MapEditError::StaleRevision {
                current_revision: doc.revision,
            });
        }
        Ok(doc)
    }
}

/// `{ok: true, value}` or `{ok: false, error}` envelope for callers.
pub fn response_json(result: &Result<EditValue, MapEditError>) -> Value {
    match result {
        Ok(value) => json!({ "ok": true, "value": value }),
        Err(err) => json!({ "ok": false, "error": err.to_payload() }),
    }
}
