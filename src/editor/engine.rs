// src/editor/engine.rs
//! Applies commands to a working copy of the map JSON.

use log::debug;
use serde_json::{Map, Value};

use super::commands::{MapEditCommand, TargetRef, TransactionCommand};
use super::entries;
use super::errors::MapEditError;
use super::rooms;
use super::selection::{ClearReason, SelectionEffect};
use crate::config::EditorConfig;
use crate::map::{ENTITIES, LIGHTS, PARTICLES, WALLS};

/// Result of a successful `apply`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    pub next_json: Value,
    pub selection: SelectionEffect,
    pub label: Option<String>,
}

pub trait MapEditEngine {
    /// Applies `command` to a copy of `json`. The input is never modified; on
    /// error nothing of the working copy survives.
    fn apply(&self, json: &Value, command: &MapEditCommand) -> Result<ApplyOutcome, MapEditError>;
}

#[derive(Debug, Clone, Default)]
pub struct CommandEngine {
    config: EditorConfig,
}

impl CommandEngine {
    pub fn new(config: EditorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    fn apply_atomic(
        &self,
        root: &mut Map<String, Value>,
        command: &MapEditCommand,
    ) -> Result<SelectionEffect, MapEditError> {
        debug!("Applying {}", command.kind_name());
        match command {
            MapEditCommand::Delete { target } => entries::delete(root, target),
            MapEditCommand::Clone { target } => entries::clone(root, &self.config, target),
            MapEditCommand::CreateDoor { at_wall_index } => entries::create_door(root, *at_wall_index),
            MapEditCommand::CreateRoom(request) => rooms::create_room(root, &self.config, request),
            MapEditCommand::StampRoom(request) => rooms::stamp_room(root, &self.config, request),
            MapEditCommand::SetSectorWallTex { sector_id, tex } => {
                entries::set_sector_wall_tex(root, *sector_id, tex)
            }
            MapEditCommand::SetPlayerStart { x, y, angle_deg } => {
                entries::set_player_start(root, *x, *y, *angle_deg)
            }
            MapEditCommand::UpdateFields { target, set } => entries::update_fields(root, target, set),
            MapEditCommand::MoveEntity { target, to } => entries::move_to(root, target, "entity", *to),
            MapEditCommand::MoveLight { target, to } => entries::move_to(root, target, "light", *to),
            MapEditCommand::Transaction(_) => Err(MapEditError::InvalidRequest(
                "transactions cannot be nested".into(),
            )),
        }
    }

    fn apply_transaction(
        &self,
        root: &mut Map<String, Value>,
        transaction: &TransactionCommand,
    ) -> Result<SelectionEffect, MapEditError> {
        let count = transaction.commands.len();
        if count == 0 {
            return Err(MapEditError::TransactionEmpty);
        }
        let max = self.config.max_transaction_commands;
        if count > max {
            return Err(MapEditError::TransactionTooLarge { count, max });
        }

        let initial = transaction.selected().cloned();
        let mut current = initial.clone();
        let mut cleared = None;

        for (step_index, raw) in transaction.commands.iter().enumerate() {
            let step_failed = |cause| MapEditError::TransactionStepFailed {
                step_index,
                cause: Box::new(cause),
            };
            let step = MapEditCommand::from_json(raw).map_err(step_failed)?;
            let effect = self.apply_atomic(root, &step).map_err(step_failed)?;

            match (&step, effect) {
                (_, SelectionEffect::Set { target }) => {
                    current = Some(target);
                    cleared = None;
                }
                (MapEditCommand::Delete { target }, _) if current.as_ref() == Some(target) => {
                    current = None;
                    cleared = Some(ClearReason::Deleted);
                }
                (MapEditCommand::Delete { .. }, _) => {
                    if current.as_ref().is_some_and(|sel| !still_indexable(root, sel)) {
                        current = None;
                        cleared = Some(ClearReason::Invalidated);
                    }
                }
                _ => {}
            }
        }

        Ok(match (current, cleared) {
            (None, Some(reason)) => SelectionEffect::Clear { reason },
            (current, _) if current == initial => SelectionEffect::Keep,
            (Some(target), _) => SelectionEffect::Set { target },
            (None, None) => SelectionEffect::Keep,
        })
    }
}

/// False when an index-addressed selection points past the end of its array.
fn still_indexable(root: &Map<String, Value>, target: &TargetRef) -> bool {
    let key = match target {
        TargetRef::Light { .. } => LIGHTS,
        TargetRef::Particle { .. } => PARTICLES,
        TargetRef::Entity { .. } => ENTITIES,
        TargetRef::Wall { .. } => WALLS,
        _ => return true,
    };
    let len = root.get(key).and_then(Value::as_array).map_or(0, Vec::len);
    target.index().is_some_and(|i| i < len)
}

impl MapEditEngine for CommandEngine {
    fn apply(&self, json: &Value, command: &MapEditCommand) -> Result<ApplyOutcome, MapEditError> {
        let mut next_json = json.clone();
        let root = next_json
            .as_object_mut()
            .ok_or_else(|| MapEditError::InvalidJson("map root must be an object".into()))?;

        let selection = match command {
            MapEditCommand::Transaction(transaction) => self.apply_transaction(root, transaction)?,
            other => self.apply_atomic(root, other)?,
        };

        Ok(ApplyOutcome {
            next_json,
            selection,
            label: Some(command.label()),
        })
    }
}
