// src/editor/entries.rs
//! Single-entry edits: lights, particles, entities, doors, walls, sectors
//! and the map root.

use log::debug;
use serde_json::{json, Map, Value};

use super::commands::TargetRef;
use super::errors::MapEditError;
use super::selection::SelectionEffect;
use crate::config::EditorConfig;
use crate::map::{
    door, sector, DOORS, ENTITIES, LIGHTS, PARTICLES, PLAYER_START, SECTORS, STRUCTURAL_KEYS, VERTICES, WALLS,
};
use crate::utils::geometry::Point2D;
use crate::utils::json::{field_f64, field_int, is_primitive, number_value, strict_int};

/// `update-fields` value that removes a key.
pub const UNSET_SENTINEL: &str = "map-edit/unset";

pub fn is_unset(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|o| o.len() == 1 && o.get("kind").and_then(Value::as_str) == Some(UNSET_SENTINEL))
}

fn collection_key(target: &TargetRef) -> Option<&'static str> {
    match target {
        TargetRef::Light { .. } => Some(LIGHTS),
        TargetRef::Particle { .. } => Some(PARTICLES),
        TargetRef::Entity { .. } => Some(ENTITIES),
        TargetRef::Wall { .. } => Some(WALLS),
        TargetRef::Door { .. } => Some(DOORS),
        TargetRef::Sector { .. } => Some(SECTORS),
        TargetRef::Map => None,
    }
}

/// An existing top-level array.
pub(crate) fn array_mut<'a>(
    root: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Vec<Value>, MapEditError> {
    match root.get_mut(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(MapEditError::InvalidJson(format!("'{}' is not an array", key))),
        None => Err(MapEditError::NotFound(format!("map has no '{}'", key))),
    }
}

/// A top-level array, created empty when missing.
pub(crate) fn ensure_array<'a>(
    root: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Vec<Value>, MapEditError> {
    let slot = root
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    slot.as_array_mut()
        .ok_or_else(|| MapEditError::InvalidJson(format!("'{}' is not an array", key)))
}

fn position_of(items: &[Value], target: &TargetRef) -> Option<usize> {
    match target {
        TargetRef::Door { id } => items.iter().position(|d| door::door_id(d) == Some(id.as_str())),
        TargetRef::Sector { id } => items.iter().position(|s| sector::sector_id(s) == Some(*id)),
        other => other.index().filter(|&i| i < items.len()),
    }
}

fn entry_mut<'a>(
    root: &'a mut Map<String, Value>,
    target: &TargetRef,
) -> Result<&'a mut Map<String, Value>, MapEditError> {
    let key = collection_key(target)
        .ok_or_else(|| MapEditError::UnsupportedTarget(target.to_string()))?;
    let items = array_mut(root, key)?;
    let index = position_of(items, target).ok_or_else(|| MapEditError::NotFound(target.to_string()))?;
    items[index]
        .as_object_mut()
        .ok_or_else(|| MapEditError::InvalidJson(format!("{} is not an object", target)))
}

pub(crate) fn delete(root: &mut Map<String, Value>, target: &TargetRef) -> Result<SelectionEffect, MapEditError> {
    match target {
        TargetRef::Light { .. } | TargetRef::Particle { .. } | TargetRef::Entity { .. } | TargetRef::Door { .. } => {}
        other => return Err(MapEditError::UnsupportedTarget(format!("cannot delete {}", other.kind_name()))),
    }
    let key = collection_key(target).ok_or_else(|| MapEditError::UnsupportedTarget(target.to_string()))?;
    let items = array_mut(root, key)?;
    let index = position_of(items, target).ok_or_else(|| MapEditError::NotFound(target.to_string()))?;
    items.remove(index);
    debug!("Deleted {}", target);
    Ok(SelectionEffect::deleted())
}

pub(crate) fn clone(
    root: &mut Map<String, Value>,
    config: &EditorConfig,
    target: &TargetRef,
) -> Result<SelectionEffect, MapEditError> {
    match target {
        TargetRef::Light { index } | TargetRef::Particle { index } | TargetRef::Entity { index } => {
            let key = collection_key(target).ok_or_else(|| MapEditError::UnsupportedTarget(target.to_string()))?;
            let items = array_mut(root, key)?;
            let source = items
                .get(*index)
                .ok_or_else(|| MapEditError::NotFound(target.to_string()))?
                .as_object()
                .ok_or_else(|| MapEditError::InvalidJson(format!("{} is not an object", target)))?;
            let (x, y) = match (field_f64(source, "x"), field_f64(source, "y")) {
                (Some(x), Some(y)) => (x, y),
                _ => return Err(MapEditError::InvalidJson(format!("{} has no finite x/y", target))),
            };
            let mut copy = source.clone();
            copy.insert("x".into(), number_value(x + config.clone_offset));
            copy.insert("y".into(), number_value(y + config.clone_offset));
            items.push(Value::Object(copy));

            let new_index = items.len() - 1;
            let new_ref = match target {
                TargetRef::Light { .. } => TargetRef::Light { index: new_index },
                TargetRef::Particle { .. } => TargetRef::Particle { index: new_index },
                _ => TargetRef::Entity { index: new_index },
            };
            debug!("Cloned {} as {}", target, new_ref);
            Ok(SelectionEffect::set(new_ref))
        }
        TargetRef::Door { id } => {
            if id.trim().is_empty() {
                return Err(MapEditError::InvalidRequest("door id must be non-empty".into()));
            }
            let doors = array_mut(root, DOORS)?;
            let index = position_of(doors, target).ok_or_else(|| MapEditError::NotFound(target.to_string()))?;
            let mut copy = doors[index]
                .as_object()
                .cloned()
                .ok_or_else(|| MapEditError::InvalidJson(format!("{} is not an object", target)))?;
            let new_id = door::clone_door_id(doors, id);
            copy.insert("id".into(), Value::from(new_id.clone()));
            doors.push(Value::Object(copy));
            debug!("Cloned door '{}' as '{}'", id, new_id);
            Ok(SelectionEffect::set(TargetRef::Door { id: new_id }))
        }
        other => Err(MapEditError::UnsupportedTarget(format!("cannot clone {}", other.kind_name()))),
    }
}

pub(crate) fn create_door(root: &mut Map<String, Value>, wall_index: usize) -> Result<SelectionEffect, MapEditError> {
    {
        let walls = array_mut(root, WALLS)?;
        let wall = walls
            .get(wall_index)
            .ok_or_else(|| MapEditError::NotFound(format!("wall {}", wall_index)))?;
        let back = wall.get("back_sector").and_then(strict_int);
        if !back.is_some_and(|b| b > -1) {
            return Err(MapEditError::NotAPortal { wall_index });
        }
    }

    let doors = ensure_array(root, DOORS)?;
    if let Some(door_id) = door::door_on_wall(doors, wall_index) {
        return Err(MapEditError::DoorAlreadyExists { wall_index, door_id });
    }
    let id = door::next_door_id(doors);
    doors.push(door::new_door_json(&id, wall_index));
    debug!("Created door '{}' on wall {}", id, wall_index);
    Ok(SelectionEffect::set(TargetRef::Door { id }))
}

pub(crate) fn set_sector_wall_tex(
    root: &mut Map<String, Value>,
    sector_id: i64,
    tex: &str,
) -> Result<SelectionEffect, MapEditError> {
    if sector_id < 0 {
        return Err(MapEditError::InvalidRequest(format!("sector id must be non-negative, got {}", sector_id)));
    }
    if tex.trim().is_empty() {
        return Err(MapEditError::InvalidRequest("texture name must not be blank".into()));
    }
    let walls = match root.get_mut(WALLS) {
        None => return Ok(SelectionEffect::Keep),
        Some(Value::Array(walls)) => walls,
        Some(_) => return Err(MapEditError::InvalidJson("'walls' is not an array".into())),
    };

    let mut updated = 0;
    for wall in walls.iter_mut().filter_map(Value::as_object_mut) {
        if field_int(wall, "front_sector") == Some(sector_id) {
            wall.insert("tex".into(), Value::from(tex));
            updated += 1;
        }
    }
    debug!("Set tex '{}' on {} walls of sector {}", tex, updated, sector_id);
    Ok(SelectionEffect::Keep)
}

pub(crate) fn set_player_start(
    root: &mut Map<String, Value>,
    x: f64,
    y: f64,
    angle_deg: f64,
) -> Result<SelectionEffect, MapEditError> {
    if !(x.is_finite() && y.is_finite() && angle_deg.is_finite()) {
        return Err(MapEditError::InvalidRequest("player start must be finite".into()));
    }
    root.insert(
        PLAYER_START.into(),
        json!({ "x": number_value(x), "y": number_value(y), "angle_deg": number_value(angle_deg) }),
    );
    Ok(SelectionEffect::Keep)
}

fn check_field_guards(
    root: &Map<String, Value>,
    target: &TargetRef,
    set: &Map<String, Value>,
) -> Result<(), MapEditError> {
    for (key, value) in set {
        if key.trim().is_empty() {
            return Err(MapEditError::InvalidRequest("field names must not be blank".into()));
        }
        let unset = is_unset(value);
        if !unset && !is_primitive(value) {
            return Err(MapEditError::InvalidRequest(format!(
                "field '{}' must be a string, finite number, boolean or null",
                key
            )));
        }

        match target {
            TargetRef::Map if STRUCTURAL_KEYS.contains(&key.as_str()) => {
                return Err(MapEditError::InvalidRequest(format!("'{}' cannot be edited as a field", key)));
            }
            TargetRef::Sector { id } if key == "id" => {
                if unset || strict_int(value) != Some(*id) {
                    return Err(MapEditError::InvalidRequest("sector id cannot be changed".into()));
                }
            }
            TargetRef::Door { id } if key == "id" => {
                if unset || value.as_str() != Some(id.as_str()) {
                    return Err(MapEditError::InvalidRequest("door id cannot be changed".into()));
                }
            }
            TargetRef::Wall { .. } if key == "v0" || key == "v1" => {
                let vertex_count = root.get(VERTICES).and_then(Value::as_array).map_or(0, Vec::len);
                let in_range = !unset
                    && strict_int(value)
                        .and_then(|i| usize::try_from(i).ok())
                        .is_some_and(|i| i < vertex_count);
                if !in_range {
                    return Err(MapEditError::InvalidRequest(format!(
                        "wall '{}' must be a vertex index below {}",
                        key, vertex_count
                    )));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

pub(crate) fn update_fields(
    root: &mut Map<String, Value>,
    target: &TargetRef,
    set: &Map<String, Value>,
) -> Result<SelectionEffect, MapEditError> {
    check_field_guards(root, target, set)?;

    let entry = match target {
        TargetRef::Map => root,
        other => entry_mut(root, other)?,
    };
    for (key, value) in set {
        if is_unset(value) {
            entry.remove(key);
        } else {
            entry.insert(key.clone(), value.clone());
        }
    }
    debug!("Updated {} field(s) on {}", set.len(), target);
    Ok(SelectionEffect::Keep)
}

pub(crate) fn move_to(
    root: &mut Map<String, Value>,
    target: &TargetRef,
    expected: &'static str,
    to: Point2D,
) -> Result<SelectionEffect, MapEditError> {
    if target.kind_name() != expected {
        return Err(MapEditError::UnsupportedTarget(format!(
            "expected a {} target, got {}",
            expected,
            target.kind_name()
        )));
    }
    if !to.is_finite() {
        return Err(MapEditError::InvalidRequest("destination must be finite".into()));
    }
    let entry = entry_mut(root, target)?;
    entry.insert("x".into(), number_value(to.x));
    entry.insert("y".into(), number_value(to.y));
    Ok(SelectionEffect::Keep)
}
