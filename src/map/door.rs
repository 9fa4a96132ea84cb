// src/map/door.rs
use serde_json::{json, Value};

use crate::utils::json::strict_int;

pub fn door_id(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

fn id_taken(doors: &[Value], id: &str) -> bool {
    doors.iter().any(|door| door_id(door) == Some(id))
}

/// Lowest unused `door-N`, starting at `door-1`.
pub fn next_door_id(doors: &[Value]) -> String {
    (1..)
        .map(|n| format!("door-{}", n))
        .find(|id| !id_taken(doors, id))
        .unwrap_or_else(|| format!("door-{}", doors.len() + 1))
}

/// `<id>-copy`, then `<id>-copy-2`, `<id>-copy-3`, ... until unused.
pub fn clone_door_id(doors: &[Value], source_id: &str) -> String {
    let base = format!("{}-copy", source_id);
    if !id_taken(doors, &base) {
        return base;
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|id| !id_taken(doors, id))
        .unwrap_or(base)
}

/// Id of the door bound to `wall_index`, if any.
pub fn door_on_wall(doors: &[Value], wall_index: usize) -> Option<String> {
    doors
        .iter()
        .find(|door| {
            door.get("wall_index")
                .and_then(strict_int)
                .is_some_and(|w| w == wall_index as i64)
        })
        .map(|door| door_id(door).unwrap_or_default().to_string())
}

pub fn new_door_json(id: &str, wall_index: usize) -> Value {
    json!({ "id": id, "wall_index": wall_index, "starts_closed": true })
}
