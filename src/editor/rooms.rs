// src/editor/rooms.rs
//! `create-room` and `stamp-room`: building a sector and its boundary walls
//! from a polygon, placed as a seed, nested inside a sector, or adjacent to
//! a solid wall.

use log::debug;
use serde_json::{Map, Value};

use super::commands::{CreateRoomRequest, RoomPlacement, StampRoomRequest, TargetRef};
use super::entries::ensure_array;
use super::errors::{MapEditError, RoomErrorCode, RoomOp};
use super::selection::SelectionEffect;
use crate::config::EditorConfig;
use crate::geometry::{
    compute_adjacent_portal_plan, compute_room_polygon, does_polygon_intersect_walls,
    edge_faces_back_side, find_enclosing_sector_id_for_polygon, find_snap_target, signed_area,
    snap_polygon_to_wall, AdjacentPortalPlan, MapGeometry, PortalPlanError, RoomTemplate,
    WallIntersectionQuery,
};
use crate::map::vertex::find_or_add_vertex;
use crate::map::wall::wall_json;
use crate::map::{door, sector, SectorProps, Wall, WallProps, DOORS, SECTORS, SOLID, VERTICES, WALLS};
use crate::utils::geometry::Point2D;

/// A room ready for placement: outline, per-edge wall fields and sector fields.
struct RoomPlan {
    op: RoomOp,
    polygon: Vec<Point2D>,
    edge_fields: Vec<Map<String, Value>>,
    sector: SectorProps,
}

impl RoomPlan {
    fn fail(&self, code: RoomErrorCode, message: impl Into<String>) -> MapEditError {
        MapEditError::room(self.op, code, message)
    }
}

fn non_blank(tex: &Option<String>) -> Option<&str> {
    tex.as_deref().filter(|t| !t.trim().is_empty())
}

pub(crate) fn create_room(
    root: &mut Map<String, Value>,
    config: &EditorConfig,
    request: &CreateRoomRequest,
) -> Result<SelectionEffect, MapEditError> {
    let op = RoomOp::CreateRoom;
    if request.rotation_quarter_turns > 3 {
        return Err(MapEditError::room(op, RoomErrorCode::InvalidRequest, "rotation must be 0-3 quarter turns"));
    }
    if !request.center.is_finite() {
        return Err(MapEditError::room(op, RoomErrorCode::InvalidRequest, "center must be finite"));
    }

    let size = request.size;
    let size_ok = |v: f64| v.is_finite() && v >= 1.0;
    let size_valid = match request.template {
        RoomTemplate::Square => size_ok(size.width),
        RoomTemplate::Rectangle | RoomTemplate::Triangle => size_ok(size.width) && size_ok(size.height),
    };
    if !size_valid {
        return Err(MapEditError::room(op, RoomErrorCode::InvalidSize, "room size must be at least 1x1"));
    }

    let defaults = &request.defaults;
    if !(defaults.floor_z.is_finite() && defaults.ceil_z.is_finite() && defaults.light.is_finite()) {
        return Err(MapEditError::room(op, RoomErrorCode::InvalidRequest, "room defaults must be finite"));
    }
    let (wall_tex, floor_tex, ceil_tex) = match (
        non_blank(&defaults.wall_tex),
        non_blank(&defaults.floor_tex),
        non_blank(&defaults.ceil_tex),
    ) {
        (Some(w), Some(f), Some(c)) => (w, f, c),
        _ => {
            return Err(MapEditError::room(
                op,
                RoomErrorCode::NotEnoughTextures,
                "wall, floor and ceiling textures are required",
            ))
        }
    };

    let polygon = compute_room_polygon(
        request.template,
        request.center,
        size,
        request.rotation_quarter_turns,
    );
    let edge_fields = vec![WallProps::with_tex(wall_tex).to_fields(); polygon.len()];
    let plan = RoomPlan {
        op,
        polygon,
        edge_fields,
        sector: SectorProps {
            floor_z: defaults.floor_z,
            ceil_z: defaults.ceil_z,
            floor_tex: floor_tex.to_string(),
            ceil_tex: ceil_tex.to_string(),
            light: defaults.light,
            floor_z_toggled_pos: None,
        },
    };
    place_room(root, config, plan, &request.placement)
}

pub(crate) fn stamp_room(
    root: &mut Map<String, Value>,
    config: &EditorConfig,
    request: &StampRoomRequest,
) -> Result<SelectionEffect, MapEditError> {
    let op = RoomOp::StampRoom;
    let invalid = |message: &str| MapEditError::room(op, RoomErrorCode::InvalidRequest, message);

    let n = request.polygon.len();
    if n < 3 {
        return Err(invalid("polygon needs at least 3 points"));
    }
    if !request.polygon.iter().all(Point2D::is_finite) {
        return Err(invalid("polygon points must be finite"));
    }
    if request.wall_props.len() != n {
        return Err(invalid("wallProps must have one entry per polygon edge"));
    }
    if !request.sector_props.is_finite() {
        return Err(invalid("sectorProps must be finite"));
    }

    let area = signed_area(&request.polygon);
    if area.abs() <= config.epsilon {
        return Err(invalid("polygon has no area"));
    }

    let (polygon, props): (Vec<Point2D>, Vec<&WallProps>) = if area < 0.0 {
        // Reversed edge j runs over original edge n-2-j.
        let polygon = request.polygon.iter().rev().copied().collect();
        let props = (0..n).map(|j| &request.wall_props[(2 * n - 2 - j) % n]).collect();
        (polygon, props)
    } else {
        (request.polygon.clone(), request.wall_props.iter().collect())
    };

    let plan = RoomPlan {
        op,
        polygon,
        edge_fields: props.into_iter().map(WallProps::to_fields).collect(),
        sector: request.sector_props.clone(),
    };
    place_room(root, config, plan, &request.placement)
}

fn array_len(root: &Map<String, Value>, key: &str) -> usize {
    root.get(key).and_then(Value::as_array).map_or(0, Vec::len)
}

fn place_room(
    root: &mut Map<String, Value>,
    config: &EditorConfig,
    plan: RoomPlan,
    placement: &RoomPlacement,
) -> Result<SelectionEffect, MapEditError> {
    let new_id = root
        .get(SECTORS)
        .and_then(Value::as_array)
        .map_or(0, |sectors| sector::next_sector_id(sectors));
    let geometry = MapGeometry::from_root(root).with_epsilon(config.epsilon);

    let plan = match placement {
        RoomPlacement::Seed => {
            if array_len(root, SECTORS) > 0 || array_len(root, WALLS) > 0 {
                return Err(plan.fail(
                    RoomErrorCode::InvalidRequest,
                    "seed placement needs a map without sectors or walls",
                ));
            }
            write_closed_room(root, config, &plan, new_id, SOLID)?;
            plan
        }
        RoomPlacement::Nested { enclosing_sector_id } => {
            let found = find_enclosing_sector_id_for_polygon(&geometry, &plan.polygon);
            if found != Some(*enclosing_sector_id) {
                return Err(plan.fail(
                    RoomErrorCode::NotInsideAnySector,
                    format!("room is not inside sector {}", enclosing_sector_id),
                ));
            }
            let query = WallIntersectionQuery {
                geometry: &geometry,
                polygon: &plan.polygon,
                ignored_wall_indices: &[],
                allow_endpoint_touch: false,
            };
            if does_polygon_intersect_walls(&query) {
                return Err(plan.fail(RoomErrorCode::IntersectsWalls, "room crosses existing walls"));
            }
            write_closed_room(root, config, &plan, new_id, *enclosing_sector_id)?;
            plan
        }
        RoomPlacement::Adjacent { target_wall_index, snap_distance_px } => {
            let (plan, portal, target_index, target_wall) =
                plan_adjacent(root, config, &geometry, plan, *target_wall_index, *snap_distance_px)?;
            write_adjacent_room(root, config, &plan, &portal, new_id, target_index, target_wall)?;
            plan
        }
    };

    ensure_array(root, SECTORS)?.push(plan.sector.to_sector_json(new_id));
    debug!("Placed {} as sector {} ({:?})", plan.op.as_str(), new_id, placement);
    Ok(SelectionEffect::set(TargetRef::Sector { id: new_id }))
}

fn plan_adjacent(
    root: &Map<String, Value>,
    config: &EditorConfig,
    geometry: &MapGeometry,
    mut plan: RoomPlan,
    target_wall_index: Option<usize>,
    snap_distance: f64,
) -> Result<(RoomPlan, AdjacentPortalPlan, usize, Wall), MapEditError> {
    if !(snap_distance.is_finite() && snap_distance >= 0.0) {
        return Err(plan.fail(RoomErrorCode::InvalidRequest, "snapDistancePx must be a non-negative number"));
    }
    if snap_distance > config.max_adjacent_snap_distance {
        return Err(plan.fail(
            RoomErrorCode::AdjacentTooFar,
            format!(
                "snap distance {} exceeds {}",
                snap_distance, config.max_adjacent_snap_distance
            ),
        ));
    }

    let doors = root
        .get(DOORS)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let has_door = |index: usize| door::door_on_wall(doors, index).is_some();

    let target_index = match (plan.op, target_wall_index) {
        (RoomOp::StampRoom, Some(index)) => {
            if let Some(snapped) = snap_polygon_to_wall(geometry, &plan.polygon, index, snap_distance) {
                plan.polygon = snapped;
            }
            index
        }
        (RoomOp::CreateRoom, Some(index)) => index,
        (RoomOp::StampRoom, None) => {
            let (index, snapped) =
                find_snap_target(geometry, &plan.polygon, snap_distance, |i, w| !w.is_portal() && !has_door(i))
                    .ok_or_else(|| plan.fail(RoomErrorCode::NoSnapTarget, "no solid wall within snap distance"))?;
            plan.polygon = snapped;
            index
        }
        (RoomOp::CreateRoom, None) => {
            return Err(plan.fail(RoomErrorCode::InvalidRequest, "adjacent placement needs targetWallIndex"));
        }
    };

    let target_wall = geometry
        .wall(target_index)
        .ok_or_else(|| plan.fail(RoomErrorCode::InvalidRequest, format!("wall {} does not exist", target_index)))?;
    if target_wall.is_portal() {
        return Err(plan.fail(RoomErrorCode::InvalidRequest, format!("wall {} is not solid", target_index)));
    }
    if has_door(target_index) {
        return Err(plan.fail(RoomErrorCode::InvalidRequest, format!("wall {} has a door", target_index)));
    }
    if let Some(id) = find_enclosing_sector_id_for_polygon(geometry, &plan.polygon) {
        return Err(plan.fail(
            RoomErrorCode::InvalidRequest,
            format!("room is inside sector {}; use nested placement", id),
        ));
    }

    let portal = compute_adjacent_portal_plan(geometry, &plan.polygon, target_index).map_err(|err| match err {
        PortalPlanError::InvalidWallIndex => plan.fail(RoomErrorCode::InvalidRequest, err.to_string()),
        PortalPlanError::NonCollinear => plan.fail(RoomErrorCode::NonCollinear, err.to_string()),
    })?;

    let n = portal.snapped_polygon.len();
    let edge_start = &portal.snapped_polygon[portal.polygon_edge_index];
    let edge_end = &portal.snapped_polygon[(portal.polygon_edge_index + 1) % n];
    if !edge_faces_back_side(geometry, target_index, edge_start, edge_end) {
        return Err(plan.fail(
            RoomErrorCode::InvalidRequest,
            format!("room overlaps the front side of wall {}", target_index),
        ));
    }

    let query = WallIntersectionQuery {
        geometry,
        polygon: &portal.snapped_polygon,
        ignored_wall_indices: &[target_index],
        allow_endpoint_touch: true,
    };
    if does_polygon_intersect_walls(&query) {
        return Err(plan.fail(RoomErrorCode::IntersectsWalls, "room crosses existing walls"));
    }

    plan.polygon = portal.snapped_polygon.clone();
    Ok((plan, portal, target_index, target_wall))
}

fn add_vertices(
    root: &mut Map<String, Value>,
    points: &[Point2D],
    epsilon: f64,
) -> Result<Vec<usize>, MapEditError> {
    let vertices = ensure_array(root, VERTICES)?;
    Ok(points
        .iter()
        .map(|p| find_or_add_vertex(vertices, *p, epsilon))
        .collect())
}

fn write_closed_room(
    root: &mut Map<String, Value>,
    config: &EditorConfig,
    plan: &RoomPlan,
    new_id: i64,
    back_sector: i64,
) -> Result<(), MapEditError> {
    let indices = add_vertices(root, &plan.polygon, config.epsilon)?;
    let walls = ensure_array(root, WALLS)?;
    let n = indices.len();
    for i in 0..n {
        let (v0, v1) = (indices[i], indices[(i + 1) % n]);
        if v0 != v1 {
            walls.push(wall_json(&plan.edge_fields[i], v0, v1, new_id, back_sector));
        }
    }
    Ok(())
}

/// Splits the target wall around the portal and appends the room walls.
///
/// The target keeps its index and becomes the portal; leftovers on either
/// side are appended as solid copies, followed by the room's own walls.
fn write_adjacent_room(
    root: &mut Map<String, Value>,
    config: &EditorConfig,
    plan: &RoomPlan,
    portal: &AdjacentPortalPlan,
    new_id: i64,
    target_index: usize,
    target_wall: Wall,
) -> Result<(), MapEditError> {
    let eps = config.epsilon;
    let (pa, pb) = {
        let vertices = ensure_array(root, VERTICES)?;
        (
            find_or_add_vertex(vertices, portal.portal_a, eps),
            find_or_add_vertex(vertices, portal.portal_b, eps),
        )
    };
    let indices = add_vertices(root, &plan.polygon, eps)?;

    let walls = ensure_array(root, WALLS)?;
    let original = walls
        .get(target_index)
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| MapEditError::InvalidJson(format!("wall {} is not an object", target_index)))?;

    let leftovers = [(target_wall.v0, pa), (pb, target_wall.v1)];
    for (v0, v1) in leftovers.into_iter().filter(|(a, b)| a != b) {
        walls.push(wall_json(&original, v0, v1, target_wall.front_sector, target_wall.back_sector));
    }
    walls[target_index] = wall_json(&original, pa, pb, target_wall.front_sector, new_id);

    let n = indices.len();
    let k = portal.polygon_edge_index;
    for i in 0..n {
        let (start, end) = (indices[i], indices[(i + 1) % n]);
        let fields = &plan.edge_fields[i];
        if i != k {
            if start != end {
                walls.push(wall_json(fields, start, end, new_id, SOLID));
            }
            continue;
        }

        let edge_start = plan.polygon[i];
        let (near, far) = if edge_start.distance_to(&portal.portal_a) <= edge_start.distance_to(&portal.portal_b) {
            (pa, pb)
        } else {
            (pb, pa)
        };
        let segments = [
            (start, near, SOLID),
            (near, far, target_wall.front_sector),
            (far, end, SOLID),
        ];
        for (v0, v1, back) in segments {
            if v0 != v1 {
                walls.push(wall_json(fields, v0, v1, new_id, back));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::fixtures::square_map;
    use serde_json::json;

    fn root(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn room(center: (f64, f64), size: (f64, f64), placement: Value) -> CreateRoomRequest {
        serde_json::from_value(json!({
            "template": "rectangle",
            "center": {"x": center.0, "y": center.1},
            "size": {"width": size.0, "height": size.1},
            "rotationQuarterTurns": 0,
            "defaults": {
                "floor_z": 0, "ceil_z": 4, "light": 1,
                "wall_tex": "WALL.PNG", "floor_tex": "FLOOR.PNG", "ceil_tex": "CEIL.PNG"
            },
            "placement": placement
        }))
        .unwrap()
    }

    fn create(map: &mut Map<String, Value>, request: &CreateRoomRequest) -> Result<SelectionEffect, MapEditError> {
        create_room(map, &EditorConfig::default(), request)
    }

    fn code(result: Result<SelectionEffect, MapEditError>) -> String {
        result.unwrap_err().code()
    }

    #[test]
    fn test_seed_room_on_empty_map() {
        let mut map = root(json!({"vertices": [], "sectors": [], "walls": []}));
        let effect = create(&mut map, &room((5.0, 5.0), (4.0, 4.0), json!({"kind": "seed"}))).unwrap();
        assert_eq!(effect, SelectionEffect::set(TargetRef::Sector { id: 0 }));

        assert_eq!(map["sectors"].as_array().unwrap().len(), 1);
        assert_eq!(map["sectors"][0]["id"], json!(0));
        assert_eq!(map["sectors"][0]["floor_tex"], json!("FLOOR.PNG"));
        assert_eq!(map["vertices"].as_array().unwrap().len(), 4);
        let walls = map["walls"].as_array().unwrap();
        assert_eq!(walls.len(), 4);
        for wall in walls {
            assert_eq!(wall["front_sector"], json!(0));
            assert_eq!(wall["back_sector"], json!(-1));
            assert_eq!(wall["tex"], json!("WALL.PNG"));
        }
    }

    #[test]
    fn test_seed_creates_missing_arrays() {
        let mut map = root(json!({"name": "blank"}));
        create(&mut map, &room((0.0, 0.0), (2.0, 2.0), json!({"kind": "seed"}))).unwrap();
        assert_eq!(map["walls"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_seed_requires_empty_map() {
        let mut map = root(square_map());
        let result = create(&mut map, &room((20.0, 20.0), (4.0, 4.0), json!({"kind": "seed"})));
        assert_eq!(code(result), "create-room/invalid-request");
    }

    #[test]
    fn test_request_validation() {
        let mut map = root(json!({"vertices": [], "sectors": [], "walls": []}));
        let seed = json!({"kind": "seed"});

        let mut request = room((5.0, 5.0), (0.5, 4.0), seed.clone());
        assert_eq!(code(create(&mut map, &request)), "create-room/invalid-size");

        request = room((5.0, 5.0), (4.0, 4.0), seed.clone());
        request.rotation_quarter_turns = 4;
        assert_eq!(code(create(&mut map, &request)), "create-room/invalid-request");

        request = room((5.0, 5.0), (4.0, 4.0), seed.clone());
        request.defaults.ceil_tex = Some("  ".into());
        assert_eq!(code(create(&mut map, &request)), "create-room/not-enough-textures");

        request = room((5.0, 5.0), (4.0, 4.0), seed);
        request.template = RoomTemplate::Square;
        request.size.height = 0.0;
        assert!(create(&mut map, &request).is_ok());
    }

    #[test]
    fn test_nested_room() {
        let mut map = root(square_map());
        let effect = create(
            &mut map,
            &room((5.0, 5.0), (4.0, 4.0), json!({"kind": "nested", "enclosingSectorId": 1})),
        )
        .unwrap();
        assert_eq!(effect, SelectionEffect::set(TargetRef::Sector { id: 2 }));
        let walls = map["walls"].as_array().unwrap();
        assert_eq!(walls.len(), 8);
        for wall in &walls[4..] {
            assert_eq!(wall["front_sector"], json!(2));
            assert_eq!(wall["back_sector"], json!(1));
        }
    }

    #[test]
    fn test_nested_rejections() {
        let mut map = root(square_map());
        let wrong_id = room((5.0, 5.0), (4.0, 4.0), json!({"kind": "nested", "enclosingSectorId": 3}));
        assert_eq!(code(create(&mut map, &wrong_id)), "create-room/not-inside-any-sector");

        let outside = room((9.0, 5.0), (4.0, 4.0), json!({"kind": "nested", "enclosingSectorId": 1}));
        assert_eq!(code(create(&mut map, &outside)), "create-room/not-inside-any-sector");

        // A small sector straddling y = 2 inside sector 1.
        let vertices = map["vertices"].as_array_mut().unwrap();
        for (x, y) in [(4, 1), (6, 1), (6, 3), (4, 3)] {
            vertices.push(json!({"x": x, "y": y}));
        }
        map["sectors"].as_array_mut().unwrap().push(json!({"id": 5}));
        let walls = map["walls"].as_array_mut().unwrap();
        for (v0, v1) in [(4, 5), (5, 6), (6, 7), (7, 4)] {
            walls.push(json!({"v0": v0, "v1": v1, "front_sector": 5, "back_sector": 1}));
        }
        let crossing = room((5.0, 5.0), (6.0, 6.0), json!({"kind": "nested", "enclosingSectorId": 1}));
        assert_eq!(code(create(&mut map, &crossing)), "create-room/intersects-walls");
    }

    #[test]
    fn test_adjacent_room_under_bottom_wall() {
        let mut map = root(square_map());
        let before = map["walls"].clone();
        let request = room(
            (5.0, -2.0),
            (4.0, 4.0),
            json!({"kind": "adjacent", "targetWallIndex": 0, "snapDistancePx": 10}),
        );
        let effect = create(&mut map, &request).unwrap();
        assert_eq!(effect, SelectionEffect::set(TargetRef::Sector { id: 2 }));

        let walls = map["walls"].as_array().unwrap();
        assert_eq!(walls[0]["front_sector"], json!(1));
        assert_eq!(walls[0]["back_sector"], json!(2));
        assert_eq!(walls[0]["tex"], json!("W.PNG"));
        assert_eq!(walls[1..4], before.as_array().unwrap()[1..4]);

        // Two leftovers of the split wall, then the four room walls.
        assert_eq!(walls.len(), 10);
        assert_eq!(walls[4], json!({"v0": 0, "v1": 4, "front_sector": 1, "back_sector": -1, "tex": "W.PNG"}));
        assert_eq!(walls[5], json!({"v0": 5, "v1": 1, "front_sector": 1, "back_sector": -1, "tex": "W.PNG"}));
        let portals: Vec<_> = walls
            .iter()
            .filter(|w| w["front_sector"] == json!(2) && w["back_sector"] == json!(1))
            .collect();
        assert_eq!(portals.len(), 1);
        assert_eq!(portals[0]["v0"], json!(5));
        assert_eq!(portals[0]["v1"], json!(4));

        assert_eq!(map["vertices"][4], json!({"x": 3, "y": 0}));
        assert_eq!(map["vertices"][5], json!({"x": 7, "y": 0}));
        assert_eq!(map["vertices"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_adjacent_room_spanning_whole_wall_reuses_corners() {
        let mut map = root(square_map());
        let request = room(
            (5.0, -2.0),
            (10.0, 4.0),
            json!({"kind": "adjacent", "targetWallIndex": 0, "snapDistancePx": 0}),
        );
        create(&mut map, &request).unwrap();
        let walls = map["walls"].as_array().unwrap();
        // No leftovers: the portal covers the whole wall.
        assert_eq!(walls.len(), 8);
        assert_eq!(walls[0]["v0"], json!(0));
        assert_eq!(walls[0]["v1"], json!(1));
        assert_eq!(map["vertices"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_adjacent_rejections() {
        let mut map = root(square_map());
        let adjacent = |target: Value, snap: f64| json!({"kind": "adjacent", "targetWallIndex": target, "snapDistancePx": snap});

        let far = room((5.0, -2.0), (4.0, 4.0), adjacent(json!(0), 13.0));
        assert_eq!(code(create(&mut map, &far)), "create-room/adjacent-too-far");

        let off_line = room((5.0, -5.0), (4.0, 4.0), adjacent(json!(0), 10.0));
        assert_eq!(code(create(&mut map, &off_line)), "create-room/non-collinear");

        let missing_wall = room((5.0, -2.0), (4.0, 4.0), adjacent(json!(9), 10.0));
        assert_eq!(code(create(&mut map, &missing_wall)), "create-room/invalid-request");

        let inside = room((5.0, 2.0), (4.0, 4.0), adjacent(json!(0), 10.0));
        assert_eq!(code(create(&mut map, &inside)), "create-room/invalid-request");

        let no_target = room((5.0, -2.0), (4.0, 4.0), json!({"kind": "adjacent", "snapDistancePx": 10}));
        assert_eq!(code(create(&mut map, &no_target)), "create-room/invalid-request");

        map["walls"][0]["back_sector"] = json!(3);
        let portal = room((5.0, -2.0), (4.0, 4.0), adjacent(json!(0), 10.0));
        assert_eq!(code(create(&mut map, &portal)), "create-room/invalid-request");

        map["walls"][0]["back_sector"] = json!(-1);
        map["doors"] = json!([{"id": "door-1", "wall_index": 0}]);
        assert_eq!(code(create(&mut map, &portal)), "create-room/invalid-request");
    }

    #[test]
    fn test_adjacent_room_crossing_other_walls() {
        let mut map = root(square_map());
        // A free-standing wall below the target.
        let vertices = map["vertices"].as_array_mut().unwrap();
        vertices.push(json!({"x": 0, "y": -2}));
        vertices.push(json!({"x": 20, "y": -2}));
        map["walls"]
            .as_array_mut()
            .unwrap()
            .push(json!({"v0": 4, "v1": 5, "front_sector": 1, "back_sector": -1}));

        let request = room(
            (5.0, -2.0),
            (4.0, 4.0),
            json!({"kind": "adjacent", "targetWallIndex": 0, "snapDistancePx": 1}),
        );
        assert_eq!(code(create(&mut map, &request)), "create-room/intersects-walls");
    }

    #[test]
    fn test_adjacent_room_on_clockwise_map() {
        // Same square, walls wound clockwise: the front sector is on the right.
        let mut map = root(square_map());
        map["walls"] = json!([
            {"v0": 1, "v1": 0, "front_sector": 1, "back_sector": -1, "tex": "W.PNG"},
            {"v0": 0, "v1": 3, "front_sector": 1, "back_sector": -1, "tex": "W.PNG"},
            {"v0": 3, "v1": 2, "front_sector": 1, "back_sector": -1, "tex": "W.PNG"},
            {"v0": 2, "v1": 1, "front_sector": 1, "back_sector": -1, "tex": "W.PNG"}
        ]);
        let adjacent = json!({"kind": "adjacent", "targetWallIndex": 0, "snapDistancePx": 10});

        let inside = room((5.0, 2.0), (4.0, 4.0), adjacent.clone());
        assert_eq!(code(create(&mut map, &inside)), "create-room/invalid-request");

        let outside = room((5.0, -2.0), (4.0, 4.0), adjacent);
        create(&mut map, &outside).unwrap();
        let walls = map["walls"].as_array().unwrap();
        assert_eq!(walls[0]["front_sector"], json!(1));
        assert_eq!(walls[0]["back_sector"], json!(2));
        assert_eq!(map["vertices"][walls[0]["v0"].as_u64().unwrap() as usize], json!({"x": 7, "y": 0}));
        assert_eq!(map["vertices"][walls[0]["v1"].as_u64().unwrap() as usize], json!({"x": 3, "y": 0}));
        assert!(walls
            .iter()
            .any(|w| w["front_sector"] == json!(2) && w["back_sector"] == json!(1)));
    }

    fn stamp(polygon: Value, wall_props: Value, placement: Value) -> StampRoomRequest {
        serde_json::from_value(json!({
            "polygon": polygon,
            "wallProps": wall_props,
            "sectorProps": {
                "floor_z": 0, "ceil_z": 8, "floor_tex": "", "ceil_tex": "C.PNG",
                "light": 0.5, "floor_z_toggled_pos": 4
            },
            "placement": placement
        }))
        .unwrap()
    }

    #[test]
    fn test_stamp_clockwise_polygon_keeps_edge_props() {
        let mut map = root(json!({"vertices": [], "sectors": [], "walls": []}));
        let request = stamp(
            json!([{"x": 0, "y": 0}, {"x": 0, "y": 4}, {"x": 4, "y": 4}, {"x": 4, "y": 0}]),
            json!([
                {"tex": "A"},
                {"tex": "B", "end_level": true},
                {"tex": "C"},
                {"tex": "D", "toggle_sound": null}
            ]),
            json!({"kind": "seed"}),
        );
        stamp_room(&mut map, &EditorConfig::default(), &request).unwrap();

        assert_eq!(map["vertices"][0], json!({"x": 4, "y": 0}));
        let walls = map["walls"].as_array().unwrap();
        assert_eq!(walls[0], json!({"v0": 0, "v1": 1, "front_sector": 0, "back_sector": -1, "tex": "C"}));
        assert_eq!(walls[1]["tex"], json!("B"));
        assert_eq!(walls[1]["end_level"], json!(true));
        assert_eq!(walls[2]["tex"], json!("A"));
        assert_eq!(walls[3], json!({"v0": 3, "v1": 0, "front_sector": 0, "back_sector": -1, "tex": "D"}));
        assert_eq!(
            map["sectors"][0],
            json!({
                "id": 0, "floor_z": 0, "ceil_z": 8, "floor_tex": "", "ceil_tex": "C.PNG",
                "light": 0.5, "floor_z_toggled_pos": 4
            })
        );
    }

    #[test]
    fn test_stamp_validation() {
        let mut map = root(json!({"vertices": [], "sectors": [], "walls": []}));
        let config = EditorConfig::default();
        let square = json!([{"x": 0, "y": 0}, {"x": 4, "y": 0}, {"x": 4, "y": 4}, {"x": 0, "y": 4}]);

        let short_props = stamp(square.clone(), json!([{"tex": "A"}]), json!({"kind": "seed"}));
        assert_eq!(code(stamp_room(&mut map, &config, &short_props)), "stamp-room/invalid-request");

        let line = json!([{"x": 0, "y": 0}, {"x": 4, "y": 0}, {"x": 8, "y": 0}]);
        let flat = stamp(line, json!([{}, {}, {}]), json!({"kind": "seed"}));
        assert_eq!(code(stamp_room(&mut map, &config, &flat)), "stamp-room/invalid-request");
    }

    #[test]
    fn test_stamp_adjacent_snaps_to_nearest_wall() {
        let mut map = root(square_map());
        let config = EditorConfig::default();
        let polygon = json!([{"x": 3, "y": -7}, {"x": 7, "y": -7}, {"x": 7, "y": -3}, {"x": 3, "y": -3}]);
        let props = json!([{"tex": "S"}, {"tex": "S"}, {"tex": "S"}, {"tex": "S"}]);

        let too_far = stamp(polygon.clone(), props.clone(), json!({"kind": "adjacent", "snapDistancePx": 2}));
        assert_eq!(code(stamp_room(&mut map, &config, &too_far)), "stamp-room/no-snap-target");

        let request = stamp(polygon, props, json!({"kind": "adjacent", "snapDistancePx": 4}));
        let effect = stamp_room(&mut map, &config, &request).unwrap();
        assert_eq!(effect, SelectionEffect::set(TargetRef::Sector { id: 2 }));
        assert_eq!(map["walls"][0]["back_sector"], json!(2));
        assert_eq!(map["vertices"][4], json!({"x": 3, "y": 0}));
        assert!(map["vertices"]
            .as_array()
            .unwrap()
            .iter()
            .any(|v| v == &json!({"x": 3, "y": -4})));
    }

    #[test]
    fn test_stamp_adjacent_with_target_translates_polygon() {
        let mut map = root(square_map());
        let request = stamp(
            json!([{"x": 12, "y": 2}, {"x": 16, "y": 2}, {"x": 16, "y": 6}, {"x": 12, "y": 6}]),
            json!([{"tex": "S"}, {"tex": "S"}, {"tex": "S"}, {"tex": "S"}]),
            json!({"kind": "adjacent", "targetWallIndex": 1, "snapDistancePx": 3}),
        );
        stamp_room(&mut map, &EditorConfig::default(), &request).unwrap();
        assert_eq!(map["walls"][1]["back_sector"], json!(2));
        assert_eq!(map["vertices"][4], json!({"x": 10, "y": 2}));
        assert_eq!(map["vertices"][5], json!({"x": 10, "y": 6}));
    }

    #[test]
    fn test_stamp_nested_room() {
        let mut map = root(square_map());
        let request = stamp(
            json!([{"x": 2, "y": 2}, {"x": 6, "y": 2}, {"x": 6, "y": 6}, {"x": 2, "y": 6}]),
            json!([{"tex": "N"}, {"tex": "N"}, {"tex": "N"}, {"tex": "N"}]),
            json!({"kind": "nested", "enclosingSectorId": 1}),
        );
        let effect = stamp_room(&mut map, &EditorConfig::default(), &request).unwrap();
        assert_eq!(effect, SelectionEffect::set(TargetRef::Sector { id: 2 }));

        let walls = map["walls"].as_array().unwrap();
        assert_eq!(walls.len(), 8);
        for wall in &walls[4..] {
            assert_eq!(wall["front_sector"], json!(2));
            assert_eq!(wall["back_sector"], json!(1));
            assert_eq!(wall["tex"], json!("N"));
        }
        assert_eq!(map["sectors"][1]["id"], json!(2));
    }

    #[test]
    fn test_stamp_adjacent_rejections() {
        let config = EditorConfig::default();
        let props = json!([{"tex": "S"}, {"tex": "S"}, {"tex": "S"}, {"tex": "S"}]);
        let adjacent = |snap: f64| json!({"kind": "adjacent", "targetWallIndex": 0, "snapDistancePx": snap});

        let mut map = root(square_map());
        let below = json!([{"x": 3, "y": -4}, {"x": 7, "y": -4}, {"x": 7, "y": 0}, {"x": 3, "y": 0}]);
        let far = stamp(below.clone(), props.clone(), adjacent(13.0));
        assert_eq!(code(stamp_room(&mut map, &config, &far)), "stamp-room/adjacent-too-far");

        // Top edge sits 5 below the wall, beyond the snap distance.
        let detached = json!([{"x": 3, "y": -9}, {"x": 7, "y": -9}, {"x": 7, "y": -5}, {"x": 3, "y": -5}]);
        let off_line = stamp(detached, props.clone(), adjacent(2.0));
        assert_eq!(code(stamp_room(&mut map, &config, &off_line)), "stamp-room/non-collinear");

        // A free-standing wall crossing the room.
        let vertices = map["vertices"].as_array_mut().unwrap();
        vertices.push(json!({"x": 0, "y": -2}));
        vertices.push(json!({"x": 20, "y": -2}));
        map["walls"]
            .as_array_mut()
            .unwrap()
            .push(json!({"v0": 4, "v1": 5, "front_sector": 1, "back_sector": -1}));
        let crossing = stamp(below, props, adjacent(0.0));
        assert_eq!(code(stamp_room(&mut map, &config, &crossing)), "stamp-room/intersects-walls");
        assert_eq!(map["walls"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_stamp_straddling_wall_snaps_outside() {
        let mut map = root(square_map());
        let request = stamp(
            json!([{"x": 3, "y": -2}, {"x": 7, "y": -2}, {"x": 7, "y": 2}, {"x": 3, "y": 2}]),
            json!([{"tex": "S"}, {"tex": "S"}, {"tex": "S"}, {"tex": "S"}]),
            json!({"kind": "adjacent", "targetWallIndex": 0, "snapDistancePx": 2}),
        );
        stamp_room(&mut map, &EditorConfig::default(), &request).unwrap();
        assert_eq!(map["walls"][0]["back_sector"], json!(2));
        assert!(map["vertices"]
            .as_array()
            .unwrap()
            .iter()
            .any(|v| v == &json!({"x": 3, "y": -4})));
    }
}
