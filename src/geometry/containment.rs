// src/geometry/containment.rs
use super::MapGeometry;
use crate::utils::geometry::{Line2D, Point2D};

/// Even-odd test against an unordered set of loop segments. Points on the
/// boundary are not inside.
pub fn point_in_loop(point: &Point2D, segments: &[Line2D], epsilon: f64) -> bool {
    let mut inside = false;
    for seg in segments {
        if seg.contains_point(point, epsilon) {
            return false;
        }
        let (a, b) = (seg.start, seg.end);
        if (a.y > point.y) != (b.y > point.y) {
            let x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Shoelace area of a loop given as directed segments in any order.
/// Positive for counter-clockwise loops.
pub fn loop_signed_area(segments: &[Line2D]) -> f64 {
    let twice: f64 = segments
        .iter()
        .map(|s| s.start.x * s.end.y - s.end.x * s.start.y)
        .sum();
    twice / 2.0
}

fn loop_area(segments: &[Line2D]) -> f64 {
    loop_signed_area(segments).abs()
}

/// Id of the sector whose wall loop strictly contains every polygon vertex.
///
/// When a room sits inside a room, both loops contain the polygon; the
/// innermost (smallest) one wins. Two candidates of equal area are
/// ambiguous and yield `None`.
pub fn find_enclosing_sector_id_for_polygon(
    geometry: &MapGeometry,
    polygon: &[Point2D],
) -> Option<i64> {
    if polygon.is_empty() {
        return None;
    }
    let eps = geometry.epsilon;

    let mut candidates: Vec<(i64, f64)> = geometry
        .sector_ids
        .iter()
        .filter_map(|&id| {
            let segments = geometry.sector_loop(id);
            if segments.len() < 3 {
                return None;
            }
            polygon
                .iter()
                .all(|p| point_in_loop(p, &segments, eps))
                .then(|| (id, loop_area(&segments)))
        })
        .collect();

    candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
    match candidates.as_slice() {
        [] => None,
        [(id, _)] => Some(*id),
        [(id, smallest), (_, next), ..] => (next - smallest > eps).then_some(*id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::fixtures::square_map;
    use serde_json::json;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2D> {
        coords.iter().map(|&(x, y)| Point2D::new(x, y)).collect()
    }

    #[test]
    fn test_polygon_inside_single_sector() {
        let map = square_map();
        let geometry = MapGeometry::from_root(map.as_object().unwrap());
        let poly = pts(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0)]);
        assert_eq!(find_enclosing_sector_id_for_polygon(&geometry, &poly), Some(1));
    }

    #[test]
    fn test_polygon_partly_outside() {
        let map = square_map();
        let geometry = MapGeometry::from_root(map.as_object().unwrap());
        let poly = pts(&[(8.0, 2.0), (12.0, 2.0), (12.0, 4.0), (8.0, 4.0)]);
        assert_eq!(find_enclosing_sector_id_for_polygon(&geometry, &poly), None);
    }

    #[test]
    fn test_boundary_points_are_not_inside() {
        let map = square_map();
        let geometry = MapGeometry::from_root(map.as_object().unwrap());
        let poly = pts(&[(0.0, 2.0), (4.0, 2.0), (4.0, 4.0)]);
        assert_eq!(find_enclosing_sector_id_for_polygon(&geometry, &poly), None);
    }

    #[test]
    fn test_innermost_sector_wins() {
        let mut map = square_map();
        let root = map.as_object_mut().unwrap();
        let vertices = root["vertices"].as_array_mut().unwrap();
        for (x, y) in [(2, 2), (8, 2), (8, 8), (2, 8)] {
            vertices.push(json!({"x": x, "y": y}));
        }
        root["sectors"].as_array_mut().unwrap().push(json!({"id": 2}));
        let walls = root["walls"].as_array_mut().unwrap();
        for (v0, v1) in [(4, 5), (5, 6), (6, 7), (7, 4)] {
            walls.push(json!({"v0": v0, "v1": v1, "front_sector": 2, "back_sector": 1}));
        }

        let geometry = MapGeometry::from_root(map.as_object().unwrap());
        let inner = pts(&[(4.0, 4.0), (5.0, 4.0), (5.0, 5.0)]);
        assert_eq!(find_enclosing_sector_id_for_polygon(&geometry, &inner), Some(2));
        let ring = pts(&[(0.5, 0.5), (1.5, 0.5), (1.5, 1.5)]);
        assert_eq!(find_enclosing_sector_id_for_polygon(&geometry, &ring), Some(1));
    }

    #[test]
    fn test_overlapping_equal_sectors_are_ambiguous() {
        let mut map = square_map();
        let root = map.as_object_mut().unwrap();
        root["sectors"].as_array_mut().unwrap().push(json!({"id": 5}));
        let walls = root["walls"].as_array_mut().unwrap();
        for (v0, v1) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
            walls.push(json!({"v0": v0, "v1": v1, "front_sector": 5, "back_sector": -1}));
        }
        let geometry = MapGeometry::from_root(map.as_object().unwrap());
        let poly = pts(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0)]);
        assert_eq!(find_enclosing_sector_id_for_polygon(&geometry, &poly), None);
    }
}
