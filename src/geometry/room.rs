// src/geometry/room.rs
use serde::{Deserialize, Serialize};

use crate::utils::geometry::Point2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomTemplate {
    Rectangle,
    /// Uses `size.width` for both sides.
    Square,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomSize {
    pub width: f64,
    pub height: f64,
}

/// Builds the outline of a template room centred on `center`.
///
/// Points are counter-clockwise (positive area), so walls built from
/// consecutive points have the room on their front side. Rotation is in
/// quarter turns about the centre; values above 3 wrap.
pub fn compute_room_polygon(
    template: RoomTemplate,
    center: Point2D,
    size: RoomSize,
    rotation_quarter_turns: u8,
) -> Vec<Point2D> {
    let (hw, hh) = match template {
        RoomTemplate::Square => (size.width / 2.0, size.width / 2.0),
        RoomTemplate::Rectangle | RoomTemplate::Triangle => (size.width / 2.0, size.height / 2.0),
    };

    let offsets: Vec<(f64, f64)> = match template {
        RoomTemplate::Rectangle | RoomTemplate::Square => {
            vec![(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
        }
        RoomTemplate::Triangle => vec![(-hw, -hh), (hw, -hh), (0.0, hh)],
    };

    let turns = rotation_quarter_turns % 4;
    offsets
        .into_iter()
        .map(|(dx, dy)| {
            let (dx, dy) = (0..turns).fold((dx, dy), |(x, y), _| (-y, x));
            Point2D::new(center.x + dx, center.y + dy)
        })
        .collect()
}

/// Shoelace area; positive for counter-clockwise outlines.
pub fn signed_area(polygon: &[Point2D]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn size(width: f64, height: f64) -> RoomSize {
        RoomSize { width, height }
    }

    #[test]
    fn test_rectangle_outline() {
        let poly = compute_room_polygon(RoomTemplate::Rectangle, Point2D::new(5.0, 5.0), size(4.0, 2.0), 0);
        assert_eq!(
            poly,
            vec![
                Point2D::new(3.0, 4.0),
                Point2D::new(7.0, 4.0),
                Point2D::new(7.0, 6.0),
                Point2D::new(3.0, 6.0),
            ]
        );
        assert_approx_eq!(signed_area(&poly), 8.0);
    }

    #[test]
    fn test_square_ignores_height() {
        let poly = compute_room_polygon(RoomTemplate::Square, Point2D::new(0.0, 0.0), size(4.0, 10.0), 0);
        assert_approx_eq!(signed_area(&poly), 16.0);
    }

    #[test]
    fn test_triangle_has_three_points() {
        let poly = compute_room_polygon(RoomTemplate::Triangle, Point2D::new(0.0, 0.0), size(4.0, 4.0), 0);
        assert_eq!(poly.len(), 3);
        assert_approx_eq!(signed_area(&poly), 8.0);
    }

    #[test]
    fn test_quarter_turn_swaps_extent_and_keeps_winding() {
        let poly = compute_room_polygon(RoomTemplate::Rectangle, Point2D::new(0.0, 0.0), size(4.0, 2.0), 1);
        let max_x = poly.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        let max_y = poly.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert_approx_eq!(max_x, 1.0);
        assert_approx_eq!(max_y, 2.0);
        assert!(signed_area(&poly) > 0.0);

        for turns in 0..4 {
            let poly = compute_room_polygon(RoomTemplate::Triangle, Point2D::new(3.0, -2.0), size(6.0, 2.0), turns);
            assert_approx_eq!(signed_area(&poly), 6.0);
        }
    }
}
