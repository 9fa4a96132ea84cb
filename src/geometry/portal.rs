// src/geometry/portal.rs
//! Adjacent placement: matching a room edge against an axis-aligned wall.

use thiserror::Error;

use super::MapGeometry;
use crate::map::Wall;
use crate::utils::geometry::{Line2D, Point2D};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallOrientation {
    /// Endpoints share `y`.
    Horizontal,
    /// Endpoints share `x`.
    Vertical,
}

impl WallOrientation {
    fn along(self, p: &Point2D) -> f64 {
        match self {
            WallOrientation::Horizontal => p.x,
            WallOrientation::Vertical => p.y,
        }
    }

    fn across(self, p: &Point2D) -> f64 {
        match self {
            WallOrientation::Horizontal => p.y,
            WallOrientation::Vertical => p.x,
        }
    }

    fn point(self, along: f64, across: f64) -> Point2D {
        match self {
            WallOrientation::Horizontal => Point2D::new(along, across),
            WallOrientation::Vertical => Point2D::new(across, along),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PortalPlanError {
    #[error("invalid wall index")]
    InvalidWallIndex,
    #[error("no polygon edge is collinear with the wall")]
    NonCollinear,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdjacentPortalPlan {
    /// Edge `i` runs from point `i` to point `i + 1` (wrapping).
    pub polygon_edge_index: usize,
    pub orientation: WallOrientation,
    /// Portal endpoints on the wall line, `portal_a` nearer the wall's `v0`.
    pub portal_a: Point2D,
    pub portal_b: Point2D,
    pub snapped_polygon: Vec<Point2D>,
}

/// Orientation of an axis-aligned wall, `None` for diagonal or invalid walls.
pub fn wall_orientation(geometry: &MapGeometry, wall_index: usize) -> Option<WallOrientation> {
    let seg = geometry.wall_segment(wall_index)?;
    orientation_of(&seg, geometry.epsilon)
}

fn orientation_of(seg: &Line2D, eps: f64) -> Option<WallOrientation> {
    if seg.length() <= eps {
        None
    } else if (seg.start.y - seg.end.y).abs() <= eps {
        Some(WallOrientation::Horizontal)
    } else if (seg.start.x - seg.end.x).abs() <= eps {
        Some(WallOrientation::Vertical)
    } else {
        None
    }
}

/// Shared stretch of two along-axis spans, if longer than `eps`.
fn span_overlap(a: (f64, f64), b: (f64, f64), eps: f64) -> Option<(f64, f64)> {
    let lo = a.0.min(a.1).max(b.0.min(b.1));
    let hi = a.0.max(a.1).min(b.0.max(b.1));
    (hi - lo > eps).then_some((lo, hi))
}

/// A polygon edge parallel to a wall and sharing part of its span.
struct EdgeMatch {
    edge_index: usize,
    /// Signed offset that moves the edge onto the wall line.
    offset: f64,
    overlap: (f64, f64),
}

fn parallel_edges<'a>(
    polygon: &'a [Point2D],
    wall: &'a Line2D,
    orientation: WallOrientation,
    eps: f64,
) -> impl Iterator<Item = EdgeMatch> + 'a {
    let n = polygon.len();
    let wall_across = orientation.across(&wall.start);
    let wall_span = (orientation.along(&wall.start), orientation.along(&wall.end));
    (0..n).filter_map(move |i| {
        let (p, q) = (polygon[i], polygon[(i + 1) % n]);
        let (pc, qc) = (orientation.across(&p), orientation.across(&q));
        if (pc - qc).abs() > eps {
            return None;
        }
        let overlap = span_overlap(wall_span, (orientation.along(&p), orientation.along(&q)), eps)?;
        Some(EdgeMatch {
            edge_index: i,
            offset: wall_across - pc,
            overlap,
        })
    })
}

/// True when a counter-clockwise room edge `p -> q` lying along the wall
/// has the room's interior on the wall's back (solid) side.
pub fn edge_faces_back_side(
    geometry: &MapGeometry,
    wall_index: usize,
    p: &Point2D,
    q: &Point2D,
) -> bool {
    let Some(wall) = geometry.wall_segment(wall_index) else {
        return false;
    };
    (wall.project(q) - wall.project(p)) * geometry.back_side_sign(wall_index) < 0.0
}

fn edge_points(polygon: &[Point2D], edge_index: usize) -> (&Point2D, &Point2D) {
    (&polygon[edge_index], &polygon[(edge_index + 1) % polygon.len()])
}

/// Plans the portal between `polygon` and the target wall.
///
/// Among polygon edges lying on the wall line (within epsilon) with a
/// positive-length overlap, the first one facing the wall's back side is
/// matched, else the first one. The portal is that overlap, and the
/// matched edge is moved exactly onto the wall line in `snapped_polygon`.
pub fn compute_adjacent_portal_plan(
    geometry: &MapGeometry,
    polygon: &[Point2D],
    target_wall_index: usize,
) -> Result<AdjacentPortalPlan, PortalPlanError> {
    let eps = geometry.epsilon;
    let wall = geometry
        .wall_segment(target_wall_index)
        .ok_or(PortalPlanError::InvalidWallIndex)?;
    let orientation = orientation_of(&wall, eps).ok_or(PortalPlanError::NonCollinear)?;

    let on_line: Vec<EdgeMatch> = parallel_edges(polygon, &wall, orientation, eps)
        .filter(|m| m.offset.abs() <= eps)
        .collect();
    let faces_back = |m: &&EdgeMatch| {
        let (p, q) = edge_points(polygon, m.edge_index);
        edge_faces_back_side(geometry, target_wall_index, p, q)
    };
    let matched = on_line
        .iter()
        .find(faces_back)
        .or_else(|| on_line.first())
        .ok_or(PortalPlanError::NonCollinear)?;

    let across = orientation.across(&wall.start);
    let n = polygon.len();
    let mut snapped_polygon = polygon.to_vec();
    for i in [matched.edge_index, (matched.edge_index + 1) % n] {
        let along = orientation.along(&polygon[i]);
        snapped_polygon[i] = orientation.point(along, across);
    }

    let (lo, hi) = matched.overlap;
    let (near, far) = if orientation.along(&wall.start) <= orientation.along(&wall.end) {
        (lo, hi)
    } else {
        (hi, lo)
    };

    Ok(AdjacentPortalPlan {
        polygon_edge_index: matched.edge_index,
        orientation,
        portal_a: orientation.point(near, across),
        portal_b: orientation.point(far, across),
        snapped_polygon,
    })
}

fn nearest_offset(
    geometry: &MapGeometry,
    polygon: &[Point2D],
    wall_index: usize,
    max_distance: f64,
) -> Option<(f64, WallOrientation)> {
    let eps = geometry.epsilon;
    let wall = geometry.wall_segment(wall_index)?;
    let orientation = orientation_of(&wall, eps)?;

    // Equal distances go to an edge that leaves the room on the back side.
    let mut best: Option<(f64, bool)> = None;
    for m in parallel_edges(polygon, &wall, orientation, eps) {
        let distance = m.offset.abs();
        if distance > max_distance + eps {
            continue;
        }
        let (p, q) = edge_points(polygon, m.edge_index);
        let faces_back = edge_faces_back_side(geometry, wall_index, p, q);
        let better = best.map_or(true, |(offset, best_faces_back)| {
            let best_distance = offset.abs();
            distance < best_distance - eps
                || ((distance - best_distance).abs() <= eps && faces_back && !best_faces_back)
        });
        if better {
            best = Some((m.offset, faces_back));
        }
    }
    best.map(|(offset, _)| (offset, orientation))
}

fn translate(polygon: &[Point2D], offset: f64, orientation: WallOrientation) -> Vec<Point2D> {
    let (dx, dy) = match orientation {
        WallOrientation::Horizontal => (0.0, offset),
        WallOrientation::Vertical => (offset, 0.0),
    };
    polygon.iter().map(|p| p.translated(dx, dy)).collect()
}

/// Translates `polygon` so its nearest parallel, overlapping edge lies on
/// the wall line. `None` if no edge is within `max_distance`.
pub fn snap_polygon_to_wall(
    geometry: &MapGeometry,
    polygon: &[Point2D],
    wall_index: usize,
    max_distance: f64,
) -> Option<Vec<Point2D>> {
    let (offset, orientation) = nearest_offset(geometry, polygon, wall_index, max_distance)?;
    Some(translate(polygon, offset, orientation))
}

/// Picks the wall nearest to a parallel polygon edge among walls accepted
/// by `accept`, and returns it with the polygon translated onto it. Ties go
/// to the lowest wall index.
pub fn find_snap_target<F>(
    geometry: &MapGeometry,
    polygon: &[Point2D],
    max_distance: f64,
    accept: F,
) -> Option<(usize, Vec<Point2D>)>
where
    F: Fn(usize, &Wall) -> bool,
{
    let mut best: Option<(usize, f64, WallOrientation)> = None;
    for (index, wall) in geometry.walls.iter().enumerate() {
        let Some(wall) = wall else { continue };
        if !accept(index, wall) {
            continue;
        }
        if let Some((offset, orientation)) = nearest_offset(geometry, polygon, index, max_distance) {
            if best.map_or(true, |(_, b, _)| offset.abs() < b.abs()) {
                best = Some((index, offset, orientation));
            }
        }
    }
    best.map(|(index, offset, orientation)| (index, translate(polygon, offset, orientation)))
}
