//! # Geometry kernel
//!
//! Pure functions over a read-only view of a map's vertices, walls and
//! sector ids. Nothing here touches the JSON document; the command engine
//! builds a [`MapGeometry`] from the working copy and writes results back
//! itself.

pub mod containment;
pub mod intersect;
pub mod portal;
pub mod room;

pub use containment::{find_enclosing_sector_id_for_polygon, loop_signed_area, point_in_loop};
pub use intersect::{does_polygon_intersect_walls, WallIntersectionQuery};
pub use portal::{
    compute_adjacent_portal_plan, edge_faces_back_side, find_snap_target, snap_polygon_to_wall,
    wall_orientation, AdjacentPortalPlan, PortalPlanError, WallOrientation,
};
pub use room::{compute_room_polygon, signed_area, RoomSize, RoomTemplate};

use serde_json::{Map, Value};

use crate::map::{sector, Vertex, Wall, SECTORS, VERTICES, WALLS};
use crate::utils::geometry::{Line2D, Point2D};

/// Tolerance for floating-point coincidence.
pub const EPSILON: f64 = 1e-6;

/// Largest caller-reported distance accepted for adjacent placement.
pub const MAX_ADJACENT_SNAP_DISTANCE: f64 = 12.0;

/// Read-only geometry of a map. Entries that fail to parse are kept as
/// `None` so indices still line up with the document arrays.
#[derive(Debug, Clone)]
pub struct MapGeometry {
    pub vertices: Vec<Option<Point2D>>,
    pub walls: Vec<Option<Wall>>,
    pub sector_ids: Vec<i64>,
    pub epsilon: f64,
}

impl Default for MapGeometry {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            walls: Vec::new(),
            sector_ids: Vec::new(),
            epsilon: EPSILON,
        }
    }
}

fn array<'a>(root: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    root.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

impl MapGeometry {
    pub fn from_root(root: &Map<String, Value>) -> Self {
        Self {
            vertices: array(root, VERTICES)
                .iter()
                .map(|v| Vertex::from_json(v).map(|v| v.point()))
                .collect(),
            walls: array(root, WALLS).iter().map(Wall::from_json).collect(),
            sector_ids: array(root, SECTORS).iter().filter_map(sector::sector_id).collect(),
            epsilon: EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn vertex(&self, index: usize) -> Option<Point2D> {
        self.vertices.get(index).copied().flatten()
    }

    pub fn wall(&self, index: usize) -> Option<Wall> {
        self.walls.get(index).copied().flatten()
    }

    /// The segment of a wall, if the wall and both its vertices are valid.
    pub fn wall_segment(&self, index: usize) -> Option<Line2D> {
        let wall = self.wall(index)?;
        Some(Line2D::new(self.vertex(wall.v0)?, self.vertex(wall.v1)?))
    }

    /// Indexed segments of every valid wall.
    pub fn wall_segments(&self) -> impl Iterator<Item = (usize, Line2D)> + '_ {
        (0..self.walls.len()).filter_map(move |i| self.wall_segment(i).map(|s| (i, s)))
    }

    /// `Line2D::classify_point` sign of the wall's back side. Sectors wound
    /// counter-clockwise keep their front on the left, so the back is the
    /// positive side; clockwise sectors flip it. Unknown or flat front
    /// loops count as counter-clockwise.
    pub fn back_side_sign(&self, wall_index: usize) -> f64 {
        let Some(wall) = self.wall(wall_index) else {
            return 1.0;
        };
        if loop_signed_area(&self.sector_loop(wall.front_sector)) < -self.epsilon {
            -1.0
        } else {
            1.0
        }
    }

    /// Segments of the walls whose front side faces `sector_id`.
    pub fn sector_loop(&self, sector_id: i64) -> Vec<Line2D> {
        self.walls
            .iter()
            .enumerate()
            .filter(|(_, wall)| wall.is_some_and(|w| w.front_sector == sector_id))
            .filter_map(|(i, _)| self.wall_segment(i))
            .collect()
    }
}
