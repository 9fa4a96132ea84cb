// src/geometry/intersect.rs
use super::MapGeometry;
use crate::utils::geometry::{Line2D, Point2D, SegmentContact};

pub struct WallIntersectionQuery<'a> {
    pub geometry: &'a MapGeometry,
    /// Closed outline; the last point connects back to the first.
    pub polygon: &'a [Point2D],
    pub ignored_wall_indices: &'a [usize],
    /// Accept contacts that are a single shared endpoint.
    pub allow_endpoint_touch: bool,
}

fn polygon_edges(polygon: &[Point2D]) -> impl Iterator<Item = Line2D> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| Line2D::new(polygon[i], polygon[(i + 1) % n]))
}

/// True if any polygon edge crosses or overlaps a wall that is not ignored.
pub fn does_polygon_intersect_walls(query: &WallIntersectionQuery) -> bool {
    let eps = query.geometry.epsilon;
    query
        .geometry
        .wall_segments()
        .filter(|(index, _)| !query.ignored_wall_indices.contains(index))
        .any(|(_, wall)| {
            polygon_edges(query.polygon).any(|edge| match edge.contact(&wall, eps) {
                SegmentContact::Disjoint => false,
                SegmentContact::Crossing | SegmentContact::Overlapping => true,
                SegmentContact::Touching => !query.allow_endpoint_touch,
            })
        })
}
