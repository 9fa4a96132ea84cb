// src/map/vertex.rs
use serde_json::{json, Value};

use crate::utils::geometry::Point2D;
use crate::utils::json::{field_f64, number_value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    /// Reads `{x, y}`; `None` if either coordinate is missing or not finite.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Vertex {
            x: field_f64(object, "x")?,
            y: field_f64(object, "y")?,
        })
    }

    pub fn to_json(&self) -> Value {
        json!({ "x": number_value(self.x), "y": number_value(self.y) })
    }

    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    pub fn matches(&self, point: &Point2D, epsilon: f64) -> bool {
        self.point().approx_eq(point, epsilon)
    }
}

impl From<Point2D> for Vertex {
    fn from(point: Point2D) -> Self {
        Vertex { x: point.x, y: point.y }
    }
}

/// Returns the index of a vertex within `epsilon` of `point`, appending a new
/// vertex when none matches.
pub fn find_or_add_vertex(vertices: &mut Vec<Value>, point: Point2D, epsilon: f64) -> usize {
    let existing = vertices
        .iter()
        .position(|v| Vertex::from_json(v).is_some_and(|v| v.matches(&point, epsilon)));
    match existing {
        Some(index) => index,
        None => {
            vertices.push(Vertex::from(point).to_json());
            vertices.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(Vertex::from_json(&json!({"x": 1, "y": 2})).is_some());
        assert!(Vertex::from_json(&json!({"x": "1", "y": 2})).is_none());
        assert!(Vertex::from_json(&json!({"x": 1})).is_none());
        assert!(Vertex::from_json(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_find_or_add_reuses_coincident_vertex() {
        let mut vertices = vec![json!({"x": 0, "y": 0}), json!({"x": 10, "y": 0})];
        let idx = find_or_add_vertex(&mut vertices, Point2D::new(10.0 + 1e-9, 0.0), 1e-6);
        assert_eq!(idx, 1);
        assert_eq!(vertices.len(), 2);

        let idx = find_or_add_vertex(&mut vertices, Point2D::new(5.0, 0.0), 1e-6);
        assert_eq!(idx, 2);
        assert_eq!(vertices[2], json!({"x": 5, "y": 0}));
    }
}
