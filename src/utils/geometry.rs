// src/utils/geometry.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &Point2D, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Point2D {
        Point2D::new(self.x + dx, self.y + dy)
    }
}

/// How two segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentContact {
    Disjoint,
    /// The interiors cross at a single point.
    Crossing,
    /// A single shared point that is an endpoint of at least one segment.
    Touching,
    /// Collinear with a shared stretch of positive length.
    Overlapping,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2D {
    pub start: Point2D,
    pub end: Point2D,
}

impl Line2D {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Returns positive if the point is on the front side, negative on the
    /// back side and near zero on the line. The magnitude is scaled by the
    /// segment length.
    pub fn classify_point(&self, point: &Point2D) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        (dy * (point.x - self.start.x)) - (dx * (point.y - self.start.y))
    }

    /// Signed perpendicular distance from the infinite line.
    pub fn signed_distance(&self, point: &Point2D) -> f64 {
        let len = self.length();
        if len == 0.0 {
            return point.distance_to(&self.start);
        }
        self.classify_point(point) / len
    }

    fn side_of(&self, point: &Point2D, epsilon: f64) -> i8 {
        let d = self.signed_distance(point);
        if d > epsilon {
            1
        } else if d < -epsilon {
            -1
        } else {
            0
        }
    }

    /// Bounding-box test; only meaningful for points already on the line.
    pub fn on_segment(&self, point: &Point2D, epsilon: f64) -> bool {
        point.x <= self.start.x.max(self.end.x) + epsilon
            && point.x >= self.start.x.min(self.end.x) - epsilon
            && point.y <= self.start.y.max(self.end.y) + epsilon
            && point.y >= self.start.y.min(self.end.y) - epsilon
    }

    /// True if `point` lies on the segment within `epsilon`.
    pub fn contains_point(&self, point: &Point2D, epsilon: f64) -> bool {
        self.side_of(point, epsilon) == 0 && self.on_segment(point, epsilon)
    }

    /// Distance of `point` along the segment direction, measured from `start`.
    pub fn project(&self, point: &Point2D) -> f64 {
        let len = self.length();
        if len == 0.0 {
            return 0.0;
        }
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        ((point.x - self.start.x) * dx + (point.y - self.start.y) * dy) / len
    }

    /// Classifies how `other` meets this segment. Degenerate segments
    /// (shorter than `epsilon`) never touch anything.
    pub fn contact(&self, other: &Line2D, epsilon: f64) -> SegmentContact {
        if self.length() <= epsilon || other.length() <= epsilon {
            return SegmentContact::Disjoint;
        }

        let d1 = self.side_of(&other.start, epsilon);
        let d2 = self.side_of(&other.end, epsilon);

        if d1 == 0 && d2 == 0 {
            return self.collinear_contact(other, epsilon);
        }

        let d3 = other.side_of(&self.start, epsilon);
        let d4 = other.side_of(&self.end, epsilon);

        if d1 * d2 < 0 && d3 * d4 < 0 {
            return SegmentContact::Crossing;
        }

        let touches = (d1 == 0 && self.on_segment(&other.start, epsilon))
            || (d2 == 0 && self.on_segment(&other.end, epsilon))
            || (d3 == 0 && other.on_segment(&self.start, epsilon))
            || (d4 == 0 && other.on_segment(&self.end, epsilon));

        if touches {
            SegmentContact::Touching
        } else {
            SegmentContact::Disjoint
        }
    }

    fn collinear_contact(&self, other: &Line2D, epsilon: f64) -> SegmentContact {
        let t0 = self.project(&other.start);
        let t1 = self.project(&other.end);
        let lo = t0.min(t1).max(0.0);
        let hi = t0.max(t1).min(self.length());
        let overlap = hi - lo;

        if overlap > epsilon {
            SegmentContact::Overlapping
        } else if overlap >= -epsilon {
            SegmentContact::Touching
        } else {
            SegmentContact::Disjoint
        }
    }
}
