// src/utils/mod.rs
pub mod geometry;
pub mod json;

pub use geometry::{Line2D, Point2D, SegmentContact};
