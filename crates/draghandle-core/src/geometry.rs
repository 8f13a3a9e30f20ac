//! Geometry for constrained handle movement: offsets, clamping, ratios and edges.

use crate::error::{DragError, DragResult};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two movement axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Component of a vector along this axis.
    pub fn of_vec(self, vec: Vec2) -> f64 {
        match self {
            Axis::X => vec.x,
            Axis::Y => vec.y,
        }
    }

    /// Extent of a size along this axis.
    pub fn of_size(self, size: Size) -> f64 {
        match self {
            Axis::X => size.width,
            Axis::Y => size.height,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// An extreme position on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Offset zero.
    #[default]
    Near,
    /// The axis' maximum offset.
    Far,
}

impl Edge {
    /// Position of the edge as a ratio of the maximum offset.
    pub fn ratio(self) -> f64 {
        match self {
            Edge::Near => 0.0,
            Edge::Far => 1.0,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Near => f.write_str("near"),
            Edge::Far => f.write_str("far"),
        }
    }
}

/// The edge chosen on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Edges {
    pub x: Edge,
    pub y: Edge,
}

impl Edges {
    pub fn new(x: Edge, y: Edge) -> Self {
        Self { x, y }
    }
}

/// A requested coordinate on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Coord {
    /// Offset in pixels.
    Absolute(f64),
    /// Fraction of the axis' maximum offset. Not limited to `[0, 1]`.
    Ratio(f64),
}

impl Coord {
    /// Resolve to pixels against the axis' maximum offset. The result is unclamped.
    pub fn resolve(self, max: f64) -> f64 {
        match self {
            Coord::Absolute(px) => px,
            Coord::Ratio(ratio) => ratio * max,
        }
    }
}

impl From<f64> for Coord {
    fn from(px: f64) -> Self {
        Coord::Absolute(px)
    }
}

impl From<Edge> for Coord {
    fn from(edge: Edge) -> Self {
        Coord::Ratio(edge.ratio())
    }
}

/// Parses `"0.5"` as a ratio and `"150px"` as an absolute offset.
impl FromStr for Coord {
    type Err = DragError;

    fn from_str(s: &str) -> DragResult<Self> {
        let s = s.trim();
        let invalid = || DragError::InvalidCoord(s.to_string());
        match s.strip_suffix("px") {
            Some(px) => px.trim().parse().map(Coord::Absolute).map_err(|_| invalid()),
            None => s.parse().map(Coord::Ratio).map_err(|_| invalid()),
        }
    }
}

/// Maximum offset the handle may reach on each axis.
///
/// Never negative: a handle larger than its container cannot move on that axis.
pub fn max_offset(container: Size, handle: Size) -> Vec2 {
    Vec2::new(
        (container.width - handle.width).max(0.0),
        (container.height - handle.height).max(0.0),
    )
}

/// Resolve a pair of coordinates to an unclamped pixel position.
pub fn resolve(x: Coord, y: Coord, max: Vec2) -> Point {
    Point::new(x.resolve(max.x), y.resolve(max.y))
}

/// Clamp each axis independently to `[0, max]`.
pub fn clamp_position(position: Point, max: Vec2) -> Point {
    Point::new(
        position.x.min(max.x).max(0.0),
        position.y.min(max.y).max(0.0),
    )
}

/// Position as a fraction of the maximum offset; zero on axes that cannot move.
pub fn ratio_of(position: Point, max: Vec2) -> Vec2 {
    let ratio = |value: f64, max: f64| if max > 0.0 { value / max } else { 0.0 };
    Vec2::new(ratio(position.x, max.x), ratio(position.y, max.y))
}

/// Nearest edge per axis. The midpoint belongs to the near edge.
pub fn closest_edges(position: Point, max: Vec2) -> Edges {
    let edge = |value: f64, max: f64| {
        if value <= max / 2.0 {
            Edge::Near
        } else {
            Edge::Far
        }
    };
    Edges::new(edge(position.x, max.x), edge(position.y, max.y))
}

/// Transition duration for travelling from `from` to `to`.
///
/// Scales `slide_duration` by the distance along the dominant axis relative to
/// that axis' span, so full-span travel takes exactly `slide_duration`.
/// Returns zero when the dominant axis cannot move.
pub fn transition_duration(from: Point, to: Point, max: Vec2, slide_duration: f64) -> f64 {
    let distance_x = (from.x - to.x).abs();
    let distance_y = (from.y - to.y).abs();
    let axis = if distance_y > distance_x { Axis::Y } else { Axis::X };
    let distance = distance_x.max(distance_y);
    let span = axis.of_vec(max);
    if span <= 0.0 {
        return 0.0;
    }
    slide_duration * (distance / span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switch_max() -> Vec2 {
        max_offset(Size::new(400.0, 100.0), Size::new(100.0, 100.0))
    }

    #[test]
    fn test_max_offset() {
        let max = switch_max();
        assert!((max.x - 300.0).abs() < f64::EPSILON);
        assert!(max.y.abs() < f64::EPSILON);
    }

    #[test]
    fn test_max_offset_never_negative() {
        let max = max_offset(Size::new(50.0, 50.0), Size::new(80.0, 20.0));
        assert_eq!(max, Vec2::new(0.0, 30.0));
    }

    #[test]
    fn test_clamp_position() {
        let max = Vec2::new(300.0, 50.0);
        assert_eq!(clamp_position(Point::new(410.0, -5.0), max), Point::new(300.0, 0.0));
        assert_eq!(clamp_position(Point::new(-1.0, 60.0), max), Point::new(0.0, 50.0));
        assert_eq!(clamp_position(Point::new(120.0, 25.0), max), Point::new(120.0, 25.0));
    }

    #[test]
    fn test_ratio_resolution() {
        let max = switch_max();
        assert_eq!(resolve(Coord::Ratio(0.5), Coord::Absolute(0.0), max), Point::new(150.0, 0.0));
        // Ratios are scaled before clamping
        assert_eq!(resolve(Coord::Ratio(2.0), Coord::Ratio(1.0), max), Point::new(600.0, 0.0));
    }

    #[test]
    fn test_ratio_of_zero_span() {
        let ratio = ratio_of(Point::new(150.0, 0.0), switch_max());
        assert!((ratio.x - 0.5).abs() < f64::EPSILON);
        assert_eq!(ratio.y, 0.0);
    }

    #[test]
    fn test_closest_edges() {
        let max = Vec2::new(300.0, 100.0);
        assert_eq!(closest_edges(Point::new(75.0, 80.0), max), Edges::new(Edge::Near, Edge::Far));
        assert_eq!(closest_edges(Point::new(150.0, 50.0), max), Edges::new(Edge::Near, Edge::Near));
        assert_eq!(closest_edges(Point::new(151.0, 0.0), max), Edges::new(Edge::Far, Edge::Near));
    }

    #[test]
    fn test_transition_duration_scales_with_distance() {
        let max = switch_max();
        let full = transition_duration(Point::ZERO, Point::new(300.0, 0.0), max, 140.0);
        assert!((full - 140.0).abs() < 1e-9);

        let quarter = transition_duration(Point::new(75.0, 0.0), Point::ZERO, max, 140.0);
        assert!((quarter - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_transition_duration_dominant_axis() {
        let max = Vec2::new(300.0, 100.0);
        // y travels further, so it is measured against the y span
        let duration = transition_duration(Point::ZERO, Point::new(30.0, 50.0), max, 100.0);
        assert!((duration - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_transition_duration_degenerate_axis() {
        let max = Vec2::new(0.0, 0.0);
        let duration = transition_duration(Point::ZERO, Point::new(10.0, 0.0), max, 140.0);
        assert_eq!(duration, 0.0);
    }

    #[test]
    fn test_coord_from_str() {
        assert_eq!("0.5".parse::<Coord>(), Ok(Coord::Ratio(0.5)));
        assert_eq!("1.0".parse::<Coord>(), Ok(Coord::Ratio(1.0)));
        assert_eq!(" 150px ".parse::<Coord>(), Ok(Coord::Absolute(150.0)));
        assert!(matches!("half".parse::<Coord>(), Err(DragError::InvalidCoord(_))));
    }

    #[test]
    fn test_edge_coord() {
        assert_eq!(Coord::from(Edge::Far).resolve(300.0), 300.0);
        assert_eq!(Coord::from(Edge::Near).resolve(300.0), 0.0);
    }
}
