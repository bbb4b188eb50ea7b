#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are logical pixels in the host's coordinate space (origin at
//! top-left, `y` growing downward). Values are `f64` so hosts with fractional
//! device scaling can pass their measurements through unchanged.

/// A 2D point or offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    #[inline]
    #[must_use]
    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference.
    #[inline]
    #[must_use]
    pub fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Vec2) -> f64 {
        self.sub(other).length()
    }
}

/// Signed distances from a point to each edge of a rectangle.
///
/// A value is positive when the point lies on the inner side of that edge and
/// negative when it lies outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDistances {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// An axis-aligned rectangle used for container bounds, viewports, and hit
/// testing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub left: f64,
    /// Top edge (inclusive).
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Geometric center.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Area in square units.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check if the rectangle has no area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle (half-open on right/bottom).
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }

    /// Signed distances from `point` to the four edges.
    #[must_use]
    pub fn edge_distances(&self, point: Vec2) -> EdgeDistances {
        EdgeDistances {
            left: point.x - self.left,
            right: self.right() - point.x,
            top: point.y - self.top,
            bottom: self.bottom() - point.y,
        }
    }

    /// Smallest distance from `point` to any of the four edge segments.
    ///
    /// Unlike [`Rect::edge_distances`], this measures against the finite
    /// segments, so a point diagonally outside a corner is measured to the
    /// corner rather than to the extended edge line.
    #[must_use]
    pub fn distance_to_edges(&self, point: Vec2) -> f64 {
        let top_left = Vec2::new(self.left, self.top);
        let top_right = Vec2::new(self.right(), self.top);
        let bottom_left = Vec2::new(self.left, self.bottom());
        let bottom_right = Vec2::new(self.right(), self.bottom());
        [
            segment_distance(point, top_left, bottom_left),
            segment_distance(point, top_right, bottom_right),
            segment_distance(point, top_left, top_right),
            segment_distance(point, bottom_left, bottom_right),
        ]
        .into_iter()
        .fold(f64::INFINITY, f64::min)
    }
}

fn segment_distance(point: Vec2, start: Vec2, end: Vec2) -> f64 {
    let segment = end.sub(start);
    let len_sq = segment.x * segment.x + segment.y * segment.y;
    if len_sq <= f64::EPSILON {
        return point.distance(start);
    }
    let offset = point.sub(start);
    let t = ((offset.x * segment.x + offset.y * segment.y) / len_sq).clamp(0.0, 1.0);
    let projected = Vec2::new(start.x + segment.x * t, start.y + segment.y * t);
    point.distance(projected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn edges_and_center() {
        let rect = Rect::new(10.0, 20.0, 300.0, 200.0);
        assert_eq!(rect.right(), 310.0);
        assert_eq!(rect.bottom(), 220.0);
        assert_eq!(rect.center(), Vec2::new(160.0, 120.0));
        assert_eq!(rect.area(), 60_000.0);
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::from_size(100.0, 50.0);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(99.9, 49.9)));
        assert!(!rect.contains(Vec2::new(100.0, 10.0)));
        assert!(!rect.contains(Vec2::new(10.0, 50.0)));
        assert!(!rect.contains(Vec2::new(-0.1, 10.0)));
    }

    #[test]
    fn empty_rect() {
        assert!(Rect::from_size(0.0, 10.0).is_empty());
        assert!(!Rect::from_size(1.0, 1.0).is_empty());
    }

    #[test]
    fn signed_edge_distances() {
        let rect = Rect::from_size(100.0, 50.0);
        let d = rect.edge_distances(Vec2::new(-5.0, 10.0));
        assert_eq!(d.left, -5.0);
        assert_eq!(d.right, 105.0);
        assert_eq!(d.top, 10.0);
        assert_eq!(d.bottom, 40.0);
    }

    #[test]
    fn distance_to_edges_outside_corner_uses_corner() {
        let rect = Rect::from_size(10.0, 10.0);
        let d = rect.distance_to_edges(Vec2::new(13.0, 14.0));
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn distance_to_edges_inside_is_nearest_edge() {
        let rect = Rect::from_size(100.0, 40.0);
        let d = rect.distance_to_edges(Vec2::new(50.0, 5.0));
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn vector_arithmetic() {
        let a = Vec2::new(3.0, 4.0);
        assert_eq!(a.length(), 5.0);
        assert_eq!(a.add(Vec2::new(1.0, 1.0)), Vec2::new(4.0, 5.0));
        assert_eq!(a.distance(Vec2::default()), 5.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rect_serializes_with_edge_names() {
        let json = serde_json::to_value(Rect::new(1.0, 2.0, 3.0, 4.0)).expect("serialize");
        assert_eq!(json["left"], serde_json::json!(1.0));
        assert_eq!(json["height"], serde_json::json!(4.0));
    }

    proptest! {
        #[test]
        fn edge_distance_is_never_negative(
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
            w in 1.0f64..400.0,
            h in 1.0f64..400.0,
        ) {
            let rect = Rect::new(0.0, 0.0, w, h);
            prop_assert!(rect.distance_to_edges(Vec2::new(x, y)) >= 0.0);
        }
    }
}
