#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are CSS pixels in viewport space (origin at the top-left of the
//! visible area, y grows downwards). The engine never mixes in
//! offset-parent-relative coordinates; scroll compensation is done explicitly
//! with [`Vec2`] deltas.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A position in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        (other - self).length()
    }

    /// The vector from the origin to this point.
    #[inline]
    #[must_use]
    pub const fn to_vec(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Component-wise clamp into the box spanned by `min` and `max`.
    ///
    /// Pins to `min` on an axis where `min > max`, like [`Vec2::clamp`].
    #[must_use]
    pub fn clamp(self, min: Point, max: Point) -> Point {
        Point::new(clamp(self.x, min.x, max.x), clamp(self.y, min.y, max.y))
    }
}

/// A displacement (translate, scroll delta, margin sum).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Component-wise clamp into `[min, max]`.
    ///
    /// When `min > max` on an axis (a proxy larger than its container), the
    /// result pins to `min` on that axis.
    #[must_use]
    pub fn clamp(self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(clamp(self.x, min.x, max.x), clamp(self.y, min.y, max.y))
    }

    /// Keep only the components enabled by `axis`; the others become zero.
    #[inline]
    #[must_use]
    pub fn along(self, axis: Axis) -> Vec2 {
        Vec2::new(
            if axis.horizontal() { self.x } else { 0.0 },
            if axis.vertical() { self.y } else { 0.0 },
        )
    }

    /// CSS `transform` value for this translate.
    #[must_use]
    pub fn css_translate3d(self) -> String {
        format!("translate3d({}px,{}px,0)", self.x, self.y)
    }
}

/// `min` wins when the range is inverted.
#[inline]
fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

impl Add<Vec2> for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Vec2) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vec2> for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Vec2) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub for Point {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Point) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    #[must_use]
    pub const fn to_vec(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Which directions a surface sorts along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// Horizontal only.
    X,
    /// Vertical only.
    #[default]
    Y,
    /// Both (grids).
    XY,
}

impl Axis {
    #[inline]
    #[must_use]
    pub const fn horizontal(self) -> bool {
        matches!(self, Self::X | Self::XY)
    }

    #[inline]
    #[must_use]
    pub const fn vertical(self) -> bool {
        matches!(self, Self::Y | Self::XY)
    }

    /// Stable string form, matching the serialized representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::XY => "xy",
        }
    }
}

/// An axis-aligned rectangle in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    pub const fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub const fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Strict containment: points on an edge are outside.
    ///
    /// Shared edges between adjacent items therefore never report a hit on
    /// both items at once.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.contains_along(point, Axis::XY)
    }

    /// Strict containment considering only the directions enabled by `axis`.
    ///
    /// With [`Axis::Y`] a point anywhere left or right of the rect still hits
    /// it as long as it is vertically inside.
    pub fn contains_along(&self, point: Point, axis: Axis) -> bool {
        let horizontally = self.x < point.x && point.x < self.right();
        let vertically = self.y < point.y && point.y < self.bottom();
        match axis {
            Axis::XY => horizontally && vertically,
            Axis::Y => vertically,
            Axis::X => horizontally,
        }
    }

    /// The same rect moved by `delta`.
    #[inline]
    #[must_use]
    pub fn translate(&self, delta: Vec2) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Shrink by `sides` (content box from a border box).
    #[must_use]
    pub fn inner(&self, sides: Sides) -> Rect {
        Rect::new(
            self.x + sides.left,
            self.y + sides.top,
            (self.width - sides.horizontal_sum()).max(0.0),
            (self.height - sides.vertical_sum()).max(0.0),
        )
    }
}

/// Per-side lengths for margins, padding, and borders.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sides {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Sides {
    pub const fn all(val: f32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[inline]
    pub fn horizontal_sum(&self) -> f32 {
        self.left + self.right
    }

    #[inline]
    pub fn vertical_sum(&self) -> f32 {
        self.top + self.bottom
    }

    /// Spacing between two neighbouring items carrying these margins.
    ///
    /// Horizontal margins add up; vertical margins collapse to the larger
    /// one. A container gap is added horizontally and competes with the
    /// collapsed vertical margin.
    #[must_use]
    pub fn item_spacing(&self, gap: Vec2) -> Vec2 {
        Vec2::new(
            self.horizontal_sum() + gap.x,
            self.top.max(self.bottom).max(gap.y),
        )
    }
}

impl From<f32> for Sides {
    fn from(val: f32) -> Self {
        Self::all(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_strict() {
        let rect = Rect::new(0.0, 40.0, 100.0, 40.0);
        assert!(rect.contains(Point::new(50.0, 60.0)));
        assert!(!rect.contains(Point::new(50.0, 40.0)));
        assert!(!rect.contains(Point::new(50.0, 80.0)));
        assert!(!rect.contains(Point::new(0.0, 60.0)));
    }

    #[test]
    fn contains_along_ignores_disabled_axis() {
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        let far_right = Point::new(500.0, 20.0);
        assert!(rect.contains_along(far_right, Axis::Y));
        assert!(!rect.contains_along(far_right, Axis::X));
        assert!(!rect.contains_along(far_right, Axis::XY));
    }

    #[test]
    fn item_spacing_collapses_vertical_margins() {
        let margins = Sides::new(4.0, 3.0, 10.0, 2.0);
        assert_eq!(margins.item_spacing(Vec2::ZERO), Vec2::new(5.0, 10.0));
        assert_eq!(
            margins.item_spacing(Vec2::new(8.0, 12.0)),
            Vec2::new(13.0, 12.0)
        );
    }

    #[test]
    fn clamp_pins_to_min_when_inverted() {
        let v = Vec2::new(50.0, 50.0).clamp(Vec2::new(10.0, 0.0), Vec2::new(5.0, 100.0));
        assert_eq!(v, Vec2::new(10.0, 50.0));
    }

    #[test]
    fn inner_removes_sides() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let inner = rect.inner(Sides::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(inner, Rect::new(4.0, 1.0, 94.0, 46.0));
    }

    #[test]
    fn along_zeroes_disabled_components() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.along(Axis::Y), Vec2::new(0.0, 4.0));
        assert_eq!(v.along(Axis::X), Vec2::new(3.0, 0.0));
        assert_eq!(v.along(Axis::XY), v);
    }

    #[test]
    fn css_translate_format() {
        assert_eq!(
            Vec2::new(-40.0, 2.5).css_translate3d(),
            "translate3d(-40px,2.5px,0)"
        );
    }
}
