//! Turns three picked points into the oriented rectangle the poster is warped onto.
//!
//! The rightmost point becomes the right corner, the remaining pair is ordered top to
//! bottom into the origin and the down corner. When the right corner does not sit on the
//! origin's row the poster is sheared vertically by the difference.
//!
//! ```
//! use affix_composite::geometry::{resolve_rectangle, Point};
//!
//! let rect = resolve_rectangle([
//!     Point::new(400, 100),
//!     Point::new(100, 500),
//!     Point::new(100, 300),
//! ]).unwrap();
//!
//! assert_eq!(rect.origin(), Point::new(100, 300));
//! assert!(rect.skew_upward());
//! assert_eq!(rect.skew_height(), 200);
//! ```

use std::cmp::Ordering;

use affix_image::ImageSize;

use crate::error::GeometryError;

/// Largest canvas side, in pixels, a rectangle may span.
///
/// Matches the largest image the JPEG writer can store.
pub const MAX_CANVAS_SIDE: usize = u16::MAX as usize;

/// A pixel position in target image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Column of the pixel.
    pub x: i32,
    /// Row of the pixel.
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The three corners of the target region with their roles resolved.
///
/// Only [`resolve_rectangle`] builds one, so a value always has a positive width and
/// height and non-negative corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedRectangle {
    origin: Point,
    right_corner: Point,
    down_corner: Point,
    skew_upward: bool,
    skew_height: u32,
}

impl OrientedRectangle {
    /// Upper corner of the left pair.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The rightmost point, it fixes the width.
    pub fn right_corner(&self) -> Point {
        self.right_corner
    }

    /// Lower corner of the left pair, it fixes the height.
    pub fn down_corner(&self) -> Point {
        self.down_corner
    }

    /// Whether the right corner sits above the origin row.
    pub fn skew_upward(&self) -> bool {
        self.skew_upward
    }

    /// Vertical distance between the origin and the right corner.
    pub fn skew_height(&self) -> u32 {
        self.skew_height
    }

    /// Width the poster is resized to.
    pub fn width(&self) -> usize {
        self.right_corner.x.abs_diff(self.origin.x) as usize
    }

    /// Height the poster is resized to.
    pub fn height(&self) -> usize {
        self.down_corner.y.abs_diff(self.origin.y) as usize
    }

    /// Size of the poster before the shear.
    pub fn poster_size(&self) -> ImageSize {
        ImageSize {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Size of the sheared canvas, tall enough for the poster and the skew.
    pub fn canvas_size(&self) -> ImageSize {
        ImageSize {
            width: self.width(),
            height: self.height() + self.skew_height as usize,
        }
    }

    /// Top-left corner of the canvas in target image space.
    pub fn offset(&self) -> (usize, usize) {
        let y = self.origin.y.min(self.right_corner.y);
        (self.origin.x as usize, y as usize)
    }

    /// Corners `(0, 0)`, `(w, 0)`, `(0, h)` of the resized poster.
    pub fn source_corners(&self) -> [[f32; 2]; 3] {
        let (w, h) = (self.width() as f32, self.height() as f32);
        [[0.0, 0.0], [w, 0.0], [0.0, h]]
    }

    /// Where the source corners land on the canvas.
    pub fn target_corners(&self) -> [[f32; 2]; 3] {
        let (w, h) = (self.width() as f32, self.height() as f32);
        let s = self.skew_height as f32;
        if self.skew_upward {
            [[0.0, s], [w, 0.0], [0.0, h + s]]
        } else {
            [[0.0, 0.0], [w, s], [0.0, h]]
        }
    }
}

// three element sorting network on x
fn sort_by_x([mut a, mut b, mut c]: [Point; 3]) -> [Point; 3] {
    if a.x > b.x {
        std::mem::swap(&mut a, &mut b);
    }
    if b.x > c.x {
        std::mem::swap(&mut b, &mut c);
    }
    if a.x > b.x {
        std::mem::swap(&mut a, &mut b);
    }
    [a, b, c]
}

/// Resolve three points, given in any order, into an [`OrientedRectangle`].
///
/// # Errors
///
/// * [`GeometryError::NegativeCoordinate`] if a point lies left of or above the image.
/// * [`GeometryError::DuplicatePoint`] if two points are equal.
/// * [`GeometryError::DegenerateWidth`] if the largest x is shared by two points.
/// * [`GeometryError::DegenerateHeight`] if the left pair shares its y.
/// * [`GeometryError::CanvasTooLarge`] if the sheared canvas is wider or taller than
///   [`MAX_CANVAS_SIDE`].
pub fn resolve_rectangle(points: [Point; 3]) -> Result<OrientedRectangle, GeometryError> {
    if let Some(p) = points.iter().find(|p| p.x < 0 || p.y < 0) {
        return Err(GeometryError::NegativeCoordinate(*p));
    }

    let [p0, p1, p2] = points;
    if p0 == p1 || p0 == p2 {
        return Err(GeometryError::DuplicatePoint(p0));
    }
    if p1 == p2 {
        return Err(GeometryError::DuplicatePoint(p1));
    }

    let [left_a, left_b, right_corner] = sort_by_x(points);
    if left_b.x == right_corner.x {
        return Err(GeometryError::DegenerateWidth(right_corner.x));
    }

    let (origin, down_corner) = match left_a.y.cmp(&left_b.y) {
        Ordering::Less => (left_a, left_b),
        Ordering::Greater => (left_b, left_a),
        Ordering::Equal => return Err(GeometryError::DegenerateHeight(left_a.y)),
    };

    let rect = OrientedRectangle {
        origin,
        right_corner,
        down_corner,
        skew_upward: right_corner.y < origin.y,
        skew_height: right_corner.y.abs_diff(origin.y),
    };

    let canvas = rect.canvas_size();
    if canvas.width > MAX_CANVAS_SIDE || canvas.height > MAX_CANVAS_SIDE {
        return Err(GeometryError::CanvasTooLarge(canvas.width, canvas.height));
    }

    Ok(rect)
}

/// Like [`resolve_rectangle`] for callers holding a slice of picked points.
///
/// # Errors
///
/// [`GeometryError::WrongPointCount`] unless exactly three points are given.
pub fn resolve_points(points: &[Point]) -> Result<OrientedRectangle, GeometryError> {
    let points: [Point; 3] = points
        .try_into()
        .map_err(|_| GeometryError::WrongPointCount(points.len()))?;
    resolve_rectangle(points)
}
