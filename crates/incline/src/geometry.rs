//! 2D geometry for projecting travel along the incline onto a drawing surface.
//!
//! Coordinates follow the drawing-surface convention: origin at the top-left
//! corner, Y increasing downward. A positive incline angle therefore tilts
//! the track down to the right.

use core::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::forces::degrees_to_radians;
use crate::math::{cos, sin, sqrt};
use crate::motion::SURFACE_LENGTH;

/// A point in 2D space.
///
/// # Example
///
/// ```rust
/// use incline::{Point, Vector};
///
/// let p = Point::new(1.0, 2.0) + Vector::new(3.0, 4.0);
/// assert_eq!(p, Point::new(4.0, 6.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the origin point (0, 0).
    #[inline]
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    #[inline]
    fn add(self, v: Vector) -> Point {
        Point {
            x: self.x + v.x,
            y: self.y + v.y,
        }
    }
}

impl AddAssign<Vector> for Point {
    #[inline]
    fn add_assign(&mut self, v: Vector) {
        self.x += v.x;
        self.y += v.y;
    }
}

impl Sub for Point {
    type Output = Vector;

    #[inline]
    fn sub(self, other: Point) -> Vector {
        Vector {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// A displacement in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vector {
    /// Creates a new vector with the given components.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the zero vector.
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Returns the unit vector pointing at `radians`, measured clockwise from
    /// the positive X axis (Y grows downward).
    #[inline]
    pub fn from_angle(radians: f64) -> Self {
        Self {
            x: cos(radians),
            y: sin(radians),
        }
    }

    /// Returns the magnitude (length) of the vector.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        sqrt(self.x * self.x + self.y * self.y)
    }
}

impl Add for Vector {
    type Output = Vector;

    #[inline]
    fn add(self, other: Vector) -> Vector {
        Vector {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Neg for Vector {
    type Output = Vector;

    #[inline]
    fn neg(self) -> Vector {
        Vector {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    #[inline]
    fn mul(self, scalar: f64) -> Vector {
        Vector {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;

    #[inline]
    fn mul(self, v: Vector) -> Vector {
        v * self
    }
}

/// Placement of the incline on a drawing surface.
///
/// The track starts at `anchor` and runs [`SURFACE_LENGTH`] units at the
/// incline angle.
///
/// # Example
///
/// ```rust
/// use incline::{InclineGeometry, Point};
///
/// let track = InclineGeometry::new(Point::new(100.0, 200.0), 0.0);
/// assert_eq!(track.point_at(50.0), Point::new(150.0, 200.0));
/// assert_eq!(track.end(), Point::new(800.0, 200.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InclineGeometry {
    anchor: Point,
    angle_rad: f64,
    direction: Vector,
}

impl InclineGeometry {
    /// Creates an incline starting at `anchor`, tilted by `angle_degrees`.
    pub fn new(anchor: Point, angle_degrees: f64) -> Self {
        let angle_rad = degrees_to_radians(angle_degrees);
        Self {
            anchor,
            angle_rad,
            direction: Vector::from_angle(angle_rad),
        }
    }

    /// Returns the top end of the track.
    #[inline]
    pub const fn anchor(&self) -> Point {
        self.anchor
    }

    /// Returns the tilt of the track in radians.
    #[inline]
    pub const fn angle_rad(&self) -> f64 {
        self.angle_rad
    }

    /// Unit vector pointing down the incline.
    #[inline]
    pub const fn direction(&self) -> Vector {
        self.direction
    }

    /// Unit vector perpendicular to the track, pointing away from it (up).
    #[inline]
    pub fn normal(&self) -> Vector {
        Vector::new(self.direction.y, -self.direction.x)
    }

    /// Returns the point `distance` units down the track from the anchor.
    #[inline]
    pub fn point_at(&self, distance: f64) -> Point {
        self.anchor + self.direction * distance
    }

    /// Returns the bottom end of the track.
    #[inline]
    pub fn end(&self) -> Point {
        self.point_at(SURFACE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn test_point_sub_point() {
        let v = Point::new(5.0, 7.0) - Point::new(1.0, 2.0);
        assert_eq!(v, Vector::new(4.0, 5.0));
    }

    #[test]
    fn test_vector_scaling() {
        let v = Vector::new(1.0, -2.0);
        assert_eq!(v * 2.0, Vector::new(2.0, -4.0));
        assert_eq!(2.0 * v, Vector::new(2.0, -4.0));
        assert_eq!(-v, Vector::new(-1.0, 2.0));
    }

    #[test]
    fn test_vector_magnitude() {
        assert!(approx_eq(Vector::new(3.0, 4.0).magnitude(), 5.0));
    }

    #[test]
    fn test_direction_is_unit_length() {
        for angle in [0.0, 7.5, 15.0, 30.0] {
            let track = InclineGeometry::new(Point::origin(), angle);
            assert!(approx_eq(track.direction().magnitude(), 1.0));
            assert!(approx_eq(track.normal().magnitude(), 1.0));
        }
    }

    #[test]
    fn test_tilted_track_goes_down_and_right() {
        let track = InclineGeometry::new(Point::new(0.0, 200.0), 30.0);
        let end = track.end();

        assert!(approx_eq(end.x, 700.0 * (3.0f64).sqrt() / 2.0));
        assert!(approx_eq(end.y, 200.0 + 350.0));
    }

    #[test]
    fn test_normal_points_up_from_track() {
        let track = InclineGeometry::new(Point::origin(), 0.0);
        assert!(approx_eq(track.normal().x, 0.0));
        assert!(approx_eq(track.normal().y, -1.0));
    }
}
