//! Current-transform bookkeeping shared by the canvas backends.

use incline::{Point, Vector};

use super::Shadow;

/// A 2D affine transform in canvas order:
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Post-multiplies a translation.
    #[must_use]
    pub fn translated(self, offset: Vector) -> Self {
        Self {
            e: self.a.mul_add(offset.x, self.c.mul_add(offset.y, self.e)),
            f: self.b.mul_add(offset.x, self.d.mul_add(offset.y, self.f)),
            ..self
        }
    }

    /// Post-multiplies a clockwise rotation (Y grows downward).
    #[must_use]
    pub fn rotated(self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: self.a.mul_add(cos, self.c * sin),
            b: self.b.mul_add(cos, self.d * sin),
            c: self.c.mul_add(cos, -self.a * sin),
            d: self.d.mul_add(cos, -self.b * sin),
            ..self
        }
    }

    /// Maps a point into device space.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a.mul_add(p.x, self.c.mul_add(p.y, self.e)),
            self.b.mul_add(p.x, self.d.mul_add(p.y, self.f)),
        )
    }

    /// Uniform scale factor, used for line widths and radii.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.a.mul_add(self.d, -self.b * self.c).abs().sqrt()
    }

    /// Returns true when the transform has no rotation or skew.
    #[must_use]
    pub fn is_axis_aligned(&self) -> bool {
        self.b.abs() < f64::EPSILON && self.c.abs() < f64::EPSILON
    }
}

/// Transform and shadow with a save/restore stack.
#[derive(Debug, Clone, Default)]
pub struct GraphicsState {
    transform: Affine,
    shadow: Option<Shadow>,
    stack: Vec<(Affine, Option<Shadow>)>,
}

impl GraphicsState {
    pub const fn transform(&self) -> &Affine {
        &self.transform
    }

    pub const fn shadow(&self) -> Option<Shadow> {
        self.shadow
    }

    pub fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.shadow = shadow;
    }

    pub fn translate(&mut self, offset: Vector) {
        self.transform = self.transform.translated(offset);
    }

    pub fn rotate(&mut self, radians: f64) {
        self.transform = self.transform.rotated(radians);
    }

    pub fn save(&mut self) {
        self.stack.push((self.transform, self.shadow));
    }

    /// Unbalanced restores are ignored, as on an HTML canvas.
    pub fn restore(&mut self) {
        if let Some((transform, shadow)) = self.stack.pop() {
            self.transform = transform;
            self.shadow = shadow;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Depth of the save stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
