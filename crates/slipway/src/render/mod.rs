//! Drawing the simulation onto a 2D surface.
//!
//! The renderer talks to a [`Canvas`], a small immediate-mode drawing
//! interface modelled on the HTML canvas 2D context: styled fills and
//! strokes, text, a save/restore stack, translation, rotation and drop
//! shadows. Three backends implement it:
//!
//! - [`SvgCanvas`] writes an SVG document (snapshots);
//! - [`CellCanvas`] rasterises into terminal character cells (interactive view);
//! - [`RecordingCanvas`] records every call (tests and diagnostics).
//!
//! A [`Viewport`] holds the surface the scene is drawn into. Until a surface
//! is attached, drawing is a no-op.

mod cells;
mod recording;
mod scene;
mod svg;
mod transform;

use std::fmt;

use incline::{Point, Vector};

use crate::simulation::SimulationState;

pub use cells::{Cell, CellCanvas, CellGrid};
pub use recording::{DrawOp, RecordingCanvas};
pub use scene::{
    ANCHOR_Y, BACKGROUND, BLOCK_COLOR, BLOCK_SIZE, CANVAS_HEIGHT, CANVAS_WIDTH, FRICTION_COLOR,
    FRICTION_SCALE, GRAVITY_COLOR, GRAVITY_SCALE, NORMAL_COLOR, NORMAL_SCALE, SurfaceStyle,
    Texture, TRACK_WIDTH, render_scene, surface_style,
};
pub use svg::SvgCanvas;
pub use transform::{Affine, GraphicsState};

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a colour from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a colour from a `0xRRGGBB` literal.
    ///
    /// ```rust
    /// use slipway::render::Rgb;
    ///
    /// assert_eq!(Rgb::hex(0xa47551), Rgb::new(0xa4, 0x75, 0x51));
    /// ```
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "channels are masked to 8 bits")]
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Pure white.
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Mixes `self` toward `other`; `amount` 0 keeps `self`, 1 yields `other`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "result is clamped to the channel range"
    )]
    pub fn blend(self, other: Self, amount: f64) -> Self {
        let t = amount.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Line style for strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line colour.
    pub color: Rgb,
    /// Line width in drawing units.
    pub width: f64,
}

impl Stroke {
    /// Creates a stroke style.
    #[must_use]
    pub const fn new(color: Rgb, width: f64) -> Self {
        Self { color, width }
    }
}

/// Drop shadow applied to subsequent fills until cleared or restored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Shadow colour.
    pub color: Rgb,
    /// Shadow opacity in `0..=1`.
    pub alpha: f64,
    /// Blur radius in drawing units.
    pub blur: f64,
    /// Offset from the shape, in drawing units (not affected by rotation).
    pub offset: Vector,
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Text starts at the anchor.
    #[default]
    Start,
    /// Text is centred on the anchor.
    Center,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// The anchor sits on the text's baseline.
    #[default]
    Alphabetic,
    /// The anchor sits on the text's vertical middle.
    Middle,
}

/// Font and placement for [`Canvas::fill_text`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Text colour.
    pub color: Rgb,
    /// Font size in drawing units.
    pub size: f64,
    /// Font family name.
    pub family: &'static str,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Vertical alignment.
    pub baseline: TextBaseline,
}

/// An immediate-mode 2D drawing surface.
///
/// Coordinates are logical drawing units with the origin at the top-left
/// corner and Y growing downward. Every call is affected by the current
/// transform set through [`translate`](Canvas::translate) and
/// [`rotate`](Canvas::rotate); [`save`](Canvas::save) and
/// [`restore`](Canvas::restore) bracket transform and shadow changes.
pub trait Canvas {
    /// Logical width of the surface.
    fn width(&self) -> f64;

    /// Logical height of the surface.
    fn height(&self) -> f64;

    /// Erases everything and resets the transform and shadow.
    fn clear(&mut self);

    /// Pushes the current transform and shadow.
    fn save(&mut self);

    /// Pops the transform and shadow pushed by the matching [`save`](Canvas::save).
    fn restore(&mut self);

    /// Moves the origin by `offset`.
    fn translate(&mut self, offset: Vector);

    /// Rotates the axes clockwise by `radians`.
    fn rotate(&mut self, radians: f64);

    /// Sets or clears the drop shadow for subsequent fills.
    fn set_shadow(&mut self, shadow: Option<Shadow>);

    /// Fills an axis-aligned rectangle (in the current transform).
    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Rgb);

    /// Strokes an open polyline through `points`.
    fn stroke_path(&mut self, points: &[Point], stroke: Stroke);

    /// Fills a circle.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb);

    /// Draws a line of text anchored at `at`.
    fn fill_text(&mut self, at: Point, text: &str, style: &TextStyle);
}

/// The drawing surface the scene is rendered into, if one is attached.
///
/// A detached viewport accepts draw requests and ignores them: the next
/// draw after a surface is attached brings it up to date.
#[derive(Debug, Clone)]
pub struct Viewport<C> {
    surface: Option<C>,
}

impl<C> Default for Viewport<C> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<C> Viewport<C> {
    /// Creates a viewport with no surface.
    #[must_use]
    pub const fn detached() -> Self {
        Self { surface: None }
    }

    /// Creates a viewport drawing into `surface`.
    #[must_use]
    pub const fn attached(surface: C) -> Self {
        Self {
            surface: Some(surface),
        }
    }

    /// Attaches `surface`, replacing any previous one.
    pub fn attach(&mut self, surface: C) {
        self.surface = Some(surface);
    }

    /// Detaches and returns the current surface.
    pub const fn detach(&mut self) -> Option<C> {
        self.surface.take()
    }

    /// Returns true when a surface is attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Returns the attached surface.
    #[must_use]
    pub const fn surface(&self) -> Option<&C> {
        self.surface.as_ref()
    }
}

impl<C: Canvas> Viewport<C> {
    /// Renders `state` into the attached surface. Returns whether anything
    /// was drawn.
    pub fn draw(&mut self, state: &SimulationState) -> bool {
        match self.surface.as_mut() {
            Some(canvas) => {
                render_scene(state, canvas);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_hex_and_display() {
        let color = Rgb::hex(0xe74c3c);
        assert_eq!(color, Rgb::new(0xe7, 0x4c, 0x3c));
        assert_eq!(color.to_string(), "#e74c3c");
    }

    #[test]
    fn rgb_blend_endpoints() {
        let a = Rgb::BLACK;
        let b = Rgb::WHITE;
        assert_eq!(a.blend(b, 0.0), a);
        assert_eq!(a.blend(b, 1.0), b);
        assert_eq!(a.blend(b, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(a.blend(b, 7.0), b);
    }

    #[test]
    fn detached_viewport_draws_nothing() {
        let mut viewport = Viewport::<RecordingCanvas>::detached();
        assert!(!viewport.draw(&SimulationState::default()));
        assert!(viewport.surface().is_none());
    }

    #[test]
    fn attached_viewport_renders() {
        let mut viewport = Viewport::attached(RecordingCanvas::new(CANVAS_WIDTH, CANVAS_HEIGHT));
        assert!(viewport.draw(&SimulationState::default()));
        let canvas = viewport.surface().expect("attached");
        assert!(!canvas.ops().is_empty());
    }

    #[test]
    fn detach_returns_surface() {
        let mut viewport = Viewport::attached(RecordingCanvas::new(10.0, 10.0));
        assert!(viewport.is_attached());
        assert!(viewport.detach().is_some());
        assert!(!viewport.is_attached());
    }
}
