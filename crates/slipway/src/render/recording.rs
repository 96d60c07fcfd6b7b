//! A canvas that records calls instead of drawing.

use incline::{Point, Vector};

use super::transform::GraphicsState;
use super::{Canvas, Rgb, Shadow, Stroke, TextStyle};

/// One recorded drawing call.
///
/// Geometry is stored in device space: the current transform has already
/// been applied to every point.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// The canvas was cleared.
    Clear,
    /// A filled quadrilateral (a rectangle under the current transform).
    FillQuad {
        corners: [Point; 4],
        color: Rgb,
        shadow: Option<Shadow>,
    },
    /// A stroked polyline.
    Stroke { points: Vec<Point>, stroke: Stroke },
    /// A filled circle.
    FillCircle {
        center: Point,
        radius: f64,
        color: Rgb,
    },
    /// A text run.
    Text {
        at: Point,
        text: String,
        style: TextStyle,
        rotation: f64,
    },
}

/// Records every operation it receives, for assertions in tests.
///
/// # Example
///
/// ```rust
/// use slipway::render::{render_scene, DrawOp, RecordingCanvas};
/// use slipway::simulation::SimulationState;
///
/// let mut canvas = RecordingCanvas::new(1000.0, 600.0);
/// render_scene(&SimulationState::default(), &mut canvas);
///
/// assert_eq!(canvas.ops()[0], DrawOp::Clear);
/// assert_eq!(canvas.texts(), vec!["1kg"]);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    state: GraphicsState,
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    /// Creates an empty recording of the given logical size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            state: GraphicsState::default(),
            ops: Vec::new(),
        }
    }

    /// Operations recorded since the last [`Canvas::clear`].
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// All text runs, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns the first text op with the given content.
    pub fn find_text(&self, needle: &str) -> Option<&DrawOp> {
        self.ops
            .iter()
            .find(|op| matches!(op, DrawOp::Text { text, .. } if text == needle))
    }

    /// Strokes drawn in `color`.
    pub fn strokes_in(&self, color: Rgb) -> Vec<&[Point]> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Stroke { points, stroke } if stroke.color == color => {
                    Some(points.as_slice())
                }
                _ => None,
            })
            .collect()
    }

    /// Current save-stack depth; zero after a balanced render.
    pub fn save_depth(&self) -> usize {
        self.state.depth()
    }

    fn rotation(&self) -> f64 {
        let t = self.state.transform();
        t.b.atan2(t.a)
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.state.reset();
        self.ops.push(DrawOp::Clear);
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn translate(&mut self, offset: Vector) {
        self.state.translate(offset);
    }

    fn rotate(&mut self, radians: f64) {
        self.state.rotate(radians);
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.state.set_shadow(shadow);
    }

    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Rgb) {
        let t = self.state.transform();
        let corners = [
            t.apply(origin),
            t.apply(origin + Vector::new(width, 0.0)),
            t.apply(origin + Vector::new(width, height)),
            t.apply(origin + Vector::new(0.0, height)),
        ];
        self.ops.push(DrawOp::FillQuad {
            corners,
            color,
            shadow: self.state.shadow(),
        });
    }

    fn stroke_path(&mut self, points: &[Point], stroke: Stroke) {
        let t = self.state.transform();
        self.ops.push(DrawOp::Stroke {
            points: points.iter().map(|p| t.apply(*p)).collect(),
            stroke,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb) {
        let t = self.state.transform();
        self.ops.push(DrawOp::FillCircle {
            center: t.apply(center),
            radius: radius * t.scale(),
            color,
        });
    }

    fn fill_text(&mut self, at: Point, text: &str, style: &TextStyle) {
        let rotation = self.rotation();
        self.ops.push(DrawOp::Text {
            at: self.state.transform().apply(at),
            text: text.to_owned(),
            style: *style,
            rotation,
        });
    }
}
