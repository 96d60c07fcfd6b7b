//! Terminal backend: rasterises the scene into character cells.
//!
//! Each cell holds two square-ish pixels stacked vertically, printed as an
//! upper half block (`▀`) whose foreground is the top pixel and background
//! the bottom one. Text is kept on a separate layer and replaces the pixel
//! pair of the cells it covers.

use std::fmt::Write;

use incline::{Point, Vector};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::scene::{CANVAS_HEIGHT, CANVAS_WIDTH};
use super::transform::GraphicsState;
use super::{Canvas, Rgb, Shadow, Stroke, TextAlign, TextBaseline, TextStyle};

const UPPER_HALF: char = '▀';
const LOWER_HALF: char = '▄';
const FULL_BLOCK: char = '█';

/// Thinnest line the rasteriser draws, in pixels from the centre line.
const MIN_HALF_WIDTH: f64 = 0.5;

/// What a cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Two stacked pixels: `fg` on top, `bg` below.
    Pixels,
    /// A character drawn in `fg` on `bg`.
    Char(char),
    /// Right half of a wide character in the previous cell.
    Continuation,
}

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: Glyph,
    pub fg: Rgb,
    pub bg: Rgb,
}

#[derive(Debug, Clone, Copy)]
struct TextCell {
    glyph: Glyph,
    color: Rgb,
}

/// A finished grid of cells, ready for printing or for overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    backdrop: Rgb,
}

impl CellGrid {
    /// Creates a grid filled with `backdrop`.
    pub fn blank(cols: usize, rows: usize, backdrop: Rgb) -> Self {
        Self {
            cols,
            rows,
            cells: vec![
                Cell {
                    glyph: Glyph::Pixels,
                    fg: backdrop,
                    bg: backdrop,
                };
                cols * rows
            ],
            backdrop,
        }
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the cell at `(col, row)`.
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        (col < self.cols && row < self.rows).then(|| &self.cells[row * self.cols + col])
    }

    /// Writes `text` starting at `(col, row)`, clipped to the grid.
    ///
    /// With `bg` unset, each character keeps the averaged colour of the
    /// pixels it covers as its background.
    pub fn overlay_text(&mut self, col: usize, row: usize, text: &str, fg: Rgb, bg: Option<Rgb>) {
        if row >= self.rows {
            return;
        }
        let mut x = col;
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            if x + width > self.cols {
                break;
            }
            let index = row * self.cols + x;
            let under = self.cells[index];
            let background = bg.unwrap_or_else(|| match under.glyph {
                Glyph::Pixels => under.fg.blend(under.bg, 0.5),
                Glyph::Char(_) | Glyph::Continuation => under.bg,
            });
            self.cells[index] = Cell {
                glyph: Glyph::Char(ch),
                fg,
                bg: background,
            };
            if width == 2 {
                self.cells[index + 1] = Cell {
                    glyph: Glyph::Continuation,
                    fg,
                    bg: background,
                };
            }
            x += width;
        }
    }

    /// Renders each row with 24-bit colour escape sequences.
    pub fn to_ansi_lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| {
                let mut line = String::with_capacity(row.len() * 4);
                let mut current: Option<(Rgb, Rgb)> = None;
                for cell in row {
                    if cell.glyph == Glyph::Continuation {
                        continue;
                    }
                    if current != Some((cell.fg, cell.bg)) {
                        let Cell { fg, bg, .. } = *cell;
                        let _ = write!(
                            line,
                            "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m",
                            fg.r, fg.g, fg.b, bg.r, bg.g, bg.b
                        );
                        current = Some((cell.fg, cell.bg));
                    }
                    line.push(match cell.glyph {
                        Glyph::Char(ch) => ch,
                        Glyph::Pixels | Glyph::Continuation => UPPER_HALF,
                    });
                }
                line.push_str("\x1b[0m");
                line
            })
            .collect()
    }

    /// Renders each row without colour: pixels that differ from the
    /// backdrop become block characters.
    pub fn to_plain_lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| {
                let line: String = row
                    .iter()
                    .filter_map(|cell| match cell.glyph {
                        Glyph::Char(ch) => Some(ch),
                        Glyph::Continuation => None,
                        Glyph::Pixels => Some(
                            match (cell.fg != self.backdrop, cell.bg != self.backdrop) {
                                (false, false) => ' ',
                                (true, false) => UPPER_HALF,
                                (false, true) => LOWER_HALF,
                                (true, true) => FULL_BLOCK,
                            },
                        ),
                    })
                    .collect();
                line.trim_end().to_owned()
            })
            .collect()
    }
}

/// Rasterising canvas over a `cols` × `rows` terminal area.
///
/// The logical drawing area (1000 × 600 by default) is stretched to fill the
/// pixel grid, which is `cols` pixels wide and `2 * rows` pixels tall.
#[derive(Debug, Clone)]
pub struct CellCanvas {
    cols: usize,
    rows: usize,
    width: f64,
    height: f64,
    pixels: Vec<Rgb>,
    text: Vec<Option<TextCell>>,
    backdrop: Rgb,
    state: GraphicsState,
}

impl CellCanvas {
    /// Creates a canvas covering `cols` × `rows` cells with the default
    /// logical size.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self::with_logical_size(cols, rows, CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    /// Creates a canvas with an explicit logical size.
    pub fn with_logical_size(cols: u16, rows: u16, width: f64, height: f64) -> Self {
        let cols = usize::from(cols);
        let rows = usize::from(rows);
        Self {
            cols,
            rows,
            width,
            height,
            pixels: vec![Rgb::default(); cols * rows * 2],
            text: vec![None; cols * rows],
            backdrop: Rgb::default(),
            state: GraphicsState::default(),
        }
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Colour of the pixel at `(x, y)`; `y` counts half-cells.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.cols && y < self.rows * 2).then(|| self.pixels[y * self.cols + x])
    }

    /// Flattens pixels and text into a printable grid.
    pub fn to_grid(&self) -> CellGrid {
        let mut cells = Vec::with_capacity(self.cols * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let top = self.pixels[(row * 2) * self.cols + col];
                let bottom = self.pixels[(row * 2 + 1) * self.cols + col];
                cells.push(match self.text[row * self.cols + col] {
                    Some(text) => Cell {
                        glyph: text.glyph,
                        fg: text.color,
                        bg: top.blend(bottom, 0.5),
                    },
                    None => Cell {
                        glyph: Glyph::Pixels,
                        fg: top,
                        bg: bottom,
                    },
                });
            }
        }
        CellGrid {
            cols: self.cols,
            rows: self.rows,
            cells,
            backdrop: self.backdrop,
        }
    }

    fn pixel_height(&self) -> usize {
        self.rows * 2
    }

    /// Logical-to-pixel scale factors.
    fn scale(&self) -> (f64, f64) {
        #[expect(clippy::cast_precision_loss, reason = "terminal sizes are small")]
        let (w, h) = (self.cols as f64, self.pixel_height() as f64);
        (w / self.width, h / self.height)
    }

    /// Maps a point through the current transform into pixel space.
    fn to_pixels(&self, p: Point) -> Point {
        let device = self.state.transform().apply(p);
        let (sx, sy) = self.scale();
        Point::new(device.x * sx, device.y * sy)
    }

    fn pixel_length(&self, logical: f64) -> f64 {
        let (sx, sy) = self.scale();
        logical * self.state.transform().scale() * f64::midpoint(sx, sy)
    }

    fn shadow_offset(&self, shadow: &Shadow) -> Vector {
        let (sx, sy) = self.scale();
        Vector::new(shadow.offset.x * sx, shadow.offset.y * sy)
    }

    /// Calls `paint` for every pixel whose centre lies in the clamped box.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "bounds are clamped to the pixel grid"
    )]
    fn for_pixels_in(
        &mut self,
        min: Point,
        max: Point,
        mut inside: impl FnMut(Point) -> bool,
        mut paint: impl FnMut(Rgb) -> Rgb,
    ) {
        let (w, h) = (self.cols, self.pixel_height());
        if w == 0 || h == 0 {
            return;
        }
        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(w);
        let y1 = (max.y.ceil().max(0.0) as usize).min(h);

        for y in y0..y1 {
            for x in x0..x1 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if inside(center) {
                    let index = y * w + x;
                    self.pixels[index] = paint(self.pixels[index]);
                }
            }
        }
    }

    fn fill_polygon(&mut self, corners: &[Point], color: Rgb, alpha: f64) {
        let (min, max) = bounds(corners);
        self.for_pixels_in(
            min,
            max,
            |p| inside_convex(corners, p),
            |under| under.blend(color, alpha),
        );
    }

    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgb, alpha: f64) {
        let r = radius.max(MIN_HALF_WIDTH);
        let pad = Vector::new(r, r);
        self.for_pixels_in(
            center + -pad,
            center + pad,
            |p| (p - center).magnitude() <= r,
            |under| under.blend(color, alpha),
        );
    }

    fn place_text(&mut self, at: Point, text: &str, style: &TextStyle) {
        let (sx, sy) = self.scale();
        let mut anchor = self.state.transform().apply(at);
        if style.baseline == TextBaseline::Alphabetic {
            // Glyphs sit above the baseline.
            anchor.y -= style.size * 0.35;
        }
        let col = anchor.x * sx;
        let row = anchor.y * sy / 2.0;
        let start = match style.align {
            TextAlign::Start => col,
            #[expect(clippy::cast_precision_loss, reason = "label widths are small")]
            TextAlign::Center => col - text.width() as f64 / 2.0,
        };
        if row < 0.0 || start < 0.0 {
            return;
        }

        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (mut x, row) = (start.round() as usize, row.floor() as usize);
        if row >= self.rows {
            return;
        }
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            if x + width > self.cols {
                break;
            }
            let index = row * self.cols + x;
            self.text[index] = Some(TextCell {
                glyph: Glyph::Char(ch),
                color: style.color,
            });
            if width == 2 {
                self.text[index + 1] = Some(TextCell {
                    glyph: Glyph::Continuation,
                    color: style.color,
                });
            }
            x += width;
        }
    }
}

impl Canvas for CellCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgb::default());
        self.text.fill(None);
        self.backdrop = Rgb::default();
        self.state.reset();
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
        let corners = [
            self.to_pixels(origin),
            self.to_pixels(origin + Vector::new(width, 0.0)),
            self.to_pixels(origin + Vector::new(width, height)),
            self.to_pixels(origin + Vector::new(0.0, height)),
        ];

        let covers_surface = self.state.transform().is_axis_aligned()
            && self.state.transform().apply(origin) == Point::origin()
            && width >= self.width
            && height >= self.height;
        if covers_surface {
            self.backdrop = color;
        }

        // Blur is not rasterised; the shadow is a translucent copy.
        if let Some(shadow) = self.state.shadow() {
            let offset = self.shadow_offset(&shadow);
            let shifted = corners.map(|c| c + offset);
            self.fill_polygon(&shifted, shadow.color, shadow.alpha);
        }
        self.fill_polygon(&corners, color, 1.0);
    }

    fn stroke_path(&mut self, points: &[Point], stroke: Stroke) {
        let half = (self.pixel_length(stroke.width) / 2.0).max(MIN_HALF_WIDTH);
        let mapped: Vec<Point> = points.iter().map(|p| self.to_pixels(*p)).collect();
        for segment in mapped.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            let (min, max) = bounds(&[a, b]);
            let pad = Vector::new(half, half);
            self.for_pixels_in(
                min + -pad,
                max + pad,
                |p| distance_to_segment(p, a, b) <= half,
                |_| stroke.color,
            );
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb) {
        let center = self.to_pixels(center);
        let radius = self.pixel_length(radius);
        if let Some(shadow) = self.state.shadow() {
            let offset = self.shadow_offset(&shadow);
            self.fill_disc(center + offset, radius, shadow.color, shadow.alpha);
        }
        self.fill_disc(center, radius, color, 1.0);
    }

    fn fill_text(&mut self, at: Point, text: &str, style: &TextStyle) {
        self.place_text(at, text, style);
    }
}

fn bounds(points: &[Point]) -> (Point, Point) {
    points.iter().fold(
        (
            Point::new(f64::INFINITY, f64::INFINITY),
            Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        ),
        |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        },
    )
}

/// Point-in-polygon for convex polygons of either winding.
fn inside_convex(corners: &[Point], p: Point) -> bool {
    let mut sign = 0.0_f64;
    for (i, a) in corners.iter().enumerate() {
        let b = corners[(i + 1) % corners.len()];
        let edge = b - *a;
        let to_p = p - *a;
        let cross = edge.x.mul_add(to_p.y, -(edge.y * to_p.x));
        if cross.abs() < f64::EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let length_sq = ab.x.mul_add(ab.x, ab.y * ab.y);
    if length_sq == 0.0 {
        return (p - a).magnitude();
    }
    let ap = p - a;
    let t = (ap.x.mul_add(ab.x, ap.y * ab.y) / length_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).magnitude()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BG: Rgb = Rgb::new(240, 249, 255);

    fn canvas() -> CellCanvas {
        CellCanvas::with_logical_size(10, 5, 10.0, 10.0)
    }

    #[test]
    fn background_fill_sets_backdrop() {
        let mut c = canvas();
        c.fill_rect(Point::origin(), 10.0, 10.0, BG);
        let grid = c.to_grid();

        assert_eq!(grid.cell(0, 0).map(|cell| cell.fg), Some(BG));
        assert!(grid.to_plain_lines().iter().all(String::is_empty));
    }

    #[test]
    fn rect_fills_expected_pixels() {
        let mut c = canvas();
        c.fill_rect(Point::origin(), 10.0, 10.0, BG);
        // Logical 10x10 onto 10x10 pixels: one pixel per unit.
        c.fill_rect(Point::new(2.0, 2.0), 3.0, 3.0, RED);

        assert_eq!(c.pixel(1, 1), Some(BG));
        assert_eq!(c.pixel(2, 2), Some(RED));
        assert_eq!(c.pixel(4, 4), Some(RED));
        assert_eq!(c.pixel(5, 5), Some(BG));
    }

    #[test]
    fn stroke_has_minimum_thickness() {
        let mut c = canvas();
        c.fill_rect(Point::origin(), 10.0, 10.0, BG);
        c.stroke_path(
            &[Point::new(0.0, 4.5), Point::new(10.0, 4.5)],
            Stroke::new(RED, 0.01),
        );

        for x in 0..10 {
            assert_eq!(c.pixel(x, 4), Some(RED));
        }
        assert_eq!(c.pixel(3, 6), Some(BG));
    }

    #[test]
    fn rotated_rect_is_filled() {
        let mut c = canvas();
        c.translate(Vector::new(5.0, 5.0));
        c.rotate(std::f64::consts::FRAC_PI_4);
        c.fill_rect(Point::new(-2.0, -2.0), 4.0, 4.0, RED);

        assert_eq!(c.pixel(5, 5), Some(RED));
        assert_eq!(c.pixel(0, 0), Some(Rgb::default()));
    }

    #[test]
    fn shadow_is_blended_under_shape() {
        let mut c = canvas();
        c.fill_rect(Point::origin(), 10.0, 10.0, Rgb::WHITE);
        c.set_shadow(Some(Shadow {
            color: Rgb::BLACK,
            alpha: 0.5,
            blur: 0.0,
            offset: Vector::new(2.0, 0.0),
        }));
        c.fill_rect(Point::new(0.0, 0.0), 4.0, 4.0, RED);

        assert_eq!(c.pixel(1, 1), Some(RED));
        assert_eq!(c.pixel(5, 1), Some(Rgb::new(128, 128, 128)));
    }

    #[test]
    fn centered_text_lands_on_grid() {
        let mut c = canvas();
        c.fill_text(
            Point::new(5.0, 5.0),
            "1kg",
            &TextStyle {
                color: Rgb::WHITE,
                size: 1.0,
                family: "Arial",
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
            },
        );
        let lines = c.to_grid().to_plain_lines();
        assert_eq!(lines[2].trim(), "1kg");
    }

    #[test]
    fn overlay_clips_at_edge() {
        let mut grid = CellGrid::blank(4, 1, BG);
        grid.overlay_text(2, 0, "hello", Rgb::BLACK, None);
        assert_eq!(grid.to_plain_lines(), vec!["  he".to_owned()]);
    }

    #[test]
    fn overlay_wide_characters() {
        let mut grid = CellGrid::blank(6, 1, BG);
        grid.overlay_text(0, 0, "日本", Rgb::BLACK, Some(Rgb::WHITE));
        assert_eq!(grid.cell(1, 0).map(|c| c.glyph), Some(Glyph::Continuation));
        assert_eq!(grid.to_plain_lines(), vec!["日本".to_owned()]);
    }

    #[test]
    fn ansi_lines_reset_at_end() {
        let grid = CellGrid::blank(3, 2, BG);
        let lines = grid.to_ansi_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\x1b[38;2;240;249;255m"));
        assert!(lines[0].ends_with("▀▀▀\x1b[0m"));
    }
}
