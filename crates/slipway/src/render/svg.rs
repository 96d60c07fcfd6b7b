//! SVG backend used for snapshots.

use std::fmt::Write;

use incline::{Point, Vector};

use super::transform::{Affine, GraphicsState};
use super::{Canvas, Rgb, Shadow, Stroke, TextAlign, TextBaseline, TextStyle};

/// Builds an SVG 1.1 document from canvas calls.
///
/// Each element carries the transform that was current when it was drawn.
/// Drop shadows become filters in `<defs>`, applied through an untransformed
/// group so the shadow offset stays in screen axes.
///
/// # Example
///
/// ```rust
/// use slipway::render::{render_scene, SvgCanvas};
/// use slipway::simulation::SimulationState;
///
/// let mut canvas = SvgCanvas::new(1000.0, 600.0);
/// render_scene(&SimulationState::default(), &mut canvas);
/// let svg = canvas.finish();
///
/// assert!(svg.starts_with("<?xml"));
/// assert!(svg.contains("1kg"));
/// ```
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    state: GraphicsState,
    body: String,
    filters: Vec<Shadow>,
}

impl SvgCanvas {
    /// Creates an empty document of the given logical size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            state: GraphicsState::default(),
            body: String::new(),
            filters: Vec::new(),
        }
    }

    /// Completes the document and returns its text.
    pub fn finish(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 512);
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = num(self.width),
            h = num(self.height),
        );

        if !self.filters.is_empty() {
            out.push_str("<defs>\n");
            for (id, shadow) in self.filters.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "<filter id=\"shadow{id}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\">\
<feGaussianBlur in=\"SourceAlpha\" stdDeviation=\"{blur}\"/>\
<feOffset dx=\"{dx}\" dy=\"{dy}\" result=\"offset\"/>\
<feFlood flood-color=\"{color}\" flood-opacity=\"{alpha}\"/>\
<feComposite in2=\"offset\" operator=\"in\"/>\
<feMerge><feMergeNode/><feMergeNode in=\"SourceGraphic\"/></feMerge></filter>",
                    blur = num(shadow.blur / 2.0),
                    dx = num(shadow.offset.x),
                    dy = num(shadow.offset.y),
                    color = shadow.color,
                    alpha = num(shadow.alpha),
                );
            }
            out.push_str("</defs>\n");
        }

        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }

    fn filter_id(&mut self, shadow: Shadow) -> usize {
        if let Some(id) = self.filters.iter().position(|s| *s == shadow) {
            return id;
        }
        self.filters.push(shadow);
        self.filters.len() - 1
    }

    /// Opens a shadow group when a shadow is set; returns whether one was opened.
    fn open_shadow(&mut self) -> bool {
        match self.state.shadow() {
            Some(shadow) => {
                let id = self.filter_id(shadow);
                let _ = write!(self.body, "<g filter=\"url(#shadow{id})\">");
                true
            }
            None => false,
        }
    }

    fn close_shadow(&mut self, opened: bool) {
        if opened {
            self.body.push_str("</g>");
        }
    }
}

impl Canvas for SvgCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.body.clear();
        self.filters.clear();
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
        let opened = self.open_shadow();
        let _ = write!(
            self.body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{color}\"{}/>",
            num(origin.x),
            num(origin.y),
            num(width),
            num(height),
            transform_attr(self.state.transform()),
        );
        self.close_shadow(opened);
        self.body.push('\n');
    }

    fn stroke_path(&mut self, points: &[Point], stroke: Stroke) {
        if points.len() < 2 {
            return;
        }
        let coords = points
            .iter()
            .map(|p| format!("{},{}", num(p.x), num(p.y)))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            self.body,
            "<polyline points=\"{coords}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"{}/>",
            stroke.color,
            num(stroke.width),
            transform_attr(self.state.transform()),
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgb) {
        let opened = self.open_shadow();
        let _ = write!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{color}\"{}/>",
            num(center.x),
            num(center.y),
            num(radius),
            transform_attr(self.state.transform()),
        );
        self.close_shadow(opened);
        self.body.push('\n');
    }

    fn fill_text(&mut self, at: Point, text: &str, style: &TextStyle) {
        let anchor = match style.align {
            TextAlign::Start => "start",
            TextAlign::Center => "middle",
        };
        let baseline = match style.baseline {
            TextBaseline::Alphabetic => "alphabetic",
            TextBaseline::Middle => "middle",
        };
        let opened = self.open_shadow();
        let _ = write!(
            self.body,
            "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-family=\"{}\" font-size=\"{}\" text-anchor=\"{anchor}\" dominant-baseline=\"{baseline}\"{}>{}</text>",
            num(at.x),
            num(at.y),
            style.color,
            style.family,
            num(style.size),
            transform_attr(self.state.transform()),
            escape(text),
        );
        self.close_shadow(opened);
        self.body.push('\n');
    }
}

fn transform_attr(t: &Affine) -> String {
    if *t == Affine::IDENTITY {
        String::new()
    } else {
        format!(
            " transform=\"matrix({} {} {} {} {} {})\"",
            num(t.a),
            num(t.b),
            num(t.c),
            num(t.d),
            num(t.e),
            num(t.f)
        )
    }
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
fn num(value: f64) -> String {
    let text = format!("{value:.3}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_owned(),
        other => other.to_owned(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_trims_trailing_zeros() {
        assert_eq!(num(20.0), "20");
        assert_eq!(num(166.666_666), "166.667");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.000_1), "0");
    }

    #[test]
    fn escape_markup() {
        assert_eq!(escape("a<b & \"c\">"), "a&lt;b &amp; &quot;c&quot;&gt;");
    }

    #[test]
    fn rect_without_transform_has_no_attribute() {
        let mut canvas = SvgCanvas::new(100.0, 50.0);
        canvas.fill_rect(Point::origin(), 100.0, 50.0, Rgb::hex(0xf0f9ff));
        let svg = canvas.finish();

        assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"100\" height=\"50\" fill=\"#f0f9ff\"/>"));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn shadows_share_one_filter() {
        let shadow = Shadow {
            color: Rgb::BLACK,
            alpha: 0.3,
            blur: 5.0,
            offset: Vector::new(2.0, 2.0),
        };
        let mut canvas = SvgCanvas::new(100.0, 100.0);
        canvas.set_shadow(Some(shadow));
        canvas.fill_rect(Point::origin(), 10.0, 10.0, Rgb::WHITE);
        canvas.fill_rect(Point::new(20.0, 0.0), 10.0, 10.0, Rgb::WHITE);
        let svg = canvas.finish();

        assert_eq!(svg.matches("<filter").count(), 1);
        assert_eq!(svg.matches("url(#shadow0)").count(), 2);
        assert!(svg.contains("flood-opacity=\"0.3\""));
    }

    #[test]
    fn rotated_elements_carry_matrix() {
        let mut canvas = SvgCanvas::new(100.0, 100.0);
        canvas.save();
        canvas.translate(Vector::new(10.0, 20.0));
        canvas.rotate(std::f64::consts::FRAC_PI_2);
        canvas.fill_rect(Point::origin(), 5.0, 5.0, Rgb::BLACK);
        canvas.restore();
        canvas.fill_rect(Point::origin(), 5.0, 5.0, Rgb::BLACK);
        let svg = canvas.finish();

        assert!(svg.contains("transform=\"matrix(0 1 -1 0 10 20)\""));
        assert_eq!(svg.matches("transform=").count(), 1);
    }
}
