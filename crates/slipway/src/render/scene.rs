//! The simulator scene: background, textured incline, block and force arrows.

use std::f64::consts::FRAC_PI_6;

use incline::{InclineGeometry, Point, SURFACE_LENGTH, Surface, Vector};

use super::{Canvas, Rgb, Shadow, Stroke, TextAlign, TextBaseline, TextStyle};
use crate::simulation::SimulationState;

/// Logical width of the drawing surface.
pub const CANVAS_WIDTH: f64 = 1000.0;
/// Logical height of the drawing surface.
pub const CANVAS_HEIGHT: f64 = 600.0;
/// Y coordinate of the top of the incline.
pub const ANCHOR_Y: f64 = 200.0;
/// Scene background.
pub const BACKGROUND: Rgb = Rgb::hex(0xf0f9ff);
/// Stroke width of the incline.
pub const TRACK_WIDTH: f64 = 20.0;
/// Side of the square block.
pub const BLOCK_SIZE: f64 = 40.0;
/// Block fill.
pub const BLOCK_COLOR: Rgb = Rgb::hex(0xe74c3c);
/// Gravity arrow colour.
pub const GRAVITY_COLOR: Rgb = Rgb::hex(0x2c3e50);
/// Normal force arrow colour.
pub const NORMAL_COLOR: Rgb = Rgb::hex(0x3498db);
/// Friction arrow colour.
pub const FRICTION_COLOR: Rgb = Rgb::hex(0xe67e22);
/// Drawing units per newton for the gravity arrow.
pub const GRAVITY_SCALE: f64 = 2.0;
/// Drawing units per newton for the normal arrow.
pub const NORMAL_SCALE: f64 = 2.0;
/// Drawing units per newton for the friction arrow.
pub const FRICTION_SCALE: f64 = 4.0;

const BLOCK_LIFT: f64 = 50.0;
const TEXTURE_SPACING: usize = 20;
const HATCH_HALF_LENGTH: f64 = 10.0;
const DOT_RADIUS: f64 = 3.0;
const ARROW_WIDTH: f64 = 2.0;
const ARROW_HEAD: f64 = 10.0;
const LABEL_FONT: &str = "Montserrat";
const FONT: &str = "Arial";

/// Decoration drawn along the incline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Texture {
    /// No marks.
    Plain,
    /// Short perpendicular strokes.
    Hatch(Rgb),
    /// Small filled dots.
    Dots(Rgb),
}

/// How a surface is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceStyle {
    /// Colour of the incline stroke.
    pub stroke: Rgb,
    /// Marks drawn on top of the stroke.
    pub texture: Texture,
}

/// Returns the drawing style of `surface`.
pub const fn surface_style(surface: Surface) -> SurfaceStyle {
    match surface {
        Surface::Ice => SurfaceStyle {
            stroke: Rgb::hex(0xcdf5fd),
            texture: Texture::Plain,
        },
        Surface::Wood => SurfaceStyle {
            stroke: Rgb::hex(0xa47551),
            texture: Texture::Hatch(Rgb::hex(0x7d5738)),
        },
        Surface::Metal => SurfaceStyle {
            stroke: Rgb::hex(0xb4b4b8),
            texture: Texture::Dots(Rgb::hex(0xd8d8d8)),
        },
        Surface::Rubber => SurfaceStyle {
            stroke: Rgb::hex(0x3a3a3a),
            texture: Texture::Plain,
        },
        Surface::Concrete => SurfaceStyle {
            stroke: Rgb::hex(0x8b8b8b),
            texture: Texture::Plain,
        },
    }
}

/// Draws the whole scene for `state`. Calling it twice with the same state
/// produces the same picture.
pub fn render_scene<C: Canvas + ?Sized>(state: &SimulationState, canvas: &mut C) {
    canvas.clear();
    let (width, height) = (canvas.width(), canvas.height());
    canvas.fill_rect(Point::origin(), width, height, BACKGROUND);

    let track = InclineGeometry::new(Point::new(width / 6.0, ANCHOR_Y), state.angle_degrees);
    draw_incline(canvas, &track, surface_style(state.surface));

    let object = track.point_at(state.position);
    draw_block(canvas, &track, object, state.mass);

    if state.is_running {
        draw_force_vectors(canvas, &track, object, state);
    }
}

fn draw_incline<C: Canvas + ?Sized>(canvas: &mut C, track: &InclineGeometry, style: SurfaceStyle) {
    canvas.stroke_path(
        &[track.anchor(), track.end()],
        Stroke::new(style.stroke, TRACK_WIDTH),
    );

    // Marks sit on the centre line but are drawn in screen axes.
    match style.texture {
        Texture::Plain => {}
        Texture::Hatch(color) => {
            for at in texture_offsets().map(|i| track.point_at(i)) {
                canvas.stroke_path(
                    &[
                        at + Vector::new(0.0, -HATCH_HALF_LENGTH),
                        at + Vector::new(0.0, HATCH_HALF_LENGTH),
                    ],
                    Stroke::new(color, 1.0),
                );
            }
        }
        Texture::Dots(color) => {
            for at in texture_offsets().map(|i| track.point_at(i)) {
                canvas.fill_circle(at, DOT_RADIUS, color);
            }
        }
    }
}

#[expect(clippy::cast_precision_loss, reason = "offsets are small integers")]
fn texture_offsets() -> impl Iterator<Item = f64> {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let end = SURFACE_LENGTH as usize;
    (TEXTURE_SPACING..end)
        .step_by(TEXTURE_SPACING)
        .map(|i| i as f64)
}

fn draw_block<C: Canvas + ?Sized>(
    canvas: &mut C,
    track: &InclineGeometry,
    object: Point,
    mass: f64,
) {
    canvas.save();
    canvas.translate(object - Point::origin());
    canvas.rotate(track.angle_rad());

    canvas.set_shadow(Some(Shadow {
        color: Rgb::BLACK,
        alpha: 0.3,
        blur: 5.0,
        offset: Vector::new(2.0, 2.0),
    }));
    canvas.fill_rect(Point::new(0.0, -BLOCK_LIFT), BLOCK_SIZE, BLOCK_SIZE, BLOCK_COLOR);

    canvas.fill_text(
        Point::new(BLOCK_SIZE / 2.0, -BLOCK_LIFT + BLOCK_SIZE / 2.0),
        &mass_label(mass),
        &TextStyle {
            color: Rgb::WHITE,
            size: 12.0,
            family: LABEL_FONT,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        },
    );
    canvas.restore();
}

/// Block label; whole masses print without a fraction (`1kg`, `2.5kg`).
fn mass_label(mass: f64) -> String {
    format!("{mass}kg")
}

fn draw_force_vectors<C: Canvas + ?Sized>(
    canvas: &mut C,
    track: &InclineGeometry,
    object: Point,
    state: &SimulationState,
) {
    // Arrows start at the block centre, measured in screen axes.
    let center = object + Vector::new(BLOCK_SIZE / 2.0, -BLOCK_LIFT + BLOCK_SIZE / 2.0);

    draw_arrow(
        canvas,
        center,
        center + Vector::new(0.0, state.gravity_force * GRAVITY_SCALE),
        GRAVITY_COLOR,
        "G",
    );
    draw_arrow(
        canvas,
        center,
        center + track.normal() * (state.normal_force * NORMAL_SCALE),
        NORMAL_COLOR,
        "N",
    );

    let moving = state.velocity != 0.0 || state.acceleration != 0.0;
    if moving {
        draw_arrow(
            canvas,
            center,
            center + -track.direction() * (state.friction_force * FRICTION_SCALE),
            FRICTION_COLOR,
            "Ff",
        );
    }
}

fn draw_arrow<C: Canvas + ?Sized>(canvas: &mut C, from: Point, to: Point, color: Rgb, label: &str) {
    let stroke = Stroke::new(color, ARROW_WIDTH);
    canvas.stroke_path(&[from, to], stroke);

    let heading = (to.y - from.y).atan2(to.x - from.x);
    let barb = |offset: f64| to + -Vector::from_angle(heading + offset) * ARROW_HEAD;
    canvas.stroke_path(&[barb(-FRAC_PI_6), to, barb(FRAC_PI_6)], stroke);

    canvas.fill_text(
        Point::new(to.x + 10.0, to.y),
        label,
        &TextStyle {
            color,
            size: 14.0,
            family: FONT,
            align: TextAlign::Start,
            baseline: TextBaseline::Alphabetic,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_surface_has_a_style() {
        for surface in Surface::ALL {
            let style = surface_style(surface);
            assert_ne!(style.stroke, BACKGROUND);
        }
        assert_eq!(surface_style(Surface::Wood).texture, Texture::Hatch(Rgb::hex(0x7d5738)));
        assert_eq!(surface_style(Surface::Metal).texture, Texture::Dots(Rgb::hex(0xd8d8d8)));
        assert_eq!(surface_style(Surface::Ice).texture, Texture::Plain);
    }

    #[test]
    fn texture_marks_every_twenty_units() {
        let offsets: Vec<f64> = texture_offsets().collect();
        assert_eq!(offsets.first(), Some(&20.0));
        assert_eq!(offsets.last(), Some(&680.0));
        assert_eq!(offsets.len(), 34);
    }

    #[test]
    fn mass_label_drops_trailing_zero() {
        assert_eq!(mass_label(1.0), "1kg");
        assert_eq!(mass_label(2.5), "2.5kg");
        assert_eq!(mass_label(0.1), "0.1kg");
    }
}
