//! Integration tests for the scene renderer.
//!
//! The renderer is exercised through [`RecordingCanvas`], which keeps every
//! call in device coordinates, and spot-checked through the SVG and cell
//! backends.

use incline::{Point, SURFACE_LENGTH, Surface};
use slipway::render::{
    ANCHOR_Y, BACKGROUND, BLOCK_COLOR, CANVAS_HEIGHT, CANVAS_WIDTH, CellCanvas, DrawOp,
    FRICTION_COLOR, GRAVITY_COLOR, NORMAL_COLOR, RecordingCanvas, SvgCanvas, Texture, Viewport,
    render_scene, surface_style,
};
use slipway::simulation::SimulationState;

const EPS: f64 = 1e-9;

// =============================================================================
// HELPERS
// =============================================================================

fn state(surface: Surface, mass: f64, angle: f64) -> SimulationState {
    SimulationState::new(surface, mass, angle).unwrap()
}

fn running(mut state: SimulationState, position: f64, velocity: f64) -> SimulationState {
    state.is_running = true;
    state.position = position;
    state.velocity = velocity;
    state
}

fn record(state: &SimulationState) -> RecordingCanvas {
    let mut canvas = RecordingCanvas::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    render_scene(state, &mut canvas);
    canvas
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
}

fn length(points: &[Point]) -> f64 {
    let (a, b) = (points[0], points[1]);
    (b - a).magnitude()
}

fn anchor() -> Point {
    Point::new(CANVAS_WIDTH / 6.0, ANCHOR_Y)
}

// =============================================================================
// BACKGROUND AND INCLINE
// =============================================================================

#[test]
fn clears_then_fills_background() {
    let canvas = record(&SimulationState::default());
    let ops = canvas.ops();

    assert_eq!(ops[0], DrawOp::Clear);
    match &ops[1] {
        DrawOp::FillQuad {
            corners,
            color,
            shadow,
        } => {
            assert_eq!(*color, BACKGROUND);
            assert!(shadow.is_none());
            assert!(close(corners[0], Point::new(0.0, 0.0)));
            assert!(close(corners[2], Point::new(CANVAS_WIDTH, CANVAS_HEIGHT)));
        }
        other => panic!("expected background fill, got {other:?}"),
    }
}

#[test]
fn incline_runs_from_anchor_at_the_angle() {
    for surface in Surface::ALL {
        let canvas = record(&state(surface, 1.0, 30.0));
        let style = surface_style(surface);
        let track = canvas.strokes_in(style.stroke);
        let line = track[0];

        let angle = 30f64.to_radians();
        let end = Point::new(
            anchor().x + SURFACE_LENGTH * angle.cos(),
            anchor().y + SURFACE_LENGTH * angle.sin(),
        );
        assert!(close(line[0], anchor()), "{surface}");
        assert!(close(line[1], end), "{surface}");
    }
}

#[test]
fn textures_follow_the_surface() {
    let wood = record(&state(Surface::Wood, 1.0, 15.0));
    let Texture::Hatch(hatch) = surface_style(Surface::Wood).texture else {
        panic!("wood is hatched");
    };
    let marks = wood.strokes_in(hatch);
    assert_eq!(marks.len(), 34);
    for mark in marks {
        assert!((mark[0].x - mark[1].x).abs() < EPS, "hatch marks are vertical");
        assert!((length(mark) - 20.0).abs() < EPS);
    }

    let metal = record(&state(Surface::Metal, 1.0, 15.0));
    let dots = metal
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::FillCircle { radius, .. } if (*radius - 3.0).abs() < EPS))
        .count();
    assert_eq!(dots, 34);

    for surface in [Surface::Ice, Surface::Rubber, Surface::Concrete] {
        let canvas = record(&state(surface, 1.0, 15.0));
        assert!(
            !canvas
                .ops()
                .iter()
                .any(|op| matches!(op, DrawOp::FillCircle { .. })),
            "{surface}"
        );
        // Only the track itself is stroked when idle.
        let strokes = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Stroke { .. }))
            .count();
        assert_eq!(strokes, 1, "{surface}");
    }
}

// =============================================================================
// BLOCK
// =============================================================================

#[test]
fn block_sits_above_the_projected_position() {
    let canvas = record(&running(state(Surface::Ice, 1.0, 0.0), 100.0, 1.0));
    let quad = canvas
        .ops()
        .iter()
        .find_map(|op| match op {
            DrawOp::FillQuad {
                corners,
                color,
                shadow,
            } if *color == BLOCK_COLOR => Some((corners, shadow)),
            _ => None,
        })
        .unwrap();

    let (corners, shadow) = quad;
    assert!(close(corners[0], Point::new(anchor().x + 100.0, ANCHOR_Y - 50.0)));
    assert!(close(corners[2], Point::new(anchor().x + 140.0, ANCHOR_Y - 10.0)));
    assert!(shadow.is_some());
}

#[test]
fn block_and_label_rotate_with_the_incline() {
    let canvas = record(&state(Surface::Wood, 2.5, 20.0));
    match canvas.find_text("2.5kg") {
        Some(DrawOp::Text { rotation, .. }) => {
            assert!((rotation - 20f64.to_radians()).abs() < 1e-12);
        }
        other => panic!("expected the mass label, got {other:?}"),
    }
    assert_eq!(canvas.save_depth(), 0);
}

// =============================================================================
// FORCE VECTORS
// =============================================================================

#[test]
fn idle_scene_has_no_vectors() {
    let canvas = record(&state(Surface::Ice, 1.0, 30.0));
    assert!(canvas.strokes_in(GRAVITY_COLOR).is_empty());
    assert!(canvas.strokes_in(NORMAL_COLOR).is_empty());
    assert!(canvas.strokes_in(FRICTION_COLOR).is_empty());
    assert_eq!(canvas.texts(), vec!["1kg"]);
}

#[test]
fn vectors_are_scaled_forces_from_the_block_centre() {
    let s = running(state(Surface::Wood, 2.0, 30.0), 0.0, 0.5);
    let canvas = record(&s);
    let center = Point::new(anchor().x + 20.0, ANCHOR_Y - 30.0);

    let gravity = canvas.strokes_in(GRAVITY_COLOR)[0];
    assert!(close(gravity[0], center));
    assert!(close(gravity[1], Point::new(center.x, center.y + s.gravity_force * 2.0)));

    let normal = canvas.strokes_in(NORMAL_COLOR)[0];
    assert!(close(normal[0], center));
    assert!((length(normal) - s.normal_force * 2.0).abs() < 1e-9);
    assert!(normal[1].y < center.y, "normal points away from the incline");

    let friction = canvas.strokes_in(FRICTION_COLOR)[0];
    assert!((length(friction) - s.friction_force * 4.0).abs() < 1e-9);
    assert!(friction[1].x < center.x, "friction points up the incline");

    // Shaft plus a two-barbed head per arrow.
    assert_eq!(canvas.strokes_in(GRAVITY_COLOR).len(), 2);
    assert_eq!(canvas.texts(), vec!["2kg", "G", "N", "Ff"]);
}

#[test]
fn friction_is_hidden_when_nothing_moves() {
    let held = running(state(Surface::Rubber, 1.0, 10.0), 0.0, 0.0);
    assert_eq!(held.acceleration, 0.0);

    let canvas = record(&held);
    assert!(canvas.strokes_in(FRICTION_COLOR).is_empty());
    assert_eq!(canvas.texts(), vec!["1kg", "G", "N"]);
}

#[test]
fn rendering_is_idempotent() {
    let s = running(state(Surface::Metal, 4.0, 22.0), 321.0, 2.0);
    let mut canvas = RecordingCanvas::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    render_scene(&s, &mut canvas);
    let first = canvas.ops().to_vec();
    render_scene(&s, &mut canvas);
    assert_eq!(canvas.ops(), first.as_slice());
}

// =============================================================================
// BACKENDS
// =============================================================================

#[test]
fn detached_viewport_is_a_no_op() {
    let mut viewport = Viewport::<SvgCanvas>::detached();
    assert!(!viewport.draw(&SimulationState::default()));
}

#[test]
fn svg_contains_the_scene() {
    let mut viewport = Viewport::attached(SvgCanvas::new(CANVAS_WIDTH, CANVAS_HEIGHT));
    assert!(viewport.draw(&running(state(Surface::Wood, 1.0, 25.0), 50.0, 1.0)));
    let svg = viewport.surface().unwrap().finish();

    assert!(svg.contains("<svg"));
    assert!(svg.contains("#f0f9ff"));
    assert!(svg.contains("#a47551"));
    assert!(svg.contains("#e74c3c"));
    assert!(svg.contains("filter=\"url(#shadow"));
    assert!(svg.contains(">1kg</text>"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn cell_canvas_paints_background_and_block() {
    let mut viewport = Viewport::attached(CellCanvas::new(100, 30));
    viewport.draw(&state(Surface::Ice, 1.0, 0.0));
    let canvas = viewport.surface().unwrap();

    assert_eq!(canvas.pixel(99, 59), Some(BACKGROUND));
    // Block spans x 166..206 and y 150..190 in logical units; 10 units per
    // pixel across, 10 units per pixel down.
    assert_eq!(canvas.pixel(18, 16), Some(BLOCK_COLOR));
    assert_eq!(canvas.pixel(100, 0), None);
}
