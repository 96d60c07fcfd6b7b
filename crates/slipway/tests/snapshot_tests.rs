//! Snapshot tests for the text panels.
//!
//! # Running
//!
//! ```bash
//! cargo test -p slipway --test snapshot_tests
//!
//! # Update snapshots:
//! cargo insta test -p slipway --test snapshot_tests
//! cargo insta review
//! ```

use incline::Surface;
use slipway::panels::{controls_panel, values_text};
use slipway::simulation::SimulationState;

// =============================================================================
// VALUES
// =============================================================================

#[test]
fn snapshot_values_default() {
    let state = SimulationState::default();
    insta::assert_snapshot!(values_text(&state), @r"
    Surface:                     wood
    Mass (m):                 1.00 kg
    Angle (α):                  0.00°
    Friction coeff. (μ):         0.30
    ─────────────────────────────────
    Gravity (G):               9.80 N
    Normal force (N):          9.80 N
    Friction force (Ff):       2.94 N
    Net force (F):             0.00 N
    ─────────────────────────────────
    Acceleration (a):       0.00 m/s²
    Velocity (v):            0.00 m/s
    ");
}

#[test]
fn snapshot_values_ice_at_thirty_degrees() {
    let state = SimulationState::new(Surface::Ice, 1.0, 30.0).unwrap();
    insta::assert_snapshot!(values_text(&state), @r"
    Surface:                      ice
    Mass (m):                 1.00 kg
    Angle (α):                 30.00°
    Friction coeff. (μ):         0.05
    ─────────────────────────────────
    Gravity (G):               9.80 N
    Normal force (N):          8.49 N
    Friction force (Ff):       0.42 N
    Net force (F):             4.48 N
    ─────────────────────────────────
    Acceleration (a):       4.48 m/s²
    Velocity (v):            0.00 m/s
    ");
}

// =============================================================================
// CONTROLS
// =============================================================================

#[test]
fn snapshot_controls_idle() {
    let panel = controls_panel(&SimulationState::default());
    insta::assert_snapshot!(panel.render().join("\n"), @r"
    ╭─ Controls ───────────────────────╮
    │ Surface  wood (μ = 0.3)      s/S │
    │ Mass     1.0 kg              -/+ │
    │ Angle    0°                  [/] │
    │ space Start   r Reset            │
    ╰──────────────────────────────────╯
    ");
}
