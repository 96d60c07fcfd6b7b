#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::suboptimal_flops)]

use incline::{
    Forces, GRAVITY, Kinematics, MAX_DELTA_TIME, STOP_POSITION, SURFACE_LENGTH, Surface,
    degrees_to_radians, integrate_step,
};
use proptest::prelude::*;

fn any_surface() -> impl Strategy<Value = Surface> {
    prop::sample::select(Surface::ALL.to_vec())
}

// =============================================================================
// Force properties
// =============================================================================

proptest! {
    #[test]
    fn friction_at_least_tan_alpha_holds_block(
        angle in 0.0f64..=30.0,
        mass in 0.1f64..=10.0,
        excess in 0.0f64..2.0,
    ) {
        // Small relative bump keeps rounding from tipping the comparison
        let mu = degrees_to_radians(angle).tan() * (1.0 + 1e-9) + excess;
        let forces = Forces::compute(mass, angle, mu);

        prop_assert_eq!(forces.net, 0.0);
        prop_assert_eq!(forces.acceleration, 0.0);
    }

    #[test]
    fn normal_and_friction_follow_formulas_exactly(
        mass in 0.1f64..=10.0,
        angle in 0.0f64..=30.0,
        mu in 0.0f64..2.0,
    ) {
        let forces = Forces::compute(mass, angle, mu);
        let angle_rad = angle * std::f64::consts::PI / 180.0;
        let normal = mass * 9.8 * angle_rad.cos();

        prop_assert_eq!(forces.normal, normal);
        prop_assert_eq!(forces.friction, mu * normal);
        prop_assert_eq!(forces.gravity, mass * GRAVITY);
    }

    #[test]
    fn net_force_never_negative(
        mass in 0.1f64..=10.0,
        angle in 0.0f64..=30.0,
        surface in any_surface(),
    ) {
        let forces = Forces::compute(mass, angle, surface.friction_coefficient());

        prop_assert!(forces.net >= 0.0);
        prop_assert!(forces.acceleration >= 0.0);
        if forces.net > 0.0 {
            prop_assert!((forces.acceleration * mass - forces.net).abs() < 1e-9);
        }
    }
}

// =============================================================================
// Integration properties
// =============================================================================

proptest! {
    #[test]
    fn position_is_monotonic_while_sliding_forward(
        position in 0.0f64..=SURFACE_LENGTH,
        velocity in 0.0f64..50.0,
        acceleration in 0.0f64..10.0,
        dt in 0.0f64..1.0,
    ) {
        let step = integrate_step(Kinematics::new(position, velocity), acceleration, dt);
        prop_assert!(
            step.kinematics.position >= position,
            "moved backward: {} -> {}",
            position,
            step.kinematics.position
        );
    }

    #[test]
    fn position_stays_on_track(
        position in 0.0f64..=SURFACE_LENGTH,
        velocity in -500.0f64..500.0,
        acceleration in -50.0f64..50.0,
        dt in -1.0f64..10.0,
    ) {
        let step = integrate_step(Kinematics::new(position, velocity), acceleration, dt);

        prop_assert!(step.kinematics.position >= 0.0);
        prop_assert!(step.kinematics.position <= SURFACE_LENGTH);
        prop_assert!(step.delta_time <= MAX_DELTA_TIME);
        prop_assert!(step.delta_time >= 0.0);
    }

    #[test]
    fn termination_matches_stop_position(
        position in 600.0f64..=SURFACE_LENGTH,
        velocity in 0.0f64..20.0,
        dt in 0.0f64..0.1,
    ) {
        let step = integrate_step(Kinematics::new(position, velocity), 0.0, dt);
        let raw = position + velocity * dt * 50.0;

        prop_assert_eq!(step.terminated, raw >= STOP_POSITION);
    }
}
