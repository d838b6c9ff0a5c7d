use nalgebra::Vector3;

use crate::config::{LanderParams, PlanetParams};
use crate::dynamics::state::BodyState;

/// Drag on the bare lander body: quadratic in speed, opposing velocity.
pub fn body_drag(vel: &Vector3<f64>, density: f64, lander: &LanderParams) -> Vector3<f64> {
    let speed = vel.norm();
    if speed > 0.0 {
        let drag_mag = 0.5 * density * lander.drag_coef_lander * lander.body_area() * speed * speed;
        -vel / speed * drag_mag
    } else {
        Vector3::zeros()
    }
}

/// Extra drag from a deployed canopy: linear in speed, opposing velocity.
pub fn chute_drag(vel: &Vector3<f64>, density: f64, lander: &LanderParams) -> Vector3<f64> {
    let speed = vel.norm();
    if speed > 0.0 {
        let drag_mag = 0.5 * density * lander.drag_coef_chute * lander.chute_area() * speed;
        -vel / speed * drag_mag
    } else {
        Vector3::zeros()
    }
}

/// Peak structural load on the canopy if it opened now (dynamic pressure
/// times canopy area), N.
pub fn canopy_load(vel: &Vector3<f64>, density: f64, lander: &LanderParams) -> f64 {
    0.5 * density * lander.drag_coef_chute * lander.chute_area() * vel.norm_squared()
}

/// Whether a canopy would survive at the current state.
///
/// It tears off above the load limit, or above the speed limit anywhere
/// inside the atmosphere.
pub fn safe_to_deploy_parachute(
    state: &BodyState,
    density: f64,
    lander: &LanderParams,
    planet: &PlanetParams,
) -> bool {
    let too_much_drag = canopy_load(&state.velocity, density, lander) > lander.max_parachute_drag;
    let too_fast = state.velocity.norm() > lander.max_parachute_speed
        && state.altitude(planet.radius) < planet.exosphere;
    !(too_much_drag || too_fast)
}
