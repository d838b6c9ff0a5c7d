pub mod state;

use nalgebra::Vector3;

use crate::config::{LanderParams, PlanetParams};
use crate::error::SimError;
use crate::physics::{aerodynamics, gravity};
use state::{BodyState, ParachuteStatus};

// ---------------------------------------------------------------------------
// Force model (3DOF point mass)
// ---------------------------------------------------------------------------

/// Quantities the force model takes from outside collaborators each tick.
#[derive(Debug, Clone, Copy)]
pub struct ForceInputs {
    pub density: f64,               // kg/m^3 at the current position
    pub thrust_world: Vector3<f64>, // N, already in the world frame
}

/// Individual force contributions, N, plus the mass they act on.
#[derive(Debug, Clone, Copy)]
pub struct Forces {
    pub thrust: Vector3<f64>,
    pub body_drag: Vector3<f64>,
    pub chute_drag: Vector3<f64>,
    pub gravity: Vector3<f64>,
    pub mass: f64,
}

impl Forces {
    pub fn net(&self) -> Vector3<f64> {
        self.thrust + self.body_drag + self.chute_drag + self.gravity
    }

    pub fn acceleration(&self) -> Vector3<f64> {
        self.net() / self.mass
    }
}

/// Dry mass plus remaining propellant, kg.
///
/// The fuel fraction is clamped to [0, 1] so a bad caller value can never
/// push the mass below the unloaded mass or above a full tank.
pub fn effective_mass(fuel: f64, lander: &LanderParams) -> f64 {
    lander.unloaded_mass + lander.full_fuel_mass() * fuel.clamp(0.0, 1.0)
}

/// Evaluate every force on the lander.
///
/// Forces modeled:
///   1. Thrust      - supplied in the world frame, used as-is
///   2. Body drag   - quadratic in speed, opposing velocity
///   3. Chute drag  - linear in speed, only while the canopy is deployed
///   4. Gravity     - inverse-square, toward the planet centre
pub fn forces(
    state: &BodyState,
    parachute: ParachuteStatus,
    inputs: &ForceInputs,
    lander: &LanderParams,
    planet: &PlanetParams,
) -> Result<Forces, SimError> {
    let mass = effective_mass(state.fuel, lander);
    if mass.is_nan() || mass <= 0.0 {
        return Err(SimError::DegenerateMass { mass });
    }

    let gravity = gravity::gravity_force(&state.position, mass, planet)
        .ok_or(SimError::DegeneratePosition { radius: state.position.norm() })?;

    let body_drag = aerodynamics::body_drag(&state.velocity, inputs.density, lander);
    let chute_drag = if parachute == ParachuteStatus::Deployed {
        aerodynamics::chute_drag(&state.velocity, inputs.density, lander)
    } else {
        Vector3::zeros()
    };

    Ok(Forces { thrust: inputs.thrust_world, body_drag, chute_drag, gravity, mass })
}

/// Net acceleration of the lander, m/s^2.
pub fn compute_acceleration(
    state: &BodyState,
    parachute: ParachuteStatus,
    inputs: &ForceInputs,
    lander: &LanderParams,
    planet: &PlanetParams,
) -> Result<Vector3<f64>, SimError> {
    forces(state, parachute, inputs, lander, planet).map(|f| f.acceleration())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
