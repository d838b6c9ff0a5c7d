use nalgebra::Vector3;
use serde::Deserialize;

use crate::dynamics::state::BodyState;

// ---------------------------------------------------------------------------
// Fixed-step translational integrators
// ---------------------------------------------------------------------------

/// One integration scheme, chosen once per run.
///
/// `step` advances `state.position` and `state.velocity` by `dt` under a
/// constant `acceleration`. Orientation and fuel are left untouched.
pub trait Integrator {
    fn step(&mut self, state: &mut BodyState, acceleration: &Vector3<f64>, dt: f64);

    /// Forget any history so the next step starts a fresh run.
    fn reset(&mut self) {}

    fn name(&self) -> &str;
}

/// Selects the integration scheme for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IntegratorKind {
    Euler,
    #[default]
    Verlet,
}

impl IntegratorKind {
    pub fn build(self) -> Box<dyn Integrator> {
        match self {
            IntegratorKind::Euler => Box::new(Euler),
            IntegratorKind::Verlet => Box::new(Verlet::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// Forward Euler
// ---------------------------------------------------------------------------

/// Explicit Euler: position from the old velocity, then velocity from the
/// acceleration. No memory between steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euler;

impl Integrator for Euler {
    fn step(&mut self, state: &mut BodyState, acceleration: &Vector3<f64>, dt: f64) {
        state.position += state.velocity * dt;
        state.velocity += acceleration * dt;
    }

    fn name(&self) -> &str {
        "euler"
    }
}

// ---------------------------------------------------------------------------
// Position Verlet
// ---------------------------------------------------------------------------

/// Position history carried between Verlet steps.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum IntegratorMemory {
    /// No step taken yet; the next step must bootstrap.
    #[default]
    Uninitialized,
    Bootstrapped { previous_position: Vector3<f64> },
}

/// Position-form Verlet.
///
/// The first step is a single Euler step that seeds the position history.
/// Every later step updates position from the last two positions and the
/// acceleration, and velocity is always the backward difference of the
/// two newest positions. Velocity never accumulates acceleration on its own
/// after the bootstrap.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verlet {
    memory: IntegratorMemory,
}

impl Verlet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory(&self) -> &IntegratorMemory {
        &self.memory
    }

    pub fn is_bootstrapped(&self) -> bool {
        matches!(self.memory, IntegratorMemory::Bootstrapped { .. })
    }
}

impl Integrator for Verlet {
    fn step(&mut self, state: &mut BodyState, acceleration: &Vector3<f64>, dt: f64) {
        match self.memory {
            IntegratorMemory::Uninitialized => {
                self.memory = IntegratorMemory::Bootstrapped { previous_position: state.position };
                state.position += state.velocity * dt;
                state.velocity += acceleration * dt;
            }
            IntegratorMemory::Bootstrapped { previous_position } => {
                let new_position =
                    state.position * 2.0 - previous_position + acceleration * (dt * dt);
                let previous_position = state.position;
                self.memory = IntegratorMemory::Bootstrapped { previous_position };
                state.position = new_position;
                state.velocity = (state.position - previous_position) / dt;
            }
        }
    }

    fn reset(&mut self) {
        self.memory = IntegratorMemory::Uninitialized;
    }

    fn name(&self) -> &str {
        "verlet"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn state(pos: Vector3<f64>, vel: Vector3<f64>) -> BodyState {
        BodyState::new(pos, vel, Vector3::zeros())
    }

    #[test]
    fn euler_step() {
        let mut s = state(Vector3::new(0.0, 0.0, 10.0), Vector3::new(1.0, 0.0, 0.0));
        Euler.step(&mut s, &Vector3::new(0.0, 0.0, -2.0), 0.5);
        assert_eq!(s.position, Vector3::new(0.5, 0.0, 10.0));
        assert_eq!(s.velocity, Vector3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn verlet_bootstrap_is_euler() {
        let mut s = state(Vector3::new(0.0, 0.0, 10.0), Vector3::new(1.0, 0.0, 0.0));
        let mut e = s;
        let mut v = Verlet::new();
        let a = Vector3::new(0.0, 0.0, -2.0);
        v.step(&mut s, &a, 0.5);
        Euler.step(&mut e, &a, 0.5);
        assert_eq!(s, e);
        assert_eq!(
            *v.memory(),
            IntegratorMemory::Bootstrapped { previous_position: Vector3::new(0.0, 0.0, 10.0) }
        );
    }

    #[test]
    fn verlet_steady_step() {
        let mut s = state(Vector3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 0.0, 0.0));
        let mut v = Verlet::new();
        let a = Vector3::new(0.0, -4.0, 0.0);
        let dt = 0.25;
        v.step(&mut s, &a, dt);
        let p1 = s.position;
        v.step(&mut s, &a, dt);
        // x2 = 2*x1 - x0 + a*dt^2
        let expected = p1 * 2.0 - Vector3::zeros() + a * (dt * dt);
        assert_eq!(s.position, expected);
        assert_eq!(s.velocity, (s.position - p1) / dt);
        assert_eq!(*v.memory(), IntegratorMemory::Bootstrapped { previous_position: p1 });
    }

    #[test]
    fn verlet_velocity_ignores_bootstrap_velocity_after_first_step() {
        // With zero acceleration, the steady step keeps the bootstrap displacement.
        let mut s = state(Vector3::new(1.0, 1.0, 1.0), Vector3::new(0.0, 3.0, 0.0));
        let mut v = Verlet::new();
        let a = Vector3::zeros();
        v.step(&mut s, &a, 0.1);
        // Corrupt velocity; the finite-difference update must not read it
        s.velocity = Vector3::new(100.0, 100.0, 100.0);
        v.step(&mut s, &a, 0.1);
        assert_relative_eq!(s.velocity.y, 3.0, epsilon = 1e-9);
        assert_relative_eq!(s.velocity.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(s.position.y, 1.6, epsilon = 1e-12);
    }

    #[test]
    fn verlet_reset_bootstraps_again() {
        let mut s = state(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0));
        let mut v = Verlet::new();
        v.step(&mut s, &Vector3::zeros(), 0.1);
        assert!(v.is_bootstrapped());
        v.reset();
        assert!(!v.is_bootstrapped());
    }

    #[test]
    fn verlet_exact_for_constant_acceleration() {
        // Position Verlet is exact for uniform acceleration after the first step's error.
        let a = Vector3::new(0.0, 0.0, -3.7);
        let dt = 0.1;
        let mut s = state(Vector3::zeros(), Vector3::zeros());
        let mut v = Verlet::new();
        for _ in 0..100 {
            v.step(&mut s, &a, dt);
        }
        // Bootstrap gives x1 = 0 instead of a*dt^2/2; the offset grows linearly.
        let t: f64 = 10.0;
        let exact = 0.5 * a.z * t * t;
        let offset = -0.5 * a.z * dt * dt * 100.0;
        assert_relative_eq!(s.position.z, exact + offset, epsilon = 1e-6);
    }

    #[test]
    fn kind_builds_named_strategy() {
        assert_eq!(IntegratorKind::Euler.build().name(), "euler");
        assert_eq!(IntegratorKind::Verlet.build().name(), "verlet");
    }
}
