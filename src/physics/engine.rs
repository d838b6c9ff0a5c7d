use nalgebra::{Rotation3, Vector3};

use crate::config::{LanderParams, PlanetParams};

// ---------------------------------------------------------------------------
// Main engine: throttle response and body-to-world thrust transform
// ---------------------------------------------------------------------------

/// Lander body attitude as a rotation from body to world frame.
/// `orientation` holds xyz Euler angles in degrees.
pub fn body_to_world(orientation: &Vector3<f64>) -> Rotation3<f64> {
    Rotation3::from_euler_angles(
        orientation.x.to_radians(),
        orientation.y.to_radians(),
        orientation.z.to_radians(),
    )
}

/// Engine with an optional first-order lag between the commanded throttle
/// and the delivered thrust.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    effective_throttle: f64,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throttle actually delivered on the last call, [0, 1].
    pub fn effective_throttle(&self) -> f64 {
        self.effective_throttle
    }

    /// Thrust vector in the world frame for this tick, N.
    ///
    /// The nozzle fires along body +z. No thrust once the tank is empty or
    /// the lander is down.
    pub fn thrust_world(
        &mut self,
        throttle: f64,
        orientation: &Vector3<f64>,
        fuel: f64,
        landed: bool,
        dt: f64,
        lander: &LanderParams,
        planet: &PlanetParams,
    ) -> Vector3<f64> {
        let commanded = throttle.clamp(0.0, 1.0);
        if landed || fuel <= 0.0 {
            self.effective_throttle = 0.0;
        } else if lander.engine_lag > 0.0 {
            let k = (-dt / lander.engine_lag).exp();
            self.effective_throttle = k * self.effective_throttle + (1.0 - k) * commanded;
        } else {
            self.effective_throttle = commanded;
        }

        body_to_world(orientation) * Vector3::z() * (lander.max_thrust(planet) * self.effective_throttle)
    }

    pub fn reset(&mut self) {
        self.effective_throttle = 0.0;
    }
}

/// Fuel fraction left after burning at `throttle` for `dt`. Never negative.
pub fn burn_fuel(fuel: f64, throttle: f64, dt: f64, lander: &LanderParams) -> f64 {
    if fuel <= 0.0 {
        return 0.0;
    }
    let used = dt * lander.fuel_rate_at_max_thrust * throttle.clamp(0.0, 1.0) / lander.fuel_capacity;
    (fuel - used).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn thrust_along_body_z() {
        let l = LanderParams::default();
        let p = PlanetParams::default();
        let mut e = Engine::new();
        let t = e.thrust_world(1.0, &Vector3::zeros(), 1.0, false, 0.1, &l, &p);
        assert_relative_eq!(t.z, l.max_thrust(&p), epsilon = 1e-9);
        assert_relative_eq!(t.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn pitch_90_points_thrust_along_x() {
        let l = LanderParams::default();
        let p = PlanetParams::default();
        let mut e = Engine::new();
        let t = e.thrust_world(0.5, &Vector3::new(0.0, 90.0, 0.0), 1.0, false, 0.1, &l, &p);
        assert_relative_eq!(t.x, 0.5 * l.max_thrust(&p), epsilon = 1e-6);
        assert_relative_eq!(t.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn no_thrust_without_fuel_or_after_landing() {
        let l = LanderParams::default();
        let p = PlanetParams::default();
        let mut e = Engine::new();
        assert_eq!(e.thrust_world(1.0, &Vector3::zeros(), 0.0, false, 0.1, &l, &p), Vector3::zeros());
        assert_eq!(e.thrust_world(1.0, &Vector3::zeros(), 1.0, true, 0.1, &l, &p), Vector3::zeros());
    }

    #[test]
    fn lag_approaches_command() {
        let l = LanderParams { engine_lag: 1.0, ..LanderParams::default() };
        let p = PlanetParams::default();
        let mut e = Engine::new();
        e.thrust_world(1.0, &Vector3::zeros(), 1.0, false, 0.1, &l, &p);
        let first = e.effective_throttle();
        assert!(first > 0.0 && first < 0.2);
        for _ in 0..200 {
            e.thrust_world(1.0, &Vector3::zeros(), 1.0, false, 0.1, &l, &p);
        }
        assert_relative_eq!(e.effective_throttle(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn burn_rate_at_full_throttle() {
        let l = LanderParams::default();
        // 0.5 l/s out of 100 l for 1 s
        assert_relative_eq!(burn_fuel(1.0, 1.0, 1.0, &l), 0.995, epsilon = 1e-12);
        assert_eq!(burn_fuel(0.001, 1.0, 10.0, &l), 0.0);
        assert_eq!(burn_fuel(0.5, 0.0, 10.0, &l), 0.5);
    }
}
