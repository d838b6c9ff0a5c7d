//! Run configuration: planet, lander airframe, controller gains and the
//! stepping parameters, loadable from TOML.
//!
//! Every section is optional in the file; missing keys fall back to the
//! Mars lander defaults in [`crate::dynamics::state`].

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dynamics::state::{
    DRAG_COEF_CHUTE, DRAG_COEF_LANDER, EXOSPHERE, FUEL_CAPACITY, FUEL_DENSITY,
    FUEL_RATE_AT_MAX_THRUST, GRAVITY, LANDER_SIZE, MARS_MASS, MARS_RADIUS,
    MAX_IMPACT_DESCENT_RATE, MAX_IMPACT_GROUND_SPEED, MAX_PARACHUTE_DRAG, MAX_PARACHUTE_SPEED,
    UNLOADED_LANDER_MASS,
};
use crate::error::SimError;
use crate::sim::integrator::IntegratorKind;

// ---------------------------------------------------------------------------
// Planet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlanetParams {
    pub radius: f64,                 // m
    pub mass: f64,                   // kg
    pub gravitational_constant: f64, // m^3 kg^-1 s^-2
    pub exosphere: f64,              // m, top of the atmosphere
    pub surface_density: f64,        // kg/m^3
    pub scale_height: f64,           // m
}

impl PlanetParams {
    /// Standard gravitational parameter G*M.
    pub fn mu(&self) -> f64 {
        self.gravitational_constant * self.mass
    }

    pub fn surface_gravity(&self) -> f64 {
        self.mu() / (self.radius * self.radius)
    }
}

impl Default for PlanetParams {
    fn default() -> Self {
        Self {
            radius: MARS_RADIUS,
            mass: MARS_MASS,
            gravitational_constant: GRAVITY,
            exosphere: EXOSPHERE,
            surface_density: 0.017,
            scale_height: 11_000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Lander airframe and engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LanderParams {
    pub size: f64,                    // m, radius of the lander body
    pub unloaded_mass: f64,           // kg
    pub fuel_capacity: f64,           // l
    pub fuel_density: f64,            // kg/l
    pub fuel_rate_at_max_thrust: f64, // l/s
    pub drag_coef_lander: f64,
    pub drag_coef_chute: f64,
    /// Full-throttle thrust in N. `None` means 1.5x the full-tank surface weight.
    pub max_thrust: Option<f64>,
    /// First-order engine response time in s; 0 gives an instant response.
    pub engine_lag: f64,
    pub max_parachute_drag: f64,      // N
    pub max_parachute_speed: f64,     // m/s
    pub max_impact_ground_speed: f64, // m/s
    pub max_impact_descent_rate: f64, // m/s
    /// Deploy the parachute automatically once below this altitude (m).
    pub chute_deploy_altitude: Option<f64>,
}

impl LanderParams {
    /// Cross-section seen by the flow around the bare lander.
    pub fn body_area(&self) -> f64 {
        PI * self.size * self.size
    }

    /// Canopy area; the chute is twice the lander's size.
    pub fn chute_area(&self) -> f64 {
        PI * (2.0 * self.size) * (2.0 * self.size)
    }

    /// Propellant mass with a full tank.
    pub fn full_fuel_mass(&self) -> f64 {
        self.fuel_capacity * self.fuel_density
    }

    pub fn max_thrust(&self, planet: &PlanetParams) -> f64 {
        self.max_thrust.unwrap_or_else(|| {
            1.5 * (self.full_fuel_mass() + self.unloaded_mass) * planet.surface_gravity()
        })
    }
}

impl Default for LanderParams {
    fn default() -> Self {
        Self {
            size: LANDER_SIZE,
            unloaded_mass: UNLOADED_LANDER_MASS,
            fuel_capacity: FUEL_CAPACITY,
            fuel_density: FUEL_DENSITY,
            fuel_rate_at_max_thrust: FUEL_RATE_AT_MAX_THRUST,
            drag_coef_lander: DRAG_COEF_LANDER,
            drag_coef_chute: DRAG_COEF_CHUTE,
            max_thrust: None,
            engine_lag: 0.0,
            max_parachute_drag: MAX_PARACHUTE_DRAG,
            max_parachute_speed: MAX_PARACHUTE_SPEED,
            max_impact_ground_speed: MAX_IMPACT_GROUND_SPEED,
            max_impact_descent_rate: MAX_IMPACT_DESCENT_RATE,
            chute_deploy_altitude: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Autopilot gains
// ---------------------------------------------------------------------------

/// Fixed for a run. `deadband` must lie strictly inside (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerGains {
    pub kh: f64,       // 1/s, altitude feedback on the target descent rate
    pub kp: f64,       // proportional gain on the rate error
    pub deadband: f64, // throttle offset / saturation shift
}

impl ControllerGains {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.deadband > 0.0 && self.deadband < 1.0) {
            return Err(SimError::InvalidGains(format!(
                "deadband must be in (0, 1), got {}",
                self.deadband
            )));
        }
        if !self.kh.is_finite() || !self.kp.is_finite() {
            return Err(SimError::InvalidGains(format!(
                "gains must be finite (kh = {}, kp = {})",
                self.kh, self.kp
            )));
        }
        Ok(())
    }
}

impl Default for ControllerGains {
    fn default() -> Self {
        Self { kh: 0.04, kp: 1.0, deadband: 0.1 }
    }
}

// ---------------------------------------------------------------------------
// Stepping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimParams {
    pub dt: f64,       // s
    pub max_time: f64, // s, hard stop
    pub integrator: IntegratorKind,
    /// Autopilot telemetry file. `None` disables the log entirely.
    pub telemetry_path: Option<PathBuf>,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            dt: 0.1,
            max_time: 20_000.0,
            integrator: IntegratorKind::Verlet,
            telemetry_path: Some(PathBuf::from("trajectories.txt")),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub sim: SimParams,
    pub planet: PlanetParams,
    pub lander: LanderParams,
    pub autopilot: ControllerGains,
}

impl SimConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, SimError> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let text = fs::read_to_string(path).map_err(SimError::ConfigIo)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.sim.dt.is_finite() && self.sim.dt > 0.0) {
            return Err(SimError::InvalidTimestep(self.sim.dt));
        }
        self.autopilot.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_mars() {
        let c = SimConfig::default();
        assert_relative_eq!(c.planet.radius, 3_386_000.0);
        assert_relative_eq!(c.sim.dt, 0.1);
        assert_eq!(c.sim.integrator, IntegratorKind::Verlet);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn default_thrust_lifts_full_lander() {
        let c = SimConfig::default();
        let weight = (c.lander.unloaded_mass + c.lander.full_fuel_mass()) * c.planet.surface_gravity();
        assert_relative_eq!(c.lander.max_thrust(&c.planet) / weight, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn chute_is_four_times_body_area() {
        let l = LanderParams::default();
        assert_relative_eq!(l.chute_area(), 4.0 * l.body_area(), epsilon = 1e-12);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = SimConfig::from_toml_str(
            r#"
            [sim]
            dt = 0.05
            integrator = "euler"

            [autopilot]
            kh = 0.02
            "#,
        )
        .unwrap();
        assert_relative_eq!(c.sim.dt, 0.05);
        assert_eq!(c.sim.integrator, IntegratorKind::Euler);
        assert_relative_eq!(c.autopilot.kh, 0.02);
        assert_relative_eq!(c.autopilot.kp, 1.0);
        assert_relative_eq!(c.lander.unloaded_mass, 100.0);
    }

    #[test]
    fn deadband_outside_unit_interval_rejected() {
        let err = SimConfig::from_toml_str("[autopilot]\ndeadband = 1.0\n").unwrap_err();
        assert!(matches!(err, SimError::InvalidGains(_)));
    }

    #[test]
    fn non_positive_timestep_rejected() {
        let err = SimConfig::from_toml_str("[sim]\ndt = 0.0\n").unwrap_err();
        assert!(matches!(err, SimError::InvalidTimestep(_)));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = SimConfig::from_toml_str("[sim\n").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }
}
