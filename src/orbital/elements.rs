use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::config::PlanetParams;

/// Osculating two-body orbit of the lander about the planet.
#[derive(Debug, Clone, Copy)]
pub struct OrbitSummary {
    pub specific_energy: f64, // J/kg
    pub sma: f64,             // semi-major axis, m (negative when hyperbolic)
    pub ecc: f64,             // eccentricity (0 = circular)
    pub inc: f64,             // inclination to the planet's xy plane, rad
    pub periapsis_altitude: f64,
    /// `None` for escape trajectories.
    pub apoapsis_altitude: Option<f64>,
}

impl OrbitSummary {
    /// Orbit from a planet-centred state vector.
    pub fn from_state(pos: &Vector3<f64>, vel: &Vector3<f64>, planet: &PlanetParams) -> Self {
        let mu = planet.mu();
        let r = pos.norm();
        let v = vel.norm();

        // Angular momentum
        let h = pos.cross(vel);
        let h_mag = h.norm();

        // Eccentricity vector
        let e_vec = ((v * v - mu / r) * pos - pos.dot(vel) * vel) / mu;
        let ecc = e_vec.norm();

        let specific_energy = 0.5 * v * v - mu / r;
        let sma = -mu / (2.0 * specific_energy);

        let inc = if h_mag > 1e-10 { (h.z / h_mag).clamp(-1.0, 1.0).acos() } else { 0.0 };

        // Periapsis from the semi-latus rectum, valid for every conic
        let p = h_mag * h_mag / mu;
        let periapsis = p / (1.0 + ecc);
        let apoapsis = if ecc < 1.0 { Some(p / (1.0 - ecc)) } else { None };

        OrbitSummary {
            specific_energy,
            sma,
            ecc,
            inc,
            periapsis_altitude: periapsis - planet.radius,
            apoapsis_altitude: apoapsis.map(|ra| ra - planet.radius),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.specific_energy < 0.0
    }

    /// Orbital period, s. `None` unless the orbit is closed.
    pub fn period(&self, planet: &PlanetParams) -> Option<f64> {
        self.is_bound().then(|| 2.0 * PI * (self.sma.powi(3) / planet.mu()).sqrt())
    }

    /// The orbit dips into the atmosphere or the ground.
    pub fn intersects_atmosphere(&self, planet: &PlanetParams) -> bool {
        self.periapsis_altitude < planet.exosphere
    }
}
