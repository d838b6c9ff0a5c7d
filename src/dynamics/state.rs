use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Physical constants (Mars and the reference lander)
// ---------------------------------------------------------------------------

pub const MARS_RADIUS: f64 = 3_386_000.0; // m
pub const MARS_MASS: f64 = 6.42e23; // kg
pub const GRAVITY: f64 = 6.673e-11; // m^3 kg^-1 s^-2
pub const EXOSPHERE: f64 = 200_000.0; // m
pub const MARS_DAY: f64 = 88_642.65; // s, sidereal

pub const LANDER_SIZE: f64 = 1.0; // m
pub const UNLOADED_LANDER_MASS: f64 = 100.0; // kg
pub const FUEL_CAPACITY: f64 = 100.0; // l
pub const FUEL_RATE_AT_MAX_THRUST: f64 = 0.5; // l/s
pub const FUEL_DENSITY: f64 = 1.0; // kg/l
pub const DRAG_COEF_CHUTE: f64 = 2.0;
pub const DRAG_COEF_LANDER: f64 = 1.0;
pub const MAX_PARACHUTE_DRAG: f64 = 20_000.0; // N
pub const MAX_PARACHUTE_SPEED: f64 = 500.0; // m/s
pub const MAX_IMPACT_GROUND_SPEED: f64 = 1.0; // m/s
pub const MAX_IMPACT_DESCENT_RATE: f64 = 1.0; // m/s

// ---------------------------------------------------------------------------
// Lander state
// ---------------------------------------------------------------------------

/// Translational state of the lander, planet-centred frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vector3<f64>,    // m
    pub velocity: Vector3<f64>,    // m/s
    pub orientation: Vector3<f64>, // deg, xyz Euler angles
    pub fuel: f64,                 // fraction of a full tank, [0, 1]
}

impl BodyState {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, orientation: Vector3<f64>) -> Self {
        Self { position, velocity, orientation, fuel: 1.0 }
    }

    pub fn altitude(&self, planet_radius: f64) -> f64 {
        self.position.norm() - planet_radius
    }

    /// Outward radial speed (positive = climbing). Zero at the planet centre.
    pub fn radial_velocity(&self) -> f64 {
        match self.position.try_normalize(0.0) {
            Some(up) => self.velocity.dot(&up),
            None => 0.0,
        }
    }

    /// Speed tangential to the local horizontal.
    pub fn ground_speed(&self) -> f64 {
        let vr = self.radial_velocity();
        (self.velocity.norm_squared() - vr * vr).max(0.0).sqrt()
    }
}

// ---------------------------------------------------------------------------
// Parachute
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParachuteStatus {
    #[default]
    NotDeployed,
    Deployed,
    /// Torn off by excessive drag or speed; never comes back.
    Lost,
}

impl ParachuteStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ParachuteStatus::NotDeployed => "not deployed",
            ParachuteStatus::Deployed => "deployed",
            ParachuteStatus::Lost => "lost",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn radial_velocity_sign() {
        let s = BodyState::new(
            Vector3::new(0.0, -(MARS_RADIUS + 10.0), 0.0),
            Vector3::new(3.0, -4.0, 0.0),
            Vector3::zeros(),
        );
        // Moving further along -y means climbing
        assert_relative_eq!(s.radial_velocity(), 4.0);
        assert_relative_eq!(s.ground_speed(), 3.0);
        assert_relative_eq!(s.altitude(MARS_RADIUS), 10.0);
    }

    #[test]
    fn radial_velocity_at_centre_is_zero() {
        let s = BodyState::new(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0), Vector3::zeros());
        assert_eq!(s.radial_velocity(), 0.0);
    }
}
