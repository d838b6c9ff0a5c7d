use nalgebra::Vector3;

use crate::config::PlanetParams;

/// Newtonian gravity on a body of `mass` at planet-centred `pos`, N.
///
/// Returns `None` when `pos` is too close to the planet centre for the
/// direction to be defined.
pub fn gravity_force(pos: &Vector3<f64>, mass: f64, planet: &PlanetParams) -> Option<Vector3<f64>> {
    let r2 = pos.norm_squared();
    let up = pos.try_normalize(1e-6)?;
    Some(-up * (planet.mu() * mass / r2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn surface_gravity_matches_mu_over_r2() {
        let p = PlanetParams::default();
        let f = gravity_force(&Vector3::new(p.radius, 0.0, 0.0), 1.0, &p).unwrap();
        assert_relative_eq!(f.x, -p.surface_gravity(), epsilon = 1e-12);
        assert_relative_eq!(f.y, 0.0);
        // ~3.74 m/s^2 on Mars
        assert!((f.x.abs() - 3.74).abs() < 0.01);
    }

    #[test]
    fn inverse_square() {
        let p = PlanetParams::default();
        let near = gravity_force(&Vector3::new(0.0, p.radius, 0.0), 10.0, &p).unwrap();
        let far = gravity_force(&Vector3::new(0.0, 2.0 * p.radius, 0.0), 10.0, &p).unwrap();
        assert_relative_eq!(near.norm() / far.norm(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn undefined_at_centre() {
        let p = PlanetParams::default();
        assert!(gravity_force(&Vector3::zeros(), 1.0, &p).is_none());
    }
}
