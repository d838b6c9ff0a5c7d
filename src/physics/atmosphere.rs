use nalgebra::Vector3;

use crate::config::PlanetParams;

// ---------------------------------------------------------------------------
// Mars exponential atmosphere
// ---------------------------------------------------------------------------

/// Atmospheric density at an altitude above the surface, kg/m^3.
///
/// Single scale-height exponential. Zero underground and above the
/// exosphere.
pub fn density_at_altitude(altitude: f64, planet: &PlanetParams) -> f64 {
    if !(0.0..=planet.exosphere).contains(&altitude) {
        return 0.0;
    }
    planet.surface_density * (-altitude / planet.scale_height).exp()
}

/// Atmospheric density at a planet-centred position, kg/m^3.
pub fn density(position: &Vector3<f64>, planet: &PlanetParams) -> f64 {
    density_at_altitude(position.norm() - planet.radius, planet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn surface_density() {
        let p = PlanetParams::default();
        assert_relative_eq!(density_at_altitude(0.0, &p), 0.017);
    }

    #[test]
    fn one_scale_height_up() {
        let p = PlanetParams::default();
        assert_relative_eq!(
            density_at_altitude(p.scale_height, &p),
            0.017 / std::f64::consts::E,
            epsilon = 1e-12
        );
    }

    #[test]
    fn vacuum_outside_atmosphere() {
        let p = PlanetParams::default();
        assert_eq!(density_at_altitude(p.exosphere + 1.0, &p), 0.0);
        assert_eq!(density_at_altitude(-5.0, &p), 0.0);
    }

    #[test]
    fn density_from_position() {
        let p = PlanetParams::default();
        let pos = Vector3::new(0.0, 0.0, p.radius + 10_000.0);
        assert_relative_eq!(density(&pos, &p), density_at_altitude(10_000.0, &p), epsilon = 1e-15);
    }
}
