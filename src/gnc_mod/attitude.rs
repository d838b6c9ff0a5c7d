use nalgebra::{Rotation3, Vector3};

/// Orientation (xyz Euler angles, degrees) that points the lander's base
/// at the planet, with body +z along the local vertical.
///
/// Leaves `current` untouched at the planet centre, where "up" is undefined.
pub fn stabilized_orientation(position: &Vector3<f64>, current: &Vector3<f64>) -> Vector3<f64> {
    let Some(up) = position.try_normalize(1e-6) else {
        return *current;
    };
    let rot = Rotation3::rotation_between(&Vector3::z(), &up).unwrap_or_else(Rotation3::identity);
    let (roll, pitch, yaw) = rot.euler_angles();
    Vector3::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::engine::body_to_world;
    use approx::assert_relative_eq;

    fn body_z(orientation: &Vector3<f64>) -> Vector3<f64> {
        body_to_world(orientation) * Vector3::z()
    }

    #[test]
    fn body_z_points_outward() {
        for pos in [
            Vector3::new(3_386_000.0, 0.0, 0.0),
            Vector3::new(0.0, -3_396_000.0, 0.0),
            Vector3::new(0.0, 0.0, 3_500_000.0),
            Vector3::new(1.0e6, -2.0e6, 2.5e6),
        ] {
            let o = stabilized_orientation(&pos, &Vector3::zeros());
            let z = body_z(&o);
            let up = pos.normalize();
            assert_relative_eq!(z.dot(&up), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn centre_keeps_current() {
        let current = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(stabilized_orientation(&Vector3::zeros(), &current), current);
    }
}
