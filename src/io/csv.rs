use std::io::{self, Write};
use std::path::Path;

use crate::sim::runner::{FlightStatus, TrajectoryPoint};

/// Write trajectory data to CSV format.
///
/// Columns: time, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z,
///          roll_deg, pitch_deg, yaw_deg, fuel, throttle,
///          altitude, radial_vel, parachute, status
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[TrajectoryPoint]) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,\
         roll_deg,pitch_deg,yaw_deg,fuel,throttle,\
         altitude,radial_vel,parachute,status"
    )?;

    for p in trajectory {
        let s = &p.state;
        let status = match p.status {
            FlightStatus::Flying => "flying",
            FlightStatus::Landed => "landed",
            FlightStatus::Crashed => "crashed",
        };
        writeln!(
            writer,
            "{:.3},{:.3},{:.3},{:.3},{:.4},{:.4},{:.4},\
             {:.3},{:.3},{:.3},{:.6},{:.4},\
             {:.3},{:.4},{},{}",
            p.time,
            s.position.x, s.position.y, s.position.z,
            s.velocity.x, s.velocity.y, s.velocity.z,
            s.orientation.x, s.orientation.y, s.orientation.z,
            s.fuel,
            p.throttle,
            p.altitude,
            s.radial_velocity(),
            p.parachute.label(),
            status,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file<P: AsRef<Path>>(path: P, trajectory: &[TrajectoryPoint]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, trajectory)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::{BodyState, ParachuteStatus};
    use nalgebra::Vector3;

    #[test]
    fn csv_output_has_header_and_rows() {
        let state = BodyState::new(Vector3::new(0.0, 0.0, 3_396_000.0), Vector3::new(0.0, 0.0, -5.0), Vector3::zeros());
        let traj = vec![
            TrajectoryPoint {
                time: 0.0,
                state,
                altitude: 10_000.0,
                throttle: 0.0,
                parachute: ParachuteStatus::NotDeployed,
                status: FlightStatus::Flying,
            },
            TrajectoryPoint {
                time: 0.1,
                state,
                altitude: 9_999.5,
                throttle: 0.5,
                parachute: ParachuteStatus::Deployed,
                status: FlightStatus::Flying,
            },
        ];

        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.000,"));
        assert!(lines[2].ends_with(",deployed,flying"));
    }
}
