use std::io::{self, Write};
use std::path::Path;

use crate::config::LanderParams;
use crate::scenario::Scenario;
use crate::sim::runner::{FlightRecord, FlightStatus};

/// Summary statistics computed from a finished run.
#[derive(Debug, Clone)]
pub struct FlightSummary {
    pub max_altitude: f64,
    pub max_speed: f64,
    pub max_accel: f64,
    pub flight_time: f64,
    pub final_altitude: f64,
    pub descent_rate: f64,
    pub ground_speed: f64,
    pub fuel_used_kg: f64,
    pub status: FlightStatus,
    pub parachute: &'static str,
    pub events: usize,
}

impl FlightSummary {
    /// Compute summary from a run. `None` for an empty trajectory.
    pub fn from_record(record: &FlightRecord, lander: &LanderParams) -> Option<Self> {
        let first = record.trajectory.first()?;
        let last = record.trajectory.last()?;

        let max_altitude = record
            .trajectory
            .iter()
            .map(|p| p.altitude)
            .fold(f64::NEG_INFINITY, f64::max);

        let max_speed = record
            .trajectory
            .iter()
            .map(|p| p.state.velocity.norm())
            .fold(0.0_f64, f64::max);

        let max_accel = record
            .trajectory
            .windows(2)
            .map(|w| {
                let dt = w[1].time - w[0].time;
                if dt > 0.0 {
                    (w[1].state.velocity - w[0].state.velocity).norm() / dt
                } else {
                    0.0
                }
            })
            .fold(0.0_f64, f64::max);

        Some(FlightSummary {
            max_altitude,
            max_speed,
            max_accel,
            flight_time: last.time,
            final_altitude: last.altitude,
            descent_rate: -last.state.radial_velocity(),
            ground_speed: last.state.ground_speed(),
            fuel_used_kg: (first.state.fuel - last.state.fuel) * lander.full_fuel_mass(),
            status: record.status,
            parachute: last.parachute.label(),
            events: record.events.len(),
        })
    }
}

fn status_label(status: FlightStatus) -> &'static str {
    match status {
        FlightStatus::Flying => "flying",
        FlightStatus::Landed => "landed",
        FlightStatus::Crashed => "crashed",
    }
}

/// Write flight summary as JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    scenario: &Scenario,
    summary: &FlightSummary,
) -> io::Result<()> {
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"scenario\": {{")?;
    writeln!(writer, "    \"index\": {},", scenario.index)?;
    writeln!(writer, "    \"description\": \"{}\"", scenario.description)?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"outcome\": {{")?;
    writeln!(writer, "    \"status\": \"{}\",", status_label(summary.status))?;
    writeln!(writer, "    \"parachute\": \"{}\",", summary.parachute)?;
    writeln!(writer, "    \"events\": {}", summary.events)?;
    writeln!(writer, "  }},")?;
    writeln!(writer, "  \"performance\": {{")?;
    writeln!(writer, "    \"max_altitude_m\": {:.2},", summary.max_altitude)?;
    writeln!(writer, "    \"max_speed_ms\": {:.2},", summary.max_speed)?;
    writeln!(writer, "    \"max_accel_ms2\": {:.2},", summary.max_accel)?;
    writeln!(writer, "    \"flight_time_s\": {:.2},", summary.flight_time)?;
    writeln!(writer, "    \"final_altitude_m\": {:.2},", summary.final_altitude)?;
    writeln!(writer, "    \"descent_rate_ms\": {:.3},", summary.descent_rate)?;
    writeln!(writer, "    \"ground_speed_ms\": {:.3},", summary.ground_speed)?;
    writeln!(writer, "    \"fuel_used_kg\": {:.2}", summary.fuel_used_kg)?;
    writeln!(writer, "  }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write flight summary JSON to a file.
pub fn write_summary_file<P: AsRef<Path>>(
    path: P,
    scenario: &Scenario,
    summary: &FlightSummary,
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, scenario, summary)
}
