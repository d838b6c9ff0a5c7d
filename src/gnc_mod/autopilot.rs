use nalgebra::Vector3;

use crate::config::ControllerGains;
use crate::dynamics::state::BodyState;
use crate::io::telemetry::{TelemetryRecord, TelemetrySink};

// ---------------------------------------------------------------------------
// Descent autopilot: altitude-scheduled target descent rate + P control
// ---------------------------------------------------------------------------

/// Shifted saturation applied to the raw proportional command.
///
///   p < -delta          -> 0
///   -delta <= p < 1-delta -> delta + p
///   otherwise           -> 1
pub fn deadband_map(p: f64, delta: f64) -> f64 {
    if p < -delta {
        0.0
    } else if p < 1.0 - delta {
        delta + p
    } else {
        1.0
    }
}

pub struct Autopilot {
    pub gains: ControllerGains,
    planet_radius: f64,
    sink: Option<Box<dyn TelemetrySink>>,
}

impl Autopilot {
    pub fn new(gains: ControllerGains, planet_radius: f64) -> Self {
        Self { gains, planet_radius, sink: None }
    }

    /// Attach a telemetry sink that receives one record per control update.
    pub fn with_sink(mut self, sink: Box<dyn TelemetrySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Descent-rate error: target rate (-0.5 - Kh*h) minus the outward
    /// radial speed.
    pub fn rate_error(&self, position: &Vector3<f64>, velocity: &Vector3<f64>) -> f64 {
        let h = position.norm() - self.planet_radius;
        let radial = position.try_normalize(0.0).map_or(0.0, |up| velocity.dot(&up));
        -0.5 - self.gains.kh * h - radial
    }

    pub fn compute_throttle(&self, position: &Vector3<f64>, velocity: &Vector3<f64>) -> f64 {
        let p = self.gains.kp * self.rate_error(position, velocity);
        deadband_map(p, self.gains.deadband)
    }
}

impl std::fmt::Debug for Autopilot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autopilot")
            .field("gains", &self.gains)
            .field("planet_radius", &self.planet_radius)
            .field("telemetry", &self.sink.is_some())
            .finish()
    }
}

impl super::ThrottleController for Autopilot {
    fn throttle(&mut self, state: &BodyState, time: f64) -> f64 {
        let throttle = self.compute_throttle(&state.position, &state.velocity);
        if let Some(sink) = self.sink.as_mut() {
            sink.record(&TelemetryRecord {
                time,
                altitude: state.altitude(self.planet_radius),
                radial_velocity: state.radial_velocity(),
            });
        }
        throttle
    }

    fn finish(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.flush();
        }
    }

    fn name(&self) -> &str {
        "Autopilot"
    }
}
