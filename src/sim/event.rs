use crate::dynamics::state::ParachuteStatus;
use super::runner::{FlightStatus, TrajectoryPoint};

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

/// Kinds of flight events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    ParachuteDeployed,
    ParachuteLost,
    FuelExhausted,
    AtmosphereEntry,
    Touchdown { crashed: bool },
    Custom(String),
}

/// A discrete event that occurred during a run.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub point: TrajectoryPoint,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive samples and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &TrajectoryPoint, current: &TrajectoryPoint) -> Option<EventKind>;
}

/// Reports parachute status changes.
pub struct ParachuteDetector;

impl EventDetector for ParachuteDetector {
    fn check(&mut self, prev: &TrajectoryPoint, current: &TrajectoryPoint) -> Option<EventKind> {
        if prev.parachute == current.parachute {
            return None;
        }
        match current.parachute {
            ParachuteStatus::Deployed => Some(EventKind::ParachuteDeployed),
            ParachuteStatus::Lost => Some(EventKind::ParachuteLost),
            ParachuteStatus::NotDeployed => None,
        }
    }
}

/// Fires when the tank runs dry.
pub struct FuelDetector;

impl EventDetector for FuelDetector {
    fn check(&mut self, prev: &TrajectoryPoint, current: &TrajectoryPoint) -> Option<EventKind> {
        if prev.state.fuel > 0.0 && current.state.fuel <= 0.0 {
            Some(EventKind::FuelExhausted)
        } else {
            None
        }
    }
}

/// Fires when the run ends on the ground.
pub struct TouchdownDetector;

impl EventDetector for TouchdownDetector {
    fn check(&mut self, prev: &TrajectoryPoint, current: &TrajectoryPoint) -> Option<EventKind> {
        match (prev.status, current.status) {
            (FlightStatus::Flying, FlightStatus::Landed) => Some(EventKind::Touchdown { crashed: false }),
            (FlightStatus::Flying, FlightStatus::Crashed) => Some(EventKind::Touchdown { crashed: true }),
            _ => None,
        }
    }
}

/// Detects when altitude crosses a threshold (ascending or descending).
pub struct AltitudeDetector {
    pub altitude: f64,
    pub ascending: bool,
    fired: bool,
    kind: Option<EventKind>,
}

impl AltitudeDetector {
    pub fn new(altitude: f64, ascending: bool) -> Self {
        Self { altitude, ascending, fired: false, kind: None }
    }

    /// Fires `AtmosphereEntry` on the first descent through `exosphere`.
    pub fn atmosphere_entry(exosphere: f64) -> Self {
        Self { kind: Some(EventKind::AtmosphereEntry), ..Self::new(exosphere, false) }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &TrajectoryPoint, current: &TrajectoryPoint) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let crossed = if self.ascending {
            prev.altitude < self.altitude && current.altitude >= self.altitude
        } else {
            prev.altitude > self.altitude && current.altitude <= self.altitude
        };
        if !crossed {
            return None;
        }
        self.fired = true;
        Some(self.kind.clone().unwrap_or_else(|| {
            EventKind::Custom(format!(
                "Altitude {:.0}m ({})",
                self.altitude,
                if self.ascending { "ascending" } else { "descending" }
            ))
        }))
    }
}

/// The detectors every run uses.
pub fn standard_detectors(exosphere: f64) -> Vec<Box<dyn EventDetector>> {
    vec![
        Box::new(ParachuteDetector),
        Box::new(FuelDetector),
        Box::new(AltitudeDetector::atmosphere_entry(exosphere)),
        Box::new(TouchdownDetector),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::BodyState;
    use nalgebra::Vector3;

    fn point(alt: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            time: 0.0,
            state: BodyState::new(Vector3::new(0.0, 0.0, 3_386_000.0 + alt), Vector3::zeros(), Vector3::zeros()),
            altitude: alt,
            throttle: 0.0,
            parachute: ParachuteStatus::NotDeployed,
            status: FlightStatus::Flying,
        }
    }

    #[test]
    fn atmosphere_entry_fires_once() {
        let mut det = AltitudeDetector::atmosphere_entry(200_000.0);
        let prev = point(200_050.0);
        let curr = point(199_990.0);
        assert_eq!(det.check(&prev, &curr), Some(EventKind::AtmosphereEntry));
        assert!(det.check(&prev, &curr).is_none());
    }

    #[test]
    fn altitude_detector_ascending() {
        let mut det = AltitudeDetector::new(1000.0, true);
        assert!(det.check(&point(900.0), &point(1050.0)).is_some());
        assert!(det.check(&point(900.0), &point(1050.0)).is_none());
    }

    #[test]
    fn parachute_loss_detected() {
        let mut prev = point(5000.0);
        prev.parachute = ParachuteStatus::Deployed;
        let mut curr = point(4990.0);
        curr.parachute = ParachuteStatus::Lost;
        assert_eq!(ParachuteDetector.check(&prev, &curr), Some(EventKind::ParachuteLost));
    }

    #[test]
    fn fuel_exhaustion_detected() {
        let prev = point(100.0);
        let mut curr = point(99.0);
        curr.state.fuel = 0.0;
        assert_eq!(FuelDetector.check(&prev, &curr), Some(EventKind::FuelExhausted));
        assert!(FuelDetector.check(&curr, &curr).is_none());
    }

    #[test]
    fn crash_detected() {
        let prev = point(0.5);
        let mut curr = point(-0.3);
        curr.status = FlightStatus::Crashed;
        assert_eq!(TouchdownDetector.check(&prev, &curr), Some(EventKind::Touchdown { crashed: true }));
    }
}
