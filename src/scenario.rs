//! Canned initial conditions, selected by index 0-9.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::config::{LanderParams, PlanetParams};
use crate::dynamics::state::{BodyState, ParachuteStatus, MARS_DAY};
use crate::error::SimError;

pub const SCENARIO_COUNT: usize = 10;

/// Initial state and flags for one run.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub index: usize,
    pub description: &'static str,
    pub state: BodyState,
    pub parachute: ParachuteStatus,
    pub stabilized_attitude: bool,
    pub autopilot_enabled: bool,
}

impl Scenario {
    fn new(
        index: usize,
        description: &'static str,
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        orientation: Vector3<f64>,
    ) -> Self {
        Self {
            index,
            description,
            state: BodyState::new(position, velocity, orientation),
            parachute: ParachuteStatus::NotDeployed,
            stabilized_attitude: false,
            autopilot_enabled: false,
        }
    }

    fn stabilized(mut self) -> Self {
        self.stabilized_attitude = true;
        self
    }

    fn autopilot(mut self) -> Self {
        self.autopilot_enabled = true;
        self
    }

    fn chute_open(mut self) -> Self {
        self.parachute = ParachuteStatus::Deployed;
        self
    }
}

/// Build scenario `index` for the given planet and lander.
pub fn scenario(index: usize, planet: &PlanetParams, lander: &LanderParams) -> Result<Scenario, SimError> {
    let r = planet.radius;
    let circular = |radius: f64| (planet.mu() / radius).sqrt();
    let sc = match index {
        0 => Scenario::new(
            0,
            "circular orbit",
            Vector3::new(1.2 * r, 0.0, 0.0),
            Vector3::new(0.0, -circular(1.2 * r), 0.0),
            Vector3::new(0.0, 90.0, 0.0),
        ),
        1 => Scenario::new(
            1,
            "descent from 10km",
            Vector3::new(0.0, -(r + 10_000.0), 0.0),
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 90.0),
        )
        .stabilized(),
        2 => Scenario::new(
            2,
            "elliptical orbit, thrust changes orbital plane",
            Vector3::new(0.0, 0.0, 1.2 * r),
            Vector3::new(3500.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 90.0),
        ),
        3 => Scenario::new(
            3,
            "polar launch at escape velocity (but drag prevents escape)",
            Vector3::new(0.0, 0.0, r + lander.size / 2.0),
            Vector3::new(0.0, 0.0, 5027.0),
            Vector3::zeros(),
        ),
        4 => Scenario::new(
            4,
            "elliptical orbit that clips the atmosphere and decays",
            Vector3::new(0.0, 0.0, r + 100_000.0),
            Vector3::new(4000.0, 0.0, 0.0),
            Vector3::new(0.0, 90.0, 0.0),
        ),
        5 => Scenario::new(
            5,
            "descent from 200km",
            Vector3::new(0.0, -(r + planet.exosphere), 0.0),
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 90.0),
        )
        .stabilized(),
        6 => Scenario::new(
            6,
            "autopilot descent from 10km",
            Vector3::new(0.0, -(r + 10_000.0), 0.0),
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 90.0),
        )
        .stabilized()
        .autopilot(),
        7 => Scenario::new(
            7,
            "autopilot descent from 10km under parachute",
            Vector3::new(0.0, -(r + 10_000.0), 0.0),
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 90.0),
        )
        .stabilized()
        .autopilot()
        .chute_open(),
        8 => {
            let radius = (planet.mu() * MARS_DAY * MARS_DAY / (4.0 * PI * PI)).cbrt();
            Scenario::new(
                8,
                "areostationary orbit",
                Vector3::new(radius, 0.0, 0.0),
                Vector3::new(0.0, circular(radius), 0.0),
                Vector3::new(0.0, 90.0, 0.0),
            )
        }
        9 => Scenario::new(
            9,
            "parachute descent from 10km",
            Vector3::new(0.0, -(r + 10_000.0), 0.0),
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 90.0),
        )
        .stabilized()
        .chute_open(),
        _ => return Err(SimError::UnknownScenario(index)),
    };
    Ok(sc)
}

/// All scenarios, in index order.
pub fn all(planet: &PlanetParams, lander: &LanderParams) -> Vec<Scenario> {
    (0..SCENARIO_COUNT)
        .filter_map(|i| scenario(i, planet, lander).ok())
        .collect()
}
