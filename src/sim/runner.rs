use nalgebra::Vector3;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::dynamics::state::{BodyState, ParachuteStatus};
use crate::dynamics::{self, ForceInputs, Forces};
use crate::error::SimError;
use crate::gnc::{stabilized_orientation, Autopilot, ThrottleController};
use crate::io::telemetry::TrajectoryLog;
use crate::physics::engine::{burn_fuel, Engine};
use crate::physics::{aerodynamics, atmosphere};
use crate::scenario::{self, Scenario};
use super::event::{standard_detectors, EventDetector, SimEvent};
use super::integrator::Integrator;

// ---------------------------------------------------------------------------
// Clock and per-tick records
// ---------------------------------------------------------------------------

/// Elapsed simulated time, advanced by one fixed step per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationClock {
    elapsed: f64,
    ticks: u64,
}

impl SimulationClock {
    pub fn advance(&mut self, dt: f64) {
        self.elapsed += dt;
        self.ticks += 1;
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightStatus {
    Flying,
    Landed,
    Crashed,
}

/// Snapshot taken after each tick.
#[derive(Debug, Clone)]
pub struct TrajectoryPoint {
    pub time: f64,
    pub state: BodyState,
    pub altitude: f64,
    pub throttle: f64,
    pub parachute: ParachuteStatus,
    pub status: FlightStatus,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct FlightRecord {
    pub trajectory: Vec<TrajectoryPoint>,
    pub events: Vec<SimEvent>,
    pub status: FlightStatus,
}

// ---------------------------------------------------------------------------
// Simulation context
// ---------------------------------------------------------------------------

/// All mutable state of one run.
///
/// Per tick: force model, then integrator, then (optionally) the throttle
/// controller. Each field has exactly one writer per tick.
pub struct SimulationContext {
    pub state: BodyState,
    pub parachute: ParachuteStatus,
    pub throttle: f64,
    pub stabilized_attitude: bool,
    config: SimConfig,
    clock: SimulationClock,
    integrator: Box<dyn Integrator>,
    controller: Option<Box<dyn ThrottleController>>,
    engine: Engine,
    status: FlightStatus,
    last_forces: Option<Forces>,
}

impl SimulationContext {
    /// Set up a run from a scenario. An autopilot scenario gets the
    /// configured gains and, if a telemetry path is set, a file log.
    pub fn new(scenario: &Scenario, config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let controller: Option<Box<dyn ThrottleController>> = if scenario.autopilot_enabled {
            let mut autopilot = Autopilot::new(config.autopilot, config.planet.radius);
            if let Some(path) = &config.sim.telemetry_path {
                autopilot = autopilot.with_sink(Box::new(TrajectoryLog::new(path)));
            }
            Some(Box::new(autopilot))
        } else {
            None
        };
        Ok(Self {
            state: scenario.state,
            parachute: scenario.parachute,
            throttle: 0.0,
            stabilized_attitude: scenario.stabilized_attitude,
            integrator: config.sim.integrator.build(),
            config,
            clock: SimulationClock::default(),
            controller,
            engine: Engine::new(),
            status: FlightStatus::Flying,
            last_forces: None,
        })
    }

    /// Replace the throttle controller (or remove it with `None`).
    pub fn with_controller(mut self, controller: Option<Box<dyn ThrottleController>>) -> Self {
        self.controller = controller;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn status(&self) -> FlightStatus {
        self.status
    }

    pub fn integrator_name(&self) -> &str {
        self.integrator.name()
    }

    pub fn controller_name(&self) -> Option<&str> {
        self.controller.as_ref().map(|c| c.name())
    }

    /// Forces evaluated on the most recent tick.
    pub fn last_forces(&self) -> Option<&Forces> {
        self.last_forces.as_ref()
    }

    pub fn last_acceleration(&self) -> Option<Vector3<f64>> {
        self.last_forces.map(|f| f.acceleration())
    }

    pub fn altitude(&self) -> f64 {
        self.state.altitude(self.config.planet.radius)
    }

    /// Manual throttle (pilot input). Overwritten each tick while a
    /// controller is attached.
    pub fn set_throttle(&mut self, throttle: f64) {
        self.throttle = throttle.clamp(0.0, 1.0);
    }

    /// Open the parachute. Has no effect once it is deployed or lost.
    pub fn deploy_parachute(&mut self) -> bool {
        if self.parachute != ParachuteStatus::NotDeployed {
            return false;
        }
        self.parachute = ParachuteStatus::Deployed;
        true
    }

    pub fn point(&self) -> TrajectoryPoint {
        TrajectoryPoint {
            time: self.clock.elapsed(),
            state: self.state,
            altitude: self.altitude(),
            throttle: self.throttle,
            parachute: self.parachute,
            status: self.status,
        }
    }

    /// Advance the run by one fixed step. Does nothing once on the ground.
    pub fn tick(&mut self) -> Result<FlightStatus, SimError> {
        if self.status != FlightStatus::Flying {
            return Ok(self.status);
        }
        let dt = self.config.sim.dt;
        let (planet, lander) = (&self.config.planet, &self.config.lander);

        // Force model
        let density = atmosphere::density(&self.state.position, planet);
        let thrust_world = self.engine.thrust_world(
            self.throttle,
            &self.state.orientation,
            self.state.fuel,
            false,
            dt,
            lander,
            planet,
        );
        let inputs = ForceInputs { density, thrust_world };
        let forces = dynamics::forces(&self.state, self.parachute, &inputs, lander, planet)?;
        let acceleration = forces.acceleration();
        self.last_forces = Some(forces);

        // Integrator
        self.integrator.step(&mut self.state, &acceleration, dt);

        // Controller: its command is used from the next tick on
        if let Some(controller) = self.controller.as_mut() {
            self.throttle = controller.throttle(&self.state, self.clock.elapsed()).clamp(0.0, 1.0);
        }

        if self.stabilized_attitude {
            self.state.orientation = stabilized_orientation(&self.state.position, &self.state.orientation);
        }

        self.update_fuel(dt);
        self.update_parachute();
        self.check_touchdown();

        self.clock.advance(dt);
        Ok(self.status)
    }

    fn update_fuel(&mut self, dt: f64) {
        let lander = &self.config.lander;
        self.state.fuel = burn_fuel(self.state.fuel, self.engine.effective_throttle(), dt, lander);
        if self.state.fuel <= 0.0 {
            self.throttle = 0.0;
        }
    }

    fn update_parachute(&mut self) {
        let (planet, lander) = (&self.config.planet, &self.config.lander);
        let altitude = self.state.altitude(planet.radius);
        let density = atmosphere::density(&self.state.position, planet);

        if self.parachute == ParachuteStatus::NotDeployed {
            if let Some(deploy_alt) = lander.chute_deploy_altitude {
                if altitude < deploy_alt
                    && aerodynamics::safe_to_deploy_parachute(&self.state, density, lander, planet)
                {
                    self.parachute = ParachuteStatus::Deployed;
                    debug!(altitude, "parachute deployed");
                }
            }
        }

        if self.parachute == ParachuteStatus::Deployed
            && !aerodynamics::safe_to_deploy_parachute(&self.state, density, lander, planet)
        {
            self.parachute = ParachuteStatus::Lost;
            info!(
                time = self.clock.elapsed(),
                altitude,
                speed = self.state.velocity.norm(),
                "parachute torn off"
            );
        }
    }

    fn check_touchdown(&mut self) {
        let altitude = self.altitude();
        if altitude > 0.0 {
            return;
        }
        let lander = &self.config.lander;
        let ground_speed = self.state.ground_speed();
        let descent_rate = -self.state.radial_velocity();
        let crashed = ground_speed > lander.max_impact_ground_speed
            || descent_rate > lander.max_impact_descent_rate;
        self.status = if crashed { FlightStatus::Crashed } else { FlightStatus::Landed };
        self.throttle = 0.0;
        info!(
            time = self.clock.elapsed(),
            ground_speed,
            descent_rate,
            fuel = self.state.fuel,
            crashed,
            "touchdown"
        );
    }

    /// Tick until touchdown or `max_time`, recording every step.
    pub fn run(&mut self) -> Result<FlightRecord, SimError> {
        let dt = self.config.sim.dt;
        let max_time = self.config.sim.max_time;
        let capacity = ((max_time / dt).max(0.0) as usize + 1).min(200_000);
        let mut trajectory = Vec::with_capacity(capacity);
        let mut events = Vec::new();
        let mut detectors: Vec<Box<dyn EventDetector>> = standard_detectors(self.config.planet.exosphere);

        trajectory.push(self.point());

        while self.status == FlightStatus::Flying && self.clock.elapsed() < max_time {
            self.tick()?;
            let current = self.point();
            if let Some(prev) = trajectory.last() {
                for det in detectors.iter_mut() {
                    if let Some(kind) = det.check(prev, &current) {
                        debug!(time = current.time, ?kind, "flight event");
                        events.push(SimEvent { time: current.time, kind, point: current.clone() });
                    }
                }
            }
            trajectory.push(current);
        }

        if let Some(controller) = self.controller.as_mut() {
            controller.finish();
        }

        Ok(FlightRecord { trajectory, events, status: self.status })
    }
}

impl std::fmt::Debug for SimulationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationContext")
            .field("state", &self.state)
            .field("parachute", &self.parachute)
            .field("throttle", &self.throttle)
            .field("clock", &self.clock)
            .field("integrator", &self.integrator.name())
            .field("controller", &self.controller_name())
            .field("status", &self.status)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Convenience entry points
// ---------------------------------------------------------------------------

/// Run a scenario with a custom throttle controller.
pub fn simulate_with(
    scenario: &Scenario,
    config: &SimConfig,
    controller: Box<dyn ThrottleController>,
) -> Result<FlightRecord, SimError> {
    let mut ctx = SimulationContext::new(scenario, config.clone())?.with_controller(Some(controller));
    ctx.run()
}

/// Run canned scenario `index` with its own flags.
pub fn simulate(index: usize, config: &SimConfig) -> Result<FlightRecord, SimError> {
    let scenario = scenario::scenario(index, &config.planet, &config.lander)?;
    let mut ctx = SimulationContext::new(&scenario, config.clone())?;
    ctx.run()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
