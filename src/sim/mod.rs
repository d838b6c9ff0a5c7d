pub mod integrator;
pub mod runner;
pub mod event;

pub use runner::{simulate, simulate_with, FlightRecord, FlightStatus, SimulationClock, SimulationContext};
pub use integrator::{Euler, Integrator, IntegratorKind, IntegratorMemory, Verlet};
