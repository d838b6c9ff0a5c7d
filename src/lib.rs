pub mod config;
pub mod dynamics;
pub mod error;
pub mod physics;
mod gnc_mod;
pub mod sim;
pub mod io;
pub mod orbital;
pub mod scenario;

// Public path for the guidance and control code
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub use config::SimConfig;
pub use error::SimError;

pub mod types {
    pub use crate::config::{ControllerGains, LanderParams, PlanetParams, SimConfig, SimParams};
    pub use crate::dynamics::state::{BodyState, ParachuteStatus};
    pub use crate::scenario::Scenario;
}
