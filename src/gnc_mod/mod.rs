pub mod attitude;
pub mod autopilot;
pub mod controller;

pub use attitude::stabilized_orientation;
pub use autopilot::{deadband_map, Autopilot};
pub use controller::ThrottleController;
