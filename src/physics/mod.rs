pub mod aerodynamics;
pub mod atmosphere;
pub mod engine;
pub mod gravity;
