use crate::dynamics::state::BodyState;

/// Trait for throttle controllers.
///
/// Implement this to plug a custom descent law into the simulation loop.
/// The loop calls it once per tick, after integration, so the command
/// takes effect from the following tick.
pub trait ThrottleController {
    /// Compute the next throttle command in [0, 1] from the post-step state.
    fn throttle(&mut self, state: &BodyState, time: f64) -> f64;

    /// Reset controller internal state.
    fn reset(&mut self) {}

    /// Called once when a run ends; flush any buffered output.
    fn finish(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
