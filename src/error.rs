use thiserror::Error;

/// Everything that can stop a lander run or its setup.
///
/// Telemetry failures never show up here; the log sink degrades to a no-op.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("lander position is degenerate (|r| = {radius} m), gravity is undefined")]
    DegeneratePosition { radius: f64 },

    #[error("effective lander mass is not positive ({mass} kg)")]
    DegenerateMass { mass: f64 },

    #[error("timestep must be finite and positive, got {0}")]
    InvalidTimestep(f64),

    #[error("invalid controller gains: {0}")]
    InvalidGains(String),

    #[error("unknown scenario {0} (expected 0-9)")]
    UnknownScenario(usize),

    #[error("failed to read config: {0}")]
    ConfigIo(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),
}
