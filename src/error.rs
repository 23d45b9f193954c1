use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// Configuration problems are rejected once, at construction time, so the
/// per-step hot path carries no validation branches. Instability is the only
/// error a run can produce after it has started.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter (non-positive timestep or mass,
    /// restitution outside [0, 1], zero step count, non-finite input).
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// A step produced a non-finite position or velocity, typically from an
    /// unstable large-dt configuration. `step` is the number of valid steps
    /// completed before the blow-up.
    #[error("numeric instability at step {step}: {what}")]
    NumericInstability { step: usize, what: String },
}
