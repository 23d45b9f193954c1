use crate::error::{Error, Result};

/// Standard gravitational acceleration magnitude, m/s^2.
pub const EARTH_GRAVITY: f64 = 9.8;

/// Parameters for one simulation run, immutable for the run's duration.
///
/// `gravity` is the downward acceleration magnitude; `drag` is the linear
/// drag coefficient (0 disables drag). Validation happens once here, never
/// in the step loop.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Fixed integration timestep (> 0).
    pub dt: f64,
    /// Downward gravitational acceleration magnitude.
    pub gravity: f64,
    /// Linear drag coefficient (>= 0; 0 = no drag).
    pub drag: f64,
    /// Height of the ground plane.
    pub ground_height: f64,
    /// Restitution coefficient in [0, 1]; 1 = elastic bounce.
    pub restitution: f64,
    /// Number of steps per run (> 0).
    pub steps: usize,
}

impl SimulationConfig {
    /// Create a validated configuration.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `dt <= 0`, `drag < 0`, `restitution` lies
    ///   outside [0, 1], `steps == 0`, or any value is NaN/inf.
    pub fn new(
        dt: f64,
        gravity: f64,
        drag: f64,
        ground_height: f64,
        restitution: f64,
        steps: usize,
    ) -> Result<Self> {
        let config = Self {
            dt,
            gravity,
            drag,
            ground_height,
            restitution,
            steps,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-check all parameter invariants.
    ///
    /// Used by the sweep driver after overriding the swept parameter on a
    /// derived configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(Error::InvalidParam("dt must be finite and > 0".into()));
        }
        if !self.gravity.is_finite() {
            return Err(Error::InvalidParam("gravity must be finite".into()));
        }
        if !self.drag.is_finite() || self.drag < 0.0 {
            return Err(Error::InvalidParam("drag must be finite and >= 0".into()));
        }
        if !self.ground_height.is_finite() {
            return Err(Error::InvalidParam("ground_height must be finite".into()));
        }
        if !self.restitution.is_finite() || !(0.0..=1.0).contains(&self.restitution) {
            return Err(Error::InvalidParam(
                "restitution must be within [0, 1]".into(),
            ));
        }
        if self.steps == 0 {
            return Err(Error::InvalidParam("steps must be > 0".into()));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    /// Lab defaults: dt = 1e-2, Earth gravity, no drag, ground at y = 0,
    /// damped bounces, 500 steps.
    fn default() -> Self {
        Self {
            dt: 1e-2,
            gravity: EARTH_GRAVITY,
            drag: 0.0,
            ground_height: 0.0,
            restitution: 0.8,
            steps: 500,
        }
    }
}
