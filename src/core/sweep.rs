//! Parameter-sweep driver: many independent runs varying exactly one
//! configuration parameter, aggregated for side-by-side comparison.
//!
//! Runs are independent, so with the `parallel` feature they execute on a
//! rayon pool; results are always assembled in the input value order.

use std::str::FromStr;

use crate::core::config::SimulationConfig;
use crate::core::measure;
use crate::core::particle::ParticleState;
use crate::core::sim::run_simulation;
use crate::error::{Error, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Which configuration parameter a sweep varies. All other physics parameters
/// stay identical across the sweep, so observed differences are attributable
/// solely to the swept one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepParameter {
    /// Vary the integration timestep.
    Dt,
    /// Vary the linear drag coefficient.
    Drag,
}

impl FromStr for SweepParameter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Error> {
        match s {
            "dt" => Ok(Self::Dt),
            "drag" => Ok(Self::Drag),
            other => Err(Error::InvalidParam(format!(
                "unknown sweep parameter {other:?} (expected \"dt\" or \"drag\")"
            ))),
        }
    }
}

/// Aggregated metrics for one completed sweep configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepMetrics {
    /// Signed relative energy drift over the run.
    pub energy_drift: f64,
    /// Absolute energy drift per unit simulated time.
    pub energy_drift_rate: f64,
    /// Terminal-speed estimate (trailing-quarter mean speed).
    pub terminal_speed: f64,
    /// Largest pre-correction penetration depth.
    pub max_penetration: f64,
    /// Number of collision corrections.
    pub collisions: usize,
    /// Dimensionless stability parameter g dt / v_max.
    pub alpha: f64,
}

/// Outcome of one sweep configuration. A failed run records why and how far
/// it got instead of aborting the sweep.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepOutcome {
    Completed(SweepMetrics),
    Failed {
        /// Rendered error for the comparison table.
        reason: String,
        /// Valid steps completed before the failure; `None` when the derived
        /// configuration was rejected outright.
        last_step: Option<usize>,
    },
}

/// One entry of the sweep's comparison table.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    /// The swept parameter's value for this run.
    pub value: f64,
    pub outcome: SweepOutcome,
}

impl SweepResult {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, SweepOutcome::Failed { .. })
    }

    /// Metrics of a completed run, `None` for a failed one.
    pub fn metrics(&self) -> Option<&SweepMetrics> {
        match &self.outcome {
            SweepOutcome::Completed(m) => Some(m),
            SweepOutcome::Failed { .. } => None,
        }
    }
}

/// Build the derived configuration for one sweep value, overriding only the
/// swept parameter, and re-validate it.
fn derived_config(
    base: &SimulationConfig,
    parameter: SweepParameter,
    value: f64,
) -> Result<SimulationConfig> {
    let mut config = base.clone();
    match parameter {
        SweepParameter::Dt => config.dt = value,
        SweepParameter::Drag => config.drag = value,
    }
    config.validate()?;
    Ok(config)
}

fn run_one(
    base: &SimulationConfig,
    initial: &ParticleState,
    parameter: SweepParameter,
    value: f64,
) -> SweepResult {
    log::debug!("sweep run: {parameter:?} = {value}");
    let run = derived_config(base, parameter, value)
        .and_then(|config| run_simulation(initial, &config).map(|records| (config, records)));
    let outcome = match run {
        Ok((config, records)) => SweepOutcome::Completed(SweepMetrics {
            energy_drift: measure::energy_drift(&records),
            energy_drift_rate: measure::energy_drift_rate(&records),
            terminal_speed: measure::terminal_speed_estimate(&records),
            max_penetration: measure::max_penetration(&records),
            collisions: measure::collision_count(&records),
            alpha: measure::stability_alpha(&records, &config),
        }),
        Err(err) => {
            log::warn!("sweep run {parameter:?} = {value} failed: {err}");
            let last_step = match &err {
                Error::NumericInstability { step, .. } => Some(*step),
                Error::InvalidParam(_) => None,
            };
            SweepOutcome::Failed {
                reason: err.to_string(),
                last_step,
            }
        }
    };
    SweepResult { value, outcome }
}

/// Run the simulation once per value in `values`, varying `parameter` over a
/// shared base configuration and shared initial state.
///
/// Results match the order of `values` regardless of execution order, one
/// entry per value. Failures (invalid derived configuration, numeric
/// instability) are recorded in place; they never abort the other runs, and
/// they are never retried, since a failure is a deterministic function of
/// the configuration.
pub fn run_sweep(
    base: &SimulationConfig,
    initial: &ParticleState,
    parameter: SweepParameter,
    values: &[f64],
) -> Vec<SweepResult> {
    #[cfg(feature = "parallel")]
    return values
        .par_iter()
        .map(|&value| run_one(base, initial, parameter, value))
        .collect();

    #[cfg(not(feature = "parallel"))]
    values
        .iter()
        .map(|&value| run_one(base, initial, parameter, value))
        .collect()
}
