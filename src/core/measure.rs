//! Scalar diagnostics over particle states and step-record series.
//!
//! Everything here is a pure function; nothing mutates simulation state.
//! Per-run aggregates (drift, max penetration, terminal speed) are what the
//! sweep driver compares across configurations.

use crate::core::config::SimulationConfig;
use crate::core::particle::ParticleState;
use crate::core::sim::StepRecord;

/// Total mechanical energy: kinetic plus potential relative to the ground
/// plane, `0.5 m |v|^2 + m g (y - ground)`.
pub fn energy(state: &ParticleState, config: &SimulationConfig) -> f64 {
    state.kinetic_energy()
        + state.mass * config.gravity * (state.position[1] - config.ground_height)
}

/// Penetration depth below the ground plane: `max(0, ground - y)`.
///
/// The simulation loop evaluates this before the collision correction, so the
/// recorded value captures the discrete collision error the correction wipes
/// out.
pub fn penetration_depth(state: &ParticleState, config: &SimulationConfig) -> f64 {
    (config.ground_height - state.position[1]).max(0.0)
}

/// Signed relative energy drift over a run: `(E_last - E_first) / E_first`.
///
/// Trends toward 0 only in the conservative case (no drag, no collision
/// loss); dissipative runs drift negative. Returns 0.0 for an empty series or
/// a zero initial energy, where the ratio is undefined.
pub fn energy_drift(records: &[StepRecord]) -> f64 {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return 0.0;
    };
    if first.energy == 0.0 {
        return 0.0;
    }
    (last.energy - first.energy) / first.energy
}

/// Absolute energy drift per unit simulated time.
pub fn energy_drift_rate(records: &[StepRecord]) -> f64 {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return 0.0;
    };
    let elapsed = last.t - first.t;
    if elapsed <= 0.0 {
        return 0.0;
    }
    (last.energy - first.energy) / elapsed
}

/// Number of steps on which the collision resolver applied a correction.
pub fn collision_count(records: &[StepRecord]) -> usize {
    records.iter().filter(|r| r.collided).count()
}

/// Largest pre-correction penetration depth seen during a run.
pub fn max_penetration(records: &[StepRecord]) -> f64 {
    records.iter().map(|r| r.penetration).fold(0.0, f64::max)
}

/// Largest speed seen during a run.
pub fn max_speed(records: &[StepRecord]) -> f64 {
    records.iter().map(|r| r.state.speed()).fold(0.0, f64::max)
}

/// Terminal-speed estimate: mean speed over the trailing quarter of the run.
///
/// Under linear drag the speed asymptotes to `m g / drag`; averaging the tail
/// smooths out residual bounce transients.
pub fn terminal_speed_estimate(records: &[StepRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let tail_len = (records.len() / 4).max(1);
    let tail = &records[records.len() - tail_len..];
    tail.iter().map(|r| r.state.speed()).sum::<f64>() / tail_len as f64
}

/// Dimensionless stability parameter `alpha = g dt / v_char`, with the run's
/// max speed as the characteristic velocity. 0 when no motion occurred.
pub fn stability_alpha(records: &[StepRecord], config: &SimulationConfig) -> f64 {
    let v_char = max_speed(records);
    if v_char > 0.0 {
        config.gravity.abs() * config.dt / v_char
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn record(t: f64, y: f64, vy: f64, config: &SimulationConfig, collided: bool) -> StepRecord {
        let state = ParticleState::new([0.0, y], [0.0, vy], 1.0).expect("valid state");
        let energy = energy(&state, config);
        StepRecord {
            t,
            state,
            energy,
            penetration: 0.0,
            collided,
        }
    }

    fn config() -> SimulationConfig {
        SimulationConfig::new(0.01, 9.8, 0.0, 0.0, 1.0, 10).expect("valid config")
    }

    #[test]
    fn energy_is_kinetic_plus_potential() -> Result<()> {
        let config = config();
        let state = ParticleState::new([0.0, 2.0], [0.0, 3.0], 2.0)?;
        // 0.5*2*9 + 2*9.8*2 = 9 + 39.2
        assert!((energy(&state, &config) - (9.0 + 39.2)).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn potential_is_relative_to_ground() -> Result<()> {
        let config = SimulationConfig::new(0.01, 9.8, 0.0, -2.0, 1.0, 10)?;
        let state = ParticleState::at_rest([0.0, -2.0], 1.0)?;
        assert_eq!(energy(&state, &config), 0.0);
        Ok(())
    }

    #[test]
    fn penetration_depth_clamps_at_zero() -> Result<()> {
        let config = config();
        let below = ParticleState::at_rest([0.0, -0.3], 1.0)?;
        let above = ParticleState::at_rest([0.0, 0.3], 1.0)?;
        assert!((penetration_depth(&below, &config) - 0.3).abs() < 1e-12);
        assert_eq!(penetration_depth(&above, &config), 0.0);
        Ok(())
    }

    #[test]
    fn drift_is_signed_and_relative() {
        let config = config();
        // E = m g y at rest: y=10 -> 98, y=9 -> 88.2
        let series = vec![
            record(0.01, 10.0, 0.0, &config, false),
            record(0.02, 9.0, 0.0, &config, false),
        ];
        let drift = energy_drift(&series);
        assert!((drift - (88.2 - 98.0) / 98.0).abs() < 1e-12);
        assert!(drift < 0.0);
    }

    #[test]
    fn drift_degenerate_cases_are_zero() {
        let config = config();
        assert_eq!(energy_drift(&[]), 0.0);
        let flat = vec![record(0.01, 0.0, 0.0, &config, false)];
        assert_eq!(energy_drift(&flat), 0.0); // E_first == 0
    }

    #[test]
    fn drift_rate_divides_by_elapsed_time() {
        let config = config();
        let series = vec![
            record(1.0, 10.0, 0.0, &config, false),
            record(3.0, 9.0, 0.0, &config, false),
        ];
        assert!((energy_drift_rate(&series) - (88.2 - 98.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn collision_count_counts_flags() {
        let config = config();
        let series = vec![
            record(0.01, 1.0, 0.0, &config, false),
            record(0.02, 0.0, 1.0, &config, true),
            record(0.03, 0.0, 0.5, &config, true),
        ];
        assert_eq!(collision_count(&series), 2);
    }

    #[test]
    fn tail_estimate_averages_trailing_quarter() {
        let config = config();
        // 8 records: speeds 0..=7; trailing quarter = speeds 6, 7
        let series: Vec<StepRecord> = (0..8)
            .map(|i| record(0.01 * (i + 1) as f64, 10.0, i as f64, &config, false))
            .collect();
        assert!((terminal_speed_estimate(&series) - 6.5).abs() < 1e-12);
        assert_eq!(terminal_speed_estimate(&[]), 0.0);
    }

    #[test]
    fn alpha_uses_max_speed_as_characteristic_velocity() {
        let config = config();
        let series = vec![
            record(0.01, 10.0, -2.0, &config, false),
            record(0.02, 10.0, -4.9, &config, false),
        ];
        assert!((stability_alpha(&series, &config) - 9.8 * 0.01 / 4.9).abs() < 1e-12);
        assert_eq!(stability_alpha(&[], &config), 0.0);
    }
}
