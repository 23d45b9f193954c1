use crate::core::config::SimulationConfig;
use crate::core::measure;
use crate::core::particle::{ParticleState, DIM};
use crate::error::{Error, Result};

/// Net force on the particle: gravity plus, when configured, linear drag.
///
/// Drag is an addend on top of gravity, `-drag * v`, so with `drag > 0` it
/// strictly opposes motion and only ever removes energy.
pub fn force(state: &ParticleState, config: &SimulationConfig) -> [f64; DIM] {
    let mut f = [0.0, -state.mass * config.gravity];
    if config.drag > 0.0 {
        for (fk, vk) in f.iter_mut().zip(&state.velocity) {
            *fk -= config.drag * vk;
        }
    }
    f
}

/// Advance the state by one semi-implicit Euler step.
///
/// The velocity update comes first and the position update uses the already
/// updated velocity. This ordering is load-bearing for stability; do not
/// reorder it into fully explicit Euler.
fn integrate(state: &mut ParticleState, config: &SimulationConfig) {
    let f = force(state, config);
    for (vk, fk) in state.velocity.iter_mut().zip(&f) {
        *vk += fk / state.mass * config.dt;
    }
    for (xk, vk) in state.position.iter_mut().zip(&state.velocity) {
        *xk += vk * config.dt;
    }
}

/// Ground-plane collision response.
///
/// On penetration the position is clamped back to the ground plane and the
/// vertical velocity is reversed scaled by the restitution coefficient;
/// horizontal velocity is untouched. There is no sub-step time-of-impact
/// search, so the discrete correction error grows with dt. Returns whether a
/// correction was applied.
pub fn resolve_ground(state: &mut ParticleState, config: &SimulationConfig) -> bool {
    if state.position[1] < config.ground_height {
        state.position[1] = config.ground_height;
        state.velocity[1] = -config.restitution * state.velocity[1];
        true
    } else {
        false
    }
}

/// Lifecycle of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, no step taken yet.
    Initialized,
    /// At least one step taken, more remaining.
    Running,
    /// All steps taken (or the run was stopped by instability). Terminal.
    Completed,
}

/// Snapshot of one completed step.
///
/// `penetration` is the depth below ground *before* the collision correction
/// was applied; the stored state is post-correction. Plain data, suitable for
/// any tabular consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// Simulation time after this step.
    pub t: f64,
    /// Particle state after integration and collision correction.
    pub state: ParticleState,
    /// Total mechanical energy of `state`.
    pub energy: f64,
    /// Pre-correction penetration depth (0 when no contact).
    pub penetration: f64,
    /// Whether the collision resolver corrected this step.
    pub collided: bool,
}

/// One simulation run: integrator + collision resolver composed over
/// `config.steps` steps, producing an append-only record series.
///
/// The run is deterministic given its configuration and initial state; a
/// completed run cannot be resumed, only reconstructed.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    state: ParticleState,
    t: f64,
    completed_steps: usize,
    phase: Phase,
    records: Vec<StepRecord>,
}

impl Simulation {
    /// Create a run from initial conditions and a configuration.
    ///
    /// Errors: `Error::InvalidParam` if the configuration fails validation.
    pub fn new(initial: ParticleState, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            records: Vec::with_capacity(config.steps),
            state: initial,
            t: 0.0,
            completed_steps: 0,
            phase: Phase::Initialized,
            config,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The run's configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Records produced so far.
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Advance by one step and return the new record, or `None` once the run
    /// has completed. Pull-based consumers drive the run through this.
    ///
    /// Errors: `Error::NumericInstability` if the step produced a non-finite
    /// position or velocity; the run is stopped and cannot continue.
    pub fn step(&mut self) -> Result<Option<&StepRecord>> {
        if self.phase == Phase::Completed {
            return Ok(None);
        }
        self.phase = Phase::Running;

        integrate(&mut self.state, &self.config);
        self.t += self.config.dt;

        if !self.state.velocity.iter().all(|v| v.is_finite()) {
            self.phase = Phase::Completed;
            return Err(Error::NumericInstability {
                step: self.completed_steps,
                what: "non-finite velocity".into(),
            });
        }
        if !self.state.position.iter().all(|x| x.is_finite()) {
            self.phase = Phase::Completed;
            return Err(Error::NumericInstability {
                step: self.completed_steps,
                what: "non-finite position".into(),
            });
        }

        // Penetration is measured before the correction; the record keeps the
        // corrected state.
        let penetration = measure::penetration_depth(&self.state, &self.config);
        let collided = resolve_ground(&mut self.state, &self.config);
        let energy = measure::energy(&self.state, &self.config);

        self.records.push(StepRecord {
            t: self.t,
            state: self.state.clone(),
            energy,
            penetration,
            collided,
        });
        self.completed_steps += 1;
        if self.completed_steps == self.config.steps {
            self.phase = Phase::Completed;
        }
        Ok(self.records.last())
    }

    /// Drive the run to completion and return the full record series.
    pub fn run(mut self) -> Result<Vec<StepRecord>> {
        while self.step()?.is_some() {}
        Ok(self.records)
    }
}

/// Run one simulation to completion: one record per step, re-playable by
/// re-invoking with the same arguments.
pub fn run_simulation(
    initial: &ParticleState,
    config: &SimulationConfig,
) -> Result<Vec<StepRecord>> {
    log::debug!(
        "simulation run: dt={}, drag={}, steps={}",
        config.dt,
        config.drag,
        config.steps
    );
    Simulation::new(initial.clone(), config.clone())?.run()
}
