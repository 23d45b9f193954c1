//! Python-facing wrapper around the Rust simulation core (`python` feature).
//!
//! The plotting and analysis layer stays in Python; it receives the logged
//! series and sweep tables as NumPy arrays / plain dicts and never drives the
//! physics stepping itself.

use numpy::ndarray::{Array1, Array2};
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::core::config::SimulationConfig;
use crate::core::particle::ParticleState;
use crate::core::scenario;
use crate::core::sweep::{SweepOutcome, SweepParameter};
use crate::core::{run_simulation, run_sweep};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Run one simulation to completion.
///
/// Returns a dict of per-step arrays: "time", "position" (N, 2),
/// "velocity" (N, 2), "energy", "penetration", "collided".
///
/// Errors: raises ValueError on invalid parameters or numeric instability.
#[pyfunction]
#[pyo3(signature = (initial_position, initial_velocity, mass=1.0, dt=1e-2, gravity=9.8, drag=0.0, ground_height=0.0, restitution=0.8, steps=500))]
#[allow(clippy::too_many_arguments)]
fn simulate<'py>(
    py: Python<'py>,
    initial_position: [f64; 2],
    initial_velocity: [f64; 2],
    mass: f64,
    dt: f64,
    gravity: f64,
    drag: f64,
    ground_height: f64,
    restitution: f64,
    steps: usize,
) -> PyResult<Bound<'py, PyDict>> {
    let initial = ParticleState::new(initial_position, initial_velocity, mass).map_err(py_err)?;
    let config = SimulationConfig::new(dt, gravity, drag, ground_height, restitution, steps)
        .map_err(py_err)?;

    let records = py
        .detach(|| run_simulation(&initial, &config))
        .map_err(py_err)?;

    let n = records.len();
    let mut time = Array1::<f64>::zeros(n);
    let mut position = Array2::<f64>::zeros((n, 2));
    let mut velocity = Array2::<f64>::zeros((n, 2));
    let mut energy = Array1::<f64>::zeros(n);
    let mut penetration = Array1::<f64>::zeros(n);
    let mut collided = Array1::<bool>::from_elem(n, false);
    for (i, r) in records.iter().enumerate() {
        time[i] = r.t;
        for k in 0..2 {
            position[[i, k]] = r.state.position[k];
            velocity[[i, k]] = r.state.velocity[k];
        }
        energy[i] = r.energy;
        penetration[i] = r.penetration;
        collided[i] = r.collided;
    }

    let out = PyDict::new(py);
    out.set_item("time", time.into_pyarray(py))?;
    out.set_item("position", position.into_pyarray(py))?;
    out.set_item("velocity", velocity.into_pyarray(py))?;
    out.set_item("energy", energy.into_pyarray(py))?;
    out.set_item("penetration", penetration.into_pyarray(py))?;
    out.set_item("collided", collided.into_pyarray(py))?;
    Ok(out)
}

/// Run a parameter sweep over `values` for `parameter` ("dt" or "drag").
///
/// Returns a list of dicts, one per value in input order. Completed entries
/// carry the aggregated metrics; failed entries carry "reason" and
/// "last_step" and do not abort the rest of the sweep.
#[pyfunction]
#[pyo3(signature = (parameter, values, initial_position, initial_velocity, mass=1.0, dt=1e-2, gravity=9.8, drag=0.0, ground_height=0.0, restitution=0.8, steps=500))]
#[allow(clippy::too_many_arguments)]
fn sweep<'py>(
    py: Python<'py>,
    parameter: &str,
    values: Vec<f64>,
    initial_position: [f64; 2],
    initial_velocity: [f64; 2],
    mass: f64,
    dt: f64,
    gravity: f64,
    drag: f64,
    ground_height: f64,
    restitution: f64,
    steps: usize,
) -> PyResult<Bound<'py, PyList>> {
    let parameter: SweepParameter = parameter.parse().map_err(py_err)?;
    let initial = ParticleState::new(initial_position, initial_velocity, mass).map_err(py_err)?;
    let base = SimulationConfig::new(dt, gravity, drag, ground_height, restitution, steps)
        .map_err(py_err)?;

    let results = py.detach(|| run_sweep(&base, &initial, parameter, &values));

    let out = PyList::empty(py);
    for r in &results {
        let entry = PyDict::new(py);
        entry.set_item("value", r.value)?;
        match &r.outcome {
            SweepOutcome::Completed(m) => {
                entry.set_item("failed", false)?;
                entry.set_item("energy_drift", m.energy_drift)?;
                entry.set_item("energy_drift_rate", m.energy_drift_rate)?;
                entry.set_item("terminal_speed", m.terminal_speed)?;
                entry.set_item("max_penetration", m.max_penetration)?;
                entry.set_item("collisions", m.collisions)?;
                entry.set_item("alpha", m.alpha)?;
            }
            SweepOutcome::Failed { reason, last_step } => {
                entry.set_item("failed", true)?;
                entry.set_item("reason", reason.as_str())?;
                entry.set_item("last_step", *last_step)?;
            }
        }
        out.append(entry)?;
    }
    Ok(out)
}

/// Sample `n` at-rest initial positions uniform in [0, extent) per axis.
///
/// Returns a NumPy array of shape (n, 2); a fixed `seed` reproduces the same
/// draw across runs.
#[pyfunction]
#[pyo3(signature = (n, extent, mass=1.0, seed=None))]
fn sample_initial_positions<'py>(
    py: Python<'py>,
    n: usize,
    extent: [f64; 2],
    mass: f64,
    seed: Option<u64>,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let states = scenario::initial_states(n, extent, mass, seed).map_err(py_err)?;
    let mut arr = Array2::<f64>::zeros((n, 2));
    for (i, s) in states.iter().enumerate() {
        for k in 0..2 {
            arr[[i, k]] = s.position[k];
        }
    }
    Ok(arr.into_pyarray(py))
}

/// The fallsim Python module entry point.
#[pymodule]
fn fallsim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    m.add_function(wrap_pyfunction!(sweep, m)?)?;
    m.add_function(wrap_pyfunction!(sample_initial_positions, m)?)?;
    Ok(())
}
