use crate::core::particle::{ParticleState, DIM};
use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

/// Sample `n` particles at rest with positions uniform in `[0, extent_k)` per
/// axis, the lab's stock initial condition.
///
/// A fixed `seed` reproduces the exact same states, which is what lets a
/// sweep attribute differences to the swept parameter rather than to initial
/// conditions; `None` seeds from entropy.
pub fn initial_states(
    n: usize,
    extent: [f64; DIM],
    mass: f64,
    seed: Option<u64>,
) -> Result<Vec<ParticleState>> {
    if n == 0 {
        return Err(Error::InvalidParam("n must be > 0".into()));
    }
    if !extent.iter().all(|&l| l.is_finite() && l > 0.0) {
        return Err(Error::InvalidParam(
            "extent components must be finite and > 0".into(),
        ));
    }

    let mut rng: StdRng = match seed {
        Some(s) => SeedableRng::seed_from_u64(s),
        None => SeedableRng::seed_from_u64(rng().random()),
    };

    let mut states = Vec::with_capacity(n);
    for _ in 0..n {
        let mut position = [0.0_f64; DIM];
        for (x, &l) in position.iter_mut().zip(&extent) {
            *x = rng.random_range(0.0..l);
        }
        states.push(ParticleState::at_rest(position, mass)?);
    }
    Ok(states)
}
