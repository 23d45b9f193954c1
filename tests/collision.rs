use fallsim::core::measure;
use fallsim::core::{run_simulation, ParticleState, SimulationConfig};

/// Bounce validation: drop from (0, 10) at rest with dt = 0.01 and elastic
/// restitution. At the step where y first goes below ground, the vertical
/// velocity must flip sign with its magnitude preserved and the position must
/// be clamped exactly onto the ground plane.
#[test]
fn elastic_bounce_flips_vertical_velocity() -> fallsim::error::Result<()> {
    let initial = ParticleState::at_rest([0.0, 10.0], 1.0)?;
    let config = SimulationConfig::new(0.01, 9.8, 0.0, 0.0, 1.0, 200)?;
    let records = run_simulation(&initial, &config)?;

    let hit = records
        .iter()
        .position(|r| r.collided)
        .expect("particle should reach the ground within 200 steps");
    assert!(hit > 0, "first step should not already collide");

    // Reconstruct the pre-correction vertical velocity from the previous
    // record: one more velocity kick, no drag.
    let pre_v = records[hit - 1].state.velocity[1] - config.gravity * config.dt;
    let post = &records[hit];
    assert!(pre_v < 0.0);
    assert_eq!(post.state.position[1], 0.0, "position must clamp to ground");
    assert!(
        (post.state.velocity[1] + pre_v).abs() < 1e-9,
        "bounce must preserve speed: pre={}, post={}",
        pre_v,
        post.state.velocity[1]
    );
    assert!(post.penetration > 0.0, "crossing step must record depth");
    Ok(())
}

/// Collision-error growth: the same drop with a coarse dt = 0.5 must show a
/// strictly larger pre-correction penetration at its crossing step than the
/// dt = 0.01 run: the discrete clamp rule's error scales with the distance
/// travelled per step.
#[test]
fn coarse_timestep_penetrates_deeper() -> fallsim::error::Result<()> {
    let initial = ParticleState::at_rest([0.0, 10.0], 1.0)?;
    let fine = SimulationConfig::new(0.01, 9.8, 0.0, 0.0, 1.0, 200)?;
    let coarse = SimulationConfig::new(0.5, 9.8, 0.0, 0.0, 1.0, 20)?;

    let crossing_depth = |config: &SimulationConfig| -> fallsim::error::Result<f64> {
        let records = run_simulation(&initial, config)?;
        Ok(records
            .iter()
            .find(|r| r.collided)
            .expect("run should reach the ground")
            .penetration)
    };

    let fine_depth = crossing_depth(&fine)?;
    let coarse_depth = crossing_depth(&coarse)?;
    assert!(
        coarse_depth > fine_depth,
        "expected deeper penetration at dt=0.5 (got {coarse_depth}) than at dt=0.01 (got {fine_depth})"
    );
    Ok(())
}

/// Resolver invariant: after correction, no recorded state may remain below
/// the ground plane, for bouncy and for dragged runs alike.
#[test]
fn corrected_states_never_penetrate() -> fallsim::error::Result<()> {
    let initial = ParticleState::new([0.0, 10.0], [1.0, 0.0], 1.0)?;
    for config in [
        SimulationConfig::new(0.05, 9.8, 0.0, 0.0, 0.8, 500)?,
        SimulationConfig::new(0.05, 9.8, 0.3, 0.0, 0.5, 500)?,
    ] {
        let records = run_simulation(&initial, &config)?;
        assert!(measure::collision_count(&records) > 0);
        for r in &records {
            assert_eq!(
                measure::penetration_depth(&r.state, &config),
                0.0,
                "post-correction depth must be zero at t={}",
                r.t
            );
        }
    }
    Ok(())
}

/// The bounce rule only touches the vertical component: a constant horizontal
/// velocity must survive any number of ground collisions bit-identically when
/// there is no drag.
#[test]
fn horizontal_velocity_unaffected_by_bounces() -> fallsim::error::Result<()> {
    let initial = ParticleState::new([0.0, 5.0], [3.0, 0.0], 1.0)?;
    let config = SimulationConfig::new(0.02, 9.8, 0.0, 0.0, 0.8, 500)?;
    let records = run_simulation(&initial, &config)?;
    assert!(measure::collision_count(&records) > 0);
    for r in &records {
        assert_eq!(r.state.velocity[0], 3.0);
    }
    Ok(())
}
