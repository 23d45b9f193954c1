//! fallsim: a discrete-time falling-particle lab.
//!
//! The crate simulates point masses under gravity (optionally with linear
//! drag) using semi-implicit Euler integration and a deliberately crude
//! ground-bounce rule, then sweeps timestep or drag values to characterize
//! how those numerical choices affect energy drift, terminal velocity, and
//! collision penetration error.
//!
//! Rendering, CLIs, and plotting live outside this crate; consumers receive
//! finite [`core::StepRecord`] series and [`core::SweepResult`] tables
//! through [`core::run_simulation`] and [`core::run_sweep`] (or through the
//! optional Python bindings behind the `python` feature).

pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;
