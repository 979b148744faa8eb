//! Fixed-geometry delay-and-sum beamforming for small microphone arrays.
//!
//! Given one recording per microphone and a known source position, [`pipeline::run`] computes
//! the propagation delay of every microphone relative to the first one, time-aligns the
//! recordings, sums them and writes the peak-normalized mono result.

pub mod align;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod pipeline;
pub mod resample;
pub mod signal;
pub mod simulator;

pub use error::{Error, Result};

pub type Sample = f64;
