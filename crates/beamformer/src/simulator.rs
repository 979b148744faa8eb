use std::f64::consts::{FRAC_1_SQRT_2, TAU};

use glam::DVec3;
use rand::Rng;
use statrs::distribution::Normal;

use crate::{
    error::{Error, Result},
    geometry::compute_delays,
    signal::Signal,
    Sample,
};

/// Synthesizes what each microphone of an array records when a tone plays at a source.
///
/// Arrival times are relative to the first microphone, the same reference the beamformer
/// uses, so the reference recording always starts at phase zero.
pub struct Simulator {
    delays: Vec<f64>,
    sample_rate: u32,
    noise: Option<Normal>,
}

impl Simulator {
    pub fn new(
        microphones: &[DVec3],
        source: DVec3,
        speed_of_sound: f64,
        sample_rate: u32,
    ) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::configuration("sample rate must be positive"));
        }

        Ok(Self {
            delays: compute_delays(microphones, source, speed_of_sound)?,
            sample_rate,
            noise: None,
        })
    }

    /// Add white Gaussian noise. The ratio is between signal and noise RMS (not in dB).
    pub fn with_noise(mut self, signal_to_noise_ratio: f64) -> Result<Self> {
        if !(signal_to_noise_ratio.is_finite() && signal_to_noise_ratio > 0.0) {
            return Err(Error::configuration(format!(
                "signal to noise ratio must be positive, got {signal_to_noise_ratio}"
            )));
        }

        // A unit sine has an RMS of 1/sqrt(2).
        let noise = Normal::new(0.0, FRAC_1_SQRT_2 / signal_to_noise_ratio)
            .map_err(|err| Error::configuration(format!("noise distribution: {err}")))?;
        self.noise = Some(noise);
        Ok(self)
    }

    pub fn delays(&self) -> &[f64] {
        &self.delays
    }

    /// Record a unit-amplitude sine of `frequency` Hz lasting `duration` seconds.
    pub fn record_tone(&self, frequency: f64, duration: f64) -> Vec<Signal> {
        self.record_tone_with_rng(frequency, duration, &mut rand::thread_rng())
    }

    pub fn record_tone_with_rng<R: Rng>(
        &self,
        frequency: f64,
        duration: f64,
        rng: &mut R,
    ) -> Vec<Signal> {
        let sample_rate = f64::from(self.sample_rate);
        let len = (duration * sample_rate).round().max(0.0) as usize;

        self.delays
            .iter()
            .map(|delay| {
                let samples = (0..len)
                    .map(|k| {
                        let t = k as f64 / sample_rate - delay;
                        let clean = (TAU * frequency * t).sin();
                        match &self.noise {
                            Some(noise) => clean + rng.sample(noise),
                            None => clean,
                        }
                    })
                    .collect::<Vec<Sample>>();

                Signal {
                    samples,
                    sample_rate: self.sample_rate,
                }
            })
            .collect()
    }
}
