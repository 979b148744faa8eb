use std::f64::consts::PI;

use log::debug;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    resample::Resampler,
    Sample,
};

/// Half the length (in samples) of the windowed-sinc kernel used by [`AlignMethod::Sinc`].
const SINC_HALF_WIDTH: isize = 32;

/// How each channel is shifted by its fractional delay before summation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AlignMethod {
    /// Resample every channel to `len + delay_samples` samples in the Fourier domain.
    ///
    /// This stretches the channel rather than shifting it, so it only approximates a delay
    /// and is accurate only while delays are a tiny fraction of the signal length.
    #[default]
    Resample,
    /// Shift every channel by its exact fractional delay using windowed-sinc interpolation.
    Sinc,
}

/// Time-aligns per-microphone signals and sums them into one channel.
pub struct Aligner {
    method: AlignMethod,
    resampler: Resampler,
}

impl Aligner {
    pub fn new(method: AlignMethod) -> Self {
        Self {
            method,
            resampler: Resampler::new(),
        }
    }

    pub fn method(&self) -> AlignMethod {
        self.method
    }

    /// Align every signal by its delay (in seconds) and sum them.
    ///
    /// The result is `signals[0].len() + 2 * pad` samples long, where `pad` is the largest
    /// absolute delay in whole samples (rounded up).
    pub fn align_and_sum(
        &mut self,
        signals: &[Vec<Sample>],
        delays: &[f64],
        sample_rate: f64,
    ) -> Result<Vec<Sample>> {
        if signals.is_empty() {
            return Err(Error::configuration("no signals to align"));
        }
        if signals.len() != delays.len() {
            return Err(Error::configuration(format!(
                "got {} signals but {} delays",
                signals.len(),
                delays.len()
            )));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::configuration(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }
        if let Some((channel, delay)) = delays
            .iter()
            .enumerate()
            .find(|(_, delay)| !delay.is_finite())
        {
            return Err(Error::configuration(format!(
                "delay of channel {channel} must be finite, got {delay}"
            )));
        }

        let delays_samples: Vec<f64> = delays.iter().map(|delay| delay * sample_rate).collect();
        let max_abs_delay = delays_samples
            .iter()
            .fold(0.0f64, |max, delay| max.max(delay.abs()));
        let pad = max_abs_delay.ceil() as usize;
        let target_len = signals[0].len() + 2 * pad;

        debug!(
            "aligning {} channels ({:?}), pad {pad} samples, output {target_len} samples",
            signals.len(),
            self.method
        );

        let mut sum = vec![0.0; target_len];
        for (channel, (signal, &delay_samples)) in signals.iter().zip(&delays_samples).enumerate() {
            let aligned = match self.method {
                AlignMethod::Resample => self.resample_channel(signal, delay_samples, target_len),
                AlignMethod::Sinc => sinc_shift(signal, delay_samples, pad, target_len),
            };
            debug!("channel {channel}: delay {delay_samples:.3} samples");

            sum.iter_mut()
                .zip(aligned)
                .for_each(|(acc, sample)| *acc += sample);
        }

        Ok(sum)
    }

    fn resample_channel(
        &mut self,
        signal: &[Sample],
        delay_samples: f64,
        target_len: usize,
    ) -> Vec<Sample> {
        let new_len = (signal.len() as f64 + delay_samples).round_ties_even();
        // A delay larger than the whole channel leaves nothing of it.
        let new_len = if new_len > 0.0 { new_len as usize } else { 0 };

        let mut resampled = self.resampler.resample(signal, new_len);
        resampled.resize(target_len, 0.0);
        resampled
    }
}

/// [`Aligner::align_and_sum`] using the default [`AlignMethod::Resample`].
pub fn align_and_sum(
    signals: &[Vec<Sample>],
    delays: &[f64],
    sample_rate: f64,
) -> Result<Vec<Sample>> {
    Aligner::new(AlignMethod::Resample).align_and_sum(signals, delays, sample_rate)
}

/// Output sample `j` corresponds to reference time `j - pad`, read from the channel
/// `delay_samples` later.
fn sinc_shift(signal: &[Sample], delay_samples: f64, pad: usize, target_len: usize) -> Vec<Sample> {
    (0..target_len)
        .map(|j| interpolate(signal, j as f64 - pad as f64 + delay_samples))
        .collect()
}

/// Value of `signal` at fractional index `position`. Samples outside the signal read as zero.
fn interpolate(signal: &[Sample], position: f64) -> Sample {
    let base = position.floor() as isize;
    let fraction = position - base as f64;
    let len = signal.len() as isize;

    if fraction == 0.0 {
        return if (0..len).contains(&base) {
            signal[base as usize]
        } else {
            0.0
        };
    }

    let first = (base - SINC_HALF_WIDTH + 1).max(0);
    let last = (base + SINC_HALF_WIDTH).min(len - 1);

    (first..=last)
        .map(|k| signal[k as usize] * windowed_sinc(position - k as f64))
        .sum()
}

/// Sinc tapered with a Hann window spanning `SINC_HALF_WIDTH` samples on either side.
fn windowed_sinc(offset: f64) -> f64 {
    let half_width = SINC_HALF_WIDTH as f64;
    if offset.abs() >= half_width {
        return 0.0;
    }

    let x = PI * offset;
    let sinc = if x == 0.0 { 1.0 } else { x.sin() / x };
    let window = 0.5 * (1.0 + (PI * offset / half_width).cos());

    sinc * window
}
