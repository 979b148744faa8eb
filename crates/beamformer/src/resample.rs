use rustfft::{num_complex::Complex, FftPlanner};

use crate::Sample;

/// Band-limited resampling in the Fourier domain.
///
/// The signal is treated as one period of a periodic signal: its spectrum is truncated (when
/// shrinking) or zero-padded (when growing) and transformed back at the new length. The
/// Nyquist bin of an even-length spectrum is split or folded so the result stays real.
pub struct Resampler {
    planner: FftPlanner<Sample>,
}

impl Resampler {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    pub fn resample(&mut self, signal: &[Sample], new_len: usize) -> Vec<Sample> {
        let len = signal.len();
        if len == 0 || new_len == 0 {
            return vec![0.0; new_len];
        }
        if len == new_len {
            return signal.to_vec();
        }

        let mut spectrum: Vec<Complex<Sample>> =
            signal.iter().map(|&s| Complex::new(s, 0.0)).collect();
        self.planner.plan_fft_forward(len).process(&mut spectrum);

        let mut resized = vec![Complex::new(0.0, 0.0); new_len];
        let shared = len.min(new_len);

        // DC and positive frequencies, including the Nyquist bin when `shared` is even.
        let positive = shared / 2 + 1;
        resized[..positive].copy_from_slice(&spectrum[..positive]);

        // Negative frequencies live at the end of the spectrum.
        if shared > 2 {
            let negative = shared - positive;
            resized[new_len - negative..].copy_from_slice(&spectrum[len - negative..]);
        }

        if shared % 2 == 0 {
            let half = shared / 2;
            if new_len < len {
                // Fold the negative Nyquist component onto the positive one.
                resized[half] += spectrum[len - half];
            } else {
                // Split the old Nyquist bin evenly between +/- frequencies.
                resized[half] *= 0.5;
                resized[new_len - half] = resized[half];
            }
        }

        self.planner.plan_fft_inverse(new_len).process(&mut resized);

        // rustfft doesn't normalize. Dividing by `new_len` undoes the inverse transform and
        // multiplying by `new_len / len` preserves amplitude, which nets out to `1 / len`.
        let scale = 1.0 / len as Sample;
        resized.iter().map(|c| c.re * scale).collect()
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new()
    }
}
