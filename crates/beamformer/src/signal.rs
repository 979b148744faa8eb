use serde::Deserialize;

use crate::{
    error::{Error, Result},
    Sample,
};

/// A single-channel recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub samples: Vec<Sample>,
    pub sample_rate: u32,
}

/// How a multi-channel recording is reduced to a single channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChannelPolicy {
    /// Keep the first channel and drop the rest.
    #[default]
    First,
    /// Average all channels.
    Average,
}

impl ChannelPolicy {
    /// Reduce interleaved frames of `channels` samples each to one sample per frame.
    pub fn reduce(self, interleaved: &[Sample], channels: usize) -> Vec<Sample> {
        if channels <= 1 {
            return interleaved.to_vec();
        }

        let frames = interleaved.chunks_exact(channels);
        match self {
            ChannelPolicy::First => frames.map(|frame| frame[0]).collect(),
            ChannelPolicy::Average => frames
                .map(|frame| frame.iter().sum::<Sample>() / channels as Sample)
                .collect(),
        }
    }
}

/// Scale `signal` in place so its peak magnitude is exactly 1.0.
pub fn normalize(signal: &mut [Sample]) -> Result<()> {
    let peak = signal
        .iter()
        .fold(0.0 as Sample, |peak, sample| peak.max(sample.abs()));

    if peak == 0.0 || !peak.is_finite() {
        return Err(Error::DegenerateSignal);
    }

    signal.iter_mut().for_each(|sample| *sample /= peak);
    Ok(())
}
