use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, warn};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    signal::{ChannelPolicy, Signal},
    Sample,
};

/// Sample encoding of the written WAV file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    /// 16-bit signed integer PCM.
    #[default]
    Pcm16,
    /// 32-bit IEEE float.
    Float32,
}

/// Read a WAV file and reduce it to a single channel.
///
/// Integer PCM of any width is scaled to `[-1.0, 1.0)`.
pub fn read_signal(path: &Path, policy: ChannelPolicy) -> Result<Signal> {
    let reader = WavReader::open(path).map_err(|err| Error::io(path, err))?;
    let spec = reader.spec();

    let interleaved: Vec<Sample> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|sample| sample.map(Sample::from))
            .collect::<std::result::Result<_, _>>(),
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as Sample;
            reader
                .into_samples::<i32>()
                .map(|sample| sample.map(|sample| sample as Sample * scale))
                .collect::<std::result::Result<_, _>>()
        }
    }
    .map_err(|err| Error::io(path, err))?;

    debug!(
        "read {}: {} Hz, {} channel(s), {}-bit {:?}, {} frames",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format,
        interleaved.len() / usize::from(spec.channels.max(1)),
    );

    Ok(Signal {
        samples: policy.reduce(&interleaved, usize::from(spec.channels)),
        sample_rate: spec.sample_rate,
    })
}

/// Write a mono WAV file, replacing `path` only once the file is complete.
pub fn write_signal(path: &Path, signal: &Signal, encoding: OutputEncoding) -> Result<()> {
    let partial = partial_path(path);

    let result = write_wav(&partial, signal, encoding)
        .and_then(|()| fs::rename(&partial, path).map_err(hound::Error::from))
        .map_err(|err| Error::io(path, err));

    if result.is_err() && partial.exists() {
        if let Err(err) = fs::remove_file(&partial) {
            warn!("couldn't remove {}: {err}", partial.display());
        }
    }

    result
}

fn write_wav(path: &Path, signal: &Signal, encoding: OutputEncoding) -> hound::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: signal.sample_rate,
        bits_per_sample: match encoding {
            OutputEncoding::Pcm16 => 16,
            OutputEncoding::Float32 => 32,
        },
        sample_format: match encoding {
            OutputEncoding::Pcm16 => SampleFormat::Int,
            OutputEncoding::Float32 => SampleFormat::Float,
        },
    };

    let mut writer = WavWriter::create(path, spec)?;
    match encoding {
        OutputEncoding::Pcm16 => {
            let scale = Sample::from(i16::MAX);
            for &sample in &signal.samples {
                let quantized = (sample * scale)
                    .round()
                    .clamp(Sample::from(i16::MIN), scale);
                writer.write_sample(quantized as i16)?;
            }
        }
        OutputEncoding::Float32 => {
            for &sample in &signal.samples {
                writer.write_sample(sample as f32)?;
            }
        }
    }

    writer.finalize()
}

fn partial_path(path: &Path) -> PathBuf {
    let mut partial = OsString::from(path.as_os_str());
    partial.push(".partial");
    PathBuf::from(partial)
}
