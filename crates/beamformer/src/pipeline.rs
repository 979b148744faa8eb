use std::path::PathBuf;

use log::{debug, info};

use crate::{
    align::Aligner,
    config::Config,
    error::{Error, Result},
    geometry::compute_delays,
    io::{read_signal, write_signal},
    signal::{normalize, Signal},
};

/// Load every input, beamform them and write the normalized result.
///
/// Returns the path that was written. Nothing is written unless every earlier step succeeded.
pub fn run(config: &Config) -> Result<PathBuf> {
    config.validate()?;

    let signals = config
        .inputs
        .iter()
        .map(|path| read_signal(path, config.channel_policy))
        .collect::<Result<Vec<_>>>()?;
    check_sample_rates(config, &signals)?;

    let output = beamform(config, signals)?;

    let output_path = config.output_path();
    write_signal(&output_path, &output, config.output_encoding)?;
    info!(
        "wrote {} samples at {} Hz to {}",
        output.samples.len(),
        output.sample_rate,
        output_path.display()
    );

    Ok(output_path)
}

/// Delay, align, sum and normalize already loaded signals, one per configured microphone.
pub fn beamform(config: &Config, signals: Vec<Signal>) -> Result<Signal> {
    config.validate_geometry()?;
    if signals.len() != config.microphones.len() {
        return Err(Error::configuration(format!(
            "{} microphones but {} signals",
            config.microphones.len(),
            signals.len()
        )));
    }
    let Some(sample_rate) = signals.first().map(|signal| signal.sample_rate) else {
        return Err(Error::configuration("no signals to beamform"));
    };
    if let Some((index, mismatched)) = signals
        .iter()
        .enumerate()
        .find(|(_, signal)| signal.sample_rate != sample_rate)
    {
        return Err(Error::InputMismatch {
            input: format!("signal {index}"),
            expected: sample_rate,
            found: mismatched.sample_rate,
        });
    }

    let delays = compute_delays(&config.microphones, config.source, config.speed_of_sound)?;
    for (index, delay) in delays.iter().enumerate() {
        debug!(
            "mic {index}: delay {:.2} µs ({:.3} samples)",
            delay * 1e6,
            delay * f64::from(sample_rate)
        );
    }

    let channels: Vec<_> = signals.into_iter().map(|signal| signal.samples).collect();
    let mut aligner = Aligner::new(config.align_method);
    info!(
        "beamforming {} channels at {sample_rate} Hz using {:?} alignment",
        channels.len(),
        aligner.method()
    );
    let mut samples = aligner.align_and_sum(&channels, &delays, f64::from(sample_rate))?;
    normalize(&mut samples)?;

    Ok(Signal {
        samples,
        sample_rate,
    })
}

fn check_sample_rates(config: &Config, signals: &[Signal]) -> Result<()> {
    let Some(expected) = signals.first().map(|signal| signal.sample_rate) else {
        return Ok(());
    };

    match config
        .inputs
        .iter()
        .zip(signals)
        .find(|(_, signal)| signal.sample_rate != expected)
    {
        Some((path, signal)) => Err(Error::InputMismatch {
            input: path.display().to_string(),
            expected,
            found: signal.sample_rate,
        }),
        None => Ok(()),
    }
}
