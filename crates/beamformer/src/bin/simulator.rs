use std::{fs, path::PathBuf};

use beamformer::{
    config::Config,
    geometry::parse_position,
    io::{write_signal, OutputEncoding},
    simulator::Simulator,
};
use clap::Parser;
use eyre::{Result, WrapErr};
use glam::DVec3;

/// Frequency of the simulated tone.
const TONE_FREQUENCY: f64 = 1_000.0;
/// Length of the simulated recordings in seconds.
const DURATION: f64 = 1.0;

/// Write the recordings each microphone of an array would capture from a tone played at a
/// source, one WAV file per microphone. Handy as input for `beamform`.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory to write Mic1.wav, Mic2.wav, ... into.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
    /// Microphone position as x,y,z in meters. Repeat once per microphone.
    /// Defaults to the built-in 4 microphone array.
    #[arg(
        short,
        long = "mic",
        value_name = "X,Y,Z",
        value_parser = parse_position,
        allow_hyphen_values = true
    )]
    microphones: Vec<DVec3>,
    /// Source position as x,y,z in meters.
    #[arg(
        short,
        long,
        value_name = "X,Y,Z",
        value_parser = parse_position,
        allow_hyphen_values = true
    )]
    source: Option<DVec3>,
    #[arg(long, default_value_t = 343.0)]
    speed_of_sound: f64,
    #[arg(short = 'r', long, default_value_t = 48_000)]
    sample_rate: u32,
    #[arg(short, long, default_value_t = TONE_FREQUENCY)]
    frequency: f64,
    #[arg(short, long, default_value_t = DURATION)]
    duration: f64,
    /// Signal to noise ratio (RMS, linear). Noise-free when omitted.
    #[arg(short = 'n', long)]
    signal_to_noise_ratio: Option<f64>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Args::parse();
    let defaults = Config::default();
    let microphones = if args.microphones.is_empty() {
        defaults.microphones
    } else {
        args.microphones
    };

    let mut simulator = Simulator::new(
        &microphones,
        args.source.unwrap_or(defaults.source),
        args.speed_of_sound,
        args.sample_rate,
    )?;
    if let Some(snr) = args.signal_to_noise_ratio {
        simulator = simulator.with_noise(snr)?;
    }

    fs::create_dir_all(&args.out_dir)
        .wrap_err_with(|| format!("creating {}", args.out_dir.display()))?;

    let recordings = simulator.record_tone(args.frequency, args.duration);
    for (index, (recording, delay)) in recordings.iter().zip(simulator.delays()).enumerate() {
        let path = args.out_dir.join(format!("Mic{}.wav", index + 1));
        write_signal(&path, recording, OutputEncoding::Float32)?;
        println!("{} (delay {:.2} µs)", path.display(), delay * 1e6);
    }

    Ok(())
}
