use std::path::PathBuf;

use beamformer::{
    align::AlignMethod, config::Config, geometry::parse_position, io::OutputEncoding, pipeline,
    signal::ChannelPolicy,
};
use clap::Parser;
use color_eyre::eyre::Result;
use eyre::WrapErr;
use glam::DVec3;

/// Delay-and-sum beamform synchronized microphone array recordings into one mono WAV file.
///
/// Settings come from the built-in 4 microphone array, then the `--config` file, then flags.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
struct Args {
    /// TOML file with any of the settings below.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// One WAV recording per microphone, in microphone order.
    #[arg(value_name = "INPUT")]
    inputs: Vec<PathBuf>,
    /// Same as a positional input. May be repeated.
    #[arg(short, long = "input", value_name = "INPUT")]
    input_flags: Vec<PathBuf>,
    /// Output WAV file. Defaults to beamformed_output.wav next to the first input.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Microphone position as x,y,z in meters. Repeat once per microphone.
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
    /// Propagation speed in m/s.
    #[arg(long, value_name = "M/S")]
    speed_of_sound: Option<f64>,
    #[arg(long, value_enum)]
    align_method: Option<AlignMethod>,
    #[arg(long, value_enum)]
    channel_policy: Option<ChannelPolicy>,
    #[arg(long, value_enum)]
    output_encoding: Option<OutputEncoding>,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let inputs: Vec<_> = self.inputs.into_iter().chain(self.input_flags).collect();
        if !inputs.is_empty() {
            config.inputs = inputs;
        }
        if !self.microphones.is_empty() {
            config.microphones = self.microphones;
        }
        if let Some(output) = self.output {
            config.output = Some(output);
        }
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(speed_of_sound) = self.speed_of_sound {
            config.speed_of_sound = speed_of_sound;
        }
        if let Some(align_method) = self.align_method {
            config.align_method = align_method;
        }
        if let Some(channel_policy) = self.channel_policy {
            config.channel_policy = channel_policy;
        }
        if let Some(output_encoding) = self.output_encoding {
            config.output_encoding = output_encoding;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let config = Args::parse()
        .into_config()
        .wrap_err("loading configuration")?;
    let output = pipeline::run(&config).wrap_err("beamforming failed")?;

    println!("Beamformed audio saved to:\n{}", output.display());

    Ok(())
}
