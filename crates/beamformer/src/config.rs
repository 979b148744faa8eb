use std::{
    fs,
    path::{Path, PathBuf},
};

use glam::DVec3;
use serde::Deserialize;

use crate::{
    align::AlignMethod,
    error::{Error, Result},
    geometry::SPEED_OF_SOUND_AIR,
    io::OutputEncoding,
    signal::ChannelPolicy,
};

/// File name used when no output path is given, placed next to the first input.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "beamformed_output.wav";

/// Everything a beamforming run needs. Positions are in meters in an array-fixed frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Microphone positions. The first one is the delay reference.
    pub microphones: Vec<DVec3>,
    pub source: DVec3,
    /// Propagation speed in m/s.
    pub speed_of_sound: f64,
    /// One recording per microphone, in the same order.
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub align_method: AlignMethod,
    pub channel_policy: ChannelPolicy,
    pub output_encoding: OutputEncoding,
}

impl Default for Config {
    /// Four microphones on two rows, source 6 cm in front of the array.
    fn default() -> Self {
        Self {
            microphones: vec![
                DVec3::new(-0.05, 0.0, 0.0),
                DVec3::new(0.05, 0.0, 0.0),
                DVec3::new(-0.08, 0.045, -0.04),
                DVec3::new(0.08, 0.045, -0.04),
            ],
            source: DVec3::new(0.0, -0.06, 0.0),
            speed_of_sound: SPEED_OF_SOUND_AIR,
            inputs: Vec::new(),
            output: None,
            align_method: AlignMethod::default(),
            channel_policy: ChannelPolicy::default(),
            output_encoding: OutputEncoding::default(),
        }
    }
}

impl Config {
    /// Parse a TOML config. Missing keys take their default values.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| Error::configuration(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|err| Error::configuration(format!("reading {}: {err}", path.display())))?;

        Self::from_toml(&contents).map_err(|err| match err {
            Error::Configuration(message) => {
                Error::configuration(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_geometry()?;
        if self.inputs.len() != self.microphones.len() {
            return Err(Error::configuration(format!(
                "{} microphones but {} input files",
                self.microphones.len(),
                self.inputs.len()
            )));
        }

        Ok(())
    }

    /// Check the array, source and propagation speed, ignoring input and output paths.
    pub fn validate_geometry(&self) -> Result<()> {
        if self.microphones.is_empty() {
            return Err(Error::configuration("microphone array is empty"));
        }
        if self
            .microphones
            .iter()
            .chain([&self.source])
            .any(|position| !position.is_finite())
        {
            return Err(Error::configuration("positions must be finite"));
        }
        if !(self.speed_of_sound.is_finite() && self.speed_of_sound > 0.0) {
            return Err(Error::configuration(format!(
                "speed of sound must be positive, got {} m/s",
                self.speed_of_sound
            )));
        }

        Ok(())
    }

    /// The configured output, or [`DEFAULT_OUTPUT_FILE_NAME`] next to the first input.
    pub fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }

        let directory = self
            .inputs
            .first()
            .and_then(|input| input.parent())
            .unwrap_or(Path::new(""));
        directory.join(DEFAULT_OUTPUT_FILE_NAME)
    }
}
