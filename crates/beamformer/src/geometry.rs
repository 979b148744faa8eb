use glam::DVec3;

use crate::error::{Error, Result};

/// Speed of sound in dry air at roughly 20 °C, in m/s.
pub const SPEED_OF_SOUND_AIR: f64 = 343.0;

/// Relative arrival time (in seconds) of a wavefront from `source` at every microphone.
///
/// The first microphone is the reference, so its delay is always exactly zero. Microphones
/// farther from the source than the reference get positive delays, closer ones negative.
pub fn compute_delays(positions: &[DVec3], source: DVec3, speed: f64) -> Result<Vec<f64>> {
    if !(speed.is_finite() && speed > 0.0) {
        return Err(Error::configuration(format!(
            "propagation speed must be positive, got {speed} m/s"
        )));
    }

    let Some(&reference) = positions.first() else {
        return Err(Error::configuration("microphone array is empty"));
    };
    let reference_distance = reference.distance(source);

    Ok(positions
        .iter()
        .map(|position| (position.distance(source) - reference_distance) / speed)
        .collect())
}

/// Parse a position written as `x,y,z` (meters), as accepted on the command line.
pub fn parse_position(text: &str) -> std::result::Result<DVec3, String> {
    let coordinates = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid coordinate in '{text}': {err}"))?;

    match coordinates[..] {
        [x, y, z] => Ok(DVec3::new(x, y, z)),
        _ => Err(format!(
            "expected 3 comma separated coordinates, got {} in '{text}'",
            coordinates.len()
        )),
    }
}
