use std::{
    f64::consts::TAU,
    fs,
    path::{Path, PathBuf},
};

use beamformer::{
    align::{AlignMethod, Aligner},
    config::{Config, DEFAULT_OUTPUT_FILE_NAME},
    io::{read_signal, write_signal, OutputEncoding},
    pipeline::{beamform, run},
    signal::{ChannelPolicy, Signal},
    simulator::Simulator,
    Error,
};
use glam::DVec3;

const SAMPLE_RATE: u32 = 48_000;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "beamformer-pipeline-{}-{name}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn sine(frequency: f64, sample_rate: u32, len: usize) -> Vec<f64> {
    (0..len)
        .map(|k| (TAU * frequency * k as f64 / f64::from(sample_rate)).sin())
        .collect()
}

/// Write one WAV per signal into `dir` and return their paths.
fn write_inputs(dir: &Path, signals: &[Signal]) -> Vec<PathBuf> {
    signals
        .iter()
        .enumerate()
        .map(|(index, signal)| {
            let path = dir.join(format!("Tr{}.wav", index + 1));
            write_signal(&path, signal, OutputEncoding::Float32).unwrap();
            path
        })
        .collect()
}

fn peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0, |peak, s| peak.max(s.abs()))
}

fn identical_tones() -> Vec<Signal> {
    let tone = Signal {
        samples: sine(1_000.0, SAMPLE_RATE, 48_000),
        sample_rate: SAMPLE_RATE,
    };
    vec![tone; 4]
}

#[test]
fn four_identical_tones_end_to_end() {
    let dir = scratch_dir("tones");
    let config = Config {
        inputs: write_inputs(&dir, &identical_tones()),
        output_encoding: OutputEncoding::Float32,
        ..Config::default()
    };

    let output_path = run(&config).unwrap();
    assert_eq!(output_path, dir.join(DEFAULT_OUTPUT_FILE_NAME));

    let output = read_signal(&output_path, ChannelPolicy::First).unwrap();
    // The back pair is ~8.37 samples farther from the source than the front pair.
    let pad = 9;
    assert_eq!(output.sample_rate, SAMPLE_RATE);
    assert_eq!(output.samples.len(), 48_000 + 2 * pad);
    assert_eq!(peak(&output.samples), 1.0);

    // All four channels start in phase, so the normalized sum is the tone itself.
    let tone = sine(1_000.0, SAMPLE_RATE, 200);
    for (k, (o, t)) in output.samples.iter().zip(&tone).enumerate() {
        assert!((o - t).abs() < 1e-2, "sample {k}: {o} vs {t}");
    }
}

#[test]
fn default_encoding_is_pcm16() {
    let dir = scratch_dir("pcm16");
    let output = dir.join("out").with_extension("wav");
    let config = Config {
        inputs: write_inputs(&dir, &identical_tones()),
        output: Some(output.clone()),
        ..Config::default()
    };

    assert_eq!(run(&config).unwrap(), output);

    let spec = hound::WavReader::open(&output).unwrap().spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
}

#[test]
fn in_memory_peak_is_exactly_one() {
    let output = beamform(&Config::default(), identical_tones()).unwrap();

    assert_eq!(peak(&output.samples), 1.0);
    assert_eq!(output.samples.len(), 48_018);
}

#[test]
fn sinc_alignment_of_simulated_array() {
    let config = Config {
        align_method: AlignMethod::Sinc,
        ..Config::default()
    };
    let simulator = Simulator::new(
        &config.microphones,
        config.source,
        config.speed_of_sound,
        SAMPLE_RATE,
    )
    .unwrap();

    let recordings = simulator.record_tone(1_000.0, 0.1);
    let channels: Vec<Vec<f64>> = recordings.iter().map(|r| r.samples.clone()).collect();
    let sum = Aligner::new(AlignMethod::Sinc)
        .align_and_sum(&channels, simulator.delays(), f64::from(SAMPLE_RATE))
        .unwrap();

    let output = beamform(&config, recordings).unwrap();

    let pad = (output.samples.len() - 4_800) / 2;
    assert_eq!(pad, 9);
    assert_eq!(output.samples.len(), sum.len());
    assert_eq!(peak(&output.samples), 1.0);

    // Ringing at the edges can exceed the coherent sum, so the interior is scaled by
    // `4 / peak` rather than exactly one quarter.
    let gain = 4.0 / peak(&sum);
    let tone = sine(1_000.0, SAMPLE_RATE, 4_800);
    for k in 64..(4_800 - 64) {
        let raw = sum[k + pad];
        assert!((raw - 4.0 * tone[k]).abs() < 4e-2, "sample {k}: {raw}");

        let normalized = output.samples[k + pad];
        assert!((normalized - gain * tone[k]).abs() < 1e-2, "sample {k}: {normalized}");
    }
}

#[test]
fn non_finite_geometry_is_rejected() {
    let mut config = Config::default();
    config.microphones[1] = DVec3::new(f64::NAN, 0.0, 0.0);

    let err = beamform(&config, identical_tones()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)), "{err}");

    let config = Config {
        source: DVec3::new(0.0, f64::INFINITY, 0.0),
        ..Config::default()
    };
    assert!(matches!(beamform(&config, identical_tones()), Err(Error::Configuration(_))));
}

#[test]
fn sample_rate_mismatch_aborts_without_output() {
    let dir = scratch_dir("mismatch");
    let mut signals = identical_tones();
    signals[2].sample_rate = 44_100;
    let config = Config {
        inputs: write_inputs(&dir, &signals),
        ..Config::default()
    };

    let err = run(&config).unwrap_err();

    assert!(
        matches!(
            &err,
            Error::InputMismatch { input, expected: 48_000, found: 44_100 }
                if input.ends_with("Tr3.wav")
        ),
        "{err}"
    );
    assert!(!config.output_path().exists());
}

#[test]
fn missing_input_aborts_without_output() {
    let dir = scratch_dir("missing");
    let mut inputs = write_inputs(&dir, &identical_tones());
    inputs[1] = dir.join("absent.wav");
    let config = Config {
        inputs,
        ..Config::default()
    };

    let err = run(&config).unwrap_err();

    assert!(matches!(&err, Error::Io { path, .. } if path.ends_with("absent.wav")));
    assert!(!config.output_path().exists());
}

#[test]
fn silent_inputs_are_degenerate() {
    let dir = scratch_dir("silent");
    let silence = Signal {
        samples: vec![0.0; 1_000],
        sample_rate: SAMPLE_RATE,
    };
    let config = Config {
        inputs: write_inputs(&dir, &vec![silence; 4]),
        ..Config::default()
    };

    assert!(matches!(run(&config), Err(Error::DegenerateSignal)));
    assert!(!config.output_path().exists());
}

#[test]
fn input_count_must_match_array() {
    let dir = scratch_dir("count");
    let config = Config {
        inputs: write_inputs(&dir, &identical_tones()[..3]),
        ..Config::default()
    };

    assert!(matches!(run(&config), Err(Error::Configuration(_))));
    assert!(matches!(
        beamform(&Config::default(), identical_tones()[..2].to_vec()),
        Err(Error::Configuration(_))
    ));
}
