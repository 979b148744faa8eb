use beamformer::{
    align::{AlignMethod, Aligner},
    config::Config,
    geometry::compute_delays,
    resample::Resampler,
    simulator::Simulator,
    Sample,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SAMPLE_RATE: u32 = 48_000;
/// Length of the simulated recordings in seconds.
const DURATION: f64 = 1.0;

pub fn resample_one_second(c: &mut Criterion) {
    let recordings = setup_recordings();
    let mut resampler = Resampler::new();

    c.bench_function("resample one second by 8 samples", |b| {
        b.iter(|| resampler.resample(black_box(&recordings[0]), SAMPLE_RATE as usize + 8))
    });
}

pub fn align_and_sum(c: &mut Criterion) {
    let config = Config::default();
    let delays = compute_delays(&config.microphones, config.source, config.speed_of_sound)
        .expect("default geometry is valid");
    let recordings = setup_recordings();

    for method in [AlignMethod::Resample, AlignMethod::Sinc] {
        let mut aligner = Aligner::new(method);
        c.bench_function(&format!("align and sum 4 channels ({method:?})"), |b| {
            b.iter(|| {
                aligner
                    .align_and_sum(black_box(&recordings), &delays, f64::from(SAMPLE_RATE))
                    .expect("inputs are consistent")
            })
        });
    }
}

/// Simulate what the default array records from a tone at the default source.
fn setup_recordings() -> Vec<Vec<Sample>> {
    let config = Config::default();
    Simulator::new(
        &config.microphones,
        config.source,
        config.speed_of_sound,
        SAMPLE_RATE,
    )
    .expect("default geometry is valid")
    .record_tone(1_000.0, DURATION)
    .into_iter()
    .map(|signal| signal.samples)
    .collect()
}

criterion_group!(benches, resample_one_second, align_and_sum);
criterion_main!(benches);
