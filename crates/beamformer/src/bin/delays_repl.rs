use std::io::{self, Write};

use beamformer::{
    config::Config,
    geometry::{compute_delays, parse_position},
};

use clap::Parser;
use eyre::Result;

/// Type a source position as x,y,z and get the delay of every microphone of the array.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 343.0)]
    speed_of_sound: f64,
    #[arg(short = 'r', long, default_value_t = 48_000.0)]
    sample_rate: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let microphones = Config::default().microphones;

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("< ");
        io::stdout().flush()?;
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            return Ok(());
        }

        let source = match parse_position(line.trim()) {
            Ok(source) => source,
            Err(err) => {
                println!("! {err}\n");
                continue;
            }
        };

        for (index, delay) in compute_delays(&microphones, source, args.speed_of_sound)?
            .iter()
            .enumerate()
        {
            println!(
                "> mic {}: {:>9.2} µs {:>8.3} samples",
                index + 1,
                delay * 1e6,
                delay * args.sample_rate
            );
        }
        println!();
    }
}
