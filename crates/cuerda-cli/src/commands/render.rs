//! Offline pluck rendering command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use cuerda_core::PluckedString;

use crate::wav::{WavSpec, write_wav};

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Pitch in Hz
    #[arg(long, default_value = "440.0")]
    freq: f32,

    /// Duration in seconds
    #[arg(long, default_value = "2.0")]
    duration: f32,

    /// Sample rate, shared with whatever plays the file back
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Output gain applied to the raw string signal
    #[arg(long, default_value = "1.0")]
    amplitude: f32,

    /// Noise seed for a reproducible take
    #[arg(long)]
    seed: Option<u32>,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let sample_rate = args.sample_rate as f32;

    let mut string = PluckedString::from_frequency(sample_rate, args.freq).with_context(|| {
        format!(
            "cannot tune a string to {} Hz at a {} Hz sample rate",
            args.freq, args.sample_rate
        )
    })?;

    if let Some(seed) = args.seed {
        string.set_noise_seed(seed);
    }

    tracing::info!(
        freq = args.freq,
        duration = args.duration,
        sample_rate = args.sample_rate,
        buffer_len = string.len(),
        "rendering pluck"
    );

    println!("Rendering pluck...");
    println!("  {} Hz for {:.2}s", args.freq, args.duration);

    string.pluck();

    let num_samples = (args.duration * sample_rate) as usize;
    let mut samples = Vec::with_capacity(num_samples);
    for _ in 0..num_samples {
        samples.push(string.sample() * args.amplitude);
        string.advance();
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: args.sample_rate,
        bits_per_sample: 32,
    };

    write_wav(&args.output, &samples, spec)?;

    tracing::info!(samples = samples.len(), "render complete");
    println!("Wrote {} samples to {}", samples.len(), args.output.display());

    Ok(())
}
