//! Decay demo: pluck a string and watch the envelope die away.
//!
//! Run with: cargo run -p cuerda-core --example decay_demo

use cuerda_core::PluckedString;

fn main() {
    let sample_rate = 44100.0;

    let mut string = PluckedString::from_frequency(sample_rate, 440.0).expect("playable pitch");
    string.pluck();

    println!("=== 440 Hz pluck, peak amplitude per 100 ms window ===\n");

    let window = (sample_rate / 10.0) as usize;
    for tenth in 0..20 {
        let mut peak = 0.0f32;
        for _ in 0..window {
            peak = peak.max(string.sample().abs());
            string.advance();
        }

        let bar = "#".repeat(((peak * 120.0) as usize).min(60));
        println!("{:>5} ms  {:>7.4}  {}", tenth * 100, peak, bar);
    }
}
