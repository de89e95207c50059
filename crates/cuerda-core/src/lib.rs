//! Cuerda Core - Karplus-Strong plucked string synthesis
//!
//! This crate models the acoustic decay of a plucked string: a fixed-size
//! circular buffer of samples is excited with a burst of noise, then
//! repeatedly averaged and decayed to produce a self-sustaining, naturally
//! decaying waveform at a target pitch.
//!
//! # Core Types
//!
//! - [`PluckedString`] - The string model: sizing from frequency, excitation,
//!   one-step waveform advance, and current-sample readout
//! - [`RingBuffer`] - Fixed-capacity circular sample queue backing the string
//! - [`NoiseSource`] / [`Xorshift32`] - Injectable excitation randomness
//! - [`DECAY_FACTOR`] - The per-step energy decay constant (0.996)
//!
//! # Example
//!
//! ```rust
//! use cuerda_core::PluckedString;
//!
//! // One buffer slot per sample of the waveform period at 44.1 kHz.
//! let mut string = PluckedString::from_frequency(44100.0, 440.0)?;
//! string.pluck();
//!
//! // The driver owns the clock: read one sample, then step the model,
//! // once per sampling interval.
//! for _ in 0..44100 {
//!     let amplitude = string.sample();
//!     assert!(amplitude.is_finite());
//!     string.advance();
//! }
//! # Ok::<(), cuerda_core::Error>(())
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! cuerda-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: advance and sample are O(1) and allocation-free;
//!   the buffer is allocated once at construction and never resized
//! - **No dependencies on std**: pure `no_std` with `libm` for math
//! - **Single-owner concurrency**: every mutating operation takes `&mut
//!   self`, so one instance is driven by one thread; independent instances
//!   share nothing and may run in parallel

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod noise;
pub mod ring;
pub mod string;

// Re-export main types at crate root
pub use noise::{NoiseSource, Xorshift32};
pub use ring::RingBuffer;
pub use string::{DECAY_FACTOR, PluckedString};

/// Error type for string model construction.
///
/// Construction either succeeds with a fully valid instance or fails
/// immediately; no operation on a constructed string can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A constructor argument was outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Convenience result type for string model construction.
pub type Result<T> = core::result::Result<T, Error>;
