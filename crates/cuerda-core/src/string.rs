//! The plucked string model.
//!
//! Karplus-Strong synthesis in its classic form: a circulating buffer one
//! waveform period long is filled with noise, then each step replaces the
//! oldest sample with the decayed average of the two oldest. The averaging
//! acts as a lowpass that rounds the noise into a pitched tone; the decay
//! factor drains its energy the way a real string loses its ring.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use libm::roundf;

use crate::noise::{NoiseSource, Xorshift32};
use crate::ring::RingBuffer;
use crate::{Error, Result};

/// Energy decay factor applied on every [`advance`](PluckedString::advance).
///
/// Values below 1.0 drain energy from the circulating waveform each step,
/// modeling the damping of a physical string.
pub const DECAY_FACTOR: f32 = 0.996;

/// Karplus-Strong plucked string voice.
///
/// Owns a fixed-length circular sample buffer sized to one period of the
/// target pitch. The owning driver calls [`pluck`](Self::pluck) to excite
/// the string, then [`sample`](Self::sample) and [`advance`](Self::advance)
/// once per output sample at the sampling rate the string was built with.
///
/// The model has no awareness of wall-clock time and never terminates on its
/// own; it decays toward silence but stays usable indefinitely.
///
/// # Example
///
/// ```rust
/// use cuerda_core::PluckedString;
///
/// let mut string = PluckedString::from_frequency(44100.0, 440.0)?;
/// string.pluck();
///
/// let first = string.sample();
/// string.advance();
/// let second = string.sample();
/// assert!(first.is_finite() && second.is_finite());
/// # Ok::<(), cuerda_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PluckedString {
    /// Circulating waveform; length is fixed at construction.
    ring: RingBuffer,
    /// Generator behind the convenience [`pluck`](Self::pluck).
    noise: Xorshift32,
}

impl PluckedString {
    /// Creates a string at rest tuned to `frequency` hertz.
    ///
    /// The buffer length is `sample_rate / frequency` rounded to the nearest
    /// integer, ties away from zero (`libm::roundf` semantics). All samples
    /// start at zero, so the string is silent until plucked.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `frequency` is not positive, or if the
    /// rounded length comes out below 2 samples (frequency too high for the
    /// sampling rate, or a degenerate rate). Both bounds are checked;
    /// non-finite inputs fall out at the length bound.
    pub fn from_frequency(sample_rate: f32, frequency: f32) -> Result<Self> {
        if frequency <= 0.0 {
            return Err(Error::InvalidParameter("frequency must be positive"));
        }

        let len = roundf(sample_rate / frequency) as usize;
        if len < 2 {
            return Err(Error::InvalidParameter(
                "buffer needs at least 2 samples per period",
            ));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(len, frequency, sample_rate, "string sized");

        Ok(Self {
            ring: RingBuffer::zeroed(len),
            noise: Xorshift32::default(),
        })
    }

    /// Creates a string whose buffer starts as `samples`, first element at
    /// the front.
    ///
    /// Intended for tests and debugging: the contents are taken as-is and no
    /// frequency is associated with the string beyond its implied period.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `samples` has fewer than 2 elements.
    pub fn from_samples(samples: Vec<f32>) -> Result<Self> {
        if samples.len() < 2 {
            return Err(Error::InvalidParameter(
                "buffer needs at least 2 samples per period",
            ));
        }

        Ok(Self {
            ring: RingBuffer::from_samples(samples),
            noise: Xorshift32::default(),
        })
    }

    /// Reseeds the generator behind [`pluck`](Self::pluck).
    ///
    /// Two strings given the same seed produce identical excitations, which
    /// makes renders reproducible when the driver wants them to be.
    pub fn set_noise_seed(&mut self, seed: u32) {
        self.noise = Xorshift32::new(seed);
    }

    /// Excites the string with a burst of white noise.
    ///
    /// Every sample in the buffer is replaced with a fresh value uniform in
    /// `[-0.5, 0.5)`; capacity is untouched. Valid in any state: plucking an
    /// already-sounding string simply re-arms it. Successive calls continue
    /// the generator stream, so each pluck is a new excitation.
    pub fn pluck(&mut self) {
        let Self { ring, noise } = self;
        ring.fill_with(|| noise.next_sample());

        #[cfg(feature = "tracing")]
        tracing::debug!(len = self.ring.len(), "string plucked");
    }

    /// Excites the string drawing from `source` instead of the built-in
    /// generator.
    ///
    /// Same contract as [`pluck`](Self::pluck); exactly `len()` samples are
    /// drawn, in buffer order.
    pub fn pluck_with(&mut self, source: &mut impl NoiseSource) {
        self.ring.fill_with(|| source.next_sample());
    }

    /// Advances the waveform by one step.
    ///
    /// Removes the sample at the front, averages it with the sample that
    /// follows, scales by [`DECAY_FACTOR`], and appends the result at the
    /// back. The buffer holds the same number of samples before and after;
    /// the decay factor is applied exactly once.
    #[inline]
    pub fn advance(&mut self) {
        let front = self.ring.front();
        let next = self.ring.peek(1);
        let update = ((front + next) / 2.0) * DECAY_FACTOR;
        self.ring.dequeue_enqueue(update);
    }

    /// Current output sample: the value at the front of the buffer.
    ///
    /// Pure read; repeated calls without an intervening
    /// [`advance`](Self::advance) return the same value.
    #[inline]
    pub fn sample(&self) -> f32 {
        self.ring.front()
    }

    /// Buffer capacity: the number of circulating samples, fixed for the
    /// lifetime of the string.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Always false; the buffer holds at least 2 samples by construction.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Iterates the circulating samples in front-to-back order.
    ///
    /// For tests and diagnostics; the audio path only ever reads the front.
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.ring.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const SAMPLE_RATE: f32 = 44100.0;

    #[test]
    fn test_frequency_sizes_buffer_to_nearest() {
        // 44100 / 440 = 100.227... -> 100
        let string = PluckedString::from_frequency(SAMPLE_RATE, 440.0).unwrap();
        assert_eq!(string.len(), 100);

        // 44100 / 441 = 100 exactly
        let string = PluckedString::from_frequency(SAMPLE_RATE, 441.0).unwrap();
        assert_eq!(string.len(), 100);
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        // 100 / 8 = 12.5 -> 13
        let string = PluckedString::from_frequency(100.0, 8.0).unwrap();
        assert_eq!(string.len(), 13);
    }

    #[test]
    fn test_fresh_string_is_silent() {
        let string = PluckedString::from_frequency(SAMPLE_RATE, 110.0).unwrap();
        assert!(string.samples().all(|s| s == 0.0));
        assert_eq!(string.sample(), 0.0);
    }

    #[test]
    fn test_non_positive_frequency_rejected() {
        assert_eq!(
            PluckedString::from_frequency(SAMPLE_RATE, 0.0).unwrap_err(),
            Error::InvalidParameter("frequency must be positive")
        );
        assert!(PluckedString::from_frequency(SAMPLE_RATE, -440.0).is_err());
    }

    #[test]
    fn test_too_short_period_rejected() {
        // 44100 / 40000 = 1.1 -> 1, below the 2-sample minimum.
        assert!(PluckedString::from_frequency(SAMPLE_RATE, 40000.0).is_err());
        // Degenerate sampling rate falls out the same way.
        assert!(PluckedString::from_frequency(0.0, 440.0).is_err());
    }

    #[test]
    fn test_seed_constructor_bounds() {
        assert!(PluckedString::from_samples(vec![]).is_err());
        assert!(PluckedString::from_samples(vec![0.3]).is_err());

        let string = PluckedString::from_samples(vec![0.3, -0.1]).unwrap();
        assert_eq!(string.sample(), 0.3);
        assert_eq!(string.len(), 2);
    }

    #[test]
    fn test_pluck_fills_range_and_keeps_capacity() {
        let mut string = PluckedString::from_frequency(SAMPLE_RATE, 220.0).unwrap();
        let n = string.len();

        string.pluck();

        assert_eq!(string.len(), n);
        for sample in string.samples() {
            assert!(
                (-0.5..0.5).contains(&sample),
                "excitation out of range: {}",
                sample
            );
        }
    }

    #[test]
    fn test_pluck_rearms_a_sounding_string() {
        let mut string = PluckedString::from_frequency(SAMPLE_RATE, 220.0).unwrap();
        string.pluck();
        for _ in 0..200_000 {
            string.advance();
        }
        let decayed_peak = string.samples().fold(0.0f32, |m, s| m.max(s.abs()));

        string.pluck();
        let rearmed_peak = string.samples().fold(0.0f32, |m, s| m.max(s.abs()));

        assert!(
            rearmed_peak > decayed_peak,
            "re-pluck should restore energy: {} -> {}",
            decayed_peak,
            rearmed_peak
        );
        assert!(rearmed_peak > 0.2, "fresh excitation too quiet: {}", rearmed_peak);
    }

    /// Constant-valued source that counts how many samples were drawn.
    struct CountingSource {
        calls: usize,
    }

    impl NoiseSource for CountingSource {
        fn next_sample(&mut self) -> f32 {
            self.calls += 1;
            0.25
        }
    }

    #[test]
    fn test_pluck_with_draws_exactly_len_samples() {
        let mut string = PluckedString::from_frequency(SAMPLE_RATE, 100.0).unwrap();
        let mut source = CountingSource { calls: 0 };

        string.pluck_with(&mut source);

        assert_eq!(source.calls, string.len());
        assert!(string.samples().all(|s| s == 0.25));
    }

    #[test]
    fn test_recurrence_from_unit_seed() {
        let mut string = PluckedString::from_samples(vec![1.0, 1.0]).unwrap();
        assert_eq!(string.sample(), 1.0);

        // Step 1 consumes the original front; the new front is the other
        // original 1.0, and ((1.0 + 1.0) / 2) * 0.996 lands at the back.
        string.advance();
        assert_eq!(string.sample(), 1.0);

        // Step 2 brings that decayed average to the front.
        string.advance();
        assert_eq!(string.sample(), 0.996);

        // Step 3 follows the same formula from the two newest entries.
        string.advance();
        let expected = ((1.0f32 + 0.996) / 2.0) * DECAY_FACTOR;
        assert_eq!(string.sample(), expected);
    }

    #[test]
    fn test_recurrence_matches_reference_queue() {
        // Drive the ring against a straightforward shift-register model.
        let seed = vec![0.5, -0.25, 0.125, 0.4, -0.3];
        let mut string = PluckedString::from_samples(seed.clone()).unwrap();
        let mut reference = seed;

        for _ in 0..100 {
            assert_eq!(string.sample(), reference[0]);
            string.advance();

            let update = ((reference[0] + reference[1]) / 2.0) * DECAY_FACTOR;
            reference.remove(0);
            reference.push(update);
        }
    }

    #[test]
    fn test_sample_is_idempotent() {
        let mut string = PluckedString::from_frequency(SAMPLE_RATE, 330.0).unwrap();
        string.pluck();

        let first = string.sample();
        assert_eq!(string.sample(), first);
        assert_eq!(string.sample(), first);

        string.advance();
        let second = string.sample();
        assert_eq!(string.sample(), second);
    }

    #[test]
    fn test_seeded_strings_render_identically() {
        let mut a = PluckedString::from_frequency(SAMPLE_RATE, 440.0).unwrap();
        let mut b = PluckedString::from_frequency(SAMPLE_RATE, 440.0).unwrap();
        a.set_noise_seed(7);
        b.set_noise_seed(7);

        a.pluck();
        b.pluck();

        for _ in 0..1000 {
            assert_eq!(a.sample(), b.sample());
            a.advance();
            b.advance();
        }
    }
}
