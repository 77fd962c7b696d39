use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MIN_FREQUENCY_HZ;

/*
Phase-Accumulator Oscillator
============================

One phase value in [0, 1) tracks where we are inside the current waveform
cycle. Each call advances it by `frequency / sample_rate` and wraps at 1.0,
so the accumulator completes exactly one revolution per waveform period
(sample_rate / frequency samples).

    phase:  0.0 ──────────────→ 1.0  (wraps back to 0.0)
    saw:   -1.0 ──────────────→ +1.0 (then snaps back down)

Because the increment is read fresh every call, the frequency may change
between any two samples. The phase is never reset on a frequency change;
the waveform simply continues from where it was, which keeps pitch slides
free of discontinuities.

The sawtooth is the default: it carries every harmonic, which is what a
subtractive voice wants to feed its filter.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Waveform {
    /// `2 * phase - 1`. Rich in harmonics; the classic subtractive source.
    #[default]
    Saw,
    Sine,
    Square,
    Triangle,
}

pub struct Oscillator {
    phase: f32, // position in the current cycle, [0, 1)
    sample_rate: f32,
    waveform: Waveform,
}

impl Oscillator {
    /// Create a sawtooth oscillator. The sample rate is fixed for the
    /// oscillator's lifetime.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_waveform(sample_rate, Waveform::Saw)
    }

    pub fn with_waveform(sample_rate: f32, waveform: Waveform) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
            waveform,
        }
    }

    /// Produce one sample at the given frequency and advance the phase.
    ///
    /// Output is in [-1, 1]. Non-positive frequencies are clamped to a
    /// minimum positive value rather than rejected; the audio path has no
    /// error surface.
    #[inline]
    pub fn sample(&mut self, frequency_hz: f32) -> f32 {
        let frequency = frequency_hz.max(MIN_FREQUENCY_HZ);
        let out = self.shape();

        self.phase += frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        out
    }

    #[inline]
    fn shape(&self) -> f32 {
        match self.waveform {
            Waveform::Saw => 2.0 * self.phase - 1.0,
            Waveform::Sine => (TAU * self.phase).sin(),
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
        }
    }

    /// Current position in the waveform cycle, [0, 1).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    #[test]
    fn phase_advances_by_frequency_over_sample_rate() {
        // 125 / 1000 is exactly representable, so the phase math is exact.
        let mut osc = Oscillator::new(SAMPLE_RATE);
        let freq = 125.0;

        for step in 1..=7 {
            osc.sample(freq);
            assert_eq!(osc.phase(), step as f32 * freq / SAMPLE_RATE);
        }

        // Eighth step wraps back to zero.
        osc.sample(freq);
        assert_eq!(osc.phase(), 0.0);
    }

    #[test]
    fn saw_maps_phase_linearly() {
        let mut osc = Oscillator::new(SAMPLE_RATE);
        let freq = 125.0;

        let mut expected_phase = 0.0;
        for _ in 0..16 {
            let out = osc.sample(freq);
            assert_eq!(out, 2.0 * expected_phase - 1.0);
            expected_phase = (expected_phase + freq / SAMPLE_RATE) % 1.0;
        }
    }

    #[test]
    fn waveform_repeats_with_period_sample_rate_over_frequency() {
        let mut osc = Oscillator::new(SAMPLE_RATE);
        let freq = 125.0;
        let period = (SAMPLE_RATE / freq) as usize; // 8 samples

        let first: Vec<f32> = (0..period).map(|_| osc.sample(freq)).collect();
        let second: Vec<f32> = (0..period).map(|_| osc.sample(freq)).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn frequency_change_keeps_phase_continuous() {
        let mut osc = Oscillator::new(SAMPLE_RATE);
        osc.sample(125.0);
        osc.sample(250.0);

        // No phase reset: the two increments simply add up.
        assert_eq!(osc.phase(), 125.0 / SAMPLE_RATE + 250.0 / SAMPLE_RATE);
    }

    #[test]
    fn non_positive_frequency_is_clamped() {
        let mut osc = Oscillator::new(SAMPLE_RATE);

        let out = osc.sample(0.0);
        assert!(out.is_finite());
        assert!(osc.phase() > 0.0, "clamped frequency still advances phase");

        let out = osc.sample(-440.0);
        assert!(out.is_finite());
    }

    #[test]
    fn all_waveforms_stay_in_range() {
        for waveform in [
            Waveform::Saw,
            Waveform::Sine,
            Waveform::Square,
            Waveform::Triangle,
        ] {
            let mut osc = Oscillator::with_waveform(48_000.0, waveform);
            for _ in 0..2_000 {
                let out = osc.sample(440.0);
                assert!(
                    (-1.0..=1.0).contains(&out),
                    "{waveform:?} produced out-of-range sample {out}"
                );
            }
        }
    }
}
