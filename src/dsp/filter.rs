use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MIN_FREQUENCY_HZ;

/*
Resonant Low-Pass Filter
========================

A two-pole state-variable filter in topology-preserving-transform form.
Two integrator memories (`ic1eq`, `ic2eq`) feed back into the input each
sample; the damping coefficient `k` controls how much energy recirculates
near the cutoff:

    k = 2 - 2 * resonance

    resonance = 0.0  →  k = 2    plain low-pass, no peak (Butterworth-ish)
    resonance → 1.0  →  k → 0    tall resonant peak at the cutoff
    resonance > 1.0  →  k < 0    negative damping: self-oscillation

Resonance is deliberately NOT clamped. Values past 1.0 make the filter ring
on its own, which is authentic analog-style behavior some patches want;
callers needing safety clamp before calling. Within [0, 1) the filter is
numerically stable.

The cutoff is pre-warped with tan() so the digital response lines up with
the requested analog frequency, then clamped to (0, Nyquist) at this
boundary since the coefficient math degenerates outside that range.
*/

/// Cutoff and resonance for the voice's filter stage.
///
/// Resonance is typically 0.0 to 1.0; larger values self-oscillate (see the
/// module notes). It is passed through unclamped.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub cutoff_hz: f32,
    pub resonance: f32,
}

impl Default for FilterParams {
    /// Dark default voicing: 40 Hz cutoff with a gentle 0.1 resonance.
    fn default() -> Self {
        Self {
            cutoff_hz: 40.0,
            resonance: 0.1,
        }
    }
}

pub struct ResonantLowPass {
    ic1eq: f32, // first integrator's memory
    ic2eq: f32, // second integrator's memory
    sample_rate: f32,
}

impl ResonantLowPass {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            sample_rate,
        }
    }

    /// Filter one sample. Cutoff and resonance are read fresh each call so
    /// they can be modulated between samples.
    #[inline]
    pub fn process(&mut self, input: f32, cutoff_hz: f32, resonance: f32) -> f32 {
        let g = self.compute_g(cutoff_hz);
        let k = 2.0 - 2.0 * resonance;

        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = input - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    /// Integrator gain for the pre-warped cutoff.
    #[inline]
    fn compute_g(&self, cutoff_hz: f32) -> f32 {
        let cutoff = cutoff_hz.clamp(MIN_FREQUENCY_HZ, 0.49 * self.sample_rate);
        (PI * cutoff / self.sample_rate).tan()
    }

    /// Clear the feedback state.
    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}
