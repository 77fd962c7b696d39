#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
ADSR Envelope Generator
=======================

A linear four-stage amplitude shaper driven by a binary trigger signal.
`process(trigger_on)` is called once per sample; the returned level (0.0 to
1.0) multiplies the oscillator's raw output.

The state machine:

    ┌──────┐ trigger on ┌────────┐ level=1 ┌───────┐ level=S ┌─────────┐
    │ Idle │ ─────────→ │ Attack │ ──────→ │ Decay │ ──────→ │ Sustain │
    └──────┘            └────────┘         └───────┘         └─────────┘
        ↑                    │                 │                  │
        │                    └────── trigger off (any stage) ─────┘
        │    level=0              ┌─────────┐
        └──────────────────────── │ Release │
                                  └─────────┘

Two details matter for click-free audio:

  * Release always ramps down from the CURRENT level, wherever the trigger
    drops. Releasing mid-attack never jumps to the sustain level first.

  * Re-triggering (trigger rises again, even mid-release) enters Attack
    from the CURRENT level rather than snapping back to zero. The output
    therefore never moves by more than one stage's natural per-sample
    increment.

Stage durations are configured in milliseconds and converted to per-sample
increments with the sample rate:

    increment = target_change / (duration_ms / 1000 * sample_rate)

A duration of 0 ms floors the stage length at one sample, so the stage
completes within a single tick.
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,    // trigger low, envelope silent
    Attack,  // trigger went high, ramping toward 1.0
    Decay,   // reached peak, ramping down to the sustain level
    Sustain, // holding while the trigger stays high
    Release, // trigger went low, ramping down to 0
}

/// Stage durations and sustain level. Durations are floored at zero and the
/// sustain level is clamped to [0, 1] at construction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeParams {
    pub attack_ms: f32,
    pub decay_ms: f32,
    pub sustain_level: f32,
    pub release_ms: f32,
}

impl EnvelopeParams {
    pub fn new(attack_ms: f32, decay_ms: f32, sustain_level: f32, release_ms: f32) -> Self {
        Self {
            attack_ms: attack_ms.max(0.0),
            decay_ms: decay_ms.max(0.0),
            sustain_level: sustain_level.clamp(0.0, 1.0),
            release_ms: release_ms.max(0.0),
        }
    }
}

impl Default for EnvelopeParams {
    /// Slow pad-like shape: 2 s attack, 500 ms decay to 0.8, 2 s release.
    fn default() -> Self {
        Self {
            attack_ms: 2_000.0,
            decay_ms: 500.0,
            sustain_level: 0.8,
            release_ms: 2_000.0,
        }
    }
}

pub struct AdsrEnvelope {
    params: EnvelopeParams,
    sample_rate: f32,

    stage: EnvelopeStage,
    level: f32,
    last_trigger: bool,

    // Snapshot taken when the trigger drops, so release hits 0.0 in exactly
    // release_ms regardless of the level it started from.
    release_decrement: f32,
}

impl AdsrEnvelope {
    pub fn new(sample_rate: f32, params: EnvelopeParams) -> Self {
        Self {
            params,
            sample_rate,
            stage: EnvelopeStage::Idle,
            level: 0.0,
            last_trigger: false,
            release_decrement: 0.0,
        }
    }

    /// Advance the envelope by one sample and return the new level.
    ///
    /// Trigger edges are detected internally: a rising edge enters Attack
    /// (from the current level), a falling edge enters Release.
    pub fn process(&mut self, trigger_on: bool) -> f32 {
        if trigger_on && !self.last_trigger {
            // Re-trigger continues from the current level; no reset to zero.
            self.stage = EnvelopeStage::Attack;
        } else if !trigger_on && self.last_trigger && self.stage != EnvelopeStage::Idle {
            self.release_decrement =
                self.level / Self::stage_samples(self.params.release_ms, self.sample_rate);
            self.stage = EnvelopeStage::Release;
        }
        self.last_trigger = trigger_on;

        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => {
                self.level += 1.0 / Self::stage_samples(self.params.attack_ms, self.sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                let target = self.params.sustain_level;
                self.level -=
                    (1.0 - target) / Self::stage_samples(self.params.decay_ms, self.sample_rate);
                if self.level <= target {
                    self.level = target;
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Sustain => {
                self.level = self.params.sustain_level;
            }

            EnvelopeStage::Release => {
                self.level -= self.release_decrement;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Duration of a stage in samples, floored at one tick.
    #[inline]
    fn stage_samples(duration_ms: f32, sample_rate: f32) -> f32 {
        (duration_ms * 1.0e-3 * sample_rate).max(1.0)
    }

    /// True while the envelope is producing output (any stage but Idle).
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// Hard cut to silence. Used when a note must end without tail-off.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.last_trigger = false;
        self.release_decrement = 0.0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn params(&self) -> &EnvelopeParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn env(attack_ms: f32, decay_ms: f32, sustain: f32, release_ms: f32) -> AdsrEnvelope {
        AdsrEnvelope::new(
            SAMPLE_RATE,
            EnvelopeParams::new(attack_ms, decay_ms, sustain, release_ms),
        )
    }

    #[test]
    fn attack_rises_monotonically_to_one() {
        let mut env = env(100.0, 50.0, 0.7, 200.0);

        // 100 ms at 1 kHz = 100 samples, give or take float accumulation.
        let mut last = 0.0;
        let mut ticks = 0;
        while env.stage() != EnvelopeStage::Decay {
            let level = env.process(true);
            assert!(level >= last, "attack must be monotonic");
            last = level;
            ticks += 1;
            assert!(ticks <= 102, "attack overran its duration");
        }

        assert_eq!(last, 1.0);
        assert!(ticks >= 100, "attack completed early after {ticks} samples");
    }

    #[test]
    fn decay_falls_to_sustain_and_holds() {
        let sustain = 0.6;
        let mut env = env(10.0, 50.0, sustain, 200.0);

        while env.stage() != EnvelopeStage::Decay {
            env.process(true);
        }

        // 50 ms at 1 kHz = 50 samples; a couple extra covers rounding.
        let mut last = env.level();
        for _ in 0..52 {
            let level = env.process(true);
            assert!(level <= last, "decay must be monotonic");
            last = level;
        }

        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert_eq!(env.level(), sustain);

        // Holds indefinitely while triggered.
        for _ in 0..500 {
            assert_eq!(env.process(true), sustain);
        }
    }

    #[test]
    fn release_ramps_from_current_level_to_idle() {
        let mut env = env(100.0, 50.0, 0.7, 100.0);

        // Drop the trigger halfway through attack.
        for _ in 0..50 {
            env.process(true);
        }
        let held = env.level();
        assert!(held < 1.0);

        for _ in 0..105 {
            env.process(false);
        }
        assert_eq!(env.stage(), EnvelopeStage::Idle);
        assert_eq!(env.level(), 0.0);

        // The ramp started from the held level, not from sustain.
        let mut env2 = env_with_history(held);
        let first_release = env2.process(false);
        assert!(first_release <= held);
        assert!(held - first_release < 0.02);
    }

    fn env_with_history(target: f32) -> AdsrEnvelope {
        let mut e = env(100.0, 50.0, 0.7, 100.0);
        while e.level() < target {
            e.process(true);
        }
        e
    }

    #[test]
    fn retrigger_mid_release_does_not_click() {
        let mut env = env(100.0, 50.0, 0.7, 100.0);
        let attack_step = 1.0 / (0.1 * SAMPLE_RATE);

        for _ in 0..50 {
            env.process(true);
        }
        for _ in 0..30 {
            env.process(false);
        }
        let release_step = env.level() / (0.1 * SAMPLE_RATE) * 2.0; // generous bound

        // Trigger rises again mid-release: level continues from where it is.
        let before = env.level();
        let after = env.process(true);

        assert_eq!(env.stage(), EnvelopeStage::Attack);
        assert!(
            (after - before).abs() <= attack_step.max(release_step) + 1.0e-6,
            "retrigger jumped from {before} to {after}"
        );
    }

    #[test]
    fn zero_duration_stages_complete_in_one_tick() {
        let mut env = env(0.0, 0.0, 0.5, 0.0);

        assert_eq!(env.process(true), 1.0);
        assert_eq!(env.stage(), EnvelopeStage::Decay);

        assert_eq!(env.process(true), 0.5);
        assert_eq!(env.stage(), EnvelopeStage::Sustain);

        assert_eq!(env.process(false), 0.0);
        assert_eq!(env.stage(), EnvelopeStage::Idle);
    }

    #[test]
    fn out_of_range_params_are_clamped() {
        let params = EnvelopeParams::new(-10.0, -1.0, 1.5, -0.5);
        assert_eq!(params.attack_ms, 0.0);
        assert_eq!(params.decay_ms, 0.0);
        assert_eq!(params.sustain_level, 1.0);
        assert_eq!(params.release_ms, 0.0);
    }

    #[test]
    fn reset_silences_immediately() {
        let mut env = env(10.0, 10.0, 0.8, 500.0);
        for _ in 0..30 {
            env.process(true);
        }
        assert!(env.is_active());

        env.reset();
        assert!(!env.is_active());
        assert_eq!(env.level(), 0.0);
        assert_eq!(env.process(false), 0.0);
    }

    #[test]
    fn default_shape_sustains_at_expected_level() {
        let mut env = AdsrEnvelope::new(SAMPLE_RATE, EnvelopeParams::default());

        // 2000 ms attack + 500 ms decay at 1 kHz = 2500 samples, plus a
        // little slack for float accumulation.
        for _ in 0..2_600 {
            env.process(true);
        }
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert!((env.level() - 0.8).abs() < 1.0e-4);
    }
}
