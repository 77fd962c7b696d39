use crate::dsp::envelope::{AdsrEnvelope, EnvelopeParams};
use crate::dsp::filter::{FilterParams, ResonantLowPass};
use crate::dsp::oscillator::Oscillator;
use crate::io::buffer::AudioBuffer;
use crate::io::events::{MessageReceiver, VoiceEvent};
use crate::synth::midi_note_to_hz;
use crate::synth::sound::{SoundDescriptor, SoundKind};

/*
Voice
=====

One voice renders one note at a time through the classic subtractive chain:

    oscillator ──→ envelope × velocity ──→ resonant low-pass ──→ output

Everything here is realtime-safe: `start`, `stop`, and `render` never
allocate, lock, block, or fail. Invalid sounds are rejected up front via
`can_render`; out-of-range values are clamped at the component that owns
them; a zero-length render is simply a no-op.

An allocator drives the lifecycle:

    Free ──start──→ Active ──stop(tail-off)──→ Releasing ──release done──→ Free
                       │
                       └────stop(no tail-off: hard cut)────────────────→ Free

The voice writes by accumulation into every channel of the host's buffer,
so multiple voices rendering the same block mix by simple summation.
Render state persists across calls: a note can span any number of blocks.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // available for allocation
    Active,    // playing; envelope in attack/decay/sustain
    Releasing, // key released; envelope tailing off
}

pub struct Voice {
    note: u8,
    trigger: bool,
    level: f32,
    frequency: f32,
    pitch_wheel: i16,
    state: VoiceState,

    oscillator: Oscillator,
    envelope: AdsrEnvelope,
    filter: ResonantLowPass,
    filter_params: FilterParams,
}

impl Voice {
    /// A voice with the default pad voicing. The sample rate is fixed for
    /// the voice's lifetime.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_params(sample_rate, EnvelopeParams::default(), FilterParams::default())
    }

    /// Configuration is taken once here, not re-applied every block.
    pub fn with_params(
        sample_rate: f32,
        envelope: EnvelopeParams,
        filter: FilterParams,
    ) -> Self {
        Self {
            note: 0,
            trigger: false,
            level: 0.0,
            frequency: midi_note_to_hz(69),
            pitch_wheel: 0,
            state: VoiceState::Free,
            oscillator: Oscillator::new(sample_rate),
            envelope: AdsrEnvelope::new(sample_rate, envelope),
            filter: ResonantLowPass::new(sample_rate),
            filter_params: filter,
        }
    }

    /// Capability check the allocator runs before assigning a sound.
    ///
    /// A closed match over the sound kind: this pitched voice renders
    /// melodic sounds and nothing else. Rejection happens here, before any
    /// state mutation; never mid-render.
    pub fn can_render(&self, sound: &SoundDescriptor) -> bool {
        match sound.kind() {
            SoundKind::Melodic => true,
            SoundKind::Percussive => false,
        }
    }

    /// Begin a note: trigger on, level from velocity, frequency from the
    /// note number. Nothing else is reset; the envelope re-triggers from
    /// its current output per its own rule, which keeps fast re-strikes
    /// click-free.
    pub fn start(&mut self, note: u8, velocity: f32, sound: &SoundDescriptor, pitch_wheel: i16) {
        debug_assert!(self.can_render(sound));

        self.note = note;
        self.trigger = true;
        self.level = velocity.clamp(0.0, 1.0);
        self.frequency = midi_note_to_hz(note);
        self.pitch_wheel = pitch_wheel;
        self.state = VoiceState::Active;
    }

    /// End a note. With `allow_tail_off` the envelope runs its release and
    /// the voice frees itself once the tail finishes; without it the voice
    /// is silenced and reclaimable immediately, whatever the release
    /// velocity says.
    pub fn stop(&mut self, _velocity: f32, allow_tail_off: bool) {
        self.trigger = false;

        if allow_tail_off {
            if self.state == VoiceState::Active {
                self.state = VoiceState::Releasing;
            }
        } else {
            self.envelope.reset();
            self.free();
        }
    }

    /// Hook for pitch-bend mapping. Records the wheel position but does
    /// not yet affect the rendered signal.
    pub fn pitch_wheel_moved(&mut self, value: i16) {
        self.pitch_wheel = value;
    }

    /// Hook for controller mapping. Not yet routed to any parameter.
    pub fn controller_moved(&mut self, _controller: u8, _value: u8) {}

    /// Render `num_samples` samples starting at `start_sample`, adding the
    /// result into every channel of `output`.
    ///
    /// Safe to call with `num_samples == 0`, and resumable: internal state
    /// is left positioned for the next block of the same note.
    pub fn render(&mut self, output: &mut AudioBuffer, start_sample: usize, num_samples: usize) {
        debug_assert!(start_sample + num_samples <= output.num_samples());

        for sample_index in start_sample..start_sample + num_samples {
            let raw = self.oscillator.sample(self.frequency);
            let shaped = raw * self.envelope.process(self.trigger) * self.level;
            let filtered = self.filter.process(
                shaped,
                self.filter_params.cutoff_hz,
                self.filter_params.resonance,
            );
            output.add_to_all_channels(sample_index, filtered);
        }

        // A finished release means the allocator may hand this voice out
        // again.
        if self.state == VoiceState::Releasing && !self.envelope.is_active() {
            self.free();
        }
    }

    /// Apply one event, gated by the sound's capability predicates. This is
    /// the voice-side half of the allocator contract: incompatible or
    /// out-of-range note-ons are dropped without touching any state.
    pub fn handle_event(&mut self, event: &VoiceEvent, sound: &SoundDescriptor) {
        match *event {
            VoiceEvent::NoteOn {
                note,
                velocity,
                channel,
                pitch_wheel,
            } => {
                if self.can_render(sound)
                    && sound.applies_to_note(note)
                    && sound.applies_to_channel(channel)
                {
                    self.start(note, velocity, sound, pitch_wheel);
                }
            }
            VoiceEvent::NoteOff { note, velocity } => {
                if note == self.note && self.is_active() {
                    self.stop(velocity, true);
                }
            }
        }
    }

    /// Drain all pending events, typically at the top of a render block.
    pub fn process_events<R: MessageReceiver>(&mut self, rx: &mut R, sound: &SoundDescriptor) {
        while let Some(event) = rx.pop() {
            self.handle_event(&event, sound);
        }
    }

    fn free(&mut self) {
        self.state = VoiceState::Free;
        self.trigger = false;
        self.note = 0;
        self.level = 0.0;
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn pitch_wheel(&self) -> i16 {
        self.pitch_wheel
    }

    /// Current envelope output, exposed for allocators that steal the
    /// quietest voice.
    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }
}
