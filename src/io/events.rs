#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// A note event handed to a voice, already MIDI-derived by the host.
///
/// Velocity is normalized to 0.0-1.0. Events are consumed in arrival
/// order; this layer never reorders them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceEvent {
    NoteOn {
        note: u8,
        velocity: f32,
        channel: u8,
        pitch_wheel: i16,
    },
    NoteOff {
        note: u8,
        velocity: f32,
    },
}

/// Source of pending voice events, drained at the top of each render block.
///
/// The blanket `rtrb` impl is the realtime-safe path: the host pushes onto
/// a lock-free SPSC queue from its own thread, and the audio thread pops
/// here without blocking or allocating.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<VoiceEvent>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<VoiceEvent> {
    fn pop(&mut self) -> Option<VoiceEvent> {
        Consumer::pop(self).ok()
    }
}
