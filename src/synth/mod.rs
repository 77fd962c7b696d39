// Purpose: one voice's note lifecycle and the contract a polyphonic
// allocator relies on (capability matching, start/stop, tail-off).

pub mod sound;
pub mod voice;

pub use sound::{SoundDescriptor, SoundKind};
pub use voice::{Voice, VoiceState};

/// Convert a MIDI note number to frequency in Hz (equal temperament).
/// A4 = 440 Hz = MIDI note 69.
#[inline]
pub fn midi_note_to_hz(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}
