#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What kind of signal a sound asks its voice to produce.
///
/// This is a closed set on purpose: a voice decides whether it can render a
/// sound with a plain pattern match instead of downcasting through some
/// open-ended type hierarchy.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SoundKind {
    /// Pitched, note-tracking material (the subtractive voice's territory).
    #[default]
    Melodic,
    /// Unpitched one-shots (drum voices); not renderable by a pitched voice.
    Percussive,
}

/// Stateless capability tag consumed by a voice allocator.
///
/// A descriptor says which notes and channels a sound responds to; it never
/// carries signal state, so one instance can be shared read-only across
/// every voice that might render it. The default descriptor accepts any
/// note on any channel.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundDescriptor {
    kind: SoundKind,
    low_note: u8,
    high_note: u8,
    /// One bit per MIDI channel 0-15.
    channel_mask: u16,
}

impl Default for SoundDescriptor {
    fn default() -> Self {
        Self {
            kind: SoundKind::Melodic,
            low_note: 0,
            high_note: 127,
            channel_mask: u16::MAX,
        }
    }
}

impl SoundDescriptor {
    pub fn melodic() -> Self {
        Self::default()
    }

    pub fn percussive() -> Self {
        Self {
            kind: SoundKind::Percussive,
            ..Self::default()
        }
    }

    /// Restrict the descriptor to a key range (for keyboard splits).
    /// Bounds are inclusive and swapped if given in the wrong order.
    pub fn with_note_range(mut self, low: u8, high: u8) -> Self {
        self.low_note = low.min(high);
        self.high_note = low.max(high);
        self
    }

    /// Restrict the descriptor to the channels set in `mask` (bit n =
    /// channel n).
    pub fn with_channel_mask(mut self, mask: u16) -> Self {
        self.channel_mask = mask;
        self
    }

    pub fn kind(&self) -> SoundKind {
        self.kind
    }

    /// True if a note-on for `note` should be routed to this sound.
    pub fn applies_to_note(&self, note: u8) -> bool {
        (self.low_note..=self.high_note).contains(&note)
    }

    /// True if events on MIDI channel `channel` should reach this sound.
    /// Channels at 16 and above are outside the MIDI range and never match.
    pub fn applies_to_channel(&self, channel: u8) -> bool {
        channel < 16 && self.channel_mask & (1 << channel) != 0
    }
}
