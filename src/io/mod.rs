// Purpose - external interfaces: the sample buffer handed in by the host
// and the note events that arrive from it.

pub mod buffer;
pub mod events;

pub use buffer::AudioBuffer;
pub use events::{MessageReceiver, VoiceEvent};
