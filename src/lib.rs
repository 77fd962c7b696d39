pub mod dsp;
pub mod io; // Buffers and note events crossing the host boundary
pub mod synth; // Voice lifecycle and the polyphonic allocation contract

/// Largest render block a host is expected to request in one call.
pub const MAX_BLOCK_SIZE: usize = 2048;

/// Floor applied to frequencies and cutoffs so phase and coefficient math
/// never sees zero or negative values.
pub(crate) const MIN_FREQUENCY_HZ: f32 = 0.01;
