//! Low-level DSP primitives that make up one voice's signal path.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They intentionally stay focused on the
//! signal-processing math so the voice layer can handle note lifecycle and
//! buffer plumbing.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Resonant low-pass filter.
pub mod filter;
/// Phase-accumulator oscillator with selectable waveform.
pub mod oscillator;

pub use envelope::EnvelopeStage;
