//! Parameter addresses for the instrument's host-visible tree.
//!
//! Parameter events carry one of these addresses. The engine currently
//! ignores parameter events on the render path (hosts drive the voice
//! directly); the address space exists so controllers and future
//! automation share one vocabulary.

/// Envelope attack, 0..15.
pub const ATTACK: u64 = 0;
/// Envelope decay, 0..15.
pub const DECAY: u64 = 1;
/// Envelope sustain level, 0..15.
pub const SUSTAIN: u64 = 2;
/// Envelope release, 0..15.
pub const RELEASE: u64 = 3;

/// Noise waveform flag, 0.0 or 1.0.
pub const NOISE: u64 = 4;
/// Pulse waveform flag.
pub const PULSE: u64 = 5;
/// Sawtooth waveform flag.
pub const SAW: u64 = 6;
/// Triangle waveform flag.
pub const TRI: u64 = 7;

/// Pulse width, normalized 0.0..=1.0.
pub const PULSE_WIDTH: u64 = 8;

/// Filter cutoff, normalized 0.0..=1.0.
pub const CUTOFF: u64 = 9;
/// Filter resonance, 0..15.
pub const RESONANCE: u64 = 10;
/// Filter mode, 0 = off, 1 = low-pass, 2 = high-pass, 3 = band-pass.
pub const FILTER_MODE: u64 = 11;
