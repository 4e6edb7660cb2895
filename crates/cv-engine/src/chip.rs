//! The sound-chip register boundary.
//!
//! The chip itself is an opaque collaborator: the engine only writes
//! registers and asks for samples. Cycle-accurate emulation lives behind
//! this trait.

/// PAL master clock of the emulated chip, in Hz.
pub const MASTER_CLOCK_HZ: u32 = 985_248;

/// Register addresses for the single supported voice.
pub mod reg {
    /// Oscillator frequency, low byte.
    pub const FREQ_LO: u8 = 0x00;
    /// Oscillator frequency, high byte.
    pub const FREQ_HI: u8 = 0x01;
    /// Pulse width, low byte.
    pub const PW_LO: u8 = 0x02;
    /// Pulse width, high 4 bits.
    pub const PW_HI: u8 = 0x03;
    /// Waveform flags in the high nibble, gate in bit 0.
    pub const CONTROL: u8 = 0x04;
    /// Attack high nibble, decay low nibble.
    pub const ATTACK_DECAY: u8 = 0x05;
    /// Sustain high nibble, release low nibble.
    pub const SUSTAIN_RELEASE: u8 = 0x06;
    /// Filter cutoff, low byte.
    pub const FC_LO: u8 = 0x15;
    /// Filter cutoff, high byte.
    pub const FC_HI: u8 = 0x16;
    /// Resonance high nibble, voice routing low nibble.
    pub const RES_FILT: u8 = 0x17;
    /// Filter mode high nibble, master volume low nibble.
    pub const MODE_VOL: u8 = 0x18;
}

/// One register write, in dispatch order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegWrite {
    pub reg: u8,
    pub value: u8,
}

/// An opaque sound engine: a bank of write-only registers plus a clocked
/// sample generator.
///
/// `clock` advances emulation by `cycles` master-clock cycles and fills
/// `out` with mono samples in the chip's native signed 16-bit domain,
/// returning how many it produced (at most `out.len()`). The cycles-to-
/// samples ratio is fixed by `set_sampling`.
pub trait SoundChip {
    /// Configure the master clock to output sample rate ratio.
    fn set_sampling(&mut self, master_clock_hz: u32, sample_rate: u32);

    /// Reset to power-on state.
    fn reset(&mut self);

    /// Write a register. Fire-and-forget, always succeeds.
    fn write(&mut self, reg: u8, value: u8);

    /// Generate samples for `cycles` master-clock cycles.
    fn clock(&mut self, cycles: u32, out: &mut [i16]) -> usize;
}
