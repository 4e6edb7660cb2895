//! Single-voice instrument state and register encoding.

use heapless::Vec;

use crate::chip::{reg, RegWrite};
use crate::error::NoteError;
use crate::freq::note_frequency_bytes;

/// Filter routing mode. `Off` disables the filter entirely, regardless of
/// the stored cutoff and resonance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    Off,
    LowPass,
    HighPass,
    BandPass,
}

/// Register writes produced by one note-on.
pub const NOTE_ON_WRITES: usize = 7;

/// Register writes produced by one filter update.
pub const FILTER_WRITES: usize = 4;

/// Instrument state for the chip's single voice.
///
/// Fields hold whatever the host sets; out-of-range values are masked or
/// clamped at encode time, never rejected. Envelope nibbles keep only their
/// low 4 bits, the normalized pulse width and cutoff quantize to 12 bits.
#[derive(Clone, Debug, PartialEq)]
pub struct Voice {
    pub noise: bool,
    pub pulse: bool,
    pub saw: bool,
    pub tri: bool,

    pub attack: u8,
    pub decay: u8,
    pub sustain: u8,
    pub release: u8,

    /// Pulse duty cycle, normalized 0.0..=1.0.
    pub pulse_width: f32,

    /// Filter cutoff, normalized 0.0..=1.0.
    pub cutoff: f32,
    /// Filter resonance, low nibble meaningful.
    pub resonance: u8,
    pub filter_mode: FilterMode,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            noise: false,
            pulse: false,
            saw: true,
            tri: false,
            attack: 0x0,
            decay: 0x0,
            sustain: 0xF,
            release: 0x0,
            pulse_width: 2048.0 / 4095.0,
            cutoff: 2048.0 / 4095.0,
            resonance: 0,
            filter_mode: FilterMode::Off,
        }
    }
}

impl Voice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pack the waveform flags into the high nibble and the gate into bit 0.
    ///
    /// Identical flags with a different gate differ only in bit 0.
    pub fn control_byte(&self, gate: bool) -> u8 {
        (self.noise as u8) << 7
            | (self.pulse as u8) << 6
            | (self.saw as u8) << 5
            | (self.tri as u8) << 4
            | gate as u8
    }

    /// Attack in the high nibble, decay in the low.
    pub fn attack_decay(&self) -> u8 {
        (self.attack & 0xF) << 4 | (self.decay & 0xF)
    }

    /// Sustain in the high nibble, release in the low.
    pub fn sustain_release(&self) -> u8 {
        (self.sustain & 0xF) << 4 | (self.release & 0xF)
    }

    /// Pulse width as the chip's (low, high) register pair.
    pub fn pulse_width_bytes(&self) -> (u8, u8) {
        split12(quantize12(self.pulse_width))
    }

    /// Filter cutoff as the chip's (low, high) register pair.
    pub fn cutoff_bytes(&self) -> (u8, u8) {
        split12(quantize12(self.cutoff))
    }

    /// Mode bit for the chip's mode/volume register; 0 disables the filter.
    pub fn filter_mode_byte(&self) -> u8 {
        match self.filter_mode {
            FilterMode::Off => 0,
            FilterMode::LowPass => 1 << 4,
            FilterMode::HighPass => 1 << 5,
            FilterMode::BandPass => 1 << 6,
        }
    }

    /// The register sequence for a note-on, or `NoteError` with nothing
    /// emitted if the note or velocity falls outside the playable domain.
    ///
    /// Frequency, pulse width and envelope must latch before the gate
    /// rises, so the control write comes last. That order is a contract.
    pub fn note_on(
        &self,
        note: u8,
        velocity: u8,
    ) -> Result<Vec<RegWrite, NOTE_ON_WRITES>, NoteError> {
        if velocity > 127 {
            return Err(NoteError::VelocityOutOfRange(velocity));
        }
        let (freq_lo, freq_hi) =
            note_frequency_bytes(note).ok_or(NoteError::NoteOutOfRange(note))?;
        let (pw_lo, pw_hi) = self.pulse_width_bytes();

        let batch = [
            RegWrite { reg: reg::FREQ_LO, value: freq_lo },
            RegWrite { reg: reg::FREQ_HI, value: freq_hi },
            RegWrite { reg: reg::PW_LO, value: pw_lo },
            RegWrite { reg: reg::PW_HI, value: pw_hi },
            RegWrite { reg: reg::ATTACK_DECAY, value: self.attack_decay() },
            RegWrite { reg: reg::SUSTAIN_RELEASE, value: self.sustain_release() },
            RegWrite { reg: reg::CONTROL, value: self.control_byte(true) },
        ];
        Ok(Vec::from_slice(&batch).expect("batch fits NOTE_ON_WRITES"))
    }

    /// The single register write for a note-off: the control byte with the
    /// gate bit cleared, starting the envelope release.
    pub fn note_off(&self, note: u8) -> Result<RegWrite, NoteError> {
        if note > 127 {
            return Err(NoteError::NoteOutOfRange(note));
        }
        Ok(RegWrite { reg: reg::CONTROL, value: self.control_byte(false) })
    }

    /// The register sequence pushing the current filter parameters.
    ///
    /// Mode `Off` zeroes cutoff, resonance and routing so the stored values
    /// have no effect. The mode/volume write keeps the volume nibble at
    /// full scale.
    pub fn filter_writes(&self) -> Vec<RegWrite, FILTER_WRITES> {
        let off = self.filter_mode == FilterMode::Off;
        let (fc_lo, fc_hi) = if off { (0, 0) } else { self.cutoff_bytes() };
        let res_filt = if off { 0 } else { (self.resonance & 0xF) << 4 | 0x01 };

        let batch = [
            RegWrite { reg: reg::FC_LO, value: fc_lo },
            RegWrite { reg: reg::FC_HI, value: fc_hi },
            RegWrite { reg: reg::RES_FILT, value: res_filt },
            RegWrite { reg: reg::MODE_VOL, value: self.filter_mode_byte() | 0x0F },
        ];
        Vec::from_slice(&batch).expect("batch fits FILTER_WRITES")
    }
}

/// Quantize a normalized value to the chip's 12-bit register domain.
fn quantize12(normalized: f32) -> u16 {
    let v = libm::roundf(normalized * 4095.0);
    if v <= 0.0 {
        0
    } else if v >= 4095.0 {
        4095
    } else {
        v as u16
    }
}

fn split12(v: u16) -> (u8, u8) {
    let v = v & 0x0FFF;
    ((v & 0xFF) as u8, (v >> 8) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_waveform_is_sawtooth() {
        let voice = Voice::new();
        assert_eq!(voice.control_byte(false), 0b0010_0000);
        assert_eq!(voice.control_byte(true), 0b0010_0001);
    }

    #[test]
    fn control_byte_packs_all_flags() {
        let mut voice = Voice::new();
        voice.noise = true;
        voice.pulse = true;
        voice.tri = true;
        assert_eq!(voice.control_byte(false), 0b1111_0000);
    }

    #[test]
    fn gate_only_touches_bit_zero() {
        let mut voice = Voice::new();
        voice.pulse = true;
        voice.saw = false;
        let open = voice.control_byte(true);
        let closed = voice.control_byte(false);
        assert_eq!(open ^ closed, 0x01);
    }

    #[test]
    fn envelope_nibbles_mask_to_four_bits() {
        let mut voice = Voice::new();
        voice.attack = 0xAB;
        voice.decay = 0xFF;
        voice.sustain = 0x1F;
        voice.release = 0x20;
        assert_eq!(voice.attack_decay(), 0xBF);
        assert_eq!(voice.sustain_release(), 0xF0);
    }

    #[test]
    fn envelope_defaults() {
        let voice = Voice::new();
        assert_eq!(voice.attack_decay(), 0x00);
        assert_eq!(voice.sustain_release(), 0xF0);
    }

    #[test]
    fn pulse_width_default_is_midpoint() {
        let voice = Voice::new();
        assert_eq!(voice.pulse_width_bytes(), (0x00, 0x08));
    }

    #[test]
    fn pulse_width_roundtrips_within_one_step() {
        let mut voice = Voice::new();
        for &pw in &[0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0] {
            voice.pulse_width = pw;
            let (lo, hi) = voice.pulse_width_bytes();
            let v = (hi as u16) << 8 | lo as u16;
            let back = v as f32 / 4095.0;
            assert!((back - pw).abs() <= 1.0 / 4095.0, "pw {} decoded {}", pw, back);
        }
    }

    #[test]
    fn pulse_width_clamps_out_of_range_input() {
        let mut voice = Voice::new();
        voice.pulse_width = -0.5;
        assert_eq!(voice.pulse_width_bytes(), (0x00, 0x00));
        voice.pulse_width = 1.5;
        assert_eq!(voice.pulse_width_bytes(), (0xFF, 0x0F));
    }

    #[test]
    fn filter_mode_bytes() {
        let mut voice = Voice::new();
        assert_eq!(voice.filter_mode_byte(), 0x00);
        voice.filter_mode = FilterMode::LowPass;
        assert_eq!(voice.filter_mode_byte(), 0x10);
        voice.filter_mode = FilterMode::HighPass;
        assert_eq!(voice.filter_mode_byte(), 0x20);
        voice.filter_mode = FilterMode::BandPass;
        assert_eq!(voice.filter_mode_byte(), 0x40);
    }

    #[test]
    fn note_on_write_order() {
        let voice = Voice::new();
        let writes = voice.note_on(60, 100).unwrap();
        let regs: alloc::vec::Vec<u8> = writes.iter().map(|w| w.reg).collect();
        assert_eq!(
            regs,
            [
                reg::FREQ_LO,
                reg::FREQ_HI,
                reg::PW_LO,
                reg::PW_HI,
                reg::ATTACK_DECAY,
                reg::SUSTAIN_RELEASE,
                reg::CONTROL,
            ]
        );
        // Gate is set on the final control write
        assert_eq!(writes[6].value & 0x01, 0x01);
    }

    #[test]
    fn note_on_uses_frequency_table() {
        let voice = Voice::new();
        let writes = voice.note_on(57, 64).unwrap();
        assert_eq!(writes[0].value, 0x52);
        assert_eq!(writes[1].value, 0x07);
    }

    #[test]
    fn note_on_rejects_out_of_range_note() {
        let voice = Voice::new();
        assert_eq!(voice.note_on(128, 10), Err(NoteError::NoteOutOfRange(128)));
        assert_eq!(voice.note_on(23, 10), Err(NoteError::NoteOutOfRange(23)));
        assert_eq!(voice.note_on(120, 10), Err(NoteError::NoteOutOfRange(120)));
    }

    #[test]
    fn note_on_accepts_table_bounds() {
        let voice = Voice::new();
        assert!(voice.note_on(24, 64).is_ok());
        assert!(voice.note_on(119, 64).is_ok());
    }

    #[test]
    fn note_on_rejects_out_of_range_velocity() {
        let voice = Voice::new();
        assert_eq!(
            voice.note_on(60, 128),
            Err(NoteError::VelocityOutOfRange(128))
        );
    }

    #[test]
    fn note_off_clears_gate_only() {
        let mut voice = Voice::new();
        voice.pulse = true;
        let w = voice.note_off(60).unwrap();
        assert_eq!(w.reg, reg::CONTROL);
        assert_eq!(w.value, voice.control_byte(false));
        assert_eq!(w.value & 0x01, 0x00);
    }

    #[test]
    fn note_off_rejects_out_of_range_note() {
        let voice = Voice::new();
        assert_eq!(voice.note_off(200), Err(NoteError::NoteOutOfRange(200)));
    }

    #[test]
    fn filter_off_zeroes_routing() {
        let mut voice = Voice::new();
        voice.resonance = 0xF;
        voice.cutoff = 1.0;
        let writes = voice.filter_writes();
        assert_eq!(writes[0], RegWrite { reg: reg::FC_LO, value: 0 });
        assert_eq!(writes[1], RegWrite { reg: reg::FC_HI, value: 0 });
        assert_eq!(writes[2], RegWrite { reg: reg::RES_FILT, value: 0 });
        assert_eq!(writes[3], RegWrite { reg: reg::MODE_VOL, value: 0x0F });
    }

    #[test]
    fn filter_writes_encode_mode_and_resonance() {
        let mut voice = Voice::new();
        voice.filter_mode = FilterMode::LowPass;
        voice.resonance = 0x1A;
        let writes = voice.filter_writes();
        // Resonance masks to its low nibble; voice routing bit set
        assert_eq!(writes[2], RegWrite { reg: reg::RES_FILT, value: 0xA1 });
        assert_eq!(writes[3], RegWrite { reg: reg::MODE_VOL, value: 0x1F });
    }
}
