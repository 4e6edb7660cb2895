//! A register-driven stand-in oscillator.
//!
//! `ToneChip` honors the frequency, pulse-width, control and volume
//! registers it is sent and produces a naive waveform from them. It is a
//! placeholder for a real chip emulation core (no envelopes, no filter,
//! no cycle accuracy) so demos and end-to-end tests have audible,
//! deterministic output flowing through the real register path.

use cv_engine::{reg, SoundChip};

const PHASE_BITS: u32 = 24;
const PHASE_MASK: u32 = (1 << PHASE_BITS) - 1;
const LFSR_SEED: u32 = 0x7F_FFF8;

pub struct ToneChip {
    regs: [u8; 32],
    phase: u32,
    lfsr: u32,
    master_clock_hz: u32,
    sample_rate: u32,
}

impl ToneChip {
    pub fn new() -> Self {
        Self {
            regs: [0; 32],
            phase: 0,
            lfsr: LFSR_SEED,
            master_clock_hz: 985_248,
            sample_rate: 44_100,
        }
    }

    fn reg(&self, r: u8) -> u8 {
        self.regs[(r & 0x1F) as usize]
    }

    /// 16-bit oscillator frequency from the register pair.
    fn frequency(&self) -> u32 {
        (self.reg(reg::FREQ_HI) as u32) << 8 | self.reg(reg::FREQ_LO) as u32
    }

    /// 12-bit pulse duty threshold from the register pair.
    fn pulse_width(&self) -> u32 {
        ((self.reg(reg::PW_HI) as u32 & 0x0F) << 8 | self.reg(reg::PW_LO) as u32) & 0xFFF
    }

    /// Phase advance per output sample, in accumulator units.
    fn phase_increment(&self) -> u32 {
        (self.frequency() as u64 * self.master_clock_hz as u64 / self.sample_rate as u64) as u32
    }

    /// One 12-bit waveform sample from the current phase.
    fn waveform(&mut self) -> u32 {
        let control = self.reg(reg::CONTROL);
        let ramp = self.phase >> (PHASE_BITS - 12);

        let mut value = 0xFFF;
        let mut selected = false;
        if control & 0x20 != 0 {
            value &= ramp;
            selected = true;
        }
        if control & 0x10 != 0 {
            // Triangle: fold the ramp and drop the top bit
            let tri = if ramp < 0x800 { ramp << 1 } else { (0xFFF - ramp) << 1 };
            value &= tri & 0xFFF;
            selected = true;
        }
        if control & 0x40 != 0 {
            value &= if ramp >= self.pulse_width() { 0xFFF } else { 0 };
            selected = true;
        }
        if control & 0x80 != 0 {
            self.lfsr = self.lfsr >> 1 | ((self.lfsr ^ self.lfsr >> 5) & 1) << 22;
            value &= self.lfsr & 0xFFF;
            selected = true;
        }

        if selected { value } else { 0x800 }
    }

    fn next_sample(&mut self) -> i16 {
        let gate = self.reg(reg::CONTROL) & 0x01 != 0;
        let volume = (self.reg(reg::MODE_VOL) & 0x0F) as i32;

        self.phase = (self.phase + self.phase_increment()) & PHASE_MASK;
        if !gate || volume == 0 {
            return 0;
        }

        let wave = self.waveform() as i32;
        (((wave - 0x800) * 16 * volume) / 15) as i16
    }
}

impl Default for ToneChip {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundChip for ToneChip {
    fn set_sampling(&mut self, master_clock_hz: u32, sample_rate: u32) {
        self.master_clock_hz = master_clock_hz;
        self.sample_rate = sample_rate.max(1);
    }

    fn reset(&mut self) {
        self.regs = [0; 32];
        self.phase = 0;
        self.lfsr = LFSR_SEED;
    }

    fn write(&mut self, reg: u8, value: u8) {
        self.regs[(reg & 0x1F) as usize] = value;
    }

    fn clock(&mut self, cycles: u32, out: &mut [i16]) -> usize {
        let clock = self.master_clock_hz.max(1) as u64;
        let samples = ((cycles as u64 * self.sample_rate as u64 + clock / 2) / clock) as usize;
        let n = samples.min(out.len());
        for s in &mut out[..n] {
            *s = self.next_sample();
        }
        n
    }
}
