//! Buffered voice renderer driving an opaque sound chip.

use cv_ir::{
    Event, EventPayload, OutputBuffer, SampleTime, MIDI_EVENT_LEN, STATUS_NOTE_OFF,
    STATUS_NOTE_ON,
};

use crate::chip::{reg, SoundChip, MASTER_CLOCK_HZ};
use crate::scheduler::{self, RenderSink};
use crate::voice::Voice;

/// Largest host buffer accepted in one render call, in frames.
///
/// The scratch buffer is sized from this bound instead of a worst case
/// that is never hit; hosts deliver tens to a few hundred frames.
pub const MAX_BLOCK_FRAMES: usize = 4096;

/// Full-scale divisor for the chip's native 16-bit sample domain.
const CHIP_FULL_SCALE: f32 = 65535.0;

/// Renders one voice through a sound chip with sample-accurate events.
///
/// Owns the chip, the instrument state, and a scratch buffer for the
/// chip's native sample domain. The render path performs no allocation,
/// locking, or blocking.
pub struct VoiceRenderer<C: SoundChip> {
    chip: C,
    voice: Voice,
    sample_rate: f32,
    scratch: [i16; MAX_BLOCK_FRAMES],
}

impl<C: SoundChip> VoiceRenderer<C> {
    pub fn new(chip: C) -> Self {
        Self {
            chip,
            voice: Voice::new(),
            sample_rate: 44_100.0,
            scratch: [0; MAX_BLOCK_FRAMES],
        }
    }

    /// Configure the output rate and reset the chip to a silent,
    /// full-volume state. Call before the first render.
    pub fn init(&mut self, _channel_count: u16, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.chip.set_sampling(MASTER_CLOCK_HZ, sample_rate as u32);
        self.chip.reset();
        self.chip.write(reg::MODE_VOL, 0x0F);
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    pub fn voice_mut(&mut self) -> &mut Voice {
        &mut self.voice
    }

    pub fn chip(&self) -> &C {
        &self.chip
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Push the voice's current filter parameters to the chip.
    ///
    /// Filter changes are host-driven, not part of the note path.
    pub fn apply_filter(&mut self) {
        let writes = self.voice.filter_writes();
        for w in writes.iter() {
            self.chip.write(w.reg, w.value);
        }
    }

    /// The per-callback entry point: render `frame_count` frames starting
    /// at absolute time `start`, applying each event at its exact offset.
    ///
    /// `out` must hold at least two channels of `frame_count` frames.
    pub fn render_with_events(
        &mut self,
        start: SampleTime,
        frame_count: u32,
        events: &[Event],
        out: &mut OutputBuffer,
    ) {
        let mut sink = ChipSink { renderer: self, out };
        scheduler::render_with_events(start, frame_count, events, &mut sink);
    }

    /// Render one contiguous segment: clock the chip for the cycle count
    /// matching `frames` output frames, then copy the mono result into
    /// both output channels, normalized to [-1.0, 1.0].
    fn process_segment(&mut self, frames: u32, offset: u32, out: &mut OutputBuffer) {
        let cycles =
            libm::roundf(MASTER_CLOCK_HZ as f32 / self.sample_rate * frames as f32) as u32;
        let produced = self.chip.clock(cycles, &mut self.scratch);

        // The chip must cover the whole segment; a short batch clips to
        // silence rather than reading stale scratch samples.
        debug_assert!(
            produced >= frames as usize && frames as usize <= self.scratch.len(),
            "scratch underrun: {} of {} samples",
            produced,
            frames
        );
        let copy = (frames as usize).min(produced).min(self.scratch.len());

        let (left, right) = out.stereo_mut(offset, frames);
        for i in 0..copy {
            let s = self.scratch[i] as f32 / CHIP_FULL_SCALE;
            left[i] = s;
            right[i] = s;
        }
        left[copy..].fill(0.0);
        right[copy..].fill(0.0);
    }

    fn dispatch(&mut self, event: &Event) {
        match &event.payload {
            EventPayload::Param { .. } => {
                // Reserved for parameter automation; hosts currently drive
                // the voice directly.
            }
            EventPayload::Midi { data } => self.dispatch_midi(data),
        }
    }

    fn dispatch_midi(&mut self, data: &[u8]) {
        if data.len() != MIDI_EVENT_LEN {
            return;
        }
        match data[0] & 0xF0 {
            STATUS_NOTE_ON => {
                // An out-of-range note or velocity skips the event entirely
                if let Ok(writes) = self.voice.note_on(data[1], data[2]) {
                    for w in writes.iter() {
                        self.chip.write(w.reg, w.value);
                    }
                }
            }
            STATUS_NOTE_OFF => {
                if let Ok(w) = self.voice.note_off(data[1]) {
                    self.chip.write(w.reg, w.value);
                }
            }
            _ => {}
        }
    }
}

struct ChipSink<'a, C: SoundChip> {
    renderer: &'a mut VoiceRenderer<C>,
    out: &'a mut OutputBuffer,
}

impl<C: SoundChip> RenderSink for ChipSink<'_, C> {
    fn render(&mut self, frames: u32, offset: u32) {
        self.renderer.process_segment(frames, offset, self.out);
    }

    fn dispatch(&mut self, event: &Event) {
        self.renderer.dispatch(event);
    }
}
