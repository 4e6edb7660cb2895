//! Headless controller for the chipvoice instrument.
//!
//! Provides a unified API for sequencing, rendering, and live playback
//! that the CLI and tests can share.

pub mod demo;
mod tone_chip;
mod wav;

use cv_audio::{AudioOutput, CpalOutput};
use cv_ir::{OutputBuffer, SampleTime};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

// Re-export common types so callers don't need cv-ir/cv-engine directly.
pub use cv_engine::{NoteError, SoundChip, Voice, VoiceRenderer};
pub use cv_ir::{Event, Frame};

pub use tone_chip::ToneChip;
pub use wav::{frames_to_wav, write_wav};

/// Render `total_frames` through `renderer` in blocks of `block_frames`,
/// handing each block exactly the events that fall inside it.
///
/// This is the host-side loop a plugin shell performs: the absolute time
/// cursor advances across calls while each call only sees its own window.
pub fn render_blocks<C: SoundChip>(
    renderer: &mut VoiceRenderer<C>,
    events: &[Event],
    total_frames: u32,
    block_frames: u32,
) -> Vec<Frame> {
    let block_frames = block_frames.max(1);
    let mut frames = Vec::with_capacity(total_frames as usize);
    let mut out = OutputBuffer::new(2, block_frames);
    let mut cursor = 0usize;
    let mut now: SampleTime = 0;
    let mut done: u32 = 0;

    while done < total_frames {
        let len = block_frames.min(total_frames - done);
        let end = now + len as i64;
        // Events at the block boundary belong to the next block
        let window = events[cursor..].iter().take_while(|e| e.time < end).count();

        out.silence();
        renderer.render_with_events(now, len, &events[cursor..cursor + window], &mut out);
        cursor += window;

        for i in 0..len as usize {
            frames.push(Frame {
                left: out.channel(0)[i],
                right: out.channel(1)[i],
            });
        }
        now = end;
        done += len;
    }

    frames
}

/// Headless controller — owns an event sequence and manages playback.
pub struct Controller {
    events: Vec<Event>,
    total_frames: u32,
    sample_rate: u32,
    playback: Option<PlaybackHandle>,
}

struct PlaybackHandle {
    stop_signal: Arc<AtomicBool>,
    current_frame: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            events: Vec::new(),
            total_frames: 0,
            sample_rate,
            playback: None,
        }
    }

    // --- Sequence management ---

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_frames(&self) -> u32 {
        self.total_frames
    }

    /// Replace the sequence. Stops any running playback first.
    pub fn set_sequence(&mut self, events: Vec<Event>, total_frames: u32) {
        self.stop();
        self.events = events;
        self.total_frames = total_frames;
    }

    /// Load the built-in demo arpeggio.
    pub fn load_demo(&mut self) {
        let (events, total_frames) = demo::demo_sequence(self.sample_rate);
        self.set_sequence(events, total_frames);
    }

    // --- Offline rendering ---

    pub fn render_frames(&self, block_frames: u32) -> Vec<Frame> {
        let mut renderer = VoiceRenderer::new(ToneChip::new());
        renderer.init(2, self.sample_rate as f32);
        render_blocks(&mut renderer, &self.events, self.total_frames, block_frames)
    }

    pub fn render_to_wav(&self, block_frames: u32) -> Vec<u8> {
        frames_to_wav(&self.render_frames(block_frames), self.sample_rate)
    }

    // --- Real-time playback ---

    pub fn play(&mut self) {
        self.stop();

        let events = self.events.clone();
        let total_frames = self.total_frames;
        let source_rate = self.sample_rate;
        let stop_signal = Arc::new(AtomicBool::new(false));
        let current_frame = Arc::new(AtomicU64::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let stop = stop_signal.clone();
        let frame = current_frame.clone();
        let done = finished.clone();

        let thread = std::thread::spawn(move || {
            audio_thread(events, total_frames, source_rate, stop, frame, done);
        });

        self.playback = Some(PlaybackHandle {
            stop_signal,
            current_frame,
            finished,
            thread: Some(thread),
        });
    }

    pub fn stop(&mut self) {
        if let Some(mut pb) = self.playback.take() {
            pb.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = pb.thread.take() {
                let _ = handle.join();
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }

    pub fn is_finished(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| p.finished.load(Ordering::Relaxed))
    }

    /// Current playback position in frames, `None` when not playing.
    pub fn position(&self) -> Option<u64> {
        let pb = self.playback.as_ref()?;
        if pb.finished.load(Ordering::Relaxed) {
            return None;
        }
        Some(pb.current_frame.load(Ordering::Relaxed))
    }
}

fn audio_thread(
    events: Vec<Event>,
    total_frames: u32,
    source_rate: u32,
    stop: Arc<AtomicBool>,
    current_frame: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
) {
    let (mut output, consumer) = match CpalOutput::new() {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Audio init failed: {}", e);
            finished.store(true, Ordering::Relaxed);
            return;
        }
    };
    if let Err(e) = output.build_stream(consumer) {
        eprintln!("Audio stream failed: {}", e);
        finished.store(true, Ordering::Relaxed);
        return;
    }
    if let Err(e) = output.start() {
        eprintln!("Audio start failed: {}", e);
        finished.store(true, Ordering::Relaxed);
        return;
    }

    let device_rate = output.sample_rate();
    let (events, total_frames) = retime(events, total_frames, source_rate, device_rate);

    let mut renderer = VoiceRenderer::new(ToneChip::new());
    renderer.init(2, device_rate as f32);
    let frames = render_blocks(&mut renderer, &events, total_frames, 512);

    // The spinning producer paces us against the device clock
    for (i, frame) in frames.iter().enumerate() {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        output.write_spin(*frame);
        current_frame.store(i as u64 + 1, Ordering::Relaxed);
    }

    if !stop.load(Ordering::Relaxed) {
        // Let the ring buffer drain before tearing the stream down
        std::thread::sleep(std::time::Duration::from_millis(150));
    }
    let _ = output.stop();
    finished.store(true, Ordering::Relaxed);
}

/// Rescale a sequence authored at `source_rate` to the device rate.
fn retime(
    events: Vec<Event>,
    total_frames: u32,
    source_rate: u32,
    device_rate: u32,
) -> (Vec<Event>, u32) {
    if source_rate == device_rate || source_rate == 0 {
        return (events, total_frames);
    }
    let scale = device_rate as f64 / source_rate as f64;
    let events = events
        .into_iter()
        .map(|e| Event::new((e.time as f64 * scale).round() as i64, e.payload))
        .collect();
    let total = (total_frames as f64 * scale).round() as u32;
    (events, total)
}
