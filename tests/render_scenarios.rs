//! End-to-end render scenarios through the full event path.
//!
//! A tracing chip records every register write and clock call so the
//! scheduler's segmentation is observable exactly as the chip sees it.

use cv_engine::{reg, SoundChip, VoiceRenderer, MASTER_CLOCK_HZ};
use cv_ir::{Event, OutputBuffer};
use cv_master::{demo, render_blocks, ToneChip};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Op {
    Write(u8, u8),
    /// A clock call, recorded as the number of samples produced.
    Clock(usize),
}

#[derive(Default)]
struct TraceChip {
    ops: Vec<Op>,
    sample_rate: u32,
}

impl SoundChip for TraceChip {
    fn set_sampling(&mut self, _master_clock_hz: u32, sample_rate: u32) {
        self.sample_rate = sample_rate;
    }

    fn reset(&mut self) {}

    fn write(&mut self, reg: u8, value: u8) {
        self.ops.push(Op::Write(reg, value));
    }

    fn clock(&mut self, cycles: u32, out: &mut [i16]) -> usize {
        let clock = MASTER_CLOCK_HZ as u64;
        let samples = ((cycles as u64 * self.sample_rate as u64 + clock / 2) / clock) as usize;
        let n = samples.min(out.len());
        out[..n].fill(0);
        self.ops.push(Op::Clock(n));
        n
    }
}

/// A renderer over a tracing chip, with init's volume write stripped.
fn run(start: i64, frames: u32, events: &[Event]) -> Vec<Op> {
    let mut renderer = VoiceRenderer::new(TraceChip::default());
    renderer.init(2, 44_100.0);
    let mut out = OutputBuffer::new(2, frames.max(1));
    renderer.render_with_events(start, frames, events, &mut out);
    renderer.chip().ops[1..].to_vec()
}

fn note_on_writes(ops: &[Op]) -> usize {
    ops.iter()
        .filter(|op| matches!(op, Op::Write(r, _) if *r == reg::FREQ_LO))
        .count()
}

#[test]
fn empty_event_list_renders_one_segment() {
    let ops = run(0, 100, &[]);
    assert_eq!(ops, [Op::Clock(100)]);
}

#[test]
fn note_on_splits_buffer_at_its_offset() {
    let ops = run(0, 100, &[Event::note_on(40, 60, 100)]);

    assert_eq!(ops[0], Op::Clock(40));
    assert_eq!(ops.last(), Some(&Op::Clock(60)));
    // The full note-on write sequence lands between the two segments
    let writes: Vec<&Op> = ops[1..ops.len() - 1].iter().collect();
    assert_eq!(writes.len(), 7);
    assert_eq!(*writes[0], Op::Write(reg::FREQ_LO, 0xb4));
    assert_eq!(*writes[1], Op::Write(reg::FREQ_HI, 0x08));
    match writes[6] {
        Op::Write(r, v) => {
            assert_eq!(*r, reg::CONTROL);
            assert_eq!(v & 0x01, 0x01);
        }
        other => panic!("expected control write, got {:?}", other),
    }
}

#[test]
fn simultaneous_events_share_one_boundary() {
    let events = [Event::note_off(40, 60), Event::note_on(40, 64, 100)];
    let ops = run(0, 100, &events);

    let clocks: Vec<&Op> = ops.iter().filter(|op| matches!(op, Op::Clock(_))).collect();
    assert_eq!(clocks, [&Op::Clock(40), &Op::Clock(60)]);
    // Note off then note on, contiguous, between the segments
    assert_eq!(ops[0], Op::Clock(40));
    assert!(matches!(ops[1], Op::Write(r, v) if r == reg::CONTROL && v & 1 == 0));
    assert!(matches!(ops[2], Op::Write(r, _) if r == reg::FREQ_LO));
}

#[test]
fn late_event_applies_before_any_audio() {
    let ops = run(0, 100, &[Event::note_on(-10, 60, 100)]);
    assert!(matches!(ops[0], Op::Write(_, _)));
    assert_eq!(ops.last(), Some(&Op::Clock(100)));
    // No zero-length render call precedes the dispatch
    assert_eq!(
        ops.iter().filter(|op| matches!(op, Op::Clock(_))).count(),
        1
    );
}

#[test]
fn out_of_range_note_emits_no_writes() {
    let ops = run(0, 100, &[Event::note_on(40, 128, 10)]);
    assert_eq!(note_on_writes(&ops), 0);
    assert!(ops.iter().all(|op| matches!(op, Op::Clock(_))));
}

#[test]
fn out_of_range_velocity_emits_no_writes() {
    let ops = run(0, 100, &[Event::note_on(40, 60, 128)]);
    assert!(ops.iter().all(|op| matches!(op, Op::Clock(_))));
}

#[test]
fn table_bounds_accept_and_reject() {
    assert_eq!(note_on_writes(&run(0, 50, &[Event::note_on(0, 24, 64)])), 1);
    assert_eq!(note_on_writes(&run(0, 50, &[Event::note_on(0, 119, 64)])), 1);
    assert_eq!(note_on_writes(&run(0, 50, &[Event::note_on(0, 23, 64)])), 0);
    assert_eq!(note_on_writes(&run(0, 50, &[Event::note_on(0, 120, 64)])), 0);
}

#[test]
fn skipped_event_does_not_stall_later_events() {
    let events = [
        Event::note_on(10, 128, 10),
        Event::note_on(20, 60, 100),
    ];
    let ops = run(0, 100, &events);
    assert_eq!(note_on_writes(&ops), 1);
    let clocks: Vec<&Op> = ops.iter().filter(|op| matches!(op, Op::Clock(_))).collect();
    assert_eq!(clocks, [&Op::Clock(10), &Op::Clock(10), &Op::Clock(80)]);
}

#[test]
fn nonzero_start_time_keeps_relative_offsets() {
    let ops = run(10_000, 100, &[Event::note_on(10_040, 60, 100)]);
    let clocks: Vec<&Op> = ops.iter().filter(|op| matches!(op, Op::Clock(_))).collect();
    assert_eq!(clocks, [&Op::Clock(40), &Op::Clock(60)]);
}

#[test]
fn block_slicing_is_transparent() {
    // Rendering the demo in different block sizes must produce identical
    // audio: the chip sees the same writes at the same sample positions
    let (events, total) = demo::demo_sequence(44_100);
    let total = total.min(22_050);

    let render = |block: u32| {
        let mut renderer = VoiceRenderer::new(ToneChip::new());
        renderer.init(2, 44_100.0);
        render_blocks(&mut renderer, &events, total, block)
    };

    let whole = render(total);
    let blocks_512 = render(512);
    let blocks_128 = render(128);

    assert_eq!(whole.len(), blocks_512.len());
    assert_eq!(whole, blocks_512);
    assert_eq!(whole, blocks_128);
}

#[test]
fn demo_produces_audio_and_silence_tail() {
    let (events, total) = demo::demo_sequence(44_100);
    let mut renderer = VoiceRenderer::new(ToneChip::new());
    renderer.init(2, 44_100.0);
    let frames = render_blocks(&mut renderer, &events, total, 512);

    assert_eq!(frames.len(), total as usize);
    assert!(frames.iter().any(|f| f.left.abs() > 0.01));
    assert!(frames[total as usize - 100..].iter().all(|f| f.left == 0.0));
}
