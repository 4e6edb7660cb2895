//! Sample-accurate event segmentation.
//!
//! A host delivers a buffer's worth of frames plus the events whose
//! timestamps fall inside it. The scheduler splits the buffer into
//! contiguous segments so each event is applied at its exact frame
//! boundary, never batched to the start or end of the full buffer.

use cv_ir::{Event, SampleTime};

/// Receiver for the scheduler's two outputs: render segments and due events.
pub trait RenderSink {
    /// Fill `frames` output frames starting at `offset` within the buffer.
    fn render(&mut self, frames: u32, offset: u32);

    /// Apply an event that has become due.
    fn dispatch(&mut self, event: &Event);
}

/// Walk `events` (sorted by non-decreasing time) across `frame_count`
/// frames starting at absolute time `start`, alternating render segments
/// and event dispatch.
///
/// Guarantees:
/// - every event with a timestamp inside the buffer is dispatched at its
///   exact frame boundary;
/// - an event at or before the current time (a "late" event) is dispatched
///   immediately, with no preceding render call; the past is never
///   rendered twice;
/// - simultaneous events dispatch back-to-back with no audio in between;
/// - zero-length render calls are never emitted;
/// - an event timestamped past the end of the buffer is left for a later
///   call.
pub fn render_with_events(
    start: SampleTime,
    frame_count: u32,
    events: &[Event],
    sink: &mut impl RenderSink,
) {
    let mut now = start;
    let mut remaining = frame_count;
    let mut cursor = 0;

    while remaining > 0 {
        let head = match events.get(cursor) {
            Some(event) => event,
            None => {
                sink.render(remaining, frame_count - remaining);
                return;
            }
        };

        // Late events clamp to zero; events beyond this buffer clip to it.
        let segment = (head.time - now).clamp(0, remaining as i64) as u32;
        if segment > 0 {
            sink.render(segment, frame_count - remaining);
            now += segment as i64;
            remaining -= segment;
        }

        while let Some(event) = events.get(cursor) {
            if event.time > now {
                break;
            }
            sink.dispatch(event);
            cursor += 1;
        }
    }
}
