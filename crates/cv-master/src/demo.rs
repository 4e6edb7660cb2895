//! Built-in demo sequence.

use cv_ir::Event;

/// The note pattern, one note per beat.
const PATTERN: [u8; 8] = [45, 57, 60, 64, 67, 64, 60, 57];

/// Beats per second in the demo.
const BEATS_PER_SECOND: u32 = 4;

/// Build a short arpeggio as a time-sorted event list, plus its total
/// length in frames (pattern length and a release tail).
///
/// Each note gates on at its beat and off three quarters of the way
/// through, so every beat exercises both envelope edges.
pub fn demo_sequence(sample_rate: u32) -> (Vec<Event>, u32) {
    let beat = (sample_rate / BEATS_PER_SECOND) as i64;
    let gate_len = beat * 3 / 4;

    let mut events = Vec::with_capacity(PATTERN.len() * 2);
    for (i, &note) in PATTERN.iter().enumerate() {
        let start = i as i64 * beat;
        events.push(Event::note_on(start, note, 100));
        events.push(Event::note_off(start + gate_len, note));
    }

    let total = (PATTERN.len() as i64 * beat + beat) as u32;
    (events, total)
}
