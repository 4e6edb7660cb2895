//! Sample-timestamped events delivered with a render call.

use arrayvec::ArrayVec;

/// Absolute sample-frame time on the host clock.
///
/// Signed so an event can legitimately carry a timestamp before the start of
/// the buffer it arrives with (a "late" event).
pub type SampleTime = i64;

/// Length of a well-formed channel-voice MIDI message.
pub const MIDI_EVENT_LEN: usize = 3;

/// Status byte high-nibble for note off.
pub const STATUS_NOTE_OFF: u8 = 0x80;

/// Status byte high-nibble for note on.
pub const STATUS_NOTE_ON: u8 = 0x90;

/// One timestamped event inside a render call.
///
/// Event lists are host-owned, sorted by non-decreasing `time`, and valid
/// only for the duration of the call they arrive with.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// When the event becomes due
    pub time: SampleTime,
    /// What the event carries
    pub payload: EventPayload,
}

/// The closed set of event kinds the engine understands.
#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload {
    /// A parameter change addressed into the [`crate::params`] space.
    Param { address: u64, value: f32 },
    /// Raw channel-voice MIDI bytes. A well-formed message holds exactly
    /// [`MIDI_EVENT_LEN`] bytes; anything shorter is dropped at dispatch.
    Midi { data: ArrayVec<u8, MIDI_EVENT_LEN> },
}

impl Event {
    /// Create an event from an explicit payload.
    pub fn new(time: SampleTime, payload: EventPayload) -> Self {
        Self { time, payload }
    }

    /// Create a parameter-change event.
    pub fn param(time: SampleTime, address: u64, value: f32) -> Self {
        Self::new(time, EventPayload::Param { address, value })
    }

    /// Create a MIDI event from raw bytes, keeping at most
    /// [`MIDI_EVENT_LEN`] of them.
    pub fn midi(time: SampleTime, bytes: &[u8]) -> Self {
        let mut data = ArrayVec::new();
        for &b in bytes.iter().take(MIDI_EVENT_LEN) {
            data.push(b);
        }
        Self::new(time, EventPayload::Midi { data })
    }

    /// Create a note-on event on channel 0.
    pub fn note_on(time: SampleTime, note: u8, velocity: u8) -> Self {
        Self::midi(time, &[STATUS_NOTE_ON, note, velocity])
    }

    /// Create a note-off event on channel 0.
    pub fn note_off(time: SampleTime, note: u8) -> Self {
        Self::midi(time, &[STATUS_NOTE_OFF, note, 0])
    }
}
