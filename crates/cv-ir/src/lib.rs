//! Host-facing types for the chipvoice instrument.
//!
//! This crate defines the vocabulary shared between a host (plugin shell,
//! CLI, test harness) and the engine: sample-timestamped events, the
//! parameter address space, and the planar output buffer the engine
//! renders into.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod buffer;
mod event;
mod frame;
pub mod params;

pub use buffer::OutputBuffer;
pub use event::{
    Event, EventPayload, SampleTime, MIDI_EVENT_LEN, STATUS_NOTE_OFF, STATUS_NOTE_ON,
};
pub use frame::Frame;
