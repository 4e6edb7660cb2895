//! Register model and sample-accurate event scheduling for chipvoice.
//!
//! The scheduler splits each render request into contiguous segments so
//! every event takes effect at its exact frame offset. The voice translates
//! note and parameter state into the register writes the sound chip expects.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod chip;
mod error;
mod freq;
mod renderer;
pub mod scheduler;
mod voice;

pub use chip::{reg, RegWrite, SoundChip, MASTER_CLOCK_HZ};
pub use error::NoteError;
pub use freq::{note_frequency_bytes, NOTE_MAX, NOTE_MIN};
pub use renderer::{VoiceRenderer, MAX_BLOCK_FRAMES};
pub use scheduler::{render_with_events, RenderSink};
pub use voice::{FilterMode, Voice, FILTER_WRITES, NOTE_ON_WRITES};
