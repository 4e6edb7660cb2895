//! Error types for the note dispatch path.

use core::fmt;

/// A note event whose fields fall outside the playable domain.
///
/// Never fatal: the offending event's writes are skipped entirely and
/// processing continues with the next event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteError {
    /// Note outside 0..=127 or outside the frequency table span.
    NoteOutOfRange(u8),
    /// Velocity outside 0..=127.
    VelocityOutOfRange(u8),
}

impl fmt::Display for NoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteError::NoteOutOfRange(note) => write!(f, "note {} out of range", note),
            NoteError::VelocityOutOfRange(velocity) => {
                write!(f, "velocity {} out of range", velocity)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NoteError {}
