//! Error kinds surfaced by the session and its collaborators.

use std::io;

/// Errors produced while seeding, generating or exporting a drawing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The stroke model failed or stalled on every attempt.
    #[error("stroke model unavailable after {attempts} attempt(s): {reason}")]
    ModelUnavailable {
        /// Number of calls that were made before giving up.
        attempts: u32,
        /// Description of the last failure.
        reason: String,
    },

    /// The user released the pointer before drawing any motion.
    #[error("seed contains no strokes")]
    EmptySeed,

    /// A bounded hand-off queue refused an item or a waiter.
    #[error("hand-off queue is full (capacity {capacity})")]
    ChannelOverflow {
        /// Configured capacity of the queue.
        capacity: usize,
    },

    /// The other side of a hand-off went away.
    #[error("hand-off channel closed")]
    ChannelClosed,

    /// The session was cancelled at a suspension point.
    #[error("session cancelled")]
    Cancelled,

    /// A bounded wait elapsed.
    #[error("timed out waiting for a hand-off")]
    Timeout,

    /// PNG encoding failed.
    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    /// Terminal or filesystem I/O failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience result type for sketchflow operations.
pub type Result<T> = std::result::Result<T, Error>;
