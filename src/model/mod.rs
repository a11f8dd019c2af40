//! Stroke model: the generative collaborator that continues a drawing.
//!
//! The session never calls a model directly. Models are moved onto a
//! [`ModelActor`] thread, which serves one request at a time and answers
//! through a [`Pending`](crate::actor::Pending) reply.

mod actor;
mod doodle;
mod scripted;

pub use actor::{ModelActor, RetryPolicy};
pub use doodle::DoodleModel;
pub use scripted::ScriptedModel;

use crate::stroke::Stroke;

/// Failure reported by a stroke model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ModelError(pub String);

impl ModelError {
    /// Create an error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A model that produces a drawing one stroke at a time.
pub trait StrokeModel {
    /// Forget the current drawing and start over.
    fn reset(&mut self);

    /// Produce the next stroke.
    ///
    /// `seed` is `Some` on the first call of a pass and carries the strokes
    /// the user drew; later calls pass `None`.
    fn generate(&mut self, seed: Option<&[Stroke]>) -> Result<Stroke, ModelError>;
}
