//! Scripted model: replays a fixed stroke sequence.

use super::{ModelError, StrokeModel};
use crate::stroke::Stroke;
use std::sync::{Arc, Mutex, PoisonError};

/// Seed lengths seen by each `generate` call (`None` when no seed was passed).
pub type CallLog = Arc<Mutex<Vec<Option<usize>>>>;

/// Model that returns a fixed sequence, then `End` forever.
///
/// `reset` rewinds to the first stroke. Failures injected with
/// [`with_failures`](Self::with_failures) are spent before any stroke is
/// returned.
#[derive(Debug, Clone)]
pub struct ScriptedModel {
    strokes: Vec<Stroke>,
    cursor: usize,
    failures: u32,
    log: CallLog,
}

impl ScriptedModel {
    /// Replay `strokes`.
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Self {
            strokes,
            cursor: 0,
            failures: 0,
            log: Arc::default(),
        }
    }

    /// Fail the next `count` calls.
    #[must_use]
    pub const fn with_failures(mut self, count: u32) -> Self {
        self.failures = count;
        self
    }

    /// Shared record of every call, readable after the model moved to its thread.
    pub fn call_log(&self) -> CallLog {
        Arc::clone(&self.log)
    }
}

impl StrokeModel for ScriptedModel {
    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn generate(&mut self, seed: Option<&[Stroke]>) -> Result<Stroke, ModelError> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(seed.map(<[Stroke]>::len));

        if self.failures > 0 {
            self.failures -= 1;
            return Err(ModelError::new("scripted failure"));
        }

        let stroke = self.strokes.get(self.cursor).copied().unwrap_or_else(Stroke::end);
        self.cursor += 1;
        Ok(stroke)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_then_ends() {
        let mut model = ScriptedModel::new(vec![Stroke::down(1.0, 2.0)]);
        assert_eq!(model.generate(Some(&[])).unwrap(), Stroke::down(1.0, 2.0));
        assert!(model.generate(None).unwrap().is_end());
        assert!(model.generate(None).unwrap().is_end());

        model.reset();
        assert_eq!(model.generate(None).unwrap(), Stroke::down(1.0, 2.0));
    }

    #[test]
    fn test_call_log() {
        let mut model = ScriptedModel::new(Vec::new()).with_failures(1);
        let log = model.call_log();
        assert!(model.generate(Some(&[Stroke::down(0.0, 0.0)])).is_err());
        assert!(model.generate(None).is_ok());
        assert_eq!(*log.lock().unwrap(), vec![Some(1), None]);
    }
}
