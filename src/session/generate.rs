//! Stroke generation: asks the model for strokes until it signals `End`,
//! drawing one stroke per frame.

use super::seed::Seed;
use super::await_frame;
use crate::actor::{CancelToken, FrameSource};
use crate::canvas::{Brush, Canvas};
use crate::error::Result;
use crate::layout::{BoundingBox, Rect};
use crate::model::{ModelActor, RetryPolicy};
use crate::stroke::Point;
use crate::terminal::Presenter;

/// Result of one generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// Extent of every position visited during the pass.
    pub bounds: BoundingBox,
    /// Square crop clamped to the canvas, if anything was visited.
    pub crop: Option<Rect>,
    /// Strokes received before `End`.
    pub strokes: usize,
    /// Strokes that put ink on the canvas.
    pub draws: usize,
    /// Pen position when the model ended.
    pub cursor: Point,
}

/// Drives one model pass onto a canvas.
pub struct StrokeGenerator<'a, F: FrameSource + ?Sized> {
    model: &'a ModelActor,
    frames: &'a F,
    retry: RetryPolicy,
    brush: Brush,
    cancel: CancelToken,
}

impl<'a, F: FrameSource + ?Sized> StrokeGenerator<'a, F> {
    /// A generator using `model` for strokes and `frames` for pacing.
    pub fn new(model: &'a ModelActor, frames: &'a F, cancel: CancelToken) -> Self {
        Self {
            model,
            frames,
            retry: RetryPolicy::default(),
            brush: Brush::default(),
            cancel,
        }
    }

    /// Use `retry` for every model call.
    #[must_use]
    pub const fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Paint with `brush`.
    #[must_use]
    pub const fn brush(mut self, brush: Brush) -> Self {
        self.brush = brush;
        self
    }

    /// Run the model from `start` until it returns `End`.
    ///
    /// The seed goes to the first call only. Each non-`End` stroke moves the
    /// cursor, is painted if its pen is down, grows the bounding box, and is
    /// followed by one frame wait. The start position itself is not part of
    /// the box.
    ///
    /// # Errors
    ///
    /// [`Error::ModelUnavailable`](crate::Error::ModelUnavailable) once the
    /// retry policy is exhausted, [`Error::Cancelled`](crate::Error::Cancelled)
    /// when the token fires at a model call or frame wait.
    pub fn run(
        &self,
        canvas: &mut Canvas,
        presenter: &mut dyn Presenter,
        seed: &Seed,
        start: Point,
    ) -> Result<GenerationOutcome> {
        let mut bounds = BoundingBox::new();
        let mut cursor = start;
        let mut strokes = 0usize;
        let mut draws = 0usize;

        let mut stroke = self
            .model
            .request(Some(&seed.strokes), &self.retry, &self.cancel)?;

        while !stroke.is_end() {
            let next = cursor.offset(stroke);
            if stroke.is_drawn() {
                canvas.draw_line(cursor, next, &self.brush);
                draws += 1;
            }
            cursor = next;
            bounds.visit(cursor);
            strokes += 1;
            log::debug!(
                "stroke {strokes}: ({:.1}, {:.1}) {:?} -> ({:.1}, {:.1})",
                stroke.dx,
                stroke.dy,
                stroke.pen,
                cursor.x,
                cursor.y
            );

            presenter.present(canvas)?;
            await_frame(self.frames, &self.cancel)?;

            stroke = self.model.request(None, &self.retry, &self.cancel)?;
        }

        let crop = bounds
            .square_crop()
            .map(|crop| crop.clamp_to(canvas.width(), canvas.height()));
        log::info!("model ended after {strokes} stroke(s), {draws} drawn");

        Ok(GenerationOutcome {
            bounds,
            crop,
            strokes,
            draws,
            cursor,
        })
    }
}

impl<F: FrameSource + ?Sized> std::fmt::Debug for StrokeGenerator<'_, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrokeGenerator")
            .field("retry", &self.retry)
            .field("brush", &self.brush)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{FramePacer, Pending, Tick};
    use crate::canvas::Rgba;
    use crate::error::Error;
    use crate::model::ScriptedModel;
    use crate::stroke::Stroke;
    use crate::terminal::NullPresenter;
    use std::cell::Cell;
    use std::time::Duration;

    /// Resolves every frame immediately and counts the waits.
    #[derive(Default)]
    struct CountingFrames {
        waits: Cell<u64>,
    }

    impl FrameSource for CountingFrames {
        fn next_frame(&self) -> Result<Pending<Tick>> {
            let frame = self.waits.get();
            self.waits.set(frame + 1);
            Ok(Pending::resolved(Tick {
                frame,
                elapsed: Duration::ZERO,
            }))
        }
    }

    fn quick_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 2,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(1),
            call_timeout: Some(Duration::from_secs(2)),
        }
    }

    #[test]
    fn test_bounds_exclude_start() {
        let model = ScriptedModel::new(vec![
            Stroke::down(5.0, 5.0),
            Stroke::down(-2.0, 3.0),
            Stroke::end(),
        ]);
        let calls = model.call_log();
        let actor = ModelActor::spawn(model);
        let frames = CountingFrames::default();
        let generator = StrokeGenerator::new(&actor, &frames, CancelToken::new()).retry(quick_retry());

        let mut canvas = Canvas::new(500, 780, Rgba::WHITE);
        let seed = Seed::fixed(Point::new(300.0, 300.0));
        let outcome = generator
            .run(&mut canvas, &mut NullPresenter, &seed, seed.cursor)
            .unwrap();

        assert_eq!(outcome.bounds.min_x(), 303.0);
        assert_eq!(outcome.bounds.max_x(), 305.0);
        assert_eq!(outcome.bounds.min_y(), 305.0);
        assert_eq!(outcome.bounds.max_y(), 308.0);
        assert_eq!(outcome.strokes, 2);
        assert_eq!(outcome.draws, 2);
        assert_eq!(outcome.cursor, Point::new(303.0, 308.0));
        assert_eq!(outcome.crop, Some(Rect::new(298, 300, 13, 13)));

        // One frame per stroke, none for End.
        assert_eq!(frames.waits.get(), 2);
        // Seed on the first call only.
        assert_eq!(*calls.lock().unwrap(), vec![Some(1), None, None]);

        // The first segment runs from (300,300) to (305,305).
        assert_eq!(canvas.get(302, 302), Some(Rgba::BLACK));
        actor.join();
    }

    #[test]
    fn test_pen_up_moves_without_ink() {
        let actor = ModelActor::spawn(ScriptedModel::new(vec![
            Stroke::up(100.0, 0.0),
            Stroke::down(0.0, 100.0),
        ]));
        let frames = CountingFrames::default();
        let generator = StrokeGenerator::new(&actor, &frames, CancelToken::new());

        let mut canvas = Canvas::new(300, 300, Rgba::WHITE);
        let outcome = generator
            .run(&mut canvas, &mut NullPresenter, &Seed::fixed(Point::new(50.0, 50.0)), Point::new(50.0, 50.0))
            .unwrap();

        assert_eq!(outcome.strokes, 2);
        assert_eq!(outcome.draws, 1);
        // Pen-up travel leaves no ink but still counts toward the box.
        assert_eq!(canvas.get(100, 50), Some(Rgba::WHITE));
        assert_eq!(canvas.get(150, 100), Some(Rgba::BLACK));
        assert_eq!(outcome.bounds.min_x(), 150.0);
        assert_eq!(outcome.bounds.min_y(), 50.0);
        actor.join();
    }

    #[test]
    fn test_immediate_end() {
        let actor = ModelActor::spawn(ScriptedModel::new(Vec::new()));
        let frames = CountingFrames::default();
        let generator = StrokeGenerator::new(&actor, &frames, CancelToken::new());

        let mut canvas = Canvas::new(10, 10, Rgba::WHITE);
        let before = canvas.backup();
        let outcome = generator
            .run(&mut canvas, &mut NullPresenter, &Seed::fixed(Point::new(5.0, 5.0)), Point::new(5.0, 5.0))
            .unwrap();

        assert_eq!(outcome.strokes, 0);
        assert!(!outcome.bounds.is_valid());
        assert_eq!(outcome.crop, None);
        assert_eq!(frames.waits.get(), 0);
        assert_eq!(canvas, before);
        actor.join();
    }

    #[test]
    fn test_model_failure_retried() {
        let actor = ModelActor::spawn(ScriptedModel::new(vec![Stroke::down(1.0, 1.0)]).with_failures(1));
        let frames = CountingFrames::default();
        let generator = StrokeGenerator::new(&actor, &frames, CancelToken::new()).retry(quick_retry());

        let mut canvas = Canvas::new(10, 10, Rgba::WHITE);
        let outcome = generator
            .run(&mut canvas, &mut NullPresenter, &Seed::fixed(Point::new(1.0, 1.0)), Point::new(1.0, 1.0))
            .unwrap();
        assert_eq!(outcome.strokes, 1);
        actor.join();
    }

    #[test]
    fn test_model_unavailable() {
        let actor = ModelActor::spawn(ScriptedModel::new(vec![Stroke::down(1.0, 1.0)]).with_failures(5));
        let frames = CountingFrames::default();
        let generator = StrokeGenerator::new(&actor, &frames, CancelToken::new()).retry(quick_retry());

        let mut canvas = Canvas::new(10, 10, Rgba::WHITE);
        let err = generator
            .run(&mut canvas, &mut NullPresenter, &Seed::fixed(Point::new(1.0, 1.0)), Point::new(1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable { attempts: 2, .. }));
        actor.join();
    }

    #[test]
    fn test_cancelled_before_start() {
        let actor = ModelActor::spawn(ScriptedModel::new(vec![Stroke::down(1.0, 1.0)]));
        let frames = CountingFrames::default();
        let cancel = CancelToken::new();
        cancel.cancel();
        let generator = StrokeGenerator::new(&actor, &frames, cancel);

        let mut canvas = Canvas::new(10, 10, Rgba::WHITE);
        let err = generator
            .run(&mut canvas, &mut NullPresenter, &Seed::fixed(Point::new(1.0, 1.0)), Point::new(1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        actor.join();
    }

    #[test]
    fn test_paced_by_real_frames() {
        let actor = ModelActor::spawn(ScriptedModel::new(vec![
            Stroke::down(1.0, 0.0),
            Stroke::down(1.0, 0.0),
            Stroke::down(1.0, 0.0),
        ]));
        let pacer = FramePacer::spawn(Duration::from_millis(2));
        let generator = StrokeGenerator::new(&actor, &pacer, CancelToken::new());

        let mut canvas = Canvas::new(50, 50, Rgba::WHITE);
        let outcome = generator
            .run(&mut canvas, &mut NullPresenter, &Seed::fixed(Point::new(10.0, 10.0)), Point::new(10.0, 10.0))
            .unwrap();

        assert_eq!(outcome.strokes, 3);
        assert!(pacer.frame_count() >= 3);
        pacer.join();
        actor.join();
    }
}
