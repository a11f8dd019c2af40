//! Seed collection: turns the user's first press-drag-release gesture into
//! seed strokes.
//!
//! ```text
//!   WaitForPress ──press──▶ CollectMotion ──release──▶ Done
//!        │  ▲                    │  ▲
//!        └──┘ other              └──┘ move: emit stroke
//! ```

use crate::actor::{CancelToken, InputAdapter, PointerEvent};
use crate::canvas::{Brush, Canvas};
use crate::error::{Error, Result};
use crate::stroke::{Point, Stroke};
use crate::terminal::Presenter;

/// The user-drawn prefix handed to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Seed {
    /// Pen-down strokes, one per motion event.
    pub strokes: Vec<Stroke>,
    /// Pen position after the last stroke.
    pub cursor: Point,
}

impl Seed {
    /// Non-interactive seed: a single pen-down stroke at `cursor`.
    pub fn fixed(cursor: Point) -> Self {
        Self {
            strokes: vec![Stroke::down(0.0, 0.0)],
            cursor,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SeedState {
    WaitForPress,
    CollectMotion { strokes: Vec<Stroke>, cursor: Point },
    Done,
}

/// What feeding one event did.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedStep {
    /// The event was not relevant in the current state.
    Ignored,
    /// A press started the gesture at this position.
    Pressed(Point),
    /// A motion produced a stroke; the segment should be drawn.
    Segment {
        /// Start of the segment.
        from: Point,
        /// End of the segment.
        to: Point,
    },
    /// The gesture ended.
    Finished(Seed),
}

/// Press-drag-release state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedCollector {
    state: SeedState,
}

impl SeedCollector {
    /// A collector waiting for a press.
    pub const fn new() -> Self {
        Self {
            state: SeedState::WaitForPress,
        }
    }

    /// Start over.
    pub fn reset(&mut self) {
        self.state = SeedState::WaitForPress;
    }

    /// Whether the gesture has ended.
    pub const fn is_done(&self) -> bool {
        matches!(self.state, SeedState::Done)
    }

    /// Advance the state machine by one event.
    ///
    /// Returns [`Error::EmptySeed`] when the gesture ends without any motion.
    pub fn feed(&mut self, event: PointerEvent) -> Result<SeedStep> {
        let position = event.position();
        match std::mem::replace(&mut self.state, SeedState::Done) {
            SeedState::WaitForPress if !event.kind.is_press() => {
                self.state = SeedState::WaitForPress;
                Ok(SeedStep::Ignored)
            }
            SeedState::WaitForPress => {
                self.state = SeedState::CollectMotion {
                    strokes: Vec::new(),
                    cursor: position,
                };
                Ok(SeedStep::Pressed(position))
            }
            SeedState::CollectMotion { mut strokes, cursor } if event.kind.is_motion() => {
                strokes.push(Stroke::between(cursor, position));
                self.state = SeedState::CollectMotion {
                    strokes,
                    cursor: position,
                };
                Ok(SeedStep::Segment {
                    from: cursor,
                    to: position,
                })
            }
            // Release, or a second press, ends the gesture.
            SeedState::CollectMotion { strokes, cursor } => {
                if strokes.is_empty() {
                    return Err(Error::EmptySeed);
                }
                Ok(SeedStep::Finished(Seed { strokes, cursor }))
            }
            SeedState::Done => Ok(SeedStep::Ignored),
        }
    }
}

impl Default for SeedCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull events from `input` until one press-drag-release gesture completes,
/// drawing each seed segment as it arrives.
pub fn collect_seed(
    input: &InputAdapter,
    canvas: &mut Canvas,
    brush: &Brush,
    presenter: &mut dyn Presenter,
    cancel: &CancelToken,
) -> Result<Seed> {
    let mut collector = SeedCollector::new();
    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let event = input.next_event()?.wait_cancellable(cancel, None)?;
        match collector.feed(event)? {
            SeedStep::Ignored => {}
            SeedStep::Pressed(at) => log::debug!("seed press at ({}, {})", at.x, at.y),
            SeedStep::Segment { from, to } => {
                canvas.draw_line(from, to, brush);
                presenter.present(canvas)?;
            }
            SeedStep::Finished(seed) => {
                log::info!("seed collected: {} stroke(s)", seed.strokes.len());
                return Ok(seed);
            }
        }
    }
}
