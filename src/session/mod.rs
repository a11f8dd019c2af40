//! Session: the seed → generate → export → restore cycle.
//!
//! A session owns the canvas and drives every round from one thread. All
//! waiting (pointer events, frames, model replies) happens on [`Pending`]
//! values, each checked against the session's [`CancelToken`].
//!
//! ```text
//! Seeding ──▶ Generating ──▶ Exporting ──▶ Restoring ─┐
//!                  ▲                                   │
//!                  └───────────── next round ──────────┘
//!                                    │ max_rounds / cancel
//!                                    ▼
//!                                 Finished
//! ```
//!
//! [`Pending`]: crate::actor::Pending

mod generate;
mod seed;

pub use generate::{GenerationOutcome, StrokeGenerator};
pub use seed::{collect_seed, Seed, SeedCollector, SeedStep};

use crate::actor::{CancelToken, FramePacer, FrameSource, InputAdapter, InputConfig, Tick};
use crate::canvas::{Brush, Canvas, ExportedImage, ImageSink, Rgba};
use crate::error::{Error, Result};
use crate::model::{ModelActor, RetryPolicy, StrokeModel};
use crate::terminal::{NullPresenter, Presenter};

/// Block until the next frame, or fail with `Cancelled`.
pub(crate) fn await_frame<F: FrameSource + ?Sized>(frames: &F, cancel: &CancelToken) -> Result<Tick> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    frames.next_frame()?.wait_cancellable(cancel, None)
}

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Canvas background.
    pub background: Rgba,
    /// Brush for seed and model strokes.
    pub brush: Brush,
    /// Frame rate used to pace stroke drawing.
    pub target_fps: u32,
    /// Retry behavior for model calls.
    pub retry: RetryPolicy,
    /// Input queue and surface mapping.
    pub input: InputConfig,
    /// Stop after this many rounds. `None` runs until cancelled.
    pub max_rounds: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas_width: 500,
            canvas_height: 780,
            background: Rgba::WHITE,
            brush: Brush::default(),
            target_fps: 60,
            retry: RetryPolicy::default(),
            input: InputConfig::default(),
            max_rounds: None,
        }
    }
}

/// Where the session is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for the user's seed gesture.
    #[default]
    Seeding,
    /// The model is drawing.
    Generating,
    /// Cropping and handing off the finished drawing.
    Exporting,
    /// Painting the pre-generation snapshot back.
    Restoring,
    /// No more rounds will run.
    Finished,
}

/// A sketch-continuation session.
pub struct Session<F: FrameSource = FramePacer> {
    config: SessionConfig,
    canvas: Canvas,
    model: ModelActor,
    frames: F,
    presenter: Box<dyn Presenter>,
    cancel: CancelToken,
    state: SessionState,
    rounds: u32,
}

impl Session<FramePacer> {
    /// Start a session with its own frame pacer and model thread.
    pub fn spawn<M>(config: SessionConfig, model: M) -> Self
    where
        M: StrokeModel + Send + 'static,
    {
        let frames = FramePacer::with_fps(config.target_fps);
        Self::new(config, ModelActor::spawn(model), frames)
    }
}

impl<F: FrameSource> Session<F> {
    /// Assemble a session from already running collaborators.
    ///
    /// # Panics
    ///
    /// Panics if the configured canvas size is zero.
    pub fn new(config: SessionConfig, model: ModelActor, frames: F) -> Self {
        let canvas = Canvas::new(config.canvas_width, config.canvas_height, config.background);
        Self {
            config,
            canvas,
            model,
            frames,
            presenter: Box::new(NullPresenter),
            cancel: CancelToken::new(),
            state: SessionState::Seeding,
            rounds: 0,
        }
    }

    /// Show progress through `presenter`.
    #[must_use]
    pub fn with_presenter(mut self, presenter: Box<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    /// Share an existing cancellation token, e.g. one watched by the input thread.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the session at its next suspension point.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The session configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The drawing surface.
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Mutable access to the drawing surface, e.g. to pre-draw a seed.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Current state.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Rounds completed so far.
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Collect a seed gesture from `input`, drawing it on the canvas.
    ///
    /// A gesture without motion is logged and collection starts over.
    /// Returns `None` if the session was cancelled first.
    pub fn seed_from_input(&mut self, input: &InputAdapter) -> Result<Option<Seed>> {
        self.state = SessionState::Seeding;
        self.presenter.present(&self.canvas)?;
        loop {
            match collect_seed(
                input,
                &mut self.canvas,
                &self.config.brush,
                self.presenter.as_mut(),
                &self.cancel,
            ) {
                Ok(seed) => return Ok(Some(seed)),
                Err(Error::EmptySeed) => log::warn!("seed had no motion, draw again"),
                Err(Error::Cancelled) => {
                    self.state = SessionState::Finished;
                    return Ok(None);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run rounds from `seed` until `max_rounds` or cancellation.
    ///
    /// The canvas as it stands now (with the seed drawn) is snapshotted and
    /// restored after every round, and again when a round is cancelled part
    /// way through. Returns the number of rounds completed.
    pub fn run(&mut self, seed: &Seed, sink: &mut dyn ImageSink) -> Result<u32> {
        let backup = self.canvas.backup();
        let result = loop {
            if self.config.max_rounds.is_some_and(|max| self.rounds >= max) {
                break Ok(self.rounds);
            }
            match self.run_round(seed, &backup, sink) {
                Ok(_) => {}
                Err(Error::Cancelled) => {
                    log::info!("session cancelled after {} round(s)", self.rounds);
                    self.canvas.restore(&backup);
                    break self
                        .presenter
                        .present(&self.canvas)
                        .map(|()| self.rounds)
                        .map_err(Error::from);
                }
                Err(e) => break Err(e),
            }
        };
        self.state = SessionState::Finished;
        result
    }

    /// Run one round: generate, export, restore `backup`, reset the model.
    pub fn run_round(
        &mut self,
        seed: &Seed,
        backup: &Canvas,
        sink: &mut dyn ImageSink,
    ) -> Result<GenerationOutcome> {
        let round = self.rounds + 1;
        log::info!("round {round}: generating from ({:.1}, {:.1})", seed.cursor.x, seed.cursor.y);

        self.state = SessionState::Generating;
        let outcome = StrokeGenerator::new(&self.model, &self.frames, self.cancel.clone())
            .retry(self.config.retry)
            .brush(self.config.brush)
            .run(&mut self.canvas, self.presenter.as_mut(), seed, seed.cursor)?;

        self.state = SessionState::Exporting;
        await_frame(&self.frames, &self.cancel)?;
        match outcome.crop {
            Some(rect) => {
                if let Some(image) = ExportedImage::capture(&self.canvas, rect, round)? {
                    await_frame(&self.frames, &self.cancel)?;
                    sink.accept(&image)?;
                    log::info!("round {round}: exported {:?} ({} bytes)", image.rect, image.png.len());
                }
            }
            None => log::warn!("round {round}: model drew nothing, skipping export"),
        }

        self.state = SessionState::Restoring;
        await_frame(&self.frames, &self.cancel)?;
        self.canvas.restore(backup);
        self.presenter.present(&self.canvas)?;
        self.model.reset()?;

        self.rounds = round;
        Ok(outcome)
    }

    /// Cancel and wait for the model thread to stop.
    pub fn close(self) {
        self.cancel.cancel();
        self.model.join();
    }
}

impl<F: FrameSource> std::fmt::Debug for Session<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("canvas", &self.canvas)
            .field("state", &self.state)
            .field("rounds", &self.rounds)
            .finish_non_exhaustive()
    }
}
