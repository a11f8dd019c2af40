//! # Sketchflow
//!
//! An interactive sketch-continuation engine.
//!
//! The user draws the start of a doodle; a generative stroke model continues
//! it one stroke per display frame. When the model signals the end, the
//! drawing is cropped to a padded square around everything the model drew,
//! exported as PNG, and the canvas is restored so the next round starts from
//! the same seed.
//!
//! ## Core Concepts
//!
//! - **Hand-off queue**: producers push, consumers pull deferred values, in
//!   strict FIFO order on both sides
//! - **Frame pacing**: every model stroke waits for the next refresh
//! - **Actor model**: isolated threads for input, frame ticks and the model
//! - **Cancellation**: one token checked at every suspension point
//!
//! ## Example
//!
//! ```rust,no_run
//! use sketchflow::{DoodleModel, MemorySink, Point, Seed, Session, SessionConfig};
//!
//! let config = SessionConfig {
//!     max_rounds: Some(3),
//!     ..SessionConfig::default()
//! };
//! let mut session = Session::spawn(config, DoodleModel::new(7));
//! let mut sink = MemorySink::new();
//! let rounds = session.run(&Seed::fixed(Point::new(300.0, 300.0)), &mut sink)?;
//! assert_eq!(rounds, 3);
//! # Ok::<(), sketchflow::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod canvas;
pub mod error;
pub mod layout;
pub mod model;
pub mod session;
pub mod stroke;
pub mod terminal;

// Re-exports for convenience
pub use actor::{CancelToken, FramePacer, HandoffQueue, InputAdapter, OverflowPolicy, PointerEvent, QueueConfig};
pub use canvas::{Brush, Canvas, ImageSink, MemorySink, PngDirectory, Rgba};
pub use error::{Error, Result};
pub use layout::{BoundingBox, Rect, SurfaceMapping};
pub use model::{DoodleModel, ModelActor, RetryPolicy, ScriptedModel, StrokeModel};
pub use session::{Seed, Session, SessionConfig, SessionState};
pub use stroke::{Pen, Point, Stroke};
