//! Actor Model: message-passing plumbing between the host and the session.
//!
//! Push-based producers (input surface, display refresh, stroke model) each
//! run on their own thread and hand results to the single session driver
//! through channels. The driver only ever blocks on a [`Pending`] value, so
//! its control flow reads like a plain sequential loop.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  PointerEvent  ┌──────────────┐
//! │ Input Thread │ ─────────────▶ │              │
//! └──────────────┘  HandoffQueue  │   Session    │
//!                                 │   Driver     │
//! ┌──────────────┐      Tick      │              │
//! │ Frame Pacer  │ ─────────────▶ │              │
//! └──────────────┘                └──────────────┘
//!                                       │ ▲
//!                           generate()  │ │ Stroke
//!                                       ▼ │
//!                                 ┌──────────────┐
//!                                 │ Model Thread │
//!                                 └──────────────┘
//! ```

mod cancel;
mod channel;
mod frame;
mod input;
mod messages;

pub use cancel::CancelToken;
pub use channel::{Handoff, HandoffQueue, HandoffStatus, OverflowPolicy, Pending, QueueConfig};
pub use frame::{FramePacer, FrameSource};
pub use input::{EventSink, InputAdapter, InputConfig};
pub use messages::{EventMask, PointerEvent, PointerKind, Tick};
