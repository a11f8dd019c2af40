//! Terminal module: showing the canvas while it is drawn.

mod guard;
mod output;
mod preview;

pub use guard::TerminalGuard;
pub use output::OutputBuffer;
pub use preview::{NullPresenter, Presenter, TerminalPreview};
