//! Input Actor: forwards pointer events from the drawing surface into a
//! hand-off queue.
//!
//! Events can arrive two ways:
//! - a host pushes them through an [`EventSink`] (tests, embedding hosts)
//! - a dedicated thread polls crossterm mouse events and converts terminal
//!   cells to canvas pixels through a [`SurfaceMapping`]
//!
//! Either way every accepted event is `send` into the adapter's queue, and
//! consumers pull them in order with [`InputAdapter::next_event`].

use super::cancel::CancelToken;
use super::channel::{Handoff, HandoffQueue, Pending, QueueConfig};
use super::messages::{EventMask, PointerEvent, PointerKind};
use crate::error::{Error, Result};
use crate::layout::SurfaceMapping;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Configuration for the input adapter.
#[derive(Debug, Clone, Copy)]
pub struct InputConfig {
    /// Capacity and overflow policy of the event queue.
    pub queue: QueueConfig,
    /// Which event kinds are forwarded.
    pub mask: EventMask,
    /// Terminal cell to canvas pixel mapping.
    pub mapping: SurfaceMapping,
    /// How long to wait for terminal events before checking shutdown.
    pub poll_timeout: Duration,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            queue: QueueConfig::default(),
            mask: EventMask::ALL,
            mapping: SurfaceMapping::default(),
            poll_timeout: Duration::from_millis(10),
        }
    }
}

/// Push handle into an adapter's queue.
#[derive(Debug, Clone)]
pub struct EventSink {
    queue: Arc<HandoffQueue<PointerEvent>>,
    mask: EventMask,
}

impl EventSink {
    /// Forward one event. Returns `None` if the mask filtered it out.
    pub fn push(&self, event: PointerEvent) -> Result<Option<Handoff>> {
        if !self.mask.contains(event.kind.mask()) {
            return Ok(None);
        }
        self.queue.send(event).map(Some)
    }
}

/// Input adapter owning the pointer event queue.
pub struct InputAdapter {
    /// Queue shared with the sink(s).
    queue: Arc<HandoffQueue<PointerEvent>>,
    /// Forwarded event kinds.
    mask: EventMask,
    /// Handle to the polling thread, if any.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputAdapter {
    /// Create an adapter fed only through [`sink`](Self::sink).
    pub fn new(queue: QueueConfig, mask: EventMask) -> Self {
        Self {
            queue: Arc::new(HandoffQueue::with_config(queue)),
            mask,
            handle: None,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawn the terminal input thread.
    ///
    /// # Arguments
    ///
    /// * `config` - Queue, mask, surface mapping and poll timeout.
    /// * `cancel` - Cancelled when the user presses Esc, `q` or Ctrl+C.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the input thread.
    pub fn spawn_terminal(config: InputConfig, cancel: CancelToken) -> Self {
        let mut adapter = Self::new(config.queue, config.mask);
        let sink = adapter.sink();
        let shutdown = Arc::clone(&adapter.shutdown);

        let handle = thread::Builder::new()
            .name("sketchflow-input".to_string())
            .spawn(move || {
                Self::run_loop(&sink, &shutdown, &cancel, config.mapping, config.poll_timeout);
            })
            .expect("Failed to spawn input thread");

        adapter.handle = Some(handle);
        adapter
    }

    /// A push handle into this adapter's queue.
    pub fn sink(&self) -> EventSink {
        EventSink {
            queue: Arc::clone(&self.queue),
            mask: self.mask,
        }
    }

    /// The next event in delivery order.
    pub fn next_event(&self) -> Result<Pending<PointerEvent>> {
        self.queue.receive()
    }

    /// The underlying queue.
    pub const fn queue(&self) -> &Arc<HandoffQueue<PointerEvent>> {
        &self.queue
    }

    /// Signal the input thread to shutdown and stop accepting events.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.queue.close();
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    fn run_loop(
        sink: &EventSink,
        shutdown: &AtomicBool,
        cancel: &CancelToken,
        mapping: SurfaceMapping,
        poll_timeout: Duration,
    ) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if Self::is_quit_key(key.code, key.modifiers) {
                            log::info!("quit requested from keyboard");
                            cancel.cancel();
                        }
                    }
                    Ok(Event::Mouse(mouse)) => {
                        if let Some(pointer) = Self::convert_mouse_event(mouse, &mapping) {
                            match sink.push(pointer) {
                                Ok(_) => {}
                                Err(Error::ChannelClosed) => break,
                                Err(e) => log::warn!("input event lost: {e}"),
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("terminal read failed: {e}"),
                },
                Ok(false) => {
                    // No event, loop to check shutdown.
                }
                Err(e) => log::warn!("terminal poll failed: {e}"),
            }
        }
    }

    fn is_quit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => true,
            KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        }
    }

    /// Convert a crossterm mouse event to a pointer event.
    fn convert_mouse_event(mouse: event::MouseEvent, mapping: &SurfaceMapping) -> Option<PointerEvent> {
        let kind = match mouse.kind {
            event::MouseEventKind::Down(event::MouseButton::Left) => PointerKind::MouseDown,
            event::MouseEventKind::Up(event::MouseButton::Left) => PointerKind::MouseUp,
            event::MouseEventKind::Drag(event::MouseButton::Left) | event::MouseEventKind::Moved => {
                PointerKind::MouseMove
            }
            _ => return None,
        };
        let p = mapping.to_canvas(mouse.column, mouse.row);
        Some(PointerEvent::new(kind, p.x, p.y))
    }
}

impl Drop for InputAdapter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for InputAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputAdapter")
            .field("queue", &self.queue)
            .field("mask", &self.mask)
            .field("threaded", &self.handle.is_some())
            .finish()
    }
}
