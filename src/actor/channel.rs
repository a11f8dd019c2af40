//! Hand-off queue: adapts push-based producers to a pull-based consumer.
//!
//! A `receive()` and a `send()` may each arrive before the other. Whichever
//! arrives first is parked until its counterpart shows up:
//!
//! ```text
//!   send(a) ──▶ [items: a]          receive() ──▶ [waiters: w]
//!   receive() ◀── a (immediately)   send(b) ──▶ w resolved with b
//! ```
//!
//! At most one of the two parked sequences is non-empty at any instant, and
//! both are served first-in-first-out, so the Kth `receive` resolves to the
//! Kth `send`.

use crate::actor::CancelToken;
use crate::error::{Error, Result};
use crossbeam_channel::{
    after, bounded, never, select, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

/// What a full queue does with a new item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Discard the oldest buffered item to make room.
    #[default]
    DropOldest,
    /// Discard the item being sent.
    DropNewest,
    /// Refuse the item with [`Error::ChannelOverflow`].
    Reject,
}

/// Capacity settings for a [`HandoffQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum parked items, and separately maximum parked waiters.
    pub capacity: usize,
    /// Behavior when the item side is full.
    pub overflow: OverflowPolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            overflow: OverflowPolicy::DropOldest,
        }
    }
}

/// Delivery state of a sent item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffStatus {
    /// Parked in the queue, no consumer has taken it yet.
    Buffered,
    /// Taken by a consumer.
    Delivered,
    /// Discarded by the overflow policy, or the queue was torn down.
    Dropped,
}

/// Deferred result of [`HandoffQueue::send`].
#[derive(Debug)]
pub struct Handoff {
    status: HandoffStatus,
    ack: Option<Receiver<HandoffStatus>>,
}

impl Handoff {
    const fn settled(status: HandoffStatus) -> Self {
        Self { status, ack: None }
    }

    /// Current delivery state, without blocking.
    pub fn status(&mut self) -> HandoffStatus {
        if let Some(ack) = &self.ack {
            match ack.try_recv() {
                Ok(status) => {
                    self.status = status;
                    self.ack = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.status = HandoffStatus::Dropped;
                    self.ack = None;
                }
            }
        }
        self.status
    }

    /// Block until the item is delivered or dropped.
    pub fn wait(mut self) -> HandoffStatus {
        match self.ack.take() {
            Some(ack) => ack.recv().unwrap_or(HandoffStatus::Dropped),
            None => self.status,
        }
    }
}

/// Deferred value that resolves exactly once.
///
/// Backed by a one-slot crossbeam channel; the producing side resolves it by
/// sending, and dropping the producer without sending resolves it as closed.
#[derive(Debug)]
pub struct Pending<T> {
    rx: Receiver<T>,
    /// Dropped with the pending value; queues hold a `Weak` to see that.
    alive: Arc<()>,
}

impl<T> Pending<T> {
    /// Create a connected resolver/pending pair.
    pub(crate) fn channel() -> (Sender<T>, Self) {
        let (tx, rx) = bounded(1);
        (
            tx,
            Self {
                rx,
                alive: Arc::new(()),
            },
        )
    }

    /// Handle that stops upgrading once this pending value is dropped.
    pub(crate) fn liveness(&self) -> Weak<()> {
        Arc::downgrade(&self.alive)
    }

    /// A pending value that is already resolved.
    pub fn resolved(value: T) -> Self {
        let (tx, pending) = Self::channel();
        let _ = tx.try_send(value);
        pending
    }

    /// Whether the value has arrived.
    #[inline]
    pub fn is_ready(&self) -> bool {
        !self.rx.is_empty()
    }

    /// Take the value if it has arrived.
    pub fn try_take(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Block until the value arrives.
    pub fn wait(self) -> Result<T> {
        self.rx.recv().map_err(|_| Error::ChannelClosed)
    }

    /// Block for at most `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<T> {
        self.rx.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => Error::Timeout,
            RecvTimeoutError::Disconnected => Error::ChannelClosed,
        })
    }

    /// Block until the value arrives, the token is cancelled, or the
    /// optional deadline passes.
    ///
    /// A value that has already arrived always wins: cancellation or timeout
    /// is reported only when nothing was delivered.
    pub fn wait_cancellable(&self, cancel: &CancelToken, timeout: Option<Duration>) -> Result<T> {
        let deadline = timeout.map_or_else(never, after);
        select! {
            recv(self.rx) -> value => value.map_err(|_| Error::ChannelClosed),
            recv(cancel.receiver()) -> _ => self.rx.try_recv().map_err(|_| Error::Cancelled),
            recv(deadline) -> _ => self.rx.try_recv().map_err(|e| match e {
                TryRecvError::Empty => Error::Timeout,
                TryRecvError::Disconnected => Error::ChannelClosed,
            }),
        }
    }
}

struct Parked<T> {
    item: T,
    ack: Sender<HandoffStatus>,
}

struct Waiter<T> {
    tx: Sender<T>,
    alive: Weak<()>,
}

impl<T> Waiter<T> {
    fn is_live(&self) -> bool {
        self.alive.strong_count() > 0
    }
}

struct State<T> {
    items: VecDeque<Parked<T>>,
    waiters: VecDeque<Waiter<T>>,
    closed: bool,
}

/// Bounded FIFO rendezvous queue.
pub struct HandoffQueue<T> {
    state: Mutex<State<T>>,
    config: QueueConfig,
}

impl<T> HandoffQueue<T> {
    /// Create a queue with the default capacity.
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Create a queue with custom capacity settings.
    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                waiters: VecDeque::new(),
                closed: false,
            }),
            config: QueueConfig {
                capacity: config.capacity.max(1),
                ..config
            },
        }
    }

    /// The effective configuration.
    pub const fn config(&self) -> QueueConfig {
        self.config
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the next item, now if one is parked, otherwise when it is sent.
    ///
    /// Parked items remain receivable after [`close`](Self::close).
    pub fn receive(&self) -> Result<Pending<T>> {
        let (tx, pending) = Pending::channel();
        let mut state = self.lock();

        if let Some(parked) = state.items.pop_front() {
            let _ = parked.ack.try_send(HandoffStatus::Delivered);
            let _ = tx.try_send(parked.item);
            return Ok(pending);
        }
        if state.closed {
            return Err(Error::ChannelClosed);
        }
        // Abandoned waiters do not count against the cap.
        state.waiters.retain(Waiter::is_live);
        if state.waiters.len() >= self.config.capacity {
            log::warn!("hand-off queue refused a waiter at capacity {}", self.config.capacity);
            return Err(Error::ChannelOverflow {
                capacity: self.config.capacity,
            });
        }

        state.waiters.push_back(Waiter {
            tx,
            alive: pending.liveness(),
        });
        Ok(pending)
    }

    /// Hand an item to the oldest waiter, or park it until one arrives.
    ///
    /// Waiters whose [`Pending`] was dropped are skipped; the item moves on
    /// to the next waiter or into the buffer.
    pub fn send(&self, item: T) -> Result<Handoff> {
        let mut state = self.lock();
        if state.closed {
            return Err(Error::ChannelClosed);
        }

        let mut item = item;
        while let Some(waiter) = state.waiters.pop_front() {
            if !waiter.is_live() {
                continue;
            }
            match waiter.tx.try_send(item) {
                Ok(()) => return Ok(Handoff::settled(HandoffStatus::Delivered)),
                Err(TrySendError::Disconnected(back) | TrySendError::Full(back)) => item = back,
            }
        }

        if state.items.len() >= self.config.capacity {
            match self.config.overflow {
                OverflowPolicy::Reject => {
                    return Err(Error::ChannelOverflow {
                        capacity: self.config.capacity,
                    });
                }
                OverflowPolicy::DropNewest => {
                    log::warn!("hand-off queue full, dropping newest item");
                    return Ok(Handoff::settled(HandoffStatus::Dropped));
                }
                OverflowPolicy::DropOldest => {
                    log::warn!("hand-off queue full, dropping oldest item");
                    if let Some(oldest) = state.items.pop_front() {
                        let _ = oldest.ack.try_send(HandoffStatus::Dropped);
                    }
                }
            }
        }

        let (ack_tx, ack_rx) = bounded(1);
        state.items.push_back(Parked { item, ack: ack_tx });
        Ok(Handoff {
            status: HandoffStatus::Buffered,
            ack: Some(ack_rx),
        })
    }

    /// Stop accepting sends and resolve all parked waiters as closed.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.waiters.clear();
    }

    /// Whether [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of parked items.
    pub fn pending_items(&self) -> usize {
        self.lock().items.len()
    }

    /// Number of parked waiters whose [`Pending`] is still held.
    pub fn pending_waiters(&self) -> usize {
        self.lock().waiters.iter().filter(|w| w.is_live()).count()
    }
}

impl<T> Default for HandoffQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for HandoffQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("HandoffQueue")
            .field("items", &state.items.len())
            .field("waiters", &state.waiters.len())
            .field("closed", &state.closed)
            .field("config", &self.config)
            .finish()
    }
}
