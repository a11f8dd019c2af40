//! Frame Pacer: Dedicated thread that resolves frame waiters once per tick.
//!
//! The pacer is the native stand-in for a display's per-frame callback.
//! `next_frame()` registers a one-shot waiter; the ticker thread resolves
//! every registered waiter at the next tick. Resolution never happens inside
//! `next_frame()` itself, so a drawing loop that awaits a frame always
//! yields at least until the next refresh.

use super::channel::Pending;
use super::messages::Tick;
use crate::error::{Error, Result};
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Anything that can hand out "next refresh" waits.
pub trait FrameSource {
    /// A deferred value resolved at the next display refresh.
    fn next_frame(&self) -> Result<Pending<Tick>>;
}

type Waiters = Arc<Mutex<Vec<Sender<Tick>>>>;

/// Ticker actor that paces frames.
pub struct FramePacer {
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Waiters registered since the last tick.
    waiters: Waiters,
    /// Ticks emitted so far.
    frames: Arc<AtomicU64>,
}

impl FramePacer {
    /// Spawn a new pacer with the given interval.
    ///
    /// # Arguments
    ///
    /// * `interval` - Time between ticks (e.g., 16ms for ~60 FPS).
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the ticker thread.
    pub fn spawn(interval: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let waiters: Waiters = Arc::new(Mutex::new(Vec::new()));
        let frames = Arc::new(AtomicU64::new(0));

        let handle = {
            let shutdown = Arc::clone(&shutdown);
            let waiters = Arc::clone(&waiters);
            let frames = Arc::clone(&frames);
            thread::Builder::new()
                .name("sketchflow-frames".to_string())
                .spawn(move || Self::run_loop(&waiters, &shutdown, &frames, interval))
                .expect("Failed to spawn frame pacer thread")
        };

        Self {
            handle: Some(handle),
            shutdown,
            waiters,
            frames,
        }
    }

    /// Spawn a pacer ticking `fps` times per second.
    pub fn with_fps(fps: u32) -> Self {
        Self::spawn(Duration::from_secs(1) / fps.max(1))
    }

    /// Number of ticks emitted so far.
    pub fn frame_count(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Signal the ticker to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the ticker thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main ticker loop.
    fn run_loop(waiters: &Waiters, shutdown: &AtomicBool, frames: &AtomicU64, interval: Duration) {
        let start = Instant::now();
        let mut frame = 0u64;
        let mut next_tick = start + interval;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let now = Instant::now();
            if now >= next_tick {
                let tick = Tick {
                    frame,
                    elapsed: now - start,
                };

                let due = std::mem::take(&mut *waiters.lock().unwrap_or_else(PoisonError::into_inner));
                if !due.is_empty() {
                    log::trace!("frame {frame}: resolving {} waiter(s)", due.len());
                }
                for waiter in due {
                    let _ = waiter.try_send(tick);
                }

                frame += 1;
                frames.store(frame, Ordering::Relaxed);
                next_tick += interval;

                // Behind schedule: skip ahead instead of bursting.
                if next_tick < now {
                    next_tick = now + interval;
                }
            } else {
                let sleep_duration = next_tick - now;
                thread::sleep(sleep_duration.min(Duration::from_millis(1)));
            }
        }

        // Unresolved waiters observe a closed channel.
        waiters.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl FrameSource for FramePacer {
    fn next_frame(&self) -> Result<Pending<Tick>> {
        if self.shutdown.load(Ordering::Relaxed) {
            return Err(Error::ChannelClosed);
        }
        let (tx, pending) = Pending::channel();
        self.waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        Ok(pending)
    }
}

impl Drop for FramePacer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for FramePacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePacer")
            .field("frames", &self.frame_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_frame_resolves() {
        let pacer = FramePacer::spawn(Duration::from_millis(5));
        let tick = pacer
            .next_frame()
            .unwrap()
            .wait_timeout(Duration::from_millis(500))
            .unwrap();
        let later = pacer
            .next_frame()
            .unwrap()
            .wait_timeout(Duration::from_millis(500))
            .unwrap();
        assert!(later.frame > tick.frame);
        pacer.join();
    }

    #[test]
    fn test_never_resolves_synchronously() {
        let pacer = FramePacer::spawn(Duration::from_secs(10));
        let pending = pacer.next_frame().unwrap();
        assert!(!pending.is_ready());
        pacer.join();
    }

    #[test]
    fn test_one_tick_per_wait() {
        let pacer = FramePacer::spawn(Duration::from_millis(50));
        let a = pacer.next_frame().unwrap();
        let b = pacer.next_frame().unwrap();
        let ta = a.wait_timeout(Duration::from_millis(500)).unwrap();
        let tb = b.wait_timeout(Duration::from_millis(500)).unwrap();
        // Registered before the same tick, resolved by it.
        assert_eq!(ta, tb);
        pacer.join();
    }

    #[test]
    fn test_shutdown_closes_waiters() {
        let pacer = FramePacer::spawn(Duration::from_secs(10));
        let pending = pacer.next_frame().unwrap();
        pacer.join();
        assert!(matches!(pending.wait(), Err(Error::ChannelClosed)));
    }
}
