//! Model Actor: Dedicated thread that owns the stroke model.
//!
//! Requests are served strictly in order, so at most one `generate` call is
//! ever running. Each request carries its own one-shot reply channel. A call
//! that overruns its timeout stays in flight: the next attempt keeps waiting
//! on the same reply instead of queueing a duplicate call behind it.

use super::{ModelError, StrokeModel};
use crate::actor::{CancelToken, Pending};
use crate::error::{Error, Result};
use crate::stroke::Stroke;
use crossbeam_channel::{after, select, unbounded, Receiver, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Retry behavior for model calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per stroke, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound on the delay between retries.
    pub max_backoff: Duration,
    /// How long one call may take before it counts as failed.
    pub call_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_secs(1),
            call_timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl RetryPolicy {
    /// Delay after the given failed attempt (1-based), doubling each time.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

type Reply = std::result::Result<Stroke, ModelError>;

enum ModelRequest {
    Reset,
    Generate {
        seed: Option<Vec<Stroke>>,
        reply: Sender<Reply>,
    },
    Shutdown,
}

/// Handle to the model thread.
pub struct ModelActor {
    /// Request queue into the model thread.
    requests: Sender<ModelRequest>,
    /// Reply of a call that timed out but may still complete.
    in_flight: Mutex<Option<Pending<Reply>>>,
    /// Handle to the model thread.
    handle: Option<JoinHandle<()>>,
}

impl ModelActor {
    /// Move `model` onto its own thread.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the model thread.
    pub fn spawn<M>(model: M) -> Self
    where
        M: StrokeModel + Send + 'static,
    {
        let (requests, inbox) = unbounded();
        let handle = thread::Builder::new()
            .name("sketchflow-model".to_string())
            .spawn(move || Self::run_loop(model, &inbox))
            .expect("Failed to spawn model thread");

        Self {
            requests,
            in_flight: Mutex::new(None),
            handle: Some(handle),
        }
    }

    /// Ask the model to start a new drawing.
    ///
    /// A call still in flight from before the reset belongs to the old
    /// drawing, so its reply is discarded.
    pub fn reset(&self) -> Result<()> {
        drop(self.take_in_flight());
        self.requests
            .send(ModelRequest::Reset)
            .map_err(|_| Error::ChannelClosed)
    }

    /// Queue one `generate` call and return its pending reply.
    pub fn generate(
        &self,
        seed: Option<&[Stroke]>,
    ) -> Result<Pending<std::result::Result<Stroke, ModelError>>> {
        let (reply, pending) = Pending::channel();
        self.requests
            .send(ModelRequest::Generate {
                seed: seed.map(<[Stroke]>::to_vec),
                reply,
            })
            .map_err(|_| Error::ChannelClosed)?;
        Ok(pending)
    }

    /// Get the next stroke, retrying failed or stalled calls per `policy`.
    ///
    /// A failed call is sent again. A stalled call is not: later attempts
    /// keep waiting on its reply, so the model never sees the same seed
    /// twice and no stroke is skipped. If attempts run out while a call is
    /// still running, the next `request` picks up its reply.
    pub fn request(
        &self,
        seed: Option<&[Stroke]>,
        policy: &RetryPolicy,
        cancel: &CancelToken,
    ) -> Result<Stroke> {
        let attempts = policy.max_attempts.max(1);
        let mut reason = String::new();

        for attempt in 1..=attempts {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let reply = match self.take_in_flight() {
                Some(reply) => reply,
                None => self.generate(seed).map_err(|_| Error::ModelUnavailable {
                    attempts: attempt - 1,
                    reason: "model thread exited".to_string(),
                })?,
            };

            match reply.wait_cancellable(cancel, policy.call_timeout) {
                Ok(Ok(stroke)) => return Ok(stroke),
                Ok(Err(e)) => reason = e.to_string(),
                Err(Error::Timeout) => {
                    reason = format!("no reply within {:?}", policy.call_timeout.unwrap_or_default());
                    self.park_in_flight(reply);
                }
                Err(Error::ChannelClosed) => {
                    return Err(Error::ModelUnavailable {
                        attempts: attempt,
                        reason: "model thread exited".to_string(),
                    });
                }
                Err(e) => {
                    self.park_in_flight(reply);
                    return Err(e);
                }
            }

            if attempt < attempts {
                let delay = policy.backoff(attempt);
                log::warn!("model call {attempt}/{attempts} failed ({reason}), retrying in {delay:?}");
                sleep_cancellable(delay, cancel)?;
            }
        }

        log::warn!("model unavailable after {attempts} attempt(s): {reason}");
        Err(Error::ModelUnavailable { attempts, reason })
    }

    fn take_in_flight(&self) -> Option<Pending<Reply>> {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn park_in_flight(&self, reply: Pending<Reply>) {
        *self.in_flight.lock().unwrap_or_else(PoisonError::into_inner) = Some(reply);
    }

    /// Stop the model thread and wait for it to finish its current call.
    pub fn join(mut self) {
        let _ = self.requests.send(ModelRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main model loop.
    fn run_loop<M: StrokeModel>(mut model: M, inbox: &Receiver<ModelRequest>) {
        while let Ok(request) = inbox.recv() {
            match request {
                ModelRequest::Reset => model.reset(),
                ModelRequest::Generate { seed, reply } => {
                    let result = model.generate(seed.as_deref());
                    if let Err(e) = &result {
                        log::debug!("model call failed: {e}");
                    }
                    let _ = reply.send(result);
                }
                ModelRequest::Shutdown => break,
            }
        }
    }
}

impl Drop for ModelActor {
    fn drop(&mut self) {
        let _ = self.requests.send(ModelRequest::Shutdown);
    }
}

impl std::fmt::Debug for ModelActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelActor")
            .field("queued", &self.requests.len())
            .finish_non_exhaustive()
    }
}

fn sleep_cancellable(delay: Duration, cancel: &CancelToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    select! {
        recv(cancel.receiver()) -> _ => Err(Error::Cancelled),
        recv(after(delay)) -> _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScriptedModel;

    fn quick_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            call_timeout: Some(Duration::from_millis(200)),
        }
    }

    struct Stalled;

    impl StrokeModel for Stalled {
        fn reset(&mut self) {}

        fn generate(&mut self, _seed: Option<&[Stroke]>) -> std::result::Result<Stroke, ModelError> {
            thread::sleep(Duration::from_millis(100));
            Ok(Stroke::end())
        }
    }

    #[test]
    fn test_generate_in_order() {
        let actor = ModelActor::spawn(ScriptedModel::new(vec![
            Stroke::down(1.0, 0.0),
            Stroke::down(2.0, 0.0),
        ]));
        let first = actor.generate(None).unwrap();
        let second = actor.generate(None).unwrap();
        assert_eq!(first.wait().unwrap().unwrap(), Stroke::down(1.0, 0.0));
        assert_eq!(second.wait().unwrap().unwrap(), Stroke::down(2.0, 0.0));
        actor.join();
    }

    #[test]
    fn test_retry_recovers() {
        let model = ScriptedModel::new(vec![Stroke::down(4.0, 4.0)]).with_failures(2);
        let actor = ModelActor::spawn(model);
        let stroke = actor
            .request(None, &quick_policy(3), &CancelToken::new())
            .unwrap();
        assert_eq!(stroke, Stroke::down(4.0, 4.0));
    }

    #[test]
    fn test_retry_exhausted() {
        let model = ScriptedModel::new(vec![Stroke::down(4.0, 4.0)]).with_failures(5);
        let actor = ModelActor::spawn(model);
        let err = actor
            .request(None, &quick_policy(2), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable { attempts: 2, .. }));
    }

    #[test]
    fn test_stalled_call_times_out() {
        let actor = ModelActor::spawn(Stalled);
        let policy = RetryPolicy {
            max_attempts: 1,
            call_timeout: Some(Duration::from_millis(10)),
            ..quick_policy(1)
        };
        let err = actor.request(None, &policy, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable { attempts: 1, .. }));
    }

    /// Scripted model whose first call overruns the caller's timeout.
    struct SlowStart {
        inner: ScriptedModel,
        stall: Duration,
        calls: u32,
    }

    impl StrokeModel for SlowStart {
        fn reset(&mut self) {
            self.inner.reset();
        }

        fn generate(&mut self, seed: Option<&[Stroke]>) -> std::result::Result<Stroke, ModelError> {
            self.calls += 1;
            if self.calls == 1 {
                thread::sleep(self.stall);
            }
            self.inner.generate(seed)
        }
    }

    #[test]
    fn test_slow_call_is_awaited_not_repeated() {
        let inner = ScriptedModel::new(vec![Stroke::down(1.0, 0.0), Stroke::down(2.0, 0.0)]);
        let calls = inner.call_log();
        let actor = ModelActor::spawn(SlowStart {
            inner,
            stall: Duration::from_millis(100),
            calls: 0,
        });
        let policy = RetryPolicy {
            max_attempts: 10,
            call_timeout: Some(Duration::from_millis(30)),
            ..quick_policy(10)
        };
        let cancel = CancelToken::new();
        let seed = [Stroke::down(0.0, 0.0)];

        assert_eq!(
            actor.request(Some(&seed), &policy, &cancel).unwrap(),
            Stroke::down(1.0, 0.0)
        );
        assert_eq!(
            actor.request(None, &policy, &cancel).unwrap(),
            Stroke::down(2.0, 0.0)
        );
        assert_eq!(*calls.lock().unwrap(), vec![Some(1), None]);
    }

    #[test]
    fn test_exhausted_slow_call_is_picked_up_later() {
        let inner = ScriptedModel::new(vec![Stroke::down(1.0, 0.0), Stroke::down(2.0, 0.0)]);
        let calls = inner.call_log();
        let actor = ModelActor::spawn(SlowStart {
            inner,
            stall: Duration::from_millis(60),
            calls: 0,
        });
        let impatient = RetryPolicy {
            max_attempts: 1,
            call_timeout: Some(Duration::from_millis(5)),
            ..quick_policy(1)
        };
        let cancel = CancelToken::new();

        let err = actor.request(None, &impatient, &cancel).unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable { attempts: 1, .. }));
        assert_eq!(
            actor.request(None, &quick_policy(1), &cancel).unwrap(),
            Stroke::down(1.0, 0.0)
        );
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_cancel_interrupts_backoff() {
        let actor = ModelActor::spawn(ScriptedModel::new(vec![Stroke::end()]).with_failures(5));
        let policy = RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(10),
            max_backoff: Duration::from_secs(10),
            call_timeout: Some(Duration::from_secs(1)),
        };
        let cancel = CancelToken::new();
        let remote = cancel.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            remote.cancel();
        });

        let start = std::time::Instant::now();
        let err = actor.request(None, &policy, &cancel).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(5));
        canceller.join().unwrap();
    }

    #[test]
    fn test_cancelled_request() {
        let actor = ModelActor::spawn(Stalled);
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = actor.request(None, &quick_policy(3), &cancel).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            initial_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_millis(150),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(50));
        assert_eq!(policy.backoff(2), Duration::from_millis(100));
        assert_eq!(policy.backoff(3), Duration::from_millis(150));
        assert_eq!(policy.backoff(40), Duration::from_millis(150));
    }

    #[test]
    fn test_reset_replays() {
        let actor = ModelActor::spawn(ScriptedModel::new(vec![Stroke::down(1.0, 1.0)]));
        let policy = quick_policy(1);
        let cancel = CancelToken::new();
        assert_eq!(actor.request(None, &policy, &cancel).unwrap(), Stroke::down(1.0, 1.0));
        assert!(actor.request(None, &policy, &cancel).unwrap().is_end());
        actor.reset().unwrap();
        assert_eq!(actor.request(None, &policy, &cancel).unwrap(), Stroke::down(1.0, 1.0));
    }
}
