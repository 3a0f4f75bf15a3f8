//! # Background Generator
//!
//! Million-point fields take long enough to stall a render loop, so they can
//! be generated on a dedicated thread.
//!
//! ## Architecture
//!
//! ```text
//!   Owner ──submit──> [Request Queue] ──> [Generator Thread] ──publish──> [LatestSlot] ──poll──> Owner
//!                      (crossbeam)          drains to newest                (latest wins)
//!                                           aborts when superseded
//! ```
//!
//! Ordering discipline: a request is superseded the moment a newer one is
//! submitted. The worker skips queued superseded requests, aborts a running
//! one at its next poll, and the slot refuses results for anything but the
//! newest id, so results are never applied out of order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use starfield_procedural::{
    entropy_rng, FieldSeed, GalaxyGenerator, GalaxyVariant, GenerationError, GenerationParameters,
    PointField,
};

use super::latest::{LatestSlot, RequestId};
use crate::error::{ControllerError, ControllerResult};

/// How long one wait on the slot lasts before the worker's liveness is rechecked.
const LIVENESS_CHECK_INTERVAL: Duration = Duration::from_millis(50);

/// One queued generation.
#[derive(Clone, Debug)]
struct GenerationRequest {
    id: RequestId,
    params: GenerationParameters,
    variant: GalaxyVariant,
    seed: Option<FieldSeed>,
}

/// What the worker publishes for a request.
type Outcome = Result<PointField, GenerationError>;

/// A finished field for the newest request.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedField {
    /// The request this field answers.
    pub id: RequestId,
    /// The generated field.
    pub field: PointField,
}

/// Runs galaxy generation off the owner's thread.
pub struct BackgroundGenerator {
    requests: Option<Sender<GenerationRequest>>,
    slot: Arc<LatestSlot<Outcome>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundGenerator {
    /// Spawns the worker thread.
    ///
    /// # Errors
    ///
    /// [`ControllerError::WorkerSpawn`] when the OS refuses the thread.
    pub fn spawn() -> ControllerResult<Self> {
        let (sender, receiver) = unbounded();
        let slot = Arc::new(LatestSlot::new());
        let running = Arc::new(AtomicBool::new(true));

        let worker = {
            let slot = Arc::clone(&slot);
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("starfield-generator".into())
                .spawn(move || {
                    run_worker(&receiver, &slot);
                    running.store(false, Ordering::Release);
                })
                .map_err(|e| ControllerError::WorkerSpawn(e.to_string()))?
        };

        tracing::debug!("background generator started");
        Ok(Self {
            requests: Some(sender),
            slot,
            running,
            worker: Some(worker),
        })
    }

    /// Queues a generation and returns its id. Every earlier request is
    /// superseded.
    ///
    /// `seed = None` draws from entropy.
    ///
    /// # Errors
    ///
    /// [`ControllerError::WorkerDisconnected`] when the worker has exited.
    pub fn submit(
        &self,
        params: GenerationParameters,
        variant: GalaxyVariant,
        seed: Option<FieldSeed>,
    ) -> ControllerResult<RequestId> {
        let sender = self.requests.as_ref().ok_or(ControllerError::WorkerDisconnected)?;
        let id = self.slot.begin();
        sender
            .send(GenerationRequest {
                id,
                params,
                variant,
                seed,
            })
            .map_err(|_| ControllerError::WorkerDisconnected)?;

        tracing::trace!(id, "generation submitted");
        Ok(id)
    }

    /// Id of the newest submitted request, `0` before the first.
    #[must_use]
    pub fn latest(&self) -> RequestId {
        self.slot.latest()
    }

    /// Whether the worker thread is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Returns the result for the newest request if it is ready.
    ///
    /// Results of superseded requests are never returned.
    ///
    /// # Errors
    ///
    /// The generator's error for the newest request, or
    /// [`ControllerError::WorkerDisconnected`] when the worker has exited
    /// without answering.
    pub fn poll_latest(&self) -> ControllerResult<Option<CompletedField>> {
        match self.slot.take() {
            Some((id, outcome)) => Self::complete(id, outcome),
            None if !self.is_running() => Err(ControllerError::WorkerDisconnected),
            None => Ok(None),
        }
    }

    /// Blocks up to `timeout` for the newest request's result.
    ///
    /// # Errors
    ///
    /// Same as [`BackgroundGenerator::poll_latest`].
    pub fn wait_latest(&self, timeout: Duration) -> ControllerResult<Option<CompletedField>> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if let Some((id, outcome)) = self.slot.wait_take(remaining.min(LIVENESS_CHECK_INTERVAL)) {
                return Self::complete(id, outcome);
            }
            if !self.is_running() {
                return Err(ControllerError::WorkerDisconnected);
            }
            if remaining.is_zero() {
                return Ok(None);
            }
        }
    }

    fn complete(id: RequestId, outcome: Outcome) -> ControllerResult<Option<CompletedField>> {
        outcome
            .map(|field| Some(CompletedField { id, field }))
            .map_err(ControllerError::from)
    }
}

impl Drop for BackgroundGenerator {
    fn drop(&mut self) {
        // Closing the queue ends the worker loop.
        self.requests = None;
        // Abort a generation in flight.
        self.slot.begin();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("generator thread panicked");
            }
        }
    }
}

fn run_worker(requests: &Receiver<GenerationRequest>, slot: &LatestSlot<Outcome>) {
    while let Ok(mut request) = requests.recv() {
        while let Ok(newer) = requests.try_recv() {
            tracing::trace!(skipped = request.id, "request superseded in queue");
            request = newer;
        }

        let id = request.id;
        if slot.is_superseded(id) {
            continue;
        }

        let outcome = match GalaxyGenerator::new(request.params, request.variant) {
            Ok(generator) => {
                let mut rng = request.seed.map_or_else(entropy_rng, FieldSeed::rng);
                match generator.generate_interruptible(&mut rng, || slot.is_superseded(id)) {
                    Some(field) => Ok(field),
                    None => {
                        tracing::trace!(id, "generation aborted, newer request pending");
                        continue;
                    }
                }
            }
            Err(error) => Err(error),
        };

        if !slot.publish(id, outcome) {
            tracing::trace!(id, "result discarded, newer request pending");
        }
    }
    tracing::debug!("background generator stopped");
}
