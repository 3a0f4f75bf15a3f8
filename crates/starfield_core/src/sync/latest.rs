//! # Latest-Wins Slot
//!
//! A single-value mailbox between a producer thread and its owner. Values are
//! tagged with a request id; only a value for the newest request is kept and
//! anything older is dropped on arrival.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Request identifier. `0` means "nothing requested yet".
pub type RequestId = u64;

/// Shared latest-wins mailbox.
pub struct LatestSlot<T> {
    /// Id of the newest request made by the owner.
    latest: AtomicU64,
    /// The stored value and the request it answers.
    value: Mutex<Option<(RequestId, T)>>,
    /// Signalled on every publish.
    ready: Condvar,
}

impl<T> LatestSlot<T> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
            value: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// Registers a new request and returns its id. Anything stored for an
    /// older request is dropped.
    pub fn begin(&self) -> RequestId {
        let id = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let mut value = self.value.lock();
        if value.as_ref().is_some_and(|(stored, _)| *stored < id) {
            *value = None;
        }
        id
    }

    /// Id of the newest request.
    #[must_use]
    pub fn latest(&self) -> RequestId {
        self.latest.load(Ordering::Acquire)
    }

    /// Whether `id` has been superseded by a newer request.
    #[must_use]
    pub fn is_superseded(&self, id: RequestId) -> bool {
        id != self.latest()
    }

    /// Stores `value` if it answers the newest request.
    ///
    /// Returns `false` (and drops the value) when it is stale.
    pub fn publish(&self, id: RequestId, value: T) -> bool {
        let mut slot = self.value.lock();
        if self.is_superseded(id) {
            return false;
        }
        *slot = Some((id, value));
        drop(slot);
        self.ready.notify_all();
        true
    }

    /// Takes the stored value if it answers the newest request.
    pub fn take(&self) -> Option<(RequestId, T)> {
        let mut slot = self.value.lock();
        Self::take_current(&mut slot, self.latest())
    }

    /// Like [`LatestSlot::take`], blocking up to `timeout` for a publish.
    pub fn wait_take(&self, timeout: Duration) -> Option<(RequestId, T)> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.value.lock();
        loop {
            if let Some(found) = Self::take_current(&mut slot, self.latest()) {
                return Some(found);
            }
            if self.ready.wait_until(&mut slot, deadline).timed_out() {
                return Self::take_current(&mut slot, self.latest());
            }
        }
    }

    fn take_current(slot: &mut Option<(RequestId, T)>, latest: RequestId) -> Option<(RequestId, T)> {
        match slot.take() {
            Some((id, value)) if id == latest => Some((id, value)),
            Some((id, _)) => {
                tracing::trace!(id, latest, "discarding superseded result");
                None
            }
            None => None,
        }
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
