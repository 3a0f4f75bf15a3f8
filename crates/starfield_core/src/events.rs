//! # Parameter Events
//!
//! The editing surface mutates a parameter record freely, but only announces
//! it once a batch of edits has settled (the slider was released, the color
//! picker closed). The owner of the field reacts to that announcement; the
//! generator is never called from inside the editing callback.
//!
//! ## Event Flow
//! ```text
//! 1. Panel: editor.edit(|p| p.branches = 5)      (no event)
//! 2. Panel: editor.edit(|p| p.spin = -2.0)       (no event)
//! 3. Panel: editor.finish_change()               -> ParameterEvent::Settled { revision: 1 }
//! 4. Owner: controller.handle_event(event, rng)  -> regenerate, release old field
//! ```

use crossbeam_channel::{Receiver, Sender};
use starfield_procedural::{GenerationParameters, ParameterBounds};

/// Notifications emitted by a [`ParameterEditor`].
#[derive(Clone, Debug, PartialEq)]
pub enum ParameterEvent {
    /// A batch of edits settled.
    Settled {
        /// Monotonically increasing revision, starting at 1.
        revision: u64,
        /// Snapshot of the parameters, clamped to the editing bounds.
        parameters: GenerationParameters,
    },
}

impl ParameterEvent {
    /// Revision carried by the event.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        match self {
            Self::Settled { revision, .. } => *revision,
        }
    }
}

/// A live-mutable parameter record that announces settled batches.
///
/// Every subscriber gets its own queue and sees every event. Queues whose
/// receiver was dropped are pruned on the next announcement, and nothing is
/// queued while nobody subscribes.
pub struct ParameterEditor {
    parameters: GenerationParameters,
    bounds: ParameterBounds,
    revision: u64,
    dirty: bool,
    subscribers: Vec<Sender<ParameterEvent>>,
}

impl ParameterEditor {
    /// Creates an editor around `initial`.
    #[must_use]
    pub fn new(initial: GenerationParameters, bounds: ParameterBounds) -> Self {
        Self {
            parameters: initial,
            bounds,
            revision: 0,
            dirty: false,
            subscribers: Vec::new(),
        }
    }

    /// Current (possibly unsettled) parameters.
    #[must_use]
    pub const fn parameters(&self) -> &GenerationParameters {
        &self.parameters
    }

    /// Editing bounds.
    #[must_use]
    pub const fn bounds(&self) -> &ParameterBounds {
        &self.bounds
    }

    /// Revision of the last settled batch, `0` before the first.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether edits happened since the last settle.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mutates the parameters without notifying anyone.
    pub fn edit(&mut self, change: impl FnOnce(&mut GenerationParameters)) {
        change(&mut self.parameters);
        self.dirty = true;
    }

    /// Ends a batch of edits.
    ///
    /// Emits one [`ParameterEvent::Settled`] with the clamped parameters and
    /// returns its revision, or returns `None` when nothing changed.
    pub fn finish_change(&mut self) -> Option<u64> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.parameters = self.parameters.clamped(&self.bounds);
        self.revision += 1;

        let event = ParameterEvent::Settled {
            revision: self.revision,
            parameters: self.parameters.clone(),
        };
        self.broadcast(&event);
        tracing::debug!(
            revision = self.revision,
            subscribers = self.subscribers.len(),
            "parameters settled"
        );

        Some(self.revision)
    }

    /// Emits a settled event for the current parameters even without edits,
    /// used for the initial generation.
    pub fn announce(&mut self) -> u64 {
        self.dirty = true;
        self.finish_change().unwrap_or(self.revision)
    }

    /// Opens a new queue receiving every settled event from now on.
    #[must_use]
    pub fn subscribe(&mut self) -> Receiver<ParameterEvent> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Number of live subscriber queues, as of the last announcement.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn broadcast(&mut self, event: &ParameterEvent) {
        let before = self.subscribers.len();
        // Unbounded queues only fail once their receiver is gone.
        self.subscribers.retain(|subscriber| subscriber.send(event.clone()).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            tracing::trace!(dropped, "pruned closed event subscribers");
        }
    }
}
