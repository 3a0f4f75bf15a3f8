//! # Field Controller
//!
//! Owns the one field currently on screen and the renderer resources built
//! from it.
//!
//! ## Replacement Order
//!
//! ```text
//! regenerate(params)
//!   1. generate new field         (fails => nothing changes)
//!   2. upload new field           -> new handle
//!   3. release previous handle    (exactly once)
//!   4. install new field + handle
//! ```
//!
//! Repeated parameter tweaks therefore never accumulate renderer resources:
//! at most two handles exist, and only between steps 2 and 3.

use starfield_procedural::{
    GalaxyGenerator, GalaxyVariant, GenerationParameters, PointField, PointStyle, RandomSource,
};

use crate::error::ControllerResult;
use crate::events::ParameterEvent;

/// The renderer side of a field: turns buffers into something drawable and
/// frees it again.
pub trait RenderResources {
    /// Opaque handle to uploaded resources.
    type Handle;

    /// Uploads a field.
    fn upload(&mut self, field: &PointField, style: &PointStyle) -> Self::Handle;

    /// Frees resources previously returned by [`RenderResources::upload`].
    fn release(&mut self, handle: Self::Handle);
}

/// An installed field and its renderer handle.
struct Installed<H> {
    field: PointField,
    handle: H,
    revision: u64,
}

/// Counters for debugging/profiling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControllerStats {
    /// Fields installed.
    pub installs: u64,
    /// Handles released.
    pub releases: u64,
    /// Events ignored because a newer revision was already installed.
    pub stale_events: u64,
}

/// Explicit owner of the current field.
pub struct FieldController<R: RenderResources> {
    resources: R,
    variant: GalaxyVariant,
    style: PointStyle,
    current: Option<Installed<R::Handle>>,
    stats: ControllerStats,
}

impl<R: RenderResources> FieldController<R> {
    /// Creates a controller with nothing installed.
    pub fn new(resources: R, variant: GalaxyVariant, style: PointStyle) -> Self {
        Self {
            resources,
            variant,
            style,
            current: None,
            stats: ControllerStats::default(),
        }
    }

    /// Variant used by [`FieldController::regenerate`].
    pub const fn variant(&self) -> GalaxyVariant {
        self.variant
    }

    /// Switches the variant; takes effect on the next regeneration.
    pub fn set_variant(&mut self, variant: GalaxyVariant) {
        self.variant = variant;
    }

    /// Style handed to the renderer on upload.
    pub const fn style(&self) -> &PointStyle {
        &self.style
    }

    /// The installed field, if any.
    pub fn current_field(&self) -> Option<&PointField> {
        self.current.as_ref().map(|installed| &installed.field)
    }

    /// The installed renderer handle, if any.
    pub fn current_handle(&self) -> Option<&R::Handle> {
        self.current.as_ref().map(|installed| &installed.handle)
    }

    /// Revision of the installed field, `None` when empty.
    pub fn current_revision(&self) -> Option<u64> {
        self.current.as_ref().map(|installed| installed.revision)
    }

    /// Counters.
    pub const fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Access to the renderer collaborator.
    pub const fn resources(&self) -> &R {
        &self.resources
    }

    /// Generates a field from `params` and replaces the installed one.
    ///
    /// Uses the revision after the installed one.
    ///
    /// # Errors
    ///
    /// Returns the generator's error; the installed field is untouched.
    pub fn regenerate<G: RandomSource + ?Sized>(
        &mut self,
        params: &GenerationParameters,
        rng: &mut G,
    ) -> ControllerResult<&PointField> {
        let revision = self.current_revision().map_or(1, |r| r + 1);
        self.regenerate_at(params, revision, rng)
    }

    fn regenerate_at<G: RandomSource + ?Sized>(
        &mut self,
        params: &GenerationParameters,
        revision: u64,
        rng: &mut G,
    ) -> ControllerResult<&PointField> {
        let generator = GalaxyGenerator::new(params.clone(), self.variant)?;
        let field = generator.generate(rng);
        Ok(self.install(field, revision))
    }

    /// Applies a settled-parameters event.
    ///
    /// Returns `Ok(false)` and changes nothing when the event's revision is
    /// not newer than the installed field's.
    ///
    /// # Errors
    ///
    /// Returns the generator's error; the installed field is untouched.
    pub fn handle_event<G: RandomSource + ?Sized>(
        &mut self,
        event: &ParameterEvent,
        rng: &mut G,
    ) -> ControllerResult<bool> {
        let ParameterEvent::Settled { revision, parameters } = event;

        if self.current_revision().is_some_and(|installed| *revision <= installed) {
            self.stats.stale_events += 1;
            tracing::trace!(revision, "ignoring stale parameter event");
            return Ok(false);
        }

        self.regenerate_at(parameters, *revision, rng)?;
        Ok(true)
    }

    /// Installs an already generated field (e.g. from a background worker),
    /// releasing the previous one.
    pub fn install(&mut self, field: PointField, revision: u64) -> &PointField {
        let handle = self.resources.upload(&field, &self.style);
        self.release_current();

        tracing::info!(revision, points = field.len(), "field installed");
        self.stats.installs += 1;

        &self
            .current
            .insert(Installed {
                field,
                handle,
                revision,
            })
            .field
    }

    /// Releases the installed field, leaving the controller empty.
    pub fn clear(&mut self) {
        self.release_current();
    }

    fn release_current(&mut self) {
        if let Some(previous) = self.current.take() {
            self.resources.release(previous.handle);
            self.stats.releases += 1;
            tracing::info!(revision = previous.revision, "field released");
        }
    }
}

impl<R: RenderResources> Drop for FieldController<R> {
    fn drop(&mut self) {
        self.release_current();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfield_procedural::{ConstantSource, FieldSeed, GenerationError};

    /// Records uploads and releases; handles are sequence numbers.
    #[derive(Default)]
    struct Recorder {
        next: u32,
        live: Vec<u32>,
        released: Vec<u32>,
    }

    impl RenderResources for Recorder {
        type Handle = u32;

        fn upload(&mut self, _field: &PointField, _style: &PointStyle) -> u32 {
            self.next += 1;
            self.live.push(self.next);
            self.next
        }

        fn release(&mut self, handle: u32) {
            self.live.retain(|h| *h != handle);
            self.released.push(handle);
        }
    }

    fn small() -> GenerationParameters {
        GenerationParameters {
            count: 64,
            ..GenerationParameters::classic()
        }
    }

    #[test]
    fn test_regeneration_releases_previous() {
        let mut controller = FieldController::new(Recorder::default(), GalaxyVariant::Spin, PointStyle::default());
        let mut rng = FieldSeed::new(1).rng();

        for _ in 0..5 {
            controller.regenerate(&small(), &mut rng).unwrap();
            assert_eq!(controller.resources().live.len(), 1, "exactly one live handle");
        }

        assert_eq!(controller.resources().released, vec![1, 2, 3, 4]);
        assert_eq!(controller.current_handle(), Some(&5));
        assert_eq!(controller.current_revision(), Some(5));
        assert_eq!(controller.stats().installs, 5);
        assert_eq!(controller.stats().releases, 4);
    }

    #[test]
    fn test_failed_regeneration_keeps_current() {
        let mut controller = FieldController::new(Recorder::default(), GalaxyVariant::Spin, PointStyle::default());
        let mut rng = FieldSeed::new(2).rng();
        controller.regenerate(&small(), &mut rng).unwrap();

        let broken = GenerationParameters { branches: 0, ..small() };
        let err = controller.regenerate(&broken, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            crate::ControllerError::Generation(GenerationError::InvalidParameter { .. })
        ));

        assert_eq!(controller.current_handle(), Some(&1));
        assert!(controller.resources().released.is_empty());
        assert_eq!(controller.current_field().map(PointField::len), Some(64));
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let mut controller = FieldController::new(Recorder::default(), GalaxyVariant::Shader, PointStyle::default());
        let mut rng = ConstantSource::midpoint();

        let newer = ParameterEvent::Settled { revision: 3, parameters: small() };
        let older = ParameterEvent::Settled {
            revision: 2,
            parameters: GenerationParameters { count: 10, ..small() },
        };

        assert!(controller.handle_event(&newer, &mut rng).unwrap());
        assert!(!controller.handle_event(&older, &mut rng).unwrap());
        assert_eq!(controller.current_revision(), Some(3));
        assert_eq!(controller.current_field().map(PointField::len), Some(64));
        assert_eq!(controller.stats().stale_events, 1);
    }

    #[test]
    fn test_clear_and_drop_release() {
        let mut controller = FieldController::new(Recorder::default(), GalaxyVariant::Spin, PointStyle::default());
        let mut rng = FieldSeed::new(3).rng();

        controller.regenerate(&small(), &mut rng).unwrap();
        controller.clear();
        assert!(controller.current_field().is_none());
        assert_eq!(controller.resources().released, vec![1]);

        // Clearing twice releases nothing more.
        controller.clear();
        assert_eq!(controller.stats().releases, 1);
    }

    #[test]
    fn test_drop_releases_installed_handle() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Shared(Rc<RefCell<Vec<u8>>>);

        impl RenderResources for Shared {
            type Handle = u8;
            fn upload(&mut self, _: &PointField, _: &PointStyle) -> u8 {
                7
            }
            fn release(&mut self, handle: u8) {
                self.0.borrow_mut().push(handle);
            }
        }

        let released = Rc::new(RefCell::new(Vec::new()));
        {
            let mut controller =
                FieldController::new(Shared(Rc::clone(&released)), GalaxyVariant::Spin, PointStyle::default());
            controller.regenerate(&small(), &mut FieldSeed::new(4).rng()).unwrap();
        }
        assert_eq!(*released.borrow(), vec![7]);
    }
}
