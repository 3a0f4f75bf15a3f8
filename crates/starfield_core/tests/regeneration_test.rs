//! # Regeneration Loop Tests
//!
//! Drives the full edit → settle → regenerate → release loop, both on the
//! owner's thread and through the background generator.

use std::collections::HashSet;
use std::time::Duration;

use starfield_core::{
    BackgroundGenerator, FieldController, ParameterEditor, ParameterEvent, RenderResources,
};
use starfield_procedural::{
    FieldSeed, GalaxyVariant, GenerationParameters, ParameterBounds, PointField, PointStyle,
};

/// Fake renderer tracking which handles are alive.
#[derive(Default)]
struct LiveSet {
    next: u64,
    live: HashSet<u64>,
    uploaded_points: Vec<usize>,
}

impl RenderResources for LiveSet {
    type Handle = u64;

    fn upload(&mut self, field: &PointField, _style: &PointStyle) -> u64 {
        self.next += 1;
        self.live.insert(self.next);
        self.uploaded_points.push(field.len());
        self.next
    }

    fn release(&mut self, handle: u64) {
        assert!(self.live.remove(&handle), "handle {handle} released twice");
    }
}

fn small_classic() -> GenerationParameters {
    GenerationParameters {
        count: 1_000,
        ..GenerationParameters::classic()
    }
}

/// Test: Each settled batch regenerates once and leaves one live handle.
#[test]
fn test_settled_batches_drive_controller() {
    let mut editor = ParameterEditor::new(small_classic(), ParameterBounds::default());
    let events = editor.subscribe();
    let mut controller = FieldController::new(LiveSet::default(), GalaxyVariant::Spin, PointStyle::default());
    let mut rng = FieldSeed::new(42).rng();

    editor.announce();
    for branches in 3..8 {
        editor.edit(|p| p.branches = branches);
        editor.edit(|p| p.count += 100);
        editor.finish_change();
    }

    let mut applied = 0;
    while let Ok(event) = events.try_recv() {
        if controller.handle_event(&event, &mut rng).unwrap() {
            applied += 1;
        }
        assert_eq!(controller.resources().live.len(), 1);
    }

    assert_eq!(applied, 6);
    assert_eq!(controller.current_revision(), Some(6));
    assert_eq!(controller.current_field().map(PointField::len), Some(1_500));
    assert_eq!(controller.stats().releases, 5);
}

/// Test: A count dragged past the bounds is clamped before generation.
#[test]
fn test_out_of_bounds_edit_is_clamped() {
    let mut editor = ParameterEditor::new(small_classic(), ParameterBounds::default());
    let events = editor.subscribe();
    let mut controller = FieldController::new(LiveSet::default(), GalaxyVariant::Spin, PointStyle::default());

    editor.edit(|p| p.count = 7);
    editor.finish_change();

    let event = events.try_recv().unwrap();
    controller.handle_event(&event, &mut FieldSeed::new(1).rng()).unwrap();
    assert_eq!(controller.current_field().map(PointField::len), Some(100));
}

/// Test: Events replayed out of order never roll the field back.
#[test]
fn test_replayed_events_do_not_roll_back() {
    let mut controller = FieldController::new(LiveSet::default(), GalaxyVariant::Shader, PointStyle::default());
    let mut rng = FieldSeed::new(5).rng();

    let event = |revision, count| ParameterEvent::Settled {
        revision,
        parameters: GenerationParameters {
            count,
            ..GenerationParameters::shader()
        },
    };

    assert!(controller.handle_event(&event(2, 200), &mut rng).unwrap());
    assert!(!controller.handle_event(&event(1, 100), &mut rng).unwrap());
    assert!(!controller.handle_event(&event(2, 300), &mut rng).unwrap());
    assert!(controller.handle_event(&event(3, 400), &mut rng).unwrap());

    assert_eq!(controller.resources().uploaded_points, vec![200, 400]);
    assert_eq!(controller.stats().stale_events, 2);
}

/// Test: Background results are installed only for the newest request.
#[test]
fn test_background_generation_installs_latest() {
    let generator = BackgroundGenerator::spawn().unwrap();
    let mut controller = FieldController::new(LiveSet::default(), GalaxyVariant::Shader, PointStyle::default());

    for count in [300_000, 250_000] {
        generator
            .submit(
                GenerationParameters {
                    count,
                    ..GenerationParameters::shader()
                },
                GalaxyVariant::Shader,
                None,
            )
            .unwrap();
    }
    let last = generator
        .submit(
            GenerationParameters {
                count: 2_000,
                ..GenerationParameters::shader()
            },
            GalaxyVariant::Shader,
            Some(FieldSeed::new(11)),
        )
        .unwrap();

    let completed = generator
        .wait_latest(Duration::from_secs(30))
        .unwrap()
        .expect("newest request should complete");
    assert_eq!(completed.id, last);

    controller.install(completed.field, completed.id);
    assert_eq!(controller.current_field().map(PointField::len), Some(2_000));
    assert_eq!(controller.resources().uploaded_points, vec![2_000]);
    assert!(controller.current_field().and_then(PointField::scales).is_some());
}
