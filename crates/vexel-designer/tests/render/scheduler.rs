use std::time::{Duration, Instant};

use vexel_core::constants::SELECTION_STROKE_WIDTH;
use vexel_core::EventBus;
use vexel_designer::render::{Frame, PaintStyle, RenderScheduler};
use vexel_designer::{Editor, ElementRecord, SceneTree, SelectionManager, ViewportManager};
use vexel_settings::RenderSettings;

use crate::recording::{Op, RecordingBackend};

fn scene() -> Vec<ElementRecord> {
    vec![
        ElementRecord::rectangle("near", 10.0, 10.0, 50.0, 50.0, Some([1.0, 0.0, 0.0, 1.0])),
        ElementRecord::rectangle("far", 5000.0, 5000.0, 50.0, 50.0, Some([0.0, 1.0, 0.0, 1.0])),
    ]
}

fn setup(backend: RecordingBackend) -> (Editor, RenderScheduler<RecordingBackend>) {
    let mut editor = Editor::new(800.0, 600.0);
    editor.load(&scene()).expect("valid scene");
    let scheduler = RenderScheduler::new(backend, RenderSettings::default(), editor.bus());
    (editor, scheduler)
}

#[test]
fn test_nothing_drawn_before_surface() {
    let (mut editor, mut scheduler) = setup(RecordingBackend::new());
    assert!(scheduler.needs_render());
    assert!(!editor.tick(&mut scheduler, Instant::now()).expect("tick"));
    assert!(scheduler.backend().ops.is_empty());
    assert_eq!(scheduler.frame_count(), 0);
}

#[test]
fn test_draws_only_after_changes() {
    let (mut editor, mut scheduler) = setup(RecordingBackend::new());
    scheduler.initialize(800, 600).expect("surface");
    let now = Instant::now();

    assert!(editor.tick(&mut scheduler, now).expect("tick"));
    assert!(!editor.tick(&mut scheduler, now).expect("tick"));
    assert!(!editor.tick(&mut scheduler, now).expect("tick"));
    assert_eq!(scheduler.frame_count(), 1);

    editor.tree_mut().translate("near", 5.0, 0.0);
    assert!(editor.tick(&mut scheduler, now).expect("tick"));
    assert!(!editor.tick(&mut scheduler, now).expect("tick"));

    editor.viewport_mut().pan(1.0, 1.0);
    assert!(editor.tick(&mut scheduler, now).expect("tick"));

    editor.select(vec!["near".to_string()]);
    assert!(editor.tick(&mut scheduler, now).expect("tick"));
    assert_eq!(scheduler.frame_count(), 4);
}

#[test]
fn test_frame_is_balanced_and_releases_paints() {
    let (mut editor, mut scheduler) = setup(RecordingBackend::new());
    scheduler.initialize(800, 600).expect("surface");
    editor.select(vec!["near".to_string()]);
    editor.tick(&mut scheduler, Instant::now()).expect("tick");

    let backend = scheduler.backend();
    assert_eq!(backend.depth(), 0);
    assert_eq!(backend.live_paints(), 0);
    assert_eq!(backend.count(|op| *op == Op::Save), backend.count(|op| *op == Op::Restore));
    assert!(matches!(backend.ops.get(1), Some(Op::Clear(_))));
    assert_eq!(backend.ops.last(), Some(&Op::Flush));
}

#[test]
fn test_offscreen_nodes_are_culled() {
    let (mut editor, mut scheduler) = setup(RecordingBackend::new());
    scheduler.initialize(800, 600).expect("surface");
    editor.tick(&mut scheduler, Instant::now()).expect("tick");

    let stats = scheduler.last_stats();
    assert_eq!((stats.drawn, stats.culled), (1, 1));
    assert_eq!(scheduler.backend().count(|op| matches!(op, Op::Rect(..))), 1);
}

#[test]
fn test_culling_can_be_disabled() {
    let mut editor = Editor::new(800.0, 600.0);
    editor.load(&scene()).expect("valid scene");
    let settings = RenderSettings {
        culling: false,
        ..RenderSettings::default()
    };
    let mut scheduler = RenderScheduler::new(RecordingBackend::new(), settings, editor.bus());
    scheduler.initialize(800, 600).expect("surface");
    editor.tick(&mut scheduler, Instant::now()).expect("tick");

    let stats = scheduler.last_stats();
    assert_eq!((stats.drawn, stats.culled), (2, 0));
}

#[test]
fn test_hidden_and_unknown_nodes_are_skipped() {
    let json = r#"[
        {"id": "shown", "type": "RECTANGLE", "width": 10, "height": 10,
         "fillPaints": [{"color": [0, 0, 1, 1]}]},
        {"id": "hidden", "type": "CIRCLE", "width": 10, "height": 10, "visible": false,
         "fillPaints": [{"color": [0, 0, 1, 1]}]},
        {"id": "odd", "type": "POLYGON", "width": 10, "height": 10,
         "fillPaints": [{"color": [0, 0, 1, 1]}]}
    ]"#;
    let mut editor = Editor::new(800.0, 600.0);
    editor.load_json(json).expect("valid json");
    let mut scheduler =
        RenderScheduler::new(RecordingBackend::new(), RenderSettings::default(), editor.bus());
    scheduler.initialize(800, 600).expect("surface");
    editor.tick(&mut scheduler, Instant::now()).expect("tick");

    assert_eq!(scheduler.last_stats().drawn, 1);
    let backend = scheduler.backend();
    assert_eq!(backend.count(|op| matches!(op, Op::Circle(..))), 0);
    assert_eq!(backend.count(|op| matches!(op, Op::Rect(..))), 1);
}

#[test]
fn test_group_opacity_multiplies_into_fills() {
    let mut child = ElementRecord::rectangle("child", 0.0, 0.0, 10.0, 10.0, Some([1.0, 0.0, 0.0, 0.5]));
    child.opacity = Some(0.5);
    let mut group = ElementRecord::group("g", 0.0, 0.0, vec![child]);
    group.opacity = Some(0.5);

    let mut editor = Editor::new(800.0, 600.0);
    editor.load(&[group]).expect("valid scene");
    let mut scheduler =
        RenderScheduler::new(RecordingBackend::new(), RenderSettings::default(), editor.bus());
    scheduler.initialize(800, 600).expect("surface");
    editor.tick(&mut scheduler, Instant::now()).expect("tick");

    let fill = scheduler.backend().specs[0];
    assert_eq!(fill.style, PaintStyle::Fill);
    assert_eq!(fill.color[3], 0.125);
}

#[test]
fn test_overlay_strokes_stay_screen_width() {
    let (mut editor, mut scheduler) = setup(RecordingBackend::new());
    scheduler.initialize(800, 600).expect("surface");
    editor.viewport_mut().zoom(4.0, 0.0, 0.0);
    editor.select(vec!["near".to_string()]);
    editor.tick(&mut scheduler, Instant::now()).expect("tick");

    let strokes: Vec<f64> = scheduler
        .backend()
        .specs
        .iter()
        .filter_map(|spec| match spec.style {
            PaintStyle::Stroke(width) => Some(width),
            PaintStyle::Fill => None,
        })
        .collect();
    assert_eq!(strokes, vec![SELECTION_STROKE_WIDTH / 4.0]);
}

#[test]
fn test_resize_is_debounced() {
    let (mut editor, mut scheduler) = setup(RecordingBackend::new());
    scheduler.initialize(800, 600).expect("surface");
    let start = Instant::now();
    editor.tick(&mut scheduler, start).expect("tick");

    editor.resize(&mut scheduler, 400, 300, start).expect("resize");
    editor
        .resize(&mut scheduler, 500, 400, start + Duration::from_millis(50))
        .expect("resize");
    editor.tick(&mut scheduler, start + Duration::from_millis(120)).expect("tick");
    assert!(scheduler.has_pending_resize());
    assert_eq!(scheduler.backend().surfaces(), vec![(800, 600)]);

    assert!(editor
        .tick(&mut scheduler, start + Duration::from_millis(150))
        .expect("tick"));
    assert!(!scheduler.has_pending_resize());
    assert_eq!(scheduler.backend().surfaces(), vec![(800, 600), (500, 400)]);
    assert_eq!(editor.viewport_state().width, 500.0);
}

#[test]
fn test_surface_failure_then_recovery() {
    let (mut editor, mut scheduler) = setup(RecordingBackend::failing());
    assert!(scheduler.initialize(800, 600).is_err());
    assert!(!scheduler.is_surface_ready());
    assert!(!editor.tick(&mut scheduler, Instant::now()).expect("tick"));

    scheduler.backend_mut().fail_surface = false;
    let start = Instant::now();
    editor.resize(&mut scheduler, 640, 480, start).expect("resize");
    assert!(editor
        .tick(&mut scheduler, start + Duration::from_millis(100))
        .expect("tick"));
    assert!(scheduler.is_surface_ready());
}

#[test]
fn test_failed_resize_surfaces_error() {
    let (mut editor, mut scheduler) = setup(RecordingBackend::new());
    scheduler.initialize(800, 600).expect("surface");
    scheduler.backend_mut().fail_surface = true;

    let start = Instant::now();
    editor.resize(&mut scheduler, 0, 0, start).expect("resize");
    assert!(editor
        .tick(&mut scheduler, start + Duration::from_millis(100))
        .is_err());
    assert!(!scheduler.is_surface_ready());
}

#[test]
fn test_drop_unsubscribes() {
    let editor = Editor::new(800.0, 600.0);
    let bus = editor.bus();
    let before = bus.subscriber_count();
    {
        let _scheduler =
            RenderScheduler::new(RecordingBackend::new(), RenderSettings::default(), editor.bus());
        assert_eq!(bus.subscriber_count(), before + 1);
    }
    assert_eq!(bus.subscriber_count(), before);
}

#[test]
fn test_standalone_tree_repaints_only_after_edits() {
    let mut tree = SceneTree::new();
    tree.build(&scene()).expect("valid scene");
    let viewport = ViewportManager::new(800.0, 600.0);
    let selection = SelectionManager::new();
    let mut scheduler =
        RenderScheduler::new(RecordingBackend::new(), RenderSettings::default(), EventBus::shared());
    scheduler.initialize(800, 600).expect("surface");
    let now = Instant::now();

    let mut drawn = Vec::new();
    for _ in 0..3 {
        let frame = Frame {
            tree: &tree,
            viewport: viewport.state(),
            selection: selection.state(),
        };
        drawn.push(scheduler.tick(now, &frame).expect("tick"));
    }
    assert_eq!(drawn, vec![true, false, false]);
    assert!(tree.has_dirty_nodes());

    tree.translate("near", 5.0, 0.0);
    let frame = Frame {
        tree: &tree,
        viewport: viewport.state(),
        selection: selection.state(),
    };
    assert!(scheduler.tick(now, &frame).expect("tick"));
    assert!(!scheduler.tick(now, &frame).expect("tick"));
    assert_eq!(scheduler.frame_count(), 2);
}
