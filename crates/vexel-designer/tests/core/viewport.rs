use std::sync::{Arc, Mutex};

use vexel_designer::geometry::{BoundingBox, Point};
use vexel_designer::viewport::{ViewportManager, ViewportState};

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}

#[test]
fn test_zoom_keeps_point_under_cursor() {
    let mut viewport = ViewportManager::new(800.0, 600.0);
    viewport.pan(30.0, -20.0);
    let before = viewport.screen_to_world(100.0, 100.0);

    viewport.zoom(2.0, 100.0, 100.0);
    let after = viewport.screen_to_world(100.0, 100.0);
    assert_close(viewport.scale(), 2.0);
    assert_close(before.x, after.x);
    assert_close(before.y, after.y);

    let back = viewport.world_to_screen(after);
    assert_close(back.x, 100.0);
    assert_close(back.y, 100.0);
}

#[test]
fn test_zoom_delta_is_clamped() {
    let mut viewport = ViewportManager::new(800.0, 600.0);
    viewport.zoom_delta(-5.0, 0.0, 0.0);
    assert_close(viewport.scale(), 0.1);

    viewport.reset();
    viewport.zoom_delta(0.5, 0.0, 0.0);
    assert_close(viewport.scale(), 1.5);
}

#[test]
fn test_non_finite_zoom_delta_is_ignored() {
    let mut viewport = ViewportManager::new(800.0, 600.0);
    viewport.zoom(2.0, 0.0, 0.0);
    viewport.zoom_delta(f64::NAN, 100.0, 100.0);
    viewport.zoom_delta(f64::INFINITY, 100.0, 100.0);
    assert_close(viewport.scale(), 2.0);
}

#[test]
fn test_zoom_steps() {
    let mut viewport = ViewportManager::new(800.0, 600.0);
    viewport.zoom_in_step(400.0, 300.0);
    assert_close(viewport.scale(), 2.0);

    viewport.reset();
    viewport.zoom_out_step(400.0, 300.0);
    assert_close(viewport.scale(), 0.5);

    viewport.zoom(1.5, 0.0, 0.0);
    viewport.zoom_in_step(0.0, 0.0);
    assert_close(viewport.scale(), 2.0);
}

#[test]
fn test_fit_to_content() {
    let mut viewport = ViewportManager::new(800.0, 600.0);
    viewport.fit_to_content(800.0, 600.0, &BoundingBox::new(0.0, 0.0, 100.0, 50.0));

    assert_close(viewport.scale(), 7.2);
    let center = viewport.world_to_screen(Point::new(50.0, 25.0));
    assert_close(center.x, 400.0);
    assert_close(center.y, 300.0);
}

#[test]
fn test_fit_degenerate_bounds_keeps_scale() {
    let mut viewport = ViewportManager::new(800.0, 600.0);
    viewport.zoom(3.0, 0.0, 0.0);
    viewport.fit_to_content(800.0, 600.0, &BoundingBox::new(10.0, 10.0, 0.0, 0.0));

    assert_close(viewport.scale(), 3.0);
    let center = viewport.world_to_screen(Point::new(10.0, 10.0));
    assert_close(center.x, 400.0);
    assert_close(center.y, 300.0);
}

#[test]
fn test_scale_limits() {
    let mut viewport = ViewportManager::new(800.0, 600.0);
    assert!(viewport.set_scale_limits(0.0, 4.0).is_err());
    assert!(viewport.set_scale_limits(2.0, 1.0).is_err());

    viewport.zoom(10.0, 0.0, 0.0);
    viewport.set_scale_limits(0.5, 4.0).expect("valid limits");
    assert_close(viewport.scale(), 4.0);

    viewport.zoom(0.01, 0.0, 0.0);
    assert_close(viewport.scale(), 0.5);
}

#[test]
fn test_state_change_listeners() {
    let viewport_states = Arc::new(Mutex::new(Vec::<ViewportState>::new()));
    let sink = Arc::clone(&viewport_states);

    let mut viewport = ViewportManager::new(800.0, 600.0);
    let id = viewport.add_state_change_listener(move |state| {
        sink.lock().expect("lock").push(*state);
    });

    viewport.pan(10.0, 5.0);
    {
        let seen = viewport_states.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_close(seen[0].offset_x, 10.0);
        assert_close(seen[0].offset_y, 5.0);
    }

    assert!(viewport.remove_state_change_listener(id));
    viewport.pan(1.0, 1.0);
    assert_eq!(viewport_states.lock().expect("lock").len(), 1);
}

#[test]
fn test_reset_and_world_rect() {
    let mut viewport = ViewportManager::new(800.0, 600.0);
    viewport.zoom(2.0, 400.0, 300.0);
    let rect = viewport.state().world_rect();
    assert_close(rect.x, 200.0);
    assert_close(rect.y, 150.0);
    assert_close(rect.width, 400.0);
    assert_close(rect.height, 300.0);

    viewport.reset();
    assert_eq!(
        viewport.state(),
        ViewportState {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    );
}
