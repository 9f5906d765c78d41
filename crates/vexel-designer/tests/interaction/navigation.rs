use vexel_designer::{
    Editor, ElementRecord, InputEvent, KeyEvent, Modifiers, MouseButton, PointerEvent, StateKind,
    WheelEvent,
};
use vexel_settings::{Config, MainModifier};

fn editor() -> Editor {
    let mut config = Config::default();
    config.input.main_modifier = MainModifier::Control;
    let mut editor = Editor::with_config(800.0, 600.0, &config).expect("valid config");
    editor
        .load(&[ElementRecord::rectangle("r1", 0.0, 0.0, 100.0, 100.0, None)])
        .expect("valid scene");
    editor
}

fn wheel(x: f64, y: f64, delta_x: f64, delta_y: f64, modifiers: Modifiers) -> InputEvent {
    InputEvent::Wheel(WheelEvent {
        x,
        y,
        delta_x,
        delta_y,
        modifiers,
    })
}

fn key(key: &str, modifiers: Modifiers) -> InputEvent {
    InputEvent::KeyDown(KeyEvent::new(key, modifiers))
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}

#[test]
fn test_main_modifier_wheel_zooms_about_cursor() {
    let mut editor = editor();
    let anchor = editor.viewport().screen_to_world(200.0, 100.0);

    editor.handle_input(&wheel(200.0, 100.0, 0.0, -100.0, Modifiers::ctrl()));
    assert_close(editor.viewport_state().scale, 2.0);

    let after = editor.viewport().screen_to_world(200.0, 100.0);
    assert_close(after.x, anchor.x);
    assert_close(after.y, anchor.y);
}

#[test]
fn test_plain_wheel_pans() {
    let mut editor = editor();
    editor.handle_input(&wheel(0.0, 0.0, 10.0, 20.0, Modifiers::NONE));
    let state = editor.viewport_state();
    assert_eq!((state.offset_x, state.offset_y), (-10.0, -20.0));
    assert_eq!(state.scale, 1.0);
}

#[test]
fn test_pinch_zoom_uses_finer_divisor() {
    let mut editor = editor();
    editor.handle_input(&wheel(0.0, 0.0, 0.0, -2.5, Modifiers::meta()));
    assert_close(editor.viewport_state().scale, 1.5);
}

#[test]
fn test_zoom_shortcuts() {
    let mut editor = editor();
    editor.handle_input(&key("=", Modifiers::ctrl()));
    assert_close(editor.viewport_state().scale, 2.0);
    editor.handle_input(&key("+", Modifiers::ctrl()));
    assert_close(editor.viewport_state().scale, 4.0);
    editor.handle_input(&key("-", Modifiers::ctrl()));
    assert_close(editor.viewport_state().scale, 2.0);

    editor.viewport_mut().pan(15.0, 15.0);
    editor.handle_input(&key("0", Modifiers::ctrl()));
    let state = editor.viewport_state();
    assert_eq!((state.scale, state.offset_x, state.offset_y), (1.0, 0.0, 0.0));
}

#[test]
fn test_shortcuts_need_main_modifier() {
    let mut editor = editor();
    editor.handle_input(&key("=", Modifiers::NONE));
    editor.handle_input(&key("=", Modifiers::meta()));
    assert_eq!(editor.viewport_state().scale, 1.0);
}

#[test]
fn test_navigation_while_panning() {
    let mut editor = editor();
    editor.handle_input(&InputEvent::MouseDown(
        PointerEvent::at(400.0, 300.0).with_button(MouseButton::Middle),
    ));
    assert_eq!(editor.interaction_state(), StateKind::Panning);

    editor.handle_input(&key("=", Modifiers::ctrl()));
    assert_close(editor.viewport_state().scale, 2.0);
    assert_eq!(editor.interaction_state(), StateKind::Panning);

    editor.handle_input(&wheel(400.0, 300.0, 0.0, 100.0, Modifiers::ctrl()));
    assert_close(editor.viewport_state().scale, 0.2);
}

#[test]
fn test_zoomed_view_maps_clicks_to_world() {
    let mut editor = editor();
    editor.viewport_mut().zoom(2.0, 0.0, 0.0);

    // Screen (150, 150) is world (75, 75), inside r1
    editor.handle_input(&InputEvent::MouseDown(
        PointerEvent::at(150.0, 150.0).with_button(MouseButton::Primary),
    ));
    editor.handle_input(&InputEvent::MouseUp(PointerEvent::at(170.0, 150.0)));

    assert_eq!(editor.tree().absolute_matrix("r1").expect("exists")[4], 10.0);
}
