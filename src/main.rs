//! Headless demo: loads a scene, replays a drag and writes one frame as PNG.
//!
//! ```text
//! vexel [SCENE.json] [OUTPUT.png]
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use vexel::designer::{Modifiers, MouseButton, PointerEvent, WheelEvent};
use vexel::{init_logging, Editor, ElementRecord, InputEvent, RenderScheduler, SettingsManager, SkiaBackend};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn demo_scene() -> Vec<ElementRecord> {
    vec![
        ElementRecord::rectangle("r1", 40.0, 40.0, 160.0, 100.0, Some([0.9, 0.3, 0.2, 1.0])),
        ElementRecord::circle("c1", 260.0, 60.0, 50.0, Some([0.2, 0.5, 0.9, 1.0])),
        ElementRecord::group(
            "g1",
            60.0,
            200.0,
            vec![
                ElementRecord::rectangle("g1-a", 0.0, 0.0, 80.0, 80.0, Some([0.3, 0.8, 0.4, 1.0])),
                ElementRecord::rectangle("g1-b", 100.0, 20.0, 80.0, 40.0, Some([0.9, 0.8, 0.2, 1.0])),
            ],
        ),
    ]
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("vexel {} (built {})", vexel::VERSION, vexel::BUILD_DATE);

    let mut args = std::env::args().skip(1);
    let scene_path = args.next().map(PathBuf::from);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("vexel-frame.png"));

    let settings = SettingsManager::load_default_location();
    let config = settings.config();

    let mut editor = Editor::with_config(f64::from(WIDTH), f64::from(HEIGHT), config)?;
    match &scene_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            editor.load_json(&json)?;
        }
        None => editor.load(&demo_scene())?,
    }
    tracing::info!("Loaded {} nodes", editor.tree().len());

    let mut scheduler =
        RenderScheduler::new(SkiaBackend::new(), config.render.clone(), editor.bus());
    scheduler.initialize(WIDTH, HEIGHT)?;
    editor.fit_to_content();

    replay_drag(&mut editor);

    let drawn = editor.tick(&mut scheduler, Instant::now())?;
    tracing::info!(
        "Frame drawn: {} ({}), {}",
        drawn,
        scheduler.frame_count(),
        editor.viewport_state()
    );

    scheduler.backend().save_png(&output)?;
    tracing::info!("Wrote {}", output.display());

    for id in &editor.selection().sorted_ids() {
        if let Some(record) = editor.to_element(id) {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}

/// Grabs the first top-level node, drags it 40px right and 20px down,
/// then zooms in one wheel notch about the drop point.
fn replay_drag(editor: &mut Editor) {
    let tree = editor.tree();
    let first = tree
        .node(tree.root_key())
        .and_then(|root| root.children().first().copied())
        .and_then(|key| tree.absolute_bounding_box_of(key));
    let Some(bounds) = first else {
        tracing::warn!("Empty scene, nothing to drag");
        return;
    };

    let start = editor.viewport().world_to_screen(bounds.center());
    let press = PointerEvent::at(start.x, start.y).with_button(MouseButton::Primary);
    editor.handle_input(&InputEvent::MouseDown(press));
    for step in 1..=4 {
        let t = f64::from(step) / 4.0;
        let at = PointerEvent::at(start.x + 40.0 * t, start.y + 20.0 * t);
        editor.handle_input(&InputEvent::MouseMove(at));
    }
    let release = PointerEvent::at(start.x + 40.0, start.y + 20.0);
    editor.handle_input(&InputEvent::MouseUp(release));
    editor.handle_input(&InputEvent::MouseMove(release));

    editor.handle_input(&InputEvent::Wheel(WheelEvent {
        x: release.x,
        y: release.y,
        delta_x: 0.0,
        delta_y: -100.0,
        modifiers: Modifiers::ctrl(),
    }));
}
