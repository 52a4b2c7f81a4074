use paint_plus::{Bitmap, EngineConfig, InputEvent, PaintEngine, Tool};

fn engine() -> PaintEngine {
    PaintEngine::new(EngineConfig {
        canvas_width: 200,
        canvas_height: 150,
        ..EngineConfig::default()
    })
}

fn square_engine(text_size: f32) -> PaintEngine {
    PaintEngine::new(EngineConfig {
        canvas_width: 100,
        canvas_height: 100,
        text_size,
        ..EngineConfig::default()
    })
}

fn is_blank(bitmap: &Bitmap) -> bool {
    bitmap.pixels().all(|p| p.0 == [255, 255, 255, 255])
}

fn stroke(engine: &mut PaintEngine, from: (f32, f32), to: (f32, f32)) -> bool {
    engine.pointer_press(from.0, from.1);
    engine.pointer_drag(to.0, to.1);
    engine.pointer_release(to.0, to.1)
}

#[test]
fn test_rectangle_undo_redo_scenario() {
    let mut engine = engine();
    assert!(is_blank(engine.persisted()));
    assert_eq!(engine.history().len(), 1);

    engine.set_active_tool(Tool::Rectangle);
    assert!(stroke(&mut engine, (10.0, 10.0), (100.0, 80.0)));

    let drawn = engine.persisted().clone();
    assert_eq!(drawn.get_pixel(50, 45).0, [255, 0, 0, 255]);
    assert_eq!(drawn.get_pixel(150, 120).0, [255, 255, 255, 255]);
    assert_eq!(engine.history().len(), 2);

    assert!(engine.undo());
    assert!(is_blank(engine.persisted()));
    assert_eq!(engine.history().len(), 2);
    assert_eq!(engine.history().redo_depth(), 1);

    assert!(engine.redo());
    assert_eq!(engine.persisted().as_raw(), drawn.as_raw());
}

#[test]
fn test_undo_at_initial_state_is_noop() {
    let mut engine = engine();
    assert!(!engine.can_undo());
    assert!(!engine.undo());
    assert!(!engine.redo());
    assert!(is_blank(engine.persisted()));
}

#[test]
fn test_text_scenario() {
    let mut engine = engine();
    assert!(engine.has_text_support());
    engine.set_active_tool(Tool::Text);
    engine.pointer_press(50.0, 50.0);
    engine.text_buffer_mut().expect("text field open").push_str("Hi");
    assert!(engine.confirm_text());
    assert_eq!(engine.history().len(), 2);

    let mut touched = 0;
    for (x, y, pixel) in engine.persisted().enumerate_pixels() {
        if pixel.0 != [255, 255, 255, 255] {
            touched += 1;
            assert!((48..120).contains(&x), "pixel at x={x} is far from the anchor");
            assert!((48..90).contains(&y), "pixel at y={y} is far from the anchor");
            // Fill color is red, so the green channel never exceeds red
            assert!(pixel[0] >= pixel[1]);
        }
    }
    assert!(touched > 0);
}

#[test]
fn test_blank_text_is_discarded() {
    let mut engine = engine();
    engine.set_active_tool(Tool::Text);

    engine.pointer_press(50.0, 50.0);
    assert!(!engine.confirm_text());

    engine.pointer_press(50.0, 50.0);
    engine.text_buffer_mut().expect("text field open").push_str("   ");
    assert!(!engine.confirm_text());

    assert!(is_blank(engine.persisted()));
    assert_eq!(engine.history().len(), 1);
    assert!(engine.state().is_idle());
}

#[test]
fn test_tool_switch_commits_open_text() {
    let mut engine = engine();
    engine.set_active_tool(Tool::Text);
    engine.pointer_press(20.0, 20.0);
    engine.text_buffer_mut().expect("text field open").push_str("ok");

    engine.set_active_tool(Tool::Pencil);
    assert!(engine.state().is_idle());
    assert_eq!(engine.history().len(), 2);
    assert!(!is_blank(engine.persisted()));
}

#[test]
fn test_cancelled_text_leaves_no_trace() {
    let mut engine = engine();
    engine.set_active_tool(Tool::Text);
    engine.pointer_press(20.0, 20.0);
    engine.text_buffer_mut().expect("text field open").push_str("gone");
    engine.cancel_text();
    assert!(engine.text_buffer_mut().is_none());
    assert!(is_blank(engine.persisted()));
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn test_zero_length_shape_is_discarded() {
    for tool in [Tool::Rectangle, Tool::Circle, Tool::Triangle] {
        let mut engine = engine();
        engine.set_active_tool(tool);
        assert!(!stroke(&mut engine, (40.0, 40.0), (40.0, 40.0)));
        assert_eq!(engine.history().len(), 1);
        assert!(is_blank(engine.persisted()));
        assert!(is_blank(&engine.composite()));
    }
}

#[test]
fn test_history_evicts_oldest_first() {
    let mut engine = PaintEngine::new(EngineConfig {
        canvas_width: 100,
        canvas_height: 100,
        history_depth: 3,
        ..EngineConfig::default()
    });
    for i in 0..5 {
        let y = 10.0 + i as f32 * 15.0;
        assert!(stroke(&mut engine, (5.0, y), (90.0, y)));
        assert!(engine.history().len() <= 3);
    }
    let latest = engine.persisted().clone();

    assert!(engine.undo());
    assert!(engine.undo());
    assert!(!engine.undo());
    // The floor is the state after the third stroke, not the blank canvas
    assert!(!is_blank(engine.persisted()));
    assert_eq!(engine.persisted().get_pixel(50, 70).0, [255, 255, 255, 255]);
    assert_eq!(engine.persisted().get_pixel(50, 40).0, [0, 0, 0, 255]);

    assert!(engine.redo());
    assert!(engine.redo());
    assert_eq!(engine.persisted().as_raw(), latest.as_raw());
}

#[test]
fn test_commit_after_undo_clears_redo() {
    let mut engine = engine();
    stroke(&mut engine, (5.0, 10.0), (90.0, 10.0));
    stroke(&mut engine, (5.0, 30.0), (90.0, 30.0));
    engine.undo();
    assert!(engine.can_redo());

    engine.set_active_tool(Tool::Eraser);
    assert!(stroke(&mut engine, (20.0, 10.0), (30.0, 10.0)));
    assert!(!engine.can_redo());
    assert!(!engine.redo());
}

#[test]
fn test_settings_do_not_change_mid_gesture() {
    let mut engine = engine();
    engine.set_active_tool(Tool::Rectangle);
    engine.pointer_press(10.0, 10.0);
    engine.pointer_drag(60.0, 60.0);
    engine.set_opacity(0.0);
    engine.set_stroke_width(100.0);
    engine.pointer_release(60.0, 60.0);

    assert_eq!(engine.persisted().get_pixel(35, 35).0, [255, 0, 0, 255]);
    assert_eq!(engine.persisted().get_pixel(120, 120).0, [255, 255, 255, 255]);
}

#[test]
fn test_preview_is_not_persisted_until_release() {
    let mut engine = engine();
    engine.set_active_tool(Tool::Circle);
    engine.pointer_press(20.0, 20.0);
    engine.pointer_drag(80.0, 80.0);

    assert!(is_blank(engine.persisted()));
    assert_eq!(engine.composite().get_pixel(50, 50).0, [255, 0, 0, 255]);
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn test_export_snapshot_resolves_open_drag() {
    let mut engine = engine();
    engine.set_active_tool(Tool::Triangle);
    engine.pointer_press(20.0, 20.0);
    engine.pointer_drag(100.0, 90.0);

    let exported = engine.snapshot_for_export();
    assert!(engine.state().is_idle());
    assert_eq!(engine.history().len(), 2);
    assert_eq!(&exported, engine.persisted());
    assert_eq!(engine.composite(), exported);
}

#[test]
fn test_revision_tracks_pixel_changes() {
    let mut engine = engine();
    let start = engine.revision();
    engine.set_active_tool(Tool::Rectangle);
    engine.pointer_press(10.0, 10.0);
    assert_eq!(engine.revision(), start);
    engine.pointer_drag(30.0, 30.0);
    assert!(engine.revision() > start);
}

#[test]
fn test_oversized_text_stays_on_canvas() {
    let mut engine = square_engine(100_000.0);
    assert_eq!(engine.config().text_size, 1000.0);
    engine.set_active_tool(Tool::Text);
    engine.pointer_press(10.0, 10.0);
    engine.text_buffer_mut().expect("text field open").push_str("Hi");
    engine.confirm_text();

    assert!(engine.state().is_idle());
    assert!(engine.history().len() <= 2);
    let persisted = engine.persisted();
    assert_eq!((persisted.width(), persisted.height()), (100, 100));
    let left_margin_blank = persisted
        .enumerate_pixels()
        .filter(|(x, _, _)| *x < 5)
        .all(|(_, _, p)| p.0 == [255, 255, 255, 255]);
    assert!(left_margin_blank);
}

#[test]
fn test_text_anchored_below_canvas_is_discarded() {
    let mut engine = square_engine(18.0);
    engine.set_active_tool(Tool::Text);
    engine.pointer_press(50.0, 100.0);
    engine.text_buffer_mut().expect("text field open").push_str("Hi");
    let revision = engine.revision();

    assert!(!engine.confirm_text());
    assert_eq!(engine.history().len(), 1);
    assert!(!engine.can_undo());
    assert!(is_blank(engine.persisted()));
    assert_eq!(engine.revision(), revision);
}

#[test]
fn test_focus_loss_commits_text() {
    let mut engine = engine();
    engine.set_active_tool(Tool::Text);
    engine.pointer_press(40.0, 40.0);
    engine.handle_input(InputEvent::TextTyped("Hi".to_owned()));

    assert!(engine.handle_input(InputEvent::TextFocusLost));
    assert!(engine.state().is_idle());
    assert_eq!(engine.history().len(), 2);
    assert!(!is_blank(engine.persisted()));
}

#[test]
fn test_focus_loss_discards_blank_text() {
    let mut engine = engine();
    engine.set_active_tool(Tool::Text);
    engine.pointer_press(40.0, 40.0);
    engine.handle_input(InputEvent::TextTyped("   ".to_owned()));

    assert!(!engine.handle_input(InputEvent::TextFocusLost));
    assert!(engine.state().is_idle());
    assert_eq!(engine.history().len(), 1);
    assert!(is_blank(engine.persisted()));
}

#[test]
fn test_press_elsewhere_commits_open_text() {
    let mut engine = engine();
    engine.set_active_tool(Tool::Text);
    engine.pointer_press(20.0, 20.0);
    engine.text_buffer_mut().expect("text field open").push_str("Hi");

    engine.pointer_press(120.0, 90.0);
    assert_eq!(engine.history().len(), 2);
    assert!(!is_blank(engine.persisted()));
    let edit = engine.state().text_edit().expect("a new text field");
    assert_eq!((edit.anchor.x, edit.anchor.y), (120.0, 90.0));
    assert!(edit.buffer.is_empty());
}
