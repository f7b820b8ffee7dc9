use egui::{Color32, Key, Modifiers, Pos2, pos2};
use image::Rgba;
use raster_edit::{
    Command, Editor, EditorConfig, KeyEvent, PixelBlock, PointerEvent, ShapeKind, ToolKind,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Helper to create an editor with the given shape tool selected and shadows off
fn create_drawing_editor(shape: ShapeKind) -> Editor {
    init_logger();
    let config = EditorConfig {
        default_size: Some("80x60".to_owned()),
        default_shadow_on: false,
        ..Default::default()
    };
    let mut editor = Editor::new(config).unwrap();
    editor.dispatch(Command::SelectTool(ToolKind::Shape(shape)));
    editor
}

fn pixel(editor: &Editor, x: u32, y: u32) -> [u8; 4] {
    editor.surface().get_block(x as i32, y as i32, 1, 1).get_pixel(0, 0).0
}

fn stroke(editor: &mut Editor, points: &[Pos2]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    editor.dispatch(PointerEvent::down(*first));
    for point in rest {
        editor.dispatch(PointerEvent::moved(*point));
    }
    editor.dispatch(PointerEvent::up(*points.last().unwrap()));
}

#[test]
fn test_stroke_captures_once() {
    let mut editor = create_drawing_editor(ShapeKind::Line);
    let points: Vec<Pos2> = (0..20).map(|i| pos2(10.0 + i as f32, 10.0 + i as f32)).collect();
    stroke(&mut editor, &points);

    assert_eq!(editor.history().operations_done(), 1);
    assert!(!editor.renderer().is_drawing());
}

#[test]
fn test_line_preview_replaces_previous_frame() {
    let mut editor = create_drawing_editor(ShapeKind::Line);
    editor.dispatch(PointerEvent::down(pos2(0.0, 10.0)));
    editor.dispatch(PointerEvent::moved(pos2(40.0, 10.0)));
    assert!(pixel(&editor, 20, 10)[0] < 10);

    // Swinging the line away leaves nothing behind on the old position
    editor.dispatch(PointerEvent::moved(pos2(0.0, 50.0)));
    assert_eq!(pixel(&editor, 20, 10), [255, 255, 255, 255]);
    editor.dispatch(PointerEvent::up(pos2(0.0, 50.0)));
    assert!(pixel(&editor, 0, 30)[0] < 10);
}

#[test]
fn test_degenerate_shapes_capture_once() {
    for shape in [ShapeKind::Line, ShapeKind::Arrow, ShapeKind::Rect, ShapeKind::Ellipse] {
        let mut editor = create_drawing_editor(shape);
        let before = editor.surface().snapshot();
        stroke(&mut editor, &[pos2(20.0, 20.0)]);

        assert_eq!(editor.surface().snapshot(), before, "{shape:?} drew something");
        assert_eq!(editor.history().operations_done(), 1, "{shape:?}");
    }
}

#[test]
fn test_escape_cancels_stroke() {
    let mut editor = create_drawing_editor(ShapeKind::Brush);
    let before = editor.surface().snapshot();
    editor.dispatch(PointerEvent::down(pos2(10.0, 10.0)));
    editor.dispatch(PointerEvent::moved(pos2(30.0, 30.0)));
    assert_ne!(editor.surface().snapshot(), before);

    editor.dispatch(KeyEvent::new(Key::Escape));
    assert_eq!(editor.surface().snapshot(), before);
    assert!(!editor.renderer().is_drawing());

    // The release that follows does not commit anything
    editor.dispatch(PointerEvent::up(pos2(30.0, 30.0)));
    assert_eq!(editor.history().operations_done(), 0);
}

#[test]
fn test_brush_dab_paints_immediately() {
    let mut editor = create_drawing_editor(ShapeKind::Brush);
    editor.dispatch(PointerEvent::down(pos2(20.5, 20.5)));
    assert!(pixel(&editor, 20, 20)[0] < 10);
    editor.dispatch(PointerEvent::up(pos2(20.5, 20.5)));
    assert_eq!(editor.history().operations_done(), 1);
}

#[test]
fn test_eraser_paints_opaque_background() {
    let mut editor = create_drawing_editor(ShapeKind::Eraser);
    editor.dispatch(Command::StampBitmap {
        image: PixelBlock::from_pixel(80, 60, Rgba([255, 0, 0, 255])),
        at: pos2(0.0, 0.0),
    });
    stroke(&mut editor, &[pos2(5.0, 10.0), pos2(30.0, 10.0)]);

    assert_eq!(pixel(&editor, 15, 10), [255, 255, 255, 255]);
    assert_eq!(pixel(&editor, 15, 40), [255, 0, 0, 255]);
}

#[test]
fn test_eraser_cuts_through_transparent_background() {
    let mut editor = create_drawing_editor(ShapeKind::Eraser);
    editor.dispatch(Command::SetBackground(Color32::TRANSPARENT));
    editor.dispatch(Command::StampBitmap {
        image: PixelBlock::from_pixel(80, 60, Rgba([255, 0, 0, 255])),
        at: pos2(0.0, 0.0),
    });
    stroke(&mut editor, &[pos2(5.0, 10.0), pos2(30.0, 10.0)]);

    assert_eq!(pixel(&editor, 15, 10)[3], 0);
    assert_eq!(pixel(&editor, 15, 40), [255, 0, 0, 255]);
}

#[test]
fn test_eraser_dab_uses_line_width() {
    let mut editor = create_drawing_editor(ShapeKind::Eraser);
    editor.dispatch(Command::SetLineWidth(12.0));
    editor.dispatch(Command::SetEraserWidth(2.0));
    editor.dispatch(Command::StampBitmap {
        image: PixelBlock::from_pixel(80, 60, Rgba([255, 0, 0, 255])),
        at: pos2(0.0, 0.0),
    });
    stroke(&mut editor, &[pos2(20.0, 20.0)]);

    // 4px from the center is inside a 12px dab, outside a 2px one
    assert_eq!(pixel(&editor, 24, 20), [255, 255, 255, 255]);
    assert_eq!(pixel(&editor, 30, 20), [255, 0, 0, 255]);
}

#[test]
fn test_constrained_line_snaps_horizontal() {
    let mut editor = create_drawing_editor(ShapeKind::Line);
    editor.dispatch(PointerEvent::down(pos2(10.0, 10.0)));
    editor.dispatch(PointerEvent::moved(pos2(50.0, 14.0)).with_modifiers(Modifiers::SHIFT));
    editor.dispatch(PointerEvent::up(pos2(50.0, 14.0)).with_modifiers(Modifiers::SHIFT));

    assert!(pixel(&editor, 45, 10)[0] < 10);
    assert_eq!(pixel(&editor, 45, 14), [255, 255, 255, 255]);
}

#[test]
fn test_rect_fills_then_outlines() {
    let mut editor = create_drawing_editor(ShapeKind::Rect);
    editor.dispatch(Command::SetFillColor(Color32::from_rgb(0, 255, 0)));
    stroke(&mut editor, &[pos2(10.0, 10.0), pos2(50.0, 40.0)]);

    assert_eq!(pixel(&editor, 30, 25), [0, 255, 0, 255]);
    assert!(pixel(&editor, 10, 25)[1] < 10);
    assert_eq!(pixel(&editor, 60, 50), [255, 255, 255, 255]);
}

#[test]
fn test_shadow_darkens_below_line() {
    let mut editor = create_drawing_editor(ShapeKind::Line);
    editor.dispatch(Command::SetShadowOn(true));
    editor.dispatch(Command::SetLineWidth(4.0));
    stroke(&mut editor, &[pos2(10.0, 10.0), pos2(60.0, 10.0)]);

    let below = pixel(&editor, 35, 13);
    assert!(below[0] < 240, "no shadow under the line: {below:?}");
    assert_eq!(pixel(&editor, 35, 40), [255, 255, 255, 255]);
}

#[test]
fn test_invalid_width_is_ignored() {
    let mut editor = create_drawing_editor(ShapeKind::Line);
    editor.dispatch(Command::SetLineWidth(-2.0));
    editor.dispatch(Command::SetLineWidth(f32::NAN));
    assert_eq!(editor.renderer().style().line_width, 3.0);
}

#[test]
fn test_switching_shape_cancels_stroke() {
    let mut editor = create_drawing_editor(ShapeKind::Brush);
    let before = editor.surface().snapshot();
    editor.dispatch(PointerEvent::down(pos2(10.0, 10.0)));
    editor.dispatch(PointerEvent::moved(pos2(30.0, 30.0)));

    editor.dispatch(Command::SelectTool(ToolKind::Shape(ShapeKind::Rect)));
    assert_eq!(editor.surface().snapshot(), before);
    assert_eq!(editor.renderer().shape(), ShapeKind::Rect);
    assert_eq!(editor.history().operations_done(), 0);
}
