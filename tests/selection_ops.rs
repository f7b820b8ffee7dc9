use egui::{Key, Modifiers, Pos2, pos2};
use image::Rgba;
use raster_edit::selection::Interaction;
use raster_edit::{
    Command, Edges, Editor, EditorConfig, KeyEvent, PasteMode, PixelBlock, PointerEvent,
    SelectionArea,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Helper to create an editor of the given size on a white background
fn create_test_editor(width: u32, height: u32) -> Editor {
    init_logger();
    let config = EditorConfig {
        default_size: Some(format!("{width}x{height}")),
        ..Default::default()
    };
    Editor::new(config).unwrap()
}

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PixelBlock {
    PixelBlock::from_pixel(width, height, Rgba(rgba))
}

fn pixel(editor: &Editor, x: u32, y: u32) -> [u8; 4] {
    editor.surface().get_block(x as i32, y as i32, 1, 1).get_pixel(0, 0).0
}

fn drag(editor: &mut Editor, from: Pos2, to: Pos2) {
    editor.dispatch(PointerEvent::down(from));
    editor.dispatch(PointerEvent::moved(to));
    editor.dispatch(PointerEvent::up(to));
}

fn stamp(editor: &mut Editor, image: PixelBlock, x: f32, y: f32) {
    editor.dispatch(Command::StampBitmap {
        image,
        at: pos2(x, y),
    });
}

#[test]
fn test_drag_creates_selection() {
    let mut editor = create_test_editor(80, 80);
    drag(&mut editor, pos2(10.0, 10.0), pos2(60.0, 40.0));

    let selection = editor.selection();
    assert!(selection.is_shown());
    assert!(selection.is_usable());
    assert_eq!(selection.area(), SelectionArea::new(10, 10, 60, 40));
    assert_eq!(selection.interaction(), Interaction::Idle);
}

#[test]
fn test_crop_to_selection() {
    let mut editor = create_test_editor(80, 80);
    stamp(&mut editor, solid(1, 1, [1, 2, 3, 255]), 10.0, 10.0);
    let before = editor.history().operations_done();

    drag(&mut editor, pos2(10.0, 10.0), pos2(60.0, 40.0));
    editor.dispatch(Command::Crop);

    assert_eq!(editor.surface().width(), 50);
    assert_eq!(editor.surface().height(), 30);
    assert_eq!(pixel(&editor, 0, 0), [1, 2, 3, 255]);
    assert_eq!(editor.history().operations_done(), before + 1);
}

#[test]
fn test_crop_without_selection_is_noop() {
    let mut editor = create_test_editor(40, 40);
    editor.dispatch(Command::Crop);
    assert_eq!(editor.surface().width(), 40);
    assert_eq!(editor.history().operations_done(), 0);
}

#[test]
fn test_pixelize_uniform_quadrants_unchanged() {
    let mut editor = create_test_editor(100, 100);
    let colors = [
        [255, 0, 0, 255],
        [0, 255, 0, 255],
        [0, 0, 255, 255],
        [255, 255, 0, 255],
    ];
    for (i, color) in colors.iter().enumerate() {
        let (x, y) = ((i % 2) as f32 * 50.0, (i / 2) as f32 * 50.0);
        stamp(&mut editor, solid(50, 50, *color), x, y);
    }
    let before = editor.surface().snapshot();

    editor.dispatch(Command::SetPixelSize("50%".to_owned()));
    editor.dispatch(Command::SelectAll);
    editor.dispatch(Command::Pixelize);

    assert_eq!(editor.surface().snapshot(), before);
    assert_eq!(pixel(&editor, 75, 25), [0, 255, 0, 255]);
    assert_eq!(pixel(&editor, 25, 75), [0, 0, 255, 255]);
}

#[test]
fn test_pixelize_averages_blocks() {
    let mut editor = create_test_editor(4, 4);
    stamp(&mut editor, solid(2, 1, [0, 0, 0, 255]), 0.0, 0.0);
    let operations = editor.history().operations_done();

    editor.dispatch(Command::SetPixelSize("4".to_owned()));
    editor.dispatch(Command::SelectAll);
    editor.dispatch(Command::Pixelize);

    // 14 white and 2 black pixels: 255 * 14 / 16 rounds to 223
    for (x, y) in [(0, 0), (3, 3), (1, 2)] {
        assert_eq!(pixel(&editor, x, y), [223, 223, 223, 255]);
    }
    assert_eq!(editor.history().operations_done(), operations + 1);
}

#[test]
fn test_pixelize_fills_the_block_it_averaged() {
    let mut editor = create_test_editor(100, 30);
    stamp(&mut editor, solid(1, 30, [0, 0, 0, 255]), 14.0, 0.0);

    editor.dispatch(Command::SetPixelSize("15".to_owned()));
    editor.dispatch(Command::SelectAll);
    editor.dispatch(Command::Pixelize);

    // Column 14 belongs to the first block, both when averaging and when filling
    assert_eq!(pixel(&editor, 0, 5), [238, 238, 238, 255]);
    assert_eq!(pixel(&editor, 14, 5), pixel(&editor, 0, 5));
    assert_eq!(pixel(&editor, 14, 25), pixel(&editor, 0, 25));
    assert_eq!(pixel(&editor, 15, 5), [255, 255, 255, 255]);
    assert_eq!(pixel(&editor, 15, 5), pixel(&editor, 20, 5));
}

#[test]
fn test_undo_and_redo_hide_selection() {
    let mut editor = create_test_editor(80, 80);
    stamp(&mut editor, solid(10, 10, [255, 0, 0, 255]), 0.0, 0.0);
    drag(&mut editor, pos2(10.0, 10.0), pos2(60.0, 40.0));
    assert!(editor.selection().is_shown());

    editor.dispatch(Command::Undo);
    assert!(!editor.selection().is_shown());
    assert_eq!(pixel(&editor, 5, 5), [255, 255, 255, 255]);

    drag(&mut editor, pos2(10.0, 10.0), pos2(60.0, 40.0));
    assert!(editor.selection().is_shown());
    editor.dispatch(Command::Redo);
    assert!(!editor.selection().is_shown());
    assert_eq!(pixel(&editor, 5, 5), [255, 0, 0, 255]);
}

#[test]
fn test_clear_area_uses_background() {
    let mut editor = create_test_editor(40, 40);
    stamp(&mut editor, solid(40, 40, [255, 0, 0, 255]), 0.0, 0.0);
    editor.dispatch(Command::SetBackground(egui::Color32::from_rgb(0, 0, 255)));
    drag(&mut editor, pos2(5.0, 5.0), pos2(15.0, 15.0));
    editor.dispatch(Command::ClearArea);

    assert_eq!(pixel(&editor, 10, 10), [0, 0, 255, 255]);
    assert_eq!(pixel(&editor, 20, 20), [255, 0, 0, 255]);
}

#[test]
fn test_left_handle_drag_inverts() {
    let mut editor = create_test_editor(100, 100);
    drag(&mut editor, pos2(10.0, 10.0), pos2(50.0, 50.0));

    editor.dispatch(PointerEvent::down(pos2(10.0, 30.0)));
    assert_eq!(editor.selection().interaction(), Interaction::Resizing(Edges::LEFT));
    editor.dispatch(PointerEvent::moved(pos2(70.0, 30.0)));
    assert_eq!(editor.selection().area(), SelectionArea::new(50, 10, 70, 50));
    assert_eq!(editor.selection().interaction(), Interaction::Resizing(Edges::RIGHT));
    editor.dispatch(PointerEvent::moved(pos2(90.0, 30.0)));
    editor.dispatch(PointerEvent::up(pos2(90.0, 30.0)));
    assert_eq!(editor.selection().area(), SelectionArea::new(50, 10, 90, 50));
}

#[test]
fn test_move_selection_stays_in_bounds() {
    let mut editor = create_test_editor(100, 100);
    drag(&mut editor, pos2(10.0, 10.0), pos2(40.0, 30.0));
    drag(&mut editor, pos2(25.0, 20.0), pos2(200.0, 20.0));
    assert_eq!(editor.selection().area(), SelectionArea::new(70, 10, 100, 30));
}

#[test]
fn test_placed_image_keeps_ratio() {
    let mut editor = create_test_editor(400, 400);
    editor.dispatch(Command::Paste {
        image: solid(200, 100, [0, 255, 0, 255]),
        mode: PasteMode::PasteOver,
    });
    assert!(editor.selection().is_placing());
    assert_eq!(editor.selection().area(), SelectionArea::new(0, 0, 200, 100));

    drag(&mut editor, pos2(200.0, 100.0), pos2(300.0, 120.0));
    assert_eq!(editor.selection().area(), SelectionArea::new(0, 0, 240, 120));
}

#[test]
fn test_modifier_frees_placed_ratio() {
    let mut editor = create_test_editor(400, 400);
    editor.dispatch(Command::Paste {
        image: solid(200, 100, [0, 255, 0, 255]),
        mode: PasteMode::PasteOver,
    });

    editor.dispatch(PointerEvent::down(pos2(200.0, 100.0)));
    editor.dispatch(PointerEvent::moved(pos2(300.0, 120.0)).with_modifiers(Modifiers::SHIFT));
    editor.dispatch(PointerEvent::up(pos2(300.0, 120.0)));
    assert_eq!(editor.selection().area(), SelectionArea::new(0, 0, 300, 120));
}

#[test]
fn test_enter_finishes_placing() {
    let mut editor = create_test_editor(100, 100);
    editor.dispatch(Command::Paste {
        image: solid(20, 20, [255, 0, 0, 255]),
        mode: PasteMode::PasteOver,
    });
    let speculative = editor.history().operations_done();
    assert_eq!(pixel(&editor, 5, 5), [255, 255, 255, 255]);

    editor.dispatch(KeyEvent::new(Key::Enter));
    assert!(!editor.selection().is_placing());
    assert_eq!(pixel(&editor, 5, 5), [255, 0, 0, 255]);
    assert_eq!(editor.history().operations_done(), speculative);

    // The committed image survives an undo/redo round trip
    editor.dispatch(Command::Undo);
    assert_eq!(pixel(&editor, 5, 5), [255, 255, 255, 255]);
    editor.dispatch(Command::Redo);
    assert_eq!(pixel(&editor, 5, 5), [255, 0, 0, 255]);
}

#[test]
fn test_escape_cancels_placing() {
    let mut editor = create_test_editor(100, 100);
    let before = editor.surface().snapshot();
    editor.dispatch(Command::Paste {
        image: solid(20, 20, [255, 0, 0, 255]),
        mode: PasteMode::PasteOver,
    });

    editor.dispatch(KeyEvent::new(Key::Escape));
    assert!(!editor.selection().is_placing());
    assert!(!editor.selection().is_shown());
    assert_eq!(editor.surface().snapshot(), before);
    assert_eq!(editor.history().operations_done(), 0);
}

#[test]
fn test_click_outside_finishes_placing() {
    let mut editor = create_test_editor(100, 100);
    editor.dispatch(Command::Paste {
        image: solid(20, 20, [255, 0, 0, 255]),
        mode: PasteMode::PasteOver,
    });
    editor.dispatch(PointerEvent::down(pos2(80.0, 80.0)));

    assert!(!editor.selection().is_placing());
    assert_eq!(pixel(&editor, 10, 10), [255, 0, 0, 255]);
    assert_eq!(
        editor.selection().interaction(),
        Interaction::Drawing(Edges::BOTTOM | Edges::RIGHT)
    );
}

#[test]
fn test_keyboard_shortcuts() {
    let mut editor = create_test_editor(30, 20);
    editor.dispatch(KeyEvent::new(Key::A).with_modifiers(Modifiers::CTRL));
    assert_eq!(editor.selection().area(), SelectionArea::full(30, 20));
    assert!(editor.selection().is_shown());

    editor.dispatch(KeyEvent::new(Key::Escape));
    assert!(!editor.selection().is_shown());

    drag(&mut editor, pos2(0.0, 0.0), pos2(10.0, 10.0));
    editor.dispatch(Command::SetBackground(egui::Color32::BLACK));
    editor.dispatch(KeyEvent::new(Key::Delete));
    assert_eq!(pixel(&editor, 5, 5), [0, 0, 0, 255]);
    assert_eq!(pixel(&editor, 15, 15), [255, 255, 255, 255]);
}
