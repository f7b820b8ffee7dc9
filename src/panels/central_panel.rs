use egui::{Color32, CursorIcon, Rect, Sense, Stroke, pos2, vec2};

use crate::EditorApp;
use crate::selection::Hit;
use crate::texture_manager::{TextureSlot, color_image};

const SELECTION_COLOR: Color32 = Color32::from_rgb(0, 120, 215);
const HANDLE_SIZE: f32 = 6.0;

pub fn central_panel(app: &mut EditorApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (w, h) = (app.editor.surface().width() as f32, app.editor.surface().height() as f32);
        let available = ui.available_size();
        app.editor
            .set_display_scale((available.x / w).min(available.y / h).clamp(0.05, 1.0));
        let editor = &app.editor;
        let zoom = editor.surface().scale();

        let (response, painter) = ui.allocate_painter(available, Sense::drag());
        let canvas_rect = Rect::from_min_size(response.rect.min, vec2(w * zoom, h * zoom));
        app.input.set_canvas_rect(canvas_rect, zoom);

        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        let surface = app.textures.get_or_upload(ctx, TextureSlot::Surface, editor.revision(), || {
            color_image(&editor.surface().snapshot())
        });
        painter.image(surface, canvas_rect, uv, Color32::WHITE);

        let selection = editor.selection();
        if !selection.is_shown() {
            return;
        }
        let area = selection.area().rect();
        let screen = Rect::from_min_max(
            canvas_rect.min + area.min.to_vec2() * zoom,
            canvas_rect.min + area.max.to_vec2() * zoom,
        );

        if let Some(preview) = selection.preview() {
            let key = preview.as_raw().as_ptr() as u64 ^ ((preview.width() as u64) << 32);
            let texture = app.textures.get_or_upload(ctx, TextureSlot::Placement, key, || color_image(preview));
            painter.image(texture, screen, uv, Color32::WHITE);
        }

        painter.rect_stroke(screen, 0.0, Stroke::new(1.0, SELECTION_COLOR));
        for corner in [screen.left_top(), screen.right_top(), screen.left_bottom(), screen.right_bottom()] {
            painter.rect_filled(Rect::from_center_size(corner, vec2(HANDLE_SIZE, HANDLE_SIZE)), 0.0, SELECTION_COLOR);
        }

        if let Some(hover) = response.hover_pos() {
            let logical = ((hover - canvas_rect.min) / zoom).to_pos2();
            match selection.area().hit_test(logical) {
                Hit::Handle(edges) => ctx.set_cursor_icon(edges.cursor_icon()),
                Hit::Inside => ctx.set_cursor_icon(CursorIcon::Move),
                Hit::Outside => {}
            }
        }
    });
}
