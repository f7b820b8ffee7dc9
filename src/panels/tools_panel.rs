use egui::{Button, DragValue};

use crate::EditorApp;
use crate::command::Command;
use crate::resizer::LinkedSize;
use crate::tools::{ShapeKind, ToolKind};

pub fn tools_panel(app: &mut EditorApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            let mut commands = Vec::new();
            let editor = &app.editor;

            ui.heading("Tools");
            let tools = std::iter::once(ToolKind::Select).chain(ShapeKind::ALL.map(ToolKind::Shape));
            for tool in tools {
                if ui.selectable_label(editor.tool() == tool, tool.name()).clicked() {
                    log::info!("Tool selected from UI: {}", tool.name());
                    commands.push(Command::SelectTool(tool));
                }
            }
            ui.separator();

            ui.horizontal(|ui| {
                let history = editor.history();
                if ui.add_enabled(history.can_undo(), Button::new("Undo")).clicked() {
                    commands.push(Command::Undo);
                }
                if ui.add_enabled(history.can_redo(), Button::new("Redo")).clicked() {
                    commands.push(Command::Redo);
                }
            });
            ui.label(app.history_status.as_str());
            ui.separator();

            let usable = editor.selection().is_usable();
            ui.horizontal_wrapped(|ui| {
                if ui.add_enabled(usable, Button::new("Crop")).clicked() {
                    commands.push(Command::Crop);
                }
                if ui.add_enabled(usable, Button::new("Pixelize")).clicked() {
                    commands.push(Command::Pixelize);
                }
                if ui.add_enabled(usable, Button::new("Clear")).clicked() {
                    commands.push(Command::ClearArea);
                }
                if ui.button("Rotate").clicked() {
                    commands.push(Command::RotateClockwise);
                }
            });
            ui.horizontal(|ui| {
                ui.label("Pixel size");
                let response = ui.text_edit_singleline(&mut app.pixel_size_text);
                if response.lost_focus() {
                    commands.push(Command::SetPixelSize(app.pixel_size_text.clone()));
                }
            });
            ui.separator();

            let style = *editor.renderer().style();
            let mut line_width = style.line_width;
            if ui.add(DragValue::new(&mut line_width).range(1.0..=100.0).prefix("Width ")).changed() {
                commands.push(Command::SetLineWidth(line_width));
            }
            let mut line_color = style.line_color;
            ui.horizontal(|ui| {
                ui.label("Line");
                if ui.color_edit_button_srgba(&mut line_color).changed() {
                    commands.push(Command::SetLineColor(line_color));
                }
            });
            let mut fill_color = style.fill_color;
            ui.horizontal(|ui| {
                ui.label("Fill");
                if ui.color_edit_button_srgba(&mut fill_color).changed() {
                    commands.push(Command::SetFillColor(fill_color));
                }
            });
            let mut shadow_on = style.shadow_on;
            if ui.checkbox(&mut shadow_on, "Shadow").changed() {
                commands.push(Command::SetShadowOn(shadow_on));
            }
            ui.separator();

            let surface = editor.surface();
            if ui.button("Resize…").clicked() {
                app.resize = Some(LinkedSize::new(surface.width(), surface.height(), editor.config()));
            }
            if let Some(size) = app.resize.as_mut() {
                let (mut width, mut height) = (size.width(), size.height());
                if ui.add(DragValue::new(&mut width).prefix("W ")).changed() {
                    size.set_width(width);
                }
                if ui.add(DragValue::new(&mut height).prefix("H ")).changed() {
                    size.set_height(height);
                }
                let mut linked = size.is_linked();
                if ui.checkbox(&mut linked, "Keep ratio").changed() {
                    size.set_linked(linked);
                }
                ui.horizontal(|ui| {
                    let (width, height) = (size.width(), size.height());
                    if ui.add_enabled(size.is_usable(), Button::new("Resize")).clicked() {
                        commands.push(Command::ResizeCanvas { width, height });
                    }
                    if ui.add_enabled(size.is_usable(), Button::new("Scale")).clicked() {
                        commands.push(Command::ScaleCanvas { width, height });
                    }
                });
            }

            if editor.awaiting_paste_choice() {
                ui.separator();
                ui.label("Insert image:");
                for mode in editor.available_paste_modes() {
                    if ui.button(mode.label()).clicked() {
                        commands.push(Command::ChoosePasteMode(mode));
                    }
                }
            }
            if let Some(error) = &app.load_error {
                ui.colored_label(egui::Color32::RED, error.as_str());
            }

            let done_resizing = commands
                .iter()
                .any(|c| matches!(c, Command::ResizeCanvas { .. } | Command::ScaleCanvas { .. }));
            if done_resizing {
                app.resize = None;
            }
            let pixel_size_edited = commands
                .iter()
                .any(|c| matches!(c, Command::SetPixelSize(_)));
            for command in commands {
                app.editor.dispatch(command);
            }
            if pixel_size_edited {
                // Invalid input snaps back to the size in effect
                app.pixel_size_text = app.editor.config().pixelize_pixel_size.clone();
            }
        });
}
