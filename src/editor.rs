use std::io::Cursor;

use egui::{Key, Pos2, Rect, vec2};
use log::{info, warn};

use crate::command::{Command, EditContext};
use crate::config::{EditorConfig, PixelSize};
use crate::error::{EditorError, EditorResult};
use crate::event::{EditorEvent, EventBus};
use crate::history::HistoryLog;
use crate::input::{EditorInput, KeyEvent, PointerEvent, PointerKind};
use crate::inserter::{self, PasteMode};
use crate::loader::PendingImage;
use crate::resizer;
use crate::selection::SelectionModel;
use crate::surface::{Canvas, PixelBlock, RasterSurface};
use crate::tools::{PrimitiveRenderer, Tool, ToolKind};

/// One editing session: the surface, its history and the tools acting on it.
///
/// All input goes through [`Editor::dispatch`], which routes pointer and key
/// events to the active tool and executes commands in arrival order.
#[derive(Debug)]
pub struct Editor {
    ctx: EditContext,
    selection: SelectionModel,
    renderer: PrimitiveRenderer,
    tool: ToolKind,
    pending: Option<PendingImage>,
    /// Loaded image waiting for the user to pick a paste mode
    awaiting_choice: Option<PixelBlock>,
    revision: u64,
}

fn tool_for<'a>(
    kind: ToolKind,
    selection: &'a mut SelectionModel,
    renderer: &'a mut PrimitiveRenderer,
) -> &'a mut dyn Tool {
    match kind {
        ToolKind::Select => selection,
        ToolKind::Shape(_) => renderer,
    }
}

impl Editor {
    /// Blank editor sized after `config.default_size`
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        let (width, height) = config.initial_size();
        let surface = Canvas::new(width, height)?;
        Ok(Self::with_surface(Box::new(surface), config))
    }

    /// Editor over an existing surface. The surface is painted with the background.
    pub fn with_surface(surface: Box<dyn RasterSurface>, config: EditorConfig) -> Self {
        let renderer = PrimitiveRenderer::new(&config);
        let mut editor = Self {
            ctx: EditContext::new(surface, config),
            selection: SelectionModel::new(),
            renderer,
            tool: ToolKind::Select,
            pending: None,
            awaiting_choice: None,
            revision: 0,
        };
        editor.start_session();
        editor.selection.activate(&mut editor.ctx);
        editor
    }

    fn start_session(&mut self) {
        self.ctx.fill_background();
        self.ctx.capture_initial();
        self.ctx.history.mark_clean();
        info!(
            "🖌️ New session {}x{}",
            self.ctx.width(),
            self.ctx.height()
        );
    }

    /// Start over on a blank surface of the configured size
    pub fn clear(&mut self) -> EditorResult<()> {
        self.renderer.cancel(&mut self.ctx);
        self.selection = SelectionModel::new();
        self.awaiting_choice = None;
        let (width, height) = self.ctx.config.initial_size();
        self.ctx.surface.resize(width, height)?;
        self.ctx.history = HistoryLog::new(self.ctx.config.worklog_limit);
        self.start_session();
        if self.tool == ToolKind::Select {
            self.selection.activate(&mut self.ctx);
        }
        self.revision += 1;
        Ok(())
    }

    pub fn context(&self) -> &EditContext {
        &self.ctx
    }

    /// Register handlers here to receive [`EditorEvent`]s
    pub fn events(&self) -> &EventBus {
        &self.ctx.events
    }

    pub fn surface(&self) -> &dyn RasterSurface {
        self.ctx.surface.as_ref()
    }

    /// Record how many screen points one surface pixel takes up
    pub fn set_display_scale(&mut self, scale: f32) {
        self.ctx.surface.set_scale(scale);
    }

    pub fn history(&self) -> &HistoryLog {
        &self.ctx.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.ctx.config
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn renderer(&self) -> &PrimitiveRenderer {
        &self.renderer
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Bumped whenever the surface or the overlays may have changed
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn awaiting_paste_choice(&self) -> bool {
        self.awaiting_choice.is_some()
    }

    /// Configured paste modes, in their canonical order
    pub fn available_paste_modes(&self) -> Vec<PasteMode> {
        PasteMode::ALL
            .into_iter()
            .filter(|mode| self.ctx.config.paste_actions.contains(mode))
            .collect()
    }

    pub fn dispatch(&mut self, input: impl Into<EditorInput>) {
        match input.into() {
            EditorInput::Pointer(event) => self.handle_pointer(event),
            EditorInput::Key(event) => self.handle_key(event),
            EditorInput::Command(command) => self.execute(command),
        }
        self.revision += 1;
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        let tool = tool_for(self.tool, &mut self.selection, &mut self.renderer);
        match event.kind {
            PointerKind::Down => tool.on_pointer_down(&event, &mut self.ctx),
            PointerKind::Move => tool.on_pointer_move(&event, &mut self.ctx),
            PointerKind::Up => tool.on_pointer_up(&event, &mut self.ctx),
        }
    }

    fn handle_key(&mut self, event: KeyEvent) {
        if event.key == Key::Escape && self.awaiting_choice.take().is_some() {
            info!("Paste cancelled");
            return;
        }

        let modifiers = event.modifiers;
        if modifiers.command || modifiers.ctrl {
            match event.key {
                Key::Z if modifiers.shift => return self.redo(),
                Key::Z => return self.undo(),
                Key::Y => return self.redo(),
                _ => {}
            }
        }

        let tool = tool_for(self.tool, &mut self.selection, &mut self.renderer);
        tool.on_key(&event, &mut self.ctx);
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::SelectTool(kind) => self.select_tool(kind),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::SelectAll => {
                self.select_tool(ToolKind::Select);
                self.selection.select_all(&mut self.ctx);
            }
            Command::Crop => {
                self.selection.do_crop(&mut self.ctx);
            }
            Command::Pixelize => {
                self.selection.do_pixelize(&mut self.ctx);
            }
            Command::ClearArea => {
                self.selection.do_clear_area(&mut self.ctx);
            }
            Command::FinishPlacing => {
                self.selection.finish_placing(&mut self.ctx);
            }
            Command::CancelPlacing => {
                self.selection.cancel_placing(&mut self.ctx);
            }
            Command::ResizeCanvas { width, height } => {
                self.before_canvas_change();
                resizer::resize_canvas(&mut self.ctx, width, height);
                self.selection.fit_to_surface(&mut self.ctx);
            }
            Command::ScaleCanvas { width, height } => {
                self.before_canvas_change();
                resizer::scale_canvas(&mut self.ctx, width, height);
                self.selection.fit_to_surface(&mut self.ctx);
            }
            Command::RotateClockwise => {
                self.before_canvas_change();
                resizer::rotate_clockwise(&mut self.ctx);
                self.selection.fit_to_surface(&mut self.ctx);
            }
            Command::Paste { image, mode } => self.paste(image, mode),
            Command::ChoosePasteMode(mode) => {
                if let Some(image) = self.awaiting_choice.take() {
                    self.paste(image, mode);
                }
            }
            Command::StampBitmap { image, at } => self.stamp_bitmap(&image, at),
            Command::SetLineWidth(width) => self.renderer.set_line_width(width),
            Command::SetArrowLength(length) => self.renderer.set_arrow_length(length),
            Command::SetEraserWidth(width) => self.renderer.set_eraser_width(width),
            Command::SetShadowOn(on) => self.renderer.set_shadow_on(on),
            Command::SetLineColor(color) => self.renderer.set_line_color(color),
            Command::SetFillColor(color) => self.renderer.set_fill_color(color),
            Command::SetBackground(color) => self.ctx.background = color,
            Command::SetPixelSize(spec) => match PixelSize::validate(&spec) {
                Some(spec) => self.ctx.config.pixelize_pixel_size = spec,
                None => warn!("Ignoring invalid pixel size {:?}", spec),
            },
            Command::Clear => {
                if let Err(err) = self.clear() {
                    warn!("Failed to clear: {}", err);
                }
            }
        }
    }

    /// Finish whatever is in flight before the surface changes size
    fn before_canvas_change(&mut self) {
        self.renderer.commit(&mut self.ctx);
        self.selection.finish_placing(&mut self.ctx);
    }

    /// Switch tools, closing the previous one first
    pub fn select_tool(&mut self, kind: ToolKind) {
        if let ToolKind::Shape(shape) = kind {
            if self.renderer.shape() != shape {
                self.renderer.cancel(&mut self.ctx);
            }
        }
        if kind == self.tool {
            return;
        }
        tool_for(self.tool, &mut self.selection, &mut self.renderer).deactivate(&mut self.ctx);
        self.tool = kind;
        if let ToolKind::Shape(shape) = kind {
            self.renderer.set_shape(shape);
        }
        tool_for(kind, &mut self.selection, &mut self.renderer).activate(&mut self.ctx);
        info!("🔧 {} tool", kind.name());
    }

    pub fn undo(&mut self) {
        self.renderer.cancel(&mut self.ctx);
        if self.selection.is_placing() {
            self.selection.cancel_placing(&mut self.ctx);
            return;
        }
        if self.ctx.undo() {
            self.selection.hide(&mut self.ctx);
        }
    }

    pub fn redo(&mut self) {
        self.renderer.cancel(&mut self.ctx);
        self.selection.finish_placing(&mut self.ctx);
        if self.ctx.redo() {
            self.selection.hide(&mut self.ctx);
        }
    }

    /// Insert `image` with `mode`. Placing modes switch to the selection tool.
    pub fn paste(&mut self, image: PixelBlock, mode: PasteMode) {
        self.renderer.commit(&mut self.ctx);
        if mode != PasteMode::ReplaceAll {
            self.select_tool(ToolKind::Select);
        }
        inserter::paste(&mut self.ctx, &mut self.selection, image, mode);
        self.revision += 1;
    }

    /// Start resolving an image to open. Results are picked up by [`Editor::poll`].
    pub fn open_image(&mut self, pending: PendingImage) {
        if self.pending.replace(pending).is_some() {
            warn!("Replacing an image load that was still pending");
        }
    }

    /// Check the pending image once. Returns true when it resolved.
    pub fn poll(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let Some(result) = pending.try_take() else {
            return false;
        };
        self.pending = None;
        match result {
            Ok(image) => self.image_loaded(image),
            Err(err) => {
                warn!("Failed to load image: {}", err);
                self.ctx.emit(EditorEvent::ImageLoadFailed);
            }
        }
        self.revision += 1;
        true
    }

    fn image_loaded(&mut self, image: PixelBlock) {
        info!("🖼️ Loaded {}x{} image", image.width(), image.height());
        self.ctx.emit(EditorEvent::ImageLoaded);
        if self.ctx.config.replace_all_on_empty_background && self.ctx.history.is_clean() {
            self.paste(image, PasteMode::ReplaceAll);
            return;
        }
        match self.available_paste_modes().as_slice() {
            [] => warn!("No paste modes enabled, dropping image"),
            [only] => self.paste(image, *only),
            _ => self.awaiting_choice = Some(image),
        }
    }

    /// Draw an externally rendered bitmap unscaled at `at` and capture it
    pub fn stamp_bitmap(&mut self, image: &PixelBlock, at: Pos2) {
        let dest = Rect::from_min_size(at, vec2(image.width() as f32, image.height() as f32));
        self.ctx.surface.draw_image(image, dest);
        self.ctx.capture();
        self.revision += 1;
    }

    /// Encode the surface, committing any placed image first
    pub fn export(&mut self, format: image::ImageFormat) -> EditorResult<Vec<u8>> {
        self.selection.finish_placing(&mut self.ctx);
        let mut bytes = Cursor::new(Vec::new());
        self.ctx
            .surface
            .snapshot()
            .write_to(&mut bytes, format)
            .map_err(EditorError::Encode)?;
        Ok(bytes.into_inner())
    }
}
