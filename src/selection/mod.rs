//! Rectangular selection with crop, pixelize, clear and image placement.

mod area;
mod pixelize;

pub use area::{Edges, HANDLE_RADIUS, Hit, SelectionArea};
pub use pixelize::{BlockGrid, average_blocks};

use egui::{Key, Rect, Vec2};
use image::imageops::FilterType;
use log::{debug, info};

use crate::command::EditContext;
use crate::event::EditorEvent;
use crate::input::{KeyEvent, PointerEvent};
use crate::surface::PixelBlock;
use crate::tools::Tool;

/// What the pointer is currently doing to the selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    Idle,
    /// A fresh rectangle is being dragged out from its first corner
    Drawing(Edges),
    Moving { grab: Vec2 },
    Resizing(Edges),
}

/// An external image being positioned before it is committed
#[derive(Debug, Clone)]
pub struct PlacedImage {
    image: PixelBlock,
    /// Downscaled copy shown while dragging, when the image is large
    proxy: Option<PixelBlock>,
    ratio: f32,
}

impl PlacedImage {
    fn new(image: PixelBlock, proxy_max_side: u32) -> Self {
        let (w, h) = image.dimensions();
        let ratio = w as f32 / h.max(1) as f32;
        let longest = w.max(h);
        let proxy = (proxy_max_side > 0 && longest > proxy_max_side).then(|| {
            let scale = proxy_max_side as f32 / longest as f32;
            let pw = ((w as f32 * scale).round() as u32).max(1);
            let ph = ((h as f32 * scale).round() as u32).max(1);
            image::imageops::resize(&image, pw, ph, FilterType::Triangle)
        });
        Self { image, proxy, ratio }
    }

    pub fn image(&self) -> &PixelBlock {
        &self.image
    }

    /// Width over height of the full image
    pub fn ratio(&self) -> f32 {
        self.ratio
    }
}

/// Selection geometry and the operations that act on it
#[derive(Debug, Clone)]
pub struct SelectionModel {
    area: SelectionArea,
    active: bool,
    shown: bool,
    interaction: Interaction,
    placed: Option<PlacedImage>,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionModel {
    pub fn new() -> Self {
        Self {
            area: SelectionArea::default(),
            active: false,
            shown: false,
            interaction: Interaction::Idle,
            placed: None,
        }
    }

    pub fn area(&self) -> SelectionArea {
        self.area
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn placed(&self) -> Option<&PlacedImage> {
        self.placed.as_ref()
    }

    pub fn is_placing(&self) -> bool {
        self.placed.is_some()
    }

    /// Crop, pixelize and clear need a visible, non-empty selection and no placement
    pub fn is_usable(&self) -> bool {
        self.shown && self.placed.is_none() && !self.area.is_empty()
    }

    /// Image to draw inside the selection while placing: the proxy during a drag
    pub fn preview(&self) -> Option<&PixelBlock> {
        let placed = self.placed.as_ref()?;
        match (self.interaction, &placed.proxy) {
            (Interaction::Idle, _) | (_, None) => Some(&placed.image),
            (_, Some(proxy)) => Some(proxy),
        }
    }

    fn notify(&self, ctx: &EditContext) {
        ctx.emit(EditorEvent::SelectionChanged {
            usable: self.is_usable(),
        });
    }

    pub fn activate(&mut self, ctx: &mut EditContext) {
        self.active = true;
        self.notify(ctx);
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.interaction = Interaction::Idle;
    }

    /// Leave the selection tool: commit any placement, then hide
    pub fn close(&mut self, ctx: &mut EditContext) {
        if self.placed.is_some() {
            self.finish_placing(ctx);
        }
        self.deactivate();
        self.hide(ctx);
    }

    pub fn hide(&mut self, ctx: &mut EditContext) {
        self.area = self.area.clamped(ctx.width(), ctx.height());
        self.shown = false;
        self.notify(ctx);
    }

    /// Select `area`, clamped to the surface
    pub fn set_area(&mut self, ctx: &mut EditContext, area: SelectionArea) {
        self.area = area.clamped(ctx.width(), ctx.height());
        self.shown = !self.area.is_empty();
        self.notify(ctx);
    }

    pub fn select_all(&mut self, ctx: &mut EditContext) {
        self.set_area(ctx, SelectionArea::full(ctx.width(), ctx.height()));
    }

    /// Re-clamp after the surface changed size under the selection
    pub fn fit_to_surface(&mut self, ctx: &mut EditContext) {
        self.area = self.area.clamped(ctx.width(), ctx.height());
        if self.area.is_empty() {
            self.shown = false;
        }
        self.notify(ctx);
    }

    /// Cut the surface down to the selection
    pub fn do_crop(&mut self, ctx: &mut EditContext) -> bool {
        if !self.is_usable() {
            debug!("Nothing selected to crop");
            return false;
        }
        let area = self.area;
        let pixels = ctx.surface.snapshot();
        if !ctx.resize_surface(area.width(), area.height()) {
            return false;
        }
        ctx.surface.put_block(-area.left, -area.top, &pixels);
        ctx.capture();
        info!("✂️ Cropped to {}x{}", area.width(), area.height());

        self.area = SelectionArea::full(area.width(), area.height());
        self.notify(ctx);
        true
    }

    /// Replace the selection with solid blocks of their mean color
    pub fn do_pixelize(&mut self, ctx: &mut EditContext) -> bool {
        if !self.is_usable() {
            debug!("Nothing selected to pixelize");
            return false;
        }
        let area = self.area;
        let (w, h) = (area.width(), area.height());
        let pixel_size = ctx.config.pixel_size().resolve(w, h);
        let grid = BlockGrid::new(w, h, pixel_size);
        let pixels = ctx.surface.get_block(area.left, area.top, w, h);
        let colors = average_blocks(&pixels, &grid);

        let origin = area.min().to_vec2();
        for row in 0..grid.rows {
            for col in 0..grid.columns {
                if let Some(color) = colors[(row * grid.columns + col) as usize] {
                    let rect = grid.block_rect(col, row, w, h).translate(origin);
                    ctx.surface.fill_rect(rect, color);
                }
            }
        }
        ctx.capture();
        info!(
            "🟪 Pixelized {}x{} in {}x{} blocks",
            w, h, grid.columns, grid.rows
        );
        true
    }

    /// Replace the selection with the background color
    pub fn do_clear_area(&mut self, ctx: &mut EditContext) -> bool {
        if !self.is_usable() {
            return false;
        }
        ctx.surface.fill_rect(self.area.rect(), ctx.background);
        ctx.capture();
        true
    }

    /// Start positioning `image` inside `rect`.
    ///
    /// Nothing is drawn until [`Self::finish_placing`]; the caller is
    /// expected to take the speculative capture.
    pub fn place_at(&mut self, ctx: &mut EditContext, rect: Rect, image: PixelBlock) {
        self.placed = Some(PlacedImage::new(image, ctx.config.placement_proxy_max_side));
        self.area = SelectionArea::from_rect(rect).clamped(ctx.width(), ctx.height());
        self.active = true;
        self.shown = true;
        self.interaction = Interaction::Idle;
        self.notify(ctx);
    }

    /// Draw the placed image into the selection, superseding the speculative capture
    pub fn finish_placing(&mut self, ctx: &mut EditContext) -> bool {
        let Some(placed) = self.placed.take() else {
            return false;
        };
        self.interaction = Interaction::Idle;
        ctx.surface.draw_image(&placed.image, self.area.rect());
        ctx.re_capture();
        info!("📌 Placed image at {:?}", self.area);
        self.notify(ctx);
        true
    }

    /// Drop the placed image and roll back the capture taken when it was placed
    pub fn cancel_placing(&mut self, ctx: &mut EditContext) -> bool {
        if self.placed.take().is_none() {
            return false;
        }
        self.interaction = Interaction::Idle;
        self.shown = false;
        ctx.undo();
        self.fit_to_surface(ctx);
        true
    }

    pub fn pointer_down(&mut self, event: &PointerEvent, ctx: &mut EditContext) {
        if !self.active {
            return;
        }
        let hit = if self.shown {
            self.area.hit_test(event.pos)
        } else {
            Hit::Outside
        };

        self.interaction = match hit {
            Hit::Handle(edges) => Interaction::Resizing(edges),
            Hit::Inside => Interaction::Moving {
                grab: self.area.grab_offset(event.pos),
            },
            Hit::Outside => {
                if self.placed.is_some() {
                    self.finish_placing(ctx);
                }
                let start = SelectionArea::from_rect(Rect::from_min_max(event.pos, event.pos))
                    .clamped(ctx.width(), ctx.height());
                self.area = start;
                self.shown = false;
                self.notify(ctx);
                Interaction::Drawing(Edges::BOTTOM | Edges::RIGHT)
            }
        };
    }

    pub fn pointer_move(&mut self, event: &PointerEvent, ctx: &mut EditContext) {
        let (w, h) = (ctx.width(), ctx.height());
        match self.interaction {
            Interaction::Idle => {}
            Interaction::Moving { grab } => {
                self.area.move_to(event.pos - grab, w, h);
            }
            Interaction::Drawing(mut edges) | Interaction::Resizing(mut edges) => {
                self.area.drag_edges(&mut edges, event.pos, w, h);
                let ratio = self.placed.as_ref().map(PlacedImage::ratio);
                if let Some(ratio) = ratio.filter(|_| !event.constrained()) {
                    self.area.keep_ratio(edges, ratio, w, h);
                }
                self.interaction = match self.interaction {
                    Interaction::Drawing(_) => Interaction::Drawing(edges),
                    _ => Interaction::Resizing(edges),
                };
                if !self.area.is_empty() {
                    self.shown = true;
                }
            }
        }
    }

    pub fn pointer_up(&mut self, _event: &PointerEvent, ctx: &mut EditContext) {
        if self.interaction == Interaction::Idle {
            return;
        }
        self.interaction = Interaction::Idle;
        if self.area.is_empty() && self.placed.is_none() {
            self.shown = false;
        }
        self.notify(ctx);
    }

    /// Keyboard shortcuts. Returns whether the key was consumed.
    pub fn handle_key(&mut self, event: &KeyEvent, ctx: &mut EditContext) -> bool {
        if self.placed.is_some() {
            return match event.key {
                Key::Enter => self.finish_placing(ctx),
                Key::Escape => self.cancel_placing(ctx),
                _ => false,
            };
        }
        match event.key {
            Key::Delete | Key::Backspace if self.is_usable() => self.do_clear_area(ctx),
            Key::A if event.modifiers.command || event.modifiers.ctrl => {
                self.select_all(ctx);
                true
            }
            Key::Escape if self.shown => {
                self.hide(ctx);
                true
            }
            _ => false,
        }
    }
}

impl Tool for SelectionModel {
    fn name(&self) -> &'static str {
        "Select"
    }

    fn activate(&mut self, ctx: &mut EditContext) {
        SelectionModel::activate(self, ctx);
    }

    fn deactivate(&mut self, ctx: &mut EditContext) {
        self.close(ctx);
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut EditContext) {
        self.pointer_down(event, ctx);
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut EditContext) {
        self.pointer_move(event, ctx);
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &mut EditContext) {
        self.pointer_up(event, ctx);
    }

    fn on_key(&mut self, event: &KeyEvent, ctx: &mut EditContext) -> bool {
        self.handle_key(event, ctx)
    }
}
