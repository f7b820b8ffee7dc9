use egui::{Rect, pos2, vec2};
use log::{debug, info};

use crate::command::EditContext;
use crate::config::EditorConfig;

/// Width/height entry of the resize dialog, optionally linked by aspect ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkedSize {
    width: u32,
    height: u32,
    /// Width over height of the surface the dialog was opened for
    ratio: f32,
    linked: bool,
    max_width: u32,
    max_height: u32,
}

impl LinkedSize {
    pub fn new(width: u32, height: u32, config: &EditorConfig) -> Self {
        Self {
            width,
            height,
            ratio: width as f32 / height.max(1) as f32,
            linked: true,
            max_width: config.max_width,
            max_height: config.max_height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn set_linked(&mut self, linked: bool) {
        self.linked = linked;
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width.min(self.max_width);
        if self.linked {
            let height = (self.width as f32 / self.ratio).round() as u32;
            self.height = height.min(self.max_height);
        }
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height.min(self.max_height);
        if self.linked {
            let width = (self.height as f32 * self.ratio).round() as u32;
            self.width = width.min(self.max_width);
        }
    }

    /// Text entry: anything unparsable resets the field to its current value
    pub fn set_width_text(&mut self, text: &str) {
        if let Ok(width) = text.trim().parse() {
            self.set_width(width);
        }
    }

    pub fn set_height_text(&mut self, text: &str) {
        if let Ok(height) = text.trim().parse() {
            self.set_height(height);
        }
    }

    /// Zero in either direction turns resize and scale into no-ops
    pub fn is_usable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

fn clamp_size(ctx: &EditContext, width: u32, height: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        debug!("Ignoring resize to {}x{}", width, height);
        return None;
    }
    Some((width.min(ctx.config.max_width), height.min(ctx.config.max_height)))
}

/// Change the canvas size, keeping content anchored top-left over the background
pub fn resize_canvas(ctx: &mut EditContext, width: u32, height: u32) -> bool {
    let Some((width, height)) = clamp_size(ctx, width, height) else {
        return false;
    };
    let pixels = ctx.surface.snapshot();
    if !ctx.resize_surface(width, height) {
        return false;
    }
    ctx.fill_background();
    let dest = Rect::from_min_size(pos2(0.0, 0.0), vec2(pixels.width() as f32, pixels.height() as f32));
    ctx.surface.draw_image(&pixels, dest);
    ctx.capture();
    info!("📐 Resized canvas to {}x{}", width, height);
    true
}

/// Resample the whole canvas to a new size
pub fn scale_canvas(ctx: &mut EditContext, width: u32, height: u32) -> bool {
    let Some((width, height)) = clamp_size(ctx, width, height) else {
        return false;
    };
    let pixels = ctx.surface.snapshot();
    if !ctx.resize_surface(width, height) {
        return false;
    }
    let bounds = ctx.bounds();
    ctx.surface.draw_image(&pixels, bounds);
    ctx.capture();
    info!("📐 Scaled canvas to {}x{}", width, height);
    true
}

/// Rotate the canvas a quarter turn clockwise
pub fn rotate_clockwise(ctx: &mut EditContext) -> bool {
    let rotated = image::imageops::rotate90(&ctx.surface.snapshot());
    if !ctx.resize_surface(rotated.width(), rotated.height()) {
        return false;
    }
    ctx.surface.put_block(0, 0, &rotated);
    ctx.capture();
    info!("🔄 Rotated canvas");
    true
}
