use egui::{Rect, pos2, vec2};
use log::info;
use serde::{Deserialize, Serialize};

use crate::command::EditContext;
use crate::selection::SelectionModel;
use crate::surface::PixelBlock;

/// Ways an opened or pasted image can be brought into the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PasteMode {
    /// Resize the surface to the image and draw it
    ReplaceAll,
    /// Place the image over the current content, scaled down to fit
    PasteOver,
    /// Grow the surface upwards by the image height
    ExtendTop,
    ExtendLeft,
    ExtendRight,
    ExtendDown,
}

impl PasteMode {
    pub const ALL: [PasteMode; 6] = [
        PasteMode::ReplaceAll,
        PasteMode::PasteOver,
        PasteMode::ExtendTop,
        PasteMode::ExtendLeft,
        PasteMode::ExtendRight,
        PasteMode::ExtendDown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PasteMode::ReplaceAll => "Replace everything",
            PasteMode::PasteOver => "Paste over",
            PasteMode::ExtendTop => "Extend top",
            PasteMode::ExtendLeft => "Extend left",
            PasteMode::ExtendRight => "Extend right",
            PasteMode::ExtendDown => "Extend down",
        }
    }
}

/// Bring `image` into the surface using `mode`.
///
/// `ReplaceAll` commits straight away. Every other mode leaves the image
/// placed in the selection behind a speculative capture, to be finished or
/// cancelled through the selection model.
pub fn paste(
    ctx: &mut EditContext,
    selection: &mut SelectionModel,
    image: PixelBlock,
    mode: PasteMode,
) {
    if selection.is_placing() {
        selection.finish_placing(ctx);
    }
    info!(
        "📋 {} with {}x{} image",
        mode.label(),
        image.width(),
        image.height()
    );
    match mode {
        PasteMode::ReplaceAll => fit_image(ctx, selection, &image),
        PasteMode::PasteOver => paste_over(ctx, selection, image),
        PasteMode::ExtendTop
        | PasteMode::ExtendLeft
        | PasteMode::ExtendRight
        | PasteMode::ExtendDown => extend(ctx, selection, image, mode),
    }
}

/// Make the surface exactly the image
pub fn fit_image(ctx: &mut EditContext, selection: &mut SelectionModel, image: &PixelBlock) {
    if !ctx.resize_surface(image.width(), image.height()) {
        return;
    }
    let bounds = ctx.bounds();
    ctx.surface.draw_image(image, bounds);
    ctx.capture();
    selection.fit_to_surface(ctx);
}

fn paste_over(ctx: &mut EditContext, selection: &mut SelectionModel, image: PixelBlock) {
    let rect = fit_within(image.width(), image.height(), ctx.width(), ctx.height());
    selection.place_at(ctx, rect, image);
    ctx.capture();
}

/// Top-left rect for an image, scaled down to fit inside the surface keeping its ratio
pub fn fit_within(image_w: u32, image_h: u32, width: u32, height: u32) -> Rect {
    let (iw, ih) = (image_w as f32, image_h as f32);
    let (w, h) = (width as f32, height as f32);
    let size = if iw <= w && ih <= h {
        vec2(iw, ih)
    } else if iw / ih > w / h {
        vec2(w, (w * ih / iw).round())
    } else {
        vec2((h * iw / ih).round(), h)
    };
    Rect::from_min_size(pos2(0.0, 0.0), size)
}

fn extend(ctx: &mut EditContext, selection: &mut SelectionModel, image: PixelBlock, mode: PasteMode) {
    let (old_w, old_h) = (ctx.width(), ctx.height());
    let (iw, ih) = (image.width(), image.height());
    let vertical = matches!(mode, PasteMode::ExtendTop | PasteMode::ExtendDown);
    let (new_w, new_h) = if vertical {
        (old_w.max(iw), old_h + ih)
    } else {
        (old_w + iw, old_h.max(ih))
    };

    let pixels = ctx.surface.snapshot();
    if !ctx.resize_surface(new_w, new_h) {
        return;
    }
    ctx.fill_background();
    let shift = match mode {
        PasteMode::ExtendTop => (0, ih as i32),
        PasteMode::ExtendLeft => (iw as i32, 0),
        _ => (0, 0),
    };
    ctx.surface.put_block(shift.0, shift.1, &pixels);

    let rect = strip_rect(mode, (old_w, old_h), (iw, ih), (new_w, new_h));
    selection.place_at(ctx, rect, image);
    ctx.capture();
}

/// Where the image goes in the strip added by an extend, centered on the cross axis
pub fn strip_rect(mode: PasteMode, old: (u32, u32), image: (u32, u32), new: (u32, u32)) -> Rect {
    let (old_w, old_h) = (old.0 as f32, old.1 as f32);
    let (iw, ih) = (image.0 as f32, image.1 as f32);
    let (new_w, new_h) = (new.0 as f32, new.1 as f32);
    let inset_x = if iw < old_w { ((old_w - iw) / 2.0).round() } else { 0.0 };
    let inset_y = if ih < old_h { ((old_h - ih) / 2.0).round() } else { 0.0 };

    let (min, max) = match mode {
        PasteMode::ExtendTop => (pos2(inset_x, 0.0), pos2(new_w - inset_x, ih)),
        PasteMode::ExtendDown => (pos2(inset_x, old_h), pos2(new_w - inset_x, new_h)),
        PasteMode::ExtendLeft => (pos2(0.0, inset_y), pos2(iw, new_h - inset_y)),
        PasteMode::ExtendRight => (pos2(old_w, inset_y), pos2(new_w, new_h - inset_y)),
        PasteMode::ReplaceAll | PasteMode::PasteOver => (pos2(0.0, 0.0), pos2(iw, ih)),
    };
    Rect::from_min_max(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_within_keeps_small_images() {
        assert_eq!(fit_within(20, 10, 100, 100), Rect::from_min_size(pos2(0.0, 0.0), vec2(20.0, 10.0)));
    }

    #[test]
    fn test_fit_within_scales_wide_images() {
        let rect = fit_within(400, 100, 200, 200);
        assert_eq!(rect.size(), vec2(200.0, 50.0));
        let rect = fit_within(100, 400, 200, 200);
        assert_eq!(rect.size(), vec2(50.0, 200.0));
    }

    #[test]
    fn test_strip_rect_centers_narrow_image() {
        let rect = strip_rect(PasteMode::ExtendTop, (100, 50), (40, 20), (100, 70));
        assert_eq!(rect, Rect::from_min_max(pos2(30.0, 0.0), pos2(70.0, 20.0)));

        let rect = strip_rect(PasteMode::ExtendRight, (100, 50), (30, 80), (130, 80));
        assert_eq!(rect, Rect::from_min_max(pos2(100.0, 0.0), pos2(130.0, 80.0)));
    }
}
