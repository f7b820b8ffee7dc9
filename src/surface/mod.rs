//! The pixel buffer the editor operates on.
//!
//! Everything in the engine talks to pixels through [`RasterSurface`]. Blocks
//! exchanged through the trait are straight-alpha RGBA8 images; how the
//! surface stores them internally is its own business.

mod canvas;

pub use canvas::Canvas;
pub(crate) use canvas::{block_from_pixmap, pixmap_from_block};

use egui::{Color32, Rect};
use tiny_skia::PixmapMut;

use crate::error::EditorResult;

/// A rectangular block of straight-alpha RGBA pixels
pub type PixelBlock = image::RgbaImage;

/// An addressable width x height RGBA pixel buffer.
pub trait RasterSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Copy out a block. Pixels outside the surface read as transparent black.
    fn get_block(&self, x: i32, y: i32, width: u32, height: u32) -> PixelBlock;

    /// Overwrite pixels with `block` placed at (x, y), without compositing.
    /// Parts of the block outside the surface are dropped.
    fn put_block(&mut self, x: i32, y: i32, block: &PixelBlock);

    /// Reallocate the surface. The new surface is fully transparent.
    fn resize(&mut self, width: u32, height: u32) -> EditorResult<()>;

    /// Composite `image` scaled into `dest` (source-over)
    fn draw_image(&mut self, image: &PixelBlock, dest: Rect);

    /// Display-to-logical pixel ratio
    fn scale(&self) -> f32;

    /// Update the ratio reported by [`scale`](Self::scale). Values that are not
    /// finite and positive are ignored.
    fn set_scale(&mut self, scale: f32);

    /// Vector drawing target over the same pixels
    fn pixmap_mut(&mut self) -> PixmapMut<'_>;

    /// Copy of the whole surface
    fn snapshot(&self) -> PixelBlock {
        self.get_block(0, 0, self.width(), self.height())
    }

    /// Replace `rect` with `color` (no blending)
    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        let Some(rect) = to_skia_rect(rect) else {
            return;
        };
        let mut paint = paint_for(color);
        paint.blend_mode = tiny_skia::BlendMode::Source;
        paint.anti_alias = false;
        self.pixmap_mut()
            .fill_rect(rect, &paint, tiny_skia::Transform::identity(), None);
    }

    /// Fill the whole surface with `color`, discarding what was there
    fn clear_with(&mut self, color: Color32) {
        let rect = Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(self.width() as f32, self.height() as f32),
        );
        self.fill_rect(rect, color);
    }
}

pub(crate) fn to_skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(rect.min.x, rect.min.y, rect.max.x, rect.max.y)
}

pub(crate) fn skia_color(color: Color32) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

pub(crate) fn paint_for(color: Color32) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}
