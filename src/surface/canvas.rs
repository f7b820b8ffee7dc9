use egui::Rect;
use log::debug;
use tiny_skia::{
    ColorU8, FilterQuality, Pixmap, PixmapMut, PixmapPaint, PremultipliedColorU8, Transform,
};

use super::{PixelBlock, RasterSurface};
use crate::error::{EditorError, EditorResult};

/// In-memory [`RasterSurface`] backed by a tiny-skia pixmap
#[derive(Clone)]
pub struct Canvas {
    pixmap: Pixmap,
    scale: f32,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("scale", &self.scale)
            .finish()
    }
}

impl Canvas {
    /// Create a fully transparent canvas
    pub fn new(width: u32, height: u32) -> EditorResult<Self> {
        Ok(Self {
            pixmap: allocate(width, height)?,
            scale: 1.0,
        })
    }

    /// Build a canvas holding a copy of `block`
    pub fn from_block(block: &PixelBlock) -> EditorResult<Self> {
        let mut canvas = Self::new(block.width(), block.height())?;
        canvas.put_block(0, 0, block);
        Ok(canvas)
    }
}

fn allocate(width: u32, height: u32) -> EditorResult<Pixmap> {
    Pixmap::new(width, height).ok_or(EditorError::InvalidSize { width, height })
}

/// Premultiplied pixmap holding a copy of `block`, `None` for empty blocks
pub(crate) fn pixmap_from_block(block: &PixelBlock) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(block.width(), block.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(block.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Straight-alpha copy of a whole pixmap
pub(crate) fn block_from_pixmap(pixmap: &Pixmap) -> PixelBlock {
    let mut block = PixelBlock::new(pixmap.width(), pixmap.height());
    for (dst, src) in block.pixels_mut().zip(pixmap.pixels()) {
        dst.0 = demultiply(*src);
    }
    block
}

fn demultiply(px: PremultipliedColorU8) -> [u8; 4] {
    let c = px.demultiply();
    [c.red(), c.green(), c.blue(), c.alpha()]
}

impl RasterSurface for Canvas {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn get_block(&self, x: i32, y: i32, width: u32, height: u32) -> PixelBlock {
        let mut block = PixelBlock::new(width, height);
        let (sw, sh) = (self.pixmap.width() as i64, self.pixmap.height() as i64);
        let pixels = self.pixmap.pixels();
        for (bx, by, dst) in block.enumerate_pixels_mut() {
            let sx = x as i64 + bx as i64;
            let sy = y as i64 + by as i64;
            if sx < 0 || sy < 0 || sx >= sw || sy >= sh {
                continue;
            }
            dst.0 = demultiply(pixels[(sy * sw + sx) as usize]);
        }
        block
    }

    fn put_block(&mut self, x: i32, y: i32, block: &PixelBlock) {
        let (sw, sh) = (self.pixmap.width() as i64, self.pixmap.height() as i64);
        let pixels = self.pixmap.pixels_mut();
        for (bx, by, src) in block.enumerate_pixels() {
            let dx = x as i64 + bx as i64;
            let dy = y as i64 + by as i64;
            if dx < 0 || dy < 0 || dx >= sw || dy >= sh {
                continue;
            }
            let [r, g, b, a] = src.0;
            pixels[(dy * sw + dx) as usize] = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> EditorResult<()> {
        debug!("Resizing canvas {}x{} -> {}x{}", self.width(), self.height(), width, height);
        self.pixmap = allocate(width, height)?;
        Ok(())
    }

    fn draw_image(&mut self, image: &PixelBlock, dest: Rect) {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let Some(src) = pixmap_from_block(image) else {
            return;
        };
        let sx = dest.width() / image.width() as f32;
        let sy = dest.height() / image.height() as f32;
        let unscaled = sx == 1.0 && sy == 1.0 && dest.min.x.fract() == 0.0 && dest.min.y.fract() == 0.0;
        let paint = PixmapPaint {
            quality: if unscaled {
                FilterQuality::Nearest
            } else {
                FilterQuality::Bilinear
            },
            ..PixmapPaint::default()
        };
        let transform = Transform::from_row(sx, 0.0, 0.0, sy, dest.min.x, dest.min.y);
        self.pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn set_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale;
        }
    }

    fn pixmap_mut(&mut self) -> PixmapMut<'_> {
        self.pixmap.as_mut()
    }

    fn snapshot(&self) -> PixelBlock {
        block_from_pixmap(&self.pixmap)
    }
}

#[cfg(test)]
mod tests {
    use egui::{Color32, pos2, vec2};
    use image::Rgba;

    use super::*;

    #[test]
    fn test_blocks_outside_read_transparent() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.clear_with(Color32::RED);
        let block = canvas.get_block(-2, 2, 4, 4);
        assert_eq!(block.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(block.get_pixel(2, 0).0, [255, 0, 0, 255]);
        assert_eq!(block.get_pixel(2, 2).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_put_block_clips() {
        let mut canvas = Canvas::new(3, 3).unwrap();
        let block = PixelBlock::from_pixel(2, 2, Rgba([0, 255, 0, 255]));
        canvas.put_block(2, -1, &block);
        assert_eq!(canvas.get_block(2, 0, 1, 1).get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(canvas.get_block(2, 1, 1, 1).get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_from_block_round_trips_translucent_pixels() {
        let block = PixelBlock::from_pixel(2, 1, Rgba([10, 20, 30, 0]));
        let canvas = Canvas::from_block(&block).unwrap();
        assert_eq!(canvas.snapshot().get_pixel(1, 0).0[3], 0);
        assert!(Canvas::new(0, 5).is_err());
    }

    #[test]
    fn test_draw_image_scales_into_dest() {
        let mut canvas = Canvas::new(8, 8).unwrap();
        let block = PixelBlock::from_pixel(2, 2, Rgba([0, 0, 255, 255]));
        canvas.draw_image(&block, Rect::from_min_size(pos2(4.0, 4.0), vec2(4.0, 4.0)));
        let [r, _, b, a] = canvas.get_block(6, 6, 1, 1).get_pixel(0, 0).0;
        assert!(r < 5 && b > 250 && a > 250);
        assert_eq!(canvas.get_block(1, 1, 1, 1).get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_scale_rejects_nonsense() {
        let mut canvas = Canvas::new(1, 1).unwrap();
        canvas.set_scale(2.0);
        canvas.set_scale(-1.0);
        assert_eq!(canvas.scale(), 2.0);
    }
}
