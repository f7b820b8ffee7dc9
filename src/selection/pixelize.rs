use egui::{Color32, Rect, pos2};

use crate::surface::PixelBlock;

/// Block layout of a pixelized region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockGrid {
    pub block_width: f32,
    pub block_height: f32,
    pub columns: u32,
    pub rows: u32,
}

impl BlockGrid {
    /// Lay out blocks of roughly `pixel_size` over a `width` x `height` region.
    ///
    /// The shorter side uses `pixel_size` as is. On the longer side the block
    /// count is rounded and the block length recomputed so blocks tile it
    /// exactly.
    pub fn new(width: u32, height: u32, pixel_size: f32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let short_count = |len: f32| ((len / pixel_size).ceil() as u32).max(1);
        let long_count = |len: f32| ((len / pixel_size).round() as u32).max(1);
        if height < width {
            let columns = long_count(w);
            Self {
                block_width: w / columns as f32,
                block_height: pixel_size,
                columns,
                rows: short_count(h),
            }
        } else {
            let rows = long_count(h);
            Self {
                block_width: pixel_size,
                block_height: h / rows as f32,
                columns: short_count(w),
                rows,
            }
        }
    }

    /// Pixel columns `[start, end)` covered by block column `col`
    pub fn column_span(&self, col: u32, width: u32) -> (u32, u32) {
        span(col, self.columns, self.block_width, width)
    }

    /// Pixel rows `[start, end)` covered by block row `row`
    pub fn row_span(&self, row: u32, height: u32) -> (u32, u32) {
        span(row, self.rows, self.block_height, height)
    }

    /// Area of block (col, row) relative to the region, on whole pixels
    pub fn block_rect(&self, col: u32, row: u32, width: u32, height: u32) -> Rect {
        let (x0, x1) = self.column_span(col, width);
        let (y0, y1) = self.row_span(row, height);
        Rect::from_min_max(pos2(x0 as f32, y0 as f32), pos2(x1 as f32, y1 as f32))
    }
}

/// Block `index` of `count` along an axis of `len` pixels. Edges are rounded up
/// to whole pixels and the last block always ends at `len`.
fn span(index: u32, count: u32, block_len: f32, len: u32) -> (u32, u32) {
    let edge = |k: u32| {
        if k >= count {
            len
        } else {
            ((k as f32 * block_len).ceil() as u32).min(len)
        }
    };
    (edge(index), edge(index + 1))
}

/// Mean color of every block, row-major. Empty blocks yield `None`.
pub fn average_blocks(pixels: &PixelBlock, grid: &BlockGrid) -> Vec<Option<Color32>> {
    let (width, height) = pixels.dimensions();
    let mut colors = Vec::with_capacity((grid.columns * grid.rows) as usize);

    for row in 0..grid.rows {
        let (y0, y1) = grid.row_span(row, height);
        for col in 0..grid.columns {
            let (x0, x1) = grid.column_span(col, width);
            let mut sum = [0u64; 4];
            let mut count = 0u64;
            for y in y0..y1 {
                for x in x0..x1 {
                    for (total, channel) in sum.iter_mut().zip(pixels.get_pixel(x, y).0) {
                        *total += channel as u64;
                    }
                    count += 1;
                }
            }
            colors.push((count > 0).then(|| {
                let mean = |c: u64| (c as f64 / count as f64).round() as u8;
                Color32::from_rgba_unmultiplied(mean(sum[0]), mean(sum[1]), mean(sum[2]), mean(sum[3]))
            }));
        }
    }

    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_square_region() {
        let grid = BlockGrid::new(100, 100, 50.0);
        assert_eq!(grid.columns, 2);
        assert_eq!(grid.rows, 2);
        assert_eq!(grid.block_width, 50.0);
    }

    #[test]
    fn test_grid_tiles_longer_side() {
        let grid = BlockGrid::new(100, 30, 15.0);
        // 100 / 15 rounds to 7 blocks across
        assert!((grid.block_width - 100.0 / 7.0).abs() < 1e-4);
        assert_eq!(grid.block_height, 15.0);
        assert_eq!((grid.columns, grid.rows), (7, 2));
    }

    #[test]
    fn test_spans_cover_whole_pixels() {
        let grid = BlockGrid::new(100, 30, 15.0);
        assert_eq!(grid.column_span(0, 100), (0, 15));
        assert_eq!(grid.column_span(6, 100), (86, 100));
        let mut next = 0;
        for col in 0..grid.columns {
            let (start, end) = grid.column_span(col, 100);
            assert_eq!(start, next);
            next = end;
        }
        assert_eq!(next, 100);
        assert_eq!(grid.row_span(1, 30), (15, 30));
        assert_eq!(grid.block_rect(0, 0, 100, 30), Rect::from_min_max(pos2(0.0, 0.0), pos2(15.0, 15.0)));
    }

    #[test]
    fn test_average_matches_filled_block() {
        // Pixel 14 sits past 100 / 7 but belongs to the block drawn over 0..15
        let mut pixels = PixelBlock::from_pixel(100, 30, image::Rgba([255, 255, 255, 255]));
        for y in 0..30 {
            pixels.put_pixel(14, y, image::Rgba([0, 0, 0, 255]));
        }
        let grid = BlockGrid::new(100, 30, 15.0);
        let colors = average_blocks(&pixels, &grid);
        assert_eq!(colors[0], Some(Color32::from_rgb(238, 238, 238)));
        assert_eq!(colors[1], Some(Color32::WHITE));
    }

    #[test]
    fn test_grid_with_oversized_blocks() {
        let grid = BlockGrid::new(10, 4, 40.0);
        assert_eq!((grid.columns, grid.rows), (1, 1));
    }

    #[test]
    fn test_average_rounds_mean() {
        let mut pixels = PixelBlock::new(2, 2);
        pixels.put_pixel(0, 0, image::Rgba([10, 0, 0, 255]));
        pixels.put_pixel(1, 0, image::Rgba([11, 0, 0, 255]));
        pixels.put_pixel(0, 1, image::Rgba([11, 0, 0, 255]));
        pixels.put_pixel(1, 1, image::Rgba([11, 0, 0, 255]));
        let grid = BlockGrid::new(2, 2, 2.0);
        let colors = average_blocks(&pixels, &grid);
        assert_eq!(colors, vec![Some(Color32::from_rgba_unmultiplied(11, 0, 0, 255))]);
    }
}
