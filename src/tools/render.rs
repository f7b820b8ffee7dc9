//! Rasterizing tool marks onto a pixmap, with optional drop shadows.

use egui::{Color32, Vec2, vec2};
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Paint, Path, PathBuilder, PixmapMut, PixmapPaint,
    Transform,
};

use crate::surface::{block_from_pixmap, paint_for, pixmap_from_block};

/// Shadow color before the mark's own alpha is applied
const SHADOW_ALPHA: f32 = 0.7;

/// A filled or stroked path in surface coordinates
pub(crate) enum Mark {
    Fill(Path),
    Stroke(Path, tiny_skia::Stroke),
}

impl Mark {
    /// Round capped, round joined stroke through `points`
    pub fn polyline(points: &[egui::Pos2], width: f32) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        let stroke = tiny_skia::Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        Some(Mark::Stroke(pb.finish()?, stroke))
    }

    /// Closed polygon fill
    pub fn polygon(points: &[egui::Pos2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        pb.close();
        Some(Mark::Fill(pb.finish()?))
    }

    /// Outline of `path` with mitered corners
    pub fn outline(path: Path, width: f32) -> Self {
        let stroke = tiny_skia::Stroke {
            width,
            line_join: LineJoin::Miter,
            ..Default::default()
        };
        Mark::Stroke(path, stroke)
    }

    fn path(&self) -> &Path {
        match self {
            Mark::Fill(path) | Mark::Stroke(path, _) => path,
        }
    }

    /// Bounds including half the stroke width
    fn bounds(&self) -> tiny_skia::Rect {
        let b = self.path().bounds();
        let pad = match self {
            Mark::Fill(_) => 0.0,
            Mark::Stroke(_, stroke) => stroke.width / 2.0 + 1.0,
        };
        tiny_skia::Rect::from_ltrb(b.left() - pad, b.top() - pad, b.right() + pad, b.bottom() + pad)
            .unwrap_or(b)
    }

    pub fn paint(&self, pixmap: &mut PixmapMut<'_>, paint: &Paint<'_>, transform: Transform) {
        match self {
            Mark::Fill(path) => pixmap.fill_path(path, paint, FillRule::Winding, transform, None),
            Mark::Stroke(path, stroke) => pixmap.stroke_path(path, paint, stroke, transform, None),
        }
    }
}

/// Blurred, offset copy of a mark drawn underneath it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub blur: f32,
    pub offset: Vec2,
}

impl Shadow {
    /// Shadow under lines and shape outlines: blur equals the line width,
    /// offset is half of it on both axes
    pub fn for_stroke(line_width: f32) -> Self {
        Self {
            blur: line_width,
            offset: vec2(line_width / 2.0, line_width / 2.0),
        }
    }

    /// Shadow under arrows, growing logarithmically with the head length
    pub fn for_arrow(head_length: f32, scale: f32) -> Self {
        if head_length <= 1.0 {
            return Self {
                blur: 0.0,
                offset: Vec2::ZERO,
            };
        }
        let offset = head_length.log10();
        Self {
            blur: (head_length.ln() * scale).max(0.0),
            offset: vec2(offset, offset),
        }
    }
}

/// Draw `mark` in `color`, with `shadow` underneath when given
pub(crate) fn draw_mark(
    pixmap: &mut PixmapMut<'_>,
    mark: &Mark,
    color: Color32,
    shadow: Option<Shadow>,
) {
    if let Some(shadow) = shadow {
        cast_shadow(pixmap, mark, color, shadow);
    }
    mark.paint(pixmap, &paint_for(color), Transform::identity());
}

fn cast_shadow(target: &mut PixmapMut<'_>, mark: &Mark, color: Color32, shadow: Shadow) {
    let alpha = SHADOW_ALPHA * color.a() as f32 / 255.0;
    if alpha <= 0.0 {
        return;
    }

    // Only the mark's neighbourhood is blurred
    let sigma = shadow.blur / 2.0;
    let margin = (sigma * 3.0).ceil() + 1.0;
    let bounds = mark.bounds();
    let left = (bounds.left() - margin).floor();
    let top = (bounds.top() - margin).floor();
    let width = (bounds.width() + 2.0 * margin).ceil() as u32;
    let height = (bounds.height() + 2.0 * margin).ceil() as u32;
    let Some(mut layer) = tiny_skia::Pixmap::new(width, height) else {
        return;
    };

    let shade = Color32::from_black_alpha((alpha * 255.0).round() as u8);
    mark.paint(
        &mut layer.as_mut(),
        &paint_for(shade),
        Transform::from_translate(-left, -top),
    );

    let blurred = if sigma > 0.0 {
        let block = image::imageops::blur(&block_from_pixmap(&layer), sigma);
        match pixmap_from_block(&block) {
            Some(pixmap) => pixmap,
            None => return,
        }
    } else {
        layer
    };

    target.draw_pixmap(
        0,
        0,
        blurred.as_ref(),
        &PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        },
        Transform::from_translate(left + shadow.offset.x, top + shadow.offset.y),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_shadow_params() {
        let shadow = Shadow::for_stroke(6.0);
        assert_eq!(shadow.blur, 6.0);
        assert_eq!(shadow.offset, vec2(3.0, 3.0));
    }

    #[test]
    fn test_arrow_shadow_params() {
        let shadow = Shadow::for_arrow(100.0, 2.0);
        assert!((shadow.offset.x - 2.0).abs() < 1e-5);
        assert!((shadow.blur - 100f32.ln() * 2.0).abs() < 1e-4);

        let degenerate = Shadow::for_arrow(0.0, 1.0);
        assert_eq!(degenerate.blur, 0.0);
        assert_eq!(degenerate.offset, Vec2::ZERO);
    }
}
