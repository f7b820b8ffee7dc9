use egui::{Color32, Pos2, Rect};
use log::{debug, warn};
use tiny_skia::{BlendMode, PathBuilder, PixmapMut, Transform};

use super::geometry::{arrow_head, constrain_square, snap_angle};
use super::render::{Mark, Shadow, draw_mark};
use super::{ShapeKind, Tool};
use crate::command::EditContext;
use crate::config::EditorConfig;
use crate::input::{KeyEvent, PointerEvent};
use crate::surface::{PixelBlock, RasterSurface, paint_for, to_skia_rect};

/// Drawing settings, copied into each stroke when it starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub line_color: Color32,
    pub fill_color: Color32,
    pub line_width: f32,
    pub eraser_width: f32,
    pub arrow_length: f32,
    pub shadow_on: bool,
    pub shadow_scale: f32,
}

impl StrokeStyle {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            line_color: config.line_color,
            fill_color: config.fill_color,
            line_width: config.default_line_width,
            eraser_width: config.default_eraser_width,
            arrow_length: config.default_arrow_length,
            shadow_on: config.default_shadow_on,
            shadow_scale: config.shadow_scale,
        }
    }

    fn shadow(&self, shadow: Shadow) -> Option<Shadow> {
        self.shadow_on.then_some(shadow)
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum StrokeGeometry {
    /// Every pointer position, for freehand shapes
    Path(Vec<Pos2>),
    /// Fixed start point and the latest pointer position
    Drag {
        origin: Pos2,
        current: Pos2,
        constrained: bool,
    },
}

/// One pointer-down to pointer-up drawing gesture
#[derive(Debug, Clone)]
pub struct PrimitiveStroke {
    shape: ShapeKind,
    style: StrokeStyle,
    background: Color32,
    /// Surface as it was when the stroke began
    backup: PixelBlock,
    geometry: StrokeGeometry,
}

impl PrimitiveStroke {
    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Latest pointer position fed to the stroke
    pub fn last_point(&self) -> Pos2 {
        match &self.geometry {
            StrokeGeometry::Path(points) => points.last().copied().unwrap_or_default(),
            StrokeGeometry::Drag { current, .. } => *current,
        }
    }

    fn render(&self, surface: &mut dyn RasterSurface) {
        let mut pixmap = surface.pixmap_mut();
        match &self.geometry {
            StrokeGeometry::Path(points) => self.render_freehand(&mut pixmap, points),
            StrokeGeometry::Drag {
                origin,
                current,
                constrained,
            } => {
                let (origin, current) = (*origin, *current);
                match self.shape {
                    ShapeKind::Line | ShapeKind::Arrow => {
                        let end = if *constrained {
                            snap_angle(origin, current)
                        } else {
                            current
                        };
                        if self.shape == ShapeKind::Line {
                            self.render_line(&mut pixmap, origin, end);
                        } else {
                            self.render_arrow(&mut pixmap, origin, end);
                        }
                    }
                    ShapeKind::Rect | ShapeKind::Ellipse => {
                        let mut size = current - origin;
                        if *constrained {
                            size = constrain_square(size);
                        }
                        let bounds = Rect::from_two_pos(origin, origin + size);
                        if self.shape == ShapeKind::Rect {
                            self.render_rect(&mut pixmap, bounds);
                        } else {
                            self.render_ellipse(&mut pixmap, bounds);
                        }
                    }
                    ShapeKind::Brush | ShapeKind::Eraser => {}
                }
            }
        }
    }

    fn render_line(&self, pixmap: &mut PixmapMut<'_>, origin: Pos2, end: Pos2) {
        if origin == end {
            return;
        }
        let width = self.style.line_width;
        if let Some(mark) = Mark::polyline(&[origin, end], width) {
            let shadow = self.style.shadow(Shadow::for_stroke(width));
            draw_mark(pixmap, &mark, self.style.line_color, shadow);
        }
    }

    fn render_arrow(&self, pixmap: &mut PixmapMut<'_>, origin: Pos2, end: Pos2) {
        let head = arrow_head(origin, end, self.style.arrow_length);
        if head.length <= 0.0 {
            return;
        }
        if let Some(mark) = Mark::polygon(&head.outline(origin)) {
            let shadow = self
                .style
                .shadow(Shadow::for_arrow(head.length, self.style.shadow_scale));
            draw_mark(pixmap, &mark, self.style.line_color, shadow);
        }
    }

    fn render_rect(&self, pixmap: &mut PixmapMut<'_>, bounds: Rect) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return;
        }
        let width = self.style.line_width;
        let inner = bounds.shrink(width / 2.0);
        if inner.width() > 0.0 && inner.height() > 0.0 {
            if let Some(rect) = to_skia_rect(inner) {
                let fill = Mark::Fill(PathBuilder::from_rect(rect));
                draw_mark(pixmap, &fill, self.style.fill_color, None);
            }
        }
        if let Some(rect) = to_skia_rect(bounds) {
            let outline = Mark::outline(PathBuilder::from_rect(rect), width);
            let shadow = self.style.shadow(Shadow::for_stroke(width));
            draw_mark(pixmap, &outline, self.style.line_color, shadow);
        }
    }

    fn render_ellipse(&self, pixmap: &mut PixmapMut<'_>, bounds: Rect) {
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return;
        }
        let Some(path) = to_skia_rect(bounds).and_then(PathBuilder::from_oval) else {
            return;
        };
        let width = self.style.line_width;
        draw_mark(pixmap, &Mark::Fill(path.clone()), self.style.fill_color, None);
        let shadow = self.style.shadow(Shadow::for_stroke(width));
        draw_mark(pixmap, &Mark::outline(path, width), self.style.line_color, shadow);
    }

    /// Brush strokes paint the line color. The eraser paints the background,
    /// cutting through first when the background is not opaque.
    fn render_freehand(&self, pixmap: &mut PixmapMut<'_>, points: &[Pos2]) {
        let eraser = self.shape == ShapeKind::Eraser;
        let width = if eraser {
            self.style.eraser_width
        } else {
            self.style.line_width
        };

        let mark = match points {
            [] => None,
            // A lone point is a dab of the line width, eraser included
            [dab] => PathBuilder::from_circle(dab.x, dab.y, self.style.line_width / 2.0)
                .map(Mark::Fill),
            _ => Mark::polyline(points, width),
        };
        let Some(mark) = mark else {
            return;
        };

        let passes = if !eraser {
            vec![(BlendMode::SourceOver, self.style.line_color)]
        } else if self.background.a() != u8::MAX {
            vec![
                (BlendMode::DestinationOut, Color32::BLACK),
                (BlendMode::SourceOver, self.background),
            ]
        } else {
            vec![(BlendMode::SourceOver, self.background)]
        };
        for (blend_mode, color) in passes {
            let mut paint = paint_for(color);
            paint.blend_mode = blend_mode;
            mark.paint(pixmap, &paint, Transform::identity());
        }
    }
}

/// Draws lines, arrows, rectangles, ellipses and freehand strokes with a
/// live preview.
///
/// Each update restores the pixels saved when the stroke began and renders
/// the shape again from scratch. Committing takes exactly one capture.
#[derive(Debug, Clone)]
pub struct PrimitiveRenderer {
    shape: ShapeKind,
    style: StrokeStyle,
    stroke: Option<PrimitiveStroke>,
}

impl PrimitiveRenderer {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            shape: ShapeKind::Line,
            style: StrokeStyle::from_config(config),
            stroke: None,
        }
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    /// Shape used by the next stroke
    pub fn set_shape(&mut self, shape: ShapeKind) {
        self.shape = shape;
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn stroke(&self) -> Option<&PrimitiveStroke> {
        self.stroke.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn set_line_width(&mut self, width: f32) {
        if let Some(width) = positive(width, "line width") {
            self.style.line_width = width;
        }
    }

    pub fn set_eraser_width(&mut self, width: f32) {
        if let Some(width) = positive(width, "eraser width") {
            self.style.eraser_width = width;
        }
    }

    pub fn set_arrow_length(&mut self, length: f32) {
        if let Some(length) = positive(length, "arrow length") {
            self.style.arrow_length = length;
        }
    }

    pub fn set_shadow_on(&mut self, on: bool) {
        self.style.shadow_on = on;
    }

    pub fn set_line_color(&mut self, color: Color32) {
        self.style.line_color = color;
    }

    pub fn set_fill_color(&mut self, color: Color32) {
        self.style.fill_color = color;
    }

    /// Start a stroke at `origin`. Freehand shapes paint a dab right away.
    pub fn begin(&mut self, ctx: &mut EditContext, origin: Pos2) {
        if self.stroke.is_some() {
            self.commit(ctx);
        }
        let geometry = if self.shape.is_freehand() {
            StrokeGeometry::Path(vec![origin])
        } else {
            StrokeGeometry::Drag {
                origin,
                current: origin,
                constrained: false,
            }
        };
        let stroke = PrimitiveStroke {
            shape: self.shape,
            style: self.style,
            background: ctx.background,
            backup: ctx.surface.snapshot(),
            geometry,
        };
        if self.shape.is_freehand() {
            stroke.render(ctx.surface.as_mut());
        }
        debug!("Begin {} at {:?}", self.shape.name(), origin);
        self.stroke = Some(stroke);
    }

    /// Feed the next pointer position and redraw the preview
    pub fn update(&mut self, ctx: &mut EditContext, point: Pos2, constrained: bool) {
        let Some(stroke) = self.stroke.as_mut() else {
            return;
        };
        match &mut stroke.geometry {
            StrokeGeometry::Path(points) => {
                if points.last() != Some(&point) {
                    points.push(point);
                }
            }
            StrokeGeometry::Drag {
                current,
                constrained: c,
                ..
            } => {
                *current = point;
                *c = constrained;
            }
        }
        ctx.surface.put_block(0, 0, &stroke.backup);
        stroke.render(ctx.surface.as_mut());
    }

    /// Keep what the preview shows and capture it
    pub fn commit(&mut self, ctx: &mut EditContext) -> bool {
        let Some(stroke) = self.stroke.take() else {
            return false;
        };
        ctx.capture();
        debug!("Committed {}", stroke.shape.name());
        true
    }

    /// Abandon the stroke and restore the pixels it started from
    pub fn cancel(&mut self, ctx: &mut EditContext) -> bool {
        let Some(stroke) = self.stroke.take() else {
            return false;
        };
        ctx.surface.put_block(0, 0, &stroke.backup);
        debug!("Cancelled {}", stroke.shape.name());
        true
    }
}

fn positive(value: f32, what: &str) -> Option<f32> {
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        warn!("Ignoring invalid {}: {}", what, value);
        None
    }
}

impl Tool for PrimitiveRenderer {
    fn name(&self) -> &'static str {
        self.shape.name()
    }

    fn deactivate(&mut self, ctx: &mut EditContext) {
        self.cancel(ctx);
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut EditContext) {
        self.begin(ctx, event.pos);
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut EditContext) {
        self.update(ctx, event.pos, event.constrained());
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &mut EditContext) {
        let Some(stroke) = self.stroke.as_ref() else {
            return;
        };
        if stroke.last_point() != event.pos {
            self.update(ctx, event.pos, event.constrained());
        }
        self.commit(ctx);
    }

    fn on_key(&mut self, event: &KeyEvent, ctx: &mut EditContext) -> bool {
        event.key == egui::Key::Escape && self.cancel(ctx)
    }
}
