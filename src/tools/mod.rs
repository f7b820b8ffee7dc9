use serde::{Deserialize, Serialize};

use crate::command::EditContext;
use crate::input::{KeyEvent, PointerEvent};

pub mod geometry;
mod primitive;
mod render;

pub use primitive::{PrimitiveRenderer, PrimitiveStroke, StrokeStyle};
pub use render::Shadow;

/// Interface every pointer-driven tool implements
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Called when the tool becomes the active one
    fn activate(&mut self, _ctx: &mut EditContext) {
        // default: do nothing
    }

    /// Called when another tool takes over. Must leave nothing half-done.
    fn deactivate(&mut self, ctx: &mut EditContext);

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut EditContext);

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut EditContext);

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &mut EditContext);

    /// Return whether the key was consumed
    fn on_key(&mut self, _event: &KeyEvent, _ctx: &mut EditContext) -> bool {
        false
    }
}

/// Shapes the primitive renderer can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
    Arrow,
    Rect,
    Ellipse,
    Brush,
    Eraser,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Line,
        ShapeKind::Arrow,
        ShapeKind::Rect,
        ShapeKind::Ellipse,
        ShapeKind::Brush,
        ShapeKind::Eraser,
    ];

    /// Freehand shapes record every pointer position
    pub fn is_freehand(self) -> bool {
        matches!(self, ShapeKind::Brush | ShapeKind::Eraser)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Line => "Line",
            ShapeKind::Arrow => "Arrow",
            ShapeKind::Rect => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Brush => "Brush",
            ShapeKind::Eraser => "Eraser",
        }
    }
}

/// The tool pointer and key input is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Shape(ShapeKind),
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Shape(shape) => shape.name(),
        }
    }
}
