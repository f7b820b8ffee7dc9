mod context;

pub use context::EditContext;

use egui::{Color32, Pos2};

use crate::inserter::PasteMode;
use crate::surface::PixelBlock;
use crate::tools::ToolKind;

/// Discrete actions a host can ask the editor to perform
#[derive(Debug, Clone)]
pub enum Command {
    /// Switch tools, closing whatever the previous tool had in progress
    SelectTool(ToolKind),
    Undo,
    Redo,
    SelectAll,
    Crop,
    Pixelize,
    ClearArea,
    /// Commit the image currently being placed
    FinishPlacing,
    /// Drop the image currently being placed and roll back its paste
    CancelPlacing,
    /// Change the canvas size, keeping content anchored top-left
    ResizeCanvas { width: u32, height: u32 },
    /// Resample the whole canvas to a new size
    ScaleCanvas { width: u32, height: u32 },
    RotateClockwise,
    /// Insert an image using one of the paste modes
    Paste { image: PixelBlock, mode: PasteMode },
    /// Resolve an image waiting for the user's paste mode choice
    ChoosePasteMode(PasteMode),
    /// Draw an image unscaled with its top-left corner at `at`
    StampBitmap { image: PixelBlock, at: Pos2 },
    SetLineWidth(f32),
    SetArrowLength(f32),
    SetEraserWidth(f32),
    SetShadowOn(bool),
    SetLineColor(Color32),
    SetFillColor(Color32),
    SetBackground(Color32),
    /// Pixelize block size, see [`crate::config::PixelSize`]
    SetPixelSize(String),
    /// Start over with a blank surface
    Clear,
}
