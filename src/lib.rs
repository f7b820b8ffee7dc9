#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod history;
pub mod input;
pub mod inserter;
pub mod loader;
pub mod panels;
pub mod resizer;
pub mod selection;
pub mod surface;
pub mod texture_manager;
pub mod tools;

pub use app::EditorApp;
pub use command::{Command, EditContext};
pub use config::{EditorConfig, PixelSize};
pub use editor::Editor;
pub use error::{EditorError, EditorResult};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use history::{HistoryLog, Snapshot, SnapshotRef};
pub use input::{EditorInput, InputHandler, KeyEvent, PointerEvent, PointerKind};
pub use inserter::PasteMode;
pub use loader::{ImageSender, PendingImage};
pub use selection::{Edges, SelectionArea, SelectionModel};
pub use surface::{Canvas, PixelBlock, RasterSurface};
pub use tools::{PrimitiveRenderer, ShapeKind, StrokeStyle, Tool, ToolKind};
