use egui::{Color32, Rect, pos2, vec2};
use log::warn;

use crate::config::EditorConfig;
use crate::event::{EditorEvent, EventBus};
use crate::history::HistoryLog;
use crate::surface::RasterSurface;

/// Shared state every editing component works against.
///
/// Bundles the surface with the history that snapshots it and the bus that
/// reports what happened, so components can be handed one `&mut` instead of
/// several.
pub struct EditContext {
    pub surface: Box<dyn RasterSurface>,
    pub history: HistoryLog,
    pub events: EventBus,
    pub config: EditorConfig,
    /// Color the surface shows where nothing has been drawn
    pub background: Color32,
}

impl std::fmt::Debug for EditContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditContext")
            .field("width", &self.surface.width())
            .field("height", &self.surface.height())
            .field("history", &self.history)
            .field("background", &self.background)
            .finish()
    }
}

impl EditContext {
    pub fn new(surface: Box<dyn RasterSurface>, config: EditorConfig) -> Self {
        Self {
            surface,
            history: HistoryLog::new(config.worklog_limit),
            events: EventBus::new(),
            background: config.background_color,
            config,
        }
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// The whole surface in logical pixels
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(self.width() as f32, self.height() as f32))
    }

    /// Paint the background color over the whole surface
    pub fn fill_background(&mut self) {
        self.surface.clear_with(self.background);
    }

    /// Reallocate the surface, logging instead of failing
    pub fn resize_surface(&mut self, width: u32, height: u32) -> bool {
        match self.surface.resize(width, height) {
            Ok(()) => true,
            Err(err) => {
                warn!("Could not resize surface: {}", err);
                false
            }
        }
    }

    pub fn capture(&mut self) {
        self.history.capture_state(self.surface.as_ref(), false, &self.events);
    }

    /// Capture the blank starting point of a session
    pub fn capture_initial(&mut self) {
        self.history.capture_state(self.surface.as_ref(), true, &self.events);
    }

    pub fn re_capture(&mut self) {
        self.history.re_capture_state(self.surface.as_ref(), &self.events);
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo_state(self.surface.as_mut(), &self.events)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo_state(self.surface.as_mut(), &self.events)
    }

    pub fn emit(&self, event: EditorEvent) {
        self.events.emit(event);
    }
}
