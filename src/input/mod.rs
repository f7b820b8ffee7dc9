use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

use crate::command::Command;

/// Phase of a pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer event in logical surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: Pos2,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn down(pos: Pos2) -> Self {
        Self::new(PointerKind::Down, pos)
    }

    pub fn moved(pos: Pos2) -> Self {
        Self::new(PointerKind::Move, pos)
    }

    pub fn up(pos: Pos2) -> Self {
        Self::new(PointerKind::Up, pos)
    }

    fn new(kind: PointerKind, pos: Pos2) -> Self {
        Self {
            kind,
            pos,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Ctrl or shift: square shapes, snapped lines, free aspect while resizing
    pub fn constrained(&self) -> bool {
        self.modifiers.ctrl || self.modifiers.shift || self.modifiers.command
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Everything the editor reacts to
#[derive(Debug, Clone)]
pub enum EditorInput {
    Pointer(PointerEvent),
    Key(KeyEvent),
    Command(Command),
}

impl From<PointerEvent> for EditorInput {
    fn from(event: PointerEvent) -> Self {
        EditorInput::Pointer(event)
    }
}

impl From<KeyEvent> for EditorInput {
    fn from(event: KeyEvent) -> Self {
        EditorInput::Key(event)
    }
}

impl From<Command> for EditorInput {
    fn from(command: Command) -> Self {
        EditorInput::Command(command)
    }
}

/// Converts raw egui input over the canvas area into [`EditorInput`]s
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Option<Rect>,
    /// Screen points per logical pixel
    zoom: f32,
    dragging: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect: None,
            zoom: 1.0,
            dragging: false,
        }
    }

    /// Where the surface is shown on screen and at which zoom
    pub fn set_canvas_rect(&mut self, rect: Rect, zoom: f32) {
        self.canvas_rect = Some(rect);
        if zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    fn to_logical(&self, pos: Pos2) -> Option<Pos2> {
        let rect = self.canvas_rect?;
        Some(((pos - rect.min) / self.zoom).to_pos2())
    }

    /// Process raw egui input. Keys are forwarded only when no widget has focus.
    pub fn process_input(&mut self, ctx: &Context) -> Vec<EditorInput> {
        let mut events = Vec::new();
        let wants_keyboard = ctx.wants_keyboard_input();

        ctx.input(|input| {
            let modifiers = input.modifiers;
            let hover = input.pointer.hover_pos();

            if input.pointer.button_pressed(PointerButton::Primary) {
                if let (Some(pos), Some(rect)) = (hover, self.canvas_rect) {
                    if rect.contains(pos) {
                        if let Some(logical) = self.to_logical(pos) {
                            self.dragging = true;
                            events.push(PointerEvent::down(logical).with_modifiers(modifiers).into());
                        }
                    }
                }
            }

            if self.dragging && hover.is_some() && hover != self.last_pointer_pos {
                if let Some(logical) = hover.and_then(|pos| self.to_logical(pos)) {
                    events.push(PointerEvent::moved(logical).with_modifiers(modifiers).into());
                }
            }

            if self.dragging && input.pointer.button_released(PointerButton::Primary) {
                self.dragging = false;
                let last = hover.or(self.last_pointer_pos);
                if let Some(logical) = last.and_then(|pos| self.to_logical(pos)) {
                    events.push(PointerEvent::up(logical).with_modifiers(modifiers).into());
                }
            }

            self.last_pointer_pos = hover.or(self.last_pointer_pos);

            if wants_keyboard {
                return;
            }
            for event in &input.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                {
                    events.push(KeyEvent::new(*key).with_modifiers(*modifiers).into());
                }
            }
        });

        events
    }
}
