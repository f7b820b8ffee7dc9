use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::event::{EditorEvent, EventHandler};

/// Broadcasts editor notifications to the host.
///
/// Handlers run in subscription order. An event emitted while another is
/// being delivered is queued and delivered once the current one is done.
/// Handlers subscribed during delivery start with the next event.
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
    joining: RefCell<Vec<Box<dyn EventHandler>>>,
    queue: RefCell<VecDeque<EditorEvent>>,
    delivering: Cell<bool>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handler_count()))
            .field("queued", &self.queue.borrow().len())
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            joining: RefCell::new(Vec::new()),
            queue: RefCell::new(VecDeque::new()),
            delivering: Cell::new(false),
        }
    }

    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        let handler: Box<dyn EventHandler> = Box::new(handler);
        match self.handlers.try_borrow_mut() {
            Ok(mut handlers) => handlers.push(handler),
            Err(_) => self.joining.borrow_mut().push(handler),
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.try_borrow().map_or(0, |handlers| handlers.len())
    }

    pub fn emit(&self, event: EditorEvent) {
        self.queue.borrow_mut().push_back(event);
        if self.delivering.replace(true) {
            return;
        }
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            let mut handlers = self.handlers.borrow_mut();
            for handler in handlers.iter_mut() {
                handler.handle_event(&event);
            }
            handlers.append(&mut self.joining.borrow_mut());
        }
        self.delivering.set(false);
    }
}
