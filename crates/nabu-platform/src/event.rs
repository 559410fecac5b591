//! Events delivered to the application core.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::input::InputEvent;

/// Event produced by a backend while pumping its native queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Input(InputEvent),

    /// Framebuffer size changed (physical pixels).
    Resized { width: u32, height: u32 },

    CloseRequested,
}

/// Receiver of backend events, implemented by the embedding application.
pub trait EventSink {
    fn push(&self, event: Event);
}

/// Opaque application handle threaded through backend init.
pub type CoreHandle = Rc<dyn EventSink>;

/// FIFO event sink.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: RefCell<VecDeque<Event>>,
}

impl EventQueue {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pop(&self) -> Option<Event> {
        self.events.borrow_mut().pop_front()
    }

    /// Removes and returns every queued event in arrival order.
    pub fn drain(&self) -> Vec<Event> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for EventQueue {
    fn push(&self, event: Event) {
        self.events.borrow_mut().push_back(event);
    }
}
