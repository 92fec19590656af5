// Chunk: docs/chunks/text_engine - Editable-text engine for a multi-line text widget

//! Change notifications.
//!
//! Listeners receive a shared reference to each event after the engine state is
//! consistent again. They cannot reach the engine, so an edit can never re-enter
//! itself from a callback.

use std::fmt;

use crate::selection::Selection;

/// Bytes displaced by an edit. Enough for a host to build undo on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub pos: usize,
    pub deleted: Vec<u8>,
    pub inserted: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEvent {
    Inserted(TextChange),
    Deleted(TextChange),
    Replaced(TextChange),
    /// The text or the cursor changed; carries the new cursor position.
    Changed { cursor: usize },
    /// A selection was made; carries the new range.
    Selected(Selection),
    /// The selection was dropped; carries the range that was selected.
    Deselected(Selection),
}

/// Receiver of [`TextEvent`]s.
pub trait TextListener {
    fn on_event(&mut self, event: &TextEvent);
}

impl<F> TextListener for F
where
    F: FnMut(&TextEvent),
{
    fn on_event(&mut self, event: &TextEvent) {
        self(event)
    }
}

/// Registered listeners, notified in registration order.
#[derive(Default)]
pub(crate) struct Listeners(Vec<Box<dyn TextListener>>);

impl Listeners {
    pub(crate) fn add(&mut self, listener: Box<dyn TextListener>) {
        self.0.push(listener);
    }

    pub(crate) fn emit(&mut self, event: &TextEvent) {
        for listener in self.0.iter_mut() {
            listener.on_event(event);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listeners({})", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_closures_are_listeners() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut listeners = Listeners::default();
        listeners.add(Box::new(move |event: &TextEvent| sink.borrow_mut().push(event.clone())));
        listeners.emit(&TextEvent::Changed { cursor: 3 });
        assert_eq!(*seen.borrow(), vec![TextEvent::Changed { cursor: 3 }]);
    }

    #[test]
    fn test_debug_shows_count() {
        let mut listeners = Listeners::default();
        listeners.add(Box::new(|_: &TextEvent| {}));
        assert_eq!(format!("{listeners:?}"), "Listeners(1)");
    }
}
