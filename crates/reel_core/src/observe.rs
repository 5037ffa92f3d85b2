//! Change observers
//!
//! Hosts subscribe closures that run whenever a published value changes.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned by [`Observers::subscribe`]
    pub struct ObserverId;
}

/// Observer callback type
pub type Observer<T> = Box<dyn FnMut(&T)>;

/// Set of observers notified with a shared reference to the new value
pub struct Observers<T> {
    handlers: SlotMap<ObserverId, Observer<T>>,
}

impl<T> Observers<T> {
    pub fn new() -> Self {
        Self {
            handlers: SlotMap::with_key(),
        }
    }

    /// Register an observer
    pub fn subscribe<F>(&mut self, handler: F) -> ObserverId
    where
        F: FnMut(&T) + 'static,
    {
        self.handlers.insert(Box::new(handler))
    }

    /// Remove an observer, returning whether it was registered
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.handlers.remove(id).is_some()
    }

    /// Call every observer with `value`
    pub fn notify(&mut self, value: &T) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(value);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_notify_and_unsubscribe() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::new();

        let seen_clone = seen.clone();
        let id = observers.subscribe(move |value: &i32| seen_clone.borrow_mut().push(*value));
        assert_eq!(observers.len(), 1);

        observers.notify(&3);
        observers.notify(&5);
        assert_eq!(*seen.borrow(), vec![3, 5]);

        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&8);
        assert_eq!(*seen.borrow(), vec![3, 5]);
        assert!(observers.is_empty());
    }
}
