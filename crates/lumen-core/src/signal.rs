//! Reactive values with change subscriptions.
//!
//! A [`Signal`] holds a current value and a list of listeners. Setting a
//! different value notifies every listener that is still subscribed at the
//! moment it is reached. Listeners are free to read the signal, set other
//! signals or drop their own [`Subscription`] while being notified.
//!
//! ```
//! use lumen_core::signal::Signal;
//!
//! let visible = Signal::new(false);
//! let _sub = visible.subscribe(|v| println!("visible = {v}"));
//! visible.set(true);
//! assert!(visible.get());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct SignalInner<T> {
    value: T,
    listeners: Vec<(u64, Listener<T>)>,
    next_id: u64,
}

/// Shared reactive cell. Clones observe the same value.
pub struct Signal<T> {
    inner: Rc<RefCell<SignalInner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Signal")
            .field("value", &inner.value)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner {
                value,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Replace the value, notifying listeners if it changed.
    ///
    /// Returns `true` when the value changed.
    pub fn set(&self, value: T) -> bool {
        let ids: Vec<u64> = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return false;
            }
            inner.value = value;
            inner.listeners.iter().map(|(id, _)| *id).collect()
        };

        for id in ids {
            // Re-read per listener: an earlier listener may have unsubscribed
            // this one or changed the value again.
            let (listener, current) = {
                let inner = self.inner.borrow();
                let Some((_, listener)) = inner.listeners.iter().find(|(i, _)| *i == id) else {
                    continue;
                };
                (Rc::clone(listener), inner.value.clone())
            };
            if let Ok(mut callback) = listener.try_borrow_mut() {
                (&mut *callback)(&current);
            };
        }
        true
    }

    /// Register a change listener.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or explicitly unsubscribed.
    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            let listener: Listener<T> = Rc::new(RefCell::new(listener));
            inner.listeners.push((id, listener));
            id
        };

        let weak = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().listeners.retain(|(i, _)| *i != id);
                }
            })),
        }
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Handle keeping a [`Signal`] listener registered.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
