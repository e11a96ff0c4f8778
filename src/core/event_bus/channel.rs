//=========================================================================
// Event Channel
//=========================================================================
//
// Ordered listener list for a single (category, shape) pair.
//
// Architecture:
//   Listener<A> = Rc<dyn Fn(A)>  (identity = allocation)
//   EventChannel<A> = Vec<Listener<A>>
//
// Invocation runs over a snapshot of the list, so a listener that adds
// or removes listeners only affects the next invocation.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::EventArgs;

//=== Listener ============================================================

/// Callback attached to an event channel.
///
/// Cloning a listener shares the underlying closure. Two listeners compare
/// equal only if they share the same allocation, which is how the bus
/// identifies a listener it back-filled onto several invokers.
pub struct Listener<A: EventArgs> {
    callback: Rc<dyn Fn(A)>,
}

impl<A: EventArgs> Listener<A> {
    /// Wraps a closure taking the channel's argument tuple.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Calls the listener with `args`.
    pub fn call(&self, args: A) {
        (self.callback)(args)
    }

    /// Returns true if both listeners share the same callback allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl Listener<()> {
    /// Wraps a closure for a no-argument channel.
    pub fn no_argument<F>(callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::new(move |()| callback())
    }
}

impl Listener<(f32, f32)> {
    /// Wraps a closure for a two-float channel.
    pub fn double_float<F>(callback: F) -> Self
    where
        F: Fn(f32, f32) + 'static,
    {
        Self::new(move |(first, second)| callback(first, second))
    }
}

impl<A: EventArgs> Clone for Listener<A> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<A: EventArgs> fmt::Debug for Listener<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("shape", &A::SHAPE)
            .field("callback", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

//=== EventChannel ========================================================

/// Listeners attached to one event category of one argument shape.
pub struct EventChannel<A: EventArgs> {
    listeners: Vec<Listener<A>>,
}

impl<A: EventArgs> EventChannel<A> {
    /// Creates a channel with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Appends a listener. Attachment order is invocation order.
    pub fn add(&mut self, listener: Listener<A>) {
        self.listeners.push(listener);
    }

    /// Removes the first attachment of `listener`.
    ///
    /// Returns false if the listener was not attached.
    pub fn remove(&mut self, listener: &Listener<A>) -> bool {
        match self.listeners.iter().position(|l| l.ptr_eq(listener)) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns a copy of the attached listeners, in attachment order.
    pub fn snapshot(&self) -> Vec<Listener<A>> {
        self.listeners.clone()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<A: EventArgs> Default for EventChannel<A> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
