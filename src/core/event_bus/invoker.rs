//=========================================================================
// Invoker
//=========================================================================
//
// Event source owning its channels.
//
// An invoker declares the (shape, category) channels it can fire before
// registering them with the bus. Handles are cheap to clone; every clone
// refers to the same channels, which is how the bus back-fills listeners
// into an invoker it only holds a clone of.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::{EventArgs, EventChannel, EventKey, Listener};
use crate::core::error::EventError;

//=== ChannelSet ==========================================================

/// Per-shape channel maps owned by an [`Invoker`].
pub struct ChannelSet<K: EventKey> {
    pub(crate) no_argument: RefCell<HashMap<K, EventChannel<()>>>,
    pub(crate) double_float: RefCell<HashMap<K, EventChannel<(f32, f32)>>>,
}

impl<K: EventKey> ChannelSet<K> {
    fn new() -> Self {
        Self {
            no_argument: RefCell::new(HashMap::new()),
            double_float: RefCell::new(HashMap::new()),
        }
    }
}

struct InvokerInner<K: EventKey> {
    label: String,
    channels: ChannelSet<K>,
}

//=== Invoker =============================================================

/// Shared handle to an event source.
pub struct Invoker<K: EventKey> {
    inner: Rc<InvokerInner<K>>,
}

impl<K: EventKey> Invoker<K> {
    /// Creates an invoker with no channels. `label` only appears in logs.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(InvokerInner {
                label: label.into(),
                channels: ChannelSet::new(),
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Returns true if both handles refer to the same invoker.
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    //--- Channel Declaration ----------------------------------------------

    /// Declares a channel this invoker can fire.
    ///
    /// Declaring an existing channel keeps its listeners.
    pub fn declare<A: EventArgs>(&self, category: K) {
        A::channels(&self.inner.channels)
            .borrow_mut()
            .entry(category)
            .or_default();
    }

    pub fn declare_no_argument(&self, category: K) {
        self.declare::<()>(category);
    }

    pub fn declare_double_float(&self, category: K) {
        self.declare::<(f32, f32)>(category);
    }

    /// Returns true if a channel of shape `A` was declared for `category`.
    pub fn declares<A: EventArgs>(&self, category: K) -> bool {
        A::channels(&self.inner.channels)
            .borrow()
            .contains_key(&category)
    }

    //--- Listener Management ----------------------------------------------

    /// Attaches a listener to a declared channel.
    pub fn add_listener<A: EventArgs>(
        &self,
        category: K,
        listener: Listener<A>,
    ) -> Result<(), EventError<K>> {
        let mut channels = A::channels(&self.inner.channels).borrow_mut();
        match channels.get_mut(&category) {
            Some(channel) => {
                channel.add(listener);
                Ok(())
            }
            None => Err(self.undeclared::<A>(category)),
        }
    }

    /// Detaches a listener from a declared channel.
    ///
    /// Returns `Ok(false)` if the listener was not attached.
    pub fn remove_listener<A: EventArgs>(
        &self,
        category: K,
        listener: &Listener<A>,
    ) -> Result<bool, EventError<K>> {
        let mut channels = A::channels(&self.inner.channels).borrow_mut();
        match channels.get_mut(&category) {
            Some(channel) => Ok(channel.remove(listener)),
            None => Err(self.undeclared::<A>(category)),
        }
    }

    /// Number of listeners attached to a channel (0 if undeclared).
    pub fn listener_count<A: EventArgs>(&self, category: K) -> usize {
        A::channels(&self.inner.channels)
            .borrow()
            .get(&category)
            .map_or(0, EventChannel::len)
    }

    //--- Invocation -------------------------------------------------------

    /// Calls every listener of the channel synchronously, in attachment
    /// order, and returns how many were called.
    ///
    /// The listener list is copied before the first call, so listeners may
    /// register or remove listeners (including on this channel) without
    /// affecting the current invocation.
    pub fn invoke<A: EventArgs>(&self, category: K, args: A) -> Result<usize, EventError<K>> {
        let snapshot = {
            let channels = A::channels(&self.inner.channels).borrow();
            match channels.get(&category) {
                Some(channel) => channel.snapshot(),
                None => return Err(self.undeclared::<A>(category)),
            }
        };

        trace!(
            "{} invoking {:?} ({}) on {} listener(s)",
            self.inner.label,
            category,
            A::SHAPE,
            snapshot.len()
        );

        for listener in &snapshot {
            listener.call(args);
        }

        Ok(snapshot.len())
    }

    pub fn invoke_no_argument(&self, category: K) -> Result<usize, EventError<K>> {
        self.invoke(category, ())
    }

    pub fn invoke_double_float(
        &self,
        category: K,
        first: f32,
        second: f32,
    ) -> Result<usize, EventError<K>> {
        self.invoke(category, (first, second))
    }

    //--- Internal Helpers -------------------------------------------------

    fn undeclared<A: EventArgs>(&self, category: K) -> EventError<K> {
        warn!(
            "Invoker {} has no {} channel for {:?}",
            self.inner.label,
            A::SHAPE,
            category
        );
        EventError::UndeclaredChannel {
            invoker: self.inner.label.clone(),
            category,
            shape: A::SHAPE,
        }
    }
}

impl<K: EventKey> Clone for Invoker<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: EventKey> fmt::Debug for Invoker<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("label", &self.inner.label)
            .field("no_argument", &self.inner.channels.no_argument.borrow().len())
            .field("double_float", &self.inner.channels.double_float.borrow().len())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_bus::EventShape;
    use std::cell::Cell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestEvent {
        Ping,
        Shake,
    }

    impl EventKey for TestEvent {
        fn all() -> &'static [Self] {
            &[TestEvent::Ping, TestEvent::Shake]
        }
    }

    fn counter() -> (Rc<Cell<u32>>, Listener<()>) {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        (count, Listener::no_argument(move || sink.set(sink.get() + 1)))
    }

    #[test]
    fn invoke_without_listeners_is_noop() {
        let invoker = Invoker::new("game");
        invoker.declare_no_argument(TestEvent::Ping);

        assert_eq!(invoker.invoke_no_argument(TestEvent::Ping), Ok(0));
    }

    #[test]
    fn invoke_undeclared_channel_fails() {
        let invoker = Invoker::<TestEvent>::new("game");

        let err = invoker.invoke_no_argument(TestEvent::Ping).unwrap_err();
        assert_eq!(
            err,
            EventError::UndeclaredChannel {
                invoker: "game".to_string(),
                category: TestEvent::Ping,
                shape: EventShape::NoArgument,
            }
        );
    }

    #[test]
    fn shapes_are_independent_channels() {
        let invoker = Invoker::new("player");
        invoker.declare_double_float(TestEvent::Shake);

        assert!(invoker.declares::<(f32, f32)>(TestEvent::Shake));
        assert!(!invoker.declares::<()>(TestEvent::Shake));

        let (_, listener) = counter();
        assert!(invoker.add_listener(TestEvent::Shake, listener).is_err());
    }

    #[test]
    fn remove_from_undeclared_channel_fails() {
        let invoker = Invoker::new("player");
        invoker.declare_double_float(TestEvent::Shake);
        let (_, listener) = counter();

        let err = invoker.remove_listener(TestEvent::Shake, &listener).unwrap_err();

        assert_eq!(
            err,
            EventError::UndeclaredChannel {
                invoker: "player".to_string(),
                category: TestEvent::Shake,
                shape: EventShape::NoArgument,
            }
        );
        assert!(invoker.declares::<(f32, f32)>(TestEvent::Shake));
    }

    #[test]
    fn add_and_invoke_calls_listener_once() {
        let invoker = Invoker::new("game");
        invoker.declare_no_argument(TestEvent::Ping);
        let (count, listener) = counter();

        invoker.add_listener(TestEvent::Ping, listener).unwrap();
        assert_eq!(invoker.invoke_no_argument(TestEvent::Ping), Ok(1));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn double_float_arguments_reach_listener() {
        let invoker = Invoker::new("player");
        invoker.declare_double_float(TestEvent::Shake);
        let seen = Rc::new(Cell::new((0.0, 0.0)));
        let sink = Rc::clone(&seen);

        invoker
            .add_listener(TestEvent::Shake, Listener::double_float(move |d, m| sink.set((d, m))))
            .unwrap();
        invoker.invoke_double_float(TestEvent::Shake, 0.5, 0.25).unwrap();

        assert_eq!(seen.get(), (0.5, 0.25));
    }

    #[test]
    fn remove_listener_stops_delivery() {
        let invoker = Invoker::new("game");
        invoker.declare_no_argument(TestEvent::Ping);
        let (count, listener) = counter();

        invoker.add_listener(TestEvent::Ping, listener.clone()).unwrap();
        assert_eq!(invoker.remove_listener(TestEvent::Ping, &listener), Ok(true));
        invoker.invoke_no_argument(TestEvent::Ping).unwrap();

        assert_eq!(count.get(), 0);
        assert_eq!(invoker.remove_listener(TestEvent::Ping, &listener), Ok(false));
    }

    #[test]
    fn clones_share_channels() {
        let invoker = Invoker::new("game");
        invoker.declare_no_argument(TestEvent::Ping);
        let copy = invoker.clone();
        let (count, listener) = counter();

        copy.add_listener(TestEvent::Ping, listener).unwrap();
        invoker.invoke_no_argument(TestEvent::Ping).unwrap();

        assert!(invoker.same_as(&copy));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_added_during_invoke_runs_next_time() {
        let invoker = Invoker::new("game");
        invoker.declare_no_argument(TestEvent::Ping);
        let (count, late) = counter();

        let handle = invoker.clone();
        let armed = Rc::new(Cell::new(true));
        invoker
            .add_listener(
                TestEvent::Ping,
                Listener::no_argument(move || {
                    if armed.replace(false) {
                        handle.add_listener(TestEvent::Ping, late.clone()).unwrap();
                    }
                }),
            )
            .unwrap();

        assert_eq!(invoker.invoke_no_argument(TestEvent::Ping), Ok(1));
        assert_eq!(count.get(), 0);

        assert_eq!(invoker.invoke_no_argument(TestEvent::Ping), Ok(2));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn redeclaring_keeps_listeners() {
        let invoker = Invoker::new("game");
        invoker.declare_no_argument(TestEvent::Ping);
        let (_, listener) = counter();
        invoker.add_listener(TestEvent::Ping, listener).unwrap();

        invoker.declare_no_argument(TestEvent::Ping);

        assert_eq!(invoker.listener_count::<()>(TestEvent::Ping), 1);
    }
}
