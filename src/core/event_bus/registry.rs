//=========================================================================
// Event Bus Registry
//=========================================================================
//
// Order-independent wiring of invokers and listeners.
//
// Architecture (per argument shape):
//   invokers:  HashMap<K, Vec<Invoker<K>>>
//   listeners: HashMap<K, Vec<Listener<A>>>
//
//   register_invoker()  → back-fill known listeners → remember invoker
//   register_listener() → attach to known invokers  → remember listener
//
// The bus only wires. Events are fired on the invokers themselves.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{EventArgs, EventKey, Invoker, Listener};
use crate::core::error::EventError;

//=== Wiring ==============================================================

/// Invokers and listeners registered for one argument shape.
pub struct Wiring<K: EventKey, A: EventArgs> {
    invokers: HashMap<K, Vec<Invoker<K>>>,
    listeners: HashMap<K, Vec<Listener<A>>>,
}

impl<K: EventKey, A: EventArgs> Wiring<K, A> {
    fn new() -> Self {
        Self {
            invokers: HashMap::new(),
            listeners: HashMap::new(),
        }
    }

    /// Detaches every wired listener from its invokers, then empties every
    /// known category and creates entries for all of them.
    fn reset(&mut self) {
        for (&category, invokers) in &self.invokers {
            let Some(listeners) = self.listeners.get(&category) else {
                continue;
            };
            for invoker in invokers {
                for listener in listeners {
                    if let Err(e) = invoker.remove_listener(category, listener) {
                        warn!("Failed to detach listener on reset: {}", e);
                    }
                }
            }
        }

        for invokers in self.invokers.values_mut() {
            invokers.clear();
        }
        for listeners in self.listeners.values_mut() {
            listeners.clear();
        }
        for &category in K::all() {
            self.ensure(category);
        }
    }

    fn ensure(&mut self, category: K) {
        self.invokers.entry(category).or_default();
        self.listeners.entry(category).or_default();
    }
}

//=== EventBus ============================================================

/// Registry connecting invokers to listeners, for both argument shapes.
///
/// Whichever side registers second completes the connection, so gameplay
/// objects can register in any order.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use sidescroll_runtime::core::event_bus::{EventBus, EventKey, Invoker, Listener};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Event { GameOver }
/// impl EventKey for Event {
///     fn all() -> &'static [Self] { &[Event::GameOver] }
/// }
///
/// let mut bus = EventBus::new();
/// bus.initialize();
///
/// let fired = Rc::new(Cell::new(false));
/// let sink = Rc::clone(&fired);
/// bus.register_listener(Event::GameOver, Listener::no_argument(move || sink.set(true)));
///
/// let game = Invoker::new("game");
/// game.declare_no_argument(Event::GameOver);
/// bus.register_invoker::<()>(&game, Event::GameOver).unwrap();
///
/// game.invoke_no_argument(Event::GameOver).unwrap();
/// assert!(fired.get());
/// ```
pub struct EventBus<K: EventKey> {
    pub(crate) no_argument: Wiring<K, ()>,
    pub(crate) double_float: Wiring<K, (f32, f32)>,
}

impl<K: EventKey> EventBus<K> {
    /// Creates a bus with no entries. Call [`EventBus::initialize`] before
    /// the first registration of a session.
    pub fn new() -> Self {
        Self {
            no_argument: Wiring::new(),
            double_float: Wiring::new(),
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Resets both shape registries to empty entries for every category.
    ///
    /// Listeners the bus attached to invokers are detached first, so the
    /// old wiring stops firing. Calling it again is harmless and gives the
    /// same empty state.
    pub fn initialize(&mut self) {
        self.no_argument.reset();
        self.double_float.reset();
        info!("Event bus initialized ({} categories)", K::all().len());
    }

    //--- Registration -----------------------------------------------------

    /// Registers `invoker` as a source of `(A, category)` events.
    ///
    /// Every listener registered earlier for that channel is attached to
    /// the invoker immediately. The invoker must have declared the channel.
    /// Registering the same invoker twice for a channel is ignored.
    pub fn register_invoker<A: EventArgs>(
        &mut self,
        invoker: &Invoker<K>,
        category: K,
    ) -> Result<(), EventError<K>> {
        let wiring = A::wiring_mut(self);
        wiring.ensure(category);

        if !invoker.declares::<A>(category) {
            warn!(
                "Invoker {} registered for {:?} ({}) without declaring the channel",
                invoker.label(),
                category,
                A::SHAPE
            );
            return Err(EventError::UndeclaredChannel {
                invoker: invoker.label().to_string(),
                category,
                shape: A::SHAPE,
            });
        }

        let invokers = wiring.invokers.entry(category).or_default();
        if invokers.iter().any(|known| known.same_as(invoker)) {
            warn!(
                "Invoker {} already registered for {:?} ({}), skipping",
                invoker.label(),
                category,
                A::SHAPE
            );
            return Ok(());
        }

        let listeners = wiring.listeners.entry(category).or_default();
        for listener in listeners.iter() {
            invoker.add_listener(category, listener.clone())?;
        }

        debug!(
            "Registered invoker {} for {:?} ({}), back-filled {} listener(s)",
            invoker.label(),
            category,
            A::SHAPE,
            listeners.len()
        );

        wiring
            .invokers
            .entry(category)
            .or_default()
            .push(invoker.clone());
        Ok(())
    }

    /// Registers a listener for `(A, category)` events.
    ///
    /// The listener is attached to every invoker registered earlier for
    /// that channel, and to every invoker registered later.
    pub fn register_listener<A: EventArgs>(&mut self, category: K, listener: Listener<A>) {
        let wiring = A::wiring_mut(self);
        wiring.ensure(category);

        let invokers = wiring.invokers.entry(category).or_default();
        for invoker in invokers.iter() {
            if let Err(e) = invoker.add_listener(category, listener.clone()) {
                warn!("Failed to attach listener: {}", e);
            }
        }

        debug!(
            "Registered listener for {:?} ({}) on {} invoker(s)",
            category,
            A::SHAPE,
            invokers.len()
        );

        wiring
            .listeners
            .entry(category)
            .or_default()
            .push(listener);
    }

    /// Detaches a listener from every registered invoker and forgets it.
    ///
    /// Returns false if the listener was never registered for the channel.
    pub fn unregister_listener<A: EventArgs>(&mut self, category: K, listener: &Listener<A>) -> bool {
        let wiring = A::wiring_mut(self);
        wiring.ensure(category);

        let listeners = wiring.listeners.entry(category).or_default();
        let Some(index) = listeners.iter().position(|l| l.ptr_eq(listener)) else {
            debug!("Listener for {:?} ({}) not registered, skipping", category, A::SHAPE);
            return false;
        };
        listeners.remove(index);

        for invoker in wiring.invokers.entry(category).or_default().iter() {
            if let Err(e) = invoker.remove_listener(category, listener) {
                warn!("Failed to detach listener: {}", e);
            }
        }

        true
    }

    //--- Query API --------------------------------------------------------

    /// Number of listeners registered for a channel.
    pub fn listener_count<A: EventArgs>(&self, category: K) -> usize {
        A::wiring(self).listeners.get(&category).map_or(0, Vec::len)
    }

    /// Number of invokers registered for a channel.
    pub fn invoker_count<A: EventArgs>(&self, category: K) -> usize {
        A::wiring(self).invokers.get(&category).map_or(0, Vec::len)
    }

    /// Logs every listener and invoker registered for a channel.
    pub fn log_listeners<A: EventArgs>(&self, category: K) {
        let wiring = A::wiring(self);
        let invokers = wiring.invokers.get(&category).map(Vec::as_slice).unwrap_or(&[]);
        let listeners = wiring.listeners.get(&category).map(Vec::as_slice).unwrap_or(&[]);

        debug!("{:?} ({}): {} invoker(s)", category, A::SHAPE, invokers.len());
        for invoker in invokers {
            debug!("  invoker {}", invoker.label());
        }
        for listener in listeners {
            debug!("  {:?}", listener);
        }
    }
}

impl<K: EventKey> Default for EventBus<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestEvent {
        DifficultyChanged,
        GameOver,
        CameraShake,
    }

    impl EventKey for TestEvent {
        fn all() -> &'static [Self] {
            &[
                TestEvent::DifficultyChanged,
                TestEvent::GameOver,
                TestEvent::CameraShake,
            ]
        }
    }

    fn counter() -> (Rc<Cell<u32>>, Listener<()>) {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        (count, Listener::no_argument(move || sink.set(sink.get() + 1)))
    }

    fn game_invoker() -> Invoker<TestEvent> {
        let invoker = Invoker::new("game");
        invoker.declare_no_argument(TestEvent::DifficultyChanged);
        invoker.declare_no_argument(TestEvent::GameOver);
        invoker
    }

    fn initialized_bus() -> EventBus<TestEvent> {
        let mut bus = EventBus::new();
        bus.initialize();
        bus
    }

    //--- Order Independence -----------------------------------------------

    #[test]
    fn listener_then_invoker_is_wired() {
        let mut bus = initialized_bus();
        let (count, listener) = counter();

        bus.register_listener(TestEvent::GameOver, listener);
        let game = game_invoker();
        bus.register_invoker::<()>(&game, TestEvent::GameOver).unwrap();

        game.invoke_no_argument(TestEvent::GameOver).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn invoker_then_listener_is_wired() {
        let mut bus = initialized_bus();
        let game = game_invoker();
        bus.register_invoker::<()>(&game, TestEvent::GameOver).unwrap();

        let (count, listener) = counter();
        bus.register_listener(TestEvent::GameOver, listener);

        game.invoke_no_argument(TestEvent::GameOver).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn both_orders_give_identical_wiring() {
        let mut first = initialized_bus();
        let early = game_invoker();
        first.register_invoker::<()>(&early, TestEvent::GameOver).unwrap();
        first.register_listener(TestEvent::GameOver, counter().1);

        let mut second = initialized_bus();
        second.register_listener(TestEvent::GameOver, counter().1);
        let late = game_invoker();
        second.register_invoker::<()>(&late, TestEvent::GameOver).unwrap();

        assert_eq!(early.listener_count::<()>(TestEvent::GameOver), 1);
        assert_eq!(late.listener_count::<()>(TestEvent::GameOver), 1);
        assert_eq!(first.listener_count::<()>(TestEvent::GameOver), 1);
        assert_eq!(second.invoker_count::<()>(TestEvent::GameOver), 1);
    }

    //--- Concrete Scenario ------------------------------------------------

    #[test]
    fn invoke_with_zero_listeners_then_after_registration() {
        let mut bus = initialized_bus();
        let game = game_invoker();
        bus.register_invoker::<()>(&game, TestEvent::DifficultyChanged).unwrap();

        assert_eq!(game.invoke_no_argument(TestEvent::DifficultyChanged), Ok(0));

        let (count, on_difficulty_changed) = counter();
        bus.register_listener(TestEvent::DifficultyChanged, on_difficulty_changed);
        game.invoke_no_argument(TestEvent::DifficultyChanged).unwrap();

        assert_eq!(count.get(), 1);
    }

    //--- Fan-out ----------------------------------------------------------

    #[test]
    fn listener_reaches_every_invoker_of_category() {
        let mut bus = initialized_bus();
        let first = game_invoker();
        let second = game_invoker();
        bus.register_invoker::<()>(&first, TestEvent::GameOver).unwrap();

        let (count, listener) = counter();
        bus.register_listener(TestEvent::GameOver, listener);
        bus.register_invoker::<()>(&second, TestEvent::GameOver).unwrap();

        first.invoke_no_argument(TestEvent::GameOver).unwrap();
        second.invoke_no_argument(TestEvent::GameOver).unwrap();

        assert_eq!(count.get(), 2);
        assert_eq!(bus.invoker_count::<()>(TestEvent::GameOver), 2);
    }

    #[test]
    fn categories_do_not_leak_into_each_other() {
        let mut bus = initialized_bus();
        let game = game_invoker();
        bus.register_invoker::<()>(&game, TestEvent::GameOver).unwrap();
        bus.register_invoker::<()>(&game, TestEvent::DifficultyChanged).unwrap();

        let (count, listener) = counter();
        bus.register_listener(TestEvent::GameOver, listener);
        game.invoke_no_argument(TestEvent::DifficultyChanged).unwrap();

        assert_eq!(count.get(), 0);
    }

    #[test]
    fn shapes_are_wired_separately() {
        let mut bus = initialized_bus();
        let player = Invoker::new("player");
        player.declare_double_float(TestEvent::CameraShake);
        bus.register_invoker::<(f32, f32)>(&player, TestEvent::CameraShake).unwrap();

        // A no-argument listener on the same category never reaches it
        let (count, listener) = counter();
        bus.register_listener(TestEvent::CameraShake, listener);

        let shake = Rc::new(Cell::new((0.0, 0.0)));
        let sink = Rc::clone(&shake);
        bus.register_listener(
            TestEvent::CameraShake,
            Listener::double_float(move |d, m| sink.set((d, m))),
        );

        player.invoke_double_float(TestEvent::CameraShake, 0.5, 0.5).unwrap();

        assert_eq!(count.get(), 0);
        assert_eq!(shake.get(), (0.5, 0.5));
        assert_eq!(bus.listener_count::<()>(TestEvent::CameraShake), 1);
        assert_eq!(bus.listener_count::<(f32, f32)>(TestEvent::CameraShake), 1);
    }

    //--- Edge Cases -------------------------------------------------------

    #[test]
    fn undeclared_invoker_is_rejected() {
        let mut bus = initialized_bus();
        let bare = Invoker::new("bare");

        let result = bus.register_invoker::<()>(&bare, TestEvent::GameOver);

        assert!(result.is_err());
        assert_eq!(bus.invoker_count::<()>(TestEvent::GameOver), 0);
    }

    #[test]
    fn duplicate_invoker_registration_is_ignored() {
        let mut bus = initialized_bus();
        let (count, listener) = counter();
        bus.register_listener(TestEvent::GameOver, listener);

        let game = game_invoker();
        bus.register_invoker::<()>(&game, TestEvent::GameOver).unwrap();
        bus.register_invoker::<()>(&game.clone(), TestEvent::GameOver).unwrap();
        game.invoke_no_argument(TestEvent::GameOver).unwrap();

        assert_eq!(count.get(), 1);
        assert_eq!(bus.invoker_count::<()>(TestEvent::GameOver), 1);
    }

    #[test]
    fn registration_without_initialize_creates_entries() {
        let mut bus = EventBus::new();
        let (count, listener) = counter();
        bus.register_listener(TestEvent::GameOver, listener);

        let game = game_invoker();
        bus.register_invoker::<()>(&game, TestEvent::GameOver).unwrap();
        game.invoke_no_argument(TestEvent::GameOver).unwrap();

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn initialize_is_idempotent_and_forgets_registrations() {
        let mut bus = initialized_bus();
        bus.register_listener(TestEvent::GameOver, counter().1);

        bus.initialize();
        bus.initialize();

        assert_eq!(bus.listener_count::<()>(TestEvent::GameOver), 0);
        for &category in TestEvent::all() {
            assert_eq!(bus.invoker_count::<()>(category), 0);
            assert_eq!(bus.invoker_count::<(f32, f32)>(category), 0);
        }
    }

    #[test]
    fn initialize_detaches_previous_wiring() {
        let mut bus = initialized_bus();
        let game = game_invoker();
        bus.register_invoker::<()>(&game, TestEvent::GameOver).unwrap();
        let (count, listener) = counter();
        bus.register_listener(TestEvent::GameOver, listener.clone());

        bus.initialize();
        game.invoke_no_argument(TestEvent::GameOver).unwrap();
        assert_eq!(count.get(), 0);
        assert_eq!(game.listener_count::<()>(TestEvent::GameOver), 0);

        // Wiring the same pair again attaches the listener once
        bus.register_invoker::<()>(&game, TestEvent::GameOver).unwrap();
        bus.register_listener(TestEvent::GameOver, listener);
        game.invoke_no_argument(TestEvent::GameOver).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn initialize_leaves_listeners_added_outside_the_bus() {
        let mut bus = initialized_bus();
        let game = game_invoker();
        bus.register_invoker::<()>(&game, TestEvent::GameOver).unwrap();
        let (count, direct) = counter();
        game.add_listener(TestEvent::GameOver, direct).unwrap();

        bus.initialize();
        game.invoke_no_argument(TestEvent::GameOver).unwrap();

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn log_listeners_reports_registered_channel() {
        let mut bus = initialized_bus();
        let game = game_invoker();
        bus.register_invoker::<()>(&game, TestEvent::GameOver).unwrap();
        bus.register_listener(TestEvent::GameOver, counter().1);

        bus.log_listeners::<()>(TestEvent::GameOver);
        bus.log_listeners::<(f32, f32)>(TestEvent::CameraShake);

        assert_eq!(bus.listener_count::<()>(TestEvent::GameOver), 1);
        assert_eq!(bus.invoker_count::<()>(TestEvent::GameOver), 1);
    }

    #[test]
    fn unregister_listener_detaches_from_all_invokers() {
        let mut bus = initialized_bus();
        let game = game_invoker();
        bus.register_invoker::<()>(&game, TestEvent::GameOver).unwrap();
        let (count, listener) = counter();
        bus.register_listener(TestEvent::GameOver, listener.clone());

        assert!(bus.unregister_listener(TestEvent::GameOver, &listener));
        game.invoke_no_argument(TestEvent::GameOver).unwrap();

        assert_eq!(count.get(), 0);
        assert_eq!(bus.listener_count::<()>(TestEvent::GameOver), 0);
        assert!(!bus.unregister_listener(TestEvent::GameOver, &listener));
    }
}
