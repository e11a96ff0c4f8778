//=========================================================================
// Event Bus
//=========================================================================
//
// Typed publish/subscribe wiring between invokers and listeners.
//
// Architecture:
//   Invoker ──declare()──> own channel per (shape, category)
//      │
//   EventBus::register_invoker()  ──┐
//   EventBus::register_listener() ──┴─> whichever arrives second
//                                       completes the wiring
//      │
//   Invoker::invoke() ──> listeners, in attachment order
//
// Two argument shapes exist: no-argument `()` and two-float
// `(f32, f32)`. Each shape has its own registry, so a category can carry
// independent channels of both shapes.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;

//=== Module Declarations =================================================

mod channel;
mod invoker;
mod registry;

//=== Public API ==========================================================

pub use channel::{EventChannel, Listener};
pub use invoker::{ChannelSet, Invoker};
pub use registry::{EventBus, Wiring};

//=== Event Key Trait =====================================================

/// Identifies an event category.
///
/// Typically implemented by a game-specific enum. `all()` lists every
/// category so the bus can create empty entries up front.
pub trait EventKey: Clone + Copy + Eq + Hash + Debug + 'static {
    fn all() -> &'static [Self];
}

//=== Event Shape =========================================================

/// Argument shape of an event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventShape {
    NoArgument,
    DoubleFloat,
}

impl fmt::Display for EventShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoArgument => write!(f, "no-argument"),
            Self::DoubleFloat => write!(f, "double-float"),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for () {}
    impl Sealed for (f32, f32) {}
}

/// Argument tuple carried by an event channel.
///
/// Implemented for `()` and `(f32, f32)` only. The shape of a channel is
/// part of its type, so a listener can never be attached to a channel of
/// the other shape.
pub trait EventArgs: sealed::Sealed + Copy + Debug + 'static {
    const SHAPE: EventShape;

    #[doc(hidden)]
    fn channels<K: EventKey>(set: &ChannelSet<K>) -> &RefCell<HashMap<K, EventChannel<Self>>>;

    #[doc(hidden)]
    fn wiring<K: EventKey>(bus: &EventBus<K>) -> &Wiring<K, Self>;

    #[doc(hidden)]
    fn wiring_mut<K: EventKey>(bus: &mut EventBus<K>) -> &mut Wiring<K, Self>;
}

impl EventArgs for () {
    const SHAPE: EventShape = EventShape::NoArgument;

    fn channels<K: EventKey>(set: &ChannelSet<K>) -> &RefCell<HashMap<K, EventChannel<Self>>> {
        &set.no_argument
    }

    fn wiring<K: EventKey>(bus: &EventBus<K>) -> &Wiring<K, Self> {
        &bus.no_argument
    }

    fn wiring_mut<K: EventKey>(bus: &mut EventBus<K>) -> &mut Wiring<K, Self> {
        &mut bus.no_argument
    }
}

impl EventArgs for (f32, f32) {
    const SHAPE: EventShape = EventShape::DoubleFloat;

    fn channels<K: EventKey>(set: &ChannelSet<K>) -> &RefCell<HashMap<K, EventChannel<Self>>> {
        &set.double_float
    }

    fn wiring<K: EventKey>(bus: &EventBus<K>) -> &Wiring<K, Self> {
        &bus.double_float
    }

    fn wiring_mut<K: EventKey>(bus: &mut EventBus<K>) -> &mut Wiring<K, Self> {
        &mut bus.double_float
    }
}
