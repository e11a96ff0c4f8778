//=========================================================================
// Control Bridge
//=========================================================================
//
// Carries host commands into the core logic thread.
//
// Components:
// - `interface`: Message type crossing the thread boundary
// - `event_collector`: Core-side bounded draining per frame
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::HostEvent;
