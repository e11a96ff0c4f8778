//=========================================================================
// Control Bridge Interface
//=========================================================================
//
// Host-to-core message type.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::game::ControlEvent;

//=== HostEvent ===========================================================

/// Messages sent from the host thread to the core thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostEvent {
    /// Game command applied at the start of the next tick.
    Control(ControlEvent),

    /// Stop the core thread after this frame's commands.
    Shutdown,
}
