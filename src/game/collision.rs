//=========================================================================
// Player Collision
//=========================================================================
//
// Reacts to the player touching an obstacle.
//
// Fires (double-float):
//   CameraShake  (duration, magnitude) on every counted hit
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{GameController, GameEvent, GameSettings};
use crate::core::error::EventError;
use crate::core::event_bus::{EventBus, Invoker};

//=== PlayerCollision =====================================================

pub struct PlayerCollision {
    invoker: Invoker<GameEvent>,
    shake: (f32, f32),
    debug_mode: bool,
}

impl PlayerCollision {
    pub fn new(settings: &GameSettings) -> Self {
        let invoker = Invoker::new("player-collision");
        invoker.declare_double_float(GameEvent::CameraShake);

        Self {
            invoker,
            shake: (settings.camera_shake_duration, settings.camera_shake_magnitude),
            debug_mode: settings.debug_mode,
        }
    }

    pub fn register(&self, bus: &mut EventBus<GameEvent>) -> Result<(), EventError<GameEvent>> {
        bus.register_invoker::<(f32, f32)>(&self.invoker, GameEvent::CameraShake)
    }

    /// Shakes the camera and costs a life. Returns `false` when the hit
    /// was ignored.
    pub fn on_hit(&self, controller: &mut GameController) -> bool {
        if self.debug_mode {
            debug!("Hit ignored in debug mode");
            return false;
        }
        if !controller.is_running() {
            return false;
        }

        let (duration, magnitude) = self.shake;
        if let Err(e) = self
            .invoker
            .invoke_double_float(GameEvent::CameraShake, duration, magnitude)
        {
            warn!("Failed to fire camera shake: {}", e);
        }
        controller.lose_life();
        true
    }
}

//=========================================================================
// Tests
//=========================================================================
