//=========================================================================
// Obstacle Actor
//=========================================================================
//
// Pooled obstacle scrolling from right to left.
//
// Phases (advanced by the session tick, checked every poll interval):
//   Approaching ──right edge passes player──> Passed  (reports Scored)
//   Passed      ──x reaches despawn line───> done    (reports Despawn)
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::object_pool::Poolable;

//=== ObstacleTemplate ====================================================

/// Prototype an obstacle is instantiated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleTemplate {
    pub name: String,
    /// Distance from the centre line; the spawner picks the side.
    pub spawn_height: f32,
    pub half_width: f32,
}

//=== ObstaclePhase =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstaclePhase {
    /// Still to the right of the player.
    Approaching,
    /// Behind the player, waiting to leave the screen.
    Passed,
}

/// Outcome of a single [`Obstacle::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleStep {
    Moving,
    /// The obstacle cleared the player this step.
    Scored,
    /// The obstacle left the screen and should go back to the pool.
    Despawn,
}

//=== Obstacle ============================================================

#[derive(Debug, Clone)]
pub struct Obstacle {
    name: String,
    spawn_height: f32,
    half_width: f32,
    x: f32,
    y: f32,
    side: f32,
    speed: f32,
    phase: ObstaclePhase,
    poll_timer: f32,
}

impl Obstacle {
    /// Puts the obstacle in the world at `x`, on the given side (+1 / -1).
    pub fn place(&mut self, x: f32, side: f32, speed: f32) {
        self.x = x;
        self.side = side.signum();
        self.y = self.side * self.spawn_height;
        self.speed = speed;
        self.phase = ObstaclePhase::Approaching;
        self.poll_timer = 0.0;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Moves the obstacle by `dt` seconds and runs the phase checks once
    /// every `poll_interval`.
    pub fn advance(
        &mut self,
        dt: f32,
        poll_interval: f32,
        player_x: f32,
        despawn_x: f32,
    ) -> ObstacleStep {
        self.x -= self.speed * dt;

        self.poll_timer -= dt;
        if self.poll_timer > 0.0 {
            return ObstacleStep::Moving;
        }
        self.poll_timer = poll_interval;

        match self.phase {
            ObstaclePhase::Approaching if self.right_edge() <= player_x => {
                self.phase = ObstaclePhase::Passed;
                ObstacleStep::Scored
            }
            ObstaclePhase::Passed if self.x <= despawn_x => ObstacleStep::Despawn,
            _ => ObstacleStep::Moving,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Vertical orientation: +1 above the centre line, -1 below.
    pub fn side(&self) -> f32 {
        self.side
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn phase(&self) -> ObstaclePhase {
        self.phase
    }

    pub fn right_edge(&self) -> f32 {
        self.x + self.half_width
    }
}

impl Poolable for Obstacle {
    type Template = ObstacleTemplate;

    fn instantiate(template: &ObstacleTemplate) -> Self {
        Self {
            name: template.name.clone(),
            spawn_height: template.spawn_height,
            half_width: template.half_width,
            x: 0.0,
            y: 0.0,
            side: 1.0,
            speed: 0.0,
            phase: ObstaclePhase::Approaching,
            poll_timer: 0.0,
        }
    }

    fn on_release(&mut self) {
        self.speed = 0.0;
        self.phase = ObstaclePhase::Approaching;
        self.poll_timer = 0.0;
    }
}

//=========================================================================
// Tests
//=========================================================================
