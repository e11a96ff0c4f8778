//=========================================================================
// Game Layer
//=========================================================================
//
// Gameplay collaborators built on the event bus and object pool.
//
// Architecture:
//   GameSession
//     ├─ EventBus<GameEvent>
//     ├─ ObjectPool<ObstacleKind, Obstacle>
//     ├─ GameController   (invoker: DifficultyChanged, GameOver)
//     ├─ PlayerCollision  (invoker: CameraShake)
//     └─ Spawner          (listener: DifficultyChanged)
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== Module Declarations =================================================

mod collision;
mod config;
mod controller;
mod obstacle;
mod session;
mod spawner;

//=== Public API ==========================================================

pub use collision::PlayerCollision;
pub use config::{GameSettings, SessionConfig};
pub use controller::{Difficulty, DifficultyReader, GameController, GamePhase};
pub use obstacle::{Obstacle, ObstaclePhase, ObstacleStep, ObstacleTemplate};
pub use session::{ControlEvent, GameSession, SessionSummary};
pub use spawner::Spawner;

use crate::core::event_bus::EventKey;
use crate::core::object_pool::PoolKey;

//=== GameEvent ===========================================================

/// Event categories fired during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// No-argument. Speed and spawn intervals changed.
    DifficultyChanged,
    /// No-argument. The player ran out of lives.
    GameOver,
    /// Two-float (duration, magnitude). The player was hit.
    CameraShake,
}

impl EventKey for GameEvent {
    fn all() -> &'static [Self] {
        &[
            GameEvent::DifficultyChanged,
            GameEvent::GameOver,
            GameEvent::CameraShake,
        ]
    }
}

//=== ObstacleKind ========================================================

/// Pooled obstacle categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    HexagonObstacle1,
    HexagonObstacle2,
    HexagonObstacle3,
    TriangleObstacle1,
    TriangleObstacle2,
    TriangleObstacle3,
}

impl PoolKey for ObstacleKind {
    fn all() -> &'static [Self] {
        &[
            ObstacleKind::HexagonObstacle1,
            ObstacleKind::HexagonObstacle2,
            ObstacleKind::HexagonObstacle3,
            ObstacleKind::TriangleObstacle1,
            ObstacleKind::TriangleObstacle2,
            ObstacleKind::TriangleObstacle3,
        ]
    }
}
