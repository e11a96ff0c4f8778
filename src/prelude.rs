//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use sidescroll_runtime::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineHandle};

// Errors
pub use crate::core::error::{ConfigError, EventError, PoolError};

// Event bus
pub use crate::core::event_bus::{EventBus, EventKey, EventShape, Invoker, Listener};

// Object pool
pub use crate::core::object_pool::{
    CapacityConfig, ObjectPool, PoolHandle, PoolKey, Poolable, TemplateCatalog, TemplateSource,
};

// Game layer
pub use crate::game::{
    ControlEvent, GameController, GameEvent, GamePhase, GameSession, GameSettings, ObstacleKind,
    SessionConfig, SessionSummary,
};
