//=========================================================================
// Core Errors
//=========================================================================
//
// Error types for the event bus, the object pool and configuration
// loading.
//
// None of these unwind into the game loop: each is logged where it is
// detected and returned so the caller can skip the action.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::event_bus::EventShape;

//=== EventError ==========================================================

/// Failures raised while wiring or firing events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError<K: Debug> {
    /// The invoker never declared a channel for this category and shape.
    #[error("invoker `{invoker}` has no {shape} channel for {category:?}")]
    UndeclaredChannel {
        invoker: String,
        category: K,
        shape: EventShape,
    },
}

//=== PoolError ===========================================================

/// Failures raised by pool operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError<P: Debug> {
    /// The category is absent from the pool configuration.
    #[error("pooled category {0:?} is not configured")]
    UnknownCategory(P),

    /// The category has no templates to instantiate from.
    #[error("no templates loaded for pooled category {0:?}")]
    MissingTemplate(P),

    /// The handle belongs to another category or to no live slot.
    #[error("handle (slot {slot}) does not belong to the {category:?} pool")]
    ForeignHandle { category: P, slot: usize },

    /// The instance is already inactive and sitting in its pool.
    #[error("instance in slot {slot} is already pooled in {category:?}")]
    AlreadyPooled { category: P, slot: usize },

    /// The handle was issued before the pool was last reset.
    #[error("handle (slot {slot}) for {category:?} predates the last pool reset")]
    StaleHandle { category: P, slot: usize },
}

//=== ConfigError =========================================================

/// Failures raised while loading configuration documents.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Rock,
    }

    #[test]
    fn pool_error_messages_name_the_category() {
        let err = PoolError::UnknownCategory(Kind::Rock);
        assert_eq!(err.to_string(), "pooled category Rock is not configured");

        let err = PoolError::AlreadyPooled { category: Kind::Rock, slot: 4 };
        assert_eq!(err.to_string(), "instance in slot 4 is already pooled in Rock");
    }

    #[test]
    fn event_error_message_names_shape() {
        let err = EventError::UndeclaredChannel {
            invoker: "player".to_string(),
            category: Kind::Rock,
            shape: EventShape::DoubleFloat,
        };
        assert_eq!(
            err.to_string(),
            "invoker `player` has no double-float channel for Rock"
        );
    }

    #[test]
    fn config_error_wraps_toml_failure() {
        let parse: Result<toml::Value, _> = toml::from_str("not = [valid");
        let err = ConfigError::from(parse.unwrap_err());
        assert!(err.to_string().starts_with("failed to parse configuration"));
    }
}
