//=========================================================================
// Object Pool
//=========================================================================
//
// Recycling of frequently spawned actors.
//
// Architecture:
//   ObjectPool<P, T>
//     ├─ categories: HashMap<P, CategoryPool>   (templates, available, capacity)
//     └─ slots: Vec<Slot<P, T>>                 (every instance ever created)
//
// Lifecycle per instance:
//   Inactive (pooled) ──acquire()──> Active ──release() / reclaim_all()──> Inactive
//
// Instances are never destroyed; they live in the arena until the pool
// is reset and are addressed through `PoolHandle`s.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Module Declarations =================================================

mod capacity;
mod pool;
mod template;

//=== Public API ==========================================================

pub use capacity::{CapacityConfig, DEFAULT_STARTING_CAPACITY};
pub use pool::{ObjectPool, PoolHandle};
pub use template::{TemplateCatalog, TemplateSource};

//=== Pool Key Trait ======================================================

/// Identifies a category of pooled actor.
///
/// Typically implemented by a game-specific enum. `all()` lists every
/// category the pool should try to set up.
pub trait PoolKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {
    fn all() -> &'static [Self];
}

//=== Poolable Trait ======================================================

/// An actor that can be stored in an [`ObjectPool`].
pub trait Poolable {
    /// Prototype definition instances are created from.
    type Template;

    /// Creates a new instance from a template.
    fn instantiate(template: &Self::Template) -> Self;

    /// Called when the instance goes back to the pool.
    ///
    /// Default implementation does nothing. Override to clear per-use state.
    fn on_release(&mut self) {}
}
