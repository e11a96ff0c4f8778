//=========================================================================
// Object Pool Implementation
//=========================================================================
//
// Arena of pooled instances with per-category available lists.
//
// Architecture:
//   slots:      Vec<Slot>        every instance, tagged with its category
//   categories: HashMap<P, CategoryPool>
//                 ├─ templates   immutable prototypes
//                 ├─ available   slot indices of inactive instances
//                 └─ capacity    instances created for the category
//
// Capacity counts instances actually created (prefill + growth). It only
// goes down when the pool is reset, so `count <= capacity` always holds.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

//=== Internal Dependencies ===============================================

use super::{CapacityConfig, PoolKey, Poolable, TemplateSource};
use crate::core::error::PoolError;

//=== PoolHandle ==========================================================

/// Reference to a pooled instance.
///
/// Carries the category the instance was created for, so the instance can
/// always be returned to the right pool. Handles do not survive
/// [`ObjectPool::reset`] or re-initialization: the pool rejects them as
/// stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle<P: PoolKey> {
    category: P,
    slot: usize,
    generation: u32,
}

impl<P: PoolKey> PoolHandle<P> {
    pub fn category(&self) -> P {
        self.category
    }

    pub fn slot(&self) -> usize {
        self.slot
    }
}

//=== Internal Storage ====================================================

struct Slot<P: PoolKey, T> {
    category: P,
    active: bool,
    instance: T,
}

struct CategoryPool<Tm> {
    templates: Vec<Tm>,
    available: Vec<usize>,
    capacity: usize,
}

//=== ObjectPool ==========================================================

/// Pools of recyclable instances, one per configured category.
///
/// # Example
///
/// ```
/// use sidescroll_runtime::core::object_pool::{
///     CapacityConfig, ObjectPool, PoolKey, Poolable, TemplateCatalog,
/// };
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Kind { Rock }
/// impl PoolKey for Kind {
///     fn all() -> &'static [Self] { &[Kind::Rock] }
/// }
///
/// struct Rock { size: u32 }
/// impl Poolable for Rock {
///     type Template = u32;
///     fn instantiate(size: &u32) -> Self { Rock { size: *size } }
/// }
///
/// let mut pool = ObjectPool::<Kind, Rock>::with_seed(7);
/// pool.initialize(
///     &CapacityConfig::empty().with(Kind::Rock, 2),
///     &TemplateCatalog::new().with(Kind::Rock, 3),
/// );
///
/// let rock = pool.acquire(Kind::Rock).unwrap();
/// assert_eq!(pool.get(rock).map(|r| r.size), Some(3));
/// assert_eq!(pool.count(Kind::Rock), Some(1));
///
/// pool.release(Kind::Rock, rock).unwrap();
/// assert_eq!(pool.count(Kind::Rock), Some(2));
/// ```
pub struct ObjectPool<P: PoolKey, T: Poolable> {
    categories: HashMap<P, CategoryPool<T::Template>>,
    slots: Vec<Slot<P, T>>,
    /// Bumped on every reset; handles from older generations are stale.
    generation: u32,
    rng: StdRng,
}

impl<P: PoolKey, T: Poolable> ObjectPool<P, T> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty pool seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates an empty pool with a deterministic random source.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            categories: HashMap::new(),
            slots: Vec::new(),
            generation: 0,
            rng,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Sets up every category of `P` from scratch.
    ///
    /// Any previous state is dropped first. For each configured category
    /// the template set is loaded from `source` and the available list is
    /// filled up to the starting capacity with inactive instances built
    /// from uniformly random templates. A category without templates stays
    /// configured but every acquire on it fails with `MissingTemplate`.
    pub fn initialize<S>(&mut self, capacities: &CapacityConfig<P>, source: &S)
    where
        S: TemplateSource<P, T::Template> + ?Sized,
    {
        self.reset();

        if !capacities.is_complete() {
            warn!("Capacity configuration does not cover every pooled category");
        }

        for &category in P::all() {
            let Some(starting) = capacities.starting_capacity(category) else {
                warn!("Pooled category {:?} has no configured capacity, skipping", category);
                continue;
            };

            let templates = source.templates(category);
            let fill = if templates.is_empty() {
                warn!("{}", PoolError::MissingTemplate(category));
                0
            } else {
                starting
            };

            self.categories.insert(
                category,
                CategoryPool {
                    templates,
                    available: Vec::with_capacity(starting),
                    capacity: 0,
                },
            );

            for _ in 0..fill {
                match self.create_instance(category) {
                    Ok(slot) => {
                        if let Some(pool) = self.categories.get_mut(&category) {
                            pool.available.push(slot);
                        }
                    }
                    Err(_) => break,
                }
            }

            debug!(
                "Pool {:?} ready with {} instance(s)",
                category,
                self.categories.get(&category).map_or(0, |p| p.available.len())
            );
        }

        info!(
            "Object pool initialized ({} categories, {} instances)",
            self.categories.len(),
            self.slots.len()
        );
    }

    /// Drops every category and instance.
    pub fn reset(&mut self) {
        self.categories.clear();
        self.slots.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    //--- Acquire / Release ------------------------------------------------

    /// Takes an instance out of the pool and marks it active.
    ///
    /// A uniformly random inactive instance is chosen. When none is left
    /// the category grows by one freshly created instance.
    pub fn acquire(&mut self, category: P) -> Result<PoolHandle<P>, PoolError<P>> {
        let Some(pool) = self.categories.get_mut(&category) else {
            return Err(Self::unknown_category(category));
        };

        let slot = if pool.available.is_empty() {
            let slot = self.create_instance(category)?;
            debug!("Pool {:?} empty, grew to {}", category, self.capacity(category).unwrap_or(0));
            slot
        } else {
            let index = self.rng.gen_range(0..pool.available.len());
            pool.available.swap_remove(index)
        };

        self.slots[slot].active = true;
        Ok(PoolHandle {
            category,
            slot,
            generation: self.generation,
        })
    }

    /// Returns an active instance to the pool of `category`.
    ///
    /// The instance is left untouched if the category is unknown, if the
    /// handle belongs elsewhere, or if it is already pooled.
    pub fn release(&mut self, category: P, handle: PoolHandle<P>) -> Result<(), PoolError<P>> {
        if !self.categories.contains_key(&category) {
            return Err(Self::unknown_category(category));
        }

        if handle.generation != self.generation {
            let err = PoolError::StaleHandle { category, slot: handle.slot };
            warn!("{}", err);
            return Err(err);
        }

        let slot = match self.slots.get_mut(handle.slot) {
            Some(slot) if slot.category == category => slot,
            _ => {
                let err = PoolError::ForeignHandle { category, slot: handle.slot };
                warn!("{}", err);
                return Err(err);
            }
        };

        if !slot.active {
            let err = PoolError::AlreadyPooled { category, slot: handle.slot };
            warn!("{}", err);
            return Err(err);
        }

        slot.instance.on_release();
        slot.active = false;

        if let Some(pool) = self.categories.get_mut(&category) {
            pool.available.push(handle.slot);
        }
        Ok(())
    }

    /// Returns an instance to the pool recorded on its handle.
    pub fn release_handle(&mut self, handle: PoolHandle<P>) -> Result<(), PoolError<P>> {
        self.release(handle.category, handle)
    }

    /// Returns every active instance to its pool.
    ///
    /// Used to clear the world without rebuilding the pools. Returns the
    /// number of instances reclaimed; a second call reclaims nothing.
    pub fn reclaim_all(&mut self) -> usize {
        let active: Vec<PoolHandle<P>> = self.active_handles().collect();

        let mut reclaimed = 0;
        for handle in active {
            if self.release_handle(handle).is_ok() {
                reclaimed += 1;
            }
        }

        debug!("Reclaimed {} active instance(s)", reclaimed);
        reclaimed
    }

    //--- Query API --------------------------------------------------------

    /// Number of instances waiting in the pool of `category`.
    pub fn count(&self, category: P) -> Option<usize> {
        self.categories.get(&category).map(|pool| pool.available.len())
    }

    /// Number of instances created for `category`.
    pub fn capacity(&self, category: P) -> Option<usize> {
        self.categories.get(&category).map(|pool| pool.capacity)
    }

    /// Returns true if `category` was configured at initialization.
    pub fn is_configured(&self, category: P) -> bool {
        self.categories.contains_key(&category)
    }

    /// Total number of instances across all categories.
    pub fn instance_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the handle refers to an instance currently in use.
    pub fn is_active(&self, handle: PoolHandle<P>) -> bool {
        self.is_current(handle)
            && self
                .slots
                .get(handle.slot)
                .is_some_and(|slot| slot.category == handle.category && slot.active)
    }

    /// Handles of every active instance, in creation order.
    pub fn active_handles(&self) -> impl Iterator<Item = PoolHandle<P>> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(index, slot)| PoolHandle {
                category: slot.category,
                slot: index,
                generation: self.generation,
            })
    }

    pub fn get(&self, handle: PoolHandle<P>) -> Option<&T> {
        if !self.is_current(handle) {
            return None;
        }
        self.slots
            .get(handle.slot)
            .filter(|slot| slot.category == handle.category)
            .map(|slot| &slot.instance)
    }

    pub fn get_mut(&mut self, handle: PoolHandle<P>) -> Option<&mut T> {
        if !self.is_current(handle) {
            return None;
        }
        self.slots
            .get_mut(handle.slot)
            .filter(|slot| slot.category == handle.category)
            .map(|slot| &mut slot.instance)
    }

    //--- Internal Helpers -------------------------------------------------

    fn is_current(&self, handle: PoolHandle<P>) -> bool {
        handle.generation == self.generation
    }

    fn unknown_category(category: P) -> PoolError<P> {
        let err = PoolError::UnknownCategory(category);
        warn!("{}", err);
        err
    }

    /// Builds one inactive instance from a random template and bumps the
    /// category capacity.
    fn create_instance(&mut self, category: P) -> Result<usize, PoolError<P>> {
        let Some(pool) = self.categories.get_mut(&category) else {
            return Err(Self::unknown_category(category));
        };

        if pool.templates.is_empty() {
            let err = PoolError::MissingTemplate(category);
            warn!("{}", err);
            return Err(err);
        }

        let index = self.rng.gen_range(0..pool.templates.len());
        let instance = T::instantiate(&pool.templates[index]);
        pool.capacity += 1;

        self.slots.push(Slot {
            category,
            active: false,
            instance,
        });
        Ok(self.slots.len() - 1)
    }
}

impl<P: PoolKey, T: Poolable> Default for ObjectPool<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
