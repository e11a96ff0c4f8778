//=========================================================================
// Obstacle Spawner
//=========================================================================
//
// Pulls obstacles from the pool at random intervals.
//
// Listens to DifficultyChanged: copies the new speed and spawn interval
// range, and flags the session to refresh obstacles already in play.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

//=== Internal Dependencies ===============================================

use super::{Difficulty, DifficultyReader, GameEvent, Obstacle, ObstacleKind};
use crate::core::event_bus::{EventBus, Listener};
use crate::core::object_pool::{ObjectPool, PoolHandle, PoolKey};

/// Consecutive spawns allowed on the same side before it is flipped.
const MAX_SIDE_STREAK: u32 = 2;

//=== Spawner =============================================================

pub struct Spawner {
    reader: DifficultyReader,
    current: Rc<Cell<Difficulty>>,
    speed_changed: Rc<Cell<bool>>,
    spawn_x: f32,
    timer: f32,
    last_side: f32,
    side_streak: u32,
    rng: StdRng,
}

impl Spawner {
    /// Creates a spawner that fires on its first tick.
    pub fn new(reader: DifficultyReader, spawn_x: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            current: Rc::new(Cell::new(reader.get())),
            reader,
            speed_changed: Rc::new(Cell::new(false)),
            spawn_x,
            timer: 0.0,
            last_side: 0.0,
            side_streak: 0,
            rng,
        }
    }

    /// Subscribes to difficulty changes.
    pub fn register(&self, bus: &mut EventBus<GameEvent>) {
        let reader = self.reader.clone();
        let current = Rc::clone(&self.current);
        let speed_changed = Rc::clone(&self.speed_changed);

        bus.register_listener(
            GameEvent::DifficultyChanged,
            Listener::no_argument(move || {
                current.set(reader.get());
                speed_changed.set(true);
            }),
        );
    }

    /// Returns the new obstacle speed once after each difficulty change.
    pub fn take_speed_change(&self) -> Option<f32> {
        self.speed_changed
            .replace(false)
            .then(|| self.current.get().speed)
    }

    /// Difficulty as last seen by the listener.
    pub fn difficulty(&self) -> Difficulty {
        self.current.get()
    }

    /// Spawns on the next tick and forgets the side history.
    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.last_side = 0.0;
        self.side_streak = 0;
    }

    //--- Update -----------------------------------------------------------

    /// Counts down the spawn timer and places a new obstacle when it runs
    /// out. Only kinds the pool was configured with are drawn; pool
    /// failures skip the spawn.
    pub fn tick(
        &mut self,
        dt: f32,
        pool: &mut ObjectPool<ObstacleKind, Obstacle>,
    ) -> Option<PoolHandle<ObstacleKind>> {
        self.timer -= dt;
        if self.timer > 0.0 {
            return None;
        }

        let difficulty = self.current.get();
        self.timer = self.next_interval(difficulty);

        let kinds: Vec<ObstacleKind> = ObstacleKind::all()
            .iter()
            .copied()
            .filter(|&kind| pool.is_configured(kind))
            .collect();
        if kinds.is_empty() {
            warn!("Skipping spawn: no obstacle kind is pooled");
            return None;
        }
        let kind = kinds[self.rng.gen_range(0..kinds.len())];

        let handle = match pool.acquire(kind) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Skipping spawn: {}", e);
                return None;
            }
        };

        let side = self.next_side();
        if let Some(obstacle) = pool.get_mut(handle) {
            obstacle.place(self.spawn_x, side, difficulty.speed);
        }

        debug!("Spawned {:?} on side {}, next in {:.2}s", kind, side, self.timer);
        Some(handle)
    }

    //--- Internal Helpers -------------------------------------------------

    fn next_interval(&mut self, difficulty: Difficulty) -> f32 {
        let Difficulty {
            min_spawn_interval: min,
            max_spawn_interval: max,
            ..
        } = difficulty;

        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Random side, flipped when it would extend a streak past
    /// `MAX_SIDE_STREAK`.
    fn next_side(&mut self) -> f32 {
        let mut side = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };

        if side == self.last_side && self.side_streak >= MAX_SIDE_STREAK {
            side = -side;
        }

        if side == self.last_side {
            self.side_streak += 1;
        } else {
            self.last_side = side;
            self.side_streak = 1;
        }

        side
    }
}

//=========================================================================
// Tests
//=========================================================================
