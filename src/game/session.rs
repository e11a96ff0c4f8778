//=========================================================================
// Game Session
//=========================================================================
//
// One game world: the bus, the obstacle pool and every collaborator
// wired through them.
//
// Per tick (while running):
//   1. Push a changed obstacle speed onto obstacles already in play
//   2. Let the spawner place new obstacles
//   3. Advance active obstacles, scoring and despawning them
//
// Hosts drive the session with `ControlEvent`s and may subscribe their
// own listeners (camera shake, game over) through `bus_mut`.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{
    GameController, GameEvent, GamePhase, Obstacle, ObstacleKind, ObstacleStep, PlayerCollision,
    SessionConfig, Spawner,
};
use crate::core::error::EventError;
use crate::core::event_bus::EventBus;
use crate::core::object_pool::ObjectPool;

//=== ControlEvent ========================================================

/// Commands a host sends to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Begins the first run. Ignored once a run has started.
    StartGame,
    /// Clears the world and starts over with starting difficulty.
    Restart,
    /// The player touched an obstacle.
    PlayerHit,
}

//=== SessionSummary ======================================================

/// Snapshot of a session's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub phase: GamePhase,
    pub score: u32,
    pub high_score: u32,
    pub lives: u32,
    pub active_obstacles: usize,
    /// Ticks simulated while running.
    pub ticks: u64,
}

//=== GameSession =========================================================

pub struct GameSession {
    bus: EventBus<GameEvent>,
    pool: ObjectPool<ObstacleKind, Obstacle>,
    controller: GameController,
    spawner: Spawner,
    collision: PlayerCollision,
    ticks: u64,
}

impl GameSession {
    //--- Construction -----------------------------------------------------

    /// Builds the world described by `config` and wires every
    /// collaborator onto a freshly initialized bus.
    pub fn new(config: SessionConfig) -> Result<Self, EventError<GameEvent>> {
        let SessionConfig {
            settings,
            capacities,
            templates,
            seed,
        } = config;

        let mut bus = EventBus::new();
        bus.initialize();

        let mut pool = match seed {
            Some(seed) => ObjectPool::with_seed(seed),
            None => ObjectPool::new(),
        };
        pool.initialize(&capacities, &templates);

        let collision = PlayerCollision::new(&settings);
        let controller = GameController::new(settings);
        let spawner = Spawner::new(
            controller.difficulty_reader(),
            controller.settings().spawn_x,
            seed.map(|seed| seed.wrapping_add(1)),
        );

        spawner.register(&mut bus);
        controller.register(&mut bus)?;
        collision.register(&mut bus)?;

        info!(
            "Game session ready ({} pooled obstacles)",
            pool.instance_count()
        );

        Ok(Self {
            bus,
            pool,
            controller,
            spawner,
            collision,
            ticks: 0,
        })
    }

    //--- Control ----------------------------------------------------------

    pub fn handle(&mut self, event: ControlEvent) {
        debug!("Control event: {:?}", event);

        match event {
            ControlEvent::StartGame => {
                if self.controller.phase() != GamePhase::Ready {
                    debug!("Game already started, ignoring StartGame");
                    return;
                }
                self.spawner.reset();
                self.controller.start_game();
            }
            ControlEvent::Restart => {
                self.spawner.reset();
                self.controller.restart(&mut self.pool);
            }
            ControlEvent::PlayerHit => {
                self.collision.on_hit(&mut self.controller);
            }
        }
    }

    //--- Update -----------------------------------------------------------

    /// Advances the world by `dt` seconds. Does nothing unless running.
    pub fn tick(&mut self, dt: f32) {
        if !self.controller.is_running() {
            return;
        }
        self.ticks += 1;

        if let Some(speed) = self.spawner.take_speed_change() {
            self.apply_speed(speed);
        }

        self.spawner.tick(dt, &mut self.pool);

        let settings = self.controller.settings();
        let poll_interval = settings.obstacle_poll_interval;
        let player_x = settings.player_x;
        let despawn_x = settings.despawn_x;

        let active: Vec<_> = self.pool.active_handles().collect();
        for handle in active {
            let Some(obstacle) = self.pool.get_mut(handle) else {
                continue;
            };

            match obstacle.advance(dt, poll_interval, player_x, despawn_x) {
                ObstacleStep::Moving => {}
                ObstacleStep::Scored => self.controller.score_up(),
                ObstacleStep::Despawn => {
                    if let Err(e) = self.pool.release_handle(handle) {
                        warn!("Failed to despawn obstacle: {}", e);
                    }
                }
            }
        }
    }

    fn apply_speed(&mut self, speed: f32) {
        let active: Vec<_> = self.pool.active_handles().collect();
        for handle in &active {
            if let Some(obstacle) = self.pool.get_mut(*handle) {
                obstacle.set_speed(speed);
            }
        }
        debug!("Obstacle speed now {} ({} in play)", speed, active.len());
    }

    //--- Query API --------------------------------------------------------

    /// Bus access for host listeners.
    pub fn bus_mut(&mut self) -> &mut EventBus<GameEvent> {
        &mut self.bus
    }

    pub fn pool(&self) -> &ObjectPool<ObstacleKind, Obstacle> {
        &self.pool
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    /// Obstacles currently in play.
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.pool
            .active_handles()
            .filter_map(move |handle| self.pool.get(handle))
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            phase: self.controller.phase(),
            score: self.controller.score(),
            high_score: self.controller.high_score(),
            lives: self.controller.lives(),
            active_obstacles: self.pool.active_handles().count(),
            ticks: self.ticks,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
