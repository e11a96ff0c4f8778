//=========================================================================
// Game Controller
//=========================================================================
//
// Authoritative game state: score, lives, difficulty tier.
//
// Fires (no-argument):
//   DifficultyChanged  every `difficulty_threshold` points and on restart
//   GameOver           when the last life is lost
//
// Listeners read the current tier through a `DifficultyReader`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{GameEvent, GameSettings, Obstacle, ObstacleKind};
use crate::core::error::EventError;
use crate::core::event_bus::{EventBus, Invoker};
use crate::core::object_pool::ObjectPool;

//=== Difficulty ==========================================================

/// Current speed and spawn interval range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub speed: f32,
    pub min_spawn_interval: f32,
    pub max_spawn_interval: f32,
}

impl Difficulty {
    fn starting(settings: &GameSettings) -> Self {
        Self {
            speed: settings.start_speed,
            min_spawn_interval: settings.start_min_spawn_interval,
            max_spawn_interval: settings.start_max_spawn_interval,
        }
    }

    fn raised(self, settings: &GameSettings) -> Self {
        Self {
            speed: self.speed + settings.speed_increment,
            min_spawn_interval: (self.min_spawn_interval - settings.min_interval_decrement)
                .max(settings.min_interval_floor),
            max_spawn_interval: (self.max_spawn_interval - settings.max_interval_decrement)
                .max(settings.max_interval_floor),
        }
    }
}

/// Read-only view of the controller's difficulty, for listeners.
#[derive(Debug, Clone)]
pub struct DifficultyReader {
    current: Rc<Cell<Difficulty>>,
}

impl DifficultyReader {
    pub fn get(&self) -> Difficulty {
        self.current.get()
    }
}

//=== GamePhase ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first start.
    Ready,
    Running,
    GameOver,
}

//=== GameController ======================================================

pub struct GameController {
    settings: GameSettings,
    invoker: Invoker<GameEvent>,
    difficulty: Rc<Cell<Difficulty>>,
    phase: GamePhase,
    score: u32,
    lives: u32,
    high_score: u32,
}

impl GameController {
    //--- Construction -----------------------------------------------------

    /// Creates a controller in the `Ready` phase with its channels declared.
    pub fn new(settings: GameSettings) -> Self {
        let invoker = Invoker::new("game-controller");
        invoker.declare_no_argument(GameEvent::DifficultyChanged);
        invoker.declare_no_argument(GameEvent::GameOver);

        Self {
            difficulty: Rc::new(Cell::new(Difficulty::starting(&settings))),
            invoker,
            phase: GamePhase::Ready,
            score: 0,
            lives: settings.max_lives,
            high_score: 0,
            settings,
        }
    }

    /// Seeds the best score carried over from an earlier run.
    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = high_score;
        self
    }

    /// Registers the controller as the source of its events.
    pub fn register(&self, bus: &mut EventBus<GameEvent>) -> Result<(), EventError<GameEvent>> {
        bus.register_invoker::<()>(&self.invoker, GameEvent::DifficultyChanged)?;
        bus.register_invoker::<()>(&self.invoker, GameEvent::GameOver)?;
        Ok(())
    }

    //--- Game Flow --------------------------------------------------------

    /// Starts a run with full lives and zero score.
    pub fn start_game(&mut self) {
        self.lives = self.settings.max_lives;
        self.score = 0;
        self.phase = GamePhase::Running;
        info!("Game started ({} lives)", self.lives);
    }

    /// Counts one cleared obstacle. Raises the difficulty every
    /// `difficulty_threshold` points.
    pub fn score_up(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }

        self.score += 1;

        let threshold = self.settings.difficulty_threshold;
        if threshold > 0 && self.score % threshold == 0 {
            let raised = self.difficulty.get().raised(&self.settings);
            self.difficulty.set(raised);
            debug!("Difficulty up at score {}: {:?}", self.score, raised);
            self.fire(GameEvent::DifficultyChanged);
        }

        self.save_score();
    }

    /// Takes one life; the last one ends the game.
    pub fn lose_life(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        debug!("Life lost, {} remaining", self.lives);

        if self.lives == 0 {
            self.game_over();
        }
    }

    /// Resets difficulty, clears the world and starts a new run.
    ///
    /// Active obstacles go back to the pool instead of being recreated.
    pub fn restart(&mut self, pool: &mut ObjectPool<ObstacleKind, Obstacle>) {
        self.difficulty.set(Difficulty::starting(&self.settings));
        self.fire(GameEvent::DifficultyChanged);

        let reclaimed = pool.reclaim_all();
        info!("Restarting game, {} obstacle(s) returned to pool", reclaimed);

        self.start_game();
    }

    fn game_over(&mut self) {
        self.fire(GameEvent::GameOver);
        self.phase = GamePhase::GameOver;
        self.save_score();
        info!("Game over (score {}, best {})", self.score, self.high_score);
    }

    fn save_score(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    fn fire(&self, event: GameEvent) {
        if let Err(e) = self.invoker.invoke_no_argument(event) {
            warn!("Failed to fire {:?}: {}", event, e);
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty.get()
    }

    pub fn difficulty_reader(&self) -> DifficultyReader {
        DifficultyReader {
            current: Rc::clone(&self.difficulty),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }
}

//=========================================================================
// Tests
//=========================================================================
