//=========================================================================
// Sidescroll Runtime Engine
//
// Main entry point: runs a game session on its own logic thread.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  EngineHandle
//         │                                              │
//         ├─ with_tps()                                  ├─ send()
//         ├─ with_channel_capacity()                     └─ shutdown()
//         └─ with_session_config()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::control_bridge::HostEvent;
use crate::core::CoreSystemsOrchestrator;
use crate::game::{ControlEvent, SessionConfig, SessionSummary};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **Session**: [`SessionConfig::default`]
///
/// # Examples
///
/// ```no_run
/// use sidescroll_runtime::EngineBuilder;
/// use sidescroll_runtime::game::{ControlEvent, SessionConfig};
///
/// let engine = EngineBuilder::new()
///     .with_tps(120.0)
///     .with_session_config(SessionConfig::default().with_seed(7))
///     .build()
///     .run();
///
/// engine.send(ControlEvent::StartGame);
/// let summary = engine.shutdown();
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    config: SessionConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            config: SessionConfig::default(),
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Each tick advances the session by `1 / tps` seconds.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for host → core communication.
    ///
    /// Senders block while the channel is full.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the configuration the session is built from.
    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the engine instance.
    pub fn build(self) -> Engine {
        info!("Building engine (TPS: {}, channel: {})", self.tps, self.channel_capacity);

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(self.config),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Runtime ready to start.
///
/// # Architecture
///
/// ```text
/// Host Thread                       Logic Thread @ TPS
///   EngineHandle ──HostEvent──>       CoreSystemsOrchestrator
///                                       └─► GameSession
///                <──SessionSummary──    (on exit)
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    tps: f64,
    channel_capacity: usize,
}

impl Engine {
    /// Spawns the logic thread and returns a handle to drive it.
    pub fn run(self) -> EngineHandle {
        info!("Starting engine runtime (TPS: {})", self.tps);

        let (tx, rx): (Sender<HostEvent>, Receiver<HostEvent>) = bounded(self.channel_capacity);
        info!("Control channel created (capacity: {})", self.channel_capacity);

        let core = self.orchestrator.spawn_core_thread(rx, self.tps);
        info!("Core logic thread spawned");

        EngineHandle { sender: tx, core }
    }
}

//=== EngineHandle ========================================================

/// Host-side handle to a running engine.
///
/// Dropping the handle disconnects the channel, which also stops the
/// logic thread, but only [`EngineHandle::shutdown`] returns the summary.
pub struct EngineHandle {
    sender: Sender<HostEvent>,
    core: JoinHandle<Option<SessionSummary>>,
}

impl EngineHandle {
    /// Queues a command for the next tick. Returns `false` if the logic
    /// thread has already stopped.
    pub fn send(&self, event: ControlEvent) -> bool {
        match self.sender.send(HostEvent::Control(event)) {
            Ok(()) => true,
            Err(_) => {
                warn!("Core thread gone, dropped {:?}", event);
                false
            }
        }
    }

    /// Stops the logic thread and returns the final session summary.
    ///
    /// Returns `None` if the session could not be built or the thread
    /// panicked.
    pub fn shutdown(self) -> Option<SessionSummary> {
        // A failed send means the thread is already on its way out.
        let _ = self.sender.send(HostEvent::Shutdown);

        match self.core.join() {
            Ok(summary) => {
                info!("Core thread terminated cleanly");
                summary
            }
            Err(e) => {
                error!("Core thread panicked: {:?}", e);
                None
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
