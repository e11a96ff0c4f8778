//=========================================================================
// Core Systems Orchestrator
//
// Central coordinator for the game session running on the logic
// (non-host) thread.
//
// Responsibilities:
// - Build the game session inside the logic thread
// - Receive host commands through a bounded channel
// - Maintain deterministic pacing using a fixed tick rate (TPS)
// - Hand the final session summary back when the thread exits
//
// Notes:
// The session wires listeners through `Rc` handles and never leaves the
// logic thread. Only its configuration crosses in and only its summary
// crosses out.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================
use crossbeam_channel::Receiver;
use log::{error, info};

//=== Internal Modules ====================================================
use crate::game::{GameSession, SessionConfig, SessionSummary};
use self::control_bridge::{EventCollector, HostEvent, TickControl};

pub mod error;
pub mod event_bus;
pub mod object_pool;

pub(crate) mod control_bridge;

//=== CoreSystemsOrchestrator =============================================
//
// Owns the session configuration until the logic thread starts, then
// drives the session built from it.
//
pub(crate) struct CoreSystemsOrchestrator {
    config: SessionConfig,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Spawns the logic thread ticking the session at a fixed update
    // frequency (TPS - ticks per second).
    //
    // Each tick:
    //  1. Collects host commands (bounded per frame)
    //  2. Applies them to the session in send order
    //  3. Advances the session by one fixed step
    //  4. Sleeps to maintain fixed pacing
    //
    // Exits on Shutdown or when every sender is gone, returning the final
    // summary. Returns `None` if the session could not be built.
    //
    pub fn spawn_core_thread(
        self,
        receiver: Receiver<HostEvent>,
        tps: f64,
    ) -> thread::JoinHandle<Option<SessionSummary>> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);
        let dt = frame_duration.as_secs_f32();
        let config = self.config;

        thread::spawn(move || {
            let mut session = match GameSession::new(config) {
                Ok(session) => session,
                Err(e) => {
                    error!("Failed to build game session: {}", e);
                    return None;
                }
            };
            let mut collector = EventCollector::new(receiver);

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather host commands ---------------------------
                let control = collector.collect_frame();

                //--- Step 2: Apply them ------------------------------------
                for event in collector.take_events() {
                    session.handle(event);
                }

                if control == TickControl::Exit {
                    info!("Core thread exiting.");
                    break;
                }

                //--- Step 3: Advance the world -----------------------------
                session.tick(dt);

                //--- Step 4: Maintain deterministic pacing ----------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            Some(session.summary())
        })
    }
}
