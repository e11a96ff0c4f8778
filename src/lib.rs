//=========================================================================
// Sidescroll Runtime - Library Root
//
// Runtime core for a 2D side-scrolling obstacle game.
//
// Responsibilities:
// - Expose the reusable building blocks (`core`): a typed event bus with
//   late binding, a categorized object pool and their errors
// - Expose the game layer (`game`) wired on top of them
// - Provide the threaded facade (`Engine`) that runs a session at a
//   fixed tick rate
//
// Typical usage:
// ```no_run
// use sidescroll_runtime::EngineBuilder;
// use sidescroll_runtime::game::ControlEvent;
//
// let engine = EngineBuilder::new().build().run();
// engine.send(ControlEvent::StartGame);
// let summary = engine.shutdown();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the domain-independent systems. `game` is the obstacle
// game built from them and can be driven directly without the engine
// thread.
//
pub mod core;
pub mod game;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the threaded entry point.
//
mod engine;

//--- Public Exports ------------------------------------------------------
pub use engine::{Engine, EngineBuilder, EngineHandle};
