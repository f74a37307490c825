//! TACMAP host application.
//!
//! Runs the tactical engine on a dedicated thread, reads operator commands
//! as JSON lines and streams snapshots and UI events back out.

pub mod config;
pub mod run_loop;
pub mod state;
pub mod stream;

pub use tacmap_sim::core;
