//! Application orchestration layer
//!
//! Starts and stops the per-circle workers and routes key presses and
//! repaints between the platform layer and the circles.

pub mod controller;
pub mod state;
pub mod worker;

pub use controller::{AnimationController, AppError};
pub use state::{WorkerEvent, WorkerState};
pub use worker::AnimationWorker;
