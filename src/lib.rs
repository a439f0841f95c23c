//! Four colored circles, each animated by its own worker thread
//!
//! Pressing a number key toggles the matching circle's worker between
//! idling on a condition variable and drifting the circle to the right.
//! The core (`domain`, `app`, `input`, `ui`) is platform independent; the
//! Win32 window lives in `platform` and is only built on Windows.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod platform;
pub mod ui;

pub use app::{AnimationController, AppError, WorkerState};
pub use config::SceneConfig;
