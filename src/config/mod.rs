//! Configuration module for spinning-circles
//!
//! Typed, in-code scene configuration shared by the controller, the workers
//! and the platform window. Values are validated once before anything is
//! spawned.

pub mod scene;

pub use scene::{CircleConfig, ConfigError, MotionConfig, SceneConfig, WindowConfig};
