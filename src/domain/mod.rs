//! Domain logic and core data structures
//!
//! This module contains the circle entities and the plain value types they
//! are built from. It is independent of Win32 APIs.

pub mod core;
pub mod entity;

pub use self::core::{Point, Rect, Rgb};
pub use entity::{Circle, CircleSnapshot, RunSignal};
