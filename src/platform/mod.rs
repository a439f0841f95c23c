//! Platform-specific Windows implementations
//!
//! This module encapsulates all Win32 API interactions. It is compiled only
//! on Windows; every other layer builds and tests on any platform.

#[cfg(windows)]
pub mod window;

#[cfg(windows)]
pub use window::{WindowError, WindowRedraw, run};
