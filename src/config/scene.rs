use std::time::Duration;

use thiserror::Error;

use crate::domain::core::{Point, Rgb};
use crate::input::keyboard::KeyBindings;

/// Initial parameters for a single circle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircleConfig {
    pub center: Point,
    pub radius: i32,
    pub color: Rgb,
    pub running: bool,
}

impl CircleConfig {
    /// Idle circle at `(x, y)`
    pub fn new(x: i32, y: i32, radius: i32, color: Rgb) -> Self {
        Self {
            center: Point::new(x, y),
            radius,
            color,
            running: false,
        }
    }

    /// Same circle, but animating from the start
    pub fn running(mut self) -> Self {
        self.running = true;
        self
    }
}

/// Horizontal drift shared by every worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionConfig {
    /// Pixels moved per step
    pub step: i32,
    /// Positions wrap inside `[0, width_bound)`
    pub width_bound: i32,
    /// Delay between steps
    pub interval: Duration,
}

impl MotionConfig {
    pub const DEFAULT_STEP: i32 = 5;
    pub const DEFAULT_WIDTH_BOUND: i32 = 400;
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            step: Self::DEFAULT_STEP,
            width_bound: Self::DEFAULT_WIDTH_BOUND,
            interval: Self::DEFAULT_INTERVAL,
        }
    }
}

/// Main window appearance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub background: Rgb,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("Spinning Circles"),
            width: 400,
            height: 400,
            background: Rgb::WHITE,
        }
    }
}

/// Everything needed to start an animation controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneConfig {
    pub circles: Vec<CircleConfig>,
    pub motion: MotionConfig,
    pub window: WindowConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            circles: vec![
                CircleConfig::new(50, 100, 20, Rgb::RED),
                CircleConfig::new(150, 200, 30, Rgb::GREEN),
                CircleConfig::new(250, 100, 25, Rgb::BLUE),
                CircleConfig::new(250, 200, 35, Rgb::YELLOW),
            ],
            motion: MotionConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Default motion and window with a custom set of circles
    pub fn with_circles(circles: Vec<CircleConfig>) -> Self {
        Self {
            circles,
            ..Self::default()
        }
    }

    /// Checks every value the controller and workers rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.circles.is_empty() {
            return Err(ConfigError::NoCircles);
        }

        if self.circles.len() > KeyBindings::MAX_NUMERIC_KEYS {
            return Err(ConfigError::TooManyCircles {
                count: self.circles.len(),
                max: KeyBindings::MAX_NUMERIC_KEYS,
            });
        }

        if self.motion.width_bound <= 0 {
            return Err(ConfigError::InvalidWidthBound(self.motion.width_bound));
        }

        if self.motion.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }

        if self.window.width <= 0 || self.window.height <= 0 {
            return Err(ConfigError::InvalidWindowSize {
                width: self.window.width,
                height: self.window.height,
            });
        }

        for (index, circle) in self.circles.iter().enumerate() {
            if circle.radius <= 0 {
                return Err(ConfigError::InvalidRadius {
                    index,
                    radius: circle.radius,
                });
            }

            if !(0..self.motion.width_bound).contains(&circle.center.x) {
                return Err(ConfigError::CenterOutOfBounds {
                    index,
                    x: circle.center.x,
                    bound: self.motion.width_bound,
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Scene must contain at least one circle")]
    NoCircles,
    #[error("Scene has {count} circles but only {max} can be bound to number keys")]
    TooManyCircles { count: usize, max: usize },
    #[error("Circle {index} has non-positive radius {radius}")]
    InvalidRadius { index: usize, radius: i32 },
    #[error("Circle {index} starts at x={x}, outside [0, {bound})")]
    CenterOutOfBounds { index: usize, x: i32, bound: i32 },
    #[error("Width bound must be positive, got {0}")]
    InvalidWidthBound(i32),
    #[error("Step interval must be non-zero")]
    ZeroInterval,
    #[error("Invalid window size {width}x{height}")]
    InvalidWindowSize { width: i32, height: i32 },
}
