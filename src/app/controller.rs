//! Animation controller and lifecycle coordination
//!
//! The controller owns the ordered collection of circles paired with their
//! worker handles. It is the only place workers are started and the only
//! place they are joined, which keeps every circle alive until its worker
//! has exited.

use std::sync::Arc;

use crate::app::state::WorkerState;
use crate::app::worker::AnimationWorker;
use crate::config::{ConfigError, MotionConfig, SceneConfig};
use crate::domain::core::Rgb;
use crate::domain::entity::{Circle, CircleSnapshot};
use crate::input::keyboard::{InputDispatcher, KeyBindings, KeyOutcome};
use crate::ui::renderer::RendererError;
use crate::ui::surface::{RedrawRequest, Surface, render_frame};

/// Application errors that can occur during controller operations
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to spawn worker for circle {index}: {source}")]
    WorkerSpawnFailed {
        index: usize,
        source: std::io::Error,
    },

    #[error("Worker for circle {index} panicked")]
    WorkerPanicked { index: usize },

    #[error("Rendering failed: {0}")]
    Renderer(#[from] RendererError),

    #[cfg(windows)]
    #[error("Window error: {0}")]
    Window(#[from] crate::platform::window::WindowError),
}

/// A circle and the worker that animates it
#[derive(Debug)]
struct CircleSlot {
    circle: Arc<Circle>,
    worker: AnimationWorker,
}

/// Owns every circle and worker for one animated scene
///
/// Independent instances can coexist; nothing here is process-global.
pub struct AnimationController {
    slots: Vec<CircleSlot>,
    dispatcher: InputDispatcher,
    motion: MotionConfig,
    background: Rgb,
    shut_down: bool,
}

impl AnimationController {
    /// Validates `config`, creates the circles and starts one worker each
    ///
    /// Workers already started are stopped and joined again if a later one
    /// fails to spawn.
    pub fn start(config: SceneConfig, redraw: Arc<dyn RedrawRequest>) -> Result<Self, AppError> {
        config.validate()?;

        let mut controller = Self {
            slots: Vec::with_capacity(config.circles.len()),
            dispatcher: InputDispatcher::new(KeyBindings::numeric(config.circles.len())),
            motion: config.motion,
            background: config.window.background,
            shut_down: false,
        };

        for (index, circle_config) in config.circles.iter().enumerate() {
            let circle = Arc::new(Circle::from_config(circle_config));
            let worker = AnimationWorker::spawn(
                index,
                Arc::clone(&circle),
                config.motion,
                Arc::clone(&redraw),
            )
            .map_err(|source| AppError::WorkerSpawnFailed { index, source })?;

            controller.slots.push(CircleSlot { circle, worker });
        }

        log::info!(
            "Animation controller started with {} circles",
            controller.slots.len()
        );

        Ok(controller)
    }

    /// Replaces the default 1..N key binding
    pub fn set_key_bindings(&mut self, bindings: KeyBindings) {
        self.dispatcher = InputDispatcher::new(bindings);
    }

    pub fn circle_count(&self) -> usize {
        self.slots.len()
    }

    pub fn motion(&self) -> MotionConfig {
        self.motion
    }

    pub fn circle(&self, index: usize) -> Option<&Circle> {
        self.slots.get(index).map(|slot| slot.circle.as_ref())
    }

    fn circles(&self) -> impl Iterator<Item = &Circle> {
        self.slots.iter().map(|slot| slot.circle.as_ref())
    }

    /// Run flag of a circle, `None` for an invalid index
    pub fn is_running(&self, index: usize) -> Option<bool> {
        self.circle(index).map(Circle::is_running)
    }

    /// Last published state of a circle's worker
    pub fn worker_state(&self, index: usize) -> Option<WorkerState> {
        self.slots.get(index).map(|slot| slot.worker.state())
    }

    /// Toggles a circle by index
    ///
    /// # Returns
    /// The new run flag, or `None` if the index is out of range
    pub fn toggle(&self, index: usize) -> Option<bool> {
        let running = self.circle(index)?.toggle_running();
        log::debug!("Circle {index} toggled (running: {running})");
        Some(running)
    }

    /// Handles a raw key code from the windowing layer
    ///
    /// Unbound keys are ignored without error.
    pub fn handle_key(&self, key: u32) -> Option<KeyOutcome> {
        self.dispatcher.dispatch(key, self.circles())
    }

    /// Current state of every circle, in order
    pub fn snapshots(&self) -> Vec<CircleSnapshot> {
        self.circles().map(Circle::snapshot).collect()
    }

    /// Paints the current frame onto `surface`
    ///
    /// Reads positions without taking any circle's lock.
    pub fn render<S>(&self, surface: &mut S)
    where
        S: Surface + ?Sized,
    {
        render_frame(surface, self.background, &self.snapshots());
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Stops every worker and waits for all of them to exit
    ///
    /// Every worker is joined even if one of them panicked; the first panic
    /// is reported. Calling this again is a no-op.
    pub fn shutdown(&mut self) -> Result<(), AppError> {
        if self.shut_down {
            return Ok(());
        }
        self.shut_down = true;

        log::info!("Stopping {} animation workers", self.slots.len());

        for slot in &self.slots {
            slot.circle.request_stop();
        }

        let mut result = Ok(());
        for slot in &mut self.slots {
            if slot.worker.join().is_err() {
                let index = slot.worker.index();
                log::error!("Worker for circle {index} panicked");
                if result.is_ok() {
                    result = Err(AppError::WorkerPanicked { index });
                }
            }
        }

        log::info!("All animation workers joined");
        result
    }
}

impl Drop for AnimationController {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            log::error!("Animation controller shutdown failed: {err}");
        }
    }
}
