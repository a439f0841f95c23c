//! Per-circle entity state
//!
//! Each `Circle` owns its own mutex/condition-variable pair guarding the
//! run flag and the stop request. No lock is ever shared between circles.
//! The horizontal position lives in an atomic so the render thread can read
//! it without taking the circle's lock; only the owning worker writes it.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::config::CircleConfig;
use crate::domain::core::{Point, Rgb};

/// Flags guarded by the circle's lock
#[derive(Debug, Default, Clone, Copy)]
struct RunState {
    running: bool,
    stop_requested: bool,
}

/// What a worker should do after waiting on its circle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSignal {
    /// Run flag is set, perform the next step
    Run,
    /// Shutdown was requested, leave the loop
    Stop,
}

/// Immutable copy of everything the renderer needs from a circle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleSnapshot {
    pub center: Point,
    pub radius: i32,
    pub color: Rgb,
}

/// A single animated circle
///
/// Deliberately neither `Clone` nor `Copy`: the lock/condvar pair is the
/// circle's identity. Share it with its worker through an `Arc`.
#[derive(Debug)]
pub struct Circle {
    x: AtomicI32,
    y: i32,
    radius: i32,
    color: Rgb,
    state: Mutex<RunState>,
    wake: Condvar,
}

impl Circle {
    /// Creates a circle at `center`
    pub fn new(center: Point, radius: i32, color: Rgb, running: bool) -> Self {
        Self {
            x: AtomicI32::new(center.x),
            y: center.y,
            radius,
            color,
            state: Mutex::new(RunState {
                running,
                stop_requested: false,
            }),
            wake: Condvar::new(),
        }
    }

    /// Creates a circle from its configuration entry
    pub fn from_config(config: &CircleConfig) -> Self {
        Self::new(config.center, config.radius, config.color, config.running)
    }

    // The guarded state is two booleans, so a poisoned lock still holds
    // a consistent value.
    fn lock_state(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flips the run flag and wakes the waiting worker
    ///
    /// # Returns
    /// The new value of the run flag
    pub fn toggle_running(&self) -> bool {
        let running = {
            let mut state = self.lock_state();
            state.running = !state.running;
            state.running
        };
        self.wake.notify_one();
        running
    }

    /// Lock-protected read of the run flag
    pub fn is_running(&self) -> bool {
        self.lock_state().running
    }

    /// Whether shutdown has been requested for this circle
    pub fn is_stop_requested(&self) -> bool {
        self.lock_state().stop_requested
    }

    /// Clears the run flag, raises the stop request and wakes every waiter
    pub fn request_stop(&self) {
        {
            let mut state = self.lock_state();
            state.running = false;
            state.stop_requested = true;
        }
        self.wake.notify_all();
    }

    /// Blocks until the circle is running or a stop is requested
    ///
    /// Spurious wakeups re-enter the wait; the predicate is always evaluated
    /// under the lock.
    pub fn wait_for_run(&self) -> RunSignal {
        self.wait_for_run_with(|| {})
    }

    /// Like [`Self::wait_for_run`], calling `on_idle` first if it is about
    /// to block
    ///
    /// `on_idle` runs under the circle's lock, so no toggle can slip in
    /// between it and the wait.
    pub fn wait_for_run_with<F>(&self, on_idle: F) -> RunSignal
    where
        F: FnOnce(),
    {
        let guard = self.lock_state();
        if !guard.running && !guard.stop_requested {
            on_idle();
        }

        let guard = self
            .wake
            .wait_while(guard, |state| !state.running && !state.stop_requested)
            .unwrap_or_else(PoisonError::into_inner);

        if guard.stop_requested {
            RunSignal::Stop
        } else {
            RunSignal::Run
        }
    }

    /// Sleeps for `interval` unless a stop request arrives first
    ///
    /// Toggling the run flag does not cut the delay short.
    pub fn pause(&self, interval: Duration) -> RunSignal {
        let guard = self.lock_state();
        let (guard, _timeout) = self
            .wake
            .wait_timeout_while(guard, interval, |state| !state.stop_requested)
            .unwrap_or_else(PoisonError::into_inner);

        if guard.stop_requested {
            RunSignal::Stop
        } else {
            RunSignal::Run
        }
    }

    /// Moves the circle `step` pixels right, wrapping inside `[0, bound)`
    ///
    /// Must only be called by the circle's own worker.
    ///
    /// # Returns
    /// The new horizontal position
    pub fn advance(&self, step: i32, bound: i32) -> i32 {
        let current = self.x.load(Ordering::Relaxed);
        let next = (i64::from(current) + i64::from(step)).rem_euclid(i64::from(bound)) as i32;
        self.x.store(next, Ordering::Relaxed);
        next
    }

    /// Current center of the circle
    pub fn position(&self) -> Point {
        Point::new(self.x.load(Ordering::Relaxed), self.y)
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Reads position and appearance without taking the lock
    pub fn snapshot(&self) -> CircleSnapshot {
        CircleSnapshot {
            center: self.position(),
            radius: self.radius,
            color: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    fn red_circle() -> Circle {
        Circle::new(Point::new(50, 100), 20, Rgb::RED, false)
    }

    #[test]
    fn new_circle_is_idle() {
        let circle = red_circle();
        assert!(!circle.is_running());
        assert!(!circle.is_stop_requested());
        assert_eq!(circle.position(), Point::new(50, 100));
        assert_eq!(circle.radius(), 20);
        assert_eq!(circle.color(), Rgb::RED);
    }

    #[test]
    fn double_toggle_restores_run_state() {
        let idle = red_circle();
        assert!(idle.toggle_running());
        assert!(!idle.toggle_running());
        assert!(!idle.is_running());

        let running = Circle::new(Point::new(0, 0), 5, Rgb::BLUE, true);
        assert!(!running.toggle_running());
        assert!(running.toggle_running());
        assert!(running.is_running());
    }

    #[test]
    fn advance_wraps_within_bound() {
        let circle = Circle::new(Point::new(0, 0), 10, Rgb::GREEN, false);
        let x0 = 250;
        let circle_at = Circle::new(Point::new(x0, 0), 10, Rgb::GREEN, false);

        for k in 1..=200 {
            let x = circle_at.advance(5, 400);
            assert_eq!(x, (x0 + k * 5) % 400);
            assert!((0..400).contains(&x));
        }

        assert_eq!(circle.advance(395, 400), 395);
        assert_eq!(circle.advance(5, 400), 0);
        assert_eq!(circle.position().y, 0);
    }

    #[test]
    fn snapshot_reflects_position() {
        let circle = red_circle();
        circle.advance(5, 400);
        let snapshot = circle.snapshot();
        assert_eq!(snapshot.center, Point::new(55, 100));
        assert_eq!(snapshot.radius, 20);
        assert_eq!(snapshot.color, Rgb::RED);
    }

    #[test]
    fn wait_returns_immediately_when_running() {
        let circle = Circle::new(Point::new(0, 0), 5, Rgb::RED, true);
        assert_eq!(circle.wait_for_run(), RunSignal::Run);
    }

    #[test]
    fn toggle_wakes_waiting_thread() {
        let circle = Arc::new(red_circle());
        let waiter = {
            let circle = Arc::clone(&circle);
            thread::spawn(move || circle.wait_for_run())
        };

        thread::sleep(Duration::from_millis(20));
        circle.toggle_running();

        assert_eq!(waiter.join().unwrap(), RunSignal::Run);
    }

    #[test]
    fn stop_request_wakes_waiting_thread() {
        let circle = Arc::new(red_circle());
        let waiter = {
            let circle = Arc::clone(&circle);
            thread::spawn(move || circle.wait_for_run())
        };

        thread::sleep(Duration::from_millis(20));
        circle.request_stop();

        assert_eq!(waiter.join().unwrap(), RunSignal::Stop);
        assert!(!circle.is_running());
        assert!(circle.is_stop_requested());
    }

    #[test]
    fn on_idle_runs_only_when_blocking() {
        let running = Circle::new(Point::new(0, 0), 5, Rgb::RED, true);
        let mut called = false;
        assert_eq!(running.wait_for_run_with(|| called = true), RunSignal::Run);
        assert!(!called);

        let idle = Arc::new(red_circle());
        let waiter = {
            let idle = Arc::clone(&idle);
            thread::spawn(move || {
                let mut called = false;
                let signal = idle.wait_for_run_with(|| called = true);
                (signal, called)
            })
        };

        thread::sleep(Duration::from_millis(20));
        idle.toggle_running();
        assert_eq!(waiter.join().unwrap(), (RunSignal::Run, true));
    }

    #[test]
    fn stop_wins_over_running_flag() {
        let circle = Circle::new(Point::new(0, 0), 5, Rgb::RED, true);
        circle.request_stop();
        assert_eq!(circle.wait_for_run(), RunSignal::Stop);
    }

    #[test]
    fn pause_runs_full_interval_without_stop() {
        let circle = red_circle();
        let started = Instant::now();
        assert_eq!(circle.pause(Duration::from_millis(30)), RunSignal::Run);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn pause_is_cut_short_by_stop_request() {
        let circle = Arc::new(red_circle());
        let sleeper = {
            let circle = Arc::clone(&circle);
            thread::spawn(move || {
                let started = Instant::now();
                let signal = circle.pause(Duration::from_secs(10));
                (signal, started.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(20));
        circle.request_stop();

        let (signal, elapsed) = sleeper.join().unwrap();
        assert_eq!(signal, RunSignal::Stop);
        assert!(elapsed < Duration::from_secs(5));
    }
}
