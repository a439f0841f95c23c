//! Per-circle animation worker threads
//!
//! Each worker owns nothing but a handle to its own circle. It blocks on that
//! circle's condition variable while idle, and while active it steps the
//! circle, asks for a redraw and sleeps for the configured interval.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::app::state::{WorkerEvent, WorkerState, WorkerStatus};
use crate::config::MotionConfig;
use crate::domain::entity::{Circle, RunSignal};
use crate::ui::surface::RedrawRequest;

/// Handle to a running worker thread
#[derive(Debug)]
pub struct AnimationWorker {
    index: usize,
    status: Arc<WorkerStatus>,
    handle: Option<JoinHandle<()>>,
}

impl AnimationWorker {
    /// Starts the worker thread for `circle`
    pub fn spawn(
        index: usize,
        circle: Arc<Circle>,
        motion: MotionConfig,
        redraw: Arc<dyn RedrawRequest>,
    ) -> io::Result<Self> {
        let status = Arc::new(WorkerStatus::new());
        let thread_status = Arc::clone(&status);

        let handle = thread::Builder::new()
            .name(format!("circle-worker-{index}"))
            .spawn(move || run(index, &circle, motion, redraw.as_ref(), &thread_status))?;

        log::debug!("Spawned worker for circle {index}");

        Ok(Self {
            index,
            status,
            handle: Some(handle),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Last state published by the worker thread
    pub fn state(&self) -> WorkerState {
        self.status.get()
    }

    /// True once the thread has returned or been joined
    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .is_none_or(|handle| handle.is_finished())
    }

    /// Waits for the thread to exit
    ///
    /// Joining twice is a no-op. The circle must have been asked to stop
    /// first, otherwise this blocks forever.
    pub fn join(&mut self) -> thread::Result<()> {
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        }
    }
}

fn run(
    index: usize,
    circle: &Circle,
    motion: MotionConfig,
    redraw: &dyn RedrawRequest,
    status: &WorkerStatus,
) {
    let mut state = WorkerState::Waiting;

    loop {
        // Published under the circle's lock right before blocking
        let signal = circle.wait_for_run_with(|| {
            state = transition(index, state, WorkerEvent::Paused, status);
        });
        let event = match signal {
            RunSignal::Run => WorkerEvent::Resumed,
            RunSignal::Stop => WorkerEvent::StopRequested,
        };
        state = transition(index, state, event, status);
        if state == WorkerState::Stopped {
            break;
        }

        let x = circle.advance(motion.step, motion.width_bound);
        log::trace!("Circle {index} moved to x={x}");
        redraw.request_redraw();

        if circle.pause(motion.interval) == RunSignal::Stop {
            transition(index, state, WorkerEvent::StopRequested, status);
            break;
        }
    }
}

fn transition(
    index: usize,
    state: WorkerState,
    event: WorkerEvent,
    status: &WorkerStatus,
) -> WorkerState {
    let next = state.process_event(event);
    if next != state {
        log::debug!("Worker {index}: {state:?} -> {next:?}");
        status.set(next);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::core::{Point, Rgb};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct CountingRedraw {
        count: AtomicUsize,
    }

    impl CountingRedraw {
        fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }

    impl RedrawRequest for CountingRedraw {
        fn request_redraw(&self) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        condition()
    }

    fn fast_motion() -> MotionConfig {
        MotionConfig {
            step: 5,
            width_bound: 400,
            interval: Duration::from_millis(5),
        }
    }

    fn start(
        x: i32,
        running: bool,
        motion: MotionConfig,
    ) -> (Arc<Circle>, Arc<CountingRedraw>, AnimationWorker) {
        let circle = Arc::new(Circle::new(Point::new(x, 100), 20, Rgb::RED, running));
        let redraw = Arc::new(CountingRedraw::default());
        let worker = AnimationWorker::spawn(
            0,
            Arc::clone(&circle),
            motion,
            Arc::clone(&redraw) as Arc<dyn RedrawRequest>,
        )
        .expect("Failed to spawn worker");
        (circle, redraw, worker)
    }

    #[test]
    fn idle_worker_never_steps() {
        let (circle, redraw, mut worker) = start(50, false, fast_motion());

        thread::sleep(Duration::from_millis(60));
        assert_eq!(redraw.count(), 0);
        assert_eq!(circle.position().x, 50);
        assert_eq!(worker.state(), WorkerState::Waiting);

        circle.request_stop();
        worker.join().expect("Worker panicked");
        assert_eq!(worker.state(), WorkerState::Stopped);
        assert!(worker.is_finished());
    }

    #[test]
    fn running_worker_steps_and_wraps() {
        let (circle, redraw, mut worker) = start(390, true, fast_motion());

        assert!(wait_until(Duration::from_secs(5), || redraw.count() >= 4));
        circle.request_stop();
        worker.join().expect("Worker panicked");

        // Every step is followed by exactly one redraw request
        let steps = redraw.count() as i32;
        let x = circle.position().x;
        assert_eq!(x, (390 + steps * 5) % 400);
        assert!((0..400).contains(&x));
    }

    #[test]
    fn toggling_off_returns_worker_to_waiting() {
        let (circle, redraw, mut worker) = start(0, true, fast_motion());

        assert!(wait_until(Duration::from_secs(5), || redraw.count() >= 1));
        assert_eq!(worker.state(), WorkerState::Active);

        circle.toggle_running();
        assert!(wait_until(Duration::from_secs(5), || {
            worker.state() == WorkerState::Waiting
        }));

        let settled = redraw.count();
        let x = circle.position().x;
        thread::sleep(Duration::from_millis(40));
        assert_eq!(redraw.count(), settled);
        assert_eq!(circle.position().x, x);

        circle.toggle_running();
        assert!(wait_until(Duration::from_secs(5), || redraw.count() > settled));

        circle.request_stop();
        worker.join().expect("Worker panicked");
    }

    #[test]
    fn stop_interrupts_long_interval() {
        let motion = MotionConfig {
            interval: Duration::from_secs(30),
            ..fast_motion()
        };
        let (circle, redraw, mut worker) = start(0, true, motion);

        assert!(wait_until(Duration::from_secs(5), || redraw.count() >= 1));

        let started = Instant::now();
        circle.request_stop();
        worker.join().expect("Worker panicked");

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(worker.state(), WorkerState::Stopped);
        assert_eq!(redraw.count(), 1);
    }

    #[test]
    fn join_twice_is_noop() {
        let (circle, _redraw, mut worker) = start(0, false, fast_motion());
        circle.request_stop();
        assert!(worker.join().is_ok());
        assert!(worker.join().is_ok());
        assert_eq!(worker.index(), 0);
    }
}
