//! Macro playback engine
//!
//! Executes a step sequence serially against a mouse adapter. One run
//! at a time; cancellation is cooperative and observed only at step
//! boundaries, so stopping never aborts a click mid-flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;

use mimeo_core::error::PlaybackError;
use mimeo_core::step::Step;

use crate::adapter::MouseAdapter;
use crate::platform;
use crate::status::StatusEvent;

const STATUS_BUFFER: usize = 256;

/// Playback options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    /// Delay divisor: 1.0 is real time, 2.0 halves every delay.
    pub speed: f64,
    /// Restart from the first step after the last one, until stopped.
    pub repeat: bool,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            repeat: false,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every step executed.
    Completed,
    /// The cancellation flag was observed at a step boundary.
    Stopped,
}

/// Executes macros against the system mouse.
///
/// Cheap to clone; clones share the same engine state, so a clone
/// handed to a signal handler can stop a run started elsewhere.
#[derive(Clone)]
pub struct Player {
    inner: Arc<Inner>,
}

struct Inner {
    adapter: Option<Box<dyn MouseAdapter>>,
    playing: AtomicBool,
    stop: AtomicBool,
    status: Mutex<Option<Sender<StatusEvent>>>,
}

impl Player {
    /// Player bound to the host platform's mouse backend. On platforms
    /// without one, every `run` fails with `UnsupportedPlatform`.
    pub fn new() -> Self {
        Self::build(platform::system_adapter())
    }

    /// Player with a caller-supplied adapter (tests, dry runs).
    pub fn with_adapter(adapter: impl MouseAdapter + 'static) -> Self {
        Self::build(Some(Box::new(adapter)))
    }

    fn build(adapter: Option<Box<dyn MouseAdapter>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                adapter,
                playing: AtomicBool::new(false),
                stop: AtomicBool::new(false),
                status: Mutex::new(None),
            }),
        }
    }

    /// Whether a mouse backend is available at all.
    pub fn is_supported(&self) -> bool {
        self.inner.adapter.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.inner.playing.load(Ordering::SeqCst)
    }

    /// Subscribe to status events. A single subscriber slot: a new
    /// subscription replaces any previous one.
    pub fn subscribe(&self) -> Receiver<StatusEvent> {
        let (tx, rx) = bounded(STATUS_BUFFER);
        *self.inner.status.lock() = Some(tx);
        rx
    }

    /// Request cancellation and return immediately. The running loop
    /// observes the flag at the next step boundary, so latency is
    /// bounded by the current step's own delay or click duration.
    /// Harmless when nothing is playing.
    pub fn stop(&self) {
        self.inner.stop.store(true, Ordering::SeqCst);
    }

    /// Execute `steps` in order on the calling thread.
    ///
    /// Emits a `playing` event up front, another one with its index
    /// before each step, and a final `stopped` event on completion or
    /// cancellation. A failed click aborts the run: an `error` event
    /// fires, the remaining steps never execute, and the error is
    /// returned. Clicks already dispatched are not undone.
    pub fn run(&self, steps: &[Step], opts: PlayOptions) -> Result<RunOutcome, PlaybackError> {
        let inner = &*self.inner;
        if inner.playing.swap(true, Ordering::SeqCst) {
            return Err(PlaybackError::AlreadyPlaying);
        }
        let Some(adapter) = inner.adapter.as_deref() else {
            inner.playing.store(false, Ordering::SeqCst);
            return Err(PlaybackError::UnsupportedPlatform);
        };
        inner.stop.store(false, Ordering::SeqCst);
        self.emit(StatusEvent::playing());

        let outcome = 'passes: loop {
            for (index, step) in steps.iter().enumerate() {
                if inner.stop.load(Ordering::SeqCst) {
                    break 'passes RunOutcome::Stopped;
                }
                self.emit(StatusEvent::playing_at(index));
                match step {
                    Step::Wait(wait) => self.pause(wait.delay_ms, opts.speed),
                    Step::Click(click) => {
                        if let Err(err) = adapter.click(click.button, click.target()) {
                            let message = err.to_string();
                            self.emit(StatusEvent::error(message.clone()));
                            inner.playing.store(false, Ordering::SeqCst);
                            return Err(PlaybackError::ClickFailed(message));
                        }
                        self.pause(click.delay_ms, opts.speed);
                    }
                }
            }
            if inner.stop.load(Ordering::SeqCst) {
                break RunOutcome::Stopped;
            }
            if !opts.repeat {
                break RunOutcome::Completed;
            }
        };

        inner.playing.store(false, Ordering::SeqCst);
        self.emit(StatusEvent::Stopped);
        Ok(outcome)
    }

    /// Run on a background thread. Precondition failures (another run
    /// active, no platform backend) surface through the handle.
    pub fn spawn(&self, steps: Vec<Step>, opts: PlayOptions) -> PlaybackHandle {
        let player = self.clone();
        let runner = self.clone();
        let thread = thread::spawn(move || runner.run(&steps, opts));
        PlaybackHandle { player, thread }
    }

    fn emit(&self, event: StatusEvent) {
        if let Some(tx) = self.inner.status.lock().as_ref() {
            let _ = tx.try_send(event);
        }
    }

    fn pause(&self, delay_ms: u64, speed: f64) {
        let ms = if speed > 0.0 && speed != 1.0 {
            (delay_ms as f64 / speed) as u64
        } else {
            delay_ms
        };
        if ms > 0 {
            thread::sleep(Duration::from_millis(ms));
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a run executing on a background thread.
pub struct PlaybackHandle {
    player: Player,
    thread: thread::JoinHandle<Result<RunOutcome, PlaybackError>>,
}

impl PlaybackHandle {
    /// Request cancellation of this run.
    pub fn stop(&self) {
        self.player.stop();
    }

    pub fn is_running(&self) -> bool {
        self.player.is_playing()
    }

    /// Block until the run finishes.
    pub fn wait(self) -> Result<RunOutcome, PlaybackError> {
        self.thread
            .join()
            .unwrap_or_else(|_| Err(PlaybackError::ClickFailed("playback thread panicked".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MouseAdapter;
    use mimeo_core::step::MouseButton;
    use std::time::Instant;

    #[derive(Clone, Default)]
    struct RecordingMouse {
        calls: Arc<Mutex<Vec<(MouseButton, Option<(i32, i32)>)>>>,
        // 1-based click number that fails
        fail_on: Option<usize>,
    }

    impl RecordingMouse {
        fn failing_on(n: usize) -> Self {
            Self {
                fail_on: Some(n),
                ..Self::default()
            }
        }
    }

    impl MouseAdapter for RecordingMouse {
        fn click(&self, button: MouseButton, at: Option<(i32, i32)>) -> anyhow::Result<()> {
            let mut calls = self.calls.lock();
            calls.push((button, at));
            if Some(calls.len()) == self.fail_on {
                anyhow::bail!("injection failed");
            }
            Ok(())
        }
    }

    #[test]
    fn wait_only_run_takes_at_least_the_total_delay() {
        let player = Player::with_adapter(RecordingMouse::default());
        let steps = vec![Step::wait(30), Step::wait(20)];
        let started = Instant::now();
        let outcome = player.run(&steps, PlayOptions::default()).unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(!player.is_playing());
    }

    #[test]
    fn second_run_is_rejected_while_the_first_is_active() {
        let player = Player::with_adapter(RecordingMouse::default());
        let rx = player.subscribe();
        let handle = player.spawn(vec![Step::wait(200)], PlayOptions::default());

        // Wait for the first step to start so the run is settled in.
        assert_eq!(rx.recv().unwrap(), StatusEvent::playing());
        assert_eq!(rx.recv().unwrap(), StatusEvent::playing_at(0));

        let err = player.run(&[], PlayOptions::default()).unwrap_err();
        assert_eq!(err, PlaybackError::AlreadyPlaying);
        assert_eq!(err.to_string(), "Already playing");

        assert_eq!(handle.wait().unwrap(), RunOutcome::Completed);
    }

    #[test]
    fn stop_during_a_wait_prevents_the_next_click() {
        let mouse = RecordingMouse::default();
        let player = Player::with_adapter(mouse.clone());
        let rx = player.subscribe();
        let steps = vec![Step::wait(150), Step::click_here(MouseButton::Left, 0)];
        let handle = player.spawn(steps, PlayOptions::default());

        // Step 0 announced means the stop flag has been cleared; the
        // stop lands while the 150ms wait is in progress.
        loop {
            if rx.recv().unwrap() == StatusEvent::playing_at(0) {
                break;
            }
        }
        player.stop();

        assert_eq!(handle.wait().unwrap(), RunOutcome::Stopped);
        assert!(mouse.calls.lock().is_empty());
        let trailing: Vec<_> = rx.try_iter().collect();
        assert_eq!(trailing.last(), Some(&StatusEvent::Stopped));
    }

    #[test]
    fn custom_position_reaches_the_adapter_current_does_not() {
        let mouse = RecordingMouse::default();
        let player = Player::with_adapter(mouse.clone());
        let steps = vec![
            Step::click_at(MouseButton::Left, 100, 200, 0),
            Step::click_here(MouseButton::Right, 0),
        ];
        player.run(&steps, PlayOptions::default()).unwrap();

        let calls = mouse.calls.lock();
        assert_eq!(calls[0], (MouseButton::Left, Some((100, 200))));
        assert_eq!(calls[1], (MouseButton::Right, None));
    }

    #[test]
    fn click_failure_aborts_the_run() {
        let mouse = RecordingMouse::failing_on(3);
        let player = Player::with_adapter(mouse.clone());
        let rx = player.subscribe();
        let steps: Vec<Step> = (0..5)
            .map(|_| Step::click_here(MouseButton::Left, 0))
            .collect();

        let err = player.run(&steps, PlayOptions::default()).unwrap_err();
        assert_eq!(err, PlaybackError::ClickFailed("injection failed".into()));
        assert_eq!(mouse.calls.lock().len(), 3);
        assert!(!player.is_playing());

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events.last(),
            Some(&StatusEvent::error("injection failed"))
        );
    }

    #[test]
    fn empty_run_completes_immediately() {
        let mouse = RecordingMouse::default();
        let player = Player::with_adapter(mouse.clone());
        let rx = player.subscribe();

        let outcome = player.run(&[], PlayOptions::default()).unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
        assert!(mouse.calls.lock().is_empty());

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events, vec![StatusEvent::playing(), StatusEvent::Stopped]);
    }

    #[test]
    fn missing_backend_reports_unsupported() {
        let player = Player::build(None);
        assert!(!player.is_supported());
        let err = player.run(&[], PlayOptions::default()).unwrap_err();
        assert_eq!(err, PlaybackError::UnsupportedPlatform);
        assert!(!player.is_playing());
    }

    #[test]
    fn stop_while_idle_is_a_no_op() {
        let player = Player::with_adapter(RecordingMouse::default());
        player.stop();
        // The stale flag is cleared when the next run starts.
        let outcome = player
            .run(&[Step::wait(1)], PlayOptions::default())
            .unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
    }

    #[test]
    fn repeat_replays_until_stopped() {
        let mouse = RecordingMouse::default();
        let player = Player::with_adapter(mouse.clone());
        let steps = vec![Step::click_here(MouseButton::Left, 5)];
        let opts = PlayOptions {
            repeat: true,
            ..PlayOptions::default()
        };
        let handle = player.spawn(steps, opts);

        thread::sleep(Duration::from_millis(60));
        handle.stop();
        assert_eq!(handle.wait().unwrap(), RunOutcome::Stopped);
        assert!(mouse.calls.lock().len() >= 2);
    }

    #[test]
    fn slower_speed_stretches_delays() {
        let player = Player::with_adapter(RecordingMouse::default());
        let opts = PlayOptions {
            speed: 0.5,
            ..PlayOptions::default()
        };
        let started = Instant::now();
        player.run(&[Step::wait(40)], opts).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(80));
    }
}
