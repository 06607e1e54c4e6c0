//! Runs a [`Countdown`] against real timers and audio.
//!
//! The driver owns the two timer handles the countdown needs (the one-second
//! ticker and the alert dismissal) and is the only place they are created or
//! dropped. Dropping a handle cancels it, so stopping is just clearing the
//! field and teardown clears both.

use crate::audio::AudioSink;
use crate::config::{ALERT_DISMISS_MS, TICK_MS};
use crate::{Action, Command, Countdown, Snapshot, TimerConfig};
use gloo_timers::callback::{Interval, Timeout};
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;

/// Source of repeating and one-shot timers. Dropping a returned handle must
/// cancel the timer.
pub trait TimerBackend: 'static {
    type Ticker: 'static;
    type Delay: 'static;

    fn every(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> Self::Ticker;

    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Self::Delay;
}

/// Browser timers through `gloo-timers`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooBackend;

impl TimerBackend for GlooBackend {
    type Ticker = Interval;
    type Delay = Timeout;

    fn every(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> Interval {
        Interval::new(period_ms, callback)
    }

    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, callback)
    }
}

type Listener = Box<dyn Fn(&Snapshot)>;

struct State<B: TimerBackend> {
    countdown: Countdown,
    ticker: Option<B::Ticker>,
    dismissal: Option<B::Delay>,
    disposed: bool,
}

struct Runtime<B: TimerBackend> {
    backend: B,
    audio: Box<dyn AudioSink>,
    listener: Listener,
    state: RefCell<State<B>>,
}

impl<B: TimerBackend> Runtime<B> {
    fn dispatch(self: &Rc<Self>, action: Action) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return;
            }
            if action == Action::DismissAlert {
                // The timeout has fired; its handle is spent.
                state.dismissal = None;
            }
            for command in state.countdown.apply(action) {
                self.execute(&mut state, command);
            }
            state.countdown.snapshot()
        };
        // Outside the borrow so the listener may read the driver again.
        (self.listener)(&snapshot);
    }

    fn execute(self: &Rc<Self>, state: &mut State<B>, command: Command) {
        match command {
            Command::StartTicking => {
                if state.ticker.is_some() {
                    return;
                }
                let weak = Rc::downgrade(self);
                state.ticker = Some(self.backend.every(
                    TICK_MS,
                    Box::new(move || {
                        if let Some(runtime) = weak.upgrade() {
                            runtime.dispatch(Action::Tick);
                        }
                    }),
                ));
            }
            Command::StopTicking => {
                state.ticker = None;
            }
            Command::ScheduleDismissal => {
                let weak = Rc::downgrade(self);
                state.dismissal = Some(self.backend.after(
                    ALERT_DISMISS_MS,
                    Box::new(move || {
                        if let Some(runtime) = weak.upgrade() {
                            runtime.dispatch(Action::DismissAlert);
                        }
                    }),
                ));
            }
            Command::CancelDismissal => {
                state.dismissal = None;
            }
            Command::Play(cue) => {
                if let Err(e) = self.audio.play(cue) {
                    warn!("Audio playback failed: {}", e);
                }
            }
            Command::SetMuted(muted) => self.audio.set_muted(muted),
            Command::PrimeAudio => self.audio.prime(),
        }
    }
}

/// Owner of a running countdown. Dropping it tears everything down.
pub struct Driver<B: TimerBackend> {
    runtime: Rc<Runtime<B>>,
}

impl<B: TimerBackend> Driver<B> {
    /// `listener` receives a fresh snapshot after every action, tick and dismissal.
    pub fn new(
        config: &TimerConfig,
        backend: B,
        audio: impl AudioSink + 'static,
        listener: impl Fn(&Snapshot) + 'static,
    ) -> Self {
        let runtime = Rc::new(Runtime {
            backend,
            audio: Box::new(audio),
            listener: Box::new(listener),
            state: RefCell::new(State {
                countdown: Countdown::new(config),
                ticker: None,
                dismissal: None,
                disposed: false,
            }),
        });
        Self { runtime }
    }

    pub fn dispatch(&self, action: Action) {
        self.runtime.dispatch(action);
    }

    pub fn start(&self) {
        self.dispatch(Action::Start);
    }

    pub fn pause(&self) {
        self.dispatch(Action::Pause);
    }

    pub fn reset(&self) {
        self.dispatch(Action::Reset);
    }

    pub fn toggle_mute(&self) {
        self.dispatch(Action::ToggleMute);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.runtime.state.borrow().countdown.snapshot()
    }

    pub fn is_ticking(&self) -> bool {
        self.runtime.state.borrow().ticker.is_some()
    }

    pub fn has_pending_dismissal(&self) -> bool {
        self.runtime.state.borrow().dismissal.is_some()
    }

    /// Cancel both timers and ignore every later action or callback.
    pub fn teardown(&self) {
        match self.runtime.state.try_borrow_mut() {
            Ok(mut state) => {
                if !state.disposed {
                    debug!("Tearing down countdown driver");
                }
                state.disposed = true;
                state.ticker = None;
                state.dismissal = None;
            }
            Err(_) => warn!("Countdown teardown skipped: driver state is in use"),
        }
    }
}

impl<B: TimerBackend> Drop for Driver<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ManualClock;
    use super::*;
    use crate::audio::testing::RecordingAudio;
    use crate::{Cue, Phase};
    use std::cell::{Cell, RefCell};

    const SEC: u64 = 1_000;

    struct Harness {
        clock: ManualClock,
        audio: Rc<RecordingAudio>,
        driver: Driver<ManualClock>,
        notified: Rc<Cell<usize>>,
    }

    fn harness(secs: u32) -> Harness {
        let clock = ManualClock::default();
        let audio = Rc::new(RecordingAudio::default());
        let notified = Rc::new(Cell::new(0));
        let counter = notified.clone();
        let driver = Driver::new(
            &TimerConfig::new(secs).unwrap(),
            clock.clone(),
            audio.clone(),
            move |_| counter.set(counter.get() + 1),
        );
        Harness {
            clock,
            audio,
            driver,
            notified,
        }
    }

    #[test]
    fn double_start_keeps_one_tick_source() {
        let h = harness(480);
        h.driver.start();
        h.driver.start();
        assert_eq!(h.clock.active_intervals(), 1);
        h.clock.advance(3 * SEC);
        assert_eq!(h.driver.snapshot().remaining_seconds, 477);
        assert_eq!(h.audio.primed.get(), 1);
    }

    #[test]
    fn start_then_pause_freezes_remaining() {
        let h = harness(480);
        h.driver.start();
        h.driver.pause();
        assert!(!h.driver.is_ticking());
        assert_eq!(h.clock.active_intervals(), 0);
        h.clock.advance(10 * SEC);
        assert_eq!(h.driver.snapshot().remaining_seconds, 480);
        assert_eq!(h.driver.snapshot().phase, Phase::Paused);
    }

    #[test]
    fn pause_and_resume_continues_from_same_value() {
        let h = harness(480);
        h.driver.start();
        h.clock.advance(5 * SEC);
        h.driver.pause();
        h.clock.advance(60 * SEC);
        h.driver.start();
        h.clock.advance(5 * SEC);
        assert_eq!(h.driver.snapshot().remaining_seconds, 470);
    }

    #[test]
    fn five_minute_alert_dismisses_itself() {
        let h = harness(480);
        h.driver.start();
        h.clock.advance(180 * SEC);
        let snap = h.driver.snapshot();
        assert_eq!(snap.remaining_seconds, 300);
        assert!(snap.alert_visible);
        assert_eq!(snap.alert_text, "5 MINUTES REMAINING");
        assert_eq!(*h.audio.played.borrow(), vec![Cue::Alert5]);

        // Dismissal needs no ticks.
        h.driver.pause();
        h.clock.advance(4_999);
        assert!(h.driver.snapshot().alert_visible);
        h.clock.advance(1);
        let snap = h.driver.snapshot();
        assert!(!snap.alert_visible);
        assert!(!snap.highlighted);
        assert!(snap.alert_text.is_empty());
        assert_eq!(snap.remaining_seconds, 300);
        assert!(!h.driver.has_pending_dismissal());
    }

    #[test]
    fn run_to_completion() {
        let h = harness(480);
        h.driver.start();
        h.clock.advance(480 * SEC);
        let snap = h.driver.snapshot();
        assert_eq!(snap.remaining_seconds, 0);
        assert_eq!(snap.display_text, "00:00");
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.alert_text, "TIME'S UP!");
        assert_eq!(h.clock.active_intervals(), 0);
        assert_eq!(
            *h.audio.played.borrow(),
            vec![Cue::Alert5, Cue::Alert3, Cue::Alert1, Cue::AlertFinal]
        );

        h.clock.advance(60 * SEC);
        assert_eq!(h.driver.snapshot().remaining_seconds, 0);
        assert!(!h.driver.snapshot().alert_visible);
    }

    #[test]
    fn mute_affects_only_later_checkpoints() {
        let h = harness(480);
        h.driver.start();
        h.clock.advance(180 * SEC);
        assert!(h.driver.snapshot().alert_visible);

        h.driver.toggle_mute();
        assert!(h.audio.muted.get());
        assert_eq!(*h.audio.played.borrow(), vec![Cue::Alert5]);

        h.clock.advance(120 * SEC);
        let snap = h.driver.snapshot();
        assert_eq!(snap.alert_text, "3 MINUTES REMAINING");
        assert!(snap.muted);
        assert_eq!(*h.audio.played.borrow(), vec![Cue::Alert5]);
    }

    #[test]
    fn reset_cancels_both_timers() {
        let h = harness(301);
        h.driver.start();
        h.clock.advance(SEC);
        assert!(h.driver.snapshot().alert_visible);
        assert_eq!(h.clock.pending_timeouts(), 1);

        h.driver.reset();
        assert_eq!(h.clock.active_intervals(), 0);
        assert_eq!(h.clock.pending_timeouts(), 0);
        let snap = h.driver.snapshot();
        assert_eq!(snap.remaining_seconds, 301);
        assert!(!snap.alert_visible);
        assert_eq!(snap.phase, Phase::Idle);
    }

    #[test]
    fn teardown_makes_callbacks_inert() {
        let h = harness(301);
        h.driver.start();
        h.clock.advance(SEC);
        h.driver.teardown();
        assert_eq!(h.clock.active_intervals(), 0);
        assert_eq!(h.clock.pending_timeouts(), 0);

        let before = h.driver.snapshot();
        h.clock.advance(10 * SEC);
        h.driver.start();
        assert_eq!(h.driver.snapshot(), before);
    }

    #[test]
    fn teardown_during_dispatch_leaves_timers_to_the_owner() {
        let clock = ManualClock::default();
        let slot: Rc<RefCell<Option<Rc<Driver<ManualClock>>>>> = Rc::new(RefCell::new(None));
        let driver = {
            let slot = slot.clone();
            Rc::new(Driver::new(
                &TimerConfig::new(10).unwrap(),
                clock.clone(),
                RecordingAudio::default(),
                move |_| {
                    if let Some(driver) = slot.borrow().as_ref() {
                        driver.teardown();
                    }
                },
            ))
        };
        *slot.borrow_mut() = Some(driver.clone());

        // Holding the state borrow makes teardown a logged no-op.
        {
            let _state = driver.runtime.state.borrow();
            driver.teardown();
        }
        assert!(!driver.runtime.state.borrow().disposed);

        // The listener runs after the borrow is released, so teardown succeeds there.
        driver.start();
        assert_eq!(clock.active_intervals(), 0);
        assert!(driver.runtime.state.borrow().disposed);
        slot.borrow_mut().take();
    }

    #[test]
    fn dropping_driver_cancels_timers() {
        let h = harness(480);
        h.driver.start();
        h.clock.advance(SEC);
        let Harness { clock, driver, .. } = h;
        drop(driver);
        assert_eq!(clock.active_intervals(), 0);
        clock.advance(10 * SEC);
    }

    #[test]
    fn audio_failure_does_not_stop_countdown() {
        let h = harness(301);
        h.audio.fail.set(true);
        h.driver.start();
        h.clock.advance(3 * SEC);
        let snap = h.driver.snapshot();
        assert_eq!(snap.remaining_seconds, 298);
        assert!(snap.alert_visible);
        assert!(h.audio.played.borrow().is_empty());
    }

    #[test]
    fn listener_sees_every_change() {
        let h = harness(480);
        h.driver.start();
        h.clock.advance(2 * SEC);
        h.driver.toggle_mute();
        assert_eq!(h.notified.get(), 4);
    }

    #[test]
    fn listener_may_read_driver() {
        let clock = ManualClock::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let slot: Rc<RefCell<Option<Rc<Driver<ManualClock>>>>> = Rc::new(RefCell::new(None));
        let driver = {
            let seen = seen.clone();
            let slot = slot.clone();
            Rc::new(Driver::new(
                &TimerConfig::new(10).unwrap(),
                clock.clone(),
                RecordingAudio::default(),
                move |_| {
                    if let Some(driver) = slot.borrow().as_ref() {
                        seen.borrow_mut().push(driver.snapshot().display_text);
                    }
                },
            ))
        };
        *slot.borrow_mut() = Some(driver.clone());
        driver.start();
        clock.advance(SEC);
        assert_eq!(*seen.borrow(), vec!["00:10".to_string(), "00:09".to_string()]);
        slot.borrow_mut().take();
    }
}
