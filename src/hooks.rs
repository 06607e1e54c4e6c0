use checkpoint_timer::audio::WebAudio;
use checkpoint_timer::driver::{Driver, GlooBackend};
use checkpoint_timer::{Action, Countdown, Snapshot, TimerConfig};
use yew::prelude::*;

/// Holds the current snapshot and the callbacks for the four controls.
#[derive(Clone)]
pub struct CountdownHandle {
    /// State to render, refreshed after every tick, action and dismissal.
    pub snapshot: Snapshot,
    pub on_start: Callback<()>,
    pub on_pause: Callback<()>,
    pub on_reset: Callback<()>,
    pub on_toggle_mute: Callback<()>,
}

/// Custom hook owning a countdown driver for the lifetime of the component.
///
/// The driver's timers are torn down when the component unmounts, so no
/// callback can touch the disposed component.
#[hook]
pub fn use_countdown(config: TimerConfig) -> CountdownHandle {
    let snapshot = use_state(|| Countdown::new(&config).snapshot());

    let driver = {
        let setter = snapshot.setter();
        use_memo(config, move |config| {
            Driver::new(config, GlooBackend, WebAudio::new(false), move |s: &Snapshot| {
                setter.set(s.clone())
            })
        })
    };

    // Cancel every pending timer on unmount.
    {
        let driver = driver.clone();
        use_effect_with(config, move |_| move || driver.teardown());
    }

    let action_callback = |action: Action| {
        let driver = driver.clone();
        Callback::from(move |_: ()| driver.dispatch(action))
    };

    CountdownHandle {
        snapshot: (*snapshot).clone(),
        on_start: action_callback(Action::Start),
        on_pause: action_callback(Action::Pause),
        on_reset: action_callback(Action::Reset),
        on_toggle_mute: action_callback(Action::ToggleMute),
    }
}
