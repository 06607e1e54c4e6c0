//! Pure Yew view components for the countdown page.
//!
//! These components render from props only; all state lives in the
//! countdown hook.

use checkpoint_timer::Phase;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CountdownDisplayProps {
    pub display_text: AttrValue,
}

#[function_component(CountdownDisplay)]
pub fn countdown_display(props: &CountdownDisplayProps) -> Html {
    html! {
        <h2 class="countdown-display" role="timer" aria-live="off">
            { props.display_text.clone() }
        </h2>
    }
}

/// Start / pause / resume / reset buttons.
///
/// Only the control valid for the current phase is offered: Start while
/// idle, Pause while running, Resume while paused. Reset is always shown.
#[derive(Properties, PartialEq)]
pub struct ControlsProps {
    pub phase: Phase,
    pub on_start: Callback<()>,
    pub on_pause: Callback<()>,
    pub on_reset: Callback<()>,
}

#[function_component(Controls)]
pub fn controls(props: &ControlsProps) -> Html {
    let primary = match props.phase {
        Phase::Idle => html! {
            <button class="control start" aria-label="Start"
                onclick={props.on_start.reform(|_: MouseEvent| ())}>
                { "Start" }
            </button>
        },
        Phase::Running => html! {
            <button class="control pause" aria-label="Pause"
                onclick={props.on_pause.reform(|_: MouseEvent| ())}>
                { "Pause" }
            </button>
        },
        Phase::Paused => html! {
            <button class="control resume" aria-label="Resume"
                onclick={props.on_start.reform(|_: MouseEvent| ())}>
                { "Resume" }
            </button>
        },
    };

    html! {
        <div class="controls">
            { primary }
            <button class="control reset" aria-label="Reset"
                onclick={props.on_reset.reform(|_: MouseEvent| ())}>
                { "Reset" }
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AlertMessageProps {
    pub text: AttrValue,
}

/// Full-screen checkpoint message.
#[function_component(AlertMessage)]
pub fn alert_message(props: &AlertMessageProps) -> Html {
    html! {
        <div class="alert-message" role="alert">
            { props.text.clone() }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct MuteToggleProps {
    pub muted: bool,
    pub on_toggle: Callback<()>,
}

#[function_component(MuteToggle)]
pub fn mute_toggle(props: &MuteToggleProps) -> Html {
    let (class, label) = if props.muted {
        ("mute-toggle muted", "Unmute alerts")
    } else {
        ("mute-toggle", "Mute alerts")
    };
    html! {
        <button class={class} aria-label={label} aria-pressed={props.muted.to_string()}
            onclick={props.on_toggle.reform(|_: MouseEvent| ())}>
            { if props.muted { "Sound off" } else { "Sound on" } }
        </button>
    }
}
