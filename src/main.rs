//! Main module for the checkpoint countdown application using Yew.
//! Resolves the startup configuration and wires the countdown hook into the view.

use checkpoint_timer::{format_time, TimerConfig};
use log::{error, info};
use yew::prelude::*;

mod components;
mod hooks;

use components::{AlertMessage, Controls, CountdownDisplay, MuteToggle};
use hooks::use_countdown;

#[derive(Properties, PartialEq)]
struct CountdownViewProps {
    config: TimerConfig,
}

/// Countdown page: the clock and controls, or the alert while one is shown.
#[function_component(CountdownView)]
fn countdown_view(props: &CountdownViewProps) -> Html {
    let countdown = use_countdown(props.config);
    let snapshot = &countdown.snapshot;

    let page_class = classes!("timer-page", snapshot.highlighted.then_some("highlighted"));

    html! {
        <div class={page_class}>
            // The mute toggle is hidden while an alert covers the page.
            if !snapshot.alert_visible {
                <MuteToggle muted={snapshot.muted} on_toggle={countdown.on_toggle_mute.clone()} />
            }

            if snapshot.alert_visible {
                <AlertMessage text={snapshot.alert_text.clone()} />
            } else {
                <div class="timer-container">
                    <CountdownDisplay display_text={snapshot.display_text.clone()} />
                    <Controls
                        phase={snapshot.phase}
                        on_start={countdown.on_start.clone()}
                        on_pause={countdown.on_pause.clone()}
                        on_reset={countdown.on_reset.clone()}
                    />
                </div>
            }
        </div>
    }
}

/// App wrapper resolving the configuration from the page location.
#[function_component]
pub fn App() -> Html {
    let config = use_memo((), |_| match TimerConfig::from_location() {
        Ok(config) => {
            info!(
                "Countdown configured for {}",
                format_time(config.initial_duration())
            );
            Ok(config)
        }
        Err(e) => {
            error!("Rejected startup configuration: {}", e);
            Err(e)
        }
    });

    match &*config {
        Ok(config) => html! { <CountdownView config={*config} /> },
        Err(e) => html! {
            <div class="config-error">
                <p>{ e.to_string() }</p>
            </div>
        },
    }
}

/// Entry point: installs the panic hook and console logger, then renders the App.
fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
