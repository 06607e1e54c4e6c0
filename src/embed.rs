//! JavaScript-facing countdown for pages that do not use the Yew app.
//!
//! ```js
//! const timer = new WebCountdown(480, (snapshot) => render(snapshot));
//! timer.start();
//! // later
//! timer.dispose();
//! ```

use crate::audio::WebAudio;
use crate::driver::{Driver, GlooBackend};
use crate::{Snapshot, TimerConfig};
use log::warn;
use wasm_bindgen::prelude::*;

fn snapshot_to_js(snapshot: &Snapshot) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(snapshot)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize snapshot: {}", e)))
}

/// Countdown driven by browser timers and `HtmlAudioElement` cues.
///
/// `on_change` is called with a snapshot object after every change:
/// `{ displayText, remainingSeconds, phase, alertVisible, alertText, highlighted, muted }`.
#[wasm_bindgen]
pub struct WebCountdown {
    driver: Driver<GlooBackend>,
}

#[wasm_bindgen]
impl WebCountdown {
    #[wasm_bindgen(constructor)]
    pub fn new(
        duration_secs: u32,
        on_change: Option<js_sys::Function>,
    ) -> Result<WebCountdown, JsValue> {
        let config =
            TimerConfig::new(duration_secs).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let driver = Driver::new(&config, GlooBackend, WebAudio::new(false), move |snapshot| {
            let Some(callback) = &on_change else { return };
            let result = snapshot_to_js(snapshot)
                .and_then(|value| callback.call1(&JsValue::NULL, &value));
            if let Err(e) = result {
                warn!("Countdown change callback failed: {:?}", e);
            }
        });
        Ok(WebCountdown { driver })
    }

    pub fn start(&self) {
        self.driver.start();
    }

    pub fn pause(&self) {
        self.driver.pause();
    }

    pub fn reset(&self) {
        self.driver.reset();
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) {
        self.driver.toggle_mute();
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        snapshot_to_js(&self.driver.snapshot())
    }

    /// Cancel all timers. The instance ignores further calls.
    pub fn dispose(&self) {
        self.driver.teardown();
    }
}
