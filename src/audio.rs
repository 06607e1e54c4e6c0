//! Audio capability used by the countdown driver.
//!
//! The driver only knows how to ask for a named [`Cue`]; loading, decoding
//! and playback belong to the [`AudioSink`] implementation. [`WebAudio`] backs
//! it with one `HtmlAudioElement` per cue.

use crate::checkpoint::Cue;
use log::{debug, warn};
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No playable resource exists for the cue.
    NotLoaded(Cue),
    /// The platform refused to start playback.
    Rejected { cue: Cue, reason: String },
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NotLoaded(cue) => write!(f, "audio cue {} is not loaded", cue),
            AudioError::Rejected { cue, reason } => {
                write!(f, "audio cue {} was rejected: {}", cue, reason)
            }
        }
    }
}

impl std::error::Error for AudioError {}

pub trait AudioSink {
    /// Start playing `cue`. Failures are reported, never fatal to the caller.
    fn play(&self, cue: Cue) -> Result<(), AudioError>;

    /// Apply the mute flag to every resource.
    fn set_muted(&self, muted: bool);

    /// Warm up resources so the first playback is not delayed by loading.
    fn prime(&self);
}

impl<A: AudioSink + ?Sized> AudioSink for Rc<A> {
    fn play(&self, cue: Cue) -> Result<(), AudioError> {
        (**self).play(cue)
    }

    fn set_muted(&self, muted: bool) {
        (**self).set_muted(muted)
    }

    fn prime(&self) {
        (**self).prime()
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// `HtmlAudioElement`-backed cues.
pub struct WebAudio {
    elements: Vec<(Cue, HtmlAudioElement)>,
}

impl WebAudio {
    /// Create one audio element per cue. A cue whose element cannot be
    /// created is left out and reports [`AudioError::NotLoaded`] on play.
    pub fn new(muted: bool) -> Self {
        let elements = Cue::ALL
            .iter()
            .filter_map(|&cue| match HtmlAudioElement::new_with_src(cue.asset_path()) {
                Ok(element) => {
                    element.set_muted(muted);
                    Some((cue, element))
                }
                Err(e) => {
                    warn!("Could not create audio element for {}: {}", cue, describe(&e));
                    None
                }
            })
            .collect();
        Self { elements }
    }

    fn element(&self, cue: Cue) -> Option<&HtmlAudioElement> {
        self.elements
            .iter()
            .find(|(c, _)| *c == cue)
            .map(|(_, element)| element)
    }
}

impl AudioSink for WebAudio {
    fn play(&self, cue: Cue) -> Result<(), AudioError> {
        let element = self.element(cue).ok_or(AudioError::NotLoaded(cue))?;
        element.set_current_time(0.0);
        let promise = element.play().map_err(|e| AudioError::Rejected {
            cue,
            reason: describe(&e),
        })?;

        // Autoplay policies reject asynchronously; report without blocking the tick.
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                let err = AudioError::Rejected {
                    cue,
                    reason: describe(&e),
                };
                warn!("Audio playback failed: {}", err);
            }
        });
        Ok(())
    }

    fn set_muted(&self, muted: bool) {
        for (_, element) in &self.elements {
            element.set_muted(muted);
        }
    }

    fn prime(&self) {
        debug!("Priming {} audio cues", self.elements.len());
        for (_, element) in &self.elements {
            element.set_preload("auto");
            element.load();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Records every request; optionally fails playback.
    #[derive(Default)]
    pub struct RecordingAudio {
        pub played: RefCell<Vec<Cue>>,
        pub muted: Cell<bool>,
        pub primed: Cell<usize>,
        pub fail: Cell<bool>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&self, cue: Cue) -> Result<(), AudioError> {
            if self.fail.get() {
                return Err(AudioError::Rejected {
                    cue,
                    reason: "NotAllowedError".to_string(),
                });
            }
            self.played.borrow_mut().push(cue);
            Ok(())
        }

        fn set_muted(&self, muted: bool) {
            self.muted.set(muted);
        }

        fn prime(&self) {
            self.primed.set(self.primed.get() + 1);
        }
    }
}
