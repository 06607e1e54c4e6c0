//! Remaining-time checkpoints and the audio cues they map to.

use crate::config::{ASSET_ALERT_1, ASSET_ALERT_3, ASSET_ALERT_5, ASSET_ALERT_FINAL};
use serde::Serialize;
use std::fmt;

/// Named audio asset played when a checkpoint fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cue {
    Alert5,
    Alert3,
    Alert1,
    AlertFinal,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Alert5, Cue::Alert3, Cue::Alert1, Cue::AlertFinal];

    pub fn name(self) -> &'static str {
        match self {
            Cue::Alert5 => "alert-5",
            Cue::Alert3 => "alert-3",
            Cue::Alert1 => "alert-1",
            Cue::AlertFinal => "alert-final",
        }
    }

    /// Path of the sound file served next to the wasm bundle.
    pub fn asset_path(self) -> &'static str {
        match self {
            Cue::Alert5 => ASSET_ALERT_5,
            Cue::Alert3 => ASSET_ALERT_3,
            Cue::Alert1 => ASSET_ALERT_1,
            Cue::AlertFinal => ASSET_ALERT_FINAL,
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Checkpoint {
    FiveMinutes,
    ThreeMinutes,
    OneMinute,
    TimesUp,
}

impl Checkpoint {
    /// Ordered from the earliest to the most urgent.
    pub const ALL: [Checkpoint; 4] = [
        Checkpoint::FiveMinutes,
        Checkpoint::ThreeMinutes,
        Checkpoint::OneMinute,
        Checkpoint::TimesUp,
    ];

    /// Remaining seconds at which the checkpoint is reached.
    pub fn threshold(self) -> u32 {
        match self {
            Checkpoint::FiveMinutes => 300,
            Checkpoint::ThreeMinutes => 180,
            Checkpoint::OneMinute => 60,
            Checkpoint::TimesUp => 0,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Checkpoint::FiveMinutes => "5 MINUTES REMAINING",
            Checkpoint::ThreeMinutes => "3 MINUTES REMAINING",
            Checkpoint::OneMinute => "1 MINUTE REMAINING",
            Checkpoint::TimesUp => "TIME'S UP!",
        }
    }

    pub fn cue(self) -> Cue {
        match self {
            Checkpoint::FiveMinutes => Cue::Alert5,
            Checkpoint::ThreeMinutes => Cue::Alert3,
            Checkpoint::OneMinute => Cue::Alert1,
            Checkpoint::TimesUp => Cue::AlertFinal,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Checkpoint::FiveMinutes => 1,
            Checkpoint::ThreeMinutes => 1 << 1,
            Checkpoint::OneMinute => 1 << 2,
            Checkpoint::TimesUp => 1 << 3,
        }
    }
}

/// Checkpoints already raised during the current countdown run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FiredSet(u8);

impl FiredSet {
    pub fn contains(self, checkpoint: Checkpoint) -> bool {
        self.0 & checkpoint.bit() != 0
    }

    pub fn insert(&mut self, checkpoint: Checkpoint) {
        self.0 |= checkpoint.bit();
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// Find the checkpoint crossed when remaining time moves from `prev` to `next`.
///
/// A threshold counts as crossed when `prev > threshold >= next`, so a step
/// larger than one second cannot skip an alert. `next` may be negative when
/// the step overshoots zero. When several thresholds are crossed at once only
/// the most urgent one is returned; the others are marked as fired too so they
/// are not raised later in the same run.
pub fn detect(prev: u32, next: i64, fired: &mut FiredSet) -> Option<Checkpoint> {
    let mut hit = None;
    for checkpoint in Checkpoint::ALL {
        let threshold = i64::from(checkpoint.threshold());
        if i64::from(prev) > threshold && next <= threshold && !fired.contains(checkpoint) {
            fired.insert(checkpoint);
            hit = Some(checkpoint);
        }
    }
    hit
}
