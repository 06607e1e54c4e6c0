//! Checkpoint countdown: a one-second countdown that raises timed alerts at
//! five, three and one minute remaining and when time runs out.
//!
//! [`Countdown`] is the pure state machine. It never touches timers or audio
//! itself; every transition returns the [`Command`]s a [`driver::Driver`]
//! must carry out, which keeps the core testable off the browser.

use log::{debug, info};
use serde::Serialize;

pub mod audio;
pub mod checkpoint;
pub mod config;
pub mod driver;
pub mod embed;
pub mod utils;

pub use checkpoint::{Checkpoint, Cue};
pub use config::{ConfigError, TimerConfig};

use checkpoint::FiredSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

/// User or timer event fed into the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Pause,
    Reset,
    ToggleMute,
    Tick,
    DismissAlert,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartTicking,
    StopTicking,
    ScheduleDismissal,
    CancelDismissal,
    Play(Cue),
    SetMuted(bool),
    PrimeAudio,
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub display_text: String,
    pub remaining_seconds: u32,
    pub phase: Phase,
    pub alert_visible: bool,
    pub alert_text: String,
    pub highlighted: bool,
    pub muted: bool,
}

/// Format whole seconds as `MM:SS`.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    initial_duration: u32,
    remaining: u32,
    phase: Phase,
    alert: Option<Checkpoint>,
    muted: bool,
    fired: FiredSet,
    primed: bool,
}

impl Countdown {
    pub fn new(config: &TimerConfig) -> Self {
        Self {
            initial_duration: config.initial_duration(),
            remaining: config.initial_duration(),
            phase: Phase::Idle,
            alert: None,
            muted: false,
            fired: FiredSet::default(),
            primed: false,
        }
    }

    pub fn initial_duration(&self) -> u32 {
        self.initial_duration
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn alert(&self) -> Option<Checkpoint> {
        self.alert
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn apply(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::Start => self.start(),
            Action::Pause => self.pause(),
            Action::Reset => self.reset(),
            Action::ToggleMute => self.toggle_mute(),
            Action::Tick => self.tick(),
            Action::DismissAlert => self.dismiss_alert(),
        }
    }

    /// Idle or Paused to Running. No-op while running or once time is up.
    pub fn start(&mut self) -> Vec<Command> {
        if self.phase == Phase::Running || self.remaining == 0 {
            return Vec::new();
        }
        debug!("{:?} -> Running at {}", self.phase, format_time(self.remaining));
        self.phase = Phase::Running;

        let mut commands = Vec::with_capacity(2);
        if !self.primed {
            self.primed = true;
            commands.push(Command::PrimeAudio);
        }
        commands.push(Command::StartTicking);
        commands
    }

    /// Running to Paused. Remaining time and the alert are left alone.
    pub fn pause(&mut self) -> Vec<Command> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        debug!("Running -> Paused at {}", format_time(self.remaining));
        self.phase = Phase::Paused;
        vec![Command::StopTicking]
    }

    /// Any phase to Idle with the full duration restored.
    pub fn reset(&mut self) -> Vec<Command> {
        debug!("{:?} -> Idle (reset)", self.phase);
        self.phase = Phase::Idle;
        self.remaining = self.initial_duration;
        self.alert = None;
        self.fired.clear();
        vec![Command::StopTicking, Command::CancelDismissal]
    }

    pub fn toggle_mute(&mut self) -> Vec<Command> {
        self.muted = !self.muted;
        debug!("Muted: {}", self.muted);
        vec![Command::SetMuted(self.muted)]
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> Vec<Command> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        let prev = self.remaining;
        let next = i64::from(prev) - 1;
        self.remaining = next.max(0) as u32;

        let mut commands = Vec::new();
        if next <= 0 {
            self.phase = Phase::Idle;
            commands.push(Command::StopTicking);
        }
        if let Some(checkpoint) = checkpoint::detect(prev, next, &mut self.fired) {
            self.raise(checkpoint, &mut commands);
        }
        commands
    }

    /// Clear the visible alert once its display window has elapsed.
    pub fn dismiss_alert(&mut self) -> Vec<Command> {
        if let Some(checkpoint) = self.alert.take() {
            debug!("Dismissed alert {:?}", checkpoint);
        }
        Vec::new()
    }

    fn raise(&mut self, checkpoint: Checkpoint, commands: &mut Vec<Command>) {
        info!(
            "Checkpoint {:?} reached with {} remaining",
            checkpoint,
            format_time(self.remaining)
        );
        commands.push(Command::CancelDismissal);
        self.alert = Some(checkpoint);
        if !self.muted {
            commands.push(Command::Play(checkpoint.cue()));
        }
        commands.push(Command::ScheduleDismissal);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            display_text: format_time(self.remaining),
            remaining_seconds: self.remaining,
            phase: self.phase,
            alert_visible: self.alert.is_some(),
            alert_text: self
                .alert
                .map(|c| c.message().to_string())
                .unwrap_or_default(),
            highlighted: self.alert.is_some(),
            muted: self.muted,
        }
    }
}
