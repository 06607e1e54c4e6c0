//! Application-level configuration constants and startup configuration.

use crate::utils::{parse_duration_secs, DurationParseError};
use log::warn;
use std::fmt;
use web_sys::UrlSearchParams;

// Clock behaviour
pub const TICK_MS: u32 = 1_000;
pub const ALERT_DISMISS_MS: u32 = 5_000;

// Durations in seconds
pub const DEFAULT_DURATION_SECS: u32 = 8 * 60;
pub const TEST_DURATION_SECS: u32 = 5 * 60 + 1;
pub const MAX_DURATION_SECS: u32 = 99 * 60 + 59;

// Startup flags
pub const MODE_QUERY_KEY: &str = "mode";
pub const DURATION_QUERY_KEY: &str = "duration";
pub const TEST_MODE: &str = "test";

// Sound assets. The final alert reuses the one-minute sound.
pub const ASSET_ALERT_5: &str = "./assets/5_min_alert.mp3";
pub const ASSET_ALERT_3: &str = "./assets/3_min_alert.mp3";
pub const ASSET_ALERT_1: &str = "./assets/1_min_alert.mp3";
pub const ASSET_ALERT_FINAL: &str = "./assets/1_min_alert.mp3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NonPositiveDuration,
    TooLong(u32),
    InvalidDuration(DurationParseError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveDuration => {
                write!(f, "Countdown duration must be greater than zero")
            }
            ConfigError::TooLong(secs) => write!(
                f,
                "Countdown duration of {} seconds exceeds the maximum of {} seconds",
                secs, MAX_DURATION_SECS
            ),
            ConfigError::InvalidDuration(e) => write!(f, "Invalid countdown duration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidDuration(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DurationParseError> for ConfigError {
    fn from(e: DurationParseError) -> Self {
        ConfigError::InvalidDuration(e)
    }
}

/// Validated startup configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    initial_duration: u32,
}

impl TimerConfig {
    pub fn new(initial_duration: u32) -> Result<Self, ConfigError> {
        if initial_duration == 0 {
            return Err(ConfigError::NonPositiveDuration);
        }
        if initial_duration > MAX_DURATION_SECS {
            return Err(ConfigError::TooLong(initial_duration));
        }
        Ok(Self { initial_duration })
    }

    pub fn test_mode() -> Self {
        Self {
            initial_duration: TEST_DURATION_SECS,
        }
    }

    pub fn initial_duration(&self) -> u32 {
        self.initial_duration
    }

    /// Resolve the configuration from a route path and decoded query values.
    ///
    /// `duration` wins over everything else; otherwise a `/test` route or
    /// `mode=test` selects the short test countdown.
    pub fn from_route(
        pathname: &str,
        mode: Option<&str>,
        duration: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = duration {
            return Self::new(parse_duration_secs(raw)?);
        }

        let test_route = pathname
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .is_some_and(|segment| segment == TEST_MODE);
        if test_route || mode == Some(TEST_MODE) {
            Ok(Self::test_mode())
        } else {
            Ok(Self::default())
        }
    }

    /// Read the configuration from the current browser location.
    pub fn from_location() -> Result<Self, ConfigError> {
        let location = gloo_utils::window().location();
        let pathname = location.pathname().unwrap_or_default();
        let search = location.search().unwrap_or_default();
        let (mode, duration) = match UrlSearchParams::new_with_str(&search) {
            Ok(params) => (params.get(MODE_QUERY_KEY), params.get(DURATION_QUERY_KEY)),
            Err(e) => {
                warn!("Ignoring unreadable query string {:?}: {:?}", search, e);
                (None, None)
            }
        };
        Self::from_route(&pathname, mode.as_deref(), duration.as_deref())
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            initial_duration: DEFAULT_DURATION_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duration_of(pathname: &str, mode: Option<&str>, duration: Option<&str>) -> u32 {
        TimerConfig::from_route(pathname, mode, duration)
            .unwrap()
            .initial_duration()
    }

    #[test]
    fn default_is_eight_minutes() {
        assert_eq!(duration_of("/", None, None), 480);
    }

    #[test]
    fn test_route_and_flag_select_test_mode() {
        assert_eq!(duration_of("/test", None, None), 301);
        assert_eq!(duration_of("/app/test/", None, None), 301);
        assert_eq!(duration_of("/", Some("test"), None), 301);
        assert_eq!(duration_of("/testing", None, None), 480);
        assert_eq!(duration_of("/", Some("demo"), None), 480);
    }

    #[test]
    fn duration_override_wins() {
        assert_eq!(duration_of("/test", Some("test"), Some("90s")), 90);
        assert_eq!(duration_of("/", None, Some("2:30")), 150);
    }

    #[test]
    fn decoded_duration_with_space_is_accepted() {
        // A browser sends "8m 0s" as `8m%200s`; the query API hands it over decoded.
        assert_eq!(duration_of("/", None, Some("8m 0s")), 480);
        assert_eq!(duration_of("/", Some("test"), Some("5m 1s")), 301);
    }

    #[test]
    fn rejects_zero_and_overlong_durations() {
        assert_eq!(TimerConfig::new(0), Err(ConfigError::NonPositiveDuration));
        assert_eq!(
            TimerConfig::from_route("/", None, Some("0")),
            Err(ConfigError::NonPositiveDuration)
        );
        assert_eq!(TimerConfig::new(6000), Err(ConfigError::TooLong(6000)));
    }

    #[test]
    fn malformed_duration_is_a_config_error() {
        let err = TimerConfig::from_route("/", None, Some("soon")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration(_)));
        assert!(err.to_string().starts_with("Invalid countdown duration"));
    }
}
