use once_cell::sync::Lazy;
use regex::Regex;

// Compiled regexes for duration parsing
static DURATION_MIN_SEC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)m\s*(\d+)s$").unwrap());
static DURATION_MIN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)m$").unwrap());
static DURATION_COLON_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):(\d+)$").unwrap());
static DURATION_SEC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)s$").unwrap());

/// Duration parsing error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    EmptyInput,
    InvalidFormat(String),
    InvalidMinutes,
    InvalidSeconds(u32),
}

impl std::fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationParseError::EmptyInput => write!(f, "Duration cannot be empty"),
            DurationParseError::InvalidFormat(hint) => {
                write!(f, "Invalid duration format. {}", hint)
            }
            DurationParseError::InvalidMinutes => write!(f, "Invalid minutes value"),
            DurationParseError::InvalidSeconds(s) => {
                write!(f, "Invalid seconds: {} (must be 0-59)", s)
            }
        }
    }
}

impl std::error::Error for DurationParseError {}

fn minutes_and_seconds(minutes: &str, seconds: &str) -> Result<u32, DurationParseError> {
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| DurationParseError::InvalidMinutes)?;
    let seconds: u32 = seconds
        .parse()
        .map_err(|_| DurationParseError::InvalidSeconds(0))?;
    if seconds > 59 {
        return Err(DurationParseError::InvalidSeconds(seconds));
    }
    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or(DurationParseError::InvalidMinutes)
}

/// Parse a countdown duration into whole seconds.
///
/// Supported formats:
/// - Pure number: "480" (interpreted as seconds)
/// - Seconds only: "480s"
/// - Colon format: "8:00" (minutes:seconds)
/// - Minutes and seconds: "8m 0s" or "8m0s"
/// - Minutes only: "8m"
///
/// # Examples
/// ```
/// use checkpoint_timer::utils::parse_duration_secs;
///
/// assert_eq!(parse_duration_secs("8:00"), Ok(480));
/// assert_eq!(parse_duration_secs("5m1s"), Ok(301));
/// assert_eq!(parse_duration_secs("90s"), Ok(90));
/// assert_eq!(parse_duration_secs("480"), Ok(480));
/// ```
pub fn parse_duration_secs(input: &str) -> Result<u32, DurationParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::EmptyInput);
    }

    // Try parsing as pure number (assume seconds)
    if let Ok(secs) = trimmed.parse::<u32>() {
        return Ok(secs);
    }

    if let Some(captures) = DURATION_COLON_REGEX.captures(trimmed) {
        return minutes_and_seconds(&captures[1], &captures[2]);
    }

    if let Some(captures) = DURATION_MIN_SEC_REGEX.captures(trimmed) {
        return minutes_and_seconds(&captures[1], &captures[2]);
    }

    if let Some(captures) = DURATION_MIN_REGEX.captures(trimmed) {
        return minutes_and_seconds(&captures[1], "0");
    }

    if let Some(captures) = DURATION_SEC_REGEX.captures(trimmed) {
        return captures[1]
            .parse()
            .map_err(|_| DurationParseError::InvalidSeconds(0));
    }

    Err(DurationParseError::InvalidFormat(
        "Use: 8:00, 8m0s, 8m, 480s, or 480".to_string(),
    ))
}
