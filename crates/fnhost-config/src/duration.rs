//! Duration strings in the host's `[d.]hh:mm:ss[.fffffff]` format.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Grammar description used in error messages.
pub const DURATION_GRAMMAR: &str = "duration in [d.]hh:mm:ss[.fffffff] format";

static DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+)\.)?(\d{1,2}):(\d{1,2}):(\d{1,2})(?:\.(\d{1,7}))?$")
        .expect("duration pattern is a valid regex")
});

/// Why a duration string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// The text does not have the `h:m:s` shape.
    #[error("'{0}' does not match {DURATION_GRAMMAR}")]
    Malformed(String),
    /// A component is outside its range (hours 0-23, minutes and seconds 0-59).
    #[error("'{text}' has {component} {value} outside 0-{max}")]
    ComponentOutOfRange {
        text: String,
        component: &'static str,
        value: u64,
        max: u64,
    },
}

/// A parsed duration that remembers the text it was written as, so that
/// normalized documents reproduce their input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostDuration {
    text: String,
    value: Duration,
}

impl HostDuration {
    /// Parse a duration string.
    ///
    /// # Errors
    ///
    /// Returns [`DurationError`] when the text is not in the
    /// `[d.]hh:mm:ss[.fffffff]` format or a component is out of range.
    pub fn parse(text: &str) -> Result<Self, DurationError> {
        let captures = DURATION_REGEX
            .captures(text)
            .ok_or_else(|| DurationError::Malformed(text.to_string()))?;

        let number = |index: usize| -> Result<u64, DurationError> {
            captures.get(index).map_or(Ok(0), |m| {
                m.as_str()
                    .parse::<u64>()
                    .map_err(|_| DurationError::Malformed(text.to_string()))
            })
        };

        let days = number(1)?;
        let hours = number(2)?;
        let minutes = number(3)?;
        let seconds = number(4)?;

        for (component, value, max) in [("hours", hours, 23), ("minutes", minutes, 59), ("seconds", seconds, 59)] {
            if value > max {
                return Err(DurationError::ComponentOutOfRange {
                    text: text.to_string(),
                    component,
                    value,
                    max,
                });
            }
        }

        // Up to seven fractional digits, i.e. 100ns ticks.
        let nanos = captures.get(5).map_or(Ok(0), |m| {
            let digits = m.as_str();
            let padded = format!("{digits:0<9}");
            padded
                .parse::<u32>()
                .map_err(|_| DurationError::Malformed(text.to_string()))
        })?;

        let whole = days
            .checked_mul(86_400)
            .and_then(|d| d.checked_add(hours * 3_600 + minutes * 60 + seconds))
            .ok_or_else(|| DurationError::Malformed(text.to_string()))?;

        Ok(Self {
            text: text.to_string(),
            value: Duration::new(whole, nanos),
        })
    }

    /// The duration as a standard library value.
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        self.value
    }

    /// The text the duration was written as.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for HostDuration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HostDuration {
    type Error = DurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HostDuration> for String {
    fn from(value: HostDuration) -> Self {
        value.text
    }
}

impl From<HostDuration> for Duration {
    fn from(value: HostDuration) -> Self {
        value.value
    }
}

impl fmt::Display for HostDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
