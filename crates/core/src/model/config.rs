use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("unsupported time limit: {raw} (expected one of 5, 10, 15, 60 minutes)")]
    UnsupportedTimeLimit { raw: String },
}

//
// ─── TIME LIMIT ────────────────────────────────────────────────────────────────
//

/// Countdown length offered to the user before a quiz starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TimeLimit {
    #[default]
    FiveMinutes,
    TenMinutes,
    FifteenMinutes,
    OneHour,
}

impl TimeLimit {
    pub const ALL: [TimeLimit; 4] = [
        TimeLimit::FiveMinutes,
        TimeLimit::TenMinutes,
        TimeLimit::FifteenMinutes,
        TimeLimit::OneHour,
    ];

    #[must_use]
    pub fn minutes(self) -> u32 {
        match self {
            TimeLimit::FiveMinutes => 5,
            TimeLimit::TenMinutes => 10,
            TimeLimit::FifteenMinutes => 15,
            TimeLimit::OneHour => 60,
        }
    }

    /// Length of the countdown in seconds.
    #[must_use]
    pub fn seconds(self) -> u32 {
        self.minutes() * 60
    }
}

impl TryFrom<u32> for TimeLimit {
    type Error = ConfigError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|limit| limit.minutes() == minutes)
            .ok_or(ConfigError::UnsupportedTimeLimit {
                raw: minutes.to_string(),
            })
    }
}

impl From<TimeLimit> for u32 {
    fn from(limit: TimeLimit) -> Self {
        limit.minutes()
    }
}

impl FromStr for TimeLimit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let minutes: u32 = s
            .trim()
            .parse()
            .map_err(|_| ConfigError::UnsupportedTimeLimit { raw: s.to_string() })?;
        Self::try_from(minutes)
    }
}

impl fmt::Display for TimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.minutes())
    }
}

//
// ─── CONFIGURATION ─────────────────────────────────────────────────────────────
//

/// Settings chosen by the host before a quiz starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfiguration {
    time_limit: TimeLimit,
    randomize: bool,
}

impl QuizConfiguration {
    #[must_use]
    pub fn new(time_limit: TimeLimit, randomize: bool) -> Self {
        Self {
            time_limit,
            randomize,
        }
    }

    /// Builds a configuration from a raw minute count.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedTimeLimit` unless `minutes` is 5, 10, 15 or 60.
    pub fn from_minutes(minutes: u32, randomize: bool) -> Result<Self, ConfigError> {
        Ok(Self::new(TimeLimit::try_from(minutes)?, randomize))
    }

    #[must_use]
    pub fn time_limit(&self) -> TimeLimit {
        self.time_limit
    }

    #[must_use]
    pub fn time_limit_minutes(&self) -> u32 {
        self.time_limit.minutes()
    }

    #[must_use]
    pub fn randomize(&self) -> bool {
        self.randomize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_supported_minutes() {
        for minutes in [5, 10, 15, 60] {
            let limit = TimeLimit::try_from(minutes).unwrap();
            assert_eq!(limit.minutes(), minutes);
            assert_eq!(limit.seconds(), minutes * 60);
        }
        for minutes in [0, 1, 20, 30, 61] {
            assert!(TimeLimit::try_from(minutes).is_err());
        }
    }

    #[test]
    fn parses_from_str() {
        assert_eq!(" 15 ".parse::<TimeLimit>().unwrap(), TimeLimit::FifteenMinutes);
        let err = "ten".parse::<TimeLimit>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedTimeLimit {
                raw: "ten".to_string()
            }
        );
    }

    #[test]
    fn configuration_defaults_to_five_minutes_in_order() {
        let config = QuizConfiguration::default();
        assert_eq!(config.time_limit_minutes(), 5);
        assert!(!config.randomize());

        let config = QuizConfiguration::from_minutes(60, true).unwrap();
        assert_eq!(config.time_limit(), TimeLimit::OneHour);
        assert!(config.randomize());
    }
}
