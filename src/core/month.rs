use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::AppError;

/// The twelve fixed reporting periods, in calendar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// All months in calendar order. Each call yields a fresh iterator.
    pub fn all() -> impl Iterator<Item = Month> + Clone {
        Self::ALL.into_iter()
    }

    /// Wire and storage token, e.g. `"MARCH"`
    pub fn as_str(&self) -> &'static str {
        match self {
            Month::January => "JANUARY",
            Month::February => "FEBRUARY",
            Month::March => "MARCH",
            Month::April => "APRIL",
            Month::May => "MAY",
            Month::June => "JUNE",
            Month::July => "JULY",
            Month::August => "AUGUST",
            Month::September => "SEPTEMBER",
            Month::October => "OCTOBER",
            Month::November => "NOVEMBER",
            Month::December => "DECEMBER",
        }
    }
}

/// True iff `name` is exactly one of the twelve month tokens.
///
/// Matching is case-sensitive: `"MARCH"` is valid, `"March"` is not.
pub fn is_valid_month(name: &str) -> bool {
    Month::ALL.iter().any(|month| month.as_str() == name)
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Month {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::ALL
            .into_iter()
            .find(|month| month.as_str() == s)
            .ok_or_else(|| AppError::InvalidMonth(s.to_string()))
    }
}

impl TryFrom<&str> for Month {
    type Error = AppError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
