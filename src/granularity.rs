//! Aggregation granularities and quarter identifiers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Which aggregate file a record came from, and which one a query targets.
///
/// The discriminants are the numeric selectors accepted from users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Month = 0,
    Day = 1,
    Hour = 2,
}

impl Granularity {
    /// Every granularity, in load order.
    pub const ALL: [Granularity; 3] = [Granularity::Month, Granularity::Day, Granularity::Hour];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Granularity::Month => "month",
            Granularity::Day => "day",
            Granularity::Hour => "hour",
        }
    }
}

impl TryFrom<u8> for Granularity {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Granularity::Month),
            1 => Ok(Granularity::Day),
            2 => Ok(Granularity::Hour),
            other => Err(format!(
                "invalid granularity {other}: expected 0 (month), 1 (day) or 2 (hour)"
            )),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "month" | "monthly" => Ok(Granularity::Month),
            "1" | "day" | "daily" | "week" | "weekly" => Ok(Granularity::Day),
            "2" | "hour" | "hourly" => Ok(Granularity::Hour),
            other => Err(format!(
                "invalid granularity {other:?}: expected 0|month, 1|day or 2|hour"
            )),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the four quarters a set of source files is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Quarter(u8);

impl Quarter {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Quarter {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=4).contains(&value) {
            Ok(Quarter(value))
        } else {
            Err(format!("invalid quarter {value}: expected 1 to 4"))
        }
    }
}

impl FromStr for Quarter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid quarter {s:?}: expected 1 to 4"))?;
        Quarter::try_from(value)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
