//! Period registry.
//!
//! Every supported granularity is a row in [`PERIODS`]. Callers look periods
//! up by name or use the associated constants; they never build their own.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
pub const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;

/// Base unit a period is a multiple of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Millisecond,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    /// Length of one unit in milliseconds.
    pub const fn millis(self) -> i64 {
        match self {
            TimeUnit::Millisecond => 1,
            TimeUnit::Minute => MS_PER_MINUTE,
            TimeUnit::Hour => MS_PER_HOUR,
            TimeUnit::Day => MS_PER_DAY,
        }
    }
}

/// A registered bar granularity.
///
/// The tick pseudo-period has no unit and reports an interval of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    name: &'static str,
    multiplier: u32,
    unit: Option<TimeUnit>,
}

impl Period {
    pub const TICK: Period = Period::tick();
    pub const ONE_SECOND: Period = Period::define("1s", 1_000, TimeUnit::Millisecond);
    pub const TEN_SECONDS: Period = Period::define("10s", 10_000, TimeUnit::Millisecond);
    pub const ONE_MINUTE: Period = Period::define("1m", 1, TimeUnit::Minute);
    pub const FIVE_MINUTES: Period = Period::define("5m", 5, TimeUnit::Minute);
    pub const TEN_MINUTES: Period = Period::define("10m", 10, TimeUnit::Minute);
    pub const FIFTEEN_MINUTES: Period = Period::define("15m", 15, TimeUnit::Minute);
    pub const THIRTY_MINUTES: Period = Period::define("30m", 30, TimeUnit::Minute);
    pub const ONE_HOUR: Period = Period::define("1h", 1, TimeUnit::Hour);
    pub const FOUR_HOURS: Period = Period::define("4h", 4, TimeUnit::Hour);
    pub const DAILY: Period = Period::define("1d", 1, TimeUnit::Day);
    pub const WEEKLY: Period = Period::define("1w", 7, TimeUnit::Day);

    const fn tick() -> Self {
        Self {
            name: "tick",
            multiplier: 1,
            unit: None,
        }
    }

    const fn define(name: &'static str, multiplier: u32, unit: TimeUnit) -> Self {
        Self {
            name,
            multiplier,
            unit: Some(unit),
        }
    }

    /// Registry name, e.g. `"15m"`.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Base unit, `None` for the tick pseudo-period.
    pub const fn unit(&self) -> Option<TimeUnit> {
        self.unit
    }

    pub const fn is_tick(&self) -> bool {
        self.unit.is_none()
    }

    /// Bucket length in milliseconds; zero for the tick pseudo-period.
    pub const fn interval_millis(&self) -> i64 {
        match self.unit {
            Some(unit) => self.multiplier as i64 * unit.millis(),
            None => 0,
        }
    }

    /// Whether buckets must be aligned to the weekly anchor rather than the epoch.
    pub const fn is_weekly(&self) -> bool {
        let interval = self.interval_millis();
        interval > 0 && interval % MS_PER_WEEK == 0
    }
}

/// Supported periods, shortest first.
pub static PERIODS: [Period; 12] = [
    Period::TICK,
    Period::ONE_SECOND,
    Period::TEN_SECONDS,
    Period::ONE_MINUTE,
    Period::FIVE_MINUTES,
    Period::TEN_MINUTES,
    Period::FIFTEEN_MINUTES,
    Period::THIRTY_MINUTES,
    Period::ONE_HOUR,
    Period::FOUR_HOURS,
    Period::DAILY,
    Period::WEEKLY,
];

/// Find a registered period by name (case-insensitive).
pub fn lookup(name: &str) -> Option<Period> {
    let wanted = name.trim();
    PERIODS
        .iter()
        .copied()
        .find(|p| p.name.eq_ignore_ascii_case(wanted))
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        lookup(value).ok_or_else(|| Error::unknown_period(value.trim()))
    }
}

impl Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(D::Error::custom)
    }
}
