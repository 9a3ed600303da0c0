//! Time handling utilities for gridded climate data.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GeoError, GeoResult};

/// Fixed-length time units accepted for frequencies and rescaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl TimeUnit {
    /// Parse a unit name or pandas-style alias ("D", "h", "min", "seconds", ...).
    pub fn parse(s: &str) -> GeoResult<Self> {
        let unit = match s.trim() {
            "ns" | "nanosecond" | "nanoseconds" | "N" => TimeUnit::Nanoseconds,
            "us" | "microsecond" | "microseconds" | "U" => TimeUnit::Microseconds,
            "ms" | "millisecond" | "milliseconds" | "L" => TimeUnit::Milliseconds,
            "s" | "S" | "sec" | "second" | "seconds" => TimeUnit::Seconds,
            "min" | "T" | "minute" | "minutes" => TimeUnit::Minutes,
            "h" | "H" | "hour" | "hours" => TimeUnit::Hours,
            "D" | "d" | "day" | "days" => TimeUnit::Days,
            "W" | "w" | "week" | "weeks" => TimeUnit::Weeks,
            other => {
                return Err(GeoError::InvalidTime(format!(
                    "unsupported time unit '{}'",
                    other
                )))
            }
        };
        Ok(unit)
    }

    /// Length of one unit in nanoseconds.
    pub fn nanos(&self) -> i64 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60 * 1_000_000_000,
            TimeUnit::Hours => 3_600 * 1_000_000_000,
            TimeUnit::Days => 86_400 * 1_000_000_000,
            TimeUnit::Weeks => 7 * 86_400 * 1_000_000_000,
        }
    }

    /// Duration of `n` units, rounded to the nearest nanosecond.
    pub fn duration(&self, n: f64) -> GeoResult<Duration> {
        let nanos = n * self.nanos() as f64;
        if !nanos.is_finite() || nanos.abs() > i64::MAX as f64 {
            return Err(GeoError::InvalidTime(format!("duration {} {} overflows", n, self)));
        }
        Ok(Duration::nanoseconds(nanos.round() as i64))
    }

    /// Short alias used when rendering frequencies.
    pub fn alias(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "min",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "D",
            TimeUnit::Weeks => "W",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Nanoseconds => "nanoseconds",
            TimeUnit::Microseconds => "microseconds",
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
        };
        write!(f, "{}", name)
    }
}

/// Parse an ISO 8601 date or datetime, assuming UTC when no offset is given.
pub fn parse_datetime(s: &str) -> GeoResult<DateTime<Utc>> {
    let s = s.trim();

    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try without timezone (assume UTC)
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Try date only
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(GeoError::InvalidTime(format!("invalid time format: {}", s)))
}

/// Nanoseconds since the Unix epoch.
pub fn to_epoch_nanos(dt: &DateTime<Utc>) -> GeoResult<i64> {
    dt.timestamp_nanos_opt()
        .ok_or_else(|| GeoError::InvalidTime(format!("{} is outside the nanosecond range", dt)))
}

/// Inverse of [`to_epoch_nanos`].
pub fn from_epoch_nanos(nanos: i64) -> DateTime<Utc> {
    Utc.timestamp_nanos(nanos)
}

/// Arithmetic mean of a set of instants. `None` when empty.
pub fn mean_datetime(times: &[DateTime<Utc>]) -> GeoResult<Option<DateTime<Utc>>> {
    let Some(first) = times.first() else {
        return Ok(None);
    };
    // Average offsets from the first instant to stay clear of i64 overflow.
    let base = to_epoch_nanos(first)?;
    let mut acc = 0.0f64;
    for t in times {
        acc += (to_epoch_nanos(t)? - base) as f64;
    }
    let offset = (acc / times.len() as f64).round() as i64;
    Ok(Some(from_epoch_nanos(base + offset)))
}

/// A regular time axis from `time_min` to `time_max` (inclusive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub time_min: String,
    pub time_max: String,
    pub freq_step: f64,
    pub unit: TimeUnit,
}

impl Period {
    pub fn new(
        time_min: impl Into<String>,
        time_max: impl Into<String>,
        freq_step: f64,
        unit: TimeUnit,
    ) -> Self {
        Self {
            time_min: time_min.into(),
            time_max: time_max.into(),
            freq_step,
            unit,
        }
    }

    /// Frequency string, e.g. "1D" or "6h".
    pub fn freq(&self) -> String {
        format!("{}{}", self.freq_step, self.unit.alias())
    }

    /// Step between consecutive instants.
    pub fn step(&self) -> GeoResult<Duration> {
        if !(self.freq_step > 0.0) {
            return Err(GeoError::InvalidTime(format!(
                "frequency step must be > 0, got {}",
                self.freq_step
            )));
        }
        let step = self.unit.duration(self.freq_step)?;
        if step <= Duration::zero() {
            return Err(GeoError::InvalidTime(format!(
                "frequency {} is below nanosecond resolution",
                self.freq()
            )));
        }
        Ok(step)
    }

    /// All instants from `time_min` up to and including `time_max`.
    pub fn date_range(&self) -> GeoResult<Vec<DateTime<Utc>>> {
        let start = parse_datetime(&self.time_min)?;
        let end = parse_datetime(&self.time_max)?;
        if end < start {
            return Err(GeoError::InvalidTime(format!(
                "time_max {} precedes time_min {}",
                end, start
            )));
        }
        let step = self.step()?;

        let mut times = Vec::new();
        let mut current = start;
        while current <= end {
            times.push(current);
            current += step;
        }
        Ok(times)
    }
}
