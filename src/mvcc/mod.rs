//! Cell timestamps and the half-open time ranges used to filter versions.

use std::fmt;

use thiserror::Error;

/// Logical write timestamp carried by every cell.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Least possible timestamp.
    pub const MIN: Self = Self(0);
    /// Greatest possible timestamp.
    pub const MAX: Self = Self(u64::MAX);
    /// Alias used by callers asking for "the newest version".
    pub const LATEST: Self = Self::MAX;

    /// Construct a timestamp from a raw `u64`.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw `u64` value backing this timestamp.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the next timestamp after `self`, saturating on overflow.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<u64> for Timestamp {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Timestamp").field(&self.0).finish()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a time range is built with `min > max`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid time range: min {min} is greater than max {max}")]
pub struct TimeRangeError {
    /// Requested lower bound.
    pub min: Timestamp,
    /// Requested upper bound.
    pub max: Timestamp,
}

/// Half-open `[min, max)` range of timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRange {
    min: Timestamp,
    max: Timestamp,
}

impl TimeRange {
    /// Range covering every timestamp.
    pub const fn all() -> Self {
        Self {
            min: Timestamp::MIN,
            max: Timestamp::MAX,
        }
    }

    /// Build `[min, max)`.
    pub fn new(min: Timestamp, max: Timestamp) -> Result<Self, TimeRangeError> {
        if min > max {
            return Err(TimeRangeError { min, max });
        }
        Ok(Self { min, max })
    }

    /// Range holding exactly `ts`.
    pub const fn at(ts: Timestamp) -> Self {
        Self {
            min: ts,
            max: ts.next(),
        }
    }

    /// Everything written at or before `ts`.
    pub const fn as_of(ts: Timestamp) -> Self {
        Self {
            min: Timestamp::MIN,
            max: ts.next(),
        }
    }

    /// Inclusive lower bound.
    pub const fn min(&self) -> Timestamp {
        self.min
    }

    /// Exclusive upper bound.
    pub const fn max(&self) -> Timestamp {
        self.max
    }

    /// Whether the range admits every timestamp.
    pub fn is_all(&self) -> bool {
        self.min == Timestamp::MIN && self.max == Timestamp::MAX
    }

    /// Whether `ts` falls inside the range.
    ///
    /// `Timestamp::MAX` is admitted by the unbounded range even though the
    /// upper bound is exclusive.
    pub fn contains(&self, ts: Timestamp) -> bool {
        if self.is_all() {
            return true;
        }
        ts >= self.min && ts < self.max
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::all()
    }
}
