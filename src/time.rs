use crate::error::BankError;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

pub const MINUTES_PER_DAY: u16 = 1440;
pub const SLOTS_PER_DAY: usize = 24;

/// Minute of a single 24-hour hub-local day, always reduced into `0..1440`.
/// Serialised as a canonical `HH:mm` string.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, Hash, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Time(u16);

impl Time {
    pub fn new(minutes: i64) -> Time {
        Time(minutes.rem_euclid(MINUTES_PER_DAY as i64) as u16)
    }

    pub fn hm(hour: u16, minute: u16) -> Time {
        Time::new((hour as i64) * 60 + minute as i64)
    }

    /// Hour-of-day bucket this minute falls into.
    pub fn slot(self) -> usize {
        (self.0 / 60) as usize
    }

    pub fn top_of_slot(slot: usize) -> Time {
        Time::new((slot % SLOTS_PER_DAY) as i64 * 60)
    }

    pub fn parse(s: &str) -> Result<Time, BankError> {
        let invalid = || BankError::InvalidTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = h.trim().parse::<u16>().map_err(|_| invalid())?;
        let minute = m.trim().parse::<u16>().map_err(|_| invalid())?;
        if hour >= 24 || minute >= 60 {
            return Err(invalid());
        }
        Ok(Time::hm(hour, minute))
    }

    /// `exact` when it is a well-formed clock time, the top of `slot` otherwise.
    pub fn minutes_of(slot: usize, exact: Option<&str>) -> Time {
        exact
            .and_then(|s| Time::parse(s).ok())
            .unwrap_or_else(|| Time::top_of_slot(slot))
    }

    /// Minutes travelled going forward from `self` to `to`, wrapping past midnight.
    pub fn forward_to(self, to: Time) -> u16 {
        ((to.0 + MINUTES_PER_DAY) - self.0) % MINUTES_PER_DAY
    }

    /// True iff `value` lies within `duration` minutes forward of `start`, both ends inclusive.
    pub fn in_wraparound_window(value: Time, start: Time, duration: u16) -> bool {
        start.forward_to(value) <= duration
    }

    /// Signed shift from `from` to `to`, normalised into `-720..720`.
    pub fn delta(from: Time, to: Time) -> i32 {
        let forward = from.forward_to(to) as i32;
        if forward >= (MINUTES_PER_DAY / 2) as i32 {
            forward - MINUTES_PER_DAY as i32
        } else {
            forward
        }
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl TryFrom<String> for Time {
    type Error = BankError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Time::parse(&value)
    }
}

impl From<Time> for String {
    fn from(value: Time) -> Self {
        value.to_string()
    }
}

impl Add<i32> for Time {
    type Output = Self;

    fn add(self, rhs: i32) -> Self::Output {
        Time::new(self.0 as i64 + rhs as i64)
    }
}

impl Add<u16> for Time {
    type Output = Self;

    fn add(self, rhs: u16) -> Self::Output {
        Time::new(self.0 as i64 + rhs as i64)
    }
}

impl Sub<u16> for Time {
    type Output = Self;

    fn sub(self, rhs: u16) -> Self::Output {
        Time::new(self.0 as i64 - rhs as i64)
    }
}
