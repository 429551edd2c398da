//! Quarterly date axis for forecast summaries.
//!
//! All series in this workspace are quarterly. `Quarter` is a type-safe
//! (year, quarter) pair with string form `YYYY-Qn`, total ordering and
//! simple arithmetic; it serialises as its string form so that container
//! files stay human-readable.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::QuarterError;

/// A calendar quarter, e.g. `2020-Q1`.
///
/// # Examples
///
/// ```
/// use fanchart_core::types::Quarter;
///
/// let q = Quarter::new(2020, 4).unwrap();
/// assert_eq!(q.next(), Quarter::new(2021, 1).unwrap());
/// assert_eq!(q.minus(4), Quarter::new(2019, 4).unwrap());
///
/// let parsed: Quarter = "2020-Q4".parse().unwrap();
/// assert_eq!(parsed, q);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    year: i32,
    quarter: u32,
}

impl Quarter {
    /// Creates a quarter from a year and a quarter number in `1..=4`.
    pub fn new(year: i32, quarter: u32) -> Result<Self, QuarterError> {
        if !(1..=4).contains(&quarter) {
            return Err(QuarterError::InvalidQuarter(quarter));
        }
        Ok(Self { year, quarter })
    }

    /// Creates the quarter containing a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: (date.month0() / 3) + 1,
        }
    }

    /// Returns the year component.
    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the quarter number in `1..=4`.
    #[inline]
    pub fn quarter(&self) -> u32 {
        self.quarter
    }

    /// Returns the following quarter.
    pub fn next(&self) -> Self {
        if self.quarter == 4 {
            Self {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }

    /// Returns the quarter `n` periods earlier.
    pub fn minus(&self, n: u32) -> Self {
        // Work in a flat quarter count to avoid per-step borrow logic.
        let total = self.year as i64 * 4 + (self.quarter as i64 - 1) - n as i64;
        Self {
            year: total.div_euclid(4) as i32,
            quarter: (total.rem_euclid(4) + 1) as u32,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

impl FromStr for Quarter {
    type Err = QuarterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year_part, q_part) = s
            .split_once("-Q")
            .ok_or_else(|| QuarterError::InvalidFormat(s.to_string()))?;
        let year: i32 = year_part
            .parse()
            .map_err(|_| QuarterError::InvalidFormat(s.to_string()))?;
        let quarter: u32 = q_part
            .parse()
            .map_err(|_| QuarterError::InvalidFormat(s.to_string()))?;
        Self::new(year, quarter)
    }
}

impl Serialize for Quarter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quarter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
