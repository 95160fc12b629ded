//! Pay periods
//!
//! Payslips are issued twice a month, one per quincena (half-month). A
//! period is stored as a string key; this module parses those keys and
//! renders the human-readable labels kept alongside each record.
//!
//! Two key shapes are accepted:
//! - `primera-2024-03` (canonical)
//! - `primera_quincena_3_2024` (legacy form written by the manual year/month/half form)

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Which half of the month a payslip covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Half {
    /// Days 1-15
    First,
    /// Days 16-end
    Second,
}

impl Half {
    /// Key fragment used in period keys
    pub fn as_key(&self) -> &'static str {
        match self {
            Half::First => "primera",
            Half::Second => "segunda",
        }
    }

    /// Display fragment used in period labels
    pub fn label(&self) -> &'static str {
        match self {
            Half::First => "Primera Quincena",
            Half::Second => "Segunda Quincena",
        }
    }

    fn from_key(s: &str) -> Option<Self> {
        match s {
            "primera" => Some(Half::First),
            "segunda" => Some(Half::Second),
            _ => None,
        }
    }
}

/// Upper bound on how far back [`Period::recent`] reaches
pub const MAX_RECENT_MONTHS: u32 = 120;

/// A pay period: quincena + month + year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    pub year: i32,
    pub month: u32,
    pub half: Half,
}

#[derive(Deserialize)]
struct RawPeriod {
    year: i32,
    month: u32,
    half: Half,
}

impl TryFrom<RawPeriod> for Period {
    type Error = Error;

    fn try_from(raw: RawPeriod) -> Result<Self> {
        Period::new(raw.half, raw.month, raw.year)
    }
}

impl Period {
    /// Create a period, validating the month
    pub fn new(half: Half, month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidPeriod(format!("month {} out of range", month)));
        }
        if !(1..=9999).contains(&year) {
            return Err(Error::InvalidPeriod(format!("year {} out of range", year)));
        }
        Ok(Self { year, month, half })
    }

    /// Parse a period key in either the canonical or the legacy shape
    pub fn parse(key: &str) -> Result<Self> {
        let invalid = || Error::InvalidPeriod(key.to_string());
        let key = key.trim();

        let parts: Vec<&str> = key.split('-').collect();
        if let [half, year, month] = parts.as_slice() {
            let half = Half::from_key(half).ok_or_else(invalid)?;
            let year = year.parse().map_err(|_| invalid())?;
            let month = month.parse().map_err(|_| invalid())?;
            return Self::new(half, month, year);
        }

        let parts: Vec<&str> = key.split('_').collect();
        if let [half, "quincena", month, year] = parts.as_slice() {
            let half = Half::from_key(half).ok_or_else(invalid)?;
            let year = year.parse().map_err(|_| invalid())?;
            let month = month.parse().map_err(|_| invalid())?;
            return Self::new(half, month, year);
        }

        Err(invalid())
    }

    /// Canonical storage key, e.g. `primera-2024-03`
    pub fn key(&self) -> String {
        format!("{}-{:04}-{:02}", self.half.as_key(), self.year, self.month)
    }

    /// Display label, e.g. `Primera Quincena Marzo 2024`
    pub fn label(&self) -> String {
        let month = self
            .month
            .checked_sub(1)
            .and_then(|i| MONTH_NAMES.get(i as usize))
            .copied()
            .unwrap_or("?");
        format!("{} {} {}", self.half.label(), month, self.year)
    }

    /// The periods of the last `months` months, newest month first.
    ///
    /// Each month yields its first half followed by its second half.
    /// `months` is capped at [`MAX_RECENT_MONTHS`].
    pub fn recent(today: NaiveDate, months: u32) -> Vec<Period> {
        let months = months.min(MAX_RECENT_MONTHS);
        let mut periods = Vec::with_capacity(months as usize * 2);
        let mut year = today.year();
        let mut month = today.month();

        for _ in 0..months {
            periods.push(Period {
                year,
                month,
                half: Half::First,
            });
            periods.push(Period {
                year,
                month,
                half: Half::Second,
            });

            if month == 1 {
                month = 12;
                year -= 1;
            } else {
                month -= 1;
            }
        }

        periods
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_key() {
        let period = Period::parse("primera-2024-03").unwrap();
        assert_eq!(period.half, Half::First);
        assert_eq!(period.month, 3);
        assert_eq!(period.year, 2024);
        assert_eq!(period.key(), "primera-2024-03");
        assert_eq!(period.label(), "Primera Quincena Marzo 2024");
    }

    #[test]
    fn test_parse_legacy_key_normalizes() {
        let period: Period = "segunda_quincena_12_2023".parse().unwrap();
        assert_eq!(period.key(), "segunda-2023-12");
        assert_eq!(period.label(), "Segunda Quincena Diciembre 2023");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Period::parse("otra-clave").is_err());
        assert!(Period::parse("tercera-2024-03").is_err());
        assert!(Period::parse("primera-2024-13").is_err());
        assert!(Period::parse("primera-2024-00").is_err());
        assert!(Period::parse("").is_err());
    }

    #[test]
    fn test_recent_periods_cross_year() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        let periods = Period::recent(today, 6);

        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0].key(), "primera-2024-02");
        assert_eq!(periods[1].key(), "segunda-2024-02");
        assert_eq!(periods[2].key(), "primera-2024-01");
        assert_eq!(periods[4].key(), "primera-2023-12");
        assert_eq!(periods[11].key(), "segunda-2023-09");
    }

    #[test]
    fn test_recent_periods_are_capped() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        let periods = Period::recent(today, u32::MAX);
        assert_eq!(periods.len(), MAX_RECENT_MONTHS as usize * 2);
        assert_eq!(periods.last().unwrap().key(), "segunda-2014-03");
        assert!(Period::recent(today, 0).is_empty());
    }

    #[test]
    fn test_deserialize_validates_month() {
        assert!(ron::from_str::<Period>("(year: 2024, month: 0, half: First)").is_err());
        assert!(ron::from_str::<Period>("(year: 2024, month: 13, half: Second)").is_err());

        let period: Period = ron::from_str("(year: 2024, month: 3, half: First)").unwrap();
        assert_eq!(period.label(), "Primera Quincena Marzo 2024");
    }

    #[test]
    fn test_label_of_unchecked_period() {
        let period = Period {
            year: 2024,
            month: 0,
            half: Half::First,
        };
        assert_eq!(period.label(), "Primera Quincena ? 2024");
    }

    #[test]
    fn test_period_ron_roundtrip() {
        let period = Period::new(Half::Second, 7, 2025).unwrap();
        let text = ron::to_string(&period).unwrap();
        let back: Period = ron::from_str(&text).unwrap();
        assert_eq!(period, back);
    }
}
