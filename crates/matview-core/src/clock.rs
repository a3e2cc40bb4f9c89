//! Calendar-date helpers (proleptic Gregorian, UTC).

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("stopwatch stopped before it was started")]
    NotStarted,
    #[error("malformed date {input:?} (expected YYYY-MM-DD)")]
    Malformed { input: String },
    #[error("date component out of range: {year:04}-{month:02}-{day:02}")]
    OutOfRange { year: i32, month: u32, day: u32 },
    #[error("system clock is before the Unix epoch")]
    BeforeEpoch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CivilDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CivilDate {
    /// Validated constructor.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ClockError> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(ClockError::OutOfRange { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Parse an ISO `YYYY-MM-DD` date.
    pub fn parse(input: &str) -> Result<Self, ClockError> {
        let malformed = || ClockError::Malformed {
            input: input.to_string(),
        };
        let mut parts = input.trim().splitn(3, '-');
        let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        if y.len() != 4 || m.len() != 2 || d.len() != 2 {
            return Err(malformed());
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(y) || !all_digits(m) || !all_digits(d) {
            return Err(malformed());
        }
        let year = y.parse().map_err(|_| malformed())?;
        let month = m.parse().map_err(|_| malformed())?;
        let day = d.parse().map_err(|_| malformed())?;
        Self::new(year, month, day)
    }

    /// Current UTC date from the system clock.
    pub fn today() -> Result<Self, ClockError> {
        Self::from_system_time(SystemTime::now())
    }

    pub fn from_system_time(t: SystemTime) -> Result<Self, ClockError> {
        let secs = t
            .duration_since(UNIX_EPOCH)
            .map_err(|_| ClockError::BeforeEpoch)?
            .as_secs();
        Ok(Self::from_days_since_epoch((secs / 86_400) as i64))
    }

    /// Civil date for a day count relative to 1970-01-01.
    pub fn from_days_since_epoch(days: i64) -> Self {
        // Hinnant's civil_from_days
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
        let year = (yoe + era * 400 + i64::from(month <= 2)) as i32;
        Self { year, month, day }
    }

    pub fn days_since_epoch(&self) -> i64 {
        let y = i64::from(self.year) - i64::from(self.month <= 2);
        let m = i64::from(self.month);
        let era = y.div_euclid(400);
        let yoe = y.rem_euclid(400);
        let mp = if m > 2 { m - 3 } else { m + 9 };
        let doy = (153 * mp + 2) / 5 + i64::from(self.day) - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - 719_468
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(&self, other: &CivilDate) -> i64 {
        other.days_since_epoch() - self.days_since_epoch()
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CivilDate {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap(year) => 29,
        2 => 28,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_iso_dates() {
        let d = CivilDate::parse("2024-02-29").expect("leap day");
        assert_eq!(d, CivilDate::new(2024, 2, 29).unwrap());
        assert_eq!(d.to_string(), "2024-02-29");
        assert_eq!("1999-12-31".parse::<CivilDate>().unwrap().year, 1999);
    }

    #[test]
    fn rejects_malformed_dates() {
        for bad in ["", "2024", "2024-1-01", "2024/01/01", "20a4-01-01", "2024-01-01-01"] {
            assert!(
                matches!(CivilDate::parse(bad), Err(ClockError::Malformed { .. })),
                "{bad:?} should be malformed"
            );
        }
        assert!(matches!(
            CivilDate::parse("2023-02-29"),
            Err(ClockError::OutOfRange { .. })
        ));
        assert!(matches!(
            CivilDate::parse("2023-13-01"),
            Err(ClockError::OutOfRange { .. })
        ));
    }

    #[test]
    fn epoch_day_round_trip() {
        assert_eq!(CivilDate::from_days_since_epoch(0).to_string(), "1970-01-01");
        assert_eq!(CivilDate::new(2000, 3, 1).unwrap().days_since_epoch(), 11_017);
        for days in [-800_000_i64, -1, 0, 59, 365, 11_016, 19_782, 2_932_896] {
            let d = CivilDate::from_days_since_epoch(days);
            assert_eq!(d.days_since_epoch(), days, "{d}");
        }
    }

    #[test]
    fn days_between_dates() {
        let a = CivilDate::new(2023, 12, 25).unwrap();
        let b = CivilDate::new(2024, 1, 1).unwrap();
        assert_eq!(a.days_until(&b), 7);
        assert_eq!(b.days_until(&a), -7);
    }

    #[test]
    fn system_time_conversion() {
        let t = UNIX_EPOCH + Duration::from_secs(86_400 * 365 + 3_600);
        assert_eq!(CivilDate::from_system_time(t).unwrap().to_string(), "1971-01-01");
        let before = UNIX_EPOCH - Duration::from_secs(1);
        assert_eq!(CivilDate::from_system_time(before), Err(ClockError::BeforeEpoch));
    }
}
