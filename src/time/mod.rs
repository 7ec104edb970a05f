//! Time module for astronomical time calculations
//!
//! Converts civil UTC instants into the time scales the rest of the crate
//! needs: TT for precession and star epochs, TDB for the ephemeris and UT1
//! for Earth rotation. DUT1 is neglected (|UT1 - UTC| < 0.9 s), which moves
//! an azimuth by well under an arcminute.

use crate::constants::{DAY_S, J2000, JULIAN_YEAR_DAYS, TT_MINUS_TAI_S};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Error type for time operations
#[derive(Debug, Error)]
pub enum TimeError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Local time {0} is ambiguous or does not exist")]
    AmbiguousLocalTime(String),
}

/// Result type for time operations
pub type Result<T> = std::result::Result<T, TimeError>;

/// Julian date of the Unix epoch (1970-01-01T00:00:00 UTC)
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Naive timestamp layouts accepted after RFC 3339 has been tried
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

lazy_static! {
    static ref OFFSET_PATTERN: Regex =
        Regex::new(r"^(?:UTC)?([+-])(\d{1,2})(?::?(\d{2}))?$").expect("valid offset pattern");
}

/// Represents a time scale for astronomical calculations
#[derive(Debug, Clone)]
pub struct Timescale {
    /// UTC Julian dates at which TAI-UTC changed
    leap_dates: Vec<f64>,
    /// TAI-UTC in seconds from the matching date onward
    leap_offsets: Vec<i32>,
}

impl Default for Timescale {
    fn default() -> Self {
        // Format: (UTC Julian date, TAI-UTC offset)
        let table: &[(f64, i32)] = &[
            (2441317.5, 10), // 1972-01-01
            (2441499.5, 11), // 1972-07-01
            (2441683.5, 12), // 1973-01-01
            (2442048.5, 13), // 1974-01-01
            (2442413.5, 14), // 1975-01-01
            (2442778.5, 15), // 1976-01-01
            (2443144.5, 16), // 1977-01-01
            (2443509.5, 17), // 1978-01-01
            (2443874.5, 18), // 1979-01-01
            (2444239.5, 19), // 1980-01-01
            (2444786.5, 20), // 1981-07-01
            (2445151.5, 21), // 1982-07-01
            (2445516.5, 22), // 1983-07-01
            (2446247.5, 23), // 1985-07-01
            (2447161.5, 24), // 1988-01-01
            (2447892.5, 25), // 1990-01-01
            (2448257.5, 26), // 1991-01-01
            (2448804.5, 27), // 1992-07-01
            (2449169.5, 28), // 1993-07-01
            (2449534.5, 29), // 1994-07-01
            (2450083.5, 30), // 1996-01-01
            (2450630.5, 31), // 1997-07-01
            (2451179.5, 32), // 1999-01-01
            (2453736.5, 33), // 2006-01-01
            (2454832.5, 34), // 2009-01-01
            (2456109.5, 35), // 2012-07-01
            (2457204.5, 36), // 2015-07-01
            (2457754.5, 37), // 2017-01-01
        ];
        Self::new(
            table.iter().map(|&(jd, _)| jd).collect(),
            table.iter().map(|&(_, offset)| offset).collect(),
        )
    }
}

impl Timescale {
    /// Create a timescale from a leap second table sorted by date
    pub fn new(leap_dates: Vec<f64>, leap_offsets: Vec<i32>) -> Self {
        Self {
            leap_dates,
            leap_offsets,
        }
    }

    /// TAI-UTC in seconds at a UTC Julian date; before 1972 the first entry is used
    pub fn leap_seconds(&self, utc_jd: f64) -> f64 {
        let index = self.leap_dates.partition_point(|&date| date <= utc_jd);
        let offset = match index {
            0 => self.leap_offsets.first(),
            i => self.leap_offsets.get(i - 1),
        };
        offset.copied().unwrap_or(0) as f64
    }

    /// Get the current time
    pub fn now(&self) -> Time {
        self.from_datetime(Utc::now())
    }

    /// Create a time from a UTC datetime
    pub fn from_datetime(&self, dt: DateTime<Utc>) -> Time {
        let seconds = dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 * 1e-9;
        let utc = UNIX_EPOCH_JD + seconds / DAY_S;
        let tt = utc + (self.leap_seconds(utc) + TT_MINUS_TAI_S) / DAY_S;
        Time { utc, tt }
    }

    /// Create a time directly from a TT Julian date
    pub fn tt_jd(&self, jd: f64) -> Time {
        let approx_utc = jd - (self.leap_seconds(jd) + TT_MINUS_TAI_S) / DAY_S;
        let utc = jd - (self.leap_seconds(approx_utc) + TT_MINUS_TAI_S) / DAY_S;
        Time { utc, tt: jd }
    }

    /// Create a time from a Julian epoch year, e.g. `1991.25` for the Hipparcos epoch
    pub fn j(&self, year: f64) -> Time {
        self.tt_jd(J2000 + (year - 2000.0) * JULIAN_YEAR_DAYS)
    }
}

/// An instant, held as UTC and TT Julian dates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Time {
    utc: f64,
    tt: f64,
}

impl Time {
    /// UTC as a Julian date
    pub fn utc_jd(&self) -> f64 {
        self.utc
    }

    /// Get the TAI (International Atomic Time) as Julian date
    pub fn tai(&self) -> f64 {
        self.tt - TT_MINUS_TAI_S / DAY_S
    }

    /// Get the TT (Terrestrial Time) as Julian date
    pub fn tt(&self) -> f64 {
        self.tt
    }

    /// Get the TT as Julian years
    pub fn j(&self) -> f64 {
        2000.0 + (self.tt - J2000) / JULIAN_YEAR_DAYS
    }

    /// Get the TDB (Barycentric Dynamical Time) as Julian date
    pub fn tdb(&self) -> f64 {
        self.tt + tdb_minus_tt(self.tt) / DAY_S
    }

    /// Get the UT1 (Universal Time) as Julian date, taking DUT1 as zero
    pub fn ut1(&self) -> f64 {
        self.utc
    }

    /// Julian centuries of TT since J2000.0
    pub fn centuries_since_j2000(&self) -> f64 {
        (self.tt - J2000) / 36_525.0
    }

    /// Get the UTC datetime
    pub fn utc_datetime(&self) -> DateTime<Utc> {
        let seconds = (self.utc - UNIX_EPOCH_JD) * DAY_S;
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(whole as i64, nanos).unwrap_or_default()
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Time tt={:.6} {}>", self.tt, self.utc_datetime().to_rfc3339())
    }
}

/// TDB - TT in seconds, USNO Circular 179 eq. 2.6
fn tdb_minus_tt(jd_tt: f64) -> f64 {
    let t = (jd_tt - J2000) / 36525.0;

    0.001657 * f64::sin(628.3076 * t + 6.2401)
        + 0.000022 * f64::sin(575.3385 * t + 4.2970)
        + 0.000014 * f64::sin(1256.6152 * t + 6.1969)
        + 0.000005 * f64::sin(606.9777 * t + 4.0212)
        + 0.000005 * f64::sin(52.9691 * t + 0.4444)
        + 0.000002 * f64::sin(21.3299 * t + 5.5431)
        + 0.000010 * t * f64::sin(628.3076 * t + 4.2490)
}

/// How to read timestamps that carry no UTC offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zone {
    /// The machine's local time zone
    Local,
    /// A fixed offset from UTC (UTC itself is offset zero)
    Fixed(FixedOffset),
}

impl std::str::FromStr for Zone {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "local" => return Ok(Zone::Local),
            "utc" | "z" | "gmt" => {
                return FixedOffset::east_opt(0)
                    .map(Zone::Fixed)
                    .ok_or_else(|| TimeError::InvalidTimezone(s.to_string()))
            }
            _ => {}
        }

        let caps = OFFSET_PATTERN
            .captures(trimmed)
            .ok_or_else(|| TimeError::InvalidTimezone(s.to_string()))?;
        let hours: i32 = caps[2].parse().map_err(|_| TimeError::InvalidTimezone(s.to_string()))?;
        let minutes: i32 = caps
            .get(3)
            .map_or(Ok(0), |m| m.as_str().parse())
            .map_err(|_| TimeError::InvalidTimezone(s.to_string()))?;
        let sign = if &caps[1] == "-" { -1 } else { 1 };

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Zone::Fixed)
            .ok_or_else(|| TimeError::InvalidTimezone(s.to_string()))
    }
}

/// Parse an observation timestamp: `now`, RFC 3339, or a naive ISO-8601
/// date/time read in `zone`.
pub fn parse_timestamp(text: &str, zone: Zone) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("now") {
        return Ok(Utc::now());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| TimeError::InvalidFormat(text.to_string()))?;

    let resolved = match zone {
        Zone::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        Zone::Fixed(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
    };
    resolved.ok_or_else(|| TimeError::AmbiguousLocalTime(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn utc_zone() -> Zone {
        "utc".parse().unwrap()
    }

    #[test]
    fn test_julian_date() {
        let ts = Timescale::default();
        let date = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let t = ts.from_datetime(date);
        assert_relative_eq!(t.utc_jd(), J2000, epsilon = 1e-9);
        // 32 leap seconds in 2000 plus 32.184
        assert_relative_eq!((t.tt() - t.utc_jd()) * DAY_S, 64.184, epsilon = 1e-4);
    }

    #[test]
    fn test_tt_minus_utc_after_2017() {
        let ts = Timescale::default();
        let t = ts.from_datetime(Utc.with_ymd_and_hms(2020, 10, 3, 0, 35, 20).unwrap());
        assert_relative_eq!((t.tt() - t.utc_jd()) * DAY_S, 69.184, epsilon = 1e-4);
        assert_relative_eq!((t.tt() - t.tai()) * DAY_S, TT_MINUS_TAI_S, epsilon = 1e-4);
    }

    #[test]
    fn test_leap_second_boundaries() {
        let ts = Timescale::default();
        assert_eq!(ts.leap_seconds(2457754.5 - 1e-6), 36.0);
        assert_eq!(ts.leap_seconds(2457754.5), 37.0);
        assert_eq!(ts.leap_seconds(2400000.5), 10.0);
    }

    #[test]
    fn test_tdb_close_to_tt() {
        let ts = Timescale::default();
        let t = ts.from_datetime(Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap());
        assert!(((t.tdb() - t.tt()) * DAY_S).abs() < 0.002);
    }

    #[test]
    fn test_julian_epoch_year() {
        let ts = Timescale::default();
        let epoch = ts.j(1991.25);
        assert_relative_eq!(epoch.tt(), 2448349.0625, epsilon = 1e-9);
        assert_relative_eq!(epoch.j(), 1991.25, epsilon = 1e-12);
    }

    #[test]
    fn test_utc_datetime_round_trip() {
        let ts = Timescale::default();
        let dt = Utc.with_ymd_and_hms(2021, 6, 1, 3, 4, 5).unwrap();
        let back = ts.from_datetime(dt).utc_datetime();
        assert!((back - dt).num_milliseconds().abs() <= 1);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2020, 10, 3, 0, 35, 20).unwrap()
            + chrono::Duration::milliseconds(381);

        assert_eq!(
            parse_timestamp("2020-10-03T00:35:20.381", utc_zone()).unwrap(),
            expected
        );
        assert_eq!(
            parse_timestamp("2020-10-03T00:35:20.381Z", Zone::Local).unwrap(),
            expected
        );
        assert_eq!(
            parse_timestamp("2020-10-02T20:35:20.381-04:00", Zone::Local).unwrap(),
            expected
        );
        assert_eq!(
            parse_timestamp("2020-10-03", utc_zone()).unwrap(),
            Utc.with_ymd_and_hms(2020, 10, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_timestamp_with_fixed_zone() {
        let zone: Zone = "-04:00".parse().unwrap();
        assert_eq!(
            parse_timestamp("2020-10-02 20:35", zone).unwrap(),
            Utc.with_ymd_and_hms(2020, 10, 3, 0, 35, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_timestamp_now_and_garbage() {
        assert!(parse_timestamp("NOW", Zone::Local).is_ok());
        assert!(matches!(
            parse_timestamp("yesterday-ish", Zone::Local),
            Err(TimeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_zone_parsing() {
        assert_eq!("local".parse::<Zone>().unwrap(), Zone::Local);
        assert_eq!(
            "+05:30".parse::<Zone>().unwrap(),
            Zone::Fixed(FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap())
        );
        assert_eq!(
            "UTC-7".parse::<Zone>().unwrap(),
            Zone::Fixed(FixedOffset::west_opt(7 * 3600).unwrap())
        );
        assert!("Mars/Olympus".parse::<Zone>().is_err());
    }
}
