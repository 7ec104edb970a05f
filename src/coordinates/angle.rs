//! # Angle Representation Module
//!
//! `Angle` keeps the value in the unit it was given (degrees, hours or
//! radians) and converts only on request. Hours matter here because right
//! ascension scraped from an infobox arrives as `7h 45m 18.9s` and should
//! round-trip without passing through radians first.
//!
//! ```rust
//! use skygazr::coordinates::angle::Angle;
//!
//! let alt = Angle::from_degrees(21.823_7);
//! assert_eq!(alt.dstr(1), "21deg 49' 25.3\"");
//!
//! let ra = Angle::from_hours(6.0);
//! assert_eq!(ra.to_degrees(), 90.0);
//! ```

use std::f64::consts::PI;
use std::fmt;

/// Internal representation format for angle values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleFormat {
    /// Angle stored in degrees
    Degrees(f64),
    /// Angle stored in hours (15 degrees per hour)
    Hours(f64),
    /// Angle stored in radians
    Radians(f64),
}

/// An angular measurement that remembers the unit it was created in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle {
    angle: AngleFormat,
}

impl Angle {
    /// Creates an angle from a value in degrees
    pub fn from_degrees(degrees: f64) -> Self {
        Angle {
            angle: AngleFormat::Degrees(degrees),
        }
    }

    /// Creates an angle from a value in hours of right ascension
    pub fn from_hours(hours: f64) -> Self {
        Angle {
            angle: AngleFormat::Hours(hours),
        }
    }

    /// Creates an angle from a value in radians
    pub fn from_radians(radians: f64) -> Self {
        Angle {
            angle: AngleFormat::Radians(radians),
        }
    }

    /// Returns the angle value in degrees
    pub fn to_degrees(&self) -> f64 {
        match self.angle {
            AngleFormat::Degrees(deg) => deg,
            AngleFormat::Hours(hours) => hours * 15.0,
            AngleFormat::Radians(rad) => rad * (180.0 / PI),
        }
    }

    /// Returns the angle value in hours
    pub fn to_hours(&self) -> f64 {
        match self.angle {
            AngleFormat::Hours(hours) => hours,
            _ => self.to_degrees() / 15.0,
        }
    }

    /// Returns the angle value in radians
    pub fn to_radians(&self) -> f64 {
        match self.angle {
            AngleFormat::Degrees(deg) => deg * (PI / 180.0),
            AngleFormat::Hours(hours) => hours * (PI / 12.0),
            AngleFormat::Radians(rad) => rad,
        }
    }

    /// Returns the internal format of this angle
    pub fn format(&self) -> AngleFormat {
        self.angle
    }

    /// Format as signed degrees, arcminutes and arcseconds, e.g. `-5deg 03' 07.2"`
    pub fn dstr(&self, places: usize) -> String {
        let (negative, whole, minutes, seconds) = sexagesimal(self.to_degrees(), places);
        format!(
            "{}{}deg {:02}' {}\"",
            if negative { "-" } else { "" },
            whole,
            minutes,
            seconds
        )
    }

    /// Format as hours, minutes and seconds, e.g. `07h 45m 18.90s`
    pub fn hstr(&self, places: usize) -> String {
        let (negative, whole, minutes, seconds) = sexagesimal(self.to_hours(), places);
        format!(
            "{}{:02}h {:02}m {}s",
            if negative { "-" } else { "" },
            whole,
            minutes,
            seconds
        )
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.angle {
            AngleFormat::Hours(_) => write!(f, "{}", self.hstr(2)),
            _ => write!(f, "{}", self.dstr(1)),
        }
    }
}

/// Split a value into sign, whole units, minutes and a zero-padded seconds string.
///
/// Rounding happens once on the total number of fractional seconds so that
/// 59.96" with one place carries into the minutes instead of printing `60.0`.
fn sexagesimal(value: f64, places: usize) -> (bool, u64, u64, String) {
    let scale = 10f64.powi(places as i32);
    let total = (value.abs() * 3600.0 * scale).round() as u64;
    let scale = scale as u64;

    let fraction = total % scale;
    let seconds = (total / scale) % 60;
    let minutes = (total / scale / 60) % 60;
    let whole = total / scale / 3600;

    let seconds = if places == 0 {
        format!("{:02}", seconds)
    } else {
        format!("{:02}.{:0width$}", seconds, fraction, width = places)
    };
    (value < 0.0 && total > 0, whole, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_from_degrees_exact_storage() {
        let angle = Angle::from_degrees(45.0);
        assert_eq!(angle.to_degrees(), 45.0);

        match angle.format() {
            AngleFormat::Degrees(val) => assert_eq!(val, 45.0),
            other => panic!("Expected degrees format, got {:?}", other),
        }
    }

    #[test]
    fn test_hours_conversions() {
        let angle = Angle::from_hours(6.0);
        assert_eq!(angle.to_degrees(), 90.0);
        assert_eq!(angle.to_hours(), 6.0);
        assert_relative_eq!(angle.to_radians(), PI / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_radian_to_degree_conversion() {
        let angle = Angle::from_radians(PI);
        assert!((angle.to_degrees() - 180.0).abs() < 1e-13);
        assert!((angle.to_hours() - 12.0).abs() < 1e-13);
    }

    #[test]
    fn test_dstr() {
        assert_eq!(Angle::from_degrees(12.5824).dstr(1), "12deg 34' 56.6\"");
        assert_eq!(Angle::from_degrees(-5.052).dstr(1), "-5deg 03' 07.2\"");
        assert_eq!(Angle::from_degrees(0.0).dstr(1), "0deg 00' 00.0\"");
    }

    #[test]
    fn test_dstr_carries_rounded_seconds() {
        // 59.96 arcseconds rounds up into the next arcminute
        let angle = Angle::from_degrees(10.0 + 59.96 / 3600.0);
        assert_eq!(angle.dstr(1), "10deg 01' 00.0\"");
    }

    #[test]
    fn test_hstr() {
        let ra = Angle::from_hours(7.0 + 45.0 / 60.0 + 18.9 / 3600.0);
        assert_eq!(ra.hstr(2), "07h 45m 18.90s");
        assert_eq!(ra.to_string(), "07h 45m 18.90s");
    }

    #[test]
    fn test_tiny_negative_is_not_signed() {
        assert_eq!(Angle::from_degrees(-1e-9).dstr(1), "0deg 00' 00.0\"");
    }
}
