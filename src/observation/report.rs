//! Human-readable observation report

use std::fmt;

use nalgebra::Vector3;

use crate::constants::GIGAPARSEC_AU;
use crate::observation::Observation;

/// Significant digits used for speeds and distances
const SIGNIFICANT_DIGITS: usize = 4;

/// An observation ready to print under the name the user asked for
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub name: String,
    pub observation: Observation,
}

impl Report {
    pub fn new(name: impl Into<String>, observation: Observation) -> Self {
        Self {
            name: name.into(),
            observation,
        }
    }

    /// Motion is only worth reporting for targets closer than a gigaparsec
    pub fn shows_motion(&self) -> bool {
        self.observation.distance_au < GIGAPARSEC_AU
    }

    pub fn pointing_line(&self) -> String {
        format!(
            "To see {}, look up {}, and use a real compass to point to {} clockwise of North.",
            self.name, self.observation.altitude, self.observation.azimuth
        )
    }

    pub fn motion_line(&self) -> String {
        format!(
            "Relative to you, {} is traveling {} km/s ({} velocity) and is {} km away from you.",
            self.name,
            format_g(self.observation.speed_km_s(), SIGNIFICANT_DIGITS),
            format_vector(&self.observation.velocity_km_s),
            format_g(self.observation.distance_km(), SIGNIFICANT_DIGITS)
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pointing_line())?;
        if self.shows_motion() {
            write!(f, "\n{}", self.motion_line())?;
        }
        Ok(())
    }
}

/// Format like C's `%.{precision}g`: shortest of fixed and exponent
/// notation for that many significant digits, trailing zeros removed.
pub fn format_g(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            if exponent < 0 { '-' } else { '+' },
            exponent.abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Components rounded to two decimals, e.g. `[-12.34, 0.5, 7.0]`
fn format_vector(vector: &Vector3<f64>) -> String {
    let components: Vec<String> = vector
        .iter()
        .map(|component| {
            let rounded = (component * 100.0).round() / 100.0;
            format!("{:?}", rounded + 0.0)
        })
        .collect();
    format!("[{}]", components.join(", "))
}
