//! Chebyshev polynomial evaluation for ephemeris interpolation
//!
//! SPK type 2 and 3 records store each coordinate as a Chebyshev series over
//! a normalized time `s` in `[-1, 1]`.

use crate::jplephem::errors::{JplephemError, Result};

/// Evaluate `Σ c_k T_k(s)` and its derivative with respect to `s`.
///
/// Uses the forward recurrences `T_k = 2s T_{k-1} - T_{k-2}` and
/// `T'_k = 2 T_{k-1} + 2s T'_{k-1} - T'_{k-2}`.
pub fn evaluate_with_derivative(coefficients: &[f64], s: f64) -> (f64, f64) {
    let mut value = 0.0;
    let mut derivative = 0.0;

    let (mut t_prev, mut t_curr) = (0.0, 1.0);
    let (mut d_prev, mut d_curr) = (0.0, 0.0);

    for (k, &c) in coefficients.iter().enumerate() {
        if k == 1 {
            (t_prev, t_curr) = (t_curr, s);
            (d_prev, d_curr) = (d_curr, 1.0);
        } else if k > 1 {
            let t_next = 2.0 * s * t_curr - t_prev;
            let d_next = 2.0 * t_curr + 2.0 * s * d_curr - d_prev;
            (t_prev, t_curr) = (t_curr, t_next);
            (d_prev, d_curr) = (d_curr, d_next);
        }
        value += c * t_curr;
        derivative += c * d_curr;
    }

    (value, derivative)
}

/// Evaluate `Σ c_k T_k(s)` only
pub fn evaluate(coefficients: &[f64], s: f64) -> f64 {
    evaluate_with_derivative(coefficients, s).0
}

/// Map a time onto the `[-1, 1]` interval of a record
pub fn normalize_time(time: f64, midpoint: f64, radius: f64) -> Result<f64> {
    if radius <= 0.0 {
        return Err(JplephemError::InvalidFormat(format!(
            "record radius must be positive, got {}",
            radius
        )));
    }
    // A time exactly on a record boundary may land a hair outside [-1, 1]
    Ok(((time - midpoint) / radius).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_low_order_polynomials() {
        // T0 = 1, T1 = s, T2 = 2s^2 - 1, T3 = 4s^3 - 3s
        let s: f64 = 0.3;
        assert_relative_eq!(evaluate(&[2.0], s), 2.0);
        assert_relative_eq!(evaluate(&[0.0, 1.0], s), s);
        assert_relative_eq!(evaluate(&[0.0, 0.0, 1.0], s), 2.0 * s * s - 1.0);
        assert_relative_eq!(
            evaluate(&[0.0, 0.0, 0.0, 1.0], s),
            4.0 * s.powi(3) - 3.0 * s,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_derivatives() {
        let s: f64 = -0.7;
        let (_, d) = evaluate_with_derivative(&[5.0, 2.0, 3.0, 1.0], s);
        // d/ds [5 + 2s + 3(2s^2 - 1) + (4s^3 - 3s)] = 2 + 12s + 12s^2 - 3
        let expected = 2.0 + 12.0 * s + 12.0 * s * s - 3.0;
        assert_relative_eq!(d, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(evaluate_with_derivative(&[], 0.5), (0.0, 0.0));
    }

    #[test]
    fn test_normalize_time() {
        assert_relative_eq!(normalize_time(150.0, 100.0, 100.0).unwrap(), 0.5);
        assert_relative_eq!(normalize_time(200.0 + 1e-9, 100.0, 100.0).unwrap(), 1.0);
        assert!(normalize_time(0.0, 0.0, 0.0).is_err());
    }
}
