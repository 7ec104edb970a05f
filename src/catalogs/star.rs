//! Fixed stars with space motion
//!
//! A `Star` is an ICRS direction at a catalogue epoch plus proper motion,
//! parallax and radial velocity. Its barycentric position and velocity follow
//! the classic rigorous space-motion model: the parallax gives a distance,
//! the proper motion and radial velocity give a velocity, both scaled by the
//! Doppler factor for the changing light travel time.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{ASEC2RAD, AU_KM, C_KM_S, DAY_S, J2000, JULIAN_YEAR_DAYS};

/// Parallax substituted when a star has none, placing it about a gigaparsec away
pub const MINIMUM_PARALLAX_MAS: f64 = 1.0e-6;

/// A star's catalogue astrometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    /// Right ascension in degrees
    pub ra_degrees: f64,
    /// Declination in degrees
    pub dec_degrees: f64,
    /// Proper motion in right ascension, mas/yr, including the cos(dec) factor
    pub ra_mas_per_year: f64,
    /// Proper motion in declination, mas/yr
    pub dec_mas_per_year: f64,
    /// Parallax in mas
    pub parallax_mas: f64,
    /// Radial velocity in km/s
    pub radial_km_per_s: f64,
    /// Epoch of the position as a TT Julian date
    pub epoch: f64,
}

impl Star {
    /// A motionless star at J2000 with no parallax
    pub fn new(ra_degrees: f64, dec_degrees: f64) -> Self {
        Self {
            ra_degrees,
            dec_degrees,
            ra_mas_per_year: 0.0,
            dec_mas_per_year: 0.0,
            parallax_mas: 0.0,
            radial_km_per_s: 0.0,
            epoch: J2000,
        }
    }

    /// Same as `new` but with right ascension in hours
    pub fn from_hours(ra_hours: f64, dec_degrees: f64) -> Self {
        Self::new(ra_hours * 15.0, dec_degrees)
    }

    pub fn with_proper_motion(mut self, ra_mas_per_year: f64, dec_mas_per_year: f64) -> Self {
        self.ra_mas_per_year = ra_mas_per_year;
        self.dec_mas_per_year = dec_mas_per_year;
        self
    }

    pub fn with_parallax(mut self, parallax_mas: f64) -> Self {
        self.parallax_mas = parallax_mas;
        self
    }

    pub fn with_radial_velocity(mut self, radial_km_per_s: f64) -> Self {
        self.radial_km_per_s = radial_km_per_s;
        self
    }

    pub fn with_epoch(mut self, epoch_tt: f64) -> Self {
        self.epoch = epoch_tt;
        self
    }

    /// Parallax actually used for distance, never zero or negative
    pub fn effective_parallax_mas(&self) -> f64 {
        if self.parallax_mas > 0.0 {
            self.parallax_mas
        } else {
            MINIMUM_PARALLAX_MAS
        }
    }

    /// Distance from the solar system barycenter in AU
    pub fn distance_au(&self) -> f64 {
        1.0 / (self.effective_parallax_mas() * 1.0e-3 * ASEC2RAD).sin()
    }

    /// Barycentric position (AU) and velocity (AU/day) at the catalogue epoch
    pub fn position_and_velocity(&self) -> (Vector3<f64>, Vector3<f64>) {
        let parallax = self.effective_parallax_mas();
        let dist = self.distance_au();

        let (sra, cra) = self.ra_degrees.to_radians().sin_cos();
        let (sdc, cdc) = self.dec_degrees.to_radians().sin_cos();
        let position = Vector3::new(dist * cdc * cra, dist * cdc * sra, dist * sdc);

        let k = 1.0 / (1.0 - self.radial_km_per_s / C_KM_S);
        let pmr = self.ra_mas_per_year / (parallax * JULIAN_YEAR_DAYS) * k;
        let pmd = self.dec_mas_per_year / (parallax * JULIAN_YEAR_DAYS) * k;
        let rvl = self.radial_km_per_s * DAY_S / AU_KM * k;

        let velocity = Vector3::new(
            -pmr * sra - pmd * sdc * cra + rvl * cdc * cra,
            pmr * cra - pmd * sdc * sra + rvl * cdc * sra,
            pmd * cdc + rvl * sdc,
        );

        (position, velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GIGAPARSEC_AU;
    use approx::assert_relative_eq;

    #[test]
    fn test_missing_parallax_is_a_gigaparsec() {
        let star = Star::from_hours(5.919, 7.407);
        let distance = star.distance_au();
        assert!(distance > GIGAPARSEC_AU);
        assert_relative_eq!(distance, 2.062_648e14, max_relative = 1e-5);
    }

    #[test]
    fn test_parallax_distance() {
        // Proxima-like parallax of 768 mas is about 1.3 pc
        let star = Star::new(217.4, -62.7).with_parallax(768.0);
        assert_relative_eq!(star.distance_au(), 206_264.8 / 0.768, max_relative = 1e-6);
    }

    #[test]
    fn test_position_direction() {
        let star = Star::new(90.0, 0.0).with_parallax(100.0);
        let (position, velocity) = star.position_and_velocity();
        assert_relative_eq!(position.normalize().y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(velocity.norm(), 0.0);
    }

    #[test]
    fn test_radial_velocity_points_outward() {
        let star = Star::new(0.0, 0.0).with_parallax(100.0).with_radial_velocity(20.0);
        let (_, velocity) = star.position_and_velocity();
        let expected = 20.0 * DAY_S / AU_KM / (1.0 - 20.0 / C_KM_S);
        assert_relative_eq!(velocity.x, expected, max_relative = 1e-12);
        assert_relative_eq!(velocity.y, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_proper_motion_is_tangential() {
        let star = Star::new(0.0, 0.0)
            .with_parallax(1000.0)
            .with_proper_motion(1000.0, 0.0);
        let (position, velocity) = star.position_and_velocity();
        assert_relative_eq!(position.dot(&velocity), 0.0, epsilon = 1e-9);
        // 1 arcsec/yr at 1 pc is 1 AU/yr
        assert_relative_eq!(velocity.y, 1.0 / 365.25, max_relative = 1e-9);
    }
}
