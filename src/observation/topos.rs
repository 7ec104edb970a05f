//! Observer positions on the Earth's surface

use nalgebra::{Matrix3, Vector3};

use crate::constants::{AU_M, DAY_S, EARTH_ANGVEL, EARTH_RADIUS, IERS_2010_INVERSE_EARTH_FLATTENING};
use crate::observation::frames::{gast, gcrs_to_true_of_date, rot_z};
use crate::time::Time;

/// A geodetic location: latitude and longitude in degrees (east positive),
/// elevation in meters above the IERS 2010 ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Topos {
    pub latitude_degrees: f64,
    pub longitude_degrees: f64,
    pub elevation_m: f64,
}

impl Topos {
    pub fn new(latitude_degrees: f64, longitude_degrees: f64, elevation_m: f64) -> Self {
        Self {
            latitude_degrees,
            longitude_degrees,
            elevation_m,
        }
    }

    /// Earth-fixed (ITRS) position in meters
    pub fn itrs_position_m(&self) -> Vector3<f64> {
        let (sin_lat, cos_lat) = self.latitude_degrees.to_radians().sin_cos();
        let (sin_lon, cos_lon) = self.longitude_degrees.to_radians().sin_cos();

        let one_minus_f = 1.0 - 1.0 / IERS_2010_INVERSE_EARTH_FLATTENING;
        let c = 1.0 / (cos_lat * cos_lat + one_minus_f * one_minus_f * sin_lat * sin_lat).sqrt();
        let s = one_minus_f * one_minus_f * c;

        let ach = EARTH_RADIUS * c + self.elevation_m;
        let ash = EARTH_RADIUS * s + self.elevation_m;
        Vector3::new(
            ach * cos_lat * cos_lon,
            ach * cos_lat * sin_lon,
            ash * sin_lat,
        )
    }

    /// Geocentric GCRS position (AU) and velocity (AU/day) at `time`
    pub fn gcrs_state(&self, time: &Time) -> (Vector3<f64>, Vector3<f64>) {
        let earth_fixed = rot_z(gast(time.ut1(), time.tt()));
        let to_gcrs = gcrs_to_true_of_date(time.tt()).transpose();

        let true_of_date = earth_fixed.transpose() * self.itrs_position_m();
        let velocity = Vector3::z().cross(&true_of_date) * EARTH_ANGVEL;

        (
            to_gcrs * true_of_date / AU_M,
            to_gcrs * velocity * DAY_S / AU_M,
        )
    }

    /// Rows are the local east, north and up directions in Earth-fixed axes
    pub fn enu_matrix(&self) -> Matrix3<f64> {
        let (sin_lat, cos_lat) = self.latitude_degrees.to_radians().sin_cos();
        let (sin_lon, cos_lon) = self.longitude_degrees.to_radians().sin_cos();
        Matrix3::new(
            -sin_lon,
            cos_lon,
            0.0,
            -sin_lat * cos_lon,
            -sin_lat * sin_lon,
            cos_lat,
            cos_lat * cos_lon,
            cos_lat * sin_lon,
            sin_lat,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timescale;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_equator_and_pole_radii() {
        let equator = Topos::new(0.0, 0.0, 0.0).itrs_position_m();
        assert_relative_eq!(equator.x, EARTH_RADIUS, epsilon = 1e-6);

        let pole = Topos::new(90.0, 0.0, 0.0).itrs_position_m();
        let polar_radius = EARTH_RADIUS * (1.0 - 1.0 / IERS_2010_INVERSE_EARTH_FLATTENING);
        assert_relative_eq!(pole.z, polar_radius, epsilon = 1e-6);
        assert!(pole.x.abs() < 1e-6);
    }

    #[test]
    fn test_elevation_adds_along_the_normal() {
        let low = Topos::new(45.0, 10.0, 0.0).itrs_position_m();
        let high = Topos::new(45.0, 10.0, 1000.0).itrs_position_m();
        assert_relative_eq!((high - low).norm(), 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_surface_speed() {
        let ts = Timescale::default();
        let t = ts.from_datetime(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let (position, velocity) = Topos::new(0.0, 0.0, 0.0).gcrs_state(&t);

        assert_relative_eq!(position.norm() * AU_M, EARTH_RADIUS, max_relative = 1e-9);
        let speed_m_s = velocity.norm() * AU_M / DAY_S;
        assert_relative_eq!(speed_m_s, EARTH_RADIUS * EARTH_ANGVEL, max_relative = 1e-9);
        assert_relative_eq!(position.dot(&velocity), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_enu_is_orthonormal() {
        let m = Topos::new(43.660444, -79.398556, 100.0).enu_matrix();
        assert_relative_eq!(m * m.transpose(), Matrix3::identity(), epsilon = 1e-12);
    }
}
