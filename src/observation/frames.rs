//! Precession, nutation and Earth rotation
//!
//! Rotations between the GCRS (J2000 mean equator, frame bias neglected) and
//! the true equator and equinox of date, plus Greenwich sidereal time.
//! Precession follows IAU 2006 (Capitaine et al. 2003); nutation is the
//! leading part of the IAU 2000B series, good to about 0.1 arcsec.

use nalgebra::Matrix3;

use crate::constants::{ASEC2RAD, J2000, JULIAN_CENTURY_DAYS, TAU};

/// Mean obliquity of the ecliptic at J2000 in arcseconds (IAU 2006)
const OBLIQUITY_J2000_ASEC: f64 = 84381.406;

/// Largest IAU 2000B lunisolar terms.
///
/// Each row: multipliers of (l, l', F, D, Om), then the longitude amplitude
/// and its rate, then the obliquity amplitude and its rate, all in 0.1 uas.
#[rustfmt::skip]
const NUTATION_TERMS: [[f64; 9]; 20] = [
    [ 0.0,  0.0, 0.0,  0.0, 1.0, -172064161.0, -174666.0, 92052331.0,  9086.0],
    [ 0.0,  0.0, 2.0, -2.0, 2.0,  -13170906.0,   -1675.0,  5730336.0, -3015.0],
    [ 0.0,  0.0, 2.0,  0.0, 2.0,   -2276413.0,    -234.0,   978459.0,  -485.0],
    [ 0.0,  0.0, 0.0,  0.0, 2.0,    2074554.0,     207.0,  -897492.0,   470.0],
    [ 0.0,  1.0, 0.0,  0.0, 0.0,    1475877.0,   -3633.0,    73871.0,  -184.0],
    [ 0.0,  1.0, 2.0, -2.0, 2.0,    -516821.0,    1226.0,   224386.0,  -677.0],
    [ 1.0,  0.0, 0.0,  0.0, 0.0,     711159.0,      73.0,    -6750.0,     0.0],
    [ 0.0,  0.0, 2.0,  0.0, 1.0,    -387298.0,    -367.0,   200728.0,    18.0],
    [ 1.0,  0.0, 2.0,  0.0, 2.0,    -301461.0,     -36.0,   129025.0,   -63.0],
    [ 0.0, -1.0, 2.0, -2.0, 2.0,     215829.0,    -494.0,   -95929.0,   299.0],
    [ 0.0,  0.0, 2.0, -2.0, 1.0,     128227.0,     137.0,   -68982.0,    -9.0],
    [-1.0,  0.0, 2.0,  0.0, 2.0,     123457.0,      11.0,   -53311.0,    32.0],
    [-1.0,  0.0, 0.0,  2.0, 0.0,     156994.0,      10.0,    -1235.0,     0.0],
    [ 1.0,  0.0, 0.0,  0.0, 1.0,      63110.0,      63.0,   -33228.0,     0.0],
    [-1.0,  0.0, 0.0,  0.0, 1.0,     -57976.0,     -63.0,    31429.0,     0.0],
    [-1.0,  0.0, 2.0,  2.0, 2.0,     -59641.0,     -11.0,    25543.0,   -11.0],
    [ 1.0,  0.0, 2.0,  0.0, 1.0,     -51613.0,     -42.0,    26366.0,     0.0],
    [-2.0,  0.0, 2.0,  0.0, 1.0,      45893.0,      50.0,   -24236.0,   -10.0],
    [ 0.0,  0.0, 0.0,  2.0, 0.0,      63384.0,      11.0,    -1220.0,     0.0],
    [ 0.0,  0.0, 2.0,  2.0, 2.0,     -38571.0,      -1.0,    16452.0,   -11.0],
];

/// Julian centuries since J2000.0
pub fn centuries(jd: f64) -> f64 {
    (jd - J2000) / JULIAN_CENTURY_DAYS
}

/// Rotation of the coordinate frame about the x axis
pub fn rot_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// Rotation of the coordinate frame about the z axis
pub fn rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Mean obliquity of the ecliptic of date in radians
pub fn mean_obliquity(t: f64) -> f64 {
    let arcsec = OBLIQUITY_J2000_ASEC
        + t * (-46.836769 + t * (-0.0001831 + t * (0.00200340 + t * (-0.000000576 - t * 0.0000000434))));
    arcsec * ASEC2RAD
}

/// Matrix taking GCRS vectors to the mean equator and equinox of date
pub fn precession_matrix(t: f64) -> Matrix3<f64> {
    let psi_a = t * (5038.481507 + t * (-1.0790069 + t * (-0.00114045 + t * (0.000132851 - t * 0.0000000951))));
    let omega_a = OBLIQUITY_J2000_ASEC
        + t * (-0.025754 + t * (0.0512623 + t * (-0.00772503 + t * (-0.000000467 + t * 0.0000003337))));
    let chi_a = t * (10.556403 + t * (-2.3814292 + t * (-0.00121197 + t * (0.000170663 - t * 0.0000000560))));

    rot_z(chi_a * ASEC2RAD)
        * rot_x(-omega_a * ASEC2RAD)
        * rot_z(-psi_a * ASEC2RAD)
        * rot_x(OBLIQUITY_J2000_ASEC * ASEC2RAD)
}

/// Delaunay arguments (l, l', F, D, Om) in radians
fn fundamental_arguments(t: f64) -> [f64; 5] {
    let arcsec = [
        485868.249036 + t * (1717915923.2178 + t * (31.8792 + t * (0.051635 - t * 0.00024470))),
        1287104.79305 + t * (129596581.0481 + t * (-0.5532 + t * (0.000136 - t * 0.00001149))),
        335779.526232 + t * (1739527262.8478 + t * (-12.7512 + t * (-0.001037 + t * 0.00000417))),
        1072260.70369 + t * (1602961601.2090 + t * (-6.3706 + t * (0.006593 - t * 0.00003169))),
        450160.398036 + t * (-6962890.5431 + t * (7.4722 + t * (0.007702 - t * 0.00005939))),
    ];
    arcsec.map(|a| (a * ASEC2RAD) % TAU)
}

/// Nutation in longitude and obliquity, radians
pub fn nutation(t: f64) -> (f64, f64) {
    let args = fundamental_arguments(t);
    let (dpsi, deps) = NUTATION_TERMS.iter().fold((0.0, 0.0), |(dpsi, deps), row| {
        let arg: f64 = row[..5].iter().zip(&args).map(|(n, a)| n * a).sum();
        (
            dpsi + (row[5] + row[6] * t) * arg.sin(),
            deps + (row[7] + row[8] * t) * arg.cos(),
        )
    });
    (dpsi * 1e-7 * ASEC2RAD, deps * 1e-7 * ASEC2RAD)
}

/// Matrix taking mean-of-date vectors to the true equator and equinox of date
pub fn nutation_matrix(t: f64) -> Matrix3<f64> {
    let eps_a = mean_obliquity(t);
    let (dpsi, deps) = nutation(t);
    rot_x(-(eps_a + deps)) * rot_z(-dpsi) * rot_x(eps_a)
}

/// Earth rotation angle in radians for a UT1 Julian date
pub fn earth_rotation_angle(jd_ut1: f64) -> f64 {
    let du = jd_ut1 - J2000;
    (TAU * (0.779_057_273_264_0 + 0.002_737_811_911_354_48 * du + du.fract())).rem_euclid(TAU)
}

/// Greenwich mean sidereal time in radians
pub fn gmst(jd_ut1: f64, jd_tt: f64) -> f64 {
    let t = centuries(jd_tt);
    let poly = 0.014506
        + t * (4612.156534 + t * (1.3915817 + t * (-0.00000044 + t * (-0.000029956 - t * 0.0000000368))));
    (earth_rotation_angle(jd_ut1) + poly * ASEC2RAD).rem_euclid(TAU)
}

/// Greenwich apparent sidereal time in radians
pub fn gast(jd_ut1: f64, jd_tt: f64) -> f64 {
    let t = centuries(jd_tt);
    let (dpsi, _) = nutation(t);
    (gmst(jd_ut1, jd_tt) + dpsi * mean_obliquity(t).cos()).rem_euclid(TAU)
}

/// Matrix taking GCRS vectors to the true equator and equinox of date
pub fn gcrs_to_true_of_date(jd_tt: f64) -> Matrix3<f64> {
    let t = centuries(jd_tt);
    nutation_matrix(t) * precession_matrix(t)
}
