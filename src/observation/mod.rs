//! Observing a resolved target from a place on Earth
//!
//! Positions are barycentric ICRS in AU and velocities in AU/day until the
//! final alt/az and km/s conversions. The pipeline is
//!
//! 1. observer = Earth (ephemeris) + topocentric offset,
//! 2. astrometric position corrected for light travel time,
//! 3. aberration from the observer's barycentric velocity,
//! 4. rotation to the true equator of date, Earth rotation and the local
//!    horizon. Refraction is not applied.

use nalgebra::Vector3;

use crate::catalogs::Star;
use crate::constants::{AU_KM, C_AUDAY, DAY_S, TAU};
use crate::coordinates::Angle;
use crate::jplephem::names::targets;
use crate::jplephem::SPK;
use crate::resolver::Target;
use crate::time::Time;
use crate::Result;

pub mod frames;
pub mod report;
pub mod topos;

pub use report::Report;
pub use topos::Topos;

/// Light-time iterations stop once the change falls below this many days
const LIGHT_TIME_TOLERANCE: f64 = 1e-12;
const MAX_LIGHT_TIME_ITERATIONS: usize = 10;

/// Convert a km, km/s state into AU, AU/day
fn state_in_au((position, velocity): (Vector3<f64>, Vector3<f64>)) -> (Vector3<f64>, Vector3<f64>) {
    (position / AU_KM, velocity * DAY_S / AU_KM)
}

/// Barycentric state of an observer at an instant
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    pub topos: Topos,
    pub time: Time,
    /// Barycentric position in AU
    pub position: Vector3<f64>,
    /// Barycentric velocity in AU/day
    pub velocity: Vector3<f64>,
}

impl Observer {
    /// Place the observer using the ephemeris' Earth
    pub fn at(ephemeris: &SPK, topos: Topos, time: Time) -> Result<Self> {
        let tdb = time.tdb();
        let (earth_position, earth_velocity) =
            state_in_au(ephemeris.barycentric_state(targets::EARTH, tdb, 0.0)?);
        let (offset, offset_velocity) = topos.gcrs_state(&time);
        Ok(Self {
            topos,
            time,
            position: earth_position + offset,
            velocity: earth_velocity + offset_velocity,
        })
    }

    /// Light-time corrected position and velocity of an ephemeris body
    /// relative to this observer, with the light time in days
    pub fn observe_body(&self, ephemeris: &SPK, code: i32) -> Result<Astrometric> {
        let tdb = self.time.tdb();
        let (mut position, mut velocity) = state_in_au(ephemeris.barycentric_state(code, tdb, 0.0)?);
        let mut light_time = (position - self.position).norm() / C_AUDAY;
        let mut previous = 0.0;

        for _ in 0..MAX_LIGHT_TIME_ITERATIONS {
            if (light_time - previous).abs() < LIGHT_TIME_TOLERANCE {
                break;
            }
            (position, velocity) = state_in_au(ephemeris.barycentric_state(code, tdb, -light_time)?);
            previous = light_time;
            light_time = (position - self.position).norm() / C_AUDAY;
        }

        Ok(Astrometric {
            position: position - self.position,
            velocity: velocity - self.velocity,
            light_time,
        })
    }

    /// Position of a star propagated from its epoch, relative to this observer
    pub fn observe_star(&self, star: &Star) -> Astrometric {
        let (position, velocity) = star.position_and_velocity();
        let light_time_difference = position.normalize().dot(&self.position) / C_AUDAY;
        let elapsed = self.time.tdb() + light_time_difference - star.epoch;

        let relative = position + velocity * elapsed - self.position;
        Astrometric {
            light_time: relative.norm() / C_AUDAY,
            position: relative,
            velocity: velocity - self.velocity,
        }
    }

    /// Observe whatever the resolver produced
    pub fn observe(&self, ephemeris: &SPK, target: &Target) -> Result<Astrometric> {
        match target {
            Target::Body { code, .. } => self.observe_body(ephemeris, *code),
            Target::Catalogued { star, .. } | Target::Synthesized { star } => {
                Ok(self.observe_star(star))
            }
        }
    }
}

/// A target's position and velocity relative to the observer
#[derive(Debug, Clone, PartialEq)]
pub struct Astrometric {
    /// AU
    pub position: Vector3<f64>,
    /// AU/day
    pub velocity: Vector3<f64>,
    /// Days
    pub light_time: f64,
}

impl Astrometric {
    /// Direction shifted by the observer's motion (special-relativistic aberration)
    pub fn apparent_position(&self, observer_velocity: &Vector3<f64>) -> Vector3<f64> {
        let vemag = observer_velocity.norm();
        if vemag == 0.0 || self.light_time == 0.0 {
            return self.position;
        }
        let p1mag = self.light_time * C_AUDAY;
        let beta = vemag / C_AUDAY;
        let cosd = self.position.dot(observer_velocity) / (p1mag * vemag);
        let gammai = (1.0 - beta * beta).sqrt();
        let p = beta * cosd;
        let q = (1.0 + p / (1.0 + gammai)) * self.light_time;
        let r = 1.0 + p;

        (self.position * gammai + observer_velocity * q) / r
    }
}

/// Altitude and azimuth of a GCRS direction for the observer
pub fn altaz(position: &Vector3<f64>, topos: &Topos, time: &Time) -> (Angle, Angle) {
    let true_of_date = frames::gcrs_to_true_of_date(time.tt()) * position;
    let earth_fixed = frames::rot_z(frames::gast(time.ut1(), time.tt())) * true_of_date;
    let enu = topos.enu_matrix() * earth_fixed;

    let altitude = enu.z.atan2(enu.x.hypot(enu.y));
    let azimuth = enu.x.atan2(enu.y).rem_euclid(TAU);
    (Angle::from_radians(altitude), Angle::from_radians(azimuth))
}

/// Everything reported about a target
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub altitude: Angle,
    pub azimuth: Angle,
    pub distance_au: f64,
    /// Target minus observer velocity in km/s
    pub velocity_km_s: Vector3<f64>,
}

impl Observation {
    pub fn from_astrometric(astrometric: &Astrometric, observer: &Observer) -> Self {
        let apparent = astrometric.apparent_position(&observer.velocity);
        let (altitude, azimuth) = altaz(&apparent, &observer.topos, &observer.time);
        Self {
            altitude,
            azimuth,
            distance_au: apparent.norm(),
            velocity_km_s: astrometric.velocity * AU_KM / DAY_S,
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_au * AU_KM
    }

    pub fn speed_km_s(&self) -> f64 {
        self.velocity_km_s.norm()
    }
}

/// Observe `target` from `topos` at `time`
pub fn observe(ephemeris: &SPK, target: &Target, topos: Topos, time: Time) -> Result<Observation> {
    let observer = Observer::at(ephemeris, topos, time)?;
    let astrometric = observer.observe(ephemeris, target)?;
    log::debug!(
        "Astrometric position {:?} AU, light time {:.6} days",
        astrometric.position,
        astrometric.light_time
    );
    Ok(Observation::from_astrometric(&astrometric, &observer))
}
