//! Spacecraft Planet Kernel (SPK) format handling
//!
//! This module provides functionality for reading NASA SPICE SPK files which
//! contain position and velocity data for solar system bodies.
//!
//! The SPK format is described in:
//! http://naif.jpl.nasa.gov/pub/naif/toolkit_docs/FORTRAN/req/spk.html
//!
//! Only the Chebyshev segment types used by the JPL planetary ephemerides are
//! evaluated: type 2 (position series, velocity by differentiation) and type 3
//! (separate position and velocity series).

use std::collections::HashMap;
use std::path::Path;

use nalgebra::Vector3;

use crate::jplephem::chebyshev::{evaluate, evaluate_with_derivative, normalize_time};
use crate::jplephem::daf::DAF;
use crate::jplephem::errors::{JplephemError, Result};
use crate::jplephem::names;

/// J2000 epoch as Julian date
const T0: f64 = 2451545.0;
/// Seconds per day
const S_PER_DAY: f64 = 86400.0;
/// Guard against malformed kernels whose center links form a loop
const MAX_CHAIN_LENGTH: usize = 16;

/// Convert seconds since J2000 to Julian date
pub fn seconds_to_jd(seconds: f64) -> f64 {
    T0 + seconds / S_PER_DAY
}

/// Convert Julian date to seconds since J2000
pub fn jd_to_seconds(jd: f64) -> f64 {
    (jd - T0) * S_PER_DAY
}

/// Position (km) and velocity (km/s) relative to a segment's center
pub type State = (Vector3<f64>, Vector3<f64>);

/// Spacecraft Planet Kernel (SPK) file reader
pub struct SPK {
    /// The underlying DAF file
    pub daf: DAF,
    /// List of segments in the file
    pub segments: Vec<Segment>,
    /// Segment indices by target body, in file order
    by_target: HashMap<i32, Vec<usize>>,
}

/// A segment in an SPK file containing position data for a specific body
#[derive(Debug, Clone)]
pub struct Segment {
    /// Source of the segment (e.g., "DE-0421LE-0421")
    pub source: String,
    /// Initial epoch in seconds since J2000
    pub start_second: f64,
    /// Final epoch in seconds since J2000
    pub end_second: f64,
    /// Target body ID
    pub target: i32,
    /// Center body ID
    pub center: i32,
    /// Reference frame ID
    pub frame: i32,
    /// Data type (2: position only, 3: position and velocity)
    pub data_type: i32,
    /// Start word address in the file
    pub start_i: usize,
    /// End word address in the file
    pub end_i: usize,
    /// Start Julian date
    pub start_jd: f64,
    /// End Julian date
    pub end_jd: f64,
}

impl SPK {
    /// Open an SPK file at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let daf = DAF::open(path)?;
        if daf.locidw != "DAF/SPK" && daf.locidw != "NAIF/DAF" {
            return Err(JplephemError::InvalidFormat(format!(
                "{} is a {} file, not an SPK kernel",
                daf.path.display(),
                daf.locidw
            )));
        }
        if daf.nd != 2 || daf.ni != 6 {
            return Err(JplephemError::InvalidFormat(format!(
                "SPK summaries need nd=2, ni=6; found nd={}, ni={}",
                daf.nd, daf.ni
            )));
        }

        let mut segments = Vec::new();
        let mut by_target: HashMap<i32, Vec<usize>> = HashMap::new();

        for summary in daf.summaries()? {
            let (start_second, end_second) = (summary.doubles[0], summary.doubles[1]);
            let ints = &summary.integers;
            let segment = Segment {
                source: summary.name,
                start_second,
                end_second,
                target: ints[0],
                center: ints[1],
                frame: ints[2],
                data_type: ints[3],
                start_i: ints[4].max(0) as usize,
                end_i: ints[5].max(0) as usize,
                start_jd: seconds_to_jd(start_second),
                end_jd: seconds_to_jd(end_second),
            };
            log::debug!("SPK segment {}", segment);

            by_target
                .entry(segment.target)
                .or_default()
                .push(segments.len());
            segments.push(segment);
        }

        Ok(SPK {
            daf,
            segments,
            by_target,
        })
    }

    /// Return the segment for the given center and target body IDs
    pub fn get_segment(&self, center: i32, target: i32) -> Result<&Segment> {
        self.by_target
            .get(&target)
            .and_then(|indices| {
                indices
                    .iter()
                    .map(|&i| &self.segments[i])
                    .find(|segment| segment.center == center)
            })
            .ok_or(JplephemError::BodyNotFound { center, target })
    }

    /// Whether the kernel can chain this body back to the solar system barycenter
    pub fn supports(&self, code: i32) -> bool {
        let mut code = code;
        for _ in 0..MAX_CHAIN_LENGTH {
            if code == 0 {
                return true;
            }
            match self.by_target.get(&code).and_then(|indices| indices.first()) {
                Some(&i) => code = self.segments[i].center,
                None => return false,
            }
        }
        false
    }

    /// Segment for `target` covering the given time; later segments take precedence
    fn segment_covering(&self, target: i32, jd: f64) -> Result<&Segment> {
        let indices = self
            .by_target
            .get(&target)
            .ok_or(JplephemError::NoPathToBarycenter(target))?;
        let seconds = jd_to_seconds(jd);

        indices
            .iter()
            .rev()
            .map(|&i| &self.segments[i])
            .find(|segment| segment.covers(seconds))
            .ok_or_else(|| {
                let first = &self.segments[indices[0]];
                JplephemError::OutOfRangeError {
                    jd,
                    start_jd: first.start_jd,
                    end_jd: first.end_jd,
                }
            })
    }

    /// Position (km) and velocity (km/s) of a body relative to the solar
    /// system barycenter, summed along the chain of segment centers.
    pub fn barycentric_state(&self, code: i32, tdb: f64, tdb2: f64) -> Result<State> {
        let mut position = Vector3::zeros();
        let mut velocity = Vector3::zeros();
        let mut code = code;

        for _ in 0..MAX_CHAIN_LENGTH {
            if code == 0 {
                return Ok((position, velocity));
            }
            let segment = self.segment_covering(code, tdb + tdb2)?;
            let (p, v) = segment.compute_and_differentiate(&self.daf, tdb, tdb2)?;
            position += p;
            velocity += v;
            code = segment.center;
        }

        Err(JplephemError::NoPathToBarycenter(code))
    }
}

impl Segment {
    fn covers(&self, seconds: f64) -> bool {
        self.start_second <= seconds && seconds <= self.end_second
    }

    /// Compute position (km) at the given TDB Julian date split as `tdb + tdb2`
    pub fn compute(&self, daf: &DAF, tdb: f64, tdb2: f64) -> Result<Vector3<f64>> {
        self.compute_and_differentiate(daf, tdb, tdb2)
            .map(|(position, _)| position)
    }

    /// Compute position (km) and velocity (km/s) at the given TDB Julian date
    pub fn compute_and_differentiate(&self, daf: &DAF, tdb: f64, tdb2: f64) -> Result<State> {
        let et = jd_to_seconds(tdb) + tdb2 * S_PER_DAY;
        if !self.covers(et) {
            return Err(JplephemError::OutOfRangeError {
                jd: tdb + tdb2,
                start_jd: self.start_jd,
                end_jd: self.end_jd,
            });
        }

        let components = match self.data_type {
            2 => 3,
            3 => 6,
            other => return Err(JplephemError::UnsupportedDataType(other)),
        };

        // Directory at the end of the segment: INIT, INTLEN, RSIZE, N
        if self.end_i < self.start_i + 4 {
            return Err(JplephemError::InvalidFormat(format!(
                "segment for body {} is too short",
                self.target
            )));
        }
        let directory = daf.read_array(self.end_i - 3, self.end_i)?;
        let (init, intlen) = (directory[0], directory[1]);
        let (rsize, n_records) = (directory[2] as usize, directory[3] as usize);

        if intlen <= 0.0 || n_records == 0 || rsize < 2 + components || (rsize - 2) % components != 0
        {
            return Err(JplephemError::InvalidFormat(format!(
                "bad segment directory: intlen={}, rsize={}, n={}",
                intlen, rsize, n_records
            )));
        }
        let n_coeffs = (rsize - 2) / components;

        let index = (((et - init) / intlen).floor().max(0.0) as usize).min(n_records - 1);
        let record_start = self.start_i + index * rsize;
        let record = daf.read_array(record_start, record_start + rsize - 1)?;

        let (mid, radius) = (record[0], record[1]);
        let s = normalize_time(et, mid, radius)?;
        let series = |k: usize| &record[2 + k * n_coeffs..2 + (k + 1) * n_coeffs];

        let mut position = Vector3::zeros();
        let mut velocity = Vector3::zeros();
        for axis in 0..3 {
            let (value, derivative) = evaluate_with_derivative(series(axis), s);
            position[axis] = value;
            velocity[axis] = if components == 6 {
                evaluate(series(axis + 3), s)
            } else {
                derivative / radius
            };
        }

        Ok((position, velocity))
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let center = names::target_name(self.center).unwrap_or("UNKNOWN");
        let target = names::target_name(self.target).unwrap_or("UNKNOWN");
        write!(
            f,
            "{:.1}..{:.1}  Type {}  {} ({}) -> {} ({})",
            self.start_jd,
            self.end_jd,
            self.data_type,
            names::titlecase(center),
            self.center,
            names::titlecase(target),
            self.target
        )
    }
}
