//! Tests for the jplephem module against small kernels written on the fly

use std::io::Write;

use approx::assert_relative_eq;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use tempfile::NamedTempFile;

use super::daf::{Endian, DAF};
use super::errors::JplephemError;
use super::spk::{seconds_to_jd, SPK};

const RECORD: usize = 1024;

/// One type 2 segment with a single Chebyshev record of two coefficients per axis
pub(crate) struct TestSegment {
    pub target: i32,
    pub center: i32,
    pub coefficients: [[f64; 2]; 3],
}

/// Segments cover J2000 TDB plus or minus this many seconds
pub(crate) const HALF_SPAN: f64 = 1.0e6;

/// Lay out a minimal SPK: file record, one summary record, one name record, data
pub(crate) fn write_kernel<B: ByteOrder>(locfmt: &[u8; 8], segments: &[TestSegment]) -> NamedTempFile {
    let words_per_segment = 8 + 4;
    let first_data_word = 3 * RECORD / 8 + 1;
    let mut bytes = vec![0u8; 3 * RECORD];

    bytes[0..8].copy_from_slice(b"DAF/SPK ");
    B::write_i32(&mut bytes[8..12], 2);
    B::write_i32(&mut bytes[12..16], 6);
    bytes[16..76].copy_from_slice(&[b' '; 60]);
    B::write_i32(&mut bytes[76..80], 2);
    B::write_i32(&mut bytes[80..84], 2);
    let free = first_data_word + segments.len() * words_per_segment;
    B::write_i32(&mut bytes[84..88], free as i32);
    bytes[88..96].copy_from_slice(locfmt);

    let summary = RECORD;
    B::write_f64(&mut bytes[summary..summary + 8], 0.0);
    B::write_f64(&mut bytes[summary + 8..summary + 16], 0.0);
    B::write_f64(&mut bytes[summary + 16..summary + 24], segments.len() as f64);

    for (i, segment) in segments.iter().enumerate() {
        let start_i = first_data_word + i * words_per_segment;
        let end_i = start_i + words_per_segment - 1;

        let offset = summary + 24 + i * 40;
        B::write_f64(&mut bytes[offset..offset + 8], -HALF_SPAN);
        B::write_f64(&mut bytes[offset + 8..offset + 16], HALF_SPAN);
        let ints = [segment.target, segment.center, 1, 2, start_i as i32, end_i as i32];
        for (k, value) in ints.iter().enumerate() {
            let at = offset + 16 + k * 4;
            B::write_i32(&mut bytes[at..at + 4], *value);
        }

        let name = 2 * RECORD + i * 40;
        let label = format!("{:<40}", format!("TEST-{}", segment.target));
        bytes[name..name + 40].copy_from_slice(label.as_bytes());

        let mut words = vec![0.0, HALF_SPAN];
        for axis in &segment.coefficients {
            words.extend_from_slice(axis);
        }
        words.extend_from_slice(&[-HALF_SPAN, 2.0 * HALF_SPAN, 8.0, 1.0]);
        for word in words {
            let mut buf = [0u8; 8];
            B::write_f64(&mut buf, word);
            bytes.extend_from_slice(&buf);
        }
    }

    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(&bytes).expect("write kernel");
    file.flush().expect("flush kernel");
    file
}

fn earth_system() -> Vec<TestSegment> {
    vec![
        TestSegment {
            target: 3,
            center: 0,
            coefficients: [[100.0, 50.0], [0.0, 0.0], [-7.0, 0.0]],
        },
        TestSegment {
            target: 399,
            center: 3,
            coefficients: [[1.0, 0.0], [2.0, 0.0], [3.0, 1.0e6]],
        },
    ]
}

#[test]
fn test_daf_header_and_summaries() {
    let file = write_kernel::<LittleEndian>(b"LTL-IEEE", &earth_system());
    let daf = DAF::open(file.path()).unwrap();

    assert_eq!(daf.locidw, "DAF/SPK");
    assert_eq!((daf.nd, daf.ni), (2, 6));
    assert_eq!(daf.fward, 2);
    assert_eq!(daf.endian, Endian::Little);

    let summaries = daf.summaries().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].name, "TEST-3");
    assert_eq!(summaries[1].integers[..4], [399, 3, 1, 2]);
}

#[test]
fn test_barycentric_state_sums_the_chain() {
    let file = write_kernel::<LittleEndian>(b"LTL-IEEE", &earth_system());
    let spk = SPK::open(file.path()).unwrap();

    // s = 0.5 inside the single record
    let jd = seconds_to_jd(0.5 * HALF_SPAN);
    let (position, velocity) = spk.barycentric_state(399, jd, 0.0).unwrap();

    // Julian dates near 2.45e6 carry ~40 microseconds of rounding
    assert_relative_eq!(position.x, 126.0, epsilon = 1e-6);
    assert_relative_eq!(position.y, 2.0, epsilon = 1e-6);
    assert_relative_eq!(position.z, -4.0 + 0.5e6, epsilon = 1e-3);
    assert_relative_eq!(velocity.x, 50.0 / HALF_SPAN, epsilon = 1e-15);
    assert_relative_eq!(velocity.z, 1.0, epsilon = 1e-12);
}

#[test]
fn test_big_endian_kernel() {
    let file = write_kernel::<BigEndian>(b"BIG-IEEE", &earth_system());
    let spk = SPK::open(file.path()).unwrap();
    assert_eq!(spk.daf.endian, Endian::Big);

    let segment = spk.get_segment(0, 3).unwrap();
    let position = segment.compute(&spk.daf, seconds_to_jd(0.0), 0.0).unwrap();
    assert_relative_eq!(position.x, 100.0, epsilon = 1e-9);
}

#[test]
fn test_supports_and_missing_bodies() {
    let file = write_kernel::<LittleEndian>(b"LTL-IEEE", &earth_system());
    let spk = SPK::open(file.path()).unwrap();

    assert!(spk.supports(399));
    assert!(spk.supports(3));
    assert!(spk.supports(0));
    assert!(!spk.supports(499));
    assert!(matches!(
        spk.get_segment(0, 499),
        Err(JplephemError::BodyNotFound { center: 0, target: 499 })
    ));
}

#[test]
fn test_out_of_range_date() {
    let file = write_kernel::<LittleEndian>(b"LTL-IEEE", &earth_system());
    let spk = SPK::open(file.path()).unwrap();

    let jd = seconds_to_jd(2.0 * HALF_SPAN);
    assert!(matches!(
        spk.barycentric_state(399, jd, 0.0),
        Err(JplephemError::OutOfRangeError { .. })
    ));
}

#[test]
fn test_rejects_non_daf_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[b'x'; RECORD]).unwrap();
    assert!(matches!(
        DAF::open(file.path()),
        Err(JplephemError::InvalidFormat(_))
    ));
}
