//! Standard SPICE target names and ID numbers
//!
//! Mappings between celestial body names and the NAIF integer codes used in
//! the JPL ephemerides. Lookups by name ignore case and treat underscores and
//! spaces alike, so `mars`, `MARS` and `Jupiter_Barycenter` all resolve.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Map from target ID numbers to canonical names (first listed name wins)
    static ref TARGET_NAMES: HashMap<i32, &'static str> = {
        let mut m = HashMap::new();
        for &(id, name) in TARGET_NAME_PAIRS.iter() {
            m.entry(id).or_insert(name);
        }
        m
    };

    /// Map from normalized target names to ID numbers
    static ref TARGET_IDS: HashMap<String, i32> = {
        let mut m = HashMap::new();
        for &(id, name) in TARGET_NAME_PAIRS.iter() {
            m.insert(normalize(name), id);
        }
        m
    };
}

fn normalize(name: &str) -> String {
    name.trim()
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Get the name of a target given its ID number
pub fn target_name(id: i32) -> Option<&'static str> {
    TARGET_NAMES.get(&id).copied()
}

/// Get the ID number of a target given its name
pub fn target_id(name: &str) -> Option<i32> {
    TARGET_IDS.get(&normalize(name)).copied()
}

/// Title-case a target name if it looks safe to do so
pub fn titlecase(name: &str) -> String {
    if name.starts_with(['1', 'C', 'D']) {
        name.to_string()
    } else {
        name.split(|c: char| c == '_' || c.is_whitespace())
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(c) => c
                        .to_uppercase()
                        .chain(chars.flat_map(|c| c.to_lowercase()))
                        .collect(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

/// Pairs of (id, name) for celestial bodies
const TARGET_NAME_PAIRS: &[(i32, &str)] = &[
    (0, "SOLAR_SYSTEM_BARYCENTER"),
    (0, "SSB"),
    (1, "MERCURY_BARYCENTER"),
    (2, "VENUS_BARYCENTER"),
    (3, "EARTH_BARYCENTER"),
    (3, "EMB"),
    (3, "EARTH MOON BARYCENTER"),
    (3, "EARTH-MOON BARYCENTER"),
    (4, "MARS_BARYCENTER"),
    (5, "JUPITER_BARYCENTER"),
    (6, "SATURN_BARYCENTER"),
    (7, "URANUS_BARYCENTER"),
    (8, "NEPTUNE_BARYCENTER"),
    (9, "PLUTO_BARYCENTER"),
    (10, "SUN"),
    (199, "MERCURY"),
    (299, "VENUS"),
    (399, "EARTH"),
    (301, "MOON"),
    (499, "MARS"),
    (401, "PHOBOS"),
    (402, "DEIMOS"),
    (599, "JUPITER"),
    (501, "IO"),
    (502, "EUROPA"),
    (503, "GANYMEDE"),
    (504, "CALLISTO"),
    (699, "SATURN"),
    (601, "MIMAS"),
    (602, "ENCELADUS"),
    (603, "TETHYS"),
    (604, "DIONE"),
    (605, "RHEA"),
    (606, "TITAN"),
    (607, "HYPERION"),
    (608, "IAPETUS"),
    (609, "PHOEBE"),
    (799, "URANUS"),
    (701, "ARIEL"),
    (702, "UMBRIEL"),
    (703, "TITANIA"),
    (704, "OBERON"),
    (705, "MIRANDA"),
    (899, "NEPTUNE"),
    (801, "TRITON"),
    (802, "NEREID"),
    (999, "PLUTO"),
    (901, "CHARON"),
];

/// Common target name/ID pairs used in applications
pub mod targets {
    /// Solar System Barycenter
    pub const SOLAR_SYSTEM_BARYCENTER: i32 = 0;
    /// Earth-Moon Barycenter
    pub const EARTH_MOON_BARYCENTER: i32 = 3;
    /// Sun
    pub const SUN: i32 = 10;
    /// Earth
    pub const EARTH: i32 = 399;
    /// Moon
    pub const MOON: i32 = 301;
    /// Mars
    pub const MARS: i32 = 499;
}
