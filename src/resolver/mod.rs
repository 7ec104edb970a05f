//! Target name resolution
//!
//! A name is tried, in order, as
//!
//! 1. a body the loaded ephemeris can place (`mars`, `Jupiter Barycenter`),
//! 2. an explicit Hipparcos reference (`HIP 27989`),
//! 3. an encyclopedia article whose infobox carries a HIP number or
//!    right ascension and declination.
//!
//! The catalogue and the encyclopedia are only touched when an earlier step
//! has not already answered.

use crate::catalogs::{Star, StarLookup};
use crate::coordinates::AstrometricCoordinate;
use crate::encyclopedia::{self, Encyclopedia, InfoboxExtraction};
use crate::jplephem::{names, SPK};
use crate::{Result, SkygazrError};

const HIP_PREFIX: &str = "HIP";

/// Right ascension in whichever unit the source gave it
#[derive(Debug, Clone, PartialEq)]
pub enum RightAscension {
    Hours(AstrometricCoordinate),
    Degrees(AstrometricCoordinate),
    Absent,
}

impl RightAscension {
    /// Decimal degrees, or `None` if absent
    pub fn to_degrees(&self) -> Option<f64> {
        match self {
            RightAscension::Hours(hours) => hours.to_decimal().map(|h| h * 15.0),
            RightAscension::Degrees(degrees) => degrees.to_decimal(),
            RightAscension::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RightAscension::Absent)
    }
}

/// What the encyclopedia knows about one body or system component
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub label: String,
    pub hip: Option<u32>,
    pub right_ascension: RightAscension,
    pub declination: Option<AstrometricCoordinate>,
}

impl EntityRecord {
    /// A motionless star at the recorded position, if both coordinates are known
    pub fn to_star(&self) -> Option<Star> {
        let dec = self.declination.as_ref()?.to_decimal()?;
        match &self.right_ascension {
            RightAscension::Hours(hours) => Some(Star::from_hours(hours.to_decimal()?, dec)),
            RightAscension::Degrees(degrees) => Some(Star::new(degrees.to_decimal()?, dec)),
            RightAscension::Absent => None,
        }
    }
}

/// The outcome of resolving a name
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// A body in the ephemeris, by NAIF code
    Body { name: String, code: i32 },
    /// A Hipparcos star
    Catalogued { hip: u32, star: Star },
    /// A star built from scraped coordinates
    Synthesized { star: Star },
}

impl Target {
    pub fn star(&self) -> Option<&Star> {
        match self {
            Target::Body { .. } => None,
            Target::Catalogued { star, .. } | Target::Synthesized { star } => Some(star),
        }
    }
}

/// Name lookup into whatever ephemeris is loaded
pub trait BodyIndex {
    /// NAIF code for `name`, if the ephemeris can place that body
    fn body_code(&self, name: &str) -> Option<i32>;
}

impl BodyIndex for SPK {
    fn body_code(&self, name: &str) -> Option<i32> {
        names::target_id(name).filter(|&code| self.supports(code))
    }
}

/// HIP number of an explicit `HIP <digits>` reference
pub fn hip_literal(name: &str) -> Option<u32> {
    if !name.contains(HIP_PREFIX) {
        return None;
    }
    let number = name.replace(HIP_PREFIX, "");
    let number = number.trim();
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

/// Choose one entity from an infobox extraction.
///
/// An entity labelled exactly `name` wins. Otherwise the first one on the
/// page is used, which for a multi-star system queried by its common name
/// is simply whichever component the article lists first. Every field is
/// read from that one entity.
pub fn select_entity(extraction: &InfoboxExtraction, name: &str) -> Option<EntityRecord> {
    let labels = extraction.labels();
    let label = if labels.contains(&name) {
        name
    } else {
        let first = *labels.first()?;
        if labels.len() > 1 {
            log::warn!(
                "{} has components {:?}; using the first, {}",
                name,
                labels,
                first
            );
        }
        first
    };

    let hip = extraction.ids.get(label).copied();
    let hours = extraction.ra_hours.get(label).cloned().flatten();
    let degrees = extraction.ra_degrees.get(label).cloned().flatten();
    let right_ascension = match (hours, degrees) {
        (Some(hours), _) => RightAscension::Hours(hours),
        (None, Some(degrees)) => RightAscension::Degrees(degrees),
        (None, None) => RightAscension::Absent,
    };
    let declination = extraction.decs.get(label).cloned().flatten();

    Some(EntityRecord {
        label: label.to_string(),
        hip,
        right_ascension,
        declination,
    })
}

/// Resolves names against an ephemeris, a star catalogue and an encyclopedia
pub struct Resolver<'a> {
    bodies: &'a dyn BodyIndex,
    stars: &'a dyn StarLookup,
    encyclopedia: &'a dyn Encyclopedia,
}

impl<'a> Resolver<'a> {
    pub fn new(
        bodies: &'a dyn BodyIndex,
        stars: &'a dyn StarLookup,
        encyclopedia: &'a dyn Encyclopedia,
    ) -> Self {
        Self {
            bodies,
            stars,
            encyclopedia,
        }
    }

    pub fn resolve(&self, name: &str) -> Result<Target> {
        if let Some(code) = self.bodies.body_code(name) {
            log::debug!("{} is ephemeris body {}", name, code);
            return Ok(Target::Body {
                name: name.to_string(),
                code,
            });
        }

        if let Some(hip) = hip_literal(name) {
            log::debug!("{} is a Hipparcos reference", name);
            let star = self.stars.star_by_hip(hip)?;
            return Ok(Target::Catalogued { hip, star });
        }

        let html = self.encyclopedia.page_html(name)?;
        let extraction = encyclopedia::extract(&html, name);
        if extraction.is_empty() {
            return Err(SkygazrError::TargetNotFound(format!(
                "no astrometry found for {}",
                name
            )));
        }

        let record = select_entity(&extraction, name)
            .ok_or_else(|| SkygazrError::TargetNotFound(name.to_string()))?;
        log::debug!("Resolved {} through the encyclopedia: {:?}", name, record);

        if let Some(hip) = record.hip {
            let star = self.stars.star_by_hip(hip)?;
            return Ok(Target::Catalogued { hip, star });
        }

        record
            .to_star()
            .map(|star| Target::Synthesized { star })
            .ok_or_else(|| {
                SkygazrError::TargetNotFound(format!(
                    "{} has no catalogue number and no complete position",
                    name
                ))
            })
    }
}
