//! Hipparcos star catalog implementation
//!
//! Reads the pipe-separated `hip_main.dat` published by CDS (catalogue
//! I/239), optionally gzip-compressed.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use super::{Star, StarCatalog, StarLookup};
use crate::{Result, SkygazrError};

/// Hipparcos catalogue epoch J1991.25 as a TT Julian date
pub const HIPPARCOS_EPOCH: f64 = 2_448_349.0625;

// Field positions in hip_main.dat
const FIELD_HIP: usize = 1;
const FIELD_VMAG: usize = 5;
const FIELD_RA: usize = 8;
const FIELD_DEC: usize = 9;
const FIELD_PARALLAX: usize = 11;
const FIELD_PM_RA: usize = 12;
const FIELD_PM_DEC: usize = 13;

/// Struct representing an entry in the Hipparcos catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HipparcosEntry {
    /// Hipparcos identifier
    pub hip: u32,
    /// Right ascension in degrees (ICRS, epoch J1991.25)
    pub ra: f64,
    /// Declination in degrees (ICRS, epoch J1991.25)
    pub dec: f64,
    /// Visual magnitude
    pub mag: Option<f64>,
    /// Proper motion in RA (mas/year)
    pub pm_ra: Option<f64>,
    /// Proper motion in declination (mas/year)
    pub pm_dec: Option<f64>,
    /// Parallax (mas)
    pub parallax: Option<f64>,
}

impl HipparcosEntry {
    /// Parse one catalogue row; rows without a HIP number or position yield `None`
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split('|').collect();
        let field = |index: usize| {
            fields
                .get(index)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
        };
        let number = |index: usize| field(index).and_then(|s| s.parse::<f64>().ok());

        Some(Self {
            hip: field(FIELD_HIP)?.parse().ok()?,
            ra: number(FIELD_RA)?,
            dec: number(FIELD_DEC)?,
            mag: number(FIELD_VMAG),
            pm_ra: number(FIELD_PM_RA),
            pm_dec: number(FIELD_PM_DEC),
            parallax: number(FIELD_PARALLAX),
        })
    }

    /// Convert to a `Star` at the Hipparcos epoch; missing values become zero
    pub fn to_star(&self) -> Star {
        Star::new(self.ra, self.dec)
            .with_proper_motion(self.pm_ra.unwrap_or(0.0), self.pm_dec.unwrap_or(0.0))
            .with_parallax(self.parallax.unwrap_or(0.0))
            .with_epoch(HIPPARCOS_EPOCH)
    }
}

/// Hipparcos catalog
#[derive(Debug, Clone, Default)]
pub struct HipparcosCatalog {
    /// Stars by HIP number
    stars: HashMap<u32, HipparcosEntry>,
}

impl HipparcosCatalog {
    /// Create a new empty Hipparcos catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from entries, later duplicates replacing earlier ones
    pub fn from_entries<I: IntoIterator<Item = HipparcosEntry>>(entries: I) -> Self {
        Self {
            stars: entries.into_iter().map(|entry| (entry.hip, entry)).collect(),
        }
    }

    /// Load from the Hipparcos .dat file, decompressing `.gz` files on the fly
    pub fn from_dat_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Err(SkygazrError::DataError(format!(
                "Hipparcos data file {} is empty",
                path.display()
            )));
        }

        let gzipped = path.extension().is_some_and(|ext| ext == "gz");
        let reader: Box<dyn Read> = if gzipped {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        let catalog = Self::from_reader(BufReader::new(reader))?;

        log::info!(
            "Loaded {} stars from Hipparcos catalog {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse catalogue rows from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut catalog = Self::new();
        let mut line_count = 0;
        let mut skipped_lines = 0;

        for line in reader.lines() {
            let line = line?;
            line_count += 1;
            match HipparcosEntry::parse_line(&line) {
                Some(entry) => {
                    catalog.stars.insert(entry.hip, entry);
                }
                None => skipped_lines += 1,
            }
        }

        log::debug!(
            "Read {} catalogue lines, skipped {} without a position",
            line_count,
            skipped_lines
        );

        if catalog.stars.is_empty() {
            return Err(SkygazrError::DataError(format!(
                "No stars loaded from {} lines of Hipparcos data",
                line_count
            )));
        }
        Ok(catalog)
    }
}

impl StarCatalog for HipparcosCatalog {
    type Star = HipparcosEntry;

    fn get_star(&self, id: u32) -> Option<&Self::Star> {
        self.stars.get(&id)
    }

    fn stars(&self) -> impl Iterator<Item = &Self::Star> {
        self.stars.values()
    }

    fn len(&self) -> usize {
        self.stars.len()
    }
}

impl StarLookup for HipparcosCatalog {
    fn star_by_hip(&self, hip: u32) -> Result<Star> {
        self.get_star(hip)
            .map(HipparcosEntry::to_star)
            .ok_or_else(|| SkygazrError::TargetNotFound(format!("HIP {} is not in the catalogue", hip)))
    }
}
