//! Star catalogs module
//!
//! This module provides the Hipparcos catalogue, the `Star` astrometry model,
//! and the lookup seam target resolution uses to turn a HIP number into a star.

use std::cell::OnceCell;
use std::path::PathBuf;

pub mod hipparcos;
pub mod star;

pub use hipparcos::{HipparcosCatalog, HipparcosEntry, HIPPARCOS_EPOCH};
pub use star::Star;

use crate::Result;

/// Generic trait for all star catalogs
pub trait StarCatalog {
    /// Star entry type for this catalog
    type Star;

    /// Get a star by its identifier
    fn get_star(&self, id: u32) -> Option<&Self::Star>;

    /// Get all stars in the catalog
    fn stars(&self) -> impl Iterator<Item = &Self::Star>;

    /// Get the number of stars in the catalog
    fn len(&self) -> usize;

    /// Check if the catalog is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Anything that can produce a `Star` for a Hipparcos number
pub trait StarLookup {
    fn star_by_hip(&self, hip: u32) -> Result<Star>;
}

/// Hipparcos catalogue that is only read (and downloaded) on first lookup
#[derive(Debug)]
pub struct LazyHipparcos {
    data_dir: PathBuf,
    catalog: OnceCell<HipparcosCatalog>,
}

impl LazyHipparcos {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            catalog: OnceCell::new(),
        }
    }

    /// Whether the catalogue has been loaded yet
    pub fn is_loaded(&self) -> bool {
        self.catalog.get().is_some()
    }

    fn catalog(&self) -> Result<&HipparcosCatalog> {
        if let Some(catalog) = self.catalog.get() {
            return Ok(catalog);
        }
        let path = crate::data::download_hipparcos(&self.data_dir)?;
        let catalog = HipparcosCatalog::from_dat_file(path)?;
        Ok(self.catalog.get_or_init(|| catalog))
    }
}

impl StarLookup for LazyHipparcos {
    fn star_by_hip(&self, hip: u32) -> Result<Star> {
        self.catalog()?.star_by_hip(hip)
    }
}
