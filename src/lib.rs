//! Skygazr: find a planet, star or star system in your sky
//!
//! Resolves a target name against a JPL planetary ephemeris, the Hipparcos
//! catalogue or an encyclopedia infobox, then reports where to look
//! (altitude and azimuth) and how the target moves relative to you.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod catalogs;
pub mod constants;
pub mod coordinates;
pub mod data;
pub mod encyclopedia;
pub mod jplephem;
pub mod observation;
pub mod resolver;
pub mod time;

// Re-export commonly used types
pub use observation::{observe, Observation, Report, Topos};
pub use resolver::{Resolver, Target};
pub use time::{Time, Timescale};

/// Ephemeris loaded when none is named
pub const DEFAULT_EPHEMERIS: &str = "de421.bsp";

/// Main error type for the skygazr library
#[derive(Debug, Error)]
pub enum SkygazrError {
    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Encyclopedia error: {0}")]
    Encyclopedia(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Ephemeris error: {0}")]
    Ephemeris(#[from] jplephem::JplephemError),

    #[error("Time error: {0}")]
    TimeError(#[from] time::TimeError),
}

/// Result type for skygazr operations
pub type Result<T> = std::result::Result<T, SkygazrError>;

/// Entry point for loading standard astronomical data
#[derive(Debug, Clone, Default)]
pub struct Loader {
    data_dir: Option<PathBuf>,
}

impl Loader {
    /// Create a new loader with default data directory
    pub fn new() -> Self {
        Self { data_dir: None }
    }

    /// Set a custom data directory
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Directory holding downloaded kernels and catalogues
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(data::get_cache_dir)
    }

    /// Open an ephemeris kernel. A bare file name that does not exist is
    /// looked up in (and if needed downloaded into) the data directory.
    pub fn load_ephemeris<P: AsRef<Path>>(&self, kernel: P) -> Result<jplephem::SPK> {
        let kernel = kernel.as_ref();
        let path = if kernel.is_file() || kernel.components().count() > 1 {
            kernel.to_path_buf()
        } else {
            let name = kernel.to_string_lossy();
            data::download_ephemeris(self.data_dir(), &name)?
        };
        log::info!("Loading ephemeris {}", path.display());
        Ok(jplephem::SPK::open(path)?)
    }

    /// The Hipparcos catalogue, read from the data directory on first use
    pub fn hipparcos(&self) -> catalogs::LazyHipparcos {
        catalogs::LazyHipparcos::new(self.data_dir())
    }

    /// Load a timescale for time conversions
    pub fn timescale(&self) -> time::Timescale {
        time::Timescale::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir_wins() {
        let loader = Loader::new().with_data_dir("/tmp/skygazr-data");
        assert_eq!(loader.data_dir(), PathBuf::from("/tmp/skygazr-data"));
    }

    #[test]
    fn test_load_ephemeris_reports_bad_kernel() {
        let dir = tempfile::tempdir().unwrap();
        let kernel = dir.path().join("broken.bsp");
        std::fs::write(&kernel, vec![0u8; 2048]).unwrap();

        let result = Loader::new().with_data_dir(dir.path()).load_ephemeris(&kernel);
        assert!(matches!(result, Err(SkygazrError::Ephemeris(_))));
    }

    #[test]
    fn test_cached_kernel_name_resolves_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tiny.bsp"), vec![0u8; 2048]).unwrap();

        let loader = Loader::new().with_data_dir(dir.path());
        // Found in the cache, so no download is attempted; the contents are rejected
        assert!(matches!(
            loader.load_ephemeris("tiny.bsp"),
            Err(SkygazrError::Ephemeris(_))
        ));
    }
}
