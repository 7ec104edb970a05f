//! Data module for downloading and managing astronomical data
//!
//! This module provides functionality for downloading and caching the
//! ephemeris kernel and the Hipparcos catalogue.

mod downloader;

pub use downloader::{
    download_ephemeris, download_file, download_hipparcos, ensure_dir, get_cache_dir,
    DATA_DIR_ENV,
};
