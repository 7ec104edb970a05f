//! Downloader module for retrieving astronomical data
//!
//! This module handles downloading and caching of astronomical data files.

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;
use crate::SkygazrError;

/// Hipparcos catalog URL
const HIPPARCOS_URL: &str = "https://cdsarc.cds.unistra.fr/ftp/cats/I/239/hip_main.dat";
/// Directory of the JPL planetary ephemeris kernels
const EPHEMERIS_BASE_URL: &str = "https://ssd.jpl.nasa.gov/ftp/eph/planets/bsp";
/// Environment variable overriding the cache directory
pub const DATA_DIR_ENV: &str = "SKYGAZR_DATA_DIR";

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Get the cache directory path
pub fn get_cache_dir() -> PathBuf {
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".cache").join("skygazr")
}

/// Ensure that a data directory exists
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> io::Result<PathBuf> {
    fs::create_dir_all(dir.as_ref())?;
    Ok(dir.as_ref().to_path_buf())
}

/// Check if a file exists and is not empty
fn file_exists_and_not_empty<P: AsRef<Path>>(path: P) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => metadata.is_file() && metadata.len() > 0,
        Err(_) => false,
    }
}

/// Download a file from URL to a local path via a temporary file
pub fn download_file<P: AsRef<Path>>(url: &str, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| SkygazrError::Network(format!("Failed to create HTTP client: {}", e)))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| SkygazrError::Network(format!("Failed to download {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(SkygazrError::Network(format!(
            "Failed to download {}, status: {}",
            url,
            response.status()
        )));
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".part");
    let temp_path = PathBuf::from(temp_name);

    let copied = (|| -> Result<u64> {
        let mut file = BufWriter::new(File::create(&temp_path)?);
        let bytes = response
            .copy_to(&mut file)
            .map_err(|e| SkygazrError::Network(format!("Failed to read response: {}", e)))?;
        file.flush()?;
        Ok(bytes)
    })();

    match copied {
        Ok(bytes) => {
            fs::rename(&temp_path, path)?;
            log::info!("Downloaded {} bytes to {}", bytes, path.display());
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&temp_path);
            Err(e)
        }
    }
}

/// Return `name` inside `data_dir`, downloading it from `url` if it is not cached
fn cached_or_download(data_dir: &Path, name: &str, url: &str) -> Result<PathBuf> {
    let path = ensure_dir(data_dir)?.join(name);
    if file_exists_and_not_empty(&path) {
        log::debug!("Using cached {}", path.display());
        return Ok(path);
    }

    log::info!("Downloading {} from {}", name, url);
    download_file(url, &path)?;
    Ok(path)
}

/// Download the Hipparcos catalog into `data_dir`
pub fn download_hipparcos<P: AsRef<Path>>(data_dir: P) -> Result<PathBuf> {
    let dir = data_dir.as_ref();
    let compressed = dir.join("hip_main.dat.gz");
    if file_exists_and_not_empty(&compressed) {
        return Ok(compressed);
    }
    cached_or_download(dir, "hip_main.dat", HIPPARCOS_URL)
}

/// Download a JPL ephemeris kernel such as `de421.bsp` into `data_dir`
pub fn download_ephemeris<P: AsRef<Path>>(data_dir: P, name: &str) -> Result<PathBuf> {
    let url = format!("{}/{}", EPHEMERIS_BASE_URL, name);
    cached_or_download(data_dir.as_ref(), name, &url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_dir() {
        let cache_dir = get_cache_dir();
        match env::var_os(DATA_DIR_ENV).filter(|dir| !dir.is_empty()) {
            Some(dir) => assert_eq!(cache_dir, PathBuf::from(dir)),
            None => assert!(cache_dir.ends_with(".cache/skygazr")),
        }
    }

    #[test]
    fn test_cached_files_are_not_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("de421.bsp"), b"kernel").unwrap();

        let path = download_ephemeris(dir.path(), "de421.bsp").unwrap();
        assert_eq!(path, dir.path().join("de421.bsp"));
    }

    #[test]
    fn test_compressed_catalogue_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hip_main.dat.gz"), b"\x1f\x8b").unwrap();

        let path = download_hipparcos(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("hip_main.dat.gz"));
    }
}
