//! JPL Ephemeris module for planetary positions
//!
//! Reads JPL Development Ephemerides (DE) distributed as binary SPK
//! (Spacecraft Planet Kernel) files in the SPICE DAF format.
//!
//! # Main Components
//!
//! - `daf`: Double Array File format reader (underlying format of SPK files)
//! - `spk`: Spacecraft Planet Kernel segments and barycentric state chaining
//! - `chebyshev`: series evaluation used by SPK types 2 and 3
//! - `names`: Mappings between celestial body names and ID numbers

pub mod chebyshev;
pub mod daf;
pub mod errors;
pub mod names;
pub mod spk;

#[cfg(test)]
pub(crate) mod tests;

pub use self::errors::JplephemError;
pub use self::spk::SPK;
