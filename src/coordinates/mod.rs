//! Angles and coordinate-string parsing

pub mod angle;
pub mod parser;

pub use angle::{Angle, AngleFormat};
pub use parser::{parse_coordinate, AstrometricCoordinate};
