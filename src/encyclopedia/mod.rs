//! Encyclopedia lookups for bodies the ephemeris and catalogue don't name
//!
//! - `dom`: arena tree over the parsed page
//! - `infobox`: HIP number, right ascension and declination extraction
//! - `wikipedia`: MediaWiki client

pub mod dom;
pub mod infobox;
pub mod wikipedia;

pub use infobox::{extract, InfoboxExtraction, LabelMap};
pub use wikipedia::WikipediaClient;

use crate::Result;

/// Source of rendered article HTML for a name
pub trait Encyclopedia {
    fn page_html(&self, name: &str) -> Result<String>;
}
