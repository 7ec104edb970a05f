//! Free-form astrometric string parsing
//!
//! Encyclopedia infoboxes render coordinates as loosely formatted text such
//! as `12° 34′ 56″ [1]`, `−5.3°` or `07h 45m 18.9s`. [`parse_coordinate`]
//! pulls the numeric components out of such strings without deciding what
//! unit they are in; the caller knows whether the field was hour-based.

/// Marker for a trailing citation, e.g. `[1]` or `[note 2]`
const CITATION_MARKER: char = '[';
/// Degree marker
const DEGREE_MARKER: char = '°';
/// Hour marker
const HOUR_MARKER: char = 'h';

/// Ordered numeric components of a parsed coordinate string.
///
/// Degrees/arcminutes/arcseconds or hours/minutes/seconds, depending on the
/// source field. An empty coordinate means the text did not look like a
/// coordinate at all and must be treated as absent, never as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AstrometricCoordinate {
    components: Vec<f64>,
}

impl AstrometricCoordinate {
    /// Build a coordinate from already separated components
    pub fn new(components: Vec<f64>) -> Self {
        Self { components }
    }

    /// The parsed components in source order
    pub fn components(&self) -> &[f64] {
        &self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// `Some(self)` if any component was parsed
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Fold sexagesimal components into a single decimal value.
    ///
    /// The sign comes from the leading component, so `-0° 30′` is -0.5.
    /// Returns `None` for an empty coordinate.
    pub fn to_decimal(&self) -> Option<f64> {
        let (first, rest) = self.components.split_first()?;
        let magnitude = rest
            .iter()
            .take(2)
            .enumerate()
            .fold(first.abs(), |acc, (i, value)| {
                acc + value.abs() / 60f64.powi(i as i32 + 1)
            });
        Some(if first.is_sign_negative() {
            -magnitude
        } else {
            magnitude
        })
    }
}

/// Parse a free-form coordinate string into its numeric components.
///
/// Returns an empty coordinate when the text carries neither a degree nor an
/// hour marker.
pub fn parse_coordinate(raw: &str) -> AstrometricCoordinate {
    let text = raw.split(CITATION_MARKER).next().unwrap_or_default();
    let text = text.replace(['\u{2212}', '\u{2013}'], "-");

    if !text.contains(DEGREE_MARKER) && !text.contains(HOUR_MARKER) {
        return AstrometricCoordinate::default();
    }

    let components = text
        .split(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .filter(|fragment| !fragment.is_empty())
        .filter_map(|fragment| fragment.parse::<f64>().ok())
        .collect();

    AstrometricCoordinate::new(components)
}
