//! Astrometry scraped from an encyclopedia infobox
//!
//! Star and star-system articles carry a summary table with rows such as
//! `Right ascension`, `Declination` and an "Other designations" list that
//! contains a `HIP` link. Multi-star systems repeat these rows once per
//! component, each block headed by a bold component name.

use crate::coordinates::{parse_coordinate, AstrometricCoordinate};
use crate::encyclopedia::dom::{Document, NodeId};

const HIP_LABEL: &str = "HIP";
const DECLINATION_LABEL: &str = "Declination";
const RIGHT_ASCENSION_LABEL: &str = "Right ascension";

/// Bold elements back from a `Declination` link to its component name
const DECLINATION_LABEL_DEPTH: usize = 2;
/// Bold elements back from a `Right ascension` link to its component name
const RIGHT_ASCENSION_LABEL_DEPTH: usize = 1;

/// Values keyed by entity label, iterating in first-insertion order.
/// Inserting an existing label replaces its value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for LabelMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> LabelMap<T> {
    pub fn insert(&mut self, label: String, value: T) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value)
    }

    /// The first entry this pass inserted
    pub fn first(&self) -> Option<(&str, &T)> {
        self.entries
            .first()
            .map(|(label, value)| (label.as_str(), value))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries
            .iter()
            .map(|(label, value)| (label.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the infobox yielded, keyed by entity label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoboxExtraction {
    pub ids: LabelMap<u32>,
    pub ra_hours: LabelMap<Option<AstrometricCoordinate>>,
    pub ra_degrees: LabelMap<Option<AstrometricCoordinate>>,
    pub decs: LabelMap<Option<AstrometricCoordinate>>,
    /// Earliest node naming each label
    first_seen: Vec<(String, NodeId)>,
}

impl InfoboxExtraction {
    /// True when no pass found anything
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.ra_hours.is_empty() && self.decs.is_empty()
    }

    /// Every label seen by any pass, in document order
    pub fn labels(&self) -> Vec<&str> {
        let mut seen: Vec<&(String, NodeId)> = self.first_seen.iter().collect();
        seen.sort_by_key(|(_, at)| *at);
        seen.into_iter().map(|(label, _)| label.as_str()).collect()
    }

    fn note(&mut self, label: &str, at: NodeId) {
        match self.first_seen.iter_mut().find(|(existing, _)| existing.as_str() == label) {
            Some((_, earliest)) => *earliest = (*earliest).min(at),
            None => self.first_seen.push((label.to_string(), at)),
        }
    }
}

/// Extract HIP numbers, right ascensions and declinations from a rendered
/// page. Single-body pages key everything by `queried_name`.
pub fn extract(page_html: &str, queried_name: &str) -> InfoboxExtraction {
    match Document::infobox(page_html) {
        Some(doc) => extract_from_document(&doc, queried_name),
        None => {
            log::debug!("No infobox on the page for {}", queried_name);
            InfoboxExtraction::default()
        }
    }
}

/// Same as `extract`, over an already flattened infobox
pub fn extract_from_document(doc: &Document, queried_name: &str) -> InfoboxExtraction {
    let mut extraction = InfoboxExtraction::default();

    let hip_anchors = anchors_with_text(doc, HIP_LABEL);
    let declination_anchors = anchors_with_text(doc, DECLINATION_LABEL);
    let right_ascension_anchors = anchors_with_text(doc, RIGHT_ASCENSION_LABEL);
    // One repeated field is enough to make every label a component name
    let several = [&hip_anchors, &declination_anchors, &right_ascension_anchors]
        .iter()
        .any(|anchors| anchors.len() > 1);

    for anchor in hip_anchors {
        let Some(hip) = hip_after(doc, anchor) else {
            log::debug!("HIP link without a readable number");
            continue;
        };
        let Some((label, at)) = entity_label(doc, anchor, several, 0, queried_name) else {
            log::debug!("HIP {} has no component label", hip);
            continue;
        };
        extraction.note(&label, at);
        extraction.ids.insert(label, hip);
    }

    for anchor in declination_anchors {
        let Some(cell) = doc.find_next(anchor, "td").and_then(|td| doc.text(td)) else {
            log::debug!("Declination link without a value cell");
            continue;
        };
        let Some((label, at)) =
            entity_label(doc, anchor, several, DECLINATION_LABEL_DEPTH, queried_name)
        else {
            log::debug!("Declination {:?} has no component label", cell);
            continue;
        };
        extraction.note(&label, at);
        extraction
            .decs
            .insert(label, parse_coordinate(&cell).into_option());
    }

    for anchor in right_ascension_anchors {
        let Some(cell) = doc.find_next(anchor, "td").and_then(|td| doc.text(td)) else {
            log::debug!("Right ascension link without a value cell");
            continue;
        };
        let Some((label, at)) =
            entity_label(doc, anchor, several, RIGHT_ASCENSION_LABEL_DEPTH, queried_name)
        else {
            log::debug!("Right ascension {:?} has no component label", cell);
            continue;
        };
        extraction.note(&label, at);
        let parsed = parse_coordinate(&cell).into_option();
        let (hours, degrees) = if cell.contains('h') {
            (parsed, None)
        } else {
            (None, parsed)
        };
        extraction.ra_hours.insert(label.clone(), hours);
        extraction.ra_degrees.insert(label, degrees);
    }

    log::debug!(
        "Infobox for {}: {} ids, {} right ascensions, {} declinations",
        queried_name,
        extraction.ids.len(),
        extraction.ra_hours.len(),
        extraction.decs.len()
    );
    extraction
}

fn anchors_with_text(doc: &Document, text: &str) -> Vec<NodeId> {
    doc.elements("a")
        .filter(|&anchor| doc.text(anchor).as_deref() == Some(text))
        .collect()
}

/// Leading comma-separated token of the text right after a `HIP` link
fn hip_after(doc: &Document, anchor: NodeId) -> Option<u32> {
    let sibling = doc.next_sibling(anchor)?;
    let text = doc.text_content(sibling)?;
    text.trim().split(',').next()?.trim().parse().ok()
}

fn entity_label(
    doc: &Document,
    anchor: NodeId,
    several: bool,
    depth: usize,
    queried_name: &str,
) -> Option<(String, NodeId)> {
    if !several {
        return Some((queried_name.to_string(), anchor));
    }
    let bold = doc.find_previous_nth(anchor, "b", depth)?;
    Some((doc.text(bold)?, bold))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_body_page() -> String {
        r#"<html><body><table class="infobox"><tbody>
        <tr><th colspan="2">Observation data</th></tr>
        <tr><td><a href="/wiki/Right_ascension">Right ascension</a></td>
            <td>14<sup>h</sup> 39<sup>m</sup> 36.49400<sup>s</sup><sup>[1]</sup></td></tr>
        <tr><td><a href="/wiki/Declination">Declination</a></td>
            <td>−60° 50′ 02.3737″<sup>[1]</sup></td></tr>
        <tr><th>Other designations</th></tr>
        <tr><td colspan="2"><a href="/wiki/Hipparcos">HIP</a> 71683, HD 128620</td></tr>
        </tbody></table></body></html>"#
            .to_string()
    }

    fn component_block(name: &str, ra: &str, dec: &str, hip: u32) -> String {
        format!(
            r#"<tr><th colspan="2"><b>{name}</b></th></tr>
            <tr><td><a href="/wiki/Right_ascension">Right ascension</a></td><td>{ra}</td></tr>
            <tr><td><a href="/wiki/Declination">Declination</a></td><td>{dec}</td></tr>
            <tr><td><b>Component</b></td><td><b>Data</b></td></tr>"#
        ) + &format!(r#"<tr><td><b>{name}</b>: <a href="/wiki/Hipparcos">HIP</a> {hip}</td></tr>"#)
    }

    #[test]
    fn test_single_body_page() {
        let extraction = extract(&single_body_page(), "Alpha Centauri A");

        assert_eq!(extraction.ids.get("Alpha Centauri A"), Some(&71683));
        assert_eq!(extraction.ids.len(), 1);

        let hours = extraction.ra_hours.get("Alpha Centauri A").unwrap().as_ref();
        assert_eq!(hours.unwrap().components(), &[14.0, 39.0, 36.494]);
        assert_eq!(extraction.ra_degrees.get("Alpha Centauri A"), Some(&None));

        let dec = extraction.decs.get("Alpha Centauri A").unwrap().as_ref();
        assert_eq!(dec.unwrap().components(), &[-60.0, 50.0, 2.3737]);
    }

    #[test]
    fn test_multi_component_page_is_keyed_by_component() {
        // Each component heads its block with a bold name followed by two
        // bold table headers, matching the offsets used for the labels.
        let mut html = String::from(r#"<table class="infobox"><tbody>"#);
        html.push_str(
            r#"<tr><th><b>Alpha</b></th></tr><tr><td><b>Right</b></td></tr>
            <tr><td><a>Right ascension</a></td><td>01h 02m 03s</td></tr>
            <tr><td><b>Mid</b></td></tr>
            <tr><td><a>Declination</a></td><td>+10° 20′ 30″</td></tr>"#
        );
        html.push_str(
            r#"<tr><th><b>Beta</b></th></tr><tr><td><b>Right</b></td></tr>
            <tr><td><a>Right ascension</a></td><td>150.5°</td></tr>
            <tr><td><b>Mid</b></td></tr>
            <tr><td><a>Declination</a></td><td>−40° 50′ 60″</td></tr>"#
        );
        html += r#"<tr><td><b>Alpha</b> <a>HIP</a> 11, HD 1</td></tr>
            <tr><td><b>Beta</b> <a>HIP</a> 22</td></tr></tbody></table>"#;

        let extraction = extract(&html, "Alpha Beta System");

        assert_eq!(extraction.ids.labels().collect::<Vec<_>>(), ["Alpha", "Beta"]);
        assert_eq!(extraction.ids.get("Alpha"), Some(&11));
        assert_eq!(extraction.ids.get("Beta"), Some(&22));

        assert_eq!(extraction.ra_hours.labels().collect::<Vec<_>>(), ["Alpha", "Beta"]);
        assert!(extraction.ra_hours.get("Alpha").unwrap().is_some());
        assert_eq!(extraction.ra_degrees.get("Alpha"), Some(&None));
        assert_eq!(extraction.ra_hours.get("Beta"), Some(&None));
        assert_eq!(
            extraction.ra_degrees.get("Beta").unwrap().as_ref().unwrap().components(),
            &[150.5]
        );

        assert_eq!(extraction.decs.labels().collect::<Vec<_>>(), ["Alpha", "Beta"]);
        assert_eq!(
            extraction.decs.get("Beta").unwrap().as_ref().unwrap().to_decimal(),
            Some(-(40.0 + 50.0 / 60.0 + 60.0 / 3600.0))
        );
        assert_eq!(extraction.labels(), ["Alpha", "Beta"]);
    }

    #[test]
    fn test_labels_follow_the_page_when_first_component_has_no_hip() {
        let html = r#"<table class="infobox"><tbody>
            <tr><th><b>Alpha</b></th></tr><tr><td><b>Right</b></td></tr>
            <tr><td><a>Right ascension</a></td><td>01h 00m 00s</td></tr>
            <tr><td><b>Mid</b></td></tr>
            <tr><td><a>Declination</a></td><td>+1° 00′ 00″</td></tr>
            <tr><th><b>Beta</b></th></tr><tr><td><b>Right</b></td></tr>
            <tr><td><a>Right ascension</a></td><td>02h 00m 00s</td></tr>
            <tr><td><b>Mid</b></td></tr>
            <tr><td><a>Declination</a></td><td>+2° 00′ 00″</td></tr>
            <tr><td><b>Beta</b> <a>HIP</a> 22</td></tr>
            </tbody></table>"#;

        let extraction = extract(html, "Alpha Beta System");

        assert_eq!(extraction.ids.labels().collect::<Vec<_>>(), ["Beta"]);
        assert_eq!(extraction.labels(), ["Alpha", "Beta"]);
    }

    #[test]
    fn test_component_block_helper_labels_hip() {
        let html = format!(
            r#"<table class="infobox">{}{}</table>"#,
            component_block("A", "1h", "2°", 5),
            component_block("B", "3h", "4°", 6)
        );
        let extraction = extract(&html, "Pair");
        assert_eq!(extraction.ids.get("A"), Some(&5));
        assert_eq!(extraction.ids.get("B"), Some(&6));
    }

    #[test]
    fn test_no_infobox() {
        let extraction = extract("<p>Mars is a planet</p>", "Mars");
        assert!(extraction.is_empty());
        assert!(extraction.labels().is_empty());
    }

    #[test]
    fn test_unparseable_values_are_absent() {
        let html = r#"<table class="infobox">
            <tr><td><a>Declination</a></td><td>unknown</td></tr>
            <tr><td><a>Right ascension</a></td><td>see text</td></tr>
        </table>"#;
        let extraction = extract(html, "Nebula");
        assert_eq!(extraction.decs.get("Nebula"), Some(&None));
        assert_eq!(extraction.ra_hours.get("Nebula"), Some(&None));
        assert_eq!(extraction.ra_degrees.get("Nebula"), Some(&None));
        assert!(extraction.ids.is_empty());
    }

    #[test]
    fn test_hip_without_number_is_skipped() {
        let html = r#"<table class="infobox"><tr><td><a>HIP</a></td></tr></table>"#;
        assert!(extract(html, "Oddity").ids.is_empty());
    }
}
