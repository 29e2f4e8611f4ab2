//! Fabric composition parsing and cross-part averaging
//!
//! Composition labels arrive in many shapes:
//!
//! - `"56% Cotton, 44% Nylon"`
//! - `"Body: 100% nylon; Lining: 100% polyester"`
//! - `"Cotton, Polyester"` (no percentages at all)
//! - `["98% cotton", "2% spandex"]` (bullet fragments from the scraper)
//!
//! [`parse`] turns any of these into per-part material fractions and
//! [`average`] folds the parts into one fraction per canonical material.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::material::{capitalize, normalize, CanonicalMaterial};
use crate::entities::product::FactValue;

/// Part name used when a segment has no `"<part>:"` prefix
pub const DEFAULT_PART: &str = "Main";

/// Materials of one garment part, as written on the label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartComposition {
    pub part: String,
    /// Raw material tokens with fractions in label order
    pub fractions: Vec<(String, f64)>,
}

impl PartComposition {
    pub fn new(part: impl Into<String>, fractions: Vec<(String, f64)>) -> Self {
        Self {
            part: part.into(),
            fractions,
        }
    }
}

/// One fraction per canonical material, averaged over the parts mentioning it
///
/// Values are not renormalized and need not sum to 1.
pub type AveragedComposition = BTreeMap<CanonicalMaterial, f64>;

/// How a segment's items are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// At least one item carries a percentage; untagged items are dropped
    Percentage,
    /// No item carries a percentage; every item gets an equal share
    EvenSplit,
}

impl SplitMode {
    /// Decide the mode for a list of items
    pub fn detect<S: AsRef<str>>(items: &[S]) -> Self {
        if items.iter().any(|item| parse_tagged(item.as_ref()).is_some()) {
            SplitMode::Percentage
        } else {
            SplitMode::EvenSplit
        }
    }
}

/// Match `<digits>%<ws><material>` at the start of an item
///
/// The material is the run of word characters, spaces and hyphens after the
/// percent sign, capitalized. Returns the fraction (digits / 100).
pub fn parse_tagged(item: &str) -> Option<(String, f64)> {
    let digits_end = item
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(item.len());
    if digits_end == 0 {
        return None;
    }

    let percent: u32 = item[..digits_end].parse().ok()?;
    let rest = item[digits_end..].strip_prefix('%')?;
    let rest = rest.trim_start();

    let material_end = rest
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace()))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    let material = rest[..material_end].trim();

    if material.is_empty() || material.starts_with('-') {
        return None;
    }

    Some((capitalize(material), f64::from(percent) / 100.0))
}

/// Turn a list of label items into fractions using a single mode decision
fn split_items<S: AsRef<str>>(items: &[S]) -> Vec<(String, f64)> {
    match SplitMode::detect(items) {
        SplitMode::Percentage => {
            let parsed: Vec<_> = items
                .iter()
                .filter_map(|item| parse_tagged(item.as_ref()))
                .collect();
            let dropped = items.len() - parsed.len();
            if dropped > 0 {
                tracing::debug!(dropped, "dropping untagged items from percentage segment");
            }
            parsed
        }
        SplitMode::EvenSplit => {
            let share = 1.0 / items.len() as f64;
            items
                .iter()
                .map(|item| (item.as_ref().to_string(), share))
                .collect()
        }
    }
}

/// Split a segment body on commas, trimming and dropping empties
fn body_items(body: &str) -> Vec<&str> {
    body.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a composition string, one part per `;`-delimited segment
pub fn parse_text(text: &str) -> Vec<PartComposition> {
    let mut parts = Vec::new();

    for segment in text.split(';') {
        let (part, body) = match segment.split_once(':') {
            Some((name, body)) if !name.trim().is_empty() => (name.trim(), body),
            Some((_, body)) => (DEFAULT_PART, body),
            None => (DEFAULT_PART, segment),
        };

        let items = body_items(body);
        if items.is_empty() {
            continue;
        }

        let fractions = split_items(&items);
        if !fractions.is_empty() {
            parts.push(PartComposition::new(part, fractions));
        }
    }

    parts
}

/// Parse a flat list of label fragments as a single "Main" part
pub fn parse_list<S: AsRef<str>>(items: &[S]) -> Vec<PartComposition> {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        return Vec::new();
    }

    let fractions = split_items(&items);
    if fractions.is_empty() {
        return Vec::new();
    }
    vec![PartComposition::new(DEFAULT_PART, fractions)]
}

/// Parse a raw fabric fact into per-part compositions
///
/// Non-text values produce an empty result.
pub fn parse(fabric: &FactValue) -> Vec<PartComposition> {
    match fabric {
        FactValue::Text(text) => parse_text(text),
        FactValue::List(items) => parse_list(items),
        FactValue::Other(_) => Vec::new(),
    }
}

/// Average fractions per canonical material over the parts that mention it
pub fn average(parts: &[PartComposition]) -> AveragedComposition {
    let mut totals: BTreeMap<CanonicalMaterial, (f64, u32)> = BTreeMap::new();

    for part in parts {
        for (raw, fraction) in &part.fractions {
            let entry = totals.entry(normalize(raw)).or_insert((0.0, 0));
            entry.0 += fraction;
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(material, (sum, count))| (material, sum / f64::from(count)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_parse_tagged() {
        assert_eq!(parse_tagged("56% Cotton"), Some(("Cotton".to_string(), 0.56)));
        assert_eq!(parse_tagged("100% nylon"), Some(("Nylon".to_string(), 1.0)));
        assert_eq!(
            parse_tagged("30% Other-plant fibers"),
            Some(("Other-plant fibers".to_string(), 0.3))
        );
        assert_eq!(parse_tagged("5%spandex"), Some(("Spandex".to_string(), 0.05)));
        assert_eq!(
            parse_tagged("60% Cotton (organic)"),
            Some(("Cotton".to_string(), 0.6))
        );
        assert_eq!(parse_tagged("Cotton"), None);
        assert_eq!(parse_tagged("2.5% Elastane"), None);
        assert_eq!(parse_tagged("100%"), None);
        assert_eq!(parse_tagged("% Cotton"), None);
        assert_eq!(parse_tagged("99999999999% Cotton"), None);
    }

    #[test]
    fn test_percentage_mode_in_order() {
        let parts = parse_text("56% Cotton, 44% Nylon");
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].part, "Main");
        assert_eq!(
            parts[0].fractions,
            vec![("Cotton".to_string(), 0.56), ("Nylon".to_string(), 0.44)]
        );
    }

    #[test]
    fn test_percentage_mode_drops_untagged() {
        let parts = parse_text("80% Wool, Silk, 20% Cashmere");
        assert_eq!(parts.len(), 1);
        assert_eq!(
            parts[0].fractions,
            vec![("Wool".to_string(), 0.8), ("Cashmere".to_string(), 0.2)]
        );
    }

    #[test]
    fn test_even_split_mode() {
        let parts = parse_text("Cotton, Polyester, Elastane");
        assert_eq!(parts.len(), 1);
        let fractions = &parts[0].fractions;
        assert_eq!(fractions.len(), 3);
        for (_, f) in fractions {
            assert!(approx(*f, 1.0 / 3.0));
        }
        let total: f64 = fractions.iter().map(|(_, f)| f).sum();
        assert!(approx(total, 1.0));
        // Even-split tokens are kept verbatim
        assert_eq!(fractions[0].0, "Cotton");
    }

    #[test]
    fn test_segmented_parts() {
        let parts = parse_text("Body: 100% nylon; Lining: 100% polyester");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].part, "Body");
        assert_eq!(parts[0].fractions, vec![("Nylon".to_string(), 1.0)]);
        assert_eq!(parts[1].part, "Lining");
        assert_eq!(parts[1].fractions, vec![("Polyester".to_string(), 1.0)]);
    }

    #[test]
    fn test_mode_is_per_segment() {
        let parts = parse_text("Shell: 100% Polyester; Fill: Down, Feathers");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].fractions, vec![("Polyester".to_string(), 1.0)]);
        assert_eq!(
            parts[1].fractions,
            vec![("Down".to_string(), 0.5), ("Feathers".to_string(), 0.5)]
        );
    }

    #[test]
    fn test_empty_prefix_and_segments() {
        let parts = parse_text(": 100% Cotton;; ;Trim: ");
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].part, "Main");
    }

    #[test]
    fn test_parse_list_percentage() {
        let parts = parse_list(&["98% cotton", "2% spandex", "machine wash"]);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].part, "Main");
        assert_eq!(
            parts[0].fractions,
            vec![("Cotton".to_string(), 0.98), ("Spandex".to_string(), 0.02)]
        );
    }

    #[test]
    fn test_parse_list_even_split_ignores_semicolons() {
        let parts = parse_list(&["cotton", "Lining: polyester"]);
        assert_eq!(parts.len(), 1);
        assert_eq!(
            parts[0].fractions,
            vec![
                ("cotton".to_string(), 0.5),
                ("Lining: polyester".to_string(), 0.5)
            ]
        );
    }

    #[test]
    fn test_parse_empty_inputs() {
        assert!(parse(&FactValue::from("")).is_empty());
        assert!(parse(&FactValue::from(" , ; ,")).is_empty());
        assert!(parse(&FactValue::List(vec![])).is_empty());
        assert!(parse(&FactValue::Other(serde_json::json!(42))).is_empty());
    }

    #[test]
    fn test_average_over_mentioning_parts() {
        let parts = vec![
            PartComposition::new("A", vec![("Cotton".to_string(), 0.5)]),
            PartComposition::new("B", vec![("Cotton".to_string(), 0.3)]),
            PartComposition::new("C", vec![("Nylon".to_string(), 1.0)]),
        ];
        let averaged = average(&parts);
        assert_eq!(averaged.len(), 2);
        assert!(approx(averaged[&CanonicalMaterial::Cotton], 0.4));
        assert!(approx(averaged[&CanonicalMaterial::Nylon], 1.0));
    }

    #[test]
    fn test_average_normalizes_tokens() {
        let parts = parse_text("Body: 90% cotton, 10% spandex; Trim: 100% Unobtainium");
        let averaged = average(&parts);
        assert!(approx(averaged[&CanonicalMaterial::Cotton], 0.9));
        assert!(approx(averaged[&CanonicalMaterial::Elastane], 0.1));
        assert!(approx(averaged[&CanonicalMaterial::Other], 1.0));
        assert!(!averaged.contains_key(&CanonicalMaterial::Spandex));
    }

    #[test]
    fn test_average_is_not_renormalized() {
        let parts = parse_text("Body: 60% Cotton, 40% Polyester; Lining: 100% Polyester");
        let averaged = average(&parts);
        assert!(approx(averaged[&CanonicalMaterial::Cotton], 0.6));
        assert!(approx(averaged[&CanonicalMaterial::Polyester], 0.7));
        let total: f64 = averaged.values().sum();
        assert!(total > 1.0);
    }

    #[test]
    fn test_split_mode_detect() {
        assert_eq!(SplitMode::detect(&["Cotton", "5% Wool"]), SplitMode::Percentage);
        assert_eq!(SplitMode::detect(&["Cotton", "Wool"]), SplitMode::EvenSplit);
    }
}
