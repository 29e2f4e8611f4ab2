//! Canonical material vocabulary and free-text normalization

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fabric/material identifiers recognized by the feature schema
///
/// Variant order is the column order of the training schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalMaterial {
    Cotton,
    #[serde(rename = "Organic_cotton")]
    OrganicCotton,
    Linen,
    Hemp,
    Jute,
    #[serde(rename = "Other_plant")]
    OtherPlant,
    Silk,
    Wool,
    Leather,
    Camel,
    Cashmere,
    Alpaca,
    Feathers,
    #[serde(rename = "Other_animal")]
    OtherAnimal,
    Polyester,
    Nylon,
    Acrylic,
    /// Kept as a schema column; the token "spandex" normalizes to Elastane
    Spandex,
    Elastane,
    Polyamide,
    #[serde(rename = "Other_synthetic")]
    OtherSynthetic,
    Lyocell,
    Viscose,
    Acetate,
    Modal,
    Rayon,
    #[serde(rename = "Other_regenerated")]
    OtherRegenerated,
    /// Fallback bucket for unrecognized tokens
    Other,
}

/// Number of canonical materials (material columns in a feature row)
pub const MATERIAL_COUNT: usize = 28;

impl CanonicalMaterial {
    /// Get the schema column name
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalMaterial::Cotton => "Cotton",
            CanonicalMaterial::OrganicCotton => "Organic_cotton",
            CanonicalMaterial::Linen => "Linen",
            CanonicalMaterial::Hemp => "Hemp",
            CanonicalMaterial::Jute => "Jute",
            CanonicalMaterial::OtherPlant => "Other_plant",
            CanonicalMaterial::Silk => "Silk",
            CanonicalMaterial::Wool => "Wool",
            CanonicalMaterial::Leather => "Leather",
            CanonicalMaterial::Camel => "Camel",
            CanonicalMaterial::Cashmere => "Cashmere",
            CanonicalMaterial::Alpaca => "Alpaca",
            CanonicalMaterial::Feathers => "Feathers",
            CanonicalMaterial::OtherAnimal => "Other_animal",
            CanonicalMaterial::Polyester => "Polyester",
            CanonicalMaterial::Nylon => "Nylon",
            CanonicalMaterial::Acrylic => "Acrylic",
            CanonicalMaterial::Spandex => "Spandex",
            CanonicalMaterial::Elastane => "Elastane",
            CanonicalMaterial::Polyamide => "Polyamide",
            CanonicalMaterial::OtherSynthetic => "Other_synthetic",
            CanonicalMaterial::Lyocell => "Lyocell",
            CanonicalMaterial::Viscose => "Viscose",
            CanonicalMaterial::Acetate => "Acetate",
            CanonicalMaterial::Modal => "Modal",
            CanonicalMaterial::Rayon => "Rayon",
            CanonicalMaterial::OtherRegenerated => "Other_regenerated",
            CanonicalMaterial::Other => "Other",
        }
    }

    /// Get all materials in schema order
    pub fn all() -> &'static [CanonicalMaterial; MATERIAL_COUNT] {
        &[
            CanonicalMaterial::Cotton,
            CanonicalMaterial::OrganicCotton,
            CanonicalMaterial::Linen,
            CanonicalMaterial::Hemp,
            CanonicalMaterial::Jute,
            CanonicalMaterial::OtherPlant,
            CanonicalMaterial::Silk,
            CanonicalMaterial::Wool,
            CanonicalMaterial::Leather,
            CanonicalMaterial::Camel,
            CanonicalMaterial::Cashmere,
            CanonicalMaterial::Alpaca,
            CanonicalMaterial::Feathers,
            CanonicalMaterial::OtherAnimal,
            CanonicalMaterial::Polyester,
            CanonicalMaterial::Nylon,
            CanonicalMaterial::Acrylic,
            CanonicalMaterial::Spandex,
            CanonicalMaterial::Elastane,
            CanonicalMaterial::Polyamide,
            CanonicalMaterial::OtherSynthetic,
            CanonicalMaterial::Lyocell,
            CanonicalMaterial::Viscose,
            CanonicalMaterial::Acetate,
            CanonicalMaterial::Modal,
            CanonicalMaterial::Rayon,
            CanonicalMaterial::OtherRegenerated,
            CanonicalMaterial::Other,
        ]
    }

    /// Position of this material's column in a feature row
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Exact (case-sensitive) lookup against the column names
    fn from_exact(token: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.as_str() == token)
    }

    /// Case-insensitive lookup against the column names
    fn from_ignore_case(token: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for CanonicalMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for strict material parsing (CLI arguments, CSV headers)
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown material column: {0}")]
pub struct UnknownMaterial(pub String);

impl FromStr for CanonicalMaterial {
    type Err = UnknownMaterial;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_exact(s)
            .or_else(|| Self::from_ignore_case(s))
            .ok_or_else(|| UnknownMaterial(s.to_string()))
    }
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Map a free-text material token to a canonical material
///
/// Total: anything unrecognized lands in [`CanonicalMaterial::Other`].
pub fn normalize(raw_token: &str) -> CanonicalMaterial {
    let token = capitalize(raw_token.trim());

    if token.eq_ignore_ascii_case("spandex") {
        return CanonicalMaterial::Elastane;
    }
    if token.eq_ignore_ascii_case("nylon") {
        return CanonicalMaterial::Nylon;
    }

    CanonicalMaterial::from_exact(&token)
        .or_else(|| CanonicalMaterial::from_ignore_case(&token))
        .unwrap_or(CanonicalMaterial::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_size_and_order() {
        assert_eq!(CanonicalMaterial::all().len(), MATERIAL_COUNT);
        for (i, m) in CanonicalMaterial::all().iter().enumerate() {
            assert_eq!(m.index(), i);
        }
        assert_eq!(CanonicalMaterial::Cotton.index(), 0);
        assert_eq!(CanonicalMaterial::Other.index(), MATERIAL_COUNT - 1);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("cotton"), "Cotton");
        assert_eq!(capitalize("POLYESTER"), "Polyester");
        assert_eq!(capitalize("organic_cotton"), "Organic_cotton");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize("spandex"), CanonicalMaterial::Elastane);
        assert_eq!(normalize("SPANDEX"), CanonicalMaterial::Elastane);
        assert_eq!(normalize("nylon"), CanonicalMaterial::Nylon);
        assert_eq!(normalize("NyLoN"), CanonicalMaterial::Nylon);
    }

    #[test]
    fn test_normalize_matches_vocabulary() {
        assert_eq!(normalize("Cotton"), CanonicalMaterial::Cotton);
        assert_eq!(normalize("cotton"), CanonicalMaterial::Cotton);
        assert_eq!(normalize("ORGANIC_COTTON"), CanonicalMaterial::OrganicCotton);
        assert_eq!(normalize(" viscose "), CanonicalMaterial::Viscose);
        assert_eq!(normalize("elastane"), CanonicalMaterial::Elastane);
    }

    #[test]
    fn test_normalize_falls_back_to_other() {
        assert_eq!(normalize("Unobtainium"), CanonicalMaterial::Other);
        assert_eq!(normalize(""), CanonicalMaterial::Other);
        assert_eq!(normalize("organic cotton"), CanonicalMaterial::Other);
        assert_eq!(normalize("100% cotton"), CanonicalMaterial::Other);
    }

    #[test]
    fn test_normalize_is_total_and_stable() {
        let inputs = ["", " ", "Wool", "wool blend", "ß", "日本", "Other", "other_animal"];
        for input in inputs {
            let first = normalize(input);
            assert!(CanonicalMaterial::all().contains(&first));
            assert_eq!(first, normalize(input));
        }
    }

    #[test]
    fn test_from_str_is_strict() {
        assert_eq!("Other_plant".parse(), Ok(CanonicalMaterial::OtherPlant));
        assert_eq!("silk".parse(), Ok(CanonicalMaterial::Silk));
        assert!("Gold".parse::<CanonicalMaterial>().is_err());
    }

    #[test]
    fn test_serde_uses_column_names() {
        let json = serde_json::to_string(&CanonicalMaterial::OtherRegenerated).unwrap();
        assert_eq!(json, "\"Other_regenerated\"");
        let back: CanonicalMaterial = serde_json::from_str("\"Organic_cotton\"").unwrap();
        assert_eq!(back, CanonicalMaterial::OrganicCotton);
    }
}
