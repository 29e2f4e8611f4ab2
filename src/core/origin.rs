//! Country-of-origin resolution to continent codes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::product::{Product, COUNTRY_OF_ORIGIN, ORIGIN};

/// Geographic bucket used for the manufacturing-location feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Continent {
    #[serde(rename = "North America")]
    NorthAmerica,
    Europe,
    Asia,
    #[serde(rename = "South America")]
    SouthAmerica,
    Africa,
    Australia,
}

impl Continent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Continent::NorthAmerica => "North America",
            Continent::Europe => "Europe",
            Continent::Asia => "Asia",
            Continent::SouthAmerica => "South America",
            Continent::Africa => "Africa",
            Continent::Australia => "Australia",
        }
    }

    pub fn all() -> &'static [Continent] {
        &[
            Continent::NorthAmerica,
            Continent::Europe,
            Continent::Asia,
            Continent::SouthAmerica,
            Continent::Africa,
            Continent::Australia,
        ]
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Continent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Continent::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown continent: {}", s))
    }
}

/// Country (lower-case) to continent table
const COUNTRIES: &[(&str, Continent)] = &[
    // North America (incl. Central America and the Caribbean)
    ("united states", Continent::NorthAmerica),
    ("united states of america", Continent::NorthAmerica),
    ("usa", Continent::NorthAmerica),
    ("u.s.a.", Continent::NorthAmerica),
    ("us", Continent::NorthAmerica),
    ("u.s.", Continent::NorthAmerica),
    ("america", Continent::NorthAmerica),
    ("canada", Continent::NorthAmerica),
    ("mexico", Continent::NorthAmerica),
    ("guatemala", Continent::NorthAmerica),
    ("honduras", Continent::NorthAmerica),
    ("el salvador", Continent::NorthAmerica),
    ("nicaragua", Continent::NorthAmerica),
    ("costa rica", Continent::NorthAmerica),
    ("panama", Continent::NorthAmerica),
    ("dominican republic", Continent::NorthAmerica),
    ("haiti", Continent::NorthAmerica),
    ("jamaica", Continent::NorthAmerica),
    // Europe
    ("united kingdom", Continent::Europe),
    ("uk", Continent::Europe),
    ("great britain", Continent::Europe),
    ("england", Continent::Europe),
    ("scotland", Continent::Europe),
    ("ireland", Continent::Europe),
    ("france", Continent::Europe),
    ("germany", Continent::Europe),
    ("italy", Continent::Europe),
    ("spain", Continent::Europe),
    ("portugal", Continent::Europe),
    ("netherlands", Continent::Europe),
    ("belgium", Continent::Europe),
    ("switzerland", Continent::Europe),
    ("austria", Continent::Europe),
    ("denmark", Continent::Europe),
    ("sweden", Continent::Europe),
    ("norway", Continent::Europe),
    ("finland", Continent::Europe),
    ("poland", Continent::Europe),
    ("czech republic", Continent::Europe),
    ("czechia", Continent::Europe),
    ("slovakia", Continent::Europe),
    ("hungary", Continent::Europe),
    ("romania", Continent::Europe),
    ("bulgaria", Continent::Europe),
    ("greece", Continent::Europe),
    ("lithuania", Continent::Europe),
    ("latvia", Continent::Europe),
    ("estonia", Continent::Europe),
    ("ukraine", Continent::Europe),
    ("belarus", Continent::Europe),
    ("moldova", Continent::Europe),
    ("serbia", Continent::Europe),
    ("croatia", Continent::Europe),
    ("bosnia and herzegovina", Continent::Europe),
    ("north macedonia", Continent::Europe),
    ("macedonia", Continent::Europe),
    ("albania", Continent::Europe),
    ("slovenia", Continent::Europe),
    ("russia", Continent::Europe),
    // Asia
    ("china", Continent::Asia),
    ("hong kong", Continent::Asia),
    ("taiwan", Continent::Asia),
    ("japan", Continent::Asia),
    ("south korea", Continent::Asia),
    ("korea", Continent::Asia),
    ("north korea", Continent::Asia),
    ("mongolia", Continent::Asia),
    ("vietnam", Continent::Asia),
    ("viet nam", Continent::Asia),
    ("cambodia", Continent::Asia),
    ("laos", Continent::Asia),
    ("thailand", Continent::Asia),
    ("myanmar", Continent::Asia),
    ("burma", Continent::Asia),
    ("malaysia", Continent::Asia),
    ("singapore", Continent::Asia),
    ("indonesia", Continent::Asia),
    ("philippines", Continent::Asia),
    ("india", Continent::Asia),
    ("bangladesh", Continent::Asia),
    ("pakistan", Continent::Asia),
    ("sri lanka", Continent::Asia),
    ("nepal", Continent::Asia),
    ("bhutan", Continent::Asia),
    ("turkey", Continent::Asia),
    ("turkiye", Continent::Asia),
    ("israel", Continent::Asia),
    ("jordan", Continent::Asia),
    ("united arab emirates", Continent::Asia),
    ("uae", Continent::Asia),
    ("saudi arabia", Continent::Asia),
    ("iran", Continent::Asia),
    ("uzbekistan", Continent::Asia),
    ("kazakhstan", Continent::Asia),
    ("kyrgyzstan", Continent::Asia),
    // South America
    ("brazil", Continent::SouthAmerica),
    ("argentina", Continent::SouthAmerica),
    ("chile", Continent::SouthAmerica),
    ("peru", Continent::SouthAmerica),
    ("colombia", Continent::SouthAmerica),
    ("ecuador", Continent::SouthAmerica),
    ("bolivia", Continent::SouthAmerica),
    ("paraguay", Continent::SouthAmerica),
    ("uruguay", Continent::SouthAmerica),
    ("venezuela", Continent::SouthAmerica),
    // Africa
    ("egypt", Continent::Africa),
    ("morocco", Continent::Africa),
    ("tunisia", Continent::Africa),
    ("algeria", Continent::Africa),
    ("ethiopia", Continent::Africa),
    ("kenya", Continent::Africa),
    ("tanzania", Continent::Africa),
    ("uganda", Continent::Africa),
    ("rwanda", Continent::Africa),
    ("madagascar", Continent::Africa),
    ("mauritius", Continent::Africa),
    ("south africa", Continent::Africa),
    ("lesotho", Continent::Africa),
    ("eswatini", Continent::Africa),
    ("nigeria", Continent::Africa),
    ("ghana", Continent::Africa),
    // Australia (Oceania)
    ("australia", Continent::Australia),
    ("new zealand", Continent::Australia),
    ("fiji", Continent::Australia),
];

/// Collapse internal whitespace and lower-case
fn fold_country(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Strip a leading "made in" phrase as produced by feature-bullet extraction,
/// along with the article in "made in the usa"
fn strip_made_in(folded: &str) -> &str {
    let country = folded
        .strip_prefix("made in ")
        .map(str::trim)
        .unwrap_or(folded);
    country
        .strip_prefix("the ")
        .map(str::trim)
        .unwrap_or(country)
}

/// Look up a country name in the static table
pub fn continent_of(country: &str) -> Option<Continent> {
    let folded = fold_country(country);
    let key = strip_made_in(&folded);
    COUNTRIES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, continent)| *continent)
}

fn is_imported(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("imported")
}

/// Resolve a product's manufacturing continent from its origin facts
///
/// Checks `Origin` then `Country of origin`; the first present value that is
/// not "Imported" is looked up. Anything unresolvable yields `None`.
pub fn resolve_continent(product: &Product) -> Option<Continent> {
    let country = [ORIGIN, COUNTRY_OF_ORIGIN]
        .iter()
        .filter_map(|key| product.fact(key))
        .filter_map(|value| value.first_text())
        .find(|text| !is_imported(text))?;

    let continent = continent_of(country);
    if continent.is_none() {
        tracing::warn!(country, "unknown country of origin");
    }
    continent
}
