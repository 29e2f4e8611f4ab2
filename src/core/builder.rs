//! Feature row construction from product facts

use miette::Diagnostic;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::core::composition::{average, parse};
use crate::core::origin::resolve_continent;
use crate::core::summary::TrainingSummary;
use crate::entities::product::{Product, FABRIC_TYPE};
use crate::entities::row::FeatureRow;

/// Row building failures
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum BuildError {
    #[error("no usable fabric-type data for '{product}'")]
    #[diagnostic(
        code(ecotag::row::missing_fabric),
        help("the product facts need a \"Fabric type\" entry")
    )]
    MissingFabricData { product: String },
}

/// Builds feature rows against a fixed training summary
///
/// The use location is sampled from the training vocabulary with the
/// builder's random source; everything else is a pure function of the
/// product facts.
#[derive(Debug)]
pub struct RowBuilder<R = StdRng> {
    summary: TrainingSummary,
    rng: R,
}

impl RowBuilder<StdRng> {
    /// Builder seeded from the operating system
    pub fn new(summary: TrainingSummary) -> Self {
        Self::with_rng(summary, StdRng::from_os_rng())
    }

    /// Builder with a reproducible use-location sequence
    pub fn seeded(summary: TrainingSummary, seed: u64) -> Self {
        Self::with_rng(summary, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RowBuilder<R> {
    pub fn with_rng(summary: TrainingSummary, rng: R) -> Self {
        Self { summary, rng }
    }

    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    /// Build one feature row
    pub fn build(&mut self, product: &Product) -> Result<FeatureRow, BuildError> {
        let fabric = product
            .fact(FABRIC_TYPE)
            .ok_or_else(|| BuildError::MissingFabricData {
                product: product.display_name().to_string(),
            })?;

        let use_location = self
            .summary
            .use_locations()
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default();
        let mut row = FeatureRow::new(use_location, self.summary.mean_transportation_distance());

        let parts = parse(fabric);
        if parts.is_empty() {
            tracing::warn!(product = product.display_name(), "fabric type yielded no materials");
        }
        for (material, fraction) in average(&parts) {
            row.set_material(material, fraction);
        }

        row.manufacturing_location = resolve_continent(product);

        tracing::debug!(
            product = product.display_name(),
            parts = parts.len(),
            manufacturing = ?row.manufacturing_location,
            use_location = %row.use_location,
            "built feature row"
        );
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::CanonicalMaterial;
    use crate::core::origin::Continent;
    use crate::entities::product::{FactValue, Facts, ORIGIN};

    fn product(facts: &[(&str, FactValue)]) -> Product {
        let facts: Facts = facts
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Product::new("Test Jacket", facts).with_brand("North Face")
    }

    #[test]
    fn test_build_percentage_row() {
        let mut builder = RowBuilder::seeded(TrainingSummary::default(), 7);
        let row = builder
            .build(&product(&[(FABRIC_TYPE, FactValue::from("50% Nylon, 50% Polyester"))]))
            .unwrap();

        assert_eq!(row.material(CanonicalMaterial::Nylon), 0.5);
        assert_eq!(row.material(CanonicalMaterial::Polyester), 0.5);
        for (material, fraction) in row.materials() {
            if material != CanonicalMaterial::Nylon && material != CanonicalMaterial::Polyester {
                assert_eq!(fraction, 0.0, "{material} should be zero");
            }
        }
        assert_eq!(row.manufacturing_location, None);
        assert_eq!(
            row.transportation_distance,
            TrainingSummary::default().mean_transportation_distance()
        );
        assert!(TrainingSummary::default()
            .use_locations()
            .contains(&row.use_location));
    }

    #[test]
    fn test_build_with_origin() {
        let mut builder = RowBuilder::seeded(TrainingSummary::default(), 1);
        let row = builder
            .build(&product(&[
                (FABRIC_TYPE, FactValue::from("98% Cotton, 2% Elastane")),
                (ORIGIN, FactValue::from("Bangladesh")),
            ]))
            .unwrap();

        assert_eq!(row.material(CanonicalMaterial::Cotton), 0.98);
        assert_eq!(row.material(CanonicalMaterial::Elastane), 0.02);
        assert_eq!(row.manufacturing_location, Some(Continent::Asia));
    }

    #[test]
    fn test_unrecognized_material_goes_to_other() {
        let mut builder = RowBuilder::seeded(TrainingSummary::default(), 1);
        let row = builder
            .build(&product(&[(FABRIC_TYPE, FactValue::from("70% Cotton, 30% Mystery fibre"))]))
            .unwrap();
        assert_eq!(row.material(CanonicalMaterial::Cotton), 0.7);
        assert_eq!(row.material(CanonicalMaterial::Other), 0.3);
    }

    #[test]
    fn test_missing_fabric_data() {
        let mut builder = RowBuilder::seeded(TrainingSummary::default(), 1);

        let err = builder.build(&product(&[])).unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingFabricData {
                product: "Test Jacket".to_string()
            }
        );

        let no_facts = Product {
            name: Some("X".to_string()),
            ..Product::default()
        };
        assert!(builder.build(&no_facts).is_err());

        let null_fabric = product(&[(FABRIC_TYPE, FactValue::Other(serde_json::Value::Null))]);
        assert!(builder.build(&null_fabric).is_err());
    }

    #[test]
    fn test_unparseable_fabric_still_builds() {
        let mut builder = RowBuilder::seeded(TrainingSummary::default(), 1);
        let row = builder
            .build(&product(&[(FABRIC_TYPE, FactValue::Other(serde_json::json!(12)))]))
            .unwrap();
        assert!(row.nonzero_materials().is_empty());
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let summary = TrainingSummary::default();
        let item = product(&[(FABRIC_TYPE, FactValue::from("Cotton"))]);

        let mut a = RowBuilder::seeded(summary.clone(), 99);
        let mut b = RowBuilder::seeded(summary, 99);
        for _ in 0..10 {
            assert_eq!(a.build(&item).unwrap(), b.build(&item).unwrap());
        }
    }

    #[test]
    fn test_single_use_location_is_deterministic() {
        let summary = TrainingSummary::new(["Europe"], 321.0, ["Europe"]).unwrap();
        let mut builder = RowBuilder::new(summary);
        let row = builder
            .build(&product(&[(FABRIC_TYPE, FactValue::from("Wool"))]))
            .unwrap();
        assert_eq!(row.use_location, "Europe");
        assert_eq!(row.transportation_distance, 321.0);
        assert_eq!(row.material(CanonicalMaterial::Wool), 1.0);
    }
}
