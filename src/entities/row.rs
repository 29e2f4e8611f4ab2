//! Fixed-schema feature row handed to the classifier

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::material::{CanonicalMaterial, MATERIAL_COUNT};
use crate::core::origin::Continent;

/// Column name of the manufacturing continent
pub const MANUFACTURING_LOCATION: &str = "Manufacturing_location";
/// Column name of the (sampled) use location
pub const USE_LOCATION: &str = "Use_location";
/// Column name of the transportation distance
pub const TRANSPORTATION_DISTANCE: &str = "Transportation_distance";

/// Total number of columns in a feature row
pub const COLUMN_COUNT: usize = MATERIAL_COUNT + 3;

/// Column names in schema order
pub fn columns() -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = CanonicalMaterial::all().iter().map(|m| m.as_str()).collect();
    columns.extend([MANUFACTURING_LOCATION, USE_LOCATION, TRANSPORTATION_DISTANCE]);
    columns
}

/// One product's features: material fractions plus contextual fields
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    materials: [f64; MATERIAL_COUNT],
    pub manufacturing_location: Option<Continent>,
    pub use_location: String,
    pub transportation_distance: f64,
}

impl FeatureRow {
    /// Create a row with every material fraction at 0.0
    pub fn new(use_location: impl Into<String>, transportation_distance: f64) -> Self {
        Self {
            materials: [0.0; MATERIAL_COUNT],
            manufacturing_location: None,
            use_location: use_location.into(),
            transportation_distance,
        }
    }

    pub fn material(&self, material: CanonicalMaterial) -> f64 {
        self.materials[material.index()]
    }

    pub fn set_material(&mut self, material: CanonicalMaterial, fraction: f64) {
        self.materials[material.index()] = fraction;
    }

    /// Material fractions in schema order
    pub fn materials(&self) -> impl Iterator<Item = (CanonicalMaterial, f64)> + '_ {
        CanonicalMaterial::all()
            .iter()
            .map(move |m| (*m, self.materials[m.index()]))
    }

    /// Materials with a non-zero fraction
    pub fn nonzero_materials(&self) -> Vec<(CanonicalMaterial, f64)> {
        self.materials().filter(|(_, f)| *f != 0.0).collect()
    }

    /// Text cells in schema order (empty cell for a missing continent)
    pub fn cells(&self) -> Vec<String> {
        let mut cells: Vec<String> = self.materials.iter().map(|f| f.to_string()).collect();
        cells.push(
            self.manufacturing_location
                .map(|c| c.to_string())
                .unwrap_or_default(),
        );
        cells.push(self.use_location.clone());
        cells.push(self.transportation_distance.to_string());
        cells
    }
}

impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(COLUMN_COUNT))?;
        for (material, fraction) in self.materials() {
            map.serialize_entry(material.as_str(), &fraction)?;
        }
        map.serialize_entry(
            MANUFACTURING_LOCATION,
            &self.manufacturing_location.map(|c| c.as_str()),
        )?;
        map.serialize_entry(USE_LOCATION, &self.use_location)?;
        map.serialize_entry(TRANSPORTATION_DISTANCE, &self.transportation_distance)?;
        map.end()
    }
}
